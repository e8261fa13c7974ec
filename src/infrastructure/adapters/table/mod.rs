//! Table Adapter - CSV 表格输出

mod csv_table;

pub use csv_table::CsvTableStore;
