//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod source;
pub mod table;

pub use source::*;
pub use table::*;
