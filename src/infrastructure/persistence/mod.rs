//! Persistence Layer - 数据持久化
//!
//! Sled 存储实现（解析结果缓存）

pub mod sled;

pub use self::sled::SledBookCache;
