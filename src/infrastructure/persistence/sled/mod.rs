//! Sled 存储实现

mod book_cache;

pub use book_cache::SledBookCache;
