//! Book Context - 书籍限界上下文
//!
//! 职责:
//! - Book 聚合与章节、场景实体
//! - 章节类型枚举
//! - 原始文本解析（两级状态机）

mod aggregate;
mod entities;
mod errors;
mod parser;
mod value_objects;

pub use aggregate::Book;
pub use entities::{Chapter, Segment, SEGMENT_SEPARATOR};
pub use errors::ParseError;
pub use parser::{parse_segments, BookParser};
pub use value_objects::ChapterKind;
