//! Character Context - 角色限界上下文
//!
//! 职责:
//! - 角色实体与别名匹配
//! - 角色注册表与视角角色解析

mod entities;
mod registry;

pub use entities::{Character, MAX_ALIAS_TOKENS};
pub use registry::CharacterRegistry;
