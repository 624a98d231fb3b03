//! Documentation model
//!
//! This module contains:
//! - `member`: documented constructors/methods and their JSON form
//! - `tag`: `@param`, `@return` and `@throws` tags with translated conditions

pub mod member;
pub mod tag;

pub use member::{load_members, save_members, ExecutableMember, Parameter};
pub use tag::{Tag, TagKind};
