//! Documentation tags and their translated conditions

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a documentation tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TagKind {
    /// `@param`: precondition on one parameter
    Param { parameter: String },
    /// `@return`: postcondition on the returned value
    Return,
    /// `@throws`: exceptional postcondition naming the thrown type
    Throws { exception: String },
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagKind::Param { parameter } => write!(f, "@param {}", parameter),
            TagKind::Return => write!(f, "@return"),
            TagKind::Throws { exception } => write!(f, "@throws {}", exception),
        }
    }
}

/// One documentation annotation of a callable
///
/// Equality and hashing cover every visible field, so two tags are
/// interchangeable only when kind, comment, exception and condition all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    #[serde(flatten)]
    kind: TagKind,
    comment: String,
    /// `None` until translation is attempted, empty if nothing matched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    condition: Option<String>,
}

impl Tag {
    pub fn new(kind: TagKind, comment: impl Into<String>) -> Self {
        Tag {
            kind,
            comment: comment.into(),
            condition: None,
        }
    }

    /// `@param` tag
    pub fn param(parameter: impl Into<String>, comment: impl Into<String>) -> Self {
        Tag::new(
            TagKind::Param {
                parameter: parameter.into(),
            },
            comment,
        )
    }

    /// `@return` tag
    pub fn returns(comment: impl Into<String>) -> Self {
        Tag::new(TagKind::Return, comment)
    }

    /// `@throws` tag with the fully-qualified exception type
    pub fn throws(exception: impl Into<String>, comment: impl Into<String>) -> Self {
        Tag::new(
            TagKind::Throws {
                exception: exception.into(),
            },
            comment,
        )
    }

    pub fn kind(&self) -> &TagKind {
        &self.kind
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Exception type of a `@throws` tag
    pub fn exception(&self) -> Option<&str> {
        match &self.kind {
            TagKind::Throws { exception } => Some(exception),
            _ => None,
        }
    }

    /// Translated condition, `None` if translation has not been attempted yet
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    /// Store a condition verbatim
    pub fn set_condition(&mut self, condition: impl Into<String>) {
        self.condition = Some(condition.into());
    }

    /// Store the disjunction of individually translated propositions
    ///
    /// Each expression is parenthesised and joined with `||` in insertion
    /// order. An empty set records that translation found nothing.
    pub fn set_conditions(&mut self, conditions: &IndexSet<String>) {
        let joined = conditions
            .iter()
            .map(|c| format!("({})", c))
            .collect::<Vec<_>>()
            .join("||");
        self.condition = Some(joined);
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.comment)?;
        match &self.condition {
            Some(condition) if !condition.is_empty() => write!(f, " ==> {}", condition),
            _ => Ok(()),
        }
    }
}
