//! Documented callables
//!
//! An `ExecutableMember` identifies a constructor or method together with the
//! documentation tags attached to it. This is the JSON form handed to
//! downstream reporting and to the consistency checker.

use super::tag::{Tag, TagKind};
use crate::error::{LoadError, ModelError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// A formal parameter as declared in source
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    /// Declared name
    pub name: String,
    /// Java-style type name (e.g. `int`, `java.lang.String[]`)
    #[serde(rename = "type")]
    pub type_name: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Parameter {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.type_name, self.name)
    }
}

/// A documented constructor or method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableMember {
    /// Fully-qualified name of the declaring type
    pub declaring_type: String,
    /// Simple name (the simple type name for constructors)
    pub name: String,
    #[serde(default)]
    pub constructor: bool,
    #[serde(default)]
    pub varargs: bool,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// `None` for constructors, `Some("void")` for procedures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl ExecutableMember {
    /// Create a method
    pub fn method(
        declaring_type: impl Into<String>,
        name: impl Into<String>,
        parameters: Vec<Parameter>,
        return_type: impl Into<String>,
        tags: Vec<Tag>,
    ) -> Result<Self, ModelError> {
        let member = ExecutableMember {
            declaring_type: declaring_type.into(),
            name: name.into(),
            constructor: false,
            varargs: false,
            parameters,
            return_type: Some(return_type.into()),
            tags,
        };
        member.validate()?;
        Ok(member)
    }

    /// Create a constructor of `declaring_type`
    pub fn constructor(
        declaring_type: impl Into<String>,
        parameters: Vec<Parameter>,
        tags: Vec<Tag>,
    ) -> Result<Self, ModelError> {
        let declaring_type = declaring_type.into();
        let name = crate::reflection::simple_name(&declaring_type).to_string();
        let member = ExecutableMember {
            declaring_type,
            name,
            constructor: true,
            varargs: false,
            parameters,
            return_type: None,
            tags,
        };
        member.validate()?;
        Ok(member)
    }

    /// Check the structural invariants of the member
    pub fn validate(&self) -> Result<(), ModelError> {
        let returns = self
            .tags
            .iter()
            .filter(|t| matches!(t.kind(), TagKind::Return))
            .count();
        if returns > 1 {
            return Err(ModelError::DuplicateReturnTag {
                member: self.to_string(),
            });
        }
        if self.constructor && self.return_type.is_some() {
            return Err(ModelError::ConstructorReturnType {
                member: self.to_string(),
            });
        }
        for tag in self.param_tags() {
            if let TagKind::Param { parameter } = tag.kind() {
                if !self.parameters.iter().any(|p| &p.name == parameter) {
                    // Javadoc may contain errors: keep the tag, it will not bind
                    tracing::warn!("{}: @param {} names no parameter", self, parameter);
                }
            }
        }
        Ok(())
    }

    pub fn is_constructor(&self) -> bool {
        self.constructor
    }

    /// Return type, unless this is a constructor or returns `void`
    pub fn result_type(&self) -> Option<&str> {
        self.return_type.as_deref().filter(|t| *t != "void")
    }

    pub fn param_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags
            .iter()
            .filter(|t| matches!(t.kind(), TagKind::Param { .. }))
    }

    pub fn throws_tags(&self) -> impl Iterator<Item = &Tag> {
        self.tags
            .iter()
            .filter(|t| matches!(t.kind(), TagKind::Throws { .. }))
    }

    pub fn return_tag(&self) -> Option<&Tag> {
        self.tags
            .iter()
            .find(|t| matches!(t.kind(), TagKind::Return))
    }

    /// `@param` tags documenting the named parameter
    pub fn param_tags_for<'a>(&'a self, parameter: &'a str) -> impl Iterator<Item = &'a Tag> {
        self.param_tags().filter(move |t| {
            matches!(t.kind(), TagKind::Param { parameter: p } if p == parameter)
        })
    }

    /// Erased signature used to tell members apart, e.g. `net.Connection.send(java.lang.String)`
    pub fn signature(&self) -> String {
        member_signature(
            &self.declaring_type,
            &self.name,
            self.parameters.iter().map(|p| p.type_name.as_str()),
        )
    }
}

/// Signature in the form `owner.name(T1,T2)`
pub(crate) fn member_signature<'a>(
    owner: &str,
    name: &str,
    parameter_types: impl Iterator<Item = &'a str>,
) -> String {
    format!(
        "{}.{}({})",
        owner,
        name,
        parameter_types.collect::<Vec<_>>().join(",")
    )
}

impl fmt::Display for ExecutableMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self
            .parameters
            .iter()
            .map(|p| p.type_name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}.{}({})", self.declaring_type, self.name, params)
    }
}

/// Load documented members from a JSON array
pub fn load_members(path: &Path) -> Result<Vec<ExecutableMember>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let members: Vec<ExecutableMember> =
        serde_json::from_str(&content).map_err(|e| LoadError::json(path, e))?;
    for member in &members {
        member.validate().map_err(|source| LoadError::Model {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(members)
}

/// Write documented members (with their conditions) as pretty JSON
pub fn save_members(path: &Path, members: &[ExecutableMember]) -> Result<(), LoadError> {
    let json = serde_json::to_string_pretty(members).map_err(|e| LoadError::json(path, e))?;
    std::fs::write(path, json).map_err(|e| LoadError::io(path, e))
}
