//! Consistency checks over translated specifications
//!
//! Two kinds of contradiction are reported:
//! - the same exceptional postcondition translated for two `@throws` tags
//! - a precondition that textually equals an exceptional postcondition, so
//!   every valid call would throw
//!
//! Conditions are compared with all whitespace removed. Empty conditions
//! never conflict. Conflicts are reported, never resolved.

use crate::extractor::{ExecutableMember, TagKind};
use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;

/// A contradiction found in the conditions of one member
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "conflict", rename_all = "snake_case")]
pub enum Conflict {
    /// An exceptional postcondition shared by several `@throws` tags
    DuplicatePostconditions {
        member: String,
        condition: String,
        exceptions: Vec<String>,
    },
    /// A precondition equal to one or more exceptional postconditions
    PreconditionClash {
        member: String,
        parameter: String,
        precondition: String,
        exceptions: Vec<String>,
    },
}

impl Conflict {
    pub fn member(&self) -> &str {
        match self {
            Conflict::DuplicatePostconditions { member, .. }
            | Conflict::PreconditionClash { member, .. } => member,
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::DuplicatePostconditions {
                member,
                condition,
                exceptions,
            } => write!(
                f,
                "{}: exceptional postcondition {} is duplicated by {}",
                member,
                condition,
                exceptions.join(", ")
            ),
            Conflict::PreconditionClash {
                member,
                parameter,
                precondition,
                exceptions,
            } => write!(
                f,
                "{}: precondition {} of parameter {} clashes with the postconditions of {}",
                member,
                precondition,
                parameter,
                exceptions.join(", ")
            ),
        }
    }
}

/// Check every member, in order
pub fn check(members: &[ExecutableMember]) -> Vec<Conflict> {
    members.iter().flat_map(check_member).collect()
}

/// Conflicts within a single member
pub fn check_member(member: &ExecutableMember) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    // condition -> exceptions whose tag carries it
    let mut postconditions: IndexMap<String, Vec<String>> = IndexMap::new();
    for tag in member.throws_tags() {
        let condition = squash(tag.condition().unwrap_or_default());
        if condition.is_empty() {
            continue;
        }
        postconditions
            .entry(condition)
            .or_default()
            .push(tag.exception().unwrap_or_default().to_string());
    }

    for (condition, exceptions) in &postconditions {
        if exceptions.len() > 1 {
            conflicts.push(Conflict::DuplicatePostconditions {
                member: member.to_string(),
                condition: condition.clone(),
                exceptions: exceptions.clone(),
            });
        }
    }

    for tag in member.param_tags() {
        let precondition = squash(tag.condition().unwrap_or_default());
        if precondition.is_empty() {
            continue;
        }
        if let Some(exceptions) = postconditions.get(&precondition) {
            let parameter = match tag.kind() {
                TagKind::Param { parameter } => parameter.clone(),
                _ => String::new(),
            };
            conflicts.push(Conflict::PreconditionClash {
                member: member.to_string(),
                parameter,
                precondition,
                exceptions: exceptions.clone(),
            });
        }
    }

    conflicts
}

fn squash(condition: &str) -> String {
    condition.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{Parameter, Tag};

    fn member(tags: Vec<Tag>) -> ExecutableMember {
        ExecutableMember::method(
            "util.Files",
            "copy",
            vec![
                Parameter::new("x", "java.io.File"),
                Parameter::new("y", "java.io.File"),
            ],
            "void",
            tags,
        )
        .unwrap()
    }

    fn with_condition(mut tag: Tag, condition: &str) -> Tag {
        tag.set_condition(condition);
        tag
    }

    #[test]
    fn test_precondition_clash() {
        let m = member(vec![
            with_condition(Tag::param("x", "must be null"), "args[0] == null"),
            with_condition(
                Tag::throws("java.lang.NullPointerException", "if x is null"),
                "args[0]==null",
            ),
        ]);
        let conflicts = check_member(&m);
        assert_eq!(
            conflicts,
            vec![Conflict::PreconditionClash {
                member: m.to_string(),
                parameter: "x".to_string(),
                precondition: "args[0]==null".to_string(),
                exceptions: vec!["java.lang.NullPointerException".to_string()],
            }]
        );
    }

    #[test]
    fn test_duplicate_postconditions() {
        let m = member(vec![
            with_condition(
                Tag::throws("java.lang.NullPointerException", "if y is null"),
                "args[1]==null",
            ),
            with_condition(
                Tag::throws("java.lang.IllegalArgumentException", "if y is missing"),
                "args[1] == null",
            ),
            with_condition(
                Tag::throws("java.io.IOException", "if copying fails"),
                "",
            ),
        ]);
        let conflicts = check(&[m]);
        assert_eq!(conflicts.len(), 1);
        let Conflict::DuplicatePostconditions { exceptions, .. } = &conflicts[0] else {
            panic!("expected duplicate postconditions, got {:?}", conflicts[0]);
        };
        assert_eq!(
            exceptions,
            &[
                "java.lang.NullPointerException",
                "java.lang.IllegalArgumentException"
            ]
        );
    }

    #[test]
    fn test_consistent_member() {
        let m = member(vec![
            with_condition(Tag::param("x", "must not be null"), "args[0]!=null"),
            with_condition(
                Tag::throws("java.lang.NullPointerException", "if x is null"),
                "args[0]==null",
            ),
            Tag::throws("java.io.IOException", "never translated"),
            with_condition(Tag::throws("java.lang.Error", "untranslatable"), ""),
            with_condition(Tag::param("y", "anything"), ""),
        ]);
        assert!(check_member(&m).is_empty());
    }

    #[test]
    fn test_json_shape() {
        let conflict = Conflict::DuplicatePostconditions {
            member: "util.Files.copy(File, File)".to_string(),
            condition: "args[1]==null".to_string(),
            exceptions: vec!["A".to_string(), "B".to_string()],
        };
        let value = serde_json::to_value(&conflict).unwrap();
        assert_eq!(value["conflict"], "duplicate_postconditions");
        assert_eq!(value["exceptions"][1], "B");
    }
}
