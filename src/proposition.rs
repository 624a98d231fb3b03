//! Propositions extracted from documentation comments
//!
//! Decomposing a sentence into subject/predicate pairs needs a dependency
//! parser, which lives outside this crate. The `Decomposer` trait is the seam;
//! `PropositionTable` is a pre-computed decomposition loaded from JSON.

use crate::error::LoadError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Subject phrase of a proposition
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subject {
    pub text: String,
    /// Array or collection whose elements the subject refers to ("elements of values")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
}

impl Subject {
    pub fn new(text: impl Into<String>) -> Self {
        Subject {
            text: text.into(),
            container: None,
        }
    }

    pub fn in_container(text: impl Into<String>, container: impl Into<String>) -> Self {
        Subject {
            text: text.into(),
            container: Some(container.into()),
        }
    }
}

/// A (subject, predicate, negation) triple from one sentence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proposition {
    pub subject: Subject,
    pub predicate: String,
    #[serde(default)]
    pub negate: bool,
}

impl Proposition {
    pub fn new(subject: impl Into<String>, predicate: impl Into<String>) -> Self {
        Proposition {
            subject: Subject::new(subject),
            predicate: predicate.into(),
            negate: false,
        }
    }

    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }
}

/// Natural-language front end
pub trait Decomposer {
    /// Propositions expressed by a comment, in sentence order
    fn propositions(&self, comment: &str) -> Vec<Proposition>;

    /// Head token of each dependency parse of `text`
    fn root_words(&self, text: &str) -> Vec<String>;
}

/// Decomposer backed by pre-computed parses
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropositionTable {
    #[serde(default)]
    propositions: IndexMap<String, Vec<Proposition>>,
    #[serde(default)]
    roots: IndexMap<String, Vec<String>>,
}

impl PropositionTable {
    pub fn new() -> Self {
        PropositionTable::default()
    }

    /// Register the propositions of a comment
    pub fn with_propositions(mut self, comment: &str, propositions: Vec<Proposition>) -> Self {
        self.propositions.insert(comment.to_string(), propositions);
        self
    }

    /// Register the root words of a text
    pub fn with_roots(mut self, text: &str, roots: &[&str]) -> Self {
        self.roots.insert(
            text.to_string(),
            roots.iter().map(|r| r.to_string()).collect(),
        );
        self
    }

    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| LoadError::json(path, e))
    }
}

impl Decomposer for PropositionTable {
    fn propositions(&self, comment: &str) -> Vec<Proposition> {
        self.propositions
            .get(comment.trim())
            .cloned()
            .unwrap_or_default()
    }

    fn root_words(&self, text: &str) -> Vec<String> {
        self.roots.get(text.trim()).cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup() {
        let table = PropositionTable::new()
            .with_propositions("if x is null", vec![Proposition::new("x", "is null")])
            .with_roots("the message to send", &["message"]);

        assert_eq!(
            table.propositions("if x is null "),
            vec![Proposition::new("x", "is null")]
        );
        assert!(table.propositions("unknown").is_empty());
        assert_eq!(table.root_words("the message to send"), vec!["message"]);
    }

    #[test]
    fn test_table_json() {
        let json = r#"{
            "propositions": {
                "if the array has length zero": [
                    {"subject": {"text": "array"}, "predicate": "has length zero"}
                ]
            }
        }"#;
        let table: PropositionTable = serde_json::from_str(json).unwrap();
        let props = table.propositions("if the array has length zero");
        assert_eq!(props.len(), 1);
        assert!(!props[0].negate);
        assert_eq!(props[0].subject.container, None);
    }
}
