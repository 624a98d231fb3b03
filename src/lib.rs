//! # specmine
//!
//! Mines executable specifications from API documentation comments.
//!
//! This crate provides:
//! - a model of documented Java callables and their `@param`, `@return` and
//!   `@throws` tags
//! - a translator that turns the propositions of each comment into Java
//!   boolean expressions over the callable's receiver, arguments and result
//! - a consistency checker for the translated specifications
//! - CLI tool (`specmine`) driving both over JSON files
//!
//! ## Usage
//!
//! ```rust
//! use specmine::{ExecutableMember, Parameter, Proposition, PropositionTable, Tag};
//! use specmine::{Translator, TranslatorConfig, TypeDecl, TypeUniverse};
//!
//! let universe = TypeUniverse::new().with(TypeDecl::new("net.Connection"));
//! let table = PropositionTable::new().with_propositions(
//!     "if message is null",
//!     vec![Proposition::new("message", "is null")],
//! );
//! let mut send = ExecutableMember::method(
//!     "net.Connection",
//!     "send",
//!     vec![Parameter::new("message", "java.lang.String")],
//!     "void",
//!     vec![Tag::throws("java.lang.NullPointerException", "if message is null")],
//! )
//! .unwrap();
//!
//! let translator = Translator::new(&universe, &table, TranslatorConfig::default());
//! translator.translate(&mut send);
//! assert_eq!(send.tags[0].condition(), Some("(args[0]==null)"));
//! ```
//!
//! Sentence decomposition and type discovery are collaborators: implement
//! [`Decomposer`] and [`TypeResolver`], or load the JSON-backed
//! [`PropositionTable`] and [`TypeUniverse`].

pub mod checker;
pub mod config;
pub mod error;
pub mod extractor;
pub mod proposition;
pub mod reflection;
pub mod translator;

pub use checker::{check, check_member, Conflict};
pub use config::{TranslatorConfig, DEFAULT_DISTANCE_THRESHOLD};
pub use error::{ConfigError, LoadError, ModelError};
pub use extractor::{load_members, save_members, ExecutableMember, Parameter, Tag, TagKind};
pub use proposition::{Decomposer, Proposition, PropositionTable, Subject};
pub use reflection::{FieldDecl, MethodDecl, TypeDecl, TypeResolver, TypeUniverse};
pub use translator::{CodeElement, Scope, TranslationSummary, Translator};
