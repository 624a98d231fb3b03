//! Comment-to-condition translation
//!
//! This module contains:
//! - `distance`: edit distance used for every fuzzy comparison
//! - `code_element`: the program entities a condition may mention
//! - `collector`: per-member scope of code elements
//! - `matcher`: subject phrase to code element resolution
//! - `predicate`: predicate phrase to boolean expression translation
//!
//! [`Translator`] drives them over the tags of documented members and
//! stores the resulting conditions back into the tags.

pub mod code_element;
pub mod collector;
pub mod distance;
pub mod matcher;
pub mod predicate;

pub use code_element::{CodeElement, RECEIVER, RESULT};
pub use collector::{collect, Scope};
pub use distance::edit_distance;
pub use matcher::{container_match, filter_matching, subject_match};
pub use predicate::{predicate_match, PredicateContext};

use crate::config::TranslatorConfig;
use crate::extractor::{ExecutableMember, TagKind};
use crate::proposition::{Decomposer, Proposition};
use crate::reflection::TypeResolver;
use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, info};

/// Counts of one translation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TranslationSummary {
    pub members: usize,
    pub tags: usize,
    /// Tags that received a non-empty condition
    pub translated: usize,
    /// Tags whose propositions all failed to translate
    pub unmatched: usize,
}

impl TranslationSummary {
    fn absorb(&mut self, other: TranslationSummary) {
        self.members += other.members;
        self.tags += other.tags;
        self.translated += other.translated;
        self.unmatched += other.unmatched;
    }
}

/// Translates the comments of documented members into Java conditions
pub struct Translator<'a> {
    resolver: &'a dyn TypeResolver,
    decomposer: &'a dyn Decomposer,
    config: TranslatorConfig,
}

impl<'a> Translator<'a> {
    pub fn new(
        resolver: &'a dyn TypeResolver,
        decomposer: &'a dyn Decomposer,
        config: TranslatorConfig,
    ) -> Self {
        Translator {
            resolver,
            decomposer,
            config,
        }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate every tag of `member`, overwriting previous conditions
    pub fn translate(&self, member: &mut ExecutableMember) -> TranslationSummary {
        let scope = collect(member, self.resolver, self.decomposer);
        let result_scope = member.result_type().map(|t| scope.with_result(t));

        let conditions: Vec<IndexSet<String>> = member
            .tags
            .iter()
            .map(|tag| {
                let scope = match (tag.kind(), &result_scope) {
                    (TagKind::Return, Some(result_scope)) => result_scope,
                    _ => &scope,
                };
                self.translate_comment(member, scope, tag.comment())
            })
            .collect();

        let mut summary = TranslationSummary {
            members: 1,
            ..TranslationSummary::default()
        };
        for (tag, conditions) in member.tags.iter_mut().zip(conditions) {
            tag.set_conditions(&conditions);
            summary.tags += 1;
            if conditions.is_empty() {
                summary.unmatched += 1;
            } else {
                summary.translated += 1;
            }
            debug!("{}", tag);
        }
        summary
    }

    /// Translate a batch; one member failing to translate never stops the others
    pub fn translate_all(&self, members: &mut [ExecutableMember]) -> TranslationSummary {
        let mut summary = TranslationSummary::default();
        for member in members.iter_mut() {
            summary.absorb(self.translate(member));
        }
        info!(
            "translated {} of {} tags across {} members",
            summary.translated, summary.tags, summary.members
        );
        summary
    }

    /// Distinct conditions expressed by `comment`, in proposition order
    pub fn translate_comment(
        &self,
        member: &ExecutableMember,
        scope: &Scope,
        comment: &str,
    ) -> IndexSet<String> {
        let ctx = PredicateContext {
            member,
            resolver: self.resolver,
            threshold: self.config.distance_threshold,
        };
        self.decomposer
            .propositions(comment)
            .iter()
            .filter_map(|proposition| self.translate_proposition(&ctx, scope, proposition))
            .collect()
    }

    /// Condition for a single proposition
    ///
    /// A subject matching several elements ("either x or y") yields one
    /// condition per element; they are joined with `&&` when the subject is
    /// quantified by "both", `||` otherwise. All of them must translate.
    pub fn translate_proposition(
        &self,
        ctx: &PredicateContext<'_>,
        scope: &Scope,
        proposition: &Proposition,
    ) -> Option<String> {
        let threshold = self.config.distance_threshold;
        let subject = &proposition.subject;

        let container = subject
            .container
            .as_deref()
            .and_then(|container| container_match(container, scope, threshold))
            .filter(|c| c.value_type().is_some_and(|t| self.resolver.is_container(t)));
        let subjects: Vec<CodeElement> = match container {
            Some(container) => vec![CodeElement::container_elements(container.clone())],
            None => subject_match(&subject.text, scope, threshold)
                .into_iter()
                .cloned()
                .collect(),
        };
        if subjects.is_empty() {
            debug!("{}: no code element matches '{}'", ctx.member, subject.text);
            return None;
        }

        let translations = subjects
            .iter()
            .map(|s| predicate_match(ctx, s, &proposition.predicate, proposition.negate))
            .collect::<Option<Vec<String>>>()?;
        let conjunction = if subject.text.trim_start().starts_with("both ") {
            "&&"
        } else {
            "||"
        };
        Some(translations.join(conjunction))
    }
}
