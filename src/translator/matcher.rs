//! Subject resolution
//!
//! Maps the subject phrase of a proposition to the code elements whose
//! aliases are closest to it by edit distance.

use crate::translator::code_element::CodeElement;
use crate::translator::collector::Scope;
use tracing::debug;

/// Leading quantifiers that say nothing about the identity of the subject
const QUANTIFIERS: &[&str] = &["either", "both", "any"];

/// Drop leading quantifiers ("either x or y" -> "x or y") and trim
pub fn clean_subject(subject: &str) -> String {
    let mut subject = subject.to_string();
    for word in QUANTIFIERS {
        let prefix = format!("{} ", word);
        if let Some(rest) = subject.strip_prefix(&prefix) {
            subject = rest.to_string();
        }
    }
    subject.trim().to_string()
}

/// Code elements of `scope` that best match `subject`
///
/// All elements sharing the minimal distance are returned, in scope order.
/// Empty when no element is closer than `threshold`.
pub fn subject_match<'s>(subject: &str, scope: &'s Scope, threshold: usize) -> Vec<&'s CodeElement> {
    let subject = clean_subject(subject);
    let matches = filter_matching(&subject, scope.elements(), threshold);
    debug!(
        "subject '{}' matched [{}]",
        subject,
        matches
            .iter()
            .map(|e| format!("{} {}", e.kind(), e))
            .collect::<Vec<_>>()
            .join(", ")
    );
    matches
}

/// The first element matching a container phrase, if any
pub fn container_match<'s>(
    container: &str,
    scope: &'s Scope,
    threshold: usize,
) -> Option<&'s CodeElement> {
    subject_match(container, scope, threshold).into_iter().next()
}

/// Elements at minimal edit distance from `text`, provided it is below `threshold`
pub fn filter_matching<'e>(
    text: &str,
    elements: impl IntoIterator<Item = &'e CodeElement>,
    threshold: usize,
) -> Vec<&'e CodeElement> {
    filter_matching_by(elements, threshold, |element| element.edit_distance_from(text))
}

/// Elements at minimal `distance`, provided it is below `threshold`
pub fn filter_matching_by<'e>(
    elements: impl IntoIterator<Item = &'e CodeElement>,
    threshold: usize,
    distance_of: impl Fn(&CodeElement) -> usize,
) -> Vec<&'e CodeElement> {
    let mut best: Vec<&CodeElement> = Vec::new();
    let mut min_distance = threshold;
    for element in elements {
        let distance = distance_of(element);
        if distance >= threshold {
            continue;
        }
        if distance < min_distance {
            min_distance = distance;
            best.clear();
            best.push(element);
        } else if distance == min_distance {
            best.push(element);
        }
    }
    best
}
