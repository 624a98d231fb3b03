//! Predicate translation
//!
//! Turns the predicate of a proposition into a Java boolean expression over
//! an already matched subject. Three tiers are tried in order:
//!
//! 1. array length rules, for array subjects only
//! 2. the ordered literal rule table ([`RULES`])
//! 3. a search among the boolean members reachable from the subject
//!
//! The first tier that yields a fragment compatible with the subject wins.

use crate::extractor::ExecutableMember;
use crate::reflection::{is_array, is_boolean, TypeResolver};
use crate::translator::code_element::{by_expression, CodeElement, MethodElement, RECEIVER};
use crate::translator::matcher::filter_matching_by;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::{debug, trace};

/// Copulas that may introduce a literal predicate
const VERBS: &str = r"(?:is|are|be|is equal to|are equal to|equals to)";

const VOCABULARY: &str = r"(?P<word>true|false|null|this|empty|zero|positive|strictly positive|negative|strictly negative|nonnegative|nonpositive)\b";

const RELATION: &str = r"<=|>=|<|>|!=|==|=";

const NUMBER: &str =
    r"(?P<num>-?(?:[0-9]+(?:\.[0-9]+)?|zero|one|two|three|four|five|six|seven|eight|nine))\b";

const NUMBER_WORDS: &[&str] = &[
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
];

/// Relational phrases rewritten to operators before rule matching
static RELATION_PHRASES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\b(?:greater|larger|bigger|more) than or equal to\b", ">="),
        (r"\b(?:less|smaller|fewer|lower) than or equal to\b", "<="),
        (r"\bat least\b", ">="),
        (r"\bat most\b", "<="),
        (r"\b(?:greater|larger|bigger|more) than\b", ">"),
        (r"\b(?:less|smaller|fewer|lower) than\b", "<"),
        (r"\b(?:not equal to|different from)\b", "!="),
    ]
    .into_iter()
    .map(|(pattern, operator)| (Regex::new(pattern).expect("valid regex"), operator))
    .collect()
});

static HAS_LENGTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"has length ([0-9]+|zero)\b").expect("valid regex"));

static LENGTH_RELATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([<>=]=?|!=) ?([0-9]+|zero)\b").expect("valid regex"));

static ZERO_LENGTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:is|are|has|have) zero-?length\b").expect("valid regex"));

static NULL_ARGUMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:has|have|contains?)\s+null\b").expect("valid regex"));

static EQUALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:is|are)\s+equals?\b").expect("valid regex"));

/// A whole word of the literal vocabulary
static VOCABULARY_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{VOCABULARY}$")).expect("valid regex"));

/// `args[3]` as written in a receiver expression
static ARGUMENT_INDEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^args\[([0-9]+)\]$").expect("valid regex"));

/// A literal translation rule
pub struct Rule {
    pub name: &'static str,
    pattern: Regex,
    translate: fn(&Captures<'_>, &str) -> Option<String>,
}

/// Literal rules in priority order; the first rule whose pattern matches decides
pub static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let rule = |name: &'static str,
                pattern: String,
                translate: fn(&Captures<'_>, &str) -> Option<String>| Rule {
        name,
        pattern: Regex::new(&pattern).expect("valid regex"),
        translate,
    };
    vec![
        rule(
            "is",
            format!(r"(?:\b{VERBS} ?(?:==|=)?|^\s*(?:==|=)) ?{VOCABULARY}"),
            translate_is,
        ),
        rule(
            "is not",
            format!(r"(?:\b{VERBS} ?(?:!=|not)?|^\s*!=) ?{VOCABULARY}"),
            translate_is_not,
        ),
        rule(
            "number",
            format!(r"(?:\b{VERBS} ?(?P<op>{RELATION})?|^\s*(?P<bare>{RELATION})) ?{NUMBER}"),
            translate_number,
        ),
        rule(
            "variable",
            format!(
                r"(?:\b{VERBS} ?|^\s*)(?P<op>{RELATION}) ?(?P<var>(?:(?:[a-zA-Z]+[0-9]?)+_?)+)"
            ),
            translate_variable,
        ),
        rule(
            "been set",
            r"^\s*been set\s*$".to_string(),
            |_, _| Some("!=null".to_string()),
        ),
        rule(
            "instanceof",
            r"\binstanceof (?P<type>.+)".to_string(),
            |caps, _| Some(format!(" instanceof {}", caps["type"].trim())),
        ),
    ]
});

/// Everything predicate translation needs besides the proposition
#[derive(Clone, Copy)]
pub struct PredicateContext<'a> {
    /// The documented member, excluded from its own conditions
    pub member: &'a ExecutableMember,
    pub resolver: &'a dyn TypeResolver,
    pub threshold: usize,
}

/// Translate `predicate` applied to `subject`
///
/// `None` when no tier produces an expression.
pub fn predicate_match(
    ctx: &PredicateContext<'_>,
    subject: &CodeElement,
    predicate: &str,
    negate: bool,
) -> Option<String> {
    let normalized = normalize(predicate);

    let mut translation = None;
    if subject.is_array() {
        translation = length_match(&normalized).map(|fragment| subject.expression() + &fragment);
    }
    if translation.is_none() {
        translation = literal_match(&normalized)
            .filter(|fragment| subject.is_compatible_with(fragment))
            .map(|fragment| match subject {
                CodeElement::ContainerElements(c) => c.expression_with(&fragment),
                _ => subject.expression() + &fragment,
            });
    }
    if translation.is_none() {
        translation = structural_match(ctx, subject, predicate);
    }

    let translation = translation.filter(|t| t != "target==null")?;
    debug!("'{}' on {} -> {}", predicate, subject, translation);
    Some(if negate {
        format!("({}) == false", translation)
    } else {
        translation
    })
}

/// Rewrite relational phrases ("greater than or equal to") as operators
pub fn normalize(predicate: &str) -> String {
    let mut text = predicate.trim().to_string();
    for (pattern, operator) in RELATION_PHRASES.iter() {
        text = pattern.replace_all(&text, *operator).into_owned();
    }
    text
}

/// Array length rules: `.length==0` style fragments
pub fn length_match(predicate: &str) -> Option<String> {
    if let Some(caps) = HAS_LENGTH.captures(predicate) {
        if let Some(length) = parse_integer(&caps[1]) {
            return Some(format!(".length=={}", length));
        }
    }
    if let Some(caps) = LENGTH_RELATION.captures(predicate) {
        let relation = match &caps[1] {
            "=" => "==",
            other => other,
        };
        if let Some(length) = parse_integer(&caps[2]) {
            return Some(format!(".length{}{}", relation, length));
        }
    }
    if ZERO_LENGTH.is_match(predicate) {
        return Some(".length==0".to_string());
    }
    None
}

/// Literal rules: `==null`, `>0`, `<={max}` style fragments
pub fn literal_match(predicate: &str) -> Option<String> {
    for rule in RULES.iter() {
        if let Some(caps) = rule.pattern.captures(predicate) {
            let fragment = (rule.translate)(&caps, predicate);
            trace!("rule '{}' matched '{}': {:?}", rule.name, predicate, fragment);
            return fragment;
        }
    }
    None
}

fn translate_is(caps: &Captures<'_>, _: &str) -> Option<String> {
    let fragment = match &caps["word"] {
        word @ ("true" | "false" | "null") => format!("=={}", word),
        "this" => format!("=={}", RECEIVER),
        "zero" => "==0".to_string(),
        "positive" | "strictly positive" => ">0".to_string(),
        "negative" | "strictly negative" => "<0".to_string(),
        "nonnegative" => ">=0".to_string(),
        "nonpositive" => "<=0".to_string(),
        _ => return None,
    };
    Some(fragment)
}

// "not positive" keeps the sign of "positive"
fn translate_is_not(caps: &Captures<'_>, _: &str) -> Option<String> {
    let fragment = match &caps["word"] {
        word @ ("true" | "false" | "null") => format!("!={}", word),
        "zero" => "!=0".to_string(),
        "positive" | "strictly positive" => ">0".to_string(),
        "negative" | "strictly negative" => "<0".to_string(),
        "nonnegative" => ">=0".to_string(),
        "nonpositive" => "<=0".to_string(),
        _ => return None,
    };
    Some(fragment)
}

fn translate_number(caps: &Captures<'_>, _: &str) -> Option<String> {
    let relation = caps
        .name("op")
        .or_else(|| caps.name("bare"))
        .map(|m| m.as_str());
    let relation = match relation {
        None | Some("=") => "==",
        Some(relation) => relation,
    };
    let number = &caps["num"];
    let value = if number.contains('.') {
        format!("{:?}", number.parse::<f32>().ok()?)
    } else {
        parse_integer(number)?.to_string()
    };
    Some(format!("{}{}", relation, value))
}

fn translate_variable(caps: &Captures<'_>, predicate: &str) -> Option<String> {
    let relation = match &caps["op"] {
        "=" => "==",
        relation => relation,
    };
    let var = &caps["var"];
    if VOCABULARY_WORD.is_match(var) {
        return None;
    }
    let mut fragment = format!("{}{{{}}}", relation, var);
    // Member access on the variable: "<= max.length" -> "<={max}.length"
    if let Some(pos) = predicate.find(&format!("{}.", var)) {
        fragment.push_str(predicate[pos + var.len()..].trim_end());
    }
    Some(fragment)
}

/// Digits, optionally signed, or a spelled-out digit; `None` outside the `int` range
fn parse_integer(text: &str) -> Option<i32> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    match NUMBER_WORDS.iter().position(|w| *w == digits) {
        Some(index) => {
            let value = index as i32;
            Some(if digits.len() < text.len() { -value } else { value })
        }
        None => text.parse::<i32>().ok(),
    }
}

/// Tier 3: boolean members reachable from the subject, ranked against the predicate
pub fn structural_match(
    ctx: &PredicateContext<'_>,
    subject: &CodeElement,
    predicate: &str,
) -> Option<String> {
    let member_signature = ctx.member.signature();
    let candidates: Vec<CodeElement> = boolean_candidates(ctx, subject)
        .into_iter()
        .filter(|c| {
            c.method_decl()
                .map_or(true, |m| m.signature() != member_signature)
        })
        .collect();
    if candidates.is_empty() {
        return None;
    }

    // An argument-taking method may also match the predicate minus its "null" argument
    let without_argument = predicate.trim().strip_suffix(" null");
    let mut ranked: Vec<&CodeElement> =
        filter_matching_by(&candidates, ctx.threshold, |candidate| {
            let distance = candidate.edit_distance_from(predicate);
            match without_argument {
                Some(stripped) if !candidate.formal_arguments().is_empty() => {
                    distance.min(candidate.edit_distance_from(stripped))
                }
                _ => distance,
            }
        });
    if ranked.is_empty() {
        trace!("no boolean member of {} matches '{}'", subject, predicate);
        return None;
    }
    ranked.sort_by(|a, b| by_expression(a, b));
    Some(method_match(ctx.member, predicate, &ranked))
}

/// Pick and bind the best of the ranked candidates
pub fn method_match(member: &ExecutableMember, predicate: &str, ranked: &[&CodeElement]) -> String {
    // A formal argument typed like one of the member's parameters is bound to it
    for candidate in ranked {
        let CodeElement::Method(method) = candidate else {
            continue;
        };
        let formal = &method.method.decl.parameter_types;
        if let Some(index) = member
            .parameters
            .iter()
            .position(|p| formal.contains(&p.type_name))
        {
            return method.call_with(&format!("args[{}]", index));
        }
    }

    let with_argument = ranked.iter().find_map(|candidate| match candidate {
        CodeElement::Method(method) if !method.method.decl.parameter_types.is_empty() => {
            Some(method)
        }
        _ => None,
    });
    if let Some(method) = with_argument {
        if NULL_ARGUMENT.is_match(predicate) {
            return method.call_with("null");
        }
        if EQUALS.is_match(predicate) {
            if let Some(other) = equals_argument(member, method) {
                return method.call_with(&format!("args[{}]", other));
            }
        }
    }

    ranked[0].expression()
}

/// Another parameter of the same type as the receiver of an `equals`-like call
fn equals_argument(member: &ExecutableMember, method: &MethodElement) -> Option<usize> {
    let receiver = method.receiver.as_str();
    let index = match ARGUMENT_INDEX.captures(receiver) {
        Some(caps) => caps[1].parse::<usize>().ok()?,
        None => {
            let name: String = receiver
                .chars()
                .filter(|c| !matches!(c, '[' | ']' | 's'))
                .collect();
            member.parameters.iter().position(|p| p.name == name)?
        }
    };
    let type_name = &member.parameters.get(index)?.type_name;
    member
        .parameters
        .iter()
        .enumerate()
        .find(|(j, p)| *j != index && &p.type_name == type_name)
        .map(|(j, _)| j)
}

fn boolean_candidates(ctx: &PredicateContext<'_>, subject: &CodeElement) -> Vec<CodeElement> {
    let receiver = subject.expression();
    match subject {
        CodeElement::Parameter(parameter) => {
            let mut candidates = boolean_elements(ctx.resolver, &receiver, &parameter.type_name);
            // Static predicates of the declaring type taking exactly this parameter
            for method in ctx.resolver.public_methods(&ctx.member.declaring_type) {
                let decl = &method.decl;
                if decl.is_static
                    && is_boolean(&decl.return_type)
                    && decl.parameter_types.len() == 1
                    && decl.parameter_types[0] == parameter.type_name
                {
                    candidates.push(CodeElement::static_method(method, Some(receiver.clone())));
                }
            }
            candidates
        }
        CodeElement::Class(class) => boolean_elements(ctx.resolver, RECEIVER, &class.type_name),
        CodeElement::Method(_)
        | CodeElement::StaticMethod(_)
        | CodeElement::Field(_)
        | CodeElement::Literal(_) => match subject.value_type() {
            Some(value_type) => boolean_elements(ctx.resolver, &receiver, value_type),
            None => Vec::new(),
        },
        CodeElement::ContainerElements(_) => Vec::new(),
    }
}

/// Boolean fields and boolean methods of arity at most one of `type_name`
fn boolean_elements(resolver: &dyn TypeResolver, receiver: &str, type_name: &str) -> Vec<CodeElement> {
    if is_array(type_name) {
        return vec![CodeElement::literal(
            &format!("{}.length==0", receiver),
            Some("boolean"),
            &["isEmpty", "is empty", "empty"],
        )];
    }
    let fields = resolver
        .public_fields(type_name)
        .into_iter()
        .filter(|f| !f.decl.is_static && is_boolean(&f.decl.type_name))
        .map(|f| CodeElement::field(receiver, f));
    let methods = resolver
        .public_methods(type_name)
        .into_iter()
        .filter(|m| {
            !m.decl.is_static && is_boolean(&m.decl.return_type) && m.decl.parameter_types.len() <= 1
        })
        .map(|m| CodeElement::method(receiver, m));
    fields.chain(methods).collect()
}
