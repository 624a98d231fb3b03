//! Code elements: program entities a guard expression may mention
//!
//! Every variant knows how it is referenced at the call site (its
//! expression), which natural-language words name it (its aliases) and
//! what type of value it yields.

use crate::reflection::{
    element_type, is_array, is_boolean, is_numeric, is_reference, simple_name, ResolvedField,
    ResolvedMethod,
};
use crate::translator::distance::edit_distance;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;

/// Receiver of the call under analysis in generated expressions
pub const RECEIVER: &str = "target";

/// Returned value in generated postconditions
pub const RESULT: &str = "result";

static NUMERIC_COMPARISON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(<=|>=|<|>|!=|==)-?[0-9]").expect("valid regex"));

/// The declaring type of the callable, referenced as the receiver
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassElement {
    pub type_name: String,
    aliases: Vec<String>,
}

/// A formal parameter, referenced by position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParameterElement {
    pub index: usize,
    pub name: String,
    pub type_name: String,
    aliases: Vec<String>,
}

/// A field reached through a receiver expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldElement {
    pub receiver: String,
    pub field: ResolvedField,
    aliases: Vec<String>,
}

/// An instance method invoked on a receiver expression
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodElement {
    pub receiver: String,
    pub method: ResolvedMethod,
    aliases: Vec<String>,
}

/// A static method, optionally with its single argument already bound
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StaticMethodElement {
    pub method: ResolvedMethod,
    pub argument: Option<String>,
    aliases: Vec<String>,
}

/// The elements held by an array or collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContainerElementsElement {
    pub container: Box<CodeElement>,
}

/// A pre-built expression with no declaration behind it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralElement {
    pub expression: String,
    pub value_type: Option<String>,
    aliases: Vec<String>,
}

/// Candidate program entity
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CodeElement {
    Class(ClassElement),
    Parameter(ParameterElement),
    Field(FieldElement),
    Method(MethodElement),
    StaticMethod(StaticMethodElement),
    ContainerElements(ContainerElementsElement),
    Literal(LiteralElement),
}

impl CodeElement {
    pub fn class(type_name: &str) -> Self {
        let simple = simple_name(type_name);
        let mut aliases = vec![simple.to_string(), "this".to_string(), RECEIVER.to_string()];
        push_camel_case(&mut aliases, simple);
        CodeElement::Class(ClassElement {
            type_name: type_name.to_string(),
            aliases: dedup(aliases),
        })
    }

    /// Parameter at `index`; `mined` are extra identifiers taken from its documentation
    pub fn parameter(index: usize, name: &str, type_name: &str, mined: &[String]) -> Self {
        let mut aliases = vec![name.to_string()];
        push_camel_case(&mut aliases, name);
        aliases.extend(mined.iter().cloned());
        CodeElement::Parameter(ParameterElement {
            index,
            name: name.to_string(),
            type_name: type_name.to_string(),
            aliases: dedup(aliases),
        })
    }

    pub fn field(receiver: &str, field: ResolvedField) -> Self {
        let mut aliases = vec![field.decl.name.clone()];
        push_camel_case(&mut aliases, &field.decl.name);
        CodeElement::Field(FieldElement {
            receiver: receiver.to_string(),
            field,
            aliases: dedup(aliases),
        })
    }

    pub fn method(receiver: &str, method: ResolvedMethod) -> Self {
        let aliases = method_aliases(&method.decl.name);
        CodeElement::Method(MethodElement {
            receiver: receiver.to_string(),
            method,
            aliases,
        })
    }

    pub fn static_method(method: ResolvedMethod, argument: Option<String>) -> Self {
        let aliases = method_aliases(&method.decl.name);
        CodeElement::StaticMethod(StaticMethodElement {
            method,
            argument,
            aliases,
        })
    }

    pub fn container_elements(container: CodeElement) -> Self {
        CodeElement::ContainerElements(ContainerElementsElement {
            container: Box::new(container),
        })
    }

    pub fn literal(expression: &str, value_type: Option<&str>, aliases: &[&str]) -> Self {
        CodeElement::Literal(LiteralElement {
            expression: expression.to_string(),
            value_type: value_type.map(str::to_string),
            aliases: dedup(aliases.iter().map(|a| a.to_string()).collect()),
        })
    }

    /// How the element is referenced at the call site
    pub fn expression(&self) -> String {
        match self {
            CodeElement::Class(_) => RECEIVER.to_string(),
            CodeElement::Parameter(p) => format!("args[{}]", p.index),
            CodeElement::Field(f) => format!("{}.{}", f.receiver, f.field.decl.name),
            CodeElement::Method(m) => format!(
                "{}.{}({})",
                m.receiver,
                m.method.decl.name,
                placeholders(&m.method.decl.parameter_types)
            ),
            CodeElement::StaticMethod(s) => {
                let args = match &s.argument {
                    Some(argument) => argument.clone(),
                    None => placeholders(&s.method.decl.parameter_types),
                };
                format!("{}.{}({})", s.method.owner, s.method.decl.name, args)
            }
            CodeElement::ContainerElements(c) => c.container.expression(),
            CodeElement::Literal(l) => l.expression.clone(),
        }
    }

    /// Natural-language identifiers of the element
    pub fn aliases(&self) -> &[String] {
        match self {
            CodeElement::Class(c) => &c.aliases,
            CodeElement::Parameter(p) => &p.aliases,
            CodeElement::Field(f) => &f.aliases,
            CodeElement::Method(m) => &m.aliases,
            CodeElement::StaticMethod(s) => &s.aliases,
            CodeElement::ContainerElements(c) => c.container.aliases(),
            CodeElement::Literal(l) => &l.aliases,
        }
    }

    /// Smallest edit distance between `text` and any alias or the expression itself
    pub fn edit_distance_from(&self, text: &str) -> usize {
        self.aliases()
            .iter()
            .map(|alias| edit_distance(alias, text))
            .chain(std::iter::once(edit_distance(&self.expression(), text)))
            .min()
            .unwrap_or(usize::MAX)
    }

    /// Declared type of the value the expression yields
    pub fn value_type(&self) -> Option<&str> {
        match self {
            CodeElement::Class(c) => Some(&c.type_name),
            CodeElement::Parameter(p) => Some(&p.type_name),
            CodeElement::Field(f) => Some(&f.field.decl.type_name),
            CodeElement::Method(m) => Some(&m.method.decl.return_type),
            CodeElement::StaticMethod(s) => Some(&s.method.decl.return_type),
            // Collection element types are erased
            CodeElement::ContainerElements(c) => {
                c.container.value_type().and_then(element_type)
            }
            CodeElement::Literal(l) => l.value_type.as_deref(),
        }
    }

    /// Whether the value is an array
    pub fn is_array(&self) -> bool {
        !matches!(self, CodeElement::ContainerElements(_))
            && self.value_type().is_some_and(is_array)
    }

    /// Whether a literal predicate fragment such as `==null` or `>0` can apply to this element
    pub fn is_compatible_with(&self, fragment: &str) -> bool {
        let Some(value_type) = self.value_type() else {
            return true;
        };
        let fragment = fragment.trim();
        if fragment.starts_with("instanceof") {
            return is_reference(value_type);
        }
        match fragment {
            "==null" | "!=null" | "==target" => return is_reference(value_type),
            "==true" | "==false" | "!=true" | "!=false" => return is_boolean(value_type),
            _ => {}
        }
        if fragment.contains('{') {
            // Unresolved variable: nothing to check against
            return true;
        }
        if NUMERIC_COMPARISON.is_match(fragment) {
            return is_numeric(value_type);
        }
        true
    }

    /// Formal argument types of a method element
    pub fn formal_arguments(&self) -> &[String] {
        match self {
            CodeElement::Method(m) => &m.method.decl.parameter_types,
            _ => &[],
        }
    }

    /// The method declaration behind a method element
    pub fn method_decl(&self) -> Option<&ResolvedMethod> {
        match self {
            CodeElement::Method(m) => Some(&m.method),
            CodeElement::StaticMethod(s) => Some(&s.method),
            _ => None,
        }
    }

    /// Short variant name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            CodeElement::Class(_) => "class",
            CodeElement::Parameter(_) => "parameter",
            CodeElement::Field(_) => "field",
            CodeElement::Method(_) => "method",
            CodeElement::StaticMethod(_) => "static method",
            CodeElement::ContainerElements(_) => "container elements",
            CodeElement::Literal(_) => "literal",
        }
    }
}

impl MethodElement {
    /// Invocation of the method with a single bound argument
    pub fn call_with(&self, argument: &str) -> String {
        format!("{}.{}({})", self.receiver, self.method.decl.name, argument)
    }
}

impl ContainerElementsElement {
    /// Expression stating that some element satisfies `fragment`
    pub fn expression_with(&self, fragment: &str) -> String {
        let container = self.container.expression();
        if self.container.is_array() {
            format!(
                "java.util.Arrays.stream({}).anyMatch(e -> e{})",
                container, fragment
            )
        } else {
            format!("{}.stream().anyMatch(e -> e{})", container, fragment)
        }
    }
}

impl fmt::Display for CodeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.expression())
    }
}

/// Total order used to rank equally distant candidates: shorter expressions first
pub fn by_expression(a: &CodeElement, b: &CodeElement) -> Ordering {
    let (a, b) = (a.expression(), b.expression());
    a.len().cmp(&b.len()).then_with(|| a.cmp(&b))
}

/// `{String},{int}` for unbound formal arguments
fn placeholders(parameter_types: &[String]) -> String {
    parameter_types
        .iter()
        .map(|t| format!("{{{}}}", simple_name(t)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Phrases documentation uses for well-known methods
const METHOD_PHRASES: &[(&str, &[&str])] = &[
    ("equals", &["equal", "is equal", "are equal", "equal to"]),
    ("contains", &["contain", "has", "have"]),
];

fn method_aliases(name: &str) -> Vec<String> {
    let mut aliases = vec![name.to_string()];
    push_camel_case(&mut aliases, name);
    if let Some((_, phrases)) = METHOD_PHRASES.iter().find(|(method, _)| *method == name) {
        aliases.extend(phrases.iter().map(|p| p.to_string()));
    }
    for prefix in ["is", "get", "has", "can"] {
        if let Some(rest) = name.strip_prefix(prefix) {
            if rest.starts_with(|c: char| c.is_ascii_uppercase()) {
                aliases.push(lower_first(rest));
                push_camel_case(&mut aliases, rest);
            }
        }
    }
    dedup(aliases)
}

/// Adds `"from index"` for `fromIndex` when the identifier has several words
fn push_camel_case(aliases: &mut Vec<String>, identifier: &str) {
    let words = split_camel_case(identifier);
    if words.len() > 1 {
        aliases.push(words.join(" "));
    } else if let Some(word) = words.into_iter().next() {
        if word != identifier {
            aliases.push(word);
        }
    }
}

fn split_camel_case(identifier: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    for ch in identifier.chars() {
        if ch == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if ch.is_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.extend(ch.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn lower_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn dedup(aliases: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(aliases.len());
    for alias in aliases {
        if !alias.is_empty() && !unique.contains(&alias) {
            unique.push(alias);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::{FieldDecl, MethodDecl};

    fn method(owner: &str, name: &str, params: &[&str], ret: &str, is_static: bool) -> ResolvedMethod {
        ResolvedMethod {
            owner: owner.to_string(),
            decl: MethodDecl {
                name: name.to_string(),
                parameter_types: params.iter().map(|p| p.to_string()).collect(),
                return_type: ret.to_string(),
                public: true,
                is_static,
            },
        }
    }

    #[test]
    fn test_expressions() {
        assert_eq!(CodeElement::class("net.Connection").expression(), "target");
        assert_eq!(
            CodeElement::parameter(2, "values", "int[]", &[]).expression(),
            "args[2]"
        );
        let field = ResolvedField {
            owner: "net.Connection".to_string(),
            decl: FieldDecl {
                name: "open".to_string(),
                type_name: "boolean".to_string(),
                public: true,
                is_static: false,
            },
        };
        assert_eq!(CodeElement::field("target", field).expression(), "target.open");

        let contains = method("java.util.List", "contains", &["java.lang.Object"], "boolean", false);
        assert_eq!(
            CodeElement::method("args[0]", contains).expression(),
            "args[0].contains({Object})"
        );

        let check = method("util.Checks", "isValid", &["java.lang.String"], "boolean", true);
        assert_eq!(
            CodeElement::static_method(check.clone(), Some("args[1]".to_string())).expression(),
            "util.Checks.isValid(args[1])"
        );
        assert_eq!(
            CodeElement::static_method(check, None).expression(),
            "util.Checks.isValid({String})"
        );
    }

    #[test]
    fn test_aliases() {
        let is_empty = method("java.lang.String", "isEmpty", &[], "boolean", false);
        let element = CodeElement::method("args[0]", is_empty);
        assert_eq!(element.aliases(), &["isEmpty", "is empty", "empty"]);

        let param = CodeElement::parameter(0, "fromIndex", "int", &["start".to_string()]);
        assert_eq!(param.aliases(), &["fromIndex", "from index", "start"]);

        let class = CodeElement::class("net.Connection");
        assert!(class.aliases().contains(&"connection".to_string()));
        assert!(class.aliases().contains(&"this".to_string()));
    }

    #[test]
    fn test_edit_distance_uses_best_alias() {
        let param = CodeElement::parameter(0, "fromIndex", "int", &[]);
        assert_eq!(param.edit_distance_from("from index"), 0);
        assert_eq!(param.edit_distance_from("from indx"), 1);
    }

    #[test]
    fn test_compatibility() {
        let int_param = CodeElement::parameter(0, "count", "int", &[]);
        assert!(int_param.is_compatible_with(">0"));
        assert!(int_param.is_compatible_with("=={max}"));
        assert!(!int_param.is_compatible_with("==null"));
        assert!(!int_param.is_compatible_with("==true"));

        let string_param = CodeElement::parameter(1, "name", "java.lang.String", &[]);
        assert!(string_param.is_compatible_with("==null"));
        assert!(string_param.is_compatible_with(" instanceof java.lang.CharSequence"));
        assert!(!string_param.is_compatible_with("<=3"));

        let flag = CodeElement::parameter(2, "flag", "java.lang.Boolean", &[]);
        assert!(flag.is_compatible_with("==false"));

        let letter = CodeElement::parameter(3, "letter", "char", &[]);
        assert!(letter.is_compatible_with(">0"));
        let boxed = CodeElement::parameter(4, "letter", "java.lang.Character", &[]);
        assert!(boxed.is_compatible_with("==0"));

        let literal = CodeElement::literal("args[0].length==0", None, &["isEmpty"]);
        assert!(literal.is_compatible_with("==null"));
    }

    #[test]
    fn test_container_expressions() {
        let array = CodeElement::container_elements(CodeElement::parameter(
            0,
            "values",
            "java.lang.String[]",
            &[],
        ));
        let CodeElement::ContainerElements(elements) = &array else {
            unreachable!()
        };
        assert_eq!(
            elements.expression_with("==null"),
            "java.util.Arrays.stream(args[0]).anyMatch(e -> e==null)"
        );
        assert_eq!(array.value_type(), Some("java.lang.String"));
        assert!(!array.is_array());

        let list = CodeElement::container_elements(CodeElement::parameter(
            1,
            "items",
            "java.util.List",
            &[],
        ));
        let CodeElement::ContainerElements(elements) = &list else {
            unreachable!()
        };
        assert_eq!(
            elements.expression_with("==null"),
            "args[1].stream().anyMatch(e -> e==null)"
        );
    }

    #[test]
    fn test_comparator_prefers_short_expressions() {
        let a = CodeElement::literal("b.x()", None, &[]);
        let b = CodeElement::literal("a.xy()", None, &[]);
        let c = CodeElement::literal("a.x()", None, &[]);
        let mut elements = vec![b.clone(), a.clone(), c.clone()];
        elements.sort_by(by_expression);
        assert_eq!(elements, vec![c, a, b]);
    }
}
