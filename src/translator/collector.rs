//! Scope collection
//!
//! Enumerates every code element reachable from a documented member: the
//! declaring type, the parameters, and the compatible public methods and
//! fields of the declaring type. The scope is built once per member and is
//! read-only afterwards.

use crate::extractor::ExecutableMember;
use crate::proposition::Decomposer;
use crate::reflection::TypeResolver;
use crate::translator::code_element::{CodeElement, RECEIVER, RESULT};
use indexmap::{IndexMap, IndexSet};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Code elements available when translating the comments of one member
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    elements: Vec<CodeElement>,
    by_alias: IndexMap<String, Vec<usize>>,
}

impl Scope {
    pub fn new(elements: Vec<CodeElement>) -> Self {
        let mut by_alias: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (index, element) in elements.iter().enumerate() {
            for alias in element.aliases() {
                by_alias.entry(alias.clone()).or_default().push(index);
            }
        }
        Scope { elements, by_alias }
    }

    /// Elements in collection order
    pub fn elements(&self) -> &[CodeElement] {
        &self.elements
    }

    /// Elements carrying exactly `alias`
    pub fn with_alias(&self, alias: &str) -> Vec<&CodeElement> {
        self.by_alias
            .get(alias)
            .map(|indices| indices.iter().map(|&i| &self.elements[i]).collect())
            .unwrap_or_default()
    }

    /// Parameter element at position `index`
    pub fn parameter(&self, index: usize) -> Option<&CodeElement> {
        self.elements
            .iter()
            .find(|e| matches!(e, CodeElement::Parameter(p) if p.index == index))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// This scope plus the returned value, for translating `@return` comments
    pub fn with_result(&self, result_type: &str) -> Scope {
        let mut elements = self.elements.clone();
        elements.push(CodeElement::literal(
            RESULT,
            Some(result_type),
            &[RESULT, "the result", "return value", "returned value"],
        ));
        Scope::new(elements)
    }
}

/// Collect the scope of `member`
///
/// Returns an empty scope when the declaring type cannot be resolved.
pub fn collect(
    member: &ExecutableMember,
    resolver: &dyn TypeResolver,
    decomposer: &dyn Decomposer,
) -> Scope {
    let Some(declaring) = resolver.resolve(&member.declaring_type) else {
        warn!(
            "{}: declaring type {} cannot be resolved, scope is empty",
            member, member.declaring_type
        );
        return Scope::default();
    };

    let mut elements = vec![CodeElement::class(&declaring.name)];
    let mut in_scope_types = vec![declaring.name.as_str()];

    // Phase 1: mine identifiers from each parameter's own documentation and
    // count how many parameters claim each of them
    let mut mined: Vec<IndexSet<String>> = Vec::with_capacity(member.parameters.len());
    let mut claims: HashMap<String, usize> = HashMap::new();
    for parameter in &member.parameters {
        let ids: IndexSet<String> = member
            .param_tags_for(&parameter.name)
            .flat_map(|tag| decomposer.root_words(tag.comment()))
            .collect();
        for id in &ids {
            *claims.entry(id.clone()).or_insert(0) += 1;
        }
        mined.push(ids);
        in_scope_types.push(parameter.type_name.as_str());
    }

    // Phase 2: an identifier claimed by several parameters is ambiguous and
    // belongs to none of them
    for (index, (parameter, ids)) in member.parameters.iter().zip(&mined).enumerate() {
        let unique: Vec<String> = ids
            .iter()
            .filter(|id| claims.get(*id).copied().unwrap_or(0) == 1)
            .cloned()
            .collect();
        if unique.len() != ids.len() {
            debug!(
                "{}: dropped ambiguous aliases of parameter {}",
                member, parameter.name
            );
        }
        elements.push(CodeElement::parameter(
            index,
            &parameter.name,
            &parameter.type_name,
            &unique,
        ));
    }

    let signature = member.signature();
    for method in resolver.public_methods(&declaring.name) {
        if method.signature() == signature {
            continue;
        }
        let compatible = method
            .decl
            .parameter_types
            .iter()
            .all(|t| in_scope_types.contains(&t.as_str()));
        if !compatible {
            continue;
        }
        if method.decl.is_static {
            elements.push(CodeElement::static_method(method, None));
        } else if !member.is_constructor() {
            // The receiver does not exist yet while a constructor runs
            elements.push(CodeElement::method(RECEIVER, method));
        }
    }

    for field in resolver.public_fields(&declaring.name) {
        elements.push(CodeElement::field(RECEIVER, field));
    }

    debug!("{}: collected {} code elements", member, elements.len());
    Scope::new(elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::{Parameter, Tag};
    use crate::proposition::PropositionTable;
    use crate::reflection::{TypeDecl, TypeUniverse};

    fn universe() -> TypeUniverse {
        TypeUniverse::new().with(
            TypeDecl::new("net.Connection")
                .with_field("open", "boolean")
                .with_field("attempts", "int")
                .with_method("send", &["java.lang.String"], "void")
                .with_method("isOpen", &[], "boolean")
                .with_method("connect", &["java.net.URL"], "void")
                .with_method("close", &[], "void")
                .with_static_method("isValid", &["java.lang.String"], "boolean"),
        )
    }

    fn send(tags: Vec<Tag>) -> ExecutableMember {
        ExecutableMember::method(
            "net.Connection",
            "send",
            vec![Parameter::new("message", "java.lang.String")],
            "void",
            tags,
        )
        .unwrap()
    }

    fn expressions(scope: &Scope) -> Vec<String> {
        scope.elements().iter().map(|e| e.expression()).collect()
    }

    #[test]
    fn test_collect_members() {
        let scope = collect(&send(vec![]), &universe(), &PropositionTable::new());
        assert_eq!(
            expressions(&scope),
            vec![
                "target",
                "args[0]",
                "target.close()",
                "target.isOpen()",
                "net.Connection.isValid({String})",
                "target.attempts",
                "target.open",
            ]
        );
    }

    #[test]
    fn test_constructor_has_no_instance_methods() {
        let ctor = ExecutableMember::constructor(
            "net.Connection",
            vec![Parameter::new("host", "java.lang.String")],
            vec![],
        )
        .unwrap();
        let scope = collect(&ctor, &universe(), &PropositionTable::new());
        assert!(!scope
            .elements()
            .iter()
            .any(|e| matches!(e, CodeElement::Method(_))));
        assert!(scope
            .elements()
            .iter()
            .any(|e| matches!(e, CodeElement::StaticMethod(_))));
    }

    #[test]
    fn test_unresolvable_declaring_type() {
        let member = ExecutableMember::method("com.example.Missing", "run", vec![], "void", vec![])
            .unwrap();
        let scope = collect(&member, &universe(), &PropositionTable::new());
        assert!(scope.is_empty());
    }

    #[test]
    fn test_ambiguous_aliases_are_pruned() {
        let universe = TypeUniverse::new().with(TypeDecl::new("util.Ranges"));
        let member = ExecutableMember::method(
            "util.Ranges",
            "between",
            vec![
                Parameter::new("low", "int"),
                Parameter::new("high", "int"),
            ],
            "boolean",
            vec![
                Tag::param("low", "the lower bound"),
                Tag::param("high", "the upper bound"),
            ],
        )
        .unwrap();
        let table = PropositionTable::new()
            .with_roots("the lower bound", &["bound", "minimum"])
            .with_roots("the upper bound", &["bound", "maximum"]);

        let scope = collect(&member, &universe, &table);
        let low = scope.parameter(0).unwrap();
        let high = scope.parameter(1).unwrap();
        assert_eq!(low.aliases(), &["low", "minimum"]);
        assert_eq!(high.aliases(), &["high", "maximum"]);
        assert!(scope.with_alias("bound").is_empty());
        assert_eq!(scope.with_alias("maximum"), vec![high]);
    }

    #[test]
    fn test_with_result() {
        let member = ExecutableMember::method("net.Connection", "isOpen", vec![], "boolean", vec![])
            .unwrap();
        let scope = collect(&member, &universe(), &PropositionTable::new());
        // The member itself is not in its own scope
        assert!(!expressions(&scope).contains(&"target.isOpen()".to_string()));
        let with_result = scope.with_result("boolean");
        assert_eq!(with_result.len(), scope.len() + 1);
        assert_eq!(with_result.with_alias("result")[0].expression(), "result");
    }
}
