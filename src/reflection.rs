//! Read-only type model
//!
//! Stands in for runtime reflection: a `TypeUniverse` describes the public
//! fields and methods of every type the translator may reach. Types missing
//! from the universe are not an error; they simply contribute no members.

use crate::error::LoadError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

const NUMERIC: &[&str] = &[
    "byte",
    "char",
    "short",
    "int",
    "long",
    "float",
    "double",
    "java.lang.Byte",
    "java.lang.Character",
    "java.lang.Short",
    "java.lang.Integer",
    "java.lang.Long",
    "java.lang.Float",
    "java.lang.Double",
];

/// A declared field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default = "default_true")]
    pub public: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

/// A declared method
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default)]
    pub parameter_types: Vec<String>,
    pub return_type: String,
    #[serde(default = "default_true")]
    pub public: bool,
    #[serde(default, rename = "static")]
    pub is_static: bool,
}

fn default_true() -> bool {
    true
}

/// A declared class, interface or enum
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    /// Fully-qualified name
    pub name: String,
    /// Direct supertypes whose public members are inherited
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Whether values of this type hold elements (lists, sets, ...)
    #[serde(default)]
    pub collection: bool,
    #[serde(default)]
    pub fields: Vec<FieldDecl>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>) -> Self {
        TypeDecl {
            name: name.into(),
            supertypes: Vec::new(),
            collection: false,
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn with_supertype(mut self, supertype: impl Into<String>) -> Self {
        self.supertypes.push(supertype.into());
        self
    }

    pub fn as_collection(mut self) -> Self {
        self.collection = true;
        self
    }

    pub fn with_field(mut self, name: &str, type_name: &str) -> Self {
        self.fields.push(FieldDecl {
            name: name.to_string(),
            type_name: type_name.to_string(),
            public: true,
            is_static: false,
        });
        self
    }

    pub fn with_method(mut self, name: &str, parameter_types: &[&str], return_type: &str) -> Self {
        self.methods.push(MethodDecl {
            name: name.to_string(),
            parameter_types: parameter_types.iter().map(|t| t.to_string()).collect(),
            return_type: return_type.to_string(),
            public: true,
            is_static: false,
        });
        self
    }

    pub fn with_static_method(
        mut self,
        name: &str,
        parameter_types: &[&str],
        return_type: &str,
    ) -> Self {
        self.methods.push(MethodDecl {
            name: name.to_string(),
            parameter_types: parameter_types.iter().map(|t| t.to_string()).collect(),
            return_type: return_type.to_string(),
            public: true,
            is_static: true,
        });
        self
    }
}

/// A public method together with the type declaring it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedMethod {
    pub owner: String,
    pub decl: MethodDecl,
}

impl ResolvedMethod {
    /// Erased signature, comparable with `ExecutableMember::signature`
    pub fn signature(&self) -> String {
        crate::extractor::member::member_signature(
            &self.owner,
            &self.decl.name,
            self.decl.parameter_types.iter().map(String::as_str),
        )
    }
}

/// A public field together with the type declaring it
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedField {
    pub owner: String,
    pub decl: FieldDecl,
}

/// Lookup of declared types by fully-qualified name
pub trait TypeResolver {
    fn resolve(&self, name: &str) -> Option<&TypeDecl>;

    /// Array or declared collection type
    fn is_container(&self, type_name: &str) -> bool {
        is_array(type_name) || self.resolve(type_name).is_some_and(|t| t.collection)
    }

    /// Public methods of `type_name`, inherited ones included, sorted by name
    fn public_methods(&self, type_name: &str) -> Vec<ResolvedMethod> {
        let mut seen = HashSet::new();
        let mut methods = Vec::new();
        for decl in self.hierarchy(type_name) {
            for method in decl.methods.iter().filter(|m| m.public) {
                // An override hides the inherited declaration
                if seen.insert((method.name.clone(), method.parameter_types.clone())) {
                    methods.push(ResolvedMethod {
                        owner: decl.name.clone(),
                        decl: method.clone(),
                    });
                }
            }
        }
        methods.sort_by(|a, b| {
            a.decl
                .name
                .cmp(&b.decl.name)
                .then_with(|| a.decl.parameter_types.cmp(&b.decl.parameter_types))
        });
        methods
    }

    /// Public fields of `type_name`, inherited ones included, sorted by name
    fn public_fields(&self, type_name: &str) -> Vec<ResolvedField> {
        let mut seen = HashSet::new();
        let mut fields = Vec::new();
        for decl in self.hierarchy(type_name) {
            for field in decl.fields.iter().filter(|f| f.public) {
                if seen.insert(field.name.clone()) {
                    fields.push(ResolvedField {
                        owner: decl.name.clone(),
                        decl: field.clone(),
                    });
                }
            }
        }
        fields.sort_by(|a, b| a.decl.name.cmp(&b.decl.name));
        fields
    }

    /// `type_name` followed by its resolvable supertypes, breadth first
    fn hierarchy(&self, type_name: &str) -> Vec<&TypeDecl> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut queue = vec![type_name.to_string()];
        let mut result = Vec::new();
        let mut index = 0;
        while index < queue.len() {
            let name = queue[index].clone();
            index += 1;
            let Some(decl) = self.resolve(&name) else {
                if index == 1 {
                    tracing::debug!("type {} is not in the universe", name);
                }
                continue;
            };
            if !visited.insert(decl.name.as_str()) {
                continue;
            }
            queue.extend(decl.supertypes.iter().cloned());
            result.push(decl);
        }
        result
    }
}

/// All types known to the translator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeUniverse {
    types: IndexMap<String, TypeDecl>,
}

impl TypeUniverse {
    pub fn new() -> Self {
        TypeUniverse::default()
    }

    /// Add (or replace) a type declaration
    pub fn insert(&mut self, decl: TypeDecl) {
        self.types.insert(decl.name.clone(), decl);
    }

    pub fn with(mut self, decl: TypeDecl) -> Self {
        self.insert(decl);
        self
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Load a universe from a JSON array of type declarations
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
        let decls: Vec<TypeDecl> =
            serde_json::from_str(&content).map_err(|e| LoadError::json(path, e))?;
        Ok(decls.into_iter().fold(TypeUniverse::new(), TypeUniverse::with))
    }
}

impl TypeResolver for TypeUniverse {
    fn resolve(&self, name: &str) -> Option<&TypeDecl> {
        self.types.get(name)
    }
}

pub fn is_array(type_name: &str) -> bool {
    type_name.ends_with("[]")
}

/// Component type of an array type
pub fn element_type(type_name: &str) -> Option<&str> {
    type_name.strip_suffix("[]")
}

pub fn is_primitive(type_name: &str) -> bool {
    PRIMITIVES.contains(&type_name)
}

pub fn is_boolean(type_name: &str) -> bool {
    type_name == "boolean" || type_name == "java.lang.Boolean"
}

pub fn is_numeric(type_name: &str) -> bool {
    NUMERIC.contains(&type_name)
}

/// Values of this type may be `null`
pub fn is_reference(type_name: &str) -> bool {
    !is_primitive(type_name) && type_name != "void"
}

/// Unqualified name: `java.lang.String[]` -> `String[]`
pub fn simple_name(type_name: &str) -> &str {
    match type_name.rfind('.') {
        Some(dot) => &type_name[dot + 1..],
        None => type_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn universe() -> TypeUniverse {
        TypeUniverse::new()
            .with(
                TypeDecl::new("java.lang.Object")
                    .with_method("equals", &["java.lang.Object"], "boolean")
                    .with_method("hashCode", &[], "int"),
            )
            .with(
                TypeDecl::new("java.util.Collection")
                    .with_supertype("java.lang.Object")
                    .as_collection()
                    .with_method("isEmpty", &[], "boolean"),
            )
            .with(
                TypeDecl::new("java.util.List")
                    .with_supertype("java.util.Collection")
                    .as_collection()
                    .with_method("size", &[], "int")
                    .with_method("equals", &["java.lang.Object"], "boolean"),
            )
    }

    #[test]
    fn test_inherited_methods_sorted() {
        let universe = universe();
        let methods = universe.public_methods("java.util.List");
        let names: Vec<_> = methods.iter().map(|m| m.decl.name.as_str()).collect();
        assert_eq!(names, vec!["equals", "hashCode", "isEmpty", "size"]);
        // The override declared by List hides Object.equals
        assert_eq!(methods[0].owner, "java.util.List");
    }

    #[test]
    fn test_unknown_type_has_no_members() {
        let universe = universe();
        assert!(universe.public_methods("com.example.Missing").is_empty());
        assert!(universe.public_fields("com.example.Missing").is_empty());
    }

    #[test]
    fn test_containers() {
        let universe = universe();
        assert!(universe.is_container("int[]"));
        assert!(universe.is_container("java.util.List"));
        assert!(!universe.is_container("java.lang.Object"));
    }

    #[test]
    fn test_type_helpers() {
        assert_eq!(element_type("java.lang.String[]"), Some("java.lang.String"));
        assert_eq!(simple_name("java.lang.String[]"), "String[]");
        assert!(is_boolean("java.lang.Boolean"));
        assert!(is_numeric("int"));
        assert!(!is_numeric("java.lang.String"));
        assert!(is_numeric("char"));
        assert!(is_numeric("java.lang.Character"));
        assert!(is_reference("java.lang.Integer"));
        assert!(!is_reference("long"));
    }

    #[test]
    fn test_signature() {
        let universe = universe();
        let equals = &universe.public_methods("java.lang.Object")[0];
        assert_eq!(equals.signature(), "java.lang.Object.equals(java.lang.Object)");
    }
}
