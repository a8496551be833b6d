use std::fmt;

/// Qualified name for type identity during a generation pass.
///
/// Used as the primary key for name resolution. Segments are joined with
/// `.`, matching the display form of fully-qualified type names.
///
/// # Examples
///
/// ```
/// use derived_props_core::QualifiedName;
///
/// // Global namespace
/// let person = QualifiedName::global("Person");
/// assert_eq!(person.to_string(), "Person");
///
/// // With namespace
/// let attr = QualifiedName::new("HasDerivedPropertyAttribute", vec!["Definitions".into()]);
/// assert_eq!(attr.to_string(), "Definitions.HasDerivedPropertyAttribute");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName {
    /// Simple name (e.g., "Person")
    pub name: String,
    /// Enclosing path (namespaces, then containing types)
    /// Empty for the global namespace
    pub namespace: Vec<String>,
}

impl QualifiedName {
    /// Create a new qualified name with namespace.
    pub fn new(name: impl Into<String>, namespace: Vec<String>) -> Self {
        Self {
            name: name.into(),
            namespace,
        }
    }

    /// Create a qualified name in the global namespace.
    pub fn global(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
        }
    }

    /// Create from a qualified string (e.g., "Definitions.DerivedProperties").
    ///
    /// Splits on `.` and `+` (nested-type metadata separator). A leading
    /// `global::` alias qualifier is stripped.
    pub fn from_qualified_string(s: &str) -> Self {
        let s = s.strip_prefix("global::").unwrap_or(s);
        let mut parts: Vec<String> = s
            .split(['.', '+'])
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        match parts.pop() {
            Some(name) => Self {
                name,
                namespace: parts,
            },
            None => Self::global(""),
        }
    }

    /// Check if this is in the global namespace.
    pub fn is_global(&self) -> bool {
        self.namespace.is_empty()
    }

    /// Get the simple (unqualified) name.
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Get the namespace path.
    pub fn namespace_path(&self) -> &[String] {
        &self.namespace
    }

    /// Get the namespace as a joined string.
    pub fn namespace_string(&self) -> String {
        self.namespace.join(".")
    }

    /// All segments, namespace first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.namespace
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.name.as_str()))
    }

    /// Compute TypeHash from this qualified name.
    pub fn to_type_hash(&self) -> crate::TypeHash {
        crate::TypeHash::from_name(&self.to_string())
    }

    /// Create a child name within this name.
    ///
    /// Example: `Models.Person` + `Address` = `Models.Person.Address`
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut child_ns = self.namespace.clone();
        child_ns.push(self.name.clone());
        Self {
            name: name.into(),
            namespace: child_ns,
        }
    }

    /// Get the parent as a QualifiedName (if any).
    ///
    /// Example: `Models.People.Person` -> Some(`Models.People`)
    pub fn parent(&self) -> Option<Self> {
        let (name, namespace) = self.namespace.split_last()?;
        Some(Self {
            name: name.clone(),
            namespace: namespace.to_vec(),
        })
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.namespace.join("."), self.name)
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(s: &str) -> Self {
        Self::from_qualified_string(s)
    }
}

impl From<String> for QualifiedName {
    fn from(s: String) -> Self {
        Self::from_qualified_string(&s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_name() {
        let name = QualifiedName::global("Person");
        assert_eq!(name.name, "Person");
        assert!(name.is_global());
        assert_eq!(name.to_string(), "Person");
    }

    #[test]
    fn namespaced_name() {
        let name = QualifiedName::new("Person", vec!["App".into(), "Models".into()]);
        assert!(!name.is_global());
        assert_eq!(name.namespace_string(), "App.Models");
        assert_eq!(name.to_string(), "App.Models.Person");
    }

    #[test]
    fn from_qualified_string() {
        let name = QualifiedName::from_qualified_string("Definitions.DerivedProperties");
        assert_eq!(name.name, "DerivedProperties");
        assert_eq!(name.namespace, vec!["Definitions"]);

        let global = QualifiedName::from_qualified_string("Person");
        assert!(global.is_global());
    }

    #[test]
    fn from_qualified_string_nested_and_global_alias() {
        let nested = QualifiedName::from_qualified_string("App.Outer+Inner");
        assert_eq!(nested.to_string(), "App.Outer.Inner");

        let aliased = QualifiedName::from_qualified_string("global::App.Person");
        assert_eq!(aliased, QualifiedName::from_qualified_string("App.Person"));

        let empty = QualifiedName::from_qualified_string("");
        assert_eq!(empty.name, "");
        assert!(empty.is_global());
    }

    #[test]
    fn child_and_parent() {
        let parent = QualifiedName::new("Models", vec!["App".into()]);
        let child = parent.child("Person");
        assert_eq!(child.to_string(), "App.Models.Person");
        assert_eq!(child.parent(), Some(parent));
        assert_eq!(QualifiedName::global("Person").parent(), None);
    }

    #[test]
    fn segments_in_order() {
        let name = QualifiedName::from("App.Models.Person");
        let segments: Vec<&str> = name.segments().collect();
        assert_eq!(segments, vec!["App", "Models", "Person"]);
    }

    #[test]
    fn type_hash_matches_display() {
        let name = QualifiedName::from("App.Person");
        assert_eq!(name.to_type_hash(), crate::TypeHash::from_name("App.Person"));
    }
}
