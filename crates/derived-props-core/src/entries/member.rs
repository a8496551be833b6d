//! Member entries: properties, fields, methods, events, nested types.

use crate::{ConstantValue, Modifiers, SourceId, Span, TypeHash, TypeRef};

/// A member of a type, as returned by a by-name lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberEntry {
    Property(PropertyEntry),
    Field(FieldEntry),
    Method(MethodEntry),
    Event(EventEntry),
    /// A nested type, visible as a member of its container.
    NestedType { name: String, type_hash: TypeHash },
}

impl MemberEntry {
    /// The member's simple name.
    pub fn name(&self) -> &str {
        match self {
            MemberEntry::Property(p) => &p.name,
            MemberEntry::Field(f) => &f.name,
            MemberEntry::Method(m) => &m.name,
            MemberEntry::Event(e) => &e.name,
            MemberEntry::NestedType { name, .. } => name,
        }
    }

    /// Short description of the member kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            MemberEntry::Property(_) => "property",
            MemberEntry::Field(_) => "field",
            MemberEntry::Method(_) => "method",
            MemberEntry::Event(_) => "event",
            MemberEntry::NestedType { .. } => "nested type",
        }
    }

    /// Borrow the property entry, if this member is a property.
    pub fn as_property(&self) -> Option<&PropertyEntry> {
        match self {
            MemberEntry::Property(p) => Some(p),
            _ => None,
        }
    }

    /// Borrow the field entry, if this member is a field.
    pub fn as_field(&self) -> Option<&FieldEntry> {
        match self {
            MemberEntry::Field(f) => Some(f),
            _ => None,
        }
    }
}

/// How a getter is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GetterForm {
    /// Expression-bodied property: `Name => expr;`. Text is `=> expr`.
    Arrow,
    /// Accessor in an accessor list: `get { ... }` or `get => expr;`.
    Accessor,
}

/// The source text implementing a property getter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetterSyntax {
    pub form: GetterForm,
    /// Exact source text of the getter.
    pub text: String,
    pub span: Span,
}

/// One declaration of a property.
///
/// Partial properties have several; everything else has exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDeclaration {
    pub source: SourceId,
    pub span: Span,
    /// Getter syntax, if this declaration implements one and syntax is
    /// available.
    pub getter: Option<GetterSyntax>,
    pub has_setter: bool,
}

/// A property member.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyEntry {
    pub name: String,
    /// Declared type.
    pub ty: TypeRef,
    pub modifiers: Modifiers,
    /// Declarations in discovery order.
    pub declarations: Vec<PropertyDeclaration>,
}

impl PropertyEntry {
    /// Create a property entry with no declarations.
    pub fn new(name: impl Into<String>, ty: TypeRef, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers,
            declarations: Vec::new(),
        }
    }

    /// The first declaration that implements a getter.
    ///
    /// Later declarations are not consulted once one is found.
    pub fn first_getter(&self) -> Option<&GetterSyntax> {
        self.declarations.iter().find_map(|d| d.getter.as_ref())
    }
}

/// A field member.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub name: String,
    pub ty: TypeRef,
    pub modifiers: Modifiers,
    /// Value of a `const` field, once evaluated.
    pub constant_value: Option<ConstantValue>,
}

impl FieldEntry {
    /// Create a field entry without a constant value.
    pub fn new(name: impl Into<String>, ty: TypeRef, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            ty,
            modifiers,
            constant_value: None,
        }
    }
}

/// A method member. Only the name and location matter for lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntry {
    pub name: String,
    pub modifiers: Modifiers,
    pub span: Span,
}

/// An event member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventEntry {
    pub name: String,
    pub modifiers: Modifiers,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration(getter: Option<&str>) -> PropertyDeclaration {
        PropertyDeclaration {
            source: SourceId::new(0),
            span: Span::default(),
            getter: getter.map(|text| GetterSyntax {
                form: GetterForm::Arrow,
                text: text.to_string(),
                span: Span::default(),
            }),
            has_setter: false,
        }
    }

    #[test]
    fn first_getter_wins() {
        let mut property =
            PropertyEntry::new("FullName", TypeRef::Keyword("string".into()), Modifiers::PUBLIC);
        property.declarations.push(declaration(None));
        property.declarations.push(declaration(Some("=> first")));
        property.declarations.push(declaration(Some("=> second")));

        assert_eq!(property.first_getter().map(|g| g.text.as_str()), Some("=> first"));
    }

    #[test]
    fn no_getter() {
        let mut property =
            PropertyEntry::new("Age", TypeRef::Keyword("int".into()), Modifiers::PUBLIC);
        property.declarations.push(declaration(None));
        assert!(property.first_getter().is_none());
    }

    #[test]
    fn member_kind_and_name() {
        let member = MemberEntry::Method(MethodEntry {
            name: "Describe".into(),
            modifiers: Modifiers::PUBLIC,
            span: Span::default(),
        });
        assert_eq!(member.name(), "Describe");
        assert_eq!(member.kind_name(), "method");
        assert!(member.as_property().is_none());
    }
}
