//! Declaration AST nodes.
//!
//! Provides nodes for:
//! - Namespaces and `using` directives
//! - Attribute lists
//! - Type declarations (classes, structs, interfaces, records, enums)
//! - Members (fields, properties, methods, events, nested types)

use derived_props_core::{DeclId, GetterForm, Modifiers, Span, TypeKind};

use crate::ast::expr::Expr;
use crate::ast::types::TypeSyntax;
use crate::ast::Ident;

/// A member of a namespace or compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub enum NamespaceMember {
    Namespace(NamespaceDecl),
    Type(TypeDecl),
}

impl NamespaceMember {
    /// Get the span of this member.
    pub fn span(&self) -> Span {
        match self {
            NamespaceMember::Namespace(ns) => ns.span,
            NamespaceMember::Type(ty) => ty.span,
        }
    }
}

/// A namespace declaration.
///
/// Examples:
/// - `namespace App.Models;` (file-scoped)
/// - `namespace App { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    /// Dotted name segments.
    pub name: Vec<Ident>,
    pub file_scoped: bool,
    pub usings: Vec<UsingDirective>,
    pub members: Vec<NamespaceMember>,
    pub span: Span,
}

impl NamespaceDecl {
    /// The name segments as strings.
    pub fn path(&self) -> Vec<String> {
        self.name.iter().map(|i| i.name.clone()).collect()
    }

    /// The dotted namespace name.
    pub fn qualified_name(&self) -> String {
        self.path().join(".")
    }
}

/// The form of a `using` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsingKind {
    /// `using System.Text;`
    Namespace,
    /// `using static System.Math;`
    Static,
    /// `using Json = System.Text.Json;`
    Alias(Ident),
}

/// A `using` directive.
#[derive(Debug, Clone, PartialEq)]
pub struct UsingDirective {
    pub kind: UsingKind,
    pub target: TypeSyntax,
    /// `global using ...;`
    pub is_global: bool,
    pub span: Span,
}

/// An attribute list: `[A, B(1)]` or `[assembly: A]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeList {
    /// Target specifier before `:`.
    pub target: Option<Ident>,
    pub attributes: Vec<Attribute>,
    pub span: Span,
}

/// One attribute usage.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    /// The attribute name as written (`Marker`, `Ns.MarkerAttribute`).
    pub name: TypeSyntax,
    pub arguments: Vec<AttributeArg>,
    pub span: Span,
}

impl Attribute {
    /// Constructor arguments in order, including those passed by
    /// parameter name.
    pub fn constructor_arguments(&self) -> impl Iterator<Item = &AttributeArg> {
        self.arguments
            .iter()
            .filter(|a| !matches!(a.kind, AttributeArgKind::Property(_)))
    }

    /// Property and field assignments (`Name = value`) in order.
    pub fn named(&self) -> impl Iterator<Item = (&Ident, &AttributeArg)> {
        self.arguments.iter().filter_map(|a| match &a.kind {
            AttributeArgKind::Property(name) => Some((name, a)),
            _ => None,
        })
    }
}

/// How an attribute argument is passed.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeArgKind {
    /// `value`
    Positional,
    /// `name: value`, a constructor argument named by its parameter.
    Parameter(Ident),
    /// `Name = value`
    Property(Ident),
}

/// An attribute argument.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeArg {
    pub kind: AttributeArgKind,
    pub value: Expr,
    pub span: Span,
}

/// A type declaration.
///
/// Examples:
/// - `public partial class Person<T> : Base where T : new() { ... }`
/// - `record struct Point(int X, int Y);`
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    /// Identity of this declaration within the compilation.
    pub id: DeclId,
    pub attributes: Vec<AttributeList>,
    pub modifiers: Modifiers,
    pub kind: TypeKind,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub members: Vec<MemberDecl>,
    pub span: Span,
}

impl TypeDecl {
    /// Whether at least one attribute list is attached.
    #[inline]
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }

    /// Attributes from all lists, in declaration order.
    pub fn all_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().flat_map(|list| list.attributes.iter())
    }

    /// Nested type declarations, in order.
    pub fn nested_types(&self) -> impl Iterator<Item = &TypeDecl> {
        self.members.iter().filter_map(|m| match m {
            MemberDecl::Type(ty) => Some(ty),
            _ => None,
        })
    }
}

/// A member of a type declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum MemberDecl {
    Field(FieldDecl),
    Property(PropertyDecl),
    Method(MethodDecl),
    Event(EventDecl),
    Type(TypeDecl),
    /// Constructors, destructors, indexers, operators and delegates.
    Other { span: Span },
}

impl MemberDecl {
    /// Get the span of this member.
    pub fn span(&self) -> Span {
        match self {
            MemberDecl::Field(d) => d.span,
            MemberDecl::Property(d) => d.span,
            MemberDecl::Method(d) => d.span,
            MemberDecl::Event(d) => d.span,
            MemberDecl::Type(d) => d.span,
            MemberDecl::Other { span } => *span,
        }
    }
}

/// A field declaration, possibly declaring several variables.
///
/// Examples:
/// - `private int count;`
/// - `public const string A = "a", B = A + "b";`
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Modifiers,
    pub ty: TypeSyntax,
    pub declarators: Vec<VariableDeclarator>,
    pub span: Span,
}

/// One variable in a field declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDeclarator {
    pub name: Ident,
    pub initializer: Option<Expr>,
    pub span: Span,
}

/// A property declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Modifiers,
    pub ty: TypeSyntax,
    /// Property name; explicit interface implementations keep the
    /// interface prefix (`IShape.Area`).
    pub name: Ident,
    pub body: PropertyBody,
    pub initializer: Option<Expr>,
    pub span: Span,
}

impl PropertyDecl {
    /// The getter implementation, if any: its form and the span of its
    /// source text.
    ///
    /// For an expression-bodied property the span covers `=> expr`
    /// (without the semicolon). For an accessor list it covers the whole
    /// `get` accessor, including its attributes and modifiers. An
    /// auto-implemented `get;` has no implementation.
    pub fn getter(&self) -> Option<(GetterForm, Span)> {
        match &self.body {
            PropertyBody::Arrow { span } => Some((GetterForm::Arrow, *span)),
            PropertyBody::Accessors(accessors) => accessors
                .iter()
                .find(|a| a.kind == AccessorKind::Get && a.body != AccessorBody::None)
                .map(|a| (GetterForm::Accessor, a.span)),
        }
    }

    /// Whether a `set` or `init` accessor is declared.
    pub fn has_setter(&self) -> bool {
        match &self.body {
            PropertyBody::Arrow { .. } => false,
            PropertyBody::Accessors(accessors) => accessors
                .iter()
                .any(|a| matches!(a.kind, AccessorKind::Set | AccessorKind::Init)),
        }
    }
}

/// How a property is implemented.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyBody {
    /// `=> expr;`
    Arrow { span: Span },
    /// `{ get; set; }`
    Accessors(Vec<AccessorDecl>),
}

/// One accessor in an accessor list.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessorDecl {
    pub kind: AccessorKind,
    pub modifiers: Modifiers,
    pub body: AccessorBody,
    pub span: Span,
}

/// Accessor keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
    Init,
    Add,
    Remove,
}

impl AccessorKind {
    /// Map a contextual keyword to an accessor kind.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "get" => AccessorKind::Get,
            "set" => AccessorKind::Set,
            "init" => AccessorKind::Init,
            "add" => AccessorKind::Add,
            "remove" => AccessorKind::Remove,
            _ => return None,
        })
    }
}

/// Accessor implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessorBody {
    /// `get;`
    None,
    /// `get { ... }`
    Block(Span),
    /// `get => expr;`
    Arrow(Span),
}

/// A method declaration. Parameters and body are not modelled.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Modifiers,
    pub return_type: TypeSyntax,
    pub name: Ident,
    pub type_params: Vec<Ident>,
    pub span: Span,
}

/// An event declaration (field-like or with accessors).
#[derive(Debug, Clone, PartialEq)]
pub struct EventDecl {
    pub attributes: Vec<AttributeList>,
    pub modifiers: Modifiers,
    pub ty: TypeSyntax,
    pub names: Vec<Ident>,
    pub span: Span,
}
