//! Core types shared across the derived-props workspace.
//!
//! - [`Span`], [`SourceId`], [`DeclId`]: locations and declaration identity
//! - [`QualifiedName`], [`TypeHash`]: type identity
//! - [`Modifiers`], [`ConstantValue`], [`TypeRef`]: declaration semantics
//! - [`entries`]: symbol entries stored in the registry
//! - [`error`]: lexer, parser, registration and constant errors

pub mod constant;
pub mod entries;
pub mod error;
pub mod ids;
pub mod modifiers;
pub mod qualified_name;
pub mod span;
pub mod type_hash;
pub mod type_ref;

pub use constant::ConstantValue;
pub use entries::{
    AttributeArgument, AttributeData, EventEntry, FieldEntry, GetterForm, GetterSyntax,
    MemberEntry, MethodEntry, PropertyDeclaration, PropertyEntry, TypeEntry, TypeKind, TypeSource,
};
pub use error::{ConstantError, LexError, ParseError, ParseErrorKind, ParseErrors, RegistrationError};
pub use ids::{DeclId, SourceId};
pub use modifiers::Modifiers;
pub use qualified_name::QualifiedName;
pub use span::Span;
pub use type_hash::TypeHash;
pub use type_ref::{TupleElement, TypeRef};
