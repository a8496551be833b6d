//! Symbol entries stored in the type registry.
//!
//! - [`TypeEntry`]: a named type with its declarations, attributes and members
//! - [`MemberEntry`]: properties, fields, methods, events and nested types
//! - [`AttributeData`]: a resolved attribute usage with evaluated arguments

mod attribute;
mod member;
mod type_entry;

pub use attribute::{AttributeArgument, AttributeData};
pub use member::{
    EventEntry, FieldEntry, GetterForm, GetterSyntax, MemberEntry, MethodEntry,
    PropertyDeclaration, PropertyEntry,
};
pub use type_entry::{TypeEntry, TypeKind, TypeSource};
