//! Semantic attribute data.

use crate::{ConstantError, ConstantValue, DeclId, Span, TypeHash};

/// A single evaluated attribute argument.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeArgument {
    /// The constant value, or why the argument is not a constant.
    pub value: Result<ConstantValue, ConstantError>,
    /// Source text of the argument expression.
    pub text: String,
    pub span: Span,
}

/// An attribute applied to a type declaration, after resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeData {
    /// Attribute class the usage resolved to, if it resolved.
    pub attribute_class: Option<TypeHash>,
    /// Name as written at the use site (`HasDerivedProperty`).
    pub written_name: String,
    /// Constructor arguments in order, including `name: value` ones.
    pub arguments: Vec<AttributeArgument>,
    /// Named arguments (`Name = value`) in order.
    pub named_arguments: Vec<(String, AttributeArgument)>,
    /// Declaration the attribute was written on.
    pub declaration: DeclId,
    pub span: Span,
}

impl AttributeData {
    /// Whether this usage resolved to the given attribute class.
    #[inline]
    pub fn is_class(&self, class: TypeHash) -> bool {
        self.attribute_class == Some(class)
    }
}
