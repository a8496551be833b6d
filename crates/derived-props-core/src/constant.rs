//! Compile-time constant values.

use std::fmt;

/// The value of a constant expression.
///
/// Attribute arguments and `const` field initializers evaluate to one of
/// these. Only [`ConstantValue::String`] is a valid derived-property name.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    String(String),
    Char(char),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl ConstantValue {
    /// Borrow the string payload, if this is a string constant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstantValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Short description of the constant's kind, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConstantValue::String(_) => "string",
            ConstantValue::Char(_) => "char",
            ConstantValue::Int(_) => "integer",
            ConstantValue::Float(_) => "floating-point",
            ConstantValue::Bool(_) => "bool",
            ConstantValue::Null => "null",
        }
    }

    /// Text this constant contributes when concatenated onto a string.
    ///
    /// `null` contributes nothing and booleans use their capitalized
    /// spelling, as string concatenation does in the source language.
    pub fn concat_text(&self) -> String {
        match self {
            ConstantValue::String(s) => s.clone(),
            ConstantValue::Char(c) => c.to_string(),
            ConstantValue::Int(i) => i.to_string(),
            ConstantValue::Float(f) => f.to_string(),
            ConstantValue::Bool(true) => "True".to_string(),
            ConstantValue::Bool(false) => "False".to_string(),
            ConstantValue::Null => String::new(),
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::String(s) => write!(f, "{s:?}"),
            ConstantValue::Char(c) => write!(f, "{c:?}"),
            ConstantValue::Int(i) => write!(f, "{i}"),
            ConstantValue::Float(v) => write!(f, "{v}"),
            ConstantValue::Bool(b) => write!(f, "{b}"),
            ConstantValue::Null => write!(f, "null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_payload() {
        let value = ConstantValue::String("FullName".into());
        assert_eq!(value.as_str(), Some("FullName"));
        assert_eq!(ConstantValue::Int(3).as_str(), None);
    }

    #[test]
    fn concat_text() {
        assert_eq!(ConstantValue::Bool(true).concat_text(), "True");
        assert_eq!(ConstantValue::Null.concat_text(), "");
        assert_eq!(ConstantValue::Int(-2).concat_text(), "-2");
    }

    #[test]
    fn display() {
        assert_eq!(ConstantValue::String("a".into()).to_string(), "\"a\"");
        assert_eq!(ConstantValue::Null.to_string(), "null");
    }
}
