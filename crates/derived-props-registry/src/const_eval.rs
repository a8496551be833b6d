//! Compile-time constant evaluation.
//!
//! Evaluates attribute arguments and `const` field initializers:
//!
//! - string, char, numeric, `true`/`false` and `null` literals
//! - interpolated strings without holes
//! - `nameof(A.B.C)`, which yields the last identifier
//! - parentheses, unary `-` and `+` (string concatenation when either
//!   side is a string, numeric addition otherwise)
//! - references to `const` fields, resolved in the scope of the
//!   expression; each field is evaluated once, in its own declaring scope
//!
//! A field whose initializer refers back to itself is reported as
//! [`ConstantError::Cyclic`].

use derived_props_core::{ConstantError, ConstantValue, MemberEntry, TypeHash};
use derived_props_parser::{BinaryOp, Expr, LiteralKind, NamedType};
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::namespace_tree::ResolutionResult;
use crate::registry::TypeRegistry;
use crate::resolver::TypeResolver;
use crate::scope::Scope;

/// Key of a constant field: declaring type and field name.
pub type FieldKey = (TypeHash, String);

/// A `const` field initializer waiting to be evaluated.
#[derive(Debug, Clone, Copy)]
pub struct PendingConst<'t> {
    pub expr: &'t Expr,
    /// Index into the evaluator's scope table.
    pub scope: usize,
    /// Text of the source tree holding the initializer.
    pub source: &'t str,
}

/// Evaluates constant expressions against a registry.
pub struct ConstEvaluator<'a> {
    registry: &'a TypeRegistry,
    scopes: &'a [Scope],
    pending: &'a FxHashMap<FieldKey, PendingConst<'a>>,
    values: FxHashMap<FieldKey, Result<ConstantValue, ConstantError>>,
    in_progress: Vec<FieldKey>,
}

impl<'a> ConstEvaluator<'a> {
    /// Create an evaluator over the pending field initializers.
    pub fn new(
        registry: &'a TypeRegistry,
        scopes: &'a [Scope],
        pending: &'a FxHashMap<FieldKey, PendingConst<'a>>,
    ) -> Self {
        Self {
            registry,
            scopes,
            pending,
            values: FxHashMap::default(),
            in_progress: Vec::new(),
        }
    }

    /// Evaluated field values, including failures.
    pub fn into_values(self) -> FxHashMap<FieldKey, Result<ConstantValue, ConstantError>> {
        self.values
    }

    /// Evaluate an expression written in `scope`.
    ///
    /// `source` is the text of the tree the expression was parsed from.
    pub fn evaluate(
        &mut self,
        expr: &Expr,
        scope: &Scope,
        source: &str,
    ) -> Result<ConstantValue, ConstantError> {
        match expr {
            Expr::Literal(literal) => match &literal.kind {
                LiteralKind::String(s) => Ok(ConstantValue::String(s.clone())),
                LiteralKind::Interpolated(Some(s)) => Ok(ConstantValue::String(s.clone())),
                LiteralKind::Interpolated(None) => Err(not_constant(expr, source)),
                LiteralKind::Char(c) => Ok(ConstantValue::Char(*c)),
                LiteralKind::Int(i) => Ok(ConstantValue::Int(*i)),
                LiteralKind::Float(f) => Ok(ConstantValue::Float(*f)),
                LiteralKind::Bool(b) => Ok(ConstantValue::Bool(*b)),
                LiteralKind::Null => Ok(ConstantValue::Null),
            },
            Expr::NameOf { target, .. } => target
                .last()
                .map(|segment| ConstantValue::String(segment.name.name.clone()))
                .ok_or_else(|| not_constant(expr, source)),
            Expr::Name(name) => self.evaluate_name(name, scope, source),
            Expr::Paren { inner, .. } => self.evaluate(inner, scope, source),
            Expr::Negate { operand, .. } => {
                let value = self.evaluate(operand, scope, source)?;
                negate(value)
            }
            Expr::Binary { op, lhs, rhs, .. } => {
                let lhs = self.evaluate(lhs, scope, source)?;
                let rhs = self.evaluate(rhs, scope, source)?;
                match op {
                    BinaryOp::Add => add(lhs, rhs),
                }
            }
            Expr::Unsupported { .. } => Err(not_constant(expr, source)),
        }
    }

    /// Evaluate every pending field initializer, in key order.
    ///
    /// Results, failures included, are kept for [`into_values`](Self::into_values).
    pub fn evaluate_all(&mut self) {
        let pending = self.pending;
        let mut keys: Vec<&FieldKey> = pending.keys().collect();
        keys.sort();
        for (ty, name) in keys {
            if let Err(error) = self.field_value(*ty, name) {
                trace!(field = %self.field_display(*ty, name), %error, "constant not evaluated");
            }
        }
    }

    /// The value of a `const` field. Evaluated on first use.
    pub fn field_value(&mut self, ty: TypeHash, name: &str) -> Result<ConstantValue, ConstantError> {
        let key = (ty, name.to_string());
        if let Some(value) = self.values.get(&key) {
            return value.clone();
        }
        if self.in_progress.contains(&key) {
            return Err(ConstantError::Cyclic {
                name: self.field_display(ty, name),
            });
        }

        let Some(pending) = self.pending.get(&key).copied() else {
            return self
                .registry
                .get(ty)
                .and_then(|entry| {
                    entry
                        .members_named(name)
                        .find_map(MemberEntry::as_field)
                        .and_then(|field| field.constant_value.clone())
                })
                .ok_or_else(|| ConstantError::UnresolvedName {
                    name: self.field_display(ty, name),
                });
        };

        let scopes = self.scopes;
        let Some(scope) = scopes.get(pending.scope) else {
            return Err(ConstantError::UnresolvedName {
                name: self.field_display(ty, name),
            });
        };

        self.in_progress.push(key.clone());
        let value = self.evaluate(pending.expr, scope, pending.source);
        self.in_progress.pop();

        // A cycle member records the error it saw, so every field on the
        // cycle reports it.
        self.values.insert(key, value.clone());
        value
    }

    fn evaluate_name(
        &mut self,
        name: &NamedType,
        scope: &Scope,
        source: &str,
    ) -> Result<ConstantValue, ConstantError> {
        let text = name.to_string();
        let unresolved = || ConstantError::UnresolvedName { name: text.clone() };

        let (field, type_path) = match name.segments.split_last() {
            Some((last, rest)) if last.type_args.is_empty() => (&last.name.name, rest),
            _ => return Err(unresolved()),
        };

        let owner = if type_path.is_empty() && name.alias.is_none() {
            self.find_field_in_scope(field, scope)
        } else {
            let type_name = NamedType {
                alias: name.alias.clone(),
                segments: type_path.to_vec(),
                span: name.span,
            };
            match TypeResolver::new(self.registry, scope).lookup_type(&type_name) {
                ResolutionResult::Found(ty) => Some(ty),
                _ => None,
            }
        };

        let registry = self.registry;
        let Some(owner) = owner else {
            return Err(unresolved());
        };
        let Some(entry) = registry.get(owner) else {
            return Err(unresolved());
        };
        match entry.members_named(field).find_map(MemberEntry::as_field) {
            Some(f) if f.modifiers.is_const() => self.field_value(owner, field),
            Some(_) => Err(ConstantError::NotConstant {
                text: span_text(name.span, source, &text),
            }),
            None => Err(unresolved()),
        }
    }

    /// The type declaring a field visible by simple name: the enclosing
    /// types innermost first, then `using static` imports.
    fn find_field_in_scope(&self, field: &str, scope: &Scope) -> Option<TypeHash> {
        let declares = |ty: &TypeHash| {
            self.registry
                .get(*ty)
                .is_some_and(|entry| entry.members_named(field).any(|m| m.as_field().is_some()))
        };
        scope.types.iter().find(|ty| declares(ty)).copied().or_else(|| {
            scope
                .levels
                .iter()
                .flat_map(|level| level.static_usings.iter())
                .find(|ty| declares(ty))
                .copied()
        })
    }

    fn field_display(&self, ty: TypeHash, name: &str) -> String {
        match self.registry.qualified_name(ty) {
            Some(owner) => format!("{owner}.{name}"),
            None => name.to_string(),
        }
    }
}

fn span_text(span: derived_props_core::Span, source: &str, fallback: &str) -> String {
    span.slice(source).unwrap_or(fallback).to_string()
}

fn not_constant(expr: &Expr, source: &str) -> ConstantError {
    let span = expr.span();
    ConstantError::NotConstant {
        text: span_text(span, source, "<expression>"),
    }
}

fn negate(value: ConstantValue) -> Result<ConstantValue, ConstantError> {
    let invalid = || ConstantError::InvalidOperands {
        op: "-",
        lhs: value.kind_name(),
        rhs: value.kind_name(),
    };
    match &value {
        ConstantValue::Int(i) => i.checked_neg().map(ConstantValue::Int).ok_or_else(invalid),
        ConstantValue::Float(f) => Ok(ConstantValue::Float(-f)),
        ConstantValue::Char(c) => Ok(ConstantValue::Int(-(*c as i64))),
        _ => Err(invalid()),
    }
}

fn add(lhs: ConstantValue, rhs: ConstantValue) -> Result<ConstantValue, ConstantError> {
    use ConstantValue::{Char, Float, Int};

    let invalid = || ConstantError::InvalidOperands {
        op: "+",
        lhs: lhs.kind_name(),
        rhs: rhs.kind_name(),
    };
    match (&lhs, &rhs) {
        (ConstantValue::String(_), _) | (_, ConstantValue::String(_)) => {
            let mut text = lhs.concat_text();
            text.push_str(&rhs.concat_text());
            Ok(ConstantValue::String(text))
        }
        (Int(a), Int(b)) => a.checked_add(*b).map(Int).ok_or_else(invalid),
        (Char(a), Char(b)) => Ok(Int(*a as i64 + *b as i64)),
        (Char(c), Int(i)) | (Int(i), Char(c)) => i.checked_add(*c as i64).map(Int).ok_or_else(invalid),
        (Float(a), Float(b)) => Ok(Float(a + b)),
        (Float(f), Int(i)) | (Int(i), Float(f)) => Ok(Float(f + *i as f64)),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeLevel;
    use derived_props_core::SourceId;
    use derived_props_parser::{Parser, TokenKind};

    fn expr(source: &str) -> Expr {
        let mut parser = Parser::new(source, SourceId::new(0));
        parser.parse_expression(&[TokenKind::Semicolon])
    }

    fn eval(source: &str) -> Result<ConstantValue, ConstantError> {
        let registry = TypeRegistry::new();
        let scope = Scope::compilation_unit(ScopeLevel::new(registry.namespaces().root()));
        let pending = FxHashMap::default();
        let mut evaluator = ConstEvaluator::new(&registry, &[], &pending);
        evaluator.evaluate(&expr(source), &scope, source)
    }

    #[test]
    fn literals() {
        assert_eq!(eval(r#""FullName";"#), Ok(ConstantValue::String("FullName".into())));
        assert_eq!(eval("42;"), Ok(ConstantValue::Int(42)));
        assert_eq!(eval("null;"), Ok(ConstantValue::Null));
        assert_eq!(eval("$\"{{x}}\";"), Ok(ConstantValue::String("{x}".into())));
    }

    #[test]
    fn nameof_takes_last_identifier() {
        assert_eq!(eval("nameof(Person.FullName);"), Ok(ConstantValue::String("FullName".into())));
    }

    #[test]
    fn concatenation() {
        assert_eq!(eval(r#""Full" + "Name";"#), Ok(ConstantValue::String("FullName".into())));
        assert_eq!(eval(r#""Item" + 2;"#), Ok(ConstantValue::String("Item2".into())));
        assert_eq!(eval(r#"null + "x";"#), Ok(ConstantValue::String("x".into())));
        assert_eq!(eval("1 + 2;"), Ok(ConstantValue::Int(3)));
        assert_eq!(eval("-(1 + 2);"), Ok(ConstantValue::Int(-3)));
    }

    #[test]
    fn invalid_operands() {
        assert_eq!(
            eval("true + 1;"),
            Err(ConstantError::InvalidOperands { op: "+", lhs: "bool", rhs: "integer" })
        );
    }

    #[test]
    fn non_constant_forms() {
        assert_eq!(
            eval("GetName();"),
            Err(ConstantError::NotConstant { text: "GetName()".into() })
        );
        assert_eq!(
            eval("$\"{name}\";"),
            Err(ConstantError::NotConstant { text: "$\"{name}\"".into() })
        );
    }

    #[test]
    fn nameof_generic_name() {
        assert_eq!(eval("nameof(List<int>);"), Ok(ConstantValue::String("List".into())));
    }

    #[test]
    fn evaluate_all_fills_every_pending_field() {
        let registry = TypeRegistry::new();
        let scopes = vec![Scope::compilation_unit(ScopeLevel::new(registry.namespaces().root()))];
        let text = "\"a\";";
        let sum = "1 + 1;";
        let (a, b) = (expr(text), expr(sum));
        let ty = TypeHash::from_name("C");

        let mut pending = FxHashMap::default();
        pending.insert((ty, "A".to_string()), PendingConst { expr: &a, scope: 0, source: text });
        pending.insert((ty, "B".to_string()), PendingConst { expr: &b, scope: 0, source: sum });

        let mut evaluator = ConstEvaluator::new(&registry, &scopes, &pending);
        evaluator.evaluate_all();
        let values = evaluator.into_values();
        assert_eq!(values.len(), 2);
        assert_eq!(values[&(ty, "A".to_string())], Ok(ConstantValue::String("a".into())));
        assert_eq!(values[&(ty, "B".to_string())], Ok(ConstantValue::Int(2)));
    }

    #[test]
    fn unknown_names() {
        assert_eq!(
            eval("Missing;"),
            Err(ConstantError::UnresolvedName { name: "Missing".into() })
        );
        assert_eq!(
            eval("Names.Missing;"),
            Err(ConstantError::UnresolvedName { name: "Names.Missing".into() })
        );
    }
}
