//! Pure type utility functions
//!
//! Functions here only consult the type environment; they never touch the
//! scope stack or report diagnostics.

use crate::ast::{Literal, NumericKind, NumericPrecision, PrimitiveType, ResolvedType};
use crate::core::type_compat::TypeCompatibility;
use crate::core::type_environment::TypeEnvironment;
use crate::stdlib;

/// Result of unifying two branch types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unification {
    Unified(ResolvedType),
    /// No single best type; carries the competing candidates
    Ambiguous(Vec<ResolvedType>),
}

/// Static type of a literal.
///
/// # Examples
///
/// ```rust,ignore
/// // 1    → int
/// // 1L   → long
/// // 1.5G → math.BigDecimal
/// // null → the null type
/// ```
pub fn literal_type(literal: &Literal) -> ResolvedType {
    match literal {
        Literal::Boolean(_) => ResolvedType::Primitive(PrimitiveType::Boolean),
        Literal::Null => ResolvedType::Null,
        Literal::String(_) => ResolvedType::class(stdlib::STRING),
        Literal::Number {
            kind, precision, ..
        } => numeric_literal_type(*kind, *precision),
    }
}

pub fn numeric_literal_type(kind: NumericKind, precision: NumericPrecision) -> ResolvedType {
    match (kind, precision) {
        (NumericKind::Integral, NumericPrecision::Standard) => {
            ResolvedType::Primitive(PrimitiveType::Int)
        }
        (NumericKind::Integral, NumericPrecision::Wide) => {
            ResolvedType::Primitive(PrimitiveType::Long)
        }
        (NumericKind::Integral, NumericPrecision::Arbitrary) => {
            ResolvedType::class(stdlib::BIG_INTEGER)
        }
        (NumericKind::Fractional, NumericPrecision::Standard) => {
            ResolvedType::Primitive(PrimitiveType::Float)
        }
        (NumericKind::Fractional, NumericPrecision::Wide) => {
            ResolvedType::Primitive(PrimitiveType::Double)
        }
        (NumericKind::Fractional, NumericPrecision::Arbitrary) => {
            ResolvedType::class(stdlib::BIG_DECIMAL)
        }
    }
}

/// Finds the type both branches of a conditional can be viewed as.
///
/// Rules, in order:
/// 1. identical types unify to themselves
/// 2. `null` with a reference gives the reference, with a primitive its box
/// 3. two numeric primitives use binary numeric promotion
/// 4. any other primitive is boxed
/// 5. for references, the wider of two assignable types wins; otherwise the
///    minimal common supertypes (ignoring the top type) decide, preferring the
///    unique class among several, and falling back to the top type when none
///    exist
///
/// `void` never unifies.
///
/// # Examples
///
/// ```rust,ignore
/// // int, long          → long
/// // null, String       → String
/// // int, String        → Comparable (shared by Integer and String)
/// ```
pub fn common_type(env: &TypeEnvironment, a: &ResolvedType, b: &ResolvedType) -> Unification {
    if a.is_void() || b.is_void() {
        return Unification::Ambiguous(vec![a.clone(), b.clone()]);
    }
    if a == b {
        return Unification::Unified(a.clone());
    }

    match (a, b) {
        (ResolvedType::Null, other) | (other, ResolvedType::Null) => {
            return Unification::Unified(other.boxed());
        }
        (ResolvedType::Primitive(x), ResolvedType::Primitive(y)) => {
            if let Some(promoted) = x.promote(*y) {
                return Unification::Unified(ResolvedType::Primitive(promoted));
            }
        }
        _ => {}
    }

    let (a, b) = (a.boxed(), b.boxed());
    if a == b {
        return Unification::Unified(a);
    }
    if TypeCompatibility::is_assignable(env, &a, &b) {
        return Unification::Unified(b);
    }
    if TypeCompatibility::is_assignable(env, &b, &a) {
        return Unification::Unified(a);
    }

    match (a.class_name(), b.class_name()) {
        (Some(x), Some(y)) => common_supertype(env, x, y),
        _ => Unification::Unified(ResolvedType::object()),
    }
}

fn lineage(env: &TypeEnvironment, name: &str) -> Vec<String> {
    std::iter::once(name.to_string())
        .chain(env.supertypes(name))
        .filter(|n| n != stdlib::OBJECT)
        .collect()
}

fn common_supertype(env: &TypeEnvironment, a: &str, b: &str) -> Unification {
    let of_b = lineage(env, b);
    let common: Vec<String> = lineage(env, a)
        .into_iter()
        .filter(|n| of_b.contains(n))
        .collect();

    let minimal: Vec<&String> = common
        .iter()
        .filter(|candidate| {
            !common
                .iter()
                .any(|other| other != *candidate && env.is_subtype(other, candidate))
        })
        .collect();

    match minimal.as_slice() {
        [] => Unification::Unified(ResolvedType::object()),
        [single] => Unification::Unified(ResolvedType::class(single.as_str())),
        several => {
            let classes: Vec<&&String> = several.iter().filter(|n| env.is_class(n)).collect();
            match classes.as_slice() {
                [class] => Unification::Unified(ResolvedType::class(class.as_str())),
                _ => Unification::Ambiguous(
                    several
                        .iter()
                        .map(|n| ResolvedType::class(n.as_str()))
                        .collect(),
                ),
            }
        }
    }
}
