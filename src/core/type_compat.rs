use crate::ast::{PrimitiveType, ResolvedType};
use crate::core::type_environment::TypeEnvironment;
use crate::stdlib;

/// How a value of one type reaches a slot of another
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conversion {
    Identity,
    /// Primitive widening
    Widening,
    /// Subtype or null to reference
    Reference,
    Boxing,
    Unboxing,
}

/// Type compatibility checker
pub struct TypeCompatibility;

impl TypeCompatibility {
    /// Classify the conversion from `source` to `target`, if one exists
    pub fn classify(
        env: &TypeEnvironment,
        source: &ResolvedType,
        target: &ResolvedType,
    ) -> Option<Conversion> {
        if source.is_void() || target.is_void() {
            return None;
        }
        if source == target {
            return Some(Conversion::Identity);
        }

        match (source, target) {
            (ResolvedType::Primitive(s), ResolvedType::Primitive(t)) => {
                s.widens_to(*t).then_some(Conversion::Widening)
            }
            (ResolvedType::Null, t) => t.is_reference().then_some(Conversion::Reference),
            (ResolvedType::Primitive(s), ResolvedType::Class(t)) => {
                Self::is_boxable(env, *s, t).then_some(Conversion::Boxing)
            }
            (ResolvedType::Class(_), ResolvedType::Primitive(t)) => source
                .unboxed()
                .filter(|p| p == t || p.widens_to(*t))
                .map(|_| Conversion::Unboxing),
            _ => Self::is_reference_assignable(env, source, target)
                .then_some(Conversion::Reference),
        }
    }

    /// Identity, widening or reference assignability; no boxing
    pub fn is_assignable(env: &TypeEnvironment, source: &ResolvedType, target: &ResolvedType) -> bool {
        matches!(
            Self::classify(env, source, target),
            Some(Conversion::Identity | Conversion::Widening | Conversion::Reference)
        )
    }

    /// Whether a callable with `formals` accepts `actuals`; arity must match exactly
    pub fn is_applicable(
        env: &TypeEnvironment,
        actuals: &[ResolvedType],
        formals: &[ResolvedType],
    ) -> bool {
        actuals.len() == formals.len()
            && actuals
                .iter()
                .zip(formals)
                .all(|(actual, formal)| Self::classify(env, actual, formal).is_some())
    }

    fn is_boxable(env: &TypeEnvironment, primitive: PrimitiveType, target: &str) -> bool {
        env.is_subtype(primitive.boxed_name(), target)
    }

    fn is_reference_assignable(
        env: &TypeEnvironment,
        source: &ResolvedType,
        target: &ResolvedType,
    ) -> bool {
        match (source, target) {
            (ResolvedType::Class(s), ResolvedType::Class(t)) => env.is_subtype(s, t),
            (ResolvedType::Array { .. }, ResolvedType::Class(t)) => t == stdlib::OBJECT,
            (
                ResolvedType::Array {
                    component: sc,
                    dimensions: sd,
                },
                ResolvedType::Array {
                    component: tc,
                    dimensions: td,
                },
            ) => {
                if sd == td {
                    sc.is_reference()
                        && tc.is_reference()
                        && Self::is_reference_assignable(env, sc, tc)
                } else {
                    sd > td && tc.class_name() == Some(stdlib::OBJECT)
                }
            }
            _ => false,
        }
    }
}
