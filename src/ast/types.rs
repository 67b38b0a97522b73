use super::span::Span;
use crate::stdlib;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive types of the host platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; 8] = [
        PrimitiveType::Boolean,
        PrimitiveType::Char,
        PrimitiveType::Byte,
        PrimitiveType::Short,
        PrimitiveType::Int,
        PrimitiveType::Long,
        PrimitiveType::Float,
        PrimitiveType::Double,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Char => "char",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == keyword)
    }

    /// Fully-qualified name of the platform class boxing this primitive
    pub fn boxed_name(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => stdlib::BOOLEAN,
            PrimitiveType::Char => stdlib::CHARACTER,
            PrimitiveType::Byte => stdlib::BYTE,
            PrimitiveType::Short => stdlib::SHORT,
            PrimitiveType::Int => stdlib::INTEGER,
            PrimitiveType::Long => stdlib::LONG,
            PrimitiveType::Float => stdlib::FLOAT,
            PrimitiveType::Double => stdlib::DOUBLE,
        }
    }

    pub fn from_boxed_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.boxed_name() == name)
    }

    pub fn is_numeric(self) -> bool {
        !matches!(self, PrimitiveType::Boolean)
    }

    /// Widening primitive conversion (strict: `self != target`)
    pub fn widens_to(self, target: PrimitiveType) -> bool {
        use PrimitiveType::*;
        match self {
            Byte => matches!(target, Short | Int | Long | Float | Double),
            Short | Char => matches!(target, Int | Long | Float | Double),
            Int => matches!(target, Long | Float | Double),
            Long => matches!(target, Float | Double),
            Float => matches!(target, Double),
            Double | Boolean => false,
        }
    }

    /// Result type of binary numeric promotion over two numeric primitives
    pub fn promote(self, other: PrimitiveType) -> Option<PrimitiveType> {
        use PrimitiveType::*;
        if !self.is_numeric() || !other.is_numeric() {
            return None;
        }
        Some(if self == Double || other == Double {
            Double
        } else if self == Float || other == Float {
            Float
        } else if self == Long || other == Long {
            Long
        } else {
            Int
        })
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A fully resolved static type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolvedType {
    Primitive(PrimitiveType),
    /// A class or interface, by fully-qualified name
    Class(String),
    Array {
        component: Box<ResolvedType>,
        dimensions: u32,
    },
    /// The type of the `null` literal
    Null,
    Void,
}

impl ResolvedType {
    pub fn class(name: impl Into<String>) -> Self {
        ResolvedType::Class(name.into())
    }

    pub fn object() -> Self {
        ResolvedType::Class(stdlib::OBJECT.to_string())
    }

    /// Build an array type, folding nested array components into one dimension count
    pub fn array(component: ResolvedType, dimensions: u32) -> Self {
        match component {
            ResolvedType::Array {
                component: inner,
                dimensions: inner_dims,
            } => ResolvedType::Array {
                component: inner,
                dimensions: inner_dims + dimensions,
            },
            other => ResolvedType::Array {
                component: Box::new(other),
                dimensions,
            },
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, ResolvedType::Primitive(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            ResolvedType::Class(_) | ResolvedType::Array { .. } | ResolvedType::Null
        )
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ResolvedType::Void)
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            ResolvedType::Class(name) => Some(name),
            _ => None,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            ResolvedType::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// The boxed counterpart of a primitive; other types are returned as-is
    pub fn boxed(&self) -> ResolvedType {
        match self {
            ResolvedType::Primitive(p) => ResolvedType::class(p.boxed_name()),
            other => other.clone(),
        }
    }

    /// The primitive a box class unboxes to
    pub fn unboxed(&self) -> Option<PrimitiveType> {
        self.class_name().and_then(PrimitiveType::from_boxed_name)
    }
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolvedType::Primitive(p) => write!(f, "{}", p),
            ResolvedType::Class(name) => f.write_str(name),
            ResolvedType::Array {
                component,
                dimensions,
            } => {
                write!(f, "{}", component)?;
                for _ in 0..*dimensions {
                    f.write_str("[]")?;
                }
                Ok(())
            }
            ResolvedType::Null => f.write_str("null"),
            ResolvedType::Void => f.write_str("void"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundKind {
    /// `? extends T`
    Upper,
    /// `? super T`
    Lower,
}

/// A type as written in source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub kind: TypeRefKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeRefKind {
    Primitive(PrimitiveType),
    Array {
        component: Box<TypeRef>,
        dimensions: u32,
    },
    /// A simple or dotted name not yet bound to a type
    Unresolved(String),
    /// Terminal: never turns back into an unresolved reference
    Resolved(ResolvedType),
    Wildcard {
        bound: Option<Box<TypeRef>>,
        kind: BoundKind,
    },
    Void,
}

impl TypeRef {
    pub fn new(kind: TypeRefKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn primitive(primitive: PrimitiveType, span: Span) -> Self {
        Self::new(TypeRefKind::Primitive(primitive), span)
    }

    pub fn named(name: impl Into<String>, span: Span) -> Self {
        Self::new(TypeRefKind::Unresolved(name.into()), span)
    }

    pub fn resolved(ty: ResolvedType, span: Span) -> Self {
        Self::new(TypeRefKind::Resolved(ty), span)
    }

    pub fn void(span: Span) -> Self {
        Self::new(TypeRefKind::Void, span)
    }

    pub fn array(component: TypeRef, dimensions: u32, span: Span) -> Self {
        Self::new(
            TypeRefKind::Array {
                component: Box::new(component),
                dimensions,
            },
            span,
        )
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self.kind, TypeRefKind::Resolved(_))
    }

    pub fn is_void(&self) -> bool {
        matches!(
            self.kind,
            TypeRefKind::Void | TypeRefKind::Resolved(ResolvedType::Void)
        )
    }

    /// The statically known type this reference denotes, if any
    pub fn static_type(&self) -> Option<ResolvedType> {
        match &self.kind {
            TypeRefKind::Primitive(p) => Some(ResolvedType::Primitive(*p)),
            TypeRefKind::Resolved(ty) => Some(ty.clone()),
            TypeRefKind::Void => Some(ResolvedType::Void),
            TypeRefKind::Array {
                component,
                dimensions,
            } => component
                .static_type()
                .map(|c| ResolvedType::array(c, *dimensions)),
            TypeRefKind::Wildcard { bound, kind } => match (bound, kind) {
                (Some(bound), BoundKind::Upper) => bound.static_type(),
                _ => Some(ResolvedType::object()),
            },
            TypeRefKind::Unresolved(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widening_is_strict_and_directional() {
        assert!(PrimitiveType::Int.widens_to(PrimitiveType::Long));
        assert!(PrimitiveType::Char.widens_to(PrimitiveType::Int));
        assert!(!PrimitiveType::Long.widens_to(PrimitiveType::Int));
        assert!(!PrimitiveType::Int.widens_to(PrimitiveType::Int));
        assert!(!PrimitiveType::Boolean.widens_to(PrimitiveType::Int));
        assert!(!PrimitiveType::Char.widens_to(PrimitiveType::Short));
    }

    #[test]
    fn test_boxing_round_trip_names() {
        for p in PrimitiveType::ALL {
            assert_eq!(PrimitiveType::from_boxed_name(p.boxed_name()), Some(p));
            assert_eq!(PrimitiveType::from_keyword(p.keyword()), Some(p));
        }
        assert_eq!(
            ResolvedType::Primitive(PrimitiveType::Int).boxed(),
            ResolvedType::class(stdlib::INTEGER)
        );
    }

    #[test]
    fn test_nested_arrays_fold_dimensions() {
        let inner = ResolvedType::array(ResolvedType::Primitive(PrimitiveType::Int), 1);
        let outer = ResolvedType::array(inner, 2);
        assert_eq!(
            outer,
            ResolvedType::Array {
                component: Box::new(ResolvedType::Primitive(PrimitiveType::Int)),
                dimensions: 3
            }
        );
        assert_eq!(outer.to_string(), "int[][][]");
    }

    #[test]
    fn test_static_type_of_unresolved_array_is_unknown() {
        let span = Span::dummy();
        let array = TypeRef::array(TypeRef::named("Foo", span), 1, span);
        assert_eq!(array.static_type(), None);

        let array = TypeRef::array(TypeRef::primitive(PrimitiveType::Long, span), 1, span);
        assert_eq!(
            array.static_type(),
            Some(ResolvedType::array(
                ResolvedType::Primitive(PrimitiveType::Long),
                1
            ))
        );
    }

    #[test]
    fn test_numeric_promotion() {
        use PrimitiveType::*;
        assert_eq!(Int.promote(Long), Some(Long));
        assert_eq!(Short.promote(Byte), Some(Int));
        assert_eq!(Float.promote(Long), Some(Float));
        assert_eq!(Boolean.promote(Int), None);
    }
}
