// Well-known platform types and the default import set

use crate::ast::{PrimitiveType, ResolvedType};
use crate::core::type_environment::{
    ConstructorShape, InMemoryTypeRepository, MethodShape, TypeShape,
};

/// Top type
pub const OBJECT: &str = "lang.Object";
pub const STRING: &str = "lang.String";
pub const INTERPOLATED_STRING: &str = "lang.InterpolatedString";
pub const CHAR_SEQUENCE: &str = "lang.CharSequence";
pub const COMPARABLE: &str = "lang.Comparable";
pub const ITERABLE: &str = "lang.Iterable";
pub const NUMBER: &str = "lang.Number";
pub const MATH: &str = "lang.Math";
pub const SYSTEM: &str = "lang.System";

pub const BOOLEAN: &str = "lang.Boolean";
pub const CHARACTER: &str = "lang.Character";
pub const BYTE: &str = "lang.Byte";
pub const SHORT: &str = "lang.Short";
pub const INTEGER: &str = "lang.Integer";
pub const LONG: &str = "lang.Long";
pub const FLOAT: &str = "lang.Float";
pub const DOUBLE: &str = "lang.Double";

pub const BIG_INTEGER: &str = "math.BigInteger";
pub const BIG_DECIMAL: &str = "math.BigDecimal";

pub const COLLECTION: &str = "util.Collection";
pub const LIST: &str = "util.List";
pub const SET: &str = "util.Set";
pub const MAP: &str = "util.Map";
pub const ARRAY_LIST: &str = "util.ArrayList";

pub const FILE: &str = "io.File";

/// Implicit imports every compilation unit sees
pub fn default_imports() -> Vec<String> {
    ["lang.*", "util.*", "io.*", "math.BigInteger", "math.BigDecimal"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn prim(p: PrimitiveType) -> ResolvedType {
    ResolvedType::Primitive(p)
}

fn class(name: &str) -> ResolvedType {
    ResolvedType::class(name)
}

fn boxed_shape(primitive: PrimitiveType) -> TypeShape {
    let shape = TypeShape::class(primitive.boxed_name())
        .implements(COMPARABLE)
        .with_constructor(ConstructorShape::new(vec![prim(primitive)]))
        .with_method(
            MethodShape::new("valueOf", vec![prim(primitive)], class(primitive.boxed_name()))
                .make_static(),
        );
    if primitive.is_numeric() && primitive != PrimitiveType::Char {
        shape.extends(NUMBER)
    } else {
        shape
    }
}

/// Shapes of the platform types named in this module
pub fn standard_types() -> Vec<TypeShape> {
    use PrimitiveType::*;

    let mut shapes = vec![
        TypeShape::class(OBJECT)
            .with_constructor(ConstructorShape::new(Vec::new()))
            .with_method(MethodShape::new("toString", Vec::new(), class(STRING)))
            .with_method(MethodShape::new(
                "equals",
                vec![class(OBJECT)],
                prim(Boolean),
            ))
            .with_method(MethodShape::new("hashCode", Vec::new(), prim(Int))),
        TypeShape::interface(CHAR_SEQUENCE)
            .with_method(MethodShape::new("length", Vec::new(), prim(Int))),
        TypeShape::interface(COMPARABLE),
        TypeShape::interface(ITERABLE),
        TypeShape::class(STRING)
            .implements(CHAR_SEQUENCE)
            .implements(COMPARABLE)
            .with_constructor(ConstructorShape::new(Vec::new()))
            .with_constructor(ConstructorShape::new(vec![class(STRING)]))
            .with_method(
                MethodShape::new("valueOf", vec![class(OBJECT)], class(STRING)).make_static(),
            ),
        TypeShape::class(INTERPOLATED_STRING).implements(CHAR_SEQUENCE),
        TypeShape::class(NUMBER)
            .with_method(MethodShape::new("intValue", Vec::new(), prim(Int)))
            .with_method(MethodShape::new("doubleValue", Vec::new(), prim(Double))),
        TypeShape::class(MATH)
            .with_method(MethodShape::new("max", vec![prim(Int), prim(Int)], prim(Int)).make_static())
            .with_method(
                MethodShape::new("max", vec![prim(Long), prim(Long)], prim(Long)).make_static(),
            )
            .with_method(MethodShape::new("abs", vec![prim(Int)], prim(Int)).make_static())
            .with_method(MethodShape::new("abs", vec![prim(Double)], prim(Double)).make_static()),
        TypeShape::class(SYSTEM).with_method(
            MethodShape::new("currentTimeMillis", Vec::new(), prim(Long)).make_static(),
        ),
        TypeShape::class(BIG_INTEGER)
            .extends(NUMBER)
            .implements(COMPARABLE)
            .with_constructor(ConstructorShape::new(vec![class(STRING)])),
        TypeShape::class(BIG_DECIMAL)
            .extends(NUMBER)
            .implements(COMPARABLE)
            .with_constructor(ConstructorShape::new(vec![class(STRING)]))
            .with_constructor(ConstructorShape::new(vec![prim(Double)])),
        TypeShape::interface(COLLECTION)
            .implements(ITERABLE)
            .with_method(MethodShape::new("size", Vec::new(), prim(Int))),
        TypeShape::interface(LIST).implements(COLLECTION),
        TypeShape::interface(SET).implements(COLLECTION),
        TypeShape::interface(MAP).with_method(MethodShape::new("size", Vec::new(), prim(Int))),
        TypeShape::class(ARRAY_LIST)
            .implements(LIST)
            .with_constructor(ConstructorShape::new(Vec::new()))
            .with_constructor(ConstructorShape::new(vec![prim(Int)])),
        TypeShape::class(FILE).with_constructor(ConstructorShape::new(vec![class(STRING)])),
    ];

    shapes.extend(PrimitiveType::ALL.into_iter().map(boxed_shape));
    shapes
}

/// A repository preloaded with [`standard_types`]
pub fn standard_repository() -> InMemoryTypeRepository {
    let mut repository = InMemoryTypeRepository::new();
    for shape in standard_types() {
        // Names above are fixed and unique.
        let _ = repository.register(shape);
    }
    repository
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::type_environment::TypeRepository;

    #[test]
    fn test_standard_repository_has_boxes() {
        let repository = standard_repository();
        for p in PrimitiveType::ALL {
            assert!(repository.contains(p.boxed_name()), "missing {}", p.boxed_name());
        }
        assert!(repository.contains(BIG_INTEGER));
        assert_eq!(repository.len(), standard_types().len());
    }

    #[test]
    fn test_default_imports() {
        let imports = default_imports();
        assert_eq!(imports[0], "lang.*");
        assert!(imports.contains(&BIG_DECIMAL.to_string()));
    }

    #[test]
    fn test_integer_is_a_number() {
        let repository = standard_repository();
        let integer = repository.lookup(INTEGER).unwrap();
        assert_eq!(integer.superclass.as_deref(), Some(NUMBER));
        let boolean = repository.lookup(BOOLEAN).unwrap();
        assert_eq!(boolean.superclass, None);
    }
}
