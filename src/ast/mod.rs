//! Syntax tree consumed and produced by the analyzer.

pub mod builder;
pub mod expression;
pub mod span;
pub mod statement;
pub mod types;

pub use expression::{
    BinaryOp, CallExpression, ConstructorBinding, ConversionKind, Expression, ExpressionKind,
    FieldStore, Literal, MapEntry, MethodBinding, NameExpression, Navigation, NavigationStep,
    NewExpression, NumericKind, NumericPrecision, UnaryOp, VariableBinding,
};
pub use span::Span;
pub use statement::{
    ConstructorDeclaration, FieldDeclaration, Import, ImportDeclaration, ImportKind,
    LocalDeclaration, Member, MethodDeclaration, Modifiers, Parameter, Script, ScriptElement,
    Statement, StatementKind, TypeDeclaration, TypeDeclarationKind, Visibility,
};
pub use types::{BoundKind, PrimitiveType, ResolvedType, TypeRef, TypeRefKind};
