//! Tree-construction helpers.
//!
//! The analyzer consumes trees produced by an external parser. Drivers, tests
//! and benchmarks build the same trees directly with these helpers; every
//! node gets a dummy span unless one is given explicitly.

use super::expression::{
    BinaryOp, CallExpression, Expression, ExpressionKind, Literal, MapEntry, NameExpression,
    Navigation, NewExpression, NumericKind, NumericPrecision, UnaryOp,
};
use super::span::Span;
use super::statement::{
    ConstructorDeclaration, FieldDeclaration, Import, ImportDeclaration, LocalDeclaration, Member,
    MethodDeclaration, Modifiers, Parameter, Script, ScriptElement, Statement, StatementKind,
    TypeDeclaration, TypeDeclarationKind, Visibility,
};
use super::types::{PrimitiveType, TypeRef};

fn dummy() -> Span {
    Span::dummy()
}

fn expr(kind: ExpressionKind) -> Expression {
    Expression::new(kind, dummy())
}

pub fn number(text: &str, kind: NumericKind, precision: NumericPrecision) -> Expression {
    expr(ExpressionKind::Literal(Literal::Number {
        text: text.to_string(),
        kind,
        precision,
    }))
}

pub fn int(value: i64) -> Expression {
    number(
        &value.to_string(),
        NumericKind::Integral,
        NumericPrecision::Standard,
    )
}

pub fn long(value: i64) -> Expression {
    number(
        &format!("{}L", value),
        NumericKind::Integral,
        NumericPrecision::Wide,
    )
}

pub fn decimal(text: &str) -> Expression {
    number(text, NumericKind::Fractional, NumericPrecision::Arbitrary)
}

pub fn string(value: &str) -> Expression {
    expr(ExpressionKind::Literal(Literal::String(value.to_string())))
}

pub fn boolean(value: bool) -> Expression {
    expr(ExpressionKind::Literal(Literal::Boolean(value)))
}

pub fn null() -> Expression {
    expr(ExpressionKind::Literal(Literal::Null))
}

pub fn interpolated(parts: Vec<Expression>) -> Expression {
    expr(ExpressionKind::Interpolated(parts))
}

pub fn list(items: Vec<Expression>) -> Expression {
    expr(ExpressionKind::List(items))
}

pub fn set(items: Vec<Expression>) -> Expression {
    expr(ExpressionKind::Set(items))
}

pub fn map(entries: Vec<(Expression, Expression)>) -> Expression {
    expr(ExpressionKind::Map(
        entries
            .into_iter()
            .map(|(key, value)| MapEntry { key, value })
            .collect(),
    ))
}

/// A bare name read
pub fn name(name: &str) -> Expression {
    expr(ExpressionKind::Name(NameExpression {
        name: name.to_string(),
        binding: None,
    }))
}

pub fn call(name: &str, arguments: Vec<Expression>) -> Expression {
    expr(ExpressionKind::Call(CallExpression {
        receiver: None,
        name: name.to_string(),
        arguments,
        binding: None,
    }))
}

pub fn method_call(receiver: Expression, name: &str, arguments: Vec<Expression>) -> Expression {
    expr(ExpressionKind::Call(CallExpression {
        receiver: Some(Box::new(receiver)),
        name: name.to_string(),
        arguments,
        binding: None,
    }))
}

pub fn new_instance(type_ref: TypeRef, arguments: Vec<Expression>) -> Expression {
    expr(ExpressionKind::New(NewExpression {
        type_ref,
        arguments,
        binding: None,
    }))
}

pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Expression {
    expr(ExpressionKind::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn not(operand: Expression) -> Expression {
    expr(ExpressionKind::Unary {
        op: UnaryOp::Not,
        operand: Box::new(operand),
    })
}

pub fn conditional(condition: Expression, then: Expression, otherwise: Expression) -> Expression {
    expr(ExpressionKind::Conditional {
        condition: Box::new(condition),
        then_branch: Box::new(then),
        else_branch: Box::new(otherwise),
    })
}

/// `name = value`
pub fn assign(name: &str, value: Expression) -> Expression {
    expr(ExpressionKind::Assignment {
        target: Navigation::name(name),
        value: Box::new(value),
    })
}

pub fn named_type(name: &str) -> TypeRef {
    TypeRef::named(name, dummy())
}

pub fn primitive_type(primitive: PrimitiveType) -> TypeRef {
    TypeRef::primitive(primitive, dummy())
}

pub fn void_type() -> TypeRef {
    TypeRef::void(dummy())
}

pub fn array_type(component: TypeRef, dimensions: u32) -> TypeRef {
    TypeRef::array(component, dimensions, dummy())
}

pub fn expr_stmt(expression: Expression) -> Statement {
    Statement::new(StatementKind::Expression(expression), dummy())
}

pub fn local(name: &str, ty: Option<TypeRef>, initializer: Option<Expression>) -> Statement {
    Statement::new(
        StatementKind::Local(LocalDeclaration {
            name: name.to_string(),
            ty,
            initializer,
        }),
        dummy(),
    )
}

pub fn ret(value: Option<Expression>) -> Statement {
    Statement::new(StatementKind::Return(value), dummy())
}

pub fn if_stmt(condition: Expression, then: Vec<Statement>, otherwise: Vec<Statement>) -> Statement {
    Statement::new(
        StatementKind::If {
            condition,
            then_branch: then,
            else_branch: otherwise,
        },
        dummy(),
    )
}

pub fn block(statements: Vec<Statement>) -> Statement {
    Statement::new(StatementKind::Block(statements), dummy())
}

pub fn parameter(name: &str, ty: TypeRef) -> Parameter {
    Parameter {
        name: name.to_string(),
        ty,
        span: dummy(),
    }
}

pub fn field(name: &str, ty: TypeRef, modifiers: Modifiers) -> FieldDeclaration {
    FieldDeclaration {
        name: name.to_string(),
        ty,
        modifiers,
        initializer: None,
        span: dummy(),
    }
}

pub fn constructor(parameters: Vec<Parameter>, visibility: Visibility) -> ConstructorDeclaration {
    ConstructorDeclaration {
        modifiers: Modifiers::public().with_visibility(visibility),
        parameters,
        body: Vec::new(),
        span: dummy(),
    }
}

/// Builder for method declarations; defaults to a public instance method returning `void`
pub struct MethodBuilder {
    method: MethodDeclaration,
}

impl MethodBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            method: MethodDeclaration {
                name: name.to_string(),
                modifiers: Modifiers::public(),
                parameters: Vec::new(),
                return_type: void_type(),
                body: Vec::new(),
                declaring_type: None,
                span: dummy(),
            },
        }
    }

    pub fn make_static(mut self) -> Self {
        self.method.modifiers.is_static = true;
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.method.modifiers.visibility = visibility;
        self
    }

    pub fn param(mut self, name: &str, ty: TypeRef) -> Self {
        self.method.parameters.push(parameter(name, ty));
        self
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.method.return_type = ty;
        self
    }

    pub fn statement(mut self, statement: Statement) -> Self {
        self.method.body.push(statement);
        self
    }

    pub fn declared_in(mut self, owner: &str) -> Self {
        self.method.declaring_type = Some(owner.to_string());
        self
    }

    pub fn build(self) -> MethodDeclaration {
        self.method
    }
}

/// Builder for class and interface declarations
pub struct TypeBuilder {
    declaration: TypeDeclaration,
}

impl TypeBuilder {
    pub fn class(name: &str) -> Self {
        Self::with_kind(name, TypeDeclarationKind::Class)
    }

    pub fn interface(name: &str) -> Self {
        Self::with_kind(name, TypeDeclarationKind::Interface)
    }

    fn with_kind(name: &str, kind: TypeDeclarationKind) -> Self {
        Self {
            declaration: TypeDeclaration {
                name: name.to_string(),
                kind,
                modifiers: Modifiers::public(),
                superclass: None,
                interfaces: Vec::new(),
                members: Vec::new(),
                synthetic: false,
                span: dummy(),
            },
        }
    }

    pub fn extends(mut self, superclass: TypeRef) -> Self {
        self.declaration.superclass = Some(superclass);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.declaration.interfaces.push(interface);
        self
    }

    pub fn method(mut self, method: MethodDeclaration) -> Self {
        self.declaration.members.push(Member::Method(method));
        self
    }

    pub fn constructor(mut self, constructor: ConstructorDeclaration) -> Self {
        self.declaration
            .members
            .push(Member::Constructor(constructor));
        self
    }

    pub fn field(mut self, field: FieldDeclaration) -> Self {
        self.declaration.members.push(Member::Field(field));
        self
    }

    pub fn build(self) -> TypeDeclaration {
        self.declaration
    }
}

/// Builder for whole scripts, in source order
#[derive(Default)]
pub struct ScriptBuilder {
    package: Option<String>,
    elements: Vec<ScriptElement>,
}

impl ScriptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package(mut self, package: &str) -> Self {
        self.package = Some(package.to_string());
        self
    }

    /// One import declaration holding every entry, e.g. `["util.*", "io.File"]`
    pub fn imports(mut self, imports: &[&str]) -> Self {
        let imports = imports
            .iter()
            .map(|text| Import::parse(text, dummy()))
            .collect();
        self.elements.push(ScriptElement::Imports(ImportDeclaration {
            imports,
            span: dummy(),
        }));
        self
    }

    pub fn declare(mut self, declaration: TypeDeclaration) -> Self {
        self.elements.push(ScriptElement::Type(declaration));
        self
    }

    pub fn method(mut self, method: MethodDeclaration) -> Self {
        self.elements.push(ScriptElement::Method(method));
        self
    }

    pub fn field(mut self, field: FieldDeclaration) -> Self {
        self.elements.push(ScriptElement::Field(field));
        self
    }

    pub fn statement(mut self, statement: Statement) -> Self {
        self.elements.push(ScriptElement::Statement(statement));
        self
    }

    pub fn expression(self, expression: Expression) -> Self {
        self.statement(expr_stmt(expression))
    }

    pub fn build(self) -> Script {
        Script::new(self.package, self.elements, dummy())
    }
}
