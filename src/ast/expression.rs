use super::span::Span;
use super::types::{ResolvedType, TypeRef};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericKind {
    Integral,
    Fractional,
}

/// Precision category selected by a numeric literal's suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumericPrecision {
    Standard,
    Wide,
    Arbitrary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Literal {
    Boolean(bool),
    Null,
    String(String),
    Number {
        text: String,
        kind: NumericKind,
        precision: NumericPrecision,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    And,
    Or,
    Range,
}

impl BinaryOp {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
        )
    }

    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Remainder => "%",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Range => "..",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Negate,
}

/// Automatic conversion inserted around a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionKind {
    Boxing,
    Unboxing,
    Widening,
}

/// What a bare name read is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VariableBinding {
    Local {
        name: String,
        ty: Option<ResolvedType>,
    },
    Parameter {
        name: String,
        index: usize,
        ty: Option<ResolvedType>,
    },
    Field {
        owner: String,
        name: String,
        ty: Option<ResolvedType>,
        is_static: bool,
    },
}

impl VariableBinding {
    pub fn static_type(&self) -> Option<&ResolvedType> {
        match self {
            VariableBinding::Local { ty, .. }
            | VariableBinding::Parameter { ty, .. }
            | VariableBinding::Field { ty, .. } => ty.as_ref(),
        }
    }
}

/// A static or instance method selected by overload resolution
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodBinding {
    pub owner: String,
    pub name: String,
    pub parameters: Vec<ResolvedType>,
    pub return_type: ResolvedType,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstructorBinding {
    pub owner: String,
    pub parameters: Vec<ResolvedType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub span: Span,
    /// Static type, once known
    pub ty: Option<ResolvedType>,
}

impl Expression {
    pub fn new(kind: ExpressionKind, span: Span) -> Self {
        Self {
            kind,
            span,
            ty: None,
        }
    }

    pub fn with_type(mut self, ty: ResolvedType) -> Self {
        self.ty = Some(ty);
        self
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: Expression,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameExpression {
    pub name: String,
    pub binding: Option<VariableBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavigationStep {
    /// Bare name test
    Name(String),
    Index(Expression),
    Wildcard,
}

/// A path expression, e.g. `a.b[0].c`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Navigation {
    pub steps: Vec<NavigationStep>,
}

impl Navigation {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            steps: vec![NavigationStep::Name(name.into())],
        }
    }

    /// The name when this is a single-step navigation testing a bare name
    pub fn simple_name(&self) -> Option<&str> {
        match self.steps.as_slice() {
            [NavigationStep::Name(name)] => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallExpression {
    pub receiver: Option<Box<Expression>>,
    pub name: String,
    pub arguments: Vec<Expression>,
    pub binding: Option<MethodBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewExpression {
    pub type_ref: TypeRef,
    pub arguments: Vec<Expression>,
    pub binding: Option<ConstructorBinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldStore {
    pub owner: String,
    pub field: String,
    /// Declared type of the field, once statically known
    pub field_type: Option<ResolvedType>,
    pub is_static: bool,
    pub value: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpressionKind {
    Literal(Literal),
    Interpolated(Vec<Expression>),
    List(Vec<Expression>),
    Set(Vec<Expression>),
    Map(Vec<MapEntry>),
    Name(NameExpression),
    Navigation(Navigation),
    Call(CallExpression),
    New(NewExpression),
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Conditional {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },
    Assignment {
        target: Navigation,
        value: Box<Expression>,
    },
    FieldStore(FieldStore),
    LocalStore {
        name: String,
        value: Box<Expression>,
    },
    Conversion {
        kind: ConversionKind,
        target: ResolvedType,
        operand: Box<Expression>,
    },
}

impl ExpressionKind {
    pub fn label(&self) -> &'static str {
        match self {
            ExpressionKind::Literal(_) => "Literal",
            ExpressionKind::Interpolated(_) => "Interpolated",
            ExpressionKind::List(_) => "List",
            ExpressionKind::Set(_) => "Set",
            ExpressionKind::Map(_) => "Map",
            ExpressionKind::Name(_) => "Name",
            ExpressionKind::Navigation(_) => "Navigation",
            ExpressionKind::Call(_) => "Call",
            ExpressionKind::New(_) => "New",
            ExpressionKind::Binary { .. } => "Binary",
            ExpressionKind::Unary { .. } => "Unary",
            ExpressionKind::Conditional { .. } => "Conditional",
            ExpressionKind::Assignment { .. } => "Assignment",
            ExpressionKind::FieldStore(_) => "FieldStore",
            ExpressionKind::LocalStore { .. } => "LocalStore",
            ExpressionKind::Conversion { .. } => "Conversion",
        }
    }
}
