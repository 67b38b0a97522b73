use super::expression::Expression;
use super::span::Span;
use super::types::TypeRef;
use serde::{Deserialize, Serialize};

/// A compilation unit as handed over by the parser
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Script {
    pub package: Option<String>,
    pub elements: Vec<ScriptElement>,
    pub span: Span,
}

impl Script {
    pub fn new(package: Option<String>, elements: Vec<ScriptElement>, span: Span) -> Self {
        Self {
            package,
            elements,
            span,
        }
    }

    pub fn type_declarations(&self) -> impl Iterator<Item = &TypeDeclaration> {
        self.elements.iter().filter_map(|element| match element {
            ScriptElement::Type(decl) => Some(decl),
            _ => None,
        })
    }

    pub fn find_type(&self, name: &str) -> Option<&TypeDeclaration> {
        self.type_declarations().find(|decl| decl.name == name)
    }

    /// Fully-qualified name of a type declared in this unit
    pub fn qualify(&self, simple_name: &str) -> String {
        match &self.package {
            Some(package) if !package.is_empty() => format!("{}.{}", package, simple_name),
            _ => simple_name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScriptElement {
    Imports(ImportDeclaration),
    Type(TypeDeclaration),
    Method(MethodDeclaration),
    Field(FieldDeclaration),
    Statement(Statement),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDeclaration {
    pub imports: Vec<Import>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImportKind {
    /// A single fully-qualified type name
    Explicit,
    /// Every type of a package, or every static member of a type
    OnDemand,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Import {
    /// Imported name without any trailing `.*`
    pub name: String,
    pub kind: ImportKind,
    pub span: Span,
}

impl Import {
    pub fn explicit(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            kind: ImportKind::Explicit,
            span,
        }
    }

    pub fn on_demand(name: impl Into<String>, span: Span) -> Self {
        let name = name.into();
        let name = name.strip_suffix(".*").map(str::to_string).unwrap_or(name);
        Self {
            name,
            kind: ImportKind::OnDemand,
            span,
        }
    }

    /// Parse `a.b.C` or `a.b.*`
    pub fn parse(text: &str, span: Span) -> Self {
        if text.ends_with(".*") {
            Self::on_demand(text, span)
        } else {
            Self::explicit(text, span)
        }
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Everything before the last dot
    pub fn qualifier(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(qualifier, _)| qualifier)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Package,
    Private,
}

impl Visibility {
    /// Visible from outside the declaring package
    pub fn is_external(self) -> bool {
        matches!(self, Visibility::Public | Visibility::Protected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
}

impl Modifiers {
    pub fn public() -> Self {
        Self::default()
    }

    pub fn public_static() -> Self {
        Self {
            is_static: true,
            ..Self::default()
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeDeclarationKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeDeclarationKind,
    pub modifiers: Modifiers,
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub members: Vec<Member>,
    /// Generated by script assembly rather than written by the user
    pub synthetic: bool,
    pub span: Span,
}

impl TypeDeclaration {
    pub fn methods(&self) -> impl Iterator<Item = &MethodDeclaration> {
        self.members.iter().filter_map(|member| match member {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &ConstructorDeclaration> {
        self.members.iter().filter_map(|member| match member {
            Member::Constructor(ctor) => Some(ctor),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDeclaration> {
        self.members.iter().filter_map(|member| match member {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Member {
    Method(MethodDeclaration),
    Constructor(ConstructorDeclaration),
    Field(FieldDeclaration),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub name: String,
    pub modifiers: Modifiers,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeRef,
    pub body: Vec<Statement>,
    /// Fully-qualified name of the enclosing type
    pub declaring_type: Option<String>,
    pub span: Span,
}

impl MethodDeclaration {
    pub fn is_static(&self) -> bool {
        self.modifiers.is_static
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorDeclaration {
    pub modifiers: Modifiers,
    pub parameters: Vec<Parameter>,
    pub body: Vec<Statement>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDeclaration {
    pub name: String,
    pub ty: TypeRef,
    pub modifiers: Modifiers,
    pub initializer: Option<Expression>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub span: Span,
}

impl Statement {
    pub fn new(kind: StatementKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalDeclaration {
    pub name: String,
    /// `None` for an untyped local
    pub ty: Option<TypeRef>,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatementKind {
    Expression(Expression),
    Local(LocalDeclaration),
    Return(Option<Expression>),
    If {
        condition: Expression,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
    Block(Vec<Statement>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_parse() {
        let span = Span::dummy();
        let on_demand = Import::parse("util.*", span);
        assert_eq!(on_demand.kind, ImportKind::OnDemand);
        assert_eq!(on_demand.name, "util");

        let explicit = Import::parse("math.BigInteger", span);
        assert_eq!(explicit.kind, ImportKind::Explicit);
        assert_eq!(explicit.simple_name(), "BigInteger");
        assert_eq!(explicit.qualifier(), Some("math"));
    }

    #[test]
    fn test_qualify_uses_package() {
        let span = Span::dummy();
        let script = Script::new(Some("app".to_string()), Vec::new(), span);
        assert_eq!(script.qualify("Main"), "app.Main");

        let script = Script::new(None, Vec::new(), span);
        assert_eq!(script.qualify("Main"), "Main");
    }

    #[test]
    fn test_external_visibility() {
        assert!(Visibility::Public.is_external());
        assert!(Visibility::Protected.is_external());
        assert!(!Visibility::Package.is_external());
        assert!(!Visibility::Private.is_external());
    }
}
