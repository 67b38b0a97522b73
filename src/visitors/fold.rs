//! Owning tree traversal.
//!
//! A [`Folder`] consumes a node and returns its replacement. The default
//! methods rebuild every node unchanged and keep the context's scope stack in
//! step with the traversal, so a pass only overrides the hooks for the nodes
//! it rewrites. Overrides usually call the matching `walk_*` function first
//! to get post-order behaviour.

use crate::ast::{
    CallExpression, ConstructorDeclaration, Expression, ExpressionKind, FieldDeclaration,
    FieldStore, LocalDeclaration, MapEntry, Member, MethodDeclaration, Navigation,
    NavigationStep, NewExpression, Parameter, Script, ScriptElement, Statement, StatementKind,
    TypeDeclaration, TypeRef,
};
use crate::core::context::AnalysisContext;
use crate::scopes::{ImportScope, MethodScope, TypeDeclarationScope};

pub trait Folder {
    fn context(&mut self) -> &mut AnalysisContext;

    fn fold_script(&mut self, script: Script) -> Script {
        walk_script(self, script)
    }

    fn fold_element(&mut self, element: ScriptElement) -> ScriptElement {
        walk_element(self, element)
    }

    fn fold_type_declaration(&mut self, declaration: TypeDeclaration) -> TypeDeclaration {
        walk_type_declaration(self, declaration)
    }

    fn fold_method(&mut self, method: MethodDeclaration) -> MethodDeclaration {
        walk_method(self, method)
    }

    fn fold_constructor(&mut self, constructor: ConstructorDeclaration) -> ConstructorDeclaration {
        walk_constructor(self, constructor)
    }

    fn fold_field(&mut self, field: FieldDeclaration) -> FieldDeclaration {
        walk_field(self, field)
    }

    fn fold_parameter(&mut self, parameter: Parameter) -> Parameter {
        walk_parameter(self, parameter)
    }

    fn fold_statement(&mut self, statement: Statement) -> Statement {
        walk_statement(self, statement)
    }

    fn fold_expression(&mut self, expression: Expression) -> Expression {
        walk_expression(self, expression)
    }

    fn fold_type_ref(&mut self, type_ref: TypeRef) -> TypeRef {
        type_ref
    }
}

pub fn walk_script<F: Folder + ?Sized>(folder: &mut F, script: Script) -> Script {
    let context = folder.context();
    context.enter_unit(&script);
    let depth = context.scope_depth();
    let mut imports = ImportScope::root(context.default_imports().to_vec());
    context.push_scope(Box::new(imports.clone()));

    let mut elements = Vec::with_capacity(script.elements.len());
    for element in script.elements {
        if let ScriptElement::Imports(declaration) = &element {
            imports.extend(&declaration.imports);
            folder.context().push_scope(Box::new(imports.clone()));
        }
        elements.push(folder.fold_element(element));
    }

    // Import scopes stay live until the unit ends
    folder.context().truncate_scopes(depth);

    Script {
        elements,
        ..script
    }
}

pub fn walk_element<F: Folder + ?Sized>(folder: &mut F, element: ScriptElement) -> ScriptElement {
    match element {
        ScriptElement::Imports(declaration) => ScriptElement::Imports(declaration),
        ScriptElement::Type(declaration) => {
            ScriptElement::Type(folder.fold_type_declaration(declaration))
        }
        ScriptElement::Method(method) => ScriptElement::Method(folder.fold_method(method)),
        ScriptElement::Field(field) => ScriptElement::Field(folder.fold_field(field)),
        ScriptElement::Statement(statement) => {
            ScriptElement::Statement(folder.fold_statement(statement))
        }
    }
}

pub fn walk_type_declaration<F: Folder + ?Sized>(
    folder: &mut F,
    declaration: TypeDeclaration,
) -> TypeDeclaration {
    let qualified_name = folder.context().qualify(&declaration.name);
    let scope = TypeDeclarationScope::from_declaration(&declaration, qualified_name);
    folder.context().push_scope(Box::new(scope));

    let TypeDeclaration {
        superclass,
        interfaces,
        members,
        ..
    } = declaration;
    let superclass = superclass.map(|s| folder.fold_type_ref(s));
    let interfaces = interfaces
        .into_iter()
        .map(|i| folder.fold_type_ref(i))
        .collect();
    let members = members
        .into_iter()
        .map(|member| match member {
            Member::Method(method) => Member::Method(folder.fold_method(method)),
            Member::Constructor(ctor) => Member::Constructor(folder.fold_constructor(ctor)),
            Member::Field(field) => Member::Field(folder.fold_field(field)),
        })
        .collect();

    folder.context().pop_scope();

    TypeDeclaration {
        superclass,
        interfaces,
        members,
        ..declaration
    }
}

pub fn walk_method<F: Folder + ?Sized>(
    folder: &mut F,
    method: MethodDeclaration,
) -> MethodDeclaration {
    folder
        .context()
        .push_scope(Box::new(MethodScope::new(&method.parameters, &method.body)));

    let MethodDeclaration {
        parameters,
        return_type,
        body,
        ..
    } = method;
    let parameters = parameters
        .into_iter()
        .map(|p| folder.fold_parameter(p))
        .collect();
    let return_type = folder.fold_type_ref(return_type);
    let body = walk_block(folder, body);

    folder.context().pop_scope();

    MethodDeclaration {
        parameters,
        return_type,
        body,
        ..method
    }
}

pub fn walk_constructor<F: Folder + ?Sized>(
    folder: &mut F,
    constructor: ConstructorDeclaration,
) -> ConstructorDeclaration {
    folder.context().push_scope(Box::new(MethodScope::new(
        &constructor.parameters,
        &constructor.body,
    )));

    let ConstructorDeclaration {
        parameters, body, ..
    } = constructor;
    let parameters = parameters
        .into_iter()
        .map(|p| folder.fold_parameter(p))
        .collect();
    let body = walk_block(folder, body);

    folder.context().pop_scope();

    ConstructorDeclaration {
        parameters,
        body,
        ..constructor
    }
}

pub fn walk_field<F: Folder + ?Sized>(folder: &mut F, field: FieldDeclaration) -> FieldDeclaration {
    let FieldDeclaration {
        ty, initializer, ..
    } = field;
    FieldDeclaration {
        ty: folder.fold_type_ref(ty),
        initializer: initializer.map(|init| folder.fold_expression(init)),
        ..field
    }
}

pub fn walk_parameter<F: Folder + ?Sized>(folder: &mut F, parameter: Parameter) -> Parameter {
    Parameter {
        ty: folder.fold_type_ref(parameter.ty),
        ..parameter
    }
}

pub fn walk_block<F: Folder + ?Sized>(folder: &mut F, statements: Vec<Statement>) -> Vec<Statement> {
    statements
        .into_iter()
        .map(|s| folder.fold_statement(s))
        .collect()
}

pub fn walk_statement<F: Folder + ?Sized>(folder: &mut F, statement: Statement) -> Statement {
    let kind = match statement.kind {
        StatementKind::Expression(expression) => {
            StatementKind::Expression(folder.fold_expression(expression))
        }
        StatementKind::Local(local) => StatementKind::Local(LocalDeclaration {
            name: local.name,
            ty: local.ty.map(|ty| folder.fold_type_ref(ty)),
            initializer: local.initializer.map(|init| folder.fold_expression(init)),
        }),
        StatementKind::Return(value) => {
            StatementKind::Return(value.map(|v| folder.fold_expression(v)))
        }
        StatementKind::If {
            condition,
            then_branch,
            else_branch,
        } => StatementKind::If {
            condition: folder.fold_expression(condition),
            then_branch: walk_block(folder, then_branch),
            else_branch: walk_block(folder, else_branch),
        },
        StatementKind::While { condition, body } => StatementKind::While {
            condition: folder.fold_expression(condition),
            body: walk_block(folder, body),
        },
        StatementKind::Block(body) => StatementKind::Block(walk_block(folder, body)),
    };
    Statement {
        kind,
        span: statement.span,
    }
}

fn fold_boxed<F: Folder + ?Sized>(folder: &mut F, expression: Box<Expression>) -> Box<Expression> {
    Box::new(folder.fold_expression(*expression))
}

fn fold_all<F: Folder + ?Sized>(folder: &mut F, expressions: Vec<Expression>) -> Vec<Expression> {
    expressions
        .into_iter()
        .map(|e| folder.fold_expression(e))
        .collect()
}

pub fn walk_navigation<F: Folder + ?Sized>(folder: &mut F, navigation: Navigation) -> Navigation {
    Navigation {
        steps: navigation
            .steps
            .into_iter()
            .map(|step| match step {
                NavigationStep::Index(index) => NavigationStep::Index(folder.fold_expression(index)),
                other => other,
            })
            .collect(),
    }
}

/// Fold the children of `expression`, keeping its span and type
pub fn walk_expression<F: Folder + ?Sized>(folder: &mut F, expression: Expression) -> Expression {
    let Expression { kind, span, ty } = expression;
    let kind = match kind {
        ExpressionKind::Literal(_) | ExpressionKind::Name(_) => kind,
        ExpressionKind::Interpolated(parts) => ExpressionKind::Interpolated(fold_all(folder, parts)),
        ExpressionKind::List(items) => ExpressionKind::List(fold_all(folder, items)),
        ExpressionKind::Set(items) => ExpressionKind::Set(fold_all(folder, items)),
        ExpressionKind::Map(entries) => ExpressionKind::Map(
            entries
                .into_iter()
                .map(|entry| MapEntry {
                    key: folder.fold_expression(entry.key),
                    value: folder.fold_expression(entry.value),
                })
                .collect(),
        ),
        ExpressionKind::Navigation(navigation) => {
            ExpressionKind::Navigation(walk_navigation(folder, navigation))
        }
        ExpressionKind::Call(call) => ExpressionKind::Call(CallExpression {
            receiver: call.receiver.map(|r| fold_boxed(folder, r)),
            arguments: fold_all(folder, call.arguments),
            ..call
        }),
        ExpressionKind::New(new) => ExpressionKind::New(NewExpression {
            type_ref: folder.fold_type_ref(new.type_ref),
            arguments: fold_all(folder, new.arguments),
            binding: new.binding,
        }),
        ExpressionKind::Binary { op, left, right } => ExpressionKind::Binary {
            op,
            left: fold_boxed(folder, left),
            right: fold_boxed(folder, right),
        },
        ExpressionKind::Unary { op, operand } => ExpressionKind::Unary {
            op,
            operand: fold_boxed(folder, operand),
        },
        ExpressionKind::Conditional {
            condition,
            then_branch,
            else_branch,
        } => ExpressionKind::Conditional {
            condition: fold_boxed(folder, condition),
            then_branch: fold_boxed(folder, then_branch),
            else_branch: fold_boxed(folder, else_branch),
        },
        ExpressionKind::Assignment { target, value } => ExpressionKind::Assignment {
            target: walk_navigation(folder, target),
            value: fold_boxed(folder, value),
        },
        ExpressionKind::FieldStore(store) => ExpressionKind::FieldStore(FieldStore {
            value: fold_boxed(folder, store.value),
            ..store
        }),
        ExpressionKind::LocalStore { name, value } => ExpressionKind::LocalStore {
            name,
            value: fold_boxed(folder, value),
        },
        ExpressionKind::Conversion {
            kind,
            target,
            operand,
        } => ExpressionKind::Conversion {
            kind,
            target,
            operand: fold_boxed(folder, operand),
        },
    };
    Expression { kind, span, ty }
}
