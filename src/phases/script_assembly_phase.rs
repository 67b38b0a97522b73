//! Script assembly: wrap top-level code into a generated type
//!
//! A unit whose top level holds anything besides imports and type declarations
//! is a script. Its loose fields, methods and statements move into a synthetic
//! public class named `<prefix><id>`:
//! - **static strategy** when there is at least one top-level method and every
//!   top-level method and field is static: the statements become the body of a
//!   static `main`, or are prepended to a static `main` the script already
//!   declares with the same parameter count
//! - **instance strategy** otherwise: the statements become the body of an
//!   instance `run`, and a static `main` instantiates the class and delegates
//!
//! Once assembled, the unit holds only imports and types, so the pass is a
//! no-op on every later iteration.

use super::AnalysisPass;
use crate::ast::{
    CallExpression, ConstructorBinding, Expression, ExpressionKind, FieldDeclaration, Member,
    MethodBinding, MethodDeclaration, Modifiers, NameExpression, NewExpression, Parameter,
    ResolvedType, Script, ScriptElement, Span, Statement, StatementKind, TypeDeclaration,
    TypeDeclarationKind, TypeRef, VariableBinding,
};
use crate::core::context::AnalysisContext;
use tracing::debug;

/// Instance entry point of an instance-strategy script
pub const ENTRY_METHOD: &str = "run";
/// Static entry point of every assembled script
pub const BOOTSTRAP_METHOD: &str = "main";
pub const BINDING_PARAMETER: &str = "binding";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStrategy {
    Static,
    Instance,
}

#[derive(Default)]
struct ScriptParts {
    imports: Vec<ScriptElement>,
    types: Vec<TypeDeclaration>,
    methods: Vec<MethodDeclaration>,
    fields: Vec<FieldDeclaration>,
    statements: Vec<Statement>,
}

impl ScriptParts {
    fn classify(elements: Vec<ScriptElement>) -> Self {
        let mut parts = Self::default();
        for element in elements {
            match element {
                ScriptElement::Imports(_) => parts.imports.push(element),
                ScriptElement::Type(declaration) => parts.types.push(declaration),
                ScriptElement::Method(method) => parts.methods.push(method),
                ScriptElement::Field(field) => parts.fields.push(field),
                ScriptElement::Statement(statement) => parts.statements.push(statement),
            }
        }
        parts
    }

    fn strategy(&self) -> AssemblyStrategy {
        let all_static = !self.methods.is_empty()
            && self.methods.iter().all(MethodDeclaration::is_static)
            && self.fields.iter().all(|f| f.modifiers.is_static);
        if all_static {
            AssemblyStrategy::Static
        } else {
            AssemblyStrategy::Instance
        }
    }
}

/// True when the unit holds nothing but imports and type declarations
pub fn is_assembled(script: &Script) -> bool {
    script
        .elements
        .iter()
        .all(|e| matches!(e, ScriptElement::Imports(_) | ScriptElement::Type(_)))
}

pub struct ScriptAssembler;

impl AnalysisPass for ScriptAssembler {
    fn name(&self) -> &'static str {
        "script-assembly"
    }

    fn apply(&self, script: Script, context: &mut AnalysisContext) -> Script {
        if is_assembled(&script) {
            return script;
        }

        let class_name = context.next_generated_class_name();
        let qualified_name = script.qualify(&class_name);
        let binding = context
            .binding_type()
            .map(|ty| binding_parameter(ty, script.span));

        let Script {
            package,
            elements,
            span,
        } = script;
        let parts = ScriptParts::classify(elements);
        let strategy = parts.strategy();

        let mut members: Vec<Member> = Vec::new();
        members.extend(parts.fields.into_iter().map(Member::Field));
        members.extend(parts.methods.into_iter().map(Member::Method));
        match strategy {
            AssemblyStrategy::Static => {
                let arity = usize::from(binding.is_some());
                if let Some(main) = declared_entry(&mut members, arity) {
                    debug!(statements = parts.statements.len(), "merging into declared main");
                    let mut body = parts.statements;
                    body.append(&mut main.body);
                    main.body = body;
                } else {
                    members.push(Member::Method(entry_method(
                        BOOTSTRAP_METHOD,
                        Modifiers::public_static(),
                        binding.clone(),
                        parts.statements,
                        span,
                    )));
                }
            }
            AssemblyStrategy::Instance => {
                members.push(Member::Method(entry_method(
                    ENTRY_METHOD,
                    Modifiers::public(),
                    binding.clone(),
                    parts.statements,
                    span,
                )));
                members.push(Member::Method(bootstrap_method(
                    &qualified_name,
                    binding,
                    span,
                )));
            }
        }

        let generated = TypeDeclaration {
            name: class_name,
            kind: TypeDeclarationKind::Class,
            modifiers: Modifiers::public(),
            superclass: None,
            interfaces: Vec::new(),
            members,
            synthetic: true,
            span,
        };

        context.metrics().record_script_assembly();
        debug!(class = %qualified_name, strategy = ?strategy, "assembled script");

        let mut elements = parts.imports;
        elements.push(ScriptElement::Type(generated));
        elements.extend(parts.types.into_iter().map(ScriptElement::Type));
        Script {
            package,
            elements,
            span,
        }
    }
}

/// A user `static main` with the generated entry's parameter count
fn declared_entry(members: &mut [Member], arity: usize) -> Option<&mut MethodDeclaration> {
    members.iter_mut().find_map(|member| match member {
        Member::Method(method)
            if method.name == BOOTSTRAP_METHOD
                && method.is_static()
                && method.parameters.len() == arity =>
        {
            Some(method)
        }
        _ => None,
    })
}

fn binding_parameter(binding_type: &str, span: Span) -> Parameter {
    Parameter {
        name: BINDING_PARAMETER.to_string(),
        ty: TypeRef::resolved(ResolvedType::class(binding_type), span),
        span,
    }
}

fn entry_method(
    name: &str,
    modifiers: Modifiers,
    binding: Option<Parameter>,
    body: Vec<Statement>,
    span: Span,
) -> MethodDeclaration {
    MethodDeclaration {
        name: name.to_string(),
        modifiers,
        parameters: binding.into_iter().collect(),
        return_type: TypeRef::void(span),
        body,
        declaring_type: None,
        span,
    }
}

/// `static main([binding]) { new <Generated>().run([binding]) }`, pre-bound
fn bootstrap_method(owner: &str, binding: Option<Parameter>, span: Span) -> MethodDeclaration {
    let instance = Expression::new(
        ExpressionKind::New(NewExpression {
            type_ref: TypeRef::resolved(ResolvedType::class(owner), span),
            arguments: Vec::new(),
            binding: Some(ConstructorBinding {
                owner: owner.to_string(),
                parameters: Vec::new(),
            }),
        }),
        span,
    )
    .with_type(ResolvedType::class(owner));

    let binding_type = binding.as_ref().and_then(|p| p.ty.static_type());
    let arguments: Vec<Expression> = binding
        .iter()
        .map(|parameter| {
            let read = Expression::new(
                ExpressionKind::Name(NameExpression {
                    name: parameter.name.clone(),
                    binding: Some(VariableBinding::Parameter {
                        name: parameter.name.clone(),
                        index: 0,
                        ty: binding_type.clone(),
                    }),
                }),
                span,
            );
            match &binding_type {
                Some(ty) => read.with_type(ty.clone()),
                None => read,
            }
        })
        .collect();

    let delegate = Expression::new(
        ExpressionKind::Call(CallExpression {
            receiver: Some(Box::new(instance)),
            name: ENTRY_METHOD.to_string(),
            arguments,
            binding: Some(MethodBinding {
                owner: owner.to_string(),
                name: ENTRY_METHOD.to_string(),
                parameters: binding_type.into_iter().collect(),
                return_type: ResolvedType::Void,
                is_static: false,
            }),
        }),
        span,
    )
    .with_type(ResolvedType::Void);

    entry_method(
        BOOTSTRAP_METHOD,
        Modifiers::public_static(),
        binding,
        vec![Statement::new(StatementKind::Expression(delegate), span)],
        span,
    )
}
