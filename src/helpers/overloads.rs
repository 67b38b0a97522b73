//! Overload and constructor selection
//!
//! Selection is purely by applicability: every candidate whose formals accept
//! the actual argument types is applicable, and anything other than exactly
//! one applicable candidate is a failure. There is no specificity ranking.

use crate::ast::{
    CallExpression, ConstructorBinding, Expression, ExpressionKind, MethodBinding, NewExpression,
    ResolvedType, Visibility,
};
use crate::core::context::AnalysisContext;
use crate::core::type_compat::TypeCompatibility;
use crate::core::type_environment::{TypeEnvironment, TypeShape};
use crate::scopes::TypeResolution;
use crate::utils::type_formatter::{format_constructor, format_signature};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallTarget {
    Method,
    Constructor,
}

/// Outcome of resolving one call or instantiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallResolution {
    Bound(MethodBinding),
    /// The callee names a type; the call is an instantiation
    Construct(ConstructorBinding),
    /// Nothing applicable; `candidates` are the same-arity callables that were rejected
    NotFound {
        target: CallTarget,
        candidates: Vec<String>,
    },
    Ambiguous {
        target: CallTarget,
        candidates: Vec<String>,
    },
    /// Not enough is known yet; try again next iteration
    Deferred,
}

/// Static types of every argument, or `None` while any is unknown
pub fn argument_types(arguments: &[Expression]) -> Option<Vec<ResolvedType>> {
    arguments.iter().map(|arg| arg.ty.clone()).collect()
}

enum Selection<T> {
    One(T),
    None(Vec<T>),
    Many(Vec<T>),
}

fn select<T>(
    env: &TypeEnvironment,
    candidates: Vec<T>,
    actuals: &[ResolvedType],
    formals: impl Fn(&T) -> &[ResolvedType],
) -> Selection<T> {
    let (mut applicable, rejected): (Vec<T>, Vec<T>) = candidates
        .into_iter()
        .partition(|c| TypeCompatibility::is_applicable(env, actuals, formals(c)));
    match applicable.len() {
        0 => Selection::None(rejected),
        1 => match applicable.pop() {
            Some(only) => Selection::One(only),
            None => Selection::None(rejected),
        },
        _ => Selection::Many(applicable),
    }
}

fn method_signatures(candidates: &[MethodBinding]) -> Vec<String> {
    candidates
        .iter()
        .map(|m| format_signature(&m.owner, &m.name, &m.parameters))
        .collect()
}

fn constructor_signatures(candidates: &[ConstructorBinding]) -> Vec<String> {
    candidates
        .iter()
        .map(|c| format_constructor(&c.owner, &c.parameters))
        .collect()
}

fn select_method(
    env: &TypeEnvironment,
    candidates: Vec<MethodBinding>,
    actuals: &[ResolvedType],
) -> CallResolution {
    match select(env, candidates, actuals, |m| &m.parameters) {
        Selection::One(binding) => CallResolution::Bound(binding),
        Selection::None(rejected) => CallResolution::NotFound {
            target: CallTarget::Method,
            candidates: method_signatures(&rejected),
        },
        Selection::Many(applicable) => CallResolution::Ambiguous {
            target: CallTarget::Method,
            candidates: method_signatures(&applicable),
        },
    }
}

fn is_visible(env: &TypeEnvironment, owner: &str, visibility: Visibility) -> bool {
    if env.is_unit_type(owner) {
        visibility != Visibility::Private
    } else {
        visibility.is_external()
    }
}

/// Methods named `name` with `arity` parameters on `owner` and its supertypes,
/// nearest declaration first; a signature redeclared lower in the hierarchy hides
/// the inherited one.
fn member_methods(
    env: &TypeEnvironment,
    owner: &str,
    name: &str,
    arity: usize,
    statics_only: bool,
) -> Vec<MethodBinding> {
    let mut found: Vec<MethodBinding> = Vec::new();
    let hierarchy = std::iter::once(owner.to_string()).chain(env.supertypes(owner));
    for type_name in hierarchy {
        let Some(shape) = env.lookup(&type_name) else {
            continue;
        };
        for method in shape.methods_named(name) {
            if method.arity() != arity
                || (statics_only && !method.is_static)
                || !is_visible(env, &shape.name, method.visibility)
            {
                continue;
            }
            if found.iter().any(|m| m.parameters == method.parameters) {
                continue;
            }
            found.push(MethodBinding {
                owner: shape.name.clone(),
                name: method.name.clone(),
                parameters: method.parameters.clone(),
                return_type: method.return_type.clone(),
                is_static: method.is_static,
            });
        }
    }
    found
}

/// Type named by an unbound bare-name receiver, e.g. `Math` in `Math.max(1, 2)`
fn receiver_type(ctx: &AnalysisContext, receiver: &Expression) -> Option<String> {
    match &receiver.kind {
        ExpressionKind::Name(name)
            if name.binding.is_none() && ctx.resolve_variable(&name.name).is_none() =>
        {
            match ctx.resolve_type(&name.name) {
                Some(TypeResolution::Resolved(fqn)) => Some(fqn),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Resolve a call expression against the current scope stack.
pub fn resolve_call(ctx: &AnalysisContext, call: &CallExpression) -> CallResolution {
    let Some(actuals) = argument_types(&call.arguments) else {
        return CallResolution::Deferred;
    };
    let env = ctx.type_env();

    if let Some(receiver) = &call.receiver {
        if let Some(owner) = receiver_type(ctx, receiver) {
            let candidates = member_methods(env, &owner, &call.name, actuals.len(), true);
            return select_method(env, candidates, &actuals);
        }
        return match receiver.ty.as_ref().map(ResolvedType::boxed) {
            Some(ResolvedType::Class(owner)) => {
                let candidates = member_methods(env, &owner, &call.name, actuals.len(), false);
                select_method(env, candidates, &actuals)
            }
            Some(_) => CallResolution::NotFound {
                target: CallTarget::Method,
                candidates: Vec::new(),
            },
            None => CallResolution::Deferred,
        };
    }

    let candidates = ctx.method_candidates(&call.name, actuals.len());
    if !candidates.is_empty() {
        return select_method(env, candidates, &actuals);
    }

    match ctx.resolve_type(&call.name) {
        Some(TypeResolution::Resolved(owner)) => resolve_constructor(env, &owner, &actuals),
        Some(TypeResolution::Ambiguous(types)) => CallResolution::Ambiguous {
            target: CallTarget::Constructor,
            candidates: types,
        },
        None => CallResolution::NotFound {
            target: CallTarget::Method,
            candidates: Vec::new(),
        },
    }
}

/// Resolve an explicit instantiation once its type reference is resolved
pub fn resolve_new(ctx: &AnalysisContext, new: &NewExpression) -> CallResolution {
    let Some(ResolvedType::Class(owner)) = new.type_ref.static_type() else {
        return CallResolution::Deferred;
    };
    let Some(actuals) = argument_types(&new.arguments) else {
        return CallResolution::Deferred;
    };
    resolve_constructor(ctx.type_env(), &owner, &actuals)
}

fn constructors_of(
    env: &TypeEnvironment,
    shape: &TypeShape,
    arity: usize,
) -> Vec<ConstructorBinding> {
    shape
        .constructors
        .iter()
        .filter(|c| c.parameters.len() == arity && is_visible(env, &shape.name, c.visibility))
        .map(|c| ConstructorBinding {
            owner: shape.name.clone(),
            parameters: c.parameters.clone(),
        })
        .collect()
}

pub fn resolve_constructor(
    env: &TypeEnvironment,
    owner: &str,
    actuals: &[ResolvedType],
) -> CallResolution {
    let candidates = match env.lookup(owner) {
        Some(shape) if !shape.is_interface() => constructors_of(env, shape, actuals.len()),
        _ => Vec::new(),
    };

    match select(env, candidates, actuals, |c| &c.parameters) {
        Selection::One(binding) => CallResolution::Construct(binding),
        Selection::None(rejected) => CallResolution::NotFound {
            target: CallTarget::Constructor,
            candidates: constructor_signatures(&rejected),
        },
        Selection::Many(applicable) => CallResolution::Ambiguous {
            target: CallTarget::Constructor,
            candidates: constructor_signatures(&applicable),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder;
    use crate::ast::{Import, PrimitiveType, Span};
    use crate::core::context::test_helpers::context_with;
    use crate::core::type_environment::{ConstructorShape, MethodShape};
    use crate::scopes::ImportScope;
    use crate::stdlib;

    fn int() -> ResolvedType {
        ResolvedType::Primitive(PrimitiveType::Int)
    }

    fn repository() -> crate::core::type_environment::InMemoryTypeRepository {
        let mut repo = stdlib::standard_repository();
        repo.register_all(vec![
            TypeShape::class("x.Util").with_method(
                MethodShape::new("doThing", vec![int()], ResolvedType::Void).make_static(),
            ),
            TypeShape::class("y.Util2").with_method(
                MethodShape::new(
                    "doThing",
                    vec![ResolvedType::class(stdlib::INTEGER)],
                    ResolvedType::Void,
                )
                .make_static(),
            ),
            TypeShape::class("x.Point")
                .with_constructor(ConstructorShape::new(vec![]))
                .with_constructor(ConstructorShape::new(vec![int(), int()]))
                .with_constructor(
                    ConstructorShape::new(vec![int()]).with_visibility(Visibility::Private),
                ),
        ])
        .unwrap();
        repo
    }

    fn context_importing(imports: &[&str]) -> AnalysisContext {
        let (mut ctx, _) = context_with(repository());
        let imports: Vec<Import> = imports
            .iter()
            .map(|i| Import::parse(i, Span::dummy()))
            .collect();
        let scope = ImportScope::root(ctx.default_imports().to_vec()).with_imports(&imports);
        ctx.push_scope(Box::new(scope));
        ctx
    }

    fn call_of(expression: Expression) -> CallExpression {
        match expression.kind {
            ExpressionKind::Call(call) => call,
            other => panic!("expected call, got {}", other.label()),
        }
    }

    #[test]
    fn test_untyped_arguments_defer() {
        let ctx = context_importing(&["x.Util.*"]);
        let call = call_of(builder::call("doThing", vec![builder::int(1)]));
        assert_eq!(resolve_call(&ctx, &call), CallResolution::Deferred);
    }

    #[test]
    fn test_single_applicable_binds() {
        let ctx = context_importing(&["x.Util.*"]);
        let call = call_of(builder::call("doThing", vec![builder::int(1).with_type(int())]));
        match resolve_call(&ctx, &call) {
            CallResolution::Bound(binding) => {
                assert_eq!(binding.owner, "x.Util");
                assert!(binding.is_static);
            }
            other => panic!("expected binding, got {:?}", other),
        }
    }

    #[test]
    fn test_primitive_and_boxed_overloads_are_ambiguous() {
        let ctx = context_importing(&["x.Util.*", "y.Util2.*"]);
        let call = call_of(builder::call("doThing", vec![builder::int(1).with_type(int())]));
        match resolve_call(&ctx, &call) {
            CallResolution::Ambiguous { target, candidates } => {
                assert_eq!(target, CallTarget::Method);
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_inconvertible_argument_is_not_applicable() {
        let ctx = context_importing(&["x.Util.*"]);
        let call = call_of(builder::call(
            "doThing",
            vec![builder::string("no").with_type(ResolvedType::class(stdlib::STRING))],
        ));
        match resolve_call(&ctx, &call) {
            CallResolution::NotFound { candidates, .. } => {
                assert_eq!(candidates, vec!["x.Util.doThing(int)".to_string()]);
            }
            other => panic!("expected not found, got {:?}", other),
        }
    }

    #[test]
    fn test_type_name_call_becomes_constructor() {
        let ctx = context_importing(&["x.*"]);
        let call = call_of(builder::call(
            "Point",
            vec![builder::int(1).with_type(int()), builder::int(2).with_type(int())],
        ));
        assert_eq!(
            resolve_call(&ctx, &call),
            CallResolution::Construct(ConstructorBinding {
                owner: "x.Point".to_string(),
                parameters: vec![int(), int()],
            })
        );
    }

    #[test]
    fn test_private_repository_constructor_is_hidden() {
        let ctx = context_importing(&["x.*"]);
        let call = call_of(builder::call("Point", vec![builder::int(1).with_type(int())]));
        assert_eq!(
            resolve_call(&ctx, &call),
            CallResolution::NotFound {
                target: CallTarget::Constructor,
                candidates: Vec::new(),
            }
        );
    }

    #[test]
    fn test_static_call_on_type_receiver() {
        let ctx = context_importing(&[]);
        let call = call_of(builder::method_call(
            builder::name("Math"),
            "max",
            vec![
                builder::int(1).with_type(int()),
                builder::long(2).with_type(ResolvedType::Primitive(PrimitiveType::Long)),
            ],
        ));
        match resolve_call(&ctx, &call) {
            CallResolution::Bound(binding) => {
                assert_eq!(binding.owner, stdlib::MATH);
                assert_eq!(binding.return_type, ResolvedType::Primitive(PrimitiveType::Long));
            }
            other => panic!("expected binding, got {:?}", other),
        }
    }
}
