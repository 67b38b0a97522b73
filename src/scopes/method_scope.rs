use super::{Scope, ScopeKind};
use crate::ast::{
    Expression, ExpressionKind, Parameter, ResolvedType, Span, Statement, StatementKind,
    VariableBinding,
};
use indexmap::IndexMap;

/// Scope of a method or constructor body: parameters and every declared local
#[derive(Debug, Clone, Default)]
pub struct MethodScope {
    parameters: Vec<(String, Option<ResolvedType>)>,
    locals: IndexMap<String, Option<ResolvedType>>,
}

impl MethodScope {
    pub fn new(parameters: &[Parameter], body: &[Statement]) -> Self {
        let mut scope = Self {
            parameters: parameters
                .iter()
                .map(|p| (p.name.clone(), p.ty.static_type()))
                .collect(),
            locals: IndexMap::new(),
        };
        scope.collect_locals(body);
        scope
    }

    fn collect_locals(&mut self, statements: &[Statement]) {
        for statement in statements {
            match &statement.kind {
                StatementKind::Local(local) => {
                    let ty = match &local.ty {
                        Some(declared) => declared.static_type(),
                        None => local.initializer.as_ref().and_then(|init| init.ty.clone()),
                    };
                    self.locals.insert(local.name.clone(), ty);
                }
                StatementKind::If {
                    then_branch,
                    else_branch,
                    ..
                } => {
                    self.collect_locals(then_branch);
                    self.collect_locals(else_branch);
                }
                StatementKind::While { body, .. } | StatementKind::Block(body) => {
                    self.collect_locals(body);
                }
                StatementKind::Expression(_) | StatementKind::Return(_) => {}
            }
        }
    }

    pub fn local_names(&self) -> impl Iterator<Item = &str> {
        self.locals.keys().map(String::as_str)
    }

    fn lookup(&self, name: &str) -> Option<VariableBinding> {
        if let Some(ty) = self.locals.get(name) {
            return Some(VariableBinding::Local {
                name: name.to_string(),
                ty: ty.clone(),
            });
        }
        self.parameters
            .iter()
            .position(|(param, _)| param == name)
            .map(|index| VariableBinding::Parameter {
                name: name.to_string(),
                index,
                ty: self.parameters[index].1.clone(),
            })
    }
}

impl Scope for MethodScope {
    fn kind(&self) -> ScopeKind {
        ScopeKind::Method
    }

    fn resolve_variable(&self, name: &str) -> Option<VariableBinding> {
        self.lookup(name)
    }

    fn materialize_assignment(
        &self,
        name: &str,
        value: &Expression,
        span: Span,
    ) -> Option<Expression> {
        self.lookup(name)?;
        let store = ExpressionKind::LocalStore {
            name: name.to_string(),
            value: Box::new(value.clone()),
        };
        let mut expression = Expression::new(store, span);
        expression.ty = value.ty.clone();
        Some(expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::builder;
    use crate::ast::PrimitiveType;

    #[test]
    fn test_collects_nested_locals() {
        let body = vec![
            builder::local("a", None, Some(builder::int(1))),
            builder::if_stmt(
                builder::boolean(true),
                vec![builder::local(
                    "b",
                    Some(builder::primitive_type(PrimitiveType::Long)),
                    None,
                )],
                vec![builder::block(vec![builder::local("c", None, None)])],
            ),
        ];
        let scope = MethodScope::new(&[], &body);
        assert_eq!(scope.local_names().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(
            scope.resolve_variable("b"),
            Some(VariableBinding::Local {
                name: "b".to_string(),
                ty: Some(ResolvedType::Primitive(PrimitiveType::Long)),
            })
        );
    }

    #[test]
    fn test_untyped_local_takes_initializer_type() {
        let init = builder::int(1).with_type(ResolvedType::Primitive(PrimitiveType::Int));
        let scope = MethodScope::new(&[], &[builder::local("x", None, Some(init))]);
        assert_eq!(
            scope
                .resolve_variable("x")
                .and_then(|b| b.static_type().cloned()),
            Some(ResolvedType::Primitive(PrimitiveType::Int))
        );
    }

    #[test]
    fn test_parameters_bind_by_index() {
        let params = vec![
            builder::parameter("first", builder::primitive_type(PrimitiveType::Int)),
            builder::parameter("second", builder::named_type("Unknown")),
        ];
        let scope = MethodScope::new(&params, &[]);
        assert_eq!(
            scope.resolve_variable("second"),
            Some(VariableBinding::Parameter {
                name: "second".to_string(),
                index: 1,
                ty: None,
            })
        );
        assert!(scope.resolve_variable("third").is_none());
        assert!(scope
            .materialize_assignment("first", &builder::int(2), Span::dummy())
            .is_some());
        assert!(scope
            .materialize_assignment("third", &builder::int(2), Span::dummy())
            .is_none());
    }
}
