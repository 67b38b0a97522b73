use super::{Scope, ScopeKind, TypeResolution};
use crate::ast::{
    Expression, ExpressionKind, FieldStore, MethodBinding, ResolvedType, Span, TypeDeclaration,
    VariableBinding,
};
use crate::core::type_environment::TypeEnvironment;

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldEntry {
    name: String,
    ty: Option<ResolvedType>,
    is_static: bool,
}

/// Scope of a class or interface body: its own name, fields and typed methods
#[derive(Debug, Clone)]
pub struct TypeDeclarationScope {
    simple_name: String,
    qualified_name: String,
    fields: Vec<FieldEntry>,
    methods: Vec<MethodBinding>,
}

impl TypeDeclarationScope {
    pub fn from_declaration(declaration: &TypeDeclaration, qualified_name: String) -> Self {
        let fields = declaration
            .fields()
            .map(|field| FieldEntry {
                name: field.name.clone(),
                ty: field.ty.static_type(),
                is_static: field.modifiers.is_static,
            })
            .collect();

        let methods = declaration
            .methods()
            .filter_map(|method| {
                let parameters = method
                    .parameters
                    .iter()
                    .map(|p| p.ty.static_type())
                    .collect::<Option<Vec<_>>>()?;
                Some(MethodBinding {
                    owner: qualified_name.clone(),
                    name: method.name.clone(),
                    parameters,
                    return_type: method.return_type.static_type()?,
                    is_static: method.is_static(),
                })
            })
            .collect();

        Self {
            simple_name: declaration.name.clone(),
            qualified_name,
            fields,
            methods,
        }
    }

    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl Scope for TypeDeclarationScope {
    fn kind(&self) -> ScopeKind {
        ScopeKind::TypeDeclaration
    }

    fn resolve_type(&self, name: &str, _env: &TypeEnvironment) -> Option<TypeResolution> {
        (name == self.simple_name).then(|| TypeResolution::Resolved(self.qualified_name.clone()))
    }

    fn resolve_variable(&self, name: &str) -> Option<VariableBinding> {
        self.field(name).map(|field| VariableBinding::Field {
            owner: self.qualified_name.clone(),
            name: field.name.clone(),
            ty: field.ty.clone(),
            is_static: field.is_static,
        })
    }

    fn materialize_assignment(
        &self,
        name: &str,
        value: &Expression,
        span: Span,
    ) -> Option<Expression> {
        let field = self.field(name)?;
        let store = ExpressionKind::FieldStore(FieldStore {
            owner: self.qualified_name.clone(),
            field: field.name.clone(),
            field_type: field.ty.clone(),
            is_static: field.is_static,
            value: Box::new(value.clone()),
        });
        let mut expression = Expression::new(store, span);
        expression.ty = field.ty.clone();
        Some(expression)
    }

    fn method_candidates(
        &self,
        name: &str,
        arity: usize,
        _env: &TypeEnvironment,
    ) -> Vec<MethodBinding> {
        self.methods
            .iter()
            .filter(|m| m.name == name && m.parameters.len() == arity)
            .cloned()
            .collect()
    }
}
