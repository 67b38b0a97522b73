use super::{Scope, ScopeKind, TypeResolution};
use crate::ast::{Import, ImportKind, MethodBinding};
use crate::core::type_environment::{TypeEnvironment, TypeShape};

/// Import scope of a compilation unit.
///
/// Each import declaration pushes a new scope that carries every import seen
/// so far in the unit, so the innermost import scope always knows all the
/// imports in effect. Type names are searched by category: explicit imports,
/// then the unit's own types, then on-demand imports, then the implicit
/// default imports.
#[derive(Debug, Clone, Default)]
pub struct ImportScope {
    explicit: Vec<Import>,
    on_demand: Vec<Import>,
    defaults: Vec<Import>,
}

impl ImportScope {
    /// The outermost scope of a unit, seeing only the default imports
    pub fn root(defaults: Vec<Import>) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub fn extend(&mut self, imports: &[Import]) {
        for import in imports {
            match import.kind {
                ImportKind::Explicit => self.explicit.push(import.clone()),
                ImportKind::OnDemand => self.on_demand.push(import.clone()),
            }
        }
    }

    pub fn with_imports(mut self, imports: &[Import]) -> Self {
        self.extend(imports);
        self
    }

    fn explicit_match(&self, name: &str, env: &TypeEnvironment) -> Option<String> {
        self.explicit
            .iter()
            .rev()
            .find(|import| import.simple_name() == name && env.contains(&import.name))
            .map(|import| import.name.clone())
    }

    fn unit_match(name: &str, env: &TypeEnvironment) -> Option<String> {
        if let Some(unit_type) = env.unit_type(name) {
            return Some(unit_type.to_string());
        }
        let package = env.unit_package()?;
        let qualified = format!("{}.{}", package, name);
        env.contains(&qualified).then_some(qualified)
    }

    /// Every distinct match among `imports`, most recent first
    fn category_matches<'a>(
        imports: impl Iterator<Item = &'a Import>,
        name: &str,
        env: &TypeEnvironment,
    ) -> Vec<String> {
        let mut matches: Vec<String> = Vec::new();
        for import in imports {
            let candidate = match import.kind {
                ImportKind::Explicit if import.simple_name() == name => import.name.clone(),
                ImportKind::Explicit => continue,
                ImportKind::OnDemand => format!("{}.{}", import.name, name),
            };
            if env.contains(&candidate) && !matches.contains(&candidate) {
                matches.push(candidate);
            }
        }
        matches
    }

    fn into_resolution(mut matches: Vec<String>) -> Option<TypeResolution> {
        match matches.len() {
            0 => None,
            1 => matches.pop().map(TypeResolution::Resolved),
            _ => Some(TypeResolution::Ambiguous(matches)),
        }
    }

    fn static_methods<'a>(
        shape: &'a TypeShape,
        name: &'a str,
        arity: usize,
    ) -> impl Iterator<Item = MethodBinding> + 'a {
        shape
            .methods_named(name)
            .filter(move |m| m.is_static && m.visibility.is_external() && m.arity() == arity)
            .map(|m| MethodBinding {
                owner: shape.name.clone(),
                name: m.name.clone(),
                parameters: m.parameters.clone(),
                return_type: m.return_type.clone(),
                is_static: true,
            })
    }
}

impl Scope for ImportScope {
    fn kind(&self) -> ScopeKind {
        ScopeKind::Import
    }

    fn resolve_type(&self, name: &str, env: &TypeEnvironment) -> Option<TypeResolution> {
        if name.contains('.') {
            return env
                .contains(name)
                .then(|| TypeResolution::Resolved(name.to_string()));
        }

        if let Some(found) = self.explicit_match(name, env) {
            return Some(TypeResolution::Resolved(found));
        }
        if let Some(found) = Self::unit_match(name, env) {
            return Some(TypeResolution::Resolved(found));
        }
        Self::into_resolution(Self::category_matches(
            self.on_demand.iter().rev(),
            name,
            env,
        ))
        .or_else(|| {
            Self::into_resolution(Self::category_matches(
                self.defaults.iter().rev(),
                name,
                env,
            ))
        })
    }

    fn method_candidates(
        &self,
        name: &str,
        arity: usize,
        env: &TypeEnvironment,
    ) -> Vec<MethodBinding> {
        let mut candidates: Vec<MethodBinding> = Vec::new();
        let imports = self
            .explicit
            .iter()
            .rev()
            .chain(self.on_demand.iter().rev())
            .chain(self.defaults.iter().rev());

        for import in imports {
            // `a.Foo.bar` imports static `bar` of `a.Foo`; `a.Foo.*` imports all of them
            let owner = match import.kind {
                ImportKind::Explicit if import.simple_name() == name => import.qualifier(),
                ImportKind::Explicit => None,
                ImportKind::OnDemand => Some(import.name.as_str()),
            };
            let Some(shape) = owner.and_then(|owner| env.lookup(owner)) else {
                continue;
            };
            for candidate in Self::static_methods(shape, name, arity) {
                if !candidates.contains(&candidate) {
                    candidates.push(candidate);
                }
            }
        }
        candidates
    }
}
