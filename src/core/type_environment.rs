use crate::ast::{
    Member, ResolvedType, Script, TypeDeclaration, TypeDeclarationKind, TypeRef, Visibility,
};
use crate::cli::errors::RepositoryError;
use crate::stdlib;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShapeKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodShape {
    pub name: String,
    pub parameters: Vec<ResolvedType>,
    pub return_type: ResolvedType,
    pub visibility: Visibility,
    pub is_static: bool,
}

impl MethodShape {
    pub fn new(name: &str, parameters: Vec<ResolvedType>, return_type: ResolvedType) -> Self {
        Self {
            name: name.to_string(),
            parameters,
            return_type,
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    pub fn make_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConstructorShape {
    pub parameters: Vec<ResolvedType>,
    pub visibility: Visibility,
}

impl ConstructorShape {
    pub fn new(parameters: Vec<ResolvedType>) -> Self {
        Self {
            parameters,
            visibility: Visibility::Public,
        }
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldShape {
    pub name: String,
    pub ty: ResolvedType,
    pub visibility: Visibility,
    pub is_static: bool,
}

/// Shape of a compiled type, as reported by the type repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeShape {
    /// Fully-qualified name
    pub name: String,
    pub kind: TypeShapeKind,
    pub visibility: Visibility,
    pub superclass: Option<String>,
    pub interfaces: Vec<String>,
    pub methods: Vec<MethodShape>,
    pub constructors: Vec<ConstructorShape>,
    pub fields: Vec<FieldShape>,
}

impl TypeShape {
    pub fn class(name: &str) -> Self {
        Self::with_kind(name, TypeShapeKind::Class)
    }

    pub fn interface(name: &str) -> Self {
        Self::with_kind(name, TypeShapeKind::Interface)
    }

    fn with_kind(name: &str, kind: TypeShapeKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            visibility: Visibility::Public,
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            fields: Vec::new(),
        }
    }

    pub fn extends(mut self, superclass: &str) -> Self {
        self.superclass = Some(superclass.to_string());
        self
    }

    pub fn implements(mut self, interface: &str) -> Self {
        self.interfaces.push(interface.to_string());
        self
    }

    pub fn with_method(mut self, method: MethodShape) -> Self {
        self.methods.push(method);
        self
    }

    pub fn with_constructor(mut self, constructor: ConstructorShape) -> Self {
        self.constructors.push(constructor);
        self
    }

    pub fn with_field(mut self, name: &str, ty: ResolvedType, is_static: bool) -> Self {
        self.fields.push(FieldShape {
            name: name.to_string(),
            ty,
            visibility: Visibility::Public,
            is_static,
        });
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    pub fn package(&self) -> Option<&str> {
        self.name.rsplit_once('.').map(|(package, _)| package)
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeShapeKind::Interface
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodShape> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub fn field(&self, name: &str) -> Option<&FieldShape> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Shape of a type declared by the compilation unit itself.
    ///
    /// Members whose signature is not yet fully resolved are left out; they
    /// appear once a later iteration has resolved their type references.
    pub fn from_declaration(declaration: &TypeDeclaration, name: String) -> Self {
        let kind = match declaration.kind {
            TypeDeclarationKind::Class => TypeShapeKind::Class,
            TypeDeclarationKind::Interface => TypeShapeKind::Interface,
        };

        let mut shape = Self::with_kind(&name, kind).with_visibility(declaration.modifiers.visibility);
        shape.superclass = declaration
            .superclass
            .as_ref()
            .and_then(TypeRef::static_type)
            .and_then(|ty| ty.class_name().map(str::to_string));
        shape.interfaces = declaration
            .interfaces
            .iter()
            .filter_map(|iface| iface.static_type())
            .filter_map(|ty| ty.class_name().map(str::to_string))
            .collect();

        for member in &declaration.members {
            match member {
                Member::Method(method) => {
                    let parameters: Option<Vec<_>> =
                        method.parameters.iter().map(|p| p.ty.static_type()).collect();
                    if let (Some(parameters), Some(return_type)) =
                        (parameters, method.return_type.static_type())
                    {
                        shape.methods.push(MethodShape {
                            name: method.name.clone(),
                            parameters,
                            return_type,
                            visibility: method.modifiers.visibility,
                            is_static: method.modifiers.is_static,
                        });
                    }
                }
                Member::Constructor(ctor) => {
                    let parameters: Option<Vec<_>> =
                        ctor.parameters.iter().map(|p| p.ty.static_type()).collect();
                    if let Some(parameters) = parameters {
                        shape.constructors.push(ConstructorShape {
                            parameters,
                            visibility: ctor.modifiers.visibility,
                        });
                    }
                }
                Member::Field(field) => {
                    if let Some(ty) = field.ty.static_type() {
                        shape.fields.push(FieldShape {
                            name: field.name.clone(),
                            ty,
                            visibility: field.modifiers.visibility,
                            is_static: field.modifiers.is_static,
                        });
                    }
                }
            }
        }

        let declares_constructor = declaration
            .members
            .iter()
            .any(|m| matches!(m, Member::Constructor(_)));
        if kind == TypeShapeKind::Class && !declares_constructor {
            shape.constructors.push(ConstructorShape::new(Vec::new()));
        }

        shape
    }
}

/// Maps fully-qualified names to compiled type shapes
pub trait TypeRepository: Send + Sync {
    fn lookup(&self, name: &str) -> Option<&TypeShape>;

    /// Every type directly inside `package`
    fn package_types(&self, package: &str) -> Vec<&TypeShape>;

    fn type_names(&self) -> Vec<String>;

    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

/// Type repository backed by an insertion-ordered map
#[derive(Debug, Default, Clone)]
pub struct InMemoryTypeRepository {
    types: IndexMap<String, TypeShape>,
}

impl InMemoryTypeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, shape: TypeShape) -> Result<(), RepositoryError> {
        if !is_valid_type_name(&shape.name) {
            return Err(RepositoryError::InvalidName(shape.name));
        }
        if self.types.contains_key(&shape.name) {
            return Err(RepositoryError::DuplicateType(shape.name));
        }
        self.types.insert(shape.name.clone(), shape);
        Ok(())
    }

    pub fn register_all(
        &mut self,
        shapes: impl IntoIterator<Item = TypeShape>,
    ) -> Result<(), RepositoryError> {
        for shape in shapes {
            self.register(shape)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn is_valid_type_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        })
}

impl TypeRepository for InMemoryTypeRepository {
    fn lookup(&self, name: &str) -> Option<&TypeShape> {
        self.types.get(name)
    }

    fn package_types(&self, package: &str) -> Vec<&TypeShape> {
        self.types
            .values()
            .filter(|shape| shape.package() == Some(package))
            .collect()
    }

    fn type_names(&self) -> Vec<String> {
        self.types.keys().cloned().collect()
    }
}

/// Per-compilation view over the repository plus the types the unit declares
pub struct TypeEnvironment {
    repository: Arc<dyn TypeRepository>,
    unit_types: FxHashMap<String, TypeShape>,
    /// Simple name -> fully-qualified name for unit-declared types
    unit_names: FxHashMap<String, String>,
    unit_package: Option<String>,
}

impl TypeEnvironment {
    pub fn new(repository: Arc<dyn TypeRepository>) -> Self {
        Self {
            repository,
            unit_types: FxHashMap::default(),
            unit_names: FxHashMap::default(),
            unit_package: None,
        }
    }

    pub fn repository(&self) -> &Arc<dyn TypeRepository> {
        &self.repository
    }

    /// Rebuild the unit overlay from the current state of `script`
    pub fn set_unit(&mut self, script: &Script) {
        self.unit_types.clear();
        self.unit_names.clear();
        self.unit_package = script.package.clone();

        for declaration in script.type_declarations() {
            let name = script.qualify(&declaration.name);
            self.unit_names
                .insert(declaration.name.clone(), name.clone());
            self.unit_types
                .insert(name.clone(), TypeShape::from_declaration(declaration, name));
        }
    }

    pub fn unit_package(&self) -> Option<&str> {
        self.unit_package.as_deref()
    }

    /// Fully-qualified name of a unit-declared type, by simple name
    pub fn unit_type(&self, simple_name: &str) -> Option<&str> {
        self.unit_names.get(simple_name).map(String::as_str)
    }

    pub fn is_unit_type(&self, name: &str) -> bool {
        self.unit_types.contains_key(name)
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeShape> {
        self.unit_types
            .get(name)
            .or_else(|| self.repository.lookup(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    pub fn package_types(&self, package: &str) -> Vec<&TypeShape> {
        let mut types: Vec<&TypeShape> = self
            .unit_types
            .values()
            .filter(|shape| shape.package() == Some(package))
            .collect();
        types.sort_by(|a, b| a.name.cmp(&b.name));
        for shape in self.repository.package_types(package) {
            if !self.unit_types.contains_key(&shape.name) {
                types.push(shape);
            }
        }
        types
    }

    /// Direct supertypes: superclass (or the top type) and interfaces
    fn direct_supertypes(&self, name: &str) -> Vec<String> {
        let Some(shape) = self.lookup(name) else {
            return Vec::new();
        };
        let mut result = Vec::with_capacity(shape.interfaces.len() + 1);
        match &shape.superclass {
            Some(superclass) => result.push(superclass.clone()),
            None if name != stdlib::OBJECT && !shape.is_interface() => {
                result.push(stdlib::OBJECT.to_string())
            }
            None => {}
        }
        result.extend(shape.interfaces.iter().cloned());
        result
    }

    /// Every transitive supertype of `name`, nearest first, ending with the top type
    pub fn supertypes(&self, name: &str) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut ordered = Vec::new();
        let mut queue = std::collections::VecDeque::from(self.direct_supertypes(name));
        seen.insert(name.to_string());

        while let Some(next) = queue.pop_front() {
            if !seen.insert(next.clone()) {
                continue;
            }
            queue.extend(self.direct_supertypes(&next));
            ordered.push(next);
        }

        ordered.retain(|n| n != stdlib::OBJECT);
        if name != stdlib::OBJECT {
            ordered.push(stdlib::OBJECT.to_string());
        }
        ordered
    }

    pub fn is_subtype(&self, sub: &str, sup: &str) -> bool {
        sub == sup || sup == stdlib::OBJECT || self.supertypes(sub).iter().any(|n| n == sup)
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.lookup(name).is_some_and(|shape| !shape.is_interface())
    }

    /// Simple names of every type known to this environment, sorted and deduplicated
    pub fn known_simple_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .repository
            .type_names()
            .into_iter()
            .chain(self.unit_types.keys().cloned())
            .map(|name| name.rsplit('.').next().unwrap_or(&name).to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl std::fmt::Debug for TypeEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeEnvironment")
            .field("unit_package", &self.unit_package)
            .field("unit_types", &self.unit_types.keys().collect::<Vec<_>>())
            .finish()
    }
}
