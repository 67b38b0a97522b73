//! Lexical resolution scopes.
//!
//! The analysis context keeps a stack of scopes. Every lookup walks the stack
//! from the innermost scope outwards and the first scope with an answer wins,
//! so inner constructs shadow outer ones.

mod import_scope;
mod method_scope;
mod type_scope;

pub use import_scope::ImportScope;
pub use method_scope::MethodScope;
pub use type_scope::TypeDeclarationScope;

use crate::ast::{Expression, MethodBinding, Span, VariableBinding};
use crate::core::type_environment::TypeEnvironment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Import,
    TypeDeclaration,
    Method,
}

/// Answer to a type-name lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeResolution {
    /// Fully-qualified name of the single match
    Resolved(String),
    /// Every equally ranked match
    Ambiguous(Vec<String>),
}

/// A resolution context for one lexical construct.
///
/// Every operation answers `None` (or an empty list) when the scope has
/// nothing to say, which lets the lookup continue in the enclosing scope.
pub trait Scope: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> ScopeKind;

    fn resolve_type(&self, _name: &str, _env: &TypeEnvironment) -> Option<TypeResolution> {
        None
    }

    fn resolve_variable(&self, _name: &str) -> Option<VariableBinding> {
        None
    }

    /// Concrete store replacing `name = value`, if this scope owns `name`
    fn materialize_assignment(
        &self,
        _name: &str,
        _value: &Expression,
        _span: Span,
    ) -> Option<Expression> {
        None
    }

    /// Callables named `name` taking exactly `arity` arguments
    fn method_candidates(
        &self,
        _name: &str,
        _arity: usize,
        _env: &TypeEnvironment,
    ) -> Vec<MethodBinding> {
        Vec::new()
    }
}
