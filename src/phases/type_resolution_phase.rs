//! Type-reference resolution
//!
//! Binds written type names to fully-qualified types through the scope stack.
//! The pass is permissive: a name that cannot be bound yet is left as it is and
//! retried on the next iteration. Reporting is left to the terminal reporter.

use super::AnalysisPass;
use crate::ast::{PrimitiveType, ResolvedType, Script, TypeRef, TypeRefKind};
use crate::core::context::AnalysisContext;
use crate::scopes::TypeResolution;
use crate::visitors::Folder;
use tracing::trace;

pub struct TypeReferenceResolver;

impl AnalysisPass for TypeReferenceResolver {
    fn name(&self) -> &'static str {
        "type-resolution"
    }

    fn apply(&self, script: Script, context: &mut AnalysisContext) -> Script {
        ResolverFolder { context }.fold_script(script)
    }
}

struct ResolverFolder<'a> {
    context: &'a mut AnalysisContext,
}

impl ResolverFolder<'_> {
    fn resolve_name(&self, name: &str) -> Option<ResolvedType> {
        if let Some(primitive) = PrimitiveType::from_keyword(name) {
            return Some(ResolvedType::Primitive(primitive));
        }
        if name == "void" {
            return Some(ResolvedType::Void);
        }
        match self.context.resolve_type(name)? {
            TypeResolution::Resolved(qualified) => {
                trace!(type_name = name, %qualified, "bound type reference");
                Some(ResolvedType::Class(qualified))
            }
            TypeResolution::Ambiguous(_) => None,
        }
    }
}

impl Folder for ResolverFolder<'_> {
    fn context(&mut self) -> &mut AnalysisContext {
        self.context
    }

    fn fold_type_ref(&mut self, type_ref: TypeRef) -> TypeRef {
        let TypeRef { kind, span } = type_ref;
        let kind = match kind {
            TypeRefKind::Resolved(_) | TypeRefKind::Void => kind,
            TypeRefKind::Primitive(primitive) => {
                TypeRefKind::Resolved(ResolvedType::Primitive(primitive))
            }
            TypeRefKind::Array {
                component,
                dimensions,
            } => {
                let component = self.fold_type_ref(*component);
                match &component.kind {
                    TypeRefKind::Resolved(resolved) => {
                        TypeRefKind::Resolved(ResolvedType::array(resolved.clone(), dimensions))
                    }
                    _ => TypeRefKind::Array {
                        component: Box::new(component),
                        dimensions,
                    },
                }
            }
            TypeRefKind::Unresolved(name) => match self.resolve_name(&name) {
                Some(resolved) => TypeRefKind::Resolved(resolved),
                None => TypeRefKind::Unresolved(name),
            },
            TypeRefKind::Wildcard { bound, kind } => TypeRefKind::Wildcard {
                bound: bound.map(|b| Box::new(self.fold_type_ref(*b))),
                kind,
            },
        };
        TypeRef { kind, span }
    }
}
