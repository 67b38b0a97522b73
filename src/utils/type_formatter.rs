/// Human-readable type and signature formatting for diagnostics
use crate::ast::{BoundKind, ResolvedType, TypeRef, TypeRefKind};

/// Format a type reference the way it reads in source
pub fn format_type_ref(type_ref: &TypeRef) -> String {
    match &type_ref.kind {
        TypeRefKind::Primitive(p) => p.to_string(),
        TypeRefKind::Array {
            component,
            dimensions,
        } => format!("{}{}", format_type_ref(component), "[]".repeat(*dimensions as usize)),
        TypeRefKind::Unresolved(name) => name.clone(),
        TypeRefKind::Resolved(ty) => short_name(ty),
        TypeRefKind::Wildcard { bound, kind } => match (bound, kind) {
            (None, _) => "?".to_string(),
            (Some(bound), BoundKind::Upper) => format!("? extends {}", format_type_ref(bound)),
            (Some(bound), BoundKind::Lower) => format!("? super {}", format_type_ref(bound)),
        },
        TypeRefKind::Void => "void".to_string(),
    }
}

/// Simple-name rendering of a resolved type, e.g. `List[]` for `util.List[]`
pub fn short_name(ty: &ResolvedType) -> String {
    match ty {
        ResolvedType::Class(name) => name.rsplit('.').next().unwrap_or(name).to_string(),
        ResolvedType::Array {
            component,
            dimensions,
        } => format!("{}{}", short_name(component), "[]".repeat(*dimensions as usize)),
        other => other.to_string(),
    }
}

/// `(int, lang.String)`; unknown argument types render as `?`
pub fn format_argument_list<'a>(types: impl IntoIterator<Item = Option<&'a ResolvedType>>) -> String {
    let parts: Vec<String> = types
        .into_iter()
        .map(|ty| ty.map_or_else(|| "?".to_string(), ToString::to_string))
        .collect();
    format!("({})", parts.join(", "))
}

/// `owner.name(int, long)`
pub fn format_signature(owner: &str, name: &str, parameters: &[ResolvedType]) -> String {
    format!(
        "{}.{}{}",
        owner,
        name,
        format_argument_list(parameters.iter().map(Some))
    )
}

/// `owner(int)`, the rendering used for constructors
pub fn format_constructor(owner: &str, parameters: &[ResolvedType]) -> String {
    format!("{}{}", owner, format_argument_list(parameters.iter().map(Some)))
}
