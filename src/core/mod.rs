pub mod analyzer;
pub mod class_id;
pub mod context;
pub mod fixpoint;
pub mod type_compat;
pub mod type_environment;
