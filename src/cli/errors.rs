use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Semantic analysis failed with {0} errors")]
    SemanticErrors(usize),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Type already registered: {0}")]
    DuplicateType(String),

    #[error("Invalid type name: {0:?}")]
    InvalidName(String),
}
