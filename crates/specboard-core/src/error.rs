use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecboardError {
    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("feature not found: {0}")]
    FeatureNotFound(String),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("spec file not found: {0}")]
    SpecFileNotFound(String),

    #[error("task line no longer present in document: {0}")]
    TaskLineNotFound(String),

    #[error("file '{0}' is not an editable spec file")]
    FileNotAllowed(String),

    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    #[error("constitution not found under {0}")]
    ConstitutionNotFound(String),

    #[error("scan root is not a directory: {0}")]
    RootNotFound(String),

    #[error("filesystem watch error: {0}")]
    Watch(String),

    #[error("home directory not found: set HOME environment variable")]
    HomeNotFound,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SpecboardError>;
