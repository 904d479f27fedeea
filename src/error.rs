use thiserror::Error;

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Error, Debug, Clone)]
pub enum LayoutError {
    #[error("Unknown layout element '{element}'")]
    UnknownElement { element: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid page description: {0}")]
    InvalidPage(String),

    #[error("YAML error: {0}")]
    YamlError(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<serde_yaml::Error> for LayoutError {
    fn from(err: serde_yaml::Error) -> Self {
        LayoutError::YamlError(err.to_string())
    }
}

impl From<std::io::Error> for LayoutError {
    fn from(err: std::io::Error) -> Self {
        LayoutError::IoError(err.to_string())
    }
}
