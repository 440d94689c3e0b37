use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Engine fault: {0}")]
    EngineFault(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing host capability: {0}")]
    MissingCapability(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, ViewerError>;
