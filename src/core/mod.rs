pub mod config;
pub mod error;

pub use config::ViewerConfig;
pub use error::{Result, ViewerError};
