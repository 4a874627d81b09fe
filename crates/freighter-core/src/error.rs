//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Warehouse file not found: {path}")]
    WarehouseNotFound { path: String },

    #[error("Invalid warehouse: {message}")]
    InvalidWarehouse { message: String },

    #[error("Invalid platform '{value}': expected os/arch[/variant]")]
    InvalidPlatform { value: String },

    #[error("Invalid tag pattern '{pattern}': {message}")]
    InvalidTagPattern { pattern: String, message: String },

    #[error("Failed to parse warehouse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
