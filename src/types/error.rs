// Mon Oct 19 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypeError {
    #[error("Unknown type: {0}")]
    UnknownType(String),
    #[error("{type_name} has no template argument {index}")]
    MissingTemplateArgument { type_name: String, index: usize },
    #[error("Template argument {index} of {type_name} is a value, not a type")]
    NotATypeArgument { type_name: String, index: usize },
    #[error("Template argument {index} of {type_name} is a type, not a value")]
    NotAValueArgument { type_name: String, index: usize },
    #[error("Invalid type descriptor {type_name}: {reason}")]
    InvalidDescriptor { type_name: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
