use thiserror::Error;

use crate::types::Action;

#[derive(Error, Debug)]
pub enum ShipdeskError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Not authorized to {action} {resource}")]
    NotAuthorized { action: Action, resource: String },

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Username {0} already exists")]
    DuplicateUsername(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ShipdeskError {
    pub fn not_authorized(action: Action, resource: impl Into<String>) -> Self {
        Self::NotAuthorized {
            action,
            resource: resource.into(),
        }
    }

    pub fn shipment_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "Shipment",
            id: id.into(),
        }
    }

    pub fn user_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "User",
            id: id.into(),
        }
    }
}

pub type ShipdeskResult<T> = std::result::Result<T, ShipdeskError>;
