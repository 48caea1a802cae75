pub mod http;
pub mod memory;

pub use http::HttpBackend;
pub use memory::MemoryBackend;

use async_trait::async_trait;
use thiserror::Error;

use crate::resource::ImportRule;

/// Errors surfaced by a backend client.
///
/// `NotFound` is a first-class kind rather than a string to inspect: the
/// destroy check and the readiness poll both branch on it.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("import rule not found: '{name}'")]
    NotFound { name: String },

    #[error("import rule already exists: '{name}'")]
    AlreadyExists { name: String },

    #[error("authentication failed: {message}")]
    Auth { message: String },

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl BackendError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BackendError::NotFound { .. })
    }
}

/// Client contract for the remote backend holding the ground-truth state.
///
/// The verifier mutates remote state only through these operations.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn create_import_rule(&self, rule: ImportRule) -> Result<ImportRule, BackendError>;
    async fn get_import_rule(&self, name: &str) -> Result<ImportRule, BackendError>;
    async fn update_import_rule(&self, rule: ImportRule) -> Result<ImportRule, BackendError>;
    async fn delete_import_rule(&self, name: &str) -> Result<(), BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = BackendError::NotFound {
            name: "test".to_string(),
        };
        assert_eq!(err.to_string(), "import rule not found: 'test'");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_already_exists_display() {
        let err = BackendError::AlreadyExists {
            name: "test".to_string(),
        };
        assert_eq!(err.to_string(), "import rule already exists: 'test'");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_api_error_display() {
        let err = BackendError::Api {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "API error (500): boom");
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_auth_error_display() {
        let err = BackendError::Auth {
            message: "invalid token".to_string(),
        };
        assert_eq!(err.to_string(), "authentication failed: invalid token");
    }
}
