use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Échec de connexion ou d'exécution sur MongoDB; toujours fatal pour l'exécution
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Opération refusée par le contexte (ex. : seed en production)
    #[error("Refused: {0}")]
    Refused(String),

    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        AppError::DatabaseError(e.to_string())
    }
}

/// Échec d'écriture du rapport JSON
impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Io(e.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_context() {
        let err = AppError::DatabaseError("connection refused".into());
        assert_eq!(err.to_string(), "Database error: connection refused");
        let err = AppError::Refused("production".into());
        assert_eq!(err.to_string(), "Refused: production");
    }

    #[test]
    fn test_json_failure_is_an_output_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = AppError::from(json_err);
        assert!(matches!(err, AppError::Io(_)));
        assert!(err.to_string().starts_with("Output error"));
    }
}
