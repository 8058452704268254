// Utilitaires
pub mod error;
