pub mod admin_service;
pub mod duplicate_finder;
pub mod duplicate_resolver;
pub mod etat_migrator;

pub use etat_migrator::EtatMapping;
