use std::env;

use crate::utils::error::{AppError, AppResult};

const DEFAULT_DATABASE_NAME: &str = "socialconnect";

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    /// `APP_ENV`, "development" par défaut
    pub app_env: String,
    /// Variantes de noms connues (`DUPLICATE_NAME_VARIANTS`, séparées par des virgules)
    pub duplicate_variants: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit la config à partir d'une fonction de lecture (testable sans toucher l'environnement)
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("DATABASE_URL must be set".into()))?;

        let name = lookup("DATABASE_NAME")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| database_name_from_uri(&url));

        let app_env = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());

        let duplicate_variants = lookup("DUPLICATE_NAME_VARIANTS")
            .map(|raw| parse_variants(&raw))
            .unwrap_or_default();

        Ok(Self {
            database: DatabaseConfig { url, name },
            app_env,
            duplicate_variants,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }
}

/// Extrait le nom de base de l'URI (`mongodb://host/<db>?opts`)
fn database_name_from_uri(uri: &str) -> String {
    uri.split("://")
        .nth(1)
        .and_then(|rest| rest.split_once('/'))
        .map(|(_, path)| path.split('?').next().unwrap_or_default())
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_DATABASE_NAME)
        .to_string()
}

/// Les espaces internes sont conservés ("Ben Ali"), seules les bordures sont retirées
pub fn parse_variants(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_database_url_is_required() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }

    #[test]
    fn test_database_name_from_uri() {
        let cfg = AppConfig::from_lookup(lookup_from(&[(
            "DATABASE_URL",
            "mongodb://localhost:27017/cpas?retryWrites=true",
        )]))
        .unwrap();
        assert_eq!(cfg.database.name, "cpas");
        assert_eq!(cfg.app_env, "development");
        assert!(!cfg.is_production());
    }

    #[test]
    fn test_database_name_fallbacks() {
        let cfg = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "mongodb://localhost:27017")]))
            .unwrap();
        assert_eq!(cfg.database.name, DEFAULT_DATABASE_NAME);

        let cfg = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "mongodb://localhost:27017/cpas"),
            ("DATABASE_NAME", "override"),
            ("APP_ENV", "Production"),
        ]))
        .unwrap();
        assert_eq!(cfg.database.name, "override");
        assert!(cfg.is_production());
    }

    #[test]
    fn test_variants_parsing() {
        assert_eq!(
            parse_variants(" Souaad, Souad ,,Sedia "),
            vec!["Souaad", "Souad", "Sedia"]
        );
        assert!(parse_variants("").is_empty());
    }
}
