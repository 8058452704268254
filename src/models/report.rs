use serde::Serialize;

use super::{Etat, Gestionnaire};

/// Résultat d'une suppression de doublons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    /// Identifiants distincts reçus
    pub requested: usize,
    pub deleted: u64,
    /// Dossiers dont le `gestionnaireId` a été remis à null
    pub detached: u64,
}

/// Résultat d'une migration d'état
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    pub from: Etat,
    pub to: Etat,
    pub updated: u64,
}

impl MigrationReport {
    pub fn summary_line(&self) -> String {
        format!(
            "🔄 {} gestionnaire(s) mis à jour ({} → {})",
            self.updated, self.from, self.to
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SeedOutcome {
    Created(Gestionnaire),
    AlreadyExists(Gestionnaire),
}

impl SeedOutcome {
    pub fn record(&self) -> &Gestionnaire {
        match self {
            SeedOutcome::Created(g) | SeedOutcome::AlreadyExists(g) => g,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, SeedOutcome::Created(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PromotionOutcome {
    Promoted(Gestionnaire),
    AlreadyAdmin(Gestionnaire),
    /// Aucun gestionnaire avec cet email; contient la liste existante pour affichage
    NotFound { existing: Vec<Gestionnaire> },
}
