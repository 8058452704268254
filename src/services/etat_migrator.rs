// ==================== ETAT MIGRATION ====================
// Réécrit les anciennes valeurs d'état vers leur valeur canonique.
// Seul le champ `etat` est touché.

use std::collections::BTreeMap;

use crate::{
    database::GestionnaireStore,
    models::{Etat, GestionnaireFilter, GestionnairePatch, MigrationReport},
    utils::error::{AppError, AppResult},
};

/// Correspondance totale `Etat -> Etat`; identité pour les états non listés.
///
/// Chaque cible doit être un point fixe, sinon une seconde exécution
/// modifierait encore des enregistrements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtatMapping {
    targets: BTreeMap<Etat, Etat>,
}

impl EtatMapping {
    pub fn new<I>(pairs: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (Etat, Etat)>,
    {
        let mut targets = BTreeMap::new();
        for (from, to) in pairs {
            if from == to {
                continue;
            }
            if let Some(previous) = targets.insert(from, to) {
                if previous != to {
                    return Err(AppError::InvalidRequest(format!(
                        "État '{}' migré vers '{}' et '{}'",
                        from, previous, to
                    )));
                }
            }
        }

        let mapping = Self { targets };
        for (from, to) in &mapping.targets {
            if mapping.target(*to) != *to {
                return Err(AppError::InvalidRequest(format!(
                    "Chaîne de migration '{}' → '{}' → '{}'",
                    from,
                    to,
                    mapping.target(*to)
                )));
            }
        }
        Ok(mapping)
    }

    /// "En cours" → "Actif"
    pub fn legacy() -> Self {
        Self {
            targets: BTreeMap::from([(Etat::EnCours, Etat::Actif)]),
        }
    }

    pub fn target(&self, from: Etat) -> Etat {
        self.targets.get(&from).copied().unwrap_or(from)
    }

    /// Paires qui changent réellement quelque chose, dans l'ordre de `Etat`
    pub fn changes(&self) -> impl Iterator<Item = (Etat, Etat)> + '_ {
        Etat::ALL
            .into_iter()
            .map(|etat| (etat, self.target(etat)))
            .filter(|(from, to)| from != to)
    }
}

/// Un seul `update_many`: `etat == from` → `etat = to`.
pub async fn migrate_etat<S>(store: &S, from: Etat, to: Etat) -> AppResult<MigrationReport>
where
    S: GestionnaireStore + ?Sized,
{
    if from == to {
        log::info!("🔄 '{}' → '{}': nothing to migrate", from, to);
        return Ok(MigrationReport { from, to, updated: 0 });
    }

    log::info!("🔄 Migrating etat '{}' → '{}'", from, to);

    let updated = store
        .update_many(&GestionnaireFilter::EtatEquals(from), &GestionnairePatch::etat(to))
        .await?;

    log::info!("   ✅ {} gestionnaire(s) updated", updated);
    Ok(MigrationReport { from, to, updated })
}

pub async fn apply_mapping<S>(store: &S, mapping: &EtatMapping) -> AppResult<Vec<MigrationReport>>
where
    S: GestionnaireStore + ?Sized,
{
    let mut reports = Vec::new();
    for (from, to) in mapping.changes() {
        reports.push(migrate_etat(store, from, to).await?);
    }
    Ok(reports)
}

/// Nombre de gestionnaires par état (tous les états présents, même à zéro).
/// La clé `None` compte les enregistrements sans champ `etat`.
pub async fn etat_summary<S>(store: &S) -> AppResult<BTreeMap<Option<Etat>, usize>>
where
    S: GestionnaireStore + ?Sized,
{
    let mut summary: BTreeMap<Option<Etat>, usize> = Etat::ALL
        .into_iter()
        .map(|e| (Some(e), 0))
        .chain([(None, 0)])
        .collect();
    for g in store.find_many(&GestionnaireFilter::All).await? {
        *summary.entry(g.etat).or_default() += 1;
    }
    Ok(summary)
}

/// Libellé affiché pour une clé du résumé
pub fn summary_label(etat: Option<Etat>) -> &'static str {
    etat.map_or("Non renseigné", Etat::label)
}
