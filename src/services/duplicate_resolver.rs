// ==================== DUPLICATE RESOLVER ====================
// Supprime une liste d'identifiants déjà vérifiés à la main.
// Suppression définitive: pas de corbeille, pas d'annulation.

use std::collections::BTreeSet;

use crate::{
    database::GestionnaireStore,
    models::{DeletionReport, GestionnaireFilter},
    utils::error::AppResult,
};

/// Supprime les gestionnaires `ids` en un seul `delete_many`.
///
/// - identifiants opaques, comparés tels quels (aucun `trim`)
/// - identifiants vides ou répétés ignorés; liste vide = aucun appel à la base
/// - identifiants inconnus ignorés silencieusement
/// - `detach_dossiers`: les dossiers qui pointent vers ces gestionnaires sont
///   d'abord détachés (`gestionnaireId` à null), comme le fait la suppression
///   unitaire dans l'application
pub async fn resolve_duplicates<S>(
    store: &S,
    ids: &[String],
    detach_dossiers: bool,
) -> AppResult<DeletionReport>
where
    S: GestionnaireStore + ?Sized,
{
    let ids: Vec<String> = ids
        .iter()
        .filter(|id| !id.is_empty())
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    if ids.is_empty() {
        log::info!("🗑️  No identifiers supplied, nothing deleted");
        return Ok(DeletionReport::default());
    }

    log::info!("🗑️  Deleting {} gestionnaire(s): {:?}", ids.len(), ids);

    let detached = if detach_dossiers {
        let detached = store.detach_dossiers(&ids).await?;
        if detached > 0 {
            log::info!("   ↳ {} dossier(s) detached", detached);
        }
        detached
    } else {
        0
    };

    let requested = ids.len();
    let deleted = store.delete_many(&GestionnaireFilter::IdIn(ids)).await?;

    log::info!("   ✅ {} deleted ({} requested)", deleted, requested);

    Ok(DeletionReport {
        requested,
        deleted,
        detached,
    })
}

pub fn summary_line(report: &DeletionReport) -> String {
    let mut line = format!("🗑️  {} gestionnaire(s) supprimé(s)", report.deleted);
    if report.detached > 0 {
        line.push_str(&format!(", {} dossier(s) détaché(s)", report.detached));
    }
    line
}
