// ==================== DUPLICATE CANDIDATE FINDER ====================
// Recherche les gestionnaires dont le prénom ou le nom contient une des
// variantes connues. Aucune décision automatique: la liste est relue à la main.

use crate::{
    database::GestionnaireStore,
    models::{Gestionnaire, GestionnaireFilter},
    utils::error::AppResult,
};

/// Un seul `find_many` avec le OU des variantes.
/// Correspondance littérale et sensible à la casse ("souad" ne trouve pas "Souad").
pub async fn find_candidates<S>(store: &S, variants: &[String]) -> AppResult<Vec<Gestionnaire>>
where
    S: GestionnaireStore + ?Sized,
{
    if variants.is_empty() {
        log::warn!("⚠️  No name variants configured, nothing to search");
        return Ok(Vec::new());
    }

    log::info!("🔍 Searching duplicate candidates for {:?}", variants);

    let candidates = store
        .find_many(&GestionnaireFilter::NameContainsAny(variants.to_vec()))
        .await?;

    log::info!("   {} candidate(s) found", candidates.len());
    Ok(candidates)
}

pub fn candidate_line(g: &Gestionnaire) -> String {
    format!(
        "ID: {} | Prénom: {} | Nom: {} | Service: {} | Email: {}",
        g.id,
        g.first_name,
        g.last_name.as_deref().unwrap_or("-"),
        g.service_id,
        g.email.as_deref().unwrap_or("-"),
    )
}
