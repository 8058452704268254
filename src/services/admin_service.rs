// Promotion d'un gestionnaire existant au rôle ADMIN

use crate::{
    database::GestionnaireStore,
    models::{GestionnaireFilter, GestionnairePatch, PromotionOutcome, Role, UniqueKey},
    utils::error::{AppError, AppResult},
};

pub async fn promote_admin<S>(store: &S, email: &str) -> AppResult<PromotionOutcome>
where
    S: GestionnaireStore + ?Sized,
{
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::InvalidRequest("Email requis".into()));
    }

    let Some(gestionnaire) = store.find_unique(&UniqueKey::Email(email.to_string())).await? else {
        log::warn!("❌ No gestionnaire with email {}", email);
        let existing = store.find_many(&GestionnaireFilter::All).await?;
        return Ok(PromotionOutcome::NotFound { existing });
    };

    if gestionnaire.role.is_admin() {
        log::info!("✅ {} is already {}", email, gestionnaire.role);
        return Ok(PromotionOutcome::AlreadyAdmin(gestionnaire));
    }

    store
        .update_many(
            &GestionnaireFilter::IdIn(vec![gestionnaire.id.clone()]),
            &GestionnairePatch::role(Role::Admin),
        )
        .await?;

    log::info!("🎉 {} promoted: {} → ADMIN", email, gestionnaire.role);

    let mut promoted = gestionnaire;
    promoted.role = Role::Admin;
    Ok(PromotionOutcome::Promoted(promoted))
}
