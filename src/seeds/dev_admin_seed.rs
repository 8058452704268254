use crate::database::GestionnaireStore;
use crate::models::{Etat, HoraireHabituel, NewGestionnaire, Role, SeedOutcome, UniqueKey};
use crate::utils::error::AppResult;

/// Gestionnaire administrateur bien connu, utilisé uniquement hors production.
#[derive(Debug, Clone)]
pub struct DevSeed {
    pub id: &'static str,
    pub email: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub service_id: &'static str,
}

impl DevSeed {
    pub fn default_admin() -> Self {
        Self {
            id: "dev-admin-1",
            email: "admin@dev.local",
            first_name: "Admin",
            last_name: "Développement",
            service_id: "default",
        }
    }

    /// Variante pour le service Médiation
    pub fn mediation_admin() -> Self {
        Self {
            id: "dev-mediation-1",
            email: "mediation@dev.local",
            first_name: "Admin",
            last_name: "Médiation",
            service_id: "mediation",
        }
    }

    fn to_new(&self) -> NewGestionnaire {
        NewGestionnaire {
            id: Some(self.id.to_string()),
            first_name: self.first_name.to_string(),
            last_name: Some(self.last_name.to_string()),
            email: Some(self.email.to_string()),
            role: Role::SuperAdmin,
            service_id: self.service_id.to_string(),
            is_active: true,
            etat: Etat::Actif,
            horaire_habituel: HoraireHabituel::default(),
        }
    }
}

/// Crée le gestionnaire seulement s'il n'existe pas déjà (recherche par email).
/// Les exécutions suivantes n'écrivent rien.
pub async fn seed_dev_admin<S>(store: &S, seed: &DevSeed) -> AppResult<SeedOutcome>
where
    S: GestionnaireStore + ?Sized,
{
    if let Some(existing) = store
        .find_unique(&UniqueKey::Email(seed.email.to_string()))
        .await?
    {
        log::info!("🌱 {} already exists, skipping seed", seed.email);
        return Ok(SeedOutcome::AlreadyExists(existing));
    }

    log::info!("🌱 Seeding {} ({})...", seed.email, seed.service_id);
    let created = store.create(seed.to_new()).await?;
    log::info!("   ✅ Created gestionnaire {}", created.id);

    Ok(SeedOutcome::Created(created))
}

pub fn summary_line(outcome: &SeedOutcome) -> String {
    let g = outcome.record();
    let email = g.email.as_deref().unwrap_or("-");
    if outcome.was_created() {
        format!("✅ Gestionnaire créé: {} ({})", email, g.role)
    } else {
        format!("✅ Email déjà présent: {} ({})", email, g.role)
    }
}
