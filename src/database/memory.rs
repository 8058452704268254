//! Store en mémoire pour les tests: même contrat que MongoDB, écritures comptées.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::store::GestionnaireStore;
use crate::models::{Gestionnaire, GestionnaireFilter, GestionnairePatch, NewGestionnaire, UniqueKey};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Dossier {
    pub id: String,
    pub gestionnaire_id: Option<String>,
}

#[derive(Default)]
pub struct InMemoryStore {
    gestionnaires: Mutex<Vec<Gestionnaire>>,
    dossiers: Mutex<Vec<Dossier>>,
    writes: AtomicUsize,
    fail: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(records: Vec<Gestionnaire>) -> Self {
        Self {
            gestionnaires: Mutex::new(records),
            ..Self::default()
        }
    }

    /// Chaque appel échoue, comme une base injoignable
    pub fn unreachable() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub async fn add_dossier(&self, id: &str, gestionnaire_id: Option<&str>) {
        self.dossiers.lock().await.push(Dossier {
            id: id.to_string(),
            gestionnaire_id: gestionnaire_id.map(String::from),
        });
    }

    pub async fn snapshot(&self) -> Vec<Gestionnaire> {
        self.gestionnaires.lock().await.clone()
    }

    pub async fn dossiers(&self) -> Vec<Dossier> {
        self.dossiers.lock().await.clone()
    }

    /// Nombre d'appels d'écriture ayant effectivement modifié des données
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn check(&self) -> AppResult<()> {
        if self.fail {
            return Err(AppError::DatabaseError("server selection timeout".into()));
        }
        Ok(())
    }

    fn record_write(&self, changed: u64) {
        if changed > 0 {
            self.writes.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[async_trait]
impl GestionnaireStore for InMemoryStore {
    async fn find_many(&self, filter: &GestionnaireFilter) -> AppResult<Vec<Gestionnaire>> {
        self.check()?;
        Ok(self
            .gestionnaires
            .lock()
            .await
            .iter()
            .filter(|g| filter.matches(g))
            .cloned()
            .collect())
    }

    async fn find_unique(&self, key: &UniqueKey) -> AppResult<Option<Gestionnaire>> {
        self.check()?;
        Ok(self
            .gestionnaires
            .lock()
            .await
            .iter()
            .find(|g| key.matches(g))
            .cloned())
    }

    async fn create(&self, new: NewGestionnaire) -> AppResult<Gestionnaire> {
        self.check()?;
        let record = new.into_record(chrono::Utc::now().timestamp());
        let mut all = self.gestionnaires.lock().await;
        let conflict = all.iter().any(|g| {
            g.id == record.id || (record.email.is_some() && g.email == record.email)
        });
        if conflict {
            return Err(AppError::DatabaseError(format!(
                "E11000 duplicate key: {}",
                record.id
            )));
        }
        all.push(record.clone());
        self.record_write(1);
        Ok(record)
    }

    async fn update_many(&self, filter: &GestionnaireFilter, patch: &GestionnairePatch) -> AppResult<u64> {
        self.check()?;
        let mut changed = 0;
        for g in self.gestionnaires.lock().await.iter_mut().filter(|g| filter.matches(g)) {
            let before = g.clone();
            patch.apply(g);
            if *g != before {
                changed += 1;
            }
        }
        self.record_write(changed);
        Ok(changed)
    }

    async fn delete_many(&self, filter: &GestionnaireFilter) -> AppResult<u64> {
        self.check()?;
        let mut all = self.gestionnaires.lock().await;
        let before = all.len();
        all.retain(|g| !filter.matches(g));
        let deleted = (before - all.len()) as u64;
        self.record_write(deleted);
        Ok(deleted)
    }

    async fn detach_dossiers(&self, gestionnaire_ids: &[String]) -> AppResult<u64> {
        self.check()?;
        let mut changed = 0;
        for d in self.dossiers.lock().await.iter_mut() {
            if d.gestionnaire_id.as_ref().is_some_and(|gid| gestionnaire_ids.contains(gid)) {
                d.gestionnaire_id = None;
                changed += 1;
            }
        }
        self.record_write(changed);
        Ok(changed)
    }
}

/// Fabrique un gestionnaire de test
pub fn gestionnaire(id: &str, prenom: &str, nom: Option<&str>, etat: crate::models::Etat) -> Gestionnaire {
    NewGestionnaire {
        id: Some(id.to_string()),
        first_name: prenom.to_string(),
        last_name: nom.map(String::from),
        email: Some(format!("{}@cpas.test", id)),
        role: crate::models::Role::User,
        service_id: "default".to_string(),
        is_active: true,
        etat,
        horaire_habituel: Default::default(),
    }
    .into_record(0)
}
