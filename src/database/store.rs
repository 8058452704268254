// ==================== RECORD STORE ACCESSOR ====================
// Contrat d'accès à la collection des gestionnaires.
// Chaque appel = un aller-retour vers la base, atomique à ce niveau; aucune relance.

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};

use super::{MongoDB, DOSSIERS, GESTIONNAIRES};
use crate::models::{Gestionnaire, GestionnaireFilter, GestionnairePatch, NewGestionnaire, UniqueKey};
use crate::utils::error::AppResult;

#[async_trait]
pub trait GestionnaireStore: Send + Sync {
    async fn find_many(&self, filter: &GestionnaireFilter) -> AppResult<Vec<Gestionnaire>>;

    async fn find_unique(&self, key: &UniqueKey) -> AppResult<Option<Gestionnaire>>;

    async fn create(&self, new: NewGestionnaire) -> AppResult<Gestionnaire>;

    /// Retourne le nombre d'enregistrements modifiés
    async fn update_many(&self, filter: &GestionnaireFilter, patch: &GestionnairePatch) -> AppResult<u64>;

    /// Retourne le nombre d'enregistrements supprimés
    async fn delete_many(&self, filter: &GestionnaireFilter) -> AppResult<u64>;

    /// Remet à null le `gestionnaireId` des dossiers qui référencent ces gestionnaires
    async fn detach_dossiers(&self, gestionnaire_ids: &[String]) -> AppResult<u64>;
}

/// Traduit un filtre en requête MongoDB
pub fn filter_document(filter: &GestionnaireFilter) -> Document {
    match filter {
        GestionnaireFilter::All => doc! {},
        GestionnaireFilter::IdIn(ids) => doc! { "_id": { "$in": ids.clone() } },
        // `$or: []` est rejeté par le serveur
        GestionnaireFilter::NameContainsAny(variants) if variants.is_empty() => {
            doc! { "_id": { "$in": Bson::Array(vec![]) } }
        }
        GestionnaireFilter::NameContainsAny(variants) => {
            let clauses: Vec<Bson> = variants
                .iter()
                .flat_map(|v| {
                    // Pas d'option "i": sensible à la casse
                    let pattern = regex::escape(v);
                    [
                        Bson::Document(doc! { "prenom": { "$regex": pattern.clone() } }),
                        Bson::Document(doc! { "nom": { "$regex": pattern } }),
                    ]
                })
                .collect();
            doc! { "$or": clauses }
        }
        GestionnaireFilter::EtatEquals(etat) => doc! { "etat": etat.label() },
    }
}

pub fn unique_key_document(key: &UniqueKey) -> Document {
    match key {
        UniqueKey::Id(id) => doc! { "_id": id.as_str() },
        UniqueKey::Email(email) => doc! { "email": email.as_str() },
    }
}

/// `None` si le patch est vide (un `$set` vide est rejeté)
pub fn patch_document(patch: &GestionnairePatch) -> Option<Document> {
    let mut set = Document::new();
    if let Some(etat) = patch.etat {
        set.insert("etat", etat.label());
    }
    if let Some(role) = patch.role {
        set.insert("role", role.as_str());
    }
    if set.is_empty() {
        None
    } else {
        Some(doc! { "$set": set })
    }
}

#[async_trait]
impl GestionnaireStore for MongoDB {
    async fn find_many(&self, filter: &GestionnaireFilter) -> AppResult<Vec<Gestionnaire>> {
        let cursor = self
            .collection::<Gestionnaire>(GESTIONNAIRES)
            .find(filter_document(filter))
            .sort(doc! { "prenom": 1, "_id": 1 })
            .await?;
        let records: Vec<Gestionnaire> = cursor.try_collect().await?;
        Ok(records)
    }

    async fn find_unique(&self, key: &UniqueKey) -> AppResult<Option<Gestionnaire>> {
        Ok(self
            .collection::<Gestionnaire>(GESTIONNAIRES)
            .find_one(unique_key_document(key))
            .await?)
    }

    async fn create(&self, new: NewGestionnaire) -> AppResult<Gestionnaire> {
        let record = new.into_record(chrono::Utc::now().timestamp());
        self.collection::<Gestionnaire>(GESTIONNAIRES)
            .insert_one(&record)
            .await?;
        Ok(record)
    }

    async fn update_many(&self, filter: &GestionnaireFilter, patch: &GestionnairePatch) -> AppResult<u64> {
        let Some(update) = patch_document(patch) else {
            return Ok(0);
        };
        let result = self
            .collection::<Document>(GESTIONNAIRES)
            .update_many(filter_document(filter), update)
            .await?;
        Ok(result.modified_count)
    }

    async fn delete_many(&self, filter: &GestionnaireFilter) -> AppResult<u64> {
        let result = self
            .collection::<Document>(GESTIONNAIRES)
            .delete_many(filter_document(filter))
            .await?;
        Ok(result.deleted_count)
    }

    async fn detach_dossiers(&self, gestionnaire_ids: &[String]) -> AppResult<u64> {
        if gestionnaire_ids.is_empty() {
            return Ok(0);
        }
        let result = self
            .collection::<Document>(DOSSIERS)
            .update_many(
                doc! { "gestionnaireId": { "$in": gestionnaire_ids.to_vec() } },
                doc! { "$set": { "gestionnaireId": Bson::Null } },
            )
            .await?;
        Ok(result.modified_count)
    }
}
