pub mod store;

#[cfg(test)]
pub mod memory;

pub use store::GestionnaireStore;

use std::future::Future;
use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::config::DatabaseConfig;
use crate::utils::error::AppResult;

pub const GESTIONNAIRES: &str = "gestionnaires";
pub const DOSSIERS: &str = "users";

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.url).await?;

        // Exécution ponctuelle: un petit pool suffit
        client_options.max_pool_size = Some(4);
        client_options.min_pool_size = Some(0);
        client_options.app_name = Some("gestionnaire-reconcile".to_string());

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(&config.name);

        // Test connection
        db.run_command(doc! { "ping": 1 }).await?;
        log::info!("✅ MongoDB connected ({})", config.name);

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Crée les index utilisés par les opérations de réconciliation
    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("🔧 Creating database indexes...");

        let gestionnaires = self.collection::<mongodb::bson::Document>(GESTIONNAIRES);

        // Unicité de l'email seulement lorsqu'il est renseigné
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).sparse(true).build())
            .build();

        match gestionnaires.create_index(email_index).await {
            Ok(_) => log::info!("   ✅ Index created: gestionnaires(email) unique sparse"),
            Err(e) => log::warn!("   ⚠️  Index gestionnaires(email) not created: {}", e),
        }

        let etat_index = IndexModel::builder().keys(doc! { "etat": 1 }).build();

        match gestionnaires.create_index(etat_index).await {
            Ok(_) => log::info!("   ✅ Index created: gestionnaires(etat)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        let dossiers = self.collection::<mongodb::bson::Document>(DOSSIERS);
        let dossier_index = IndexModel::builder().keys(doc! { "gestionnaireId": 1 }).build();

        match dossiers.create_index(dossier_index).await {
            Ok(_) => log::info!("   ✅ Index created: users(gestionnaireId)"),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Ferme le pool; attend la libération des curseurs et sessions en cours
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        log::debug!("🔌 MongoDB connection closed");
    }
}

/// Ouvre une connexion, exécute `work`, puis ferme la connexion quelle que soit l'issue.
pub async fn with_store<T, F, Fut>(config: &DatabaseConfig, work: F) -> AppResult<T>
where
    F: FnOnce(MongoDB) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let db = MongoDB::connect(config).await?;
    scoped(db, work, MongoDB::shutdown).await
}

/// Exécute `work` sur `handle`, puis `release`, que `work` réussisse ou non.
/// Le résultat de `work` est rendu tel quel.
pub async fn scoped<H, T, F, Fut, R, RFut>(handle: H, work: F, release: R) -> AppResult<T>
where
    H: Clone,
    F: FnOnce(H) -> Fut,
    Fut: Future<Output = AppResult<T>>,
    R: FnOnce(H) -> RFut,
    RFut: Future<Output = ()>,
{
    let outcome = work(handle.clone()).await;
    release(handle).await;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GestionnaireFilter, UniqueKey};
    use crate::utils::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn release(counter: Arc<AtomicUsize>) {
        counter.fetch_add(1, Ordering::SeqCst);
    }

    #[tokio::test]
    async fn test_release_runs_when_work_fails() {
        let released = Arc::new(AtomicUsize::new(0));

        let outcome: AppResult<()> = scoped(
            released.clone(),
            |_| async { Err(AppError::DatabaseError("write rejected".into())) },
            release,
        )
        .await;

        assert!(matches!(outcome, Err(AppError::DatabaseError(ref m)) if m == "write rejected"));
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_release_runs_once_after_success() {
        let released = Arc::new(AtomicUsize::new(0));

        let outcome = scoped(
            released.clone(),
            |counter| async move { Ok(counter.load(Ordering::SeqCst)) },
            release,
        )
        .await;

        // `work` voit la ressource avant sa libération
        assert_eq!(outcome.unwrap(), 0);
        assert_eq!(released.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB to be running
    async fn test_mongodb_connection() {
        dotenv::dotenv().ok();
        let _ = env_logger::builder().is_test(true).try_init();

        let config = crate::config::AppConfig::from_env().unwrap();
        let found = with_store(&config.database, |db| async move {
            let all = db.find_many(&GestionnaireFilter::All).await?;
            let missing = db
                .find_unique(&UniqueKey::Id("does-not-exist".into()))
                .await?;
            Ok((all.len(), missing.is_none()))
        })
        .await;

        let (_, missing) = found.unwrap();
        assert!(missing);
    }
}
