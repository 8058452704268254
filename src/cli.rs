//! Commandes de maintenance de l'annuaire des gestionnaires.
//!
//! Chaque commande ouvre sa propre connexion, exécute un seul workflow,
//! affiche son rapport puis libère la connexion.

use std::io::Write;

use clap::{Args, Parser, Subcommand};

use crate::config::AppConfig;
use crate::database::{self, GestionnaireStore};
use crate::models::{Etat, PromotionOutcome};
use crate::seeds::dev_admin_seed::{self, DevSeed};
use crate::services::{admin_service, duplicate_finder, duplicate_resolver, etat_migrator, EtatMapping};
use crate::utils::error::{AppError, AppResult};

/// Réconciliation de l'annuaire des gestionnaires (doublons, états, seed dev)
#[derive(Debug, Parser)]
#[command(name = "gestionnaire-reconcile")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List gestionnaires whose first or last name contains a known variant
    FindDuplicates(FindDuplicatesArgs),

    /// Delete gestionnaires by identifier (already reviewed)
    DeleteDuplicates(DeleteDuplicatesArgs),

    /// Rewrite a superseded etat value to its replacement
    MigrateEtat(MigrateEtatArgs),

    /// Count gestionnaires per etat
    EtatSummary(EtatSummaryArgs),

    /// Ensure the development administrator exists (never in production)
    SeedDev(SeedDevArgs),

    /// Give the ADMIN role to an existing gestionnaire
    PromoteAdmin(PromoteAdminArgs),
}

#[derive(Debug, Args)]
pub struct FindDuplicatesArgs {
    /// Name substring, case-sensitive (repeatable; defaults to DUPLICATE_NAME_VARIANTS)
    #[arg(long = "variant", value_name = "TEXT")]
    pub variants: Vec<String>,

    /// Print candidates as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct DeleteDuplicatesArgs {
    /// Identifiers to delete
    #[arg(value_name = "ID")]
    pub ids: Vec<String>,

    /// Do not detach dossiers pointing at the deleted gestionnaires
    #[arg(long)]
    pub keep_dossiers: bool,

    /// Print the deletion report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct MigrateEtatArgs {
    /// Source etat (default: every legacy value)
    #[arg(long, requires = "to")]
    pub from: Option<Etat>,

    /// Target etat
    #[arg(long, requires = "from")]
    pub to: Option<Etat>,

    /// Print the migration reports as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct EtatSummaryArgs {
    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct SeedDevArgs {
    /// Seed the Médiation administrator instead of the default one
    #[arg(long)]
    pub mediation: bool,
}

#[derive(Debug, Args)]
pub struct PromoteAdminArgs {
    /// Email of the gestionnaire to promote
    pub email: String,
}

/// Point d'entrée: garde de contexte, puis exécution dans une connexion dédiée.
pub async fn execute(command: Command, config: &AppConfig) -> AppResult<()> {
    if matches!(command, Command::SeedDev(_)) && config.is_production() {
        return Err(AppError::Refused(
            "seed-dev is disabled when APP_ENV=production".into(),
        ));
    }

    database::with_store(&config.database, |db| async move {
        let mut out = std::io::stdout();
        run(&db, command, config, &mut out).await
    })
    .await
}

/// Exécute une commande contre un store déjà ouvert et écrit le rapport dans `out`.
pub async fn run<S, W>(store: &S, command: Command, config: &AppConfig, out: &mut W) -> AppResult<()>
where
    S: GestionnaireStore + ?Sized,
    W: Write,
{
    match command {
        Command::FindDuplicates(args) => {
            let variants = if args.variants.is_empty() {
                config.duplicate_variants.clone()
            } else {
                args.variants
            };
            let candidates = duplicate_finder::find_candidates(store, &variants).await?;
            if args.json {
                writeln!(out, "{}", serde_json::to_string_pretty(&candidates)?)?;
            } else {
                for g in &candidates {
                    writeln!(out, "{}", duplicate_finder::candidate_line(g))?;
                }
                writeln!(out, "📋 {} candidat(s)", candidates.len())?;
            }
        }

        Command::DeleteDuplicates(args) => {
            let report =
                duplicate_resolver::resolve_duplicates(store, &args.ids, !args.keep_dossiers).await?;
            if args.json {
                writeln!(out, "{}", serde_json::to_string(&report)?)?;
            } else {
                writeln!(out, "{}", duplicate_resolver::summary_line(&report))?;
            }
        }

        Command::MigrateEtat(args) => {
            let reports = match (args.from, args.to) {
                (Some(from), Some(to)) => vec![etat_migrator::migrate_etat(store, from, to).await?],
                (None, None) => etat_migrator::apply_mapping(store, &EtatMapping::legacy()).await?,
                _ => {
                    return Err(AppError::InvalidRequest(
                        "--from and --to must be given together".into(),
                    ))
                }
            };
            if args.json {
                writeln!(out, "{}", serde_json::to_string(&reports)?)?;
            } else {
                for report in &reports {
                    writeln!(out, "{}", report.summary_line())?;
                }
            }
        }

        Command::EtatSummary(args) => {
            let summary = etat_migrator::etat_summary(store).await?;
            if args.json {
                let labelled: serde_json::Map<String, serde_json::Value> = summary
                    .iter()
                    .map(|(etat, count)| {
                        (etat_migrator::summary_label(*etat).to_string(), serde_json::Value::from(*count))
                    })
                    .collect();
                writeln!(out, "{}", serde_json::Value::Object(labelled))?;
            } else {
                writeln!(out, "📊 Résumé des états:")?;
                for (etat, count) in &summary {
                    writeln!(out, "   {}: {} gestionnaire(s)", etat_migrator::summary_label(*etat), count)?;
                }
            }
        }

        Command::SeedDev(args) => {
            let seed = if args.mediation {
                DevSeed::mediation_admin()
            } else {
                DevSeed::default_admin()
            };
            let outcome = dev_admin_seed::seed_dev_admin(store, &seed).await?;
            writeln!(out, "{}", dev_admin_seed::summary_line(&outcome))?;
        }

        Command::PromoteAdmin(args) => match admin_service::promote_admin(store, &args.email).await? {
            PromotionOutcome::Promoted(g) => {
                writeln!(out, "🎉 {} {} est maintenant ADMIN", g.first_name, g.last_name.as_deref().unwrap_or(""))?;
            }
            PromotionOutcome::AlreadyAdmin(g) => {
                writeln!(out, "✅ {} est déjà administrateur ({})", args.email, g.role)?;
            }
            PromotionOutcome::NotFound { existing } => {
                writeln!(out, "❌ Aucun gestionnaire trouvé avec l'email: {}", args.email)?;
                writeln!(out, "📋 Gestionnaires existants:")?;
                for g in &existing {
                    writeln!(
                        out,
                        "  - {} ({} {}) - Rôle: {}",
                        g.email.as_deref().unwrap_or("-"),
                        g.first_name,
                        g.last_name.as_deref().unwrap_or(""),
                        g.role
                    )?;
                }
            }
        },
    }

    out.flush()?;
    Ok(())
}
