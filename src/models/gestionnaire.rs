use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::AppError;

/// Rôle d'un gestionnaire dans l'application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }
}

/// `role` absent ou null dans les anciens documents: USER
fn role_or_user<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Role>::deserialize(deserializer)?.unwrap_or_default())
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// État d'un gestionnaire.
///
/// Enregistré sous son libellé ("En cours", "Actif", "Inactif").
/// `EnCours` est l'ancienne valeur, remplacée par `Actif`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Etat {
    #[serde(rename = "En cours")]
    EnCours,
    #[serde(rename = "Actif")]
    Actif,
    #[serde(rename = "Inactif")]
    Inactif,
}

impl Etat {
    pub const ALL: [Etat; 3] = [Etat::EnCours, Etat::Actif, Etat::Inactif];

    pub fn label(self) -> &'static str {
        match self {
            Etat::EnCours => "En cours",
            Etat::Actif => "Actif",
            Etat::Inactif => "Inactif",
        }
    }
}

impl fmt::Display for Etat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Etat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Etat::ALL
            .into_iter()
            .find(|etat| etat.label() == s.trim())
            .ok_or_else(|| {
                AppError::InvalidRequest(format!(
                    "État inconnu '{}' (attendu: En cours, Actif, Inactif)",
                    s
                ))
            })
    }
}

/// Horaire de travail habituel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoraireHabituel {
    pub name: String,
    /// Début, "HH:MM"
    pub start: String,
    /// Fin, "HH:MM"
    pub end: String,
    /// Pause en minutes
    pub pause: u32,
    /// Durée standard en minutes
    pub standard_duration: u32,
}

impl Default for HoraireHabituel {
    fn default() -> Self {
        Self {
            name: "Horaire flottant particulier".into(),
            start: "09:00".into(),
            end: "17:00".into(),
            pause: 30,
            standard_duration: 450, // 7h30
        }
    }
}

/// Gestionnaire (stocké dans MongoDB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gestionnaire {
    /// Identifiant opaque, immuable
    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "prenom")]
    pub first_name: String,

    #[serde(rename = "nom", default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Unique lorsqu'il est présent (index sparse, donc jamais sérialisé à null)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "role_or_user")]
    pub role: Role,

    #[serde(rename = "serviceId")]
    pub service_id: String,

    #[serde(rename = "isActive")]
    pub is_active: bool,

    /// Absent sur les enregistrements créés avant l'introduction du champ
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etat: Option<Etat>,

    #[serde(rename = "horaireHabituel", default)]
    pub horaire_habituel: HoraireHabituel,

    /// Timestamp de création (Unix)
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,

    /// Timestamp de dernière mise à jour
    #[serde(rename = "updatedAt", default)]
    pub updated_at: i64,
}

/// Données de création d'un gestionnaire
#[derive(Debug, Clone)]
pub struct NewGestionnaire {
    /// Généré (UUID v4) si absent
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub service_id: String,
    pub is_active: bool,
    pub etat: Etat,
    pub horaire_habituel: HoraireHabituel,
}

impl NewGestionnaire {
    pub fn into_record(self, now: i64) -> Gestionnaire {
        Gestionnaire {
            id: self.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role: self.role,
            service_id: self.service_id,
            is_active: self.is_active,
            etat: Some(self.etat),
            horaire_habituel: self.horaire_habituel,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Prédicat de recherche sur la collection `gestionnaires`.
///
/// `IdIn(vec![])` ne correspond à aucun enregistrement.
#[derive(Debug, Clone, PartialEq)]
pub enum GestionnaireFilter {
    All,
    IdIn(Vec<String>),
    /// Prénom ou nom contient au moins une des sous-chaînes (sensible à la casse)
    NameContainsAny(Vec<String>),
    EtatEquals(Etat),
}

impl GestionnaireFilter {
    pub fn matches(&self, g: &Gestionnaire) -> bool {
        match self {
            GestionnaireFilter::All => true,
            GestionnaireFilter::IdIn(ids) => ids.iter().any(|id| *id == g.id),
            GestionnaireFilter::NameContainsAny(variants) => variants.iter().any(|v| {
                g.first_name.contains(v.as_str())
                    || g.last_name.as_deref().is_some_and(|nom| nom.contains(v.as_str()))
            }),
            GestionnaireFilter::EtatEquals(etat) => g.etat == Some(*etat),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UniqueKey {
    Id(String),
    Email(String),
}

impl UniqueKey {
    pub fn matches(&self, g: &Gestionnaire) -> bool {
        match self {
            UniqueKey::Id(id) => g.id == *id,
            UniqueKey::Email(email) => g.email.as_deref() == Some(email.as_str()),
        }
    }
}

/// Champs modifiables par `update_many`; `None` = inchangé
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GestionnairePatch {
    pub etat: Option<Etat>,
    pub role: Option<Role>,
}

impl GestionnairePatch {
    pub fn etat(etat: Etat) -> Self {
        Self { etat: Some(etat), ..Default::default() }
    }

    pub fn role(role: Role) -> Self {
        Self { role: Some(role), ..Default::default() }
    }

    pub fn apply(&self, g: &mut Gestionnaire) {
        if let Some(etat) = self.etat {
            g.etat = Some(etat);
        }
        if let Some(role) = self.role {
            g.role = role;
        }
    }
}
