//! Brouillon d'interruption : validation et sélection des feeders
//!
//! Quand l'opérateur trace une zone, les feeders détectés sont ajoutés à sa
//! sélection existante ; il peut ensuite en retirer.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::types::{AffectedArea, DrawnArea};
use crate::AreaMatchError;

/// Longueur maximale de la description
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Nombre maximal de feeders par interruption
pub const MAX_FEEDERS: usize = 50;

/// Type d'interruption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterruptionKind {
    Scheduled,
    Unscheduled,
    Emergency,
}

/// Brouillon tel que reçu du formulaire
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterruptionDraft {
    #[serde(rename = "type")]
    pub kind: InterruptionKind,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub feeder_ids: Vec<String>,

    /// Zone dessinée, sous n'importe quelle forme acceptée par [`DrawnArea::from_json`]
    #[serde(default)]
    pub polygon: JsonValue,

    #[serde(default)]
    pub custom_area: bool,
}

/// Brouillon validé et normalisé
#[derive(Debug, Clone)]
pub struct ValidatedInterruption {
    pub kind: InterruptionKind,
    pub description: Option<String>,
    pub feeder_ids: Vec<String>,
    pub area: Option<DrawnArea>,
    pub custom_area: bool,
}

fn feeder_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)^c[^\s-]{8,}$").expect("valid feeder id regex"))
}

/// Vérifie qu'un identifiant de feeder a le format cuid
pub fn is_valid_feeder_id(id: &str) -> bool {
    feeder_id_pattern().is_match(id)
}

impl InterruptionDraft {
    pub fn from_json_str(json: &str) -> Result<Self, AreaMatchError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Valide le brouillon et normalise sa zone
    pub fn validate(self) -> Result<ValidatedInterruption, AreaMatchError> {
        let description = self
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        if let Some(ref d) = description {
            if d.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(AreaMatchError::validation(
                    "description",
                    format!("must not exceed {} characters", MAX_DESCRIPTION_LEN),
                ));
            }
        }

        if self.feeder_ids.is_empty() {
            return Err(AreaMatchError::validation(
                "feederIds",
                "at least one feeder must be selected",
            ));
        }
        if self.feeder_ids.len() > MAX_FEEDERS {
            return Err(AreaMatchError::validation(
                "feederIds",
                format!("cannot select more than {} feeders at once", MAX_FEEDERS),
            ));
        }
        if let Some(bad) = self.feeder_ids.iter().find(|id| !is_valid_feeder_id(id)) {
            return Err(AreaMatchError::validation(
                "feederIds",
                format!("invalid feeder ID format: {}", bad),
            ));
        }

        let area = DrawnArea::from_json(&self.polygon)?;

        Ok(ValidatedInterruption {
            kind: self.kind,
            description,
            feeder_ids: dedup_preserving_order(self.feeder_ids),
            area,
            custom_area: self.custom_area,
        })
    }
}

/// Ajoute les feeders détectés à la sélection, sans doublon, sélection d'abord
pub fn merge_affected_feeders(selected: &[String], affected: &AffectedArea) -> Vec<String> {
    dedup_preserving_order(
        selected
            .iter()
            .chain(affected.affected_feeder_ids.iter())
            .cloned()
            .collect(),
    )
}

fn dedup_preserving_order(ids: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}
