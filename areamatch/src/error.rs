//! Types d'erreurs pour le crate areamatch

use thiserror::Error;

/// Erreurs pouvant survenir à la frontière du crate (parsing, validation)
///
/// Le matcher et le resolver ne retournent jamais d'erreur : une région
/// malformée est ignorée et tracée, elle ne fait pas échouer le calcul.
#[derive(Debug, Error)]
pub enum AreaMatchError {
    /// Erreur d'I/O lors de la lecture d'un catalogue
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON illisible
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Géométrie malformée (coordonnées manquantes, mauvaise imbrication)
    #[error("Malformed geometry for {entity_id}: {reason}")]
    MalformedGeometry { entity_id: String, reason: String },

    /// Type de géométrie non supporté (seuls Polygon et MultiPolygon le sont)
    #[error("Unsupported geometry type: {0}")]
    UnsupportedGeometry(String),

    /// Zone dessinée inexploitable
    #[error("Invalid drawn area: {0}")]
    InvalidDrawnArea(String),

    /// Catalogue de régions ou table de couverture invalide
    #[error("Invalid catalog {source_name}: {reason}")]
    InvalidCatalog { source_name: String, reason: String },

    /// Champ invalide dans un brouillon d'interruption
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },
}

impl AreaMatchError {
    /// Crée une erreur de géométrie malformée avec contexte
    pub fn malformed(entity_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedGeometry {
            entity_id: entity_id.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de catalogue avec contexte
    pub fn invalid_catalog(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Crée une erreur de validation sur un champ
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
