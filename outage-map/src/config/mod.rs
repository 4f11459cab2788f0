//! Configuration du matching

use std::path::Path;

use anyhow::{Context, Result};
use areamatch::{CatalogConfig, MatchStrategy, ResolveOptions};
use serde::{Deserialize, Serialize};

/// Variable d'environnement forçant la stratégie
pub const ENV_STRATEGY: &str = "OUTAGE_MAP_STRATEGY";

/// Variable d'environnement activant ou non le repli par nom
pub const ENV_NAME_FALLBACK: &str = "OUTAGE_MAP_NAME_FALLBACK";

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Propriétés id/nom lues dans le GeoJSON des limites
    #[serde(flatten)]
    pub catalog: CatalogConfig,

    /// Stratégie d'intersection
    #[serde(default)]
    pub strategy: MatchStrategy,

    /// Repli par nom quand l'identifiant est inconnu du catalogue
    #[serde(default = "default_name_fallback")]
    pub name_fallback: bool,
}

fn default_name_fallback() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: CatalogConfig::default(),
            strategy: MatchStrategy::default(),
            name_fallback: true,
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "psgc" => Self::load_embedded(include_str!("presets/psgc.json")),
            "generic" => Self::load_embedded(include_str!("presets/generic.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: psgc, generic", preset),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }

    /// Preset embarqué si le nom est connu, sinon chemin vers un fichier JSON
    pub fn resolve(preset_or_path: &str) -> Result<Self> {
        match preset_or_path {
            "psgc" | "generic" => Self::from_preset(preset_or_path),
            path => Self::load(Path::new(path)),
        }
    }

    /// Applique les surcharges de l'environnement
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides<F>(&mut self, get: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = get(ENV_STRATEGY).filter(|v| !v.trim().is_empty()) {
            self.strategy = value
                .trim()
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context(format!("Invalid {}", ENV_STRATEGY))?;
        }

        if let Some(value) = get(ENV_NAME_FALLBACK).filter(|v| !v.trim().is_empty()) {
            self.name_fallback = parse_bool(&value)
                .with_context(|| format!("Invalid {}: {}", ENV_NAME_FALLBACK, value))?;
        }

        Ok(())
    }

    /// Options de résolution dérivées de la configuration
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            name_fallback: self.name_fallback,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
