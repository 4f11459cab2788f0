//! Rapport de matching avec dégradation gracieuse
//!
//! Collecte les régions écartées, les régions non résolues et les fichiers en
//! échec d'un passage `match` ou `batch`, puis en déduit un statut global.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use areamatch::types::SkippedRegion;
use areamatch::{AffectedArea, MatchStrategy};
use serde::Serialize;

/// Statut global du passage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStatus {
    /// Tout a été traité sans anomalie
    Success,
    /// Résultats produits malgré des anomalies non fatales
    PartialSuccess,
    /// Aucun résultat exploitable
    Failed,
}

/// Niveau de sévérité
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IssueLevel {
    /// Fichier de zone inexploitable
    Error,
    /// Région écartée ou non résolue
    Warning,
}

/// Anomalie avec contexte
#[derive(Debug, Clone, Serialize)]
pub struct MatchIssue {
    pub level: IssueLevel,
    /// Fichier de zone concerné (optionnel)
    pub source: Option<String>,
    /// Région concernée (optionnelle)
    pub region_id: Option<String>,
    pub message: String,
}

/// Rapport complet
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub strategy: MatchStrategy,
    pub duration_secs: f64,
    pub status: MatchStatus,

    /// Somme de contrôle du catalogue des limites
    pub catalog_checksum: Option<String>,

    /// Nombre de régions du catalogue
    pub regions_loaded: usize,
    /// Features du catalogue écartées au chargement
    pub regions_skipped: usize,

    /// Zones traitées
    pub drawn_processed: usize,
    /// Zones ignorées car déjà vues (même empreinte)
    pub drawn_duplicates: usize,
    /// Zones en échec
    pub drawn_failed: usize,
    /// Fichiers de sortie renommés (même nom de fichier en entrée)
    pub outputs_renamed: usize,

    /// Empreintes des zones traitées
    pub fingerprints: Vec<String>,

    pub regions_matched: usize,
    pub feeders_affected: usize,

    pub issues: Vec<MatchIssue>,
}

impl MatchReport {
    pub fn new(strategy: MatchStrategy) -> Self {
        Self {
            strategy,
            duration_secs: 0.0,
            status: MatchStatus::Success,
            catalog_checksum: None,
            regions_loaded: 0,
            regions_skipped: 0,
            drawn_processed: 0,
            drawn_duplicates: 0,
            drawn_failed: 0,
            outputs_renamed: 0,
            fingerprints: Vec::new(),
            regions_matched: 0,
            feeders_affected: 0,
            issues: Vec::new(),
        }
    }

    /// Enregistre le chargement du catalogue
    pub fn record_catalog(&mut self, loaded: usize, skipped: &[SkippedRegion]) {
        self.regions_loaded = loaded;
        self.regions_skipped = skipped.len();
        for s in skipped {
            self.issues.push(MatchIssue {
                level: IssueLevel::Warning,
                source: None,
                region_id: Some(s.id.clone()),
                message: s.reason.clone(),
            });
        }
    }

    /// Enregistre le résultat d'une zone
    pub fn record_result(
        &mut self,
        source: &str,
        fingerprint: String,
        result: &AffectedArea,
        skipped: &[SkippedRegion],
    ) {
        self.drawn_processed += 1;
        self.fingerprints.push(fingerprint);
        self.regions_matched += result.matched_region_ids.len();
        self.feeders_affected += result.affected_feeder_ids.len();

        for id in &result.unresolved_region_ids {
            self.issues.push(MatchIssue {
                level: IssueLevel::Warning,
                source: Some(source.to_string()),
                region_id: Some(id.clone()),
                message: "region not found in catalog".to_string(),
            });
        }
        for s in skipped {
            self.issues.push(MatchIssue {
                level: IssueLevel::Warning,
                source: Some(source.to_string()),
                region_id: Some(s.id.clone()),
                message: s.reason.clone(),
            });
        }
    }

    /// Enregistre une zone déjà traitée
    pub fn record_duplicate(&mut self) {
        self.drawn_duplicates += 1;
    }

    /// Enregistre un fichier de sortie renommé pour éviter un écrasement
    pub fn record_renamed(&mut self, source: &str, output: &str) {
        self.outputs_renamed += 1;
        self.issues.push(MatchIssue {
            level: IssueLevel::Warning,
            source: Some(source.to_string()),
            region_id: None,
            message: format!("output name already taken, written to {}", output),
        });
    }

    /// Enregistre une zone en échec
    pub fn record_failure(&mut self, source: &str, message: &str) {
        self.drawn_failed += 1;
        self.issues.push(MatchIssue {
            level: IssueLevel::Error,
            source: Some(source.to_string()),
            region_id: None,
            message: message.to_string(),
        });
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        let has_issues = !self.issues.is_empty();

        self.status = if self.drawn_processed == 0 && self.drawn_failed > 0 {
            MatchStatus::Failed
        } else if has_issues {
            MatchStatus::PartialSuccess
        } else {
            MatchStatus::Success
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("MATCH REPORT - strategy {:?}", self.strategy);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);
        if let Some(ref checksum) = self.catalog_checksum {
            println!("Catalog: {}", checksum);
        }

        println!("\n--- SUMMARY ---");
        println!(
            "Regions: {} loaded, {} skipped",
            self.regions_loaded, self.regions_skipped
        );
        println!(
            "Drawn areas: {} processed, {} duplicates, {} failed, {} renamed outputs",
            self.drawn_processed, self.drawn_duplicates, self.drawn_failed, self.outputs_renamed
        );
        println!(
            "Matches: {} regions, {} feeders",
            self.regions_matched, self.feeders_affected
        );

        if !self.issues.is_empty() {
            println!("\n--- ISSUES ({}) ---", self.issues.len());
            for issue in self.issues.iter().take(20) {
                let location = match (&issue.source, &issue.region_id) {
                    (Some(s), Some(id)) => format!("[{}:{}]", s, id),
                    (Some(s), None) => format!("[{}]", s),
                    (None, Some(id)) => format!("[{}]", id),
                    _ => String::new(),
                };
                println!("  {:?} {} {}", issue.level, location, issue.message);
            }
            if self.issues.len() > 20 {
                println!("  ... and {} more", self.issues.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact
    pub fn summary(&self) -> String {
        format!(
            "{} drawn areas: {} regions, {} feeders, {} issues",
            self.drawn_processed,
            self.regions_matched,
            self.feeders_affected,
            self.issues.len()
        )
    }
}
