//! État des barangays sur la carte publique
//!
//! Un barangay est "en interruption" si l'un des feeders qui le desservent a
//! une interruption en cours, et "filtré" s'il correspond aux filtres de feeders
//! ou d'interruptions choisis par l'utilisateur.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::coverage::{lookup_region, CoverageIndex};
use crate::types::{CatalogRegion, CoverageLink};

/// Lien interruption -> feeder interrompu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterruptedFeeder {
    pub interruption_id: String,
    pub feeder_id: String,
}

impl InterruptedFeeder {
    pub fn new(interruption_id: impl Into<String>, feeder_id: impl Into<String>) -> Self {
        Self {
            interruption_id: interruption_id.into(),
            feeder_id: feeder_id.into(),
        }
    }
}

/// Filtres de la carte publique
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapFilters {
    #[serde(default)]
    pub feeders: Vec<String>,
    #[serde(default)]
    pub interruptions: Vec<String>,
}

impl MapFilters {
    pub fn is_empty(&self) -> bool {
        self.feeders.is_empty() && self.interruptions.is_empty()
    }
}

/// Vue de l'état des barangays, construite une fois par rafraîchissement
pub struct MapStatus<'a> {
    catalog: &'a [CatalogRegion],
    coverage: CoverageIndex<'a>,
    interruptions_by_feeder: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> MapStatus<'a> {
    pub fn new(
        catalog: &'a [CatalogRegion],
        links: &'a [CoverageLink],
        interrupted: &'a [InterruptedFeeder],
    ) -> Self {
        let mut interruptions_by_feeder: HashMap<&str, Vec<&str>> = HashMap::new();
        for i in interrupted {
            interruptions_by_feeder
                .entry(i.feeder_id.as_str())
                .or_default()
                .push(i.interruption_id.as_str());
        }

        Self {
            catalog,
            coverage: CoverageIndex::new(links),
            interruptions_by_feeder,
        }
    }

    /// Feeders d'un barangay de la carte, retrouvé par PSGC puis par nom
    pub fn region_feeders(&self, psgc_id: &str, name: &str) -> Option<&[&'a str]> {
        let (entry, _) = lookup_region(self.catalog, psgc_id, name, true)?;
        Some(self.coverage.feeders(&entry.id))
    }

    fn feeder_interruptions(&self, feeder_id: &str) -> &[&'a str] {
        self.interruptions_by_feeder
            .get(feeder_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Un des feeders du barangay a-t-il une interruption ?
    pub fn has_active_interruption(&self, psgc_id: &str, name: &str) -> bool {
        self.region_feeders(psgc_id, name)
            .map(|feeders| {
                feeders
                    .iter()
                    .any(|f| !self.feeder_interruptions(f).is_empty())
            })
            .unwrap_or(false)
    }

    /// Le barangay correspond-il aux filtres ?
    ///
    /// Des filtres vides ne retiennent aucun barangay.
    pub fn is_region_filtered(&self, psgc_id: &str, name: &str, filters: &MapFilters) -> bool {
        let Some(feeders) = self.region_feeders(psgc_id, name) else {
            return false;
        };

        if feeders
            .iter()
            .any(|f| filters.feeders.iter().any(|wanted| wanted == f))
        {
            return true;
        }

        feeders.iter().any(|f| {
            self.feeder_interruptions(f)
                .iter()
                .any(|i| filters.interruptions.iter().any(|wanted| wanted == i))
        })
    }
}
