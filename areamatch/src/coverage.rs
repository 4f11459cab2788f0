//! Résolution des feeders desservant les régions touchées

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::text::normalize_name;
use crate::types::{AffectedArea, CatalogRegion, CoverageLink, RegionMatch};

/// Options du resolver
#[derive(Debug, Clone, Copy)]
pub struct ResolveOptions {
    /// Chercher par nom quand l'identifiant est inconnu du catalogue
    pub name_fallback: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            name_fallback: true,
        }
    }
}

/// Manière dont une région a été retrouvée dans le catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    ById,
    ByName,
}

/// Retrouve une région du catalogue par identifiant, sinon par nom
///
/// Les identifiants du GeoJSON (PSGC) et ceux de la base ne concordent pas
/// toujours, d'où le repli par nom : égalité insensible à la casse d'abord,
/// puis inclusion dans un sens ou dans l'autre. Un nom vide ne correspond à rien.
pub fn lookup_region<'a>(
    catalog: &'a [CatalogRegion],
    id: &str,
    name: &str,
    name_fallback: bool,
) -> Option<(&'a CatalogRegion, Lookup)> {
    if let Some(found) = catalog.iter().find(|c| c.match_key() == id) {
        return Some((found, Lookup::ById));
    }

    if !name_fallback {
        return None;
    }

    let wanted = normalize_name(name);
    if wanted.is_empty() {
        return None;
    }

    let normalized: Vec<(usize, String)> = catalog
        .iter()
        .enumerate()
        .map(|(i, c)| (i, normalize_name(&c.name)))
        .filter(|(_, n)| !n.is_empty())
        .collect();

    normalized
        .iter()
        .find(|(_, n)| *n == wanted)
        .or_else(|| {
            normalized
                .iter()
                .find(|(_, n)| n.contains(&wanted) || wanted.contains(n.as_str()))
        })
        .map(|(i, _)| (&catalog[*i], Lookup::ByName))
}

/// Index région -> feeders, dans l'ordre de la table
pub struct CoverageIndex<'a> {
    feeders_by_region: HashMap<&'a str, Vec<&'a str>>,
}

impl<'a> CoverageIndex<'a> {
    pub fn new(links: &'a [CoverageLink]) -> Self {
        let mut feeders_by_region: HashMap<&str, Vec<&str>> = HashMap::new();
        for link in links {
            feeders_by_region
                .entry(link.region_id.as_str())
                .or_default()
                .push(link.feeder_id.as_str());
        }
        Self { feeders_by_region }
    }

    /// Feeders desservant une région (vide si aucun)
    pub fn feeders(&self, region_id: &str) -> &[&'a str] {
        self.feeders_by_region
            .get(region_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Résout les feeders des régions touchées, avec repli par nom
pub fn resolve_coverage(
    matched: &[RegionMatch],
    catalog: &[CatalogRegion],
    links: &[CoverageLink],
) -> AffectedArea {
    resolve_coverage_with(matched, catalog, links, ResolveOptions::default())
}

/// Comme [`resolve_coverage`], avec options explicites
///
/// Les régions touchées sont conservées même sans feeder, pour distinguer
/// "aucune région" de "régions sans feeder configuré".
pub fn resolve_coverage_with(
    matched: &[RegionMatch],
    catalog: &[CatalogRegion],
    links: &[CoverageLink],
    options: ResolveOptions,
) -> AffectedArea {
    let index = CoverageIndex::new(links);
    let mut seen: HashSet<&str> = HashSet::new();
    let mut result = AffectedArea::default();

    for region in matched {
        result.matched_region_ids.push(region.id.clone());
        result.matched_region_names.push(region.name.clone());

        let Some((entry, lookup)) =
            lookup_region(catalog, &region.id, &region.name, options.name_fallback)
        else {
            debug!(region_id = %region.id, name = %region.name, "Region not found in catalog");
            result.unresolved_region_ids.push(region.id.clone());
            continue;
        };

        if lookup == Lookup::ByName {
            debug!(
                region_id = %region.id,
                catalog_id = %entry.id,
                "Region resolved by name"
            );
        }

        for &feeder in index.feeders(&entry.id) {
            if seen.insert(feeder) {
                result.affected_feeder_ids.push(feeder.to_string());
            }
        }
    }

    result
}
