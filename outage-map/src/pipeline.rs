//! Chargement des entrées et calcul de la zone touchée

use std::path::Path;

use anyhow::{Context, Result};
use areamatch::catalog::{load_catalog_regions, load_regions, parse_barangay_export, parse_coverage};
use areamatch::types::SkippedRegion;
use areamatch::{
    resolve_coverage_with, AffectedArea, CatalogRegion, CoverageLink, DrawnArea, RegionCatalog,
    RegionMatch, RegionMatcher,
};
use tracing::{debug, info};

use crate::config::Config;
use crate::fingerprint::{drawn_area_fingerprint, file_checksum};

/// Catalogues chargés, partagés en lecture seule entre les zones
#[derive(Debug)]
pub struct Inputs {
    pub regions: RegionCatalog,
    pub catalog: Vec<CatalogRegion>,
    pub links: Vec<CoverageLink>,
    pub regions_checksum: String,
}

/// Résultat pour une zone dessinée
#[derive(Debug, Clone)]
pub struct DrawnResult {
    pub fingerprint: String,
    pub affected: AffectedArea,
    pub matches: Vec<RegionMatch>,
    pub skipped: Vec<SkippedRegion>,
}

/// Charge limites, couverture et catalogue optionnel
///
/// Le fichier de couverture peut être une table `[{regionId, feederId}]` ou
/// l'export de l'API barangays (avec `FeederCoverage`), qui fournit aussi le
/// catalogue. À défaut, le catalogue est dérivé des limites.
pub fn load_inputs(
    regions_path: &Path,
    coverage_path: &Path,
    catalog_path: Option<&Path>,
    config: &Config,
) -> Result<Inputs> {
    let regions = load_regions(regions_path, &config.catalog)
        .with_context(|| format!("Failed to load regions from {}", regions_path.display()))?;
    let regions_checksum = file_checksum(regions_path)?;

    let (exported_catalog, links) = load_coverage_file(coverage_path)?;

    let catalog = match (catalog_path, exported_catalog) {
        (Some(path), _) => load_catalog_regions(path)
            .with_context(|| format!("Failed to load catalog from {}", path.display()))?,
        (None, Some(exported)) => exported,
        (None, None) => regions.to_catalog_regions(),
    };

    info!(
        regions = regions.regions.len(),
        catalog = catalog.len(),
        links = links.len(),
        "Inputs loaded"
    );

    Ok(Inputs {
        regions,
        catalog,
        links,
        regions_checksum,
    })
}

fn load_coverage_file(path: &Path) -> Result<(Option<Vec<CatalogRegion>>, Vec<CoverageLink>)> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read coverage file: {}", path.display()))?;

    match parse_coverage(&content) {
        Ok(links) => Ok((None, links)),
        Err(table_err) => {
            debug!(error = %table_err, "Not a coverage table, trying barangay export");
            let (catalog, links) = parse_barangay_export(&content).with_context(|| {
                format!(
                    "Failed to parse coverage file {} ({})",
                    path.display(),
                    table_err
                )
            })?;
            Ok((Some(catalog), links))
        }
    }
}

/// Lit une zone dessinée depuis un fichier, `None` si le fichier ne contient aucune zone
pub fn load_drawn(path: &Path) -> Result<Option<DrawnArea>> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read drawn area: {}", path.display()))?;
    DrawnArea::from_json_str(&content)
        .with_context(|| format!("Invalid drawn area in {}", path.display()))
}

/// Calcule la zone touchée par une zone dessinée
pub fn process_drawn(drawn: &DrawnArea, inputs: &Inputs, config: &Config) -> DrawnResult {
    let outcome = RegionMatcher::with_strategy(config.strategy)
        .find_affected_regions(drawn, &inputs.regions.regions);
    let affected = resolve_coverage_with(
        &outcome.matches,
        &inputs.catalog,
        &inputs.links,
        config.resolve_options(),
    );

    DrawnResult {
        fingerprint: drawn_area_fingerprint(drawn),
        affected,
        matches: outcome.matches,
        skipped: outcome.skipped,
    }
}
