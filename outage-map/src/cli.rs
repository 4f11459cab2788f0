//! Définition et implémentation des commandes CLI
//!
//! - `match`: une zone dessinée → barangays et feeders touchés
//! - `batch`: un lot de zones (glob), en parallèle, doublons ignorés
//! - `catalog`: liste alphabétique des barangays d'un GeoJSON de limites

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use areamatch::catalog::{barangay_dataset, load_regions};
use areamatch::{AffectedArea, DrawnArea, MatchStrategy};
use clap::Subcommand;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};

use outage_map::export::export_matches_geojson;
use outage_map::fingerprint::drawn_area_fingerprint;
use outage_map::pipeline::{load_drawn, load_inputs, process_drawn};
use outage_map::{Config, MatchReport};

#[derive(Subcommand)]
pub enum Commands {
    /// Find the barangays and feeders affected by one drawn area
    Match {
        /// Boundary GeoJSON (FeatureCollection of barangays)
        #[arg(short, long)]
        regions: PathBuf,

        /// Coverage table [{regionId, feederId}] or barangay export with FeederCoverage
        #[arg(short, long)]
        coverage: PathBuf,

        /// Drawn area (geometry, array of geometries, Feature or FeatureCollection)
        #[arg(short, long)]
        drawn: PathBuf,

        /// Persisted barangay catalog [{id, name, psgcId?}]
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config preset name (psgc/generic) or path to a JSON config
        #[arg(long, default_value = "psgc")]
        config: String,

        /// Match strategy: heuristic, bounds, exact (overrides config and env)
        #[arg(long)]
        strategy: Option<MatchStrategy>,

        /// Output JSON file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write matched barangays as a GeoJSON FeatureCollection
        #[arg(long)]
        geojson: Option<PathBuf>,

        /// Write a JSON match report
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Match every drawn area of a glob pattern, one result file per area
    Batch {
        #[arg(short, long)]
        regions: PathBuf,

        #[arg(short, long)]
        coverage: PathBuf,

        /// Glob pattern of drawn areas (e.g. "drafts/*.geojson")
        #[arg(short, long)]
        drawn: String,

        #[arg(long)]
        catalog: Option<PathBuf>,

        #[arg(long, default_value = "psgc")]
        config: String,

        #[arg(long)]
        strategy: Option<MatchStrategy>,

        /// Output directory for result files
        #[arg(short, long)]
        output: PathBuf,

        /// Maximum number of drawn areas processed concurrently
        #[arg(long, alias = "threads")]
        jobs: Option<usize>,

        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Extract the alphabetical barangay dataset from a boundary GeoJSON
    Catalog {
        #[arg(short, long)]
        regions: PathBuf,

        #[arg(long, default_value = "psgc")]
        config: String,

        /// Output JSON file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Configuration : preset ou fichier, puis environnement, puis option CLI
pub fn load_config(preset_or_path: &str, strategy: Option<MatchStrategy>) -> Result<Config> {
    let mut config = Config::resolve(preset_or_path)?;
    config.apply_env()?;
    if let Some(strategy) = strategy {
        config.strategy = strategy;
    }
    Ok(config)
}

/// Exécute la commande match
#[allow(clippy::too_many_arguments)]
pub fn cmd_match(
    regions_path: &Path,
    coverage_path: &Path,
    drawn_path: &Path,
    catalog_path: Option<&Path>,
    config_name: &str,
    strategy: Option<MatchStrategy>,
    output: Option<&Path>,
    geojson: Option<&Path>,
    report_path: Option<&Path>,
) -> Result<()> {
    let start = Instant::now();
    let config = load_config(config_name, strategy)?;
    let inputs = load_inputs(regions_path, coverage_path, catalog_path, &config)?;

    let mut report = MatchReport::new(config.strategy);
    report.catalog_checksum = Some(inputs.regions_checksum.clone());
    report.record_catalog(inputs.regions.regions.len(), &inputs.regions.skipped);

    let source = drawn_path.display().to_string();
    let affected = match load_drawn(drawn_path)? {
        Some(drawn) => {
            let result = process_drawn(&drawn, &inputs, &config);
            info!(
                fingerprint = %result.fingerprint,
                regions = result.affected.matched_region_ids.len(),
                feeders = result.affected.affected_feeder_ids.len(),
                "Drawn area matched"
            );

            if let Some(path) = geojson {
                let written = export_matches_geojson(&inputs.regions.regions, &result.matches, path)?;
                info!(path = %path.display(), features = written, "GeoJSON written");
            }

            report.record_result(&source, result.fingerprint, &result.affected, &result.skipped);
            result.affected
        }
        None => {
            warn!(path = %source, "No drawn area in file, nothing to match");
            AffectedArea::default()
        }
    };

    write_json(&affected, output)?;

    report.set_duration(start.elapsed());
    report.finalize();
    if let Some(path) = report_path {
        report.save_to_file(path)?;
        info!(path = %path.display(), "{}", report.summary());
    }

    Ok(())
}

/// Exécute la commande batch
#[allow(clippy::too_many_arguments)]
pub fn cmd_batch(
    regions_path: &Path,
    coverage_path: &Path,
    pattern: &str,
    catalog_path: Option<&Path>,
    config_name: &str,
    strategy: Option<MatchStrategy>,
    output: &Path,
    jobs: Option<usize>,
    report_path: Option<&Path>,
) -> Result<MatchReport> {
    let start = Instant::now();
    let files = collect_drawn_files(pattern)?;
    if files.is_empty() {
        anyhow::bail!("No drawn area files match {}", pattern);
    }

    let jobs = jobs.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    });

    let config = load_config(config_name, strategy)?;
    let inputs = load_inputs(regions_path, coverage_path, catalog_path, &config)?;
    std::fs::create_dir_all(output)
        .context(format!("Failed to create output directory: {}", output.display()))?;

    println!("=== Batch match ===");
    println!("Drawn areas: {}", files.len());
    println!("Strategy: {:?}", config.strategy);
    println!("Jobs: {}", jobs);

    let mut report = MatchReport::new(config.strategy);
    report.catalog_checksum = Some(inputs.regions_checksum.clone());
    report.record_catalog(inputs.regions.regions.len(), &inputs.regions.skipped);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .context("Failed to build thread pool")?;

    let loaded: Vec<(PathBuf, Result<Option<DrawnArea>>)> = pool.install(|| {
        files
            .par_iter()
            .map(|path| (path.clone(), load_drawn(path)))
            .collect()
    });

    // Les doublons sont écartés dans l'ordre des fichiers
    let mut seen = HashSet::new();
    let mut used_names = HashSet::new();
    let mut unique = Vec::new();
    for (path, drawn) in loaded {
        let source = path.display().to_string();
        match drawn {
            Ok(Some(drawn)) => {
                let fingerprint = drawn_area_fingerprint(&drawn);
                if seen.insert(fingerprint.clone()) {
                    let name = unique_output_name(&path, &fingerprint, &mut used_names);
                    if name != output_name(&path) {
                        warn!(path = %source, output = %name, "Output name already taken, renamed");
                        report.record_renamed(&source, &format!("{}.json", name));
                    }
                    unique.push((path, drawn, name));
                } else {
                    info!(path = %source, "Duplicate drawn area, skipped");
                    report.record_duplicate();
                }
            }
            Ok(None) => {
                warn!(path = %source, "No drawn area in file");
                report.record_failure(&source, "no drawn area");
            }
            Err(e) => {
                warn!(path = %source, error = %e, "Failed to load drawn area");
                report.record_failure(&source, &format!("{:#}", e));
            }
        }
    }

    let results: Vec<_> = pool.install(|| {
        unique
            .par_iter()
            .map(|(path, drawn, name)| {
                let result = process_drawn(drawn, &inputs, &config);
                let target = output.join(format!("{}.json", name));
                let written = write_json(&result.affected, Some(target.as_path()));
                (path, result, written)
            })
            .collect()
    });

    for (path, result, written) in results {
        let source = path.display().to_string();
        match written {
            Ok(()) => {
                report.record_result(&source, result.fingerprint, &result.affected, &result.skipped)
            }
            Err(e) => report.record_failure(&source, &format!("{:#}", e)),
        }
    }

    report.set_duration(start.elapsed());
    report.finalize();
    report.display();

    if let Some(path) = report_path {
        report.save_to_file(path)?;
        println!("Report saved to {}", path.display());
    }

    Ok(report)
}

/// Exécute la commande catalog
pub fn cmd_catalog(regions_path: &Path, config_name: &str, output: &Path) -> Result<()> {
    let config = load_config(config_name, None)?;
    let catalog = load_regions(regions_path, &config.catalog)
        .with_context(|| format!("Failed to load regions from {}", regions_path.display()))?;

    let dataset = barangay_dataset(&catalog.regions);
    write_json(&dataset, Some(output))?;

    println!(
        "Catalog complete: {} barangays to {} ({} skipped)",
        dataset.barangay.len(),
        output.display(),
        catalog.skipped.len()
    );

    Ok(())
}

/// Fichiers correspondant au motif, triés
fn collect_drawn_files(pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob::glob(pattern)
        .context(format!("Invalid glob pattern: {}", pattern))?
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Unreadable path");
                None
            }
        })
        .collect();
    files.sort();
    Ok(files)
}

/// Nom de sortie d'une zone : nom de fichier sans extension
fn output_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "drawn".to_string())
}

/// Nom de sortie libre : le nom de fichier, sinon suffixé par l'empreinte
fn unique_output_name(path: &Path, fingerprint: &str, used: &mut HashSet<String>) -> String {
    let stem = output_name(path);
    if used.insert(stem.clone()) {
        return stem;
    }

    let short = &fingerprint[..fingerprint.len().min(12)];
    let mut name = format!("{}-{}", stem, short);
    let mut index = 2;
    while !used.insert(name.clone()) {
        name = format!("{}-{}-{}", stem, short, index);
        index += 1;
    }
    name
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match output {
        Some(path) => std::fs::write(path, json)
            .context(format!("Failed to write {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(())
}
