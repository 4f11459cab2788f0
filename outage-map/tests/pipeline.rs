//! Tests d'intégration : chargement des fichiers, matching, export et rapport

use std::path::{Path, PathBuf};

use areamatch::MatchStrategy;
use outage_map::export::export_matches_geojson;
use outage_map::fingerprint::drawn_area_fingerprint;
use outage_map::pipeline::{load_drawn, load_inputs, process_drawn};
use outage_map::{Config, MatchReport, MatchStatus};

const REGIONS: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"type": "Feature", "properties": {"adm4_psgc": "B1", "adm4_en": "Alpha"},
         "geometry": {"type": "Polygon", "coordinates": [[[0,0],[10,0],[10,10],[0,10],[0,0]]]}},
        {"type": "Feature", "properties": {"adm4_psgc": "B2", "adm4_en": "BolilaÃ±o"},
         "geometry": {"type": "Polygon", "coordinates": [[[20,0],[30,0],[30,10],[20,10],[20,0]]]}},
        {"type": "Feature", "properties": {"adm4_psgc": "B3", "adm4_en": "Broken"},
         "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,1]]]}}
    ]
}"#;

const COVERAGE: &str = r#"[
    {"regionId": "B1", "feederId": "F1"},
    {"regionId": "B2", "feederId": "F2"}
]"#;

const DRAWN: &str = r#"{"type": "Polygon", "coordinates": [[[4,4],[6,4],[6,6],[4,6],[4,4]]]}"#;

/// Répertoire temporaire propre à un test
fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("outage_map_{}", name));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_end_to_end_from_files() {
    let dir = temp_dir("e2e");
    let regions = write(&dir, "regions.geojson", REGIONS);
    let coverage = write(&dir, "coverage.json", COVERAGE);
    let drawn_path = write(&dir, "drawn.geojson", DRAWN);

    let config = Config::default();
    let inputs = load_inputs(&regions, &coverage, None, &config).unwrap();
    assert_eq!(inputs.regions.regions.len(), 3);
    assert_eq!(inputs.regions_checksum.len(), 64);

    let drawn = load_drawn(&drawn_path).unwrap().unwrap();
    let result = process_drawn(&drawn, &inputs, &config);

    assert_eq!(result.affected.matched_region_ids, vec!["B1"]);
    assert_eq!(result.affected.affected_feeder_ids, vec!["F1"]);
    assert_eq!(result.skipped.len(), 1);
    assert_eq!(result.skipped[0].id, "B3");
    assert_eq!(result.fingerprint, drawn_area_fingerprint(&drawn));

    let mut report = MatchReport::new(config.strategy);
    report.record_catalog(inputs.regions.regions.len(), &inputs.regions.skipped);
    report.record_result("drawn.geojson", result.fingerprint.clone(), &result.affected, &result.skipped);
    report.finalize();
    assert_eq!(report.status, MatchStatus::PartialSuccess);

    let geojson = dir.join("matched.geojson");
    let written = export_matches_geojson(&inputs.regions.regions, &result.matches, &geojson).unwrap();
    assert_eq!(written, 1);
    let exported: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&geojson).unwrap()).unwrap();
    assert_eq!(exported["features"][0]["properties"]["name"], "Alpha");

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_barangay_export_as_coverage() {
    let dir = temp_dir("export_coverage");
    let regions = write(&dir, "regions.geojson", REGIONS);
    let coverage = write(
        &dir,
        "barangays.json",
        r#"[
            {"id": "ck01", "name": "Bolilaño", "psgcId": null,
             "FeederCoverage": [{"feeder": {"id": "F9"}}]},
            {"id": "ck02", "name": "Alpha", "psgcId": "B1",
             "FeederCoverage": [{"feeder": {"id": "F1"}}, {"feeder": {"id": "F3"}}]}
        ]"#,
    );
    let drawn_path = write(
        &dir,
        "drawn.geojson",
        r#"[
            {"type": "Polygon", "coordinates": [[[4,4],[6,4],[6,6],[4,4]]]},
            {"type": "Polygon", "coordinates": [[[24,4],[26,4],[26,6],[24,4]]]}
        ]"#,
    );

    let config = Config::default();
    let inputs = load_inputs(&regions, &coverage, None, &config).unwrap();
    assert_eq!(inputs.catalog.len(), 2);

    let drawn = load_drawn(&drawn_path).unwrap().unwrap();
    let result = process_drawn(&drawn, &inputs, &config);

    assert_eq!(result.affected.matched_region_ids, vec!["B1", "B2"]);
    assert_eq!(result.affected.matched_region_names, vec!["Alpha", "Bolilaño"]);
    assert_eq!(result.affected.affected_feeder_ids, vec!["F1", "F3", "F9"]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_strategy_and_fallback_from_config() {
    let dir = temp_dir("config");
    let regions = write(&dir, "regions.geojson", REGIONS);
    let coverage = write(&dir, "coverage.json", r#"[{"regionId": "X2", "feederId": "F2"}]"#);
    let catalog = write(&dir, "catalog.json", r#"[{"id": "X2", "name": "Bolilaño"}]"#);
    let drawn_path = write(
        &dir,
        "drawn.geojson",
        r#"{"type": "Polygon", "coordinates": [[[18,-2],[22,-2],[22,12],[18,12],[18,-2]]]}"#,
    );
    let config_path = write(
        &dir,
        "config.json",
        r#"{"strategy": "exact", "name_fallback": false}"#,
    );

    let drawn = load_drawn(&drawn_path).unwrap().unwrap();

    let strict = Config::resolve(config_path.to_str().unwrap()).unwrap();
    assert_eq!(strict.strategy, MatchStrategy::Exact);
    let inputs = load_inputs(&regions, &coverage, Some(catalog.as_path()), &strict).unwrap();
    let result = process_drawn(&drawn, &inputs, &strict);
    assert_eq!(result.affected.matched_region_ids, vec!["B2"]);
    assert!(result.affected.affected_feeder_ids.is_empty());
    assert_eq!(result.affected.unresolved_region_ids, vec!["B2"]);

    let lenient = Config::default();
    let result = process_drawn(&drawn, &inputs, &lenient);
    assert_eq!(result.affected.affected_feeder_ids, vec!["F2"]);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_missing_and_invalid_files() {
    let dir = temp_dir("invalid");
    let regions = write(&dir, "regions.geojson", REGIONS);
    let bad_coverage = write(&dir, "coverage.json", r#"{"not": "a table"}"#);
    let point = write(&dir, "point.geojson", r#"{"type": "Point", "coordinates": [1, 2]}"#);
    let empty = write(&dir, "empty.geojson", "null");

    let config = Config::default();
    assert!(load_inputs(&regions, &bad_coverage, None, &config).is_err());
    assert!(load_inputs(&dir.join("missing.geojson"), &bad_coverage, None, &config).is_err());
    assert!(load_drawn(&point).is_err());
    assert!(load_drawn(&empty).unwrap().is_none());

    std::fs::remove_dir_all(&dir).ok();
}
