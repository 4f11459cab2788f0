//! Chargement des catalogues (limites, barangays, couverture)
//!
//! Le GeoJSON des limites est lu feature par feature : une feature dont la
//! géométrie est mal imbriquée est ignorée avec un warning, les autres sont
//! conservées. Les anneaux dégradés mais bien imbriqués sont laissés au
//! matcher, qui les écarte lui-même.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::geometry::Bounds;
use crate::text::{fix_encoding, normalize_name};
use crate::types::{AreaGeometry, CatalogRegion, CoverageLink, Position, Region, Ring, SkippedRegion};
use crate::AreaMatchError;

/// Clés des propriétés lues dans le GeoJSON des limites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Propriété portant l'identifiant stable
    #[serde(default = "default_id_property")]
    pub id_property: String,

    /// Propriété portant le nom affiché
    #[serde(default = "default_name_property")]
    pub name_property: String,
}

fn default_id_property() -> String {
    "adm4_psgc".to_string()
}

fn default_name_property() -> String {
    "adm4_en".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            id_property: default_id_property(),
            name_property: default_name_property(),
        }
    }
}

/// Régions chargées et features écartées
#[derive(Debug, Default)]
pub struct RegionCatalog {
    pub regions: Vec<Region>,
    pub skipped: Vec<SkippedRegion>,
}

impl RegionCatalog {
    /// Vue "base de données" du catalogue, quand aucun autre n'est fourni
    pub fn to_catalog_regions(&self) -> Vec<CatalogRegion> {
        self.regions.iter().map(CatalogRegion::from).collect()
    }
}

/// Charge les limites depuis un fichier GeoJSON (FeatureCollection)
pub fn load_regions(path: &Path, config: &CatalogConfig) -> Result<RegionCatalog, AreaMatchError> {
    let content = std::fs::read_to_string(path)?;
    let catalog = parse_regions(&content, config)?;
    info!(
        path = %path.display(),
        regions = catalog.regions.len(),
        skipped = catalog.skipped.len(),
        "Region catalog loaded"
    );
    Ok(catalog)
}

/// Parse une FeatureCollection de limites administratives
///
/// Les features sans identifiant ou sans nom sont ignorées silencieusement,
/// comme dans le jeu de données d'origine.
pub fn parse_regions(json: &str, config: &CatalogConfig) -> Result<RegionCatalog, AreaMatchError> {
    let root: JsonValue = serde_json::from_str(json)?;

    let features = match root.get("features").and_then(JsonValue::as_array) {
        Some(f) => f,
        None => {
            return Err(AreaMatchError::invalid_catalog(
                "regions",
                "expected a FeatureCollection with a features array",
            ))
        }
    };

    let mut catalog = RegionCatalog::default();

    for (index, feature) in features.iter().enumerate() {
        let properties = feature.get("properties");
        let id = properties
            .and_then(|p| p.get(&config.id_property))
            .and_then(property_to_string);
        let name = properties
            .and_then(|p| p.get(&config.name_property))
            .and_then(property_to_string);

        let (Some(id), Some(name)) = (id, name) else {
            continue;
        };

        let Some(geometry) = feature.get("geometry").filter(|g| !g.is_null()) else {
            warn!(index, region_id = %id, "Feature without geometry, skipped");
            catalog.skipped.push(SkippedRegion {
                id,
                reason: "missing geometry".to_string(),
            });
            continue;
        };

        match parse_area_geometry(geometry, &id) {
            Ok(area) => {
                let bounds = feature
                    .get("bbox")
                    .or_else(|| geometry.get("bbox"))
                    .and_then(parse_bbox);
                let mut region = Region::new(id, fix_encoding(&name).into_owned(), area);
                region.bounds = bounds;
                catalog.regions.push(region);
            }
            Err(e) => {
                warn!(index, region_id = %id, error = %e, "Feature with malformed geometry, skipped");
                catalog.skipped.push(SkippedRegion {
                    id,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(catalog)
}

/// Lit une géométrie GeoJSON brute de façon tolérante
///
/// Une position contenant une valeur non numérique est conservée vide, une
/// position tronquée est conservée telle quelle : toutes deux seront ignorées
/// à la lecture. Une imbrication incorrecte est une erreur.
pub fn parse_area_geometry(value: &JsonValue, entity_id: &str) -> Result<AreaGeometry, AreaMatchError> {
    let geometry_type = value
        .get("type")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| AreaMatchError::malformed(entity_id, "missing geometry type"))?;

    match geometry_type {
        "Polygon" => {
            let coords = coordinates(value, entity_id)?;
            Ok(AreaGeometry::polygon(parse_polygon(coords, entity_id)?))
        }
        "MultiPolygon" => {
            let coords = coordinates(value, entity_id)?;
            let polygons = as_array(coords, entity_id, "multipolygon")?
                .iter()
                .map(|p| parse_polygon(p, entity_id))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(AreaGeometry::multi_polygon(polygons))
        }
        "GeometryCollection" => {
            let geometries = value
                .get("geometries")
                .and_then(JsonValue::as_array)
                .ok_or_else(|| AreaMatchError::malformed(entity_id, "missing geometries"))?;
            let mut polygons = Vec::new();
            for g in geometries {
                polygons.extend(parse_area_geometry(g, entity_id)?.polygons);
            }
            Ok(AreaGeometry::multi_polygon(polygons))
        }
        other => Err(AreaMatchError::UnsupportedGeometry(other.to_string())),
    }
}

fn coordinates<'a>(value: &'a JsonValue, entity_id: &str) -> Result<&'a JsonValue, AreaMatchError> {
    value
        .get("coordinates")
        .ok_or_else(|| AreaMatchError::malformed(entity_id, "missing coordinates"))
}

fn as_array<'a>(
    value: &'a JsonValue,
    entity_id: &str,
    level: &str,
) -> Result<&'a Vec<JsonValue>, AreaMatchError> {
    value
        .as_array()
        .ok_or_else(|| AreaMatchError::malformed(entity_id, format!("{} is not an array", level)))
}

fn parse_polygon(value: &JsonValue, entity_id: &str) -> Result<Vec<Ring>, AreaMatchError> {
    as_array(value, entity_id, "polygon")?
        .iter()
        .map(|ring| {
            as_array(ring, entity_id, "ring")?
                .iter()
                .map(|p| parse_position(p, entity_id))
                .collect::<Result<Ring, _>>()
        })
        .collect()
}

fn parse_position(value: &JsonValue, entity_id: &str) -> Result<Position, AreaMatchError> {
    let items = as_array(value, entity_id, "position")?;
    Ok(items
        .iter()
        .map(JsonValue::as_f64)
        .collect::<Option<Vec<f64>>>()
        .unwrap_or_default())
}

fn parse_bbox(value: &JsonValue) -> Option<Bounds> {
    let items = value.as_array()?;
    let nums: Vec<f64> = items.iter().filter_map(JsonValue::as_f64).collect();
    match nums.as_slice() {
        [min_lon, min_lat, max_lon, max_lat] => Some(Bounds::new(*min_lon, *min_lat, *max_lon, *max_lat)),
        _ => None,
    }
}

fn property_to_string(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Charge le catalogue des barangays enregistrés (`[{id, name, psgcId?}]`)
pub fn load_catalog_regions(path: &Path) -> Result<Vec<CatalogRegion>, AreaMatchError> {
    let content = std::fs::read_to_string(path)?;
    parse_catalog_regions(&content)
}

pub fn parse_catalog_regions(json: &str) -> Result<Vec<CatalogRegion>, AreaMatchError> {
    serde_json::from_str(json)
        .map_err(|e| AreaMatchError::invalid_catalog("barangays", e.to_string()))
}

/// Charge la table de couverture (`[{regionId, feederId}]`)
pub fn load_coverage(path: &Path) -> Result<Vec<CoverageLink>, AreaMatchError> {
    let content = std::fs::read_to_string(path)?;
    parse_coverage(&content)
}

pub fn parse_coverage(json: &str) -> Result<Vec<CoverageLink>, AreaMatchError> {
    serde_json::from_str(json)
        .map_err(|e| AreaMatchError::invalid_catalog("coverage", e.to_string()))
}

/// Export de l'API barangays : chaque barangay avec ses feeders
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BarangayExport {
    id: String,
    name: String,
    #[serde(default)]
    psgc_id: Option<String>,
    #[serde(default, rename = "FeederCoverage", alias = "feederCoverage")]
    feeder_coverage: Vec<FeederCoverageExport>,
}

#[derive(Debug, Deserialize)]
struct FeederCoverageExport {
    feeder: FeederRef,
}

#[derive(Debug, Deserialize)]
struct FeederRef {
    id: String,
}

/// Lit l'export imbriqué de l'API (barangays avec `FeederCoverage`)
///
/// Retourne à la fois le catalogue et la table de couverture.
pub fn parse_barangay_export(
    json: &str,
) -> Result<(Vec<CatalogRegion>, Vec<CoverageLink>), AreaMatchError> {
    let export: Vec<BarangayExport> = serde_json::from_str(json)
        .map_err(|e| AreaMatchError::invalid_catalog("barangay export", e.to_string()))?;

    let mut catalog = Vec::with_capacity(export.len());
    let mut links = Vec::new();

    for barangay in export {
        for coverage in &barangay.feeder_coverage {
            links.push(CoverageLink::new(barangay.id.clone(), coverage.feeder.id.clone()));
        }
        catalog.push(CatalogRegion {
            id: barangay.id,
            name: barangay.name,
            psgc_id: barangay.psgc_id,
        });
    }

    Ok((catalog, links))
}

/// Entrée du jeu de données alphabétique des barangays
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarangayEntry {
    pub name: String,
    pub psgc_id: String,
}

/// Jeu de données `{ "barangay": [...] }`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarangayDataset {
    pub barangay: Vec<BarangayEntry>,
}

/// Liste alphabétique des barangays d'un catalogue de limites
pub fn barangay_dataset(regions: &[Region]) -> BarangayDataset {
    let mut barangay: Vec<BarangayEntry> = regions
        .iter()
        .map(|r| BarangayEntry {
            name: r.name.clone(),
            psgc_id: r.id.clone(),
        })
        .collect();

    barangay.sort_by(|a, b| {
        normalize_name(&a.name)
            .cmp(&normalize_name(&b.name))
            .then_with(|| a.name.cmp(&b.name))
    });

    BarangayDataset { barangay }
}
