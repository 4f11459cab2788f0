//! Types de données pour le crate areamatch

use serde::{Deserialize, Serialize};

use crate::geometry::Bounds;

/// Position GeoJSON `[longitude, latitude, ...]`
///
/// Une position avec moins de deux nombres finis est considérée malformée
/// et ignorée partout où elle est lue.
pub type Position = Vec<f64>;

/// Anneau implicitement fermé (le dernier vertex n'a pas à répéter le premier)
pub type Ring = Vec<Position>;

/// Géométrie surfacique normalisée (Polygon ou MultiPolygon)
///
/// Chaque polygone est une liste d'anneaux : le premier est l'extérieur,
/// les suivants sont des trous.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AreaGeometry {
    pub polygons: Vec<Vec<Ring>>,
}

impl AreaGeometry {
    /// Géométrie à un seul polygone
    pub fn polygon(rings: Vec<Ring>) -> Self {
        Self {
            polygons: vec![rings],
        }
    }

    /// Géométrie multi-polygone
    pub fn multi_polygon(polygons: Vec<Vec<Ring>>) -> Self {
        Self { polygons }
    }

    /// Rectangle simple, pratique pour les tests et les emprises
    pub fn rectangle(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self::polygon(vec![vec![
            vec![min_lon, min_lat],
            vec![max_lon, min_lat],
            vec![max_lon, max_lat],
            vec![min_lon, max_lat],
        ]])
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

/// Une limite administrative (barangay) avec sa géométrie
#[derive(Debug, Clone)]
pub struct Region {
    /// Identifiant stable (code PSGC pour les barangays)
    pub id: String,

    /// Nom affiché
    pub name: String,

    /// Géométrie de la limite
    pub geometry: AreaGeometry,

    /// Emprise précalculée, recalculée à la volée si absente
    pub bounds: Option<Bounds>,
}

impl Region {
    pub fn new(id: impl Into<String>, name: impl Into<String>, geometry: AreaGeometry) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            geometry,
            bounds: None,
        }
    }

    /// Fixe l'emprise précalculée
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }
}

/// Zone tracée par un opérateur pour une interruption
///
/// Construite uniquement via [`DrawnArea::new`] ou les parseurs de
/// [`crate::drawn`], qui garantissent au moins un vertex exploitable.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawnArea {
    pub(crate) geometry: AreaGeometry,
}

impl DrawnArea {
    pub fn geometry(&self) -> &AreaGeometry {
        &self.geometry
    }

    pub fn into_geometry(self) -> AreaGeometry {
        self.geometry
    }
}

/// Barangay tel qu'enregistré dans la base
///
/// `id` est la clé des liens de couverture ; `psgc_id`, quand il est connu,
/// est l'identifiant porté par les limites GeoJSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRegion {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psgc_id: Option<String>,
}

impl CatalogRegion {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            psgc_id: None,
        }
    }

    pub fn with_psgc(mut self, psgc_id: impl Into<String>) -> Self {
        self.psgc_id = Some(psgc_id.into());
        self
    }

    /// Identifiant comparé à celui des régions dessinées
    pub fn match_key(&self) -> &str {
        self.psgc_id.as_deref().unwrap_or(&self.id)
    }
}

impl From<&Region> for CatalogRegion {
    fn from(region: &Region) -> Self {
        Self::new(region.id.clone(), region.name.clone())
    }
}

/// Lien feeder -> région desservie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageLink {
    pub region_id: String,
    pub feeder_id: String,
}

impl CoverageLink {
    pub fn new(region_id: impl Into<String>, feeder_id: impl Into<String>) -> Self {
        Self {
            region_id: region_id.into(),
            feeder_id: feeder_id.into(),
        }
    }
}

/// Stratégie de test d'intersection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// Vertex contenu, puis repli sur emprise + centre
    #[default]
    Heuristic,
    /// Chevauchement des emprises uniquement
    Bounds,
    /// Intersection polygonale exacte
    Exact,
}

impl std::str::FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "heuristic" | "default" => Ok(MatchStrategy::Heuristic),
            "bounds" | "bbox" => Ok(MatchStrategy::Bounds),
            "exact" => Ok(MatchStrategy::Exact),
            _ => Err(format!(
                "Invalid match strategy: {}. Use: heuristic, bounds, exact",
                s
            )),
        }
    }
}

/// Règle ayant déclenché la correspondance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    VertexContainment,
    BoundsFallback,
    BoundsOverlap,
    ExactIntersection,
}

/// Région reconnue comme touchée
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionMatch {
    pub id: String,
    pub name: String,
    pub rule: MatchRule,
}

/// Région écartée car sa géométrie est inexploitable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRegion {
    pub id: String,
    pub reason: String,
}

/// Résultat d'un passage du matcher
#[derive(Debug, Clone, Default, Serialize)]
pub struct MatchOutcome {
    /// Régions touchées, dans l'ordre d'entrée
    pub matches: Vec<RegionMatch>,

    /// Régions ignorées (géométrie malformée)
    pub skipped: Vec<SkippedRegion>,

    /// Nombre de régions examinées
    pub scanned: usize,
}

impl MatchOutcome {
    pub fn region_ids(&self) -> Vec<String> {
        self.matches.iter().map(|m| m.id.clone()).collect()
    }

    pub fn region_names(&self) -> Vec<String> {
        self.matches.iter().map(|m| m.name.clone()).collect()
    }
}

/// Résultat consommé par le formulaire d'interruption
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AffectedArea {
    pub matched_region_ids: Vec<String>,
    pub matched_region_names: Vec<String>,
    pub affected_feeder_ids: Vec<String>,

    /// Régions touchées introuvables dans le catalogue, ni par id ni par nom
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_region_ids: Vec<String>,
}

impl AffectedArea {
    /// Distingue "aucune région" de "régions sans feeder configuré"
    pub fn has_regions(&self) -> bool {
        !self.matched_region_ids.is_empty()
    }

    pub fn has_feeders(&self) -> bool {
        !self.affected_feeder_ids.is_empty()
    }
}
