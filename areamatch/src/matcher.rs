//! Recherche des régions touchées par une zone dessinée

use geo::Intersects;
use tracing::{debug, warn};

use crate::geometry::Bounds;
use crate::types::{
    AreaGeometry, DrawnArea, MatchOutcome, MatchRule, MatchStrategy, Region, RegionMatch,
    SkippedRegion,
};
use crate::AreaMatchError;

/// Matcher de régions, paramétré par sa stratégie d'intersection
#[derive(Debug, Clone, Copy, Default)]
pub struct RegionMatcher {
    strategy: MatchStrategy,
}

impl RegionMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(strategy: MatchStrategy) -> Self {
        Self { strategy }
    }

    pub fn strategy(&self) -> MatchStrategy {
        self.strategy
    }

    /// Parcourt les régions dans l'ordre et retourne celles qui touchent la zone
    ///
    /// Une région à la géométrie malformée est tracée puis ignorée ; le
    /// parcours continue avec les suivantes.
    pub fn find_affected_regions(&self, drawn: &DrawnArea, regions: &[Region]) -> MatchOutcome {
        let mut outcome = MatchOutcome {
            scanned: regions.len(),
            ..Default::default()
        };

        let Some(drawn_bounds) = drawn.geometry.bounds() else {
            // DrawnArea garantit au moins un vertex
            return outcome;
        };

        // Conversion unique de la zone pour la stratégie exacte
        let drawn_exact = match self.strategy {
            MatchStrategy::Exact => match drawn.geometry.to_multi_polygon("drawn area") {
                Ok(mp) => Some(mp),
                Err(e) => {
                    warn!(error = %e, "Drawn area not convertible, falling back to heuristic");
                    None
                }
            },
            _ => None,
        };

        for region in regions {
            let result = match (self.strategy, &drawn_exact) {
                (MatchStrategy::Exact, Some(drawn_mp)) => test_exact(drawn_mp, region),
                (MatchStrategy::Bounds, _) => test_bounds(&drawn_bounds, region),
                _ => test_heuristic(&drawn.geometry, &drawn_bounds, region),
            };

            match result {
                Ok(Some(rule)) => {
                    debug!(region_id = %region.id, rule = ?rule, "Region affected");
                    outcome.matches.push(RegionMatch {
                        id: region.id.clone(),
                        name: region.name.clone(),
                        rule,
                    });
                }
                Ok(None) => {}
                Err(e) => {
                    warn!(region_id = %region.id, error = %e, "Skipping region with malformed geometry");
                    outcome.skipped.push(SkippedRegion {
                        id: region.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        outcome
    }
}

/// Raccourci : matcher heuristique par défaut
pub fn find_affected_regions(drawn: &DrawnArea, regions: &[Region]) -> MatchOutcome {
    RegionMatcher::new().find_affected_regions(drawn, regions)
}

/// Emprise de la région, précalculée ou dérivée de sa géométrie
fn region_bounds(region: &Region) -> Result<Bounds, AreaMatchError> {
    region.geometry.check(&region.id)?;

    match region.bounds {
        Some(b) => Ok(b),
        None => region
            .geometry
            .bounds()
            .ok_or_else(|| AreaMatchError::malformed(&region.id, "no usable vertex")),
    }
}

/// Vertex contenu dans l'autre forme, sinon repli emprise + centre
fn test_heuristic(
    drawn: &AreaGeometry,
    drawn_bounds: &Bounds,
    region: &Region,
) -> Result<Option<MatchRule>, AreaMatchError> {
    let bounds = region_bounds(region)?;

    let drawn_vertex_inside = drawn.vertices().any(|v| region.geometry.contains_point(v));
    if drawn_vertex_inside || region.geometry.vertices().any(|v| drawn.contains_point(v)) {
        return Ok(Some(MatchRule::VertexContainment));
    }

    if drawn_bounds.intersects(&bounds)
        && (bounds.contains(drawn_bounds.center()) || drawn_bounds.contains(bounds.center()))
    {
        return Ok(Some(MatchRule::BoundsFallback));
    }

    Ok(None)
}

fn test_bounds(drawn_bounds: &Bounds, region: &Region) -> Result<Option<MatchRule>, AreaMatchError> {
    let bounds = region_bounds(region)?;
    Ok(drawn_bounds
        .intersects(&bounds)
        .then_some(MatchRule::BoundsOverlap))
}

fn test_exact(
    drawn: &geo::MultiPolygon,
    region: &Region,
) -> Result<Option<MatchRule>, AreaMatchError> {
    let geometry = region.geometry.to_multi_polygon(&region.id)?;
    Ok(drawn
        .intersects(&geometry)
        .then_some(MatchRule::ExactIntersection))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_region(id: &str, name: &str, min: f64, max: f64) -> Region {
        Region::new(id, name, AreaGeometry::rectangle(min, min, max, max))
    }

    fn drawn_rect(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> DrawnArea {
        DrawnArea::new(AreaGeometry::rectangle(min_lon, min_lat, max_lon, max_lat)).unwrap()
    }

    #[test]
    fn test_nested_drawn_area_matches() {
        let regions = vec![square_region("B1", "Alpha", 0.0, 10.0)];
        let outcome = find_affected_regions(&drawn_rect(4.0, 4.0, 6.0, 6.0), &regions);

        assert_eq!(outcome.region_ids(), vec!["B1"]);
        assert_eq!(outcome.matches[0].rule, MatchRule::VertexContainment);
    }

    #[test]
    fn test_region_inside_drawn_area() {
        let regions = vec![square_region("B1", "Alpha", 4.0, 6.0)];
        let outcome = find_affected_regions(&drawn_rect(0.0, 0.0, 10.0, 10.0), &regions);
        assert_eq!(outcome.region_ids(), vec!["B1"]);
    }

    #[test]
    fn test_crossing_bars_use_bounds_fallback() {
        // Croix : aucun vertex de l'une n'est dans l'autre
        let regions = vec![Region::new(
            "V",
            "Vertical",
            AreaGeometry::rectangle(4.0, 0.0, 6.0, 10.0),
        )];
        let outcome = find_affected_regions(&drawn_rect(0.0, 4.0, 10.0, 6.0), &regions);

        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].rule, MatchRule::BoundsFallback);
    }

    #[test]
    fn test_disjoint_region_not_matched() {
        let regions = vec![square_region("far", "Far", 20.0, 30.0)];
        let outcome = find_affected_regions(&drawn_rect(0.0, 0.0, 1.0, 1.0), &regions);
        assert!(outcome.matches.is_empty());
        assert_eq!(outcome.scanned, 1);
    }

    #[test]
    fn test_overlapping_boxes_without_center_not_matched() {
        // Emprises qui se chevauchent en coin, aucun centre contenu, aucun vertex dedans
        // grâce à une forme en L pour la région
        let region = Region::new(
            "L",
            "L-shape",
            AreaGeometry::polygon(vec![vec![
                vec![0.0, 0.0],
                vec![10.0, 0.0],
                vec![10.0, 1.0],
                vec![1.0, 1.0],
                vec![1.0, 10.0],
                vec![0.0, 10.0],
            ]]),
        );
        let outcome = find_affected_regions(&drawn_rect(8.0, 8.0, 14.0, 14.0), &[region]);
        assert!(outcome.matches.is_empty());
    }

    #[test]
    fn test_malformed_region_skipped() {
        let regions = vec![
            Region::new("bad", "Bad", AreaGeometry::polygon(vec![vec![vec![1.0]]])),
            square_region("B1", "Alpha", 0.0, 10.0),
        ];
        let outcome = find_affected_regions(&drawn_rect(4.0, 4.0, 6.0, 6.0), &regions);

        assert_eq!(outcome.region_ids(), vec!["B1"]);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].id, "bad");
    }

    #[test]
    fn test_precomputed_bounds_used() {
        // L'emprise précalculée prime sur celle de la géométrie
        let drawn = drawn_rect(0.0, 4.0, 10.0, 6.0);
        let region = Region::new("V", "Vertical", AreaGeometry::rectangle(4.0, 0.0, 6.0, 10.0));

        let fresh = find_affected_regions(&drawn, &[region.clone()]);
        assert_eq!(fresh.matches.len(), 1);

        let stale = region.with_bounds(Bounds::new(4.0, 0.0, 6.0, 3.0));
        let outcome = find_affected_regions(&drawn, &[stale]);
        assert!(outcome.matches.is_empty());
    }

    #[test]
    fn test_bounds_strategy() {
        let regions = vec![Region::new(
            "L",
            "L-shape",
            AreaGeometry::polygon(vec![vec![
                vec![0.0, 0.0],
                vec![10.0, 0.0],
                vec![10.0, 1.0],
                vec![1.0, 1.0],
                vec![1.0, 10.0],
                vec![0.0, 10.0],
            ]]),
        )];
        let matcher = RegionMatcher::with_strategy(MatchStrategy::Bounds);
        let outcome = matcher.find_affected_regions(&drawn_rect(8.0, 8.0, 14.0, 14.0), &regions);
        assert_eq!(outcome.matches[0].rule, MatchRule::BoundsOverlap);
    }

    #[test]
    fn test_exact_strategy() {
        let matcher = RegionMatcher::with_strategy(MatchStrategy::Exact);
        let regions = vec![
            square_region("in", "Inside", 0.0, 10.0),
            square_region("out", "Outside", 20.0, 30.0),
        ];
        let outcome = matcher.find_affected_regions(&drawn_rect(4.0, 4.0, 6.0, 6.0), &regions);

        assert_eq!(outcome.region_ids(), vec!["in"]);
        assert_eq!(outcome.matches[0].rule, MatchRule::ExactIntersection);
    }

    #[test]
    fn test_empty_catalog() {
        let outcome = find_affected_regions(&drawn_rect(0.0, 0.0, 1.0, 1.0), &[]);
        assert!(outcome.matches.is_empty());
        assert!(outcome.skipped.is_empty());
        assert_eq!(outcome.scanned, 0);
    }
}
