//! # areamatch
//!
//! Inférence de la zone touchée par une coupure de courant : à partir d'un
//! polygone tracé par un opérateur, retrouve les barangays touchés puis les
//! feeders qui les desservent.
//!
//! ## Features
//!
//! - Matching heuristique (vertex contenu, puis emprise + centre), par emprise
//!   seule ou par intersection exacte via `geo`
//! - Repli par nom lors de la résolution des feeders, avec réparation de
//!   l'encodage (`"Ã±"` → `"ñ"`)
//! - Normalisation de toutes les formes de zone dessinée (géométrie, tableau,
//!   Feature, FeatureCollection)
//! - Chargement tolérant des limites administratives GeoJSON
//!
//! ## Usage
//!
//! ```rust,ignore
//! use areamatch::{affected_area, DrawnArea, MatchStrategy};
//!
//! let drawn = DrawnArea::from_json_str(&polygon_json)?.expect("zone dessinée");
//! let result = affected_area(&drawn, &regions, &catalog, &links, MatchStrategy::Heuristic);
//!
//! println!("Barangays: {:?}", result.matched_region_names);
//! println!("Feeders: {:?}", result.affected_feeder_ids);
//! ```

pub mod catalog;
pub mod coverage;
pub mod drawn;
pub mod error;
pub mod geometry;
pub mod interruption;
pub mod matcher;
pub mod status;
pub mod text;
pub mod types;

pub use catalog::{CatalogConfig, RegionCatalog};
pub use coverage::{resolve_coverage, resolve_coverage_with, ResolveOptions};
pub use error::AreaMatchError;
pub use geometry::{bounds_intersect, point_in_polygon, Bounds};
pub use matcher::{find_affected_regions, RegionMatcher};
pub use types::{
    AffectedArea, AreaGeometry, CatalogRegion, CoverageLink, DrawnArea, MatchOutcome, MatchRule,
    MatchStrategy, Region, RegionMatch,
};

/// Enchaîne matcher et resolver
pub fn affected_area(
    drawn: &DrawnArea,
    regions: &[Region],
    catalog: &[CatalogRegion],
    links: &[CoverageLink],
    strategy: MatchStrategy,
) -> AffectedArea {
    affected_area_with(
        &RegionMatcher::with_strategy(strategy),
        drawn,
        regions,
        catalog,
        links,
        ResolveOptions::default(),
    )
}

/// Comme [`affected_area`], avec un matcher et des options de résolution explicites
pub fn affected_area_with(
    matcher: &RegionMatcher,
    drawn: &DrawnArea,
    regions: &[Region],
    catalog: &[CatalogRegion],
    links: &[CoverageLink],
    options: ResolveOptions,
) -> AffectedArea {
    let outcome = matcher.find_affected_regions(drawn, regions);
    resolve_coverage_with(&outcome.matches, catalog, links, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_affected_area_pipeline() {
        let regions = vec![
            Region::new("B1", "Alpha", AreaGeometry::rectangle(0.0, 0.0, 10.0, 10.0)),
            Region::new("B2", "Beta", AreaGeometry::rectangle(20.0, 0.0, 30.0, 10.0)),
        ];
        let catalog: Vec<CatalogRegion> = regions.iter().map(CatalogRegion::from).collect();
        let links = vec![CoverageLink::new("B1", "F1"), CoverageLink::new("B2", "F2")];
        let drawn = DrawnArea::new(AreaGeometry::rectangle(4.0, 4.0, 6.0, 6.0)).unwrap();

        let result = affected_area(&drawn, &regions, &catalog, &links, MatchStrategy::Heuristic);
        assert_eq!(result.matched_region_ids, vec!["B1"]);
        assert_eq!(result.matched_region_names, vec!["Alpha"]);
        assert_eq!(result.affected_feeder_ids, vec!["F1"]);
    }

    #[test]
    fn test_affected_area_without_name_fallback() {
        let regions = vec![Region::new(
            "063022001",
            "Alpha",
            AreaGeometry::rectangle(0.0, 0.0, 10.0, 10.0),
        )];
        let catalog = vec![CatalogRegion::new("ckx1", "Alpha")];
        let links = vec![CoverageLink::new("ckx1", "F1")];
        let drawn = DrawnArea::new(AreaGeometry::rectangle(4.0, 4.0, 6.0, 6.0)).unwrap();

        let strict = affected_area_with(
            &RegionMatcher::new(),
            &drawn,
            &regions,
            &catalog,
            &links,
            ResolveOptions {
                name_fallback: false,
            },
        );
        assert!(strict.affected_feeder_ids.is_empty());
        assert_eq!(strict.unresolved_region_ids, vec!["063022001"]);

        let lenient = affected_area(&drawn, &regions, &catalog, &links, MatchStrategy::Heuristic);
        assert_eq!(lenient.affected_feeder_ids, vec!["F1"]);
    }
}
