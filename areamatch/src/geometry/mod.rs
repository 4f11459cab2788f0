//! Primitives géométriques sur les géométries normalisées

pub mod bounds;
pub mod ring;

pub use bounds::{bounds_intersect, Bounds};
pub use ring::{point_in_polygon, vertex};

use geo::{Coord, LineString, MultiPolygon, Polygon};

use crate::types::{AreaGeometry, Ring};
use crate::AreaMatchError;

/// Teste si `point` est dans un polygone à trous (extérieur puis trous)
pub fn polygon_contains(point: Coord, rings: &[Ring]) -> bool {
    let Some((exterior, holes)) = rings.split_first() else {
        return false;
    };

    point_in_polygon(point, exterior) && !holes.iter().any(|h| point_in_polygon(point, h))
}

impl AreaGeometry {
    /// Tous les vertices exploitables, trous compris
    pub fn vertices(&self) -> impl Iterator<Item = Coord> + '_ {
        self.polygons
            .iter()
            .flatten()
            .flatten()
            .filter_map(|p| vertex(p))
    }

    /// Teste si le point est dans l'un des polygones
    pub fn contains_point(&self, point: Coord) -> bool {
        self.polygons
            .iter()
            .any(|rings| polygon_contains(point, rings))
    }

    /// Emprise des vertices exploitables
    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_coords(self.vertices())
    }

    /// Vérifie que la géométrie est exploitable par le matcher
    ///
    /// Un anneau partiellement dégradé est toléré, mais il faut au moins un
    /// polygone dont l'extérieur a 3 vertices exploitables.
    pub fn check(&self, entity_id: &str) -> Result<(), AreaMatchError> {
        if self.polygons.is_empty() {
            return Err(AreaMatchError::malformed(entity_id, "no polygon"));
        }

        if self.polygons.iter().any(|rings| rings.is_empty()) {
            return Err(AreaMatchError::malformed(entity_id, "polygon without ring"));
        }

        let has_usable_exterior = self
            .polygons
            .iter()
            .any(|rings| ring::usable_vertices(&rings[0]) >= 3);

        if !has_usable_exterior {
            return Err(AreaMatchError::malformed(
                entity_id,
                "no exterior ring with at least 3 usable vertices",
            ));
        }

        Ok(())
    }

    /// Conversion stricte vers `geo::MultiPolygon`
    ///
    /// Échoue si une position est malformée ou si un anneau a moins de
    /// 3 vertices.
    pub fn to_multi_polygon(&self, entity_id: &str) -> Result<MultiPolygon, AreaMatchError> {
        let mut polygons = Vec::with_capacity(self.polygons.len());

        for rings in &self.polygons {
            let mut converted = Vec::with_capacity(rings.len());
            for ring in rings {
                converted.push(to_line_string(ring, entity_id)?);
            }

            let mut iter = converted.into_iter();
            let Some(exterior) = iter.next() else {
                return Err(AreaMatchError::malformed(entity_id, "polygon without ring"));
            };
            polygons.push(Polygon::new(exterior, iter.collect()));
        }

        if polygons.is_empty() {
            return Err(AreaMatchError::malformed(entity_id, "no polygon"));
        }

        Ok(MultiPolygon::new(polygons))
    }
}

fn to_line_string(ring: &Ring, entity_id: &str) -> Result<LineString, AreaMatchError> {
    let coords = ring
        .iter()
        .map(|p| vertex(p))
        .collect::<Option<Vec<Coord>>>()
        .ok_or_else(|| AreaMatchError::malformed(entity_id, "position with missing coordinate"))?;

    if coords.len() < 3 {
        return Err(AreaMatchError::malformed(
            entity_id,
            format!("ring with {} vertices", coords.len()),
        ));
    }

    // Polygon::new ferme l'anneau si nécessaire
    Ok(LineString::new(coords))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn donut() -> AreaGeometry {
        AreaGeometry::polygon(vec![
            vec![
                vec![0.0, 0.0],
                vec![10.0, 0.0],
                vec![10.0, 10.0],
                vec![0.0, 10.0],
            ],
            vec![vec![4.0, 4.0], vec![6.0, 4.0], vec![6.0, 6.0], vec![4.0, 6.0]],
        ])
    }

    #[test]
    fn test_hole_excluded() {
        let g = donut();
        assert!(g.contains_point(Coord { x: 2.0, y: 2.0 }));
        assert!(!g.contains_point(Coord { x: 5.0, y: 5.0 }));
    }

    #[test]
    fn test_multi_polygon_contains() {
        let g = AreaGeometry::multi_polygon(vec![
            AreaGeometry::rectangle(0.0, 0.0, 1.0, 1.0).polygons.remove(0),
            AreaGeometry::rectangle(5.0, 5.0, 6.0, 6.0).polygons.remove(0),
        ]);
        assert!(g.contains_point(Coord { x: 5.5, y: 5.5 }));
        assert!(!g.contains_point(Coord { x: 3.0, y: 3.0 }));
        assert_eq!(g.bounds(), Some(Bounds::new(0.0, 0.0, 6.0, 6.0)));
    }

    #[test]
    fn test_check_rejects_malformed() {
        assert!(AreaGeometry::default().check("X").is_err());
        assert!(AreaGeometry::polygon(vec![]).check("X").is_err());
        assert!(AreaGeometry::polygon(vec![vec![vec![0.0], vec![1.0, 1.0]]])
            .check("X")
            .is_err());
        assert!(donut().check("X").is_ok());
    }

    #[test]
    fn test_to_multi_polygon() {
        let mp = donut().to_multi_polygon("X").unwrap();
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].interiors().len(), 1);

        let broken = AreaGeometry::polygon(vec![vec![vec![0.0, 0.0], vec![1.0], vec![1.0, 1.0]]]);
        assert!(broken.to_multi_polygon("X").is_err());
    }
}
