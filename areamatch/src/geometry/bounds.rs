//! Emprises (bounding boxes) en longitude/latitude

use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

use super::ring::vertex;
use crate::types::Position;

/// Emprise alignée sur les axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Emprise d'un ensemble de coordonnées, `None` si l'ensemble est vide
    pub fn from_coords<I>(coords: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coord>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let init = Self::new(first.x, first.y, first.x, first.y);

        Some(iter.fold(init, |b, c| Self {
            min_lon: b.min_lon.min(c.x),
            min_lat: b.min_lat.min(c.y),
            max_lon: b.max_lon.max(c.x),
            max_lat: b.max_lat.max(c.y),
        }))
    }

    /// Emprise de positions GeoJSON, positions malformées ignorées
    pub fn from_positions<'a, I>(positions: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Position>,
    {
        Self::from_coords(positions.into_iter().filter_map(|p| vertex(p)))
    }

    /// Centre de l'emprise
    pub fn center(&self) -> Coord {
        Coord {
            x: (self.min_lon + self.max_lon) / 2.0,
            y: (self.min_lat + self.max_lat) / 2.0,
        }
    }

    /// Contient le point, bords inclus
    pub fn contains(&self, point: Coord) -> bool {
        point.x >= self.min_lon
            && point.x <= self.max_lon
            && point.y >= self.min_lat
            && point.y <= self.max_lat
    }

    /// Chevauche l'autre emprise, bords inclus
    pub fn intersects(&self, other: &Bounds) -> bool {
        bounds_intersect(self, other)
    }
}

/// Teste le chevauchement de deux emprises (un bord commun suffit)
pub fn bounds_intersect(a: &Bounds, b: &Bounds) -> bool {
    a.min_lon <= b.max_lon
        && b.min_lon <= a.max_lon
        && a.min_lat <= b.max_lat
        && b.min_lat <= a.max_lat
}

impl From<Bounds> for Rect {
    fn from(b: Bounds) -> Self {
        Rect::new(
            Coord {
                x: b.min_lon,
                y: b.min_lat,
            },
            Coord {
                x: b.max_lon,
                y: b.max_lat,
            },
        )
    }
}

impl From<Rect> for Bounds {
    fn from(r: Rect) -> Self {
        Self::new(r.min().x, r.min().y, r.max().x, r.max().y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_and_touch() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(5.0, 5.0, 15.0, 15.0);
        let touching = Bounds::new(10.0, 0.0, 20.0, 10.0);
        let apart = Bounds::new(11.0, 11.0, 12.0, 12.0);

        assert!(bounds_intersect(&a, &b));
        assert!(bounds_intersect(&a, &touching));
        assert!(!bounds_intersect(&a, &apart));
        assert!(a.intersects(&b));
    }

    #[test]
    fn test_from_coords() {
        let b = Bounds::from_coords(vec![
            Coord { x: 3.0, y: -1.0 },
            Coord { x: -2.0, y: 4.0 },
            Coord { x: 1.0, y: 0.0 },
        ])
        .unwrap();
        assert_eq!(b, Bounds::new(-2.0, -1.0, 3.0, 4.0));
        assert_eq!(b.center(), Coord { x: 0.5, y: 1.5 });
        assert!(Bounds::from_coords(Vec::new()).is_none());
    }

    #[test]
    fn test_from_positions_skips_malformed() {
        let ring: Vec<Position> = vec![vec![0.0, 0.0], vec![f64::NAN, 9.0], vec![2.0], vec![4.0, 3.0]];
        assert_eq!(Bounds::from_positions(&ring), Some(Bounds::new(0.0, 0.0, 4.0, 3.0)));
    }

    #[test]
    fn test_contains_inclusive() {
        let b = Bounds::new(0.0, 0.0, 2.0, 2.0);
        assert!(b.contains(Coord { x: 2.0, y: 1.0 }));
        assert!(!b.contains(Coord { x: 2.1, y: 1.0 }));
    }

    #[test]
    fn test_rect_conversion() {
        let b = Bounds::new(122.48, 10.65, 122.62, 10.78);
        let rect: Rect = b.into();
        assert_eq!(Bounds::from(rect), b);
    }
}
