//! Test point-dans-anneau (règle pair-impair)

use geo::Coord;

use crate::types::Position;

/// Lit une position comme coordonnée `(x = longitude, y = latitude)`
///
/// Retourne `None` si la position a moins de deux composantes ou une
/// composante non finie.
pub fn vertex(position: &[f64]) -> Option<Coord> {
    match position {
        [x, y, ..] if x.is_finite() && y.is_finite() => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

/// Nombre de vertices exploitables d'un anneau
pub fn usable_vertices(ring: &[Position]) -> usize {
    ring.iter().filter(|p| vertex(p).is_some()).count()
}

/// Teste si `point` est à l'intérieur de l'anneau (ray casting pair-impair)
///
/// L'anneau est implicitement fermé. Un anneau de moins de 3 positions ne
/// contient aucun point ; une arête dont une extrémité est malformée est
/// ignorée.
pub fn point_in_polygon(point: Coord, ring: &[Position]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        if let (Some(vi), Some(vj)) = (vertex(&ring[i]), vertex(&ring[j])) {
            if (vi.y > point.y) != (vj.y > point.y)
                && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
            {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}
