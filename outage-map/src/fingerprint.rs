//! Empreintes des zones dessinées et des catalogues
//!
//! L'empreinte d'une zone est indépendante du vertex de départ de chaque
//! anneau et de la fermeture explicite : deux tracés identiques donnent la
//! même empreinte, ce qui permet d'ignorer les doublons en mode batch.

use std::path::Path;

use anyhow::{Context, Result};
use areamatch::geometry::vertex;
use areamatch::DrawnArea;
use blake3::Hasher;
use geo::Coord;

/// Empreinte hexadécimale stable d'une zone dessinée
pub fn drawn_area_fingerprint(area: &DrawnArea) -> String {
    let mut hasher = Hasher::new();

    for rings in &area.geometry().polygons {
        hasher.update(b"POLY");
        for (i, ring) in rings.iter().enumerate() {
            hasher.update(if i == 0 { b"EXT" } else { b"INT" });
            let coords: Vec<Coord> = ring.iter().filter_map(|p| vertex(p)).collect();
            hash_ring_normalized(&mut hasher, &coords);
        }
    }

    hex::encode(hasher.finalize().as_bytes())
}

/// Somme de contrôle d'un fichier (catalogue, couverture)
pub fn file_checksum(path: &Path) -> Result<String> {
    let content =
        std::fs::read(path).context(format!("Failed to read file: {}", path.display()))?;
    Ok(hex::encode(blake3::hash(&content).as_bytes()))
}

/// Hash un anneau en partant du vertex lexicographiquement le plus petit
fn hash_ring_normalized(hasher: &mut Hasher, ring: &[Coord]) {
    // Le dernier vertex répète le premier pour un anneau fermé
    let len = if ring.len() > 1 && ring.first() == ring.last() {
        ring.len() - 1
    } else {
        ring.len()
    };

    if len == 0 {
        return;
    }

    let min_idx = (0..len)
        .min_by(|&a, &b| {
            let ca = &ring[a];
            let cb = &ring[b];
            ca.x.total_cmp(&cb.x).then_with(|| ca.y.total_cmp(&cb.y))
        })
        .unwrap_or(0);

    for i in 0..len {
        hash_coord(hasher, ring[(min_idx + i) % len]);
    }
}

/// Arrondi à 6 décimales (~10 cm)
fn hash_coord(hasher: &mut Hasher, coord: Coord) {
    let x = (coord.x * 1_000_000.0).round() as i64;
    let y = (coord.y * 1_000_000.0).round() as i64;
    hasher.update(&x.to_le_bytes());
    hasher.update(&y.to_le_bytes());
}
