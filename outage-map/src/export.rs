//! Export GeoJSON des régions touchées (streaming avec geozero)

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use areamatch::geometry::vertex;
use areamatch::types::Ring;
use areamatch::{AreaGeometry, Region, RegionMatch};
use geo::{Coord, LineString, MultiPolygon, Polygon};
use geozero::geojson::GeoJsonWriter;
use geozero::GeozeroGeometry;
use tracing::warn;

/// Écrit une FeatureCollection des régions touchées, dans l'ordre du match
///
/// Retourne le nombre de features écrites.
pub fn export_matches_geojson(
    regions: &[Region],
    matches: &[RegionMatch],
    output_path: &Path,
) -> Result<usize> {
    let file = File::create(output_path)
        .context(format!("Failed to create file: {}", output_path.display()))?;
    let mut writer = BufWriter::new(file);
    let written = write_feature_collection(&mut writer, regions, matches)?;
    writer.flush()?;
    Ok(written)
}

fn write_feature_collection<W: Write>(
    writer: &mut W,
    regions: &[Region],
    matches: &[RegionMatch],
) -> Result<usize> {
    let by_id: HashMap<&str, &Region> = regions.iter().map(|r| (r.id.as_str(), r)).collect();

    write!(writer, r#"{{"type":"FeatureCollection","features":["#)?;

    let mut written = 0;
    for m in matches {
        let Some(region) = by_id.get(m.id.as_str()) else {
            warn!(region_id = %m.id, "Matched region missing from catalog, not exported");
            continue;
        };

        let geometry = to_multi_polygon(&region.geometry);
        if geometry.0.is_empty() {
            warn!(region_id = %m.id, "No exportable polygon");
            continue;
        }

        if written > 0 {
            write!(writer, ",")?;
        }
        write_feature(writer, m, &geometry)?;
        written += 1;
    }

    write!(writer, "]}}")?;
    Ok(written)
}

fn write_feature<W: Write>(writer: &mut W, m: &RegionMatch, geometry: &MultiPolygon) -> Result<()> {
    let id = serde_json::to_string(&m.id)?;
    write!(writer, r#"{{"type":"Feature","id":{},"geometry":"#, id)?;

    let mut geom_buf = Vec::new();
    let mut geom_writer = GeoJsonWriter::new(&mut geom_buf);
    geo::Geometry::MultiPolygon(geometry.clone()).process_geom(&mut geom_writer)?;
    writer.write_all(&geom_buf)?;

    write!(
        writer,
        r#","properties":{{"id":{},"name":{},"rule":{}}}}}"#,
        id,
        serde_json::to_string(&m.name)?,
        serde_json::to_string(&m.rule)?
    )?;

    Ok(())
}

/// Conversion tolérante : vertices malformés ignorés, trous dégénérés écartés
///
/// Un polygone dont l'anneau extérieur est dégénéré est écarté en entier.
fn to_multi_polygon(geometry: &AreaGeometry) -> MultiPolygon {
    let polygons = geometry
        .polygons
        .iter()
        .filter_map(|rings| {
            let (exterior, holes) = rings.split_first()?;
            let exterior = usable_ring(exterior)?;
            Some(Polygon::new(exterior, holes.iter().filter_map(|h| usable_ring(h)).collect()))
        })
        .collect();

    MultiPolygon::new(polygons)
}

fn usable_ring(ring: &Ring) -> Option<LineString> {
    let coords: Vec<Coord> = ring.iter().filter_map(|p| vertex(p)).collect();
    (coords.len() >= 3).then(|| LineString::from(coords))
}

#[cfg(test)]
mod tests {
    use super::*;
    use areamatch::MatchRule;
    use std::io::Cursor;

    fn matched(id: &str, name: &str) -> RegionMatch {
        RegionMatch {
            id: id.to_string(),
            name: name.to_string(),
            rule: MatchRule::VertexContainment,
        }
    }

    #[test]
    fn test_write_feature_collection() {
        let regions = vec![
            Region::new("B1", "Alpha \"Pob.\"", AreaGeometry::rectangle(0.0, 0.0, 1.0, 1.0)),
            Region::new("B2", "Beta", AreaGeometry::rectangle(2.0, 2.0, 3.0, 3.0)),
        ];
        let matches = vec![matched("B1", "Alpha \"Pob.\""), matched("unknown", "Ghost")];

        let mut buffer = Cursor::new(Vec::new());
        let written = write_feature_collection(&mut buffer, &regions, &matches).unwrap();
        assert_eq!(written, 1);

        let json: serde_json::Value = serde_json::from_slice(&buffer.into_inner()).unwrap();
        assert_eq!(json["type"], "FeatureCollection");
        let features = json["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["id"], "B1");
        assert_eq!(features[0]["properties"]["name"], "Alpha \"Pob.\"");
        assert_eq!(features[0]["properties"]["rule"], "vertex_containment");
        assert_eq!(features[0]["geometry"]["type"], "MultiPolygon");
    }

    #[test]
    fn test_to_multi_polygon_drops_degenerate_rings() {
        let geometry = AreaGeometry::multi_polygon(vec![
            vec![vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![f64::NAN, 1.0], vec![1.0, 1.0]]],
            vec![vec![vec![5.0, 5.0], vec![6.0, 6.0]]],
        ]);
        let mp = to_multi_polygon(&geometry);
        assert_eq!(mp.0.len(), 1);
    }

    #[test]
    fn test_to_multi_polygon_degenerate_exterior_skips_polygon() {
        let hole = vec![vec![2.0, 2.0], vec![3.0, 2.0], vec![3.0, 3.0], vec![2.0, 2.0]];
        let geometry = AreaGeometry::multi_polygon(vec![
            vec![vec![vec![0.0, 0.0], vec![10.0, 0.0]], hole.clone()],
            vec![
                vec![vec![0.0, 0.0], vec![10.0, 0.0], vec![10.0, 10.0], vec![0.0, 0.0]],
                vec![vec![4.0, 4.0], vec![5.0, 5.0]],
                hole,
            ],
        ]);

        let mp = to_multi_polygon(&geometry);
        assert_eq!(mp.0.len(), 1);
        assert_eq!(mp.0[0].exterior().0[1], Coord { x: 10.0, y: 0.0 });
        assert_eq!(mp.0[0].interiors().len(), 1);
    }

    #[test]
    fn test_export_to_file() {
        let regions = vec![Region::new("B1", "Alpha", AreaGeometry::rectangle(0.0, 0.0, 1.0, 1.0))];
        let output_path = std::env::temp_dir().join("outage_map_export_test.geojson");

        let written = export_matches_geojson(&regions, &[matched("B1", "Alpha")], &output_path).unwrap();
        assert_eq!(written, 1);

        let content = std::fs::read_to_string(&output_path).unwrap();
        assert!(content.contains(r#""type":"Feature""#));
        std::fs::remove_file(&output_path).ok();
    }
}
