//! Normalisation des zones dessinées
//!
//! L'outil de dessin peut fournir une géométrie seule, un tableau de
//! géométries, une Feature, une FeatureCollection ou `null`. Tout est ramené
//! ici à un unique [`DrawnArea`].

use geojson::{GeoJson, Geometry, Value};
use serde_json::Value as JsonValue;

use crate::types::{AreaGeometry, DrawnArea, Ring};
use crate::AreaMatchError;

impl DrawnArea {
    /// Valide une géométrie comme zone dessinée
    pub fn new(geometry: AreaGeometry) -> Result<Self, AreaMatchError> {
        geometry
            .check("drawn area")
            .map_err(|e| AreaMatchError::InvalidDrawnArea(e.to_string()))?;
        Ok(Self { geometry })
    }

    /// Normalise n'importe quelle représentation JSON d'une zone dessinée
    ///
    /// Retourne `Ok(None)` pour `null`, un tableau vide ou une collection sans
    /// polygone.
    pub fn from_json(value: &JsonValue) -> Result<Option<Self>, AreaMatchError> {
        let mut polygons = Vec::new();

        match value {
            JsonValue::Null => return Ok(None),
            JsonValue::Array(items) => {
                for item in items {
                    collect_geojson(&parse_geojson(item)?, &mut polygons)?;
                }
            }
            _ => collect_geojson(&parse_geojson(value)?, &mut polygons)?,
        }

        if polygons.is_empty() {
            return Ok(None);
        }

        Self::new(AreaGeometry::multi_polygon(polygons)).map(Some)
    }

    /// Variante depuis une chaîne JSON
    pub fn from_json_str(json: &str) -> Result<Option<Self>, AreaMatchError> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_json(&value)
    }
}

fn parse_geojson(value: &JsonValue) -> Result<GeoJson, AreaMatchError> {
    GeoJson::from_json_value(value.clone())
        .map_err(|e| AreaMatchError::InvalidDrawnArea(e.to_string()))
}

fn collect_geojson(geojson: &GeoJson, polygons: &mut Vec<Vec<Ring>>) -> Result<(), AreaMatchError> {
    match geojson {
        GeoJson::Geometry(geometry) => collect_geometry(geometry, polygons),
        GeoJson::Feature(feature) => match &feature.geometry {
            Some(geometry) => collect_geometry(geometry, polygons),
            None => Ok(()),
        },
        GeoJson::FeatureCollection(collection) => {
            for feature in &collection.features {
                if let Some(geometry) = &feature.geometry {
                    collect_geometry(geometry, polygons)?;
                }
            }
            Ok(())
        }
    }
}

fn collect_geometry(geometry: &Geometry, polygons: &mut Vec<Vec<Ring>>) -> Result<(), AreaMatchError> {
    match &geometry.value {
        Value::Polygon(rings) => polygons.push(convert_rings(rings)),
        Value::MultiPolygon(multi) => polygons.extend(multi.iter().map(|rings| convert_rings(rings))),
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_geometry(g, polygons)?;
            }
        }
        other => {
            return Err(AreaMatchError::UnsupportedGeometry(
                geometry_type_name(other).to_string(),
            ))
        }
    }
    Ok(())
}

fn convert_rings(rings: &[Vec<geojson::Position>]) -> Vec<Ring> {
    rings
        .iter()
        .map(|ring| ring.iter().map(|p| p.to_vec()).collect())
        .collect()
}

fn geometry_type_name(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}
