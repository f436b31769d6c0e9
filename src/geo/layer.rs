//! State boundary data structures and loaders.

use crate::error::LoadError;
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use geojson::{Feature, GeoJson, Geometry, PolygonType, Value};
use shapefile::dbase::FieldValue;
use std::io::Cursor;

/// Attribute names tried, in order, when looking for a feature's name.
const NAME_FIELDS: &[&str] = &["name", "NAME", "Name", "NAMELSAD", "STATE_NAME"];

/// A named boundary (one U.S. state).
#[derive(Debug, Clone)]
pub struct StateBoundary {
    pub name: Option<String>,
    pub shape: MultiPolygon<f64>,
}

/// The set of state boundaries drawn under the resort markers.
#[derive(Debug, Clone, Default)]
pub struct GeoLayer {
    pub features: Vec<StateBoundary>,
}

impl GeoLayer {
    /// Creates a new empty layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a layer from GeoJSON text.
    pub fn from_geojson(geojson_str: &str) -> Result<Self, LoadError> {
        let mut layer = Self::new();
        layer.load_from_geojson(geojson_str)?;
        Ok(layer)
    }

    /// Parses a layer from shapefile bytes (.shp plus optional .dbf for names).
    pub fn from_shapefile(shp_bytes: &[u8], dbf_bytes: Option<&[u8]>) -> Result<Self, LoadError> {
        let mut layer = Self::new();
        layer.load_from_shapefile(shp_bytes, dbf_bytes)?;
        Ok(layer)
    }

    /// Finds a feature by name.
    #[cfg(test)]
    pub fn find(&self, name: &str) -> Option<&StateBoundary> {
        self.features
            .iter()
            .find(|f| f.name.as_deref() == Some(name))
    }

    /// Loads polygon features from GeoJSON data. Non-polygon geometries are skipped.
    pub fn load_from_geojson(&mut self, geojson_str: &str) -> Result<(), LoadError> {
        let geojson: GeoJson = geojson_str
            .parse()
            .map_err(|e| LoadError::Geography(format!("invalid GeoJSON: {}", e)))?;

        match geojson {
            GeoJson::FeatureCollection(fc) => {
                for feature in &fc.features {
                    self.push_feature(feature);
                }
            }
            GeoJson::Feature(f) => self.push_feature(&f),
            GeoJson::Geometry(g) => {
                if let Some(shape) = convert_geometry(&g) {
                    self.features.push(StateBoundary { name: None, shape });
                }
            }
        }

        Ok(())
    }

    fn push_feature(&mut self, feature: &Feature) {
        let name = NAME_FIELDS
            .iter()
            .find_map(|field| feature.property(field))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        match feature.geometry.as_ref().and_then(convert_geometry) {
            Some(shape) => self.features.push(StateBoundary { name, shape }),
            None => log::debug!("Skipping non-polygon feature {:?}", name),
        }
    }

    /// Loads polygon features from a shapefile (.shp and .dbf bytes).
    ///
    /// The dbf records are only used for feature names; a missing or
    /// unreadable dbf leaves features unnamed.
    pub fn load_from_shapefile(
        &mut self,
        shp_bytes: &[u8],
        dbf_bytes: Option<&[u8]>,
    ) -> Result<(), LoadError> {
        let mut shape_reader = shapefile::ShapeReader::new(Cursor::new(shp_bytes))
            .map_err(|e| LoadError::Geography(format!("invalid shapefile: {}", e)))?;

        let dbf_records: Option<Vec<shapefile::dbase::Record>> = dbf_bytes.and_then(|bytes| {
            shapefile::dbase::Reader::new(Cursor::new(bytes))
                .ok()
                .and_then(|mut r: shapefile::dbase::Reader<Cursor<&[u8]>>| r.read().ok())
        });

        for (idx, result) in shape_reader.iter_shapes().enumerate() {
            let shape: shapefile::Shape =
                result.map_err(|e| LoadError::Geography(format!("bad shape {}: {}", idx, e)))?;

            let name = dbf_records
                .as_ref()
                .and_then(|records| records.get(idx))
                .and_then(|record| {
                    NAME_FIELDS.iter().find_map(|field| match record.get(field) {
                        Some(FieldValue::Character(Some(s))) => Some(s.trim().to_string()),
                        _ => None,
                    })
                });

            if let shapefile::Shape::Polygon(poly) = shape {
                if let Some(shape) = convert_shapefile_polygon(&poly) {
                    self.features.push(StateBoundary { name, shape });
                }
            }
        }

        Ok(())
    }
}

fn to_line_string(ring: &[Vec<f64>]) -> LineString<f64> {
    ring.iter()
        .filter(|c| c.len() >= 2)
        .map(|c| Coord { x: c[0], y: c[1] })
        .collect::<Vec<_>>()
        .into()
}

fn to_polygon(rings: &PolygonType) -> Option<Polygon<f64>> {
    let (exterior, holes) = rings.split_first()?;
    Some(Polygon::new(
        to_line_string(exterior),
        holes.iter().map(|h| to_line_string(h)).collect(),
    ))
}

fn convert_geometry(geometry: &Geometry) -> Option<MultiPolygon<f64>> {
    match &geometry.value {
        Value::Polygon(rings) => to_polygon(rings).map(|p| MultiPolygon::new(vec![p])),
        Value::MultiPolygon(polygons) => {
            let polygons: Vec<Polygon<f64>> = polygons.iter().filter_map(to_polygon).collect();
            (!polygons.is_empty()).then(|| MultiPolygon::new(polygons))
        }
        Value::GeometryCollection(geometries) => {
            let polygons: Vec<Polygon<f64>> = geometries
                .iter()
                .filter_map(convert_geometry)
                .flat_map(|mp| mp.0)
                .collect();
            (!polygons.is_empty()).then(|| MultiPolygon::new(polygons))
        }
        _ => None,
    }
}

fn convert_shapefile_polygon(poly: &shapefile::Polygon) -> Option<MultiPolygon<f64>> {
    use shapefile::PolygonRing;

    // Shapefile polygons list outer rings each followed by their holes.
    let mut polygons: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();

    for ring in poly.rings() {
        let coords: LineString<f64> = ring
            .points()
            .iter()
            .map(|p| Coord { x: p.x, y: p.y })
            .collect::<Vec<_>>()
            .into();

        match ring {
            PolygonRing::Outer(_) => polygons.push((coords, Vec::new())),
            PolygonRing::Inner(_) => match polygons.last_mut() {
                Some((_, holes)) => holes.push(coords),
                None => log::debug!("Dropping hole with no outer ring"),
            },
        }
    }

    if polygons.is_empty() {
        return None;
    }

    Some(MultiPolygon::new(
        polygons
            .into_iter()
            .map(|(exterior, holes)| Polygon::new(exterior, holes))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Utah" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[-114.05, 42.0], [-111.05, 42.0], [-111.05, 41.0],
                                     [-109.05, 41.0], [-109.05, 37.0], [-114.05, 37.0],
                                     [-114.05, 42.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "NAME": "Hawaii" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[-156.1, 18.9], [-154.8, 18.9], [-154.8, 20.3], [-156.1, 18.9]]],
                        [[[-158.3, 21.2], [-157.6, 21.2], [-157.6, 21.7], [-158.3, 21.2]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Capitol" },
                "geometry": { "type": "Point", "coordinates": [-77.0, 38.9] }
            }
        ]
    }"#;

    #[test]
    fn test_geojson_polygons_and_names() {
        let layer = GeoLayer::from_geojson(STATES).unwrap();

        assert_eq!(layer.features.len(), 2);
        let utah = layer.find("Utah").unwrap();
        assert_eq!(utah.shape.0.len(), 1);
        assert_eq!(utah.shape.0[0].exterior().0.len(), 7);

        let hawaii = layer.find("Hawaii").unwrap();
        assert_eq!(hawaii.shape.0.len(), 2);
    }

    #[test]
    fn test_invalid_geojson() {
        let err = GeoLayer::from_geojson("{ not json").unwrap_err();
        assert!(matches!(err, LoadError::Geography(_)));
    }

    #[test]
    fn test_invalid_shapefile() {
        let err = GeoLayer::from_shapefile(b"definitely not a shapefile", None).unwrap_err();
        assert!(matches!(err, LoadError::Geography(_)));
    }
}
