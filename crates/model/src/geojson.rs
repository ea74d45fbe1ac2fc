//! Minimal GeoJSON builders for the sources handed to the map surface.

use serde_json::{json, Map, Value};

use crate::GeoPoint;

pub fn point(point: &GeoPoint) -> Value {
    json!({
        "type": "Point",
        "coordinates": point.coordinates(),
    })
}

pub fn line_string(points: &[GeoPoint]) -> Value {
    json!({
        "type": "LineString",
        "coordinates": points.iter().map(GeoPoint::coordinates).collect::<Vec<_>>(),
    })
}

pub fn feature(geometry: Value, properties: Map<String, Value>) -> Value {
    json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": properties,
    })
}

pub fn feature_collection(features: Vec<Value>) -> Value {
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}
