use serde_json::{json, Map, Value};

use crate::{
    geojson,
    overlay::{Color, Layer, LayerKind, OverlayId},
    GeoPoint,
};

pub const INTENSITY_PROPERTY: &str = "intensity";

/// A sampled point of the synthetic heatmap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatSample {
    pub point: GeoPoint,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeatmapStyle {
    /// Density value to color, ascending by density.
    pub color_ramp: Vec<(f64, Color)>,
    /// Zoom level to radius in pixels, ascending by zoom.
    pub radius_stops: Vec<(f64, f64)>,
    pub opacity: f64,
}

impl HeatmapStyle {
    /// Style expression in the form the map widget consumes.
    pub fn paint(&self) -> Value {
        let mut color = vec![
            json!("interpolate"),
            json!(["linear"]),
            json!(["heatmap-density"]),
        ];
        for (density, ramp_color) in &self.color_ramp {
            color.push(json!(density));
            color.push(json!(ramp_color));
        }

        let mut radius = vec![json!("interpolate"), json!(["linear"]), json!(["zoom"])];
        for (zoom, pixels) in &self.radius_stops {
            radius.push(json!(zoom));
            radius.push(json!(pixels));
        }

        json!({
            "heatmap-weight": ["get", INTENSITY_PROPERTY],
            "heatmap-color": color,
            "heatmap-radius": radius,
            "heatmap-opacity": self.opacity,
        })
    }
}

impl Layer {
    /// Point cloud layer, every sample carries `weight * intensity_scale`.
    pub fn heatmap(
        id: OverlayId,
        samples: &[HeatSample],
        intensity_scale: f64,
        style: HeatmapStyle,
    ) -> Self {
        let features = samples
            .iter()
            .map(|sample| {
                let mut properties = Map::new();
                properties.insert(
                    INTENSITY_PROPERTY.to_owned(),
                    json!(sample.weight * intensity_scale),
                );
                geojson::feature(geojson::point(&sample.point), properties)
            })
            .collect::<Vec<_>>();

        Self {
            id,
            kind: LayerKind::Heatmap(style),
            source: geojson::feature_collection(features),
        }
    }
}
