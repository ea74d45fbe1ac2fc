use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utility::id::{HasId, Id};

use crate::{geojson, heat::HeatmapStyle, GeoPoint};

pub type OverlayId = Id<Layer>;

pub const START: &str = "start";
pub const END: &str = "end";
pub const ROUTE: &str = "route";
pub const HEATMAP: &str = "heatmap";
pub const FLOOD_PREFIX: &str = "flood";

pub fn start_id() -> OverlayId {
    Id::from(START)
}

pub fn end_id() -> OverlayId {
    Id::from(END)
}

pub fn route_id() -> OverlayId {
    Id::from(ROUTE)
}

pub fn heatmap_id() -> OverlayId {
    Id::from(HEATMAP)
}

/// Obstacle markers are numbered by obstacle count so earlier ones are never
/// replaced.
pub fn flood_id(count: usize) -> OverlayId {
    Id::new(format!("{FLOOD_PREFIX}-{count}"))
}

/// CSS color string as understood by the map style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub String);

impl Color {
    pub fn new<S: Into<String>>(hex: S) -> Self {
        Self(hex.into())
    }

    pub fn start() -> Self {
        Self::new("#22c55e")
    }

    pub fn end() -> Self {
        Self::new("#ef4444")
    }

    pub fn flood() -> Self {
        Self::new("#3b82f6")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
    pub opacity: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::new("#3887be"),
            width: 5.0,
            opacity: 0.75,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerKind {
    Marker { color: Color },
    Line(LineStyle),
    Heatmap(HeatmapStyle),
}

/// A named renderable feature. The `source` is the GeoJSON data the layer
/// draws, registered under the same id as the layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: OverlayId,
    pub kind: LayerKind,
    pub source: Value,
}

impl HasId for Layer {
    type IdType = String;
}

impl Layer {
    pub fn marker(id: OverlayId, point: &GeoPoint, color: Color) -> Self {
        Self {
            id,
            kind: LayerKind::Marker { color },
            source: geojson::feature(geojson::point(point), Map::new()),
        }
    }

    pub fn line(id: OverlayId, points: &[GeoPoint], style: LineStyle) -> Self {
        Self {
            id,
            kind: LayerKind::Line(style),
            source: geojson::feature(geojson::line_string(points), Map::new()),
        }
    }
}
