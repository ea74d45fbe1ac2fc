use directions::DirectionsConfig;
use model::{
    heat::HeatmapStyle,
    overlay::{Color, LineStyle},
    GeoPoint,
};
use serde::{Deserialize, Serialize};

/// Bratislava old town.
pub const DEFAULT_CENTER: GeoPoint = GeoPoint::new(17.1077, 48.1486);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewConfig {
    pub center: GeoPoint,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub pitch: f64,
    pub drag_rotate: bool,
    pub touch_pitch: bool,
    pub style: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: 14.0,
            min_zoom: 12.0,
            max_zoom: 22.0,
            pitch: 0.0,
            drag_rotate: false,
            touch_pitch: false,
            style: "mapbox://styles/mapbox/streets-v9".to_owned(),
        }
    }
}

/// How the falloff behaves for samples further away than the radius.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DecayMode {
    /// Distance ratio is clamped to `[0, 1]`, decay never drops below zero.
    #[default]
    Clamped,
    /// Raw ratio, decay turns negative outside the radius.
    Unclamped,
}

impl DecayMode {
    pub fn decay(&self, distance_ratio: f64) -> f64 {
        let ratio = match self {
            Self::Clamped => distance_ratio.clamp(0.0, 1.0),
            Self::Unclamped => distance_ratio,
        };
        (ratio * std::f64::consts::FRAC_PI_2).cos()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeatmapConfig {
    pub center: GeoPoint,
    pub radius_m: f64,
    pub count: usize,
    pub frequency: f64,
    pub decay: DecayMode,
    pub intensity_scale: f64,
    pub seed: u32,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_step: f64,
    /// `radius(zoom) = 2^zoom * radius_base` in pixels.
    pub radius_base: f64,
    pub opacity: f64,
    pub color_ramp: Vec<(f64, Color)>,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            radius_m: 2000.0,
            count: 10_000,
            frequency: 30.0,
            decay: DecayMode::default(),
            intensity_scale: 5.0,
            seed: 0,
            min_zoom: 12.0,
            max_zoom: 22.0,
            zoom_step: 1.0,
            radius_base: 0.0015,
            opacity: 0.8,
            color_ramp: vec![
                (0.0, Color::new("rgba(33,102,172,0)")),
                (0.2, Color::new("#67a9cf")),
                (0.4, Color::new("#d1e5f0")),
                (0.6, Color::new("#fddbc7")),
                (0.8, Color::new("#ef8a62")),
                (1.0, Color::new("#b2182b")),
            ],
        }
    }
}

impl HeatmapConfig {
    /// Radius stops sampled every `zoom_step` between `min_zoom` and `max_zoom`.
    pub fn radius_stops(&self) -> Vec<(f64, f64)> {
        let mut stops = vec![];
        if self.zoom_step <= 0.0 || !self.zoom_step.is_finite() {
            stops.push((self.min_zoom, self.min_zoom.exp2() * self.radius_base));
            return stops;
        }
        let mut step = 0;
        loop {
            let zoom = self.min_zoom + step as f64 * self.zoom_step;
            if zoom > self.max_zoom + 1e-9 {
                break;
            }
            stops.push((zoom, zoom.exp2() * self.radius_base));
            step += 1;
        }
        stops
    }

    pub fn style(&self) -> HeatmapStyle {
        HeatmapStyle {
            color_ramp: self.color_ramp.clone(),
            radius_stops: self.radius_stops(),
            opacity: self.opacity,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MapConfig {
    pub view: ViewConfig,
    pub heatmap: HeatmapConfig,
    pub directions: DirectionsConfig,
    pub route_style: LineStyle,
}
