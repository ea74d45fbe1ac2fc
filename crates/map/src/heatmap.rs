//! Synthetic heat layer: noise modulated by distance to a center.

use model::{
    heat::HeatSample,
    overlay::{self, Layer},
    GeoPoint,
};
use noise::{NoiseFn, Perlin};
use rand::Rng;
use utility::geo;

use crate::config::{DecayMode, HeatmapConfig};

/// Smooth 2d noise in `[-1, 1]`.
pub trait NoiseSource: Send + Sync + 'static {
    fn value(&self, x: f64, y: f64) -> f64;
}

impl<T> NoiseSource for T
where
    T: NoiseFn<f64, 2> + Send + Sync + 'static,
{
    fn value(&self, x: f64, y: f64) -> f64 {
        self.get([x, y])
    }
}

pub struct HeatmapSampler<N: NoiseSource = Perlin> {
    noise: N,
    frequency: f64,
    decay: DecayMode,
}

impl HeatmapSampler<Perlin> {
    pub fn from_config(config: &HeatmapConfig) -> Self {
        Self::new(Perlin::new(config.seed), config.frequency, config.decay)
    }
}

impl<N: NoiseSource> HeatmapSampler<N> {
    pub fn new(noise: N, frequency: f64, decay: DecayMode) -> Self {
        Self {
            noise,
            frequency,
            decay,
        }
    }

    /// Draws `count` points uniformly from the square around `center` and
    /// weights each by `noise * decay`.
    pub fn sample<R: Rng>(
        &self,
        rng: &mut R,
        center: GeoPoint,
        radius_m: f64,
        count: usize,
    ) -> Vec<HeatSample> {
        let radius_m = if radius_m.is_finite() {
            radius_m.max(0.0)
        } else {
            0.0
        };
        let bbox = geo::calculate_bounding_box(center.longitude, center.latitude, radius_m);

        (0..count)
            .map(|_| {
                let point = GeoPoint::new(
                    rng.gen_range(bbox.min_lon..=bbox.max_lon),
                    rng.gen_range(bbox.min_lat..=bbox.max_lat),
                );
                let noise = (self
                    .noise
                    .value(point.longitude * self.frequency, point.latitude * self.frequency)
                    + 1.0)
                    / 2.0;
                let ratio = if radius_m > 0.0 {
                    point.distance_to(&center) / radius_m
                } else {
                    0.0
                };
                HeatSample {
                    point,
                    weight: noise.clamp(0.0, 1.0) * self.decay.decay(ratio),
                }
            })
            .collect()
    }
}

/// The rendered density layer for a batch of samples.
pub fn heatmap_layer(samples: &[HeatSample], config: &HeatmapConfig) -> Layer {
    Layer::heatmap(
        overlay::heatmap_id(),
        samples,
        config.intensity_scale,
        config.style(),
    )
}
