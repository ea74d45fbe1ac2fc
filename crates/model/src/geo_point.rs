use std::fmt;

use serde::{Deserialize, Serialize};
use utility::geo;

/// A (longitude, latitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// GeoJSON position order.
    pub fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Distance in meters.
    pub fn distance_to(&self, other: &GeoPoint) -> f64 {
        geo::haversine_distance(
            self.longitude,
            self.latitude,
            other.longitude,
            other.latitude,
        )
    }
}

impl From<[f64; 2]> for GeoPoint {
    fn from([longitude, latitude]: [f64; 2]) -> Self {
        Self::new(longitude, latitude)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)
    }
}
