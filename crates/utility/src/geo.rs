pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Length of one degree of latitude in meters (spherical earth).
pub const METERS_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

pub fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Axis aligned box in degrees. Longitude is `x`, latitude is `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.min_lon..=self.max_lon).contains(&lon)
            && (self.min_lat..=self.max_lat).contains(&lat)
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

/// Square approximation of a circle with `radius_m` around a center.
/// Not geodesically exact: the longitude span is widened by `1 / cos(lat)`.
pub fn calculate_bounding_box(lon: f64, lat: f64, radius_m: f64) -> BoundingBox {
    let lat_delta = radius_m / METERS_PER_DEGREE;
    // cos(lat) approaches zero at the poles
    let lon_delta = radius_m / (METERS_PER_DEGREE * to_radians(lat).cos().max(1e-9));

    BoundingBox {
        min_lon: lon - lon_delta,
        min_lat: lat - lat_delta,
        max_lon: lon + lon_delta,
        max_lat: lat + lat_delta,
    }
}

/// Great circle distance in meters.
pub fn haversine_distance(
    longitude_1: f64,
    latitude_1: f64,
    longitude_2: f64,
    latitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_is_centered() {
        let bbox = calculate_bounding_box(17.1077, 48.1486, 1000.0);
        assert!(bbox.contains(17.1077, 48.1486));
        assert!(((bbox.min_lon + bbox.max_lon) / 2.0 - 17.1077).abs() < 1e-12);
        assert!(((bbox.min_lat + bbox.max_lat) / 2.0 - 48.1486).abs() < 1e-12);
        // longitude span is wider than latitude span away from the equator
        assert!(bbox.width() > bbox.height());
    }

    #[test]
    fn bounding_box_edges_are_radius_away() {
        let bbox = calculate_bounding_box(17.1077, 48.1486, 1000.0);
        let north = haversine_distance(17.1077, 48.1486, 17.1077, bbox.max_lat);
        let east = haversine_distance(17.1077, 48.1486, bbox.max_lon, 48.1486);
        assert!((north - 1000.0).abs() < 1.0);
        assert!((east - 1000.0).abs() < 1.0);
    }

    #[test]
    fn haversine_known_distance() {
        // Bratislava -> Vienna, roughly 55 km
        let distance = haversine_distance(17.1077, 48.1486, 16.3738, 48.2082);
        assert!((54_000.0..56_000.0).contains(&distance), "{distance}");
        assert_eq!(haversine_distance(1.0, 2.0, 1.0, 2.0), 0.0);
    }
}
