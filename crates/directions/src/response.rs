use model::GeoPoint;
use serde::Deserialize;

use crate::ApiError;

#[derive(Debug, Clone, Deserialize)]
pub struct DirectionsResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Route {
    pub geometry: RouteGeometry,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RouteGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

impl DirectionsResponse {
    /// Geometry of the first candidate route.
    pub fn into_first_route(self) -> Result<Vec<GeoPoint>, ApiError> {
        let route = self.routes.into_iter().next().ok_or(ApiError::NoRoute)?;
        Ok(route
            .geometry
            .coordinates
            .into_iter()
            .map(GeoPoint::from)
            .collect())
    }
}
