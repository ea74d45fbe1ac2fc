use std::error;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use model::GeoPoint;

pub mod client;
pub mod response;

pub use client::{DirectionsClient, DirectionsConfig, DirectionsCredentials};

#[derive(Debug, Clone)]
pub enum ApiError {
    RequestError(Arc<reqwest::Error>),
    JsonError(Arc<serde_json::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
        response: Option<String>,
    },
    NoRoute,
    MissingCredentials,
    Other(String),
}

impl error::Error for ApiError {}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            ApiError::JsonError(e) => write!(f, "JSON parse error: {}", e),
            ApiError::InvalidResponse {
                status_code,
                url,
                response,
            } => match response {
                Some(text) => {
                    write!(f, "Invalid Response ({}) {}: {}", status_code, text, url)
                }
                None => write!(f, "Invalid Response ({}) {}", status_code, url),
            },
            ApiError::NoRoute => write!(f, "No route found."),
            ApiError::MissingCredentials => write!(f, "Missing directions access token."),
            ApiError::Other(why) => write!(f, "{}", why),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::RequestError(Arc::new(e))
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::JsonError(Arc::new(e))
    }
}

/// A driving route query between two points, avoiding every obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub from: GeoPoint,
    pub to: GeoPoint,
    pub obstacles: Vec<GeoPoint>,
}

impl RouteRequest {
    pub fn new(from: GeoPoint, to: GeoPoint, obstacles: Vec<GeoPoint>) -> Self {
        Self {
            from,
            to,
            obstacles,
        }
    }

    /// `point(<lng> <lat>),...` or `None` without obstacles.
    pub fn exclude(&self) -> Option<String> {
        if self.obstacles.is_empty() {
            return None;
        }
        let points = self
            .obstacles
            .iter()
            .map(|obstacle| format!("point({} {})", obstacle.longitude, obstacle.latitude))
            .collect::<Vec<_>>();
        Some(points.join(","))
    }
}

/// Anything that can turn a route request into the route geometry.
#[async_trait]
pub trait DirectionsProvider: Send + Sync + 'static {
    async fn route(&self, request: &RouteRequest) -> Result<Vec<GeoPoint>, ApiError>;
}

#[async_trait]
impl<P: DirectionsProvider> DirectionsProvider for Arc<P> {
    async fn route(&self, request: &RouteRequest) -> Result<Vec<GeoPoint>, ApiError> {
        self.as_ref().route(request).await
    }
}
