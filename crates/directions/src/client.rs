use std::{env, time::Duration};

use async_trait::async_trait;
use model::GeoPoint;
use serde::{Deserialize, Serialize};

use crate::{response::DirectionsResponse, ApiError, DirectionsProvider, RouteRequest};

pub const DIRECTIONS_API_URL: &str = "https://api.mapbox.com/directions/v5";

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionsCredentials {
    pub access_token: String,
}

impl DirectionsCredentials {
    pub fn new<S: Into<String>>(access_token: S) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    /// Reads `MAPBOX_TOKEN`, falling back to `VITE_MAPBOX_TOKEN`.
    pub fn from_env() -> Option<Self> {
        let access_token = env::var("MAPBOX_TOKEN")
            .or_else(|_| env::var("VITE_MAPBOX_TOKEN"))
            .ok()?;
        Some(Self::new(access_token))
    }
}

// keeps the token out of logs
impl std::fmt::Debug for DirectionsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectionsCredentials")
            .field("access_token", &"***")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DirectionsConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            base_url: DIRECTIONS_API_URL.to_owned(),
            profile: "mapbox/driving".to_owned(),
            timeout_secs: 10,
        }
    }
}

pub struct DirectionsClient {
    pub credentials: DirectionsCredentials,
    pub config: DirectionsConfig,
    http: reqwest::Client,
}

impl DirectionsClient {
    pub fn new(
        credentials: &DirectionsCredentials,
        config: &DirectionsConfig,
    ) -> Result<Self, ApiError> {
        if credentials.access_token.trim().is_empty() {
            return Err(ApiError::MissingCredentials);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            credentials: credentials.clone(),
            config: config.clone(),
            http,
        })
    }

    /// Url without query, the coordinates are part of the path.
    pub fn endpoint(&self, request: &RouteRequest) -> String {
        format!(
            "{}/{}/{};{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coordinate(&request.from),
            coordinate(&request.to),
        )
    }

    pub fn query(&self, request: &RouteRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("geometries", "geojson".to_owned()),
            ("overview", "full".to_owned()),
        ];
        if let Some(exclude) = request.exclude() {
            query.push(("exclude", exclude));
        }
        query.push(("access_token", self.credentials.access_token.clone()));
        query
    }
}

fn coordinate(point: &GeoPoint) -> String {
    format!("{},{}", point.longitude, point.latitude)
}

#[async_trait]
impl DirectionsProvider for DirectionsClient {
    async fn route(&self, request: &RouteRequest) -> Result<Vec<GeoPoint>, ApiError> {
        let url = self.endpoint(request);
        log::info!(
            "Requesting route '{url}' avoiding {} obstacle(s).",
            request.obstacles.len()
        );

        let response = self.http.get(&url).query(&self.query(request)).send().await?;

        match response.status() {
            reqwest::StatusCode::OK => {
                let body: DirectionsResponse = serde_json::from_str(&response.text().await?)?;
                body.into_first_route()
            }
            other => match response.text().await {
                Ok(val) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: Some(val),
                }),
                Err(_) => Err(ApiError::InvalidResponse {
                    status_code: other,
                    url,
                    response: None,
                }),
            },
        }
    }
}
