//! Named overlays on the map surface and the route requests feeding them.

use std::{collections::HashMap, sync::Arc};

use directions::{ApiError, DirectionsProvider, RouteRequest};
use model::{
    overlay::{Color, Layer, LineStyle, OverlayId},
    GeoPoint,
};
use tokio::{sync::Mutex, task::JoinHandle};
use tokio_util::sync::CancellationToken;

use crate::surface::MapSurface;

#[derive(Debug, Clone)]
pub enum RouteStatus {
    Pending,
    Ready { points: usize },
    Failed(ApiError),
    /// Replaced by a newer request or removed before the answer arrived.
    Cancelled,
}

/// Surface and route bookkeeping behind one lock, so removing the old route
/// and adding the new one is a single step.
struct Shared<S> {
    surface: S,
    routes: HashMap<OverlayId, RouteStatus>,
}

struct InFlight {
    token: CancellationToken,
    task: JoinHandle<()>,
}

pub struct RouteOverlayManager<S, P>
where
    S: MapSurface,
    P: DirectionsProvider,
{
    shared: Arc<Mutex<Shared<S>>>,
    provider: Arc<P>,
    style: LineStyle,
    in_flight: HashMap<OverlayId, InFlight>,
}

impl<S, P> RouteOverlayManager<S, P>
where
    S: MapSurface,
    P: DirectionsProvider,
{
    pub fn new(surface: S, provider: P, style: LineStyle) -> Self {
        Self {
            shared: Arc::new(Mutex::new(Shared {
                surface,
                routes: HashMap::new(),
            })),
            provider: Arc::new(provider),
            style,
            in_flight: HashMap::new(),
        }
    }

    pub async fn add_marker(&mut self, id: OverlayId, point: GeoPoint, color: Color) {
        self.replace(Layer::marker(id, &point, color)).await;
    }

    /// Places any layer with replace semantics.
    pub async fn replace(&mut self, layer: Layer) {
        let mut shared = self.shared.lock().await;
        cancel(&mut self.in_flight, &mut *shared, &layer.id);
        shared.surface.replace_overlay(layer);
    }

    /// Removes the overlay and abandons a route still being fetched for it.
    pub async fn remove(&mut self, id: &OverlayId) {
        let mut shared = self.shared.lock().await;
        cancel(&mut self.in_flight, &mut *shared, id);
        if !matches!(shared.routes.get(id), Some(RouteStatus::Cancelled)) {
            shared.routes.remove(id);
        }
        shared.surface.remove_overlay(id);
    }

    /// Requests a route and, once it arrives, replaces the line overlay `id`.
    /// A request still running for the same id is superseded. On failure the
    /// current overlay stays as it is and the error is kept as route status.
    pub async fn draw_route(&mut self, id: OverlayId, request: RouteRequest) {
        let token = CancellationToken::new();
        {
            let mut shared = self.shared.lock().await;
            cancel(&mut self.in_flight, &mut *shared, &id);
            shared.routes.insert(id.clone(), RouteStatus::Pending);
        }

        log::info!(
            "drawing route '{}' from {} to {} around {} obstacle(s)",
            id,
            request.from,
            request.to,
            request.obstacles.len()
        );
        let task = tokio::spawn(draw(
            self.shared.clone(),
            self.provider.clone(),
            self.style.clone(),
            id.clone(),
            request,
            token.clone(),
        ));
        self.in_flight.insert(id, InFlight { token, task });
    }

    pub async fn route_status(&self, id: &OverlayId) -> Option<RouteStatus> {
        self.shared.lock().await.routes.get(id).cloned()
    }

    /// Waits for every route request issued so far.
    pub async fn settle(&mut self) {
        for (id, in_flight) in self.in_flight.drain() {
            if let Err(why) = in_flight.task.await {
                log::error!("route task '{}' failed: {:?}", id, why);
                let mut shared = self.shared.lock().await;
                if matches!(shared.routes.get(&id), Some(RouteStatus::Pending)) {
                    shared
                        .routes
                        .insert(id, RouteStatus::Failed(ApiError::Other(why.to_string())));
                }
            }
        }
    }

    pub async fn with_surface<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.shared.lock().await.surface)
    }
}

// caller holds the lock; a route still `Pending` here has not been applied
// and never will be once the token is cancelled
fn cancel<S>(
    in_flight: &mut HashMap<OverlayId, InFlight>,
    shared: &mut Shared<S>,
    id: &OverlayId,
) {
    if let Some(in_flight) = in_flight.remove(id) {
        in_flight.token.cancel();
        if matches!(shared.routes.get(id), Some(RouteStatus::Pending)) {
            log::debug!("cancelled route request for '{}'", id);
            shared.routes.insert(id.clone(), RouteStatus::Cancelled);
        }
    }
}

async fn draw<S, P>(
    shared: Arc<Mutex<Shared<S>>>,
    provider: Arc<P>,
    style: LineStyle,
    id: OverlayId,
    request: RouteRequest,
    token: CancellationToken,
) where
    S: MapSurface,
    P: DirectionsProvider,
{
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => return,
        result = provider.route(&request) => result,
    };

    let mut shared = shared.lock().await;
    if token.is_cancelled() {
        return;
    }
    let result = result.and_then(|points| {
        if points.is_empty() {
            Err(ApiError::NoRoute)
        } else {
            Ok(points)
        }
    });
    match result {
        Ok(points) => {
            shared
                .surface
                .replace_overlay(Layer::line(id.clone(), &points, style));
            shared
                .routes
                .insert(id, RouteStatus::Ready { points: points.len() });
        }
        Err(why) => {
            log::warn!("could not draw route '{}': {}", id, why);
            shared.routes.insert(id, RouteStatus::Failed(why));
        }
    }
}
