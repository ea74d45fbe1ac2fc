//! Adapter between widget events and the core.
//!
//! A session owns the waypoint state and the overlay manager and handles
//! one event at a time. [`run`] moves it onto its own task, widget bindings
//! then only talk to the returned [`SessionHandle`].

use std::panic::AssertUnwindSafe;

use directions::DirectionsProvider;
use futures::FutureExt;
use model::{
    overlay::{self, OverlayId},
    path::{ObstacleSet, Path},
    GeoPoint,
};
use noise::Perlin;
use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::{mpsc, oneshot};

use crate::{
    config::MapConfig,
    heatmap::{heatmap_layer, HeatmapSampler, NoiseSource},
    overlay::{RouteOverlayManager, RouteStatus},
    surface::MapSurface,
    waypoints::{Command, Input, Waypoints},
    SessionResult,
};

const MAILBOX_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    Load,
    Click(GeoPoint),
    ContextMenu(GeoPoint),
}

#[derive(Debug, Clone)]
pub struct Snapshot {
    pub path: Path,
    pub obstacles: ObstacleSet,
    pub layers: Vec<OverlayId>,
    pub route: Option<RouteStatus>,
}

pub struct MapSession<S, P, N = Perlin>
where
    S: MapSurface,
    P: DirectionsProvider,
    N: NoiseSource,
{
    config: MapConfig,
    waypoints: Waypoints,
    overlays: RouteOverlayManager<S, P>,
    sampler: HeatmapSampler<N>,
    rng: StdRng,
    loaded: bool,
}

impl<S, P> MapSession<S, P, Perlin>
where
    S: MapSurface,
    P: DirectionsProvider,
{
    pub fn new(config: MapConfig, surface: S, provider: P) -> Self {
        let sampler = HeatmapSampler::from_config(&config.heatmap);
        let rng = StdRng::seed_from_u64(config.heatmap.seed.into());
        Self::with_sampler(config, surface, provider, sampler, rng)
    }
}

impl<S, P, N> MapSession<S, P, N>
where
    S: MapSurface,
    P: DirectionsProvider,
    N: NoiseSource,
{
    pub fn with_sampler(
        config: MapConfig,
        surface: S,
        provider: P,
        sampler: HeatmapSampler<N>,
        rng: StdRng,
    ) -> Self {
        let overlays = RouteOverlayManager::new(surface, provider, config.route_style.clone());
        Self {
            config,
            waypoints: Waypoints::new(),
            overlays,
            sampler,
            rng,
            loaded: false,
        }
    }

    pub fn overlays(&self) -> &RouteOverlayManager<S, P> {
        &self.overlays
    }

    pub async fn handle(&mut self, event: MapEvent) {
        match event {
            MapEvent::Load => self.load().await,
            MapEvent::Click(point) => self.input(Input::Primary(point)).await,
            MapEvent::ContextMenu(point) => self.input(Input::Secondary(point)).await,
        }
    }

    /// Renders the heat layer, once per session.
    async fn load(&mut self) {
        if self.loaded {
            return;
        }
        let heatmap = &self.config.heatmap;
        let samples = self.sampler.sample(
            &mut self.rng,
            heatmap.center,
            heatmap.radius_m,
            heatmap.count,
        );
        log::info!("rendering heatmap with {} samples", samples.len());
        self.overlays.replace(heatmap_layer(&samples, heatmap)).await;
        self.loaded = true;
    }

    async fn input(&mut self, input: Input) {
        for command in self.waypoints.apply(input) {
            match command {
                Command::AddMarker { id, point, color } => {
                    self.overlays.add_marker(id, point, color).await
                }
                Command::RemoveOverlay(id) => self.overlays.remove(&id).await,
                Command::DrawRoute { id, request } => {
                    self.overlays.draw_route(id, request).await
                }
            }
        }
    }

    pub async fn settle(&mut self) {
        self.overlays.settle().await;
    }

    pub async fn snapshot(&self) -> Snapshot {
        Snapshot {
            path: *self.waypoints.path(),
            obstacles: self.waypoints.obstacles().clone(),
            layers: self
                .overlays
                .with_surface(|surface| {
                    present_overlays(surface, self.waypoints.obstacles().len())
                })
                .await,
            route: self.overlays.route_status(&overlay::route_id()).await,
        }
    }
}

/// Every overlay id the session may have created that is currently shown.
fn present_overlays<S: MapSurface>(surface: &S, obstacles: usize) -> Vec<OverlayId> {
    [overlay::HEATMAP, overlay::START, overlay::END, overlay::ROUTE]
        .into_iter()
        .map(OverlayId::from)
        .chain((1..=obstacles).map(overlay::flood_id))
        .filter(|id| surface.get_layer(id).is_some())
        .collect()
}

#[derive(Debug)]
pub enum SessionMessage {
    Event(MapEvent),
    Snapshot(oneshot::Sender<Snapshot>),
    Settle(oneshot::Sender<()>),
}

#[derive(Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
}

impl SessionHandle {
    pub async fn send(&self, event: MapEvent) -> SessionResult<()> {
        self.sender.send(SessionMessage::Event(event)).await?;
        Ok(())
    }

    pub async fn snapshot(&self) -> SessionResult<Snapshot> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(SessionMessage::Snapshot(tx)).await?;
        Ok(rx.await?)
    }

    /// Resolves once all route requests issued so far are done.
    pub async fn settle(&self) -> SessionResult<()> {
        let (tx, rx) = oneshot::channel();
        self.sender.send(SessionMessage::Settle(tx)).await?;
        Ok(rx.await?)
    }
}

/// Runs the session on its own task. A panicking event handler is logged and
/// the session keeps its state and carries on with the next message.
pub fn run<S, P, N>(mut session: MapSession<S, P, N>) -> SessionHandle
where
    S: MapSurface,
    P: DirectionsProvider,
    N: NoiseSource,
{
    let (tx, mut rx) = mpsc::channel(MAILBOX_SIZE);

    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            match message {
                SessionMessage::Event(event) => {
                    let result = AssertUnwindSafe(session.handle(event))
                        .catch_unwind()
                        .await;
                    if let Err(why) = result {
                        log::error!("session paniced handling {:?}: {:?}", event, why);
                    }
                }
                SessionMessage::Snapshot(respond_to) => {
                    respond_to
                        .send(session.snapshot().await)
                        .unwrap_or_else(|_| log::error!("Can not respond to snapshot!"));
                }
                SessionMessage::Settle(respond_to) => {
                    session.settle().await;
                    respond_to
                        .send(())
                        .unwrap_or_else(|_| log::error!("Can not respond to settle!"));
                }
            }
        }
    });

    SessionHandle { sender: tx }
}
