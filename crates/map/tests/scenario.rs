use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use directions::{response::DirectionsResponse, ApiError, DirectionsProvider, RouteRequest};
use map::{
    overlay::RouteStatus,
    session::{self, MapEvent, MapSession},
    surface::{MapSurface, MemorySurface, SurfaceOp},
    MapConfig,
};
use model::{overlay, path::Path, GeoPoint};

const START: GeoPoint = GeoPoint::new(17.10, 48.15);
const END: GeoPoint = GeoPoint::new(17.11, 48.15);
const FLOOD: GeoPoint = GeoPoint::new(17.105, 48.149);

/// Replies with a canned provider body and records every request.
#[derive(Clone)]
struct Recording {
    body: &'static str,
    requests: Arc<Mutex<Vec<RouteRequest>>>,
}

impl Recording {
    fn new(body: &'static str) -> Self {
        Self {
            body,
            requests: Arc::new(Mutex::new(vec![])),
        }
    }

    fn requests(&self) -> Vec<RouteRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DirectionsProvider for Recording {
    async fn route(&self, request: &RouteRequest) -> Result<Vec<GeoPoint>, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        let response: DirectionsResponse = serde_json::from_str(self.body)?;
        response.into_first_route()
    }
}

const ONE_ROUTE: &str = r#"{
    "code": "Ok",
    "routes": [{
        "geometry": {
            "type": "LineString",
            "coordinates": [[17.1, 48.15], [17.104, 48.1512], [17.11, 48.15]]
        }
    }]
}"#;

const NO_ROUTES: &str = r#"{ "code": "NoRoute", "routes": [] }"#;

fn config() -> MapConfig {
    let mut config = MapConfig::default();
    config.heatmap.count = 50;
    config
}

fn session(provider: Recording) -> MapSession<MemorySurface, Recording> {
    MapSession::new(config(), MemorySurface::new(), provider)
}

async fn operations(session: &MapSession<MemorySurface, Recording>) -> Vec<SurfaceOp> {
    session
        .overlays()
        .with_surface(|surface| surface.operations().to_vec())
        .await
}

#[tokio::test]
async fn click_click_flood() {
    let provider = Recording::new(ONE_ROUTE);
    let mut session = session(provider.clone());

    session.handle(MapEvent::Click(START)).await;
    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.path, Path::Pending { start: START });
    assert_eq!(snapshot.layers, vec![overlay::start_id()]);

    session.handle(MapEvent::Click(END)).await;
    session.settle().await;
    let requests = provider.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].from, START);
    assert_eq!(requests[0].to, END);
    assert_eq!(requests[0].exclude(), None);

    let route = session
        .overlays()
        .with_surface(|surface| surface.get_layer(&overlay::route_id()).cloned())
        .await
        .expect("route overlay");
    assert_eq!(
        route.source["geometry"]["coordinates"],
        serde_json::json!([[17.1, 48.15], [17.104, 48.1512], [17.11, 48.15]])
    );

    let before = operations(&session).await.len();
    session.handle(MapEvent::ContextMenu(FLOOD)).await;
    session.settle().await;

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.obstacles.as_slice(), &[FLOOD]);
    assert_eq!(snapshot.path.points(), vec![START, END]);
    assert!(snapshot.layers.contains(&overlay::route_id()));
    assert!(snapshot.layers.contains(&overlay::flood_id(1)));

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].exclude().as_deref(), Some("point(17.105 48.149)"));

    let route_ops = operations(&session).await[before..]
        .iter()
        .filter(|op| {
            matches!(op, SurfaceOp::AddLayer(id) | SurfaceOp::RemoveLayer(id) if *id == overlay::route_id())
        })
        .cloned()
        .collect::<Vec<_>>();
    assert_eq!(
        route_ops,
        vec![
            SurfaceOp::RemoveLayer(overlay::route_id()),
            SurfaceOp::AddLayer(overlay::route_id()),
        ]
    );
}

#[tokio::test]
async fn third_click_removes_three_overlays_first() {
    let mut session = session(Recording::new(ONE_ROUTE));
    session.handle(MapEvent::Click(START)).await;
    session.handle(MapEvent::Click(END)).await;
    session.settle().await;

    let before = operations(&session).await.len();
    session.handle(MapEvent::Click(FLOOD)).await;
    session.settle().await;
    let ops = operations(&session).await[before..].to_vec();

    let removed = ops
        .iter()
        .filter(|op| matches!(op, SurfaceOp::RemoveLayer(_)))
        .count();
    assert_eq!(removed, 3);
    assert_eq!(ops.last(), Some(&SurfaceOp::AddLayer(overlay::start_id())));
    assert!(ops[..ops.len() - 1]
        .iter()
        .all(|op| !matches!(op, SurfaceOp::AddLayer(_))));

    let snapshot = session.snapshot().await;
    assert_eq!(snapshot.path, Path::Pending { start: FLOOD });
    assert_eq!(snapshot.layers, vec![overlay::start_id()]);
}

#[tokio::test]
async fn empty_routes_create_no_overlay() {
    let provider = Recording::new(NO_ROUTES);
    let mut session = session(provider.clone());
    session.handle(MapEvent::Click(START)).await;
    session.handle(MapEvent::Click(END)).await;
    session.settle().await;

    let snapshot = session.snapshot().await;
    assert!(!snapshot.layers.contains(&overlay::route_id()));
    assert!(matches!(
        snapshot.route,
        Some(RouteStatus::Failed(ApiError::NoRoute))
    ));

    // the session keeps going
    session.handle(MapEvent::ContextMenu(FLOOD)).await;
    session.settle().await;
    assert_eq!(provider.requests().len(), 2);
    assert_eq!(session.snapshot().await.obstacles.len(), 1);
}

#[tokio::test]
async fn obstacle_markers_accumulate() {
    let mut session = session(Recording::new(ONE_ROUTE));
    for i in 0..4 {
        session
            .handle(MapEvent::ContextMenu(GeoPoint::new(17.1 + i as f64 * 0.001, 48.15)))
            .await;
    }
    session.settle().await;

    let snapshot = session.snapshot().await;
    let floods = (1..=4).map(overlay::flood_id).collect::<Vec<_>>();
    assert_eq!(snapshot.layers, floods);
}

#[tokio::test]
async fn handle_drives_running_session() {
    let provider = Recording::new(ONE_ROUTE);
    let handle = session::run(session(provider.clone()));

    handle.send(MapEvent::Load).await.unwrap();
    handle.send(MapEvent::Load).await.unwrap();
    handle.send(MapEvent::Click(START)).await.unwrap();
    handle.send(MapEvent::Click(END)).await.unwrap();
    handle.settle().await.unwrap();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(
        snapshot.layers,
        vec![
            overlay::heatmap_id(),
            overlay::start_id(),
            overlay::end_id(),
            overlay::route_id(),
        ]
    );
    assert!(matches!(snapshot.route, Some(RouteStatus::Ready { points: 3 })));
    assert_eq!(provider.requests().len(), 1);
}

#[tokio::test]
async fn reset_forgets_route_status() {
    let mut session = session(Recording::new(ONE_ROUTE));
    session.handle(MapEvent::Click(START)).await;
    session.handle(MapEvent::Click(END)).await;
    session.settle().await;
    assert!(session.snapshot().await.route.is_some());

    session.handle(MapEvent::Click(FLOOD)).await;
    assert!(session.snapshot().await.route.is_none());
}
