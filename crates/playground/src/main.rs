use directions::{DirectionsClient, DirectionsCredentials};
use map::{
    overlay::RouteStatus,
    session::{self, MapEvent, MapSession},
    surface::MemorySurface,
    MapConfig,
};
use model::GeoPoint;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Output<'a> {
    view: &'a map::config::ViewConfig,
    path: Vec<GeoPoint>,
    obstacles: &'a [GeoPoint],
    layers: Vec<String>,
    route: String,
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let credentials =
        DirectionsCredentials::from_env().expect("expected MAPBOX_TOKEN in env.");
    let mut config = MapConfig::default();
    // keep the printed heat layer readable
    config.heatmap.count = 100;

    let client = DirectionsClient::new(&credentials, &config.directions)
        .expect("could not build directions client.");
    let handle = session::run(MapSession::new(
        config.clone(),
        MemorySurface::new(),
        client,
    ));

    let events = [
        MapEvent::Load,
        MapEvent::Click(GeoPoint::new(17.10, 48.15)),
        MapEvent::Click(GeoPoint::new(17.11, 48.15)),
        MapEvent::ContextMenu(GeoPoint::new(17.105, 48.149)),
    ];
    for event in events {
        handle.send(event).await.unwrap();
        handle.settle().await.unwrap();
    }

    let snapshot = handle.snapshot().await.unwrap();
    let route = match &snapshot.route {
        Some(RouteStatus::Ready { points }) => format!("ready ({points} points)"),
        Some(RouteStatus::Failed(why)) => format!("failed: {why}"),
        Some(status) => format!("{status:?}"),
        None => "none".to_owned(),
    };
    let output = Output {
        view: &config.view,
        path: snapshot.path.points(),
        obstacles: snapshot.obstacles.as_slice(),
        layers: snapshot.layers.iter().map(|id| id.raw()).collect(),
        route,
    };
    let json = serde_json::to_string_pretty(&output).unwrap();
    println!("json: {}", json);
}
