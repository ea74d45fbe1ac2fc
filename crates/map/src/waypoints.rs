//! Click driven route endpoint and obstacle state.
//!
//! The state machine is pure: every input returns the overlay commands the
//! caller has to carry out, nothing touches a map surface here.

use directions::RouteRequest;
use model::{
    overlay::{self, Color, OverlayId},
    path::{ObstacleSet, Path},
    GeoPoint,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input {
    /// Places route endpoints.
    Primary(GeoPoint),
    /// Marks an obstacle.
    Secondary(GeoPoint),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddMarker {
        id: OverlayId,
        point: GeoPoint,
        color: Color,
    },
    RemoveOverlay(OverlayId),
    DrawRoute {
        id: OverlayId,
        request: RouteRequest,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Waypoints {
    path: Path,
    obstacles: ObstacleSet,
}

impl Waypoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn obstacles(&self) -> &ObstacleSet {
        &self.obstacles
    }

    pub fn apply(&mut self, input: Input) -> Vec<Command> {
        match input {
            Input::Primary(point) => self.primary(point),
            Input::Secondary(point) => self.secondary(point),
        }
    }

    fn primary(&mut self, point: GeoPoint) -> Vec<Command> {
        match self.path {
            Path::Empty => {
                self.path = Path::Pending { start: point };
                vec![start_marker(point)]
            }
            Path::Pending { start } => {
                self.path = Path::Complete { start, end: point };
                vec![
                    Command::AddMarker {
                        id: overlay::end_id(),
                        point,
                        color: Color::end(),
                    },
                    self.draw_route(start, point),
                ]
            }
            Path::Complete { .. } => {
                self.path = Path::Pending { start: point };
                vec![
                    Command::RemoveOverlay(overlay::start_id()),
                    Command::RemoveOverlay(overlay::end_id()),
                    Command::RemoveOverlay(overlay::route_id()),
                    start_marker(point),
                ]
            }
        }
    }

    fn secondary(&mut self, point: GeoPoint) -> Vec<Command> {
        let count = self.obstacles.push(point);
        let mut commands = vec![
            Command::AddMarker {
                id: overlay::flood_id(count),
                point,
                color: Color::flood(),
            },
            Command::RemoveOverlay(overlay::route_id()),
        ];
        // without both endpoints there is nothing to reroute
        if let Some((start, end)) = self.path.endpoints() {
            commands.push(self.draw_route(start, end));
        }
        commands
    }

    fn draw_route(&self, from: GeoPoint, to: GeoPoint) -> Command {
        Command::DrawRoute {
            id: overlay::route_id(),
            request: RouteRequest::new(from, to, self.obstacles.as_slice().to_vec()),
        }
    }
}

fn start_marker(point: GeoPoint) -> Command {
    Command::AddMarker {
        id: overlay::start_id(),
        point,
        color: Color::start(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    const A: GeoPoint = GeoPoint::new(17.10, 48.15);
    const B: GeoPoint = GeoPoint::new(17.11, 48.15);
    const FLOOD: GeoPoint = GeoPoint::new(17.105, 48.149);

    #[test]
    fn path_length_cycles() {
        let mut waypoints = Waypoints::new();
        let mut lengths = vec![waypoints.path().len()];
        for i in 0..7 {
            waypoints.apply(Input::Primary(GeoPoint::new(17.0 + i as f64 * 0.01, 48.15)));
            lengths.push(waypoints.path().len());
        }
        assert_eq!(lengths, vec![0, 1, 2, 1, 2, 1, 2, 1]);
    }

    #[test]
    fn first_click_places_start() {
        let mut waypoints = Waypoints::new();
        let commands = waypoints.apply(Input::Primary(A));
        assert_eq!(
            commands,
            vec![Command::AddMarker {
                id: overlay::start_id(),
                point: A,
                color: Color::start(),
            }]
        );
        assert_eq!(waypoints.path(), &Path::Pending { start: A });
    }

    #[test]
    fn second_click_requests_route() {
        let mut waypoints = Waypoints::new();
        waypoints.apply(Input::Primary(A));
        let commands = waypoints.apply(Input::Primary(B));

        assert_eq!(commands.len(), 2);
        assert!(matches!(&commands[0], Command::AddMarker { id, .. } if *id == overlay::end_id()));
        assert_eq!(
            commands[1],
            Command::DrawRoute {
                id: overlay::route_id(),
                request: RouteRequest::new(A, B, vec![]),
            }
        );
        assert_eq!(waypoints.path().points(), vec![A, B]);
    }

    #[test]
    fn third_click_removes_three_overlays_before_restart() {
        let mut waypoints = Waypoints::new();
        waypoints.apply(Input::Primary(A));
        waypoints.apply(Input::Primary(B));
        let commands = waypoints.apply(Input::Primary(FLOOD));

        assert_eq!(
            commands[..3],
            [
                Command::RemoveOverlay(overlay::start_id()),
                Command::RemoveOverlay(overlay::end_id()),
                Command::RemoveOverlay(overlay::route_id()),
            ]
        );
        assert!(
            matches!(&commands[3], Command::AddMarker { id, point, .. } if *id == overlay::start_id() && *point == FLOOD)
        );
        assert_eq!(commands.len(), 4);
        assert_eq!(waypoints.path(), &Path::Pending { start: FLOOD });
    }

    #[test]
    fn obstacle_on_complete_path_reroutes() {
        let mut waypoints = Waypoints::new();
        waypoints.apply(Input::Primary(A));
        waypoints.apply(Input::Primary(B));
        let commands = waypoints.apply(Input::Secondary(FLOOD));

        assert_eq!(
            commands,
            vec![
                Command::AddMarker {
                    id: overlay::flood_id(1),
                    point: FLOOD,
                    color: Color::flood(),
                },
                Command::RemoveOverlay(overlay::route_id()),
                Command::DrawRoute {
                    id: overlay::route_id(),
                    request: RouteRequest::new(A, B, vec![FLOOD]),
                },
            ]
        );
        // path is unchanged
        assert_eq!(waypoints.path().points(), vec![A, B]);
    }

    #[test]
    fn obstacle_without_route_skips_recompute() {
        let mut waypoints = Waypoints::new();
        let commands = waypoints.apply(Input::Secondary(FLOOD));
        assert!(commands
            .iter()
            .all(|command| !matches!(command, Command::DrawRoute { .. })));

        waypoints.apply(Input::Primary(A));
        let commands = waypoints.apply(Input::Secondary(B));
        assert!(commands
            .iter()
            .all(|command| !matches!(command, Command::DrawRoute { .. })));
        assert_eq!(waypoints.obstacles().len(), 2);
    }

    #[test]
    fn obstacle_markers_are_never_reused() {
        let mut waypoints = Waypoints::new();
        let mut ids = HashSet::new();
        for i in 0..5 {
            for command in waypoints.apply(Input::Secondary(GeoPoint::new(i as f64, 0.0))) {
                if let Command::AddMarker { id, .. } = command {
                    assert!(ids.insert(id));
                }
            }
        }
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn obstacles_survive_path_reset() {
        let mut waypoints = Waypoints::new();
        waypoints.apply(Input::Secondary(FLOOD));
        waypoints.apply(Input::Primary(A));
        waypoints.apply(Input::Primary(B));
        waypoints.apply(Input::Primary(A));
        let commands = waypoints.apply(Input::Primary(B));
        assert_eq!(
            commands[1],
            Command::DrawRoute {
                id: overlay::route_id(),
                request: RouteRequest::new(A, B, vec![FLOOD]),
            }
        );
    }
}
