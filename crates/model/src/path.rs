use crate::GeoPoint;

/// Route endpoints picked by the user. Holds at most two points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Path {
    #[default]
    Empty,
    Pending {
        start: GeoPoint,
    },
    Complete {
        start: GeoPoint,
        end: GeoPoint,
    },
}

impl Path {
    pub fn len(&self) -> usize {
        match self {
            Self::Empty => 0,
            Self::Pending { .. } => 1,
            Self::Complete { .. } => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    pub fn points(&self) -> Vec<GeoPoint> {
        match *self {
            Self::Empty => vec![],
            Self::Pending { start } => vec![start],
            Self::Complete { start, end } => vec![start, end],
        }
    }

    /// Both endpoints, only once the path is complete.
    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        match *self {
            Self::Complete { start, end } => Some((start, end)),
            _ => None,
        }
    }
}

/// Points the route has to avoid. Append only for the lifetime of a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObstacleSet(Vec<GeoPoint>);

impl ObstacleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an obstacle and returns the new number of obstacles.
    pub fn push(&mut self, point: GeoPoint) -> usize {
        self.0.push(point);
        self.0.len()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[GeoPoint] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &GeoPoint> {
        self.0.iter()
    }
}
