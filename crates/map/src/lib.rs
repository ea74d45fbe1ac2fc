use std::{error::Error, fmt};

use tokio::sync::{mpsc, oneshot};

pub mod config;
pub mod heatmap;
pub mod overlay;
pub mod session;
pub mod surface;
pub mod waypoints;

pub use config::MapConfig;
pub use session::{MapEvent, MapSession, SessionHandle};

#[derive(Debug)]
pub enum SessionError {
    SendError(mpsc::error::SendError<session::SessionMessage>),
    ResponseError(oneshot::error::RecvError),
}

impl Error for SessionError {}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::SendError(_) => write!(f, "session is no longer running"),
            Self::ResponseError(why) => write!(f, "session did not answer: {}", why),
        }
    }
}

impl From<mpsc::error::SendError<session::SessionMessage>> for SessionError {
    fn from(why: mpsc::error::SendError<session::SessionMessage>) -> Self {
        Self::SendError(why)
    }
}

impl From<oneshot::error::RecvError> for SessionError {
    fn from(why: oneshot::error::RecvError) -> Self {
        Self::ResponseError(why)
    }
}

pub type SessionResult<O> = Result<O, SessionError>;
