//! Error types. Every variant ends up as a toast; none is retried.

use thiserror::Error;

/// Failure of one backend round trip.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection refused, timeout, unreadable body.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The backend answered with `code != 200`.
    #[error("backend returned code {code}: {}", .message.as_deref().unwrap_or("-"))]
    Api { code: i64, message: Option<String> },
    /// `code == 200` but `data` was missing or malformed.
    #[error("unexpected response payload: {0}")]
    Payload(String),
}

impl GatewayError {
    pub fn api(code: i64, message: Option<String>) -> Self {
        Self::Api { code, message }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Backend-provided message, if any, for "操作失败: <message>" toasts.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }
}

/// Failure of a user-triggered operation.
#[derive(Debug, Error)]
pub enum UiError {
    #[error("keyword is empty")]
    EmptyKeyword,
    #[error("playlist id is empty")]
    EmptyPlaylistId,
    #[error("nothing selected")]
    EmptySelection,
    #[error("a batch download is already running for this list")]
    BatchRunning,
    #[error("row {0} cannot be selected")]
    RowNotSelectable(usize),
    #[error("playlist {playlist_source}/{id} is not imported")]
    UnknownPlaylist { playlist_source: String, id: String },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub type GatewayResult<T> = Result<T, GatewayError>;
