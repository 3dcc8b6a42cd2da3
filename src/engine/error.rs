//! Error taxonomy for the extraction engine.
//!
//! Field-level misses never become errors at all (the extractor absorbs
//! them into defaults). Record-level failures surface as
//! [`Outcome`](super::navigator::Outcome) variants. Only the classes below
//! propagate as `Err`, and of those only [`ScrapeError::SessionFatal`] is
//! allowed to stop the run.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The browser session itself became unusable. The only failure class
    /// that aborts processing of subsequent records.
    #[error("browser session is unusable: {0}")]
    SessionFatal(String),

    /// The working table could not be read or is structurally invalid.
    #[error("table error: {0}")]
    Table(String),

    /// CSV-level parse or write failure.
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Classify a browser interaction error as session-fatal or not.
///
/// Session-fatal means the browser process or CDP connection is gone and
/// no further record can possibly succeed: retrying navigation on a closed
/// target only burns time. Everything else is a per-record failure.
#[must_use]
pub fn is_session_fatal(error: &anyhow::Error) -> bool {
    let msg = error.to_string().to_lowercase();
    msg.contains("browser closed")
        || msg.contains("browser disconnected")
        || msg.contains("page closed")
        || msg.contains("target closed")
        || msg.contains("target not found")
        || msg.contains("session not found")
        || msg.contains("session closed")
        || msg.contains("no response from the chromium instance")
        || msg.contains("websocket")
        || msg.contains("channel closed")
}
