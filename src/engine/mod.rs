//! Extraction Engine
//!
//! The per-record pipeline (navigate → match → extract → paginate) and the
//! run driver that sequences it over the working table with checkpointing
//! between records.

pub mod driver;
pub mod error;
pub mod extractor;
pub mod navigator;
pub mod pacing;
pub mod record;
pub mod reviews;
pub mod selectors;

mod dom;

// Re-exports for public API
pub use driver::{RunDriver, RunSummary};
pub use error::{ScrapeError, is_session_fatal};
pub use navigator::{Navigator, Outcome, PlaceNavigator, match_candidate};
pub use pacing::Pacing;
pub use record::{Highlight, MAX_HIGHLIGHTS, MAX_REVIEWS, PlaceRecord, RecordStatus, Review};
pub use reviews::{PageReviewFeed, ReviewFeed, collect_reviews};
