//! placescrape: resumable browser-driven extraction of structured business
//! records from a map-style web property.
//!
//! One browser session, strictly sequential record processing, and a
//! whole-table checkpoint after every finished record so an interrupted
//! run resumes without redoing completed work.

pub mod browser;
pub mod checkpoint;
pub mod config;
pub mod engine;

pub use browser::BrowserSession;
pub use checkpoint::{PlaceTable, load_working_table, read_table, write_table};
pub use config::{ScrapeConfig, ScrapeConfigBuilder};
pub use engine::{
    Highlight, Navigator, Outcome, Pacing, PlaceNavigator, PlaceRecord, RecordStatus, Review,
    ReviewFeed, RunDriver, RunSummary, ScrapeError,
};
