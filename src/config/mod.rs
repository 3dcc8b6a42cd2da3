//! Run configuration.
//!
//! Built through [`ScrapeConfigBuilder`]; paths are required, everything
//! else has conservative defaults matching one human-like sequential
//! browsing pattern.

mod builder;

pub use builder::ScrapeConfigBuilder;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::Pacing;
use crate::engine::record::MAX_REVIEWS;

/// Default bounded wait for the search result list, seconds.
pub const DEFAULT_RESULT_WAIT_SECS: u64 = 10;

/// Default bounded wait for the detail view to render, seconds.
pub const DEFAULT_DETAIL_WAIT_SECS: u64 = 10;

/// Default inter-action delay bounds, milliseconds.
pub const DEFAULT_MIN_ACTION_DELAY_MS: u64 = 1_000;
pub const DEFAULT_MAX_ACTION_DELAY_MS: u64 = 5_000;

/// Configuration for one extraction run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    pub(crate) input_path: PathBuf,
    pub(crate) checkpoint_path: PathBuf,
    pub(crate) output_path: PathBuf,
    pub(crate) chrome_executable: Option<PathBuf>,
    pub(crate) headless: bool,
    pub(crate) max_reviews: usize,
    pub(crate) result_wait_secs: u64,
    pub(crate) detail_wait_secs: u64,
    pub(crate) min_action_delay_ms: u64,
    pub(crate) max_action_delay_ms: u64,
}

impl ScrapeConfig {
    /// Start building a config from the three table paths.
    #[must_use]
    pub fn builder(
        input_path: impl Into<PathBuf>,
        checkpoint_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::new(input_path, checkpoint_path, output_path)
    }

    #[must_use]
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    #[must_use]
    pub fn checkpoint_path(&self) -> &Path {
        &self.checkpoint_path
    }

    #[must_use]
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Explicit browser binary, when auto-detection should be bypassed.
    #[must_use]
    pub fn chrome_executable(&self) -> Option<&Path> {
        self.chrome_executable.as_deref()
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn max_reviews(&self) -> usize {
        self.max_reviews
    }

    #[must_use]
    pub fn result_wait_secs(&self) -> u64 {
        self.result_wait_secs
    }

    #[must_use]
    pub fn detail_wait_secs(&self) -> u64 {
        self.detail_wait_secs
    }

    /// Pacing policy for interactive actions.
    #[must_use]
    pub fn pacing(&self) -> Pacing {
        Pacing::new(
            Duration::from_millis(self.min_action_delay_ms),
            Duration::from_millis(self.max_action_delay_ms),
        )
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("places.csv"),
            checkpoint_path: PathBuf::from("places.checkpoint.csv"),
            output_path: PathBuf::from("places.out.csv"),
            chrome_executable: None,
            headless: true,
            max_reviews: MAX_REVIEWS,
            result_wait_secs: DEFAULT_RESULT_WAIT_SECS,
            detail_wait_secs: DEFAULT_DETAIL_WAIT_SECS,
            min_action_delay_ms: DEFAULT_MIN_ACTION_DELAY_MS,
            max_action_delay_ms: DEFAULT_MAX_ACTION_DELAY_MS,
        }
    }
}
