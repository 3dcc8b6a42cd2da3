//! Builder for [`ScrapeConfig`] with validation at `build()`.

use std::path::PathBuf;

use super::ScrapeConfig;

/// Builder for [`ScrapeConfig`]. Table paths are taken up front; every
/// other knob is optional.
#[derive(Debug, Clone)]
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl ScrapeConfigBuilder {
    #[must_use]
    pub fn new(
        input_path: impl Into<PathBuf>,
        checkpoint_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config: ScrapeConfig {
                input_path: input_path.into(),
                checkpoint_path: checkpoint_path.into(),
                output_path: output_path.into(),
                ..ScrapeConfig::default()
            },
        }
    }

    /// Use a specific browser binary instead of auto-detection.
    #[must_use]
    pub fn chrome_executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chrome_executable = Some(path.into());
        self
    }

    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    #[must_use]
    pub fn max_reviews(mut self, max_reviews: usize) -> Self {
        self.config.max_reviews = max_reviews;
        self
    }

    #[must_use]
    pub fn result_wait_secs(mut self, secs: u64) -> Self {
        self.config.result_wait_secs = secs;
        self
    }

    #[must_use]
    pub fn detail_wait_secs(mut self, secs: u64) -> Self {
        self.config.detail_wait_secs = secs;
        self
    }

    #[must_use]
    pub fn action_delay_ms(mut self, min: u64, max: u64) -> Self {
        self.config.min_action_delay_ms = min;
        self.config.max_action_delay_ms = max;
        self
    }

    /// Validate and produce the config.
    pub fn build(self) -> Result<ScrapeConfig, String> {
        let c = &self.config;
        if c.max_reviews == 0 {
            return Err("max_reviews must be at least 1".to_string());
        }
        if c.min_action_delay_ms > c.max_action_delay_ms {
            return Err(format!(
                "action delay bounds are inverted: min {} ms > max {} ms",
                c.min_action_delay_ms, c.max_action_delay_ms
            ));
        }
        if c.checkpoint_path == c.input_path {
            return Err("checkpoint path must differ from the input path".to_string());
        }
        Ok(self.config)
    }
}
