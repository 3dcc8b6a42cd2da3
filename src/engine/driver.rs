//! Run driver: iterates the working table, isolates per-record failures,
//! checkpoints after every finished record, and tears the session down.
//!
//! The driver exclusively owns the run state — the in-memory table, the
//! single browser session, and the checkpoint path. Extraction components
//! borrow the page only for the duration of one record.

use tracing::{error, info, warn};

use super::error::ScrapeError;
use super::navigator::{Navigator, Outcome, PlaceNavigator};
use super::record::RecordStatus;
use crate::browser::BrowserSession;
use crate::checkpoint::{self, PlaceTable};
use crate::config::ScrapeConfig;

/// Per-run tallies, logged at the end and returned to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Records fully extracted this run.
    pub processed: usize,
    /// Records with no matching search candidate (marked Failed).
    pub not_matched: usize,
    /// Records left Pending after a navigation failure.
    pub navigation_failed: usize,
    /// Records already Processed in the checkpoint, never navigated.
    pub skipped: usize,
}

/// Owns one full execution: load, iterate, persist, tear down.
pub struct RunDriver {
    config: ScrapeConfig,
}

impl RunDriver {
    #[must_use]
    pub fn new(config: ScrapeConfig) -> Self {
        Self { config }
    }

    /// Execute the run end to end.
    ///
    /// The browser is launched only when at least one record needs
    /// navigation, so a fully-Processed checkpoint round-trips to the
    /// output with zero browser activity. The definitive output table is
    /// written regardless of how iteration ended.
    pub async fn run(&self) -> Result<RunSummary, ScrapeError> {
        let mut table = checkpoint::load_working_table(
            self.config.input_path(),
            self.config.checkpoint_path(),
        )?;
        info!(records = table.records.len(), "working table loaded");

        let pending = table
            .records
            .iter()
            .filter(|r| r.status != RecordStatus::Processed)
            .count();

        let outcome = if pending == 0 {
            info!("all records already processed, nothing to navigate");
            Ok(RunSummary {
                skipped: table.records.len(),
                ..RunSummary::default()
            })
        } else {
            self.run_session(&mut table).await
        };

        // Definitive output, written no matter how the iteration ended,
        // including when the session never came up.
        checkpoint::write_table(self.config.output_path(), &table)?;
        info!(path = %self.config.output_path().display(), "output table written");

        match &outcome {
            Ok(summary) => info!(?summary, "run complete"),
            Err(e) => error!("run aborted: {e}"),
        }
        outcome
    }

    /// Launch the browser, process the pending records, tear the session
    /// down. Launch and page-open failures surface as session-fatal; the
    /// caller still writes the output table afterwards.
    async fn run_session(&self, table: &mut PlaceTable) -> Result<RunSummary, ScrapeError> {
        let session =
            BrowserSession::launch(self.config.headless(), self.config.chrome_executable())
                .await
                .map_err(|e| ScrapeError::SessionFatal(format!("{e:#}")))?;
        let page = match session.new_page().await {
            Ok(page) => page,
            Err(e) => {
                session.shutdown().await;
                return Err(ScrapeError::SessionFatal(format!("{e:#}")));
            }
        };
        let navigator = PlaceNavigator::new(&page, &self.config);
        let outcome = self.run_records(&navigator, table).await;
        drop(navigator);
        drop(page);
        session.shutdown().await;
        outcome
    }

    /// Iterate records in table order against `navigator`, checkpointing
    /// after each record that finishes Processed or Failed.
    ///
    /// Public with a generic navigator so resume and failure-boundary
    /// behavior can be exercised without a browser.
    pub async fn run_records<N>(
        &self,
        navigator: &N,
        table: &mut PlaceTable,
    ) -> Result<RunSummary, ScrapeError>
    where
        N: Navigator + Sync,
    {
        let mut summary = RunSummary::default();
        let total = table.records.len();

        for index in 0..total {
            if table.records[index].status == RecordStatus::Processed {
                summary.skipped += 1;
                continue;
            }

            let (name, address) = {
                let record = &table.records[index];
                (record.name.clone(), record.address.clone())
            };
            info!(record = index + 1, total, name = %name, "processing record");

            match navigator.process(&mut table.records[index]).await {
                Ok(Outcome::Matched) => {
                    table.records[index].status = RecordStatus::Processed;
                    summary.processed += 1;
                    self.checkpoint(table, &name);
                }
                Ok(Outcome::NotMatched) => {
                    table.records[index].status = RecordStatus::Failed;
                    summary.not_matched += 1;
                    warn!(name = %name, address = %address, "record skipped: no match");
                    self.checkpoint(table, &name);
                }
                Ok(Outcome::NavigationFailed) => {
                    // Stays Pending; a future run retries it. Nothing new
                    // worth persisting.
                    summary.navigation_failed += 1;
                    warn!(name = %name, address = %address, "record left pending after navigation failure");
                }
                Err(ScrapeError::SessionFatal(msg)) => {
                    error!(name = %name, address = %address, "session fatal, aborting run: {msg}");
                    self.checkpoint(table, &name);
                    return Err(ScrapeError::SessionFatal(msg));
                }
                Err(e) => {
                    // Anything else is absorbed at this boundary so one
                    // record cannot take down the run.
                    summary.navigation_failed += 1;
                    warn!(name = %name, address = %address, "record failed: {e}");
                }
            }
        }

        Ok(summary)
    }

    /// Best-effort checkpoint write. Persistence failure is logged, not
    /// fatal: the in-memory table is still intact and the final output
    /// write gets another chance.
    fn checkpoint(&self, table: &PlaceTable, name: &str) {
        match checkpoint::write_table(self.config.checkpoint_path(), table) {
            Ok(()) => info!(name = %name, path = %self.config.checkpoint_path().display(), "checkpoint written"),
            Err(e) => error!(name = %name, "checkpoint write failed: {e}"),
        }
    }
}
