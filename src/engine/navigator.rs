//! Record navigation: search → candidate matching → detail extraction.
//!
//! Drives one record through the per-record state machine and reports a
//! single outcome. Internally every browser mishap is an `anyhow` error;
//! at the trait boundary it is collapsed to either a recoverable
//! [`Outcome::NavigationFailed`] or a run-ending
//! [`ScrapeError::SessionFatal`].

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::page::Page;
use tracing::{debug, info, warn};
use url::Url;

use super::dom::{element_text, wait_for_selector};
use super::error::{ScrapeError, is_session_fatal};
use super::extractor;
use super::pacing::Pacing;
use super::record::PlaceRecord;
use super::reviews::{self, PageReviewFeed};
use super::selectors::{
    DETAIL_READY_SELECTOR, MORE_RESULTS_SELECTOR, RESULT_ITEM_SELECTOR, RESULT_TITLE_SELECTOR,
    SEARCH_URL,
};
use crate::config::ScrapeConfig;

/// Outcome of processing one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A candidate matched and extraction completed; the record carries
    /// whatever the detail view rendered.
    Matched,
    /// No search candidate resembled the target name. Treated as a skip,
    /// not an error.
    NotMatched,
    /// Navigation or extraction broke partway. The record stays Pending
    /// and is eligible for retry on the next run.
    NavigationFailed,
}

/// Processes one record against a live session. The run driver only
/// speaks this trait, which keeps resume and failure-boundary logic
/// testable without a browser.
#[async_trait]
pub trait Navigator {
    async fn process(&self, record: &mut PlaceRecord) -> Result<Outcome, ScrapeError>;
}

/// Pick the first candidate whose display name is a substring match
/// (either direction) of the target name.
///
/// First-match, not best-match: ties break by list order. Known
/// ambiguity: similarly named branches at different addresses can shadow
/// each other; kept as observed until a stricter rule is adopted.
#[must_use]
pub fn match_candidate<'a, I>(target_name: &str, candidates: I) -> Option<usize>
where
    I: IntoIterator<Item = &'a str>,
{
    let target = target_name.trim();
    candidates.into_iter().position(|candidate| {
        let candidate = candidate.trim();
        !candidate.is_empty() && (candidate.contains(target) || target.contains(candidate))
    })
}

/// [`Navigator`] over the live map property.
pub struct PlaceNavigator<'a> {
    page: &'a Page,
    config: &'a ScrapeConfig,
    pacing: Pacing,
}

impl<'a> PlaceNavigator<'a> {
    #[must_use]
    pub fn new(page: &'a Page, config: &'a ScrapeConfig) -> Self {
        Self {
            page,
            config,
            pacing: config.pacing(),
        }
    }

    async fn try_process(&self, record: &mut PlaceRecord) -> Result<Outcome> {
        let search_url = build_search_url(&record.address)?;
        info!(name = %record.name, address = %record.address, "searching");

        self.page
            .goto(search_url.as_str())
            .await
            .context("failed to navigate to search page")?;
        self.page
            .wait_for_navigation()
            .await
            .context("failed waiting for search page load")?;
        self.pacing.pause().await;

        let result_wait = Duration::from_secs(self.config.result_wait_secs());
        if !wait_for_selector(self.page, RESULT_ITEM_SELECTOR, result_wait).await {
            warn!(name = %record.name, "no search results rendered");
            return Ok(Outcome::NotMatched);
        }

        // Widen the candidate set once if the control exists.
        match self.page.find_element(MORE_RESULTS_SELECTOR).await {
            Ok(more) => {
                if let Err(e) = more.click().await {
                    debug!("show-more-results click failed: {e}");
                }
                self.pacing.pause().await;
            }
            Err(_) => debug!(name = %record.name, "no show-more-results control"),
        }

        let candidates = self
            .page
            .find_elements(RESULT_ITEM_SELECTOR)
            .await
            .context("failed to query search result entries")?;

        let mut titles = Vec::with_capacity(candidates.len());
        for candidate in &candidates {
            let title = match candidate.find_element(RESULT_TITLE_SELECTOR).await {
                Ok(element) => element_text(&element).await.unwrap_or_default(),
                Err(_) => String::new(),
            };
            titles.push(title);
        }

        let Some(index) = match_candidate(&record.name, titles.iter().map(String::as_str)) else {
            warn!(name = %record.name, candidates = titles.len(), "no candidate matched");
            return Ok(Outcome::NotMatched);
        };
        info!(name = %record.name, matched = %titles[index], "candidate matched");

        candidates[index]
            .click()
            .await
            .context("failed to open matched candidate")?;
        self.pacing.pause().await;

        let detail_wait = Duration::from_secs(self.config.detail_wait_secs());
        if !wait_for_selector(self.page, DETAIL_READY_SELECTOR, detail_wait).await {
            anyhow::bail!("detail view did not render within {detail_wait:?}");
        }

        let fields = extractor::extract_detail_fields(self.page, &self.pacing).await;
        record.phone = fields.phone;
        record.hours = fields.hours;
        record.introduction = fields.introduction;
        record.facilities = fields.facilities;
        record.parking = fields.parking;
        record.seating = fields.seating;

        extractor::open_review_tab(self.page, &self.pacing).await;
        record.highlights = extractor::extract_highlights(self.page).await;
        record.review_count = extractor::extract_review_count(self.page).await;
        extractor::sort_reviews_recent_first(self.page, &self.pacing).await;

        let feed = PageReviewFeed::new(self.page);
        record.reviews =
            reviews::collect_reviews(&feed, self.config.max_reviews(), &self.pacing).await?;
        record.enforce_caps();

        Ok(Outcome::Matched)
    }
}

#[async_trait]
impl Navigator for PlaceNavigator<'_> {
    async fn process(&self, record: &mut PlaceRecord) -> Result<Outcome, ScrapeError> {
        match self.try_process(record).await {
            Ok(outcome) => Ok(outcome),
            Err(e) if is_session_fatal(&e) => Err(ScrapeError::SessionFatal(format!("{e:#}"))),
            Err(e) => {
                warn!(name = %record.name, address = %record.address, "navigation failed: {e:#}");
                Ok(Outcome::NavigationFailed)
            }
        }
    }
}

/// Search URL with the address as a path segment.
fn build_search_url(address: &str) -> Result<Url> {
    let mut url = Url::parse(SEARCH_URL).context("invalid search base URL")?;
    url.path_segments_mut()
        .map_err(|()| anyhow::anyhow!("search base URL cannot carry path segments"))?
        .push(address.trim());
    Ok(url)
}
