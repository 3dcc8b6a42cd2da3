//! Review pagination: repeatedly trigger "load more" and accumulate
//! rendered review entries until a cap or exhaustion.
//!
//! The loop is written against the [`ReviewFeed`] seam so its termination
//! and filtering behavior is testable without a browser; the chromiumoxide
//! implementation lives beside it.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::page::Page;
use tracing::{debug, info, warn};

use super::dom::{element_text, find_by_text};
use super::pacing::Pacing;
use super::record::Review;
use super::selectors::{
    LOAD_MORE_LABEL, LOAD_MORE_SELECTOR, REVIEW_DATE_SELECTOR, REVIEW_ITEM_SELECTOR,
    REVIEW_TEXT_SELECTOR,
};

/// Rounds that append nothing before the loop gives up while a "load
/// more" control is still present. Guards against a zero-yield feed that
/// would otherwise spin forever; a feed that keeps re-rendering the same
/// non-empty entries still terminates through the review cap instead.
pub const MAX_STALLED_ROUNDS: usize = 3;

/// Source of rendered review entries on an active reviews view.
#[async_trait]
pub trait ReviewFeed {
    /// Every review entry currently rendered, empty-text entries included.
    async fn visible_reviews(&self) -> Result<Vec<Review>>;

    /// Trigger the "load more" control once. Returns false when the
    /// control is absent, which ends pagination.
    async fn load_more(&self) -> Result<bool>;
}

/// Accumulate reviews from `feed` until `max_reviews` entries are held or
/// the feed is exhausted.
///
/// Entries with empty text are dropped; everything else is appended per
/// round without cross-page dedup, so a feed that re-renders already-seen
/// entries counts them toward the cap (preserved source behavior). Each
/// successful "load more" is followed by a randomized pause.
pub async fn collect_reviews<F>(feed: &F, max_reviews: usize, pacing: &Pacing) -> Result<Vec<Review>>
where
    F: ReviewFeed + Sync,
{
    let mut collected: Vec<Review> = Vec::new();
    let mut stalled_rounds = 0usize;

    loop {
        let batch = feed.visible_reviews().await?;
        let before = collected.len();
        collected.extend(batch.into_iter().filter(|r| !r.text.trim().is_empty()));
        debug!(total = collected.len(), "review round collected");

        if collected.len() >= max_reviews {
            info!(total = collected.len(), "review cap reached");
            break;
        }

        if collected.len() == before {
            stalled_rounds += 1;
            if stalled_rounds >= MAX_STALLED_ROUNDS {
                warn!("review feed yielded nothing for {MAX_STALLED_ROUNDS} rounds, stopping");
                break;
            }
        } else {
            stalled_rounds = 0;
        }

        if !feed.load_more().await? {
            info!(total = collected.len(), "no further load-more control, pagination exhausted");
            break;
        }
        pacing.pause().await;
    }

    collected.truncate(max_reviews);
    Ok(collected)
}

/// [`ReviewFeed`] over the live detail page.
pub struct PageReviewFeed<'a> {
    page: &'a Page,
}

impl<'a> PageReviewFeed<'a> {
    #[must_use]
    pub fn new(page: &'a Page) -> Self {
        Self { page }
    }
}

#[async_trait]
impl ReviewFeed for PageReviewFeed<'_> {
    async fn visible_reviews(&self) -> Result<Vec<Review>> {
        let items = self
            .page
            .find_elements(REVIEW_ITEM_SELECTOR)
            .await
            .context("failed to query rendered review entries")?;

        let mut reviews = Vec::with_capacity(items.len());
        for item in &items {
            let date = match item.find_element(REVIEW_DATE_SELECTOR).await {
                Ok(element) => element_text(&element).await.unwrap_or_default(),
                Err(_) => String::new(),
            };
            let text = match item.find_element(REVIEW_TEXT_SELECTOR).await {
                Ok(element) => element_text(&element).await.unwrap_or_default(),
                Err(_) => String::new(),
            };
            reviews.push(Review { date, text });
        }
        Ok(reviews)
    }

    async fn load_more(&self) -> Result<bool> {
        let Some(control) = find_by_text(self.page, LOAD_MORE_SELECTOR, LOAD_MORE_LABEL).await
        else {
            return Ok(false);
        };
        control
            .scroll_into_view()
            .await
            .context("failed to scroll load-more control into view")?;
        control
            .click()
            .await
            .context("failed to click load-more control")?;
        Ok(true)
    }
}
