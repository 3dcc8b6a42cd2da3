//! Helpers for consistent chromiumoxide Page access.
//!
//! Browser calls have two failure modes: `Err` (CDP communication failure)
//! and `Ok(None)` (value not available). These helpers collapse both into
//! shapes the extractors can absorb locally.

use std::time::{Duration, Instant};

use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use tracing::trace;

/// Poll interval while waiting for a selector to appear.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Wait until `selector` appears in the DOM, up to `timeout`.
///
/// The page load event fires before client-side rendering finishes, so the
/// DOM has to be polled for the element itself. Returns false on timeout;
/// the caller decides whether that is a skip or a failure.
pub(crate) async fn wait_for_selector(page: &Page, selector: &str, timeout: Duration) -> bool {
    let start = Instant::now();
    loop {
        if page.find_element(selector).await.is_ok() {
            trace!(selector, elapsed_ms = start.elapsed().as_millis() as u64, "selector appeared");
            return true;
        }
        if start.elapsed() >= timeout {
            trace!(selector, "selector wait timed out");
            return false;
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Find the first element matching `selector` whose trimmed inner text
/// contains `needle`.
///
/// The target site distinguishes several same-class controls only by their
/// visible label, which CSS alone cannot express.
pub(crate) async fn find_by_text(page: &Page, selector: &str, needle: &str) -> Option<Element> {
    let elements = page.find_elements(selector).await.ok()?;
    for element in elements {
        if let Ok(Some(text)) = element.inner_text().await
            && text.trim().contains(needle)
        {
            return Some(element);
        }
    }
    None
}

/// Trimmed inner text of an element, `None` if absent or empty.
pub(crate) async fn element_text(element: &Element) -> Option<String> {
    element
        .inner_text()
        .await
        .ok()
        .flatten()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

/// Trimmed inner texts of every element matching `selector`, empty
/// entries dropped. A missing container reads as an empty list.
pub(crate) async fn collect_texts(page: &Page, selector: &str) -> Vec<String> {
    let Ok(elements) = page.find_elements(selector).await else {
        return Vec::new();
    };
    let mut texts = Vec::with_capacity(elements.len());
    for element in &elements {
        if let Some(text) = element_text(element).await {
            texts.push(text);
        }
    }
    texts
}
