//! Field extraction from a loaded detail view.
//!
//! Every field is extracted independently: a missing element yields that
//! field's documented default and the run moves on. Nothing in this module
//! fails the record; the only errors that escape a detail view are
//! browser-session failures surfaced by the navigator around it.

use std::collections::BTreeMap;

use chromiumoxide::page::Page;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use super::dom::{collect_texts, element_text, find_by_text};
use super::pacing::Pacing;
use super::record::{Highlight, MAX_HIGHLIGHTS, UNKNOWN, unknown_hours};
use super::selectors::{
    DETAIL_TAB_SELECTOR, EXPAND_INTRO_LABEL, EXPAND_INTRO_SELECTOR, FACILITY_SELECTOR,
    HIGHLIGHT_COUNT_SELECTOR, HIGHLIGHT_ITEM_SELECTOR, HIGHLIGHT_LABEL_SELECTOR,
    HOURS_PANEL_SELECTOR, HOURS_TOKEN_SELECTOR, INTRO_SELECTOR, PARKING_SELECTOR, PHONE_SELECTOR,
    REVIEW_COUNT_SELECTOR, SEATING_SELECTOR, SORT_RECENT_LABEL, TAB_INFO_LABEL, TAB_REVIEW_LABEL,
    WEEKDAY_LABELS,
};

static FIRST_INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("static count pattern is valid"));

/// Scalar and list fields pulled from the detail view's main and info
/// panes, each at its default when the source did not render it.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldBundle {
    pub phone: String,
    pub hours: BTreeMap<String, String>,
    pub introduction: String,
    pub facilities: Vec<String>,
    pub parking: String,
    pub seating: Vec<String>,
}

/// Extract the detail-view fields, clicking through the hours panel and
/// the info tab along the way.
pub async fn extract_detail_fields(page: &Page, pacing: &Pacing) -> FieldBundle {
    // Hours panel sits on the landing pane; unfold it before reading.
    if let Ok(panel) = page.find_element(HOURS_PANEL_SELECTOR).await {
        if let Err(e) = panel.click().await {
            debug!("hours panel did not unfold: {e}");
        }
        pacing.pause().await;
    } else {
        debug!("hours panel control absent");
    }
    let hours = parse_hours(collect_texts(page, HOURS_TOKEN_SELECTOR).await);

    let phone = match page.find_element(PHONE_SELECTOR).await {
        Ok(element) => element_text(&element).await.unwrap_or_else(|| UNKNOWN.to_string()),
        Err(_) => {
            debug!("phone element absent, defaulting");
            UNKNOWN.to_string()
        }
    };

    open_tab(page, TAB_INFO_LABEL, pacing).await;

    // The introduction renders truncated; expand it if the control exists.
    if let Some(expand) = find_by_text(page, EXPAND_INTRO_SELECTOR, EXPAND_INTRO_LABEL).await {
        if let Err(e) = expand.click().await {
            debug!("introduction expand click failed: {e}");
        }
        pacing.pause().await;
    }

    let introduction = match page.find_element(INTRO_SELECTOR).await {
        Ok(element) => element_text(&element).await.unwrap_or_else(|| UNKNOWN.to_string()),
        Err(_) => {
            debug!("introduction absent, defaulting");
            UNKNOWN.to_string()
        }
    };

    let facilities = collect_texts(page, FACILITY_SELECTOR).await;

    let parking = match page.find_element(PARKING_SELECTOR).await {
        Ok(element) => element_text(&element).await.unwrap_or_else(|| UNKNOWN.to_string()),
        Err(_) => {
            debug!("parking info absent, defaulting");
            UNKNOWN.to_string()
        }
    };

    let seating = collect_texts(page, SEATING_SELECTOR).await;

    FieldBundle {
        phone,
        hours,
        introduction,
        facilities,
        parking,
        seating,
    }
}

/// Click the detail-view tab carrying `label`. Absence is logged and
/// tolerated; some listings render without the full tab strip.
pub async fn open_tab(page: &Page, label: &str, pacing: &Pacing) {
    match find_by_text(page, DETAIL_TAB_SELECTOR, label).await {
        Some(tab) => {
            if let Err(e) = tab.click().await {
                warn!("'{label}' tab click failed: {e}");
            }
            pacing.pause().await;
        }
        None => warn!("'{label}' tab not found"),
    }
}

/// Open the review tab. Split out so the navigator can sequence field
/// extraction and review collection explicitly.
pub async fn open_review_tab(page: &Page, pacing: &Pacing) {
    open_tab(page, TAB_REVIEW_LABEL, pacing).await;
}

/// Collect up to [`MAX_HIGHLIGHTS`] highlight pairs from the review tab.
pub async fn extract_highlights(page: &Page) -> Vec<Highlight> {
    let Ok(items) = page.find_elements(HIGHLIGHT_ITEM_SELECTOR).await else {
        debug!("highlight list absent");
        return Vec::new();
    };
    let mut highlights = Vec::new();
    for item in items.iter().take(MAX_HIGHLIGHTS) {
        let Ok(label_element) = item.find_element(HIGHLIGHT_LABEL_SELECTOR).await else {
            continue;
        };
        let Some(label) = element_text(&label_element).await else {
            continue;
        };
        let count = match item.find_element(HIGHLIGHT_COUNT_SELECTOR).await {
            Ok(count_element) => element_text(&count_element)
                .await
                .map_or(0, |text| parse_leading_count(&text)),
            Err(_) => 0,
        };
        highlights.push(Highlight { label, count });
    }
    highlights
}

/// Total review count advertised on the review tab, 0 when absent or
/// unparseable.
pub async fn extract_review_count(page: &Page) -> u32 {
    match page.find_element(REVIEW_COUNT_SELECTOR).await {
        Ok(element) => match element_text(&element).await {
            Some(text) => parse_leading_count(&text),
            None => 0,
        },
        Err(_) => {
            debug!("review count element absent");
            0
        }
    }
}

/// Attempt to switch the review list to most-recent-first ordering.
/// Absence of the control is logged and the run proceeds with the source's
/// default ordering.
pub async fn sort_reviews_recent_first(page: &Page, pacing: &Pacing) {
    match find_by_text(page, "a", SORT_RECENT_LABEL).await {
        Some(control) => {
            if let Err(e) = control.click().await {
                warn!("recent-first sort click failed: {e}");
            }
            pacing.pause().await;
        }
        None => warn!("recent-first sort control absent, keeping default order"),
    }
}

/// First integer in a count string, 0 when there is none.
#[must_use]
pub fn parse_leading_count(text: &str) -> u32 {
    FIRST_INTEGER
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Map hours tokens to the seven recognized weekdays.
///
/// Tokens arrive as the concatenated texts of the hours panel, where a
/// weekday label is immediately followed by that day's hours. Tokens may
/// also arrive glued together with newlines, so each is split into lines
/// first. Scanning is pairwise: a recognized weekday label binds the next
/// token as its hours unless that token is itself a weekday label (a day
/// whose hours never rendered stays unknown). Unmatched tokens are
/// skipped, which guarantees exactly seven keys regardless of what the
/// source rendered.
#[must_use]
pub fn parse_hours<I>(tokens: I) -> BTreeMap<String, String>
where
    I: IntoIterator<Item = String>,
{
    let flat: Vec<String> = tokens
        .into_iter()
        .flat_map(|token| {
            token
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from)
                .collect::<Vec<_>>()
        })
        .collect();

    let mut hours = unknown_hours();
    let is_weekday = |token: &str| WEEKDAY_LABELS.contains(&token);

    let mut i = 0;
    while i < flat.len() {
        if is_weekday(&flat[i]) && i + 1 < flat.len() && !is_weekday(&flat[i + 1]) {
            hours.insert(flat[i].clone(), flat[i + 1].clone());
            i += 2;
        } else {
            i += 1;
        }
    }
    hours
}
