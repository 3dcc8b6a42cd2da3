//! Record model for one business entity and its extracted fields.
//!
//! A record is keyed by `(name, address)` and carries a completion status
//! that controls whether a future run re-attempts navigation. All extracted
//! fields have documented defaults so a record is always representable, no
//! matter how little the detail view rendered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::selectors::WEEKDAY_LABELS;

/// Hard cap on retained reviews per record.
pub const MAX_REVIEWS: usize = 300;

/// Hard cap on retained highlight pairs per record.
pub const MAX_HIGHLIGHTS: usize = 4;

/// Sentinel for scalar fields the detail view did not render.
pub const UNKNOWN: &str = "unknown";

/// Completion status of a record.
///
/// Transitions are monotonic within a run: Pending → Processed or
/// Pending → Failed, never back. Only Processed records are skipped on
/// resume; Failed records are reconsidered by the next run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordStatus {
    #[default]
    Pending,
    Processed,
    Failed,
}

impl RecordStatus {
    /// Parse a status cell from a checkpoint table.
    ///
    /// Anything unrecognized (including the empty cell of a raw input row)
    /// reads as Pending so it gets retried.
    #[must_use]
    pub fn parse(cell: &str) -> Self {
        match cell.trim() {
            "Processed" => Self::Processed,
            "Failed" => Self::Failed,
            _ => Self::Pending,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processed => "Processed",
            Self::Failed => "Failed",
        }
    }
}

/// One review entry: when it was written and what it says.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub date: String,
    pub text: String,
}

/// A labeled positive-attribute tag with its mention count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub label: String,
    pub count: u32,
}

/// One business entity plus everything extracted from its detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRecord {
    pub name: String,
    pub address: String,
    /// Passthrough cells for input columns the engine does not interpret,
    /// in table column order.
    pub extras: Vec<String>,
    pub status: RecordStatus,
    pub phone: String,
    /// Weekday label → hours string. Always exactly the seven recognized
    /// labels; unobserved days stay [`UNKNOWN`].
    pub hours: BTreeMap<String, String>,
    pub review_count: u32,
    pub introduction: String,
    pub facilities: Vec<String>,
    pub parking: String,
    pub seating: Vec<String>,
    pub highlights: Vec<Highlight>,
    pub reviews: Vec<Review>,
}

impl PlaceRecord {
    /// Fresh record with key fields populated and every extracted field at
    /// its documented default.
    #[must_use]
    pub fn new(name: impl Into<String>, address: impl Into<String>, extras: Vec<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            extras,
            status: RecordStatus::Pending,
            phone: UNKNOWN.to_string(),
            hours: unknown_hours(),
            review_count: 0,
            introduction: UNKNOWN.to_string(),
            facilities: Vec::new(),
            parking: UNKNOWN.to_string(),
            seating: Vec::new(),
            highlights: Vec::new(),
            reviews: Vec::new(),
        }
    }

    /// Dedup / matching key.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.address)
    }

    /// Render the hours mapping as the semicolon-joined `"Day: hours"`
    /// string the intermediate cleaning stage consumes, in weekday order.
    ///
    /// `;` is reserved as the entry separator, so multi-range values
    /// (e.g. lunch and dinner service) have it swapped for `,` here. The
    /// rendering parses back losslessly after that substitution.
    #[must_use]
    pub fn hours_display(&self) -> String {
        WEEKDAY_LABELS
            .iter()
            .map(|day| {
                let hours = self.hours.get(*day).map_or(UNKNOWN, String::as_str);
                let hours = hours.replace(';', ",");
                format!("{day}: {hours}")
            })
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// Enforce the record invariants at the checkpoint boundary: review and
    /// highlight caps, and exactly seven weekday keys.
    pub fn enforce_caps(&mut self) {
        self.reviews.truncate(MAX_REVIEWS);
        self.highlights.truncate(MAX_HIGHLIGHTS);
        for day in WEEKDAY_LABELS {
            self.hours
                .entry(day.to_string())
                .or_insert_with(|| UNKNOWN.to_string());
        }
        self.hours.retain(|day, _| WEEKDAY_LABELS.contains(&day.as_str()));
    }
}

/// Hours mapping with all seven weekdays set to [`UNKNOWN`].
#[must_use]
pub fn unknown_hours() -> BTreeMap<String, String> {
    WEEKDAY_LABELS
        .iter()
        .map(|day| ((*day).to_string(), UNKNOWN.to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_defaults_to_pending() {
        assert_eq!(RecordStatus::parse("Processed"), RecordStatus::Processed);
        assert_eq!(RecordStatus::parse("Failed"), RecordStatus::Failed);
        assert_eq!(RecordStatus::parse(""), RecordStatus::Pending);
        assert_eq!(RecordStatus::parse("garbage"), RecordStatus::Pending);
    }

    #[test]
    fn new_record_has_seven_unknown_weekdays() {
        let record = PlaceRecord::new("Cafe A", "123 Main", Vec::new());
        assert_eq!(record.hours.len(), 7);
        assert!(record.hours.values().all(|h| h == UNKNOWN));
    }

    #[test]
    fn hours_display_is_in_weekday_order() {
        let mut record = PlaceRecord::new("Cafe A", "123 Main", Vec::new());
        record
            .hours
            .insert(WEEKDAY_LABELS[0].to_string(), "09:00 - 18:00".to_string());
        let rendered = record.hours_display();
        assert!(rendered.starts_with(&format!("{}: 09:00 - 18:00", WEEKDAY_LABELS[0])));
        assert_eq!(rendered.matches("; ").count(), 6);
    }

    #[test]
    fn multi_range_hours_swap_the_entry_separator() {
        let mut record = PlaceRecord::new("Bistro C", "77 Oak Ave", Vec::new());
        record.hours.insert(
            WEEKDAY_LABELS[1].to_string(),
            "11:30 - 14:00; 17:00 - 21:00".to_string(),
        );
        let rendered = record.hours_display();
        assert!(rendered.contains("11:30 - 14:00, 17:00 - 21:00"));
        // Exactly one separator per entry boundary survives.
        assert_eq!(rendered.matches(';').count(), 6);
    }

    #[test]
    fn enforce_caps_truncates_and_repairs_hours() {
        let mut record = PlaceRecord::new("Cafe A", "123 Main", Vec::new());
        record.reviews = (0..MAX_REVIEWS + 50)
            .map(|i| Review {
                date: String::new(),
                text: format!("review {i}"),
            })
            .collect();
        record.highlights = (0..6)
            .map(|i| Highlight {
                label: format!("tag {i}"),
                count: i,
            })
            .collect();
        record.hours.remove(WEEKDAY_LABELS[3]);
        record.hours.insert("NotADay".to_string(), "never".to_string());

        record.enforce_caps();

        assert_eq!(record.reviews.len(), MAX_REVIEWS);
        assert_eq!(record.highlights.len(), MAX_HIGHLIGHTS);
        assert_eq!(record.hours.len(), 7);
        assert_eq!(record.hours[WEEKDAY_LABELS[3]], UNKNOWN);
    }
}
