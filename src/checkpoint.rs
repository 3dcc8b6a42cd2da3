//! Working-table persistence: input loading, checkpoint/resume, atomic
//! snapshot writes.
//!
//! The checkpoint is the whole in-memory table serialized to the output
//! CSV schema and replaced atomically (write to a temp file in the same
//! directory, then rename over the target). Interrupting the process at
//! any point therefore loses at most the record in flight.

use std::collections::HashSet;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{error, info, warn};

use crate::engine::record::{
    Highlight, MAX_HIGHLIGHTS, MAX_REVIEWS, PlaceRecord, RecordStatus, Review, unknown_hours,
};
use crate::engine::selectors::WEEKDAY_LABELS;
use crate::engine::ScrapeError;

pub const COL_NAME: &str = "name";
pub const COL_ADDRESS: &str = "address";

/// Columns this engine appends to the input schema, in output order.
/// Column addition is append-only; input columns are never renamed here
/// (renaming belongs to the downstream cleaning stage).
pub const ENGINE_COLUMNS: [&str; 10] = [
    "phone",
    "operating_hours",
    "review_count",
    "introduction",
    "facility_list",
    "parking_status",
    "seat_info",
    "highlight_list",
    "review_list",
    "processed",
];

/// The in-memory working table: ordered records plus the passthrough
/// header for columns the engine does not interpret.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceTable {
    pub extra_columns: Vec<String>,
    pub records: Vec<PlaceRecord>,
}

/// Load the working table for a run.
///
/// A readable checkpoint takes priority over the raw input so previously
/// completed records are not redone. A checkpoint that fails to parse is
/// logged and the raw input is used instead.
pub fn load_working_table(input: &Path, checkpoint: &Path) -> Result<PlaceTable, ScrapeError> {
    if checkpoint.exists() {
        match read_table(checkpoint) {
            Ok(table) => {
                let done = table
                    .records
                    .iter()
                    .filter(|r| r.status == RecordStatus::Processed)
                    .count();
                info!(
                    path = %checkpoint.display(),
                    records = table.records.len(),
                    processed = done,
                    "resumed from checkpoint"
                );
                return Ok(table);
            }
            Err(e) => {
                error!(path = %checkpoint.display(), "checkpoint unreadable, falling back to input: {e}");
            }
        }
    }
    let table = read_table(input)?;
    info!(path = %input.display(), records = table.records.len(), "loaded raw input table");
    Ok(table)
}

/// Read a delimited table (raw input or checkpoint) into records.
///
/// `name` and `address` are required; engine columns are parsed back when
/// present; everything else passes through untouched. Duplicate keys keep
/// the first occurrence.
pub fn read_table(path: &Path) -> Result<PlaceTable, ScrapeError> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();

    let find = |name: &str| headers.iter().position(|h| h == name);
    let name_idx = find(COL_NAME)
        .ok_or_else(|| ScrapeError::Table(format!("missing required column '{COL_NAME}'")))?;
    let address_idx = find(COL_ADDRESS)
        .ok_or_else(|| ScrapeError::Table(format!("missing required column '{COL_ADDRESS}'")))?;
    let engine_idx: Vec<Option<usize>> = ENGINE_COLUMNS.iter().map(|c| find(c)).collect();

    let extra_indices: Vec<usize> = (0..headers.len())
        .filter(|&i| {
            i != name_idx && i != address_idx && !engine_idx.contains(&Some(i))
        })
        .collect();
    let extra_columns: Vec<String> = extra_indices.iter().map(|&i| headers[i].clone()).collect();

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;
        let cell = |i: usize| row.get(i).unwrap_or("").trim().to_string();

        let name = cell(name_idx);
        let address = cell(address_idx);
        if !seen.insert((name.clone(), address.clone())) {
            warn!(name = %name, address = %address, "duplicate key in table, keeping first occurrence");
            continue;
        }

        let extras = extra_indices.iter().map(|&i| cell(i)).collect();
        let mut record = PlaceRecord::new(name, address, extras);

        let engine_cell = |col: usize| -> Option<String> {
            engine_idx[col].map(|i| cell(i)).filter(|c| !c.is_empty())
        };
        if let Some(phone) = engine_cell(0) {
            record.phone = phone;
        }
        if let Some(hours) = engine_cell(1) {
            record.hours = parse_hours_display(&hours);
        }
        if let Some(count) = engine_cell(2) {
            record.review_count = count.parse().unwrap_or(0);
        }
        if let Some(intro) = engine_cell(3) {
            record.introduction = intro;
        }
        if let Some(facilities) = engine_cell(4) {
            record.facilities = parse_json_cell(&facilities, "facility_list");
        }
        if let Some(parking) = engine_cell(5) {
            record.parking = parking;
        }
        if let Some(seating) = engine_cell(6) {
            record.seating = parse_json_cell(&seating, "seat_info");
        }
        if let Some(highlights) = engine_cell(7) {
            record.highlights = parse_json_cell::<Highlight>(&highlights, "highlight_list");
        }
        if let Some(reviews) = engine_cell(8) {
            record.reviews = parse_json_cell::<Review>(&reviews, "review_list");
        }
        if let Some(status) = engine_idx[9].map(|i| cell(i)) {
            record.status = RecordStatus::parse(&status);
        }

        // Validate invariants at the checkpoint boundary.
        record.enforce_caps();
        records.push(record);
    }

    Ok(PlaceTable {
        extra_columns,
        records,
    })
}

/// Serialize the table to `path` atomically (write-then-replace).
///
/// Used for both per-record checkpoints and the definitive output; both
/// carry the same schema so a checkpoint is always a valid output table.
pub fn write_table(path: &Path, table: &PlaceTable) -> Result<(), ScrapeError> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let tmp = match dir {
        Some(dir) => NamedTempFile::new_in(dir)?,
        None => NamedTempFile::new_in(".")?,
    };

    {
        let mut writer = csv::Writer::from_writer(tmp.as_file());

        let mut header: Vec<&str> = table.extra_columns.iter().map(String::as_str).collect();
        header.push(COL_NAME);
        header.push(COL_ADDRESS);
        header.extend(ENGINE_COLUMNS);
        writer.write_record(&header)?;

        for record in &table.records {
            writer.write_record(render_row(record, table.extra_columns.len())?)?;
        }
        writer.flush()?;
    }

    tmp.persist(path).map_err(|e| ScrapeError::Io(e.error))?;
    Ok(())
}

/// One output row for a record, caps enforced at the boundary.
fn render_row(record: &PlaceRecord, extra_count: usize) -> Result<Vec<String>, ScrapeError> {
    let mut row = Vec::with_capacity(extra_count + 2 + ENGINE_COLUMNS.len());
    for i in 0..extra_count {
        row.push(record.extras.get(i).cloned().unwrap_or_default());
    }
    row.push(record.name.clone());
    row.push(record.address.clone());
    row.push(record.phone.clone());
    row.push(record.hours_display());
    row.push(record.review_count.to_string());
    row.push(record.introduction.clone());
    row.push(to_json_cell(&record.facilities)?);
    row.push(record.parking.clone());
    row.push(to_json_cell(&record.seating)?);
    let highlights = &record.highlights[..record.highlights.len().min(MAX_HIGHLIGHTS)];
    row.push(to_json_cell(&highlights)?);
    let reviews = &record.reviews[..record.reviews.len().min(MAX_REVIEWS)];
    row.push(to_json_cell(&reviews)?);
    row.push(record.status.as_str().to_string());
    Ok(row)
}

fn to_json_cell<T: Serialize>(value: &T) -> Result<String, ScrapeError> {
    serde_json::to_string(value).map_err(|e| ScrapeError::Table(format!("cell serialization: {e}")))
}

fn parse_json_cell<T: DeserializeOwned>(cell: &str, column: &str) -> Vec<T> {
    match serde_json::from_str(cell) {
        Ok(values) => values,
        Err(e) => {
            warn!(column, "unparseable list cell, treating as empty: {e}");
            Vec::new()
        }
    }
}

/// Parse the `"Day: hours; Day: hours"` rendering back into the mapping.
/// Unrecognized labels are dropped; the result always has the seven
/// weekday keys.
fn parse_hours_display(cell: &str) -> std::collections::BTreeMap<String, String> {
    let mut hours = unknown_hours();
    for part in cell.split(';') {
        if let Some((day, value)) = part.split_once(':') {
            let day = day.trim();
            let value = value.trim();
            if WEEKDAY_LABELS.contains(&day) && !value.is_empty() {
                hours.insert(day.to_string(), value.to_string());
            }
        }
    }
    hours
}
