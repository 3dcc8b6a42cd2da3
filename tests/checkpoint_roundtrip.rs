//! Checkpoint/resume manager behavior: load priority, atomic snapshots,
//! schema superset, and invariant enforcement at the table boundary.

use std::fs;

use tempfile::TempDir;

use placescrape::checkpoint::{ENGINE_COLUMNS, load_working_table, read_table, write_table};
use placescrape::engine::record::{MAX_REVIEWS, UNKNOWN};
use placescrape::engine::selectors::WEEKDAY_LABELS;
use placescrape::{RecordStatus, Review};

fn write_input(dir: &TempDir, body: &str) -> std::path::PathBuf {
    let path = dir.path().join("input.csv");
    fs::write(&path, body).unwrap();
    path
}

#[test]
fn raw_input_loads_as_pending_with_passthrough_columns() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "category,name,address\nkorean,Cafe A,123 Main\nbbq,Grill B,9 Side St\n",
    );
    let checkpoint = dir.path().join("missing.checkpoint.csv");

    let table = load_working_table(&input, &checkpoint).unwrap();

    assert_eq!(table.extra_columns, vec!["category"]);
    assert_eq!(table.records.len(), 2);
    let first = &table.records[0];
    assert_eq!(first.name, "Cafe A");
    assert_eq!(first.address, "123 Main");
    assert_eq!(first.extras, vec!["korean"]);
    assert_eq!(first.status, RecordStatus::Pending);
    assert_eq!(first.phone, UNKNOWN);
    assert_eq!(first.hours.len(), 7);
    assert!(first.facilities.is_empty());
}

#[test]
fn missing_required_column_is_an_error() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "title,street\nCafe A,123 Main\n");
    assert!(read_table(&input).is_err());
}

#[test]
fn written_table_reads_back_equal() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "category,name,address\nkorean,Cafe A,123 Main\n");
    let checkpoint = dir.path().join("table.checkpoint.csv");

    let mut table = read_table(&input).unwrap();
    {
        let record = &mut table.records[0];
        record.status = RecordStatus::Processed;
        record.phone = "02-1234-5678".to_string();
        record.introduction = "A quiet corner cafe".to_string();
        record.facilities = vec!["wifi".to_string(), "terrace".to_string()];
        record.review_count = 412;
        record.reviews = vec![Review {
            date: "2025-03-01".to_string(),
            text: "great coffee".to_string(),
        }];
    }

    write_table(&checkpoint, &table).unwrap();
    let reloaded = read_table(&checkpoint).unwrap();

    assert_eq!(reloaded, table);
}

#[test]
fn checkpoint_wins_over_raw_input() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "name,address\nCafe A,123 Main\n");
    let checkpoint = dir.path().join("resume.checkpoint.csv");

    let mut table = read_table(&input).unwrap();
    table.records[0].status = RecordStatus::Processed;
    table.records[0].phone = "02-0000-0000".to_string();
    write_table(&checkpoint, &table).unwrap();

    let resumed = load_working_table(&input, &checkpoint).unwrap();
    assert_eq!(resumed.records[0].status, RecordStatus::Processed);
    assert_eq!(resumed.records[0].phone, "02-0000-0000");
}

#[test]
fn unreadable_checkpoint_falls_back_to_input() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "name,address\nCafe A,123 Main\n");
    let checkpoint = dir.path().join("broken.checkpoint.csv");
    fs::write(&checkpoint, "title,street\nno,key columns\n").unwrap();

    let table = load_working_table(&input, &checkpoint).unwrap();
    assert_eq!(table.records.len(), 1);
    assert_eq!(table.records[0].status, RecordStatus::Pending);
}

#[test]
fn reload_then_rewrite_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "district,name,address\nA,Cafe A,123 Main\nB,Grill B,9 Side St\n",
    );
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    let mut table = read_table(&input).unwrap();
    table.records[0].status = RecordStatus::Processed;
    table.records[0].highlights = vec![placescrape::Highlight {
        label: "친절해요".to_string(),
        count: 12,
    }];
    write_table(&first, &table).unwrap();

    let reloaded = read_table(&first).unwrap();
    write_table(&second, &reloaded).unwrap();

    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn multi_range_hours_reload_stays_byte_identical() {
    // An hours value carrying the entry separator (split lunch and dinner
    // service) must not truncate on reload.
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "name,address\nBistro C,77 Oak Ave\n");
    let first = dir.path().join("first.csv");
    let second = dir.path().join("second.csv");

    let mut table = read_table(&input).unwrap();
    table.records[0].hours.insert(
        WEEKDAY_LABELS[2].to_string(),
        "11:30 - 14:00; 17:00 - 21:00".to_string(),
    );
    write_table(&first, &table).unwrap();

    let reloaded = read_table(&first).unwrap();
    assert_eq!(
        reloaded.records[0].hours[WEEKDAY_LABELS[2]],
        "11:30 - 14:00, 17:00 - 21:00"
    );
    assert_eq!(reloaded.records[0].hours.len(), 7);

    write_table(&second, &reloaded).unwrap();
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn duplicate_keys_keep_first_occurrence() {
    let dir = TempDir::new().unwrap();
    let input = write_input(
        &dir,
        "name,address\nCafe A,123 Main\nCafe A,123 Main\nCafe A,456 Elm\n",
    );
    let table = read_table(&input).unwrap();
    assert_eq!(table.records.len(), 2);
    assert_eq!(table.records[1].address, "456 Elm");
}

#[test]
fn oversized_review_list_is_capped_on_read() {
    let dir = TempDir::new().unwrap();
    let reviews: Vec<Review> = (0..MAX_REVIEWS + 20)
        .map(|i| Review {
            date: String::new(),
            text: format!("r{i}"),
        })
        .collect();
    let cell = serde_json::to_string(&reviews).unwrap();

    let mut header = vec!["name".to_string(), "address".to_string()];
    header.extend(ENGINE_COLUMNS.iter().map(|c| (*c).to_string()));
    let mut row = vec!["Cafe A".to_string(), "123 Main".to_string()];
    // phone..highlight_list empty, then review_list, then status.
    row.extend(std::iter::repeat_n(String::new(), ENGINE_COLUMNS.len() - 2));
    row.push(cell);
    row.push("Processed".to_string());

    let path = dir.path().join("capped.csv");
    let mut writer = csv::Writer::from_path(&path).unwrap();
    writer.write_record(&header).unwrap();
    writer.write_record(&row).unwrap();
    writer.flush().unwrap();
    drop(writer);

    let table = read_table(&path).unwrap();
    assert_eq!(table.records[0].reviews.len(), MAX_REVIEWS);
    assert_eq!(table.records[0].status, RecordStatus::Processed);
}
