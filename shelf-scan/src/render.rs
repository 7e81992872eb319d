//! Plain-text rendering of book records for the terminal

use shelf_common::BookRecord;

/// One-line-per-field summary of a record
pub fn format_record(record: &BookRecord) -> String {
    let year = record
        .published_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "-".to_string());
    let rating = record
        .rating
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());

    format!(
        "#{} {}\n    {} · {}\n    ISBN: {} · Year: {}\n    Status: {} · Progress: {}% · Rating: {}",
        record.id,
        record.title.as_deref().unwrap_or("(untitled)"),
        record.author.as_deref().unwrap_or("unknown author"),
        record.publisher.as_deref().unwrap_or("no publisher"),
        record.isbn,
        year,
        record.reading_status,
        record.progress,
        rating,
    )
}
