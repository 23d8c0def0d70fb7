use crate::ingest::record::Record;
use csv::{ReaderBuilder, StringRecord, Trim};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("header row is missing or has blank column names")]
    MissingHeader,
    #[error("malformed row at line {line}: {message}")]
    Malformed { line: u64, message: String },
    #[error("CSV read error: {0}")]
    Csv(#[from] csv::Error),
}

/// Parses delimited text into records keyed by the header row.
///
/// Blank lines (including trailing ones) are skipped. Text containing nothing
/// but whitespace yields no records; a header with no data rows does the same.
pub fn parse_records(text: &str) -> Result<Vec<Record>, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().any(|name| name.is_empty()) {
        return Err(ParseError::MissingHeader);
    }

    let mut records = Vec::new();
    let mut row = StringRecord::new();
    while reader.read_record(&mut row)? {
        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if row.len() != headers.len() {
            let line = row.position().map(|p| p.line()).unwrap_or_default();
            return Err(ParseError::Malformed {
                line,
                message: format!("expected {} fields, found {}", headers.len(), row.len()),
            });
        }
        records.push(headers.iter().zip(row.iter()).collect());
    }

    Ok(records)
}
