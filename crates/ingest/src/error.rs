use thiserror::Error;

/// File-level ingestion failure: the whole file yields zero usable output.
/// Row-level problems never escalate here; they are collected as strings in
/// `ParsedFileResult::errors` instead.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("required columns not found (need date, description, amount); headers were: {}", .headers.join(", "))]
    MissingColumns { headers: Vec<String> },
    #[error("could not parse file as CSV: {0}")]
    MalformedCsv(String),
    #[error("no valid transactions found")]
    NoTransactions,
    #[error("no valid transactions found in PDF")]
    NoPdfTransactions,
}
