use std::collections::BTreeMap;

use moneta_categorize::{CategorizationEngine, Classifier};
use moneta_core::{CategorizedTransaction, DateRange, ParsedFileResult};
use moneta_ingest::{parse_csv, parse_statement};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::extract::TextExtractor;
use crate::store::TransactionStore;

/// Upload size ceiling, checked before any parsing.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("no files provided")]
    NoFiles,
}

/// One file as received from the upload surface.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Pdf,
}

impl FileKind {
    /// Content type is authoritative when present; the filename extension is
    /// the fallback for browsers that send a generic type.
    pub fn detect(content_type: Option<&str>, filename: &str) -> Option<Self> {
        match content_type {
            Some(ct) if ct.eq_ignore_ascii_case("text/csv") => return Some(Self::Csv),
            Some(ct) if ct.eq_ignore_ascii_case("application/pdf") => return Some(Self::Pdf),
            _ => {}
        }
        let lower = filename.to_lowercase();
        if lower.ends_with(".csv") {
            Some(Self::Csv)
        } else if lower.ends_with(".pdf") {
            Some(Self::Pdf)
        } else {
            None
        }
    }
}

/// Per-file outcome inside a batch. `error` set means the file produced
/// nothing; `row_errors` are the recoverable skips from a file that still
/// produced transactions.
#[derive(Debug, Clone)]
pub struct FileReport {
    pub filename: String,
    pub accepted: usize,
    pub row_errors: Vec<String>,
    pub error: Option<String>,
    pub persist_error: Option<String>,
}

impl FileReport {
    fn rejected(filename: &str, error: String) -> Self {
        Self {
            filename: filename.to_string(),
            accepted: 0,
            row_errors: Vec::new(),
            error: Some(error),
            persist_error: None,
        }
    }
}

/// Aggregate view over a whole batch.
#[derive(Debug)]
pub struct BatchOutcome {
    pub transactions: Vec<CategorizedTransaction>,
    /// Sum of absolute amounts across all accepted transactions.
    pub total_amount: Decimal,
    pub date_range: Option<DateRange>,
    pub category_counts: BTreeMap<String, usize>,
    pub files: Vec<FileReport>,
}

impl BatchOutcome {
    pub fn accepted_count(&self) -> usize {
        self.transactions.len()
    }
}

/// Orchestrates: detect kind → parse → categorize → persist, one file at a
/// time. A failed file becomes a `FileReport` entry; only an empty batch is a
/// hard error.
pub struct IngestPipeline<C: Classifier, X: TextExtractor, S: TransactionStore> {
    engine: CategorizationEngine<C>,
    extractor: X,
    store: S,
}

impl<C: Classifier, X: TextExtractor, S: TransactionStore> IngestPipeline<C, X, S> {
    pub fn new(engine: CategorizationEngine<C>, extractor: X, store: S) -> Self {
        Self { engine, extractor, store }
    }

    pub async fn process_batch(
        &self,
        files: Vec<UploadedFile>,
    ) -> Result<BatchOutcome, PipelineError> {
        if files.is_empty() {
            return Err(PipelineError::NoFiles);
        }

        let mut transactions = Vec::new();
        let mut reports = Vec::with_capacity(files.len());
        let mut total_amount = Decimal::ZERO;
        let mut date_range: Option<DateRange> = None;
        let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();

        for file in files {
            let report = self.process_file(&file).await;
            match report {
                Ok((parsed, mut categorized, mut file_report)) => {
                    total_amount += parsed.total_amount;
                    date_range = Some(match date_range.take() {
                        Some(r) => r.union(parsed.date_range),
                        None => parsed.date_range,
                    });

                    if let Err(e) = self
                        .store
                        .save_batch(&categorized, &file.filename)
                        .await
                    {
                        tracing::warn!(file = %file.filename, error = %e, "persist failed");
                        file_report.persist_error = Some(e.to_string());
                    }

                    for t in &categorized {
                        *category_counts.entry(t.category.clone()).or_insert(0) += 1;
                    }
                    transactions.append(&mut categorized);
                    reports.push(file_report);
                }
                Err(report) => {
                    tracing::warn!(
                        file = %report.filename,
                        error = report.error.as_deref().unwrap_or(""),
                        "file rejected"
                    );
                    reports.push(report);
                }
            }
        }

        Ok(BatchOutcome {
            transactions,
            total_amount,
            date_range,
            category_counts,
            files: reports,
        })
    }

    async fn process_file(
        &self,
        file: &UploadedFile,
    ) -> Result<(ParsedFileResult, Vec<CategorizedTransaction>, FileReport), FileReport> {
        if file.bytes.len() > MAX_FILE_BYTES {
            return Err(FileReport::rejected(
                &file.filename,
                format!("file exceeds {} byte limit", MAX_FILE_BYTES),
            ));
        }

        let kind = FileKind::detect(file.content_type.as_deref(), &file.filename)
            .ok_or_else(|| {
                FileReport::rejected(&file.filename, "unsupported file type".to_string())
            })?;

        let parsed = match kind {
            FileKind::Csv => {
                // Lossy decode: a stray non-UTF8 byte loses one row at worst,
                // not the file.
                let content = String::from_utf8_lossy(&file.bytes);
                parse_csv(&content, &file.filename)
                    .map_err(|e| FileReport::rejected(&file.filename, e.to_string()))?
            }
            FileKind::Pdf => {
                let text = self
                    .extractor
                    .extract_text(&file.bytes)
                    .await
                    .map_err(|e| FileReport::rejected(&file.filename, e.to_string()))?;
                parse_statement(&text, &file.filename)
                    .map_err(|e| FileReport::rejected(&file.filename, e.to_string()))?
            }
        };

        let categorized = self.engine.categorize(parsed.transactions.clone()).await;

        let report = FileReport {
            filename: file.filename.clone(),
            accepted: categorized.len(),
            row_errors: parsed.errors.clone(),
            error: None,
            persist_error: None,
        };

        Ok((parsed, categorized, report))
    }
}
