use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::period::DateRange;
use super::transaction::RawTransaction;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Accepted transactions only; skipped rows are not counted here.
    pub row_count: usize,
    pub original_filename: String,
    pub parsed_at: DateTime<Utc>,
}

/// Output contract of every ingestor: the surviving transactions in source
/// order, aggregate stats over them, and one diagnostic string per skipped
/// row (1-indexed against the source position).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedFileResult {
    pub transactions: Vec<RawTransaction>,
    /// Sum of absolute amounts across `transactions`.
    pub total_amount: Decimal,
    pub date_range: DateRange,
    pub errors: Vec<String>,
    pub metadata: FileMetadata,
}

impl ParsedFileResult {
    /// Compute aggregates over an ingestor's surviving transactions.
    /// Returns `None` for an empty list; the ingestor turns that into its
    /// file-level "no valid transactions" error.
    pub fn build(
        transactions: Vec<RawTransaction>,
        errors: Vec<String>,
        original_filename: &str,
    ) -> Option<Self> {
        let first = transactions.first()?;

        let date_range = transactions
            .iter()
            .fold(DateRange::single(first.date), |range, tx| range.extend(tx.date));
        let total_amount = transactions
            .iter()
            .fold(Decimal::ZERO, |sum, tx| sum + tx.amount.abs());

        let metadata = FileMetadata {
            row_count: transactions.len(),
            original_filename: original_filename.to_string(),
            parsed_at: Utc::now(),
        };

        Some(ParsedFileResult {
            transactions,
            total_amount,
            date_range,
            errors,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn tx(date: (i32, u32, u32), cents: i64) -> RawTransaction {
        RawTransaction {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            description: "TEST".to_string(),
            amount: Decimal::new(cents, 2),
            balance: None,
            merchant: None,
            kind: None,
            reference: None,
        }
    }

    #[test]
    fn build_empty_is_none() {
        assert!(ParsedFileResult::build(vec![], vec![], "empty.csv").is_none());
    }

    #[test]
    fn total_amount_sums_absolute_values() {
        let result = ParsedFileResult::build(
            vec![tx((2024, 1, 1), 1000), tx((2024, 1, 2), -250)],
            vec![],
            "a.csv",
        )
        .unwrap();
        assert_eq!(result.total_amount, Decimal::new(1250, 2));
    }

    #[test]
    fn date_range_spans_min_to_max() {
        let result = ParsedFileResult::build(
            vec![
                tx((2024, 3, 10), 100),
                tx((2024, 1, 5), 100),
                tx((2024, 2, 20), 100),
            ],
            vec![],
            "a.csv",
        )
        .unwrap();
        assert_eq!(result.date_range.start, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(result.date_range.end, NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        assert!(result.date_range.start <= result.date_range.end);
    }

    #[test]
    fn row_count_excludes_skipped_rows() {
        let result = ParsedFileResult::build(
            vec![tx((2024, 1, 1), 100)],
            vec!["Row 3: missing required data".to_string()],
            "a.csv",
        )
        .unwrap();
        assert_eq!(result.metadata.row_count, 1);
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn transactions_keep_source_order() {
        let result = ParsedFileResult::build(
            vec![tx((2024, 3, 1), 300), tx((2024, 1, 1), 100), tx((2024, 2, 1), 200)],
            vec![],
            "a.csv",
        )
        .unwrap();
        let amounts: Vec<Decimal> = result.transactions.iter().map(|t| t.amount).collect();
        assert_eq!(
            amounts,
            vec![Decimal::new(300, 2), Decimal::new(100, 2), Decimal::new(200, 2)]
        );
    }
}
