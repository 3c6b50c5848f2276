use moneta_core::{ParsedFileResult, RawTransaction, TxnKind};

use crate::amount::{is_zero_literal, normalize_amount};
use crate::date::normalize_date;
use crate::error::IngestError;
use crate::merchant::extract_merchant;
use crate::schema::detect_columns;

/// Parse the full text of an uploaded CSV into transactions plus row-level
/// errors. File-level failures (unreadable structure, unresolvable required
/// columns, zero surviving rows) return `Err`; individual bad rows are
/// skipped and reported in the result's `errors` list instead.
pub fn parse_csv(content: &str, filename: &str) -> Result<ParsedFileResult, IngestError> {
    let (headers, rows) = read_table(content)?;

    let columns = detect_columns(&headers);
    let missing = columns.missing_required();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns { headers });
    }

    let mut transactions = Vec::new();
    let mut errors = Vec::new();

    for (row_num, row) in &rows {
        let field = |idx: Option<usize>| -> &str {
            idx.and_then(|idx| row.get(idx)).map(|s| s.trim()).unwrap_or("")
        };

        let date_raw = field(columns.date);
        let description = field(columns.description);
        let amount_raw = field(columns.amount);

        if date_raw.is_empty() || description.is_empty() || amount_raw.is_empty() {
            errors.push(format!("Row {row_num}: missing required data"));
            continue;
        }

        let amount = normalize_amount(amount_raw);
        if amount.is_zero() && !is_zero_literal(amount_raw) {
            errors.push(format!("Row {row_num}: could not parse amount '{amount_raw}'"));
            continue;
        }

        let balance_raw = field(columns.balance);
        let balance = (!balance_raw.is_empty()).then(|| normalize_amount(balance_raw));

        let reference_raw = field(columns.reference);
        let reference = (!reference_raw.is_empty()).then(|| reference_raw.to_string());

        transactions.push(RawTransaction {
            date: normalize_date(date_raw),
            description: description.to_string(),
            amount,
            balance,
            merchant: extract_merchant(description),
            kind: classify_kind(field(columns.kind)),
            reference,
        });
    }

    tracing::debug!(
        file = filename,
        bank = columns.bank,
        accepted = transactions.len(),
        skipped = errors.len(),
        "parsed csv"
    );

    ParsedFileResult::build(transactions, errors, filename).ok_or(IngestError::NoTransactions)
}

/// Read headers + data rows, preferring the csv crate in tolerant mode and
/// falling back to a manual positional split when structured parsing fails
/// entirely. Each row is paired with its physical 1-indexed line number, so
/// blank lines never shift error reporting.
fn read_table(content: &str) -> Result<(Vec<String>, Vec<(u64, Vec<String>)>), IngestError> {
    if let Some(table) = read_structured(content) {
        return Ok(table);
    }
    read_positional(content)
}

fn read_structured(content: &str) -> Option<(Vec<String>, Vec<(u64, Vec<String>)>)> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers().ok()?.iter().map(|s| s.to_string()).collect();
    if headers.is_empty() {
        return None;
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        match record {
            Ok(record) => {
                let line = record.position().map_or(0, |p| p.line());
                rows.push((line, record.iter().map(|s| s.to_string()).collect()));
            }
            // A single bad record poisons structured parsing; let the
            // positional fallback take over rather than silently dropping
            // rows here.
            Err(e) => {
                tracing::debug!(error = %e, "structured csv read failed, using positional fallback");
                return None;
            }
        }
    }
    Some((headers, rows))
}

fn read_positional(content: &str) -> Result<(Vec<String>, Vec<(u64, Vec<String>)>), IngestError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i as u64 + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, header_line) = lines
        .next()
        .ok_or_else(|| IngestError::MalformedCsv("file is empty".to_string()))?;
    let headers: Vec<String> = header_line.split(',').map(|s| s.trim().to_string()).collect();

    let rows: Vec<(u64, Vec<String>)> = lines
        .map(|(n, line)| (n, line.split(',').map(|s| s.trim().to_string()).collect()))
        .collect();

    Ok((headers, rows))
}

/// Classify an explicit type marker by substring: credit/cr vs debit/dr.
fn classify_kind(raw: &str) -> Option<TxnKind> {
    let t = raw.trim().to_lowercase();
    if t.is_empty() {
        return None;
    }
    if t.contains("credit") || t.contains("cr") {
        Some(TxnKind::Credit)
    } else if t.contains("debit") || t.contains("dr") {
        Some(TxnKind::Debit)
    } else {
        None
    }
}
