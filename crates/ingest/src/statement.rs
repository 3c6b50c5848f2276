use regex::Regex;

use moneta_core::{ParsedFileResult, RawTransaction};

use crate::amount::{is_zero_literal, normalize_amount};
use crate::date::normalize_date;
use crate::error::IngestError;
use crate::merchant::extract_merchant;
use crate::re;

// Candidate selection.
re!(re_leading_date, r"^(?:\d{1,2}/\d{1,2}/\d{2,4}|\d{4}-\d{2}-\d{2})\b");
re!(re_field_split, r" {2,}");

// Line grammars. An amount token tolerates currency symbols, thousands
// separators and accounting parens; normalize_amount does the real work.
re!(re_line_dda_bal,
    r"^(\d{1,2}/\d{1,2}/\d{2,4})\s+(.+?)\s+(-?\$?\(?[\d,]+(?:\.\d{1,2})?\)?)\s+(-?\$?\(?[\d,]+(?:\.\d{1,2})?\)?)$");
re!(re_line_dda,
    r"^(\d{1,2}/\d{1,2}/\d{2,4})\s+(.+?)\s+(-?\$?\(?[\d,]+(?:\.\d{1,2})?\)?)$");
re!(re_line_dad,
    r"^(\d{1,2}/\d{1,2}/\d{2,4})\s+(-?\$?\(?[\d,]+(?:\.\d{1,2})?\)?)\s+(.+)$");
re!(re_line_iso,
    r"^(\d{4}-\d{2}-\d{2})\s+(.+?)\s+(-?\$?\(?[\d,]+(?:\.\d{1,2})?\)?)(?:\s+(-?\$?\(?[\d,]+(?:\.\d{1,2})?\)?))?$");
re!(re_line_columnar,
    r"^(\S+(?:\s\S+)?) {2,}(.+?) {2,}(-?\$?\(?[\d,]+(?:\.\d{1,2})?\)?)(?: {2,}(-?\$?\(?[\d,]+(?:\.\d{1,2})?\)?))?$");

/// Which transaction field each capture group carries. Patterns are data,
/// not branching, so new bank-specific line grammars slot in by adding a
/// `LinePattern` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Date,
    Description,
    Amount,
    Balance,
}

struct LinePattern {
    regex: fn() -> &'static Regex,
    roles: &'static [Role],
}

/// Ordered: first structural match wins. Pattern order is a behavioral
/// contract: the amount-before-description grammar must come after the
/// description-before-amount ones.
const LINE_PATTERNS: &[LinePattern] = &[
    LinePattern {
        regex: re_line_dda_bal,
        roles: &[Role::Date, Role::Description, Role::Amount, Role::Balance],
    },
    LinePattern {
        regex: re_line_dda,
        roles: &[Role::Date, Role::Description, Role::Amount],
    },
    LinePattern {
        regex: re_line_dad,
        roles: &[Role::Date, Role::Amount, Role::Description],
    },
    LinePattern {
        regex: re_line_iso,
        roles: &[Role::Date, Role::Description, Role::Amount, Role::Balance],
    },
];

/// Grammar for the secondary candidates, which carry no leading date: a
/// short first column (often a partial date), a description, a trailing
/// amount and an optional balance, split on 2+ spaces. The date column goes
/// through the normalizer and takes its never-fail fallback when it does
/// not parse.
const COLUMNAR_PATTERNS: &[LinePattern] = &[LinePattern {
    regex: re_line_columnar,
    roles: &[Role::Date, Role::Description, Role::Amount, Role::Balance],
}];

/// Parse already-extracted statement text (the binary-PDF-to-text step is an
/// external collaborator) line by line into transactions plus line-level
/// errors. Returns `Err` only when the whole document yields nothing usable.
pub fn parse_statement(text: &str, filename: &str) -> Result<ParsedFileResult, IngestError> {
    // Physical 1-indexed line numbers are assigned before blank-line
    // filtering, so error positions always name the raw source line.
    let lines: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let mut candidates: Vec<(usize, &str)> = lines
        .iter()
        .copied()
        .filter(|(_, line)| re_leading_date().is_match(line))
        .collect();

    let mut patterns = LINE_PATTERNS;
    if candidates.is_empty() {
        candidates = lines
            .iter()
            .copied()
            .filter(|(_, line)| looks_columnar(line))
            .collect();
        patterns = COLUMNAR_PATTERNS;
    }

    let mut transactions = Vec::new();
    let mut errors = Vec::new();

    for (line_num, line) in candidates {
        match parse_line(line, patterns) {
            Some(tx) => transactions.push(tx),
            None => errors.push(format!("Line {line_num}: could not parse transaction '{line}'")),
        }
    }

    tracing::debug!(
        file = filename,
        accepted = transactions.len(),
        skipped = errors.len(),
        "parsed statement text"
    );

    ParsedFileResult::build(transactions, errors, filename).ok_or(IngestError::NoPdfTransactions)
}

/// Secondary candidate heuristic for layouts without leading dates: at
/// least three 2+-space-separated fields, one carrying a digit and one
/// looking amount-like, with obvious header lines filtered out.
fn looks_columnar(line: &str) -> bool {
    let lower = line.to_lowercase();
    if lower.contains("total") || lower.contains("balance") || lower.contains("date") {
        return false;
    }
    let fields: Vec<&str> = re_field_split().split(line).collect();
    fields.len() >= 3
        && fields.iter().any(|f| f.chars().any(|c| c.is_ascii_digit()))
        && fields.iter().any(|f| f.contains('.') || f.contains(','))
}

/// Try each line grammar in order; first structural match with a parseable
/// amount wins. An amount that normalizes to zero without a zero literal is
/// a pattern mismatch, so the next pattern gets its chance; only when all
/// patterns fail does the line become an error.
fn parse_line(line: &str, patterns: &[LinePattern]) -> Option<RawTransaction> {
    for pattern in patterns {
        let Some(captures) = (pattern.regex)().captures(line) else {
            continue;
        };

        let mut date_raw = "";
        let mut description = "";
        let mut amount_raw = "";
        let mut balance_raw = "";

        for (slot, role) in pattern.roles.iter().enumerate() {
            let text = captures.get(slot + 1).map(|m| m.as_str()).unwrap_or("");
            match role {
                Role::Date => date_raw = text,
                Role::Description => description = text,
                Role::Amount => amount_raw = text,
                Role::Balance => balance_raw = text,
            }
        }

        let description = description.trim();
        if description.is_empty() {
            continue;
        }

        let amount = normalize_amount(amount_raw);
        if amount.is_zero() && !is_zero_literal(amount_raw) {
            continue;
        }

        // Balance attaches only when captured and meaningfully non-zero.
        let balance = Some(normalize_amount(balance_raw)).filter(|b| !b.is_zero());

        return Some(RawTransaction {
            date: normalize_date(date_raw),
            description: description.to_string(),
            amount,
            balance,
            merchant: extract_merchant(description),
            kind: None,
            reference: None,
        });
    }
    None
}
