/// Synonym tables for one bank's CSV export layout. Detected by a marker
/// substring in any normalized header; the generic profile covers the
/// common synonyms when no bank is recognized.
struct BankProfile {
    name: &'static str,
    marker: &'static str,
    date: &'static [&'static str],
    description: &'static [&'static str],
    amount: &'static [&'static str],
    balance: &'static [&'static str],
    reference: &'static [&'static str],
    kind: &'static [&'static str],
}

const GENERIC: BankProfile = BankProfile {
    name: "generic",
    marker: "",
    date: &["date", "posted", "posting_date", "transaction_date"],
    description: &["description", "details", "memo", "narrative", "payee", "name"],
    amount: &["amount", "value"],
    balance: &["balance", "running_bal"],
    reference: &["reference", "check_number", "check_or_slip", "transaction_id", "ref"],
    kind: &["type", "transaction_type", "dr_cr", "debit_credit"],
};

// In Chase exports "Details" carries the DEBIT/CREDIT marker, not the
// narrative, which is why the bank-specific table exists at all.
const BANKS: &[BankProfile] = &[
    BankProfile {
        name: "chase",
        marker: "chase",
        date: &["posting_date", "post_date", "date"],
        description: &["description"],
        amount: &["amount"],
        balance: &["balance"],
        reference: &["check_or_slip"],
        kind: &["details", "type"],
    },
    BankProfile {
        name: "bank_of_america",
        marker: "bank_of_america",
        date: &["date"],
        description: &["description", "payee"],
        amount: &["amount"],
        balance: &["running_bal", "balance"],
        reference: &["reference"],
        kind: &["type"],
    },
    BankProfile {
        name: "wells_fargo",
        marker: "wells_fargo",
        date: &["date"],
        description: &["description", "memo"],
        amount: &["amount"],
        balance: &["balance"],
        reference: &["check_number"],
        kind: &["type"],
    },
];

/// Canonical field → column index mapping for one header row.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    pub bank: &'static str,
    pub date: Option<usize>,
    pub description: Option<usize>,
    pub amount: Option<usize>,
    pub balance: Option<usize>,
    pub reference: Option<usize>,
    pub kind: Option<usize>,
}

impl ColumnMap {
    /// The mandatory fields that failed to resolve. Any entry here fails the
    /// whole file, not just individual rows.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push("date");
        }
        if self.description.is_none() {
            missing.push("description");
        }
        if self.amount.is_none() {
            missing.push("amount");
        }
        missing
    }
}

/// Lowercase, map every non-alphanumeric run to a single `_`, trim edges.
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.to_lowercase().chars() {
        if c.is_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

/// Identify the bank layout from a CSV header row and map canonical fields
/// to column positions by fuzzy (bidirectional substring) name matching.
pub fn detect_columns(headers: &[String]) -> ColumnMap {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();

    let profile = BANKS
        .iter()
        .find(|p| normalized.iter().any(|h| h.contains(p.marker)))
        .unwrap_or(&GENERIC);

    ColumnMap {
        bank: profile.name,
        date: find_field(&normalized, profile.date),
        description: find_field(&normalized, profile.description),
        amount: find_field(&normalized, profile.amount),
        balance: find_field(&normalized, profile.balance),
        reference: find_field(&normalized, profile.reference),
        kind: find_field(&normalized, profile.kind),
    }
}

/// First match in synonym-priority order wins; a header matches a synonym
/// when either contains the other.
fn find_field(headers: &[String], synonyms: &[&str]) -> Option<usize> {
    for syn in synonyms {
        for (idx, header) in headers.iter().enumerate() {
            if header.is_empty() {
                continue;
            }
            if header.contains(syn) || syn.contains(header.as_str()) {
                return Some(idx);
            }
        }
    }
    None
}
