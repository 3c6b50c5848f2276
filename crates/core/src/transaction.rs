use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Explicit debit/credit marker, used only when the source file exposes one
/// independently of the amount sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxnKind {
    Debit,
    Credit,
}

impl std::fmt::Display for TxnKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TxnKind::Debit => write!(f, "debit"),
            TxnKind::Credit => write!(f, "credit"),
        }
    }
}

impl std::str::FromStr for TxnKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "debit" => Ok(TxnKind::Debit),
            "credit" => Ok(TxnKind::Credit),
            other => Err(format!("Unknown transaction kind: '{other}'")),
        }
    }
}

/// Provenance of a category assignment, kept for audit and manual override.
/// A closed enum so a typo can never introduce an unrecognized provenance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategorySource {
    Ai,
    Rules,
    Manual,
}

impl std::fmt::Display for CategorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategorySource::Ai => write!(f, "ai"),
            CategorySource::Rules => write!(f, "rules"),
            CategorySource::Manual => write!(f, "manual"),
        }
    }
}

impl std::str::FromStr for CategorySource {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ai" => Ok(CategorySource::Ai),
            "rules" => Ok(CategorySource::Rules),
            "manual" => Ok(CategorySource::Manual),
            other => Err(format!("Unknown category source: '{other}'")),
        }
    }
}

/// The canonical intermediate record produced by any ingestor.
///
/// Invariant (enforced by the ingestors, not here): `description` is
/// non-empty and `amount` parsed from the source literal. Positive amount =
/// inflow/credit, negative = outflow/debit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    /// Running account balance, when the source exposes it.
    pub balance: Option<Decimal>,
    /// Short merchant label heuristically derived from `description`.
    pub merchant: Option<String>,
    pub kind: Option<TxnKind>,
    /// Free-text transaction identifier (check number, reference id, ...).
    pub reference: Option<String>,
}

impl RawTransaction {
    pub fn is_inflow(&self) -> bool {
        self.amount > Decimal::ZERO
    }
}

/// A RawTransaction augmented with its category assignment. Categorization
/// never mutates in place; it always produces this superseding record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorizedTransaction {
    #[serde(flatten)]
    pub transaction: RawTransaction,
    pub category: String,
    pub subcategory: Option<String>,
    /// Assignment certainty in [0.0, 1.0].
    pub confidence: f32,
    pub source: CategorySource,
}
