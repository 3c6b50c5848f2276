use std::collections::BTreeSet;
use std::sync::Mutex;

use async_trait::async_trait;
use moneta_core::CategorizedTransaction;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Backend(String),
}

/// Persistence seam for categorized batches. Failures here never invalidate
/// the parse itself; the orchestrator reports them per file and moves on.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Persist one file's worth of transactions. `source_file` is the
    /// original upload name, kept for provenance.
    async fn save_batch(
        &self,
        transactions: &[CategorizedTransaction],
        source_file: &str,
    ) -> Result<usize, StoreError>;
}

// ── In-memory store ───────────────────────────────────────────────────────────

/// A persisted row together with where it came from.
#[derive(Debug, Clone)]
pub struct StoredTransaction {
    pub transaction: CategorizedTransaction,
    pub source_file: String,
}

/// In-memory store. Categories outside the known taxonomy are folded into the
/// catch-all buckets at write time, split by transaction direction.
pub struct MemoryStore {
    known_categories: BTreeSet<String>,
    rows: Mutex<Vec<StoredTransaction>>,
}

const KNOWN_CATEGORIES: &[&str] = &[
    "Food & Dining",
    "Groceries",
    "Transportation",
    "Shopping",
    "Entertainment",
    "Bills & Utilities",
    "Healthcare",
    "Travel",
    "Housing",
    "Income",
    "Transfers",
    "Fees & Charges",
    "Other Expenses",
    "Other Income",
];

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            known_categories: KNOWN_CATEGORIES.iter().map(|c| c.to_string()).collect(),
            rows: Mutex::new(Vec::new()),
        }
    }

    fn resolve_category(&self, t: &CategorizedTransaction) -> String {
        if self.known_categories.contains(&t.category) {
            t.category.clone()
        } else if t.transaction.is_inflow() {
            "Other Income".to_string()
        } else {
            "Other Expenses".to_string()
        }
    }

    pub fn all(&self) -> Vec<StoredTransaction> {
        match self.rows.lock() {
            Ok(rows) => rows.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn save_batch(
        &self,
        transactions: &[CategorizedTransaction],
        source_file: &str,
    ) -> Result<usize, StoreError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| StoreError::Backend("store mutex poisoned".to_string()))?;

        for t in transactions {
            let mut resolved = t.clone();
            resolved.category = self.resolve_category(t);
            rows.push(StoredTransaction {
                transaction: resolved,
                source_file: source_file.to_string(),
            });
        }

        Ok(transactions.len())
    }
}
