use moneta_core::{CategorizedTransaction, CategorySource, RawTransaction};

use crate::classifier::Classifier;
use crate::rules::RuleMatcher;

const AI_CONFIDENCE: f32 = 0.9;

/// Two-stage categorizer: one remote batch call, keyword rules as fallback.
/// Categorization never fails; a dead or misbehaving classifier only lowers
/// confidence.
pub struct CategorizationEngine<C: Classifier> {
    classifier: C,
    rules: RuleMatcher,
}

impl<C: Classifier> CategorizationEngine<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            rules: RuleMatcher::default(),
        }
    }

    pub fn with_rules(classifier: C, rules: RuleMatcher) -> Self {
        Self { classifier, rules }
    }

    /// Categorize a parsed batch. The classifier reply is only trusted when
    /// it carries exactly one label per transaction; anything else (error,
    /// short reply, long reply) sends the whole batch through the rules.
    pub async fn categorize(&self, transactions: Vec<RawTransaction>) -> Vec<CategorizedTransaction> {
        if transactions.is_empty() {
            return Vec::new();
        }

        let descriptions: Vec<String> =
            transactions.iter().map(|t| t.description.clone()).collect();

        match self.classifier.classify(&descriptions).await {
            Ok(labels) if labels.len() == transactions.len() => transactions
                .into_iter()
                .zip(labels)
                .map(|(transaction, category)| CategorizedTransaction {
                    transaction,
                    category,
                    subcategory: None,
                    confidence: AI_CONFIDENCE,
                    source: CategorySource::Ai,
                })
                .collect(),
            Ok(labels) => {
                tracing::warn!(
                    expected = transactions.len(),
                    got = labels.len(),
                    "classifier returned a mismatched batch, falling back to rules"
                );
                self.categorize_with_rules(transactions)
            }
            Err(e) => {
                tracing::warn!(error = %e, "classifier unavailable, falling back to rules");
                self.categorize_with_rules(transactions)
            }
        }
    }

    fn categorize_with_rules(&self, transactions: Vec<RawTransaction>) -> Vec<CategorizedTransaction> {
        transactions
            .into_iter()
            .map(|transaction| {
                let assignment = self.rules.match_description(&transaction.description);
                CategorizedTransaction {
                    transaction,
                    category: assignment.category,
                    subcategory: assignment.subcategory,
                    confidence: assignment.confidence,
                    source: assignment.source,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::MockClassifier;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn txn(description: &str, cents: i64) -> RawTransaction {
        RawTransaction {
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            description: description.to_string(),
            amount: Decimal::new(cents, 2),
            balance: None,
            merchant: None,
            kind: None,
            reference: None,
        }
    }

    #[tokio::test]
    async fn classifier_labels_win_at_high_confidence() {
        let engine = CategorizationEngine::new(MockClassifier::returning(vec![
            "Food & Dining",
            "Travel",
        ]));
        let out = engine
            .categorize(vec![txn("STARBUCKS", -550), txn("DELTA AIR", -21000)])
            .await;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].category, "Food & Dining");
        assert_eq!(out[1].category, "Travel");
        for t in &out {
            assert_eq!(t.confidence, 0.9);
            assert_eq!(t.source, CategorySource::Ai);
            assert!(t.subcategory.is_none());
        }
    }

    #[tokio::test]
    async fn classifier_failure_falls_back_to_rules() {
        let engine = CategorizationEngine::new(MockClassifier::failing());
        let out = engine.categorize(vec![txn("STARBUCKS COFFEE #1234", -550)]).await;

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].category, "Food & Dining");
        assert_eq!(out[0].confidence, 0.8);
        assert_eq!(out[0].source, CategorySource::Rules);
    }

    #[tokio::test]
    async fn count_mismatch_discards_the_whole_reply() {
        // One label for two transactions: not trusted, even for the first.
        let engine = CategorizationEngine::new(MockClassifier::returning(vec!["Travel"]));
        let out = engine
            .categorize(vec![txn("STARBUCKS COFFEE", -550), txn("XQZ VENDOR", -100)])
            .await;

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].category, "Food & Dining");
        assert_eq!(out[0].source, CategorySource::Rules);
        assert_eq!(out[1].category, "Other Expenses");
        assert_eq!(out[1].confidence, 0.3);
    }

    #[tokio::test]
    async fn rule_fallback_is_idempotent() {
        let engine = CategorizationEngine::new(MockClassifier::failing());
        let first = engine.categorize(vec![txn("STARBUCKS COFFEE #1234", -550)]).await;
        let second = engine.categorize(vec![txn("STARBUCKS COFFEE #1234", -550)]).await;
        assert_eq!(first[0].category, second[0].category);
        assert_eq!(first[0].confidence, second[0].confidence);
        assert_eq!(first[0].source, second[0].source);
    }

    #[tokio::test]
    async fn empty_batch_skips_the_classifier() {
        let engine = CategorizationEngine::new(MockClassifier::failing());
        assert!(engine.categorize(Vec::new()).await.is_empty());
    }
}
