pub mod classifier;
pub mod engine;
pub mod rules;

pub use classifier::{Classifier, ClassifyError, HttpClassifier, MockClassifier};
pub use engine::CategorizationEngine;
pub use rules::{Assignment, KeywordRule, RuleMatcher, Suggestion, DEFAULT_CATEGORY};
