use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("no classifier endpoint configured")]
    Unavailable,
    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("classifier returned a bad response: {0}")]
    BadResponse(String),
}

/// Remote transaction classifier. The engine treats any error as a signal to
/// fall back to keyword rules; implementations never need to degrade
/// internally.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Classify a batch of transaction descriptions. A successful reply must
    /// carry exactly one category per input description.
    async fn classify(&self, descriptions: &[String]) -> Result<Vec<String>, ClassifyError>;
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    descriptions: &'a [String],
}

#[derive(Deserialize)]
struct ClassifyResponse {
    categories: Vec<String>,
}

/// HTTP classifier speaking the batch JSON protocol. An unconfigured endpoint
/// is a normal state, not a setup error.
pub struct HttpClassifier {
    endpoint: Option<String>,
    client: reqwest::Client,
}

impl HttpClassifier {
    pub fn new(endpoint: Option<String>) -> Self {
        Self {
            endpoint,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, descriptions: &[String]) -> Result<Vec<String>, ClassifyError> {
        let endpoint = self.endpoint.as_deref().ok_or(ClassifyError::Unavailable)?;

        let response = self
            .client
            .post(endpoint)
            .json(&ClassifyRequest { descriptions })
            .send()
            .await?
            .error_for_status()?;

        let body: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| ClassifyError::BadResponse(e.to_string()))?;

        Ok(body.categories)
    }
}

/// Scripted classifier for tests.
pub struct MockClassifier {
    result: Result<Vec<String>, ()>,
}

impl MockClassifier {
    pub fn returning(categories: Vec<&str>) -> Self {
        Self {
            result: Ok(categories.into_iter().map(str::to_string).collect()),
        }
    }

    pub fn failing() -> Self {
        Self { result: Err(()) }
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, _descriptions: &[String]) -> Result<Vec<String>, ClassifyError> {
        match &self.result {
            Ok(categories) => Ok(categories.clone()),
            Err(()) => Err(ClassifyError::Unavailable),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unconfigured_endpoint_is_unavailable() {
        let classifier = HttpClassifier::new(None);
        let err = classifier.classify(&["COFFEE".to_string()]).await.unwrap_err();
        assert!(matches!(err, ClassifyError::Unavailable));
    }

    #[tokio::test]
    async fn mock_returns_scripted_labels() {
        let classifier = MockClassifier::returning(vec!["Food & Dining"]);
        let labels = classifier.classify(&["STARBUCKS".to_string()]).await.unwrap();
        assert_eq!(labels, vec!["Food & Dining"]);
    }

    #[tokio::test]
    async fn mock_failure_surfaces_as_error() {
        let classifier = MockClassifier::failing();
        assert!(classifier.classify(&["X".to_string()]).await.is_err());
    }
}
