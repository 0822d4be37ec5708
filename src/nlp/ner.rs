//! Named-entity tagging backed by the trained token classifier.

use std::sync::{Arc, Mutex};

use tracing::warn;

use super::{classifier::ModelArtifact, tokens};
use crate::{config::Settings, error::ServiceError};

/// Extracted entity span with byte offsets relative to the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub text: String,
}

/// Trait for NER implementations.
pub trait Ner: Send + Sync {
    fn extract(&self, text: &str) -> Result<Vec<Span>, ServiceError>;
}

/// Labels every word token with the classifier and keeps the ones that are
/// not tagged with the outside label.
pub struct ClassifierNer {
    /// Prediction goes through a lock so the fitted vectoriser need not be `Sync`.
    model: Mutex<ModelArtifact>,
    outside_label: String,
}

impl ClassifierNer {
    pub fn new(model: ModelArtifact, outside_label: impl Into<String>) -> Self {
        Self {
            model: Mutex::new(model),
            outside_label: outside_label.into(),
        }
    }
}

impl Ner for ClassifierNer {
    fn extract(&self, text: &str) -> Result<Vec<Span>, ServiceError> {
        let model = self
            .model
            .lock()
            .map_err(|_| ServiceError::ModelUnavailable("model lock poisoned".to_string()))?;
        let spans = tokens::words(text)
            .filter_map(|word| {
                let label = model.predict(word.text);
                (label != self.outside_label).then(|| Span {
                    start: word.start,
                    end: word.end,
                    label: label.to_string(),
                    text: word.text.to_string(),
                })
            })
            .collect();
        Ok(spans)
    }
}

/// Stand-in used when the artifact could not be loaded at start-up; every
/// request fails with [`ServiceError::ModelUnavailable`].
pub struct UnavailableNer {
    reason: String,
}

impl UnavailableNer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Ner for UnavailableNer {
    fn extract(&self, _text: &str) -> Result<Vec<Span>, ServiceError> {
        Err(ServiceError::ModelUnavailable(self.reason.clone()))
    }
}

/// Load the classifier-backed NER once. A missing or broken artifact does not
/// stop the service; it only disables the named-entity endpoint.
pub fn load_model(settings: &Settings) -> Arc<dyn Ner> {
    match ModelArtifact::load(&settings.model_dir) {
        Ok(model) => Arc::new(ClassifierNer::new(model, settings.outside_label.clone())),
        Err(err) => {
            warn!(dir = %settings.model_dir.display(), error = %format!("{err:#}"), "named-entity model unavailable");
            Arc::new(UnavailableNer::new(format!("{err:#}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::nlp::{
        classifier::{LinearClassifier, CLASSIFIER_FORMAT},
        vectorizer::TfidfVectorizer,
    };

    fn model() -> ModelArtifact {
        let vectorizer = TfidfVectorizer::fit(&["ada", "london", "in"], 10).unwrap();
        // labels: B-geo, B-per, O
        let weights = vectorizer
            .vocabulary()
            .iter()
            .map(|term| match term.as_str() {
                "ada" => vec![0.0, 3.0, 0.0],
                "london" => vec![3.0, 0.0, 0.0],
                _ => vec![0.0, 0.0, 3.0],
            })
            .collect();
        ModelArtifact {
            vectorizer,
            classifier: LinearClassifier {
                format_version: CLASSIFIER_FORMAT,
                labels: vec!["B-geo".into(), "B-per".into(), "O".into()],
                weights,
                intercept: vec![0.0, 0.0, 1.0],
                trained_at: Utc::now(),
            },
        }
    }

    #[test]
    fn outside_tokens_are_dropped_and_order_kept() {
        let ner = ClassifierNer::new(model(), "O");
        let spans = ner.extract("Ada lived in London.").unwrap();
        let pairs: Vec<_> = spans
            .iter()
            .map(|s| (s.text.as_str(), s.label.as_str()))
            .collect();
        assert_eq!(pairs, [("Ada", "B-per"), ("London", "B-geo")]);
        assert_eq!(spans[1].start, 13);
    }

    #[test]
    fn unavailable_model_reports_reason() {
        let ner = UnavailableNer::new("clf.json missing");
        match ner.extract("anything") {
            Err(ServiceError::ModelUnavailable(reason)) => assert_eq!(reason, "clf.json missing"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn load_model_without_artifact_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::rooted_at(dir.path());
        let ner = load_model(&settings);
        assert!(matches!(
            ner.extract("x"),
            Err(ServiceError::ModelUnavailable(_))
        ));
    }
}
