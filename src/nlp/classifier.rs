//! Linear token classifier and the on-disk vectoriser/classifier pair.

use std::path::Path;

use anyhow::{bail, ensure, Context, Result};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::info;

use super::vectorizer::{SparseRow, TfidfVectorizer, VECTORIZER_FORMAT};

pub const CLASSIFIER_FORMAT: u32 = 1;
pub const VECTORIZER_FILE: &str = "tfidf_vec.json";
pub const CLASSIFIER_FILE: &str = "clf.json";

/// Multinomial linear model: one weight column and intercept per label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearClassifier {
    pub format_version: u32,
    pub labels: Vec<String>,
    /// `n_features` rows of `labels.len()` weights.
    pub weights: Vec<Vec<f64>>,
    pub intercept: Vec<f64>,
    pub trained_at: DateTime<Utc>,
}

impl LinearClassifier {
    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    /// Label with the highest linear score for a sparse feature row.
    pub fn predict(&self, row: &SparseRow) -> &str {
        let mut scores = self.intercept.clone();
        for &(feature, value) in row {
            for (score, weight) in scores.iter_mut().zip(&self.weights[feature]) {
                *score += value * weight;
            }
        }
        let best = scores
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (idx, &score)| {
                if score > best.1 {
                    (idx, score)
                } else {
                    best
                }
            })
            .0;
        &self.labels[best]
    }

    fn check_shape(&self) -> Result<()> {
        let n_labels = self.labels.len();
        ensure!(n_labels > 0, "classifier has no labels");
        ensure!(
            self.intercept.len() == n_labels,
            "classifier has {} intercepts for {} labels",
            self.intercept.len(),
            n_labels
        );
        if let Some(row) = self.weights.iter().find(|row| row.len() != n_labels) {
            bail!(
                "classifier weight row has {} entries for {} labels",
                row.len(),
                n_labels
            );
        }
        Ok(())
    }
}

/// Vectoriser and classifier trained together and loaded as a unit.
#[derive(Debug)]
pub struct ModelArtifact {
    pub vectorizer: TfidfVectorizer,
    pub classifier: LinearClassifier,
}

impl ModelArtifact {
    /// Label a single token.
    pub fn predict(&self, token: &str) -> &str {
        self.classifier.predict(&self.vectorizer.transform_one(token))
    }

    /// Read both blobs from `dir` and check they belong together.
    pub fn load(dir: &Path) -> Result<Self> {
        let vectorizer: TfidfVectorizer = read_json(&dir.join(VECTORIZER_FILE))?;
        let classifier: LinearClassifier = read_json(&dir.join(CLASSIFIER_FILE))?;
        let artifact = Self {
            vectorizer,
            classifier,
        };
        artifact.validate()?;
        info!(
            dir = %dir.display(),
            features = artifact.vectorizer.n_features(),
            labels = artifact.classifier.labels.len(),
            trained_at = %artifact.classifier.trained_at,
            "loaded model artifact"
        );
        Ok(artifact)
    }

    /// Write both blobs into `dir`, creating it when missing.
    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
        write_json(&dir.join(VECTORIZER_FILE), &self.vectorizer)?;
        write_json(&dir.join(CLASSIFIER_FILE), &self.classifier)?;
        info!(dir = %dir.display(), "saved model artifact");
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.vectorizer.format_version == VECTORIZER_FORMAT,
            "unsupported vectoriser format {}",
            self.vectorizer.format_version
        );
        ensure!(
            self.classifier.format_version == CLASSIFIER_FORMAT,
            "unsupported classifier format {}",
            self.classifier.format_version
        );
        ensure!(
            self.classifier.n_features() == self.vectorizer.n_features(),
            "classifier expects {} features but vectoriser produces {}",
            self.classifier.n_features(),
            self.vectorizer.n_features()
        );
        self.classifier.check_shape()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    std::fs::write(path, raw).with_context(|| format!("write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Weight rows in the vectoriser's feature order.
    fn weights_for(vectorizer: &TfidfVectorizer, rows: &[(&str, Vec<f64>)]) -> Vec<Vec<f64>> {
        vectorizer
            .vocabulary()
            .iter()
            .map(|term| {
                let (_, row) = rows.iter().find(|(t, _)| *t == term.as_str()).unwrap();
                row.clone()
            })
            .collect()
    }

    fn tiny() -> ModelArtifact {
        let vectorizer = TfidfVectorizer::fit(&["paris", "the"], 10).unwrap();
        let weights = weights_for(
            &vectorizer,
            &[("paris", vec![2.0, -2.0]), ("the", vec![-2.0, 2.0])],
        );
        let classifier = LinearClassifier {
            format_version: CLASSIFIER_FORMAT,
            labels: vec!["B-geo".into(), "O".into()],
            weights,
            intercept: vec![-0.5, 0.5],
            trained_at: Utc::now(),
        };
        ModelArtifact {
            vectorizer,
            classifier,
        }
    }

    #[test]
    fn predicts_by_highest_score() {
        let model = tiny();
        assert_eq!(model.predict("Paris"), "B-geo");
        assert_eq!(model.predict("the"), "O");
        assert_eq!(model.predict("unseen"), "O");
    }

    #[test]
    fn save_then_load_restores_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let model = tiny();
        model.save(dir.path()).unwrap();
        let loaded = ModelArtifact::load(dir.path()).unwrap();
        assert_eq!(loaded.vectorizer.vocabulary(), model.vectorizer.vocabulary());
        assert_eq!(loaded.classifier.labels, model.classifier.labels);
        assert_eq!(loaded.classifier.weights, model.classifier.weights);
        assert_eq!(loaded.predict("paris"), "B-geo");
        assert_eq!(loaded.predict("the"), "O");
    }

    #[test]
    fn mismatched_feature_count_is_rejected() {
        let mut model = tiny();
        model.classifier.weights.pop();
        let err = model.validate().unwrap_err().to_string();
        assert!(err.contains("expects 1 features"));
    }

    #[test]
    fn unknown_format_version_is_rejected() {
        let mut model = tiny();
        model.vectorizer.format_version = VECTORIZER_FORMAT + 1;
        let err = model.validate().unwrap_err().to_string();
        assert!(err.contains("unsupported vectoriser format"));
    }

    #[test]
    fn missing_files_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ModelArtifact::load(dir.path()).is_err());
    }
}
