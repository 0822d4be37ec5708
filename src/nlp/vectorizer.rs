//! TF-IDF features for the token classifier.
//!
//! Fitting and term weighting come from `linfa-preprocessing` (smoothed idf,
//! lower-cased terms of two or more word characters). Rows are l2-normalised
//! here before they reach the classifier.

use anyhow::{bail, Result};
use linfa_preprocessing::tf_idf_vectorization::{FittedTfIdfVectorizer, TfIdfVectorizer};
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

pub const VECTORIZER_FORMAT: u32 = 1;

/// Fitted vocabulary and idf weights, tagged with the artifact format.
#[derive(Debug, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    pub format_version: u32,
    fitted: FittedTfIdfVectorizer,
}

/// Sparse row: `(feature index, weight)` pairs sorted by index.
pub type SparseRow = Vec<(usize, f64)>;

impl TfidfVectorizer {
    /// Learn the vocabulary from `docs`, keeping at most `max_features` of the
    /// most frequent terms.
    pub fn fit<S: AsRef<str>>(docs: &[S], max_features: usize) -> Result<Self> {
        let fitted = TfIdfVectorizer::default()
            .convert_to_lowercase(true)
            .max_features(Some(max_features.max(1)))
            .fit(&corpus(docs))?;
        if fitted.nentries() == 0 {
            bail!("corpus produced an empty vocabulary");
        }
        Ok(Self {
            format_version: VECTORIZER_FORMAT,
            fitted,
        })
    }

    pub fn n_features(&self) -> usize {
        self.fitted.nentries()
    }

    /// Terms in feature-index order.
    pub fn vocabulary(&self) -> &[String] {
        self.fitted.vocabulary()
    }

    /// Vectorise one document. Out-of-vocabulary terms are ignored, so an
    /// unknown word yields an empty row.
    pub fn transform_one(&self, doc: &str) -> SparseRow {
        let matrix = self
            .fitted
            .transform(&Array1::from_elem(1, doc.to_string()))
            .expect("default tokenizer is always set");
        let mut row: SparseRow = matrix
            .outer_view(0)
            .map(|view| view.iter().map(|(index, &value)| (index, value)).collect())
            .unwrap_or_default();
        row.sort_by_key(|&(index, _)| index);
        let norm = row.iter().map(|(_, v)| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            row.iter_mut().for_each(|(_, v)| *v /= norm);
        }
        row
    }

    /// Dense, row-normalised document-term matrix for fitting.
    pub fn transform<S: AsRef<str>>(&self, docs: &[S]) -> Array2<f64> {
        let mut matrix = self
            .fitted
            .transform(&corpus(docs))
            .expect("default tokenizer is always set")
            .to_dense();
        for mut row in matrix.axis_iter_mut(Axis(0)) {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row /= norm;
            }
        }
        matrix
    }
}

fn corpus<S: AsRef<str>>(docs: &[S]) -> Array1<String> {
    docs.iter().map(|doc| doc.as_ref().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight(vec: &TfidfVectorizer, row: &SparseRow, term: &str) -> f64 {
        let index = vec.vocabulary().iter().position(|t| t == term).unwrap();
        row.iter().find(|(i, _)| *i == index).map(|(_, v)| *v).unwrap()
    }

    #[test]
    fn rarer_terms_weigh_more() {
        let vec = TfidfVectorizer::fit(&["the cat", "the dog", "the bird"], 100).unwrap();
        let row = vec.transform_one("the cat");
        assert!(weight(&vec, &row, "cat") > weight(&vec, &row, "the"));
    }

    #[test]
    fn rows_are_unit_length() {
        let vec = TfidfVectorizer::fit(&["Paris is big", "Berlin is big too"], 100).unwrap();
        let row = vec.transform_one("PARIS is big");
        let norm: f64 = row.iter().map(|(_, v)| v * v).sum();
        assert!((norm - 1.0).abs() < 1e-9);
        assert!(vec.transform_one("Tokyo").is_empty());

        let dense = vec.transform(&["Paris is big", "Tokyo"]);
        assert_eq!(dense.shape(), &[2, vec.n_features()]);
        assert!((dense.row(0).dot(&dense.row(0)) - 1.0).abs() < 1e-9);
        assert_eq!(dense.row(1).sum(), 0.0);
    }

    #[test]
    fn max_features_caps_the_vocabulary() {
        let vec = TfidfVectorizer::fit(&["alpha beta", "alpha gamma", "alpha beta"], 2).unwrap();
        assert_eq!(vec.n_features(), 2);
        assert!(vec.vocabulary().iter().any(|t| t == "alpha"));
        assert_eq!(vec.transform(&["alpha", "gamma"]).shape(), &[2, 2]);
    }

    #[test]
    fn empty_corpus_is_rejected() {
        assert!(TfidfVectorizer::fit(&["...", "!!"], 10).is_err());
    }
}
