//! Offline fitting of the TF-IDF vectoriser and logistic-regression classifier.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use csv::ReaderBuilder;
use linfa::{dataset::DatasetBase, prelude::Fit};
use linfa_logistic::MultiLogisticRegression;
use ndarray::Array1;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use tracing::{info, warn};

use super::{
    classifier::{LinearClassifier, ModelArtifact, CLASSIFIER_FORMAT},
    vectorizer::TfidfVectorizer,
};

/// Rows read from the corpus unless a different cap is given. The dense
/// training matrix is `rows x max_features` floats.
pub const DEFAULT_MAX_ROWS: usize = 180_000;

/// Corpus layout and fitting hyper-parameters.
#[derive(Debug, Clone)]
pub struct TrainOptions {
    pub corpus: PathBuf,
    pub delimiter: u8,
    pub has_headers: bool,
    pub text_column: usize,
    pub label_column: usize,
    pub max_rows: Option<usize>,
    pub test_size: f64,
    pub seed: u64,
    pub max_features: usize,
    pub alpha: f64,
    pub max_iterations: u64,
}

impl Default for TrainOptions {
    /// Defaults match the tab-separated token corpus
    /// (`SENTENCE_NR, WORD, POS, POS_TAG, NER_TAG`).
    fn default() -> Self {
        Self {
            corpus: PathBuf::from("data/multi-label_train.csv"),
            delimiter: b'\t',
            has_headers: false,
            text_column: 1,
            label_column: 4,
            max_rows: Some(DEFAULT_MAX_ROWS),
            test_size: 0.2,
            seed: 0,
            max_features: 2000,
            alpha: 1.0,
            max_iterations: 100,
        }
    }
}

/// One labelled text (a single token for NER corpora).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledExample {
    pub text: String,
    pub label: String,
}

/// Per-label precision, recall and F1 on the held-out split.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMetrics {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Held-out evaluation summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub accuracy: f64,
    pub per_label: Vec<LabelMetrics>,
    /// Row and column order of `confusion`, sorted.
    pub labels: Vec<String>,
    /// `confusion[actual][predicted]` counts over the test split.
    pub confusion: Vec<Vec<usize>>,
}

/// Read labelled rows, skipping rows with a missing or blank text/label.
pub fn read_corpus(options: &TrainOptions) -> Result<Vec<LabeledExample>> {
    let mut reader = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .flexible(true)
        .quoting(options.delimiter != b'\t')
        .from_path(&options.corpus)
        .with_context(|| format!("open corpus {}", options.corpus.display()))?;

    let mut examples = Vec::new();
    let mut dropped = 0usize;
    for record in reader.records() {
        if options.max_rows.is_some_and(|max| examples.len() + dropped >= max) {
            break;
        }
        let record = record.context("read corpus row")?;
        let text = record.get(options.text_column).map(str::trim);
        let label = record.get(options.label_column).map(str::trim);
        match (text, label) {
            (Some(text), Some(label)) if !text.is_empty() && !label.is_empty() => {
                examples.push(LabeledExample {
                    text: text.to_string(),
                    label: label.to_string(),
                });
            }
            _ => dropped += 1,
        }
    }
    if dropped > 0 {
        warn!(dropped, "skipped incomplete corpus rows");
    }
    info!(rows = examples.len(), path = %options.corpus.display(), "read corpus");
    Ok(examples)
}

/// Seeded shuffle followed by a train/test cut. The training half is never empty.
pub fn split(
    mut examples: Vec<LabeledExample>,
    test_size: f64,
    seed: u64,
) -> (Vec<LabeledExample>, Vec<LabeledExample>) {
    let mut rng = StdRng::seed_from_u64(seed);
    examples.shuffle(&mut rng);
    let n_test = ((examples.len() as f64) * test_size.clamp(0.0, 1.0)).round() as usize;
    let n_test = n_test.min(examples.len().saturating_sub(1));
    let test = examples.split_off(examples.len() - n_test);
    (examples, test)
}

/// Fit the vectoriser and a multinomial logistic regression on `train`.
pub fn fit(train: &[LabeledExample], options: &TrainOptions) -> Result<ModelArtifact> {
    let names: Vec<String> = train
        .iter()
        .map(|e| e.label.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if names.len() < 2 {
        bail!(
            "training data needs at least two labels, found {}",
            names.len()
        );
    }
    let index: BTreeMap<&str, usize> = names
        .iter()
        .enumerate()
        .map(|(i, name)| (name.as_str(), i))
        .collect();

    let texts: Vec<&str> = train.iter().map(|e| e.text.as_str()).collect();
    let vectorizer = TfidfVectorizer::fit(&texts, options.max_features)?;
    let x = vectorizer.transform(&texts);
    let y: Array1<usize> = train.iter().map(|e| index[e.label.as_str()]).collect();
    let dataset = DatasetBase::new(x, y);

    info!(
        rows = train.len(),
        features = vectorizer.n_features(),
        labels = names.len(),
        "fitting logistic regression"
    );
    let fitted = MultiLogisticRegression::default()
        .alpha(options.alpha)
        .max_iterations(options.max_iterations)
        .fit(&dataset)?;

    let labels = fitted
        .classes()
        .iter()
        .map(|&class| names[class].clone())
        .collect();
    let weights = fitted.params().rows().into_iter().map(|row| row.to_vec()).collect();
    let classifier = LinearClassifier {
        format_version: CLASSIFIER_FORMAT,
        labels,
        weights,
        intercept: fitted.intercept().to_vec(),
        trained_at: Utc::now(),
    };
    let artifact = ModelArtifact {
        vectorizer,
        classifier,
    };
    artifact.validate()?;
    Ok(artifact)
}

/// Accuracy, per-label precision/recall/F1 and confusion counts of `model` on `test`.
pub fn evaluate(model: &ModelArtifact, test: &[LabeledExample]) -> Evaluation {
    let pairs: Vec<(&str, &str)> = test
        .iter()
        .map(|example| (example.label.as_str(), model.predict(&example.text)))
        .collect();
    let labels: Vec<String> = pairs
        .iter()
        .flat_map(|&(actual, predicted)| [actual, predicted])
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect();
    let index: BTreeMap<&str, usize> = labels
        .iter()
        .enumerate()
        .map(|(i, label)| (label.as_str(), i))
        .collect();

    let mut confusion = vec![vec![0usize; labels.len()]; labels.len()];
    for &(actual, predicted) in &pairs {
        confusion[index[actual]][index[predicted]] += 1;
    }

    let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
    let per_label = labels
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let tp = confusion[i][i];
            let actual: usize = confusion[i].iter().sum();
            let predicted: usize = confusion.iter().map(|row| row[i]).sum();
            let precision = ratio(tp, predicted);
            let recall = ratio(tp, actual);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            LabelMetrics {
                label: label.clone(),
                precision,
                recall,
                f1,
                support: actual,
            }
        })
        .collect();
    let correct = (0..labels.len()).map(|i| confusion[i][i]).sum();
    Evaluation {
        accuracy: ratio(correct, test.len()),
        per_label,
        labels,
        confusion,
    }
}

/// Read, split, fit, evaluate and persist. Returns the held-out evaluation,
/// or `None` when the test split is empty.
pub fn run(options: &TrainOptions, out_dir: &Path) -> Result<Option<Evaluation>> {
    let examples = read_corpus(options)?;
    if examples.is_empty() {
        bail!("corpus {} has no usable rows", options.corpus.display());
    }
    let (train, test) = split(examples, options.test_size, options.seed);
    let model = fit(&train, options)?;
    model.save(out_dir)?;

    if test.is_empty() {
        warn!("empty test split; skipping evaluation");
        return Ok(None);
    }
    let evaluation = evaluate(&model, &test);
    for metrics in &evaluation.per_label {
        info!(
            label = %metrics.label,
            precision = metrics.precision,
            recall = metrics.recall,
            f1 = metrics.f1,
            support = metrics.support,
            "label report"
        );
    }
    for (label, row) in evaluation.labels.iter().zip(&evaluation.confusion) {
        info!(actual = %label, predicted = ?row, "confusion row");
    }
    info!(accuracy = evaluation.accuracy, test_rows = test.len(), "evaluation");
    Ok(Some(evaluation))
}
