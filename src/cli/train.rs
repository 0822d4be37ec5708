//! CLI entry-point for offline model training.

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument};

use crate::{
    config::Settings,
    nlp::train::{self, Evaluation, TrainOptions},
};

/// Args for the `train` command. Defaults fit the tab-separated token corpus.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Labelled corpus (CSV/TSV).
    #[arg(long)]
    pub corpus: PathBuf,
    /// Field delimiter, a single ASCII character (`\t` for tab).
    #[arg(long, default_value = "\\t")]
    pub delimiter: String,
    /// Treat the first row as a header.
    #[arg(long)]
    pub has_headers: bool,
    /// Zero-based column holding the text (the word).
    #[arg(long, default_value_t = 1)]
    pub text_column: usize,
    /// Zero-based column holding the label.
    #[arg(long, default_value_t = 4)]
    pub label_column: usize,
    /// Only read the first N rows.
    #[arg(long, default_value_t = train::DEFAULT_MAX_ROWS)]
    pub max_rows: usize,
    /// Read the whole corpus, ignoring `--max-rows`.
    #[arg(long)]
    pub all_rows: bool,
    /// Fraction of rows held out for evaluation.
    #[arg(long, default_value_t = 0.2)]
    pub test_size: f64,
    /// Shuffle seed for the train/test split.
    #[arg(long, default_value_t = 0)]
    pub seed: u64,
    /// Vocabulary cap (most frequent terms).
    #[arg(long, default_value_t = 2000)]
    pub max_features: usize,
    /// L2 regularisation strength.
    #[arg(long, default_value_t = 1.0)]
    pub alpha: f64,
    /// Optimiser iteration cap.
    #[arg(long, default_value_t = 100)]
    pub max_iterations: u64,
    /// Output directory; defaults to the configured model dir.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

impl Args {
    fn options(&self) -> Result<TrainOptions> {
        Ok(TrainOptions {
            corpus: self.corpus.clone(),
            delimiter: parse_delimiter(&self.delimiter)?,
            has_headers: self.has_headers,
            text_column: self.text_column,
            label_column: self.label_column,
            max_rows: (!self.all_rows).then_some(self.max_rows),
            test_size: self.test_size,
            seed: self.seed,
            max_features: self.max_features,
            alpha: self.alpha,
            max_iterations: self.max_iterations,
        })
    }
}

fn parse_delimiter(raw: &str) -> Result<u8> {
    match raw {
        "\\t" | "tab" => Ok(b'\t'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        other => bail!("delimiter must be one ASCII character, got {other:?}"),
    }
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let options = args.options()?;
    let out_dir = args.out.unwrap_or(settings.model_dir);
    let evaluation = tokio::task::spawn_blocking(move || train::run(&options, &out_dir)).await??;
    if let Some(evaluation) = evaluation {
        info!(accuracy = evaluation.accuracy, "training finished");
        print!("{}", report(&evaluation));
    }
    Ok(())
}

/// Classification report followed by the confusion matrix.
fn report(evaluation: &Evaluation) -> String {
    let width = evaluation
        .labels
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(0)
        .max(8);
    let mut out = format!(
        "{:>width$} {:>9} {:>9} {:>9} {:>9}\n",
        "", "precision", "recall", "f1-score", "support"
    );
    for m in &evaluation.per_label {
        out += &format!(
            "{:>width$} {:>9.2} {:>9.2} {:>9.2} {:>9}\n",
            m.label, m.precision, m.recall, m.f1, m.support
        );
    }
    out += &format!("\naccuracy: {:.4}\n\nconfusion (rows actual, columns predicted)\n", evaluation.accuracy);
    out += &format!("{:>width$}", "");
    for label in &evaluation.labels {
        out += &format!(" {label:>width$}");
    }
    out.push('\n');
    for (label, row) in evaluation.labels.iter().zip(&evaluation.confusion) {
        out += &format!("{label:>width$}");
        for count in row {
            out += &format!(" {count:>width$}");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Commands};

    #[test]
    fn delimiter_accepts_escapes_and_single_chars() {
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert!(parse_delimiter(";;").is_err());
    }

    fn parse(args: &[&str]) -> Args {
        let cli = Cli::try_parse_from(["docsense", "train", "--corpus", "c.tsv"].iter().chain(args))
            .unwrap();
        match cli.command {
            Commands::Train(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn row_cap_applies_unless_all_rows_requested() {
        let capped = parse(&[]).options().unwrap();
        assert_eq!(capped.max_rows, Some(train::DEFAULT_MAX_ROWS));
        assert_eq!(parse(&["--max-rows", "50"]).options().unwrap().max_rows, Some(50));
        assert_eq!(parse(&["--all-rows"]).options().unwrap().max_rows, None);
    }

    #[test]
    fn report_lists_metrics_and_confusion() {
        let evaluation = Evaluation {
            accuracy: 0.75,
            per_label: vec![],
            labels: vec!["B-geo".into(), "O".into()],
            confusion: vec![vec![1, 1], vec![0, 2]],
        };
        let text = report(&evaluation);
        assert!(text.contains("accuracy: 0.7500"));
        let last = text.lines().last().unwrap();
        assert_eq!(last.split_whitespace().collect::<Vec<_>>(), ["O", "0", "2"]);
    }
}
