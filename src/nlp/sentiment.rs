//! Sentence polarity scoring with the VADER lexicon and rules.
//!
//! Text is split with [`tokens::split_sentences`] and every sentence is scored
//! on its own. `neg`, `neu` and `pos` are proportions of the sentence's
//! sentiment mass; `compound` is the normalised sum in `[-1, 1]`.

use serde::Serialize;
use vader_sentiment::SentimentIntensityAnalyzer;

use super::tokens;

/// Polarity components of one sentence. `neg + neu + pos == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PolarityScores {
    pub neg: f64,
    pub neu: f64,
    pub pos: f64,
    pub compound: f64,
}

/// Scores for one sentence of a document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceSentiment {
    #[serde(flatten)]
    pub scores: PolarityScores,
    pub sentence: String,
}

/// Split `text` into sentences and score each one independently.
pub fn analyze(text: &str) -> Vec<SentenceSentiment> {
    let analyzer = SentimentIntensityAnalyzer::new();
    tokens::split_sentences(text)
        .into_iter()
        .map(|sentence| {
            let scores = score_with(&analyzer, &sentence);
            SentenceSentiment { sentence, scores }
        })
        .collect()
}

/// Score a single sentence.
pub fn polarity_scores(sentence: &str) -> PolarityScores {
    score_with(&SentimentIntensityAnalyzer::new(), sentence)
}

fn score_with(analyzer: &SentimentIntensityAnalyzer, sentence: &str) -> PolarityScores {
    let raw = analyzer.polarity_scores(sentence);
    let get = |key: &str| raw.get(key).copied().unwrap_or(0.0);
    let (neg, neu, pos) = (get("neg"), get("neu"), get("pos"));
    // The analyzer reports all zeros when nothing in the sentence is scorable.
    let mass = neg + neu + pos;
    if mass <= 0.0 {
        return PolarityScores::neutral();
    }
    PolarityScores {
        neg: neg / mass,
        neu: neu / mass,
        pos: pos / mass,
        compound: get("compound").clamp(-1.0, 1.0),
    }
}

impl PolarityScores {
    fn neutral() -> Self {
        Self {
            neg: 0.0,
            neu: 1.0,
            pos: 0.0,
            compound: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sums_to_one(scores: &PolarityScores) -> bool {
        (scores.neg + scores.neu + scores.pos - 1.0).abs() < 1e-9
    }

    #[test]
    fn love_and_hate_lean_opposite_ways() {
        let results = analyze("I love this. I hate that.");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].sentence, "I love this.");
        assert!(results[0].scores.compound > 0.0);
        assert!(results[1].scores.compound < 0.0);
        assert!(results.iter().all(|r| sums_to_one(&r.scores)));
    }

    #[test]
    fn inflected_and_less_common_words_carry_polarity() {
        let results = analyze("I was furious. We were delighted. She cried all night.");
        let compounds: Vec<f64> = results.iter().map(|r| r.scores.compound).collect();
        assert_eq!(compounds.len(), 3);
        assert!(compounds[0] < 0.0, "{compounds:?}");
        assert!(compounds[1] > 0.0, "{compounds:?}");
        assert!(compounds[2] < 0.0, "{compounds:?}");
        assert!(results.iter().all(|r| r.scores.neu < 1.0));
    }

    #[test]
    fn negation_flips_polarity() {
        assert!(polarity_scores("This is good").compound > 0.0);
        assert!(polarity_scores("This is not good").compound < 0.0);
    }

    #[test]
    fn boosters_and_exclamations_intensify() {
        let plain = polarity_scores("The food is good").compound;
        let boosted = polarity_scores("The food is very good").compound;
        let shouted = polarity_scores("The food is very good!!!").compound;
        assert!(boosted > plain);
        assert!(shouted > boosted);
    }

    #[test]
    fn but_shifts_weight_to_second_clause() {
        let scores = polarity_scores("The plot was good but the acting was terrible");
        assert!(scores.compound < 0.0);
    }

    #[test]
    fn sentence_without_sentiment_words_is_neutral() {
        let scores = polarity_scores("The table has four legs");
        assert_eq!(scores.compound, 0.0);
        assert!((scores.neu - 1.0).abs() < 1e-9);
        assert_eq!(polarity_scores("?!"), PolarityScores::neutral());
    }
}
