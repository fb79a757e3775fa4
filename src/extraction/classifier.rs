//! Weighted keyword classifiers for style and house type.

use crate::domain::{HouseType, Style};

use super::keywords::{count_matches, ClassifierWeights, KeywordTable, Signals};

/// Confidence reported when no signal fired and the default was returned.
pub const DEFAULT_CONFIDENCE: f64 = 0.5;

/// Similarity between the input text and a category's keyword phrases.
///
/// The classifiers stay pure: any I/O needed to compute similarities happens
/// before classification and is captured by the implementor.
pub trait SemanticScorer {
    /// Summed similarity of the input to `phrases`, `0.0` when unknown.
    fn similarity(&self, phrases: &[String]) -> f64;
}

/// Scorer used when no embedding service is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSemantics;

impl SemanticScorer for NoSemantics {
    fn similarity(&self, _phrases: &[String]) -> f64 {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification<T> {
    pub value: T,
    pub confidence: f64,
}

pub fn classify_style(
    text: &str,
    table: &KeywordTable,
    semantics: &dyn SemanticScorer,
) -> Classification<Style> {
    classify(
        text,
        Style::ALL,
        Style::Modern,
        |style| &table.style(style).signals,
        &table.weights.style,
        semantics,
    )
}

pub fn classify_house_type(
    text: &str,
    table: &KeywordTable,
    semantics: &dyn SemanticScorer,
) -> Classification<HouseType> {
    classify(
        text,
        HouseType::ALL,
        HouseType::Bungalow,
        |house_type| &table.house_type(house_type).signals,
        &table.weights.house_type,
        semantics,
    )
}

/// Argmax over weighted signal scores.
///
/// Candidates are visited in canonical order and only a strictly greater
/// score replaces the leader, so ties go to the earliest candidate.
fn classify<'t, T: Copy>(
    text: &str,
    candidates: &[T],
    default: T,
    signals_for: impl Fn(T) -> &'t Signals,
    weights: &ClassifierWeights,
    semantics: &dyn SemanticScorer,
) -> Classification<T> {
    let mut best: Option<(T, f64)> = None;

    for &candidate in candidates {
        let score = score(text, signals_for(candidate), weights, semantics);
        if best.map_or(true, |(_, leader)| score > leader) {
            best = Some((candidate, score));
        }
    }

    match best {
        Some((value, score)) if score > 0.0 => {
            let keyword_count = signals_for(value).keywords.len() as f64;
            let denominator = keyword_count * weights.keyword;
            let confidence = if denominator > 0.0 {
                (score / denominator).min(1.0)
            } else {
                1.0
            };
            Classification { value, confidence }
        }
        _ => Classification {
            value: default,
            confidence: DEFAULT_CONFIDENCE,
        },
    }
}

fn score(
    text: &str,
    signals: &Signals,
    weights: &ClassifierWeights,
    semantics: &dyn SemanticScorer,
) -> f64 {
    let lexical = count_matches(text, &signals.keywords) as f64 * weights.keyword
        + count_matches(text, &signals.features) as f64 * weights.feature
        + count_matches(text, &signals.materials) as f64 * weights.material
        + count_matches(text, &signals.colors) as f64 * weights.color
        + count_matches(text, &signals.rooms) as f64 * weights.room;

    let semantic = semantics.similarity(&signals.keywords);
    let semantic = if semantic.is_finite() && semantic > 0.0 {
        semantic * weights.semantic
    } else {
        0.0
    };

    lexical + semantic
}
