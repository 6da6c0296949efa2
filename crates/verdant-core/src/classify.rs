//! Classification collaborator — the source of per-document signals.
//!
//! The matching and scoring core consumes classifier *output* (a polarity
//! value, a pillar-relevance mapping, and a controversy level) and treats
//! the model behind it as a replaceable black box. The shipped
//! [`KeywordClassifier`] is the deliberately simple keyword-counting
//! baseline; swap it out by implementing [`Classifier`].

use serde::{Deserialize, Serialize};

use crate::document::{Pillar, TopicRelevance};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// The signals attached to one document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
  /// Sentiment polarity in `[-1, 1]`.
  pub sentiment_score:   f64,
  /// Per-pillar relevance, each in `[0, 1]`.
  pub esg_topics:        TopicRelevance,
  /// Controversy level in `[0, 10]`.
  pub controversy_score: f64,
}

/// Produces classification signals for a piece of text.
pub trait Classifier: Send + Sync {
  fn classify(&self, text: &str) -> Classification;
}

// ─── Keyword classifier ──────────────────────────────────────────────────────

const ENVIRONMENTAL_KEYWORDS: &[&str] =
  &["pollution", "carbon", "emission", "waste", "energy", "water"];

const SOCIAL_KEYWORDS: &[&str] =
  &["employee", "safety", "diversity", "community", "labor"];

const GOVERNANCE_KEYWORDS: &[&str] =
  &["board", "audit", "governance", "compliance", "transparency"];

const CONTROVERSY_KEYWORDS: &[&str] =
  &["fine", "penalty", "violation", "lawsuit", "scandal"];

const POSITIVE_KEYWORDS: &[&str] = &[
  "growth", "improved", "award", "sustainable", "strong", "record",
  "expansion", "commitment",
];

const NEGATIVE_KEYWORDS: &[&str] = &[
  "loss", "decline", "breach", "failure", "accident", "fraud", "protest",
  "layoff",
];

/// Keyword-counting classifier.
///
/// Pillar relevance is the fraction of that pillar's keywords present in
/// the text, capped at 1.0. Controversy counts hits at two points each,
/// capped at 10. Sentiment is the hit balance of the polarity word lists,
/// normalised to `[-1, 1]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
  fn keyword_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(*kw)).count()
  }

  fn pillar_relevance(text: &str, pillar: Pillar) -> f64 {
    let keywords = match pillar {
      Pillar::Environmental => ENVIRONMENTAL_KEYWORDS,
      Pillar::Social => SOCIAL_KEYWORDS,
      Pillar::Governance => GOVERNANCE_KEYWORDS,
    };
    let hits = Self::keyword_hits(text, keywords);
    (hits as f64 / keywords.len() as f64).min(1.0)
  }
}

impl Classifier for KeywordClassifier {
  fn classify(&self, text: &str) -> Classification {
    let text_lower = text.to_lowercase();

    let esg_topics = TopicRelevance::new(
      Self::pillar_relevance(&text_lower, Pillar::Environmental),
      Self::pillar_relevance(&text_lower, Pillar::Social),
      Self::pillar_relevance(&text_lower, Pillar::Governance),
    );

    let controversy_hits = Self::keyword_hits(&text_lower, CONTROVERSY_KEYWORDS);
    let controversy_score = ((controversy_hits * 2) as f64).min(10.0);

    let positive = Self::keyword_hits(&text_lower, POSITIVE_KEYWORDS) as f64;
    let negative = Self::keyword_hits(&text_lower, NEGATIVE_KEYWORDS) as f64;
    let total = positive + negative;
    let sentiment_score =
      if total == 0.0 { 0.0 } else { (positive - negative) / total };

    Classification { sentiment_score, esg_topics, controversy_score }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
