//! Document types — the unit of evidence the pipeline attributes and scores.
//!
//! Documents arrive from ingestion already classified (sentiment, pillar
//! relevance, controversy) with `company_id` unset. Attribution sets
//! `company_id` and `confidence_score` exactly once; nothing in the core
//! ever deletes a document.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Pillars ─────────────────────────────────────────────────────────────────

/// One of the three ESG scoring dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pillar {
  Environmental,
  Social,
  Governance,
}

impl Pillar {
  pub const ALL: [Pillar; 3] =
    [Pillar::Environmental, Pillar::Social, Pillar::Governance];

  /// Single-letter key used in classifier output and configuration.
  pub fn key(self) -> &'static str {
    match self {
      Pillar::Environmental => "E",
      Pillar::Social => "S",
      Pillar::Governance => "G",
    }
  }
}

/// Per-pillar relevance of a document, each value in `[0, 1]`.
///
/// Serialises as `{"E": .., "S": .., "G": ..}` — the shape the
/// classification collaborator emits.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TopicRelevance {
  #[serde(rename = "E")]
  pub environmental: f64,
  #[serde(rename = "S")]
  pub social:        f64,
  #[serde(rename = "G")]
  pub governance:    f64,
}

impl TopicRelevance {
  pub fn new(environmental: f64, social: f64, governance: f64) -> Self {
    Self { environmental, social, governance }
  }

  pub fn get(&self, pillar: Pillar) -> f64 {
    match pillar {
      Pillar::Environmental => self.environmental,
      Pillar::Social => self.social,
      Pillar::Governance => self.governance,
    }
  }
}

// ─── Document type ───────────────────────────────────────────────────────────

/// The category a document was ingested as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocType {
  News,
  Filing,
  Regulatory,
}

impl DocType {
  /// The discriminant string stored in the `doc_type` column.
  pub fn as_str(self) -> &'static str {
    match self {
      DocType::News => "news",
      DocType::Filing => "filing",
      DocType::Regulatory => "regulatory",
    }
  }
}

impl std::str::FromStr for DocType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "news" => Ok(DocType::News),
      "filing" => Ok(DocType::Filing),
      "regulatory" => Ok(DocType::Regulatory),
      other => Err(Error::UnknownDocType(other.to_owned())),
    }
  }
}

impl std::fmt::Display for DocType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Document ────────────────────────────────────────────────────────────────

/// A single ingested text document with its classification signals.
///
/// `confidence_score` is only meaningful when `company_id` is set — both
/// are written together by attribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub document_id:      Uuid,
  /// Owner company; `None` until attribution assigns one.
  pub company_id:       Option<Uuid>,
  pub doc_type:         DocType,
  pub title:            String,
  pub content:          String,
  pub published_date:   DateTime<Utc>,
  /// Sentiment polarity in `[-1, 1]`, supplied by the classifier.
  pub sentiment_score:  Option<f64>,
  /// Per-pillar relevance, supplied by the classifier.
  pub esg_topics:       Option<TopicRelevance>,
  /// Controversy level in `[0, 10]`.
  pub controversy_score: f64,
  /// Match confidence recorded by attribution, in `[0, 1]`.
  pub confidence_score: Option<f64>,
  pub created_at:       DateTime<Utc>,
}

/// Input to [`EsgStore::add_document`](crate::store::EsgStore::add_document).
/// Documents always enter the store unattributed.
#[derive(Debug, Clone)]
pub struct NewDocument {
  pub doc_type:          DocType,
  pub title:             String,
  pub content:           String,
  pub published_date:    DateTime<Utc>,
  pub sentiment_score:   Option<f64>,
  pub esg_topics:        Option<TopicRelevance>,
  pub controversy_score: f64,
}

impl NewDocument {
  /// A document with no classification signals attached yet.
  pub fn new(
    doc_type: DocType,
    title: impl Into<String>,
    content: impl Into<String>,
    published_date: DateTime<Utc>,
  ) -> Self {
    Self {
      doc_type,
      title: title.into(),
      content: content.into(),
      published_date,
      sentiment_score: None,
      esg_topics: None,
      controversy_score: 0.0,
    }
  }

  /// Attach classifier output to the document.
  pub fn classified(mut self, c: crate::classify::Classification) -> Self {
    self.sentiment_score = Some(c.sentiment_score);
    self.esg_topics = Some(c.esg_topics);
    self.controversy_score = c.controversy_score;
    self
  }
}

// ─── Attribution ─────────────────────────────────────────────────────────────

/// One accepted document→company assignment, applied by the store as part
/// of a batch-scoped transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attribution {
  pub document_id:      Uuid,
  pub company_id:       Uuid,
  pub confidence_score: f64,
}
