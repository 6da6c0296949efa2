//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and score dates as
//! `YYYY-MM-DD`, both of which order lexicographically. Topic relevance is
//! stored as compact JSON. UUIDs are stored as hyphenated lowercase
//! strings.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use verdant_core::{
  company::Company,
  document::{DocType, Document, TopicRelevance},
  score::EsgScore,
};

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> / NaiveDate ───────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── DocType ─────────────────────────────────────────────────────────────────

pub fn encode_doc_type(t: DocType) -> &'static str { t.as_str() }

pub fn decode_doc_type(s: &str) -> Result<DocType> {
  Ok(s.parse::<DocType>().map_err(Error::Core)?)
}

// ─── Topic relevance ─────────────────────────────────────────────────────────

pub fn encode_topics(t: &TopicRelevance) -> Result<String> {
  Ok(serde_json::to_string(t)?)
}

pub fn decode_topics(s: &str) -> Result<TopicRelevance> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `companies` row.
pub struct RawCompany {
  pub company_id: String,
  pub symbol:     String,
  pub name:       String,
  pub sector:     Option<String>,
  pub is_active:  bool,
  pub created_at: String,
}

impl RawCompany {
  pub fn into_company(self) -> Result<Company> {
    Ok(Company {
      company_id: decode_uuid(&self.company_id)?,
      symbol:     self.symbol,
      name:       self.name,
      sector:     self.sector,
      is_active:  self.is_active,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `documents` row.
pub struct RawDocument {
  pub document_id:       String,
  pub company_id:        Option<String>,
  pub doc_type:          String,
  pub title:             String,
  pub content:           String,
  pub published_date:    String,
  pub sentiment_score:   Option<f64>,
  pub esg_topics:        Option<String>,
  pub controversy_score: f64,
  pub confidence_score:  Option<f64>,
  pub created_at:        String,
}

impl RawDocument {
  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      document_id:       decode_uuid(&self.document_id)?,
      company_id:        self
        .company_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?,
      doc_type:          decode_doc_type(&self.doc_type)?,
      title:             self.title,
      content:           self.content,
      published_date:    decode_dt(&self.published_date)?,
      sentiment_score:   self.sentiment_score,
      esg_topics:        self
        .esg_topics
        .as_deref()
        .map(decode_topics)
        .transpose()?,
      controversy_score: self.controversy_score,
      confidence_score:  self.confidence_score,
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `esg_scores` row.
pub struct RawEsgScore {
  pub score_id:              String,
  pub company_id:            String,
  pub score_date:            String,
  pub environmental_score:   f64,
  pub social_score:          f64,
  pub governance_score:      f64,
  pub composite_score:       f64,
  pub sentiment_component:   f64,
  pub controversy_component: f64,
  pub disclosure_component:  f64,
  pub data_points_count:     i64,
  pub confidence_level:      f64,
  pub calculation_method:    String,
  pub created_at:            String,
}

impl RawEsgScore {
  pub fn into_score(self) -> Result<EsgScore> {
    Ok(EsgScore {
      score_id:              decode_uuid(&self.score_id)?,
      company_id:            decode_uuid(&self.company_id)?,
      score_date:            decode_date(&self.score_date)?,
      environmental_score:   self.environmental_score,
      social_score:          self.social_score,
      governance_score:      self.governance_score,
      composite_score:       self.composite_score,
      sentiment_component:   self.sentiment_component,
      controversy_component: self.controversy_component,
      disclosure_component:  self.disclosure_component,
      data_points_count:     self.data_points_count,
      confidence_level:      self.confidence_level,
      calculation_method:    self.calculation_method,
      created_at:            decode_dt(&self.created_at)?,
    })
  }
}
