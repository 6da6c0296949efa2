//! ESG score rows — the append-only output of the aggregator.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted scoring run for one company.
///
/// The series keyed by `(company_id, score_date)` is append-only: a new run
/// appends a new row, it never overwrites history. Rows are created
/// exclusively by the aggregator and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EsgScore {
  pub score_id:            Uuid,
  pub company_id:          Uuid,
  pub score_date:          NaiveDate,
  pub environmental_score: f64,
  pub social_score:        f64,
  pub governance_score:    f64,
  /// Sector-weighted combination of the three pillar scores.
  pub composite_score:     f64,
  /// Mean sentiment over qualifying documents, mapped to `[0, 10]`.
  pub sentiment_component:  f64,
  /// Mean controversy level over qualifying documents, `[0, 10]`.
  pub controversy_component: f64,
  /// Share of window documents that are filings or regulatory notices,
  /// scaled to `[0, 10]`.
  pub disclosure_component: f64,
  /// Number of documents that contributed pillar evidence.
  pub data_points_count:   i64,
  /// Evidence-volume confidence in `[0, 1]`; not a statistical probability.
  pub confidence_level:    f64,
  pub calculation_method:  String,
  pub created_at:          DateTime<Utc>,
}

/// Input to [`EsgStore::insert_score`](crate::store::EsgStore::insert_score).
/// `score_id` and `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewEsgScore {
  pub company_id:            Uuid,
  pub score_date:            NaiveDate,
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
}

/// The externally presented scores for one company, rounded to two
/// decimals. Each value lies in `[0, 10]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PillarScores {
  #[serde(rename = "E")]
  pub environmental: f64,
  #[serde(rename = "S")]
  pub social:        f64,
  #[serde(rename = "G")]
  pub governance:    f64,
  pub composite:     f64,
}
