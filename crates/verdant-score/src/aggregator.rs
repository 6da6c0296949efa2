//! Sector-weighted ESG score aggregation.

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use verdant_core::{
  config::ScoringConfig,
  document::{Document, Pillar},
  score::{EsgScore, NewEsgScore, PillarScores},
  store::EsgStore,
};

use crate::{Error, Result};

/// A document's pillar relevance must strictly exceed this for the
/// document to contribute to that pillar.
pub const RELEVANCE_FLOOR: f64 = 0.3;

/// Score assigned to a pillar with no evidence. Absence of evidence is
/// not evidence of a bad score.
pub const NEUTRAL_SCORE: f64 = 5.0;

/// Tag persisted with each score row.
pub const CALCULATION_METHOD: &str = "sector_weighted_sentiment_v1";

/// Count of qualifying documents at which evidence-volume confidence
/// saturates at 1.0.
const FULL_CONFIDENCE_DATA_POINTS: f64 = 20.0;

// ─── Internal breakdown ──────────────────────────────────────────────────────

/// One computed scoring run, before rounding/persistence.
struct Breakdown {
  environmental: f64,
  social:        f64,
  governance:    f64,
  composite:     f64,
  sentiment:     f64,
  controversy:   f64,
  disclosure:    f64,
  data_points:   i64,
  confidence:    f64,
}

impl Breakdown {
  fn neutral() -> Self {
    Self {
      environmental: NEUTRAL_SCORE,
      social:        NEUTRAL_SCORE,
      governance:    NEUTRAL_SCORE,
      composite:     NEUTRAL_SCORE,
      sentiment:     NEUTRAL_SCORE,
      controversy:   0.0,
      disclosure:    0.0,
      data_points:   0,
      confidence:    0.0,
    }
  }
}

fn round2(x: f64) -> f64 {
  (x * 100.0).round() / 100.0
}

fn mean_or(values: &[f64], fallback: f64) -> f64 {
  if values.is_empty() {
    fallback
  } else {
    values.iter().sum::<f64>() / values.len() as f64
  }
}

// ─── Aggregator ──────────────────────────────────────────────────────────────

/// One-shot scoring runs over one company's attributed document history.
///
/// Each invocation is a synchronous batch over a bounded unit of work;
/// repeated runs only append to the score series.
pub struct ScoreAggregator<'a, S> {
  store:  &'a S,
  config: &'a ScoringConfig,
}

impl<'a, S: EsgStore> ScoreAggregator<'a, S> {
  pub fn new(store: &'a S, config: &'a ScoringConfig) -> Self {
    Self { store, config }
  }

  /// Pillar and composite scores for `company_id` as of `as_of`, rounded
  /// to two decimals for presentation. Does not persist anything.
  pub async fn score(
    &self,
    company_id: Uuid,
    as_of: DateTime<Utc>,
  ) -> Result<PillarScores> {
    let b = self.compute(company_id, as_of).await?;
    Ok(PillarScores {
      environmental: round2(b.environmental),
      social:        round2(b.social),
      governance:    round2(b.governance),
      composite:     round2(b.composite),
    })
  }

  /// Compute and append one score row for `company_id`.
  pub async fn run_for_company(
    &self,
    company_id: Uuid,
    as_of: DateTime<Utc>,
  ) -> Result<EsgScore> {
    let b = self.compute(company_id, as_of).await?;

    let row = self
      .store
      .insert_score(NewEsgScore {
        company_id,
        score_date:            as_of.date_naive(),
        environmental_score:   round2(b.environmental),
        social_score:          round2(b.social),
        governance_score:      round2(b.governance),
        composite_score:       round2(b.composite),
        sentiment_component:   round2(b.sentiment),
        controversy_component: round2(b.controversy),
        disclosure_component:  round2(b.disclosure),
        data_points_count:     b.data_points,
        confidence_level:      round2(b.confidence),
        calculation_method:    CALCULATION_METHOD.to_owned(),
      })
      .await
      .map_err(Error::store)?;

    info!(
      %company_id,
      composite = row.composite_score,
      data_points = row.data_points_count,
      "score run recorded"
    );
    Ok(row)
  }

  async fn compute(
    &self,
    company_id: Uuid,
    as_of: DateTime<Utc>,
  ) -> Result<Breakdown> {
    let company = self
      .store
      .company(company_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::CompanyNotFound(company_id))?;

    // Configured but not applied to document weights: the decay factor is
    // a reserved knob whose intended semantics are still undecided.
    debug!(
      decay_factor = self.config.decay_factor,
      "time decay configured but not applied"
    );

    let cutoff = as_of - Duration::days(self.config.lookback_days);
    let documents = self
      .store
      .documents_for_company(company_id, cutoff)
      .await
      .map_err(Error::store)?;

    if documents.is_empty() {
      return Ok(Breakdown::neutral());
    }

    let mut env_scores = Vec::new();
    let mut social_scores = Vec::new();
    let mut gov_scores = Vec::new();
    let mut sentiments = Vec::new();
    let mut controversies = Vec::new();

    for doc in &documents {
      let (Some(sentiment), Some(topics)) = (doc.sentiment_score, doc.esg_topics)
      else {
        // No classification signals: excluded, not an error.
        continue;
      };

      // Map sentiment [-1, 1] onto the [0, 10] score scale.
      let base = (sentiment + 1.0) * 5.0;

      for (pillar, scores) in [
        (Pillar::Environmental, &mut env_scores),
        (Pillar::Social, &mut social_scores),
        (Pillar::Governance, &mut gov_scores),
      ] {
        let relevance = topics.get(pillar);
        if relevance > RELEVANCE_FLOOR {
          scores.push(base * relevance);
        }
      }

      sentiments.push(sentiment);
      controversies.push(doc.controversy_score);
    }

    let environmental = mean_or(&env_scores, NEUTRAL_SCORE);
    let social = mean_or(&social_scores, NEUTRAL_SCORE);
    let governance = mean_or(&gov_scores, NEUTRAL_SCORE);

    let weights =
      self.config.sector_weights.resolve(company.sector.as_deref());
    let composite =
      environmental * weights.e + social * weights.s + governance * weights.g;

    let data_points = sentiments.len() as i64;
    Ok(Breakdown {
      environmental,
      social,
      governance,
      composite,
      sentiment: (mean_or(&sentiments, 0.0) + 1.0) * 5.0,
      controversy: mean_or(&controversies, 0.0),
      disclosure: disclosure_share(&documents) * 10.0,
      data_points,
      confidence: (data_points as f64 / FULL_CONFIDENCE_DATA_POINTS).min(1.0),
    })
  }
}

/// Share of window documents that are filings or regulatory notices.
fn disclosure_share(documents: &[Document]) -> f64 {
  let disclosures = documents
    .iter()
    .filter(|d| d.doc_type != verdant_core::document::DocType::News)
    .count();
  disclosures as f64 / documents.len() as f64
}
