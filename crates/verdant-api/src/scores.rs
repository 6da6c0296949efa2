//! Handlers for `/scores/{symbol}`.

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;
use verdant_core::{score::PillarScores, store::EsgStore};
use verdant_score::ScoreAggregator;

use crate::{ApiState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
  pub symbol:     String,
  pub company_id: Uuid,
  pub score_date: NaiveDate,
  pub scores:     PillarScores,
  /// `true` when the response comes from a persisted scoring run,
  /// `false` when it was computed on the fly.
  pub stored:             bool,
  pub calculation_method: Option<String>,
}

/// `GET /scores/:symbol` — the latest stored score for the company, or a
/// freshly computed (and not persisted) one when no run has been recorded
/// yet. 404 for unknown symbols.
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(symbol): Path<String>,
) -> Result<Json<ScoreResponse>, ApiError>
where
  S: EsgStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let company = state
    .store
    .company_by_symbol(&symbol)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound(format!("company {symbol} not found")))?;

  let stored = state
    .store
    .latest_score(company.company_id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  let response = match stored {
    Some(row) => ScoreResponse {
      symbol:     company.symbol,
      company_id: company.company_id,
      score_date: row.score_date,
      scores:     PillarScores {
        environmental: row.environmental_score,
        social:        row.social_score,
        governance:    row.governance_score,
        composite:     row.composite_score,
      },
      stored:             true,
      calculation_method: Some(row.calculation_method),
    },
    None => {
      let as_of = Utc::now();
      let scores =
        ScoreAggregator::new(state.store.as_ref(), state.config.as_ref())
        .score(company.company_id, as_of)
        .await?;
      ScoreResponse {
        symbol:             company.symbol,
        company_id:         company.company_id,
        score_date:         as_of.date_naive(),
        scores,
        stored:             false,
        calculation_method: None,
      }
    }
  };
  Ok(Json(response))
}
