//! Handlers for `/companies`.

use axum::{Json, extract::State};
use verdant_core::{company::Company, store::EsgStore};

use crate::{ApiState, error::ApiError};

/// `GET /companies` — all active companies, ordered by symbol.
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Company>>, ApiError>
where
  S: EsgStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let companies = state
    .store
    .active_companies()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;
  Ok(Json(companies))
}
