//! JSON REST API for Verdant.
//!
//! Exposes an axum [`Router`] backed by any [`verdant_core::store::EsgStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", verdant_api::api_router(store.clone(), config.clone()))
//! ```

pub mod companies;
pub mod error;
pub mod scores;

use std::sync::Arc;

use axum::{Router, routing::get};
use verdant_core::{config::ScoringConfig, store::EsgStore};

pub use error::ApiError;

/// Shared handler state: the store plus the scoring configuration used
/// when a fresh score has to be computed on the fly.
pub struct ApiState<S> {
  pub store:  Arc<S>,
  pub config: Arc<ScoringConfig>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), config: Arc::clone(&self.config) }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, config: Arc<ScoringConfig>) -> Router<()>
where
  S: EsgStore + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route("/companies", get(companies::list::<S>))
    .route("/scores/{symbol}", get(scores::get_one::<S>))
    .with_state(ApiState { store, config })
}
