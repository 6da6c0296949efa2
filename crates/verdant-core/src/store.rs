//! The `EsgStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `verdant-store-sqlite`). The matching and scoring crates depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  company::{Company, NewCompany},
  document::{Attribution, DocType, Document, NewDocument},
  score::{EsgScore, NewEsgScore},
};

// ─── Query result types ──────────────────────────────────────────────────────

/// Attributed-document count for one company, from
/// [`EsgStore::mention_counts`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MentionCount {
  pub symbol:         String,
  pub name:           String,
  pub document_count: i64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over Verdant's storage backend.
///
/// The matching/scoring core only ever writes three things: attribution
/// fields on documents (`company_id`, `confidence_score`, applied
/// atomically per batch), new ESG score rows (append-only), and the
/// ingestion inputs used by tests and glue code. Nothing is ever deleted.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait EsgStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Companies ─────────────────────────────────────────────────────────

  /// Insert a company, or refresh name/sector if the symbol already
  /// exists. The symbol is uppercased before storage.
  fn upsert_company(
    &self,
    input: NewCompany,
  ) -> impl Future<Output = Result<Company, Self::Error>> + Send + '_;

  /// Retrieve a company by id. Returns `None` if not found.
  fn company(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Company>, Self::Error>> + Send + '_;

  /// Retrieve a company by ticker symbol (case-insensitive).
  fn company_by_symbol<'a>(
    &'a self,
    symbol: &'a str,
  ) -> impl Future<Output = Result<Option<Company>, Self::Error>> + Send + 'a;

  /// All active companies — the input to a variation index build.
  fn active_companies(
    &self,
  ) -> impl Future<Output = Result<Vec<Company>, Self::Error>> + Send + '_;

  // ── Documents ─────────────────────────────────────────────────────────

  /// Persist a new, unattributed document.
  fn add_document(
    &self,
    input: NewDocument,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  /// Documents of `doc_type` with no owning company, up to `limit` —
  /// the candidate set for an attribution batch. Already-attributed
  /// documents never appear here, which is what makes re-runs idempotent.
  fn unattributed_documents(
    &self,
    doc_type: DocType,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  /// Documents that already have an owning company, up to `limit` — the
  /// sample set for match validation.
  fn attributed_documents(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  /// One company's documents published on or after `since`.
  fn documents_for_company(
    &self,
    company_id: Uuid,
    since: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  // ── Attribution writes ────────────────────────────────────────────────

  /// Set `company_id` and `confidence_score` on every listed document,
  /// inside a single transaction. Either every attribution in the batch
  /// commits or none does.
  fn apply_attributions<'a>(
    &'a self,
    attributions: &'a [Attribution],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Scores — append-only writes ───────────────────────────────────────

  /// Append a new score row. `score_id` and `created_at` are assigned by
  /// the store.
  fn insert_score(
    &self,
    input: NewEsgScore,
  ) -> impl Future<Output = Result<EsgScore, Self::Error>> + Send + '_;

  /// The most recent score row for a company, by score date then
  /// insertion time. Returns `None` when the company has never been
  /// scored.
  fn latest_score(
    &self,
    company_id: Uuid,
  ) -> impl Future<Output = Result<Option<EsgScore>, Self::Error>> + Send + '_;

  // ── Statistics ────────────────────────────────────────────────────────

  /// Attributed-document counts per company, most-mentioned first.
  fn mention_counts(
    &self,
  ) -> impl Future<Output = Result<Vec<MentionCount>, Self::Error>> + Send + '_;
}
