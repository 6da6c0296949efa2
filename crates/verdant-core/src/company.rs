//! Company — the canonical entity that documents are attributed to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A listed company tracked by the scoring pipeline.
///
/// Companies are created by ingestion; the matching and scoring core only
/// reads them. `sector` is a free-text category used as the weighting key
/// for the composite score and may be absent, in which case the default
/// weight profile applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
  pub company_id: Uuid,
  /// Exchange ticker; unique, stable, stored uppercase.
  pub symbol:     String,
  pub name:       String,
  pub sector:     Option<String>,
  pub is_active:  bool,
  pub created_at: DateTime<Utc>,
}

/// Input to [`EsgStore::upsert_company`](crate::store::EsgStore::upsert_company).
/// The symbol is uppercased by the store before insertion.
#[derive(Debug, Clone)]
pub struct NewCompany {
  pub symbol: String,
  pub name:   String,
  pub sector: Option<String>,
}

impl NewCompany {
  pub fn new(
    symbol: impl Into<String>,
    name: impl Into<String>,
    sector: Option<&str>,
  ) -> Self {
    Self {
      symbol: symbol.into(),
      name:   name.into(),
      sector: sector.map(str::to_owned),
    }
  }
}
