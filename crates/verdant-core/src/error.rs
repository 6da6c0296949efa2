//! Error types for `verdant-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("sector weight table has no \"default\" entry")]
  MissingDefaultWeights,

  #[error("weights for sector {sector:?} sum to {sum}, expected 1.0")]
  UnnormalizedWeights { sector: String, sum: f64 },

  #[error("unknown document type: {0:?}")]
  UnknownDocType(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
