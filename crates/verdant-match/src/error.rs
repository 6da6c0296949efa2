//! Error type for `verdant-match`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Manual override named a symbol the store does not know.
  #[error("unknown company symbol: {0:?}")]
  UnknownSymbol(String),

  #[error("invalid variant pattern: {0}")]
  Pattern(#[from] regex::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
