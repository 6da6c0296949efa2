//! Drift validation of existing attributions.
//!
//! Re-checks already-attributed documents for continued textual support
//! and reports statistics. Read-only: a failed check is reported, never
//! auto-corrected.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use verdant_core::store::EsgStore;

use crate::{
  attribution::leading, index::VariationIndex, variations::NameVariationGenerator,
  Error, Result,
};

use std::sync::Arc;

/// How much of the document body is scanned for a literal mention.
pub const VALIDATION_CONTENT_CHARS: usize = 1000;

/// Outcome counts of one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationStats {
  pub total_checked:        usize,
  pub confirmed_matches:    usize,
  /// Reserved bucket: current logic only distinguishes confirmed vs.
  /// not-found, so this stays zero.
  pub questionable_matches: usize,
  pub no_mention_found:     usize,
}

/// Re-checks a sample of attributed documents against the name variations
/// of their assigned company.
pub struct MatchValidator<'a, S> {
  store:     &'a S,
  index:     Arc<VariationIndex>,
  generator: NameVariationGenerator,
}

impl<'a, S: EsgStore> MatchValidator<'a, S> {
  pub fn new(
    store: &'a S,
    index: Arc<VariationIndex>,
    generator: NameVariationGenerator,
  ) -> Self {
    Self { store, index, generator }
  }

  /// Check up to `sample_size` attributed documents for a literal
  /// (case-insensitive) occurrence of any regenerated variation of their
  /// assigned company in `title + leading content`.
  pub async fn validate(&self, sample_size: usize) -> Result<ValidationStats> {
    let docs = self
      .store
      .attributed_documents(sample_size)
      .await
      .map_err(Error::store)?;

    let mut stats = ValidationStats::default();

    for doc in &docs {
      stats.total_checked += 1;

      // Attributed documents always carry a company id; a dangling one
      // (company gone from the index) counts as unsupported.
      let info = doc.company_id.and_then(|id| self.index.company(id));
      let Some(info) = info else {
        stats.no_mention_found += 1;
        warn!(document_id = %doc.document_id, "attributed company not in index");
        continue;
      };

      let text = format!(
        "{} {}",
        doc.title,
        leading(&doc.content, VALIDATION_CONTENT_CHARS)
      )
      .to_lowercase();

      let mentioned = self
        .generator
        .generate(&info.name, &info.symbol)
        .iter()
        .any(|variation| text.contains(&variation.to_lowercase()));

      if mentioned {
        stats.confirmed_matches += 1;
      } else {
        stats.no_mention_found += 1;
        warn!(
          document_id = %doc.document_id,
          symbol = %info.symbol,
          "document attributed but no mention found"
        );
      }
    }

    info!(?stats, "validation complete");
    Ok(stats)
  }
}

#[cfg(test)]
mod tests {
  use super::ValidationStats;

  #[test]
  fn stats_serialise_with_all_four_buckets() {
    let stats = ValidationStats {
      total_checked:        3,
      confirmed_matches:    2,
      questionable_matches: 0,
      no_mention_found:     1,
    };

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["total_checked"], 3);
    assert_eq!(json["confirmed_matches"], 2);
    assert_eq!(json["questionable_matches"], 0);
    assert_eq!(json["no_mention_found"], 1);

    let back: ValidationStats = serde_json::from_value(json).unwrap();
    assert_eq!(back, stats);
  }
}
