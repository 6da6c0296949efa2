//! Attribution batches — assigning unattributed documents to companies.

use tracing::{debug, info};

use verdant_core::{
  document::{Attribution, DocType, Document},
  store::EsgStore,
};

use crate::{matcher::Matcher, Error, Result};

/// Acceptance floor for persisting an attribution. Stricter than the
/// matcher's own [`crate::matcher::ACCEPTANCE_FLOOR`] — an extra guard
/// against weak fuzzy matches polluting attributions. Keep the two
/// constants separate; collapsing them changes batch behaviour.
pub const ATTRIBUTION_FLOOR: f64 = 0.8;

/// How much of the document body is searched when the title yields
/// nothing.
pub const CONTENT_SEARCH_CHARS: usize = 500;

/// One-shot batch run over a bounded set of unattributed documents.
///
/// Safe to invoke repeatedly: attributed documents drop out of the
/// candidate selection, so a second run with no intervening writes
/// attributes nothing.
pub struct AttributionBatch<'a, S> {
  store:    &'a S,
  matcher:  Matcher,
  doc_type: DocType,
}

impl<'a, S: EsgStore> AttributionBatch<'a, S> {
  pub fn new(store: &'a S, matcher: Matcher, doc_type: DocType) -> Self {
    Self { store, matcher, doc_type }
  }

  /// Match and attribute up to `limit` documents. All accepted
  /// attributions are committed in a single store transaction; any
  /// storage failure rolls the whole batch back and propagates.
  ///
  /// Returns the number of documents attributed.
  pub async fn run(&self, limit: usize) -> Result<usize> {
    let docs = self
      .store
      .unattributed_documents(self.doc_type, limit)
      .await
      .map_err(Error::store)?;

    let mut attributions = Vec::new();
    for doc in &docs {
      let Some(hit) = self.match_document(doc) else { continue };

      if hit.confidence > ATTRIBUTION_FLOOR {
        debug!(
          document_id = %doc.document_id,
          company_id = %hit.company_id,
          matched = %hit.matched_text,
          confidence = format_args!("{:.2}", hit.confidence),
          "accepted attribution"
        );
        attributions.push(Attribution {
          document_id:      doc.document_id,
          company_id:       hit.company_id,
          confidence_score: hit.confidence,
        });
      }
    }

    self
      .store
      .apply_attributions(&attributions)
      .await
      .map_err(Error::store)?;

    info!(
      candidates = docs.len(),
      attributed = attributions.len(),
      doc_type = %self.doc_type,
      "attribution batch complete"
    );
    Ok(attributions.len())
  }

  /// Title first (more reliable), then the leading slice of the content.
  fn match_document(&self, doc: &Document) -> Option<crate::MatchHit> {
    self
      .matcher
      .find(&doc.title)
      .or_else(|| self.matcher.find(leading(&doc.content, CONTENT_SEARCH_CHARS)))
  }
}

/// At most the first `max_chars` characters of `text`, on a char boundary.
pub(crate) fn leading(text: &str, max_chars: usize) -> &str {
  match text.char_indices().nth(max_chars) {
    Some((idx, _)) => &text[..idx],
    None => text,
  }
}

#[cfg(test)]
mod tests {
  use super::leading;

  #[test]
  fn leading_respects_char_boundaries() {
    assert_eq!(leading("abcdef", 3), "abc");
    assert_eq!(leading("ab", 3), "ab");
    assert_eq!(leading("αβγδ", 2), "αβ");
    assert_eq!(leading("", 5), "");
  }
}
