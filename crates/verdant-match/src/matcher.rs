//! Free-text company matching against a variation index snapshot.

use std::sync::Arc;

use uuid::Uuid;

use crate::index::VariationIndex;

/// Confidence assigned to a whole-word exact occurrence of a variant.
pub const EXACT_MATCH_CONFIDENCE: f64 = 0.95;

/// Floor below which a fuzzy similarity ratio is not even a candidate.
pub const FUZZY_INTEREST_FLOOR: f64 = 0.8;

/// Global acceptance floor: the best candidate must strictly exceed this
/// to be returned at all. Distinct from the stricter attribution floor in
/// [`crate::attribution`] — attribution re-guards on top of this.
pub const ACCEPTANCE_FLOOR: f64 = 0.7;

/// Longest word window considered on the fuzzy path.
const MAX_WINDOW_WORDS: usize = 3;

/// A company mention found in text.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchHit {
  pub company_id:   Uuid,
  /// The variant (exact path) or text window (fuzzy path) that matched.
  pub matched_text: String,
  /// `[0, 1]` match strength; never at or below [`ACCEPTANCE_FLOOR`].
  pub confidence:   f64,
}

/// Matches text snippets against one index snapshot.
///
/// Holding the snapshot for the matcher's lifetime keeps a whole batch
/// consistent under concurrent index rebuilds.
#[derive(Clone)]
pub struct Matcher {
  index: Arc<VariationIndex>,
}

impl Matcher {
  pub fn new(index: Arc<VariationIndex>) -> Self {
    Self { index }
  }

  pub fn index(&self) -> &VariationIndex {
    &self.index
  }

  /// Best company mention in `text`, or `None` — a normal negative
  /// result, not an error.
  ///
  /// Per candidate variant: a whole-word occurrence scores
  /// [`EXACT_MATCH_CONFIDENCE`]; independently, every 1–3-word window of
  /// the text is compared by normalised similarity ratio, kept when it
  /// exceeds [`FUZZY_INTEREST_FLOOR`]. The single highest-confidence
  /// candidate wins, first-at-max on ties (index iteration order is not
  /// defined, which is accepted for equal-confidence ties).
  pub fn find(&self, text: &str) -> Option<MatchHit> {
    if text.is_empty() {
      return None;
    }

    let text_lower = text.to_lowercase();
    let words: Vec<&str> = text_lower.split_whitespace().collect();

    let mut best: Option<MatchHit> = None;
    let mut highest = 0.0_f64;

    for (variant, entry) in self.index.variants() {
      // Exact path: whole-word-bounded occurrence of the variant.
      if text_lower.contains(variant)
        && entry.pattern.is_match(text)
        && EXACT_MATCH_CONFIDENCE > highest
      {
        highest = EXACT_MATCH_CONFIDENCE;
        best = Some(MatchHit {
          company_id:   entry.company_id,
          matched_text: variant.to_owned(),
          confidence:   EXACT_MATCH_CONFIDENCE,
        });
        continue;
      }

      // Fuzzy path: similarity ratio against sliding word windows. Can
      // outscore the exact path (a perfect phrase equality is 1.0).
      for start in 0..words.len() {
        let max_end = usize::min(start + MAX_WINDOW_WORDS, words.len());
        for end in (start + 1)..=max_end {
          let phrase = words[start..end].join(" ");
          let similarity = strsim::normalized_levenshtein(variant, &phrase);

          if similarity > FUZZY_INTEREST_FLOOR && similarity > highest {
            highest = similarity;
            best = Some(MatchHit {
              company_id:   entry.company_id,
              matched_text: phrase,
              confidence:   similarity,
            });
          }
        }
      }
    }

    if highest > ACCEPTANCE_FLOOR { best } else { None }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Utc;
  use verdant_core::company::Company;

  use super::*;
  use crate::variations::NameVariationGenerator;

  fn company(symbol: &str, name: &str) -> Company {
    Company {
      company_id: Uuid::new_v4(),
      symbol:     symbol.to_owned(),
      name:       name.to_owned(),
      sector:     None,
      is_active:  true,
      created_at: Utc::now(),
    }
  }

  fn matcher(companies: &[Company]) -> Matcher {
    let index =
      VariationIndex::build(companies, &NameVariationGenerator::default())
        .unwrap();
    Matcher::new(Arc::new(index))
  }

  #[test]
  fn standalone_symbol_matches_exactly() {
    let c = company("INFY", "Infosys Limited");
    let m = matcher(std::slice::from_ref(&c));

    let hit = m.find("INFY posts record quarterly revenue").unwrap();
    assert_eq!(hit.company_id, c.company_id);
    assert_eq!(hit.confidence, EXACT_MATCH_CONFIDENCE);
    assert_eq!(hit.matched_text, "infy");
  }

  #[test]
  fn exact_match_is_case_insensitive() {
    let c = company("INFY", "Infosys Limited");
    let m = matcher(std::slice::from_ref(&c));

    let hit = m.find("infosys announces buyback").unwrap();
    assert_eq!(hit.company_id, c.company_id);
    assert_eq!(hit.confidence, EXACT_MATCH_CONFIDENCE);
  }

  #[test]
  fn symbol_embedded_in_a_word_does_not_match_exactly() {
    let c = company("IOC", "Indian Oil Corporation Limited");
    let m = matcher(std::slice::from_ref(&c));

    // "biochemistry" contains "ioc" but not word-bounded, and no window
    // resembles any variant.
    assert!(m.find("a biochemistry lecture this evening").is_none());
  }

  #[test]
  fn near_miss_matches_on_the_fuzzy_path() {
    let c = company("INFY", "Infosys Limited");
    let m = matcher(std::slice::from_ref(&c));

    // One-character typo: "infosys" vs "infosyss", ratio 7/8 = 0.875.
    let hit = m.find("shares of Infosyss climbed today").unwrap();
    assert_eq!(hit.company_id, c.company_id);
    assert!(hit.confidence > FUZZY_INTEREST_FLOOR);
    assert!(hit.confidence < EXACT_MATCH_CONFIDENCE);
    assert_eq!(hit.matched_text, "infosyss");
  }

  #[test]
  fn weak_similarity_returns_none() {
    let c = company("TCS", "Tata Consultancy Services Limited");
    let m = matcher(std::slice::from_ref(&c));
    assert!(m.find("completely unrelated headline about weather").is_none());
  }

  #[test]
  fn empty_text_returns_none() {
    let c = company("TCS", "Tata Consultancy Services Limited");
    let m = matcher(std::slice::from_ref(&c));
    assert!(m.find("").is_none());
  }

  #[test]
  fn result_confidence_always_exceeds_acceptance_floor() {
    let companies =
      [company("INFY", "Infosys Limited"), company("WIPRO", "Wipro Limited")];
    let m = matcher(&companies);

    for text in [
      "INFY gains",
      "Wipro wins a large deal",
      "Infosyss profit up",
      "nothing relevant here",
      "",
    ] {
      if let Some(hit) = m.find(text) {
        assert!(hit.confidence > ACCEPTANCE_FLOOR);
      }
    }
  }

  #[test]
  fn best_candidate_wins_across_companies() {
    let infy = company("INFY", "Infosys Limited");
    let wipro = company("WIPRO", "Wipro Limited");
    let m = matcher(&[infy, wipro.clone()]);

    // Only Wipro occurs exactly; a fuzzy Infosys candidate (if any)
    // cannot outrank the exact hit.
    let hit = m.find("Wipro signs an infrastructure deal").unwrap();
    assert_eq!(hit.company_id, wipro.company_id);
  }
}
