//! Name variation generation — the strings that could refer to a company.

use std::collections::BTreeSet;

use verdant_core::config::AbbreviationTable;

/// Legal suffixes stripped from (and re-added to) company names. Checked
/// space-delimited at the end of the name; the first match wins.
const LEGAL_SUFFIXES: &[&str] =
  &["Limited", "Ltd", "Corporation", "Corp", "Inc", "Company", "Co"];

/// Derives the set of text strings that could refer to a company.
///
/// Deterministic given identical inputs: the same name and symbol always
/// produce the same variant set. The abbreviation table is injected so it
/// can be extended from configuration.
#[derive(Debug, Clone, Default)]
pub struct NameVariationGenerator {
  abbreviations: AbbreviationTable,
}

impl NameVariationGenerator {
  pub fn new(abbreviations: AbbreviationTable) -> Self {
    Self { abbreviations }
  }

  /// All variants for a company, deduplicated. Order is irrelevant
  /// downstream; a sorted set keeps tests deterministic.
  pub fn generate(&self, name: &str, symbol: &str) -> BTreeSet<String> {
    let mut variations = BTreeSet::new();
    variations.insert(symbol.to_owned());
    variations.insert(name.to_owned());

    // Base name with one known legal suffix stripped.
    let mut base_name = name;
    for suffix in LEGAL_SUFFIXES {
      if let Some(stripped) = name.strip_suffix(&format!(" {suffix}")) {
        base_name = stripped;
        variations.insert(stripped.to_owned());
        break;
      }
    }

    // Alternate legal-suffix spellings on the base name.
    for suffix in ["Ltd", "Limited"] {
      if !base_name.ends_with(suffix) {
        variations.insert(format!("{base_name} {suffix}"));
      }
    }

    // Known colloquial abbreviations keyed on the full company name.
    for abbrev in self.abbreviations.expansions_for(name) {
      variations.insert(abbrev.to_owned());
    }

    // Short forms of long base names.
    let words: Vec<&str> = base_name.split_whitespace().collect();
    if words.len() > 2 {
      variations.insert(words[..2].join(" "));
      variations.insert(format!("{} {}", words[0], words[words.len() - 1]));
    }

    variations
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn generator() -> NameVariationGenerator {
    NameVariationGenerator::default()
  }

  #[test]
  fn generation_is_deterministic() {
    let g = generator();
    let a = g.generate("Infosys Limited", "INFY");
    let b = g.generate("Infosys Limited", "INFY");
    assert_eq!(a, b);
  }

  #[test]
  fn includes_symbol_and_full_name() {
    let v = generator().generate("Infosys Limited", "INFY");
    assert!(v.contains("INFY"));
    assert!(v.contains("Infosys Limited"));
  }

  #[test]
  fn strips_legal_suffix() {
    let v = generator().generate("Infosys Limited", "INFY");
    assert!(v.contains("Infosys"));
  }

  #[test]
  fn re_adds_alternate_suffix_spellings() {
    let v = generator().generate("Wipro Limited", "WIPRO");
    // Base "Wipro" gets both Ltd and Limited re-attached.
    assert!(v.contains("Wipro Ltd"));
    assert!(v.contains("Wipro Limited"));
  }

  #[test]
  fn only_first_matching_suffix_is_stripped() {
    // "Co" also matches the end of "... Company Co" names, but only one
    // suffix comes off.
    let v = generator().generate("Acme Trading Company", "ACME");
    assert!(v.contains("Acme Trading"));
    assert!(!v.contains("Acme"));
  }

  #[test]
  fn applies_known_abbreviations() {
    let v = generator().generate("Tata Consultancy Services Limited", "TCS");
    assert!(v.contains("TCS"));

    let v = generator().generate("Mahindra & Mahindra Limited", "M&M");
    assert!(v.contains("Mahindra"));
    assert!(v.contains("M&M"));
  }

  #[test]
  fn long_base_names_get_short_forms() {
    let v = generator().generate("Oil and Natural Gas Corporation", "ONGC");
    // First two words and first+last word of the base name.
    assert!(v.contains("Oil and"));
    assert!(v.contains("Oil Gas"));
  }

  #[test]
  fn two_word_base_names_get_no_short_forms() {
    let v = generator().generate("HDFC Bank Limited", "HDFCBANK");
    assert!(!v.contains("HDFC Bank Bank"));
    assert!(v.contains("HDFC Bank"));
  }
}
