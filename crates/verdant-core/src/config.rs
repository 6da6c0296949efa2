//! Scoring and matching configuration.
//!
//! Everything here deserialises from the optional TOML config file and
//! carries compiled-in defaults, so the pipeline runs with no file at all.
//! Acceptance floors are deliberately *not* configurable — they are design
//! constants owned by the crates that apply them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Sector weights ──────────────────────────────────────────────────────────

/// Weight triple for one sector; must sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorWeights {
  pub e: f64,
  pub s: f64,
  pub g: f64,
}

impl SectorWeights {
  pub fn sum(&self) -> f64 { self.e + self.s + self.g }
}

/// Fallback applied when the table itself is missing its `default` entry.
/// Validation rejects such tables, so this only guards hand-built values.
const FALLBACK_WEIGHTS: SectorWeights = SectorWeights { e: 0.33, s: 0.33, g: 0.34 };

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Sector name → weight triple, with a mandatory `default` entry used for
/// unknown or absent sectors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable(BTreeMap<String, SectorWeights>);

impl WeightTable {
  pub const DEFAULT_KEY: &'static str = "default";

  pub fn new(entries: BTreeMap<String, SectorWeights>) -> Self {
    Self(entries)
  }

  /// Weights for `sector`, falling back to the `default` profile when the
  /// sector is unknown or absent. Never fails.
  pub fn resolve(&self, sector: Option<&str>) -> SectorWeights {
    sector
      .and_then(|s| self.0.get(s))
      .or_else(|| self.0.get(Self::DEFAULT_KEY))
      .copied()
      .unwrap_or(FALLBACK_WEIGHTS)
  }

  /// Check that a `default` entry exists and every triple sums to 1.0
  /// within floating-point tolerance.
  pub fn validate(&self) -> Result<()> {
    if !self.0.contains_key(Self::DEFAULT_KEY) {
      return Err(Error::MissingDefaultWeights);
    }
    for (sector, weights) in &self.0 {
      let sum = weights.sum();
      if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(Error::UnnormalizedWeights { sector: sector.clone(), sum });
      }
    }
    Ok(())
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &SectorWeights)> {
    self.0.iter().map(|(k, v)| (k.as_str(), v))
  }
}

impl Default for WeightTable {
  fn default() -> Self {
    let mut table = BTreeMap::new();
    table.insert("Banking".to_owned(), SectorWeights { e: 0.2, s: 0.4, g: 0.4 });
    table.insert("Oil & Gas".to_owned(), SectorWeights { e: 0.5, s: 0.3, g: 0.2 });
    table.insert("IT".to_owned(), SectorWeights { e: 0.3, s: 0.4, g: 0.3 });
    table.insert(
      Self::DEFAULT_KEY.to_owned(),
      SectorWeights { e: 0.33, s: 0.33, g: 0.34 },
    );
    Self(table)
  }
}

// ─── Scoring config ──────────────────────────────────────────────────────────

/// Parameters of a scoring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
  /// Size of the selection window, counted back from the as-of date.
  pub lookback_days:  i64,
  /// Reserved per-document time-decay factor. Read by the aggregator but
  /// not applied to document weights; see the note at the read site.
  pub decay_factor:   f64,
  pub sector_weights: WeightTable,
}

impl Default for ScoringConfig {
  fn default() -> Self {
    Self {
      lookback_days:  365,
      decay_factor:   1.0,
      sector_weights: WeightTable::default(),
    }
  }
}

impl ScoringConfig {
  pub fn validate(&self) -> Result<()> {
    self.sector_weights.validate()
  }
}

// ─── Abbreviation table ──────────────────────────────────────────────────────

/// Known colloquial abbreviations: full legal name → short market names.
///
/// Injected into the variation generator so deployments can extend the
/// table from configuration instead of editing code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AbbreviationTable(BTreeMap<String, Vec<String>>);

impl AbbreviationTable {
  pub fn new(entries: BTreeMap<String, Vec<String>>) -> Self {
    Self(entries)
  }

  /// Merge `extra` entries into the table, overriding on key collision.
  pub fn extend(&mut self, extra: AbbreviationTable) {
    self.0.extend(extra.0);
  }

  /// Short names whose full legal name occurs (case-insensitively) inside
  /// `company_name`.
  pub fn expansions_for<'a>(
    &'a self,
    company_name: &str,
  ) -> impl Iterator<Item = &'a str> {
    let name_lower = company_name.to_lowercase();
    self
      .0
      .iter()
      .filter(move |(full_name, _)| name_lower.contains(&full_name.to_lowercase()))
      .flat_map(|(_, abbrevs)| abbrevs.iter().map(String::as_str))
  }
}

impl Default for AbbreviationTable {
  fn default() -> Self {
    let entries = [
      ("Infosys", &["INFY"][..]),
      ("Tata Consultancy Services", &["TCS"]),
      ("Reliance Industries", &["RIL"]),
      ("State Bank of India", &["SBI"]),
      ("HDFC Bank", &["HDFC"]),
      ("ICICI Bank", &["ICICI"]),
      ("Bharti Airtel", &["Airtel"]),
      ("Oil and Natural Gas Corporation", &["ONGC"]),
      ("Indian Oil Corporation", &["IOC"]),
      ("Mahindra & Mahindra", &["M&M", "Mahindra"]),
    ];
    Self(
      entries
        .into_iter()
        .map(|(full, abbrevs)| {
          (full.to_owned(), abbrevs.iter().map(|a| (*a).to_owned()).collect())
        })
        .collect(),
    )
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
