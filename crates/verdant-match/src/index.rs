//! The variation index — variant string → company id.
//!
//! A [`VariationIndex`] is an immutable snapshot built from the full
//! active-company set. Rebuilds go through [`IndexHandle`]: a new index is
//! built completely, then atomically swapped in, so concurrent lookups
//! never observe a half-built index.

use std::{
  collections::HashMap,
  sync::{Arc, RwLock},
};

use regex::{Regex, RegexBuilder};
use tracing::{info, warn};
use uuid::Uuid;

use verdant_core::company::Company;

use crate::{variations::NameVariationGenerator, Error, Result};

// ─── Snapshot types ──────────────────────────────────────────────────────────

/// One indexed variant: the owning company and the word-boundary pattern
/// used by the matcher's exact path, compiled once at build time.
#[derive(Debug, Clone)]
pub struct IndexedVariant {
  pub company_id: Uuid,
  pub pattern:    Regex,
}

/// Identity fields of an indexed company, cached so the matcher and
/// validator don't go back to the store per document.
#[derive(Debug, Clone)]
pub struct CompanyInfo {
  pub symbol: String,
  pub name:   String,
  pub sector: Option<String>,
}

/// Two companies generated the same variant string. The policy is
/// last-writer-wins in company iteration order — deliberately undefined
/// precedence, surfaced as a diagnostic rather than adjudicated.
#[derive(Debug, Clone)]
pub struct Collision {
  pub variant:   String,
  pub kept:      Uuid,
  pub displaced: Uuid,
}

/// An immutable reverse mapping from lowercased variant strings to company
/// ids, for one generation of the company set.
#[derive(Debug, Default)]
pub struct VariationIndex {
  variants:   HashMap<String, IndexedVariant>,
  companies:  HashMap<Uuid, CompanyInfo>,
  collisions: Vec<Collision>,
}

impl VariationIndex {
  /// Build a full index from `companies`. Variant keys are lowercased;
  /// the exact-match regex for each variant is compiled here so lookups
  /// never pay compilation cost.
  pub fn build(
    companies: &[Company],
    generator: &NameVariationGenerator,
  ) -> Result<Self> {
    let mut index = Self::default();

    for company in companies {
      index.companies.insert(company.company_id, CompanyInfo {
        symbol: company.symbol.clone(),
        name:   company.name.clone(),
        sector: company.sector.clone(),
      });

      for variation in generator.generate(&company.name, &company.symbol) {
        index.insert_variant(&variation, company.company_id)?;
      }
    }

    info!(
      companies = index.companies.len(),
      variants = index.variants.len(),
      collisions = index.collisions.len(),
      "built variation index"
    );
    Ok(index)
  }

  fn insert_variant(&mut self, variation: &str, company_id: Uuid) -> Result<()> {
    let key = variation.to_lowercase();
    let pattern = word_boundary_pattern(&key)?;

    if let Some(previous) =
      self.variants.insert(key.clone(), IndexedVariant { company_id, pattern })
    {
      if previous.company_id != company_id {
        self.collisions.push(Collision {
          variant:   key,
          kept:      company_id,
          displaced: previous.company_id,
        });
      }
    }
    Ok(())
  }

  pub fn variants(&self) -> impl Iterator<Item = (&str, &IndexedVariant)> {
    self.variants.iter().map(|(k, v)| (k.as_str(), v))
  }

  pub fn company(&self, id: Uuid) -> Option<&CompanyInfo> {
    self.companies.get(&id)
  }

  /// Collisions detected during the build; empty when every variant is
  /// unambiguous.
  pub fn collisions(&self) -> &[Collision] {
    &self.collisions
  }

  pub fn len(&self) -> usize {
    self.variants.len()
  }

  pub fn is_empty(&self) -> bool {
    self.variants.is_empty()
  }

  /// Copy of this snapshot with one extra manually mapped variant.
  fn with_manual_mapping(&self, pattern: &str, company_id: Uuid) -> Result<Self> {
    let mut next = Self {
      variants:   self.variants.clone(),
      companies:  self.companies.clone(),
      collisions: self.collisions.clone(),
    };
    next.insert_variant(pattern, company_id)?;
    Ok(next)
  }
}

/// Case-insensitive whole-word pattern for one (lowercased) variant.
fn word_boundary_pattern(variant: &str) -> Result<Regex> {
  let pattern = format!(r"\b{}\b", regex::escape(variant));
  Ok(
    RegexBuilder::new(&pattern)
      .case_insensitive(true)
      .build()
      .map_err(Error::Pattern)?,
  )
}

// ─── Handle ──────────────────────────────────────────────────────────────────

/// Shared, rebuildable access to the current [`VariationIndex`] snapshot.
///
/// Rebuilding builds the replacement completely before publishing it, so
/// a matcher holding the old snapshot keeps a consistent view and new
/// lookups see only whole indexes.
pub struct IndexHandle {
  current: RwLock<Arc<VariationIndex>>,
}

impl IndexHandle {
  pub fn new(index: VariationIndex) -> Self {
    Self { current: RwLock::new(Arc::new(index)) }
  }

  /// The current snapshot. Cheap; callers hold it for the duration of a
  /// matching pass so a concurrent rebuild cannot shift results mid-batch.
  pub fn snapshot(&self) -> Arc<VariationIndex> {
    match self.current.read() {
      Ok(guard) => Arc::clone(&guard),
      // A poisoned lock still holds a fully built index.
      Err(poisoned) => Arc::clone(&poisoned.into_inner()),
    }
  }

  /// Full rebuild from a fresh company set; swaps the snapshot in only
  /// once construction has finished.
  pub fn rebuild(
    &self,
    companies: &[Company],
    generator: &NameVariationGenerator,
  ) -> Result<()> {
    let next = VariationIndex::build(companies, generator)?;
    for collision in next.collisions() {
      warn!(
        variant = %collision.variant,
        kept = %collision.kept,
        displaced = %collision.displaced,
        "variant collision; last indexed company wins"
      );
    }
    self.publish(next);
    Ok(())
  }

  /// Map a manual text pattern to the indexed company with `symbol`,
  /// publishing a new snapshot. Fails without publishing anything when
  /// the symbol is not in the current snapshot.
  pub fn add_manual_mapping(&self, pattern: &str, symbol: &str) -> Result<()> {
    let current = self.snapshot();
    let symbol = symbol.to_uppercase();
    let company_id = current
      .companies
      .iter()
      .find(|(_, info)| info.symbol == symbol)
      .map(|(id, _)| *id)
      .ok_or_else(|| Error::UnknownSymbol(symbol.clone()))?;

    let next = current.with_manual_mapping(pattern, company_id)?;
    info!(pattern, %symbol, "added manual variant mapping");
    self.publish(next);
    Ok(())
  }

  fn publish(&self, next: VariationIndex) {
    let next = Arc::new(next);
    match self.current.write() {
      Ok(mut guard) => *guard = next,
      Err(poisoned) => *poisoned.into_inner() = next,
    }
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;

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

  #[test]
  fn build_indexes_all_variants_lowercased() {
    let companies = vec![company("INFY", "Infosys Limited")];
    let index =
      VariationIndex::build(&companies, &NameVariationGenerator::default())
        .unwrap();

    let keys: Vec<&str> = index.variants().map(|(k, _)| k).collect();
    assert!(keys.contains(&"infy"));
    assert!(keys.contains(&"infosys"));
    assert!(keys.iter().all(|k| *k == k.to_lowercase()));
  }

  #[test]
  fn identical_variants_from_two_companies_are_reported() {
    // Both generate the bare variant "infosys".
    let a = company("INFY", "Infosys Limited");
    let b = company("INFY2", "Infosys Ltd");
    let index = VariationIndex::build(
      &[a.clone(), b.clone()],
      &NameVariationGenerator::default(),
    )
    .unwrap();

    assert!(!index.collisions().is_empty());
    // Last writer wins: the surviving entry belongs to b.
    let (_, entry) = index
      .variants()
      .find(|(k, _)| *k == "infosys")
      .unwrap();
    assert_eq!(entry.company_id, b.company_id);
  }

  #[test]
  fn rebuild_swaps_snapshot_wholesale() {
    let generator = NameVariationGenerator::default();
    let first = VariationIndex::build(
      &[company("INFY", "Infosys Limited")],
      &generator,
    )
    .unwrap();
    let handle = IndexHandle::new(first);

    let before = handle.snapshot();
    handle
      .rebuild(&[company("TCS", "Tata Consultancy Services Limited")], &generator)
      .unwrap();
    let after = handle.snapshot();

    // The old snapshot is untouched; the new one reflects the rebuild.
    assert!(before.variants().any(|(k, _)| k == "infy"));
    assert!(after.variants().all(|(k, _)| k != "infy"));
    assert!(after.variants().any(|(k, _)| k == "tcs"));
  }

  #[test]
  fn manual_mapping_lands_in_a_new_snapshot() {
    let generator = NameVariationGenerator::default();
    let target = company("RELIANCE", "Reliance Industries Limited");
    let index = VariationIndex::build(&[target.clone()], &generator).unwrap();
    let handle = IndexHandle::new(index);

    handle
      .add_manual_mapping("the Mukesh Ambani group", "reliance")
      .unwrap();

    let snapshot = handle.snapshot();
    let (_, entry) = snapshot
      .variants()
      .find(|(k, _)| *k == "the mukesh ambani group")
      .unwrap();
    assert_eq!(entry.company_id, target.company_id);
  }

  #[test]
  fn manual_mapping_for_unknown_symbol_changes_nothing() {
    let generator = NameVariationGenerator::default();
    let index = VariationIndex::build(
      &[company("RELIANCE", "Reliance Industries Limited")],
      &generator,
    )
    .unwrap();
    let handle = IndexHandle::new(index);
    let before = handle.snapshot().len();

    let err = handle.add_manual_mapping("conglomerate", "NOPE").unwrap_err();
    assert!(matches!(err, Error::UnknownSymbol(s) if s == "NOPE"));
    assert_eq!(handle.snapshot().len(), before);
  }
}
