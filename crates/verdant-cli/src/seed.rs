//! Starter company dataset: a Nifty-100 subset with sector labels.

use anyhow::Context as _;
use tracing::info;
use verdant_core::{company::NewCompany, store::EsgStore};
use verdant_store_sqlite::SqliteStore;

/// `(symbol, name, sector)` triples. Insertion is upsert-by-symbol, so
/// re-seeding is idempotent.
const INITIAL_COMPANIES: &[(&str, &str, &str)] = &[
  // Technology
  ("TCS", "Tata Consultancy Services Limited", "IT Services"),
  ("INFY", "Infosys Limited", "IT Services"),
  ("HCLTECH", "HCL Technologies Limited", "IT Services"),
  ("WIPRO", "Wipro Limited", "IT Services"),
  ("TECHM", "Tech Mahindra Limited", "IT Services"),
  // Banking & financial services
  ("HDFCBANK", "HDFC Bank Limited", "Banking"),
  ("ICICIBANK", "ICICI Bank Limited", "Banking"),
  ("SBIN", "State Bank of India", "Banking"),
  ("AXISBANK", "Axis Bank Limited", "Banking"),
  ("KOTAKBANK", "Kotak Mahindra Bank Limited", "Banking"),
  // Oil & gas
  ("RELIANCE", "Reliance Industries Limited", "Oil & Gas"),
  ("ONGC", "Oil and Natural Gas Corporation Limited", "Oil & Gas"),
  ("IOC", "Indian Oil Corporation Limited", "Oil & Gas"),
  ("BPCL", "Bharat Petroleum Corporation Limited", "Oil & Gas"),
  // Pharmaceuticals
  ("SUNPHARMA", "Sun Pharmaceutical Industries Limited", "Pharmaceuticals"),
  ("DRREDDY", "Dr. Reddy's Laboratories Limited", "Pharmaceuticals"),
  ("CIPLA", "Cipla Limited", "Pharmaceuticals"),
  ("BIOCON", "Biocon Limited", "Pharmaceuticals"),
  // Automotive
  ("MARUTI", "Maruti Suzuki India Limited", "Automotive"),
  ("M&M", "Mahindra & Mahindra Limited", "Automotive"),
  ("TATAMOTORS", "Tata Motors Limited", "Automotive"),
  ("BAJAJ-AUTO", "Bajaj Auto Limited", "Automotive"),
  // Steel & metals
  ("TATASTEEL", "Tata Steel Limited", "Steel"),
  ("JSWSTEEL", "JSW Steel Limited", "Steel"),
  ("HINDALCO", "Hindalco Industries Limited", "Steel"),
  ("COALINDIA", "Coal India Limited", "Steel"),
  // Cement
  ("ULTRACEMCO", "UltraTech Cement Limited", "Cement"),
  ("SHREECEM", "Shree Cement Limited", "Cement"),
  ("ACC", "ACC Limited", "Cement"),
  // Power
  ("NTPC", "NTPC Limited", "Power"),
  ("POWERGRID", "Power Grid Corporation of India Limited", "Power"),
  ("ADANIGREEN", "Adani Green Energy Limited", "Power"),
  ("ADANITRANS", "Adani Transmission Limited", "Power"),
  // Telecommunications
  ("BHARTIARTL", "Bharti Airtel Limited", "Telecommunications"),
  ("IDEA", "Vodafone Idea Limited", "Telecommunications"),
  // Consumer goods
  ("HINDUNILVR", "Hindustan Unilever Limited", "Consumer Goods"),
  ("ITC", "ITC Limited", "Consumer Goods"),
  ("NESTLEIND", "Nestle India Limited", "Consumer Goods"),
  // Infrastructure
  ("ADANIPORTS", "Adani Ports and Special Economic Zone Limited", "Infrastructure"),
  ("ADANIENT", "Adani Enterprises Limited", "Infrastructure"),
];

/// Upsert the starter list into `store`.
pub async fn run(store: &SqliteStore) -> anyhow::Result<usize> {
  for &(symbol, name, sector) in INITIAL_COMPANIES {
    store
      .upsert_company(NewCompany::new(symbol, name, Some(sector)))
      .await
      .with_context(|| format!("seeding {symbol}"))?;
  }

  info!(companies = INITIAL_COMPANIES.len(), "company seed complete");
  Ok(INITIAL_COMPANIES.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn seed_inserts_every_starter_company() {
    let store = SqliteStore::open_in_memory().await.expect("in-memory store");

    let count = run(&store).await.unwrap();
    assert_eq!(count, INITIAL_COMPANIES.len());

    let companies = store.active_companies().await.unwrap();
    assert_eq!(companies.len(), INITIAL_COMPANIES.len());

    let infy = store.company_by_symbol("INFY").await.unwrap().unwrap();
    assert_eq!(infy.name, "Infosys Limited");
    assert_eq!(infy.sector.as_deref(), Some("IT Services"));
  }

  #[tokio::test]
  async fn reseeding_is_idempotent() {
    let store = SqliteStore::open_in_memory().await.expect("in-memory store");

    run(&store).await.unwrap();
    let before = store.company_by_symbol("TCS").await.unwrap().unwrap();

    run(&store).await.unwrap();
    let companies = store.active_companies().await.unwrap();
    assert_eq!(companies.len(), INITIAL_COMPANIES.len());

    let after = store.company_by_symbol("TCS").await.unwrap().unwrap();
    assert_eq!(after.company_id, before.company_id);
  }
}
