//! `verdant` — ESG attribution and scoring pipeline.
//!
//! # Usage
//!
//! ```
//! verdant seed
//! verdant attribute --limit 200
//! verdant score --all
//! verdant serve
//! ```

mod config;
mod seed;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use verdant_core::{document::DocType, store::EsgStore};
use verdant_match::{
  AttributionBatch, Matcher, MatchValidator, NameVariationGenerator,
  VariationIndex,
};
use verdant_score::ScoreAggregator;
use verdant_store_sqlite::SqliteStore;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "verdant", about = "ESG attribution and scoring pipeline")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Upsert the starter company list into the store.
  Seed,
  /// Run one attribution batch over unattributed documents.
  Attribute {
    /// Maximum number of documents to consider.
    #[arg(long, default_value_t = 100)]
    limit:    usize,
    /// Document category to process: news, filing or regulatory.
    #[arg(long, default_value = "news")]
    doc_type: DocType,
  },
  /// Re-check a sample of existing attributions for textual support.
  Validate {
    #[arg(long, default_value_t = 100)]
    sample: usize,
  },
  /// Compute and record ESG scores.
  Score {
    /// Score a single company by ticker symbol.
    #[arg(long, conflicts_with = "all")]
    symbol: Option<String>,
    /// Score every active company.
    #[arg(long)]
    all:    bool,
  },
  /// Match a text snippet against the company index and print the result.
  Match { text: String },
  /// Per-company attributed document counts.
  Stats,
  /// Serve the JSON API.
  Serve,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let config = AppConfig::load(&cli.config)?;

  let store = SqliteStore::open(&config.store_path)
    .await
    .with_context(|| format!("opening store at {:?}", config.store_path))?;

  match cli.command {
    Command::Seed => {
      let count = seed::run(&store).await?;
      println!("seeded {count} companies");
    }

    Command::Attribute { limit, doc_type } => {
      let generator =
        NameVariationGenerator::new(config.abbreviation_table());
      let index = load_index(&store, &generator).await?;
      let batch =
        AttributionBatch::new(&store, Matcher::new(index), doc_type);
      let attributed = batch.run(limit).await?;
      println!("attributed {attributed} documents");
    }

    Command::Validate { sample } => {
      let generator =
        NameVariationGenerator::new(config.abbreviation_table());
      let index = load_index(&store, &generator).await?;
      let stats = MatchValidator::new(&store, index, generator)
        .validate(sample)
        .await?;
      println!("{}", serde_json::to_string_pretty(&stats)?);
    }

    Command::Score { symbol, all } => {
      let aggregator = ScoreAggregator::new(&store, &config.scoring);
      let as_of = Utc::now();

      let companies = match (symbol, all) {
        (Some(symbol), _) => {
          let company = store
            .company_by_symbol(&symbol)
            .await?
            .with_context(|| format!("unknown symbol {symbol}"))?;
          vec![company]
        }
        (None, true) => store.active_companies().await?,
        (None, false) => {
          anyhow::bail!("pass --symbol <SYMBOL> or --all");
        }
      };

      for company in companies {
        let row = aggregator.run_for_company(company.company_id, as_of).await?;
        println!(
          "{:<12} E {:>5.2}  S {:>5.2}  G {:>5.2}  composite {:>5.2}  ({} docs)",
          company.symbol,
          row.environmental_score,
          row.social_score,
          row.governance_score,
          row.composite_score,
          row.data_points_count,
        );
      }
    }

    Command::Match { text } => {
      let generator =
        NameVariationGenerator::new(config.abbreviation_table());
      let index = load_index(&store, &generator).await?;
      let matcher = Matcher::new(index);

      match matcher.find(&text) {
        Some(hit) => {
          let info = matcher
            .index()
            .company(hit.company_id)
            .context("matched company missing from index")?;
          println!(
            "{} ({}) via {:?}, confidence {:.2}",
            info.symbol, info.name, hit.matched_text, hit.confidence,
          );
        }
        None => println!("no match"),
      }
    }

    Command::Stats => {
      for row in store.mention_counts().await? {
        println!("{:<12} {:>6}  {}", row.symbol, row.document_count, row.name);
      }
    }

    Command::Serve => {
      let app = verdant_api::api_router(
        Arc::new(store),
        Arc::new(config.scoring.clone()),
      );

      tracing::info!("listening on http://{}", config.listen_addr);
      let listener = TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
      axum::serve(listener, app).await.context("server error")?;
    }
  }

  Ok(())
}

/// Build the variation index from the current set of active companies.
async fn load_index(
  store: &SqliteStore,
  generator: &NameVariationGenerator,
) -> anyhow::Result<Arc<VariationIndex>> {
  let companies = store.active_companies().await?;
  anyhow::ensure!(!companies.is_empty(), "no companies in store; run `verdant seed` first");
  Ok(Arc::new(VariationIndex::build(&companies, generator)?))
}
