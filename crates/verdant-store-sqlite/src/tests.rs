//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;
use verdant_core::{
  company::NewCompany,
  document::{Attribution, DocType, NewDocument, TopicRelevance},
  score::NewEsgScore,
  store::EsgStore,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn news_doc(title: &str, content: &str) -> NewDocument {
  NewDocument::new(
    DocType::News,
    title,
    content,
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
  )
}

fn neutral_score(company_id: Uuid) -> NewEsgScore {
  NewEsgScore {
    company_id,
    score_date:            Utc::now().date_naive(),
    environmental_score:   5.0,
    social_score:          5.0,
    governance_score:      5.0,
    composite_score:       5.0,
    sentiment_component:   5.0,
    controversy_component: 0.0,
    disclosure_component:  0.0,
    data_points_count:     0,
    confidence_level:      0.0,
    calculation_method:    "test".into(),
  }
}

// ─── Companies ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_creates_company_with_uppercase_symbol() {
  let s = store().await;

  let company = s
    .upsert_company(NewCompany::new("infy", "Infosys Limited", Some("IT")))
    .await
    .unwrap();
  assert_eq!(company.symbol, "INFY");
  assert!(company.is_active);

  let fetched = s.company(company.company_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Infosys Limited");
  assert_eq!(fetched.sector.as_deref(), Some("IT"));
}

#[tokio::test]
async fn upsert_same_symbol_keeps_id_and_refreshes_fields() {
  let s = store().await;

  let first = s
    .upsert_company(NewCompany::new("TCS", "Tata Consultancy", Some("IT")))
    .await
    .unwrap();
  let second = s
    .upsert_company(NewCompany::new(
      "TCS",
      "Tata Consultancy Services Limited",
      Some("IT Services"),
    ))
    .await
    .unwrap();

  assert_eq!(second.company_id, first.company_id);

  let fetched = s.company(first.company_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Tata Consultancy Services Limited");
  assert_eq!(fetched.sector.as_deref(), Some("IT Services"));

  // Still a single company.
  assert_eq!(s.active_companies().await.unwrap().len(), 1);
}

#[tokio::test]
async fn company_by_symbol_is_case_insensitive() {
  let s = store().await;
  s.upsert_company(NewCompany::new("INFY", "Infosys Limited", None))
    .await
    .unwrap();

  let found = s.company_by_symbol("infy").await.unwrap();
  assert!(found.is_some());
  assert!(s.company_by_symbol("ACME").await.unwrap().is_none());
}

#[tokio::test]
async fn company_missing_returns_none() {
  let s = store().await;
  assert!(s.company(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Documents ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn documents_enter_unattributed() {
  let s = store().await;

  let doc = s
    .add_document(news_doc("INFY results", "Infosys posts profit"))
    .await
    .unwrap();
  assert!(doc.company_id.is_none());
  assert!(doc.confidence_score.is_none());

  let pending = s.unattributed_documents(DocType::News, 10).await.unwrap();
  assert_eq!(pending.len(), 1);
  assert_eq!(pending[0].document_id, doc.document_id);

  assert!(s.attributed_documents(10).await.unwrap().is_empty());
}

#[tokio::test]
async fn unattributed_selection_filters_by_doc_type_and_limit() {
  let s = store().await;

  for i in 0..3 {
    s.add_document(news_doc(&format!("headline {i}"), "body"))
      .await
      .unwrap();
  }
  s.add_document(NewDocument::new(
    DocType::Filing,
    "annual report",
    "body",
    Utc::now(),
  ))
  .await
  .unwrap();

  assert_eq!(s.unattributed_documents(DocType::News, 10).await.unwrap().len(), 3);
  assert_eq!(s.unattributed_documents(DocType::News, 2).await.unwrap().len(), 2);
  assert_eq!(
    s.unattributed_documents(DocType::Filing, 10).await.unwrap().len(),
    1
  );
}

#[tokio::test]
async fn document_signals_roundtrip() {
  let s = store().await;

  let mut input = news_doc("signals", "body");
  input.sentiment_score = Some(0.4);
  input.esg_topics = Some(TopicRelevance::new(0.5, 0.1, 0.0));
  input.controversy_score = 4.0;

  let doc = s.add_document(input).await.unwrap();
  let fetched = &s.unattributed_documents(DocType::News, 1).await.unwrap()[0];

  assert_eq!(fetched.document_id, doc.document_id);
  assert_eq!(fetched.sentiment_score, Some(0.4));
  assert_eq!(fetched.esg_topics, Some(TopicRelevance::new(0.5, 0.1, 0.0)));
  assert_eq!(fetched.controversy_score, 4.0);
}

#[tokio::test]
async fn classifier_output_attaches_and_roundtrips() {
  use verdant_core::classify::{Classifier as _, KeywordClassifier};

  let s = store().await;
  let text = "carbon emission scandal draws a regulatory penalty";
  let input = news_doc("plant under scrutiny", text)
    .classified(KeywordClassifier.classify(text));
  let doc = s.add_document(input).await.unwrap();

  assert!(doc.sentiment_score.is_some());
  let topics = doc.esg_topics.unwrap();
  assert!(topics.environmental > 0.0);
  assert_eq!(doc.controversy_score, 4.0);

  let fetched = &s.unattributed_documents(DocType::News, 1).await.unwrap()[0];
  assert_eq!(fetched.esg_topics, doc.esg_topics);
  assert_eq!(fetched.controversy_score, doc.controversy_score);
}

#[tokio::test]
async fn documents_for_company_respects_cutoff() {
  let s = store().await;
  let company = s
    .upsert_company(NewCompany::new("INFY", "Infosys Limited", None))
    .await
    .unwrap();

  let recent = s.add_document(news_doc("recent", "body")).await.unwrap();
  let mut old = news_doc("old", "body");
  old.published_date = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
  let old = s.add_document(old).await.unwrap();

  s.apply_attributions(&[
    Attribution {
      document_id:      recent.document_id,
      company_id:       company.company_id,
      confidence_score: 0.95,
    },
    Attribution {
      document_id:      old.document_id,
      company_id:       company.company_id,
      confidence_score: 0.95,
    },
  ])
  .await
  .unwrap();

  let cutoff = recent.published_date - Duration::days(365);
  let windowed = s
    .documents_for_company(company.company_id, cutoff)
    .await
    .unwrap();
  assert_eq!(windowed.len(), 1);
  assert_eq!(windowed[0].document_id, recent.document_id);
}

// ─── Attribution writes ──────────────────────────────────────────────────────

#[tokio::test]
async fn apply_attributions_sets_both_fields_together() {
  let s = store().await;
  let company = s
    .upsert_company(NewCompany::new("INFY", "Infosys Limited", None))
    .await
    .unwrap();
  let doc = s.add_document(news_doc("INFY up", "body")).await.unwrap();

  s.apply_attributions(&[Attribution {
    document_id:      doc.document_id,
    company_id:       company.company_id,
    confidence_score: 0.95,
  }])
  .await
  .unwrap();

  let attributed = s.attributed_documents(10).await.unwrap();
  assert_eq!(attributed.len(), 1);
  assert_eq!(attributed[0].company_id, Some(company.company_id));
  assert_eq!(attributed[0].confidence_score, Some(0.95));

  // And it left the unattributed candidate set.
  assert!(s.unattributed_documents(DocType::News, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn apply_attributions_empty_batch_is_a_no_op() {
  let s = store().await;
  s.apply_attributions(&[]).await.unwrap();
}

#[tokio::test]
async fn attribution_batch_rolls_back_as_a_unit() {
  let s = store().await;
  let company = s
    .upsert_company(NewCompany::new("INFY", "Infosys Limited", None))
    .await
    .unwrap();
  let doc = s.add_document(news_doc("INFY up", "body")).await.unwrap();

  // Second attribution violates the companies foreign key, so the whole
  // batch must roll back, including the valid first write.
  let result = s
    .apply_attributions(&[
      Attribution {
        document_id:      doc.document_id,
        company_id:       company.company_id,
        confidence_score: 0.95,
      },
      Attribution {
        document_id:      doc.document_id,
        company_id:       Uuid::new_v4(),
        confidence_score: 0.9,
      },
    ])
    .await;

  assert!(result.is_err());
  assert!(s.attributed_documents(10).await.unwrap().is_empty());
}

// ─── Scores ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn latest_score_none_for_unscored_company() {
  let s = store().await;
  let company = s
    .upsert_company(NewCompany::new("INFY", "Infosys Limited", None))
    .await
    .unwrap();
  assert!(s.latest_score(company.company_id).await.unwrap().is_none());
}

#[tokio::test]
async fn score_rows_append_and_latest_wins_by_date() {
  let s = store().await;
  let company = s
    .upsert_company(NewCompany::new("INFY", "Infosys Limited", None))
    .await
    .unwrap();

  let mut early = neutral_score(company.company_id);
  early.score_date = early.score_date - Duration::days(30);
  early.composite_score = 4.0;
  s.insert_score(early).await.unwrap();

  let mut late = neutral_score(company.company_id);
  late.composite_score = 6.5;
  let late = s.insert_score(late).await.unwrap();

  let latest = s.latest_score(company.company_id).await.unwrap().unwrap();
  assert_eq!(latest.score_id, late.score_id);
  assert_eq!(latest.composite_score, 6.5);
  assert_eq!(latest.calculation_method, "test");
}

#[tokio::test]
async fn rescoring_same_day_appends_not_overwrites() {
  let s = store().await;
  let company = s
    .upsert_company(NewCompany::new("INFY", "Infosys Limited", None))
    .await
    .unwrap();

  let first = s.insert_score(neutral_score(company.company_id)).await.unwrap();
  let second = s.insert_score(neutral_score(company.company_id)).await.unwrap();
  assert_ne!(first.score_id, second.score_id);

  // Same score_date; the later insertion is the latest.
  let latest = s.latest_score(company.company_id).await.unwrap().unwrap();
  assert_eq!(latest.score_id, second.score_id);
}

// ─── Statistics ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn mention_counts_order_most_mentioned_first() {
  let s = store().await;
  let infy = s
    .upsert_company(NewCompany::new("INFY", "Infosys Limited", None))
    .await
    .unwrap();
  let tcs = s
    .upsert_company(NewCompany::new("TCS", "Tata Consultancy Services", None))
    .await
    .unwrap();

  let mut attributions = Vec::new();
  for i in 0..3 {
    let doc = s
      .add_document(news_doc(&format!("infy {i}"), "body"))
      .await
      .unwrap();
    attributions.push(Attribution {
      document_id:      doc.document_id,
      company_id:       infy.company_id,
      confidence_score: 0.95,
    });
  }
  let doc = s.add_document(news_doc("tcs", "body")).await.unwrap();
  attributions.push(Attribution {
    document_id:      doc.document_id,
    company_id:       tcs.company_id,
    confidence_score: 0.95,
  });
  s.apply_attributions(&attributions).await.unwrap();

  let counts = s.mention_counts().await.unwrap();
  assert_eq!(counts.len(), 2);
  assert_eq!(counts[0].symbol, "INFY");
  assert_eq!(counts[0].document_count, 3);
  assert_eq!(counts[1].symbol, "TCS");
  assert_eq!(counts[1].document_count, 1);
}
