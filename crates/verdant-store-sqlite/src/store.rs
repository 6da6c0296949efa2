//! [`SqliteStore`] — the SQLite implementation of [`EsgStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use verdant_core::{
  company::{Company, NewCompany},
  document::{Attribution, DocType, Document, NewDocument},
  score::{EsgScore, NewEsgScore},
  store::{EsgStore, MentionCount},
};

use crate::{
  encode::{
    encode_date, encode_doc_type, encode_dt, encode_topics, encode_uuid,
    RawCompany, RawDocument, RawEsgScore,
  },
  schema::SCHEMA,
  Error, Result,
};

const COMPANY_COLUMNS: &str =
  "company_id, symbol, name, sector, is_active, created_at";

const DOCUMENT_COLUMNS: &str = "document_id, company_id, doc_type, title, \
   content, published_date, sentiment_score, esg_topics, controversy_score, \
   confidence_score, created_at";

const SCORE_COLUMNS: &str = "score_id, company_id, score_date, \
   environmental_score, social_score, governance_score, composite_score, \
   sentiment_component, controversy_component, disclosure_component, \
   data_points_count, confidence_level, calculation_method, created_at";

fn company_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawCompany> {
  Ok(RawCompany {
    company_id: row.get(0)?,
    symbol:     row.get(1)?,
    name:       row.get(2)?,
    sector:     row.get(3)?,
    is_active:  row.get(4)?,
    created_at: row.get(5)?,
  })
}

fn document_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDocument> {
  Ok(RawDocument {
    document_id:       row.get(0)?,
    company_id:        row.get(1)?,
    doc_type:          row.get(2)?,
    title:             row.get(3)?,
    content:           row.get(4)?,
    published_date:    row.get(5)?,
    sentiment_score:   row.get(6)?,
    esg_topics:        row.get(7)?,
    controversy_score: row.get(8)?,
    confidence_score:  row.get(9)?,
    created_at:        row.get(10)?,
  })
}

fn score_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawEsgScore> {
  Ok(RawEsgScore {
    score_id:              row.get(0)?,
    company_id:            row.get(1)?,
    score_date:            row.get(2)?,
    environmental_score:   row.get(3)?,
    social_score:          row.get(4)?,
    governance_score:      row.get(5)?,
    composite_score:       row.get(6)?,
    sentiment_component:   row.get(7)?,
    controversy_component: row.get(8)?,
    disclosure_component:  row.get(9)?,
    data_points_count:     row.get(10)?,
    confidence_level:      row.get(11)?,
    calculation_method:    row.get(12)?,
    created_at:            row.get(13)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Verdant ESG store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn documents_where(
    &self,
    condition: &'static str,
    params: Vec<Box<dyn rusqlite::ToSql + Send>>,
  ) -> Result<Vec<Document>> {
    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE {condition}"
        );
        let mut stmt = conn.prepare(&sql)?;
        let params_ref: Vec<&dyn rusqlite::ToSql> =
          params.iter().map(|p| p.as_ref() as &dyn rusqlite::ToSql).collect();
        let rows = stmt
          .query_map(params_ref.as_slice(), document_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }
}

// ─── EsgStore impl ───────────────────────────────────────────────────────────

impl EsgStore for SqliteStore {
  type Error = Error;

  // ── Companies ─────────────────────────────────────────────────────────────

  async fn upsert_company(&self, input: NewCompany) -> Result<Company> {
    let candidate = Company {
      company_id: Uuid::new_v4(),
      symbol:     input.symbol.to_uppercase(),
      name:       input.name,
      sector:     input.sector,
      is_active:  true,
      created_at: Utc::now(),
    };

    let id_str  = encode_uuid(candidate.company_id);
    let at_str  = encode_dt(candidate.created_at);
    let symbol  = candidate.symbol.clone();
    let name    = candidate.name.clone();
    let sector  = candidate.sector.clone();

    let existing: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        let existing: Option<(String, String)> = conn
          .query_row(
            "SELECT company_id, created_at FROM companies WHERE symbol = ?1",
            rusqlite::params![symbol],
            |r| Ok((r.get(0)?, r.get(1)?)),
          )
          .optional()?;

        match &existing {
          Some((existing_id, _)) => {
            conn.execute(
              "UPDATE companies SET name = ?2, sector = ?3, is_active = 1
               WHERE company_id = ?1",
              rusqlite::params![existing_id, name, sector],
            )?;
          }
          None => {
            conn.execute(
              "INSERT INTO companies (company_id, symbol, name, sector, is_active, created_at)
               VALUES (?1, ?2, ?3, ?4, 1, ?5)",
              rusqlite::params![id_str, symbol, name, sector, at_str],
            )?;
          }
        }
        Ok(existing)
      })
      .await?;

    match existing {
      Some((id, created)) => Ok(Company {
        company_id: crate::encode::decode_uuid(&id)?,
        created_at: crate::encode::decode_dt(&created)?,
        ..candidate
      }),
      None => Ok(candidate),
    }
  }

  async fn company(&self, id: Uuid) -> Result<Option<Company>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawCompany> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {COMPANY_COLUMNS} FROM companies WHERE company_id = ?1"
              ),
              rusqlite::params![id_str],
              company_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCompany::into_company).transpose()
  }

  async fn company_by_symbol(&self, symbol: &str) -> Result<Option<Company>> {
    let symbol = symbol.to_uppercase();

    let raw: Option<RawCompany> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {COMPANY_COLUMNS} FROM companies WHERE symbol = ?1"
              ),
              rusqlite::params![symbol],
              company_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCompany::into_company).transpose()
  }

  async fn active_companies(&self) -> Result<Vec<Company>> {
    let raws: Vec<RawCompany> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COMPANY_COLUMNS} FROM companies WHERE is_active = 1"
        ))?;
        let rows = stmt
          .query_map([], company_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCompany::into_company).collect()
  }

  // ── Documents ─────────────────────────────────────────────────────────────

  async fn add_document(&self, input: NewDocument) -> Result<Document> {
    let document = Document {
      document_id:       Uuid::new_v4(),
      company_id:        None,
      doc_type:          input.doc_type,
      title:             input.title,
      content:           input.content,
      published_date:    input.published_date,
      sentiment_score:   input.sentiment_score,
      esg_topics:        input.esg_topics,
      controversy_score: input.controversy_score,
      confidence_score:  None,
      created_at:        Utc::now(),
    };

    let id_str        = encode_uuid(document.document_id);
    let doc_type      = encode_doc_type(document.doc_type).to_owned();
    let title         = document.title.clone();
    let content       = document.content.clone();
    let published_str = encode_dt(document.published_date);
    let sentiment     = document.sentiment_score;
    let topics_str    = document
      .esg_topics
      .as_ref()
      .map(encode_topics)
      .transpose()?;
    let controversy   = document.controversy_score;
    let created_str   = encode_dt(document.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents (
             document_id, company_id, doc_type, title, content,
             published_date, sentiment_score, esg_topics,
             controversy_score, confidence_score, created_at
           ) VALUES (?1, NULL, ?2, ?3, ?4, ?5, ?6, ?7, ?8, NULL, ?9)",
          rusqlite::params![
            id_str,
            doc_type,
            title,
            content,
            published_str,
            sentiment,
            topics_str,
            controversy,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(document)
  }

  async fn unattributed_documents(
    &self,
    doc_type: DocType,
    limit: usize,
  ) -> Result<Vec<Document>> {
    self
      .documents_where(
        "doc_type = ?1 AND company_id IS NULL LIMIT ?2",
        vec![
          Box::new(encode_doc_type(doc_type).to_owned()),
          Box::new(limit as i64),
        ],
      )
      .await
  }

  async fn attributed_documents(&self, limit: usize) -> Result<Vec<Document>> {
    self
      .documents_where(
        "company_id IS NOT NULL LIMIT ?1",
        vec![Box::new(limit as i64)],
      )
      .await
  }

  async fn documents_for_company(
    &self,
    company_id: Uuid,
    since: DateTime<Utc>,
  ) -> Result<Vec<Document>> {
    // RFC 3339 UTC strings order lexicographically, so string comparison
    // is date comparison here.
    self
      .documents_where(
        "company_id = ?1 AND published_date >= ?2",
        vec![Box::new(encode_uuid(company_id)), Box::new(encode_dt(since))],
      )
      .await
  }

  // ── Attribution writes ────────────────────────────────────────────────────

  async fn apply_attributions(
    &self,
    attributions: &[Attribution],
  ) -> Result<()> {
    let rows: Vec<(String, String, f64)> = attributions
      .iter()
      .map(|a| {
        (
          encode_uuid(a.document_id),
          encode_uuid(a.company_id),
          a.confidence_score,
        )
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        // One transaction for the whole batch: dropping the transaction
        // on an early `?` return rolls every attribution back.
        let tx = conn.transaction()?;
        for (document_id, company_id, confidence) in &rows {
          tx.execute(
            "UPDATE documents SET company_id = ?2, confidence_score = ?3
             WHERE document_id = ?1",
            rusqlite::params![document_id, company_id, confidence],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Scores — append-only writes ───────────────────────────────────────────

  async fn insert_score(&self, input: NewEsgScore) -> Result<EsgScore> {
    let score = EsgScore {
      score_id:              Uuid::new_v4(),
      company_id:            input.company_id,
      score_date:            input.score_date,
      environmental_score:   input.environmental_score,
      social_score:          input.social_score,
      governance_score:      input.governance_score,
      composite_score:       input.composite_score,
      sentiment_component:   input.sentiment_component,
      controversy_component: input.controversy_component,
      disclosure_component:  input.disclosure_component,
      data_points_count:     input.data_points_count,
      confidence_level:      input.confidence_level,
      calculation_method:    input.calculation_method,
      created_at:            Utc::now(),
    };

    let id_str      = encode_uuid(score.score_id);
    let company_str = encode_uuid(score.company_id);
    let date_str    = encode_date(score.score_date);
    let created_str = encode_dt(score.created_at);
    let method      = score.calculation_method.clone();
    let (e, s, g, composite) = (
      score.environmental_score,
      score.social_score,
      score.governance_score,
      score.composite_score,
    );
    let (sentiment, controversy, disclosure) = (
      score.sentiment_component,
      score.controversy_component,
      score.disclosure_component,
    );
    let (data_points, confidence) =
      (score.data_points_count, score.confidence_level);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO esg_scores (
             score_id, company_id, score_date,
             environmental_score, social_score, governance_score,
             composite_score, sentiment_component, controversy_component,
             disclosure_component, data_points_count, confidence_level,
             calculation_method, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
          rusqlite::params![
            id_str,
            company_str,
            date_str,
            e,
            s,
            g,
            composite,
            sentiment,
            controversy,
            disclosure,
            data_points,
            confidence,
            method,
            created_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(score)
  }

  async fn latest_score(&self, company_id: Uuid) -> Result<Option<EsgScore>> {
    let company_str = encode_uuid(company_id);

    let raw: Option<RawEsgScore> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SCORE_COLUMNS} FROM esg_scores
                 WHERE company_id = ?1
                 ORDER BY score_date DESC, created_at DESC
                 LIMIT 1"
              ),
              rusqlite::params![company_str],
              score_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEsgScore::into_score).transpose()
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  async fn mention_counts(&self) -> Result<Vec<MentionCount>> {
    let counts: Vec<MentionCount> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT c.symbol, c.name, COUNT(d.document_id) AS document_count
           FROM companies c
           LEFT JOIN documents d ON d.company_id = c.company_id
           GROUP BY c.company_id, c.symbol, c.name
           ORDER BY COUNT(d.document_id) DESC, c.symbol",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(MentionCount {
              symbol:         row.get(0)?,
              name:           row.get(1)?,
              document_count: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(counts)
  }
}
