//! SQL schema for the Verdant SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS companies (
    company_id  TEXT PRIMARY KEY,
    symbol      TEXT NOT NULL UNIQUE,  -- uppercase ticker
    name        TEXT NOT NULL,
    sector      TEXT,                  -- free-text weighting key
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT NOT NULL
);

-- Documents are created unattributed. Attribution writes company_id and
-- confidence_score exactly once; nothing is ever deleted.
CREATE TABLE IF NOT EXISTS documents (
    document_id       TEXT PRIMARY KEY,
    company_id        TEXT REFERENCES companies(company_id),
    doc_type          TEXT NOT NULL,   -- 'news' | 'filing' | 'regulatory'
    title             TEXT NOT NULL,
    content           TEXT NOT NULL,
    published_date    TEXT NOT NULL,   -- ISO 8601 UTC
    sentiment_score   REAL,            -- [-1, 1], classifier output
    esg_topics        TEXT,            -- JSON {\"E\":..,\"S\":..,\"G\":..}
    controversy_score REAL NOT NULL DEFAULT 0,
    confidence_score  REAL,            -- set together with company_id
    created_at        TEXT NOT NULL
);

-- Score rows are strictly append-only. A new run for the same
-- (company_id, score_date) appends another row; history is never updated.
CREATE TABLE IF NOT EXISTS esg_scores (
    score_id              TEXT PRIMARY KEY,
    company_id            TEXT NOT NULL REFERENCES companies(company_id),
    score_date            TEXT NOT NULL,   -- YYYY-MM-DD
    environmental_score   REAL NOT NULL,
    social_score          REAL NOT NULL,
    governance_score      REAL NOT NULL,
    composite_score       REAL NOT NULL,
    sentiment_component   REAL NOT NULL,
    controversy_component REAL NOT NULL,
    disclosure_component  REAL NOT NULL,
    data_points_count     INTEGER NOT NULL,
    confidence_level      REAL NOT NULL,
    calculation_method    TEXT NOT NULL,
    created_at            TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS documents_company_idx   ON documents(company_id);
CREATE INDEX IF NOT EXISTS documents_type_idx      ON documents(doc_type);
CREATE INDEX IF NOT EXISTS documents_published_idx ON documents(published_date);
CREATE INDEX IF NOT EXISTS esg_scores_company_idx  ON esg_scores(company_id, score_date);

PRAGMA user_version = 1;
";
