//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Sumi-Indexer database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Registered domains and the protocol they answered on
CREATE TABLE IF NOT EXISTS domains (
    domain_id INTEGER PRIMARY KEY AUTOINCREMENT,
    domain TEXT NOT NULL UNIQUE,
    is_https INTEGER NOT NULL,
    registered_at TEXT NOT NULL
);

-- One row per successfully indexed page
CREATE TABLE IF NOT EXISTS pages (
    page_id INTEGER PRIMARY KEY AUTOINCREMENT,
    domain_id INTEGER NOT NULL REFERENCES domains(domain_id),
    url_path TEXT NOT NULL,
    indexed_at TEXT NOT NULL,
    UNIQUE(domain_id, url_path)
);

CREATE INDEX IF NOT EXISTS idx_pages_domain ON pages(domain_id);

-- Term dictionary; idf is reserved for ranking and never computed here
CREATE TABLE IF NOT EXISTS terms (
    term_id INTEGER PRIMARY KEY AUTOINCREMENT,
    term TEXT NOT NULL UNIQUE,
    document_frequency INTEGER NOT NULL DEFAULT 0,
    idf REAL NOT NULL DEFAULT 0.0
);

-- Postings
CREATE TABLE IF NOT EXISTS page_terms (
    page_id INTEGER NOT NULL REFERENCES pages(page_id),
    term_id INTEGER NOT NULL REFERENCES terms(term_id),
    term_frequency INTEGER NOT NULL,
    UNIQUE(page_id, term_id)
);

CREATE INDEX IF NOT EXISTS idx_page_terms_term ON page_terms(term_id);

-- Memoized word -> stem results
CREATE TABLE IF NOT EXISTS stems (
    word TEXT NOT NULL UNIQUE,
    stem TEXT NOT NULL
);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
