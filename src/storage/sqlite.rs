//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{DomainRecord, PageRecord, PageTermRecord, TermCounts, TermRecord};
use crate::IndexerError;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(IndexerError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, IndexerError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, IndexerError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Maps uniqueness failures to `ConstraintViolation`, everything else to `Sqlite`
fn constraint_or_sqlite(err: rusqlite::Error, what: impl FnOnce() -> String) -> StorageError {
    match err {
        rusqlite::Error::SqliteFailure(ref inner, _) if inner.code == ErrorCode::ConstraintViolation => {
            StorageError::ConstraintViolation(what())
        }
        other => StorageError::Sqlite(other),
    }
}

fn count(conn: &Connection, sql: &str) -> StorageResult<u64> {
    let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
    Ok(count as u64)
}

impl Storage for SqliteStorage {
    fn ping(&self) -> StorageResult<()> {
        let _: i64 = self.conn.query_row("SELECT 1", [], |row| row.get(0))?;
        Ok(())
    }

    // ===== Domains =====

    fn find_domain(&self, domain: &str) -> StorageResult<Option<DomainRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT domain_id, domain, is_https, registered_at FROM domains WHERE domain = ?1",
                params![domain],
                |row| {
                    Ok(DomainRecord {
                        id: row.get(0)?,
                        domain: row.get(1)?,
                        is_https: row.get(2)?,
                        registered_at: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    fn insert_domain(&mut self, domain: &str, is_https: bool) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn
            .execute(
                "INSERT INTO domains (domain, is_https, registered_at) VALUES (?1, ?2, ?3)",
                params![domain, is_https, now],
            )
            .map_err(|e| constraint_or_sqlite(e, || format!("domain {} already registered", domain)))?;

        Ok(self.conn.last_insert_rowid())
    }

    // ===== Pages =====

    fn page_exists(&self, domain: &str, path: &str) -> StorageResult<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (
                SELECT 1 FROM pages p
                JOIN domains d ON d.domain_id = p.domain_id
                WHERE d.domain = ?1 AND p.url_path = ?2
            )",
            params![domain, path],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn find_page(&self, domain_id: i64, path: &str) -> StorageResult<Option<PageRecord>> {
        let page = self
            .conn
            .query_row(
                "SELECT page_id, domain_id, url_path, indexed_at FROM pages
                 WHERE domain_id = ?1 AND url_path = ?2",
                params![domain_id, path],
                |row| {
                    Ok(PageRecord {
                        id: row.get(0)?,
                        domain_id: row.get(1)?,
                        url_path: row.get(2)?,
                        indexed_at: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(page)
    }

    fn index_page(
        &mut self,
        domain_id: i64,
        path: &str,
        terms: &TermCounts,
    ) -> StorageResult<i64> {
        // Dropping `tx` on any early return rolls the whole page back.
        let tx = self.conn.transaction()?;

        let now = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO pages (domain_id, url_path, indexed_at) VALUES (?1, ?2, ?3)",
            params![domain_id, path, now],
        )
        .map_err(|e| {
            constraint_or_sqlite(e, || {
                format!("page {} rejected for domain {}", path, domain_id)
            })
        })?;

        let page_id: i64 = tx.query_row(
            "SELECT page_id FROM pages WHERE domain_id = ?1 AND url_path = ?2",
            params![domain_id, path],
            |row| row.get(0),
        )?;

        {
            let mut upsert_term = tx.prepare_cached(
                "INSERT INTO terms (term, document_frequency, idf) VALUES (?1, 1, 0.0)
                 ON CONFLICT(term) DO UPDATE SET document_frequency = document_frequency + 1
                 RETURNING term_id",
            )?;
            let mut insert_posting = tx.prepare_cached(
                "INSERT INTO page_terms (page_id, term_id, term_frequency) VALUES (?1, ?2, ?3)",
            )?;

            for (term, frequency) in terms {
                let term_id: i64 = upsert_term.query_row(params![term], |row| row.get(0))?;
                insert_posting.execute(params![page_id, term_id, frequency])?;
            }
        }

        tx.commit()?;
        Ok(page_id)
    }

    // ===== Terms =====

    fn find_term(&self, term: &str) -> StorageResult<Option<TermRecord>> {
        let record = self
            .conn
            .query_row(
                "SELECT term_id, term, document_frequency, idf FROM terms WHERE term = ?1",
                params![term],
                |row| {
                    Ok(TermRecord {
                        id: row.get(0)?,
                        term: row.get(1)?,
                        document_frequency: row.get(2)?,
                        idf: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(record)
    }

    fn page_terms(&self, page_id: i64) -> StorageResult<Vec<PageTermRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT pt.page_id, pt.term_id, t.term, pt.term_frequency
             FROM page_terms pt JOIN terms t ON t.term_id = pt.term_id
             WHERE pt.page_id = ?1
             ORDER BY t.term",
        )?;

        let postings = stmt
            .query_map(params![page_id], |row| {
                Ok(PageTermRecord {
                    page_id: row.get(0)?,
                    term_id: row.get(1)?,
                    term: row.get(2)?,
                    term_frequency: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(postings)
    }

    fn top_terms(&self, limit: usize) -> StorageResult<Vec<TermRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT term_id, term, document_frequency, idf FROM terms
             ORDER BY document_frequency DESC, term ASC
             LIMIT ?1",
        )?;

        let terms = stmt
            .query_map(params![limit as i64], |row| {
                Ok(TermRecord {
                    id: row.get(0)?,
                    term: row.get(1)?,
                    document_frequency: row.get(2)?,
                    idf: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(terms)
    }

    // ===== Stems =====

    fn find_stem(&self, word: &str) -> StorageResult<Option<String>> {
        let stem = self
            .conn
            .query_row(
                "SELECT stem FROM stems WHERE word = ?1",
                params![word],
                |row| row.get(0),
            )
            .optional()?;
        Ok(stem)
    }

    fn insert_stem(&mut self, word: &str, stem: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO stems (word, stem) VALUES (?1, ?2)",
            params![word, stem],
        )?;
        Ok(())
    }

    // ===== Statistics =====

    fn count_domains(&self) -> StorageResult<u64> {
        count(&self.conn, "SELECT COUNT(*) FROM domains")
    }

    fn count_pages(&self) -> StorageResult<u64> {
        count(&self.conn, "SELECT COUNT(*) FROM pages")
    }

    fn count_terms(&self) -> StorageResult<u64> {
        count(&self.conn, "SELECT COUNT(*) FROM terms")
    }

    fn count_page_terms(&self) -> StorageResult<u64> {
        count(&self.conn, "SELECT COUNT(*) FROM page_terms")
    }

    fn count_stems(&self) -> StorageResult<u64> {
        count(&self.conn, "SELECT COUNT(*) FROM stems")
    }
}
