/*!
 * Repository layer for database operations.
 *
 * This module provides a high-level API for all database operations,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};

use super::connection::DatabaseConnection;
use super::models::{
    CacheRecord, SessionRecord, SessionStatus, SourceEntryRecord, TranslatedEntryRecord,
    TranslationStatus, ValidationResultRecord, ValidationType,
};

/// Repository for database operations
#[derive(Clone)]
pub struct Repository {
    /// Database connection
    db: DatabaseConnection,
}

impl Repository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    // =========================================================================
    // Session Operations
    // =========================================================================

    /// Create a new translation session
    pub async fn create_session(&self, session: &SessionRecord) -> Result<()> {
        let session = session.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO sessions (
                        id, source_file_path, source_file_hash, source_language, target_language,
                        provider, model, total_entries, completed_entries, status,
                        created_at, updated_at, completed_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                    "#,
                    params![
                        session.id,
                        session.source_file_path,
                        session.source_file_hash,
                        session.source_language,
                        session.target_language,
                        session.provider,
                        session.model,
                        session.total_entries,
                        session.completed_entries,
                        session.status.to_string(),
                        session.created_at,
                        session.updated_at,
                        session.completed_at,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Get a session by ID
    pub async fn get_session(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let session_id = session_id.to_string();

        self.db
            .execute_async(move |conn| {
                Self::get_session_sync(conn, &session_id)
            })
            .await
    }

    /// Get a session by ID (synchronous version for use within transactions)
    fn get_session_sync(conn: &Connection, session_id: &str) -> Result<Option<SessionRecord>> {
        let result = conn
            .query_row(
                r#"
                SELECT id, source_file_path, source_file_hash, source_language, target_language,
                       provider, model, total_entries, completed_entries, status,
                       created_at, updated_at, completed_at
                FROM sessions WHERE id = ?1
                "#,
                [session_id],
                |row| {
                    Ok(SessionRecord {
                        id: row.get(0)?,
                        source_file_path: row.get(1)?,
                        source_file_hash: row.get(2)?,
                        source_language: row.get(3)?,
                        target_language: row.get(4)?,
                        provider: row.get(5)?,
                        model: row.get(6)?,
                        total_entries: row.get(7)?,
                        completed_entries: row.get(8)?,
                        status: row
                            .get::<_, String>(9)?
                            .parse()
                            .unwrap_or(SessionStatus::InProgress),
                        created_at: row.get(10)?,
                        updated_at: row.get(11)?,
                        completed_at: row.get(12)?,
                    })
                },
            )
            .optional()?;

        Ok(result)
    }

    /// Find a resumable session for the given file and language pair
    pub async fn find_resumable_session(
        &self,
        source_file_hash: &str,
        source_language: &str,
        target_language: &str,
        provider: &str,
        model: &str,
    ) -> Result<Option<SessionRecord>> {
        let source_file_hash = source_file_hash.to_string();
        let source_language = source_language.to_string();
        let target_language = target_language.to_string();
        let provider = provider.to_string();
        let model = model.to_string();

        self.db
            .execute_async(move |conn| {
                let result = conn
                    .query_row(
                        r#"
                        SELECT id, source_file_path, source_file_hash, source_language, target_language,
                               provider, model, total_entries, completed_entries, status,
                               created_at, updated_at, completed_at
                        FROM sessions
                        WHERE source_file_hash = ?1
                          AND source_language = ?2
                          AND target_language = ?3
                          AND provider = ?4
                          AND model = ?5
                          AND status IN ('in_progress', 'paused')
                        ORDER BY updated_at DESC
                        LIMIT 1
                        "#,
                        params![source_file_hash, source_language, target_language, provider, model],
                        |row| {
                            Ok(SessionRecord {
                                id: row.get(0)?,
                                source_file_path: row.get(1)?,
                                source_file_hash: row.get(2)?,
                                source_language: row.get(3)?,
                                target_language: row.get(4)?,
                                provider: row.get(5)?,
                                model: row.get(6)?,
                                total_entries: row.get(7)?,
                                completed_entries: row.get(8)?,
                                status: row
                                    .get::<_, String>(9)?
                                    .parse()
                                    .unwrap_or(SessionStatus::InProgress),
                                created_at: row.get(10)?,
                                updated_at: row.get(11)?,
                                completed_at: row.get(12)?,
                            })
                        },
                    )
                    .optional()?;

                Ok(result)
            })
            .await
    }

    /// Update session status
    pub async fn update_session_status(
        &self,
        session_id: &str,
        status: SessionStatus,
    ) -> Result<()> {
        let session_id = session_id.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                let completed_at = if status == SessionStatus::Completed {
                    Some(now.clone())
                } else {
                    None
                };

                conn.execute(
                    r#"
                    UPDATE sessions
                    SET status = ?1, updated_at = ?2, completed_at = COALESCE(?3, completed_at)
                    WHERE id = ?4
                    "#,
                    params![status.to_string(), now, completed_at, session_id],
                )?;
                Ok(())
            })
            .await
    }

    /// Update session progress
    pub async fn update_session_progress(
        &self,
        session_id: &str,
        completed_entries: i64,
    ) -> Result<()> {
        let session_id = session_id.to_string();
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "UPDATE sessions SET completed_entries = ?1, updated_at = ?2 WHERE id = ?3",
                    params![completed_entries, now, session_id],
                )?;
                Ok(())
            })
            .await
    }

    /// List all sessions with optional status filter
    pub async fn list_sessions(
        &self,
        status_filter: Option<SessionStatus>,
    ) -> Result<Vec<SessionRecord>> {
        self.db
            .execute_async(move |conn| {
                // Helper function to parse a session row
                fn parse_session_row(row: &rusqlite::Row) -> rusqlite::Result<SessionRecord> {
                    Ok(SessionRecord {
                        id: row.get(0)?,
                        source_file_path: row.get(1)?,
                        source_file_hash: row.get(2)?,
                        source_language: row.get(3)?,
                        target_language: row.get(4)?,
                        provider: row.get(5)?,
                        model: row.get(6)?,
                        total_entries: row.get(7)?,
                        completed_entries: row.get(8)?,
                        status: row
                            .get::<_, String>(9)?
                            .parse()
                            .unwrap_or(SessionStatus::InProgress),
                        created_at: row.get(10)?,
                        updated_at: row.get(11)?,
                        completed_at: row.get(12)?,
                    })
                }

                let sessions: Vec<SessionRecord> = if let Some(status) = status_filter {
                    let mut stmt = conn.prepare(
                        r#"
                        SELECT id, source_file_path, source_file_hash, source_language, target_language,
                               provider, model, total_entries, completed_entries, status,
                               created_at, updated_at, completed_at
                        FROM sessions
                        WHERE status = ?1
                        ORDER BY updated_at DESC
                        "#,
                    )?;
                    stmt.query_map([status.to_string()], parse_session_row)?
                        .filter_map(|r| r.ok())
                        .collect()
                } else {
                    let mut stmt = conn.prepare(
                        r#"
                        SELECT id, source_file_path, source_file_hash, source_language, target_language,
                               provider, model, total_entries, completed_entries, status,
                               created_at, updated_at, completed_at
                        FROM sessions
                        ORDER BY updated_at DESC
                        "#,
                    )?;
                    stmt.query_map([], parse_session_row)?
                        .filter_map(|r| r.ok())
                        .collect()
                };

                Ok(sessions)
            })
            .await
    }

    /// Delete a session and all related data
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        let session_id = session_id.to_string();

        self.db
            .execute_async(move |conn| {
                // Due to CASCADE, deleting the session will delete related entries
                conn.execute("DELETE FROM sessions WHERE id = ?1", [&session_id])?;
                Ok(())
            })
            .await
    }

    /// Delete sessions older than the specified number of days
    pub async fn delete_old_sessions(&self, days: i64) -> Result<i64> {
        self.db
            .execute_async(move |conn| {
                let deleted = conn.execute(
                    r#"
                    DELETE FROM sessions
                    WHERE created_at < datetime('now', '-' || ?1 || ' days')
                    "#,
                    [days],
                )?;
                Ok(deleted as i64)
            })
            .await
    }

    // =========================================================================
    // Source Entry Operations
    // =========================================================================

    /// Insert source entries for a session (batch insert)
    pub async fn insert_source_entries(&self, entries: Vec<SourceEntryRecord>) -> Result<()> {
        self.db
            .transaction_async(move |tx| {
                for entry in entries {
                    tx.execute(
                        r#"
                        INSERT INTO source_entries (session_id, seq_num, start_time_ms, end_time_ms, source_text)
                        VALUES (?1, ?2, ?3, ?4, ?5)
                        "#,
                        params![
                            entry.session_id,
                            entry.seq_num,
                            entry.start_time_ms,
                            entry.end_time_ms,
                            entry.source_text,
                        ],
                    )?;
                }
                Ok(())
            })
            .await
    }

    /// Get all source entries for a session
    pub async fn get_source_entries(&self, session_id: &str) -> Result<Vec<SourceEntryRecord>> {
        let session_id = session_id.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, session_id, seq_num, start_time_ms, end_time_ms, source_text
                    FROM source_entries
                    WHERE session_id = ?1
                    ORDER BY seq_num
                    "#,
                )?;

                let rows = stmt.query_map([&session_id], |row| {
                    Ok(SourceEntryRecord {
                        id: row.get(0)?,
                        session_id: row.get(1)?,
                        seq_num: row.get(2)?,
                        start_time_ms: row.get(3)?,
                        end_time_ms: row.get(4)?,
                        source_text: row.get(5)?,
                    })
                })?;

                let entries: Vec<SourceEntryRecord> = rows.filter_map(|r| r.ok()).collect();
                Ok(entries)
            })
            .await
    }

    /// Get pending source entries (not yet translated or marked for retry)
    pub async fn get_pending_entries(&self, session_id: &str) -> Result<Vec<SourceEntryRecord>> {
        let session_id = session_id.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT se.id, se.session_id, se.seq_num, se.start_time_ms, se.end_time_ms, se.source_text
                    FROM source_entries se
                    LEFT JOIN translated_entries te ON se.id = te.source_entry_id
                    WHERE se.session_id = ?1
                      AND (te.id IS NULL OR te.translation_status IN ('pending', 'retry', 'failed'))
                    ORDER BY se.seq_num
                    "#,
                )?;

                let rows = stmt.query_map([&session_id], |row| {
                    Ok(SourceEntryRecord {
                        id: row.get(0)?,
                        session_id: row.get(1)?,
                        seq_num: row.get(2)?,
                        start_time_ms: row.get(3)?,
                        end_time_ms: row.get(4)?,
                        source_text: row.get(5)?,
                    })
                })?;

                let entries: Vec<SourceEntryRecord> = rows.filter_map(|r| r.ok()).collect();
                Ok(entries)
            })
            .await
    }

    // =========================================================================
    // Translated Entry Operations
    // =========================================================================

    /// Insert or update a translated entry
    pub async fn upsert_translated_entry(&self, entry: &TranslatedEntryRecord) -> Result<i64> {
        let entry = entry.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO translated_entries (
                        source_entry_id, translated_text, translation_status,
                        quality_score, validation_errors, attempt_count, created_at, updated_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    ON CONFLICT(source_entry_id) DO UPDATE SET
                        translated_text = excluded.translated_text,
                        translation_status = excluded.translation_status,
                        quality_score = excluded.quality_score,
                        validation_errors = excluded.validation_errors,
                        attempt_count = translated_entries.attempt_count + 1,
                        updated_at = excluded.updated_at
                    "#,
                    params![
                        entry.source_entry_id,
                        entry.translated_text,
                        entry.translation_status.to_string(),
                        entry.quality_score,
                        entry.validation_errors,
                        entry.attempt_count,
                        entry.created_at,
                        entry.updated_at,
                    ],
                )?;

                Ok(conn.last_insert_rowid())
            })
            .await
    }

    /// Batch insert translated entries
    pub async fn insert_translated_entries(&self, entries: Vec<TranslatedEntryRecord>) -> Result<()> {
        self.db
            .transaction_async(move |tx| {
                for entry in entries {
                    tx.execute(
                        r#"
                        INSERT INTO translated_entries (
                            source_entry_id, translated_text, translation_status,
                            quality_score, validation_errors, attempt_count, created_at, updated_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                        ON CONFLICT(source_entry_id) DO UPDATE SET
                            translated_text = excluded.translated_text,
                            translation_status = excluded.translation_status,
                            quality_score = excluded.quality_score,
                            validation_errors = excluded.validation_errors,
                            attempt_count = translated_entries.attempt_count + 1,
                            updated_at = excluded.updated_at
                        "#,
                        params![
                            entry.source_entry_id,
                            entry.translated_text,
                            entry.translation_status.to_string(),
                            entry.quality_score,
                            entry.validation_errors,
                            entry.attempt_count,
                            entry.created_at,
                            entry.updated_at,
                        ],
                    )?;
                }
                Ok(())
            })
            .await
    }

    /// Get all translated entries for a session
    pub async fn get_translated_entries(
        &self,
        session_id: &str,
    ) -> Result<Vec<(SourceEntryRecord, TranslatedEntryRecord)>> {
        let session_id = session_id.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT 
                        se.id, se.session_id, se.seq_num, se.start_time_ms, se.end_time_ms, se.source_text,
                        te.id, te.source_entry_id, te.translated_text, te.translation_status,
                        te.quality_score, te.validation_errors, te.attempt_count, te.created_at, te.updated_at
                    FROM source_entries se
                    INNER JOIN translated_entries te ON se.id = te.source_entry_id
                    WHERE se.session_id = ?1
                    ORDER BY se.seq_num
                    "#,
                )?;

                let rows = stmt.query_map([&session_id], |row| {
                    Ok((
                        SourceEntryRecord {
                            id: row.get(0)?,
                            session_id: row.get(1)?,
                            seq_num: row.get(2)?,
                            start_time_ms: row.get(3)?,
                            end_time_ms: row.get(4)?,
                            source_text: row.get(5)?,
                        },
                        TranslatedEntryRecord {
                            id: row.get(6)?,
                            source_entry_id: row.get(7)?,
                            translated_text: row.get(8)?,
                            translation_status: row
                                .get::<_, String>(9)?
                                .parse()
                                .unwrap_or(TranslationStatus::Pending),
                            quality_score: row.get(10)?,
                            validation_errors: row.get(11)?,
                            attempt_count: row.get(12)?,
                            created_at: row.get(13)?,
                            updated_at: row.get(14)?,
                        },
                    ))
                })?;

                let entries: Vec<_> = rows.filter_map(|r| r.ok()).collect();
                Ok(entries)
            })
            .await
    }

    /// Update translation status for an entry
    pub async fn update_translation_status(
        &self,
        translated_entry_id: i64,
        status: TranslationStatus,
    ) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    "UPDATE translated_entries SET translation_status = ?1, updated_at = ?2 WHERE id = ?3",
                    params![status.to_string(), now, translated_entry_id],
                )?;
                Ok(())
            })
            .await
    }

    // =========================================================================
    // Cache Operations
    // =========================================================================

    /// Compute SHA256 hash of text
    pub fn hash_text(text: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Get a cached translation
    pub async fn get_cached_translation(
        &self,
        source_text: &str,
        source_language: &str,
        target_language: &str,
        provider: &str,
        model: &str,
    ) -> Result<Option<String>> {
        let source_text_hash = Self::hash_text(source_text);
        let source_language = source_language.to_string();
        let target_language = target_language.to_string();
        let provider = provider.to_string();
        let model = model.to_string();

        self.db
            .execute_async(move |conn| {
                let result: Option<(i64, String)> = conn
                    .query_row(
                        r#"
                        SELECT id, translated_text
                        FROM translation_cache
                        WHERE source_text_hash = ?1
                          AND source_language = ?2
                          AND target_language = ?3
                          AND provider = ?4
                          AND model = ?5
                        "#,
                        params![source_text_hash, source_language, target_language, provider, model],
                        |row| Ok((row.get(0)?, row.get(1)?)),
                    )
                    .optional()?;

                if let Some((id, translated_text)) = result {
                    // Increment hit count
                    conn.execute(
                        "UPDATE translation_cache SET hit_count = hit_count + 1 WHERE id = ?1",
                        [id],
                    )?;
                    debug!("Cache hit for translation");
                    Ok(Some(translated_text))
                } else {
                    Ok(None)
                }
            })
            .await
    }

    /// Store a translation in the cache
    pub async fn cache_translation(&self, record: &CacheRecord) -> Result<()> {
        let record = record.clone();

        self.db
            .execute_async(move |conn| {
                conn.execute(
                    r#"
                    INSERT INTO translation_cache (
                        source_text_hash, source_text, source_language, target_language,
                        translated_text, provider, model, created_at, hit_count
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    ON CONFLICT(source_text_hash, source_language, target_language, provider, model)
                    DO UPDATE SET hit_count = translation_cache.hit_count + 1
                    "#,
                    params![
                        record.source_text_hash,
                        record.source_text,
                        record.source_language,
                        record.target_language,
                        record.translated_text,
                        record.provider,
                        record.model,
                        record.created_at,
                        record.hit_count,
                    ],
                )?;
                Ok(())
            })
            .await
    }

    /// Get cache statistics
    pub async fn get_cache_stats(&self) -> Result<CacheStats> {
        self.db
            .execute_async(|conn| {
                let total_entries: i64 = conn
                    .query_row("SELECT COUNT(*) FROM translation_cache", [], |row| row.get(0))
                    .unwrap_or(0);

                let total_hits: i64 = conn
                    .query_row(
                        "SELECT COALESCE(SUM(hit_count), 0) FROM translation_cache",
                        [],
                        |row| row.get(0),
                    )
                    .unwrap_or(0);

                Ok(CacheStats {
                    total_entries,
                    total_hits,
                })
            })
            .await
    }

    /// Clear the translation cache
    pub async fn clear_cache(&self) -> Result<i64> {
        self.db
            .execute_async(|conn| {
                let deleted = conn.execute("DELETE FROM translation_cache", [])?;
                Ok(deleted as i64)
            })
            .await
    }

    /// Get recent cache entries for a language pair (for cache warming)
    ///
    /// Returns the most frequently used entries for the given language pair,
    /// limited to the specified count.
    pub async fn get_recent_cache_entries(
        &self,
        source_language: &str,
        target_language: &str,
        provider: &str,
        model: &str,
        limit: usize,
    ) -> Result<Vec<CacheRecord>> {
        let source_language = source_language.to_string();
        let target_language = target_language.to_string();
        let provider = provider.to_string();
        let model = model.to_string();

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, source_text_hash, source_text, source_language, target_language,
                           translated_text, provider, model, created_at, hit_count
                    FROM translation_cache
                    WHERE source_language = ?1
                      AND target_language = ?2
                      AND provider = ?3
                      AND model = ?4
                    ORDER BY hit_count DESC, created_at DESC
                    LIMIT ?5
                    "#,
                )?;

                let records = stmt
                    .query_map(
                        params![source_language, target_language, provider, model, limit as i64],
                        |row| {
                            Ok(CacheRecord {
                                id: row.get(0)?,
                                source_text_hash: row.get(1)?,
                                source_text: row.get(2)?,
                                source_language: row.get(3)?,
                                target_language: row.get(4)?,
                                translated_text: row.get(5)?,
                                provider: row.get(6)?,
                                model: row.get(7)?,
                                created_at: row.get(8)?,
                                hit_count: row.get(9)?,
                            })
                        },
                    )?
                    .filter_map(|r| r.ok())
                    .collect();

                Ok(records)
            })
            .await
    }

    // =========================================================================
    // Validation Result Operations
    // =========================================================================

    /// Insert validation results for a translated entry
    pub async fn insert_validation_results(&self, results: Vec<ValidationResultRecord>) -> Result<()> {
        self.db
            .transaction_async(move |tx| {
                for result in results {
                    tx.execute(
                        r#"
                        INSERT INTO validation_results (
                            translated_entry_id, validation_type, passed, severity, message, created_at
                        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                        "#,
                        params![
                            result.translated_entry_id,
                            result.validation_type.to_string(),
                            result.passed as i32,
                            result.severity.map(|s| s.to_string()),
                            result.message,
                            result.created_at,
                        ],
                    )?;
                }
                Ok(())
            })
            .await
    }

    /// Get validation results for a translated entry
    pub async fn get_validation_results(
        &self,
        translated_entry_id: i64,
    ) -> Result<Vec<ValidationResultRecord>> {
        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, translated_entry_id, validation_type, passed, severity, message, created_at
                    FROM validation_results
                    WHERE translated_entry_id = ?1
                    "#,
                )?;

                let rows = stmt.query_map([translated_entry_id], |row| {
                    Ok(ValidationResultRecord {
                        id: row.get(0)?,
                        translated_entry_id: row.get(1)?,
                        validation_type: row
                            .get::<_, String>(2)?
                            .parse()
                            .unwrap_or(ValidationType::MarkerCheck),
                        passed: row.get::<_, i32>(3)? != 0,
                        severity: row
                            .get::<_, Option<String>>(4)?
                            .and_then(|s| s.parse().ok()),
                        message: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                })?;

                let results: Vec<ValidationResultRecord> = rows.filter_map(|r| r.ok()).collect();
                Ok(results)
            })
            .await
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Total number of cache entries
    pub total_entries: i64,
    /// Total number of cache hits
    pub total_hits: i64,
}


