//! SQLite-backed store.
//!
//! Dates are stored as `YYYY-MM-DD` text and timestamps as UTC RFC 3339
//! with a `Z` suffix, so lexicographic order matches chronological order.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Transaction};
use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::error::{ErrorCode, LcrError, LcrResult};
use crate::store::{ChangeSet, ProblemStore, ReviewStore, SessionStore, Store};
use crate::types::{ChainId, Difficulty, Problem, Review, ReviewStatus, Session};

const DATE_FORMAT: &str = "%Y-%m-%d";

const REVIEW_COLUMNS: &str = "id, problem_id, chain_id, scheduled_date, completed_at, status, \
                              iteration, orphan, created_at, updated_at";

const SESSION_COLUMNS: &str = "id, problem_id, started_at, ended_at, duration_secs";

/// SQLite store for problems, reviews and sessions.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a database file. Parent directories are created.
    pub fn open(path: impl AsRef<Path>) -> LcrResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path).map_err(|e| LcrError::Database {
            message: format!("failed to open {}: {}", path.display(), e),
            code: ErrorCode::DbConnectionFailed,
            source: Some(Box::new(e)),
        })?;
        conn.pragma_update_and_check(None, "journal_mode", "wal", |row| row.get::<_, String>(0))?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::with_connection(conn)
    }

    /// Create an in-memory store (for testing).
    pub fn in_memory() -> LcrResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> LcrResult<Self> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> LcrResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS problems (
                problem_id TEXT PRIMARY KEY,
                title TEXT,
                difficulty TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS reviews (
                id TEXT PRIMARY KEY,
                problem_id TEXT NOT NULL REFERENCES problems(problem_id) ON DELETE CASCADE,
                chain_id TEXT NOT NULL,
                scheduled_date TEXT NOT NULL,
                completed_at TEXT,
                status TEXT NOT NULL DEFAULT 'pending',
                iteration INTEGER NOT NULL CHECK (iteration >= 1),
                orphan INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                UNIQUE(chain_id, iteration)
            );

            -- Due-review scans
            CREATE INDEX IF NOT EXISTS idx_reviews_status_date
                ON reviews(status, scheduled_date);

            CREATE INDEX IF NOT EXISTS idx_reviews_problem
                ON reviews(problem_id, chain_id, iteration);

            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                problem_id TEXT NOT NULL REFERENCES problems(problem_id) ON DELETE CASCADE,
                started_at TEXT NOT NULL,
                ended_at TEXT,
                duration_secs INTEGER
            );

            -- At most one running timer per problem
            CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_one_active
                ON sessions(problem_id) WHERE ended_at IS NULL;
        "#,
        )?;
        Ok(())
    }

    fn lock(&self) -> LcrResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| LcrError::database(format!("connection lock poisoned: {}", e)))
    }

    fn query_reviews(&self, sql: &str, params: impl rusqlite::Params) -> LcrResult<Vec<Review>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let results = stmt.query_map(params, |row| Ok(Self::row_to_review(row)))?;

        results
            .map(|r| r.map_err(LcrError::from).and_then(|inner| inner))
            .collect()
    }

    fn query_sessions(&self, sql: &str, params: impl rusqlite::Params) -> LcrResult<Vec<Session>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql)?;
        let results = stmt.query_map(params, |row| Ok(Self::row_to_session(row)))?;

        results
            .map(|r| r.map_err(LcrError::from).and_then(|inner| inner))
            .collect()
    }

    fn row_to_problem(row: &rusqlite::Row<'_>) -> LcrResult<Problem> {
        let problem_id: String = row.get(0)?;
        let title: Option<String> = row.get(1)?;
        let difficulty: Option<String> = row.get(2)?;
        let created_at: String = row.get(3)?;
        let updated_at: String = row.get(4)?;

        Ok(Problem {
            problem_id,
            title,
            difficulty: difficulty
                .map(|d| Difficulty::from_str(&d).map_err(|e| LcrError::parse(format!("difficulty '{}': {}", d, e))))
                .transpose()?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    fn row_to_review(row: &rusqlite::Row<'_>) -> LcrResult<Review> {
        let id: String = row.get(0)?;
        let problem_id: String = row.get(1)?;
        let chain_id: String = row.get(2)?;
        let scheduled_date: String = row.get(3)?;
        let completed_at: Option<String> = row.get(4)?;
        let status: String = row.get(5)?;
        let iteration: u32 = row.get(6)?;
        let orphan: bool = row.get(7)?;
        let created_at: String = row.get(8)?;
        let updated_at: String = row.get(9)?;

        Ok(Review {
            id: parse_uuid(&id)?,
            problem_id,
            chain_id: ChainId::from(chain_id),
            scheduled_date: parse_date(&scheduled_date)?,
            completed_at: completed_at.as_deref().map(parse_timestamp).transpose()?,
            status: ReviewStatus::from_str(&status)
                .map_err(|e| LcrError::parse(format!("review status '{}': {}", status, e)))?,
            iteration,
            orphan,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    fn row_to_session(row: &rusqlite::Row<'_>) -> LcrResult<Session> {
        let id: String = row.get(0)?;
        let problem_id: String = row.get(1)?;
        let started_at: String = row.get(2)?;
        let ended_at: Option<String> = row.get(3)?;
        let duration_secs: Option<i64> = row.get(4)?;

        Ok(Session {
            id: parse_uuid(&id)?,
            problem_id,
            started_at: parse_timestamp(&started_at)?,
            ended_at: ended_at.as_deref().map(parse_timestamp).transpose()?,
            duration_secs,
        })
    }

    fn upsert_problem(tx: &Transaction<'_>, problem: &Problem) -> LcrResult<()> {
        tx.execute(
            r#"INSERT INTO problems (problem_id, title, difficulty, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5)
               ON CONFLICT(problem_id) DO UPDATE SET
                   title = excluded.title,
                   difficulty = excluded.difficulty,
                   updated_at = excluded.updated_at"#,
            params![
                problem.problem_id,
                problem.title,
                problem.difficulty.map(|d| d.to_string()),
                format_timestamp(&problem.created_at),
                format_timestamp(&problem.updated_at),
            ],
        )?;
        Ok(())
    }

    fn insert_review(tx: &Transaction<'_>, review: &Review) -> LcrResult<()> {
        let result = tx.execute(
            r#"INSERT INTO reviews
               (id, problem_id, chain_id, scheduled_date, completed_at, status,
                iteration, orphan, created_at, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"#,
            params![
                review.id.to_string(),
                review.problem_id,
                review.chain_id.as_str(),
                format_date(review.scheduled_date),
                review.completed_at.as_ref().map(format_timestamp),
                review.status.to_string(),
                review.iteration,
                review.orphan,
                format_timestamp(&review.created_at),
                format_timestamp(&review.updated_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
                Err(LcrError::consistency(
                    ErrorCode::ConDuplicateIteration,
                    review.chain_id.as_str(),
                    format!(
                        "cannot insert review #{} for problem '{}': iteration already taken or problem missing",
                        review.iteration, review.problem_id
                    ),
                ))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update_review(tx: &Transaction<'_>, review: &Review) -> LcrResult<()> {
        let updated = tx.execute(
            r#"UPDATE reviews
               SET scheduled_date = ?2, completed_at = ?3, status = ?4, updated_at = ?5
               WHERE id = ?1 AND chain_id = ?6 AND iteration = ?7"#,
            params![
                review.id.to_string(),
                format_date(review.scheduled_date),
                review.completed_at.as_ref().map(format_timestamp),
                review.status.to_string(),
                format_timestamp(&review.updated_at),
                review.chain_id.as_str(),
                review.iteration,
            ],
        )?;
        if updated == 0 {
            return Err(LcrError::not_found(
                ErrorCode::NfReview,
                format!("review {} (#{} in chain '{}')", review.id, review.iteration, review.chain_id),
            ));
        }
        Ok(())
    }

    fn upsert_session(tx: &Transaction<'_>, session: &Session) -> LcrResult<()> {
        let result = tx.execute(
            r#"INSERT INTO sessions (id, problem_id, started_at, ended_at, duration_secs)
               VALUES (?1, ?2, ?3, ?4, ?5)
               ON CONFLICT(id) DO UPDATE SET
                   ended_at = excluded.ended_at,
                   duration_secs = excluded.duration_secs"#,
            params![
                session.id.to_string(),
                session.problem_id,
                format_timestamp(&session.started_at),
                session.ended_at.as_ref().map(format_timestamp),
                session.duration_secs,
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
                Err(LcrError::DuplicateSession {
                    problem_id: session.problem_id.clone(),
                    started_at: session.started_at,
                })
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl ProblemStore for SqliteStore {
    fn get_problem(&self, problem_id: &str) -> LcrResult<Option<Problem>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT problem_id, title, difficulty, created_at, updated_at FROM problems WHERE problem_id = ?1",
        )?;

        stmt.query_row(params![problem_id], |row| Ok(Self::row_to_problem(row)))
            .optional()?
            .transpose()
    }
}

impl ReviewStore for SqliteStore {
    fn reviews_for_problem(&self, problem_id: &str) -> LcrResult<Vec<Review>> {
        self.query_reviews(
            &format!(
                "SELECT {} FROM reviews WHERE problem_id = ?1 ORDER BY chain_id, iteration",
                REVIEW_COLUMNS
            ),
            params![problem_id],
        )
    }

    fn reviews_in_chain(&self, chain_id: &ChainId) -> LcrResult<Vec<Review>> {
        self.query_reviews(
            &format!("SELECT {} FROM reviews WHERE chain_id = ?1 ORDER BY iteration", REVIEW_COLUMNS),
            params![chain_id.as_str()],
        )
    }

    fn due_reviews(&self, as_of: NaiveDate) -> LcrResult<Vec<Review>> {
        self.query_reviews(
            &format!(
                "SELECT {} FROM reviews
                 WHERE status = 'pending' AND scheduled_date <= ?1
                 ORDER BY scheduled_date, problem_id, iteration",
                REVIEW_COLUMNS
            ),
            params![format_date(as_of)],
        )
    }

    fn completed_between(&self, start: NaiveDate, end: NaiveDate) -> LcrResult<Vec<Review>> {
        self.query_reviews(
            &format!(
                "SELECT {} FROM reviews
                 WHERE status = 'completed' AND substr(completed_at, 1, 10) BETWEEN ?1 AND ?2
                 ORDER BY completed_at DESC",
                REVIEW_COLUMNS
            ),
            params![format_date(start), format_date(end)],
        )
    }

    fn pending_between(&self, start: NaiveDate, end: NaiveDate) -> LcrResult<Vec<Review>> {
        self.query_reviews(
            &format!(
                "SELECT {} FROM reviews
                 WHERE status = 'pending' AND scheduled_date BETWEEN ?1 AND ?2
                 ORDER BY scheduled_date, problem_id, iteration",
                REVIEW_COLUMNS
            ),
            params![format_date(start), format_date(end)],
        )
    }
}

impl SessionStore for SqliteStore {
    fn active_session(&self, problem_id: &str) -> LcrResult<Option<Session>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM sessions WHERE problem_id = ?1 AND ended_at IS NULL",
            SESSION_COLUMNS
        ))?;

        stmt.query_row(params![problem_id], |row| Ok(Self::row_to_session(row)))
            .optional()?
            .transpose()
    }

    fn sessions_for_problem(&self, problem_id: &str) -> LcrResult<Vec<Session>> {
        self.query_sessions(
            &format!(
                "SELECT {} FROM sessions WHERE problem_id = ?1 ORDER BY started_at DESC",
                SESSION_COLUMNS
            ),
            params![problem_id],
        )
    }
}

impl Store for SqliteStore {
    fn commit(&self, changes: &ChangeSet) -> LcrResult<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        for problem in &changes.problems {
            Self::upsert_problem(&tx, problem)?;
        }
        for review in &changes.inserted_reviews {
            Self::insert_review(&tx, review)?;
        }
        for review in &changes.updated_reviews {
            Self::update_review(&tx, review)?;
        }
        for session in &changes.sessions {
            Self::upsert_session(&tx, session)?;
        }

        tx.commit()?;
        tracing::debug!(
            problems = changes.problems.len(),
            inserted = changes.inserted_reviews.len(),
            updated = changes.updated_reviews.len(),
            sessions = changes.sessions.len(),
            "committed changes"
        );
        Ok(())
    }

    fn delete_problem(&self, problem_id: &str) -> LcrResult<bool> {
        let conn = self.lock()?;
        let count = conn.execute("DELETE FROM problems WHERE problem_id = ?1", params![problem_id])?;
        Ok(count > 0)
    }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> LcrResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| LcrError::parse(format!("timestamp '{}': {}", value, e)))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn parse_date(value: &str) -> LcrResult<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| LcrError::parse(format!("date '{}': {}", value, e)))
}

fn parse_uuid(value: &str) -> LcrResult<Uuid> {
    Uuid::parse_str(value).map_err(|e| LcrError::parse(format!("id '{}': {}", value, e)))
}
