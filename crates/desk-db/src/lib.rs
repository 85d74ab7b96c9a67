//! # desk-db
//!
//! libSQL store and service layer for the exam check-in desk.
//!
//! Holds exams, students, rosters, seating plans, check-ins and violations.
//! Uniqueness rules that must survive concurrent proctors (one check-in per
//! student per exam, one occupant per seat, one seat per student) live in the
//! schema as UNIQUE constraints; the repos translate a lost race into the
//! same error a pre-check would have produced.
//!
//! [`service::DeskService`] is the facade. Repository methods are
//! `impl DeskService` blocks under [`repos`]; the check-in workflow lives in
//! [`workflow`].

pub mod error;
pub mod helpers;
mod migrations;
pub mod queue;
pub mod repos;
pub mod retry;
pub mod service;
pub mod workflow;

#[cfg(test)]
mod test_support;

use error::DatabaseError;
use libsql::{Builder, params::IntoParams};
use tokio::sync::{Mutex, MutexGuard};

/// Central database handle.
///
/// Wraps a libSQL database and a single connection. Every statement that
/// touches a table goes through [`DeskDb::reader`], [`DeskDb::execute`] or
/// [`DeskDb::transaction`]. All three share one lock, so a caller never reads
/// or writes inside another caller's open transaction on the shared
/// connection.
pub struct DeskDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    lock: Mutex<()>,
}

/// Read access to the connection. Holds the lock until dropped, so keep it
/// alive while rows are consumed and drop it before writing.
pub struct DeskReader<'a> {
    conn: &'a libsql::Connection,
    _guard: MutexGuard<'a, ()>,
}

impl DeskReader<'_> {
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        self.conn
    }
}

/// An open transaction holding the lock. Dropped without
/// [`DeskTransaction::commit`], it rolls back.
pub struct DeskTransaction<'a> {
    tx: libsql::Transaction,
    _guard: MutexGuard<'a, ()>,
}

impl DeskTransaction<'_> {
    #[must_use]
    pub fn conn(&self) -> &libsql::Connection {
        &self.tx
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the commit fails.
    pub async fn commit(self) -> Result<(), DatabaseError> {
        self.tx.commit().await?;
        Ok(())
    }
}

impl DeskDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        if path != ":memory:"
            && let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(|e| DatabaseError::Other(e.into()))?;
        }

        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let desk_db = Self {
            db,
            conn,
            lock: Mutex::new(()),
        };
        desk_db.run_migrations().await?;
        Ok(desk_db)
    }

    /// Lock the connection for reads. Waits for any open transaction to
    /// commit or roll back.
    pub async fn reader(&self) -> DeskReader<'_> {
        DeskReader {
            conn: &self.conn,
            _guard: self.lock.lock().await,
        }
    }

    /// Run one write statement under the lock.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if the statement fails.
    pub async fn execute(&self, sql: &str, params: impl IntoParams) -> Result<u64, DatabaseError> {
        let _guard = self.lock.lock().await;
        Ok(self.conn.execute(sql, params).await?)
    }

    /// Begin a transaction under the lock.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` if `BEGIN` fails.
    pub async fn transaction(&self) -> Result<DeskTransaction<'_>, DatabaseError> {
        let guard = self.lock.lock().await;
        let tx = self.conn.transaction().await?;
        Ok(DeskTransaction { tx, _guard: guard })
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"chk-a3f8b2c1"`.
    ///
    /// Touches no table, so it skips the lock and may run inside an open
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(&format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"), ())
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }
}
