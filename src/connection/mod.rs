pub mod config;
pub mod postgres;

use crate::core::Result;

/// Kind tag reported by a backing session.
///
/// The persistence engine only accepts scoped sessions: a session whose
/// `close()` releases the current transaction back to its pool and leaves
/// the session usable for the next round trip. A bare connection would
/// hold its transaction open across checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionKind {
    /// Pool-releasing session; `close()` is a release, not a teardown.
    Scoped,
    /// Plain connection without release semantics.
    Bare,
}

/// Result of a single executed statement.
///
/// Carries the returned rows (first column as text) for queries and the
/// affected-row count for writes.
#[derive(Debug, Default, Clone)]
pub struct ExecOutcome {
    rows: Vec<Option<String>>,
    rows_affected: u64,
}

impl ExecOutcome {
    pub fn new(rows: Vec<Option<String>>, rows_affected: u64) -> Self {
        Self {
            rows,
            rows_affected,
        }
    }

    /// First row's payload.
    ///
    /// Returns `None` both when no row matched and when a row matched but
    /// its column is NULL; use [`has_rows`](Self::has_rows) to tell the two
    /// apart.
    pub fn first(&self) -> Option<&str> {
        self.rows.first().and_then(|row| row.as_deref())
    }

    /// Whether any row came back at all (a NULL payload still counts).
    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }
}

/// Minimal capability interface the persistence engine requires from a
/// backing session: execute, commit, close over one logical connection.
///
/// Similar to an SQLAlchemy `scoped_session` or a pooled
/// `postgres::Client`: `close()` releases the current transaction but the
/// session remains usable afterwards. The engine calls
/// execute → commit → close on every round trip and never leaves a
/// transaction open across public operations.
pub trait ScopedSession: Send {
    /// Report what kind of session this is. Validated at construction.
    fn kind(&self) -> SessionKind;

    /// Execute one statement, binding `params` as text parameters.
    fn execute(&mut self, sql: &str, params: &[&str]) -> Result<ExecOutcome>;

    /// Commit the current transaction.
    fn commit(&mut self) -> Result<()>;

    /// Release the session back to its pool. Idempotent; the session stays
    /// usable for further statements.
    fn close(&mut self) -> Result<()>;
}
