use postgres::types::ToSql;
use postgres::{Client, NoTls};

use super::config::SessionConfig;
use super::{ExecOutcome, ScopedSession, SessionKind};
use crate::core::{PersistError, Result};

/// Scoped session over a synchronous PostgreSQL client.
///
/// Statements run inside an explicit transaction opened lazily before the
/// first `execute`. `commit()` ends it; `close()` rolls back anything
/// still open and leaves the session reusable, so the client behaves like
/// a pooled connection that is released after every round trip.
pub struct PostgresSession {
    client: Client,
    in_transaction: bool,
}

impl PostgresSession {
    /// Connect to `url`, applying the tuning options in `config`.
    pub fn connect(url: &str, config: &SessionConfig) -> Result<Self> {
        let mut pg = url
            .parse::<postgres::Config>()
            .map_err(|err| PersistError::InvalidUrl(format!("'{url}': {err}")))?;

        if let Some(timeout) = config.connect_timeout {
            pg.connect_timeout(timeout);
        }
        if let Some(name) = &config.application_name {
            pg.application_name(name);
        }
        pg.keepalives(config.keepalives);
        if let Some(idle) = config.keepalives_idle {
            pg.keepalives_idle(idle);
        }

        let client = pg.connect(NoTls)?;
        Ok(Self {
            client,
            in_transaction: false,
        })
    }

    fn ensure_transaction(&mut self) -> Result<()> {
        if !self.in_transaction {
            self.client.batch_execute("BEGIN")?;
            self.in_transaction = true;
        }
        Ok(())
    }
}

impl ScopedSession for PostgresSession {
    fn kind(&self) -> SessionKind {
        SessionKind::Scoped
    }

    fn execute(&mut self, sql: &str, params: &[&str]) -> Result<ExecOutcome> {
        self.ensure_transaction()?;

        let bound: Vec<&(dyn ToSql + Sync)> = params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect();

        if is_query(sql) {
            let rows = self.client.query(sql, &bound)?;
            let payloads = rows
                .iter()
                .map(|row| row.try_get::<_, Option<String>>(0))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ExecOutcome::new(payloads, 0))
        } else {
            let affected = self.client.execute(sql, &bound)?;
            Ok(ExecOutcome::new(Vec::new(), affected))
        }
    }

    fn commit(&mut self) -> Result<()> {
        if self.in_transaction {
            self.client.batch_execute("COMMIT")?;
            self.in_transaction = false;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        // Release: anything uncommitted at this point is discarded.
        if self.in_transaction {
            self.client.batch_execute("ROLLBACK")?;
            self.in_transaction = false;
        }
        Ok(())
    }
}

impl Drop for PostgresSession {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

fn is_query(sql: &str) -> bool {
    sql.trim_start()
        .get(..6)
        .is_some_and(|head| head.eq_ignore_ascii_case("SELECT"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_query() {
        assert!(is_query("SELECT data FROM persistence"));
        assert!(is_query("  select 1"));
        assert!(!is_query("UPDATE persistence SET data = $1"));
        assert!(!is_query("INSERT INTO persistence (data) VALUES ($1)"));
        assert!(!is_query("SEL"));
    }
}
