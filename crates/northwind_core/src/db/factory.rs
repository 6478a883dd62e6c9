//! Connection factory seam between repositories and the SQLite driver.
//!
//! # Responsibility
//! - Turn a connection string into a ready-to-use connection, once per
//!   repository call.
//!
//! # Invariants
//! - The factory never validates the connection string itself; open failures
//!   surface as driver errors when a call actually touches the store.
//! - Produced connections carry the core pragmas but no migrations.

use super::DbResult;
use rusqlite::Connection;
use std::time::Duration;

/// Produces one configured connection per repository call.
///
/// Repositories hold a factory and a connection string for their whole
/// lifetime and open a fresh, call-scoped connection at every public entry
/// point. The connection is released when it drops, on every exit path.
pub trait ConnectionFactory {
    /// Opens a new connection to the store named by `connection_string`.
    fn create_connection(&self, connection_string: &str) -> DbResult<Connection>;
}

/// Default factory backed by the rusqlite driver.
///
/// The connection string is a SQLite path or URI filename
/// (`file:name?mode=memory&cache=shared` is accepted for shared in-memory
/// stores).
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConnectionFactory;

impl ConnectionFactory for SqliteConnectionFactory {
    fn create_connection(&self, connection_string: &str) -> DbResult<Connection> {
        let conn = Connection::open(connection_string)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }
}
