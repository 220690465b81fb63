//! Scoped transactions.

use crate::error::DbError;
use crate::traits::Connection;

/// A transaction that rolls back unless explicitly committed.
///
/// Dropping the guard without calling [`Transaction::commit`] (early return,
/// `?`, or unwinding) issues `ROLLBACK`.
pub struct Transaction<'c> {
    conn: &'c dyn Connection,
    done: bool,
}

impl<'c> Transaction<'c> {
    /// Issue `BEGIN` on `conn`.
    pub fn begin(conn: &'c dyn Connection) -> Result<Self, DbError> {
        conn.begin()?;
        Ok(Self { conn, done: false })
    }

    /// The connection this transaction runs on.
    pub fn conn(&self) -> &'c dyn Connection {
        self.conn
    }

    /// Commit. If `COMMIT` itself fails the transaction is rolled back.
    pub fn commit(mut self) -> Result<(), DbError> {
        self.done = true;
        if let Err(e) = self.conn.commit() {
            let _ = self.conn.rollback();
            return Err(e);
        }
        Ok(())
    }

    /// Roll back explicitly.
    pub fn rollback(mut self) -> Result<(), DbError> {
        self.done = true;
        self.conn.rollback()
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.done {
            if let Err(e) = self.conn.rollback() {
                log::error!("Rollback of abandoned transaction failed: {e}");
            }
        }
    }
}

/// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
/// error.
pub fn with_transaction<T, E, F>(conn: &dyn Connection, body: F) -> Result<T, E>
where
    F: FnOnce(&dyn Connection) -> Result<T, E>,
    E: From<DbError>,
{
    let tx = Transaction::begin(conn)?;
    match body(tx.conn()) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rb) = tx.rollback() {
                log::error!("{rb}");
            }
            Err(e)
        }
    }
}
