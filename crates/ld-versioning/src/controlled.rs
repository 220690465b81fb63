//! Controlled schemas: a repository bound to a live database.
//!
//! The applied version lives in a single-row bookkeeping table inside the
//! target database. Every version step (script plus bookkeeping update) is
//! one transaction, so a failure leaves the database at the last step that
//! committed.

use crate::error::{VersioningError, VersioningResult};
use crate::repository::{ChangesetStep, Repository};
use ld_core::{Direction, VersionNumber};
use ld_db::{with_transaction, Connection, SqlValue};

/// A database under version control of one repository.
pub struct ControlledSchema<'a> {
    conn: &'a dyn Connection,
    repository: &'a Repository,
    version: VersionNumber,
}

impl<'a> ControlledSchema<'a> {
    /// Put a database under version control, starting at `version`
    /// (default 0).
    ///
    /// Fails with `AlreadyControlled` if the bookkeeping table exists.
    pub fn create(
        conn: &'a dyn Connection,
        repository: &'a Repository,
        version: Option<VersionNumber>,
    ) -> VersioningResult<Self> {
        let table = repository.version_table();
        let version = version.unwrap_or(VersionNumber::ZERO);
        if version > repository.latest() {
            return Err(VersioningError::InvalidVersion {
                version: version.to_string(),
                reason: format!("repository latest version is {}", repository.latest()),
            });
        }
        if conn.relation_exists(table)? {
            return Err(VersioningError::AlreadyControlled {
                table: table.to_string(),
            });
        }

        with_transaction(conn, |tx| -> VersioningResult<()> {
            tx.execute_batch(&format!(
                "CREATE TABLE {table} (\
                 repository_id VARCHAR(250) NOT NULL PRIMARY KEY, \
                 repository_path TEXT, \
                 version INTEGER)"
            ))?;
            tx.execute(
                &format!(
                    "INSERT INTO {table} (repository_id, repository_path, version) VALUES (?, ?, ?)"
                ),
                &[
                    SqlValue::from(repository.id()),
                    SqlValue::from(repository.path().display().to_string()),
                    SqlValue::Int(as_i64(version)?),
                ],
            )?;
            Ok(())
        })?;

        log::info!(
            "Database placed under version control of '{}' at version {}",
            repository.id(),
            version
        );
        Ok(Self {
            conn,
            repository,
            version,
        })
    }

    /// Attach to a database already under control of `repository`.
    pub fn load(conn: &'a dyn Connection, repository: &'a Repository) -> VersioningResult<Self> {
        let version = read_version(conn, repository)?;
        Ok(Self {
            conn,
            repository,
            version,
        })
    }

    /// The applied version, as last read or written.
    pub fn version(&self) -> VersionNumber {
        self.version
    }

    pub fn repository(&self) -> &Repository {
        self.repository
    }

    /// Re-read the applied version from the database.
    pub fn refresh(&mut self) -> VersioningResult<VersionNumber> {
        self.version = read_version(self.conn, self.repository)?;
        Ok(self.version)
    }

    /// Steps that would move the schema to `target`.
    pub fn changeset(&self, target: VersionNumber) -> VersioningResult<Vec<ChangesetStep<'a>>> {
        self.repository.changeset(self.conn.dialect(), self.version, target)
    }

    /// Upgrade to `target`, or to the latest version.
    ///
    /// `target` below the current version is refused; use
    /// [`downgrade`](Self::downgrade).
    pub fn upgrade(&mut self, target: Option<VersionNumber>) -> VersioningResult<VersionNumber> {
        let latest = self.repository.latest();
        let target = target.unwrap_or(latest);
        if target < self.version {
            return Err(VersioningError::InvalidVersion {
                version: target.to_string(),
                reason: format!("below the current version {}; use downgrade", self.version),
            });
        }
        if target > latest {
            return Err(VersioningError::InvalidVersion {
                version: target.to_string(),
                reason: format!("repository latest version is {latest}"),
            });
        }
        let steps = self.changeset(target)?;
        self.run_steps(&steps)
    }

    /// Downgrade to `target`, which must lie in 0..=current.
    pub fn downgrade(&mut self, target: i64) -> VersioningResult<VersionNumber> {
        let target = VersionNumber::new(target).map_err(|e| VersioningError::InvalidVersion {
            version: target.to_string(),
            reason: e.to_string(),
        })?;
        if target > self.version {
            return Err(VersioningError::InvalidVersion {
                version: target.to_string(),
                reason: format!("above the current version {}; use upgrade", self.version),
            });
        }
        let steps = self.changeset(target)?;
        self.run_steps(&steps)
    }

    /// Apply `steps` in order, one transaction each.
    pub fn run_steps(&mut self, steps: &[ChangesetStep<'_>]) -> VersioningResult<VersionNumber> {
        let table = self.repository.version_table();
        let id = self.repository.id();
        for step in steps {
            let target = step.target();
            log::debug!("Applying version {} ({} -> {})", step.version, self.version, target);
            with_transaction(self.conn, |tx| -> VersioningResult<()> {
                if let Some(script) = step.script {
                    script.apply(tx, step.direction)?;
                }
                tx.execute(
                    &format!("UPDATE {table} SET version = ? WHERE repository_id = ?"),
                    &[SqlValue::Int(as_i64(target)?), SqlValue::from(id)],
                )?;
                Ok(())
            })?;
            self.version = target;
            log::info!(
                "{} version {} done",
                match step.direction {
                    Direction::Upgrade => "Upgrade to",
                    Direction::Downgrade => "Downgrade to",
                },
                target
            );
        }
        Ok(self.version)
    }

    /// Remove the bookkeeping table. Schema changes made by scripts stay.
    pub fn drop(self) -> VersioningResult<()> {
        drop_control(self.conn, self.repository)
    }
}

/// Remove the bookkeeping table of `repository` from `conn`.
///
/// Fails with `NotControlled` if the table does not exist.
pub fn drop_control(conn: &dyn Connection, repository: &Repository) -> VersioningResult<()> {
    let table = repository.version_table();
    if !conn.relation_exists(table)? {
        return Err(VersioningError::NotControlled {
            table: table.to_string(),
            repository: repository.id().to_string(),
        });
    }
    conn.execute_batch(&format!("DROP TABLE {table}"))?;
    log::info!("Dropped version control table '{table}'");
    Ok(())
}

fn read_version(conn: &dyn Connection, repository: &Repository) -> VersioningResult<VersionNumber> {
    let table = repository.version_table();
    let not_controlled = || VersioningError::NotControlled {
        table: table.to_string(),
        repository: repository.id().to_string(),
    };
    if !conn.relation_exists(table)? {
        return Err(not_controlled());
    }
    let version = conn
        .query_i64(
            &format!("SELECT version FROM {table} WHERE repository_id = ?"),
            &[SqlValue::from(repository.id())],
        )?
        .ok_or_else(not_controlled)?;
    Ok(VersionNumber::new(version)?)
}

fn as_i64(version: VersionNumber) -> VersioningResult<i64> {
    i64::try_from(version.value()).map_err(|_| VersioningError::InvalidVersion {
        version: version.to_string(),
        reason: "too large to store".to_string(),
    })
}

#[cfg(test)]
#[path = "controlled_test.rs"]
mod tests;
