//! Connection factory: URL + options -> ready connection.

use crate::duckdb::DuckDbConnection;
use crate::error::{DbError, DbResult};
use crate::traits::Connection;
use std::collections::BTreeMap;
use std::path::Path;

/// Prefix marking a per-argument override in keyed options.
pub const ENGINE_ARG_PREFIX: &str = "engine_arg_";

/// What to connect to.
pub enum ConnectionSource {
    /// A URL such as `duckdb:///path/to/file.db`
    Url(String),
    /// A connection built by the caller, passed through unchanged
    Connection(Box<dyn Connection>),
}

impl From<&str> for ConnectionSource {
    fn from(url: &str) -> Self {
        ConnectionSource::Url(url.to_string())
    }
}

impl From<String> for ConnectionSource {
    fn from(url: String) -> Self {
        ConnectionSource::Url(url)
    }
}

impl From<Box<dyn Connection>> for ConnectionSource {
    fn from(conn: Box<dyn Connection>) -> Self {
        ConnectionSource::Connection(conn)
    }
}

/// Engine settings applied when opening a connection from a URL.
///
/// `engine_args` are per-argument overrides and win over the grouped
/// `engine_dict` mapping when both name the same setting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// Grouped settings mapping
    pub engine_dict: BTreeMap<String, String>,
    /// Per-argument overrides
    pub engine_args: BTreeMap<String, String>,
}

impl ConnectionOptions {
    /// Build options from keyed pairs.
    ///
    /// Keys of the form `engine_arg_<name>` become per-argument overrides for
    /// `<name>`; any other key is ignored.
    pub fn from_keyed<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            let key = key.into();
            match key.strip_prefix(ENGINE_ARG_PREFIX) {
                Some(name) if !name.is_empty() => {
                    options.engine_args.insert(name.to_string(), value.into());
                }
                _ => log::debug!("Ignoring unrecognised connection option '{key}'"),
            }
        }
        options
    }

    /// Add a grouped mapping.
    pub fn with_dict<I, K, V>(mut self, dict: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.engine_dict
            .extend(dict.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Returns `true` when no setting is configured.
    pub fn is_empty(&self) -> bool {
        self.engine_dict.is_empty() && self.engine_args.is_empty()
    }

    /// The effective settings: the grouped mapping overlaid by per-argument
    /// overrides.
    pub fn merged(&self) -> BTreeMap<String, String> {
        let mut merged = self.engine_dict.clone();
        merged.extend(
            self.engine_args
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        merged
    }
}

/// Where a DuckDB URL points.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DuckDbTarget {
    Memory,
    File(String),
}

/// Parse `scheme://rest`, returning the scheme and the remainder.
fn split_url(url: &str) -> DbResult<(&str, &str)> {
    url.split_once("://").ok_or_else(|| DbError::InvalidUrl {
        url: url.to_string(),
        reason: "expected '<engine>://...'".to_string(),
    })
}

fn parse_duckdb_target(url: &str, rest: &str) -> DbResult<DuckDbTarget> {
    if rest.is_empty() {
        return Ok(DuckDbTarget::Memory);
    }
    let Some(path) = rest.strip_prefix('/') else {
        return Err(DbError::InvalidUrl {
            url: url.to_string(),
            reason: "DuckDB URLs take no host; use duckdb:///<path>".to_string(),
        });
    };
    match path {
        "" | ":memory:" => Ok(DuckDbTarget::Memory),
        p => Ok(DuckDbTarget::File(p.to_string())),
    }
}

fn duckdb_config(settings: &BTreeMap<String, String>) -> DbResult<duckdb::Config> {
    let mut config = duckdb::Config::default();
    for (key, value) in settings {
        config = config
            .with(key, value)
            .map_err(|e| DbError::InvalidOption {
                key: key.clone(),
                reason: e.to_string(),
            })?;
    }
    Ok(config)
}

/// Turn a [`ConnectionSource`] into a ready connection.
///
/// A pre-built connection is returned as-is (options are ignored with a
/// warning). URLs are dispatched on their scheme; only `duckdb` has a
/// connection implementation.
pub fn construct_connection(
    source: impl Into<ConnectionSource>,
    options: &ConnectionOptions,
) -> DbResult<Box<dyn Connection>> {
    match source.into() {
        ConnectionSource::Connection(conn) => {
            if !options.is_empty() {
                log::warn!("Connection options ignored for a pre-built connection");
            }
            Ok(conn)
        }
        ConnectionSource::Url(url) => {
            let (scheme, rest) = split_url(&url)?;
            match scheme {
                "duckdb" => {
                    let config = duckdb_config(&options.merged())?;
                    let conn = match parse_duckdb_target(&url, rest)? {
                        DuckDbTarget::Memory => DuckDbConnection::in_memory_with(config)?,
                        DuckDbTarget::File(path) => {
                            DuckDbConnection::from_path_with(Path::new(&path), config)?
                        }
                    };
                    log::debug!("Opened DuckDB connection for {url}");
                    Ok(Box::new(conn))
                }
                other => Err(DbError::UnsupportedEngine(other.to_string())),
            }
        }
    }
}

#[cfg(test)]
#[path = "factory_test.rs"]
mod tests;
