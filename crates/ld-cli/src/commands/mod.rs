//! CLI command implementations

pub(crate) mod common;
pub(crate) mod control;
pub(crate) mod migrate;
pub(crate) mod repository;
