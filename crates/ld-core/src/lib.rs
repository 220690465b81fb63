//! ld-core - Core library for Ladder
//!
//! This crate provides the small value types shared by every other Ladder
//! crate: schema version numbers, migration directions, dialect tags and the
//! filename helpers used when naming new scripts.

pub mod dialect_tag;
pub mod direction;
pub mod error;
pub mod filename;
pub mod version_number;

pub use dialect_tag::DialectTag;
pub use direction::Direction;
pub use error::{CoreError, CoreResult};
pub use filename::str_to_filename;
pub use version_number::VersionNumber;
