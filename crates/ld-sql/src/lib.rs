//! ld-sql - SQL layer for Ladder
//!
//! Statement scripts are executed one statement at a time. This crate splits
//! script text into statements with the sqlparser tokenizer (so semicolons
//! inside string literals, quoted identifiers and comments never split), and
//! recognises statements that must not be sent to the driver.

pub mod dialect;
pub mod error;
pub mod splitter;

pub use dialect::parser_dialect;
pub use error::{SqlError, SqlResult};
pub use splitter::{is_ignorable, split_statements, StatementSplitter};
