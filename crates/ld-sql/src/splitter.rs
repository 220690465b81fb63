//! Semicolon-aware statement splitting.

use crate::dialect::parser_dialect;
use crate::error::{SqlError, SqlResult};
use regex::Regex;
use sqlparser::dialect::Dialect;
use sqlparser::tokenizer::{Location, Token, Tokenizer};
use std::sync::OnceLock;

/// Statements that are skipped (with a warning) instead of being executed.
///
/// An explicit `COMMIT` would end the transaction the script runs in.
const IGNORED_PATTERNS: &[&str] = &[r"(?i)^\s*COMMIT\s*;?$"];

/// Line and block comments.
const COMMENT_PATTERN: &str = r"(?s)--[^\n]*|/\*.*?\*/";

static IGNORED: OnceLock<Vec<Regex>> = OnceLock::new();
static COMMENTS: OnceLock<Regex> = OnceLock::new();

fn ignored_patterns() -> &'static [Regex] {
    IGNORED.get_or_init(|| {
        IGNORED_PATTERNS
            .iter()
            .map(|p| Regex::new(p).expect("valid regex literal"))
            .collect()
    })
}

/// Returns `true` when `statement` must not be sent to the driver.
///
/// Comments count as whitespace, so `-- done\nCOMMIT` is ignorable too.
pub fn is_ignorable(statement: &str) -> bool {
    let comments =
        COMMENTS.get_or_init(|| Regex::new(COMMENT_PATTERN).expect("valid regex literal"));
    let bare = comments.replace_all(statement, " ");
    ignored_patterns().iter().any(|re| re.is_match(&bare))
}

/// Splits script text into individual statements for one dialect.
pub struct StatementSplitter {
    dialect: Box<dyn Dialect>,
}

impl StatementSplitter {
    /// Create a splitter for a dialect tag
    pub fn for_dialect(tag: &str) -> Self {
        Self {
            dialect: parser_dialect(tag),
        }
    }

    /// Split `sql` on top-level semicolons.
    ///
    /// Each returned statement is trimmed and has its terminating `;`
    /// removed. Segments made only of whitespace and comments are dropped.
    pub fn split(&self, sql: &str) -> SqlResult<Vec<String>> {
        let tokens = Tokenizer::new(self.dialect.as_ref(), sql)
            .with_unescape(false)
            .tokenize_with_location()
            .map_err(|e| SqlError::TokenizeError {
                message: e.message.clone(),
                line: e.location.line,
                column: e.location.column,
            })?;

        let index = LineIndex::new(sql);
        let mut statements = Vec::new();
        let mut start = 0usize;
        let mut has_content = false;

        for tok in &tokens {
            match tok.token {
                Token::SemiColon => {
                    let end = index.offset(tok.span.start);
                    if has_content {
                        statements.push(sql[start..end].trim().to_string());
                    }
                    start = end + 1;
                    has_content = false;
                }
                Token::Whitespace(_) | Token::EOF => {}
                _ => has_content = true,
            }
        }
        if has_content {
            statements.push(sql[start..].trim().to_string());
        }

        log::debug!("Split script into {} statement(s)", statements.len());
        Ok(statements)
    }
}

/// Split `sql` using the tokenizer rules of the dialect named by `tag`.
pub fn split_statements(sql: &str, tag: &str) -> SqlResult<Vec<String>> {
    StatementSplitter::for_dialect(tag).split(sql)
}

/// Maps tokenizer locations (1-based line and character column) to byte offsets.
struct LineIndex<'a> {
    text: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(text: &'a str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { text, line_starts }
    }

    fn offset(&self, loc: Location) -> usize {
        let line = (loc.line as usize).saturating_sub(1);
        let Some(&line_start) = self.line_starts.get(line) else {
            return self.text.len();
        };
        let column = (loc.column as usize).saturating_sub(1);
        self.text[line_start..]
            .char_indices()
            .nth(column)
            .map(|(i, _)| line_start + i)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
#[path = "splitter_test.rs"]
mod tests;
