/// Batch Execution Module
///
/// Parses a block of SQL text into discrete statements and executes them
/// sequentially against one connection. The splitter understands
/// single-quoted strings, double-quoted identifiers, line and block
/// comments, and `SET TERM` terminator directives — the directive switches
/// the active statement terminator and is consumed by the parser, never
/// sent to the engine. Execution aborts on the first failing statement and
/// propagates the underlying database error; there is no retry and no
/// skip-and-continue.
use crate::catalog;
use crate::core::{ForgeError, Result};
use rusqlite::Connection;
use tracing::debug;

/// Ordered sequence of individually executable SQL statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementBlock {
    pub statements: Vec<String>,
}

impl StatementBlock {
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Splits SQL text on the active statement terminator.
///
/// The terminator starts as `;` and follows `SET TERM <tok>` directives.
/// Terminators inside strings, quoted identifiers and comments do not
/// split. Trailing text without a terminator becomes a final statement;
/// fragments that hold only whitespace and comments are dropped.
pub fn split_statements(text: &str) -> Result<StatementBlock> {
    let mut statements = Vec::new();
    let mut terminator = String::from(";");
    let mut start = 0usize;
    let mut i = 0usize;

    while i < text.len() {
        let rest = &text[i..];
        if rest.starts_with("--") {
            i += rest.find('\n').map(|n| n + 1).unwrap_or(rest.len());
        } else if rest.starts_with("/*") {
            match rest[2..].find("*/") {
                Some(n) => i += n + 4,
                None => {
                    return Err(ForgeError::Script(
                        "unterminated block comment".to_string(),
                    ))
                }
            }
        } else if rest.starts_with('\'') {
            i += scan_string_literal(rest)?;
        } else if rest.starts_with('"') {
            match rest[1..].find('"') {
                Some(n) => i += n + 2,
                None => {
                    return Err(ForgeError::Script(
                        "unterminated quoted identifier".to_string(),
                    ))
                }
            }
        } else if rest.starts_with(terminator.as_str()) {
            let terminator_len = terminator.len();
            finish_statement(&text[start..i], &mut statements, &mut terminator)?;
            i += terminator_len;
            start = i;
        } else {
            i += rest.chars().next().map(char::len_utf8).unwrap_or(1);
        }
    }
    finish_statement(&text[start..], &mut statements, &mut terminator)?;

    Ok(StatementBlock { statements })
}

/// Byte length of a single-quoted literal at the start of `rest`,
/// honoring the doubled-quote escape.
fn scan_string_literal(rest: &str) -> Result<usize> {
    let mut j = 1usize;
    loop {
        match rest[j..].find('\'') {
            Some(n) => {
                j += n + 1;
                if rest[j..].starts_with('\'') {
                    j += 1;
                } else {
                    return Ok(j);
                }
            }
            None => {
                return Err(ForgeError::Script(
                    "unterminated string literal".to_string(),
                ))
            }
        }
    }
}

fn finish_statement(
    fragment: &str,
    statements: &mut Vec<String>,
    terminator: &mut String,
) -> Result<()> {
    let trimmed = fragment.trim();
    let body = match body_offset(trimmed) {
        Some(offset) => &trimmed[offset..],
        None => return Ok(()),
    };
    if let Some(new_terminator) = parse_set_term(body)? {
        *terminator = new_terminator;
        return Ok(());
    }
    statements.push(trimmed.to_string());
    Ok(())
}

/// Recognizes a `SET TERM <tok>` directive, returning the new terminator.
fn parse_set_term(statement: &str) -> Result<Option<String>> {
    let mut words = statement.split_whitespace();
    match (words.next(), words.next()) {
        (Some(set), Some(term))
            if set.eq_ignore_ascii_case("SET") && term.eq_ignore_ascii_case("TERM") =>
        {
            match (words.next(), words.next()) {
                (Some(token), None) => Ok(Some(token.to_string())),
                _ => Err(ForgeError::Script(format!(
                    "malformed SET TERM directive: {statement}"
                ))),
            }
        }
        _ => Ok(None),
    }
}

/// Byte offset of the first character that is not whitespace or part of a
/// comment, or `None` when there is no such character.
fn body_offset(fragment: &str) -> Option<usize> {
    let mut i = 0usize;
    while i < fragment.len() {
        let rest = &fragment[i..];
        let c = rest.chars().next()?;
        if c.is_whitespace() {
            i += c.len_utf8();
        } else if rest.starts_with("--") {
            match rest.find('\n') {
                Some(n) => i += n + 1,
                None => return None,
            }
        } else if rest.starts_with("/*") {
            match rest[2..].find("*/") {
                Some(n) => i += n + 4,
                None => return None,
            }
        } else {
            return Some(i);
        }
    }
    None
}

/// Executes statement blocks sequentially against one connection.
///
/// Works the same in autonomous mode and inside an ambient transaction —
/// update passes a `rusqlite::Transaction`, which dereferences to a
/// connection, so every statement joins the surrounding scope.
pub struct BatchExecutor<'a> {
    conn: &'a Connection,
}

impl<'a> BatchExecutor<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        BatchExecutor { conn }
    }

    /// Splits `text` and executes each statement in order. The first
    /// failure aborts the remaining statements and propagates.
    pub fn execute(&self, text: &str) -> Result<()> {
        let block = split_statements(text)?;
        for statement in &block.statements {
            self.execute_statement(statement)?;
        }
        Ok(())
    }

    fn execute_statement(&self, statement: &str) -> Result<()> {
        // Leading comments must not hide the statement keyword.
        let body = match body_offset(statement) {
            Some(offset) => &statement[offset..],
            None => return Ok(()),
        };
        debug!(statement = %first_line(body), "executing statement");

        let mut words = body.split_whitespace();
        let first = words.next().unwrap_or_default();
        if first.eq_ignore_ascii_case("CREATE") {
            match (words.next(), words.next(), words.next()) {
                (Some(w), _, _) if w.eq_ignore_ascii_case("DOMAIN") => {
                    return catalog::register_domain(self.conn, body);
                }
                (Some(w), _, _) if w.eq_ignore_ascii_case("PROCEDURE") => {
                    return catalog::register_procedure(self.conn, body);
                }
                (Some(or), Some(alter), Some(proc))
                    if or.eq_ignore_ascii_case("OR")
                        && alter.eq_ignore_ascii_case("ALTER")
                        && proc.eq_ignore_ascii_case("PROCEDURE") =>
                {
                    return catalog::register_procedure(self.conn, body);
                }
                _ => {}
            }
        }

        self.conn.execute(body, [])?;
        Ok(())
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default()
}
