/// Domain and Routine Catalog Module
///
/// SQLite has native tables but no domains or stored routines. dbforge
/// keeps both in two tool-owned catalog tables inside the target database,
/// so that domain and procedure definitions survive in the schema and can
/// be reflected back out. The batch executor routes `CREATE DOMAIN` and
/// `CREATE [OR ALTER] PROCEDURE` statements here; everything else goes to
/// SQLite directly.
///
/// Catalog names carry the `dbmeta_` prefix, which the reflector treats as
/// a reserved namespace alongside `sqlite_`.
use crate::core::{ForgeError, Result};
use rusqlite::{Connection, OptionalExtension};

/// A domain definition row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainDef {
    pub name: String,
    /// Flat type name, without length/precision refinement.
    pub base_type: String,
    pub char_length: Option<i64>,
    pub num_precision: Option<i64>,
    pub num_scale: Option<i64>,
    /// The definition text as written after `AS`.
    pub definition: String,
}

/// A stored routine row. The source holds the body only, not the
/// `CREATE PROCEDURE <name>` header; `source` is `None` when the catalog
/// row carries no body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedureDef {
    pub name: String,
    pub source: Option<String>,
}

const CATALOG_DDL: &str = "
    CREATE TABLE IF NOT EXISTS dbmeta_domains (
        name          TEXT PRIMARY KEY,
        base_type     TEXT NOT NULL,
        char_length   INTEGER,
        num_precision INTEGER,
        num_scale     INTEGER,
        definition    TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS dbmeta_procedures (
        name   TEXT PRIMARY KEY,
        source TEXT
    );
";

/// Creates the catalog tables when absent. Only the mutating operations
/// call this; reflection must leave a foreign database untouched.
pub fn ensure_catalog(conn: &Connection) -> Result<()> {
    conn.execute_batch(CATALOG_DDL)?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Registers a `CREATE DOMAIN <name> AS <definition>` statement.
///
/// A duplicate domain name fails loudly (primary-key violation), matching
/// the behavior of `CREATE TABLE` on an existing table.
pub fn register_domain(conn: &Connection, statement: &str) -> Result<()> {
    let mut pos = 0;
    expect_word(statement, &mut pos, "CREATE")?;
    expect_word(statement, &mut pos, "DOMAIN")?;
    let name = take_word(statement, &mut pos)
        .ok_or_else(|| ForgeError::Script("CREATE DOMAIN is missing a name".to_string()))?
        .to_string();
    expect_word(statement, &mut pos, "AS")?;
    let definition = statement[pos..].trim().to_string();
    if definition.is_empty() {
        return Err(ForgeError::Script(format!(
            "domain {name} has an empty definition"
        )));
    }

    let (base_type, char_length, num_precision, num_scale) = parse_type(&definition);

    ensure_catalog(conn)?;
    conn.execute(
        "INSERT INTO dbmeta_domains (name, base_type, char_length, num_precision, num_scale, definition)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![name.trim(), base_type, char_length, num_precision, num_scale, definition],
    )?;
    Ok(())
}

/// Registers a `CREATE [OR ALTER] PROCEDURE <name> <body>` statement.
///
/// The body is stored verbatim. `CREATE OR ALTER` replaces an existing
/// routine; plain `CREATE` fails loudly on a duplicate name.
pub fn register_procedure(conn: &Connection, statement: &str) -> Result<()> {
    let mut pos = 0;
    expect_word(statement, &mut pos, "CREATE")?;

    let mut replace = false;
    let next = take_word(statement, &mut pos)
        .ok_or_else(|| ForgeError::Script("truncated CREATE PROCEDURE statement".to_string()))?;
    if next.eq_ignore_ascii_case("OR") {
        expect_word(statement, &mut pos, "ALTER")?;
        expect_word(statement, &mut pos, "PROCEDURE")?;
        replace = true;
    } else if !next.eq_ignore_ascii_case("PROCEDURE") {
        return Err(ForgeError::Script(format!(
            "expected PROCEDURE, found {next}"
        )));
    }

    let name = take_word(statement, &mut pos)
        .ok_or_else(|| ForgeError::Script("CREATE PROCEDURE is missing a name".to_string()))?
        .to_string();
    let source = statement[pos..].trim_start();

    ensure_catalog(conn)?;
    let sql = if replace {
        "INSERT OR REPLACE INTO dbmeta_procedures (name, source) VALUES (?1, ?2)"
    } else {
        "INSERT INTO dbmeta_procedures (name, source) VALUES (?1, ?2)"
    };
    conn.execute(sql, rusqlite::params![name.trim(), source])?;
    Ok(())
}

/// Lists every domain, ordered by name. An absent catalog table yields an
/// empty list so that reflection works against databases this tool never
/// touched.
pub fn list_domains(conn: &Connection) -> Result<Vec<DomainDef>> {
    if !table_exists(conn, "dbmeta_domains")? {
        return Ok(Vec::new());
    }
    let mut stmt = conn.prepare(
        "SELECT name, base_type, char_length, num_precision, num_scale, definition
         FROM dbmeta_domains ORDER BY name",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(DomainDef {
            name: row.get::<_, String>(0)?.trim().to_string(),
            base_type: row.get(1)?,
            char_length: row.get(2)?,
            num_precision: row.get(3)?,
            num_scale: row.get(4)?,
            definition: row.get(5)?,
        })
    })?;

    let mut domains = Vec::new();
    for row in rows {
        domains.push(row?);
    }
    Ok(domains)
}

/// Lists every routine, ordered by name, reading the source defensively.
pub fn list_procedures(conn: &Connection) -> Result<Vec<ProcedureDef>> {
    if !table_exists(conn, "dbmeta_procedures")? {
        return Ok(Vec::new());
    }
    let mut stmt = conn.prepare("SELECT name, source FROM dbmeta_procedures ORDER BY name")?;
    let rows = stmt.query_map([], |row| {
        // Both fields are read defensively; a row with a missing name or
        // body is still surfaced so the caller can count and skip it.
        let name: Option<String> = row.get(0)?;
        Ok(ProcedureDef {
            name: name.unwrap_or_default().trim().to_string(),
            source: row.get(1)?,
        })
    })?;

    let mut procedures = Vec::new();
    for row in rows {
        procedures.push(row?);
    }
    Ok(procedures)
}

/// Splits a type definition into its flat base name and refinements, e.g.
/// `VARCHAR(50) NOT NULL` into (`VARCHAR`, length 50). Also used by the
/// reflector on declared column types.
pub(crate) fn parse_type(definition: &str) -> (String, Option<i64>, Option<i64>, Option<i64>) {
    let trimmed = definition.trim_start();
    let base_end = trimmed
        .find(|c: char| c == '(' || c.is_whitespace())
        .unwrap_or(trimmed.len());
    let base_type = trimmed[..base_end].to_string();

    let rest = trimmed[base_end..].trim_start();
    if !rest.starts_with('(') {
        return (base_type, None, None, None);
    }
    let inner = match rest[1..].find(')') {
        Some(end) => &rest[1..1 + end],
        None => return (base_type, None, None, None),
    };

    let mut numbers = inner.split(',').map(|n| n.trim().parse::<i64>());
    match (numbers.next(), numbers.next()) {
        (Some(Ok(first)), Some(Ok(second))) => (base_type, None, Some(first), Some(second)),
        (Some(Ok(first)), None) => {
            if base_type.to_uppercase().contains("CHAR") {
                (base_type, Some(first), None, None)
            } else {
                (base_type, None, Some(first), None)
            }
        }
        _ => (base_type, None, None, None),
    }
}

/// Reads the next whitespace-delimited word, advancing the cursor.
fn take_word<'a>(text: &'a str, pos: &mut usize) -> Option<&'a str> {
    let rest = &text[*pos..];
    let start = rest.find(|c: char| !c.is_whitespace())?;
    let after = &rest[start..];
    let len = after
        .find(|c: char| c.is_whitespace())
        .unwrap_or(after.len());
    let word = &after[..len];
    *pos += start + len;
    Some(word)
}

fn expect_word(text: &str, pos: &mut usize, expected: &str) -> Result<()> {
    match take_word(text, pos) {
        Some(word) if word.eq_ignore_ascii_case(expected) => Ok(()),
        Some(word) => Err(ForgeError::Script(format!(
            "expected {expected}, found {word}"
        ))),
        None => Err(ForgeError::Script(format!(
            "expected {expected}, found end of statement"
        ))),
    }
}
