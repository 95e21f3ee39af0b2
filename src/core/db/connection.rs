/// Connection Management Module
///
/// Opening existing databases and creating fresh ones. Every public
/// operation opens exactly one connection, keeps it for the whole run, and
/// releases it when the operation returns — on success and on every error
/// path alike.
use crate::config::SqliteConfig;
use crate::core::Result;
use rusqlite::{Connection, OpenFlags};
use std::io;
use std::path::{Path, PathBuf};

/// Opens an existing SQLite database.
///
/// The connection string is a filesystem path. Opening never creates the
/// file: a missing database is a connection error, not an empty database.
pub fn open_database(connection_string: &str, sqlite: &SqliteConfig) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        connection_string,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_URI,
    )?;
    apply_pragmas(&conn, sqlite)?;
    Ok(conn)
}

/// Creates a brand-new database file at `<db_dir>/<file_name>` and opens it.
///
/// Refuses to clobber an existing file. Returns the connection together
/// with the path the database was created at.
pub fn create_database(
    db_dir: &Path,
    file_name: &str,
    sqlite: &SqliteConfig,
) -> Result<(Connection, PathBuf)> {
    let db_path = db_dir.join(file_name);
    if db_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("database file already exists: {}", db_path.display()),
        )
        .into());
    }

    let conn = Connection::open(&db_path)?;
    apply_pragmas(&conn, sqlite)?;
    Ok((conn, db_path))
}

/// Applies startup pragmas to a fresh connection.
fn apply_pragmas(conn: &Connection, sqlite: &SqliteConfig) -> Result<()> {
    if sqlite.foreign_keys.unwrap_or(true) {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    }
    if let Some(mode) = &sqlite.journal_mode {
        // Journal mode names are plain keywords; anything else is a config
        // mistake, not something to interpolate into a pragma.
        if !mode.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(crate::core::ForgeError::Config(format!(
                "invalid journal_mode: {mode}"
            )));
        }
        conn.execute_batch(&format!("PRAGMA journal_mode = {mode};"))?;
    }
    Ok(())
}
