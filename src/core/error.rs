/// dbforge Error Module
///
/// This module defines the error types shared by every dbforge operation.
/// One crate-wide enum keeps error propagation uniform between the CLI,
/// the script pipeline, and the schema reflector.
use thiserror::Error;

/// Crate-wide error type.
///
/// The variants mirror the failure taxonomy of the three public operations:
/// - Argument errors abort before any database work starts
/// - Database and I/O errors are fatal to the running operation
/// - Script errors cover malformed script input (bad terminator usage,
///   unparsable catalog statements)
/// - Schema errors cover reflection-level failures during export
#[derive(Error, Debug)]
pub enum ForgeError {
    /// Missing or malformed command-line argument
    #[error("Argument error: {0}")]
    Argument(String),

    /// Database-related errors from SQLite operations
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed script input
    #[error("Script error: {0}")]
    Script(String),

    /// Schema reflection errors
    #[error("Schema error: {0}")]
    Schema(String),

    /// Configuration loading and validation errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Result to use ForgeError as the error type.
pub type Result<T> = std::result::Result<T, ForgeError>;
