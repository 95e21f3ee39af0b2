/// Core Module for dbforge
///
/// This module contains the fundamental components shared by the three
/// public operations: error handling and database connection management.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{ForgeError, Result};
