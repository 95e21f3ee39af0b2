/// Database Module
///
/// Connection handling for the dbforge operations. Each public operation
/// owns exactly one connection for its whole duration; connections are plain
/// values handed down the call stack, never shared global state.
pub mod connection;

pub use connection::*;
