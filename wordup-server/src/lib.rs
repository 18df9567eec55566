//! WordUp Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod coach;
pub mod config;
pub mod practice;
pub mod progress;
pub mod server;
pub mod speech;
pub mod sqlite_persistence;
pub mod store;
pub mod user;

// Re-export commonly used types for convenience
pub use server::{make_app, run_server, RequestsLoggingLevel};
pub use sqlite_persistence::SqliteStore;
pub use store::FullStore;
pub use user::{UserRole, UserStore};
