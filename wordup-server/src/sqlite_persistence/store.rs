use super::schema::VERSIONED_SCHEMAS;
use super::versioned_schema::open_versioned;
use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// The single SQLite database backing users, speeches and practice sessions.
///
/// The domain store traits are implemented on this type in their own
/// modules, so every handler shares one connection and one lock.
#[derive(Clone)]
pub struct SqliteStore {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new<T: AsRef<Path>>(db_path: T) -> Result<Self> {
        let conn = open_versioned(db_path, VERSIONED_SCHEMAS)?;
        Ok(SqliteStore {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

pub(crate) fn unix_now() -> i64 {
    Utc::now().timestamp()
}

pub(crate) fn datetime_from_unix(value: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(value, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
