mod schema;
mod store;
mod versioned_schema;

pub use schema::VERSIONED_SCHEMAS;
pub use store::SqliteStore;
pub use versioned_schema::{
    open_versioned, read_db_version, Column, ForeignKey, ForeignKeyOnChange, SqlType, Table,
    VersionedSchema, BASE_DB_VERSION, DEFAULT_TIMESTAMP,
};
pub(crate) use store::{datetime_from_unix, unix_now};
