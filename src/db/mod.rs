pub mod customer;
pub mod job;
pub mod migrations;
pub mod schedule;
pub mod schema;
pub mod tools;
pub mod worker;

use log::warn;
use thiserror::Error;
use tokio_rusqlite::Connection;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] tokio_rusqlite::Error),
    #[error("invalid json payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Opens (or creates) the database file and brings the schema up to date.
pub async fn open(path: &str) -> DbResult<Connection> {
    let conn = Connection::open(path).await?;
    migrations::setup_migrations(&conn).await?;
    Ok(conn)
}

pub async fn open_in_memory() -> DbResult<Connection> {
    let conn = Connection::open_in_memory().await?;
    migrations::setup_migrations(&conn).await?;
    Ok(conn)
}

/// Decodes a stored JSON text column into a structured value.
///
/// Absent storage means "never written", which reads as an empty sequence.
/// Malformed stored text is degraded to the same empty sequence instead of
/// failing the read; the row predates the json_valid checks in that case.
pub(crate) fn parse_stored_json<T>(raw: Option<String>, table: &str, column: &str) -> T
where
    T: serde::de::DeserializeOwned + Default,
{
    match raw {
        None => T::default(),
        Some(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("{}.{} holds malformed json, treating as empty: {}", table, column, e);
            T::default()
        }),
    }
}
