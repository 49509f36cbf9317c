//! Backend for the KHS CRM: customers, jobs, workers, tool inventories and
//! schedule events behind a JSON REST API, persisted in SQLite.
//!
//! Layers, bottom up: `db` holds the per-entity repositories on a single
//! `tokio_rusqlite` connection, `http` is the axum surface on top of them,
//! and the binary wires environment config to both.

pub mod config;
pub mod db;
pub mod http;
