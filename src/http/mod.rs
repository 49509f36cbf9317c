pub mod auth;
pub mod customers;
pub mod error;
pub mod health;
pub mod jobs;
pub mod router;
pub mod schedule;
pub mod state;
pub mod tools;
pub mod workers;

pub use router::router;
