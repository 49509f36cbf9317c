use std::env;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_DATABASE_PATH: &str = "khs-crm.sqlite3";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// CORS origin; None means unrestricted.
    pub frontend_url: Option<String>,
    pub database_path: String,
}

impl Config {
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let frontend_url = env::var("FRONTEND_URL")
            .ok()
            .filter(|v| !v.is_empty() && v != "*");
        let database_path =
            env::var("DATABASE_PATH").unwrap_or_else(|_| DEFAULT_DATABASE_PATH.to_string());
        Self {
            port,
            frontend_url,
            database_path,
        }
    }
}
