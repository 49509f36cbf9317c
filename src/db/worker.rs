use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::Connection;
use uuid::Uuid;

use crate::db::DbResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: Uuid,
    pub name: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub specialty: String,
    pub status: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerInput {
    pub name: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
    pub status: Option<String>,
    pub color: Option<String>,
}

pub struct WorkerRepo {
    conn: Arc<Connection>,
}

impl WorkerRepo {
    pub fn new(conn: Arc<Connection>) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> DbResult<Vec<Worker>> {
        let workers = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT id, name, full_name, phone, email, specialty, status, color,
                              created_at, updated_at
                       FROM worker
                       ORDER BY created_at DESC"#,
                )?;
                let mut rows = stmt.query([])?;
                let mut workers = Vec::new();
                while let Some(row) = rows.next()? {
                    workers.push(row_to_worker(row)?);
                }
                Ok(workers)
            })
            .await?;
        Ok(workers)
    }

    /// The display name doubles as the full name when none is supplied.
    pub async fn create(&self, input: WorkerInput) -> DbResult<Worker> {
        let created = self
            .conn
            .call(move |conn| {
                let id = Uuid::now_v7();
                let now = Utc::now();
                let full_name = input.full_name.unwrap_or_else(|| input.name.clone());
                conn.execute(
                    r#"INSERT INTO worker (
                        id, name, full_name, phone, email, specialty, status, color,
                        created_at, updated_at
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9)"#,
                    params![
                        id,
                        input.name,
                        full_name,
                        input.phone.unwrap_or_default(),
                        input.email.unwrap_or_default(),
                        input.specialty.unwrap_or_else(|| "General".into()),
                        input.status.unwrap_or_else(|| "Available".into()),
                        input.color.unwrap_or_else(|| "#3B82F6".into()),
                        now
                    ],
                )?;
                let worker = conn.query_row(
                    r#"SELECT id, name, full_name, phone, email, specialty, status, color,
                              created_at, updated_at
                       FROM worker
                       WHERE id = ?1"#,
                    params![id],
                    row_to_worker,
                )?;
                Ok(worker)
            })
            .await?;
        Ok(created)
    }
}

fn row_to_worker(row: &Row<'_>) -> rusqlite::Result<Worker> {
    Ok(Worker {
        id: row.get(0)?,
        name: row.get(1)?,
        full_name: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        specialty: row.get(5)?,
        status: row.get(6)?,
        color: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    #[tokio::test]
    async fn create_fills_defaults() {
        let conn = Arc::new(open_in_memory().await.unwrap());
        let repo = WorkerRepo::new(conn);

        let created = repo
            .create(WorkerInput {
                name: "Sam".into(),
                full_name: None,
                phone: None,
                email: None,
                specialty: None,
                status: None,
                color: None,
            })
            .await
            .unwrap();

        assert_eq!(created.full_name, "Sam");
        assert_eq!(created.phone, "");
        assert_eq!(created.email, "");
        assert_eq!(created.specialty, "General");
        assert_eq!(created.status, "Available");
        assert_eq!(created.color, "#3B82F6");

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
    }
}
