use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use crate::db::customer::{Customer, CustomerSummary};
use crate::db::{parse_stored_json, DbResult};

/// A job row as stored. The three free-form collections stay JSON text
/// here; they are only materialized on single-item reads.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub customer_id: Uuid,
    pub status: String,
    pub priority: String,
    pub total_cost: f64,
    pub deposit_paid: f64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub tasks: Option<String>,
    pub photos: Option<String>,
    pub plans: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row: job plus the owning customer's summary fields.
#[derive(Debug, Clone, Serialize)]
pub struct JobListItem {
    #[serde(flatten)]
    pub job: Job,
    pub customer: Option<CustomerSummary>,
}

/// Create/update result: job plus the full customer row.
#[derive(Debug, Clone, Serialize)]
pub struct JobWithCustomer {
    #[serde(flatten)]
    pub job: Job,
    pub customer: Option<Customer>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub quantity: f64,
    pub unit: Option<String>,
    pub cost: f64,
    pub purchased: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAssignment {
    pub id: Uuid,
    pub job_id: Uuid,
    pub worker_id: Uuid,
    pub user: Option<AssignedUser>,
}

/// Single-item read: relations attached and the stored collection text
/// decoded into structured arrays (absent storage reads as empty).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub customer_id: Uuid,
    pub status: String,
    pub priority: String,
    pub total_cost: f64,
    pub deposit_paid: f64,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub tasks: Vec<Value>,
    pub photos: Vec<Value>,
    pub plans: Vec<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer: Option<CustomerSummary>,
    pub materials: Vec<Material>,
    pub assignments: Vec<JobAssignment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInput {
    pub title: String,
    pub description: Option<String>,
    pub customer_id: Uuid,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub total_cost: Option<f64>,
    pub deposit_paid: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub tasks: Option<Value>,
    pub photos: Option<Value>,
    pub plans: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobUpdate {
    pub title: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub total_cost: Option<f64>,
    pub deposit_paid: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub tasks: Option<Value>,
    pub photos: Option<Value>,
    pub plans: Option<Value>,
}

const DEFAULT_STATUS: &str = "QUOTED";
const DEFAULT_PRIORITY: &str = "medium";

const JOB_COLUMNS: &str = r#"
    j.id, j.title, j.description, j.customer_id, j.status, j.priority,
    j.total_cost, j.deposit_paid, j.start_date, j.end_date, j.notes,
    j.tasks, j.photos, j.plans, j.created_at, j.updated_at"#;

pub struct JobRepo {
    conn: Arc<Connection>,
}

impl JobRepo {
    pub fn new(conn: Arc<Connection>) -> Self {
        Self { conn }
    }

    /// All jobs, newest first, with the owning customer's summary.
    pub async fn list(&self) -> DbResult<Vec<JobListItem>> {
        let jobs = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    r#"SELECT {JOB_COLUMNS},
                              c.id, c.reference, c.name, c.address
                       FROM job j
                       LEFT JOIN customer c ON c.id = j.customer_id
                       ORDER BY j.created_at DESC"#
                ))?;
                let mut rows = stmt.query([])?;
                let mut jobs = Vec::new();
                while let Some(row) = rows.next()? {
                    jobs.push(JobListItem {
                        job: row_to_job(row)?,
                        customer: customer_summary_at(row, 16)?,
                    });
                }
                Ok(jobs)
            })
            .await?;
        Ok(jobs)
    }

    /// One job with materials, worker assignments and decoded collections.
    pub async fn get(&self, id: Uuid) -> DbResult<Option<JobDetail>> {
        let detail = self
            .conn
            .call(move |conn| {
                let base = {
                    let mut stmt = conn.prepare(&format!(
                        r#"SELECT {JOB_COLUMNS},
                                  c.id, c.reference, c.name, c.address
                           FROM job j
                           LEFT JOIN customer c ON c.id = j.customer_id
                           WHERE j.id = ?1"#
                    ))?;
                    let mut rows = stmt.query(params![id])?;
                    match rows.next()? {
                        Some(row) => Some((row_to_job(row)?, customer_summary_at(row, 16)?)),
                        None => None,
                    }
                };
                let Some((job, customer)) = base else {
                    return Ok(None);
                };

                let mut stmt = conn.prepare(
                    r#"SELECT id, job_id, name, quantity, unit, cost, purchased
                       FROM material
                       WHERE job_id = ?1"#,
                )?;
                let mut rows = stmt.query(params![id])?;
                let mut materials = Vec::new();
                while let Some(row) = rows.next()? {
                    materials.push(Material {
                        id: row.get(0)?,
                        job_id: row.get(1)?,
                        name: row.get(2)?,
                        quantity: row.get(3)?,
                        unit: row.get(4)?,
                        cost: row.get(5)?,
                        purchased: row.get(6)?,
                    });
                }
                drop(rows);

                let mut stmt = conn.prepare(
                    r#"SELECT a.id, a.job_id, a.worker_id, w.id, w.name, w.email
                       FROM job_assignment a
                       LEFT JOIN worker w ON w.id = a.worker_id
                       WHERE a.job_id = ?1"#,
                )?;
                let mut rows = stmt.query(params![id])?;
                let mut assignments = Vec::new();
                while let Some(row) = rows.next()? {
                    let user = match row.get::<_, Option<Uuid>>(3)? {
                        Some(user_id) => Some(AssignedUser {
                            id: user_id,
                            name: row.get(4)?,
                            email: row.get(5)?,
                        }),
                        None => None,
                    };
                    assignments.push(JobAssignment {
                        id: row.get(0)?,
                        job_id: row.get(1)?,
                        worker_id: row.get(2)?,
                        user,
                    });
                }

                Ok(Some(JobDetail {
                    id: job.id,
                    title: job.title,
                    description: job.description,
                    customer_id: job.customer_id,
                    status: job.status,
                    priority: job.priority,
                    total_cost: job.total_cost,
                    deposit_paid: job.deposit_paid,
                    start_date: job.start_date,
                    end_date: job.end_date,
                    notes: job.notes,
                    tasks: parse_stored_json(job.tasks, "job", "tasks"),
                    photos: parse_stored_json(job.photos, "job", "photos"),
                    plans: parse_stored_json(job.plans, "job", "plans"),
                    created_at: job.created_at,
                    updated_at: job.updated_at,
                    customer,
                    materials,
                    assignments,
                }))
            })
            .await?;
        Ok(detail)
    }

    pub async fn create(&self, input: JobInput) -> DbResult<JobWithCustomer> {
        let tasks = encode_collection(input.tasks.as_ref())?;
        let photos = encode_collection(input.photos.as_ref())?;
        let plans = encode_collection(input.plans.as_ref())?;
        let created = self
            .conn
            .call(move |conn| {
                let id = Uuid::now_v7();
                let now = Utc::now();
                conn.execute(
                    r#"INSERT INTO job (
                        id, title, description, customer_id, status, priority,
                        total_cost, deposit_paid, start_date, end_date, notes,
                        tasks, photos, plans, created_at, updated_at
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?15)"#,
                    params![
                        id,
                        input.title,
                        input.description,
                        input.customer_id,
                        input.status.unwrap_or_else(|| DEFAULT_STATUS.into()),
                        input.priority.unwrap_or_else(|| DEFAULT_PRIORITY.into()),
                        input.total_cost.unwrap_or(0.0),
                        input.deposit_paid.unwrap_or(0.0),
                        input.start_date,
                        input.end_date,
                        input.notes,
                        tasks,
                        photos,
                        plans,
                        now
                    ],
                )?;
                Ok(select_with_customer(conn, id)?)
            })
            .await?;
        Ok(created)
    }

    /// Full-field overwrite. Omitted optional fields are written as NULL,
    /// not left unchanged. Returns None when no row matched the id.
    pub async fn update(&self, id: Uuid, input: JobUpdate) -> DbResult<Option<JobWithCustomer>> {
        let tasks = encode_collection(input.tasks.as_ref())?;
        let photos = encode_collection(input.photos.as_ref())?;
        let plans = encode_collection(input.plans.as_ref())?;
        let updated = self
            .conn
            .call(move |conn| {
                let now = Utc::now();
                let changed = conn.execute(
                    r#"UPDATE job
                       SET title = ?1, description = ?2, status = ?3, priority = ?4,
                           total_cost = ?5, deposit_paid = ?6, start_date = ?7,
                           end_date = ?8, notes = ?9, tasks = ?10, photos = ?11,
                           plans = ?12, updated_at = ?13
                       WHERE id = ?14"#,
                    params![
                        input.title,
                        input.description,
                        input.status.unwrap_or_else(|| DEFAULT_STATUS.into()),
                        input.priority.unwrap_or_else(|| DEFAULT_PRIORITY.into()),
                        input.total_cost.unwrap_or(0.0),
                        input.deposit_paid.unwrap_or(0.0),
                        input.start_date,
                        input.end_date,
                        input.notes,
                        tasks,
                        photos,
                        plans,
                        now,
                        id
                    ],
                )?;
                if changed == 0 {
                    return Ok(None);
                }
                Ok(Some(select_with_customer(conn, id)?))
            })
            .await?;
        Ok(updated)
    }
}

/// Collections are serialized to text only when provided; absent stays NULL,
/// never an empty serialization.
fn encode_collection(value: Option<&Value>) -> DbResult<Option<String>> {
    Ok(value.map(serde_json::to_string).transpose()?)
}

fn select_with_customer(conn: &rusqlite::Connection, id: Uuid) -> rusqlite::Result<JobWithCustomer> {
    conn.query_row(
        &format!(
            r#"SELECT {JOB_COLUMNS},
                      c.id, c.reference, c.name, c.phone, c.email, c.address,
                      c.notes, c.is_archived, c.created_at, c.updated_at
               FROM job j
               LEFT JOIN customer c ON c.id = j.customer_id
               WHERE j.id = ?1"#
        ),
        params![id],
        |row| {
            let customer = match row.get::<_, Option<Uuid>>(16)? {
                Some(customer_id) => Some(Customer {
                    id: customer_id,
                    reference: row.get(17)?,
                    name: row.get(18)?,
                    phone: row.get(19)?,
                    email: row.get(20)?,
                    address: row.get(21)?,
                    notes: row.get(22)?,
                    is_archived: row.get(23)?,
                    created_at: row.get(24)?,
                    updated_at: row.get(25)?,
                }),
                None => None,
            };
            Ok(JobWithCustomer {
                job: row_to_job(row)?,
                customer,
            })
        },
    )
}

fn row_to_job(row: &Row<'_>) -> rusqlite::Result<Job> {
    Ok(Job {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        customer_id: row.get(3)?,
        status: row.get(4)?,
        priority: row.get(5)?,
        total_cost: row.get(6)?,
        deposit_paid: row.get(7)?,
        start_date: row.get(8)?,
        end_date: row.get(9)?,
        notes: row.get(10)?,
        tasks: row.get(11)?,
        photos: row.get(12)?,
        plans: row.get(13)?,
        created_at: row.get(14)?,
        updated_at: row.get(15)?,
    })
}

fn customer_summary_at(row: &Row<'_>, base: usize) -> rusqlite::Result<Option<CustomerSummary>> {
    Ok(match row.get::<_, Option<Uuid>>(base)? {
        Some(id) => Some(CustomerSummary {
            id,
            reference: row.get(base + 1)?,
            name: row.get(base + 2)?,
            address: row.get(base + 3)?,
        }),
        None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::customer::{CustomerInput, CustomerRepo};
    use crate::db::open_in_memory;
    use serde_json::json;

    async fn setup() -> (Arc<Connection>, Uuid) {
        let conn = Arc::new(open_in_memory().await.unwrap());
        let customer = CustomerRepo::new(Arc::clone(&conn))
            .create(CustomerInput {
                reference: None,
                name: "Acme".into(),
                phone: None,
                email: None,
                address: Some("2 Low Rd".into()),
                notes: None,
            })
            .await
            .unwrap();
        (conn, customer.id)
    }

    fn minimal(customer_id: Uuid) -> JobInput {
        JobInput {
            title: "Kitchen refit".into(),
            description: None,
            customer_id,
            status: None,
            priority: None,
            total_cost: None,
            deposit_paid: None,
            start_date: None,
            end_date: None,
            notes: None,
            tasks: None,
            photos: None,
            plans: None,
        }
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let (conn, customer_id) = setup().await;
        let repo = JobRepo::new(conn);

        let created = repo.create(minimal(customer_id)).await.unwrap();
        assert_eq!(created.job.status, "QUOTED");
        assert_eq!(created.job.priority, "medium");
        assert_eq!(created.job.total_cost, 0.0);
        assert_eq!(created.job.deposit_paid, 0.0);
        // No collections supplied: stored as absent, not as "[]".
        assert_eq!(created.job.tasks, None);
        assert_eq!(created.customer.as_ref().unwrap().name, "Acme");
    }

    #[tokio::test]
    async fn collections_round_trip_on_single_item_read() {
        let (conn, customer_id) = setup().await;
        let repo = JobRepo::new(conn);

        let mut input = minimal(customer_id);
        input.tasks = Some(json!([{"id": 1}]));
        let created = repo.create(input).await.unwrap();

        let detail = repo.get(created.job.id).await.unwrap().unwrap();
        assert_eq!(detail.tasks, vec![json!({"id": 1})]);
        assert_eq!(detail.photos, Vec::<Value>::new());
        assert_eq!(detail.plans, Vec::<Value>::new());
        assert_eq!(detail.customer.as_ref().unwrap().address.as_deref(), Some("2 Low Rd"));
        assert!(detail.materials.is_empty());
        assert!(detail.assignments.is_empty());
    }

    #[tokio::test]
    async fn get_missing_job_is_none() {
        let (conn, _) = setup().await;
        let repo = JobRepo::new(conn);
        assert!(repo.get(Uuid::now_v7()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_nulls_omitted_dates() {
        let (conn, customer_id) = setup().await;
        let repo = JobRepo::new(conn);

        let mut input = minimal(customer_id);
        input.start_date = Some(Utc::now());
        input.end_date = Some(Utc::now());
        let created = repo.create(input).await.unwrap();
        assert!(created.job.start_date.is_some());

        let updated = repo
            .update(
                created.job.id,
                JobUpdate {
                    title: "Kitchen refit phase 2".into(),
                    description: None,
                    status: Some("SCHEDULED".into()),
                    priority: None,
                    total_cost: Some(1200.0),
                    deposit_paid: None,
                    start_date: None,
                    end_date: None,
                    notes: None,
                    tasks: None,
                    photos: None,
                    plans: None,
                },
            )
            .await
            .unwrap()
            .expect("row exists");

        assert_eq!(updated.job.title, "Kitchen refit phase 2");
        assert_eq!(updated.job.status, "SCHEDULED");
        assert_eq!(updated.job.total_cost, 1200.0);
        // Omitted dates are explicitly nulled, not preserved.
        assert_eq!(updated.job.start_date, None);
        assert_eq!(updated.job.end_date, None);
    }

    #[tokio::test]
    async fn detail_includes_materials_and_assignments() {
        let (conn, customer_id) = setup().await;
        let repo = JobRepo::new(Arc::clone(&conn));
        let created = repo.create(minimal(customer_id)).await.unwrap();
        let job_id = created.job.id;

        let worker_id = Uuid::now_v7();
        conn.call(move |conn| {
            let now = Utc::now();
            conn.execute(
                "INSERT INTO worker (id, name, full_name, specialty, status, color, created_at, updated_at)
                 VALUES (?1, 'Sam', 'Sam Smith', 'General', 'Available', '#3B82F6', ?2, ?2)",
                params![worker_id, now],
            )?;
            conn.execute(
                "INSERT INTO material (id, job_id, name, quantity, unit, cost, purchased)
                 VALUES (?1, ?2, 'Plasterboard', 12, 'sheets', 96.0, 1)",
                params![Uuid::now_v7(), job_id],
            )?;
            conn.execute(
                "INSERT INTO job_assignment (id, job_id, worker_id) VALUES (?1, ?2, ?3)",
                params![Uuid::now_v7(), job_id, worker_id],
            )?;
            Ok(())
        })
        .await
        .unwrap();

        let detail = repo.get(job_id).await.unwrap().unwrap();
        assert_eq!(detail.materials.len(), 1);
        assert_eq!(detail.materials[0].name, "Plasterboard");
        assert!(detail.materials[0].purchased);
        assert_eq!(detail.assignments.len(), 1);
        let user = detail.assignments[0].user.as_ref().expect("worker joined");
        assert_eq!(user.name, "Sam");
    }
}
