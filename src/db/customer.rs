use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::Connection;
use uuid::Uuid;

use crate::db::DbResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub reference: String,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub is_archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Projection of a customer carried by job and schedule listings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSummary {
    pub id: Uuid,
    pub reference: String,
    pub name: String,
    pub address: Option<String>,
}

/// Job fields included with each row of the customer listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    pub id: Uuid,
    pub title: String,
    pub status: String,
    pub total_cost: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerWithJobs {
    #[serde(flatten)]
    pub customer: Customer,
    pub jobs: Vec<JobSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    pub reference: Option<String>,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerUpdate {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Derives the reference code for the (count+1)-th customer.
///
/// A01..A99 for the first hundred rows, then B01 and so on. The count
/// includes archived rows. Note the hundredth row of a block formats as
/// e.g. "A100": the two-digit pad does not cap the number.
pub fn next_reference(count: i64) -> String {
    let letter = (b'A' + (count / 100) as u8) as char;
    format!("{}{:02}", letter, count % 100 + 1)
}

const SELECT_ONE: &str = r#"
    SELECT id, reference, name, phone, email, address, notes,
           is_archived, created_at, updated_at
    FROM customer
    WHERE id = ?1"#;

pub struct CustomerRepo {
    conn: Arc<Connection>,
}

impl CustomerRepo {
    pub fn new(conn: Arc<Connection>) -> Self {
        Self { conn }
    }

    /// All non-archived customers, newest first, each with its job summaries.
    pub async fn list_active(&self) -> DbResult<Vec<CustomerWithJobs>> {
        let listing = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    r#"SELECT id, reference, name, phone, email, address, notes,
                              is_archived, created_at, updated_at
                       FROM customer
                       WHERE is_archived = 0
                       ORDER BY created_at DESC"#,
                )?;
                let mut rows = stmt.query([])?;
                let mut customers = Vec::new();
                while let Some(row) = rows.next()? {
                    customers.push(row_to_customer(row)?);
                }
                drop(rows);

                let mut stmt = conn.prepare(
                    r#"SELECT customer_id, id, title, status, total_cost
                       FROM job
                       ORDER BY created_at DESC"#,
                )?;
                let mut rows = stmt.query([])?;
                let mut by_customer: HashMap<Uuid, Vec<JobSummary>> = HashMap::new();
                while let Some(row) = rows.next()? {
                    let customer_id: Uuid = row.get(0)?;
                    by_customer.entry(customer_id).or_default().push(JobSummary {
                        id: row.get(1)?,
                        title: row.get(2)?,
                        status: row.get(3)?,
                        total_cost: row.get(4)?,
                    });
                }

                Ok(customers
                    .into_iter()
                    .map(|customer| {
                        let jobs = by_customer.remove(&customer.id).unwrap_or_default();
                        CustomerWithJobs { customer, jobs }
                    })
                    .collect())
            })
            .await?;
        Ok(listing)
    }

    /// Inserts a customer, reserving the next reference code when the caller
    /// did not supply one. Count and insert run inside one transaction, so
    /// two concurrent creations cannot observe the same count.
    pub async fn create(&self, input: CustomerInput) -> DbResult<Customer> {
        let created = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let reference = match input.reference {
                    Some(reference) => reference,
                    None => {
                        let count: i64 =
                            tx.query_row("SELECT COUNT(*) FROM customer", [], |r| r.get(0))?;
                        next_reference(count)
                    }
                };
                let id = Uuid::now_v7();
                let now = Utc::now();
                tx.execute(
                    r#"INSERT INTO customer (
                        id, reference, name, phone, email, address, notes,
                        is_archived, created_at, updated_at
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8, ?8)"#,
                    params![
                        id,
                        reference,
                        input.name,
                        input.phone,
                        input.email,
                        input.address,
                        input.notes,
                        now
                    ],
                )?;
                let customer = tx.query_row(SELECT_ONE, params![id], row_to_customer)?;
                tx.commit()?;
                Ok(customer)
            })
            .await?;
        Ok(created)
    }

    /// Full-field overwrite of the addressed row. Returns None when no row
    /// matched the id.
    pub async fn update(&self, id: Uuid, input: CustomerUpdate) -> DbResult<Option<Customer>> {
        let updated = self
            .conn
            .call(move |conn| {
                let now = Utc::now();
                let changed = conn.execute(
                    r#"UPDATE customer
                       SET name = ?1, phone = ?2, email = ?3, address = ?4, notes = ?5,
                           updated_at = ?6
                       WHERE id = ?7"#,
                    params![
                        input.name,
                        input.phone,
                        input.email,
                        input.address,
                        input.notes,
                        now,
                        id
                    ],
                )?;
                if changed == 0 {
                    return Ok(None);
                }
                let customer = conn.query_row(SELECT_ONE, params![id], row_to_customer)?;
                Ok(Some(customer))
            })
            .await?;
        Ok(updated)
    }

    /// Soft delete: flips the archival flag, the row stays in storage.
    pub async fn archive(&self, id: Uuid) -> DbResult<bool> {
        let archived = self
            .conn
            .call(move |conn| {
                let now = Utc::now();
                let changed = conn.execute(
                    "UPDATE customer SET is_archived = 1, updated_at = ?1 WHERE id = ?2",
                    params![now, id],
                )?;
                Ok(changed > 0)
            })
            .await?;
        Ok(archived)
    }

    /// Fetch by id regardless of the archival flag.
    pub async fn get(&self, id: Uuid) -> DbResult<Option<Customer>> {
        let customer = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(SELECT_ONE)?;
                let mut rows = stmt.query(params![id])?;
                match rows.next()? {
                    Some(row) => Ok(Some(row_to_customer(row)?)),
                    None => Ok(None),
                }
            })
            .await?;
        Ok(customer)
    }

    /// Total row count, archived rows included.
    pub async fn count(&self) -> DbResult<i64> {
        let count = self
            .conn
            .call(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM customer", [], |r| r.get(0))?))
            .await?;
        Ok(count)
    }
}

fn row_to_customer(row: &Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        reference: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        address: row.get(5)?,
        notes: row.get(6)?,
        is_archived: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open_in_memory;

    fn input(name: &str, reference: Option<&str>) -> CustomerInput {
        CustomerInput {
            reference: reference.map(str::to_string),
            name: name.to_string(),
            phone: None,
            email: None,
            address: None,
            notes: None,
        }
    }

    #[test]
    fn reference_sequence() {
        assert_eq!(next_reference(0), "A01");
        assert_eq!(next_reference(1), "A02");
        assert_eq!(next_reference(98), "A99");
        // The pad does not cap the number, so the hundredth row overflows
        // the two-digit format.
        assert_eq!(next_reference(99), "A100");
        assert_eq!(next_reference(100), "B01");
        assert_eq!(next_reference(199), "B100");
        assert_eq!(next_reference(200), "C01");
    }

    #[tokio::test]
    async fn create_assigns_references_in_order() {
        let conn = open_in_memory().await.unwrap();
        let repo = CustomerRepo::new(Arc::new(conn));

        let first = repo.create(input("First", None)).await.unwrap();
        let second = repo.create(input("Second", None)).await.unwrap();
        assert_eq!(first.reference, "A01");
        assert_eq!(second.reference, "A02");

        // A caller-supplied reference is taken as-is and does not advance
        // the sequence logic, which only looks at the row count.
        let explicit = repo.create(input("Third", Some("Z99"))).await.unwrap();
        assert_eq!(explicit.reference, "Z99");
        let fourth = repo.create(input("Fourth", None)).await.unwrap();
        assert_eq!(fourth.reference, "A04");
    }

    #[tokio::test]
    async fn archive_hides_from_listing_but_keeps_row() {
        let conn = open_in_memory().await.unwrap();
        let repo = CustomerRepo::new(Arc::new(conn));

        let kept = repo.create(input("Kept", None)).await.unwrap();
        let gone = repo.create(input("Gone", None)).await.unwrap();

        assert!(repo.archive(gone.id).await.unwrap());

        let listing = repo.list_active().await.unwrap();
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].customer.id, kept.id);

        let row = repo.get(gone.id).await.unwrap().expect("row still stored");
        assert!(row.is_archived);

        // Archived rows still count toward reference generation.
        assert_eq!(repo.count().await.unwrap(), 2);
        let next = repo.create(input("Next", None)).await.unwrap();
        assert_eq!(next.reference, "A03");
    }

    #[tokio::test]
    async fn update_overwrites_all_fields() {
        let conn = open_in_memory().await.unwrap();
        let repo = CustomerRepo::new(Arc::new(conn));

        let created = repo
            .create(CustomerInput {
                reference: None,
                name: "Before".into(),
                phone: Some("0123".into()),
                email: Some("a@b.c".into()),
                address: None,
                notes: Some("note".into()),
            })
            .await
            .unwrap();

        let updated = repo
            .update(
                created.id,
                CustomerUpdate {
                    name: "After".into(),
                    phone: None,
                    email: None,
                    address: Some("1 High St".into()),
                    notes: None,
                },
            )
            .await
            .unwrap()
            .expect("row exists");

        assert_eq!(updated.name, "After");
        assert_eq!(updated.phone, None);
        assert_eq!(updated.address.as_deref(), Some("1 High St"));
        // The reference never changes on update.
        assert_eq!(updated.reference, created.reference);

        let missing = repo
            .update(
                Uuid::now_v7(),
                CustomerUpdate {
                    name: "Nobody".into(),
                    phone: None,
                    email: None,
                    address: None,
                    notes: None,
                },
            )
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn hundredth_customer_rolls_to_next_letter() {
        let conn = open_in_memory().await.unwrap();
        let repo = CustomerRepo::new(Arc::new(conn));

        for i in 0..99 {
            repo.create(input(&format!("Customer {i}"), None)).await.unwrap();
        }
        let hundredth = repo.create(input("Customer 99", None)).await.unwrap();
        assert_eq!(hundredth.reference, "A100");
        let next = repo.create(input("Customer 100", None)).await.unwrap();
        assert_eq!(next.reference, "B01");
    }
}
