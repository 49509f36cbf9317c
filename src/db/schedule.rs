use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Row};
use serde::{Deserialize, Serialize};
use tokio_rusqlite::Connection;
use uuid::Uuid;

use crate::db::{parse_stored_json, DbResult};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub customer_id: Option<Uuid>,
    /// Assigned worker ids, stored inline as a JSON array.
    pub workers: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Customer fields carried by the schedule listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventCustomer {
    pub id: Uuid,
    pub name: String,
    pub reference: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScheduleEventWithCustomer {
    #[serde(flatten)]
    pub event: ScheduleEvent,
    pub customer: Option<EventCustomer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEventInput {
    pub title: String,
    pub description: Option<String>,
    pub event_type: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub customer_id: Option<Uuid>,
    #[serde(default)]
    pub workers: Vec<String>,
}

const EVENT_COLUMNS: &str = r#"
    e.id, e.title, e.description, e.event_type, e.start_date, e.end_date,
    e.customer_id, e.workers, e.created_at"#;

pub struct ScheduleRepo {
    conn: Arc<Connection>,
}

impl ScheduleRepo {
    pub fn new(conn: Arc<Connection>) -> Self {
        Self { conn }
    }

    /// All events in start-time ascending order with the linked customer.
    pub async fn list(&self) -> DbResult<Vec<ScheduleEventWithCustomer>> {
        let events = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(&format!(
                    r#"SELECT {EVENT_COLUMNS}, c.id, c.name, c.reference
                       FROM schedule_event e
                       LEFT JOIN customer c ON c.id = e.customer_id
                       ORDER BY e.start_date ASC"#
                ))?;
                let mut rows = stmt.query([])?;
                let mut events = Vec::new();
                while let Some(row) = rows.next()? {
                    let customer = match row.get::<_, Option<Uuid>>(9)? {
                        Some(id) => Some(EventCustomer {
                            id,
                            name: row.get(10)?,
                            reference: row.get(11)?,
                        }),
                        None => None,
                    };
                    events.push(ScheduleEventWithCustomer {
                        event: row_to_event(row)?,
                        customer,
                    });
                }
                Ok(events)
            })
            .await?;
        Ok(events)
    }

    pub async fn create(&self, input: ScheduleEventInput) -> DbResult<ScheduleEvent> {
        let workers = serde_json::to_string(&input.workers)?;
        let created = self
            .conn
            .call(move |conn| {
                let id = Uuid::now_v7();
                let now = Utc::now();
                conn.execute(
                    r#"INSERT INTO schedule_event (
                        id, title, description, event_type, start_date, end_date,
                        customer_id, workers, created_at
                     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"#,
                    params![
                        id,
                        input.title,
                        input.description,
                        input.event_type.unwrap_or_else(|| "work".into()),
                        input.start_date,
                        input.end_date,
                        input.customer_id,
                        workers,
                        now
                    ],
                )?;
                let event = conn.query_row(
                    &format!("SELECT {EVENT_COLUMNS} FROM schedule_event e WHERE e.id = ?1"),
                    params![id],
                    row_to_event,
                )?;
                Ok(event)
            })
            .await?;
        Ok(created)
    }
}

fn row_to_event(row: &Row<'_>) -> rusqlite::Result<ScheduleEvent> {
    Ok(ScheduleEvent {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        event_type: row.get(3)?,
        start_date: row.get(4)?,
        end_date: row.get(5)?,
        customer_id: row.get(6)?,
        workers: parse_stored_json(Some(row.get(7)?), "schedule_event", "workers"),
        created_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::customer::{CustomerInput, CustomerRepo};
    use crate::db::open_in_memory;
    use chrono::TimeZone;

    fn event(title: &str, start: DateTime<Utc>, customer_id: Option<Uuid>) -> ScheduleEventInput {
        ScheduleEventInput {
            title: title.into(),
            description: None,
            event_type: None,
            start_date: start,
            end_date: start + chrono::Duration::hours(2),
            customer_id,
            workers: vec!["w1".into()],
        }
    }

    #[tokio::test]
    async fn list_orders_by_start_ascending() {
        let conn = Arc::new(open_in_memory().await.unwrap());
        let customer = CustomerRepo::new(Arc::clone(&conn))
            .create(CustomerInput {
                reference: None,
                name: "Acme".into(),
                phone: None,
                email: None,
                address: None,
                notes: None,
            })
            .await
            .unwrap();
        let repo = ScheduleRepo::new(conn);

        let late = Utc.with_ymd_and_hms(2026, 9, 2, 9, 0, 0).unwrap();
        let early = Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap();
        repo.create(event("Late", late, Some(customer.id))).await.unwrap();
        let created = repo.create(event("Early", early, None)).await.unwrap();
        assert_eq!(created.event_type, "work");
        assert_eq!(created.workers, vec!["w1".to_string()]);

        let listed = repo.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].event.title, "Early");
        assert!(listed[0].customer.is_none());
        let customer_ref = listed[1].customer.as_ref().expect("linked customer");
        assert_eq!(customer_ref.name, "Acme");
        assert_eq!(customer_ref.reference, customer.reference);
    }
}
