use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::warn;
use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use crate::db::{parse_stored_json, DbResult};

/// Fixed identifier of the tools sync singleton row.
pub const SYNC_ROW_ID: &str = "main";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolItem {
    pub id: Uuid,
    pub list_id: Uuid,
    pub name: String,
    pub sort_order: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolList {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub sort_order: i64,
    pub items: Vec<ToolItem>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCategory {
    pub id: Uuid,
    pub name: String,
    pub sort_order: i64,
    pub tool_lists: Vec<ToolList>,
}

/// The shared mutable blob plus its optimistic version counter. The counter
/// only ever increases; nothing compares it on write.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsSyncState {
    pub id: String,
    pub tools: Value,
    pub selected_demo_categories: Vec<String>,
    pub selected_install_categories: Vec<String>,
    pub locked_categories: Vec<String>,
    pub show_demo: bool,
    pub show_install: bool,
    pub version: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for ToolsSyncState {
    fn default() -> Self {
        Self {
            id: SYNC_ROW_ID.to_string(),
            tools: empty_object(),
            selected_demo_categories: Vec::new(),
            selected_install_categories: Vec::new(),
            locked_categories: Vec::new(),
            show_demo: false,
            show_install: false,
            version: 1,
            last_updated_by: None,
            updated_at: None,
        }
    }
}

/// Upsert payload. Every omitted field falls back to its empty/false
/// default; the merge replaces, it does not preserve.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolsSyncInput {
    #[serde(default = "empty_object")]
    pub tools: Value,
    #[serde(default)]
    pub selected_demo_categories: Vec<String>,
    #[serde(default)]
    pub selected_install_categories: Vec<String>,
    #[serde(default)]
    pub locked_categories: Vec<String>,
    #[serde(default)]
    pub show_demo: bool,
    #[serde(default)]
    pub show_install: bool,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

const SELECT_SYNC: &str = r#"
    SELECT id, tools, selected_demo_categories, selected_install_categories,
           locked_categories, show_demo, show_install, version,
           last_updated_by, updated_at
    FROM tools_sync
    WHERE id = ?1"#;

pub struct ToolsRepo {
    conn: Arc<Connection>,
}

impl ToolsRepo {
    pub fn new(conn: Arc<Connection>) -> Self {
        Self { conn }
    }

    /// The full category -> list -> item tree, sort-key ordered at every level.
    pub async fn list_tree(&self) -> DbResult<Vec<ToolCategory>> {
        let tree = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, name, sort_order FROM tool_category ORDER BY sort_order ASC",
                )?;
                let mut rows = stmt.query([])?;
                let mut categories = Vec::new();
                while let Some(row) = rows.next()? {
                    categories.push(ToolCategory {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        sort_order: row.get(2)?,
                        tool_lists: Vec::new(),
                    });
                }
                drop(rows);

                let mut stmt = conn.prepare(
                    "SELECT id, category_id, name, sort_order FROM tool_list ORDER BY sort_order ASC",
                )?;
                let mut rows = stmt.query([])?;
                let mut lists_by_category: HashMap<Uuid, Vec<ToolList>> = HashMap::new();
                let mut list_slot: HashMap<Uuid, (Uuid, usize)> = HashMap::new();
                while let Some(row) = rows.next()? {
                    let list = ToolList {
                        id: row.get(0)?,
                        category_id: row.get(1)?,
                        name: row.get(2)?,
                        sort_order: row.get(3)?,
                        items: Vec::new(),
                    };
                    let bucket = lists_by_category.entry(list.category_id).or_default();
                    list_slot.insert(list.id, (list.category_id, bucket.len()));
                    bucket.push(list);
                }
                drop(rows);

                let mut stmt = conn.prepare(
                    "SELECT id, list_id, name, sort_order FROM tool_item ORDER BY sort_order ASC",
                )?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    let item = ToolItem {
                        id: row.get(0)?,
                        list_id: row.get(1)?,
                        name: row.get(2)?,
                        sort_order: row.get(3)?,
                    };
                    if let Some(&(category_id, idx)) = list_slot.get(&item.list_id) {
                        if let Some(lists) = lists_by_category.get_mut(&category_id) {
                            lists[idx].items.push(item);
                        }
                    }
                }

                for category in &mut categories {
                    category.tool_lists =
                        lists_by_category.remove(&category.id).unwrap_or_default();
                }
                Ok(categories)
            })
            .await?;
        Ok(tree)
    }

    /// The singleton row, or None when it was never written.
    pub async fn sync_get(&self) -> DbResult<Option<ToolsSyncState>> {
        let state = self
            .conn
            .call(|conn| {
                Ok(conn
                    .query_row(SELECT_SYNC, params![SYNC_ROW_ID], row_to_sync)
                    .optional()?)
            })
            .await?;
        Ok(state)
    }

    /// Create-or-replace of the singleton row. On an existing row the version
    /// counter advances by exactly one; a fresh row starts at 1.
    pub async fn sync_upsert(
        &self,
        input: ToolsSyncInput,
        editor: &str,
    ) -> DbResult<ToolsSyncState> {
        let tools = serde_json::to_string(&input.tools)?;
        let demo = serde_json::to_string(&input.selected_demo_categories)?;
        let install = serde_json::to_string(&input.selected_install_categories)?;
        let locked = serde_json::to_string(&input.locked_categories)?;
        let editor = editor.to_string();
        let state = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let now = Utc::now();
                let existing: Option<i64> = tx
                    .query_row(
                        "SELECT version FROM tools_sync WHERE id = ?1",
                        params![SYNC_ROW_ID],
                        |r| r.get(0),
                    )
                    .optional()?;
                match existing {
                    Some(version) => {
                        tx.execute(
                            r#"UPDATE tools_sync
                               SET tools = ?1, selected_demo_categories = ?2,
                                   selected_install_categories = ?3, locked_categories = ?4,
                                   show_demo = ?5, show_install = ?6, version = ?7,
                                   last_updated_by = ?8, updated_at = ?9
                               WHERE id = ?10"#,
                            params![
                                tools,
                                demo,
                                install,
                                locked,
                                input.show_demo,
                                input.show_install,
                                version + 1,
                                editor,
                                now,
                                SYNC_ROW_ID
                            ],
                        )?;
                    }
                    None => {
                        tx.execute(
                            r#"INSERT INTO tools_sync (
                                id, tools, selected_demo_categories,
                                selected_install_categories, locked_categories,
                                show_demo, show_install, version, last_updated_by, updated_at
                             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8, ?9)"#,
                            params![
                                SYNC_ROW_ID,
                                tools,
                                demo,
                                install,
                                locked,
                                input.show_demo,
                                input.show_install,
                                editor,
                                now
                            ],
                        )?;
                    }
                }
                let state = tx.query_row(SELECT_SYNC, params![SYNC_ROW_ID], row_to_sync)?;
                tx.commit()?;
                Ok(state)
            })
            .await?;
        Ok(state)
    }
}

fn row_to_sync(row: &Row<'_>) -> rusqlite::Result<ToolsSyncState> {
    let tools_raw: String = row.get(1)?;
    let tools = serde_json::from_str(&tools_raw).unwrap_or_else(|e| {
        warn!("tools_sync.tools holds malformed json, treating as empty: {}", e);
        empty_object()
    });
    Ok(ToolsSyncState {
        id: row.get(0)?,
        tools,
        selected_demo_categories: parse_stored_json(
            Some(row.get(2)?),
            "tools_sync",
            "selected_demo_categories",
        ),
        selected_install_categories: parse_stored_json(
            Some(row.get(3)?),
            "tools_sync",
            "selected_install_categories",
        ),
        locked_categories: parse_stored_json(Some(row.get(4)?), "tools_sync", "locked_categories"),
        show_demo: row.get(5)?,
        show_install: row.get(6)?,
        version: row.get(7)?,
        last_updated_by: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
