use tokio_rusqlite::Connection;

use crate::db::schema::SCHEMA_V1;
use crate::db::DbResult;

pub async fn setup_migrations(conn: &Connection) -> DbResult<()> {
    conn.call(|conn| {
        let ver: i32 = conn.query_row("PRAGMA user_version;", [], |r| r.get(0))?;

        if ver < 1 {
            conn.execute_batch(SCHEMA_V1)?;
        }

        // A future SCHEMA_V2 gets its own `ver < 2` block here.

        Ok(())
    })
    .await?;
    Ok(())
}
