use std::sync::Arc;

use tokio_rusqlite::Connection;

use crate::db::customer::CustomerRepo;
use crate::db::job::JobRepo;
use crate::db::schedule::ScheduleRepo;
use crate::db::tools::ToolsRepo;
use crate::db::worker::WorkerRepo;

/// Shared handler state: one database connection, repos built per call.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Connection>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(conn),
        }
    }

    pub fn conn(&self) -> Arc<Connection> {
        Arc::clone(&self.conn)
    }

    pub fn customers(&self) -> CustomerRepo {
        CustomerRepo::new(self.conn())
    }

    pub fn jobs(&self) -> JobRepo {
        JobRepo::new(self.conn())
    }

    pub fn workers(&self) -> WorkerRepo {
        WorkerRepo::new(self.conn())
    }

    pub fn tools(&self) -> ToolsRepo {
        ToolsRepo::new(self.conn())
    }

    pub fn schedule(&self) -> ScheduleRepo {
        ScheduleRepo::new(self.conn())
    }
}
