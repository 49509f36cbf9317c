pub const SCHEMA_V1: &str = r#"
BEGIN;

-- Customer:
CREATE TABLE
    IF NOT EXISTS customer (
        id BLOB PRIMARY KEY CHECK (length (id) = 16),
        reference TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL,
        phone TEXT,
        email TEXT,
        address TEXT,
        notes TEXT,
        is_archived INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

-- Job:
-- tasks/photos/plans are stored as opaque JSON text and only
-- materialized on single-item reads.
CREATE TABLE
    IF NOT EXISTS job (
        id BLOB PRIMARY KEY CHECK (length (id) = 16),
        title TEXT NOT NULL,
        description TEXT,
        customer_id BLOB NOT NULL CHECK (length (customer_id) = 16),
        status TEXT NOT NULL DEFAULT 'QUOTED',
        priority TEXT NOT NULL DEFAULT 'medium',
        total_cost REAL NOT NULL DEFAULT 0,
        deposit_paid REAL NOT NULL DEFAULT 0,
        start_date TEXT,
        end_date TEXT,
        notes TEXT,
        tasks TEXT CHECK (
            tasks IS NULL
            OR json_valid (tasks)
        ),
        photos TEXT CHECK (
            photos IS NULL
            OR json_valid (photos)
        ),
        plans TEXT CHECK (
            plans IS NULL
            OR json_valid (plans)
        ),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

CREATE INDEX IF NOT EXISTS idx_job_customer ON job (customer_id);

-- Material:
CREATE TABLE
    IF NOT EXISTS material (
        id BLOB PRIMARY KEY CHECK (length (id) = 16),
        job_id BLOB NOT NULL CHECK (length (job_id) = 16),
        name TEXT NOT NULL,
        quantity REAL NOT NULL DEFAULT 1,
        unit TEXT,
        cost REAL NOT NULL DEFAULT 0,
        purchased INTEGER NOT NULL DEFAULT 0
    );

CREATE INDEX IF NOT EXISTS idx_material_job ON material (job_id);

-- JobAssignment:
CREATE TABLE
    IF NOT EXISTS job_assignment (
        id BLOB PRIMARY KEY CHECK (length (id) = 16),
        job_id BLOB NOT NULL CHECK (length (job_id) = 16),
        worker_id BLOB NOT NULL CHECK (length (worker_id) = 16)
    );

CREATE INDEX IF NOT EXISTS idx_assignment_job ON job_assignment (job_id);

-- Worker:
CREATE TABLE
    IF NOT EXISTS worker (
        id BLOB PRIMARY KEY CHECK (length (id) = 16),
        name TEXT NOT NULL,
        full_name TEXT NOT NULL,
        phone TEXT NOT NULL DEFAULT '',
        email TEXT NOT NULL DEFAULT '',
        specialty TEXT NOT NULL DEFAULT 'General',
        status TEXT NOT NULL DEFAULT 'Available',
        color TEXT NOT NULL DEFAULT '#3B82F6',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );

-- Tool inventory (category -> list -> item, each level sort-key ordered):
CREATE TABLE
    IF NOT EXISTS tool_category (
        id BLOB PRIMARY KEY CHECK (length (id) = 16),
        name TEXT NOT NULL,
        sort_order INTEGER NOT NULL DEFAULT 0
    );

CREATE TABLE
    IF NOT EXISTS tool_list (
        id BLOB PRIMARY KEY CHECK (length (id) = 16),
        category_id BLOB NOT NULL CHECK (length (category_id) = 16),
        name TEXT NOT NULL,
        sort_order INTEGER NOT NULL DEFAULT 0
    );

CREATE TABLE
    IF NOT EXISTS tool_item (
        id BLOB PRIMARY KEY CHECK (length (id) = 16),
        list_id BLOB NOT NULL CHECK (length (list_id) = 16),
        name TEXT NOT NULL,
        sort_order INTEGER NOT NULL DEFAULT 0
    );

-- ToolsSync: singleton row, fixed id 'main', version only increases.
CREATE TABLE
    IF NOT EXISTS tools_sync (
        id TEXT PRIMARY KEY,
        tools TEXT NOT NULL CHECK (json_valid (tools)),
        selected_demo_categories TEXT NOT NULL CHECK (json_valid (selected_demo_categories)),
        selected_install_categories TEXT NOT NULL CHECK (json_valid (selected_install_categories)),
        locked_categories TEXT NOT NULL CHECK (json_valid (locked_categories)),
        show_demo INTEGER NOT NULL DEFAULT 0,
        show_install INTEGER NOT NULL DEFAULT 0,
        version INTEGER NOT NULL DEFAULT 1,
        last_updated_by TEXT,
        updated_at TEXT NOT NULL
    );

-- ScheduleEvent:
-- workers holds the assigned worker ids inline as a JSON array.
CREATE TABLE
    IF NOT EXISTS schedule_event (
        id BLOB PRIMARY KEY CHECK (length (id) = 16),
        title TEXT NOT NULL,
        description TEXT,
        event_type TEXT NOT NULL DEFAULT 'work',
        start_date TEXT NOT NULL,
        end_date TEXT NOT NULL,
        customer_id BLOB CHECK (length (customer_id) = 16),
        workers TEXT NOT NULL CHECK (json_valid (workers)),
        created_at TEXT NOT NULL
    );

CREATE INDEX IF NOT EXISTS idx_schedule_start ON schedule_event (start_date);

------------------------------------------------------------------
PRAGMA user_version = 1;

COMMIT;
"#;
