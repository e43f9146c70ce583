use kontor_core::ServiceError;
use kontor_sql::SQLStore;

/// SQL DDL statements to initialize the CRM database schema.
///
/// Each table stores the full JSON document in a `data` TEXT column,
/// with indexed columns extracted for filtering and uniqueness.
/// SQLite treats NULLs as distinct in UNIQUE columns, which is exactly
/// the nullable-but-unique contract for `national_id`.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS persons (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        name TEXT,
        email TEXT UNIQUE,
        national_id TEXT UNIQUE,
        person_type_id INTEGER,
        active INTEGER,
        status TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS enterprises (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        name TEXT,
        tax_id TEXT UNIQUE,
        active INTEGER,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE TABLE IF NOT EXISTS requirements (
        id TEXT PRIMARY KEY,
        data TEXT NOT NULL,
        enterprise_id TEXT,
        name TEXT,
        extension TEXT,
        upload_date TEXT,
        last_updated TEXT,
        created_at TEXT,
        updated_at TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_requirements_enterprise
        ON requirements (enterprise_id)",
    "CREATE INDEX IF NOT EXISTS idx_persons_type
        ON persons (person_type_id)",
];

pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    sql.exec_batch(SCHEMA)
        .map_err(|e| ServiceError::Storage(e.to_string()))
}
