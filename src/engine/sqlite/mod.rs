//! `SQLite` Store Implementation
//!
//! This module implements the [`Store`] trait for `SQLite` databases.
//!
//! # Features
//! - File-based connections (`/path/to/employees.db`)
//! - In-memory connections (`:memory:`)
//! - Foreign key enforcement (`PRAGMA foreign_keys = ON`)
//!
//! # Implementation Notes
//! - Uses `rusqlite` (synchronous driver, no async needed)
//! - The connection sits behind a `Mutex` so the store is `Sync`
//! - Identifiers are bound as text; the INTEGER column affinity converts
//!   numeric text on comparison and insert
//! - BLOB data is Base64-encoded for display

use rusqlite::{params, Connection, OpenFlags, Row};
use std::sync::{Mutex, MutexGuard};

use crate::engine::{
    ConnectionConfig, DatabaseType, NewDepartment, NewEmployee, NewRole, QueryResult, Store,
    Table,
};
use crate::error::{Result, TrackerError};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS department (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name VARCHAR(30) NOT NULL
    );

    CREATE TABLE IF NOT EXISTS role (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title VARCHAR(30) NOT NULL,
        salary DECIMAL NOT NULL CHECK (typeof(salary) IN ('integer', 'real')),
        department_id INTEGER NOT NULL REFERENCES department(id)
    );

    CREATE TABLE IF NOT EXISTS employee (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name VARCHAR(30) NOT NULL,
        last_name VARCHAR(30) NOT NULL,
        role_id INTEGER NOT NULL REFERENCES role(id),
        manager_id INTEGER REFERENCES employee(id) ON DELETE SET NULL
    );
";

/// `SQLite` store holding one open connection
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open the database file named in `config`
    pub fn open(config: &ConnectionConfig) -> Result<Self> {
        // Validate config is for SQLite
        if config.engine != DatabaseType::SQLite {
            return Err(TrackerError::invalid_input(format!(
                "Expected SQLite engine, got {}",
                config.engine
            )));
        }

        let file_path = config
            .file
            .as_ref()
            .ok_or_else(|| TrackerError::invalid_input("SQLite requires 'file' parameter"))?;

        let path_str = file_path.to_str().ok_or_else(|| {
            TrackerError::invalid_input("SQLite file path contains invalid UTF-8 characters")
        })?;

        Self::from_connection(open_connection(path_str)?)
    }

    /// Open a private in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(open_connection(":memory:")?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;").map_err(|e| {
            TrackerError::engine_error("sqlite", format!("Failed to enable foreign keys: {e}"))
        })?;

        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| TrackerError::engine_error("sqlite", "connection lock poisoned"))
    }
}

impl Store for SqliteStore {
    fn engine(&self) -> DatabaseType {
        DatabaseType::SQLite
    }

    async fn ensure_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA).map_err(|e| {
            TrackerError::engine_error("sqlite", format!("Failed to create schema: {e}"))
        })
    }

    async fn fetch_all(&self, table: Table) -> Result<QueryResult> {
        let conn = self.lock()?;
        execute_select(&conn, &format!("SELECT * FROM {table} ORDER BY id"))
    }

    async fn exists(&self, table: Table, id: &str) -> Result<bool> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("SELECT 1 FROM {table} WHERE id = ?1"))
            .map_err(|e| TrackerError::query_failed(format!("Failed to prepare query: {e}")))?;

        stmt.exists(params![id])
            .map_err(|e| TrackerError::query_failed(format!("Failed to look up {table} {id}: {e}")))
    }

    async fn insert_employee(&self, employee: &NewEmployee) -> Result<u64> {
        let conn = self.lock()?;
        let written = conn
            .execute(
                "INSERT INTO employee (first_name, last_name, role_id, manager_id)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    employee.first_name,
                    employee.last_name,
                    employee.role_id,
                    employee.manager_id
                ],
            )
            .map_err(|e| TrackerError::query_failed(format!("Failed to insert employee: {e}")))?;

        Ok(written as u64)
    }

    async fn insert_role(&self, role: &NewRole) -> Result<u64> {
        let conn = self.lock()?;
        let written = conn
            .execute(
                "INSERT INTO role (title, salary, department_id) VALUES (?1, ?2, ?3)",
                params![role.title, role.salary, role.department_id],
            )
            .map_err(|e| TrackerError::query_failed(format!("Failed to insert role: {e}")))?;

        Ok(written as u64)
    }

    async fn insert_department(&self, department: &NewDepartment) -> Result<u64> {
        let conn = self.lock()?;
        let written = conn
            .execute("INSERT INTO department (name) VALUES (?1)", params![department.name])
            .map_err(|e| {
                TrackerError::query_failed(format!("Failed to insert department: {e}"))
            })?;

        Ok(written as u64)
    }

    async fn update_employee_role(&self, employee_id: &str, role_id: &str) -> Result<u64> {
        let conn = self.lock()?;
        let updated = conn
            .execute(
                "UPDATE employee SET role_id = ?1 WHERE id = ?2",
                params![role_id, employee_id],
            )
            .map_err(|e| {
                TrackerError::query_failed(format!("Failed to update employee role: {e}"))
            })?;

        Ok(updated as u64)
    }

    async fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| TrackerError::engine_error("sqlite", "connection lock poisoned"))?;

        conn.close().map_err(|(_, e)| {
            TrackerError::engine_error("sqlite", format!("Failed to close database: {e}"))
        })
    }
}

/// Open `SQLite` connection for reading and writing, creating the file if needed
fn open_connection(path: &str) -> Result<Connection> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE;

    Connection::open_with_flags(path, flags).map_err(|e| {
        TrackerError::connection_failed(format!("Failed to open SQLite database: {e}"))
    })
}

/// Run a SELECT and collect every row
fn execute_select(conn: &Connection, query: &str) -> Result<QueryResult> {
    let mut stmt = conn
        .prepare(query)
        .map_err(|e| TrackerError::query_failed(format!("Failed to prepare query: {e}")))?;

    let column_names: Vec<String> = stmt.column_names().iter().map(|s| (*s).to_string()).collect();

    let rows = stmt
        .query([])
        .map_err(|e| TrackerError::query_failed(format!("Failed to execute query: {e}")))?;

    let mut rows_data = Vec::new();
    for row_result in rows.mapped(|row| row_to_json(column_names.len(), row)) {
        let row = row_result
            .map_err(|e| TrackerError::query_failed(format!("Failed to fetch row: {e}")))?;
        rows_data.push(row);
    }

    Ok(QueryResult { columns: column_names, rows: rows_data })
}

/// Convert a `SQLite` row to a JSON-safe `Vec`
fn row_to_json(
    column_count: usize,
    row: &Row,
) -> std::result::Result<Vec<serde_json::Value>, rusqlite::Error> {
    (0..column_count).map(|idx| sqlite_value_to_json(row, idx)).collect()
}

/// Convert `SQLite` value to JSON value
fn sqlite_value_to_json(
    row: &Row,
    idx: usize,
) -> std::result::Result<serde_json::Value, rusqlite::Error> {
    use rusqlite::types::ValueRef;

    Ok(match row.get_ref(idx)? {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::Number(i.into()),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map_or(serde_json::Value::Null, serde_json::Value::Number), // NaN/Infinity as null
        ValueRef::Text(s) => {
            let text = std::str::from_utf8(s).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(
                    idx,
                    rusqlite::types::Type::Text,
                    Box::new(e),
                )
            })?;
            serde_json::Value::String(text.to_string())
        }
        ValueRef::Blob(b) => {
            use base64::Engine;
            serde_json::Value::String(base64::engine::general_purpose::STANDARD.encode(b))
        }
    })
}
