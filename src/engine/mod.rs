//! Database Engine Traits and Core Types
//!
//! This module defines the store abstraction the menu runs against.
//! Each engine (`PostgreSQL`, `SQLite`) implements the [`Store`] trait.
//!
//! # Connection Lifetime
//! A store holds one open connection for the whole session. It is opened once
//! at startup, passed by reference to every action, and released with
//! [`Store::close`] on shutdown.
//!
//! # Engine Isolation
//! Each engine implementation is completely independent.
//! No shared SQL helpers or cross-engine abstractions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub mod postgres;

/// Supported database engine types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `PostgreSQL` database
    Postgres,
    /// `SQLite` database
    SQLite,
}

impl DatabaseType {
    /// Get the engine name as a string
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::SQLite => "sqlite",
        }
    }

    /// Parse an engine name (case-insensitive)
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Some(Self::Postgres),
            "sqlite" | "sqlite3" => Some(Self::SQLite),
            _ => None,
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Connection configuration for database engines
///
/// Fields are engine-specific (e.g., `file` only applies to `SQLite`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database engine type
    pub engine: DatabaseType,

    /// Hostname (for postgres)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    /// Port number (for postgres)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Username (for postgres)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Password (for postgres)
    /// WARNING: Sensitive data, do not log or include in error messages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Database name (for postgres)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    /// Database file path (for sqlite, `:memory:` for an in-memory database)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl ConnectionConfig {
    /// Create a new `PostgreSQL` connection config
    #[must_use]
    pub const fn postgres(
        host: String,
        port: u16,
        user: String,
        password: String,
        database: String,
    ) -> Self {
        Self {
            engine: DatabaseType::Postgres,
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            database: Some(database),
            file: None,
        }
    }

    /// Create a new `SQLite` connection config
    #[must_use]
    pub const fn sqlite(file: PathBuf) -> Self {
        Self {
            engine: DatabaseType::SQLite,
            host: None,
            port: None,
            user: None,
            password: None,
            database: None,
            file: Some(file),
        }
    }

    /// Short description safe for logs (never includes the password)
    #[must_use]
    pub fn describe(&self) -> String {
        match self.engine {
            DatabaseType::Postgres => format!(
                "postgres://{}@{}:{}/{}",
                self.user.as_deref().unwrap_or("?"),
                self.host.as_deref().unwrap_or("?"),
                self.port.map_or_else(|| "?".to_string(), |p| p.to_string()),
                self.database.as_deref().unwrap_or("?"),
            ),
            DatabaseType::SQLite => format!(
                "sqlite://{}",
                self.file.as_ref().map_or_else(|| "?".into(), |f| f.display().to_string())
            ),
        }
    }
}

/// The three tables the tracker manages
///
/// Table names only ever come from this enum, never from user input, so they
/// can be spliced into SQL text safely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Employee,
    Role,
    Department,
}

impl Table {
    /// All tables, in dependency order (referenced tables last)
    pub const ALL: [Self; 3] = [Self::Employee, Self::Role, Self::Department];

    /// SQL table name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Role => "role",
            Self::Department => "department",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Employee row to insert. Identifiers are raw user text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub role_id: String,
    /// `None` stores SQL NULL
    pub manager_id: Option<String>,
}

/// Role row to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    pub title: String,
    pub salary: String,
    pub department_id: String,
}

/// Department row to insert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDepartment {
    pub name: String,
}

/// Query execution result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Column names in result set
    pub columns: Vec<String>,

    /// Result rows (each row is a `Vec` of values aligned with `columns`)
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl QueryResult {
    /// Whether the result set has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in row `row`, if both exist
    #[must_use]
    pub fn value(&self, row: usize, column: &str) -> Option<&serde_json::Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(idx)
    }
}

/// Relational store holding the employee, role, and department tables
///
/// Every write binds user values as statement parameters; only the table
/// name (from [`Table`]) is part of the SQL text.
pub trait Store {
    /// Engine behind this store
    fn engine(&self) -> DatabaseType;

    /// Create the three tables if they do not exist yet
    fn ensure_schema(&self) -> impl std::future::Future<Output = Result<()>> + Send;

    /// Select every row of `table`, ordered by `id`
    fn fetch_all(&self, table: Table)
        -> impl std::future::Future<Output = Result<QueryResult>> + Send;

    /// Whether at least one row of `table` has the given `id`
    ///
    /// Errors are returned as-is; callers decide how to treat them.
    fn exists(
        &self,
        table: Table,
        id: &str,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;

    /// Insert an employee, returning the number of rows written
    fn insert_employee(
        &self,
        employee: &NewEmployee,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;

    /// Insert a role, returning the number of rows written
    fn insert_role(&self, role: &NewRole)
        -> impl std::future::Future<Output = Result<u64>> + Send;

    /// Insert a department, returning the number of rows written
    fn insert_department(
        &self,
        department: &NewDepartment,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;

    /// Point an employee at a new role, returning the number of rows updated
    fn update_employee_role(
        &self,
        employee_id: &str,
        role_id: &str,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;

    /// Release the connection
    fn close(self) -> impl std::future::Future<Output = Result<()>> + Send
    where
        Self: Sized;
}
