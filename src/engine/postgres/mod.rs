//! `PostgreSQL` Store Implementation
//!
//! This module implements the [`Store`] trait for `PostgreSQL` databases.
//!
//! # Implementation Notes
//! - Uses `tokio-postgres` (async driver, requires tokio runtime)
//! - One client per session; the connection task is spawned on connect and
//!   awaited on [`Store::close`]
//! - User-supplied identifiers and salaries are bound as `text` and cast by
//!   the server, so unparsable input surfaces as a query error
//! - Full-table reads use the simple-query protocol, which returns every
//!   column as text (including `NUMERIC`)

use tokio::task::JoinHandle;
use tokio_postgres::{Client, Config, NoTls, SimpleQueryMessage};

use crate::engine::{
    ConnectionConfig, DatabaseType, NewDepartment, NewEmployee, NewRole, QueryResult, Store,
    Table,
};
use crate::error::{Result, TrackerError};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS department (
        id SERIAL PRIMARY KEY,
        name VARCHAR(30) NOT NULL
    );

    CREATE TABLE IF NOT EXISTS role (
        id SERIAL PRIMARY KEY,
        title VARCHAR(30) NOT NULL,
        salary DECIMAL NOT NULL,
        department_id INTEGER NOT NULL REFERENCES department(id)
    );

    CREATE TABLE IF NOT EXISTS employee (
        id SERIAL PRIMARY KEY,
        first_name VARCHAR(30) NOT NULL,
        last_name VARCHAR(30) NOT NULL,
        role_id INTEGER NOT NULL REFERENCES role(id),
        manager_id INTEGER REFERENCES employee(id) ON DELETE SET NULL
    );
";

/// `PostgreSQL` store holding one open client
pub struct PostgresStore {
    client: Client,
    connection: JoinHandle<()>,
    server_version: String,
}

impl PostgresStore {
    /// Connect using `config` and keep the connection open
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        // Validate config is for PostgreSQL
        if config.engine != DatabaseType::Postgres {
            return Err(TrackerError::invalid_input(format!(
                "Expected PostgreSQL engine, got {}",
                config.engine
            )));
        }

        let pg_config = build_pg_config(config)?;

        let (client, connection) = pg_config.connect(NoTls).await.map_err(|e| {
            TrackerError::connection_failed(format!("Failed to connect to PostgreSQL: {e}"))
        })?;

        let connection = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::debug!(error = %e, "PostgreSQL connection task ended with an error");
            }
        });

        let version_row = client.query_one("SELECT version()", &[]).await.map_err(|e| {
            TrackerError::connection_failed(format!("Failed to query PostgreSQL version: {e}"))
        })?;
        let version_string: String = version_row.get(0);

        // "PostgreSQL 15.3 on x86_64..." -> "15.3"
        let server_version =
            version_string.split_whitespace().nth(1).unwrap_or("unknown").to_string();

        Ok(Self { client, connection, server_version })
    }

    /// Server version reported at connect time
    #[must_use]
    pub fn server_version(&self) -> &str {
        &self.server_version
    }
}

impl Store for PostgresStore {
    fn engine(&self) -> DatabaseType {
        DatabaseType::Postgres
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.batch_execute(SCHEMA).await.map_err(|e| {
            TrackerError::engine_error("postgres", format!("Failed to create schema: {e}"))
        })
    }

    async fn fetch_all(&self, table: Table) -> Result<QueryResult> {
        let messages = self
            .client
            .simple_query(&format!("SELECT * FROM {table} ORDER BY id"))
            .await
            .map_err(|e| TrackerError::query_failed(format!("Failed to execute query: {e}")))?;

        let mut result = QueryResult::default();
        for message in messages {
            if let SimpleQueryMessage::Row(row) = message {
                if result.columns.is_empty() {
                    result.columns = row.columns().iter().map(|c| c.name().to_string()).collect();
                }

                let values = (0..row.len())
                    .map(|idx| {
                        row.get(idx).map_or(serde_json::Value::Null, |v| {
                            serde_json::Value::String(v.to_string())
                        })
                    })
                    .collect();
                result.rows.push(values);
            }
        }

        Ok(result)
    }

    async fn exists(&self, table: Table, id: &str) -> Result<bool> {
        let query = format!("SELECT 1 FROM {table} WHERE id = CAST($1::text AS INTEGER)");

        let rows = self.client.query(&query, &[&id]).await.map_err(|e| {
            TrackerError::query_failed(format!("Failed to look up {table} {id}: {e}"))
        })?;

        Ok(!rows.is_empty())
    }

    async fn insert_employee(&self, employee: &NewEmployee) -> Result<u64> {
        self.client
            .execute(
                "INSERT INTO employee (first_name, last_name, role_id, manager_id)
                 VALUES ($1, $2, CAST($3::text AS INTEGER), CAST($4::text AS INTEGER))",
                &[
                    &employee.first_name,
                    &employee.last_name,
                    &employee.role_id,
                    &employee.manager_id,
                ],
            )
            .await
            .map_err(|e| TrackerError::query_failed(format!("Failed to insert employee: {e}")))
    }

    async fn insert_role(&self, role: &NewRole) -> Result<u64> {
        self.client
            .execute(
                "INSERT INTO role (title, salary, department_id)
                 VALUES ($1, CAST($2::text AS NUMERIC), CAST($3::text AS INTEGER))",
                &[&role.title, &role.salary, &role.department_id],
            )
            .await
            .map_err(|e| TrackerError::query_failed(format!("Failed to insert role: {e}")))
    }

    async fn insert_department(&self, department: &NewDepartment) -> Result<u64> {
        self.client
            .execute("INSERT INTO department (name) VALUES ($1)", &[&department.name])
            .await
            .map_err(|e| TrackerError::query_failed(format!("Failed to insert department: {e}")))
    }

    async fn update_employee_role(&self, employee_id: &str, role_id: &str) -> Result<u64> {
        self.client
            .execute(
                "UPDATE employee SET role_id = CAST($1::text AS INTEGER)
                 WHERE id = CAST($2::text AS INTEGER)",
                &[&role_id, &employee_id],
            )
            .await
            .map_err(|e| {
                TrackerError::query_failed(format!("Failed to update employee role: {e}"))
            })
    }

    async fn close(self) -> Result<()> {
        // Dropping the client ends the connection task
        drop(self.client);
        self.connection.await.map_err(|e| {
            TrackerError::engine_error("postgres", format!("Connection task failed: {e}"))
        })
    }
}

/// Build `PostgreSQL` connection config from `ConnectionConfig`
fn build_pg_config(config: &ConnectionConfig) -> Result<Config> {
    let host = config
        .host
        .as_ref()
        .ok_or_else(|| TrackerError::invalid_input("PostgreSQL requires 'host' parameter"))?;

    let port = config
        .port
        .ok_or_else(|| TrackerError::invalid_input("PostgreSQL requires 'port' parameter"))?;

    let user = config
        .user
        .as_ref()
        .ok_or_else(|| TrackerError::invalid_input("PostgreSQL requires 'user' parameter"))?;

    let database = config
        .database
        .as_ref()
        .ok_or_else(|| TrackerError::invalid_input("PostgreSQL requires 'database' parameter"))?;

    let mut pg_config = Config::new();
    pg_config.host(host).port(port).user(user).dbname(database);

    // Local trust authentication needs no password
    if let Some(password) = &config.password {
        pg_config.password(password);
    }

    Ok(pg_config)
}
