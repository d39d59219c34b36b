//! Menu actions
//!
//! One handler per menu entry. Each handler collects its answers, gates
//! dependent writes on [`record_exists`], runs a single statement, and
//! returns an [`Outcome`] for the menu to print. Query errors come back as
//! `Err` and are reported by the menu loop.

use std::fmt;

use crate::engine::{NewDepartment, NewEmployee, NewRole, QueryResult, Store, Table};
use crate::error::Result;
use crate::output::render_table;
use crate::prompt::Prompter;

/// What an action did, printed by the menu loop
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Every row of a table (possibly none)
    Listing { table: Table, result: QueryResult },
    EmployeeAdded { first_name: String, last_name: String },
    RoleAdded { title: String, salary: String, department_id: String },
    DepartmentAdded { name: String },
    EmployeeRoleUpdated { employee_id: String, role_id: String },
    /// A referenced record is missing; nothing was written
    Rejected(Rejection),
}

/// Referential checks that stopped a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Add Employee: role id not found
    UnknownRole,
    /// Add Employee: manager id given but not found
    UnknownManager,
    /// Add Role: department id not found
    UnknownDepartment,
    /// Update Employee Role: at least one of the two ids not found
    UnknownUpdateTarget { employee_exists: bool, role_exists: bool },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::UnknownRole => "Role ID does not exist!",
            Self::UnknownManager => "Manager ID does not exist!",
            Self::UnknownDepartment => "Department ID does not exist!",
            Self::UnknownUpdateTarget { employee_exists: true, .. } => {
                "This ID for role does not exist!"
            }
            Self::UnknownUpdateTarget { employee_exists: false, role_exists: true } => {
                "An employee with this ID does not exist!"
            }
            Self::UnknownUpdateTarget { employee_exists: false, role_exists: false } => {
                "Neither the employee ID nor the role ID exists!"
            }
        };
        f.write_str(message)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Listing { table, result } if result.is_empty() => {
                write!(f, "No {table}s in database.")
            }
            Self::Listing { result, .. } => f.write_str(&render_table(result)),
            Self::EmployeeAdded { first_name, last_name } => {
                write!(f, "Employee {first_name} {last_name} added.")
            }
            Self::RoleAdded { title, salary, department_id } => write!(
                f,
                "Role {title} with salary {salary} added with a department ID: {department_id} successfully."
            ),
            Self::DepartmentAdded { name } => write!(f, "Department {name} added successfully."),
            Self::EmployeeRoleUpdated { employee_id, role_id } => {
                write!(f, "Employee {employee_id} now has role {role_id}.")
            }
            Self::Rejected(rejection) => fmt::Display::fmt(rejection, f),
        }
    }
}

/// Whether `table` has a row with `id`
///
/// Never fails: a lookup error is logged and counted as "not found".
pub async fn record_exists<S: Store>(store: &S, table: Table, id: &str) -> bool {
    match store.exists(table, id).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(
                %table,
                id,
                error = %e,
                "Existence check failed, treating record as missing"
            );
            false
        }
    }
}

/// Blank or whitespace-only answers mean "none"
#[must_use]
pub fn normalize_optional(answer: &str) -> Option<String> {
    let trimmed = answer.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// List every row of `table`
pub async fn view_all<S: Store>(store: &S, table: Table) -> Result<Outcome> {
    let result = store.fetch_all(table).await?;
    tracing::debug!(%table, rows = result.rows.len(), "Fetched table");
    Ok(Outcome::Listing { table, result })
}

/// Ask for an employee and insert it if its role (and manager, when given) exist
pub async fn add_employee<S: Store, P: Prompter>(
    store: &S,
    prompter: &mut P,
) -> Result<Outcome> {
    let first_name = prompter.input("Enter employee's first name")?;
    let last_name = prompter.input("Enter employee's last name")?;
    let role_id = prompter.input("Enter employee's role ID")?.trim().to_string();
    let manager_answer =
        prompter.optional_input("Enter employee's manager's ID (leave blank if none)")?;
    let manager_id = normalize_optional(&manager_answer);

    if !record_exists(store, Table::Role, &role_id).await {
        return Ok(Outcome::Rejected(Rejection::UnknownRole));
    }

    if let Some(manager_id) = &manager_id {
        if !record_exists(store, Table::Employee, manager_id).await {
            return Ok(Outcome::Rejected(Rejection::UnknownManager));
        }
    }

    let employee = NewEmployee { first_name, last_name, role_id, manager_id };
    store.insert_employee(&employee).await?;

    Ok(Outcome::EmployeeAdded { first_name: employee.first_name, last_name: employee.last_name })
}

/// Ask for a role and insert it if its department exists
pub async fn add_role<S: Store, P: Prompter>(store: &S, prompter: &mut P) -> Result<Outcome> {
    let title = prompter.input("Enter role title")?;
    let salary = prompter.input("Enter role salary")?.trim().to_string();
    let department_id = prompter.input("Enter role department ID")?.trim().to_string();

    if !record_exists(store, Table::Department, &department_id).await {
        return Ok(Outcome::Rejected(Rejection::UnknownDepartment));
    }

    let role = NewRole { title, salary, department_id };
    store.insert_role(&role).await?;

    Ok(Outcome::RoleAdded {
        title: role.title,
        salary: role.salary,
        department_id: role.department_id,
    })
}

/// Ask for a department name and insert it
pub async fn add_department<S: Store, P: Prompter>(
    store: &S,
    prompter: &mut P,
) -> Result<Outcome> {
    let name = prompter.input("Enter the department's name")?;

    let department = NewDepartment { name };
    store.insert_department(&department).await?;

    Ok(Outcome::DepartmentAdded { name: department.name })
}

/// Ask for an employee and a role, and reassign the employee if both exist
pub async fn update_employee_role<S: Store, P: Prompter>(
    store: &S,
    prompter: &mut P,
) -> Result<Outcome> {
    let employee_id = prompter.input("Enter the employee's ID")?.trim().to_string();
    let role_id = prompter.input("Enter the new role's ID")?.trim().to_string();

    let employee_exists = record_exists(store, Table::Employee, &employee_id).await;
    let role_exists = record_exists(store, Table::Role, &role_id).await;

    if !(employee_exists && role_exists) {
        return Ok(Outcome::Rejected(Rejection::UnknownUpdateTarget {
            employee_exists,
            role_exists,
        }));
    }

    store.update_employee_role(&employee_id, &role_id).await?;

    Ok(Outcome::EmployeeRoleUpdated { employee_id, role_id })
}

#[cfg(all(test, feature = "sqlite"))]
mod tests {
    use super::*;
    use crate::engine::sqlite::SqliteStore;
    use crate::prompt::ScriptedPrompter;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn store_with_engineering() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().await.unwrap();
        store.insert_department(&NewDepartment { name: "Engineering".into() }).await.unwrap();
        store
            .insert_role(&NewRole {
                title: "Engineer".into(),
                salary: "90000".into(),
                department_id: "1".into(),
            })
            .await
            .unwrap();
        store
    }

    async fn row_count<S: Store>(store: &S, table: Table) -> usize {
        store.fetch_all(table).await.unwrap().rows.len()
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(""), None);
        assert_eq!(normalize_optional("   \t"), None);
        assert_eq!(normalize_optional(" 3 "), Some("3".to_string()));
    }

    #[test]
    fn test_rejection_messages() {
        let both = Rejection::UnknownUpdateTarget { employee_exists: false, role_exists: false };
        let role = Rejection::UnknownUpdateTarget { employee_exists: true, role_exists: false };
        let employee = Rejection::UnknownUpdateTarget { employee_exists: false, role_exists: true };

        assert_eq!(Rejection::UnknownRole.to_string(), "Role ID does not exist!");
        assert_eq!(Rejection::UnknownDepartment.to_string(), "Department ID does not exist!");
        assert_eq!(role.to_string(), "This ID for role does not exist!");
        assert_eq!(employee.to_string(), "An employee with this ID does not exist!");
        assert_eq!(both.to_string(), "Neither the employee ID nor the role ID exists!");
    }

    #[tokio::test]
    async fn test_view_all_empty_tables() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.ensure_schema().await.unwrap();

        for (table, message) in [
            (Table::Employee, "No employees in database."),
            (Table::Role, "No roles in database."),
            (Table::Department, "No departments in database."),
        ] {
            let outcome = view_all(&store, table).await.unwrap();
            assert_eq!(outcome.to_string(), message);
        }
    }

    #[tokio::test]
    async fn test_view_all_lists_rows() {
        let store = store_with_engineering().await;
        let outcome = view_all(&store, Table::Department).await.unwrap();

        let Outcome::Listing { result, .. } = &outcome else {
            panic!("Expected a listing, got {outcome:?}");
        };
        assert_eq!(result.rows, vec![vec![json!(1), json!("Engineering")]]);
        assert!(outcome.to_string().contains("│ Engineering │"));
    }

    #[tokio::test]
    async fn test_view_all_reports_query_errors() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(view_all(&store, Table::Role).await.is_err());
    }

    #[tokio::test]
    async fn test_record_exists_swallows_errors() {
        let store = SqliteStore::open_in_memory().unwrap();
        // No schema: the lookup itself fails
        assert!(!record_exists(&store, Table::Role, "1").await);

        let store = store_with_engineering().await;
        assert!(record_exists(&store, Table::Role, "1").await);
        assert!(!record_exists(&store, Table::Role, "2").await);
    }

    #[tokio::test]
    async fn test_add_employee_with_blank_manager() {
        let store = store_with_engineering().await;
        let mut prompter = ScriptedPrompter::new(["Ada", "Lovelace", "1", "   "]);

        let outcome = add_employee(&store, &mut prompter).await.unwrap();
        assert_eq!(outcome.to_string(), "Employee Ada Lovelace added.");

        let employees = store.fetch_all(Table::Employee).await.unwrap();
        assert_eq!(employees.rows.len(), 1);
        assert_eq!(employees.value(0, "manager_id"), Some(&serde_json::Value::Null));
    }

    #[tokio::test]
    async fn test_add_employee_with_manager() {
        let store = store_with_engineering().await;
        let mut prompter =
            ScriptedPrompter::new(["Ada", "Lovelace", "1", "", "Grace", "Hopper", "1", "1"]);

        add_employee(&store, &mut prompter).await.unwrap();
        add_employee(&store, &mut prompter).await.unwrap();

        let employees = store.fetch_all(Table::Employee).await.unwrap();
        assert_eq!(employees.value(1, "manager_id"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_add_employee_unknown_role() {
        let store = store_with_engineering().await;
        let mut prompter = ScriptedPrompter::new(["Ada", "Lovelace", "7", ""]);

        let outcome = add_employee(&store, &mut prompter).await.unwrap();
        assert_eq!(outcome, Outcome::Rejected(Rejection::UnknownRole));
        assert_eq!(row_count(&store, Table::Employee).await, 0);
    }

    #[tokio::test]
    async fn test_add_employee_unknown_manager() {
        let store = store_with_engineering().await;
        let mut prompter = ScriptedPrompter::new(["Ada", "Lovelace", "1", "12"]);

        let outcome = add_employee(&store, &mut prompter).await.unwrap();
        assert_eq!(outcome.to_string(), "Manager ID does not exist!");
        assert_eq!(row_count(&store, Table::Employee).await, 0);
    }

    #[tokio::test]
    async fn test_add_role() {
        let store = store_with_engineering().await;
        let mut prompter = ScriptedPrompter::new(["Manager", "120000", "1"]);

        let outcome = add_role(&store, &mut prompter).await.unwrap();
        assert_eq!(
            outcome.to_string(),
            "Role Manager with salary 120000 added with a department ID: 1 successfully."
        );
        assert_eq!(row_count(&store, Table::Role).await, 2);
    }

    #[tokio::test]
    async fn test_add_role_unknown_department() {
        let store = store_with_engineering().await;
        let mut prompter = ScriptedPrompter::new(["Engineer", "90000", "999"]);

        let outcome = add_role(&store, &mut prompter).await.unwrap();
        assert_eq!(outcome.to_string(), "Department ID does not exist!");
        assert_eq!(row_count(&store, Table::Role).await, 1);
    }

    #[tokio::test]
    async fn test_add_role_non_numeric_salary_is_a_query_error() {
        let store = store_with_engineering().await;
        let mut prompter = ScriptedPrompter::new(["Engineer", "lots", "1"]);

        let err = add_role(&store, &mut prompter).await.unwrap_err();
        assert!(matches!(err, crate::error::TrackerError::QueryFailed(_)));
        assert!(!err.is_fatal());
        assert_eq!(row_count(&store, Table::Role).await, 1);
    }

    #[tokio::test]
    async fn test_add_role_decimal_salary() {
        let store = store_with_engineering().await;
        let mut prompter = ScriptedPrompter::new(["Analyst", "65000.50", "1"]);

        add_role(&store, &mut prompter).await.unwrap();
        let roles = store.fetch_all(Table::Role).await.unwrap();
        assert_eq!(roles.value(1, "salary"), Some(&json!(65000.5)));
    }

    #[tokio::test]
    async fn test_add_department() {
        let store = store_with_engineering().await;
        let mut prompter = ScriptedPrompter::new(["Legal"]);

        let outcome = add_department(&store, &mut prompter).await.unwrap();
        assert_eq!(outcome.to_string(), "Department Legal added successfully.");

        let departments = store.fetch_all(Table::Department).await.unwrap();
        assert_eq!(departments.value(1, "name"), Some(&json!("Legal")));
    }

    #[tokio::test]
    async fn test_add_department_failure_is_reported() {
        // Without a schema the insert fails, and the failure must surface
        let store = SqliteStore::open_in_memory().unwrap();
        let mut prompter = ScriptedPrompter::new(["Legal"]);

        assert!(add_department(&store, &mut prompter).await.is_err());
    }

    #[tokio::test]
    async fn test_update_employee_role() {
        let store = store_with_engineering().await;
        let mut setup = ScriptedPrompter::new(["Ada", "Lovelace", "1", "", "Lead", "150000", "1"]);
        add_employee(&store, &mut setup).await.unwrap();
        add_role(&store, &mut setup).await.unwrap();

        let mut prompter = ScriptedPrompter::new(["1", "2"]);
        let outcome = update_employee_role(&store, &mut prompter).await.unwrap();
        assert_eq!(outcome.to_string(), "Employee 1 now has role 2.");

        let employees = store.fetch_all(Table::Employee).await.unwrap();
        assert_eq!(employees.value(0, "role_id"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn test_update_employee_role_rejections_leave_rows_untouched() {
        let store = store_with_engineering().await;
        let mut setup = ScriptedPrompter::new(["Ada", "Lovelace", "1", ""]);
        add_employee(&store, &mut setup).await.unwrap();

        for (answers, expected) in [
            (["1", "9"], (true, false)),
            (["9", "1"], (false, true)),
            (["9", "9"], (false, false)),
        ] {
            let mut prompter = ScriptedPrompter::new(answers);
            let outcome = update_employee_role(&store, &mut prompter).await.unwrap();
            assert_eq!(
                outcome,
                Outcome::Rejected(Rejection::UnknownUpdateTarget {
                    employee_exists: expected.0,
                    role_exists: expected.1,
                })
            );
        }

        let employees = store.fetch_all(Table::Employee).await.unwrap();
        assert_eq!(employees.value(0, "role_id"), Some(&json!(1)));
    }
}
