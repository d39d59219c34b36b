//! Main menu loop
//!
//! Shows the fixed list of choices, runs the chosen action, prints what it
//! did, and asks again until "Quit" is chosen.

use std::io::Write;

use crate::actions::{self, Outcome};
use crate::engine::{Store, Table};
use crate::error::{Result, TrackerError};
use crate::prompt::Prompter;

const MENU_PROMPT: &str = "What would you like to do?";

/// Entries of the main menu, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    ViewEmployees,
    AddEmployee,
    UpdateEmployeeRole,
    ViewRoles,
    AddRole,
    ViewDepartments,
    AddDepartment,
    Quit,
}

impl MenuChoice {
    pub const ALL: [Self; 8] = [
        Self::ViewEmployees,
        Self::AddEmployee,
        Self::UpdateEmployeeRole,
        Self::ViewRoles,
        Self::AddRole,
        Self::ViewDepartments,
        Self::AddDepartment,
        Self::Quit,
    ];

    /// Text shown in the menu
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ViewEmployees => "View All Employees",
            Self::AddEmployee => "Add Employee",
            Self::UpdateEmployeeRole => "Update Employee Role",
            Self::ViewRoles => "View All Roles",
            Self::AddRole => "Add Role",
            Self::ViewDepartments => "View All Departments",
            Self::AddDepartment => "Add Department",
            Self::Quit => "Quit",
        }
    }

    /// Prefix for errors raised while running this choice
    #[must_use]
    pub const fn failure_label(self) -> &'static str {
        match self {
            Self::ViewEmployees => "Error viewing employees",
            Self::AddEmployee => "Error adding employee",
            Self::UpdateEmployeeRole => "Error updating employee role",
            Self::ViewRoles => "Error viewing roles",
            Self::AddRole => "Error adding role",
            Self::ViewDepartments => "Error viewing departments",
            Self::AddDepartment => "Error adding department",
            Self::Quit => "Error",
        }
    }

    /// Ask the user to pick an entry
    pub fn prompt<P: Prompter>(prompter: &mut P) -> Result<Self> {
        let labels = Self::ALL.map(Self::label);
        let idx = prompter.select(MENU_PROMPT, &labels)?;
        Self::ALL
            .get(idx)
            .copied()
            .ok_or_else(|| TrackerError::prompt(format!("Menu selection {idx} is out of range")))
    }
}

/// Run the action behind `choice`; `Quit` yields `None`
pub async fn dispatch<S: Store, P: Prompter>(
    store: &S,
    prompter: &mut P,
    choice: MenuChoice,
) -> Result<Option<Outcome>> {
    let outcome = match choice {
        MenuChoice::ViewEmployees => actions::view_all(store, Table::Employee).await?,
        MenuChoice::AddEmployee => actions::add_employee(store, prompter).await?,
        MenuChoice::UpdateEmployeeRole => actions::update_employee_role(store, prompter).await?,
        MenuChoice::ViewRoles => actions::view_all(store, Table::Role).await?,
        MenuChoice::AddRole => actions::add_role(store, prompter).await?,
        MenuChoice::ViewDepartments => actions::view_all(store, Table::Department).await?,
        MenuChoice::AddDepartment => actions::add_department(store, prompter).await?,
        MenuChoice::Quit => return Ok(None),
    };

    Ok(Some(outcome))
}

/// Show the menu until the user quits
///
/// Action errors are printed and the menu comes back. Prompt and output
/// failures end the loop with an error.
pub async fn run_menu<S, P, W>(store: &S, prompter: &mut P, out: &mut W) -> Result<()>
where
    S: Store,
    P: Prompter,
    W: Write,
{
    loop {
        let choice = MenuChoice::prompt(prompter)?;
        tracing::debug!(action = choice.label(), "Menu selection");

        match dispatch(store, prompter, choice).await {
            Ok(Some(outcome)) => writeln!(out, "{outcome}")?,
            Ok(None) => break,
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => {
                tracing::debug!(
                    action = choice.label(),
                    code = e.error_code(),
                    error = %e,
                    "Action failed"
                );
                writeln!(out, "{}: {e}", choice.failure_label())?;
            }
        }
        out.flush()?;
    }

    Ok(())
}

/// Optionally create the tables, run the menu, then close `store`
///
/// The store is closed on every path. A session error wins over a close
/// error.
pub async fn run_session<S, P, W>(
    store: S,
    init_schema: bool,
    prompter: &mut P,
    out: &mut W,
) -> Result<()>
where
    S: Store,
    P: Prompter,
    W: Write,
{
    let session_result = async {
        if init_schema {
            store.ensure_schema().await?;
            tracing::info!(engine = %store.engine(), "Schema ready");
        }
        run_menu(&store, prompter, out).await
    }
    .await;

    let close_result = store.close().await;
    session_result.and(close_result)
}
