//! Employee Tracker - Interactive Records Manager
//!
//! An interactive command-line tool for the employee, role, and department
//! tables of a relational database. A menu drives every action; writes that
//! reference another record (an employee's role, a role's department) only
//! happen after that record is confirmed to exist.
//!
//! # Module Organization
//! - [`error`] - Error types and handling
//! - [`engine`] - Store trait, table types, and engine implementations
//! - [`config`] - Connection resolution (environment, `.env`, config files)
//! - [`prompt`] - Terminal and scripted prompts
//! - [`actions`] - One handler per menu entry, plus the existence check
//! - [`menu`] - The menu loop
//! - [`output`] - Table rendering

pub mod actions;
pub mod config;
pub mod engine;
pub mod error;
pub mod menu;
pub mod output;
pub mod prompt;

// Re-export commonly used types for convenience
pub use actions::{record_exists, Outcome, Rejection};
pub use config::{resolve_connection, ConnectionFile, StoredConnection};
pub use engine::{
    ConnectionConfig, DatabaseType, NewDepartment, NewEmployee, NewRole, QueryResult, Store, Table,
};
pub use error::{Result, TrackerError};
pub use menu::{run_menu, run_session, MenuChoice};
pub use prompt::{Prompter, ScriptedPrompter, TerminalPrompter};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_api_exports() {
        let _engine_type = DatabaseType::Postgres;
        let _choice = MenuChoice::Quit;
        let _prompter = ScriptedPrompter::default();

        assert_eq!(Table::ALL.len(), 3);
        assert_eq!(MenuChoice::ALL.len(), 8);
    }
}
