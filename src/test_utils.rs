//! Shared test utilities for Waitroom.
//!
//! This module provides common setup functions used across test modules.

#![cfg(test)]

use std::io;

use tempfile::{tempdir, TempDir};

use crate::browser::{BrowserRuntime, Tab, TabId};
use crate::db::{migrations, Database};
use crate::error::BridgeError;

/// Create a temporary test database with migrations applied.
///
/// Returns a tuple of (Database, TempDir). The TempDir must be kept alive
/// for the duration of the test to prevent the database file from being deleted.
pub fn setup_test_db() -> (Database, TempDir) {
    let dir = tempdir().expect("Failed to create temp directory for test DB");
    let db_path = dir.path().join("test.db");
    let db = Database::open(&db_path).expect("Failed to open test database");
    migrations::run(db.connection()).expect("Failed to run migrations on test DB");
    (db, dir)
}

/// Side effect recorded by [`MockRuntime`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeAction {
    Activated(TabId),
    Created { url: String, active: bool },
    Paused(TabId),
}

/// In-memory browser runtime that records every command.
///
/// Created tabs are deliberately NOT added to `tabs`: a freshly opened tab is
/// not discoverable by enumeration right away in the real browser either.
pub struct MockRuntime {
    pub tabs: Vec<Tab>,
    pub actions: Vec<RuntimeAction>,
    /// When set, `query_tabs` fails.
    pub fail_queries: bool,
    /// When set, every command fails without being recorded.
    pub fail_commands: bool,
}

impl MockRuntime {
    pub fn with_tabs(tabs: &[(TabId, &str)]) -> Self {
        Self {
            tabs: tabs
                .iter()
                .map(|(id, url)| Tab {
                    id: *id,
                    url: (*url).to_string(),
                })
                .collect(),
            actions: Vec::new(),
            fail_queries: false,
            fail_commands: false,
        }
    }

    fn command_error() -> BridgeError {
        BridgeError::Io(io::Error::new(io::ErrorKind::Other, "tab is gone"))
    }
}

impl BrowserRuntime for MockRuntime {
    fn query_tabs(&mut self) -> Result<Vec<Tab>, BridgeError> {
        if self.fail_queries {
            return Err(BridgeError::Disconnected);
        }
        Ok(self.tabs.clone())
    }

    fn activate_tab(&mut self, id: TabId) -> Result<(), BridgeError> {
        if self.fail_commands {
            return Err(Self::command_error());
        }
        self.actions.push(RuntimeAction::Activated(id));
        Ok(())
    }

    fn create_tab(&mut self, url: &str, active: bool) -> Result<(), BridgeError> {
        if self.fail_commands {
            return Err(Self::command_error());
        }
        self.actions.push(RuntimeAction::Created {
            url: url.to_string(),
            active,
        });
        Ok(())
    }

    fn pause_media(&mut self, id: TabId) -> Result<(), BridgeError> {
        if self.fail_commands {
            return Err(Self::command_error());
        }
        self.actions.push(RuntimeAction::Paused(id));
        Ok(())
    }
}
