//! [`ExternalActions`] fake that records calls.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::error::VhostError;

use super::ExternalActions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Reload,
    CreateDatabase { name: String, charset: String },
    DropDatabase { name: String },
    DatabaseExists { name: String },
    OpenEditor { path: PathBuf },
}

#[derive(Debug, Default)]
pub(crate) struct RecordingActions {
    calls: RefCell<Vec<Call>>,
    databases: RefCell<BTreeSet<String>>,
    fail_reload: Cell<bool>,
    fail_database: Cell<bool>,
}

impl RecordingActions {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing_reload(self) -> Self {
        self.fail_reload.set(true);
        self
    }

    pub(crate) fn failing_database(self) -> Self {
        self.fail_database.set(true);
        self
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub(crate) fn reloads(&self) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| **c == Call::Reload)
            .count()
    }

    pub(crate) fn has_database(&self, name: &str) -> bool {
        self.databases.borrow().contains(name)
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl ExternalActions for RecordingActions {
    fn reload(&self) -> Result<(), VhostError> {
        self.record(Call::Reload);
        if self.fail_reload.get() {
            return Err(VhostError::execution_failed("reload failed"));
        }
        Ok(())
    }

    fn create_database(&self, name: &str, charset: &str) -> Result<(), VhostError> {
        self.record(Call::CreateDatabase {
            name: name.to_string(),
            charset: charset.to_string(),
        });
        if self.fail_database.get() {
            return Err(VhostError::execution_failed("mysql unavailable"));
        }
        self.databases.borrow_mut().insert(name.to_string());
        Ok(())
    }

    fn drop_database(&self, name: &str) -> Result<(), VhostError> {
        self.record(Call::DropDatabase {
            name: name.to_string(),
        });
        if self.fail_database.get() {
            return Err(VhostError::execution_failed("mysql unavailable"));
        }
        self.databases.borrow_mut().remove(name);
        Ok(())
    }

    fn database_exists(&self, name: &str) -> Result<bool, VhostError> {
        self.record(Call::DatabaseExists {
            name: name.to_string(),
        });
        Ok(self.has_database(name))
    }

    fn open_editor(&self, path: &Path) -> Result<(), VhostError> {
        self.record(Call::OpenEditor {
            path: path.to_path_buf(),
        });
        Ok(())
    }
}
