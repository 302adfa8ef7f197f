//! Where process names come from.

use crate::error::ProcessEnumerationError;

/// A snapshot provider for the names of running processes.
pub trait ProcessSource: Send + Sync {
    fn process_names(&self) -> Result<Vec<String>, ProcessEnumerationError>;
}

/// The operating system's process list.
///
/// Uses a ToolHelp snapshot on Windows and `sysinfo` elsewhere. Only
/// process names are read; no process is ever opened.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcesses;

#[cfg(windows)]
impl ProcessSource for SystemProcesses {
    fn process_names(&self) -> Result<Vec<String>, ProcessEnumerationError> {
        crate::winapi_utils::list_process_names()
    }
}

#[cfg(not(windows))]
impl ProcessSource for SystemProcesses {
    fn process_names(&self) -> Result<Vec<String>, ProcessEnumerationError> {
        use sysinfo::{ProcessesToUpdate, System};

        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::All, true);

        let names: Vec<String> = system
            .processes()
            .values()
            .map(|process| process.name().to_string_lossy().into_owned())
            .collect();

        if names.is_empty() {
            return Err(ProcessEnumerationError("process list is empty".to_string()));
        }
        Ok(names)
    }
}
