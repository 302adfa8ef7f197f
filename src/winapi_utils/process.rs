//! Process-related WinAPI wrappers.
//!
//! Provides a ToolHelp snapshot of running process names and a liveness
//! check by PID.

use crate::error::ProcessEnumerationError;
use windows::Win32::Foundation::{CloseHandle, HANDLE};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W, TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::{OpenProcess, PROCESS_QUERY_LIMITED_INFORMATION};

/// RAII wrapper for Windows handles.
///
/// Automatically closes the handle when dropped to prevent handle leaks.
struct OwnedHandle(HANDLE);

impl OwnedHandle {
    fn as_raw(&self) -> HANDLE {
        self.0
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        unsafe {
            let _ = CloseHandle(self.0);
        }
    }
}

/// Lists the executable names of all running processes.
///
/// Names come straight from the snapshot (`szExeFile`), so no process is
/// opened and access-denied system processes are still included.
pub fn list_process_names() -> Result<Vec<String>, ProcessEnumerationError> {
    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
        .map_err(|e| ProcessEnumerationError(format!("CreateToolhelp32Snapshot failed: {e}")))?;
    let snapshot = OwnedHandle(snapshot);

    let mut entry = PROCESSENTRY32W {
        dwSize: std::mem::size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };

    unsafe { Process32FirstW(snapshot.as_raw(), &mut entry) }
        .map_err(|e| ProcessEnumerationError(format!("Process32FirstW failed: {e}")))?;

    let mut names = Vec::with_capacity(256);
    loop {
        names.push(exe_name(&entry));
        if unsafe { Process32NextW(snapshot.as_raw(), &mut entry) }.is_err() {
            break;
        }
    }

    Ok(names)
}

fn exe_name(entry: &PROCESSENTRY32W) -> String {
    let len = entry
        .szExeFile
        .iter()
        .position(|&c| c == 0)
        .unwrap_or(entry.szExeFile.len());
    String::from_utf16_lossy(&entry.szExeFile[..len])
}

/// Checks whether a process with the given PID can be opened.
pub fn is_process_running(pid: u32) -> bool {
    match unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) } {
        Ok(handle) if !handle.is_invalid() => {
            drop(OwnedHandle(handle));
            true
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_contains_current_process() {
        let names = list_process_names().unwrap();
        let exe = std::env::current_exe().unwrap();
        let own = exe.file_name().unwrap().to_string_lossy().to_lowercase();
        assert!(names.iter().any(|name| name.to_lowercase() == own));
    }

    #[test]
    fn test_current_process_is_running() {
        assert!(is_process_running(std::process::id()));
    }

    #[test]
    fn test_invalid_pid_is_not_running() {
        // PIDs are multiples of four; this one can never exist
        assert!(!is_process_running(u32::MAX - 2));
    }
}
