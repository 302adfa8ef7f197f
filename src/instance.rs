//! Single-instance guard backed by a PID lock file.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = "foxhole-overlay.lock";

/// Holds the lock file; deletes it when dropped.
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
}

impl InstanceLock {
    /// Default lock location inside the user's data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("foxhole-overlay")
            .join(LOCK_FILE)
    }

    /// Takes the lock at `path`.
    ///
    /// Returns `Ok(None)` when the file names a live process. A lock file
    /// whose PID is gone (or unreadable) is stale and gets replaced.
    pub fn acquire(path: impl Into<PathBuf>) -> io::Result<Option<Self>> {
        let path = path.into();

        if let Some(pid) = read_pid(&path) {
            if pid != std::process::id() && is_process_alive(pid) {
                tracing::warn!(pid, path = ?path, "Another instance is already running");
                return Ok(None);
            }
            tracing::debug!(pid, "Removing stale lock file");
        }
        let _ = fs::remove_file(&path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        write!(file, "{}", std::process::id())?;

        Ok(Some(Self { path }))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.path);
    }
}

fn read_pid(path: &Path) -> Option<u32> {
    fs::read_to_string(path).ok()?.trim().parse().ok()
}

#[cfg(windows)]
fn is_process_alive(pid: u32) -> bool {
    crate::winapi_utils::is_process_running(pid)
}

#[cfg(not(windows))]
fn is_process_alive(pid: u32) -> bool {
    use sysinfo::{Pid, ProcessesToUpdate, System};

    let pid = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system.process(pid).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lock_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("foxhole-overlay-lock-{}-{name}", std::process::id()))
            .join(LOCK_FILE)
    }

    #[test]
    fn test_acquire_writes_pid_and_cleans_up() {
        let path = lock_path("basic");
        {
            let lock = InstanceLock::acquire(&path).unwrap().unwrap();
            assert_eq!(read_pid(lock.path()), Some(std::process::id()));
        }
        assert!(!path.exists());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_stale_lock_is_replaced() {
        let path = lock_path("stale");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        // Garbage content can never name a live process
        fs::write(&path, "not-a-pid").unwrap();

        let lock = InstanceLock::acquire(&path).unwrap();
        assert!(lock.is_some());
        drop(lock);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_current_process_is_alive() {
        assert!(is_process_alive(std::process::id()));
    }
}
