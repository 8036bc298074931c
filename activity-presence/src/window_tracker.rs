//! Foreground window tracking.
//!
//! Each poll asks the host OS for the focused window and its owning process,
//! then resolves the process id to a name. Any failure along the way yields
//! the idle activity rather than an error.

use crate::types::{ProcessId, ProcessLookupError, RawActivity};
use sysinfo::{Pid, ProcessRefreshKind, System};
use tracing::{debug, trace};

/// Focused window as reported by the OS
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundWindow {
    pub pid: ProcessId,
    pub title: String,
}

/// Source of the currently focused window
pub trait ForegroundWindowSource: Send {
    fn foreground_window(&self) -> Option<ForegroundWindow>;
}

/// Process id → process name lookup
pub trait ProcessNames: Send {
    fn process_name(&mut self, pid: ProcessId) -> Result<String, ProcessLookupError>;
}

/// Lowercase a process name and strip a trailing `.exe`
pub fn normalize_process_name(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    match lower.strip_suffix(".exe") {
        Some(stem) => stem.to_string(),
        None => lower,
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use super::ForegroundWindow;
    use windows::Win32::UI::WindowsAndMessaging::{
        GetForegroundWindow, GetWindowTextW, GetWindowThreadProcessId,
    };

    pub fn foreground_window() -> Option<ForegroundWindow> {
        unsafe {
            let hwnd = GetForegroundWindow();
            if hwnd.0.is_null() {
                return None;
            }

            let mut pid = 0u32;
            GetWindowThreadProcessId(hwnd, Some(&mut pid));
            if pid == 0 {
                return None;
            }

            let mut title_buf = [0u16; 512];
            let len = GetWindowTextW(hwnd, &mut title_buf);
            let len = usize::try_from(len).unwrap_or(0);
            let title = String::from_utf16_lossy(&title_buf[..len]);

            Some(ForegroundWindow { pid, title })
        }
    }
}

#[cfg(not(target_os = "windows"))]
mod platform {
    use super::ForegroundWindow;

    pub fn foreground_window() -> Option<ForegroundWindow> {
        None
    }
}

/// Foreground window of the current desktop session
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemForegroundWindow;

impl ForegroundWindowSource for SystemForegroundWindow {
    fn foreground_window(&self) -> Option<ForegroundWindow> {
        platform::foreground_window()
    }
}

/// `sysinfo`-backed process name lookup
pub struct SysinfoProcessNames {
    system: System,
}

impl SysinfoProcessNames {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SysinfoProcessNames {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessNames for SysinfoProcessNames {
    fn process_name(&mut self, pid: ProcessId) -> Result<String, ProcessLookupError> {
        let sys_pid = Pid::from_u32(pid);
        self.system
            .refresh_process_specifics(sys_pid, ProcessRefreshKind::new());

        self.system
            .process(sys_pid)
            .map(|process| normalize_process_name(process.name()))
            .ok_or(ProcessLookupError { pid })
    }
}

/// Produces one [`RawActivity`] per poll
pub struct WindowTracker {
    source: Box<dyn ForegroundWindowSource>,
    names: Box<dyn ProcessNames>,
    /// Last observation, for status reporting
    last: Option<RawActivity>,
}

impl WindowTracker {
    /// Tracker for the real desktop
    pub fn new() -> Self {
        Self::with_sources(
            Box::new(SystemForegroundWindow),
            Box::new(SysinfoProcessNames::new()),
        )
    }

    pub fn with_sources(
        source: Box<dyn ForegroundWindowSource>,
        names: Box<dyn ProcessNames>,
    ) -> Self {
        Self {
            source,
            names,
            last: None,
        }
    }

    /// Observe the foreground window
    pub fn poll(&mut self) -> RawActivity {
        let activity = match self.source.foreground_window() {
            Some(window) => match self.names.process_name(window.pid) {
                Ok(name) => RawActivity::new(name, window.title),
                Err(e) => {
                    debug!("{}, reporting idle", e);
                    RawActivity::idle()
                }
            },
            None => {
                trace!("No foreground window");
                RawActivity::idle()
            }
        };

        self.last = Some(activity.clone());
        activity
    }

    pub fn last(&self) -> Option<&RawActivity> {
        self.last.as_ref()
    }
}

impl Default for WindowTracker {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::{NameTable, ScriptedWindow};
    use super::*;

    #[test]
    fn test_normalize_process_name() {
        assert_eq!(normalize_process_name("Chrome.exe"), "chrome");
        assert_eq!(normalize_process_name("firefox"), "firefox");
        assert_eq!(normalize_process_name("  Code.EXE "), "code");
        assert_eq!(normalize_process_name("my.exe.tool"), "my.exe.tool");
    }

    #[test]
    fn test_poll_resolves_process_name() {
        let window = ScriptedWindow::default();
        window.set(42, "Breaking Bad - Netflix");
        let mut tracker = WindowTracker::with_sources(
            Box::new(window),
            Box::new(NameTable::default().with(42, "Chrome.exe")),
        );

        let activity = tracker.poll();
        assert_eq!(activity, RawActivity::new("chrome", "Breaking Bad - Netflix"));
        assert_eq!(tracker.last(), Some(&activity));
    }

    #[test]
    fn test_vanished_process_is_idle() {
        let window = ScriptedWindow::default();
        window.set(7, "Something");
        let mut tracker =
            WindowTracker::with_sources(Box::new(window), Box::new(NameTable::default()));

        let activity = tracker.poll();
        assert!(activity.is_idle());
        assert_eq!(activity.identity().as_str(), "idle|||");
    }

    #[test]
    fn test_no_foreground_window_is_idle() {
        let window = ScriptedWindow::default();
        let mut tracker = WindowTracker::with_sources(
            Box::new(window.clone()),
            Box::new(NameTable::default().with(1, "notepad")),
        );
        assert!(tracker.poll().is_idle());

        window.set(1, "notes.txt - Notepad");
        assert_eq!(tracker.poll().process_name, "notepad");

        window.clear();
        assert!(tracker.poll().is_idle());
    }

    #[test]
    fn test_sysinfo_lookup_of_own_process() {
        let mut names = SysinfoProcessNames::new();
        let name = names.process_name(std::process::id()).unwrap();
        assert!(!name.is_empty());
        assert_eq!(name, name.to_lowercase());
    }

    #[test]
    fn test_sysinfo_lookup_of_missing_process() {
        let mut names = SysinfoProcessNames::new();
        let err = names.process_name(u32::MAX - 1).unwrap_err();
        assert_eq!(err.to_string(), format!("Process {} not found", u32::MAX - 1));
    }
}
