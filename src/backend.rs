//! Backend selection: map a capture mode and the host platform to the
//! concrete capture API to request from the driver.

use std::fmt;

use crate::config::CaptureMode;

/// The OS-level capture API to open the device with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Windows DirectShow.
    Dshow,
    /// Whatever the driver picks first.
    Any,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Dshow => "dshow",
            Backend::Any => "any",
        };
        write!(f, "{}", name)
    }
}

/// Host platform information used to pick a backend in `auto` mode.
#[derive(Debug, Clone)]
pub struct SysInfo {
    pub os_system: String,
}

impl SysInfo {
    pub fn detect() -> Self {
        Self {
            os_system: std::env::consts::OS.to_string(),
        }
    }
}

/// Pick the backend for the given mode. Explicit modes map directly; `auto`
/// picks the platform-native backend. Unknown platforms fall back to the
/// generic backend; this never fails.
pub fn select_backend(mode: CaptureMode, sys_info: &SysInfo) -> Backend {
    match mode {
        CaptureMode::Dshow => Backend::Dshow,
        CaptureMode::Any => Backend::Any,
        CaptureMode::Auto => {
            if sys_info.os_system == "windows" {
                Backend::Dshow
            } else {
                Backend::Any
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sys(os: &str) -> SysInfo {
        SysInfo {
            os_system: os.to_string(),
        }
    }

    #[test]
    fn test_explicit_modes_ignore_platform() {
        assert_eq!(select_backend(CaptureMode::Dshow, &sys("linux")), Backend::Dshow);
        assert_eq!(select_backend(CaptureMode::Any, &sys("windows")), Backend::Any);
    }

    #[test]
    fn test_auto_picks_dshow_on_windows() {
        assert_eq!(select_backend(CaptureMode::Auto, &sys("windows")), Backend::Dshow);
    }

    #[test]
    fn test_auto_picks_any_elsewhere() {
        assert_eq!(select_backend(CaptureMode::Auto, &sys("linux")), Backend::Any);
        assert_eq!(select_backend(CaptureMode::Auto, &sys("macos")), Backend::Any);
    }

    #[test]
    fn test_unknown_platform_falls_back_to_any() {
        assert_eq!(select_backend(CaptureMode::Auto, &sys("plan9")), Backend::Any);
        assert_eq!(select_backend(CaptureMode::Auto, &sys("")), Backend::Any);
    }

    #[test]
    fn test_detect_does_not_panic() {
        let info = SysInfo::detect();
        assert!(!info.os_system.is_empty());
    }
}
