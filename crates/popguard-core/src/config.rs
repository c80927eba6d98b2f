//! Blocker configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use popguard_engine::TIMEOUT_SECONDS;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the trust database file
    pub database_path: PathBuf,
    /// Seconds a prompt stays visible before timeout-deny
    pub prompt_timeout_secs: u32,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("popguard.db"),
            prompt_timeout_secs: TIMEOUT_SECONDS,
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("Popguard"))
            .unwrap_or_else(|| PathBuf::from(".popguard"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Simple dirs implementation for the per-profile data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
