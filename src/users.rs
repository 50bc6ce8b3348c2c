use crate::error::{AppError, AppResult};
use anyhow::Context;
use directories::ProjectDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One entry of the static user-mapping table (`users.json`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEntry {
    pub name: Option<String>,
    pub email: Option<String>,
    pub mattermost_user_id: Option<String>,
    pub mattermost_channel_id: Option<String>,
}

/// Read-only map from numeric user id to notification destinations. Absence
/// of an entry is a resolvable error at notification time, never fatal.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDirectory {
    #[serde(default)]
    pub users: BTreeMap<String, UserEntry>,
}

impl UserDirectory {
    pub fn load(path: &Path) -> AppResult<Self> {
        let load = || -> anyhow::Result<Self> {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            let directory = serde_json::from_str(&raw)
                .with_context(|| format!("parse {}", path.display()))?;
            Ok(directory)
        };
        load().map_err(|e| AppError::config(format!("failed to load user mappings: {e:#}")))
    }

    /// Load `users.json` from the config directory; a missing file yields an
    /// empty directory.
    pub fn load_default() -> AppResult<Self> {
        let Some(path) = config_dir().map(|dir| dir.join("users.json")) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    pub fn get(&self, user_id: &str) -> Option<&UserEntry> {
        self.users.get(user_id)
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Entries sorted by numeric id where possible, lexical otherwise.
    pub fn sorted(&self) -> Vec<(&String, &UserEntry)> {
        let mut entries: Vec<_> = self.users.iter().collect();
        entries.sort_by_key(|(id, _)| id.parse::<u64>().map_err(|_| id.to_string()));
        entries
    }
}

/// Configuration directory: `ORG_ADMIN_CONFIG_DIR` when set, otherwise the
/// platform config dir for this tool.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("ORG_ADMIN_CONFIG_DIR") {
        if !dir.trim().is_empty() {
            return Some(PathBuf::from(dir));
        }
    }
    ProjectDirs::from("", "", "org-admin").map(|dirs| dirs.config_dir().to_path_buf())
}
