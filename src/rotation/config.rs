use super::date::DateFormat;
use crate::error::{AppError, AppResult};
use crate::users;
use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Single-rotation config file: `{ project_id, prefix, date_format?, notify_user? }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RotationFileConfig {
    pub project_id: Option<String>,
    pub prefix: Option<String>,
    pub date_format: Option<String>,
    pub notify_user: Option<String>,
}

/// Batch config file: `{ rotations: [ { project_name, project_id, keys: [...] } ] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchConfig {
    #[serde(default)]
    pub rotations: Vec<RotationGroup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RotationGroup {
    pub project_name: Option<String>,
    pub project_id: Option<String>,
    #[serde(default)]
    pub keys: Vec<KeySpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeySpec {
    pub name: Option<String>,
    pub notify_user: Option<String>,
    pub notify_channel: Option<String>,
    pub date_format: Option<String>,
}

pub fn load_rotation_file(path: &Path) -> AppResult<RotationFileConfig> {
    read_config(path)
}

pub fn load_batch_file(path: &Path) -> AppResult<BatchConfig> {
    read_config(path)
}

fn read_config<T: serde::de::DeserializeOwned>(path: &Path) -> AppResult<T> {
    let load = || -> anyhow::Result<T> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read {}", path.display()))?;
        let config = serde_json::from_str(&raw)
            .with_context(|| format!("parse {}", path.display()))?;
        Ok(config)
    };
    load().map_err(|e| AppError::config(format!("failed to load config file: {e:#}")))
}

/// The default rotation config, read from `rotation.json` in the config
/// directory when present. A missing file is an empty config, not an error.
pub fn default_rotation_config() -> AppResult<RotationFileConfig> {
    let Some(path) = default_rotation_path() else {
        return Ok(RotationFileConfig::default());
    };
    if !path.exists() {
        return Ok(RotationFileConfig::default());
    }
    load_rotation_file(&path)
}

fn default_rotation_path() -> Option<PathBuf> {
    users::config_dir().map(|dir| dir.join("rotation.json"))
}

/// Two-layer option resolution: an explicit command-level value wins over
/// the root-level one.
pub fn resolve_option<T>(command: Option<T>, global: Option<T>) -> Option<T> {
    command.or(global)
}

/// One fully-validated rotation unit.
#[derive(Debug, Clone)]
pub struct ResolvedRotation {
    pub project_id: String,
    pub prefix: String,
    pub date_format: DateFormat,
    pub notify_user: Option<String>,
}

/// Merge CLI flags over a loaded config file and validate the required
/// fields. Flags always win; missing project id or prefix is a
/// configuration error reported before any network call.
pub fn resolve_single(
    file: RotationFileConfig,
    project_id: Option<String>,
    prefix: Option<String>,
    date_format: Option<DateFormat>,
    notify_user: Option<String>,
) -> AppResult<ResolvedRotation> {
    let resolved_project = resolve_option(project_id, file.project_id).ok_or_else(|| {
        AppError::config("project ID is required (use --project-id or a config file)")
    })?;
    let resolved_prefix = resolve_option(prefix, file.prefix).ok_or_else(|| {
        AppError::config("naming prefix is required (use --prefix or a config file)")
    })?;
    let file_format = match file.date_format.as_deref() {
        Some(raw) => Some(parse_config_format(raw)?),
        None => None,
    };
    Ok(ResolvedRotation {
        project_id: resolved_project,
        prefix: resolved_prefix,
        date_format: resolve_option(date_format, file_format)
            .unwrap_or(DateFormat::ShortYearMonth),
        notify_user: resolve_option(notify_user, file.notify_user),
    })
}

pub fn parse_config_format(raw: &str) -> AppResult<DateFormat> {
    DateFormat::from_config(raw).ok_or_else(|| {
        AppError::config(format!(
            "invalid date_format '{raw}'; expected YY-MM or YYYY-MM-DD"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_option_prefers_command_level() {
        assert_eq!(resolve_option(Some(1), Some(2)), Some(1));
        assert_eq!(resolve_option(None, Some(2)), Some(2));
        assert_eq!(resolve_option::<i32>(None, None), None);
    }

    #[test]
    fn flags_override_file_values() {
        let file = RotationFileConfig {
            project_id: Some("proj_file".into()),
            prefix: Some("file-prefix".into()),
            date_format: Some("YYYY-MM-DD".into()),
            notify_user: Some("7".into()),
        };
        let resolved = resolve_single(
            file,
            Some("proj_flag".into()),
            None,
            None,
            None,
        )
        .expect("resolve");
        assert_eq!(resolved.project_id, "proj_flag");
        assert_eq!(resolved.prefix, "file-prefix");
        assert_eq!(resolved.date_format, DateFormat::FullDate);
        assert_eq!(resolved.notify_user.as_deref(), Some("7"));
    }

    #[test]
    fn missing_project_id_is_a_config_error() {
        let err = resolve_single(
            RotationFileConfig::default(),
            None,
            Some("svc".into()),
            None,
            None,
        )
        .expect_err("missing project");
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.message.contains("project ID"));
    }

    #[test]
    fn missing_prefix_is_a_config_error() {
        let err = resolve_single(
            RotationFileConfig::default(),
            Some("proj_1".into()),
            None,
            None,
            None,
        )
        .expect_err("missing prefix");
        assert_eq!(err.code(), "CONFIG_ERROR");
        assert!(err.message.contains("prefix"));
    }

    #[test]
    fn date_format_defaults_to_short() {
        let resolved = resolve_single(
            RotationFileConfig::default(),
            Some("proj_1".into()),
            Some("svc".into()),
            None,
            None,
        )
        .expect("resolve");
        assert_eq!(resolved.date_format, DateFormat::ShortYearMonth);
    }

    #[test]
    fn bad_file_format_string_is_a_config_error() {
        let file = RotationFileConfig {
            project_id: Some("proj".into()),
            prefix: Some("svc".into()),
            date_format: Some("DD-MM".into()),
            notify_user: None,
        };
        let err = resolve_single(file, None, None, None, None).expect_err("bad format");
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn batch_config_parses_the_documented_shape() {
        let raw = r#"{
            "rotations": [
                {
                    "project_name": "Inventory",
                    "project_id": "proj_123",
                    "keys": [
                        {
                            "name": "inventory-server",
                            "notify_user": "49",
                            "notify_channel": "mattermost",
                            "date_format": "YY-MM"
                        }
                    ]
                },
                { "project_name": "Empty" }
            ]
        }"#;
        let config: BatchConfig = serde_json::from_str(raw).expect("parse");
        assert_eq!(config.rotations.len(), 2);
        let group = &config.rotations[0];
        assert_eq!(group.project_id.as_deref(), Some("proj_123"));
        assert_eq!(group.keys.len(), 1);
        assert_eq!(group.keys[0].notify_channel.as_deref(), Some("mattermost"));
        assert!(config.rotations[1].project_id.is_none());
        assert!(config.rotations[1].keys.is_empty());
    }
}
