use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use liftquote_core::config::AppConfig;
use serde::Serialize;
use toml::Value;

use crate::commands::{load_config, CommandResult};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ConfigEntry {
    pub key: &'static str,
    pub value: String,
    pub source: String,
}

pub fn run() -> CommandResult {
    let config = match load_config("config") {
        Ok(config) => config,
        Err(result) => return result,
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let entries = effective_entries(&config, config_file_doc.as_ref(), config_file_path.as_deref());

    match serde_json::to_value(&entries) {
        Ok(data) => CommandResult::success_with_data(
            "config",
            "effective config (source precedence: env > file > default)",
            data,
        ),
        Err(error) => CommandResult::failure("config", "serialization", error.to_string(), 3),
    }
}

fn effective_entries(
    config: &AppConfig,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> Vec<ConfigEntry> {
    let fields: [(&'static str, String, &[&str]); 6] = [
        ("database.url", config.database.url.clone(), &["LIFTQUOTE_DATABASE_URL"]),
        (
            "database.max_connections",
            config.database.max_connections.to_string(),
            &["LIFTQUOTE_DATABASE_MAX_CONNECTIONS"],
        ),
        (
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            &["LIFTQUOTE_DATABASE_TIMEOUT_SECS"],
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            &["LIFTQUOTE_LOGGING_LEVEL", "LIFTQUOTE_LOG_LEVEL"],
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format).to_ascii_lowercase(),
            &["LIFTQUOTE_LOGGING_FORMAT", "LIFTQUOTE_LOG_FORMAT"],
        ),
        ("export.sheet_name", config.export.sheet_name.clone(), &["LIFTQUOTE_EXPORT_SHEET_NAME"]),
    ];

    fields
        .into_iter()
        .map(|(key, value, env_keys)| ConfigEntry {
            key,
            value,
            source: field_source(key, env_keys, config_file_doc, config_file_path),
        })
        .collect()
}

fn detect_config_path() -> Option<PathBuf> {
    ["liftquote.toml", "config/liftquote.toml"].into_iter().map(PathBuf::from).find(|p| p.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let raw = fs::read_to_string(path?).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use liftquote_core::config::AppConfig;
    use toml::Value;

    use super::{contains_path, effective_entries, field_source};

    #[test]
    fn nested_key_paths_resolve_against_the_file_document() {
        let doc = "[export]\nsheet_name = \"Matrix\"\n".parse::<Value>().expect("toml");

        assert!(contains_path(&doc, "export.sheet_name"));
        assert!(!contains_path(&doc, "export.missing"));
        assert!(!contains_path(&doc, "database.url"));
    }

    #[test]
    fn file_source_names_the_file_and_unset_keys_are_default() {
        let doc = "[database]\nurl = \"sqlite://dealer.db\"\n".parse::<Value>().expect("toml");
        let path = Path::new("liftquote.toml");

        assert_eq!(
            field_source("database.url", &["LIFTQUOTE_TEST_UNSET_KEY"], Some(&doc), Some(path)),
            "file (liftquote.toml)"
        );
        assert_eq!(
            field_source("logging.level", &["LIFTQUOTE_TEST_UNSET_KEY"], Some(&doc), Some(path)),
            "default"
        );
    }

    #[test]
    fn every_config_field_is_reported_once() {
        let entries = effective_entries(&AppConfig::default(), None, None);
        let keys = entries.iter().map(|entry| entry.key).collect::<Vec<_>>();

        assert_eq!(
            keys,
            vec![
                "database.url",
                "database.max_connections",
                "database.timeout_secs",
                "logging.level",
                "logging.format",
                "export.sheet_name",
            ]
        );
        assert_eq!(entries[4].value, "compact");
    }
}
