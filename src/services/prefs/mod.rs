//! Key-value preference persistence.
//!
//! The engine only depends on the [`PreferenceStore`] capability;
//! whether values land in a JSON file, an OS keychain or nowhere at all
//! is the host's choice. Absent or corrupt data always degrades to
//! built-in defaults, never to a hard failure.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::models::color_rule::{default_rules, ColorRule};

/// Storage key for the user's color-rule list.
pub const COLOR_RULES_KEY: &str = "color_rules";

/// Minimal key-value persistence capability.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// JSON-file-backed store. The whole map is rewritten on every set;
/// preference traffic is a few small writes per session.
pub struct FilePreferenceStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FilePreferenceStore {
    /// Open (or create) the store at `path`. Unreadable or corrupt
    /// content is logged and treated as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(values) => values,
                Err(err) => {
                    log::warn!(
                        "Preference file {} is corrupt ({err}); starting from defaults",
                        path.display()
                    );
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, values }
    }

    /// Platform config location, e.g. `~/.config/timepane/prefs.json`.
    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "timepane")
            .map(|dirs| dirs.config_dir().join("prefs.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        if let Some(parent) = self.path.parent() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                log::error!("Could not create {}: {err}", parent.display());
                return;
            }
        }
        match serde_json::to_string_pretty(&self.values) {
            Ok(json) => {
                if let Err(err) = std::fs::write(&self.path, json) {
                    log::error!("Could not write {}: {err}", self.path.display());
                }
            }
            Err(err) => log::error!("Could not serialize preferences: {err}"),
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.persist();
        }
    }
}

/// Volatile store for tests and headless runs.
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: HashMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

/// Load the color-rule list, falling back to [`default_rules`] when the
/// key is absent or the JSON cannot be parsed.
pub fn load_color_rules(store: &dyn PreferenceStore) -> Vec<ColorRule> {
    let Some(json) = store.get(COLOR_RULES_KEY) else {
        return default_rules();
    };
    match serde_json::from_str(&json) {
        Ok(rules) => rules,
        Err(err) => {
            log::warn!("Persisted color rules are corrupt ({err}); using defaults");
            default_rules()
        }
    }
}

/// Persist the color-rule list.
pub fn save_color_rules(store: &mut dyn PreferenceStore, rules: &[ColorRule]) {
    match serde_json::to_string(rules) {
        Ok(json) => store.set(COLOR_RULES_KEY, &json),
        Err(err) => log::error!("Could not serialize color rules: {err}"),
    }
}
