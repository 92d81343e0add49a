use serde::{Deserialize, Serialize};

pub(crate) use backend::save_prefs;

/// Editor settings kept between sessions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct EditorPrefs {
    pub(crate) show_grid: bool,
    pub(crate) last_level: Option<String>,
}

impl Default for EditorPrefs {
    fn default() -> Self {
        Self {
            show_grid: true,
            last_level: None,
        }
    }
}

pub(crate) fn load_prefs() -> EditorPrefs {
    backend::try_load_prefs().unwrap_or_default()
}

macro_rules! warn_err {
    ($expr:expr, $($arg:tt)+) => {
        $expr.map_err(|e| log::warn!($($arg)+, e)).ok()
    };
}

#[cfg(target_arch = "wasm32")]
mod backend {
    use super::*;

    const STORAGE_KEY: &str = "level_editor_prefs";

    pub(crate) fn save_prefs(prefs: &EditorPrefs) {
        let Some(json) = warn_err!(serde_json::to_string(prefs), "Failed to encode prefs: {}") else {
            return;
        };
        if let Ok(mut storage) = quad_storage::STORAGE.lock() {
            storage.set(STORAGE_KEY, &json);
        }
    }

    pub(super) fn try_load_prefs() -> Option<EditorPrefs> {
        let s = quad_storage::STORAGE.lock().ok()?.get(STORAGE_KEY)?;
        warn_err!(serde_json::from_str(&s), "Failed to parse {}: {}", s)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod backend {
    use super::*;
    use std::fs::{create_dir_all, read_to_string, write};
    use std::path::PathBuf;

    pub(crate) fn save_prefs(prefs: &EditorPrefs) {
        let Some(path) = prefs_path() else {
            return;
        };
        if let Some(parent) = path.parent() {
            let _ = create_dir_all(parent);
        }
        if let Some(json) = warn_err!(serde_json::to_string_pretty(prefs), "Failed to encode prefs: {}") {
            warn_err!(write(&path, json), "Failed to write {}: {}", path.display());
        }
    }

    pub(super) fn try_load_prefs() -> Option<EditorPrefs> {
        let path = prefs_path()?;
        if !path.exists() {
            return None;
        }
        let s = warn_err!(
            read_to_string(&path),
            "Failed to read {}: {}",
            path.display()
        )?;
        warn_err!(
            serde_json::from_str(&s),
            "Failed to parse {}: {}",
            path.display()
        )
    }

    fn prefs_path() -> Option<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", "LevelEditor")?;
        Some(dirs.config_dir().join("prefs.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let prefs: EditorPrefs = serde_json::from_str(r#"{"last_level":"1-2"}"#).unwrap();
        assert!(prefs.show_grid);
        assert_eq!(prefs.last_level.as_deref(), Some("1-2"));
    }
}
