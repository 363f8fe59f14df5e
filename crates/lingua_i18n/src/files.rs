//! Resources loaded from translation directories.
//!
//! Layout: `<dir>/<locale>/<name>.json` (or `.yaml` / `.yml`). The file stem
//! becomes the resource name and the directory priority becomes the resource
//! priority, so files in higher priority directories override lower ones.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::I18nError;
use crate::locale::{is_valid_locale, normalize_locale};
use crate::resource::Resource;

const MAX_CATALOG_ENTRIES: usize = 10_000;
const MAX_VALUE_BYTES: usize = 16 * 1024;

/// A directory of locale sub-directories.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceDir {
    pub path: PathBuf,
    pub priority: i32,
}

impl ResourceDir {
    pub fn new(path: impl Into<PathBuf>, priority: i32) -> Self {
        Self {
            path: path.into(),
            priority,
        }
    }
}

/// Loads [`Resource`]s from a set of directories.
#[derive(Clone, Debug, Default)]
pub struct FilesResources {
    dirs: Vec<ResourceDir>,
}

impl FilesResources {
    pub fn new(dirs: impl IntoIterator<Item = ResourceDir>) -> Self {
        Self {
            dirs: dirs.into_iter().collect(),
        }
    }

    pub fn dirs(&self) -> &[ResourceDir] {
        &self.dirs
    }

    /// Read every resource file below the configured directories.
    ///
    /// Directories that do not exist are skipped.
    pub fn load(&self) -> Result<Vec<Resource>, I18nError> {
        let mut out = Vec::new();
        for dir in &self.dirs {
            if !dir.path.is_dir() {
                debug!(dir = %dir.path.display(), "translation dir missing, skipped");
                continue;
            }
            for locale_dir in sorted_entries(&dir.path)? {
                if !locale_dir.is_dir() {
                    continue;
                }
                let Some(locale) = locale_dir
                    .file_name()
                    .and_then(|n| n.to_str())
                    .map(normalize_locale)
                    .filter(|l| is_valid_locale(l))
                else {
                    debug!(dir = %locale_dir.display(), "not a locale dir, skipped");
                    continue;
                };
                for file in sorted_entries(&locale_dir)? {
                    if let Some(resource) = load_file(&file, &locale, dir.priority)? {
                        out.push(resource);
                    }
                }
            }
        }
        debug!(count = out.len(), "translation files loaded");
        Ok(out)
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, I18nError> {
    let io_err = |source| I18nError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        paths.push(entry.map_err(io_err)?.path());
    }
    paths.sort();
    Ok(paths)
}

fn load_file(path: &Path, locale: &str, priority: i32) -> Result<Option<Resource>, I18nError> {
    if !path.is_file() {
        return Ok(None);
    }
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let parse: fn(&str) -> Result<HashMap<String, String>, String> = match ext {
        "json" => parse_json,
        "yaml" | "yml" => parse_yaml,
        _ => return Ok(None),
    };
    let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
        return Ok(None);
    };

    let src = fs::read_to_string(path).map_err(|source| I18nError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let translations = parse(&src).map_err(|msg| I18nError::Parse {
        path: path.to_path_buf(),
        msg,
    })?;

    debug!(
        file = %path.display(),
        name = %name,
        locale = %locale,
        keys = translations.len(),
        "translation file parsed"
    );
    Ok(Some(
        Resource::new(name, locale, translations).with_priority(priority),
    ))
}

/// Parse a JSON object of translations. Nested objects are flattened into
/// dotted keys.
pub fn parse_json(src: &str) -> Result<HashMap<String, String>, String> {
    let value: serde_json::Value =
        serde_json::from_str(src).map_err(|e| format!("json parse error: {e}"))?;
    let serde_json::Value::Object(map) = value else {
        return Err("top level must be an object".to_string());
    };

    let mut out = HashMap::new();
    flatten_json(&map, "", &mut out)?;
    Ok(out)
}

fn flatten_json(
    map: &serde_json::Map<String, serde_json::Value>,
    prefix: &str,
    out: &mut HashMap<String, String>,
) -> Result<(), String> {
    for (k, v) in map {
        let key = join_key(prefix, k);
        match v {
            serde_json::Value::Object(inner) => flatten_json(inner, &key, out)?,
            serde_json::Value::String(s) => insert_checked(out, key, s)?,
            _ => return Err(format!("value for key `{key}` must be a string")),
        }
    }
    Ok(())
}

/// Parse a YAML mapping of translations. Nested mappings are flattened into
/// dotted keys.
pub fn parse_yaml(src: &str) -> Result<HashMap<String, String>, String> {
    if src.trim().is_empty() {
        return Ok(HashMap::new());
    }
    let value: serde_yaml::Value =
        serde_yaml::from_str(src).map_err(|e| format!("yaml parse error: {e}"))?;
    let serde_yaml::Value::Mapping(map) = value else {
        return Err("top level must be a mapping".to_string());
    };

    let mut out = HashMap::new();
    flatten_yaml(&map, "", &mut out)?;
    Ok(out)
}

fn flatten_yaml(
    map: &serde_yaml::Mapping,
    prefix: &str,
    out: &mut HashMap<String, String>,
) -> Result<(), String> {
    for (k, v) in map {
        let Some(k) = k.as_str() else {
            return Err("yaml keys must be strings".to_string());
        };
        let key = join_key(prefix, k);
        match v {
            serde_yaml::Value::Mapping(inner) => flatten_yaml(inner, &key, out)?,
            serde_yaml::Value::String(s) => insert_checked(out, key, s)?,
            _ => return Err(format!("yaml value for key `{key}` must be a string")),
        }
    }
    Ok(())
}

fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn insert_checked(
    out: &mut HashMap<String, String>,
    key: String,
    value: &str,
) -> Result<(), String> {
    if value.len() > MAX_VALUE_BYTES {
        return Err(format!(
            "value for key `{key}` is too long (max {MAX_VALUE_BYTES} bytes)"
        ));
    }
    if out.len() >= MAX_CATALOG_ENTRIES && !out.contains_key(&key) {
        return Err(format!("too many entries (max {MAX_CATALOG_ENTRIES})"));
    }
    out.insert(key, value.to_string());
    Ok(())
}
