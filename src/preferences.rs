//! Session preferences persisted as a flat JSON object of strings.
//!
//! Every read and write round-trips through the file; there is no
//! in-memory copy and no locking. Updates rewrite the whole file.

use crate::error::{ChatbotError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const USERNAME: &str = "username";
pub const GAME_IN_CONTEXT: &str = "game_in_context";

/// Placeholder tokens in corpus answers and the preference they resolve to.
pub const PLACEHOLDERS: &[(&str, &str)] = &[("@username", USERNAME), ("@game", GAME_IN_CONTEXT)];

/// On-disk form: one flat JSON object of string values.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct Preferences {
    values: BTreeMap<String, String>,
}

/// File-backed key/value preference store.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value for `key`, or an empty string when unset.
    pub fn get(&self, key: &str) -> Result<String> {
        Ok(self.load()?.values.remove(key).unwrap_or_default())
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut prefs = self.load()?;
        prefs.values.insert(key.to_string(), value.to_string());
        debug!("Preference {} = {:?}", key, value);
        self.save(&prefs)
    }

    /// Reset every value to an empty string; keys are kept.
    pub fn clear_all(&self) -> Result<()> {
        let mut prefs = self.load()?;
        prefs.values.values_mut().for_each(String::clear);
        self.save(&prefs)
    }

    /// Reset every value except `protected_key`.
    pub fn clear_all_except(&self, protected_key: &str) -> Result<()> {
        let mut prefs = self.load()?;
        prefs
            .values
            .iter_mut()
            .filter(|(k, _)| k.as_str() != protected_key)
            .for_each(|(_, v)| v.clear());
        self.save(&prefs)
    }

    /// Replace every placeholder token in `text` with its live preference value.
    pub fn substitute(&self, text: &str) -> Result<String> {
        if !PLACEHOLDERS.iter().any(|(token, _)| text.contains(token)) {
            return Ok(text.to_string());
        }
        let prefs = self.load()?;
        let mut out = text.to_string();
        for (token, key) in PLACEHOLDERS {
            if out.contains(token) {
                let value = prefs.values.get(*key).map(String::as_str).unwrap_or_default();
                out = out.replace(token, value);
            }
        }
        Ok(out)
    }

    fn load(&self) -> Result<Preferences> {
        match fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Preferences::default()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Preferences::default()),
            Err(e) => Err(ChatbotError::PreferenceRead {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        let write_err = |e: io::Error| ChatbotError::PreferenceWrite {
            path: self.path.clone(),
            source: e,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let json = serde_json::to_string(prefs)?;
        fs::write(&self.path, json).map_err(write_err)
    }
}
