//! Command-line options and runtime configuration.

use crate::error::{ChatbotError, Result};
use crate::repair::ConfidenceTiers;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Default data directory, relative to the working directory
const DATA_DIR: &str = "data";

/// Data directory name under the platform data dir
const APP_DIR: &str = "gamebox";

/// Preference file name inside the data directory
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Parser)]
#[command(name = "gamebox", version, about = "Gamebox store chatbot")]
pub struct Cli {
    /// Directory holding the CSV corpora and the preference file
    #[arg(long, env = "GAMEBOX_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Preference file (defaults to <data-dir>/preferences.json)
    #[arg(long)]
    pub preferences: Option<PathBuf>,

    /// Disable coloured speaker names
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Explicit flag, then `./data`, then the platform data directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return existing(dir);
        }
        let local = PathBuf::from(DATA_DIR);
        if local.is_dir() {
            return Ok(local);
        }
        match dirs::data_dir() {
            Some(base) => existing(&base.join(APP_DIR)),
            None => Err(ChatbotError::NoDataDir(DATA_DIR.to_string())),
        }
    }

    pub fn into_config(self) -> Result<ChatbotConfig> {
        let data_dir = self.resolve_data_dir()?;
        let preferences_path = self
            .preferences
            .unwrap_or_else(|| data_dir.join(PREFERENCES_FILE));
        Ok(ChatbotConfig {
            data_dir,
            preferences_path,
            ..ChatbotConfig::default()
        })
    }
}

fn existing(dir: &Path) -> Result<PathBuf> {
    if dir.is_dir() {
        Ok(dir.to_path_buf())
    } else {
        Err(ChatbotError::NoDataDir(dir.display().to_string()))
    }
}

/// Runtime settings shared by every handler.
#[derive(Debug, Clone)]
pub struct ChatbotConfig {
    pub bot_name: String,
    pub store_name: String,
    pub user_label: String,
    pub data_dir: PathBuf,
    pub preferences_path: PathBuf,
    /// Threshold for intent and FAQ matching
    pub similarity_threshold: f64,
    /// Threshold for genre/platform keyword matching
    pub keyword_threshold: f64,
    /// Tiers for game-name resolution
    pub tiers: ConfidenceTiers,
    /// Maximum games listed by a search
    pub max_search_results: usize,
}

impl Default for ChatbotConfig {
    fn default() -> Self {
        Self {
            bot_name: "Beetle Juice".to_string(),
            store_name: "Gamebox".to_string(),
            user_label: "You".to_string(),
            data_dir: PathBuf::from(DATA_DIR),
            preferences_path: PathBuf::from(DATA_DIR).join(PREFERENCES_FILE),
            similarity_threshold: 0.65,
            keyword_threshold: 0.6,
            tiers: ConfidenceTiers::default(),
            max_search_results: 5,
        }
    }
}
