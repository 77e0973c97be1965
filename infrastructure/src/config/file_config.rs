//! Configuration file schema

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration, merged from defaults and TOML files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub providers: FileProvidersConfig,
    pub store: FileStoreConfig,
    pub scaffold: FileScaffoldConfig,
}

/// The two providers of a synergy pair
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub primary: FileProviderConfig,
    pub secondary: FileProviderConfig,
}

impl Default for FileProvidersConfig {
    fn default() -> Self {
        Self {
            primary: FileProviderConfig {
                name: "Grok (primary)".to_string(),
                model: "grok-2-latest".to_string(),
                base_url: "https://api.x.ai/v1".to_string(),
                api_key_env: "GROK_API_KEY".to_string(),
                temperature: 0.7,
            },
            secondary: FileProviderConfig {
                name: "ChatGPT (gpt-3.5-turbo)".to_string(),
                model: "gpt-3.5-turbo".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                api_key_env: "OPENAI_API_KEY".to_string(),
                temperature: 0.7,
            },
        }
    }
}

/// One provider endpoint; the API key is read from the named env var
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileProviderConfig {
    pub name: String,
    pub model: String,
    pub base_url: String,
    pub api_key_env: String,
    pub temperature: f64,
}

/// Where the conversation store file lives
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStoreConfig {
    pub path: Option<PathBuf>,
}

impl FileStoreConfig {
    /// Explicit path, or the platform data dir, or the working directory
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return path.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("tandem").join("conversations.json"))
            .unwrap_or_else(|| PathBuf::from("conversations.json"))
    }
}

/// Where scaffolded project files are written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScaffoldConfig {
    pub projects_dir: Option<PathBuf>,
}

impl FileScaffoldConfig {
    pub fn resolved_projects_dir(&self) -> PathBuf {
        if let Some(dir) = &self.projects_dir {
            return dir.clone();
        }
        dirs::data_dir()
            .map(|d| d.join("tandem").join("projects"))
            .unwrap_or_else(|| PathBuf::from("projects"))
    }
}
