//! Flat-file JSON conversation store.
//!
//! The whole store lives in one JSON file shaped like the original
//! `{"conversations": {id: {...}}}` layout. Every mutating call rewrites the
//! file atomically (tmp file + fsync + rename) before returning, so a crash
//! never leaves a half-written store, and a successfully returned mutation
//! is durable. One async mutex guards the state: appends for a conversation
//! id can never interleave.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tandem_application::ports::conversation_store::{ConversationStore, StoreError};
use tandem_domain::{
    Conversation, ConversationId, ConversationSummary, Idea, MediaAsset, Message, Role, Settings,
    SynergyPrompt,
};
use tokio::sync::Mutex;
use tracing::warn;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    conversations: BTreeMap<String, Conversation>,
}

/// File-backed conversation store, durable on every write
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<StoreState>,
}

impl JsonFileStore {
    /// Open the store, loading existing state from `path`.
    ///
    /// An unreadable or corrupt file is not fatal: the store starts fresh
    /// after logging a warning, matching the original's tolerant load.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(state) => state,
                Err(e) => {
                    warn!("Store file {} invalid, starting fresh: {}", path.display(), e);
                    StoreState::default()
                }
            },
            Err(_) => StoreState::default(),
        };
        Self {
            path,
            state: Mutex::new(state),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Flush the full state to disk: tmp write, fsync, atomic rename.
    fn persist(&self, state: &StoreState) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| StoreError::Storage(e.to_string()))?;
        }

        let serialized = serde_json::to_string_pretty(state)
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StoreError::Storage("store path has no file name".to_string()))?;
        let tmp_path = self
            .path
            .with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));

        {
            use std::io::Write;
            let mut tmp = fs::File::create(&tmp_path)
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            tmp.write_all(serialized.as_bytes())
                .map_err(|e| StoreError::Storage(e.to_string()))?;
            tmp.sync_all().map_err(|e| StoreError::Storage(e.to_string()))?;
        }

        fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Storage(e.to_string()))
    }
}

#[async_trait]
impl ConversationStore for JsonFileStore {
    async fn create(
        &self,
        idea: &Idea,
        primary_name: &str,
        secondary_name: &str,
    ) -> Result<Conversation, StoreError> {
        let mut state = self.state.lock().await;
        let id = ConversationId::generate();
        let prompt = SynergyPrompt::seed_system(primary_name, secondary_name, idea);
        let conversation = Conversation::new(id.clone(), prompt);
        state
            .conversations
            .insert(id.to_string(), conversation.clone());
        self.persist(&state)?;
        Ok(conversation)
    }

    async fn get(&self, id: &ConversationId) -> Result<Conversation, StoreError> {
        let state = self.state.lock().await;
        state
            .conversations
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn append_message(
        &self,
        id: &ConversationId,
        role: Role,
        content: &str,
        speaker: Option<&str>,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        let conversation = state
            .conversations
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        conversation.append(Message::new(role, content, speaker.map(str::to_string)));
        self.persist(&state)
    }

    async fn list_summaries(&self) -> Result<Vec<ConversationSummary>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .conversations
            .values()
            .map(|c| ConversationSummary {
                id: c.id().clone(),
                name: c.name().to_string(),
            })
            .collect())
    }

    async fn delete(&self, id: &ConversationId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        let removed = state.conversations.remove(id.as_str()).is_some();
        if removed {
            self.persist(&state)?;
        }
        Ok(removed)
    }

    async fn update_settings(
        &self,
        id: &ConversationId,
        partial: Settings,
    ) -> Result<Settings, StoreError> {
        let mut state = self.state.lock().await;
        let conversation = state
            .conversations
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let merged = conversation.merge_settings(partial).clone();
        self.persist(&state)?;
        Ok(merged)
    }

    async fn add_media(
        &self,
        id: &ConversationId,
        prompt: &str,
        url: &str,
    ) -> Result<MediaAsset, StoreError> {
        let mut state = self.state.lock().await;
        let conversation = state
            .conversations
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let asset = MediaAsset::new(prompt, url);
        conversation.add_media(asset.clone());
        self.persist(&state)?;
        Ok(asset)
    }
}
