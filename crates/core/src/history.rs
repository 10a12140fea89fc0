use std::{
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use tokio::fs;
use uuid::Uuid;

use crate::{error::HistoryError, style::StyleProfile, types::HistoryItem};

pub const HISTORY_CAPACITY: usize = 9;

pub fn get_root_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("dooze")
}

pub fn get_history_path() -> PathBuf {
    get_root_data_dir().join("history.json")
}

impl HistoryItem {
    pub fn new(
        video_name: impl Into<String>,
        prompt: impl Into<String>,
        style: StyleProfile,
    ) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp,
            video_name: video_name.into(),
            prompt: prompt.into(),
            style,
        }
    }
}

/// Newest-first list of saved prompts backed by a JSON file.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    items: Vec<HistoryItem>,
}

impl HistoryStore {
    /// Load the history file. Missing or corrupt files yield an empty history.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match fs::read_to_string(&path).await {
            Ok(json) => serde_json::from_str(&json).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable history");
                Vec::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read history");
                Vec::new()
            }
        };
        Self { path, items }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn items(&self) -> &[HistoryItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&HistoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Insert at the front, evicting the oldest entries beyond capacity.
    pub fn push(&mut self, item: HistoryItem) {
        self.items.insert(0, item);
        self.items.truncate(HISTORY_CAPACITY);
    }

    pub async fn save(&self) -> Result<(), HistoryError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let pretty_json = serde_json::to_string_pretty(&self.items)?;
        fs::write(&self.path, pretty_json).await?;
        Ok(())
    }

    pub async fn clear(&mut self) -> Result<(), HistoryError> {
        self.items.clear();
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
