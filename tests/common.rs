//! Test utilities & fixtures.
//! Scripted model doubles plus a temp data directory laid out like `data/`.
#![allow(dead_code)] // each test binary uses a different subset

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shopkeep::config::{Config, CuratorConfig, StorageConfig};
use shopkeep::curation::Curator;
use shopkeep::model::{ChatModel, ChatRequest, ModelError};
use shopkeep::storage::Storage;

/// Replies with the same canned text on every call.
#[derive(Clone)]
pub struct ScriptedModel {
    reply: String,
    calls: Arc<AtomicUsize>,
}

impl ScriptedModel {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Reply with `value` rendered as JSON.
    pub fn json(value: Value) -> Self {
        Self::new(value.to_string())
    }

    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn chat(&self, _request: ChatRequest) -> Result<String, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.reply.clone())
    }
}

/// Always fails at the transport level.
pub struct FailingModel;

#[async_trait]
impl ChatModel for FailingModel {
    async fn chat(&self, _request: ChatRequest) -> Result<String, ModelError> {
        Err(ModelError::Request("connection refused".to_string()))
    }
}

/// Sleeps before answering, for exercising the call timeout.
pub struct SlowModel {
    pub delay: Duration,
}

#[async_trait]
impl ChatModel for SlowModel {
    async fn chat(&self, _request: ChatRequest) -> Result<String, ModelError> {
        tokio::time::sleep(self.delay).await;
        Ok(r#"{"selections":[]}"#.to_string())
    }
}

/// A temp data directory with one item family file and a characters folder.
pub struct ShopFixture {
    pub dir: tempfile::TempDir,
    pub storage: StorageConfig,
}

impl ShopFixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut storage = Config::default().storage;
        storage.data_dir = dir.path().to_string_lossy().to_string();
        storage.magic_item_files = vec!["magic_items/wondrous.json".to_string()];
        std::fs::create_dir_all(dir.path().join("magic_items")).unwrap();
        std::fs::create_dir_all(storage.characters_path()).unwrap();
        let fixture = Self { dir, storage };
        fixture.write_items(Value::Array(Vec::new()));
        fixture
    }

    /// Replace the item family file with `items` (a JSON array).
    pub fn write_items(&self, items: Value) {
        let body = serde_json::json!({ "items": items });
        std::fs::write(&self.storage.magic_item_paths()[0], body.to_string()).unwrap();
    }

    pub fn write_character(&self, file_name: &str, profile: Value) {
        let path = self.storage.characters_path().join(file_name);
        std::fs::write(path, profile.to_string()).unwrap();
    }

    pub fn specials_path(&self) -> PathBuf {
        self.storage.session_specials_path()
    }

    pub fn storage(&self) -> Storage {
        Storage::new(&self.storage)
    }

    pub fn curator<M: ChatModel>(&self, model: M) -> Curator<M> {
        self.curator_with(model, CuratorConfig::default())
    }

    pub fn curator_with<M: ChatModel>(&self, model: M, settings: CuratorConfig) -> Curator<M> {
        Curator::new(model, self.storage(), settings)
    }
}

pub fn cloak() -> Value {
    serde_json::json!({
        "name": "Cloak of Elvenkind",
        "type": "Wondrous item",
        "rarity": "Uncommon",
        "attunement": "requires attunement",
        "description": "While you wear this cloak with its hood up, you are hard to spot."
    })
}

pub fn character(name: &str, class_level: &str) -> Value {
    serde_json::json!({
        "name": name,
        "class_level": class_level,
        "backstory_summary": format!("{} left home to find fortune.", name),
        "current_inventory": ["Rope", "Torch"]
    })
}

pub fn picks(selections: &[(&str, &[&str])]) -> Value {
    let selections: Vec<Value> = selections
        .iter()
        .map(|(character, names)| {
            let items: Vec<Value> = names
                .iter()
                .map(|n| serde_json::json!({ "name": n, "reason": "fits the build" }))
                .collect();
            serde_json::json!({ "character": character, "items": items })
        })
        .collect();
    serde_json::json!({ "selections": selections })
}
