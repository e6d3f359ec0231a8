//! Curation run orchestration.
//!
//! One run is strictly sequential:
//!
//! ```text
//! load pool → load party → filter → prompt → model → extract
//!           → reconcile → price → assemble → persist
//! ```
//!
//! Every fatal error returns before [`Storage::write_session_specials`] is
//! reached, so the previous artifact stays in place.

use log::{debug, info, warn};
use std::time::Duration;

use crate::config::CuratorConfig;
use crate::curation::assemble::assemble;
use crate::curation::errors::CurationError;
use crate::curation::extract::extract_json;
use crate::curation::level::{filter_by_level, party_level};
use crate::curation::prompt::{build_prompt, curator_system_prompt};
use crate::curation::reconcile::{reconcile, ValidationWarning};
use crate::curation::types::{CuratorResponse, ShopEntry};
use crate::logutil::response_preview;
use crate::model::{ChatModel, ChatRequest, ModelError};
use crate::storage::Storage;

/// Summary of a successful curation run.
#[derive(Debug, Clone)]
pub struct CurationOutcome {
    /// The entries that were persisted, in selection order.
    pub entries: Vec<ShopEntry>,
    /// Claims dropped during reconciliation.
    pub warnings: Vec<ValidationWarning>,
    pub party_level: u8,
    /// Size of the filtered pool offered to the model.
    pub eligible_items: usize,
}

pub struct Curator<M: ChatModel> {
    model: M,
    storage: Storage,
    settings: CuratorConfig,
}

impl<M: ChatModel> Curator<M> {
    pub fn new(model: M, storage: Storage, settings: CuratorConfig) -> Self {
        Self {
            model,
            storage,
            settings,
        }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    fn timeout(&self) -> Duration {
        self.settings.timeout()
    }

    fn chat_request(&self, system: String, user: String) -> ChatRequest {
        let mut request = ChatRequest::new(system, user);
        if self.settings.context_length > 0 {
            request = request.with_option("num_ctx", self.settings.context_length);
        }
        if let Some(temperature) = self.settings.temperature {
            request = request.with_option("temperature", temperature as f64);
        }
        request
    }

    /// Execute one full curation run and replace the session specials.
    pub async fn refresh_session_specials(&self) -> Result<CurationOutcome, CurationError> {
        let pool = self.storage.load_magic_items().await?;
        let characters = self.storage.load_characters().await?;
        if characters.is_empty() {
            return Err(CurationError::NoCharacters);
        }

        let level = party_level(&characters);
        let eligible = filter_by_level(&pool, level);
        info!(
            "Curating specials for {} characters at party level {} ({} of {} items eligible)",
            characters.len(),
            level,
            eligible.len(),
            pool.len()
        );
        if eligible.is_empty() {
            return Err(CurationError::EmptyPool { party_level: level });
        }

        let picks = self.settings.items_per_character;
        let request = self.chat_request(
            curator_system_prompt(picks),
            build_prompt(&characters, &eligible, picks),
        );
        debug!("Curator prompt is {} chars", request.user.chars().count());

        let limit = self.timeout();
        let raw = match tokio::time::timeout(limit, self.model.chat(request)).await {
            Ok(reply) => reply?,
            Err(_) => {
                warn!("Curator model did not answer within {:?}", limit);
                return Err(ModelError::Timeout(limit).into());
            }
        };
        debug!("Curator response {}", response_preview(&raw));

        let document = extract_json(&raw)?;
        let response: CuratorResponse =
            serde_json::from_value(document.clone()).map_err(|e| CurationError::Schema {
                reason: e.to_string(),
                json: document.to_string(),
            })?;

        let report = reconcile(response, &eligible);
        if !report.warnings.is_empty() {
            warn!("Dropped {} curator claims during reconciliation", report.warnings.len());
        }

        let entries = assemble(&report.response, &eligible, &mut rand::thread_rng());
        self.storage.write_session_specials(&entries).await?;

        for (character, count) in report.response.counts_by_character() {
            info!("{} receives {} session specials", character, count);
        }

        Ok(CurationOutcome {
            entries,
            warnings: report.warnings,
            party_level: level,
            eligible_items: eligible.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct Recording {
        reply: String,
        seen: Mutex<Vec<ChatRequest>>,
    }

    #[async_trait]
    impl ChatModel for Recording {
        async fn chat(&self, request: ChatRequest) -> Result<String, ModelError> {
            self.seen.lock().unwrap().push(request);
            Ok(self.reply.clone())
        }
    }

    fn write(path: &std::path::Path, body: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, body).unwrap();
    }

    fn seeded(dir: &std::path::Path) -> Storage {
        let mut storage = Config::default().storage;
        storage.data_dir = dir.to_string_lossy().to_string();
        storage.magic_item_files = vec!["magic_items/wondrous.json".to_string()];
        write(
            &storage.magic_item_paths()[0],
            r#"{"items":[
                {"name":"Cloak of Elvenkind","rarity":"Uncommon",
                 "attunement":"requires attunement","description":"Hood up, hard to see."},
                {"name":"Staff of the Magi","rarity":"Legendary","description":"Big staff."}
            ]}"#,
        );
        write(
            &storage.characters_path().join("tim.json"),
            r#"{"name":"Tim","class_level":"Level 5 Rogue","backstory_summary":"Sneaky."}"#,
        );
        Storage::new(&storage)
    }

    #[tokio::test]
    async fn run_sends_options_and_offers_only_eligible_items() {
        let tmp = tempfile::tempdir().unwrap();
        let model = Recording {
            reply: serde_json::json!({
                "selections": [{
                    "character": "Tim",
                    "items": [{ "name": "Cloak of Elvenkind", "reason": "stealth" }]
                }]
            })
            .to_string(),
            seen: Mutex::new(Vec::new()),
        };
        let curator = Curator::new(model, seeded(tmp.path()), CuratorConfig::default());

        let outcome = curator.refresh_session_specials().await.unwrap();
        assert_eq!(outcome.party_level, 5);
        assert_eq!(outcome.eligible_items, 1);
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].rarity, "Uncommon, requires attunement");

        let seen = curator.model.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].options["num_ctx"], serde_json::Value::from(8192));
        assert!(!seen[0].user.contains("Staff of the Magi"));
    }

    #[tokio::test]
    async fn wrong_shape_is_a_schema_error() {
        let tmp = tempfile::tempdir().unwrap();
        let model = Recording {
            reply: r#"{"selections":"lots"}"#.to_string(),
            seen: Mutex::new(Vec::new()),
        };
        let curator = Curator::new(model, seeded(tmp.path()), CuratorConfig::default());

        let err = curator.refresh_session_specials().await.unwrap_err();
        assert!(matches!(err, CurationError::Schema { .. }));
        assert_eq!(err.raw_response(), Some(r#"{"selections":"lots"}"#));
        assert!(!curator.storage().session_specials_path().exists());
    }
}
