//! # Shopkeep - Session Specials Curation for Tabletop Shops
//!
//! Shopkeep curates a rotating list of "session special" magic items for a
//! tabletop party. A language model acting as the shop's quartermaster picks
//! items for each character; every pick is checked against the item library
//! before it is priced and written as shop data.
//!
//! ## Features
//!
//! - **Level-Aware Pool**: Items are offered only when the weakest party member is high enough level for their rarity.
//! - **Tolerant Extraction**: JSON is recovered from raw replies, fenced code blocks, or prose.
//! - **Verified Picks**: Claimed names are reconciled to canonical library names; hallucinated and duplicate picks are dropped.
//! - **Rarity Pricing**: Prices are rolled from rarity tiers, with cheaper tiers for consumables, and rounded to shop-friendly values.
//! - **Atomic Persistence**: The specials artifact is replaced in one step or not at all.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shopkeep::config::Config;
//! use shopkeep::curation::Curator;
//! use shopkeep::model::ollama::OllamaClient;
//! use shopkeep::storage::Storage;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let model = OllamaClient::from_config(&config.curator);
//!     let curator = Curator::new(model, Storage::new(&config.storage), config.curator.clone());
//!
//!     let outcome = curator.refresh_session_specials().await?;
//!     println!("{} specials at party level {}", outcome.entries.len(), outcome.party_level);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`curation`] - The curation pipeline and its stages
//! - [`model`] - Language model port and the Ollama client
//! - [`storage`] - Item library, character and specials files
//! - [`config`] - Configuration management and validation
//! - [`logutil`] - Log-safe rendering of model output
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │    Curator      │ ← Run orchestration
//! └─────────────────┘
//!     │         │
//! ┌────────┐ ┌─────────┐
//! │ Model  │ │ Storage │ ← Model port / data files
//! └────────┘ └─────────┘
//! ```

pub mod config;
pub mod curation;
pub mod logutil;
pub mod model;
pub mod storage;
