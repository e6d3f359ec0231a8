//! # Session Specials Curation
//!
//! Asks a language model to pick personalized magic items for the party and
//! verifies every pick against the item library before it becomes shop data.
//!
//! ## Modules
//!
//! - [`level`] - party level and rarity eligibility
//! - [`prompt`] - curator directive and user message rendering
//! - [`extract`] - locating JSON in free-form model output
//! - [`reconcile`] - mapping claimed names to canonical pool entries
//! - [`pricing`] - rarity price tables and rolls
//! - [`assemble`] - building priced shop entries
//! - [`curator`] - end-to-end run

pub mod assemble;
pub mod curator;
pub mod errors;
pub mod extract;
pub mod level;
pub mod pricing;
pub mod prompt;
pub mod reconcile;
pub mod types;

pub use curator::{CurationOutcome, Curator};
pub use errors::CurationError;
pub use reconcile::{ReconcileReport, ReconciledResponse, ValidationWarning};
pub use types::{
    CharacterProfile, CuratorClaim, CuratorResponse, CuratorSelection, MagicItemRecord, ShopEntry,
};
