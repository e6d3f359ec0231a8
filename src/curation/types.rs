//! Data model for the curation pipeline.
//!
//! Trusted records (`MagicItemRecord`, `CharacterProfile`, `ShopEntry`) come from
//! or go to storage. The `Curator*` types mirror the JSON the model is asked to
//! produce and are untrusted until they pass through
//! [`reconcile`](crate::curation::reconcile::reconcile).

use serde::{Deserialize, Deserializer, Serialize};

/// Category stamped on every curated shop entry.
pub const SPECIALS_CATEGORY: &str = "specials";

/// A single entry from the magic item library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MagicItemRecord {
    pub name: String,
    /// Item family/type line, e.g. "Weapon (longsword)" or "Wondrous Item".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub rarity: String,
    #[serde(rename = "attunement", default, skip_serializing_if = "Option::is_none")]
    pub attunement_note: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl MagicItemRecord {
    pub fn new(name: &str, rarity: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: None,
            rarity: rarity.to_string(),
            attunement_note: None,
            description: description.to_string(),
        }
    }

    pub fn with_attunement(mut self, note: &str) -> Self {
        self.attunement_note = Some(note.to_string());
        self
    }
}

/// A player character as stored in the characters directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterProfile {
    pub name: String,
    /// Free text such as "Level 5 Paladin".
    /// See [`parse_level`](crate::curation::level::parse_level).
    pub class_level: String,
    #[serde(rename = "backstory_summary", alias = "backstory", default)]
    pub backstory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playstyle: Option<String>,
    #[serde(rename = "current_inventory", alias = "inventory", default)]
    pub inventory: Vec<String>,
}

impl CharacterProfile {
    pub fn new(name: &str, class_level: &str, backstory: &str) -> Self {
        Self {
            name: name.to_string(),
            class_level: class_level.to_string(),
            backstory: backstory.to_string(),
            playstyle: None,
            inventory: Vec::new(),
        }
    }

    pub fn with_playstyle(mut self, playstyle: &str) -> Self {
        self.playstyle = Some(playstyle.to_string());
        self
    }

    pub fn with_item(mut self, item: &str) -> Self {
        self.inventory.push(item.to_string());
        self
    }
}

/// Missing and `null` model fields both read as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One item the model claims to have picked. Untrusted.
///
/// A missing or null name reads as empty and is rejected during reconciliation,
/// not while parsing, so one bad claim never sinks its siblings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratorClaim {
    #[serde(rename = "name", default, deserialize_with = "null_as_default")]
    pub raw_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub reason: String,
}

/// The model's picks for one character. Untrusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratorSelection {
    #[serde(default, deserialize_with = "null_as_default")]
    pub character: String,
    #[serde(rename = "items", default, deserialize_with = "null_as_default")]
    pub claims: Vec<CuratorClaim>,
}

/// Top-level parse target for the model's JSON answer. Untrusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CuratorResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub selections: Vec<CuratorSelection>,
}

/// A priced item in the persisted session specials artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopEntry {
    pub name: String,
    pub cost: u32,
    pub rarity: String,
    pub description: String,
    pub category: String,
}
