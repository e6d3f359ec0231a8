//! # Storage Module - Catalog and Session Specials Persistence
//!
//! File-based storage for everything the curator reads and writes:
//!
//! ```text
//! data/
//! ├── magic_items/            ← item families, each {"items": [...]}
//! │   ├── weapons.json
//! │   └── ...
//! ├── characters/             ← one profile per *.json file
//! └── session_specials.json   ← curated output, replaced wholesale
//! ```
//!
//! Reads return fresh snapshots every call; nothing is cached between runs.
//! The session specials artifact is written atomically (temp file + rename
//! under an exclusive lock) so readers see either the previous list or the new
//! one, never a partial file.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use shopkeep::config::Config;
//! use shopkeep::storage::Storage;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load("config.toml").await?;
//!     let storage = Storage::new(&config.storage);
//!     let pool = storage.load_magic_items().await?;
//!     let party = storage.load_characters().await?;
//!     println!("{} items, {} characters", pool.len(), party.len());
//!     Ok(())
//! }
//! ```

use fs2::FileExt;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::config::StorageConfig;
use crate::curation::errors::CurationError;
use crate::curation::types::{CharacterProfile, MagicItemRecord, ShopEntry};

/// On-disk shape shared by item family files and the specials artifact.
#[derive(Debug, Serialize, Deserialize)]
struct ItemFile<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// File-backed access to the item library, characters and session specials.
#[derive(Debug, Clone)]
pub struct Storage {
    magic_item_paths: Vec<PathBuf>,
    characters_dir: PathBuf,
    session_specials_path: PathBuf,
}

impl Storage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            magic_item_paths: config.magic_item_paths(),
            characters_dir: config.characters_path(),
            session_specials_path: config.session_specials_path(),
        }
    }

    pub fn session_specials_path(&self) -> &Path {
        &self.session_specials_path
    }

    pub fn characters_dir(&self) -> &Path {
        &self.characters_dir
    }

    /// Read every item family file in configured order and flatten them.
    pub async fn load_magic_items(&self) -> Result<Vec<MagicItemRecord>, CurationError> {
        let mut all = Vec::new();
        for path in &self.magic_item_paths {
            let items: Vec<MagicItemRecord> = read_item_file(path).await?;
            debug!("Loaded {} magic items from {}", items.len(), path.display());
            all.extend(items);
        }
        Ok(all)
    }

    /// Read every `*.json` profile in the characters directory, ordered by file name.
    pub async fn load_characters(&self) -> Result<Vec<CharacterProfile>, CurationError> {
        let dir = &self.characters_dir;
        let mut entries = fs::read_dir(dir)
            .await
            .map_err(|e| CurationError::load(dir.display(), e))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CurationError::load(dir.display(), e))?
        {
            let path = entry.path();
            let is_json = path.extension().and_then(|e| e.to_str()) == Some("json");
            if is_json && path.is_file() {
                files.push(path);
            }
        }
        files.sort();

        let mut characters = Vec::with_capacity(files.len());
        for path in files {
            let content = fs::read_to_string(&path)
                .await
                .map_err(|e| CurationError::load(path.display(), e))?;
            let character: CharacterProfile = serde_json::from_str(&content)
                .map_err(|e| CurationError::load(path.display(), e))?;
            characters.push(character);
        }
        Ok(characters)
    }

    /// Current session specials; an absent artifact reads as empty.
    pub async fn load_session_specials(&self) -> Result<Vec<ShopEntry>, CurationError> {
        match fs::metadata(&self.session_specials_path).await {
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            _ => read_item_file(&self.session_specials_path).await,
        }
    }

    /// Replace the session specials artifact with `entries`.
    pub async fn write_session_specials(&self, entries: &[ShopEntry]) -> Result<(), CurationError> {
        let path = self.session_specials_path.clone();
        let content = serde_json::to_string_pretty(&ItemFile {
            items: entries.to_vec(),
        })
        .map_err(|e| CurationError::persist(path.display(), e))?;

        let target = path.clone();
        tokio::task::spawn_blocking(move || write_file_atomic(&target, &content))
            .await
            .map_err(|e| CurationError::persist(path.display(), e))?
            .map_err(|e| CurationError::persist(path.display(), e))?;

        info!("Wrote {} session specials to {}", entries.len(), path.display());
        Ok(())
    }
}

async fn read_item_file<T>(path: &Path) -> Result<Vec<T>, CurationError>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| CurationError::load(path.display(), e))?;
    let file: ItemFile<T> =
        serde_json::from_str(&content).map_err(|e| CurationError::load(path.display(), e))?;
    Ok(file.items)
}

/// Write `content` to `path` so the file is replaced in one step.
///
/// A sidecar `.lock` file holds an exclusive lock for the duration; the data
/// goes to a unique temp file in the same directory, is fsynced, then renamed
/// over the target.
fn write_file_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    use std::fs::{File, OpenOptions};
    use std::io::Write;

    let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir)?;
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("session_specials.json");

    // Step 1: exclusive lock on the sidecar
    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(dir.join(format!(".{}.lock", base)))?;
    lock_file.lock_exclusive()?;

    // Step 2: unique temp file next to the target
    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut tmp) => {
                if let Err(e) = tmp.write_all(content.as_bytes()).and_then(|_| tmp.sync_all()) {
                    let _ = std::fs::remove_file(&candidate);
                    return Err(e);
                }
                break candidate;
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
                continue;
            }
            Err(e) => return Err(e),
        }
    };

    // Step 3: swap in
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e);
    }

    // Step 4: persist the rename (best-effort)
    if let Ok(dir_file) = File::open(dir) {
        let _ = dir_file.sync_all();
    }

    let _ = lock_file.unlock();
    Ok(())
}

/// Render shop entries for display.
pub fn format_item_list(entries: &[ShopEntry]) -> String {
    if entries.is_empty() {
        return "No items found.".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!("• **{}** - {} gp\n", entry.name, entry.cost));
        if !entry.description.is_empty() {
            out.push_str(&format!("  *{}*\n", entry.description));
        }
    }
    out
}
