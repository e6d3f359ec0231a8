use thiserror::Error;

use crate::model::ModelError;

/// Fatal errors for a curation run. Any of these aborts the run before the
/// session specials artifact is touched.
#[derive(Debug, Error)]
pub enum CurationError {
    /// Item pool or character storage unreadable or malformed.
    #[error("failed to load {path}: {reason}")]
    Load { path: String, reason: String },

    /// The characters directory holds no profiles.
    #[error("no characters found")]
    NoCharacters,

    /// Nothing in the pool is eligible at the party level.
    #[error("no magic items eligible at party level {party_level}")]
    EmptyPool { party_level: u8 },

    /// Model call failed, timed out, or returned an unusable envelope.
    #[error("curator model call failed: {0}")]
    Generation(#[from] ModelError),

    /// No extraction strategy produced parseable JSON. Carries the raw text.
    #[error("could not extract valid JSON from curator response")]
    Extraction { raw: String },

    /// JSON was found but does not have the selections shape.
    #[error("curator response has unexpected shape: {reason}")]
    Schema { reason: String, json: String },

    /// Writing the session specials artifact failed.
    #[error("failed to write {path}: {reason}")]
    Persist { path: String, reason: String },
}

impl CurationError {
    pub(crate) fn load(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        CurationError::Load {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn persist(path: impl std::fmt::Display, reason: impl std::fmt::Display) -> Self {
        CurationError::Persist {
            path: path.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Raw model text kept for diagnostics, if this error carries any.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            CurationError::Extraction { raw } => Some(raw),
            CurationError::Schema { json, .. } => Some(json),
            _ => None,
        }
    }
}
