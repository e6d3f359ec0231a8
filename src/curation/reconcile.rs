//! Reconcile model claims against the canonical item pool.
//!
//! Every claimed name is mapped back to exactly one pool entry or dropped:
//!
//! 1. exact match on the trimmed, lowercased name
//! 2. exact match after dropping a trailing ` (…)` clause
//! 3. substring scan over the pool in its original order: first a pool name
//!    contained in the claim, then the claim contained in a pool name
//!
//! A canonical item backs at most one claim across the whole response. Later
//! claims for an already-taken item are dropped as duplicates. Drops never
//! fail the run; they are reported as [`ValidationWarning`]s.

use std::collections::{HashMap, HashSet};
use std::fmt;

use log::warn;

use crate::curation::types::{CuratorClaim, CuratorResponse, CuratorSelection, MagicItemRecord};
use crate::logutil::escape_log;

/// A claim dropped during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// The claimed name matches nothing in the pool.
    Hallucinated { character: String, raw_name: String },
    /// The item was already claimed earlier in the response.
    Duplicate {
        character: String,
        raw_name: String,
        canonical: String,
    },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationWarning::Hallucinated { character, raw_name } => {
                write!(f, "curator hallucinated '{}' for {}", raw_name, character)
            }
            ValidationWarning::Duplicate {
                character,
                raw_name,
                canonical,
            } => write!(
                f,
                "curator duplicated '{}' (as '{}') for {}",
                canonical, raw_name, character
            ),
        }
    }
}

/// Curator output whose every claim names a distinct canonical pool item.
///
/// Only [`reconcile`] builds one, so shop entries can only be assembled from
/// validated data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledResponse {
    selections: Vec<CuratorSelection>,
}

impl ReconciledResponse {
    pub fn selections(&self) -> &[CuratorSelection] {
        &self.selections
    }

    /// Total surviving claims across all characters.
    pub fn claim_count(&self) -> usize {
        self.selections.iter().map(|s| s.claims.len()).sum()
    }

    /// Surviving claims per character name, in selection order.
    pub fn counts_by_character(&self) -> Vec<(&str, usize)> {
        self.selections
            .iter()
            .map(|s| (s.character.as_str(), s.claims.len()))
            .collect()
    }
}

/// Result of reconciling one response.
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    pub response: ReconciledResponse,
    pub warnings: Vec<ValidationWarning>,
}

/// Lookup over a pool: a map for exact hits plus the pool order for scans.
pub struct PoolIndex<'a> {
    items: &'a [MagicItemRecord],
    lowered: Vec<String>,
    by_name: HashMap<String, usize>,
}

impl<'a> PoolIndex<'a> {
    pub fn new(items: &'a [MagicItemRecord]) -> Self {
        let lowered: Vec<String> = items.iter().map(|i| i.name.trim().to_lowercase()).collect();
        let mut by_name = HashMap::with_capacity(lowered.len());
        for (idx, name) in lowered.iter().enumerate() {
            // first occurrence wins so the map agrees with the ordered scan
            by_name.entry(name.clone()).or_insert(idx);
        }
        Self {
            items,
            lowered,
            by_name,
        }
    }

    pub fn item(&self, idx: usize) -> &'a MagicItemRecord {
        &self.items[idx]
    }

    /// Resolve a claimed name to a pool index.
    pub fn resolve(&self, claimed: &str) -> Option<usize> {
        let name = claimed.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }

        if let Some(&idx) = self.by_name.get(&name) {
            return Some(idx);
        }

        if let Some(idx) = name.find(" (").filter(|&i| i > 0) {
            let stripped = name[..idx].trim();
            if let Some(&idx) = self.by_name.get(stripped) {
                return Some(idx);
            }
        }

        self.lowered
            .iter()
            .position(|pool_name| !pool_name.is_empty() && name.contains(pool_name.as_str()))
            .or_else(|| {
                self.lowered
                    .iter()
                    .position(|pool_name| pool_name.contains(name.as_str()))
            })
    }
}

/// Validate `response` against `pool`, dropping hallucinated and duplicate
/// claims and rewriting accepted names to their canonical casing.
pub fn reconcile(response: CuratorResponse, pool: &[MagicItemRecord]) -> ReconcileReport {
    let index = PoolIndex::new(pool);
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut warnings = Vec::new();
    let mut selections = Vec::with_capacity(response.selections.len());

    for selection in response.selections {
        let character = selection.character;
        let mut accepted = Vec::with_capacity(selection.claims.len());

        for claim in selection.claims {
            let Some(idx) = index.resolve(&claim.raw_name) else {
                warnings.push(ValidationWarning::Hallucinated {
                    character: character.clone(),
                    raw_name: claim.raw_name,
                });
                continue;
            };

            let canonical = &index.item(idx).name;
            if !claimed.insert(idx) {
                warnings.push(ValidationWarning::Duplicate {
                    character: character.clone(),
                    raw_name: claim.raw_name,
                    canonical: canonical.clone(),
                });
                continue;
            }

            accepted.push(CuratorClaim {
                raw_name: canonical.clone(),
                reason: claim.reason,
            });
        }

        selections.push(CuratorSelection {
            character,
            claims: accepted,
        });
    }

    for warning in &warnings {
        warn!("dropping curator claim: {}", escape_log(&warning.to_string()));
    }

    ReconcileReport {
        response: ReconciledResponse { selections },
        warnings,
    }
}
