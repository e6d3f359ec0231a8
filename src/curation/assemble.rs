//! Turn reconciled picks into priced shop entries.

use rand::Rng;

use crate::curation::pricing::{normalize_rarity, roll_price_for_item};
use crate::curation::reconcile::{PoolIndex, ReconciledResponse};
use crate::curation::types::{MagicItemRecord, ShopEntry, SPECIALS_CATEGORY};

/// Build one shop entry per surviving claim, in selection order.
///
/// Each entry takes its price from the item's tier, its rarity display from
/// the normalized rarity (plus attunement note), and its description from the
/// curator's reason followed by the item text.
pub fn assemble<R: Rng + ?Sized>(
    reconciled: &ReconciledResponse,
    pool: &[MagicItemRecord],
    rng: &mut R,
) -> Vec<ShopEntry> {
    let index = PoolIndex::new(pool);
    let mut entries = Vec::with_capacity(reconciled.claim_count());

    for selection in reconciled.selections() {
        for claim in &selection.claims {
            // reconciled names are canonical, so this is an exact hit
            let Some(idx) = index.resolve(&claim.raw_name) else {
                continue;
            };
            let item = index.item(idx);
            entries.push(ShopEntry {
                name: item.name.clone(),
                cost: roll_price_for_item(item, rng),
                rarity: rarity_display(item),
                description: format!(
                    "Recommended for {}: {} | {}",
                    selection.character, claim.reason, item.description
                ),
                category: SPECIALS_CATEGORY.to_string(),
            });
        }
    }

    entries
}

fn rarity_display(item: &MagicItemRecord) -> String {
    let rarity = normalize_rarity(&item.rarity);
    match item.attunement_note.as_deref().map(str::trim) {
        Some(note) if !note.is_empty() => format!("{}, {}", rarity, note),
        _ => rarity,
    }
}
