//! Rarity price tables and randomized price rolls.
//!
//! Two static tables map a rarity label to an inclusive gold piece range. Items
//! whose name marks them as single-use (potions, scrolls, oils…) roll on the
//! cheaper consumable table even when their formal rarity is the same.
//!
//! Rolled prices are rounded to "shop friendly" values and then clamped back
//! into the tier, so a roll can never leave its range.

use rand::Rng;

use crate::curation::types::MagicItemRecord;

/// Inclusive price range for a rarity label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceTier {
    pub label: &'static str,
    pub min: u32,
    pub max: u32,
}

/// Standard magic item prices (DMG guidelines plus shop markup).
pub static PRICING_TABLE: [PriceTier; 6] = [
    PriceTier { label: "Common", min: 50, max: 100 },
    PriceTier { label: "Uncommon", min: 100, max: 500 },
    PriceTier { label: "Rare", min: 500, max: 5_000 },
    PriceTier { label: "Very Rare", min: 5_000, max: 50_000 },
    PriceTier { label: "Legendary", min: 50_000, max: 200_000 },
    PriceTier { label: "Artifact", min: 200_000, max: 500_000 },
];

/// Reduced prices for one-use items.
pub static CONSUMABLE_PRICING_TABLE: [PriceTier; 5] = [
    PriceTier { label: "Common", min: 25, max: 75 },
    PriceTier { label: "Uncommon", min: 75, max: 300 },
    PriceTier { label: "Rare", min: 300, max: 3_000 },
    PriceTier { label: "Very Rare", min: 3_000, max: 30_000 },
    PriceTier { label: "Legendary", min: 30_000, max: 100_000 },
];

/// Label that "Rarity Varies" items resolve to.
pub const VARIES_RARITY: &str = "Rare";

/// Index of the tier used when a label is not in a table (Uncommon).
const UNKNOWN_TIER_INDEX: usize = 1;

/// Name fragments marking single-use items.
const CONSUMABLE_TERMS: [&str; 6] = ["potion", "scroll", "ammunition", "oil", "elixir", "philter"];

/// Normalize a catalog rarity string to a table label.
///
/// - "Rarity Varies" (any case) becomes [`VARIES_RARITY`]
/// - compound rarities like "Uncommon (+1), Rare (+2)" keep only the first
///   segment with its parenthetical removed
pub fn normalize_rarity(rarity: &str) -> String {
    let rarity = rarity.trim();

    if rarity.to_lowercase().contains("varies") {
        return VARIES_RARITY.to_string();
    }

    if let Some((first, _)) = rarity.split_once(',') {
        let first = first.trim();
        let first = match first.find('(') {
            Some(idx) if idx > 0 => first[..idx].trim(),
            _ => first,
        };
        return first.to_string();
    }

    rarity.to_string()
}

fn lookup(table: &'static [PriceTier], rarity: &str) -> &'static PriceTier {
    let label = normalize_rarity(rarity);
    table
        .iter()
        .find(|tier| tier.label.eq_ignore_ascii_case(&label))
        .unwrap_or(&table[UNKNOWN_TIER_INDEX])
}

/// Standard tier for a rarity; unknown labels fall back to Uncommon.
pub fn price_tier(rarity: &str) -> &'static PriceTier {
    lookup(&PRICING_TABLE, rarity)
}

/// Consumable tier for a rarity; unknown labels (including Artifact) fall back to Uncommon.
pub fn consumable_price_tier(rarity: &str) -> &'static PriceTier {
    lookup(&CONSUMABLE_PRICING_TABLE, rarity)
}

/// Whether an item name denotes a single-use item.
pub fn is_consumable(name: &str) -> bool {
    let name = name.to_lowercase();
    CONSUMABLE_TERMS.iter().any(|term| name.contains(term))
}

/// The tier an item prices on: consumable table for single-use items, standard otherwise.
pub fn tier_for_item(item: &MagicItemRecord) -> &'static PriceTier {
    if is_consumable(&item.name) {
        consumable_price_tier(&item.rarity)
    } else {
        price_tier(&item.rarity)
    }
}

/// Round a price to a "nice" shop value. Halves round up.
pub fn round_to_nice_number(price: u32) -> u32 {
    let granularity = match price {
        0..=99 => 5,
        100..=999 => 25,
        1_000..=9_999 => 100,
        _ => 500,
    };
    ((price + granularity / 2) / granularity) * granularity
}

impl PriceTier {
    /// Roll with a pair of draws averaged, so prices bunch toward the middle of the range.
    pub fn roll_price<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.min == self.max {
            return self.min;
        }
        let first = rng.gen_range(self.min..=self.max);
        let second = rng.gen_range(self.min..=self.max);
        // u64 keeps the sum clear of overflow for the largest tiers
        let avg = ((first as u64 + second as u64) / 2) as u32;
        self.clamp(round_to_nice_number(avg))
    }

    /// Roll with a single uniform draw.
    pub fn roll_price_linear<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if self.min == self.max {
            return self.min;
        }
        let price = rng.gen_range(self.min..=self.max);
        self.clamp(round_to_nice_number(price))
    }

    pub fn contains(&self, price: u32) -> bool {
        (self.min..=self.max).contains(&price)
    }

    fn clamp(&self, price: u32) -> u32 {
        price.clamp(self.min, self.max)
    }
}

/// Roll a price for an item on the tier chosen by [`tier_for_item`].
pub fn roll_price_for_item<R: Rng + ?Sized>(item: &MagicItemRecord, rng: &mut R) -> u32 {
    tier_for_item(item).roll_price(rng)
}

/// Markdown rendering of both tables for the `pricing` command.
pub fn format_pricing_table() -> String {
    let mut out = String::new();
    out.push_str("**Magic Item Pricing Table**\n\n");
    push_table(&mut out, &PRICING_TABLE);
    out.push_str("\n**Consumable Pricing (Potions, Scrolls, Oils)**\n\n");
    push_table(&mut out, &CONSUMABLE_PRICING_TABLE);
    out
}

fn push_table(out: &mut String, table: &[PriceTier]) {
    out.push_str("| Rarity | Min GP | Max GP |\n");
    out.push_str("|--------|--------|--------|\n");
    for tier in table {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            tier.label,
            format_gold(tier.min),
            format_gold(tier.max)
        ));
    }
}

/// Thousands-separated gold amount, e.g. `50,000`.
pub fn format_gold(amount: u32) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
