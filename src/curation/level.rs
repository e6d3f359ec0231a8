//! Party level parsing and rarity eligibility.
//!
//! A party is as constrained as its weakest member: the lowest parsed level
//! across all characters decides which rarities may be offered.

use crate::curation::pricing::normalize_rarity;
use crate::curation::types::{CharacterProfile, MagicItemRecord};

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 20;

/// Minimum party level per normalized rarity label. Monotonic in rarity.
const RARITY_MIN_LEVELS: [(&str, u8); 6] = [
    ("Common", 1),
    ("Uncommon", 1),
    ("Rare", 5),
    ("Very Rare", 11),
    ("Legendary", 17),
    ("Artifact", 17),
];

/// Threshold applied to labels not in the policy table.
const UNKNOWN_RARITY_MIN_LEVEL: u8 = 5;

/// Class names whose trailing number counts toward a multiclass total.
const CLASS_WORDS: [&str; 13] = [
    "artificer", "barbarian", "bard", "cleric", "druid", "fighter", "monk", "paladin",
    "ranger", "rogue", "sorcerer", "warlock", "wizard",
];

/// Extract the character level from a free-text class line.
///
/// - "Level 5 Paladin" and "5th-level Paladin" → 5
/// - "Fighter 3 / Wizard 2" → 5 (sum of class levels)
/// - "Wizard 4 (INT 18)" → 4: parenthesized text and numbers not attached to a
///   class name are ignored
///
/// Anything else is treated as level 1 so a bad profile never unlocks
/// high-rarity items.
pub fn parse_level(class_level: &str) -> u8 {
    let text = strip_parenthesized(&class_level.to_lowercase());
    let tokens = tokens(&text);

    for (i, token) in tokens.iter().enumerate() {
        if *token != "level" {
            continue;
        }
        if let Some(n) = tokens.get(i + 1).and_then(|t| t.parse::<u32>().ok()) {
            return clamp_level(n);
        }
        if let Some(n) = ordinal_before(&tokens[..i]) {
            return clamp_level(n);
        }
    }

    let total = tokens
        .windows(2)
        .filter(|pair| CLASS_WORDS.contains(&pair[0]))
        .filter_map(|pair| pair[1].parse::<u32>().ok())
        .fold(0u32, |acc, n| acc.saturating_add(n));
    if total == 0 {
        MIN_LEVEL
    } else {
        clamp_level(total)
    }
}

fn clamp_level(n: u32) -> u8 {
    n.clamp(MIN_LEVEL as u32, MAX_LEVEL as u32) as u8
}

/// Drop everything inside `(...)`, including nested pairs. An unclosed
/// parenthesis drops the rest of the line.
fn strip_parenthesized(s: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            c if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}

/// Runs of letters and runs of digits, so "wizard4" and "5th" split apart.
fn tokens(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut prev_digit = false;
    for (idx, ch) in s.char_indices() {
        let is_digit = ch.is_ascii_digit();
        if !ch.is_alphanumeric() {
            if let Some(st) = start.take() {
                out.push(&s[st..idx]);
            }
            continue;
        }
        match start {
            Some(st) if is_digit != prev_digit => {
                out.push(&s[st..idx]);
                start = Some(idx);
            }
            None => start = Some(idx),
            _ => {}
        }
        prev_digit = is_digit;
    }
    if let Some(st) = start {
        out.push(&s[st..]);
    }
    out
}

/// The number in "5th level" / "2nd-level": tokens `5`, `th` right before `level`.
fn ordinal_before(tokens: &[&str]) -> Option<u32> {
    match tokens {
        [.., n, "st" | "nd" | "rd" | "th"] => n.parse().ok(),
        _ => None,
    }
}

/// Lowest level across the party; an empty party counts as level 1.
pub fn party_level(characters: &[CharacterProfile]) -> u8 {
    characters
        .iter()
        .map(|c| parse_level(&c.class_level))
        .min()
        .unwrap_or(MIN_LEVEL)
}

/// Minimum party level at which a rarity may be offered.
pub fn min_level_for_rarity(rarity: &str) -> u8 {
    let label = normalize_rarity(rarity);
    RARITY_MIN_LEVELS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(&label))
        .map(|(_, level)| *level)
        .unwrap_or(UNKNOWN_RARITY_MIN_LEVEL)
}

pub fn is_rarity_allowed(rarity: &str, level: u8) -> bool {
    level >= min_level_for_rarity(rarity)
}

/// Items eligible at `party_level`, in their original order.
pub fn filter_by_level(pool: &[MagicItemRecord], party_level: u8) -> Vec<MagicItemRecord> {
    pool.iter()
        .filter(|item| is_rarity_allowed(&item.rarity, party_level))
        .cloned()
        .collect()
}
