//! Curator prompt rendering.
//!
//! Pure formatting: no parsing, no networking. Item lines are emitted in pool
//! order so the same input always renders the same prompt.

use crate::curation::pricing::normalize_rarity;
use crate::curation::types::{CharacterProfile, MagicItemRecord};

const CURATOR_SYSTEM_PROMPT: &str = r#"You are a D&D 5e magic item curator. Your job is to select personalized magic items for each character in a party.

RULES:
- Select exactly {picks} items per character
- Pick items that match the character's class, backstory, and playstyle
- Mix mechanically useful items with thematically interesting ones
- No duplicate items across characters (each item can only be recommended once)
- Return ONLY valid JSON, no other text
- CRITICAL: The "name" field must be copied EXACTLY from the item pool. Do not rename, modify, abbreviate, or add parenthetical notes to item names.
- Only select items that appear in the provided pool. Do not invent items or reference the character's existing equipment.

RESPONSE FORMAT (JSON only):
{
  "selections": [
    {
      "character": "Character Name",
      "items": [
        {"name": "Exact Item Name From Pool", "reason": "Brief reason why this suits them"}
      ]
    }
  ]
}"#;

/// System directive for the curator persona, with the per-character pick count filled in.
pub fn curator_system_prompt(picks_per_character: usize) -> String {
    CURATOR_SYSTEM_PROMPT.replace("{picks}", &picks_per_character.to_string())
}

/// Render character profiles and the eligible pool into the curator's user message.
pub fn build_prompt(
    characters: &[CharacterProfile],
    eligible_pool: &[MagicItemRecord],
    picks_per_character: usize,
) -> String {
    let mut prompt = String::new();

    prompt.push_str("## Characters\n\n");
    for character in characters {
        push_character(&mut prompt, character);
    }

    prompt.push_str("## Available Item Pool\n\n");
    for item in eligible_pool {
        prompt.push_str(&format!("- {} ({})\n", item.name, normalize_rarity(&item.rarity)));
    }

    prompt.push_str(&format!(
        "\nSelect exactly {} items for each of the {} characters. Return ONLY JSON.\n",
        picks_per_character,
        characters.len()
    ));

    prompt
}

fn push_character(prompt: &mut String, character: &CharacterProfile) {
    prompt.push_str(&format!("### {} ({})\n", character.name, character.class_level));
    prompt.push_str(&format!("- Backstory: {}\n", character.backstory));
    if let Some(playstyle) = character.playstyle.as_deref().filter(|p| !p.trim().is_empty()) {
        prompt.push_str(&format!("- Playstyle: {}\n", playstyle));
    }
    if !character.inventory.is_empty() {
        prompt.push_str(&format!("- Current inventory: {}\n", character.inventory.join(", ")));
    }
    prompt.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party() -> Vec<CharacterProfile> {
        vec![
            CharacterProfile::new("Tim", "Level 5 Paladin", "Oath of vengeance.")
                .with_playstyle("Front line")
                .with_item("Longsword")
                .with_item("Shield"),
            CharacterProfile::new("Dieter", "Level 6 Rogue", "Former guild thief."),
        ]
    }

    #[test]
    fn renders_characters_then_pool() {
        let pool = vec![
            MagicItemRecord::new("Cloak of Elvenkind", "Uncommon", ""),
            MagicItemRecord::new("Weapon, +1", "Uncommon (+1), Rare (+2)", ""),
        ];
        let prompt = build_prompt(&party(), &pool, 4);

        assert!(prompt.contains(
            "### Tim (Level 5 Paladin)\n\
             - Backstory: Oath of vengeance.\n\
             - Playstyle: Front line\n\
             - Current inventory: Longsword, Shield\n"
        ));
        assert!(
            prompt.contains("### Dieter (Level 6 Rogue)\n- Backstory: Former guild thief.\n\n")
        );
        assert!(!prompt.contains("- Playstyle: \n"));
        assert!(prompt.contains("- Cloak of Elvenkind (Uncommon)\n- Weapon, +1 (Uncommon)\n"));
        assert!(prompt
            .ends_with("Select exactly 4 items for each of the 2 characters. Return ONLY JSON.\n"));
        let characters_at = prompt.find("## Characters").unwrap();
        assert!(characters_at < prompt.find("## Available Item Pool").unwrap());
    }

    #[test]
    fn rendering_is_deterministic_and_keeps_every_item() {
        let pool: Vec<MagicItemRecord> = (0..50)
            .map(|i| MagicItemRecord::new(&format!("Item {:02}", i), "Common", ""))
            .collect();
        let a = build_prompt(&party(), &pool, 3);
        let b = build_prompt(&party(), &pool, 3);
        assert_eq!(a, b);

        let positions: Vec<usize> = pool
            .iter()
            .map(|item| a.find(&format!("- {} (Common)", item.name)).expect("item rendered"))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn system_prompt_carries_pick_count() {
        let system = curator_system_prompt(3);
        assert!(system.contains("Select exactly 3 items per character"));
        assert!(system.contains("\"selections\""));
    }
}
