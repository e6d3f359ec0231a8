//! Name reconciliation against a canonical pool.

use shopkeep::curation::reconcile::reconcile;
use shopkeep::curation::{
    CuratorClaim, CuratorResponse, CuratorSelection, MagicItemRecord, ValidationWarning,
};

fn pool() -> Vec<MagicItemRecord> {
    vec![
        MagicItemRecord::new("Cloak of Elvenkind", "Uncommon", "Hard to see."),
        MagicItemRecord::new("Boots of Elvenkind", "Uncommon", "Quiet steps."),
        MagicItemRecord::new("Wand of Magic Missiles", "Uncommon", "Pew."),
    ]
}

fn response(picks: &[(&str, &[&str])]) -> CuratorResponse {
    CuratorResponse {
        selections: picks
            .iter()
            .map(|(character, names)| CuratorSelection {
                character: character.to_string(),
                claims: names
                    .iter()
                    .map(|n| CuratorClaim {
                        raw_name: n.to_string(),
                        reason: String::new(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

fn accepted(picks: &[(&str, &[&str])]) -> Vec<String> {
    let pool = pool();
    let report = reconcile(response(picks), &pool);
    report
        .response
        .selections()
        .iter()
        .flat_map(|s| s.claims.iter().map(|c| c.raw_name.clone()))
        .collect()
}

#[test]
fn reworded_names_resolve_to_canonical_casing() {
    assert_eq!(
        accepted(&[("Tim", &["Cloak of Elvenkind (slightly reworded)"])]),
        vec!["Cloak of Elvenkind"]
    );
    assert_eq!(
        accepted(&[("Tim", &["  WAND OF MAGIC MISSILES "])]),
        vec!["Wand of Magic Missiles"]
    );
}

#[test]
fn substring_matches_follow_pool_order() {
    // claim contains a pool name
    assert_eq!(
        accepted(&[("Tim", &["Elven Boots of Elvenkind, +1"])]),
        vec!["Boots of Elvenkind"]
    );
    // pool name contains the claim; the first such pool entry wins
    assert_eq!(accepted(&[("Tim", &["of Elvenkind"])]), vec!["Cloak of Elvenkind"]);
}

#[test]
fn uniqueness_spans_all_characters() {
    let pool = pool();
    let report = reconcile(
        response(&[
            ("Tim", &["Cloak of Elvenkind"]),
            ("Vex", &["cloak of elvenkind (used)", "Boots of Elvenkind"]),
        ]),
        &pool,
    );
    assert_eq!(report.response.claim_count(), 2);
    assert_eq!(
        report.response.counts_by_character(),
        vec![("Tim", 1), ("Vex", 1)]
    );
    assert_eq!(
        report.warnings,
        vec![ValidationWarning::Duplicate {
            character: "Vex".to_string(),
            raw_name: "cloak of elvenkind (used)".to_string(),
            canonical: "Cloak of Elvenkind".to_string(),
        }]
    );
}

#[test]
fn unknown_and_blank_names_are_hallucinations() {
    let pool = pool();
    let report = reconcile(response(&[("Tim", &["Sword of Nonexistence", "   "])]), &pool);
    assert_eq!(report.response.claim_count(), 0);
    assert_eq!(report.warnings.len(), 2);
    assert!(report
        .warnings
        .iter()
        .all(|w| matches!(w, ValidationWarning::Hallucinated { .. })));
}
