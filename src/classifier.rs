//! Cognitive Break matching engine.
//!
//! A deterministic rule engine that maps two persona records to one of a
//! fixed set of conflict archetypes. Rules live in an ordered table and are
//! tried from most structurally severe to most common; the first rule whose
//! predicate holds wins. Pure function: no I/O, no shared state, safe to
//! call from any number of tasks.
//!
//! The Mis-Attribution keyword checks are evaluated in both directions, so
//! the returned label never depends on argument order. The no-keyword
//! fallback inside that rule fires for most pairs without a recognizable
//! seam keyword; that breadth is intentional and covered by tests.

use serde::{Deserialize, Serialize};

use crate::persona::PersonaRecord;

/// TKI-axis distance beyond which two personas count as diametrically
/// opposed. Strictly greater-than; a distance of exactly 3.5 does not fire.
const TKI_OPPOSITION_THRESHOLD: f64 = 3.5;

/// Avoidance score above which a persona counts as conflict-avoidant.
/// Strictly greater-than; exactly 4 does not count.
const AVOIDANCE_THRESHOLD: f64 = 4.0;

/// Seam keywords indicating an aggressive coping mechanism.
const AGGRESSIVE_SEAMS: [&str; 5] = ["anger", "attack", "yell", "lashing out", "erupt"];

/// Seam keywords indicating a passive / freezing coping mechanism.
const PASSIVE_SEAMS: [&str; 5] = ["withdrawal", "shut down", "freeze", "flee", "silent treatment"];

/// The fixed set of conflict archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CognitiveBreak {
    MisDirection,
    MisAttachment,
    MisAttribution,
    StructuralAlignment,
}

impl CognitiveBreak {
    /// Human-readable archetype name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::MisDirection => "Mis-Direction",
            Self::MisAttachment => "Mis-Attachment",
            Self::MisAttribution => "Mis-Attribution",
            Self::StructuralAlignment => "Structural Alignment",
        }
    }

    /// Static rationale: what structurally causes this break.
    pub fn cause(&self) -> &'static str {
        match self {
            Self::MisDirection => "A fundamental conflict in priorities or direction.",
            Self::MisAttachment => {
                "A structural conflict in relational security and trust: both partners avoid, \
                 and neither builds a foundation."
            }
            Self::MisAttribution => {
                "A failure to correctly read the other's seams, mistaking a coping mechanism \
                 for a deliberate attack."
            }
            Self::StructuralAlignment => "No severe structural conflict identified.",
        }
    }

    /// Static remedy guidance for the archetype.
    pub fn remedy(&self) -> &'static str {
        match self {
            Self::MisDirection => {
                "Requires strict boundary setting and clear, future-oriented goal alignment."
            }
            Self::MisAttachment => {
                "Requires radical honesty and slow, deliberate trust-building; the scar must \
                 heal before the foundation can hold."
            }
            Self::MisAttribution => {
                "Requires active emotional translation and agreement on a vulnerability cycle \
                 directive."
            }
            Self::StructuralAlignment => {
                "No structural remedy needed; maintain honest communication."
            }
        }
    }
}

impl std::fmt::Display for CognitiveBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Classifier output: the archetype plus its static rationale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArchetypeResult {
    pub archetype: CognitiveBreak,
    pub rationale: &'static str,
}

impl ArchetypeResult {
    fn new(archetype: CognitiveBreak) -> Self {
        Self {
            archetype,
            rationale: archetype.cause(),
        }
    }
}

/// One entry in the rule table.
struct Rule {
    archetype: CognitiveBreak,
    applies: fn(&PersonaRecord, &PersonaRecord) -> bool,
}

/// Rules in priority order: most structurally severe first. Multiple
/// predicates can hold at once; only the first match counts.
const RULES: [Rule; 3] = [
    Rule {
        archetype: CognitiveBreak::MisDirection,
        applies: mis_direction,
    },
    Rule {
        archetype: CognitiveBreak::MisAttachment,
        applies: mis_attachment,
    },
    Rule {
        archetype: CognitiveBreak::MisAttribution,
        applies: mis_attribution,
    },
];

/// Compare two personas and identify their Cognitive Break archetype.
///
/// Total over all well-formed records and symmetric in its label: swapping
/// `a` and `b` yields the same archetype. Out-of-range numeric fields are a
/// caller precondition and are not re-validated here.
pub fn classify(a: &PersonaRecord, b: &PersonaRecord) -> ArchetypeResult {
    let archetype = RULES
        .iter()
        .find(|rule| (rule.applies)(a, b))
        .map(|rule| rule.archetype)
        .unwrap_or(CognitiveBreak::StructuralAlignment);
    ArchetypeResult::new(archetype)
}

/// One prioritizes needs while the other prioritizes peace, or one seeks
/// common ground while the other avoids engagement.
fn mis_direction(a: &PersonaRecord, b: &PersonaRecord) -> bool {
    let needs_diff = (a.needs_vs_peace - b.needs_vs_peace).abs();
    let avoid_diff = (a.common_vs_avoid - b.common_vs_avoid).abs();
    needs_diff > TKI_OPPOSITION_THRESHOLD || avoid_diff > TKI_OPPOSITION_THRESHOLD
}

/// Two avoidant personas: neither will build a foundation.
fn mis_attachment(a: &PersonaRecord, b: &PersonaRecord) -> bool {
    a.common_vs_avoid > AVOIDANCE_THRESHOLD && b.common_vs_avoid > AVOIDANCE_THRESHOLD
}

/// An aggressive seam meeting a freezing seam, or no recognizable seam
/// keywords at all. Both checks run in both directions.
fn mis_attribution(a: &PersonaRecord, b: &PersonaRecord) -> bool {
    let aggressive_a = seam_matches(&a.seams, &AGGRESSIVE_SEAMS);
    let aggressive_b = seam_matches(&b.seams, &AGGRESSIVE_SEAMS);
    let passive_a = seam_matches(&a.seams, &PASSIVE_SEAMS);
    let passive_b = seam_matches(&b.seams, &PASSIVE_SEAMS);

    let volatility_mismatch = (aggressive_a && passive_b) || (aggressive_b && passive_a);
    let unreadable = (!aggressive_a && !passive_b) || (!aggressive_b && !passive_a);
    volatility_mismatch || unreadable
}

/// Case-insensitive substring match of any keyword in the seam description.
/// Empty text matches nothing.
fn seam_matches(text: &str, keywords: &[&str]) -> bool {
    let text = text.to_lowercase();
    keywords.iter().any(|keyword| text.contains(keyword))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(seams: &str, needs_vs_peace: f64, common_vs_avoid: f64) -> PersonaRecord {
        PersonaRecord {
            scar: "a scar".to_string(),
            foundation: "a foundation".to_string(),
            seams: seams.to_string(),
            needs_vs_peace,
            common_vs_avoid,
        }
    }

    fn label(a: &PersonaRecord, b: &PersonaRecord) -> CognitiveBreak {
        classify(a, b).archetype
    }

    #[test]
    fn rule_table_priority_order() {
        let archetypes: Vec<_> = RULES.iter().map(|r| r.archetype).collect();
        assert_eq!(
            archetypes,
            vec![
                CognitiveBreak::MisDirection,
                CognitiveBreak::MisAttachment,
                CognitiveBreak::MisAttribution,
            ]
        );
    }

    #[test]
    fn opposed_needs_axis_is_mis_direction() {
        let a = record("I erupt", 1.0, 2.0);
        let b = record("I freeze", 5.0, 2.0);
        assert_eq!(label(&a, &b), CognitiveBreak::MisDirection);
    }

    #[test]
    fn opposed_avoid_axis_is_mis_direction() {
        let a = record("", 3.0, 1.0);
        let b = record("", 3.0, 5.0);
        assert_eq!(label(&a, &b), CognitiveBreak::MisDirection);
    }

    #[test]
    fn mis_direction_takes_priority_over_everything() {
        // Both avoidant AND erupt-vs-freeze seams, but the needs axis is
        // diametrically opposed: Mis-Direction wins.
        let a = record("I erupt in anger", 1.0, 4.5);
        let b = record("I freeze and shut down", 5.0, 4.5);
        assert_eq!(label(&a, &b), CognitiveBreak::MisDirection);
    }

    #[test]
    fn opposition_threshold_is_strict() {
        // |1.0 - 4.5| = 3.5 exactly: not opposed. Both seams aggressive so
        // the keyword rule cannot fire either.
        let a = record("I yell", 1.0, 2.0);
        let b = record("I attack", 4.5, 2.0);
        assert_eq!(label(&a, &b), CognitiveBreak::StructuralAlignment);
    }

    #[test]
    fn mutual_avoidance_is_mis_attachment() {
        let a = record("I erupt", 3.0, 4.5);
        let b = record("I freeze", 3.0, 4.2);
        assert_eq!(label(&a, &b), CognitiveBreak::MisAttachment);
    }

    #[test]
    fn avoidance_threshold_is_strict() {
        // Exactly 4 on both: not avoidant. Falls through to the seam rule,
        // which fires on erupt-vs-freeze.
        let a = record("I erupt", 3.0, 4.0);
        let b = record("I freeze", 3.0, 4.0);
        assert_eq!(label(&a, &b), CognitiveBreak::MisAttribution);
    }

    #[test]
    fn one_sided_avoidance_is_not_mis_attachment() {
        let a = record("I yell", 3.0, 4.5);
        let b = record("I attack", 3.0, 2.0);
        assert_eq!(label(&a, &b), CognitiveBreak::StructuralAlignment);
    }

    #[test]
    fn aggression_meeting_freeze_is_mis_attribution() {
        let a = record("I erupt when cornered", 2.0, 2.0);
        let b = record("I freeze and go quiet", 2.0, 2.0);
        assert_eq!(label(&a, &b), CognitiveBreak::MisAttribution);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let a = record("LASHING OUT is my default", 2.0, 2.0);
        let b = record("The Silent Treatment", 2.0, 2.0);
        assert_eq!(label(&a, &b), CognitiveBreak::MisAttribution);
    }

    #[test]
    fn empty_seams_fall_back_to_mis_attribution() {
        // No keywords on either side: the documented fallback branch fires,
        // not Structural Alignment.
        let a = record("", 2.0, 2.0);
        let b = record("", 2.0, 2.0);
        assert_eq!(label(&a, &b), CognitiveBreak::MisAttribution);
    }

    #[test]
    fn unrecognized_seam_text_falls_back_to_mis_attribution() {
        let a = record("I bake bread until it passes", 2.0, 2.0);
        let b = record("I go for long runs", 2.0, 2.0);
        assert_eq!(label(&a, &b), CognitiveBreak::MisAttribution);
    }

    #[test]
    fn two_aggressive_seams_align() {
        // Both sides match the aggressive set and neither the passive set:
        // no mismatch, and the fallback is blocked in both directions.
        let a = record("I yell", 2.0, 2.0);
        let b = record("anger, mostly", 2.0, 2.0);
        assert_eq!(label(&a, &b), CognitiveBreak::StructuralAlignment);
    }

    #[test]
    fn two_passive_seams_align() {
        let a = record("withdrawal", 2.0, 2.0);
        let b = record("I shut down completely", 2.0, 2.0);
        assert_eq!(label(&a, &b), CognitiveBreak::StructuralAlignment);
    }

    #[test]
    fn label_is_symmetric_under_swap() {
        let cases = [
            // Mis-Direction
            (record("", 1.0, 2.0), record("", 5.0, 2.0)),
            // Mis-Attachment
            (record("I yell", 3.0, 4.5), record("I attack", 3.0, 4.2)),
            // Mis-Attribution, mismatch direction A->B
            (record("I erupt", 2.0, 2.0), record("I flee", 2.0, 2.0)),
            // Mis-Attribution, mismatch direction B->A
            (record("I flee", 2.0, 2.0), record("I erupt", 2.0, 2.0)),
            // Mis-Attribution, fallback
            (record("", 2.0, 2.0), record("", 2.0, 2.0)),
            // Structural Alignment
            (record("I yell", 2.0, 2.0), record("I attack", 2.0, 2.0)),
        ];
        for (a, b) in &cases {
            assert_eq!(
                label(a, b),
                label(b, a),
                "swap changed the label for seams {:?} / {:?}",
                a.seams,
                b.seams
            );
        }
    }

    #[test]
    fn rationale_is_static_per_archetype() {
        let a = record("", 1.0, 2.0);
        let b = record("", 5.0, 2.0);
        let result = classify(&a, &b);
        assert_eq!(result.rationale, CognitiveBreak::MisDirection.cause());
        assert!(result.rationale.contains("priorities or direction"));
    }

    #[test]
    fn every_archetype_has_name_cause_and_remedy() {
        for archetype in [
            CognitiveBreak::MisDirection,
            CognitiveBreak::MisAttachment,
            CognitiveBreak::MisAttribution,
            CognitiveBreak::StructuralAlignment,
        ] {
            assert!(!archetype.name().is_empty());
            assert!(!archetype.cause().is_empty());
            assert!(!archetype.remedy().is_empty());
        }
    }
}
