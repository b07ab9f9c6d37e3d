//! Persona data model: questionnaire answers, classifier inputs, and the
//! synthesized SoulDeep persona.
//!
//! Field names follow the Integrity Protocol questionnaire: B14 is "the
//! Scar" (an honesty-related relational injury), B16 "the Foundation" (a
//! required emotional-safety condition), B15 "the Seams" (the default coping
//! behavior under stress), and B21 the two TKI conflict-style axes. The
//! questionnaire codes themselves are accepted as serde aliases.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Inclusive range of each TKI axis.
pub const TKI_MIN: f64 = 1.0;
pub const TKI_MAX: f64 = 5.0;

/// Raw questionnaire answers, one set per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionnaireAnswers {
    /// B14: free-text description of a past honesty-related injury.
    #[serde(alias = "B14")]
    pub scar: String,
    /// B16: free-text description of a required emotional-safety condition.
    #[serde(alias = "B16")]
    pub foundation: String,
    /// B15: free-text description of the default coping behavior under stress.
    #[serde(alias = "B15")]
    pub seams: String,
    /// B21_A: 1-5, low = prioritizes own needs, high = prioritizes peace.
    #[serde(alias = "B21_A")]
    pub needs_vs_peace: f64,
    /// B21_B: 1-5, low = seeks common ground, high = avoids engagement.
    #[serde(alias = "B21_B")]
    pub common_vs_avoid: f64,
}

impl QuestionnaireAnswers {
    /// Validate the answers before synthesis.
    ///
    /// Text fields must be non-empty after trimming and both TKI axes must
    /// lie in [1, 5]. The classifier itself tolerates degenerate input; this
    /// gate keeps such input from ever being synthesized or stored.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("scar", &self.scar),
            ("foundation", &self.foundation),
            ("seams", &self.seams),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField {
                    field: field.to_string(),
                });
            }
        }
        for (field, value) in [
            ("needs_vs_peace", self.needs_vs_peace),
            ("common_vs_avoid", self.common_vs_avoid),
        ] {
            if !(TKI_MIN..=TKI_MAX).contains(&value) {
                return Err(ValidationError::OutOfRange {
                    field: field.to_string(),
                    value,
                    min: TKI_MIN,
                    max: TKI_MAX,
                });
            }
        }
        Ok(())
    }

    /// Combined TKI conflict score: mean of the two axes, rounded to one
    /// decimal. The rounding convention is fixed here; a score echoed back
    /// by the synthesis model is ignored in favor of this value.
    pub fn tki_score(&self) -> f64 {
        let mean = (self.needs_vs_peace + self.common_vs_avoid) / 2.0;
        (mean * 10.0).round() / 10.0
    }

    /// The classifier-facing subset of the answers.
    pub fn to_record(&self) -> PersonaRecord {
        PersonaRecord {
            scar: self.scar.clone(),
            foundation: self.foundation.clone(),
            seams: self.seams.clone(),
            needs_vs_peace: self.needs_vs_peace,
            common_vs_avoid: self.common_vs_avoid,
        }
    }
}

/// The unit the classifier consumes. Constructed once per user from
/// validated questionnaire input and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaRecord {
    pub scar: String,
    pub foundation: String,
    #[serde(default)]
    pub seams: String,
    pub needs_vs_peace: f64,
    pub common_vs_avoid: f64,
}

/// The one-of-four defense archetype describing a persona's behavior when
/// its trigger fires. Closed set; any other value is rejected on parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefenseArchetype {
    Erupt,
    Freeze,
    Flee,
    Panic,
}

impl std::str::FromStr for DefenseArchetype {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "erupt" => Ok(Self::Erupt),
            "freeze" => Ok(Self::Freeze),
            "flee" => Ok(Self::Flee),
            "panic" => Ok(Self::Panic),
            _ => Err(ValidationError::UnknownArchetype {
                value: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for DefenseArchetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Erupt => write!(f, "Erupt"),
            Self::Freeze => write!(f, "Freeze"),
            Self::Flee => write!(f, "Flee"),
            Self::Panic => write!(f, "Panic"),
        }
    }
}

/// A fully synthesized SoulDeep persona: the model's conflict-mapping output
/// plus the validated inputs it was derived from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoulDeepPersona {
    /// Narrative summary of resilience and vulnerability capacity.
    pub analysis: String,
    /// The single primary toxic coping mechanism (e.g. "Withdrawing").
    pub seams_mechanism: String,
    /// Combined TKI conflict score, one decimal.
    pub tki_score: f64,
    /// One-sentence structural principle summarizing the relational pattern.
    pub structural_principle: String,
    /// The level of vulnerability a match must offer for this persona to
    /// feel seen and trusted.
    pub scar_demand: String,
    /// The trigger phrase, action, or context that activates the defense
    /// system.
    pub red_button: String,
    /// Defense archetype when triggered.
    pub blast_radius: DefenseArchetype,
    /// The validated questionnaire inputs the persona was synthesized from.
    pub inputs: PersonaRecord,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn answers() -> QuestionnaireAnswers {
        QuestionnaireAnswers {
            scar: "I was lied to about money for years.".to_string(),
            foundation: "I need to hear hard truths early.".to_string(),
            seams: "I withdraw and go silent.".to_string(),
            needs_vs_peace: 2.0,
            common_vs_avoid: 4.5,
        }
    }

    #[test]
    fn valid_answers_pass() {
        assert!(answers().validate().is_ok());
    }

    #[test]
    fn blank_text_field_rejected() {
        let mut a = answers();
        a.foundation = "   ".to_string();
        let err = a.validate().unwrap_err();
        assert!(matches!(err, ValidationError::EmptyField { ref field } if field == "foundation"));
    }

    #[test]
    fn out_of_range_axis_rejected() {
        let mut a = answers();
        a.needs_vs_peace = 0.5;
        assert!(matches!(
            a.validate().unwrap_err(),
            ValidationError::OutOfRange { .. }
        ));

        let mut a = answers();
        a.common_vs_avoid = 5.1;
        assert!(a.validate().is_err());

        // Boundary values are in range.
        let mut a = answers();
        a.needs_vs_peace = 1.0;
        a.common_vs_avoid = 5.0;
        assert!(a.validate().is_ok());
    }

    #[test]
    fn tki_score_is_mean_rounded_to_one_decimal() {
        let a = answers();
        assert_eq!(a.tki_score(), 3.3); // (2.0 + 4.5) / 2 = 3.25 -> 3.3

        let mut a = answers();
        a.needs_vs_peace = 1.0;
        a.common_vs_avoid = 1.0;
        assert_eq!(a.tki_score(), 1.0);
    }

    #[test]
    fn to_record_carries_all_classifier_fields() {
        let a = answers();
        let record = a.to_record();
        assert_eq!(record.seams, a.seams);
        assert_eq!(record.needs_vs_peace, a.needs_vs_peace);
        assert_eq!(record.common_vs_avoid, a.common_vs_avoid);
    }

    #[test]
    fn answers_accept_questionnaire_codes() {
        let json = r#"{
            "B14": "scar text",
            "B16": "foundation text",
            "B15": "seams text",
            "B21_A": 2,
            "B21_B": 4
        }"#;
        let a: QuestionnaireAnswers = serde_json::from_str(json).unwrap();
        assert_eq!(a.scar, "scar text");
        assert_eq!(a.common_vs_avoid, 4.0);
    }

    #[test]
    fn defense_archetype_closed_set() {
        assert_eq!(
            "erupt".parse::<DefenseArchetype>().unwrap(),
            DefenseArchetype::Erupt
        );
        assert_eq!(
            " Panic ".parse::<DefenseArchetype>().unwrap(),
            DefenseArchetype::Panic
        );
        let err = "Implode".parse::<DefenseArchetype>().unwrap_err();
        assert!(matches!(err, ValidationError::UnknownArchetype { .. }));
    }

    #[test]
    fn persona_record_missing_seams_defaults_to_empty() {
        let json = r#"{
            "scar": "s",
            "foundation": "f",
            "needs_vs_peace": 3.0,
            "common_vs_avoid": 3.0
        }"#;
        let record: PersonaRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.seams, "");
    }
}
