//! Intake orchestration: validate answers, synthesize a persona, store it,
//! and compare stored personas.
//!
//! Both collaborators are injected as trait objects, so tests run against a
//! fake synthesizer and an in-memory (or deliberately failing) store.

use std::sync::Arc;

use crate::classifier::{ArchetypeResult, classify};
use crate::error::{Error, StoreError};
use crate::persona::{QuestionnaireAnswers, SoulDeepPersona};
use crate::store::PersonaStore;
use crate::synthesis::Synthesizer;

/// Outcome of a questionnaire submission.
///
/// Synthesis succeeding and storage failing is a partial success: the caller
/// still gets the persona, plus the store error to report. This is distinct
/// from synthesis failure, where there is nothing to hand back.
#[derive(Debug)]
pub struct IntakeOutcome {
    pub persona: SoulDeepPersona,
    pub store_error: Option<StoreError>,
}

impl IntakeOutcome {
    /// Whether the persona made it into the store.
    pub fn stored(&self) -> bool {
        self.store_error.is_none()
    }
}

/// Orchestrates the submission flow and pairwise comparison.
pub struct IntakeService {
    synthesizer: Arc<dyn Synthesizer>,
    store: Arc<dyn PersonaStore>,
}

impl IntakeService {
    pub fn new(synthesizer: Arc<dyn Synthesizer>, store: Arc<dyn PersonaStore>) -> Self {
        Self { synthesizer, store }
    }

    /// Run the full intake flow for one user: validate, synthesize, store.
    pub async fn submit(
        &self,
        user_id: &str,
        answers: &QuestionnaireAnswers,
    ) -> Result<IntakeOutcome, Error> {
        answers.validate()?;

        tracing::info!(
            user_id,
            provider = self.synthesizer.provider_name(),
            "Synthesizing persona"
        );
        let persona = self.synthesizer.synthesize(answers).await?;

        let store_error = match self.store.put(user_id, &persona).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(user_id, error = %e, "Persona synthesized but not stored");
                Some(e)
            }
        };

        Ok(IntakeOutcome {
            persona,
            store_error,
        })
    }

    /// Classify the Cognitive Break between two stored personas.
    pub async fn compare(&self, user_a: &str, user_b: &str) -> Result<ArchetypeResult, Error> {
        let a = self.store.get(user_a).await?;
        let b = self.store.get(user_b).await?;
        let result = classify(&a.inputs, &b.inputs);
        tracing::info!(user_a, user_b, archetype = %result.archetype, "Personas compared");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::classifier::CognitiveBreak;
    use crate::error::SynthesisError;
    use crate::persona::DefenseArchetype;
    use crate::store::MemoryStore;

    /// Fake synthesizer deriving the persona mechanically from the answers.
    struct FakeSynthesizer {
        fail: bool,
    }

    #[async_trait]
    impl Synthesizer for FakeSynthesizer {
        fn provider_name(&self) -> &str {
            "fake"
        }

        async fn synthesize(
            &self,
            answers: &QuestionnaireAnswers,
        ) -> Result<SoulDeepPersona, SynthesisError> {
            if self.fail {
                return Err(SynthesisError::Unavailable {
                    provider: "fake".to_string(),
                    reason: "down for the test".to_string(),
                });
            }
            Ok(SoulDeepPersona {
                analysis: "fake analysis".to_string(),
                seams_mechanism: "Withdrawing".to_string(),
                tki_score: answers.tki_score(),
                structural_principle: "fake principle".to_string(),
                scar_demand: "fake demand".to_string(),
                red_button: "fake trigger".to_string(),
                blast_radius: DefenseArchetype::Freeze,
                inputs: answers.to_record(),
            })
        }
    }

    /// Store whose writes always fail, for the partial-success path.
    struct BrokenStore;

    #[async_trait]
    impl PersonaStore for BrokenStore {
        async fn put(&self, _: &str, _: &SoulDeepPersona) -> Result<(), StoreError> {
            Err(StoreError::Query("disk full".to_string()))
        }

        async fn get(&self, user_id: &str) -> Result<SoulDeepPersona, StoreError> {
            Err(StoreError::NotFound {
                entity: "persona".to_string(),
                id: user_id.to_string(),
            })
        }

        async fn list_users(&self) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }
    }

    fn answers(seams: &str, needs_vs_peace: f64, common_vs_avoid: f64) -> QuestionnaireAnswers {
        QuestionnaireAnswers {
            scar: "a scar".to_string(),
            foundation: "a foundation".to_string(),
            seams: seams.to_string(),
            needs_vs_peace,
            common_vs_avoid,
        }
    }

    fn service(fail_synthesis: bool, store: Arc<dyn PersonaStore>) -> IntakeService {
        IntakeService::new(
            Arc::new(FakeSynthesizer {
                fail: fail_synthesis,
            }),
            store,
        )
    }

    #[tokio::test]
    async fn submit_synthesizes_and_stores() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(false, store.clone());

        let outcome = svc
            .submit("alice", &answers("I withdraw", 2.0, 3.0))
            .await
            .unwrap();
        assert!(outcome.stored());
        assert_eq!(outcome.persona.tki_score, 2.5);

        let stored = store.get("alice").await.unwrap();
        assert_eq!(stored.structural_principle, "fake principle");
    }

    #[tokio::test]
    async fn submit_rejects_invalid_answers_before_synthesis() {
        let svc = service(false, Arc::new(MemoryStore::new()));
        let err = svc
            .submit("alice", &answers("I withdraw", 0.0, 3.0))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn synthesis_failure_is_total_failure() {
        let svc = service(true, Arc::new(MemoryStore::new()));
        let err = svc
            .submit("alice", &answers("I withdraw", 2.0, 3.0))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Synthesis(SynthesisError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn store_failure_is_partial_success() {
        let svc = service(false, Arc::new(BrokenStore));
        let outcome = svc
            .submit("alice", &answers("I withdraw", 2.0, 3.0))
            .await
            .unwrap();
        assert!(!outcome.stored());
        assert_eq!(outcome.persona.analysis, "fake analysis");
        assert!(matches!(outcome.store_error, Some(StoreError::Query(_))));
    }

    #[tokio::test]
    async fn compare_classifies_stored_personas() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(false, store);

        svc.submit("alice", &answers("I erupt in anger", 2.0, 2.0))
            .await
            .unwrap();
        svc.submit("bob", &answers("I freeze and go silent", 2.0, 2.0))
            .await
            .unwrap();

        let result = svc.compare("alice", "bob").await.unwrap();
        assert_eq!(result.archetype, CognitiveBreak::MisAttribution);

        let swapped = svc.compare("bob", "alice").await.unwrap();
        assert_eq!(swapped.archetype, result.archetype);
    }

    #[tokio::test]
    async fn compare_missing_user_surfaces_not_found() {
        let store = Arc::new(MemoryStore::new());
        let svc = service(false, store);
        svc.submit("alice", &answers("I withdraw", 2.0, 2.0))
            .await
            .unwrap();

        let err = svc.compare("alice", "ghost").await.unwrap_err();
        assert!(matches!(err, Error::Store(StoreError::NotFound { .. })));
    }
}
