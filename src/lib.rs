//! SoulDeep: persona synthesis and Cognitive Break conflict mapping.
//!
//! The pipeline: validated questionnaire answers go to an LLM provider that
//! synthesizes a [`persona::SoulDeepPersona`]; personas are appended to a
//! keyed store; and any two persona records can be compared with the pure
//! [`classifier::classify`] rule engine to identify their conflict
//! archetype.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod intake;
pub mod persona;
pub mod store;
pub mod synthesis;

pub use classifier::{ArchetypeResult, CognitiveBreak, classify};
pub use error::{Error, Result};
pub use persona::{PersonaRecord, QuestionnaireAnswers, SoulDeepPersona};
