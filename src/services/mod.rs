pub mod boleto_extractor;
pub mod challenge_form;
pub mod llm_service;

pub use challenge_form::ChallengeForm;
pub use llm_service::{CorrectionReply, LlmService};
