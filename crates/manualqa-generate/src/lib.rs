//! manualqa-generate
//!
//! Grounded answer generation: a bounded, page-tagged context goes to an
//! external generation service; the reply comes back as answer text plus
//! the manual pages that support it. Claimed pages outside the supplied
//! context are discarded.

pub mod gemini;
pub mod generator;

pub use gemini::{GeminiClient, GeminiConfig};
pub use generator::{AnswerGenerator, NOT_IN_MANUAL, NOT_IN_MANUAL_ANSWER};
