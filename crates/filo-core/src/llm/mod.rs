//! LLM gateway
//!
//! Speaks to a local Ollama instance: availability probe, model catalog,
//! JSON-mode chat and embeddings, plus the batched file-classification
//! protocol built on top of chat.

mod classify;
mod client;

pub use classify::{BatchClassification, FileClassification, MAX_PROMPT_RULES};
pub use client::{ChatMessage, OllamaClient};
