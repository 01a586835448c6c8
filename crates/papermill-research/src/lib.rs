//! Stage collaborators for the Papermill research pipeline.
//!
//! Implements the `papermill-core` collaborator traits against live
//! services: Gemini for text generation, arXiv for literature search, and
//! the four prompt-driven workers that turn them into pipeline stages.

pub mod analyzer;
pub mod arxiv;
pub mod collector;
pub mod developer;
pub mod gemini;
pub mod suite;
pub mod writer;

mod text;

pub use arxiv::ArxivClient;
pub use gemini::GeminiClient;
pub use suite::ResearchSuite;
