//! Epic changelog generator: rewrites plain change descriptions as short
//! themed narratives using an LLM backend.
//!
//! Themes live in a [`theme::ThemeRegistry`] loaded from a default and a
//! custom directory. [`llm::prompt_builder`] turns a theme, a drama level and
//! the input text into a [`llm::GenerationRequest`], and
//! [`chronicle::Chronicler`] runs it through an [`llm::LlmClient`].

pub mod chronicle;
pub mod cli_args;
pub mod config;
pub mod error;
pub mod llm;
pub mod logging;
pub mod setup;
pub mod theme;

pub use error::{EpicError, ErrorCategory};
