//! # Glyphgate Common
//!
//! Shared types, errors, and constants used across Glyphgate components.
//!
//! ## Modules
//! - `types` - Request/result data model (ImageSource, PromptMode, etc.)
//! - `error` - Gateway error taxonomy
//! - `constants` - Upstream endpoints, model id, prompt text, header names

pub mod constants;
pub mod error;
pub mod types;

pub use error::GatewayError;
pub use types::*;
