//! Configuration synthesis engine.
//!
//! This module owns everything between "a list of detected languages" and
//! "one merged, hashed hook configuration document": the typed document
//! model, the vendored template store, the settings-override engine and
//! the synthesizer that ties them together.

pub mod document;
pub mod hash;
pub mod overrides;
pub mod synthesis;
pub mod templates;

pub use document::{ConfigDocument, HookDefinition, RepoDefinition};
pub use hash::hash_config;
pub use synthesis::{BuildConfigResult, ConfigSynthesizer, LanguagePreCommitResult};
pub use templates::{LinterConfigBundle, TemplateError, TemplateStore};
