//! # caseshare-config
//!
//! TOML-driven configuration for the caseshare engine.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::path::Path;
//! use caseshare_config::EngineConfig;
//!
//! let config = EngineConfig::from_file(Path::new("caseshare.toml"))?;
//! // Pass `config` to `caseshare_core::CaseAccessEngine::new(...)`.
//! ```
//!
//! An empty document yields the defaults: denials disclosed as "not found",
//! per-case index verification before every decision, batches of up to 50 doctors.

pub mod loader;
pub mod settings;

pub use settings::{AccessSettings, AuditSettings, EngineConfig, MentionSettings};

// ── Tests ─────────────────────────────────────────────────────────────────────
