//! cheatx library - profile-driven cheat file export engine.
//!
//! This library exposes the core functionality of the `cheatx` CLI for use in
//! tests and other front ends (editors, GUIs) that supply field values and
//! document text.
//!
//! # Modules
//!
//! - `profile`: Profile catalog, registry lookups, and starter templates
//! - `plan`: Export field values, placeholder substitution, and path planning
//! - `encode`: Cheat block encoders (indexed, bracket, generic)
//! - `validate`: Blocking/advisory classification of field values
//! - `export`: Validate, plan, and materialize in one call
//! - `detect`: Best-effort field inference from an existing cheat file
//! - `preview`: Export preview text and the debounced recompute
//! - `config`: Preferences, config file formats, and path helpers
//! - `output`: Output mode abstraction (robot/human)
//! - `error`: Error types with user-recoverable hints
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod detect;
pub mod encode;
pub mod error;
pub mod export;
pub mod logging;
pub mod output;
pub mod plan;
pub mod preview;
pub mod profile;
pub mod theme;
pub mod validate;
