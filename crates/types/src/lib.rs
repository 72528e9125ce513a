// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]

//! # Key-Level Validation Types
//!
//! This crate is the foundational library for the key-level endorsement
//! validation engine, containing the block and read-write set data model,
//! the canonical codec, error types, and configuration objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `statebased-types` has minimal dependencies and is a
//! dependency for every other crate in the workspace. Collaborator traits live
//! in `statebased-api`; the engine itself lives in `statebased-validator`.

/// Block, endorsement, read-write set and envelope data structures.
pub mod app;
/// The canonical, deterministic binary codec for consensus-critical data.
pub mod codec;
/// Configuration structures for the validation engine.
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
