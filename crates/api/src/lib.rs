// Path: crates/api/src/lib.rs

//! # Key-Level Validation API Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
#![deny(missing_docs)]
//! # Key-Level Validation API
//!
//! The narrow contracts through which the validation engine consumes its
//! collaborators: policy evaluation, validation-parameter bookkeeping,
//! envelope and read-write set decoding, and committed metadata lookups.

/// Traits for decoding envelopes and read-write sets.
pub mod codec;
/// Re-exports all core error types from the central `statebased-types` crate.
pub mod error;
/// Traits for evaluating signature policies.
pub mod policy;
/// Traits for reading committed key metadata.
pub mod state;
/// The validator lifecycle and the validation-parameter manager contract.
pub mod validation;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::codec::{RwSetCodec, TransactionDecoder};
    pub use crate::error::{
        DecodeError, ErrorCode, PolicyError, StateError, TxValidationError,
        ValidationParameterError,
    };
    pub use crate::policy::{PolicyEvaluator, SignatureVerifier};
    pub use crate::state::MetadataSource;
    pub use crate::validation::{StateBasedValidator, ValidationParameterManager};
}
