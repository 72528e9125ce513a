// Path: crates/validator/src/lib.rs
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

//! # Key-Level Endorsement Validator
//!
//! Validates that every write of a committed transaction is authorized either
//! by the key-level validation parameter in effect for the written key or, when
//! none is set, by the chaincode endorsement policy.
//!
//! The entry point is [`KeyLevelValidator`]. Reference implementations of its
//! collaborators are provided for embedding and testing:
//! [`KeyLevelParameterManager`], [`SignaturePolicyEvaluator`],
//! [`EnvelopeDecoder`] and [`ScaleRwSetCodec`].

/// Reference envelope and read-write set decoders.
pub mod codec;
pub mod config;
/// The three-phase key-level validator and its per-block dependency tracking.
pub mod keylevel;
/// A reference signature-policy evaluator.
pub mod policy;
/// A reference validation-parameter manager.
pub mod vpmanager;

pub use codec::{EnvelopeDecoder, ScaleRwSetCodec};
pub use keylevel::{ExtractionStatus, KeyLevelValidator, PolicyChecker};
pub use policy::SignaturePolicyEvaluator;
pub use vpmanager::{InMemoryMetadataSource, KeyLevelParameterManager};
