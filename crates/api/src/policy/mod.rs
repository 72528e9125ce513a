// Path: crates/api/src/policy/mod.rs

//! Defines the policy-evaluation contracts.

use statebased_types::app::SignedData;
use statebased_types::error::PolicyError;

/// Verifies that a set of signed data satisfies a byte-encoded policy.
///
/// Implementations are shared by every transaction of a block and must be safe
/// for concurrent invocation.
pub trait PolicyEvaluator: Send + Sync {
    /// Evaluates `policy` against `signature_set`.
    fn evaluate(&self, policy: &[u8], signature_set: &[SignedData]) -> Result<(), PolicyError>;
}

/// The cryptographic primitive behind policy evaluation.
///
/// Identity deserialization and signature checking live behind this trait so
/// that policy logic never touches key material directly.
pub trait SignatureVerifier: Send + Sync {
    /// Verifies that `identity` produced `signature` over `message`.
    fn verify(&self, identity: &[u8], message: &[u8], signature: &[u8]) -> Result<(), String>;
}
