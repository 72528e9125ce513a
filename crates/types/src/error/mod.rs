// Path: crates/types/src/error/mod.rs
//! Core error types for key-level endorsement validation.

use thiserror::Error;

/// A trait for assigning a stable, machine-readable string code to an error.
pub trait ErrorCode {
    /// Returns the unique, stable string identifier for this error variant.
    fn code(&self) -> &'static str;
}

/// The verdict of a failed transaction validation.
///
/// The two variants must never be conflated: a policy violation marks the
/// transaction invalid, while an execution failure means the verdict could not
/// be reached at all and the transaction must not be marked either way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxValidationError {
    /// The transaction is not authorized by the applicable endorsement policy,
    /// its read-write set is malformed, or a key-level validation parameter it
    /// depends on was updated earlier in the same block.
    #[error("endorsement policy failure: {0}")]
    EndorsementPolicy(String),
    /// The check could not be completed because of an infrastructure failure.
    #[error("validation execution failure: {0}")]
    ExecutionFailure(String),
}

impl TxValidationError {
    /// Returns true if the transaction was judged invalid.
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, Self::EndorsementPolicy(_))
    }

    /// Returns true if validation could not be completed.
    pub fn is_execution_failure(&self) -> bool {
        matches!(self, Self::ExecutionFailure(_))
    }
}

impl ErrorCode for TxValidationError {
    fn code(&self) -> &'static str {
        match self {
            Self::EndorsementPolicy(_) => "TX_ENDORSEMENT_POLICY_FAILURE",
            Self::ExecutionFailure(_) => "TX_VALIDATION_EXECUTION_FAILURE",
        }
    }
}

/// Errors returned when resolving a key-level validation parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationParameterError {
    /// A transaction earlier in the same block validly updated the parameter,
    /// so the committed value is stale for the requesting transaction.
    #[error("validation parameter for key [{key}] in collection [{collection}] of namespace [{namespace}] was updated in transaction {block_num}:{tx_num}")]
    UpdatedInFlight {
        /// The namespace of the key.
        namespace: String,
        /// The collection of the key (empty for public keys).
        collection: String,
        /// The printable key.
        key: String,
        /// The block of the updating transaction.
        block_num: u64,
        /// The number of the updating transaction.
        tx_num: u64,
    },
    /// The parameter could not be resolved for a reason unrelated to policy content.
    #[error("validation parameter resolution failed: {0}")]
    Execution(String),
}

impl ErrorCode for ValidationParameterError {
    fn code(&self) -> &'static str {
        match self {
            Self::UpdatedInFlight { .. } => "VP_UPDATED_IN_FLIGHT",
            Self::Execution(_) => "VP_EXECUTION_FAILURE",
        }
    }
}

/// Errors returned by a policy evaluator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// The signature set does not satisfy the policy.
    #[error("signature set did not satisfy policy: {0}")]
    Unsatisfied(String),
    /// The policy definition could not be decoded.
    #[error("malformed policy definition: {0}")]
    Malformed(String),
}

impl ErrorCode for PolicyError {
    fn code(&self) -> &'static str {
        match self {
            Self::Unsatisfied(_) => "POLICY_UNSATISFIED",
            Self::Malformed(_) => "POLICY_MALFORMED",
        }
    }
}

/// A failure to decode one layer of a transaction or its read-write set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{step} failed: {reason}")]
pub struct DecodeError {
    /// The decode step that failed, e.g. `"GetPayload"`.
    pub step: &'static str,
    /// The underlying reason.
    pub reason: String,
}

impl DecodeError {
    /// Creates a decode error for `step`.
    pub fn new(step: &'static str, reason: impl Into<String>) -> Self {
        Self {
            step,
            reason: reason.into(),
        }
    }
}

impl ErrorCode for DecodeError {
    fn code(&self) -> &'static str {
        "DECODE_FAILED"
    }
}

/// Errors related to reading committed state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::Backend(_) => "STATE_BACKEND_ERROR",
        }
    }
}
