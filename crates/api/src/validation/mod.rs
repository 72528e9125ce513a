// Path: crates/api/src/validation/mod.rs

//! Defines the state-based validator lifecycle and the contract of the
//! validation-parameter manager it depends on.

use statebased_types::app::{Block, Endorsement, KeyRef};
use statebased_types::error::{TxValidationError, ValidationParameterError};

/// Resolves, tracks and finalizes key-level validation parameters.
///
/// Implementations receive concurrent calls from every transaction of the block
/// being validated and must synchronize internally.
pub trait ValidationParameterManager: Send + Sync {
    /// Returns the validation parameter in effect for the key at height
    /// `(block_num, tx_num)`. An empty result means the key has none and the
    /// chaincode endorsement policy applies.
    fn get_validation_parameter_for_key(
        &self,
        namespace: &str,
        collection: &str,
        key: KeyRef<'_>,
        block_num: u64,
        tx_num: u64,
    ) -> Result<Vec<u8>, ValidationParameterError>;

    /// Records the validation-parameter updates contained in the encoded
    /// read-write set of transaction `(block_num, tx_num)`.
    ///
    /// Called at most once per transaction of a block.
    fn extract_validation_parameter_dependency(&self, block_num: u64, tx_num: u64, rwset: &[u8]);

    /// Records the final validation outcome of the transaction for `namespace`.
    fn set_tx_validation_result(
        &self,
        namespace: &str,
        block_num: u64,
        tx_num: u64,
        err: Option<&(dyn std::error::Error + 'static)>,
    );
}

/// The three-phase lifecycle of state-based endorsement validation.
///
/// For each transaction, `pre_validate` must return before `validate` runs and
/// `post_validate` must follow with the final outcome.
pub trait StateBasedValidator: Send + Sync {
    /// Ensures validation-parameter dependencies have been extracted for every
    /// transaction of `block` up to and including `tx_num`.
    fn pre_validate(&self, tx_num: u64, block: &Block) -> Result<(), TxValidationError>;

    /// Validates the writes and reads of `namespace` in the transaction.
    #[allow(clippy::too_many_arguments)]
    fn validate(
        &self,
        namespace: &str,
        block_num: u64,
        tx_num: u64,
        rwset: &[u8],
        proposal_response_payload: &[u8],
        endorsement_policy: &[u8],
        endorsements: &[Endorsement],
    ) -> Result<(), TxValidationError>;

    /// Reports the final validation outcome of the transaction.
    fn post_validate(
        &self,
        namespace: &str,
        block_num: u64,
        tx_num: u64,
        err: Option<&(dyn std::error::Error + 'static)>,
    );
}
