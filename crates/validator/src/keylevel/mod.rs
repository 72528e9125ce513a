// Path: crates/validator/src/keylevel/mod.rs

//! Key-level endorsement validation.
//!
//! Each transaction goes through three phases:
//! 1. `pre_validate`: validation-parameter updates of every transaction up to
//!    and including this one are extracted, so parameters written earlier in
//!    the block are known before this transaction is judged.
//! 2. `validate`: every write of the chaincode's namespace is checked against
//!    its key-level parameter or the chaincode endorsement policy; reads require
//!    the chaincode endorsement policy.
//! 3. `post_validate`: the final outcome is reported to the parameter manager.

mod dependency;
mod policy_checker;

pub use dependency::ExtractionStatus;
pub use policy_checker::PolicyChecker;

use crate::codec::{EnvelopeDecoder, ScaleRwSetCodec};
use dependency::BlockDependency;
use statebased_api::codec::{RwSetCodec, TransactionDecoder};
use statebased_api::policy::PolicyEvaluator;
use statebased_api::validation::{StateBasedValidator, ValidationParameterManager};
use statebased_telemetry::validation_metrics;
use statebased_types::app::{Block, Endorsement, KeyRef, NsRwSet, SignedData};
use statebased_types::error::{ErrorCode, TxValidationError};
use std::sync::Arc;

/// Validates writes against key-level validation parameters, falling back to
/// the chaincode endorsement policy for keys without one.
pub struct KeyLevelValidator {
    vpmgr: Arc<dyn ValidationParameterManager>,
    policy_support: Arc<dyn PolicyEvaluator>,
    decoder: Arc<dyn TransactionDecoder>,
    codec: Arc<dyn RwSetCodec>,
    block_dep: BlockDependency,
}

impl KeyLevelValidator {
    /// Creates a validator that decodes transactions with the canonical
    /// envelope and read-write set codecs.
    pub fn new(
        policy_support: Arc<dyn PolicyEvaluator>,
        vpmgr: Arc<dyn ValidationParameterManager>,
    ) -> Self {
        Self::with_codecs(
            policy_support,
            vpmgr,
            Arc::new(EnvelopeDecoder),
            Arc::new(ScaleRwSetCodec),
        )
    }

    /// Creates a validator with custom transaction and read-write set decoders.
    pub fn with_codecs(
        policy_support: Arc<dyn PolicyEvaluator>,
        vpmgr: Arc<dyn ValidationParameterManager>,
        decoder: Arc<dyn TransactionDecoder>,
        codec: Arc<dyn RwSetCodec>,
    ) -> Self {
        Self {
            vpmgr,
            policy_support,
            decoder,
            codec,
            block_dep: BlockDependency::new(),
        }
    }

    /// Returns the extraction outcome of a transaction of the block currently
    /// being validated, or `None` if it has not been extracted.
    pub fn extraction_status(&self, block_num: u64, tx_num: u64) -> Option<ExtractionStatus> {
        self.block_dep.status(block_num, tx_num)
    }

    fn extract_dependencies_for_tx(
        &self,
        block_num: u64,
        tx_num: u64,
        envelope: &[u8],
    ) -> ExtractionStatus {
        match self.decoder.extract_results(envelope) {
            Ok(results) => {
                self.vpmgr
                    .extract_validation_parameter_dependency(block_num, tx_num, &results);
                ExtractionStatus::Extracted
            }
            Err(e) => {
                tracing::warn!(
                    target: "keylevel",
                    step = e.step,
                    error = %e.reason,
                    "while decoding {} got error, skipping tx at height ({},{})",
                    e.step,
                    block_num,
                    tx_num
                );
                validation_metrics().inc_extraction_skipped(e.step);
                ExtractionStatus::Skipped { step: e.step }
            }
        }
    }
}

/// Checks every write and read of one namespace, in the order
/// public writes, public metadata writes, hashed writes per collection, hashed
/// metadata writes per collection, then reads. The first failure wins.
fn validate_namespace(
    ns: &NsRwSet,
    checker: &mut PolicyChecker<'_>,
) -> Result<(), TxValidationError> {
    for write in &ns.kv_rw_set.writes {
        checker.check_key_or_cc_ep("", KeyRef::Public(&write.key))?;
    }
    for md_write in &ns.kv_rw_set.metadata_writes {
        checker.check_key_or_cc_ep("", KeyRef::Public(&md_write.key))?;
    }
    for coll in &ns.coll_hashed_rw_sets {
        for write in &coll.hashed_rw_set.hashed_writes {
            checker.check_key_or_cc_ep(&coll.collection_name, KeyRef::Hashed(&write.key_hash))?;
        }
    }
    for coll in &ns.coll_hashed_rw_sets {
        for md_write in &coll.hashed_rw_set.metadata_writes {
            checker
                .check_key_or_cc_ep(&coll.collection_name, KeyRef::Hashed(&md_write.key_hash))?;
        }
    }

    // Reads are always gated by the chaincode policy: a transaction that only
    // reads a key never reaches a key-level check.
    if ns.has_reads() {
        checker.check_cc_ep()?;
    }
    Ok(())
}

impl StateBasedValidator for KeyLevelValidator {
    fn pre_validate(&self, tx_num: u64, block: &Block) -> Result<(), TxValidationError> {
        let block_num = block.number();
        self.block_dep
            .ensure_extracted_up_to(block, tx_num, |position, envelope| {
                self.extract_dependencies_for_tx(block_num, position, envelope)
            })
    }

    fn validate(
        &self,
        namespace: &str,
        block_num: u64,
        tx_num: u64,
        rwset: &[u8],
        proposal_response_payload: &[u8],
        endorsement_policy: &[u8],
        endorsements: &[Endorsement],
    ) -> Result<(), TxValidationError> {
        let signature_set: Vec<SignedData> = endorsements
            .iter()
            .map(|e| SignedData::from_endorsement(proposal_response_payload, e))
            .collect();

        let mut checker = PolicyChecker::new(
            namespace,
            block_num,
            tx_num,
            endorsement_policy,
            &signature_set,
            self.policy_support.as_ref(),
            self.vpmgr.as_ref(),
        );

        let rwset = self.codec.decode(rwset).map_err(|e| {
            TxValidationError::EndorsementPolicy(format!(
                "read-write set decode failed on tx ({},{}) of chaincode {}: {}",
                block_num, tx_num, namespace, e
            ))
        })?;

        // Other namespaces are validated by their own chaincode's rules.
        for ns in rwset.ns_rw_sets.iter().filter(|ns| ns.namespace == namespace) {
            validate_namespace(ns, &mut checker)?;
        }
        Ok(())
    }

    fn post_validate(
        &self,
        namespace: &str,
        block_num: u64,
        tx_num: u64,
        err: Option<&(dyn std::error::Error + 'static)>,
    ) {
        let outcome = match err {
            None => "VALID",
            Some(e) => e
                .downcast_ref::<TxValidationError>()
                .map_or("EXTERNAL_ERROR", |e| e.code()),
        };
        tracing::debug!(target: "keylevel", namespace, block_num, tx_num, outcome, "reporting validation result");
        validation_metrics().inc_tx_outcome(outcome);
        self.vpmgr
            .set_tx_validation_result(namespace, block_num, tx_num, err);
    }
}

#[cfg(test)]
mod tests;
