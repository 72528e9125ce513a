// Path: crates/validator/src/keylevel/policy_checker.rs

use statebased_api::policy::PolicyEvaluator;
use statebased_api::validation::ValidationParameterManager;
use statebased_telemetry::validation_metrics;
use statebased_types::app::{KeyRef, SignedData};
use statebased_types::error::{TxValidationError, ValidationParameterError};

/// Decides, key by key, whether a transaction's endorsements satisfy the
/// applicable policy: the key's validation parameter if one is set, otherwise
/// the chaincode endorsement policy.
///
/// A checker belongs to exactly one transaction. Once the chaincode policy has
/// been satisfied it is not evaluated again for the rest of that transaction.
pub struct PolicyChecker<'a> {
    namespace: &'a str,
    block_num: u64,
    tx_num: u64,
    cc_ep: &'a [u8],
    signature_set: &'a [SignedData],
    policy_support: &'a dyn PolicyEvaluator,
    vpmgr: &'a dyn ValidationParameterManager,
    cc_ep_checked: bool,
}

impl<'a> PolicyChecker<'a> {
    /// Creates a checker for transaction `(block_num, tx_num)` of `namespace`.
    pub fn new(
        namespace: &'a str,
        block_num: u64,
        tx_num: u64,
        cc_ep: &'a [u8],
        signature_set: &'a [SignedData],
        policy_support: &'a dyn PolicyEvaluator,
        vpmgr: &'a dyn ValidationParameterManager,
    ) -> Self {
        Self {
            namespace,
            block_num,
            tx_num,
            cc_ep,
            signature_set,
            policy_support,
            vpmgr,
            cc_ep_checked: false,
        }
    }

    /// Requires the chaincode endorsement policy to hold. Evaluated at most
    /// once; later calls succeed immediately.
    pub fn check_cc_ep(&mut self) -> Result<(), TxValidationError> {
        if self.cc_ep_checked {
            return Ok(());
        }

        validation_metrics().inc_policy_evaluations("chaincode");
        self.policy_support
            .evaluate(self.cc_ep, self.signature_set)
            .map_err(|e| {
                TxValidationError::EndorsementPolicy(format!(
                    "validation of endorsement policy for chaincode {} in tx {}:{} failed: {}",
                    self.namespace, self.block_num, self.tx_num, e
                ))
            })?;

        self.cc_ep_checked = true;
        Ok(())
    }

    /// Requires the policy guarding `key` in `collection` to hold.
    pub fn check_key_or_cc_ep(
        &mut self,
        collection: &str,
        key: KeyRef<'_>,
    ) -> Result<(), TxValidationError> {
        let vp = self
            .vpmgr
            .get_validation_parameter_for_key(
                self.namespace,
                collection,
                key,
                self.block_num,
                self.tx_num,
            )
            .map_err(|e| match e {
                // Stale parameters invalidate the transaction; they are not retried.
                ValidationParameterError::UpdatedInFlight { .. } => {
                    TxValidationError::EndorsementPolicy(e.to_string())
                }
                ValidationParameterError::Execution(_) => {
                    TxValidationError::ExecutionFailure(e.to_string())
                }
            })?;

        if vp.is_empty() {
            return self.check_cc_ep();
        }

        tracing::debug!(
            target: "keylevel",
            namespace = self.namespace,
            collection,
            %key,
            "evaluating key-level validation parameter"
        );
        validation_metrics().inc_policy_evaluations("key_level");
        self.policy_support
            .evaluate(&vp, self.signature_set)
            .map_err(|e| {
                TxValidationError::EndorsementPolicy(format!(
                    "validation of key {} (coll'{}':ns'{}') in tx {}:{} failed: {}",
                    key, collection, self.namespace, self.block_num, self.tx_num, e
                ))
            })
    }
}
