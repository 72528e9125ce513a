// Path: crates/validator/src/policy/mod.rs

use parity_scale_codec::DecodeLimit;
use statebased_api::policy::{PolicyEvaluator, SignatureVerifier};
use statebased_types::app::{SignaturePolicy, SignaturePolicyEnvelope, SignedData};
use statebased_types::error::PolicyError;

/// Maximum nesting depth accepted when decoding a policy definition.
const MAX_POLICY_DEPTH: u32 = 32;

/// Evaluates canonically encoded [`SignaturePolicyEnvelope`]s.
///
/// Signatures are checked by the wrapped [`SignatureVerifier`]; each verified
/// signer can satisfy at most one `SignedBy` principal of a policy.
#[derive(Debug, Clone, Default)]
pub struct SignaturePolicyEvaluator<V> {
    verifier: V,
}

impl<V: SignatureVerifier> SignaturePolicyEvaluator<V> {
    /// Creates an evaluator that checks signatures with `verifier`.
    pub fn new(verifier: V) -> Self {
        Self { verifier }
    }

    /// Returns the distinct identities whose signatures verify, in input order.
    fn valid_identities<'s>(&self, signature_set: &'s [SignedData]) -> Vec<&'s [u8]> {
        let mut identities: Vec<&[u8]> = Vec::with_capacity(signature_set.len());
        for sd in signature_set {
            if identities.contains(&sd.identity.as_slice()) {
                tracing::debug!(target: "policy", "skipping duplicate identity in signature set");
                continue;
            }
            match self.verifier.verify(&sd.identity, &sd.data, &sd.signature) {
                Ok(()) => identities.push(&sd.identity),
                Err(e) => {
                    tracing::debug!(target: "policy", error = %e, "signature verification failed")
                }
            }
        }
        identities
    }
}

/// Evaluates `rule`, marking in `used` the signers it consumed. `used` is only
/// modified when the rule is satisfied.
fn evaluate_rule(
    rule: &SignaturePolicy,
    principals: &[Vec<u8>],
    signers: &[&[u8]],
    used: &mut [bool],
) -> bool {
    match rule {
        SignaturePolicy::SignedBy(index) => {
            let Some(principal) = principals.get(*index as usize) else {
                return false;
            };
            for (signer, taken) in signers.iter().zip(used.iter_mut()) {
                if !*taken && *signer == principal.as_slice() {
                    *taken = true;
                    return true;
                }
            }
            false
        }
        SignaturePolicy::NOutOf { n, rules } => {
            let mut committed = used.to_vec();
            let mut satisfied = 0u32;
            for sub in rules {
                let mut attempt = committed.clone();
                if evaluate_rule(sub, principals, signers, &mut attempt) {
                    satisfied += 1;
                    committed = attempt;
                }
            }
            if satisfied >= *n {
                used.copy_from_slice(&committed);
                true
            } else {
                false
            }
        }
    }
}

impl<V: SignatureVerifier> PolicyEvaluator for SignaturePolicyEvaluator<V> {
    fn evaluate(&self, policy: &[u8], signature_set: &[SignedData]) -> Result<(), PolicyError> {
        let mut input = policy;
        let envelope =
            SignaturePolicyEnvelope::decode_all_with_depth_limit(MAX_POLICY_DEPTH, &mut input)
                .map_err(|e| PolicyError::Malformed(e.to_string()))?;

        let signers = self.valid_identities(signature_set);
        let mut used = vec![false; signers.len()];
        if evaluate_rule(&envelope.rule, &envelope.identities, &signers, &mut used) {
            Ok(())
        } else {
            Err(PolicyError::Unsatisfied(format!(
                "{} valid signer(s) out of {} signature(s)",
                signers.len(),
                signature_set.len()
            )))
        }
    }
}
