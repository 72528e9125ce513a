// Path: crates/types/src/app/policy.rs

//! Signature-policy definitions.
//!
//! Endorsement policies and key-level validation parameters travel as opaque
//! bytes. The reference evaluator interprets those bytes as a canonically
//! encoded [`SignaturePolicyEnvelope`].

use crate::codec::to_bytes_canonical;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// A boolean rule over the principals of a [`SignaturePolicyEnvelope`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum SignaturePolicy {
    /// Satisfied by a valid signature from `identities[index]`.
    SignedBy(u32),
    /// Satisfied when at least `n` of `rules` are satisfied.
    NOutOf {
        /// The threshold.
        n: u32,
        /// The sub-rules.
        rules: Vec<SignaturePolicy>,
    },
}

/// A signature policy together with the principals it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct SignaturePolicyEnvelope {
    /// The policy format version.
    pub version: u32,
    /// The rule tree.
    pub rule: SignaturePolicy,
    /// The serialized identities referenced by `SignedBy` indices.
    pub identities: Vec<Vec<u8>>,
}

impl SignaturePolicyEnvelope {
    /// A policy satisfied by `n` distinct signers out of `identities`.
    pub fn n_out_of(n: u32, identities: Vec<Vec<u8>>) -> Self {
        let rules = (0..identities.len() as u32)
            .map(SignaturePolicy::SignedBy)
            .collect();
        Self {
            version: 0,
            rule: SignaturePolicy::NOutOf { n, rules },
            identities,
        }
    }

    /// The canonical byte encoding of the policy.
    pub fn to_bytes(&self) -> Vec<u8> {
        to_bytes_canonical(self)
    }
}
