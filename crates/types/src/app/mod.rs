// Path: crates/types/src/app/mod.rs

//! Core application-level data structures: blocks, endorsements and the
//! signed data derived from them.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Transaction envelope chain decoded on the dependency-extraction path.
pub mod envelope;
/// Signature-policy definitions consumed by the reference policy evaluator.
pub mod policy;
/// Namespaced public and hashed read-write sets.
pub mod rwset;

pub use envelope::*;
pub use policy::*;
pub use rwset::*;

/// The header of a committed block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct BlockHeader {
    /// The monotonically increasing block number.
    pub number: u64,
}

/// A committed block: an ordered sequence of raw transaction envelopes.
///
/// The position of an envelope in `data` is its transaction number, and that
/// order is the causal order in which policy updates take effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Block {
    /// The block header.
    pub header: BlockHeader,
    /// Raw envelope bytes, one entry per transaction position.
    pub data: Vec<Vec<u8>>,
}

impl Block {
    /// Creates a block from its number and raw envelopes.
    pub fn new(number: u64, data: Vec<Vec<u8>>) -> Self {
        Self {
            header: BlockHeader { number },
            data,
        }
    }

    /// The block number.
    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// The number of transactions in the block.
    pub fn tx_count(&self) -> usize {
        self.data.len()
    }
}

/// A peer's endorsement of a proposal response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Endorsement {
    /// The serialized identity of the endorsing peer.
    pub endorser: Vec<u8>,
    /// The endorser's signature over `proposal_response_payload || endorser`.
    pub signature: Vec<u8>,
}

/// One (message, identity, signature) triple handed to the policy evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedData {
    /// The bytes that were signed.
    pub data: Vec<u8>,
    /// The identity that produced the signature.
    pub identity: Vec<u8>,
    /// The signature over `data`.
    pub signature: Vec<u8>,
}

impl SignedData {
    /// Builds the signed data for one endorsement.
    ///
    /// The signed bytes are the proposal response payload followed by the
    /// endorser's identity bytes.
    pub fn from_endorsement(proposal_response_payload: &[u8], endorsement: &Endorsement) -> Self {
        let mut data =
            Vec::with_capacity(proposal_response_payload.len() + endorsement.endorser.len());
        data.extend_from_slice(proposal_response_payload);
        data.extend_from_slice(&endorsement.endorser);
        Self {
            data,
            identity: endorsement.endorser.clone(),
            signature: endorsement.signature.clone(),
        }
    }
}
