// Path: crates/types/src/app/envelope.rs

//! The transaction envelope chain.
//!
//! A block stores each transaction as an opaque envelope. Reaching the
//! read-write set requires peeling the layers in order:
//! `Envelope -> Payload -> Transaction -> ChaincodeActionPayload ->
//! ProposalResponsePayload -> ChaincodeAction`. Every layer is SCALE-encoded
//! inside the previous one.

use super::Endorsement;
use crate::codec::to_bytes_canonical;
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// The outermost layer of a transaction as stored in a block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Envelope {
    /// The encoded [`Payload`].
    pub payload: Vec<u8>,
    /// The creator's signature over `payload`.
    pub signature: Vec<u8>,
}

/// The signed content of an envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Payload {
    /// The encoded channel and signature headers.
    pub header: Vec<u8>,
    /// The encoded [`Transaction`].
    pub data: Vec<u8>,
}

/// A transaction: a list of actions. Endorser transactions carry exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Transaction {
    /// The actions of the transaction.
    pub actions: Vec<TransactionAction>,
}

/// One action of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TransactionAction {
    /// The encoded signature header of the action.
    pub header: Vec<u8>,
    /// The encoded [`ChaincodeActionPayload`].
    pub payload: Vec<u8>,
}

/// The payload of a chaincode action: the proposal plus its endorsed response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ChaincodeActionPayload {
    /// The encoded chaincode proposal payload.
    pub chaincode_proposal_payload: Vec<u8>,
    /// The endorsed response.
    pub action: ChaincodeEndorsedAction,
}

/// A proposal response together with the endorsements over it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ChaincodeEndorsedAction {
    /// The encoded [`ProposalResponsePayload`]; this is what endorsers sign.
    pub proposal_response_payload: Vec<u8>,
    /// The endorsements.
    pub endorsements: Vec<Endorsement>,
}

/// The response to a proposal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ProposalResponsePayload {
    /// The hash of the proposal that triggered this response.
    pub proposal_hash: Vec<u8>,
    /// The encoded [`ChaincodeAction`].
    pub extension: Vec<u8>,
}

/// The result of simulating a chaincode invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ChaincodeAction {
    /// The encoded read-write set.
    pub results: Vec<u8>,
    /// The encoded chaincode events.
    pub events: Vec<u8>,
}

impl Envelope {
    /// Assembles a single-action endorser transaction envelope around the
    /// encoded read-write set `results`.
    ///
    /// Returns the envelope together with the encoded proposal response
    /// payload, which is the message the endorsers sign.
    pub fn for_results(results: Vec<u8>, endorsements: Vec<Endorsement>) -> (Self, Vec<u8>) {
        let action = ChaincodeAction {
            results,
            events: Vec::new(),
        };
        let prp = to_bytes_canonical(&ProposalResponsePayload {
            proposal_hash: Vec::new(),
            extension: to_bytes_canonical(&action),
        });
        let cap = ChaincodeActionPayload {
            chaincode_proposal_payload: Vec::new(),
            action: ChaincodeEndorsedAction {
                proposal_response_payload: prp.clone(),
                endorsements,
            },
        };
        let tx = Transaction {
            actions: vec![TransactionAction {
                header: Vec::new(),
                payload: to_bytes_canonical(&cap),
            }],
        };
        let payload = Payload {
            header: Vec::new(),
            data: to_bytes_canonical(&tx),
        };
        let envelope = Envelope {
            payload: to_bytes_canonical(&payload),
            signature: Vec::new(),
        };
        (envelope, prp)
    }
}
