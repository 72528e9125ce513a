// Path: crates/validator/src/codec/mod.rs

use parity_scale_codec::Decode;
use statebased_api::codec::{RwSetCodec, TransactionDecoder};
use statebased_types::app::{
    ChaincodeAction, ChaincodeActionPayload, Envelope, Payload, ProposalResponsePayload,
    Transaction, TxRwSet,
};
use statebased_types::codec::from_bytes_canonical;
use statebased_types::error::DecodeError;

fn decode_step<T: Decode>(step: &'static str, bytes: &[u8]) -> Result<T, DecodeError> {
    from_bytes_canonical(bytes).map_err(|e| DecodeError::new(step, e))
}

/// Decodes the canonical envelope chain down to the chaincode action results.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeDecoder;

impl TransactionDecoder for EnvelopeDecoder {
    fn extract_results(&self, envelope: &[u8]) -> Result<Vec<u8>, DecodeError> {
        let env: Envelope = decode_step("envelope", envelope)?;
        let payload: Payload = decode_step("payload", &env.payload)?;
        let tx: Transaction = decode_step("transaction", &payload.data)?;
        // Endorser transactions carry their chaincode action first.
        let action = tx
            .actions
            .first()
            .ok_or_else(|| DecodeError::new("transaction", "transaction has no actions"))?;
        let cap: ChaincodeActionPayload = decode_step("chaincode_action_payload", &action.payload)?;
        let prp: ProposalResponsePayload =
            decode_step("proposal_response_payload", &cap.action.proposal_response_payload)?;
        let cc_action: ChaincodeAction = decode_step("chaincode_action", &prp.extension)?;
        Ok(cc_action.results)
    }
}

/// Decodes canonically encoded read-write sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScaleRwSetCodec;

impl RwSetCodec for ScaleRwSetCodec {
    fn decode(&self, bytes: &[u8]) -> Result<TxRwSet, DecodeError> {
        decode_step("rwset", bytes)
    }
}
