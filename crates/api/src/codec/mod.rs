// Path: crates/api/src/codec/mod.rs

//! Defines the decoding contracts for block transactions.

use statebased_types::app::TxRwSet;
use statebased_types::error::DecodeError;

/// Extracts the chaincode action results from a raw block transaction.
pub trait TransactionDecoder: Send + Sync {
    /// Decodes `envelope` and returns the encoded read-write set of its
    /// chaincode action.
    fn extract_results(&self, envelope: &[u8]) -> Result<Vec<u8>, DecodeError>;
}

/// Decodes an encoded read-write set.
pub trait RwSetCodec: Send + Sync {
    /// Decodes `bytes` into a namespaced read-write set.
    fn decode(&self, bytes: &[u8]) -> Result<TxRwSet, DecodeError>;
}
