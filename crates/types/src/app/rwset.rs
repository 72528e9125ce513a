// Path: crates/types/src/app/rwset.rs

//! The namespaced read-write set produced by chaincode simulation.
//!
//! Public keys are carried in the clear. Keys of private data collections are
//! carried only as hashes, grouped per collection.

use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The committed height (block, transaction) at which a key was last written.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Encode, Decode,
)]
pub struct Version {
    /// The block number.
    pub block_num: u64,
    /// The transaction number within the block.
    pub tx_num: u64,
}

/// A public read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct KvRead {
    /// The key that was read.
    pub key: String,
    /// The version observed, `None` if the key did not exist.
    pub version: Option<Version>,
}

/// A public write or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct KvWrite {
    /// The key that was written.
    pub key: String,
    /// True if the write deletes the key.
    pub is_delete: bool,
    /// The written value (empty for deletes).
    pub value: Vec<u8>,
}

/// A single named metadata entry attached to a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct KvMetadataEntry {
    /// The entry name, e.g. the validation parameter entry.
    pub name: String,
    /// The entry value.
    pub value: Vec<u8>,
}

/// A public metadata write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct KvMetadataWrite {
    /// The key whose metadata is replaced.
    pub key: String,
    /// The complete new metadata for the key.
    pub entries: Vec<KvMetadataEntry>,
}

/// The public part of a namespace's read-write set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct KvRwSet {
    /// Public reads.
    pub reads: Vec<KvRead>,
    /// Public writes.
    pub writes: Vec<KvWrite>,
    /// Public metadata writes.
    pub metadata_writes: Vec<KvMetadataWrite>,
}

/// A read of a private key, identified by its hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct KvReadHash {
    /// The hash of the key that was read.
    pub key_hash: Vec<u8>,
    /// The version observed, `None` if the key did not exist.
    pub version: Option<Version>,
}

/// A write of a private key, identified by its hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct KvWriteHash {
    /// The hash of the key that was written.
    pub key_hash: Vec<u8>,
    /// True if the write deletes the key.
    pub is_delete: bool,
    /// The hash of the written value.
    pub value_hash: Vec<u8>,
}

/// A metadata write of a private key, identified by its hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct KvMetadataWriteHash {
    /// The hash of the key whose metadata is replaced.
    pub key_hash: Vec<u8>,
    /// The complete new metadata for the key.
    pub entries: Vec<KvMetadataEntry>,
}

/// The hashed reads and writes of a single collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct HashedRwSet {
    /// Hashed reads.
    pub hashed_reads: Vec<KvReadHash>,
    /// Hashed writes.
    pub hashed_writes: Vec<KvWriteHash>,
    /// Hashed metadata writes.
    pub metadata_writes: Vec<KvMetadataWriteHash>,
}

/// A collection's hashed read-write set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct CollHashedRwSet {
    /// The collection name.
    pub collection_name: String,
    /// The hashed reads and writes.
    pub hashed_rw_set: HashedRwSet,
    /// The hash of the private read-write set held off-chain.
    pub pvt_rw_set_hash: Vec<u8>,
}

/// The read-write set of a single namespace (chaincode).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct NsRwSet {
    /// The chaincode namespace.
    pub namespace: String,
    /// Public reads and writes.
    pub kv_rw_set: KvRwSet,
    /// Hashed reads and writes, one entry per collection.
    pub coll_hashed_rw_sets: Vec<CollHashedRwSet>,
}

impl NsRwSet {
    /// Returns true if the namespace has a public read or any collection has a
    /// hashed read.
    pub fn has_reads(&self) -> bool {
        !self.kv_rw_set.reads.is_empty()
            || self
                .coll_hashed_rw_sets
                .iter()
                .any(|c| !c.hashed_rw_set.hashed_reads.is_empty())
    }
}

/// A transaction's complete read-write set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct TxRwSet {
    /// One entry per namespace touched by the transaction.
    pub ns_rw_sets: Vec<NsRwSet>,
}

/// A borrowed reference to a ledger key within a namespace.
///
/// Public keys are UTF-8 strings; private keys are known only by their hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyRef<'a> {
    /// A public key.
    Public(&'a str),
    /// The hash of a private key.
    Hashed(&'a [u8]),
}

impl<'a> KeyRef<'a> {
    /// The raw key bytes used for lookups.
    pub fn as_bytes(&self) -> &'a [u8] {
        match self {
            KeyRef::Public(k) => k.as_bytes(),
            KeyRef::Hashed(h) => h,
        }
    }
}

impl fmt::Display for KeyRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyRef::Public(k) => f.write_str(k),
            KeyRef::Hashed(h) => write!(f, "{}", hex::encode(h)),
        }
    }
}
