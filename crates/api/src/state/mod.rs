// Path: crates/api/src/state/mod.rs

//! Read access to committed key metadata.

use statebased_types::app::KvMetadataEntry;
use statebased_types::error::StateError;

/// A read-only view of the metadata committed for ledger keys.
///
/// `collection` is empty for public keys; for private keys `key` is the key hash.
pub trait MetadataSource: Send + Sync {
    /// Returns the committed metadata of the key, or `None` if it has none.
    fn get_state_metadata(
        &self,
        namespace: &str,
        collection: &str,
        key: &[u8],
    ) -> Result<Option<Vec<KvMetadataEntry>>, StateError>;
}
