// Path: crates/validator/src/vpmanager/metadata.rs

use dashmap::DashMap;
use statebased_api::state::MetadataSource;
use statebased_types::app::KvMetadataEntry;
use statebased_types::error::StateError;

type MetadataKey = (String, String, Vec<u8>);

/// A [`MetadataSource`] backed by an in-memory map.
#[derive(Debug, Default)]
pub struct InMemoryMetadataSource {
    entries: DashMap<MetadataKey, Vec<KvMetadataEntry>>,
}

impl InMemoryMetadataSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the committed metadata of a key.
    pub fn set_metadata(
        &self,
        namespace: &str,
        collection: &str,
        key: &[u8],
        entries: Vec<KvMetadataEntry>,
    ) {
        self.entries
            .insert((namespace.into(), collection.into(), key.to_vec()), entries);
    }

    /// Removes all committed metadata of a key.
    pub fn clear_metadata(&self, namespace: &str, collection: &str, key: &[u8]) {
        self.entries
            .remove(&(namespace.into(), collection.into(), key.to_vec()));
    }
}

impl MetadataSource for InMemoryMetadataSource {
    fn get_state_metadata(
        &self,
        namespace: &str,
        collection: &str,
        key: &[u8],
    ) -> Result<Option<Vec<KvMetadataEntry>>, StateError> {
        Ok(self
            .entries
            .get(&(namespace.into(), collection.into(), key.to_vec()))
            .map(|e| e.value().clone()))
    }
}
