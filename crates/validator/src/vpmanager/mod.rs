// Path: crates/validator/src/vpmanager/mod.rs

//! Height-aware resolution of key-level validation parameters.
//!
//! A transaction may change the validation parameter of a key that a later
//! transaction of the same block writes. The committed parameter is then
//! stale for the later transaction if, and only if, the earlier one turns out
//! valid. The manager therefore records which keys each transaction may
//! update, and a lookup waits for the outcome of every earlier updater of the
//! key before answering.

mod metadata;

pub use metadata::InMemoryMetadataSource;

use crate::codec::ScaleRwSetCodec;
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use statebased_api::codec::RwSetCodec;
use statebased_api::state::MetadataSource;
use statebased_api::validation::ValidationParameterManager;
use statebased_types::app::{KeyRef, TxRwSet};
use statebased_types::config::ValidationConfig;
use statebased_types::error::ValidationParameterError;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// (namespace, collection, key) of a key whose parameter may change.
type UpdatedKey = (String, String, Vec<u8>);

/// The parameter updates of one transaction and its reported outcomes.
#[derive(Debug)]
struct TxDependency {
    updates: HashSet<UpdatedKey>,
    /// Validity per namespace, filled in by `set_tx_validation_result`.
    results: Mutex<HashMap<String, bool>>,
    reported: Condvar,
}

impl TxDependency {
    fn new(updates: HashSet<UpdatedKey>) -> Self {
        Self {
            updates,
            results: Mutex::new(HashMap::new()),
            reported: Condvar::new(),
        }
    }

    fn updates(&self, namespace: &str, collection: &str, key: &[u8]) -> bool {
        self.updates
            .contains(&(namespace.to_string(), collection.to_string(), key.to_vec()))
    }

    /// Blocks until the outcome for `namespace` is reported and returns
    /// whether the transaction was valid.
    fn wait_for_result(&self, namespace: &str) -> bool {
        let mut results = self.results.lock();
        loop {
            if let Some(valid) = results.get(namespace) {
                return *valid;
            }
            self.reported.wait(&mut results);
        }
    }

    fn report(&self, namespace: &str, valid: bool) {
        self.results.lock().insert(namespace.to_string(), valid);
        self.reported.notify_all();
    }
}

/// Collects every key whose validation parameter the transaction may change:
/// metadata writes replace a key's metadata and deletes clear it.
fn collect_updates(rwset: &TxRwSet) -> HashSet<UpdatedKey> {
    let mut updates = HashSet::new();
    for ns in &rwset.ns_rw_sets {
        let mut add = |collection: &str, key: &[u8]| {
            updates.insert((ns.namespace.clone(), collection.to_string(), key.to_vec()));
        };
        for mw in &ns.kv_rw_set.metadata_writes {
            add("", mw.key.as_bytes());
        }
        for w in ns.kv_rw_set.writes.iter().filter(|w| w.is_delete) {
            add("", w.key.as_bytes());
        }
        for coll in &ns.coll_hashed_rw_sets {
            for mw in &coll.hashed_rw_set.metadata_writes {
                add(&coll.collection_name, &mw.key_hash);
            }
            for w in coll.hashed_rw_set.hashed_writes.iter().filter(|w| w.is_delete) {
                add(&coll.collection_name, &w.key_hash);
            }
        }
    }
    updates
}

/// The reference [`ValidationParameterManager`].
///
/// Committed parameters are read from a [`MetadataSource`]; in-block updates
/// are tracked per `(block, tx)` until the block falls out of the retention
/// window.
pub struct KeyLevelParameterManager {
    config: ValidationConfig,
    source: Arc<dyn MetadataSource>,
    codec: Arc<dyn RwSetCodec>,
    deps: DashMap<(u64, u64), Arc<TxDependency>>,
    latest_block: AtomicU64,
}

impl KeyLevelParameterManager {
    /// Creates a manager reading committed metadata from `source`.
    pub fn new(config: ValidationConfig, source: Arc<dyn MetadataSource>) -> Self {
        Self::with_codec(config, source, Arc::new(ScaleRwSetCodec))
    }

    /// Creates a manager with a custom read-write set decoder.
    pub fn with_codec(
        config: ValidationConfig,
        source: Arc<dyn MetadataSource>,
        codec: Arc<dyn RwSetCodec>,
    ) -> Self {
        Self {
            config,
            source,
            codec,
            deps: DashMap::new(),
            latest_block: AtomicU64::new(0),
        }
    }

    /// Drops bookkeeping for blocks that fell out of the retention window.
    fn prune(&self, block_num: u64) {
        let previous = self.latest_block.fetch_max(block_num, Ordering::SeqCst);
        if block_num <= previous {
            return;
        }
        let oldest = block_num.saturating_sub(self.config.retained_blocks);
        self.deps.retain(|(b, _), _| *b >= oldest);
    }

    fn dependency(&self, block_num: u64, tx_num: u64) -> Option<Arc<TxDependency>> {
        // Clone out of the map so no shard lock is held while waiting.
        self.deps.get(&(block_num, tx_num)).map(|d| Arc::clone(d.value()))
    }
}

impl ValidationParameterManager for KeyLevelParameterManager {
    fn get_validation_parameter_for_key(
        &self,
        namespace: &str,
        collection: &str,
        key: KeyRef<'_>,
        block_num: u64,
        tx_num: u64,
    ) -> Result<Vec<u8>, ValidationParameterError> {
        let key_bytes = key.as_bytes();
        for earlier in (0..tx_num).rev() {
            let Some(dep) = self.dependency(block_num, earlier) else {
                continue;
            };
            if !dep.updates(namespace, collection, key_bytes) {
                continue;
            }
            if dep.wait_for_result(namespace) {
                return Err(ValidationParameterError::UpdatedInFlight {
                    namespace: namespace.to_string(),
                    collection: collection.to_string(),
                    key: key.to_string(),
                    block_num,
                    tx_num: earlier,
                });
            }
        }

        let metadata = self
            .source
            .get_state_metadata(namespace, collection, key_bytes)
            .map_err(|e| ValidationParameterError::Execution(e.to_string()))?;

        Ok(metadata
            .into_iter()
            .flatten()
            .find(|entry| entry.name == self.config.validation_parameter_key)
            .map(|entry| entry.value)
            .unwrap_or_default())
    }

    fn extract_validation_parameter_dependency(&self, block_num: u64, tx_num: u64, rwset: &[u8]) {
        self.prune(block_num);

        // Broken read-write sets carry no updates; validation rejects them later.
        let updates = match self.codec.decode(rwset) {
            Ok(rwset) => collect_updates(&rwset),
            Err(e) => {
                tracing::debug!(target: "vpmanager", block_num, tx_num, error = %e, "discarding undecodable read-write set");
                return;
            }
        };
        if updates.is_empty() {
            return;
        }
        tracing::debug!(target: "vpmanager", block_num, tx_num, keys = updates.len(), "recorded validation parameter updates");
        self.deps
            .insert((block_num, tx_num), Arc::new(TxDependency::new(updates)));
    }

    fn set_tx_validation_result(
        &self,
        namespace: &str,
        block_num: u64,
        tx_num: u64,
        err: Option<&(dyn std::error::Error + 'static)>,
    ) {
        if let Some(dep) = self.dependency(block_num, tx_num) {
            dep.report(namespace, err.is_none());
        }
    }
}
