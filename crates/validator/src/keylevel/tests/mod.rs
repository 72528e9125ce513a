// Path: crates/validator/src/keylevel/tests/mod.rs
//! Tests for the key-level validator lifecycle.

use super::*;
use parking_lot::Mutex;
use statebased_types::app::{
    CollHashedRwSet, Envelope, KvMetadataWrite, KvMetadataWriteHash, KvRead, KvReadHash, KvWrite,
    KvWriteHash, TxRwSet,
};
use statebased_types::codec::to_bytes_canonical;
use statebased_types::error::{PolicyError, ValidationParameterError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Passes the listed policies; records every evaluation in order.
#[derive(Default)]
struct RecordingEvaluator {
    passing: Vec<Vec<u8>>,
    evaluated: Mutex<Vec<Vec<u8>>>,
    last_signature_set: Mutex<Vec<SignedData>>,
}

impl RecordingEvaluator {
    fn passing(policies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            passing: policies.iter().map(|p| p.as_bytes().to_vec()).collect(),
            ..Default::default()
        })
    }

    fn count(&self, policy: &str) -> usize {
        self.evaluated
            .lock()
            .iter()
            .filter(|p| p.as_slice() == policy.as_bytes())
            .count()
    }

    fn total(&self) -> usize {
        self.evaluated.lock().len()
    }
}

impl PolicyEvaluator for RecordingEvaluator {
    fn evaluate(&self, policy: &[u8], signature_set: &[SignedData]) -> Result<(), PolicyError> {
        self.evaluated.lock().push(policy.to_vec());
        *self.last_signature_set.lock() = signature_set.to_vec();
        if self.passing.iter().any(|p| p == policy) {
            Ok(())
        } else {
            Err(PolicyError::Unsatisfied("mock policy not satisfied".into()))
        }
    }
}

type Lookup = (String, Vec<u8>);

/// Serves fixed parameters per (collection, key) and records all calls.
#[derive(Default)]
struct MockVpManager {
    params: HashMap<Lookup, Vec<u8>>,
    execution_failure: bool,
    lookups: Mutex<Vec<Lookup>>,
    extractions: Mutex<HashMap<(u64, u64), usize>>,
    extracted_rwsets: Mutex<Vec<Vec<u8>>>,
    results: Mutex<Vec<(String, u64, u64, Option<String>)>>,
}

impl MockVpManager {
    fn with_params(params: &[(&str, &[u8], &str)]) -> Arc<Self> {
        Arc::new(Self {
            params: params
                .iter()
                .map(|(coll, key, vp)| ((coll.to_string(), key.to_vec()), vp.as_bytes().to_vec()))
                .collect(),
            ..Default::default()
        })
    }

    fn extraction_count(&self, block_num: u64, tx_num: u64) -> usize {
        self.extractions
            .lock()
            .get(&(block_num, tx_num))
            .copied()
            .unwrap_or(0)
    }
}

impl ValidationParameterManager for MockVpManager {
    fn get_validation_parameter_for_key(
        &self,
        _: &str,
        collection: &str,
        key: KeyRef<'_>,
        _: u64,
        _: u64,
    ) -> Result<Vec<u8>, ValidationParameterError> {
        let lookup = (collection.to_string(), key.as_bytes().to_vec());
        self.lookups.lock().push(lookup.clone());
        if self.execution_failure {
            return Err(ValidationParameterError::Execution("state db unavailable".into()));
        }
        Ok(self.params.get(&lookup).cloned().unwrap_or_default())
    }

    fn extract_validation_parameter_dependency(&self, block_num: u64, tx_num: u64, rwset: &[u8]) {
        *self.extractions.lock().entry((block_num, tx_num)).or_default() += 1;
        self.extracted_rwsets.lock().push(rwset.to_vec());
    }

    fn set_tx_validation_result(
        &self,
        namespace: &str,
        block_num: u64,
        tx_num: u64,
        err: Option<&(dyn std::error::Error + 'static)>,
    ) {
        self.results.lock().push((
            namespace.to_string(),
            block_num,
            tx_num,
            err.map(|e| e.to_string()),
        ));
    }
}

fn validator(eval: &Arc<RecordingEvaluator>, vpmgr: &Arc<MockVpManager>) -> KeyLevelValidator {
    KeyLevelValidator::new(eval.clone(), vpmgr.clone())
}

fn endorsements(n: usize) -> Vec<Endorsement> {
    (0..n)
        .map(|i| Endorsement {
            endorser: format!("peer{}", i).into_bytes(),
            signature: format!("sig{}", i).into_bytes(),
        })
        .collect()
}

fn ns(name: &str) -> NsRwSet {
    NsRwSet {
        namespace: name.into(),
        ..Default::default()
    }
}

fn write(key: &str) -> KvWrite {
    KvWrite {
        key: key.into(),
        is_delete: false,
        value: b"v".to_vec(),
    }
}

fn encode(sets: Vec<NsRwSet>) -> Vec<u8> {
    to_bytes_canonical(&TxRwSet { ns_rw_sets: sets })
}

fn run(v: &KeyLevelValidator, rwset: &[u8]) -> Result<(), TxValidationError> {
    v.validate("cc1", 1, 0, rwset, b"prp", b"P0", &endorsements(2))
}

#[test]
fn writes_without_parameters_use_chaincode_policy_once() {
    let eval = RecordingEvaluator::passing(&["P0"]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);

    let mut set = ns("cc1");
    set.kv_rw_set.writes = vec![write("k1"), write("k2"), write("k3")];
    assert!(run(&v, &encode(vec![set])).is_ok());
    assert_eq!(eval.count("P0"), 1);
    assert_eq!(vpmgr.lookups.lock().len(), 3);
}

#[test]
fn failing_chaincode_policy_names_chaincode_and_height() {
    let eval = RecordingEvaluator::passing(&[]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);

    let mut set = ns("cc1");
    set.kv_rw_set.writes = vec![write("k1")];
    let err = v
        .validate("cc1", 7, 3, &encode(vec![set]), b"prp", b"P0", &endorsements(2))
        .unwrap_err();
    assert!(err.is_policy_violation());
    let msg = err.to_string();
    assert!(msg.contains("cc1") && msg.contains("7:3"), "{}", msg);
}

#[test]
fn key_level_parameter_takes_precedence() {
    let eval = RecordingEvaluator::passing(&["P0"]);
    let vpmgr = MockVpManager::with_params(&[("", b"k1", "P1")]);
    let v = validator(&eval, &vpmgr);

    let mut set = ns("cc1");
    set.kv_rw_set.writes = vec![write("k1")];
    let err = run(&v, &encode(vec![set])).unwrap_err();
    assert!(err.is_policy_violation());
    assert!(err.to_string().contains("key k1"));
    assert_eq!(eval.count("P0"), 0);

    // The parameter alone decides, even when the chaincode policy would fail.
    let eval = RecordingEvaluator::passing(&["P1"]);
    let v = validator(&eval, &vpmgr);
    let mut set = ns("cc1");
    set.kv_rw_set.writes = vec![write("k1")];
    assert!(run(&v, &encode(vec![set])).is_ok());
    assert_eq!(eval.count("P0"), 0);
}

#[test]
fn reads_require_chaincode_policy() {
    let eval = RecordingEvaluator::passing(&[]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);

    let mut public_read = ns("cc1");
    public_read.kv_rw_set.reads.push(KvRead {
        key: "k1".into(),
        version: None,
    });
    assert!(run(&v, &encode(vec![public_read])).unwrap_err().is_policy_violation());

    let mut hashed_read = ns("cc1");
    let mut coll = CollHashedRwSet {
        collection_name: "coll1".into(),
        ..Default::default()
    };
    coll.hashed_rw_set.hashed_reads.push(KvReadHash {
        key_hash: vec![9],
        version: None,
    });
    hashed_read.coll_hashed_rw_sets.push(coll);
    assert!(run(&v, &encode(vec![hashed_read])).unwrap_err().is_policy_violation());
    assert!(vpmgr.lookups.lock().is_empty());
}

#[test]
fn empty_namespace_is_trivially_valid() {
    let eval = RecordingEvaluator::passing(&[]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);

    assert!(run(&v, &encode(vec![ns("cc1")])).is_ok());
    assert!(run(&v, &encode(vec![])).is_ok());
    assert_eq!(eval.total(), 0);
}

#[test]
fn other_namespaces_are_ignored() {
    let eval = RecordingEvaluator::passing(&[]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);

    let mut other = ns("cc2");
    other.kv_rw_set.writes = vec![write("k1")];
    other.kv_rw_set.reads.push(KvRead {
        key: "k2".into(),
        version: None,
    });
    assert!(run(&v, &encode(vec![other])).is_ok());
    assert_eq!(eval.total(), 0);
}

fn mixed_namespace() -> NsRwSet {
    let mut set = ns("cc1");
    set.kv_rw_set.reads.push(KvRead {
        key: "r".into(),
        version: None,
    });
    set.kv_rw_set.writes = vec![write("w")];
    set.kv_rw_set.metadata_writes.push(KvMetadataWrite {
        key: "m".into(),
        entries: vec![],
    });
    for (name, hash, md_hash) in [("coll1", 1u8, 11u8), ("coll2", 2, 12)] {
        let mut coll = CollHashedRwSet {
            collection_name: name.into(),
            ..Default::default()
        };
        coll.hashed_rw_set.hashed_writes.push(KvWriteHash {
            key_hash: vec![hash],
            is_delete: false,
            value_hash: vec![],
        });
        coll.hashed_rw_set.metadata_writes.push(KvMetadataWriteHash {
            key_hash: vec![md_hash],
            entries: vec![],
        });
        set.coll_hashed_rw_sets.push(coll);
    }
    set
}

#[test]
fn checks_follow_write_category_order() {
    let eval = RecordingEvaluator::passing(&["P0"]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);

    assert!(run(&v, &encode(vec![mixed_namespace()])).is_ok());
    let expected: Vec<Lookup> = vec![
        ("".into(), b"w".to_vec()),
        ("".into(), b"m".to_vec()),
        ("coll1".into(), vec![1]),
        ("coll2".into(), vec![2]),
        ("coll1".into(), vec![11]),
        ("coll2".into(), vec![12]),
    ];
    assert_eq!(*vpmgr.lookups.lock(), expected);
    assert_eq!(eval.count("P0"), 1);
}

#[test]
fn first_failing_check_short_circuits() {
    let eval = RecordingEvaluator::passing(&["P0"]);
    let vpmgr = MockVpManager::with_params(&[("coll1", &[1], "P1")]);
    let v = validator(&eval, &vpmgr);

    let err = run(&v, &encode(vec![mixed_namespace()])).unwrap_err();
    assert!(err.to_string().contains("coll'coll1'"));
    assert!(err.to_string().contains("01"), "hashed key is hex encoded");
    assert_eq!(vpmgr.lookups.lock().len(), 3);
}

#[test]
fn reads_are_checked_after_all_writes() {
    let eval = RecordingEvaluator::passing(&[]);
    let vpmgr = MockVpManager::with_params(&[("", b"w", "P1")]);
    let v = validator(&eval, &vpmgr);

    let err = run(&v, &encode(vec![mixed_namespace()])).unwrap_err();
    assert!(err.is_policy_violation());
    assert!(err.to_string().contains("key w"), "{}", err);
    assert_eq!(eval.count("P0"), 0);
    assert_eq!(eval.count("P1"), 1);
}

#[test]
fn read_gate_runs_once_writes_pass() {
    let eval = RecordingEvaluator::passing(&["P1"]);
    let vpmgr = MockVpManager::with_params(&[
        ("", b"w", "P1"),
        ("", b"m", "P1"),
        ("coll1", &[1], "P1"),
        ("coll2", &[2], "P1"),
        ("coll1", &[11], "P1"),
        ("coll2", &[12], "P1"),
    ]);
    let v = validator(&eval, &vpmgr);

    let err = run(&v, &encode(vec![mixed_namespace()])).unwrap_err();
    assert!(err.to_string().contains("chaincode cc1"), "{}", err);
    assert_eq!(eval.count("P1"), 6);
    assert_eq!(eval.count("P0"), 1);
    assert_eq!(vpmgr.lookups.lock().len(), 6);
}

#[test]
fn malformed_rwset_is_a_policy_violation() {
    let eval = RecordingEvaluator::passing(&["P0"]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);

    let err = v
        .validate("cc1", 4, 2, b"\x04\x01", b"prp", b"P0", &endorsements(1))
        .unwrap_err();
    assert!(err.is_policy_violation());
    assert!(err.to_string().contains("(4,2)"));
}

#[test]
fn parameter_resolution_failure_is_an_execution_failure() {
    let eval = RecordingEvaluator::passing(&["P0"]);
    let vpmgr = Arc::new(MockVpManager {
        execution_failure: true,
        ..Default::default()
    });
    let v = validator(&eval, &vpmgr);

    let mut set = ns("cc1");
    set.kv_rw_set.writes = vec![write("k1")];
    let err = run(&v, &encode(vec![set])).unwrap_err();
    assert!(err.is_execution_failure());
    assert_eq!(eval.total(), 0);
}

#[test]
fn signature_set_has_one_entry_per_endorsement() {
    let eval = RecordingEvaluator::passing(&["P0"]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);

    let mut set = ns("cc1");
    set.kv_rw_set.writes = vec![write("k1")];
    run(&v, &encode(vec![set])).unwrap();

    let sigs = eval.last_signature_set.lock().clone();
    assert_eq!(sigs.len(), 2);
    assert_eq!(sigs[0].data, b"prppeer0".to_vec());
    assert_eq!(sigs[1].identity, b"peer1".to_vec());
    assert_eq!(sigs[1].signature, b"sig1".to_vec());
}

fn envelope(rwset: Vec<u8>) -> Vec<u8> {
    let (env, _) = Envelope::for_results(rwset, endorsements(1));
    to_bytes_canonical(&env)
}

#[test]
fn pre_validate_extracts_prefix_once_and_skips_malformed() {
    let eval = RecordingEvaluator::passing(&[]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);

    let block = Block::new(
        3,
        vec![
            envelope(encode(vec![ns("a")])),
            b"not an envelope".to_vec(),
            envelope(encode(vec![ns("c")])),
            envelope(encode(vec![ns("d")])),
        ],
    );

    v.pre_validate(2, &block).unwrap();
    assert_eq!(vpmgr.extraction_count(3, 0), 1);
    assert_eq!(vpmgr.extraction_count(3, 1), 0);
    assert_eq!(vpmgr.extraction_count(3, 2), 1);
    assert_eq!(vpmgr.extraction_count(3, 3), 0);
    assert_eq!(
        v.extraction_status(3, 1),
        Some(ExtractionStatus::Skipped { step: "envelope" })
    );
    assert_eq!(v.extraction_status(3, 3), None);

    v.pre_validate(3, &block).unwrap();
    v.pre_validate(1, &block).unwrap();
    assert_eq!(vpmgr.extraction_count(3, 0), 1);
    assert_eq!(vpmgr.extraction_count(3, 3), 1);
    assert_eq!(vpmgr.extracted_rwsets.lock()[0], encode(vec![ns("a")]));
}

#[test]
fn concurrent_pre_validate_extracts_each_tx_once() {
    let eval = RecordingEvaluator::passing(&[]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);
    let block = Block::new(
        8,
        (0..16).map(|_| envelope(encode(vec![ns("cc1")]))).collect(),
    );
    let done = AtomicUsize::new(0);

    std::thread::scope(|s| {
        for worker in 0..4u64 {
            let (v, block, vpmgr, done) = (&v, &block, &vpmgr, &done);
            s.spawn(move || {
                for tx in (0..16u64).rev().filter(|tx| tx % 4 == worker) {
                    v.pre_validate(tx, block).unwrap();
                    for earlier in 0..=tx {
                        assert_eq!(vpmgr.extraction_count(8, earlier), 1);
                    }
                    done.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });

    assert_eq!(done.load(Ordering::SeqCst), 16);
    assert!((0..16).all(|tx| vpmgr.extraction_count(8, tx) == 1));
}

#[test]
fn new_block_resets_extraction_gates() {
    let eval = RecordingEvaluator::passing(&[]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);
    let txs: Vec<Vec<u8>> = (0..2).map(|_| envelope(encode(vec![ns("cc1")]))).collect();

    v.pre_validate(1, &Block::new(10, txs.clone())).unwrap();
    v.pre_validate(1, &Block::new(11, txs)).unwrap();
    assert_eq!(vpmgr.extraction_count(10, 1), 1);
    assert_eq!(vpmgr.extraction_count(11, 0), 1);
    assert_eq!(vpmgr.extraction_count(11, 1), 1);
    assert_eq!(v.extraction_status(10, 0), None);
}

#[test]
fn pre_validate_rejects_out_of_range_tx() {
    let eval = RecordingEvaluator::passing(&[]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);

    let err = v.pre_validate(1, &Block::new(1, vec![vec![]])).unwrap_err();
    assert!(err.is_execution_failure());
    assert_eq!(vpmgr.extraction_count(1, 0), 0);
}

#[test]
fn post_validate_forwards_outcome_unchanged() {
    let eval = RecordingEvaluator::passing(&[]);
    let vpmgr = MockVpManager::with_params(&[]);
    let v = validator(&eval, &vpmgr);

    let policy_err = TxValidationError::EndorsementPolicy("bad endorsement".into());
    v.post_validate("cc1", 2, 0, None);
    v.post_validate("cc1", 2, 1, Some(&policy_err));
    let external = std::io::Error::new(std::io::ErrorKind::Other, "upstream check failed");
    v.post_validate("cc1", 2, 2, Some(&external));

    let results = vpmgr.results.lock();
    assert_eq!(results[0], ("cc1".to_string(), 2, 0, None));
    assert_eq!(results[1].3.as_deref(), Some(policy_err.to_string().as_str()));
    assert_eq!(results[2].3.as_deref(), Some("upstream check failed"));
}
