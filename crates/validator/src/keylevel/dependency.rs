// Path: crates/validator/src/keylevel/dependency.rs

//! Per-block deduplication of validation-parameter dependency extraction.

use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use statebased_types::app::Block;
use statebased_types::error::TxValidationError;
use std::sync::Arc;

/// The memoized outcome of extracting one transaction's dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionStatus {
    /// The transaction's read-write set was handed to the parameter manager.
    Extracted,
    /// The transaction could not be decoded; no updates were recorded for it.
    Skipped {
        /// The decode step that failed.
        step: &'static str,
    },
}

/// The extraction gates of one block, one per transaction position.
#[derive(Debug)]
struct BlockGates {
    block_num: u64,
    gates: Vec<OnceCell<ExtractionStatus>>,
}

impl BlockGates {
    fn new(block_num: u64, tx_count: usize) -> Self {
        Self {
            block_num,
            gates: (0..tx_count).map(|_| OnceCell::new()).collect(),
        }
    }
}

/// Tracks which transactions of the current block have had their
/// validation-parameter dependencies extracted.
///
/// Only the most recently seen block is tracked: observing a new block number
/// replaces the gate set. Workers validating transactions of the same block may
/// call in concurrently; blocks themselves must be presented one at a time.
#[derive(Debug, Default)]
pub(crate) struct BlockDependency {
    current: Mutex<Option<Arc<BlockGates>>>,
}

impl BlockDependency {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns the gate set for `block`, replacing the current one if it
    /// belongs to a different block.
    fn gates_for(&self, block: &Block) -> Arc<BlockGates> {
        let mut current = self.current.lock();
        if let Some(gates) = current.as_ref() {
            if gates.block_num == block.number() {
                return Arc::clone(gates);
            }
        }
        let fresh = Arc::new(BlockGates::new(block.number(), block.tx_count()));
        *current = Some(Arc::clone(&fresh));
        fresh
    }

    /// Runs `extract` for every transaction position in `0..=tx_num` of
    /// `block` that has not been extracted yet, and returns once all of them
    /// have completed.
    ///
    /// Each position's `extract` runs exactly once per block, no matter how
    /// many callers race for it; late callers block until the winner finishes.
    /// The outer lock is released before any extraction runs.
    pub(crate) fn ensure_extracted_up_to<F>(
        &self,
        block: &Block,
        tx_num: u64,
        extract: F,
    ) -> Result<(), TxValidationError>
    where
        F: Fn(u64, &[u8]) -> ExtractionStatus,
    {
        let last = usize::try_from(tx_num)
            .ok()
            .filter(|&n| n < block.tx_count())
            .ok_or_else(|| {
                TxValidationError::ExecutionFailure(format!(
                    "tx {} is out of range for block {} with {} transactions",
                    tx_num,
                    block.number(),
                    block.tx_count()
                ))
            })?;

        let gates = self.gates_for(block);
        if gates.gates.len() <= last {
            return Err(TxValidationError::ExecutionFailure(format!(
                "block {} was first seen with {} transactions, cannot extract tx {}",
                block.number(),
                gates.gates.len(),
                tx_num
            )));
        }

        let positions = gates.gates.iter().zip(block.data.iter()).take(last + 1);
        for (position, (gate, envelope)) in positions.enumerate() {
            gate.get_or_init(|| extract(position as u64, envelope));
        }
        Ok(())
    }

    /// Returns the extraction outcome of a transaction of the tracked block,
    /// or `None` if it has not been extracted or the block is not tracked.
    pub(crate) fn status(&self, block_num: u64, tx_num: u64) -> Option<ExtractionStatus> {
        let current = self.current.lock();
        let gates = current.as_ref().filter(|g| g.block_num == block_num)?;
        let index = usize::try_from(tx_num).ok()?;
        gates.gates.get(index)?.get().copied()
    }
}
