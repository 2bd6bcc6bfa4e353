use super::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use crate::transaction::Transaction;

/// In-memory chain plus the pool of transactions waiting for the next block.
///
/// No locking happens here; the owner serialises access.
#[derive(Debug, Clone)]
pub struct Blockchain {
    chain: Vec<Block>,
    pending: Vec<Transaction>,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockchain {
    /// Initialize a new blockchain with the genesis block.
    pub fn new() -> Self {
        let mut bc = Self {
            chain: Vec::new(),
            pending: Vec::new(),
        };
        bc.append_block(GENESIS_PROOF, Some(GENESIS_PREVIOUS_HASH.to_string()));
        bc
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> &Block {
        self.chain
            .last()
            .expect("Blockchain should always have at least the genesis block")
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// Queue a transaction; returns the index of the block it will land in.
    pub fn submit_transaction(&mut self, tx: Transaction) -> u64 {
        self.pending.push(tx);
        self.last_block().index + 1
    }

    /// Seal the pending pool into a new block and append it.
    ///
    /// `previous_hash` falls back to the hash of the current last block when
    /// absent or empty. The pool is drained into the block in the same step.
    pub fn append_block(&mut self, proof: u64, previous_hash: Option<String>) -> &Block {
        let previous_hash = match previous_hash.filter(|h| !h.is_empty()) {
            Some(hash) => hash,
            None => self.last_block().hash(),
        };
        let transactions = std::mem::take(&mut self.pending);
        let block = Block::new(self.chain.len() as u64 + 1, transactions, proof, previous_hash);
        self.chain.push(block);
        self.last_block()
    }

    /// Swap in a whole chain adopted from a peer. The pending pool is kept.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        debug_assert!(!chain.is_empty(), "replacement chain must not be empty");
        self.chain = chain;
    }
}
