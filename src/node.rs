use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::blockchain::{Block, Blockchain, ProofOfWork, is_valid_chain};
use crate::error::LedgerError;
use crate::network::{ChainSource, NodeSet, Resolver};
use crate::transaction::Transaction;

/// The ledger engine owned by the service layer and shared with every
/// request handler.
///
/// Lock order: `miner` before `ledger`. `peers` is never held together with
/// `ledger`.
pub struct Node {
    id: String,
    pow: ProofOfWork,
    ledger: Mutex<Blockchain>,
    /// Serialises mine requests for the whole read-tip / search / seal cycle.
    miner: Mutex<()>,
    peers: Mutex<NodeSet>,
    resolver: Resolver,
    shutting_down: AtomicBool,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        pow: ProofOfWork,
        source: Arc<dyn ChainSource>,
        peer_timeout: Duration,
    ) -> Self {
        Self {
            id: id.into(),
            pow,
            ledger: Mutex::new(Blockchain::new()),
            miner: Mutex::new(()),
            peers: Mutex::new(NodeSet::new()),
            resolver: Resolver::new(source, peer_timeout, pow),
            shutting_down: AtomicBool::new(false),
        }
    }

    /// This node's reward address.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn difficulty(&self) -> usize {
        self.pow.difficulty()
    }

    /// Queue a transaction for the next block; returns that block's index.
    pub fn submit_transaction(&self, tx: Transaction) -> u64 {
        let mut ledger = self.ledger.lock().expect("mutex poisoned");
        let index = ledger.submit_transaction(tx);
        debug!("POOL - {} pending, next block #{index}", ledger.pending().len());
        index
    }

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        let ledger = self.ledger.lock().expect("mutex poisoned");
        ledger.pending().to_vec()
    }

    /// Search a proof for the current tip, credit `reward_address` and seal
    /// the pending pool into a new block.
    ///
    /// CPU bound; call from a blocking worker. The chain lock is released
    /// during the search, so submissions and reads proceed meanwhile. If a
    /// consensus replacement moved the tip in the meantime the result is
    /// discarded with [`LedgerError::StaleTip`] and nothing is credited.
    pub fn mine(&self, reward_address: &str) -> Result<Block, LedgerError> {
        let reward = Transaction::reward(reward_address)?;
        let _miner = self.miner.lock().expect("mutex poisoned");

        let tip = {
            let ledger = self.ledger.lock().expect("mutex poisoned");
            ledger.last_block().clone()
        };
        debug!(
            "MINER - searching proof on block #{} (difficulty {})",
            tip.index,
            self.pow.difficulty()
        );

        let proof = self
            .pow
            .search_cancellable(tip.proof, || self.shutting_down.load(Ordering::Relaxed))
            .ok_or(LedgerError::MiningCancelled)?;

        self.seal_on(&tip, proof, reward)
    }

    /// Append a block solved against `tip`, crediting `reward`, provided
    /// `tip` is still the last block. Pool and chain change together or not
    /// at all.
    fn seal_on(&self, tip: &Block, proof: u64, reward: Transaction) -> Result<Block, LedgerError> {
        let mut ledger = self.ledger.lock().expect("mutex poisoned");
        if ledger.last_block() != tip {
            warn!(
                "MINER - tip moved from block #{} while mining; proof {proof} discarded",
                tip.index
            );
            return Err(LedgerError::StaleTip);
        }
        ledger.submit_transaction(reward);
        let block = ledger.append_block(proof, Some(tip.hash())).clone();
        let transfers = block
            .transactions
            .iter()
            .filter(|t| !t.sender.is_reward())
            .count();
        info!(
            "MINER - sealed block #{} (proof={}, transfers={transfers})",
            block.index, block.proof
        );
        Ok(block)
    }

    /// Snapshot of the chain and its length.
    pub fn chain(&self) -> (Vec<Block>, usize) {
        let ledger = self.ledger.lock().expect("mutex poisoned");
        (ledger.chain().to_vec(), ledger.len())
    }

    /// Check the local chain with the same rules applied to peer chains.
    pub fn is_chain_valid(&self) -> bool {
        let ledger = self.ledger.lock().expect("mutex poisoned");
        is_valid_chain(ledger.chain(), &self.pow)
    }

    /// Register one peer; returns the stored `host:port`.
    pub fn register_node(&self, address: &str) -> Result<String, LedgerError> {
        let host = self.peers.lock().expect("mutex poisoned").register(address)?;
        info!("NODES - registered peer {host}");
        Ok(host)
    }

    /// Register a batch of peers, rejecting the whole batch on a bad address.
    pub fn register_nodes<S: AsRef<str>>(&self, addresses: &[S]) -> Result<Vec<String>, LedgerError> {
        let mut peers = self.peers.lock().expect("mutex poisoned");
        peers.register_all(addresses)?;
        info!("NODES - {} known peers", peers.len());
        Ok(peers.to_vec())
    }

    pub fn peers(&self) -> Vec<String> {
        self.peers.lock().expect("mutex poisoned").to_vec()
    }

    /// Adopt the longest valid peer chain if it beats ours.
    ///
    /// All peers are consulted before deciding. The length comparison is
    /// repeated under the chain lock, so a block mined during the fan-out
    /// is never rolled back by an equally long candidate.
    pub async fn resolve_consensus(&self) -> (bool, Vec<Block>) {
        let peers = {
            let nodes = self.peers.lock().expect("mutex poisoned");
            if nodes.is_empty() {
                debug!("CONSENSUS - no peers registered; keeping local chain");
            }
            nodes.to_vec()
        };
        let local_len = self.ledger.lock().expect("mutex poisoned").len();

        let candidate = self.resolver.best_candidate(&peers, local_len).await;

        let mut ledger = self.ledger.lock().expect("mutex poisoned");
        let replaced = match candidate {
            Some(chain) if chain.len() > ledger.len() => {
                info!(
                    "CONSENSUS - replacing local chain ({} blocks) with {} blocks",
                    ledger.len(),
                    chain.len()
                );
                ledger.replace_chain(chain);
                true
            }
            Some(chain) => {
                warn!(
                    "CONSENSUS - candidate ({} blocks) no longer beats local chain ({})",
                    chain.len(),
                    ledger.len()
                );
                false
            }
            None => false,
        };
        (replaced, ledger.chain().to_vec())
    }

    /// Abort any in-flight proof search and refuse new ones.
    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::Relaxed);
    }
}
