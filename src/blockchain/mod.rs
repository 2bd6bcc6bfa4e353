pub mod block;
pub mod model;
pub mod pow;
pub mod validation;

pub use block::Block;
pub use model::Blockchain;
pub use pow::ProofOfWork;
pub use validation::{is_valid_chain, validate_chain};

/// Default Proof-of-Work difficulty (leading '0' characters of the base64 digest).
/// Every node in a network must agree on this value.
pub const DEFAULT_DIFFICULTY: usize = 3;

/// Difficulty bounds accepted from configuration.
pub const DIFF_MIN: usize = 1;
pub const DIFF_MAX: usize = 6;

/// Hard-coded proof of the genesis block.
pub const GENESIS_PROOF: u64 = 100;

/// Previous-hash sentinel of the genesis block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Sender marking a block-reward transaction.
pub const REWARD_SENDER: &str = "0";

/// Units paid to the miner of each block.
pub const MINING_REWARD: u64 = 1;

#[cfg(test)]
pub(crate) mod test_support {
    use super::{Blockchain, ProofOfWork};
    use crate::transaction::Transaction;

    /// Grow `bc` by `blocks` properly mined blocks, each carrying one reward.
    pub fn mine_blocks(bc: &mut Blockchain, pow: &ProofOfWork, blocks: usize, miner: &str) {
        for _ in 0..blocks {
            let proof = pow.search(bc.last_block().proof);
            bc.submit_transaction(Transaction::reward(miner).unwrap());
            bc.append_block(proof, None);
        }
    }
}
