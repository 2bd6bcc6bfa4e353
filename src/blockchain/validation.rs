use thiserror::Error;

use super::{Block, ProofOfWork};

/// First broken link found in a chain. `index` is the offending block's index.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainViolation {
    #[error("block {index} does not follow block {previous}")]
    IndexGap { index: u64, previous: u64 },
    #[error("block {index} does not reference the hash of its predecessor")]
    BrokenLink { index: u64 },
    #[error("block {index} carries an invalid proof of work")]
    InvalidProof { index: u64 },
}

/// Walk every consecutive pair of `chain`: indices must be consecutive,
/// `previous_hash` must equal the predecessor's hash and the proof must solve
/// the puzzle seeded with the predecessor's proof.
///
/// Depends only on its arguments. An empty chain passes.
pub fn validate_chain(chain: &[Block], pow: &ProofOfWork) -> Result<(), ChainViolation> {
    for pair in chain.windows(2) {
        let (prev, block) = (&pair[0], &pair[1]);

        if prev.index.checked_add(1) != Some(block.index) {
            return Err(ChainViolation::IndexGap {
                index: block.index,
                previous: prev.index,
            });
        }

        if block.previous_hash != prev.hash() {
            return Err(ChainViolation::BrokenLink { index: block.index });
        }

        if !pow.valid_proof(prev.proof, block.proof) {
            return Err(ChainViolation::InvalidProof { index: block.index });
        }
    }
    Ok(())
}

pub fn is_valid_chain(chain: &[Block], pow: &ProofOfWork) -> bool {
    validate_chain(chain, pow).is_ok()
}
