use base64::{Engine as _, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

use super::DEFAULT_DIFFICULTY;

/// Proof-of-Work puzzle: find `proof` such that
/// `base64(sha256("{last_proof}{proof}"))` starts with `difficulty` zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    difficulty: usize,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self::new(DEFAULT_DIFFICULTY)
    }
}

impl ProofOfWork {
    pub fn new(difficulty: usize) -> Self {
        Self { difficulty }
    }

    pub fn difficulty(&self) -> usize {
        self.difficulty
    }

    /// The puzzle predicate. The two proofs are joined as decimal strings,
    /// never added.
    pub fn valid_proof(&self, last_proof: u64, proof: u64) -> bool {
        let guess = format!("{last_proof}{proof}");
        let guess_hash = STANDARD.encode(Sha256::digest(guess.as_bytes()));
        guess_hash
            .chars()
            .take(self.difficulty)
            .all(|c| c == '0')
    }

    /// Linear search from 0 for the first proof accepted by [`Self::valid_proof`].
    pub fn search(&self, last_proof: u64) -> u64 {
        let mut proof = 0u64;
        while !self.valid_proof(last_proof, proof) {
            proof += 1;
        }
        proof
    }

    /// Same search as [`Self::search`], but `should_stop` is polled between
    /// candidates; returns `None` once it reports true.
    pub fn search_cancellable<F>(&self, last_proof: u64, should_stop: F) -> Option<u64>
    where
        F: Fn() -> bool,
    {
        let mut proof = 0u64;
        loop {
            if self.valid_proof(last_proof, proof) {
                return Some(proof);
            }
            if should_stop() {
                return None;
            }
            proof += 1;
        }
    }
}
