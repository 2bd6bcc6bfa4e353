use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// A sealed block. Field order (and the camelCase key names) form the
/// canonical serialization that [`Block::hash`] digests, so peers
/// exchanging JSON chains compute identical hashes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub index: u64,
    pub timestamp: i64, // Unix epoch millis (UTC)
    pub transactions: Vec<Transaction>,
    pub proof: u64,
    pub previous_hash: String,
}

impl Block {
    /// Create a block stamped with the current time.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            timestamp: Utc::now().timestamp_millis(),
            transactions,
            proof,
            previous_hash,
        }
    }

    /// SHA-256 of the block's canonical JSON, base64 (standard alphabet) encoded.
    pub fn hash(&self) -> String {
        let preimage = serde_json::to_vec(self).expect("serialize block");
        let digest = Sha256::digest(&preimage);
        STANDARD.encode(digest)
    }
}

#[cfg(test)]
mod tests {
    use super::Block;
    use crate::transaction::Transaction;

    fn sample() -> Block {
        Block {
            index: 2,
            timestamp: 1_700_000_000_000,
            transactions: vec![
                Transaction::new("alice", "bob", 10).unwrap(),
                Transaction::reward("miner").unwrap(),
            ],
            proof: 35_293,
            previous_hash: "abc".into(),
        }
    }

    #[test]
    fn canonical_form_has_fixed_key_order() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"index":2,"timestamp":1700000000000,"transactions":[{"sender":"alice","recipient":"bob","amount":10},{"sender":"0","recipient":"miner","amount":1}],"proof":35293,"previousHash":"abc"}"#
        );
    }

    #[test]
    fn hash_is_deterministic() {
        let b = sample();
        assert_eq!(b.hash(), b.hash());
        assert_eq!(b.hash(), b.clone().hash());
        // 32-byte digest in padded base64
        assert_eq!(b.hash().len(), 44);
    }

    #[test]
    fn hash_covers_every_field() {
        let base = sample().hash();

        let mut b = sample();
        b.timestamp += 1;
        assert_ne!(base, b.hash());

        let mut b = sample();
        b.transactions.pop();
        assert_ne!(base, b.hash());

        let mut b = sample();
        b.previous_hash.push('x');
        assert_ne!(base, b.hash());
    }

    #[test]
    fn round_trips_through_peer_json() {
        let b = sample();
        let wire = serde_json::to_string(&b).unwrap();
        let back: Block = serde_json::from_str(&wire).unwrap();
        assert_eq!(back.hash(), b.hash());
    }
}
