use actix_web::rt::time::timeout;
use futures::future::join_all;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

use super::{ChainResponse, ChainSource, PeerError};
use crate::blockchain::{Block, ProofOfWork, validate_chain};

/// Longest-valid-chain selection across peers.
pub struct Resolver {
    source: Arc<dyn ChainSource>,
    peer_timeout: Duration,
    pow: ProofOfWork,
}

impl Resolver {
    pub fn new(source: Arc<dyn ChainSource>, peer_timeout: Duration, pow: ProofOfWork) -> Self {
        Self {
            source,
            peer_timeout,
            pow,
        }
    }

    async fn fetch(&self, peer: &str) -> Result<ChainResponse, PeerError> {
        match timeout(self.peer_timeout, self.source.fetch_chain(peer)).await {
            Ok(result) => result,
            Err(_) => Err(PeerError::Timeout(self.peer_timeout)),
        }
    }

    /// Query every peer concurrently and wait for all of them (or their
    /// timeouts), then return the longest valid chain strictly longer than
    /// `local_len`. Failed, slow or invalid peers are skipped.
    pub async fn best_candidate(&self, peers: &[String], local_len: usize) -> Option<Vec<Block>> {
        let results = join_all(peers.iter().map(|peer| async move {
            (peer, self.fetch(peer).await)
        }))
        .await;

        let mut max_length = local_len;
        let mut best = None;
        for (peer, result) in results {
            let resp = match result {
                Ok(resp) => resp,
                Err(e) => {
                    warn!("CONSENSUS - peer {peer} skipped: {e}");
                    continue;
                }
            };

            if resp.length != resp.chain.len() {
                warn!(
                    "CONSENSUS - peer {peer} reported length {} but sent {} blocks",
                    resp.length,
                    resp.chain.len()
                );
                continue;
            }
            if resp.length <= max_length {
                debug!(
                    "CONSENSUS - peer {peer} chain ({}) not longer than {}",
                    resp.length, max_length
                );
                continue;
            }
            if let Err(violation) = validate_chain(&resp.chain, &self.pow) {
                warn!("CONSENSUS - peer {peer} sent an invalid chain: {violation}");
                continue;
            }

            info!(
                "CONSENSUS - peer {peer} offers a longer valid chain ({} > {})",
                resp.length, max_length
            );
            max_length = resp.length;
            best = Some(resp.chain);
        }
        best
    }
}
