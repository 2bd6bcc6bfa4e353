use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::Block;

/// Inter-node chain exchange payload, as served by `GET /chain`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainResponse {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// Why a peer contributed no candidate chain.
#[derive(Debug, Error)]
pub enum PeerError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("peer answered with status {0}")]
    Status(u16),
    #[error("peer did not answer within {0:?}")]
    Timeout(Duration),
}

/// Read-only access to a peer's current chain.
#[async_trait]
pub trait ChainSource: Send + Sync {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainResponse, PeerError>;
}

/// Fetches `{peer}/chain` with a bounded per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpChainSource {
    client: reqwest::Client,
}

impl HttpChainSource {
    pub fn new(timeout: Duration) -> Result<Self, PeerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChainSource for HttpChainSource {
    async fn fetch_chain(&self, peer: &str) -> Result<ChainResponse, PeerError> {
        let resp = self.client.get(chain_url(peer)).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(PeerError::Status(status.as_u16()));
        }
        Ok(resp.json::<ChainResponse>().await?)
    }
}

/// Peers are stored as `host:port`; port 443 is spoken to over TLS.
fn chain_url(peer: &str) -> String {
    let scheme = if peer.ends_with(":443") { "https" } else { "http" };
    format!("{scheme}://{peer}/chain")
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_response_uses_wire_keys() {
        let json = r#"{"chain":[{"index":1,"timestamp":5,"transactions":[],"proof":100,"previousHash":"1"}],"length":1}"#;
        let resp: ChainResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.length, 1);
        assert_eq!(resp.chain[0].previous_hash, "1");
        assert_eq!(serde_json::to_string(&resp).unwrap(), json);
    }

    #[test]
    fn chain_url_follows_the_stored_port() {
        assert_eq!(chain_url("10.0.0.5:5000"), "http://10.0.0.5:5000/chain");
        assert_eq!(chain_url("peer:80"), "http://peer:80/chain");
        assert_eq!(chain_url("peer:443"), "https://peer:443/chain");
    }

    #[actix_web::test]
    async fn unreachable_peer_is_a_transport_error() {
        let source = HttpChainSource::new(Duration::from_millis(200)).unwrap();
        // port 9 (discard) on loopback is closed in test environments
        let err = source.fetch_chain("127.0.0.1:9").await.unwrap_err();
        assert!(matches!(err, PeerError::Transport(_)));
    }
}
