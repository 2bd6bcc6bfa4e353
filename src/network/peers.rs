use reqwest::Url;
use std::collections::BTreeSet;

use crate::error::LedgerError;

/// Reduce a URL-like peer address to its `host:port` component. A port left
/// implicit takes the scheme's default (80 for http, 443 for https).
///
/// Accepts `http://10.0.0.5:5000`, `https://peer.example/chain` or a bare
/// `10.0.0.5:5000` (an http scheme is assumed when none is given).
pub fn peer_host(address: &str) -> Result<String, LedgerError> {
    let trimmed = address.trim();
    let invalid = || LedgerError::InvalidNodeAddress(address.to_string());
    if trimmed.is_empty() {
        return Err(invalid());
    }

    let url = if trimmed.contains("://") {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("http://{trimmed}"))
    }
    .map_err(|_| invalid())?;

    let host = url.host_str().filter(|h| !h.is_empty()).ok_or_else(invalid)?;
    Ok(match url.port_or_known_default() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

/// Deduplicated set of known peers. Grows only through registration.
#[derive(Debug, Default, Clone)]
pub struct NodeSet {
    nodes: BTreeSet<String>,
}

impl NodeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer; returns its stored `host:port` form.
    pub fn register(&mut self, address: &str) -> Result<String, LedgerError> {
        let host = peer_host(address)?;
        self.nodes.insert(host.clone());
        Ok(host)
    }

    /// Register several peers, all or nothing.
    pub fn register_all<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<(), LedgerError> {
        let hosts = addresses
            .iter()
            .map(|a| peer_host(a.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.nodes.extend(hosts);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.nodes.iter().cloned().collect()
    }
}
