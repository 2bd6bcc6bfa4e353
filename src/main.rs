mod api;
mod blockchain;
mod config;
mod error;
mod network;
mod node;
mod transaction;

use actix_web::{App, HttpServer, web};
use dotenvy::dotenv;
use log::{info, warn};
use std::io;
use std::sync::Arc;

use blockchain::ProofOfWork;
use config::NodeConfig;
use network::HttpChainSource;
use node::Node;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenv();
    env_logger::init();

    let config =
        NodeConfig::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let source = HttpChainSource::new(config.peer_timeout).map_err(io::Error::other)?;

    let node = web::Data::new(Node::new(
        config.node_id.clone(),
        ProofOfWork::new(config.difficulty),
        Arc::new(source),
        config.peer_timeout,
    ));
    for peer in &config.peers {
        if let Err(e) = node.register_node(peer) {
            warn!("ignoring configured peer: {e}");
        }
    }

    let (host, port) = (config.host.as_str(), config.port);
    println!("⛓️ Starting ledger node at http://{host}:{port}");
    info!(
        "node id {} (difficulty {}, {} peers)",
        node.id(),
        node.difficulty(),
        node.peers().len()
    );

    let state = node.clone();
    let served = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(api::init_routes)
    })
    .bind((host, port))?
    .run()
    .await;

    node.shutdown();
    served
}
