use actix_web::{HttpResponse, Responder, get, post, web};
use log::warn;

use super::models::{NodesResponse, RegisterNodesRequest, RegisterNodesResponse, ResolveResponse};
use crate::node::Node;

/// Register peers: `{"nodes": ["http://host:port", ...]}`.
#[post("/nodes/register")]
pub async fn register_nodes(
    node: web::Data<Node>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    let Some(addresses) = body.into_inner().nodes else {
        return HttpResponse::BadRequest().body("error: please supply a valid list of nodes");
    };

    match node.register_nodes(&addresses) {
        Ok(total_nodes) => HttpResponse::Created().json(RegisterNodesResponse {
            message: "New nodes have been added".to_string(),
            total_nodes,
        }),
        Err(e) => {
            warn!("POST /nodes/register - {e}");
            HttpResponse::BadRequest().body(e.to_string())
        }
    }
}

#[get("/nodes")]
pub async fn list_nodes(node: web::Data<Node>) -> impl Responder {
    HttpResponse::Ok().json(NodesResponse {
        nodes: node.peers(),
    })
}

/// Run the longest-chain rule against every registered peer.
#[get("/nodes/resolve")]
pub async fn resolve(node: web::Data<Node>) -> impl Responder {
    let (replaced, chain) = node.resolve_consensus().await;
    let message = if replaced {
        "Our chain was replaced"
    } else {
        "Our chain is authoritative"
    };
    HttpResponse::Ok().json(ResolveResponse {
        message: message.to_string(),
        replaced,
        length: chain.len(),
        chain,
    })
}
