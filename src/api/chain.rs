use actix_web::{HttpResponse, Responder, get, web};
use log::{error, warn};

use super::models::{MineResponse, ValidateResponse};
use crate::error::LedgerError;
use crate::network::ChainResponse;
use crate::node::Node;

/// Full chain in the inter-node wire format.
#[get("/chain")]
pub async fn get_chain(node: web::Data<Node>) -> impl Responder {
    let (chain, length) = node.chain();
    HttpResponse::Ok().json(ChainResponse { chain, length })
}

/// Validate the local chain.
#[get("/chain/validate")]
pub async fn validate_chain(node: web::Data<Node>) -> impl Responder {
    HttpResponse::Ok().json(ValidateResponse {
        valid: node.is_chain_valid(),
        length: node.chain().1,
        difficulty: node.difficulty(),
    })
}

/// Mine a block paying this node's id. The proof search runs on the
/// blocking pool so the server keeps answering meanwhile.
#[get("/mine")]
pub async fn mine_block(node: web::Data<Node>) -> impl Responder {
    let worker = node.clone();
    let mined = web::block(move || worker.mine(worker.id())).await;

    match mined {
        Ok(Ok(block)) => HttpResponse::Ok().json(MineResponse {
            message: "New block forged".to_string(),
            index: block.index,
            transactions: block.transactions,
            proof: block.proof,
            previous_hash: block.previous_hash,
        }),
        Ok(Err(LedgerError::StaleTip)) => {
            HttpResponse::Conflict().body("chain was replaced while mining; retry")
        }
        Ok(Err(LedgerError::MiningCancelled)) => {
            HttpResponse::ServiceUnavailable().body("node is shutting down")
        }
        Ok(Err(e)) => {
            warn!("GET /mine - {e}");
            HttpResponse::BadRequest().body(e.to_string())
        }
        Err(e) => {
            error!("GET /mine - mining worker failed: {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
