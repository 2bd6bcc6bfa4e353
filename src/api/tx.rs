use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, warn};

use super::models::{NewTxResponse, PendingResponse};
use crate::node::Node;
use crate::transaction::{NewTransaction, Transaction};

/// Queue a transaction for the next mined block.
#[post("/transactions/new")]
pub async fn post_transaction(
    node: web::Data<Node>,
    body: web::Json<NewTransaction>,
) -> impl Responder {
    let tx = match Transaction::try_from(body.into_inner()) {
        Ok(tx) => tx,
        Err(e) => {
            warn!("POST /transactions/new - rejected: {e}");
            return HttpResponse::BadRequest().body(e.to_string());
        }
    };
    debug!(
        "POST /transactions/new - {} -> {} ({})",
        tx.sender, tx.recipient, tx.amount
    );

    let index = node.submit_transaction(tx);
    HttpResponse::Created().json(NewTxResponse {
        message: format!("Transaction will be added to block {index}"),
        index,
    })
}

/// List transactions waiting for the next block.
#[get("/transactions/pending")]
pub async fn get_pending(node: web::Data<Node>) -> impl Responder {
    let transactions = node.pending_transactions();
    HttpResponse::Ok().json(PendingResponse {
        size: transactions.len(),
        transactions,
    })
}
