use thiserror::Error;

use crate::transaction::TransactionError;

/// Failures surfaced by the ledger engine to its callers.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("invalid node address `{0}`")]
    InvalidNodeAddress(String),

    /// The chain was replaced while a proof was being searched; the result
    /// would no longer extend the tip and was discarded.
    #[error("chain tip changed while mining; block discarded")]
    StaleTip,

    #[error("mining cancelled")]
    MiningCancelled,
}
