use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;
use thiserror::Error;

use crate::blockchain::{MINING_REWARD, REWARD_SENDER};

/// A transfer of `amount` units from `sender` to `recipient`.
///
/// Field order is part of the block hash preimage and must not change.
/// `amount` keeps its JSON number form (sign and fraction included) so
/// re-serialising a peer's block reproduces the peer's hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub sender: Sender,
    pub recipient: String,
    pub amount: Number,
}

/// Sending party. Some peers encode the reward sender as the bare number `0`
/// instead of the string `"0"`; both decode and serialise back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Sender {
    Address(String),
    Numeric(Number),
}

impl Sender {
    /// True for the block-reward sender, `"0"` or `0`.
    pub fn is_reward(&self) -> bool {
        match self {
            Sender::Address(address) => address == REWARD_SENDER,
            Sender::Numeric(n) => n.as_u64() == Some(0),
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::Address(address) => f.write_str(address),
            Sender::Numeric(n) => write!(f, "{n}"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransactionError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("field `{0}` must not be blank")]
    BlankField(&'static str),
}

impl Transaction {
    /// Build a transaction, rejecting blank parties at the boundary.
    /// There is no balance model: amounts (any sign) and senders are not
    /// checked further, and values are stored exactly as given.
    pub fn new(
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: impl Into<Number>,
    ) -> Result<Self, TransactionError> {
        let sender = sender.into();
        let recipient = recipient.into();
        if sender.trim().is_empty() {
            return Err(TransactionError::BlankField("sender"));
        }
        if recipient.trim().is_empty() {
            return Err(TransactionError::BlankField("recipient"));
        }
        Ok(Self {
            sender: Sender::Address(sender),
            recipient,
            amount: amount.into(),
        })
    }

    /// The block-reward payout credited to a miner.
    pub fn reward(recipient: impl Into<String>) -> Result<Self, TransactionError> {
        Self::new(REWARD_SENDER, recipient, MINING_REWARD)
    }
}

/// Loosely-typed submission as it arrives from a client; every field may be absent.
#[derive(Debug, Default, Deserialize)]
pub struct NewTransaction {
    pub sender: Option<String>,
    pub recipient: Option<String>,
    pub amount: Option<Number>,
}

impl TryFrom<NewTransaction> for Transaction {
    type Error = TransactionError;

    fn try_from(req: NewTransaction) -> Result<Self, Self::Error> {
        let sender = req.sender.ok_or(TransactionError::MissingField("sender"))?;
        let recipient = req
            .recipient
            .ok_or(TransactionError::MissingField("recipient"))?;
        let amount = req.amount.ok_or(TransactionError::MissingField("amount"))?;
        Transaction::new(sender, recipient, amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_parties() {
        assert_eq!(
            Transaction::new("  ", "bob", 1),
            Err(TransactionError::BlankField("sender"))
        );
        assert_eq!(
            Transaction::new("alice", "", 1),
            Err(TransactionError::BlankField("recipient"))
        );
    }

    #[test]
    fn missing_fields_are_reported_by_name() {
        let req = NewTransaction {
            sender: Some("alice".into()),
            recipient: None,
            amount: Some(3.into()),
        };
        assert_eq!(
            Transaction::try_from(req),
            Err(TransactionError::MissingField("recipient"))
        );

        let req = NewTransaction {
            sender: Some("alice".into()),
            recipient: Some("bob".into()),
            amount: None,
        };
        assert_eq!(
            Transaction::try_from(req),
            Err(TransactionError::MissingField("amount"))
        );
    }

    #[test]
    fn reward_comes_from_the_zero_sender() {
        let tx = Transaction::reward("miner").unwrap();
        assert_eq!(tx.sender, Sender::Address("0".into()));
        assert!(tx.sender.is_reward());
        assert_eq!(tx.recipient, "miner");
        assert_eq!(tx.amount, Number::from(1u64));
    }

    #[test]
    fn serializes_fields_in_declaration_order() {
        let tx = Transaction::new("a", "b", 10).unwrap();
        assert_eq!(
            serde_json::to_string(&tx).unwrap(),
            r#"{"sender":"a","recipient":"b","amount":10}"#
        );
    }

    #[test]
    fn parties_are_stored_as_given() {
        let tx = Transaction::new("alice ", " bob", 3).unwrap();
        assert_eq!(tx.sender.to_string(), "alice ");
        assert_eq!(tx.recipient, " bob");
    }

    #[test]
    fn accepts_negative_and_fractional_amounts() {
        let negative = Transaction::new("a", "b", -5i64).unwrap();
        let fractional = Transaction::new("a", "b", Number::from_f64(2.5).unwrap()).unwrap();
        assert_eq!(
            serde_json::to_string(&negative).unwrap(),
            r#"{"sender":"a","recipient":"b","amount":-5}"#
        );
        assert_eq!(
            serde_json::to_string(&fractional).unwrap(),
            r#"{"sender":"a","recipient":"b","amount":2.5}"#
        );

        let req: NewTransaction =
            serde_json::from_str(r#"{"sender":"a","recipient":"b","amount":-5}"#).unwrap();
        assert_eq!(Transaction::try_from(req).unwrap(), negative);
    }

    #[test]
    fn numeric_reward_sender_round_trips_unchanged() {
        let wire = r#"{"sender":0,"recipient":"node","amount":1}"#;
        let tx: Transaction = serde_json::from_str(wire).unwrap();
        assert_eq!(tx.sender, Sender::Numeric(Number::from(0u64)));
        assert!(tx.sender.is_reward());
        assert_eq!(serde_json::to_string(&tx).unwrap(), wire);

        let named: Transaction =
            serde_json::from_str(r#"{"sender":"alice","recipient":"b","amount":1}"#).unwrap();
        assert!(!named.sender.is_reward());
    }
}
