use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::Amount;

pub type TransactionId = Uuid;

/// Label used when a transaction is recorded without a description.
pub const UNSPECIFIED_DESCRIPTION: &str = "unspecified";

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum TransactionError {
    #[error("Invalid amount: {0} (must be a positive, finite number)")]
    InvalidAmount(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money coming in
    Income,
    /// Money going out
    #[default]
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Income => "income",
            TransactionKind::Expense => "expense",
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Ok(TransactionKind::Income),
            "expense" | "out" => Ok(TransactionKind::Expense),
            other => Err(format!("unknown transaction kind '{}'", other)),
        }
    }
}

/// Check that an amount is a finite number greater than zero.
/// Accepted amounts are returned unchanged.
pub fn validate_amount(amount: f64) -> Result<Amount, TransactionError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(TransactionError::InvalidAmount(amount))
    }
}

/// A single recorded income or expense event.
/// Transactions are immutable; the only way to change one is to remove it and record another.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    id: TransactionId,
    kind: TransactionKind,
    /// Always positive and finite
    amount: Amount,
    description: String,
    timestamp: DateTime<Utc>,
}

impl Transaction {
    /// Validate the inputs and build a transaction with a fresh id.
    pub fn create(
        kind: TransactionKind,
        amount: f64,
        description: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Self, TransactionError> {
        let amount = validate_amount(amount)?;
        let description = if description.trim().is_empty() {
            UNSPECIFIED_DESCRIPTION.to_string()
        } else {
            description.to_string()
        };

        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            description,
            timestamp,
        })
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Contribution of this transaction to the balance.
    pub fn signed_amount(&self) -> Amount {
        match self.kind {
            TransactionKind::Income => self.amount,
            TransactionKind::Expense => -self.amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_transaction() {
        let now = Utc::now();
        let tx = Transaction::create(TransactionKind::Income, 100.0, "salary", now).unwrap();

        assert_eq!(tx.kind(), TransactionKind::Income);
        assert_eq!(tx.amount(), 100.0);
        assert_eq!(tx.description(), "salary");
        assert_eq!(tx.timestamp(), now);
        assert_eq!(tx.signed_amount(), 100.0);
    }

    #[test]
    fn test_expense_signed_amount_is_negative() {
        let tx = Transaction::create(TransactionKind::Expense, 30.0, "lunch", Utc::now()).unwrap();
        assert_eq!(tx.signed_amount(), -30.0);
    }

    #[test]
    fn test_blank_description_becomes_placeholder() {
        let income = Transaction::create(TransactionKind::Income, 50.0, "", Utc::now()).unwrap();
        assert_eq!(income.description(), "unspecified");

        let blank = Transaction::create(TransactionKind::Expense, 5.0, "  \t ", Utc::now()).unwrap();
        assert_eq!(blank.description(), UNSPECIFIED_DESCRIPTION);
    }

    #[test]
    fn test_description_kept_verbatim() {
        let tx = Transaction::create(TransactionKind::Expense, 5.0, " coffee ", Utc::now()).unwrap();
        assert_eq!(tx.description(), " coffee ");
    }

    #[test]
    fn test_rejects_invalid_amounts() {
        for amount in [0.0, -0.0, -1.0, -1e-300, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = Transaction::create(TransactionKind::Expense, amount, "x", Utc::now());
            assert!(
                matches!(result, Err(TransactionError::InvalidAmount(_))),
                "amount {} should be rejected",
                amount
            );
        }
    }

    #[test]
    fn test_accepts_any_positive_finite_amount_unchanged() {
        for amount in [0.004, 1.239, 1e-9, f64::MIN_POSITIVE, 1e17, 9.3e18, f64::MAX] {
            let tx = Transaction::create(TransactionKind::Income, amount, "x", Utc::now()).unwrap();
            assert_eq!(tx.amount(), amount);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Transaction::create(TransactionKind::Income, 1.0, "a", Utc::now()).unwrap();
        let b = Transaction::create(TransactionKind::Income, 1.0, "a", Utc::now()).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("income".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!("EXPENSE".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert_eq!("in".parse::<TransactionKind>(), Ok(TransactionKind::Income));
        assert_eq!("out".parse::<TransactionKind>(), Ok(TransactionKind::Expense));
        assert!("transfer".parse::<TransactionKind>().is_err());
    }

    #[test]
    fn test_default_kind_is_expense() {
        assert_eq!(TransactionKind::default(), TransactionKind::Expense);
    }
}
