use thiserror::Error;

use crate::domain::TransactionError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("Invalid amount: '{0}' is not a number")]
    InvalidAmount(String),

    #[error("Invalid transaction kind: {0}")]
    InvalidKind(String),

    #[error("Invalid transaction ID: '{0}' (expected UUID)")]
    InvalidId(String),
}

impl AppError {
    /// True for every rejection of a user-entered amount, whether it failed to parse
    /// or parsed to something that is not a positive finite number.
    pub fn is_invalid_amount(&self) -> bool {
        matches!(
            self,
            AppError::InvalidAmount(_) | AppError::Transaction(TransactionError::InvalidAmount(_))
        )
    }
}
