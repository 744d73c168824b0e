use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
    Amount, Ledger, LedgerEvent, Listing, Transaction, TransactionId, TransactionKind,
    format_amount,
};

use super::AppError;

pub const DEFAULT_CURRENCY_SYMBOL: &str = "¥";

/// Presentation settings for a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Prefix used when rendering amounts (e.g. "¥", "$", "€")
    pub currency_symbol: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

/// Everything a front-end needs to draw the ledger screen, captured at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub generated_at: DateTime<Utc>,
    pub currency_symbol: String,
    pub balance: Amount,
    pub income_total: Amount,
    pub expense_total: Amount,
    /// Display order, most recent first
    pub transactions: Vec<Transaction>,
}

/// Application service owning the ledger for the lifetime of one UI session.
/// This is the primary interface for any front-end (CLI, TUI, HTTP, ...).
#[derive(Debug)]
pub struct LedgerSession {
    ledger: Ledger,
    config: SessionConfig,
}

impl LedgerSession {
    pub fn new(config: SessionConfig) -> Self {
        let mut ledger = Ledger::new();
        ledger.subscribe(log_ledger_event);
        Self { ledger, config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Register an observer for ledger mutations (e.g. to trigger a re-render).
    pub fn subscribe(&mut self, subscriber: impl FnMut(&LedgerEvent) + 'static) {
        self.ledger.subscribe(subscriber);
    }

    /// Record a transaction happening now.
    pub fn record(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        description: &str,
    ) -> Result<Transaction, AppError> {
        self.record_at(kind, amount, description, Utc::now())
    }

    /// Record a transaction with an explicit timestamp.
    pub fn record_at(
        &mut self,
        kind: TransactionKind,
        amount: f64,
        description: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<Transaction, AppError> {
        let transaction = match Transaction::create(kind, amount, description, timestamp) {
            Ok(transaction) => transaction,
            Err(e) => {
                tracing::warn!(%kind, amount, "rejected transaction: {}", e);
                return Err(e.into());
            }
        };

        tracing::info!(
            id = %transaction.id(),
            %kind,
            amount = %format_amount(transaction.amount()),
            "recorded transaction"
        );
        self.ledger.add(transaction.clone());
        Ok(transaction)
    }

    /// Remove a transaction by id. Unknown ids are ignored.
    pub fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        let removed = self.ledger.remove(id);
        if removed.is_none() {
            tracing::debug!(%id, "remove ignored: no such transaction");
        }
        removed
    }

    /// Remove the transactions shown at the given zero-based display positions.
    ///
    /// All positions are resolved against the display order as it is before any removal.
    /// Out-of-range and repeated positions are ignored.
    pub fn remove_displayed(&mut self, positions: &[usize]) -> Vec<Transaction> {
        let displayed: Vec<TransactionId> = self.ledger.list().iter().map(|t| t.id()).collect();
        let targets: Vec<TransactionId> = positions
            .iter()
            .filter_map(|&position| displayed.get(position).copied())
            .collect();

        targets
            .into_iter()
            .filter_map(|id| self.ledger.remove(id))
            .collect()
    }

    pub fn list(&self) -> Listing<'_> {
        self.ledger.list()
    }

    pub fn balance(&self) -> Amount {
        self.ledger.balance()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            generated_at: Utc::now(),
            currency_symbol: self.config.currency_symbol.clone(),
            balance: self.ledger.balance(),
            income_total: self.ledger.income_total(),
            expense_total: self.ledger.expense_total(),
            transactions: self.ledger.list().iter().cloned().collect(),
        }
    }
}

impl Default for LedgerSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

fn log_ledger_event(event: &LedgerEvent) {
    match event {
        LedgerEvent::Added {
            id,
            kind,
            amount,
        } => tracing::debug!(%id, %kind, amount, "ledger: added"),
        LedgerEvent::Removed {
            id,
            kind,
            amount,
        } => tracing::debug!(%id, %kind, amount, "ledger: removed"),
    }
}

/// Parse amount text as typed into an input field.
/// Text that is not a number at all is an `InvalidAmount`; range checks happen at creation.
pub fn parse_amount(input: &str) -> Result<f64, AppError> {
    input
        .trim()
        .parse::<f64>()
        .map_err(|_| AppError::InvalidAmount(input.to_string()))
}

pub fn parse_kind(input: &str) -> Result<TransactionKind, AppError> {
    input.parse().map_err(AppError::InvalidKind)
}

pub fn parse_id(input: &str) -> Result<TransactionId, AppError> {
    Uuid::parse_str(input.trim()).map_err(|_| AppError::InvalidId(input.to_string()))
}
