use super::{Amount, Transaction, TransactionId, TransactionKind};

/// Notification emitted after every effective mutation of a [`Ledger`].
#[derive(Debug, Clone, PartialEq)]
pub enum LedgerEvent {
    Added {
        id: TransactionId,
        kind: TransactionKind,
        amount: Amount,
    },
    Removed {
        id: TransactionId,
        kind: TransactionKind,
        amount: Amount,
    },
}

type Subscriber = Box<dyn FnMut(&LedgerEvent)>;

/// In-memory collection of transactions for one session.
///
/// Storage keeps insertion order. The display order (most recent first) and the
/// balance are always derived from the current contents.
#[derive(Default)]
pub struct Ledger {
    transactions: Vec<Transaction>,
    subscribers: Vec<Subscriber>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked synchronously after each add and each effective remove.
    pub fn subscribe(&mut self, subscriber: impl FnMut(&LedgerEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn add(&mut self, transaction: Transaction) {
        let event = LedgerEvent::Added {
            id: transaction.id(),
            kind: transaction.kind(),
            amount: transaction.amount(),
        };
        self.transactions.push(transaction);
        self.notify(&event);
    }

    /// Remove the transaction with the given id.
    /// Unknown ids are ignored and return `None`.
    pub fn remove(&mut self, id: TransactionId) -> Option<Transaction> {
        let index = self.transactions.iter().position(|t| t.id() == id)?;
        let removed = self.transactions.remove(index);
        self.notify(&LedgerEvent::Removed {
            id: removed.id(),
            kind: removed.kind(),
            amount: removed.amount(),
        });
        Some(removed)
    }

    /// Transactions in display order. Nothing is sorted until the listing is iterated.
    pub fn list(&self) -> Listing<'_> {
        Listing {
            transactions: &self.transactions,
        }
    }

    pub fn get(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id() == id)
    }

    /// Income minus expenses over the current contents.
    pub fn balance(&self) -> Amount {
        self.transactions
            .iter()
            .fold(0.0, |balance, t| balance + t.signed_amount())
    }

    pub fn income_total(&self) -> Amount {
        self.total_of(TransactionKind::Income)
    }

    pub fn expense_total(&self) -> Amount {
        self.total_of(TransactionKind::Expense)
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    fn total_of(&self, kind: TransactionKind) -> Amount {
        self.transactions
            .iter()
            .filter(|t| t.kind() == kind)
            .fold(0.0, |total, t| total + t.amount())
    }

    fn notify(&mut self, event: &LedgerEvent) {
        for subscriber in &mut self.subscribers {
            subscriber(event);
        }
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("transactions", &self.transactions)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Display-order view over a ledger: timestamp descending, ties in insertion order.
/// Every call to [`Listing::iter`] sorts afresh, so a listing can be walked any number of times.
#[derive(Debug, Clone, Copy)]
pub struct Listing<'a> {
    transactions: &'a [Transaction],
}

impl<'a> Listing<'a> {
    pub fn iter(&self) -> std::vec::IntoIter<&'a Transaction> {
        let mut sorted: Vec<&'a Transaction> = self.transactions.iter().collect();
        // sort_by is stable, which keeps equal timestamps in insertion order
        sorted.sort_by(|a, b| b.timestamp().cmp(&a.timestamp()));
        sorted.into_iter()
    }

    /// The transaction shown at a zero-based display position.
    ///
    /// Sorts the whole ledger on every call; to resolve several positions,
    /// walk [`Listing::iter`] once instead.
    pub fn nth_displayed(&self, position: usize) -> Option<&'a Transaction> {
        self.iter().nth(position)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl<'a> IntoIterator for Listing<'a> {
    type Item = &'a Transaction;
    type IntoIter = std::vec::IntoIter<&'a Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &Listing<'a> {
    type Item = &'a Transaction;
    type IntoIter = std::vec::IntoIter<&'a Transaction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
