// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tally::{Transaction, TransactionKind};

/// Helper to parse a date string into DateTime<Utc>
pub fn parse_date(date_str: &str) -> DateTime<Utc> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// A timestamp `minutes` after midnight on the given day
pub fn minutes_after(date_str: &str, minutes: i64) -> DateTime<Utc> {
    parse_date(date_str) + Duration::minutes(minutes)
}

pub fn income(amount: f64, description: &str, timestamp: DateTime<Utc>) -> Transaction {
    Transaction::create(TransactionKind::Income, amount, description, timestamp).unwrap()
}

pub fn expense(amount: f64, description: &str, timestamp: DateTime<Utc>) -> Transaction {
    Transaction::create(TransactionKind::Expense, amount, description, timestamp).unwrap()
}
