use super::TransactionKind;

/// Monetary values are kept exactly as entered; rounding to two decimals
/// only happens when they are displayed or exported.
pub type Amount = f64;

/// Format an amount as a human-readable string with two decimals.
/// Example: 50.0 -> "50.00", -12.344 -> "-12.34", -0.001 -> "0.00"
pub fn format_amount(amount: Amount) -> String {
    let formatted = format!("{:.2}", amount);
    // A value that rounds to zero should never show a sign
    if formatted.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        return "0.00".to_string();
    }
    formatted
}

/// Format an amount with a currency symbol, sign first.
/// Example: (70.0, "¥") -> "¥70.00", (-5.0, "¥") -> "-¥5.00"
pub fn format_money(amount: Amount, symbol: &str) -> String {
    let formatted = format_amount(amount);
    match formatted.strip_prefix('-') {
        Some(digits) => format!("-{}{}", symbol, digits),
        None => format!("{}{}", symbol, formatted),
    }
}

/// Format an unsigned transaction amount the way a ledger row shows it:
/// `+¥100.00` for income, `-¥30.00` for expenses.
pub fn format_signed(kind: TransactionKind, amount: Amount, symbol: &str) -> String {
    let sign = match kind {
        TransactionKind::Income => "+",
        TransactionKind::Expense => "-",
    };
    format!("{}{}{}", sign, symbol, format_amount(amount))
}
