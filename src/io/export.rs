use std::io::Write;
use std::str::FromStr;

use anyhow::Result;

use crate::application::SessionSnapshot;
use crate::domain::format_amount;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format '{}' (expected csv or json)", other)),
        }
    }
}

/// Write a snapshot in the requested format. Returns the number of transactions written.
pub fn export_snapshot<W: Write>(
    snapshot: &SessionSnapshot,
    format: ExportFormat,
    writer: W,
) -> Result<usize> {
    match format {
        ExportFormat::Csv => export_csv(snapshot, writer),
        ExportFormat::Json => export_json(snapshot, writer),
    }
}

/// Export transactions to CSV, in display order
pub fn export_csv<W: Write>(snapshot: &SessionSnapshot, writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer.write_record(["id", "timestamp", "kind", "amount", "description"])?;

    for transaction in &snapshot.transactions {
        csv_writer.write_record([
            transaction.id().to_string(),
            transaction.timestamp().to_rfc3339(),
            transaction.kind().to_string(),
            format_amount(transaction.amount()),
            transaction.description().to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(snapshot.transactions.len())
}

/// Export the whole snapshot, balance included, as pretty JSON
pub fn export_json<W: Write>(snapshot: &SessionSnapshot, mut writer: W) -> Result<usize> {
    serde_json::to_writer_pretty(&mut writer, snapshot)?;
    writeln!(writer)?;
    Ok(snapshot.transactions.len())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::application::{LedgerSession, SessionConfig};
    use crate::domain::TransactionKind;

    fn sample_session() -> LedgerSession {
        let mut session = LedgerSession::new(SessionConfig::default());
        session
            .record_at(
                TransactionKind::Income,
                100.0,
                "salary",
                Utc.with_ymd_and_hms(2025, 6, 24, 9, 0, 0).unwrap(),
            )
            .unwrap();
        session
            .record_at(
                TransactionKind::Expense,
                30.0,
                "lunch, with \"friends\"",
                Utc.with_ymd_and_hms(2025, 6, 24, 12, 30, 0).unwrap(),
            )
            .unwrap();
        session
    }

    #[test]
    fn test_export_csv() {
        let snapshot = sample_session().snapshot();
        let mut out = Vec::new();
        let count = export_csv(&snapshot, &mut out).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "id,timestamp,kind,amount,description");
        assert!(lines[1].contains("2025-06-24T12:30:00+00:00,expense,30.00,"));
        assert!(lines[1].ends_with("\"lunch, with \"\"friends\"\"\""));
        assert!(lines[2].contains(",income,100.00,salary"));
    }

    #[test]
    fn test_export_json() {
        let snapshot = sample_session().snapshot();
        let mut out = Vec::new();
        export_json(&snapshot, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["balance"], 70.0);
        assert_eq!(value["currency_symbol"], "¥");
        assert_eq!(value["transactions"][0]["kind"], "expense");
        assert_eq!(value["transactions"][0]["amount"], 30.0);
        assert_eq!(value["transactions"][1]["description"], "salary");
    }

    #[test]
    fn test_export_empty_csv_has_header_only() {
        let snapshot = LedgerSession::default().snapshot();
        let mut out = Vec::new();
        assert_eq!(export_snapshot(&snapshot, ExportFormat::Csv, &mut out).unwrap(), 0);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "id,timestamp,kind,amount,description\n"
        );
    }

    #[test]
    fn test_export_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>(), Ok(ExportFormat::Csv));
        assert_eq!("json".parse::<ExportFormat>(), Ok(ExportFormat::Json));
        assert!("xml".parse::<ExportFormat>().is_err());
    }
}
