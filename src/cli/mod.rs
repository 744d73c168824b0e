use std::fs::File;
use std::io::{BufRead, BufReader, IsTerminal, Write, stdin, stdout};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use crate::application::{
    DEFAULT_CURRENCY_SYMBOL, LedgerSession, SessionConfig, parse_amount, parse_id, parse_kind,
};
use crate::domain::{Transaction, format_money, format_signed};
use crate::io::{ExportFormat, export_snapshot};
use crate::logging::init_tracing;

pub const EMPTY_STATE_MESSAGE: &str =
    "No transactions yet. Use `add <amount> [description]` to record one.";

/// Tally - a single-session income and expense ledger
#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Record income and expenses for one session and keep a running balance")]
#[command(version)]
pub struct Cli {
    /// Currency symbol used when displaying amounts
    #[arg(short, long, default_value = DEFAULT_CURRENCY_SYMBOL)]
    pub currency: String,

    /// Read session commands from a file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// One line typed into the session.
#[derive(Parser, Debug)]
#[command(name = "tally", no_binary_name = true)]
pub struct SessionLine {
    #[command(subcommand)]
    pub command: SessionCommand,
}

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Record a transaction
    Add {
        /// Amount (e.g., "30" or "12.50")
        #[arg(allow_negative_numbers = true)]
        amount: String,

        /// Free-text description (optional)
        description: Vec<String>,

        /// Transaction kind: income or expense
        #[arg(short, long, default_value = "expense")]
        kind: String,
    },

    /// Remove a transaction by ID (no-op if it does not exist)
    Remove {
        /// Transaction ID
        id: String,
    },

    /// Delete transactions by their position in the list (1 = most recent)
    Delete {
        #[arg(required = true)]
        positions: Vec<usize>,
    },

    /// List transactions, most recent first
    List {
        /// Print the list and balance as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current balance
    Balance,

    /// Export the session to CSV or JSON
    Export {
        /// Format: csv, json
        format: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let mut session = LedgerSession::new(SessionConfig {
            currency_symbol: self.currency,
        });

        let stdout = stdout();
        let mut out = stdout.lock();

        match self.input {
            Some(path) => {
                let file = File::open(&path)
                    .with_context(|| format!("Failed to open input file: {}", path.display()))?;
                run_session(&mut session, BufReader::new(file), &mut out, false)
            }
            None => {
                let interactive = stdin().is_terminal();
                run_session(&mut session, stdin().lock(), &mut out, interactive)
            }
        }
    }
}

/// Read commands line by line until `quit` or end of input.
///
/// A bad line is reported on stderr and the session carries on, so the user can retry.
pub fn run_session<R: BufRead, W: Write>(
    session: &mut LedgerSession,
    input: R,
    out: &mut W,
    interactive: bool,
) -> Result<()> {
    if interactive {
        writeln!(out, "Tally - type `help` for commands, `quit` to leave.")?;
    }

    let mut lines = input.lines();
    loop {
        if interactive {
            write!(out, "> ")?;
            out.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read session input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match run_line(session, line, out) {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("error: {:#}", e),
        }
    }

    out.flush()?;
    Ok(())
}

/// Parse and execute a single session line.
pub fn run_line<W: Write>(session: &mut LedgerSession, line: &str, out: &mut W) -> Result<Flow> {
    let words = shell_words::split(line).context("Unbalanced quotes in input")?;

    let parsed = match SessionLine::try_parse_from(words) {
        Ok(parsed) => parsed,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            write!(out, "{}", e.render())?;
            return Ok(Flow::Continue);
        }
        Err(e) => {
            eprint!("{}", e.render());
            return Ok(Flow::Continue);
        }
    };

    execute(session, parsed.command, out)
}

pub fn execute<W: Write>(
    session: &mut LedgerSession,
    command: SessionCommand,
    out: &mut W,
) -> Result<Flow> {
    let symbol = session.config().currency_symbol.clone();

    match command {
        SessionCommand::Add {
            amount,
            description,
            kind,
        } => {
            let kind = parse_kind(&kind)?;
            let amount = parse_amount(&amount)?;
            let transaction = session.record(kind, amount, &description.join(" "))?;

            writeln!(
                out,
                "Recorded {}: {} {} ({})",
                transaction.kind(),
                format_signed(transaction.kind(), transaction.amount(), &symbol),
                transaction.description(),
                transaction.id()
            )?;
        }

        SessionCommand::Remove { id } => {
            let id = parse_id(&id)?;
            match session.remove(id) {
                Some(removed) => writeln!(
                    out,
                    "Removed: {} {}",
                    format_signed(removed.kind(), removed.amount(), &symbol),
                    removed.description()
                )?,
                None => writeln!(out, "Nothing to remove for {}", id)?,
            }
        }

        SessionCommand::Delete { positions } => {
            // Displayed positions are 1-based; 0 can never match
            let positions: Vec<usize> = positions
                .into_iter()
                .filter_map(|p| p.checked_sub(1))
                .collect();
            let removed = session.remove_displayed(&positions);
            writeln!(out, "Deleted {} transaction(s)", removed.len())?;
        }

        SessionCommand::List { json } => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&session.snapshot())?)?;
            } else {
                print_list(session, out)?;
            }
        }

        SessionCommand::Balance => {
            let ledger = session.ledger();
            writeln!(
                out,
                "Balance: {} (income {}, expenses {})",
                format_money(ledger.balance(), &symbol),
                format_money(ledger.income_total(), &symbol),
                format_money(ledger.expense_total(), &symbol)
            )?;
        }

        SessionCommand::Export { format, output } => {
            let format: ExportFormat = format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let snapshot = session.snapshot();

            match output {
                Some(path) => {
                    let file = File::create(&path).with_context(|| {
                        format!("Failed to create output file: {}", path.display())
                    })?;
                    let count = export_snapshot(&snapshot, format, file)?;
                    writeln!(
                        out,
                        "Exported {} transaction(s) to {}",
                        count,
                        path.display()
                    )?;
                }
                None => {
                    export_snapshot(&snapshot, format, &mut *out)?;
                }
            }
        }

        SessionCommand::Quit => return Ok(Flow::Quit),
    }

    Ok(Flow::Continue)
}

fn print_list<W: Write>(session: &LedgerSession, out: &mut W) -> Result<()> {
    let symbol = &session.config().currency_symbol;

    if session.is_empty() {
        writeln!(out, "{}", EMPTY_STATE_MESSAGE)?;
    } else {
        writeln!(
            out,
            "{:>3}  {:<16}  {:<8} {:>14}  {:<24} {}",
            "#", "DATE", "KIND", "AMOUNT", "DESCRIPTION", "ID"
        )?;
        writeln!(out, "{}", "-".repeat(110))?;
        for (position, transaction) in session.list().iter().enumerate() {
            print_row(out, position + 1, transaction, symbol)?;
        }
        writeln!(out, "{}", "-".repeat(110))?;
    }

    writeln!(out, "Balance: {}", format_money(session.balance(), symbol))?;
    Ok(())
}

fn print_row<W: Write>(
    out: &mut W,
    position: usize,
    transaction: &Transaction,
    symbol: &str,
) -> Result<()> {
    writeln!(
        out,
        "{:>3}  {:<16}  {:<8} {:>14}  {:<24} {}",
        position,
        transaction.timestamp().format("%Y-%m-%d %H:%M"),
        transaction.kind(),
        format_signed(transaction.kind(), transaction.amount(), symbol),
        transaction.description(),
        transaction.id()
    )?;
    Ok(())
}
