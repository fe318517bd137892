//! Scripted operator console. Reads commands, hands them to the bank and
//! writes what happened, finishing with a CSV dump of every account.

use std::io::{Read, Write};

use anyhow::{Context, Result};
use thiserror::Error;

use crate::{
    command::{BankCommand, CommandError},
    processor::{
        BankError, CommandOutcome, CommandProcessor, in_memory_processor::InMemoryBank,
    },
};
use csv_parser::CsvScriptParser;
use csv_printer::{AccountRow, print_accounts};
pub mod csv_parser;
pub mod csv_printer;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    CommandErr(#[from] CommandError),
    #[error(transparent)]
    BankErr(#[from] BankError),
}

pub struct Console<'b, 'w, R, W: 'w> {
    pub input: R,
    pub output: &'w mut W,
    pub bank: &'b mut InMemoryBank,
    pub error_printer: Box<dyn FnMut(u64, ConsoleError)>,
}

impl<'b, 'w, R, W> Console<'b, 'w, R, W>
where
    R: Read,
    W: Write + 'w,
{
    pub fn run(mut self) -> Result<()> {
        let parser = CsvScriptParser::new(self.input);

        for row in parser {
            let row = row.context("Failed to read console script")?;
            let outcome = BankCommand::parse_command(row.command(), row.args())
                .map_err(ConsoleError::from)
                .and_then(|cmd| self.bank.process_command(cmd).map_err(ConsoleError::from));
            match outcome {
                Ok(outcome) => write_outcome(&mut *self.output, &outcome)?,
                Err(err) => (self.error_printer)(row.line, err),
            }
        }

        print_accounts(
            self.output,
            self.bank
                .directory
                .accounts()
                .into_iter()
                .map(|acc| AccountRow {
                    account: acc.code(),
                    owner: acc.owner().to_string(),
                    balance: acc.balance(),
                    transactions: acc.history().len(),
                }),
        )
    }
}

fn write_outcome<W: Write>(output: &mut W, outcome: &CommandOutcome) -> Result<()> {
    match outcome {
        CommandOutcome::ClientRegistered { cin } => writeln!(output, "client {cin} registered")?,
        CommandOutcome::AccountOpened { code, owner } => {
            writeln!(output, "account {code} opened for client {owner}")?
        }
        CommandOutcome::Authenticated { first_name, .. } => {
            writeln!(output, "welcome back, {first_name}")?
        }
        CommandOutcome::BalanceChanged { code, balance } => {
            writeln!(output, "account {code} balance {balance}")?
        }
        CommandOutcome::Transferred {
            from,
            to,
            amount,
            balance,
        } => writeln!(
            output,
            "transferred {amount} DA from account {from} to account {to}, account {from} balance {balance}"
        )?,
        CommandOutcome::AccountShown(account) => {
            writeln!(output, "{account}")?;
            if account.history().is_empty() {
                writeln!(output, "  no transactions yet")?;
            }
            for record in account.history() {
                writeln!(output, "  {record}")?;
            }
        }
        CommandOutcome::ClientShown(report) => {
            writeln!(output, "{}", report.client)?;
            if report.accounts.is_empty() {
                writeln!(output, "  no accounts yet")?;
            }
            for acc in &report.accounts {
                writeln!(output, "  {acc}")?;
            }
        }
        CommandOutcome::AccountsCounted(count) => {
            writeln!(output, "total accounts created: {count}")?
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;

    fn run(bank: &mut InMemoryBank, script: &str) -> (String, Vec<(u64, String)>) {
        let errors = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&errors);
        let mut output = Vec::new();
        Console {
            input: script.as_bytes(),
            output: &mut output,
            bank,
            error_printer: Box::new(move |line, err| {
                sink.borrow_mut().push((line, err.to_string()))
            }),
        }
        .run()
        .unwrap();
        let errors = errors.borrow().clone();
        (String::from_utf8(output).unwrap(), errors)
    }

    #[test]
    fn errors_do_not_stop_the_script() {
        let mut bank = InMemoryBank::with_seed(9);
        let (output, errors) = run(
            &mut bank,
            "register-client,,Zerrouki\nfly-away\ndeposit,1,10\ncount-accounts\n",
        );
        let lines: Vec<_> = output.lines().collect();
        // no account rows, so no CSV header either
        assert_eq!(lines, vec!["total accounts created: 0"]);
        let messages: Vec<_> = errors.iter().map(|(_, msg)| msg.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "first name is required",
                "Unknown command `fly-away`",
                "Account #1 not found"
            ]
        );
        assert!(errors.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn show_client_without_accounts() {
        let mut bank = InMemoryBank::with_seed(9);
        let cin = bank.register_client("Amina", "Zerrouki", None).unwrap();
        let (output, errors) = run(&mut bank, &format!("show-client,{cin}\n"));
        assert!(errors.is_empty());
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines[0], format!("CIN: {cin}, Name: Amina Zerrouki, Tel: N/A"));
        assert_eq!(lines[1], "  no accounts yet");
    }

    #[test]
    fn overflowing_deposit_is_reported() {
        let mut bank = InMemoryBank::with_seed(9);
        let cin = bank.register_client("Amina", "Zerrouki", None).unwrap();
        let script = format!(
            "open-account,{cin},p\n\
             deposit,1,79228162514264337593543950335\n\
             deposit,1,1\n\
             show-account,1\n"
        );
        let (output, errors) = run(&mut bank, &script);

        assert_eq!(
            errors
                .iter()
                .map(|(_, msg)| msg.as_str())
                .collect::<Vec<_>>(),
            vec!["Crediting 1 would overflow the balance of account #1"]
        );
        let lines: Vec<_> = output.lines().collect();
        assert_eq!(
            lines[2],
            format!("Account #1 (owner {cin}): 79228162514264337593543950335 DA")
        );
        assert!(lines[4].ends_with("] FAILED CREDIT: 1 DA - Balance overflow"));
    }
}
