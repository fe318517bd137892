use std::{
    fs::File,
    io::{self, Read},
};

use anyhow::{Context, Result};
use teller::{
    console::{Console, ConsoleError},
    processor::in_memory_processor::InMemoryBank,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let mut bank = match std::env::var("TELLER_SEED") {
        Ok(seed) => InMemoryBank::with_seed(
            seed.parse()
                .with_context(|| format!("TELLER_SEED must be an unsigned integer, got `{seed}`"))?,
        ),
        Err(_) => InMemoryBank::default(),
    };

    let input: Box<dyn Read> = match std::env::args().nth(1).as_deref() {
        None | Some("-") => Box::new(io::stdin()),
        Some(filename) => Box::new(
            File::open(filename).with_context(|| format!("Failed to open `{filename}`"))?,
        ),
    };

    let console = Console {
        input,
        output: &mut io::stdout(),
        bank: &mut bank,
        error_printer: Box::new(|line, err| match err {
            ConsoleError::CommandErr(err) => eprintln!("Error at line {line}: {err}"),
            ConsoleError::BankErr(err) => eprintln!("Rejected at line {line}: {err}"),
        }),
    };
    console.run()
}
