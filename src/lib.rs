/// Account balance and history management.
/// Mutations are validated into events first, then applied.
pub mod account;

/// Client identity and the accounts it owns.
pub mod client;

/// Registry of clients and accounts, and issuer of their identifiers.
/// Owned by whoever drives the bank, there is no global instance.
pub mod directory;

/// Immutable history entries recorded by accounts.
pub mod transaction;

/// Console commands parsed from text, later executed by [`processor`].
pub mod command;

/// Command processor interface, plus "in memory" implementation.
/// Resolves identifiers through the directory and calls into accounts.
pub mod processor;

/// Scripted console driving the processor. Lives in the library so the
/// integration tests can run it without spawning the binary.
pub mod console;
