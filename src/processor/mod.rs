use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    account::{Account, AccountCode, AccountError, OpenAccountError},
    client::{Cin, Client, ClientError},
    command::BankCommand,
    directory::DirectoryError,
};

pub mod in_memory_processor;

#[derive(Debug, Error)]
pub enum BankError {
    #[error(transparent)]
    ClientErr(#[from] ClientError),
    #[error(transparent)]
    DirectoryErr(#[from] DirectoryError),
    #[error(transparent)]
    AccountErr(#[from] AccountError),
    #[error(transparent)]
    OpenAccountErr(#[from] OpenAccountError),
    #[error("Account #{code} does not belong to CIN {cin}")]
    OwnershipMismatch { code: AccountCode, cin: Cin },
    #[error("Incorrect password for account #{code}")]
    AuthenticationFailure { code: AccountCode },
}

/// A client together with snapshots of its accounts, in creation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientReport {
    pub client: Client,
    pub accounts: Vec<Account>,
}

/// What a successfully executed command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    ClientRegistered {
        cin: Cin,
    },
    AccountOpened {
        code: AccountCode,
        owner: Cin,
    },
    Authenticated {
        code: AccountCode,
        first_name: String,
    },
    BalanceChanged {
        code: AccountCode,
        balance: Decimal,
    },
    Transferred {
        from: AccountCode,
        to: AccountCode,
        amount: Decimal,
        balance: Decimal,
    },
    AccountShown(Account),
    ClientShown(ClientReport),
    AccountsCounted(AccountCode),
}

pub trait CommandProcessor {
    fn process_command(&mut self, command: BankCommand) -> Result<CommandOutcome, BankError>;
}
