use rust_decimal::Decimal;
use tracing::info;

use crate::{
    account::{Account, AccountCode},
    client::{Cin, Client},
    command::BankCommand,
    directory::{Directory, DirectoryError},
};

use super::{BankError, ClientReport, CommandOutcome, CommandProcessor};

/// Bank operating on a [`Directory`] held in memory for the process lifetime.
#[derive(Debug, Default)]
pub struct InMemoryBank {
    pub directory: Directory,
}

impl InMemoryBank {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            directory: Directory::with_seed(seed),
        }
    }

    pub fn register_client(
        &mut self,
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
    ) -> Result<Cin, BankError> {
        let client = Client::create(first_name, last_name, phone, &mut self.directory)?;
        let cin = client.cin().clone();
        self.directory.register_client(client)?;
        Ok(cin)
    }

    pub fn open_account(&mut self, cin: &Cin, password: &str) -> Result<AccountCode, BankError> {
        Ok(Account::create(cin, password, &mut self.directory)?)
    }

    /// Account level login. Returns the owner's first name.
    pub fn authenticate(
        &self,
        cin: &Cin,
        code: AccountCode,
        password: &str,
    ) -> Result<&str, BankError> {
        let client = self
            .directory
            .find_client(cin)
            .ok_or_else(|| DirectoryError::UnknownClient { cin: cin.clone() })?;
        let account = self.account(code)?;
        if account.owner() != cin {
            return Err(BankError::OwnershipMismatch {
                code,
                cin: cin.clone(),
            });
        }
        if !account.check_password(password) {
            return Err(BankError::AuthenticationFailure { code });
        }
        Ok(client.first_name())
    }

    pub fn deposit(&mut self, code: AccountCode, amount: Decimal) -> Result<Decimal, BankError> {
        Ok(self.account_mut(code)?.credit(amount)?)
    }

    pub fn withdraw(&mut self, code: AccountCode, amount: Decimal) -> Result<Decimal, BankError> {
        Ok(self.account_mut(code)?.debit(amount)?)
    }

    /// Transfers from `from` to account `to`, which must belong to `target_cin`.
    /// Returns the new balance of `from`.
    pub fn transfer(
        &mut self,
        from: AccountCode,
        target_cin: &Cin,
        to: AccountCode,
        amount: Decimal,
    ) -> Result<Decimal, BankError> {
        self.account(from)?;
        let target = self.account(to)?;
        if target.owner() != target_cin {
            return Err(BankError::OwnershipMismatch {
                code: to,
                cin: target_cin.clone(),
            });
        }
        if from == to {
            return Err(self.account_mut(from)?.refuse_self_transfer(amount).into());
        }
        let (source, target) = self
            .directory
            .find_account_pair_mut(from, to)
            .ok_or(DirectoryError::UnknownAccount { code: from })?;
        Ok(source.transfer(amount, target)?)
    }

    /// Snapshot of an account, history included.
    pub fn account_report(&self, code: AccountCode) -> Result<Account, BankError> {
        Ok(self.account(code)?.clone())
    }

    pub fn client_report(&self, cin: &Cin) -> Result<ClientReport, BankError> {
        let client = self
            .directory
            .find_client(cin)
            .ok_or_else(|| DirectoryError::UnknownClient { cin: cin.clone() })?;
        Ok(ClientReport {
            client: client.clone(),
            accounts: client
                .accounts(&self.directory)
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    fn account(&self, code: AccountCode) -> Result<&Account, DirectoryError> {
        self.directory
            .find_account(code)
            .ok_or(DirectoryError::UnknownAccount { code })
    }

    fn account_mut(&mut self, code: AccountCode) -> Result<&mut Account, DirectoryError> {
        self.directory
            .find_account_mut(code)
            .ok_or(DirectoryError::UnknownAccount { code })
    }
}

impl CommandProcessor for InMemoryBank {
    fn process_command(&mut self, command: BankCommand) -> Result<CommandOutcome, BankError> {
        let outcome = match command {
            BankCommand::RegisterClient {
                first_name,
                last_name,
                phone,
            } => CommandOutcome::ClientRegistered {
                cin: self.register_client(&first_name, &last_name, phone.as_deref())?,
            },
            BankCommand::OpenAccount { cin, password } => CommandOutcome::AccountOpened {
                code: self.open_account(&cin, &password)?,
                owner: cin,
            },
            BankCommand::Authenticate {
                cin,
                code,
                password,
            } => {
                let first_name = self.authenticate(&cin, code, &password)?.to_owned();
                info!(account = code, "authenticated");
                CommandOutcome::Authenticated { code, first_name }
            }
            BankCommand::Deposit { code, amount } => CommandOutcome::BalanceChanged {
                code,
                balance: self.deposit(code, amount)?,
            },
            BankCommand::Withdraw { code, amount } => CommandOutcome::BalanceChanged {
                code,
                balance: self.withdraw(code, amount)?,
            },
            BankCommand::Transfer {
                from,
                target_cin,
                to,
                amount,
            } => CommandOutcome::Transferred {
                from,
                to,
                amount,
                balance: self.transfer(from, &target_cin, to, amount)?,
            },
            BankCommand::ShowAccount { code } => {
                CommandOutcome::AccountShown(self.account_report(code)?)
            }
            BankCommand::ShowClient { cin } => {
                CommandOutcome::ClientShown(self.client_report(&cin)?)
            }
            BankCommand::CountAccounts => {
                CommandOutcome::AccountsCounted(self.directory.account_count())
            }
        };
        Ok(outcome)
    }
}
