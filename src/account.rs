use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    client::Cin,
    directory::{Directory, DirectoryError},
    transaction::{FailureReason, Operation, RecordKind, TransactionRecord},
};

pub type AccountCode = u32;

/// Validated change to an account. Produced by `handle_*` methods and
/// applied unconditionally by `Account::apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct AccountEvent {
    kind: RecordKind,
    amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal,
        available: Decimal,
    },
    #[error("Cannot transfer to the same account #{code}")]
    SelfTransfer { code: AccountCode },
    #[error("Crediting {amount} would overflow the balance of account #{code}")]
    BalanceOverflow { code: AccountCode, amount: Decimal },
}

impl AccountError {
    pub fn reason(&self) -> FailureReason {
        match self {
            AccountError::InvalidAmount { .. } => FailureReason::InvalidAmount,
            AccountError::InsufficientFunds { .. } => FailureReason::InsufficientBalance,
            AccountError::SelfTransfer { .. } => FailureReason::TransferToSelf,
            AccountError::BalanceOverflow { .. } => FailureReason::BalanceOverflow,
        }
    }
}

/// Reasons an account cannot be opened.
#[derive(Debug, Error)]
pub enum OpenAccountError {
    #[error("Password cannot be empty")]
    EmptyPassword,
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    code: AccountCode,
    owner: Cin,
    balance: Decimal,
    // Plaintext placeholder, compared with `==` only.
    password: String,
    history: Vec<TransactionRecord>,
}

impl Account {
    pub(crate) fn new(code: AccountCode, owner: Cin, password: impl Into<String>) -> Self {
        Self {
            code,
            owner,
            balance: Decimal::ZERO,
            password: password.into(),
            history: Vec::new(),
        }
    }

    /// Opens a new account for a registered client and returns its code.
    ///
    /// The code is taken from the directory counter only when creation
    /// succeeds, so codes stay sequential.
    pub fn create(
        owner: &Cin,
        password: &str,
        directory: &mut Directory,
    ) -> Result<AccountCode, OpenAccountError> {
        if directory.find_client(owner).is_none() {
            return Err(DirectoryError::UnknownClient { cin: owner.clone() }.into());
        }
        if password.is_empty() {
            return Err(OpenAccountError::EmptyPassword);
        }
        let code = directory.next_account_code();
        directory.register_account(Account::new(code, owner.clone(), password))?;
        directory
            .find_client_mut(owner)
            .ok_or_else(|| DirectoryError::UnknownClient { cin: owner.clone() })?
            .add_account(code);
        info!(account = code, client = %owner, "account opened");
        Ok(code)
    }

    pub fn code(&self) -> AccountCode {
        self.code
    }

    pub fn owner(&self) -> &Cin {
        &self.owner
    }

    pub fn balance(&self) -> Decimal {
        self.balance
    }

    pub fn check_password(&self, candidate: &str) -> bool {
        self.password == candidate
    }

    /// History in insertion order, oldest first.
    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }

    /// Only called with events fresh from a `handle_*` method on the same
    /// state, so the arithmetic stays in range.
    fn apply(&mut self, event: &AccountEvent) {
        match event.kind {
            RecordKind::Credit | RecordKind::TransferIn { .. } => {
                self.balance += event.amount;
            }
            RecordKind::Debit | RecordKind::TransferOut { .. } => {
                self.balance -= event.amount;
            }
            RecordKind::Failed { .. } => {}
        }
        debug!(account = self.code, amount = %event.amount, kind = ?event.kind, "event applied");
        self.history.push(TransactionRecord::new(event.kind, event.amount));
    }

    fn handle_credit(&self, amount: Decimal) -> Result<AccountEvent, AccountError> {
        check_positive(amount)?;
        self.check_room(amount)?;
        Ok(AccountEvent {
            kind: RecordKind::Credit,
            amount,
        })
    }

    fn handle_debit(&self, amount: Decimal) -> Result<AccountEvent, AccountError> {
        check_positive(amount)?;
        self.check_available(amount)?;
        Ok(AccountEvent {
            kind: RecordKind::Debit,
            amount,
        })
    }

    /// Validates a transfer to `target` and returns the outgoing event for
    /// this account together with the incoming event for the target.
    fn handle_transfer(
        &self,
        amount: Decimal,
        target: &Account,
    ) -> Result<(AccountEvent, AccountEvent), AccountError> {
        check_positive(amount)?;
        if target.code == self.code {
            return Err(AccountError::SelfTransfer { code: self.code });
        }
        self.check_available(amount)?;
        target.check_room(amount)?;
        Ok((
            AccountEvent {
                kind: RecordKind::TransferOut {
                    target: target.code,
                },
                amount,
            },
            AccountEvent {
                kind: RecordKind::TransferIn { source: self.code },
                amount,
            },
        ))
    }

    /// Deposits `amount` and returns the new balance.
    pub fn credit(&mut self, amount: Decimal) -> Result<Decimal, AccountError> {
        let event = self
            .handle_credit(amount)
            .map_err(|err| self.reject(Operation::Credit, amount, err))?;
        self.apply(&event);
        Ok(self.balance)
    }

    /// Withdraws `amount` and returns the new balance.
    pub fn debit(&mut self, amount: Decimal) -> Result<Decimal, AccountError> {
        let event = self
            .handle_debit(amount)
            .map_err(|err| self.reject(Operation::Debit, amount, err))?;
        self.apply(&event);
        Ok(self.balance)
    }

    /// Moves `amount` to `target` and returns the new balance of this account.
    ///
    /// Failures are recorded on this account only. Both events are built
    /// before either is applied, and applying cannot fail.
    pub fn transfer(
        &mut self,
        amount: Decimal,
        target: &mut Account,
    ) -> Result<Decimal, AccountError> {
        let (outgoing, incoming) = self
            .handle_transfer(amount, target)
            .map_err(|err| self.reject(Operation::Transfer, amount, err))?;
        self.apply(&outgoing);
        target.apply(&incoming);
        info!(from = self.code, to = target.code, amount = %amount, "transfer completed");
        Ok(self.balance)
    }

    /// Rejects a transfer whose target resolved to this very account.
    pub(crate) fn refuse_self_transfer(&mut self, amount: Decimal) -> AccountError {
        let err = match check_positive(amount) {
            Err(err) => err,
            Ok(()) => AccountError::SelfTransfer { code: self.code },
        };
        self.reject(Operation::Transfer, amount, err)
    }

    fn reject(&mut self, operation: Operation, amount: Decimal, err: AccountError) -> AccountError {
        warn!(account = self.code, %operation, amount = %amount, reason = %err.reason(), "operation rejected");
        self.history.push(TransactionRecord::new(
            RecordKind::Failed {
                operation,
                reason: err.reason(),
            },
            amount,
        ));
        err
    }

    fn check_room(&self, amount: Decimal) -> Result<(), AccountError> {
        match self.balance.checked_add(amount) {
            Some(_) => Ok(()),
            None => Err(AccountError::BalanceOverflow {
                code: self.code,
                amount,
            }),
        }
    }

    fn check_available(&self, amount: Decimal) -> Result<(), AccountError> {
        if amount > self.balance {
            Err(AccountError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            })
        } else {
            Ok(())
        }
    }
}

fn check_positive(amount: Decimal) -> Result<(), AccountError> {
    if amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(AccountError::InvalidAmount { amount })
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account #{} (owner {}): {} DA",
            self.code, self.owner, self.balance
        )
    }
}
