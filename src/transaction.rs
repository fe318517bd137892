use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::account::AccountCode;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Balance operation a failed record was attempting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Credit,
    Debit,
    Transfer,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Credit => "CREDIT",
            Operation::Debit => "DEBIT",
            Operation::Transfer => "TRANSFER",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    InvalidAmount,
    InsufficientBalance,
    TransferToSelf,
    BalanceOverflow,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailureReason::InvalidAmount => "Invalid amount",
            FailureReason::InsufficientBalance => "Insufficient balance",
            FailureReason::TransferToSelf => "Transfer to self",
            FailureReason::BalanceOverflow => "Balance overflow",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Credit,
    Debit,
    TransferOut {
        target: AccountCode,
    },
    TransferIn {
        source: AccountCode,
    },
    Failed {
        operation: Operation,
        reason: FailureReason,
    },
}

/// Single entry of an account history. Records are created by the account
/// when an event is applied (or rejected) and are never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    kind: RecordKind,
    amount: Decimal,
    timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    pub(crate) fn new(kind: RecordKind, amount: Decimal) -> Self {
        Self {
            kind,
            amount,
            timestamp: Utc::now(),
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.kind, RecordKind::Failed { .. })
    }

    /// Signed effect on the balance; failed records have none.
    pub fn balance_effect(&self) -> Decimal {
        match self.kind {
            RecordKind::Credit | RecordKind::TransferIn { .. } => self.amount,
            RecordKind::Debit | RecordKind::TransferOut { .. } => -self.amount,
            RecordKind::Failed { .. } => Decimal::ZERO,
        }
    }
}

impl fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ts = self.timestamp.format(TIMESTAMP_FORMAT);
        let amount = self.amount;
        match self.kind {
            RecordKind::Credit => write!(f, "[{ts}] CREDIT: +{amount} DA (Deposit)"),
            RecordKind::Debit => write!(f, "[{ts}] DEBIT: -{amount} DA (Withdrawal)"),
            RecordKind::TransferOut { target } => {
                write!(f, "[{ts}] TRANSFER OUT: -{amount} DA → Account #{target}")
            }
            RecordKind::TransferIn { source } => {
                write!(f, "[{ts}] TRANSFER IN: +{amount} DA ← Account #{source}")
            }
            RecordKind::Failed { operation, reason } => {
                write!(f, "[{ts}] FAILED {operation}: {amount} DA - {reason}")
            }
        }
    }
}
