use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{
    Deserialize,
    de::{IntoDeserializer, value::StrDeserializer},
};
use thiserror::Error;

use crate::{account::AccountCode, client::Cin};

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CommandKind {
    RegisterClient,
    OpenAccount,
    Authenticate,
    Deposit,
    Withdraw,
    Transfer,
    ShowAccount,
    ShowClient,
    CountAccounts,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankCommand {
    RegisterClient {
        first_name: String,
        last_name: String,
        phone: Option<String>,
    },
    OpenAccount {
        cin: Cin,
        password: String,
    },
    Authenticate {
        cin: Cin,
        code: AccountCode,
        password: String,
    },
    Deposit {
        code: AccountCode,
        amount: Decimal,
    },
    Withdraw {
        code: AccountCode,
        amount: Decimal,
    },
    Transfer {
        from: AccountCode,
        target_cin: Cin,
        to: AccountCode,
        amount: Decimal,
    },
    ShowAccount {
        code: AccountCode,
    },
    ShowClient {
        cin: Cin,
    },
    CountAccounts,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Unknown command `{name}`")]
    UnknownCommand { name: String },
    #[error("`{name}` is required for {command:?}")]
    MissingArgument {
        command: CommandKind,
        name: &'static str,
    },
    #[error("`{name}` must be a number for {command:?}, got `{value}`")]
    InvalidNumber {
        command: CommandKind,
        name: &'static str,
        value: String,
    },
}

impl BankCommand {
    /// Parses a console line: the command name followed by its arguments.
    ///
    /// Text arguments may be empty, they are validated by the bank. Numeric
    /// arguments must be present and parse.
    pub fn parse_command<'a>(
        name: &str,
        args: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, CommandError> {
        let kind = Self::parse_kind(name)?;
        let mut args = Args {
            command: kind,
            fields: args.into_iter(),
        };
        let command = match kind {
            CommandKind::RegisterClient => Self::RegisterClient {
                first_name: args.text(),
                last_name: args.text(),
                phone: args.optional(),
            },
            CommandKind::OpenAccount => Self::OpenAccount {
                cin: args.cin("cin")?,
                password: args.text(),
            },
            CommandKind::Authenticate => Self::Authenticate {
                cin: args.cin("cin")?,
                code: args.number("account")?,
                password: args.text(),
            },
            CommandKind::Deposit => Self::Deposit {
                code: args.number("account")?,
                amount: args.number("amount")?,
            },
            CommandKind::Withdraw => Self::Withdraw {
                code: args.number("account")?,
                amount: args.number("amount")?,
            },
            CommandKind::Transfer => Self::Transfer {
                from: args.number("account")?,
                target_cin: args.cin("target cin")?,
                to: args.number("target account")?,
                amount: args.number("amount")?,
            },
            CommandKind::ShowAccount => Self::ShowAccount {
                code: args.number("account")?,
            },
            CommandKind::ShowClient => Self::ShowClient {
                cin: args.cin("cin")?,
            },
            CommandKind::CountAccounts => Self::CountAccounts,
        };
        Ok(command)
    }

    fn parse_kind(name: &str) -> Result<CommandKind, CommandError> {
        let deserializer: StrDeserializer<'_, serde::de::value::Error> = name.into_deserializer();
        CommandKind::deserialize(deserializer).map_err(|_| CommandError::UnknownCommand {
            name: name.to_owned(),
        })
    }
}

struct Args<I> {
    command: CommandKind,
    fields: I,
}

impl<'a, I> Args<I>
where
    I: Iterator<Item = &'a str>,
{
    fn text(&mut self) -> String {
        self.fields.next().unwrap_or_default().to_owned()
    }

    fn optional(&mut self) -> Option<String> {
        self.fields
            .next()
            .filter(|value| !value.is_empty())
            .map(ToOwned::to_owned)
    }

    fn required(&mut self, name: &'static str) -> Result<&'a str, CommandError> {
        match self.fields.next() {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(CommandError::MissingArgument {
                command: self.command,
                name,
            }),
        }
    }

    fn cin(&mut self, name: &'static str) -> Result<Cin, CommandError> {
        self.required(name).map(Cin::new)
    }

    fn number<T: FromStr>(&mut self, name: &'static str) -> Result<T, CommandError> {
        let value = self.required(name)?;
        value.parse().map_err(|_| CommandError::InvalidNumber {
            command: self.command,
            name,
            value: value.to_owned(),
        })
    }
}
