use std::fmt;

use thiserror::Error;

use crate::{
    account::{Account, AccountCode},
    directory::{Directory, DirectoryError},
};

/// Client identification number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cin(String);

impl Cin {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{field} is required")]
    EmptyName { field: &'static str },
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    cin: Cin,
    first_name: String,
    last_name: String,
    phone: String,
    accounts: Vec<AccountCode>,
}

impl Client {
    /// Builds a client with a freshly issued CIN. Registering it is up to
    /// the caller.
    pub fn create(
        first_name: &str,
        last_name: &str,
        phone: Option<&str>,
        directory: &mut Directory,
    ) -> Result<Self, ClientError> {
        let first_name = required(first_name, "first name")?;
        let last_name = required(last_name, "last name")?;
        let cin = directory.issue_cin()?;
        Ok(Self {
            cin,
            first_name,
            last_name,
            phone: phone.map(str::trim).unwrap_or_default().to_owned(),
            accounts: Vec::new(),
        })
    }

    pub fn cin(&self) -> &Cin {
        &self.cin
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = phone.into();
    }

    pub fn account_codes(&self) -> &[AccountCode] {
        &self.accounts
    }

    pub fn add_account(&mut self, code: AccountCode) {
        if !self.accounts.contains(&code) {
            self.accounts.push(code);
        }
    }

    /// Resolves owned account codes, skipping the ones the directory doesn't know.
    pub fn accounts<'d>(&self, directory: &'d Directory) -> Vec<&'d Account> {
        self.accounts
            .iter()
            .filter_map(|code| directory.find_account(*code))
            .collect()
    }
}

fn required(value: &str, field: &'static str) -> Result<String, ClientError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ClientError::EmptyName { field })
    } else {
        Ok(value.to_owned())
    }
}

impl fmt::Display for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let phone = if self.phone.is_empty() {
            "N/A"
        } else {
            self.phone.as_str()
        };
        write!(
            f,
            "CIN: {}, Name: {} {}, Tel: {}",
            self.cin, self.first_name, self.last_name, phone
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_client() {
        let mut directory = Directory::with_seed(1);
        let client = Client::create(" Amina ", "Zerrouki", None, &mut directory).unwrap();
        assert_eq!(client.first_name(), "Amina");
        assert_eq!(client.last_name(), "Zerrouki");
        assert_eq!(client.phone(), "");
        assert_eq!(client.cin().as_str().len(), 6);
        assert!(client.cin().as_str().chars().all(|c| c.is_ascii_digit()));
        assert!(client.account_codes().is_empty());
        assert_eq!(
            client.to_string(),
            format!("CIN: {}, Name: Amina Zerrouki, Tel: N/A", client.cin())
        );
    }

    #[test]
    fn names_are_required() {
        let mut directory = Directory::default();
        let err = Client::create("", "Zerrouki", Some("0555"), &mut directory).unwrap_err();
        assert_eq!(err.to_string(), "first name is required");
        let err = Client::create("Amina", "  ", None, &mut directory).unwrap_err();
        assert!(matches!(
            err,
            ClientError::EmptyName {
                field: "last name"
            }
        ));
    }

    #[test]
    fn add_account_is_idempotent() {
        let mut directory = Directory::default();
        let mut client = Client::create("Amina", "Zerrouki", None, &mut directory).unwrap();
        client.add_account(1);
        client.add_account(2);
        client.add_account(1);
        assert_eq!(client.account_codes(), &[1, 2]);
    }

    #[test]
    fn accounts_skips_unknown_codes() {
        let mut directory = Directory::default();
        let client = Client::create("Amina", "Zerrouki", Some("0555"), &mut directory).unwrap();
        let cin = client.cin().clone();
        directory.register_client(client).unwrap();
        let code = Account::create(&cin, "p", &mut directory).unwrap();

        let mut client = directory.find_client(&cin).unwrap().clone();
        client.add_account(42);
        let accounts = client.accounts(&directory);
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].code(), code);
    }

    #[test]
    fn set_phone() {
        let mut directory = Directory::default();
        let mut client = Client::create("Amina", "Zerrouki", None, &mut directory).unwrap();
        client.set_phone("0555 12 34 56");
        assert!(client.to_string().ends_with("Tel: 0555 12 34 56"));
    }
}
