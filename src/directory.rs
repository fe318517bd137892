use std::collections::{HashMap, HashSet};

use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    account::{Account, AccountCode},
    client::{Cin, Client},
};

/// Upper bound on CIN draws before giving up.
pub const MAX_CIN_ATTEMPTS: usize = 10_000;

const CIN_RANGE: std::ops::RangeInclusive<u32> = 100_000..=999_999;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("CIN {cin} not found")]
    UnknownClient { cin: Cin },
    #[error("Account #{code} not found")]
    UnknownAccount { code: AccountCode },
    #[error("Identifier {id} is already registered")]
    DuplicateIdentifier { id: String },
    #[error("No free CIN found after {attempts} attempts")]
    IdentifierSpaceExhausted { attempts: usize },
}

/// Registry of every client and account created in this process, and the
/// source of their identifiers. Entries are never removed.
#[derive(Debug)]
pub struct Directory {
    clients: HashMap<Cin, Client>,
    accounts: HashMap<AccountCode, Account>,
    issued_cins: HashSet<Cin>,
    last_code: AccountCode,
    rng: StdRng,
}

impl Default for Directory {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Directory {
    /// Directory whose CIN sequence is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            clients: HashMap::new(),
            accounts: HashMap::new(),
            issued_cins: HashSet::new(),
            last_code: 0,
            rng,
        }
    }

    /// Draws a random 6 digit CIN that was never issued by this directory.
    pub fn issue_cin(&mut self) -> Result<Cin, DirectoryError> {
        for _ in 0..MAX_CIN_ATTEMPTS {
            let cin = Cin::new(self.rng.gen_range(CIN_RANGE).to_string());
            if self.issued_cins.insert(cin.clone()) {
                return Ok(cin);
            }
            debug!(%cin, "CIN collision, drawing again");
        }
        Err(DirectoryError::IdentifierSpaceExhausted {
            attempts: MAX_CIN_ATTEMPTS,
        })
    }

    pub(crate) fn next_account_code(&mut self) -> AccountCode {
        self.last_code += 1;
        self.last_code
    }

    pub fn register_client(&mut self, client: Client) -> Result<(), DirectoryError> {
        if self.clients.contains_key(client.cin()) {
            return Err(DirectoryError::DuplicateIdentifier {
                id: client.cin().to_string(),
            });
        }
        info!(cin = %client.cin(), "client registered");
        self.issued_cins.insert(client.cin().clone());
        self.clients.insert(client.cin().clone(), client);
        Ok(())
    }

    pub fn register_account(&mut self, account: Account) -> Result<(), DirectoryError> {
        if self.accounts.contains_key(&account.code()) {
            return Err(DirectoryError::DuplicateIdentifier {
                id: account.code().to_string(),
            });
        }
        self.accounts.insert(account.code(), account);
        Ok(())
    }

    pub fn find_client(&self, cin: &Cin) -> Option<&Client> {
        self.clients.get(cin)
    }

    pub fn find_client_mut(&mut self, cin: &Cin) -> Option<&mut Client> {
        self.clients.get_mut(cin)
    }

    pub fn find_account(&self, code: AccountCode) -> Option<&Account> {
        self.accounts.get(&code)
    }

    pub fn find_account_mut(&mut self, code: AccountCode) -> Option<&mut Account> {
        self.accounts.get_mut(&code)
    }

    /// Both accounts mutably at once. `None` if the codes are equal or either is unknown.
    pub fn find_account_pair_mut(
        &mut self,
        first: AccountCode,
        second: AccountCode,
    ) -> Option<(&mut Account, &mut Account)> {
        if first == second {
            return None;
        }
        match self.accounts.get_disjoint_mut([&first, &second]) {
            [Some(first), Some(second)] => Some((first, second)),
            _ => None,
        }
    }

    /// Number of accounts ever opened, which is also the last issued code.
    pub fn account_count(&self) -> AccountCode {
        self.last_code
    }

    /// Clients ordered by CIN.
    pub fn clients(&self) -> Vec<&Client> {
        let mut clients: Vec<_> = self.clients.values().collect();
        clients.sort_by(|a, b| a.cin().cmp(b.cin()));
        clients
    }

    /// Accounts ordered by code.
    pub fn accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<_> = self.accounts.values().collect();
        accounts.sort_by_key(|acc| acc.code());
        accounts
    }
}
