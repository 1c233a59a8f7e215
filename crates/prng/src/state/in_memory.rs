use std::collections::HashMap;

use revm::primitives::{Address, Bytes, Log, B256, U256};
use tracing::debug;

use super::{SnapshotId, StateCapabilities};
use crate::result::StateError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct AccountInfo {
    nonce: u64,
    balance: U256,
}

/// Undo record for a single mutation.
#[derive(Clone, Debug)]
enum JournalEntry {
    AccountCreated { address: Address },
    NonceChanged { address: Address, previous: u64 },
    BalanceChanged { address: Address, previous: U256 },
    StorageChanged { address: Address, key: B256, previous: Option<B256> },
    PredicatesChanged { address: Address, previous: Option<Vec<Bytes>> },
    LogAdded,
}

/// Journaled in-memory state.
///
/// Serves as the default host state for [`RngContext`](crate::RngContext) and
/// as the test double for the capability interface.
#[derive(Clone, Debug, Default)]
pub struct InMemoryState {
    accounts: HashMap<Address, AccountInfo>,
    storage: HashMap<(Address, B256), B256>,
    predicates: HashMap<Address, Vec<Bytes>>,
    logs: Vec<Log>,
    journal: Vec<JournalEntry>,
    /// Journal length at each live snapshot.
    snapshots: Vec<usize>,
}

impl InMemoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nonce of `address` outside of any journal, for genesis-style setup.
    pub fn with_nonce(mut self, address: Address, nonce: u64) -> Self {
        self.accounts.entry(address).or_default().nonce = nonce;
        self
    }

    /// Sets the balance of `address` outside of any journal.
    pub fn with_balance(mut self, address: Address, balance: U256) -> Self {
        self.accounts.entry(address).or_default().balance = balance;
        self
    }

    /// Number of pending undo records.
    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }

    /// Number of live snapshots.
    pub fn snapshot_depth(&self) -> usize {
        self.snapshots.len()
    }

    fn account_mut(&mut self, address: Address) -> &mut AccountInfo {
        if !self.accounts.contains_key(&address) {
            self.journal.push(JournalEntry::AccountCreated { address });
        }
        self.accounts.entry(address).or_default()
    }

    fn undo(&mut self, entry: JournalEntry) {
        match entry {
            JournalEntry::AccountCreated { address } => {
                self.accounts.remove(&address);
            }
            JournalEntry::NonceChanged { address, previous } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.nonce = previous;
                }
            }
            JournalEntry::BalanceChanged { address, previous } => {
                if let Some(account) = self.accounts.get_mut(&address) {
                    account.balance = previous;
                }
            }
            JournalEntry::StorageChanged {
                address,
                key,
                previous,
            } => match previous {
                Some(value) => {
                    self.storage.insert((address, key), value);
                }
                None => {
                    self.storage.remove(&(address, key));
                }
            },
            JournalEntry::PredicatesChanged { address, previous } => match previous {
                Some(predicates) => {
                    self.predicates.insert(address, predicates);
                }
                None => {
                    self.predicates.remove(&address);
                }
            },
            JournalEntry::LogAdded => {
                self.logs.pop();
            }
        }
    }
}

impl StateCapabilities for InMemoryState {
    fn storage(&self, address: Address, key: B256) -> B256 {
        self.storage
            .get(&(address, key))
            .copied()
            .unwrap_or(B256::ZERO)
    }

    fn set_storage(&mut self, address: Address, key: B256, value: B256) -> Result<(), StateError> {
        let previous = self.storage.insert((address, key), value);
        self.journal.push(JournalEntry::StorageChanged {
            address,
            key,
            previous,
        });
        Ok(())
    }

    fn nonce(&self, address: Address) -> u64 {
        self.accounts.get(&address).map_or(0, |a| a.nonce)
    }

    fn set_nonce(&mut self, address: Address, nonce: u64) -> Result<(), StateError> {
        let account = self.account_mut(address);
        let previous = core::mem::replace(&mut account.nonce, nonce);
        self.journal
            .push(JournalEntry::NonceChanged { address, previous });
        Ok(())
    }

    fn balance(&self, address: Address) -> U256 {
        self.accounts
            .get(&address)
            .map_or(U256::ZERO, |a| a.balance)
    }

    fn add_balance(&mut self, address: Address, amount: U256) -> Result<(), StateError> {
        let updated = self
            .balance(address)
            .checked_add(amount)
            .ok_or(StateError::BalanceOverflow)?;
        let account = self.account_mut(address);
        let previous = core::mem::replace(&mut account.balance, updated);
        self.journal
            .push(JournalEntry::BalanceChanged { address, previous });
        Ok(())
    }

    fn exists(&self, address: Address) -> bool {
        self.accounts.contains_key(&address)
    }

    fn create_account(&mut self, address: Address) -> Result<(), StateError> {
        self.account_mut(address);
        Ok(())
    }

    fn add_log(&mut self, log: Log) -> Result<(), StateError> {
        self.logs.push(log);
        self.journal.push(JournalEntry::LogAdded);
        Ok(())
    }

    fn logs(&self) -> &[Log] {
        &self.logs
    }

    fn predicate_slot(&self, address: Address, index: usize) -> Option<Bytes> {
        self.predicates
            .get(&address)
            .and_then(|predicates| predicates.get(index))
            .cloned()
    }

    fn set_predicate_slots(
        &mut self,
        address: Address,
        predicates: Vec<Bytes>,
    ) -> Result<(), StateError> {
        let previous = self.predicates.insert(address, predicates);
        self.journal
            .push(JournalEntry::PredicatesChanged { address, previous });
        Ok(())
    }

    fn snapshot(&mut self) -> SnapshotId {
        self.snapshots.push(self.journal.len());
        SnapshotId(self.snapshots.len() - 1)
    }

    fn revert_to_snapshot(&mut self, id: SnapshotId) -> Result<(), StateError> {
        let target = *self
            .snapshots
            .get(id.0)
            .ok_or(StateError::UnknownSnapshot(id))?;
        let undone = self.journal.len() - target;
        while self.journal.len() > target {
            if let Some(entry) = self.journal.pop() {
                self.undo(entry);
            }
        }
        self.snapshots.truncate(id.0 + 1);
        debug!(target: "prng::state", snapshot = id.0, undone, "reverted to snapshot");
        Ok(())
    }

    fn discard_snapshot(&mut self, id: SnapshotId) -> Result<(), StateError> {
        if id.0 >= self.snapshots.len() {
            return Err(StateError::UnknownSnapshot(id));
        }
        self.snapshots.truncate(id.0);
        // no live snapshot left to revert to
        if self.snapshots.is_empty() {
            self.journal.clear();
        }
        Ok(())
    }
}
