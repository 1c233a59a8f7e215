use revm::primitives::{Address, Bytes, Log, B256, U256};
use tracing::debug;

use super::{SnapshotId, StateCapabilities};
use crate::result::StateError;

/// State access for a single precompile call.
///
/// Reads always pass through. When the call is read-only every mutating
/// capability fails with [`StateError::WriteProtection`] before reaching the
/// underlying state. Snapshots are not mutations and stay available.
#[derive(Debug)]
pub struct CallScope<S> {
    inner: S,
    read_only: bool,
}

impl<S: StateCapabilities> CallScope<S> {
    pub fn new(inner: S, read_only: bool) -> Self {
        Self { inner, read_only }
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn ensure_writable(&self, op: &'static str) -> Result<(), StateError> {
        if self.read_only {
            debug!(target: "prng::state", op, "rejected write in read-only call");
            return Err(StateError::WriteProtection);
        }
        Ok(())
    }
}

impl<S: StateCapabilities> StateCapabilities for CallScope<S> {
    fn storage(&self, address: Address, key: B256) -> B256 {
        self.inner.storage(address, key)
    }

    fn set_storage(&mut self, address: Address, key: B256, value: B256) -> Result<(), StateError> {
        self.ensure_writable("set_storage")?;
        self.inner.set_storage(address, key, value)
    }

    fn nonce(&self, address: Address) -> u64 {
        self.inner.nonce(address)
    }

    fn set_nonce(&mut self, address: Address, nonce: u64) -> Result<(), StateError> {
        self.ensure_writable("set_nonce")?;
        self.inner.set_nonce(address, nonce)
    }

    fn balance(&self, address: Address) -> U256 {
        self.inner.balance(address)
    }

    fn add_balance(&mut self, address: Address, amount: U256) -> Result<(), StateError> {
        self.ensure_writable("add_balance")?;
        self.inner.add_balance(address, amount)
    }

    fn exists(&self, address: Address) -> bool {
        self.inner.exists(address)
    }

    fn create_account(&mut self, address: Address) -> Result<(), StateError> {
        self.ensure_writable("create_account")?;
        self.inner.create_account(address)
    }

    fn add_log(&mut self, log: Log) -> Result<(), StateError> {
        self.ensure_writable("add_log")?;
        self.inner.add_log(log)
    }

    fn logs(&self) -> &[Log] {
        self.inner.logs()
    }

    fn predicate_slot(&self, address: Address, index: usize) -> Option<Bytes> {
        self.inner.predicate_slot(address, index)
    }

    fn set_predicate_slots(
        &mut self,
        address: Address,
        predicates: Vec<Bytes>,
    ) -> Result<(), StateError> {
        self.ensure_writable("set_predicate_slots")?;
        self.inner.set_predicate_slots(address, predicates)
    }

    fn snapshot(&mut self) -> SnapshotId {
        self.inner.snapshot()
    }

    fn revert_to_snapshot(&mut self, id: SnapshotId) -> Result<(), StateError> {
        self.inner.revert_to_snapshot(id)
    }

    fn discard_snapshot(&mut self, id: SnapshotId) -> Result<(), StateError> {
        self.inner.discard_snapshot(id)
    }
}
