//! Narrow state surface available to stateful precompiles.
//!
//! Precompiles never see the host ledger directly. They get a
//! [`StateCapabilities`] implementation, usually wrapped in a
//! [`CallScope`](scope::CallScope) that rejects writes during read-only calls.
//!
//! # Modules
//!
//! - [`in_memory`]: journaled in-memory state with a snapshot stack.
//! - [`scope`]: per-call wrapper enforcing write protection.

pub mod in_memory;
pub mod scope;

use auto_impl::auto_impl;
use revm::primitives::{Address, Bytes, Log, B256, U256};

use crate::result::StateError;

/// Opaque handle to a state snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SnapshotId(pub usize);

/// Capability set a stateful precompile may use.
///
/// Every mutation participates in the snapshot mechanism: reverting to a
/// snapshot undoes all mutations performed after it was taken.
#[auto_impl(&mut, Box)]
pub trait StateCapabilities {
    /// Reads the 32-byte word stored at `key` of `address`. Unset slots read as zero.
    fn storage(&self, address: Address, key: B256) -> B256;

    /// Writes a 32-byte word at `key` of `address`.
    fn set_storage(&mut self, address: Address, key: B256, value: B256) -> Result<(), StateError>;

    /// Account nonce, zero for unknown accounts.
    fn nonce(&self, address: Address) -> u64;

    fn set_nonce(&mut self, address: Address, nonce: u64) -> Result<(), StateError>;

    /// Account balance, zero for unknown accounts.
    fn balance(&self, address: Address) -> U256;

    fn add_balance(&mut self, address: Address, amount: U256) -> Result<(), StateError>;

    fn exists(&self, address: Address) -> bool;

    /// Creates an empty account. Existing accounts are left untouched.
    fn create_account(&mut self, address: Address) -> Result<(), StateError>;

    fn add_log(&mut self, log: Log) -> Result<(), StateError>;

    /// Logs emitted so far, in emission order.
    fn logs(&self) -> &[Log];

    /// Predicate bytes attached to `address` at `index`, if any.
    ///
    /// Predicates are opaque to the precompile, the host uses them for
    /// precondition checks.
    fn predicate_slot(&self, address: Address, index: usize) -> Option<Bytes>;

    /// Replaces all predicates attached to `address`.
    fn set_predicate_slots(
        &mut self,
        address: Address,
        predicates: Vec<Bytes>,
    ) -> Result<(), StateError>;

    /// Takes a snapshot of the current state.
    fn snapshot(&mut self) -> SnapshotId;

    /// Reverts every mutation made after `id` was taken. Snapshots taken after
    /// `id` are discarded, `id` itself stays valid.
    fn revert_to_snapshot(&mut self, id: SnapshotId) -> Result<(), StateError>;

    /// Releases `id` and every snapshot taken after it, keeping all mutations.
    /// Mutations stay revertible through snapshots taken before `id`.
    fn discard_snapshot(&mut self, id: SnapshotId) -> Result<(), StateError>;
}
