//! Host-facing context types.
//!
//! - [`exec`]: the [`RngContextTr`](exec::RngContextTr) capability trait, the
//!   per-call [`CallContext`](exec::CallContext) and the write-guarded
//!   [`ScopedContext`](exec::ScopedContext) precompiles run against.
//! - [`default_ctx`]: a ready-made context over in-memory state.

pub mod default_ctx;
pub mod exec;
