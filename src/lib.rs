//! Purpose: Library crate for the `assetio` host/manager protocol and its C ABI.
//! Exports: `core` (value, batch, session types), `manager_api`, `host_api`, `abi`,
//!          `config`, `log`, `simple_manager`.
//! Role: Shared by the `assetio` CLI, Rust hosts and managers, and C bindings (cdylib).
//! Invariants: Every batch call yields exactly one outcome per input index, in input order.
//! Invariants: Errors never cross the C boundary as panics; they become code + message.
pub mod abi;
pub mod config;
pub mod core;
pub mod host_api;
pub mod log;
pub mod manager_api;
pub mod simple_manager;
