//! Deterministic memory pools for setup-time allocation on embedded targets.
//!
//! The synthesis engine needs a handful of dynamically sized buffers
//! (oscillator tables, transform scratch space) when a voice is built, but
//! the target has no general-purpose heap. This crate carves that memory out
//! of a single region the host registers once per instance.
//!
//! # Pools
//!
//! - [`Pool`] — variable-size blocks. Each block carries a small header;
//!   freed blocks go onto a singly linked free list that is searched
//!   first-fit before the bump cursor is advanced. Adjacent free blocks are
//!   never coalesced.
//! - [`BlockPool`] — the region is split into `N` equal blocks. Allocation
//!   and release are O(1) and never fragment, but every request must fit in
//!   one block.
//!
//! ```text
//! Pool memory:
//! ┌────────┬─────────┬────────┬──────────────────┬───────────────────────┐
//! │ header │ payload │ header │     payload      │  unused (bump region) │
//! └────────┴─────────┴────────┴──────────────────┴───────────────────────┘
//! 0                                              ^ used           capacity
//! ```
//!
//! Neither pool is meant to be touched from the audio callback: all
//! allocation happens while the instance is being constructed.
//!
//! # Crate Features
//!
//! - **`defmt`** — structured logging and [`defmt::Format`] on public types.

#![no_std]

mod block_pool;
mod error;
mod pool;

pub use block_pool::BlockPool;
pub use error::PoolError;
pub use pool::{Pool, ALIGN, HEADER_SIZE, MIN_BLOCK};
