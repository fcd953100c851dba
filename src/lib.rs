//! assoc-table: a single-threaded, chained hash table over borrowed keys
//! and values.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: one associative table whose key comparison is pluggable, with
//!   predictable growth and a deterministic iteration order.
//! - Layers:
//!   - `KeyScheme`: the `{hash, equals}` pair, fixed per table. Built-ins
//!     are `Identity` (keys are addresses) and `ByteString` (keys are
//!     `&CStr`, compared by content). Both hash with 64-bit FNV-1a.
//!   - `Buckets`: bucket array of chains over a generational arena
//!     (`slotmap`). Entries link by arena key, so there are no raw
//!     next-pointers to leak or double free.
//!   - `AssocTable`: lookup, insert, remove, clear and growth, delegating
//!     all key handling to its scheme.
//!   - `Cursor`/`Iter`: restartable positions and a borrowing iterator.
//!   - `AddressSet`: identity-keyed set on top of the table.
//!
//! Ownership
//! - The table owns its bucket array and entries, never the referents.
//!   Keys and values are borrowed for `'a`, so the compiler enforces that
//!   referents outlive the table.
//! - Null values and null string keys cannot be expressed: values are
//!   `&V` and string keys are `&CStr`. The null address is a valid
//!   identity key.
//!
//! Growth
//! - Growth is checked before the insert that would push `len / capacity`
//!   past 0.75. The bucket count doubles (0 grows to 1) until the new entry
//!   fits; replacing the value of an existing key never grows.
//! - The new bucket array is allocated before any entry moves. A failed
//!   allocation leaves the table untouched; entries are then relinked in
//!   bucket-then-chain order, which cannot fail.
//! - Each entry caches its key hash, so growth never calls back into the
//!   scheme.
//! - Tables never shrink.
//!
//! Iteration
//! - Order is slot ascending, then chain order.
//! - Cursors record the table generation, which every structural change
//!   bumps. A stale cursor reads as exhausted instead of pointing at freed
//!   or moved entries. `Iter` borrows the table, so it cannot go stale.
//!
//! Notes and non-goals
//! - Not thread-safe; no internal locking.
//! - No removal while iterating.
//! - Allocation failures are reported, never retried. The bucket array is
//!   allocated fallibly; entry allocation goes through the arena, which
//!   aborts on out-of-memory like any `Vec`. The `fault_injection` feature
//!   lets tests fail either allocation on demand.

mod address_set;
mod buckets;
mod cursor;
mod error;
mod fail_point;
pub mod key_scheme;
mod table;
mod table_proptest;

// Public surface
pub use address_set::{AddressSet, SetIter};
pub use cursor::{Cursor, Iter};
pub use error::AllocError;
pub use key_scheme::{fnv1a, Address, ByteString, Identity, KeyMode, KeyScheme};
pub use table::{AssocTable, MAX_LOAD_FACTOR};
