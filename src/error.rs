//! Allocation failures reported by the table.

use core::fmt;

/// Why a table could not acquire backing storage.
///
/// Every variant leaves the table in the state it was in before the failing
/// call, apart from a completed rehash that preceded a failed entry
/// allocation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum AllocError {
    /// Doubling the bucket count would overflow `usize`.
    CapacityOverflow,
    /// The bucket array could not be allocated.
    Buckets,
    /// A chain entry could not be allocated.
    Node,
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocError::CapacityOverflow => f.write_str("bucket count overflows usize"),
            AllocError::Buckets => f.write_str("failed to allocate bucket array"),
            AllocError::Node => f.write_str("failed to allocate chain entry"),
        }
    }
}

impl std::error::Error for AllocError {}
