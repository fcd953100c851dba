//! AddressSet: identity-keyed set of borrowed referents.
//!
//! A projection of `AssocTable` where every referent is both key and value:
//! `add(v)` is `insert(Address::of(v), v)`. Membership is by address, so two
//! equal values at different addresses are distinct members.

use crate::cursor::{Cursor, Iter};
use crate::error::AllocError;
use crate::key_scheme::{Address, Identity};
use crate::table::AssocTable;
use core::fmt;

pub struct AddressSet<'a, T: ?Sized> {
    table: AssocTable<'a, T, Identity>,
}

impl<'a, T: ?Sized> AddressSet<'a, T> {
    pub fn new() -> Self {
        Self {
            table: AssocTable::new(),
        }
    }

    pub fn try_with_capacity(capacity: usize) -> Result<Self, AllocError> {
        Ok(Self {
            table: AssocTable::try_with_capacity_and_scheme(capacity, Identity)?,
        })
    }

    /// Add `value`. Returns `Ok(true)` if it was not yet a member.
    pub fn add(&mut self, value: &'a T) -> Result<bool, AllocError> {
        Ok(self.table.insert(Address::of(value), value)?.is_none())
    }

    pub fn contains(&self, value: &T) -> bool {
        self.table.contains_key(Address::of(value))
    }

    /// Remove `value`. Returns whether it was a member.
    pub fn remove(&mut self, value: &T) -> bool {
        self.table.remove(Address::of(value)).is_some()
    }

    /// Remove every member, keeping the capacity.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    pub fn load_factor(&self) -> f32 {
        self.table.load_factor()
    }

    pub fn begin(&self) -> Cursor {
        self.table.begin()
    }

    pub fn advance(&self, cursor: Cursor) -> Cursor {
        self.table.advance(cursor)
    }

    /// Whether `cursor` is current and points at a member.
    pub fn is_valid(&self, cursor: Cursor) -> bool {
        self.table.is_valid(cursor)
    }

    /// Member at `cursor`; `None` if exhausted or stale.
    pub fn value(&self, cursor: Cursor) -> Option<&'a T> {
        self.table.value(cursor)
    }

    pub fn iter(&self) -> SetIter<'_, 'a, T> {
        SetIter {
            inner: self.table.iter(),
        }
    }

    #[cfg(any(test, feature = "fault_injection"))]
    pub fn fail_allocations_after(&mut self, n: usize) {
        self.table.fail_allocations_after(n);
    }

    #[cfg(any(test, feature = "fault_injection"))]
    pub fn heal_allocations(&mut self) {
        self.table.heal_allocations();
    }
}

impl<'a, T: ?Sized> Default for AddressSet<'a, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, T: ?Sized + fmt::Debug> fmt::Debug for AddressSet<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Members in table iteration order.
pub struct SetIter<'s, 'a, T: ?Sized> {
    inner: Iter<'s, 'a, T, Identity>,
}

impl<'s, 'a, T: ?Sized> Iterator for SetIter<'s, 'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'s, 'a, T: ?Sized> ExactSizeIterator for SetIter<'s, 'a, T> {}

impl<'s, 'a, T: ?Sized> IntoIterator for &'s AddressSet<'a, T> {
    type Item = &'a T;
    type IntoIter = SetIter<'s, 'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
