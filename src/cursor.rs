//! Iteration over an `AssocTable`.
//!
//! Order is slot ascending, then chain order, and is fully determined by the
//! table's contents and insertion history.
//!
//! Two layers:
//! - `Cursor`: a plain `Copy` position that can be stored, advanced and
//!   dereferenced against the table later. It records the table's
//!   generation; once the table is structurally mutated (new key, removal,
//!   growth, clear) the cursor is stale and behaves as exhausted.
//! - `Iter`: a borrowing iterator built on cursors. The borrow rules out
//!   mutation for its whole lifetime.

use crate::key_scheme::KeyScheme;
use crate::table::AssocTable;
use core::iter::FusedIterator;
use slotmap::DefaultKey;

/// A position inside a table.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Cursor {
    slot: usize,
    node: Option<DefaultKey>,
    generation: u64,
}

impl Cursor {
    const fn exhausted(generation: u64) -> Self {
        Self {
            slot: 0,
            node: None,
            generation,
        }
    }

    /// False once the cursor has run past the last entry. A stale cursor
    /// may still report true here; use `AssocTable::is_valid` to also check
    /// that it belongs to the table's current structure.
    pub fn is_valid(&self) -> bool {
        self.node.is_some()
    }
}

impl<'a, V: ?Sized, S: KeyScheme> AssocTable<'a, V, S> {
    /// Cursor at the first entry, or an exhausted cursor if the table is empty.
    pub fn begin(&self) -> Cursor {
        match self.buckets.first_head_from(0) {
            Some((slot, node)) => Cursor {
                slot,
                node: Some(node),
                generation: self.generation,
            },
            None => Cursor::exhausted(self.generation),
        }
    }

    /// The position after `cursor`.
    pub fn advance(&self, cursor: Cursor) -> Cursor {
        let node = match self.live(cursor) {
            Some(n) => n,
            None => return Cursor::exhausted(self.generation),
        };
        if let Some(next) = self.buckets.next_in_chain(node) {
            return Cursor {
                node: Some(next),
                ..cursor
            };
        }
        match self.buckets.first_head_from(cursor.slot + 1) {
            Some((slot, head)) => Cursor {
                slot,
                node: Some(head),
                generation: self.generation,
            },
            None => Cursor::exhausted(self.generation),
        }
    }

    /// Key and value at `cursor`; `None` if exhausted or stale.
    pub fn item(&self, cursor: Cursor) -> Option<(S::Key<'a>, &'a V)> {
        let node = self.live(cursor)?;
        self.buckets.entry(node).map(|e| (e.key, e.value))
    }

    pub fn key(&self, cursor: Cursor) -> Option<S::Key<'a>> {
        self.item(cursor).map(|(k, _)| k)
    }

    pub fn value(&self, cursor: Cursor) -> Option<&'a V> {
        self.item(cursor).map(|(_, v)| v)
    }

    /// Whether `cursor` was derived from the table's current structure.
    pub fn is_current(&self, cursor: Cursor) -> bool {
        cursor.generation == self.generation
    }

    /// Whether `cursor` is current and points at an entry, i.e. whether
    /// `item(cursor)` is `Some`.
    pub fn is_valid(&self, cursor: Cursor) -> bool {
        self.live(cursor).is_some()
    }

    fn live(&self, cursor: Cursor) -> Option<DefaultKey> {
        if !self.is_current(cursor) {
            return None;
        }
        cursor.node
    }

    pub fn iter(&self) -> Iter<'_, 'a, V, S> {
        Iter {
            table: self,
            cursor: self.begin(),
            remaining: self.len(),
        }
    }
}

/// Iterator over `(key, value)` pairs in cursor order.
pub struct Iter<'t, 'a, V: ?Sized, S: KeyScheme> {
    table: &'t AssocTable<'a, V, S>,
    cursor: Cursor,
    remaining: usize,
}

impl<'t, 'a, V: ?Sized, S: KeyScheme> Iterator for Iter<'t, 'a, V, S> {
    type Item = (S::Key<'a>, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let item = self.table.item(self.cursor)?;
        self.cursor = self.table.advance(self.cursor);
        self.remaining -= 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'t, 'a, V: ?Sized, S: KeyScheme> ExactSizeIterator for Iter<'t, 'a, V, S> {}

impl<'t, 'a, V: ?Sized, S: KeyScheme> FusedIterator for Iter<'t, 'a, V, S> {}

impl<'t, 'a, V: ?Sized, S: KeyScheme> Clone for Iter<'t, 'a, V, S> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

impl<'t, 'a, V: ?Sized, S: KeyScheme> IntoIterator for &'t AssocTable<'a, V, S> {
    type Item = (S::Key<'a>, &'a V);
    type IntoIter = Iter<'t, 'a, V, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
