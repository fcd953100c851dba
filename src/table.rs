//! AssocTable: chained hash table over borrowed keys and values.

use crate::buckets::{self, Buckets};
use crate::error::AllocError;
use crate::fail_point::AllocGate;
use crate::key_scheme::{Identity, KeyMode, KeyScheme};
use core::fmt;

/// Growth keeps `len / capacity` at or below this ratio after every insert.
/// The check runs before linking a new key, on the load that key would give.
pub const MAX_LOAD_FACTOR: f32 = 0.75;

// MAX_LOAD_FACTOR as an exact ratio, so the threshold check stays in integers.
const LOAD_NUM: u128 = 3;
const LOAD_DEN: u128 = 4;

#[inline]
fn exceeds_max_load(len: usize, capacity: usize) -> bool {
    len as u128 * LOAD_DEN > capacity as u128 * LOAD_NUM
}

/// Smallest capacity reachable from `capacity` by repeated doubling (0 grows
/// to 1) that holds `len` entries within the maximum load factor.
fn grown_capacity(capacity: usize, len: usize) -> Result<usize, AllocError> {
    let mut target = capacity;
    loop {
        target = match target {
            0 => 1,
            n => n.checked_mul(2).ok_or(AllocError::CapacityOverflow)?,
        };
        if !exceeds_max_load(len, target) {
            return Ok(target);
        }
    }
}

/// A mapping from borrowed keys to borrowed values.
///
/// The table owns its bucket array and chain entries; it never owns the
/// referents behind keys and values. Both must outlive `'a`.
pub struct AssocTable<'a, V: ?Sized, S: KeyScheme = Identity> {
    scheme: S,
    pub(crate) buckets: Buckets<S::Key<'a>, &'a V>,
    // Bumped on every structural change; cursors record it.
    pub(crate) generation: u64,
    gate: AllocGate,
}

impl<'a, V: ?Sized> AssocTable<'a, V> {
    /// An identity-keyed table with no buckets yet.
    pub fn new() -> Self {
        Self::with_scheme(Identity)
    }

    /// An identity-keyed table with exactly `capacity` buckets.
    ///
    /// Panics if the bucket array cannot be allocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_scheme(capacity, Identity)
    }
}

impl<'a, V: ?Sized> Default for AssocTable<'a, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, V: ?Sized, S: KeyScheme> AssocTable<'a, V, S> {
    /// A table using `scheme`, with no buckets yet.
    pub fn with_scheme(scheme: S) -> Self {
        Self {
            scheme,
            buckets: Buckets::from_chains(Vec::new()),
            generation: 0,
            gate: AllocGate::new(),
        }
    }

    /// A table using `scheme` with exactly `capacity` empty buckets.
    pub fn try_with_capacity_and_scheme(capacity: usize, scheme: S) -> Result<Self, AllocError> {
        let chains = buckets::empty_chains(capacity)?;
        Ok(Self {
            scheme,
            buckets: Buckets::from_chains(chains),
            generation: 0,
            gate: AllocGate::new(),
        })
    }

    /// Like `try_with_capacity_and_scheme`, panicking on failure.
    pub fn with_capacity_and_scheme(capacity: usize, scheme: S) -> Self {
        match Self::try_with_capacity_and_scheme(capacity, scheme) {
            Ok(t) => t,
            Err(e) => panic!("AssocTable with {} buckets: {}", capacity, e),
        }
    }

    pub fn scheme(&self) -> &S {
        &self.scheme
    }

    pub fn mode(&self) -> KeyMode {
        S::MODE
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of buckets. Only grows.
    pub fn capacity(&self) -> usize {
        self.buckets.capacity()
    }

    /// `len / capacity`, or 0 for a table without buckets.
    pub fn load_factor(&self) -> f32 {
        match self.capacity() {
            0 => 0.0,
            c => self.len() as f32 / c as f32,
        }
    }

    pub fn get(&self, key: S::Key<'_>) -> Option<&'a V> {
        if self.capacity() == 0 {
            return None;
        }
        let hash = self.scheme.hash(key);
        let scheme = &self.scheme;
        let node = self.buckets.find(hash, |e| scheme.equals(e.key, key))?;
        self.buckets.entry(node).map(|e| e.value)
    }

    pub fn contains_key(&self, key: S::Key<'_>) -> bool {
        self.get(key).is_some()
    }

    /// Map `key` to `value`.
    ///
    /// If an equal key is present its value is replaced in place (the stored
    /// key is kept) and the old value returned. Otherwise the table grows if
    /// the new entry would push the load factor past `MAX_LOAD_FACTOR`, and
    /// the entry is appended to the tail of its chain.
    ///
    /// On error the table holds the same entries as before. A growth that
    /// completed before a failed entry allocation is kept.
    pub fn insert(&mut self, key: S::Key<'a>, value: &'a V) -> Result<Option<&'a V>, AllocError> {
        let hash = self.scheme.hash(key);
        let scheme = &self.scheme;
        if let Some(node) = self.buckets.find(hash, |e| scheme.equals(e.key, key)) {
            if let Some(e) = self.buckets.entry_mut(node) {
                return Ok(Some(core::mem::replace(&mut e.value, value)));
            }
        }

        let len = self.len() + 1;
        if self.capacity() == 0 || exceeds_max_load(len, self.capacity()) {
            let target = grown_capacity(self.capacity(), len)?;
            self.rehash(target)?;
        }

        self.gate.admit(AllocError::Node)?;
        self.buckets.push_back(key, value, hash);
        self.generation = self.generation.wrapping_add(1);
        debug_assert!(!exceeds_max_load(self.len(), self.capacity()));
        Ok(None)
    }

    /// Remove `key`, returning its value. Never shrinks the table.
    pub fn remove(&mut self, key: S::Key<'_>) -> Option<&'a V> {
        if self.capacity() == 0 {
            return None;
        }
        let hash = self.scheme.hash(key);
        let scheme = &self.scheme;
        let entry = self.buckets.unlink(hash, |e| scheme.equals(e.key, key))?;
        self.generation = self.generation.wrapping_add(1);
        Some(entry.value)
    }

    /// Remove every entry, keeping the bucket array.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    // All-or-nothing: the new bucket array is fully allocated before any
    // entry moves.
    fn rehash(&mut self, capacity: usize) -> Result<(), AllocError> {
        self.gate.admit(AllocError::Buckets)?;
        let fresh = buckets::empty_chains(capacity)?;
        self.buckets.redistribute(fresh);
        self.generation = self.generation.wrapping_add(1);
        Ok(())
    }

    /// Let the next `n` allocations succeed and fail every one after them.
    #[cfg(any(test, feature = "fault_injection"))]
    pub fn fail_allocations_after(&mut self, n: usize) {
        self.gate.arm(n);
    }

    /// Undo `fail_allocations_after`.
    #[cfg(any(test, feature = "fault_injection"))]
    pub fn heal_allocations(&mut self) {
        self.gate.disarm();
    }
}

impl<'a, V, S> fmt::Debug for AssocTable<'a, V, S>
where
    V: ?Sized + fmt::Debug,
    S: KeyScheme,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
