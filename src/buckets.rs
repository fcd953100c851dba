//! Bucket array and chain storage.
//!
//! Entries live in a generational arena (`SlotMap`); a bucket is a `Chain`
//! recording the arena keys of its first and last entry. Entries link to the
//! next entry of their chain by arena key, so unlinking, relinking during
//! growth and freeing never juggle raw pointers.
//!
//! This layer knows nothing about key schemes or load factors. It places
//! entries by their cached hash and finds them with a caller-supplied
//! predicate.

use crate::error::AllocError;
use slotmap::{DefaultKey, SlotMap};

#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) hash: u64,
    next: Option<DefaultKey>,
}

/// One bucket: an ordered chain of entries.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Chain {
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
    len: usize,
}

impl Chain {
    const EMPTY: Chain = Chain {
        head: None,
        tail: None,
        len: 0,
    };

    pub(crate) fn len(&self) -> usize {
        self.len
    }
}

/// Allocate `capacity` empty chains, reporting failure instead of aborting.
pub(crate) fn empty_chains(capacity: usize) -> Result<Vec<Chain>, AllocError> {
    let mut chains = Vec::new();
    chains
        .try_reserve_exact(capacity)
        .map_err(|_| AllocError::Buckets)?;
    chains.resize(capacity, Chain::EMPTY);
    Ok(chains)
}

#[inline]
pub(crate) fn slot_for(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "slot lookup on a table without buckets");
    (hash % capacity as u64) as usize
}

pub(crate) struct Buckets<K, V> {
    chains: Vec<Chain>,
    nodes: SlotMap<DefaultKey, Entry<K, V>>,
}

impl<K, V> Buckets<K, V> {
    pub(crate) fn from_chains(chains: Vec<Chain>) -> Self {
        Self {
            chains,
            nodes: SlotMap::with_key(),
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.chains.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn entry(&self, node: DefaultKey) -> Option<&Entry<K, V>> {
        self.nodes.get(node)
    }

    pub(crate) fn entry_mut(&mut self, node: DefaultKey) -> Option<&mut Entry<K, V>> {
        self.nodes.get_mut(node)
    }

    /// Successor of `node` within its chain.
    pub(crate) fn next_in_chain(&self, node: DefaultKey) -> Option<DefaultKey> {
        self.nodes.get(node).and_then(|e| e.next)
    }

    /// First non-empty slot at or after `from`, with its head entry.
    pub(crate) fn first_head_from(&self, from: usize) -> Option<(usize, DefaultKey)> {
        self.chains
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(slot, c)| c.head.map(|h| (slot, h)))
    }

    /// Walk the chain for `hash` and return the first entry accepted by `eq`.
    pub(crate) fn find<F>(&self, hash: u64, mut eq: F) -> Option<DefaultKey>
    where
        F: FnMut(&Entry<K, V>) -> bool,
    {
        if self.chains.is_empty() {
            return None;
        }
        let mut cur = self.chains[slot_for(hash, self.chains.len())].head;
        while let Some(node) = cur {
            let e = &self.nodes[node];
            if e.hash == hash && eq(e) {
                return Some(node);
            }
            cur = e.next;
        }
        None
    }

    /// Append a new entry at the tail of its chain. The bucket array must be
    /// non-empty.
    pub(crate) fn push_back(&mut self, key: K, value: V, hash: u64) -> DefaultKey {
        let slot = slot_for(hash, self.chains.len());
        let node = self.nodes.insert(Entry {
            key,
            value,
            hash,
            next: None,
        });
        link_tail(&mut self.chains[slot], &mut self.nodes, node);
        node
    }

    /// Unlink and free the first entry for `hash` accepted by `eq`.
    pub(crate) fn unlink<F>(&mut self, hash: u64, mut eq: F) -> Option<Entry<K, V>>
    where
        F: FnMut(&Entry<K, V>) -> bool,
    {
        if self.chains.is_empty() {
            return None;
        }
        let slot = slot_for(hash, self.chains.len());
        let chain = &mut self.chains[slot];
        let mut prev: Option<DefaultKey> = None;
        let mut cur = chain.head;
        while let Some(node) = cur {
            let e = &self.nodes[node];
            let next = e.next;
            if e.hash == hash && eq(e) {
                match prev {
                    Some(p) => self.nodes[p].next = next,
                    None => chain.head = next,
                }
                if chain.tail == Some(node) {
                    chain.tail = prev;
                }
                chain.len -= 1;
                return self.nodes.remove(node);
            }
            prev = Some(node);
            cur = next;
        }
        None
    }

    /// Move every entry into `fresh`, visiting old slots in order and each
    /// chain front to back. Entries that share a new slot keep their
    /// relative order. Infallible: `fresh` is already allocated.
    pub(crate) fn redistribute(&mut self, mut fresh: Vec<Chain>) {
        debug_assert!(fresh.iter().all(|c| *c == Chain::EMPTY));
        let capacity = fresh.len();
        let old = core::mem::take(&mut self.chains);
        for chain in &old {
            let mut cur = chain.head;
            while let Some(node) = cur {
                let e = &mut self.nodes[node];
                cur = e.next.take();
                let slot = slot_for(e.hash, capacity);
                link_tail(&mut fresh[slot], &mut self.nodes, node);
            }
        }
        self.chains = fresh;
        debug_assert_eq!(self.chain_len_sum(), self.nodes.len());
    }

    /// Drop every entry; the bucket count is unchanged.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        for c in self.chains.iter_mut() {
            *c = Chain::EMPTY;
        }
    }

    pub(crate) fn chain_len_sum(&self) -> usize {
        self.chains.iter().map(Chain::len).sum()
    }
}

fn link_tail<K, V>(
    chain: &mut Chain,
    nodes: &mut SlotMap<DefaultKey, Entry<K, V>>,
    node: DefaultKey,
) {
    match chain.tail {
        Some(t) => nodes[t].next = Some(node),
        None => chain.head = Some(node),
    }
    chain.tail = Some(node);
    chain.len += 1;
}
