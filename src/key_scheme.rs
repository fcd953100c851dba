//! Key schemes: the `{hash, equals}` pair a table is built around.
//!
//! A scheme is chosen once per table and stored inside it. Every table
//! operation (lookup, insert, remove, rehash) goes through the same two
//! methods, so the table itself never branches on the key mode.

use core::ffi::CStr;
use core::fmt;
use core::marker::PhantomData;

/// FNV-1a 64-bit offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
/// FNV-1a 64-bit prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over `bytes`.
#[inline]
pub fn fnv1a(bytes: &[u8]) -> u64 {
    let mut h = FNV_OFFSET_BASIS;
    for &b in bytes {
        h ^= u64::from(b);
        h = h.wrapping_mul(FNV_PRIME);
    }
    h
}

/// Tag naming the built-in comparison mode of a scheme.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum KeyMode {
    /// Keys compare by address.
    Identity,
    /// Keys compare by the bytes of a NUL-terminated string.
    ByteString,
    /// A user-supplied scheme.
    Custom,
}

/// Hash and equality for one kind of key.
///
/// `equals(a, b)` must imply `hash(a) == hash(b)`. Implementations must not
/// depend on any state that changes while keys are stored: the table caches
/// each key's hash at insert time and reuses it when growing.
pub trait KeyScheme {
    /// The key type, borrowed for `'a`.
    type Key<'a>: Copy + fmt::Debug;

    /// Which mode this scheme implements.
    const MODE: KeyMode;

    fn hash(&self, key: Self::Key<'_>) -> u64;

    fn equals(&self, a: Self::Key<'_>, b: Self::Key<'_>) -> bool;
}

/// The address of a borrowed referent, or the null address.
///
/// The referent is never read; only its address takes part in hashing and
/// comparison. Zero-sized referents may share an address and then compare
/// equal.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Address<'a> {
    addr: usize,
    _lt: PhantomData<&'a ()>,
}

impl<'a> Address<'a> {
    /// Address of `referent`. Metadata of unsized referents is discarded.
    #[inline]
    pub fn of<T: ?Sized>(referent: &'a T) -> Self {
        Self {
            addr: referent as *const T as *const () as usize,
            _lt: PhantomData,
        }
    }

    /// The null address, usable as a sentinel key.
    #[inline]
    pub const fn null() -> Self {
        Self {
            addr: 0,
            _lt: PhantomData,
        }
    }

    /// Wrap a raw pointer. The pointer is compared, never dereferenced.
    #[inline]
    pub fn from_ptr<T: ?Sized>(ptr: *const T) -> Self {
        Self {
            addr: ptr as *const () as usize,
            _lt: PhantomData,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        self.addr == 0
    }

    #[inline]
    pub fn as_ptr(&self) -> *const () {
        self.addr as *const ()
    }
}

impl fmt::Debug for Address<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:#x})", self.addr)
    }
}

/// Address-identity keys.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Identity;

impl KeyScheme for Identity {
    type Key<'a> = Address<'a>;

    const MODE: KeyMode = KeyMode::Identity;

    #[inline]
    fn hash(&self, key: Address<'_>) -> u64 {
        fnv1a(&(key.addr as u64).to_be_bytes())
    }

    #[inline]
    fn equals(&self, a: Address<'_>, b: Address<'_>) -> bool {
        a.addr == b.addr
    }
}

/// NUL-terminated byte-string keys, compared by content.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct ByteString;

impl KeyScheme for ByteString {
    type Key<'a> = &'a CStr;

    const MODE: KeyMode = KeyMode::ByteString;

    #[inline]
    fn hash(&self, key: &CStr) -> u64 {
        fnv1a(key.to_bytes())
    }

    #[inline]
    fn equals(&self, a: &CStr, b: &CStr) -> bool {
        a.to_bytes() == b.to_bytes()
    }
}
