// AssocTable integration test suite.
//
// Each test documents what behavior is being verified. The core invariants
// exercised:
// - Round trip: get(k) returns the latest value inserted for k.
// - Size: len counts distinct keys under the table's key scheme.
// - Growth: the load factor never exceeds 0.75 after an insert, and
//   tables never shrink.
// - Iteration: every live entry exactly once, in a repeatable order.
// - Ownership: the table borrows keys and values; referents stay put.
use assoc_table::{
    fnv1a, Address, AddressSet, AssocTable, ByteString, Identity, KeyMode, KeyScheme,
    MAX_LOAD_FACTOR,
};
use std::collections::BTreeSet;
use std::ffi::{CStr, CString};

// Test: identity keys A->"x", B->"y", A->"z" from a zero capacity hint.
// Verifies: re-insert replaces in place; size counts distinct keys.
#[test]
fn identity_scenario() {
    let a = 0u8;
    let b = 0u8;
    let mut t: AssocTable<str> = AssocTable::with_capacity(0);
    t.insert(Address::of(&a), "x").unwrap();
    t.insert(Address::of(&b), "y").unwrap();
    t.insert(Address::of(&a), "z").unwrap();

    assert_eq!(t.len(), 2);
    assert_eq!(t.get(Address::of(&a)), Some("z"));
    assert_eq!(t.get(Address::of(&b)), Some("y"));
    assert!(t.load_factor() <= MAX_LOAD_FACTOR);
}

// Test: string keys "foo"->v1, "bar"->v2, then remove "foo".
// Verifies: removal drops exactly one entry; the other is intact.
#[test]
fn byte_string_scenario() {
    let (v1, v2) = (1u32, 2u32);
    let foo = CString::new("foo").unwrap();
    let bar = CString::new("bar").unwrap();
    let mut t: AssocTable<u32, ByteString> = AssocTable::with_scheme(ByteString);
    t.insert(&foo, &v1).unwrap();
    t.insert(&bar, &v2).unwrap();
    assert_eq!(t.remove(&foo), Some(&v1));

    assert_eq!(t.len(), 1);
    assert_eq!(t.get(&foo), None);
    assert_eq!(t.get(&bar), Some(&v2));
}

// Test: lookups with a key that lives shorter than the table.
// Verifies: query keys are only borrowed for the call.
#[test]
fn byte_string_lookup_with_temporary_key() {
    let v = 9i64;
    let stored = CString::new("session").unwrap();
    let mut t: AssocTable<i64, ByteString> = AssocTable::with_scheme(ByteString);
    t.insert(&stored, &v).unwrap();
    {
        let query = CString::new(String::from("sess") + "ion").unwrap();
        assert_eq!(t.get(&query), Some(&9));
        assert!(t.contains_key(&query));
    }
    assert_eq!(t.len(), 1);
}

// Test: the returned value reference is the stored referent.
// Verifies: the table never copies values.
#[test]
fn values_are_borrowed_not_copied() {
    let key = ();
    let value = vec![1, 2, 3];
    let mut t: AssocTable<Vec<i32>> = AssocTable::new();
    t.insert(Address::of(&key), &value).unwrap();
    let got = t.get(Address::of(&key)).unwrap();
    assert!(std::ptr::eq(got, &value));
}

// Test: many string keys, interleaved removals.
// Verifies: round trip and size invariant at scale.
#[test]
fn many_string_keys() {
    let names: Vec<CString> = (0..1000)
        .map(|i| CString::new(format!("k{:04}", i)).unwrap())
        .collect();
    let vals: Vec<usize> = (0..1000).collect();
    let mut t: AssocTable<usize, ByteString> = AssocTable::with_scheme(ByteString);
    for (n, v) in names.iter().zip(&vals) {
        t.insert(n, v).unwrap();
        assert!(t.load_factor() <= MAX_LOAD_FACTOR);
    }
    assert_eq!(t.len(), 1000);
    assert_eq!(t.capacity(), 2048);

    for n in names.iter().filter(|n| n.to_bytes().ends_with(b"7")) {
        assert!(t.remove(n).is_some());
    }
    assert_eq!(t.len(), 900);
    assert_eq!(t.capacity(), 2048);

    for (n, v) in names.iter().zip(&vals) {
        let expect = if n.to_bytes().ends_with(b"7") { None } else { Some(v) };
        assert_eq!(t.get(n), expect);
    }
}

// Test: iteration covers each live entry once and repeats identically.
#[test]
fn iteration_visits_each_entry_once() {
    let vals: Vec<u64> = (0..300).collect();
    let mut t: AssocTable<u64> = AssocTable::with_capacity(3);
    for v in &vals {
        t.insert(Address::of(v), v).unwrap();
    }
    let first: Vec<*const u64> = t.iter().map(|(_, v)| v as *const u64).collect();
    let second: Vec<*const u64> = t.iter().map(|(_, v)| v as *const u64).collect();
    assert_eq!(first, second);
    let unique: BTreeSet<u64> = t.iter().map(|(_, v)| *v).collect();
    assert_eq!(unique.len(), 300);
    assert_eq!(first.len(), 300);
}

// Test: the cursor protocol and the iterator agree.
#[test]
fn cursor_walk_matches_iter() {
    let vals: Vec<i8> = (0..40).collect();
    let mut t: AssocTable<i8> = AssocTable::new();
    for v in &vals {
        t.insert(Address::of(v), v).unwrap();
    }
    let mut walked = Vec::new();
    let mut c = t.begin();
    while let Some((k, v)) = t.item(c) {
        walked.push((k, *v));
        c = t.advance(c);
    }
    let iterated: Vec<_> = t.iter().map(|(k, v)| (k, *v)).collect();
    assert_eq!(walked, iterated);
    assert_eq!(t.key(c), None);
    assert_eq!(t.value(c), None);
}

// Test: a walk whose table changes between steps.
// Verifies: the table rejects the stale cursor and the walk stops instead of
// reading a moved entry.
#[test]
fn cursor_walk_stops_after_mutation() {
    let vals: Vec<u16> = (0..8).collect();
    let late = 99u16;
    let mut t: AssocTable<u16> = AssocTable::new();
    for v in &vals {
        t.insert(Address::of(v), v).unwrap();
    }
    let mut c = t.begin();
    let mut seen = 0;
    while t.is_valid(c) {
        if seen == 3 {
            t.insert(Address::of(&late), &late).unwrap();
        }
        if let Some((_, v)) = t.item(c) {
            assert!(vals.contains(v));
            seen += 1;
        }
        c = t.advance(c);
    }
    assert_eq!(seen, 3);
    assert!(!t.is_valid(c));
    assert_eq!(t.len(), 9);
}

// Test: a user-defined scheme (case-insensitive ASCII strings).
// Verifies: the table delegates every comparison to the scheme.
#[test]
fn custom_scheme() {
    struct AsciiCaseless;
    impl KeyScheme for AsciiCaseless {
        type Key<'a> = &'a str;
        const MODE: KeyMode = KeyMode::Custom;
        fn hash(&self, key: &str) -> u64 {
            fnv1a(key.to_ascii_lowercase().as_bytes())
        }
        fn equals(&self, a: &str, b: &str) -> bool {
            a.eq_ignore_ascii_case(b)
        }
    }

    let (v1, v2) = (1u8, 2u8);
    let mut t: AssocTable<u8, AsciiCaseless> = AssocTable::with_scheme(AsciiCaseless);
    t.insert("Hello", &v1).unwrap();
    assert_eq!(t.insert("HELLO", &v2), Ok(Some(&1)));
    assert_eq!(t.len(), 1);
    assert_eq!(t.get("hello"), Some(&2));
    assert_eq!(t.iter().next().map(|(k, _)| k), Some("Hello"));
    assert_eq!(t.mode(), KeyMode::Custom);
}

// Test: schemes and modes exposed on the table.
#[test]
fn modes_are_fixed_per_table() {
    let a: AssocTable<u8> = AssocTable::default();
    let b: AssocTable<u8, ByteString> = AssocTable::with_capacity_and_scheme(4, ByteString);
    assert_eq!(a.mode(), KeyMode::Identity);
    assert_eq!(*a.scheme(), Identity);
    assert_eq!(b.mode(), KeyMode::ByteString);
    assert_eq!(b.capacity(), 4);
}

// Test: the set adapter over identity keys.
#[test]
fn address_set_roundtrip() {
    let words: Vec<&'static CStr> = vec![
        CStr::from_bytes_with_nul(b"a\0").unwrap(),
        CStr::from_bytes_with_nul(b"b\0").unwrap(),
    ];
    let mut s: AddressSet<CStr> = AddressSet::new();
    for w in &words {
        assert_eq!(s.add(*w), Ok(true));
    }
    assert_eq!(s.add(words[0]), Ok(false));
    assert_eq!(s.len(), 2);
    assert!(s.contains(words[1]));
    assert!(s.remove(words[1]));
    assert!(!s.contains(words[1]));
    let members: Vec<&CStr> = s.iter().collect();
    assert_eq!(members, vec![words[0]]);
}

// Test: Debug output lists entries.
#[test]
fn debug_format() {
    let v = 1u8;
    let k = CString::new("only").unwrap();
    let mut t: AssocTable<u8, ByteString> = AssocTable::with_scheme(ByteString);
    t.insert(&k, &v).unwrap();
    assert_eq!(format!("{:?}", t), "{\"only\": 1}");
}
