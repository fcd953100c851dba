#![cfg(test)]

// Property tests for AssocTable kept inside the crate so they can drive the
// allocation fault injection without a feature gate.

use crate::error::AllocError;
use crate::key_scheme::{Address, ByteString, KeyMode, KeyScheme};
use crate::table::{AssocTable, MAX_LOAD_FACTOR};
use hashbrown::HashMap;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::ffi::{CStr, CString};
use std::hash::Hash;

// Pool-indexed operations: key indices shrink to earlier keys, value indices
// to earlier values.
#[derive(Clone, Debug)]
enum Op {
    Insert(usize, usize),
    Remove(usize),
    Get(usize),
    Iterate,
    Clear,
    // Arm the fault injector with this many successful allocations, then
    // insert.
    InsertFailing(usize, usize, usize),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<i32>, Vec<Op>)> {
    (
        proptest::collection::vec("[a-z]{0,4}", 1..=12),
        proptest::collection::vec(any::<i32>(), 1..=6),
    )
        .prop_flat_map(|(pool, vals)| {
            let k = 0..pool.len();
            let v = 0..vals.len();
            let op = prop_oneof![
                4 => (k.clone(), v.clone()).prop_map(|(i, j)| Op::Insert(i, j)),
                2 => k.clone().prop_map(Op::Remove),
                2 => k.clone().prop_map(Op::Get),
                1 => Just(Op::Iterate),
                1 => Just(Op::Clear),
                1 => (k.clone(), v.clone(), 0usize..=1).prop_map(|(i, j, n)| Op::InsertFailing(i, j, n)),
            ];
            proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), vals.clone(), ops))
        })
}

/// Every key lands in the same bucket.
struct CollideStr;
impl KeyScheme for CollideStr {
    type Key<'a> = &'a CStr;
    const MODE: KeyMode = KeyMode::Custom;
    fn hash(&self, _key: &CStr) -> u64 {
        0
    }
    fn equals(&self, a: &CStr, b: &CStr) -> bool {
        a.to_bytes() == b.to_bytes()
    }
}

fn value_ptrs<'a, S: KeyScheme>(t: &AssocTable<'a, i32, S>) -> Vec<*const i32> {
    t.iter().map(|(_, v)| v as *const i32).collect()
}

// State-machine equivalence against a hashbrown::HashMap model keyed by `MK`,
// the model's notion of key equality. Invariants checked after every op:
// - get parity for every key in the pool (round trip, removal);
// - len equals the model's number of distinct keys;
// - capacity never shrinks and the load factor bound holds after inserts;
// - iteration visits each live entry once and repeats identically;
// - a failed insert leaves entries and (for bucket failures) capacity as is.
fn run_scenario<'a, S, MK>(
    sut: &mut AssocTable<'a, i32, S>,
    key_of: &dyn Fn(usize) -> S::Key<'a>,
    model_key: &dyn Fn(usize) -> MK,
    pool_len: usize,
    vals: &'a [i32],
    ops: &[Op],
) -> Result<(), TestCaseError>
where
    S: KeyScheme,
    MK: Eq + Hash,
{
    let mut model: HashMap<MK, usize> = HashMap::new();
    for op in ops {
        let cap_before = sut.capacity();
        match *op {
            Op::Insert(i, j) => {
                let prev = sut.insert(key_of(i), &vals[j]);
                let mprev = model.insert(model_key(i), j);
                prop_assert_eq!(prev, Ok(mprev.map(|m| &vals[m])));
                prop_assert!(sut.load_factor() <= MAX_LOAD_FACTOR);
            }
            Op::InsertFailing(i, j, n) => {
                let before = value_ptrs(sut);
                sut.fail_allocations_after(n);
                let res = sut.insert(key_of(i), &vals[j]);
                sut.heal_allocations();
                match res {
                    Ok(prev) => {
                        let mprev = model.insert(model_key(i), j);
                        prop_assert_eq!(prev, mprev.map(|m| &vals[m]));
                    }
                    Err(AllocError::Buckets) => {
                        prop_assert!(!model.contains_key(&model_key(i)));
                        prop_assert_eq!(sut.capacity(), cap_before);
                        prop_assert_eq!(value_ptrs(sut), before);
                    }
                    Err(AllocError::Node) => {
                        prop_assert!(!model.contains_key(&model_key(i)));
                        prop_assert_eq!(sut.len(), before.len());
                    }
                    Err(AllocError::CapacityOverflow) => {
                        prop_assert!(false, "pool too small to overflow");
                    }
                }
            }
            Op::Remove(i) => {
                let got = sut.remove(key_of(i));
                let mgot = model.remove(&model_key(i));
                prop_assert_eq!(got, mgot.map(|m| &vals[m]));
            }
            Op::Get(i) => {
                let got = sut.get(key_of(i));
                prop_assert_eq!(got, model.get(&model_key(i)).map(|&m| &vals[m]));
            }
            Op::Iterate => {
                let first: Vec<String> = sut.iter().map(|(k, v)| format!("{:?}={}", k, v)).collect();
                let second: Vec<String> = sut.iter().map(|(k, v)| format!("{:?}={}", k, v)).collect();
                prop_assert_eq!(&first, &second);
                let mut seen = value_ptrs(sut);
                let mut expected: Vec<*const i32> =
                    model.values().map(|&m| &vals[m] as *const i32).collect();
                seen.sort();
                expected.sort();
                prop_assert_eq!(seen, expected);
            }
            Op::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), cap_before);
            }
        }

        prop_assert!(sut.capacity() >= cap_before, "tables never shrink");
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert_eq!(sut.iter().count(), model.len());
        for i in 0..pool_len {
            prop_assert_eq!(sut.contains_key(key_of(i)), model.contains_key(&model_key(i)));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    // Byte-string mode: pool entries with equal contents are the same key.
    #[test]
    fn prop_byte_string_state_machine((pool, vals, ops) in arb_scenario()) {
        let pool: Vec<CString> = pool.into_iter().map(|s| CString::new(s).unwrap()).collect();
        let mut sut: AssocTable<i32, ByteString> = AssocTable::with_scheme(ByteString);
        let key_of = |i: usize| pool[i].as_c_str();
        let model_key = |i: usize| pool[i].as_bytes().to_vec();
        run_scenario(&mut sut, &key_of, &model_key, pool.len(), &vals, &ops)?;
    }

    // Identity mode: every pool entry is a distinct address, whatever its
    // contents.
    #[test]
    fn prop_identity_state_machine((pool, vals, ops) in arb_scenario()) {
        let mut sut: AssocTable<i32> = AssocTable::new();
        let key_of = |i: usize| Address::of(&pool[i]);
        let model_key = |i: usize| i;
        run_scenario(&mut sut, &key_of, &model_key, pool.len(), &vals, &ops)?;
    }

    // Worst-case collisions: one chain holds every entry.
    #[test]
    fn prop_state_machine_with_collisions((pool, vals, ops) in arb_scenario()) {
        let pool: Vec<CString> = pool.into_iter().map(|s| CString::new(s).unwrap()).collect();
        let mut sut: AssocTable<i32, CollideStr> = AssocTable::with_scheme(CollideStr);
        let key_of = |i: usize| pool[i].as_c_str();
        let model_key = |i: usize| pool[i].as_bytes().to_vec();
        run_scenario(&mut sut, &key_of, &model_key, pool.len(), &vals, &ops)?;
    }
}
