use crate::{error::Error, map::Map};

use proptest::prelude::*;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
enum Op {
    Insert(u16, u32),
    Remove(u16),
    Get(u16),
    Clear,
}

fn op() -> impl Strategy<Value = Op> {
    // a small key space so that overwrites, misses and exhaustion all happen
    prop_oneof![
        6 => (0u16..64, any::<u32>()).prop_map(|(k, v)| Op::Insert(k, v)),
        4 => (0u16..64).prop_map(Op::Remove),
        2 => (0u16..64).prop_map(Op::Get),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn prop_matches_btreemap(cap in 0usize..48, ops in prop::collection::vec(op(), 0..400)) {
        let mut m = Map::new(cap).unwrap();
        let mut model = BTreeMap::new();
        for op in ops {
            match op {
                Op::Insert(k, v) => {
                    if model.len() < cap || model.contains_key(&k) {
                        prop_assert_eq!(m.insert(k, v), Ok(model.insert(k, v)));
                    } else {
                        let before = m.clone();
                        prop_assert_eq!(m.insert(k, v), Err(Error::Exhausted { capacity: cap }));
                        prop_assert_eq!(&m, &before);
                    }
                }
                Op::Remove(k) => prop_assert_eq!(m.remove(&k), model.remove(&k)),
                Op::Get(k) => prop_assert_eq!(m.get(&k), model.get(&k)),
                Op::Clear => {
                    m.clear();
                    model.clear();
                }
            }
            m.invariant();
            prop_assert_eq!(m.len(), model.len());
            let bound = 1.4405 * ((m.len() + 2) as f64).log2() - 0.3277;
            prop_assert!(m.height() as f64 <= bound);
        }
        prop_assert!(m.iter().eq(model.iter()));
        prop_assert!(m.iter().rev().eq(model.iter().rev()));
    }

    #[test]
    fn prop_iter_sorted_and_exact(keys in prop::collection::btree_set(any::<i64>(), 0..200)) {
        let mut m = Map::new(keys.len()).unwrap();
        // insert in hash order, not sorted order
        let shuffled: std::collections::HashSet<i64> = keys.iter().copied().collect();
        for k in &shuffled {
            m.insert(*k, ()).unwrap();
        }
        prop_assert!(m.is_full());
        let it = m.keys();
        prop_assert_eq!(it.len(), keys.len());
        prop_assert!(it.eq(keys.iter()));
    }
}
