use crate::Cache;

use proptest::prelude::*;
use std::collections::BTreeSet;

const CAPACITY: u32 = 256;
const WIDTH: u32 = 64;

/// Checks the cache against a model set: same cardinality, and
/// agreement on membership for every probe.
fn assert_matches_model(cache: &Cache, model: &BTreeSet<[u8; 8]>, probes: &[[u8; 8]]) {
    assert_eq!(cache.len(), model.len());
    assert_eq!(cache.full(), model.len() == CAPACITY as usize);
    for value in model {
        assert!(cache.recall(value).unwrap());
    }
    for probe in probes {
        assert_eq!(cache.recall(probe).unwrap(), model.contains(probe));
    }
}

#[derive(Clone, Debug)]
enum Op {
    Insert([u8; 8]),
    Recall([u8; 8]),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    let op = prop_oneof![
        2 => any::<[u8; 8]>().prop_map(Op::Insert),
        1 => any::<[u8; 8]>().prop_map(Op::Recall),
    ];
    prop::collection::vec(op, 0..=400)
}

proptest! {
    #[test]
    fn membership_matches_set_model(
        values in prop::collection::vec(any::<[u8; 8]>(), 0..200),
        probes in prop::collection::vec(any::<[u8; 8]>(), 0..32),
    ) {
        let cache = Cache::new(WIDTH, CAPACITY);
        let mut model = BTreeSet::new();

        for value in &values {
            cache.insert(value).unwrap();
            model.insert(*value);
        }

        assert_matches_model(&cache, &model, &probes);
    }

    #[test]
    fn double_insert_is_idempotent(
        values in prop::collection::vec(any::<[u8; 8]>(), 0..100),
    ) {
        let cache = Cache::new(WIDTH, CAPACITY);
        let mut model = BTreeSet::new();

        for value in &values {
            cache.insert(value).unwrap();
            model.insert(*value);
            let before = cache.len();
            cache.insert(value).unwrap();
            prop_assert_eq!(cache.len(), before);
        }

        prop_assert_eq!(cache.len(), model.len());
    }

    #[test]
    fn interleaved_ops_match_model(ops in ops_strategy()) {
        let cache = Cache::new(WIDTH, CAPACITY);
        let mut model = BTreeSet::new();

        for op in &ops {
            match op {
                Op::Insert(value) => {
                    if model.len() < CAPACITY as usize {
                        cache.insert(value).unwrap();
                        model.insert(*value);
                    } else {
                        // A full cache rejects inserts outright, even
                        // for values that are already present.
                        prop_assert!(cache.insert(value).is_err());
                    }
                }
                Op::Recall(value) => {
                    prop_assert_eq!(
                        cache.recall(value).unwrap(),
                        model.contains(value)
                    );
                }
            }
            prop_assert_eq!(cache.len(), model.len());
        }
    }

    #[test]
    fn save_load_round_trip(
        values in prop::collection::vec(any::<[u8; 8]>(), 0..200),
    ) {
        let source = Cache::new(WIDTH, CAPACITY);
        for value in &values {
            source.insert(value).unwrap();
        }

        let mut buffer = Vec::new();
        source.save(&mut buffer).unwrap();

        let target = Cache::new(WIDTH, CAPACITY);
        target.load(&mut buffer.as_slice()).unwrap();

        prop_assert_eq!(target.len(), source.len());
        for value in &values {
            prop_assert!(target.recall(value).unwrap());
        }
    }
}
