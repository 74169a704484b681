#![cfg(feature = "std")]

// StrategySet property tests.
//
// Property 1: pool semantics match a model map.
//  - Elements are (key, tag) pairs compared by key only, hashed into a
//    handful of buckets so chains form and shrink.
//  - Model: key -> tag of the instance first stored.
//  - Operations: add, put, remove_from_pool, remove via cursor, retain.
//  - Invariant: len() == model.len(); get(key) returns the model's tag.
//
// Property 2: a full cursor walk removing everything empties the set and
// yields each element exactly once.
//
// Property 3: for any batch size, the sections cover every element once.
use std::collections::HashMap;
use std::collections::HashSet;

use proptest::prelude::*;
use strategy_set::FnStrategy;
use strategy_set::HashingStrategy;
use strategy_set::StrategySet;

type Tagged = (u32, u8);

fn by_key(buckets: u32) -> impl HashingStrategy<Tagged> + Clone {
    FnStrategy::new(
        move |v: &Tagged| v.0 % buckets,
        |a: &Tagged, b: &Tagged| a.0 == b.0,
    )
}

proptest! {
    #[test]
    fn prop_pool_matches_model(
        buckets in 1u32..=16,
        load_factor in prop_oneof![Just(0.25f32), Just(0.75f32), Just(1.0f32)],
        ops in proptest::collection::vec((0u8..=4u8, 0u32..64u32, any::<u8>()), 1..300),
    ) {
        let mut set = StrategySet::with_capacity_and_load_factor(by_key(buckets), 1, load_factor)
            .unwrap();
        let mut model: HashMap<u32, u8> = HashMap::new();

        for (op, key, tag) in ops {
            match op {
                0 => {
                    let added = set.add((key, tag));
                    prop_assert_eq!(added, !model.contains_key(&key));
                    model.entry(key).or_insert(tag);
                }
                1 => {
                    let stored = set.put((key, tag)).1;
                    prop_assert_eq!(stored, *model.entry(key).or_insert(tag));
                }
                2 => {
                    let removed = set.remove_from_pool(&(key, 0)).map(|v| v.1);
                    prop_assert_eq!(removed, model.remove(&key));
                }
                3 => {
                    let mut cursor = set.cursor();
                    while cursor.has_next() {
                        if cursor.next().unwrap().0 == key {
                            cursor.remove().unwrap();
                        }
                    }
                    model.remove(&key);
                }
                4 => {
                    set.retain(|v| v.0 % 7 != key % 7);
                    model.retain(|k, _| k % 7 != key % 7);
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(set.len(), model.len());
            prop_assert!(set.len() <= set.max_occupied());
            prop_assert_eq!(set.get(&(key, 0)).map(|v| v.1), model.get(&key).copied());
        }

        for (key, tag) in &model {
            prop_assert_eq!(set.get(&(*key, 0)).map(|v| v.1), Some(*tag));
        }
        prop_assert_eq!(set.iter().count(), model.len());
    }

    #[test]
    fn prop_cursor_removes_everything_once(
        buckets in 1u32..=8,
        keys in proptest::collection::hash_set(0u32..10_000, 0..400),
    ) {
        let mut set = StrategySet::new(by_key(buckets));
        set.add_all(keys.iter().map(|&k| (k, 0)));

        let mut seen = HashSet::new();
        let mut cursor = set.cursor();
        while cursor.has_next() {
            let key = cursor.next().unwrap().0;
            prop_assert!(seen.insert(key));
            prop_assert_eq!(cursor.remove().unwrap().0, key);
        }

        prop_assert!(set.is_empty());
        prop_assert_eq!(seen, keys);
    }

    #[test]
    fn prop_sections_cover_once(
        buckets in 1u32..=32,
        keys in proptest::collection::hash_set(0u32..5_000, 0..500),
        batch_size in 1usize..200,
    ) {
        let mut set = StrategySet::new(by_key(buckets));
        set.add_all(keys.iter().map(|&k| (k, 0)));

        let count = set.batch_count(batch_size);
        let mut seen = HashSet::new();
        for index in 0..count {
            let batch = set.section(index, count);
            for value in batch.iter() {
                prop_assert!(seen.insert(value.0));
            }
        }
        prop_assert_eq!(seen, keys);
    }
}
