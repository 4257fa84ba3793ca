#![cfg(any(feature = "std", feature = "foldhash"))]

mod common;

use std::rc::Rc;

use chain_hash::ByAddress;
use chain_hash::ChainHash;
use chain_hash::Error;
use chain_hash::intersection::connect_lists;
use chain_hash::intersection::create_list;
use chain_hash::intersection::find_node;
use chain_hash::intersection::intersection_node;
use chain_hash::intersection::nodes;
use chain_hash::word_index::bag_of_words;
use common::init_test_logger;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn bucket_total<K, V>(table: &ChainHash<K, V>) -> usize {
    (0..table.bucket_count())
        .map(|i| table.bucket_size(i).unwrap())
        .sum()
}

#[test]
fn round_trip_and_update() {
    let mut table = ChainHash::new();
    table.set("k".to_string(), 1);
    assert_eq!(table.get("k"), Ok(&1));
    assert!(table.contains("k"));

    table.set("k".to_string(), 2);
    assert_eq!(table.len(), 1);
    assert_eq!(table.get("k"), Ok(&2));
}

#[test]
fn removal_restores_counters() {
    let mut table = ChainHash::new();
    table.set(1u32, "one");
    let before = table.len();

    table.set(2u32, "two");
    assert!(table.remove(&2));
    assert!(!table.contains(&2));
    assert_eq!(table.len(), before);
    assert_eq!(table.get(&2), Err(Error::KeyNotFound));

    assert!(!table.remove(&2));
    assert_eq!(table.len(), before);
    assert_eq!(bucket_total(&table), table.len());
}

#[test]
fn counters_stay_consistent_under_churn() {
    init_test_logger();
    let mut rng = SmallRng::seed_from_u64(7);
    let mut table = ChainHash::new();

    for _ in 0..5_000 {
        let key = rng.random_range(0..300u32);
        if rng.random_bool(0.4) {
            table.remove(&key);
        } else {
            table.set(key, key.to_string());
        }
        assert_eq!(bucket_total(&table), table.len());
    }

    let used = (0..table.bucket_count())
        .filter(|&i| table.bucket_size(i).unwrap() > 0)
        .count();
    assert_eq!(used, table.used_buckets());
}

#[test]
fn growth_keeps_every_key() {
    init_test_logger();
    let mut table = ChainHash::new();
    let mut capacities = vec![table.bucket_count()];

    for key in 0..1_000u64 {
        table.set(key, key * 3);
        if *capacities.last().unwrap() != table.bucket_count() {
            capacities.push(table.bucket_count());
        }
    }

    assert!(capacities.len() > 1);
    for pair in capacities.windows(2) {
        // A single insertion can trigger more than one doubling.
        assert!(pair[1] >= pair[0] * 2 && (pair[1] / pair[0]).is_power_of_two());
    }
    assert!((0..1_000u64).all(|key| table.get(&key) == Ok(&(key * 3))));
}

#[test]
fn bucket_addressing() {
    let mut table = ChainHash::new();
    for key in 0..25u8 {
        table.set(key, ());
    }

    let count = table.bucket_count();
    assert_eq!(
        table.bucket_size(count),
        Err(Error::IndexOutOfRange {
            index: count,
            bucket_count: count
        })
    );
    assert!(table.bucket(count).is_err());

    for index in 0..count {
        assert_eq!(
            table.bucket_size(index).unwrap(),
            table.bucket(index).unwrap().count()
        );
    }
}

#[test]
fn word_index_scenario() {
    let index = bag_of_words(&["La casa es grande", "El gato está en la casa"]);
    assert_eq!(index.get("casa").unwrap(), &[0, 1]);
    assert_eq!(index.get("gato").unwrap(), &[1]);
}

#[test]
fn intersection_scenario() {
    let a = create_list(&[4, 1, 8, 4, 5]);
    let b = connect_lists(&a, &[5, 6, 1, 8, 4, 5], 8);

    let mut visited = ChainHash::new();
    for node in nodes(&a) {
        visited.set(ByAddress(Rc::clone(node)), ());
    }
    let first = nodes(&b)
        .find(|node| visited.contains(&ByAddress(Rc::clone(*node))))
        .cloned();

    let expected = find_node(&a, 8).unwrap();
    assert!(Rc::ptr_eq(first.as_ref().unwrap(), &expected));
    assert!(Rc::ptr_eq(&intersection_node(&a, &b).unwrap(), &expected));
}

#[test]
fn disjoint_lists_scenario() {
    let a = create_list(&[2, 6, 4]);
    let b = create_list(&[1, 5, 2, 6, 4]);

    let mut visited = ChainHash::new();
    for node in nodes(&a) {
        visited.set(ByAddress(&**node), ());
    }
    for node in nodes(&b) {
        assert!(!visited.contains(&ByAddress(&**node)));
    }
    assert!(intersection_node(&a, &b).is_none());
}
