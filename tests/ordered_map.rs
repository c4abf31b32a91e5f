use streamjson::OrderedMap;
use pretty_assertions::assert_eq;

#[test]
fn iteration_order_matches_insertion_order_regardless_of_key_order() {
    let mut map = OrderedMap::new();
    for key in ["zebra", "apple", "mango", "banana"] {
        map.insert(key, ());
    }
    let order: Vec<_> = map.keys().copied().collect();
    assert_eq!(
        order,
        vec!["zebra", "apple", "mango", "banana"],
        "iteration order should track insertion order, not key order"
    );
}

#[test]
fn resize_preserves_every_entry_and_its_insertion_position() {
    let mut map = OrderedMap::with_capacity(4);
    let keys: Vec<i32> = (0..1000).collect();
    for &k in &keys {
        map.insert(k, k.to_string());
    }
    assert_eq!(map.len(), 1000, "growing the bucket table must not lose entries");

    let order: Vec<_> = map.keys().copied().collect();
    assert_eq!(order, keys, "doubling capacity must not reorder insertion order");

    for &k in &keys {
        assert_eq!(map.get(&k), Some(&k.to_string()), "every key should remain reachable after a resize");
    }
}

#[test]
fn remove_reuses_an_in_order_neighbor_not_the_removed_node() {
    let mut map = OrderedMap::new();
    for k in [50, 25, 75, 10, 30, 60, 90, 5, 15, 27, 40] {
        map.insert(k, k);
    }
    let before: Vec<_> = map.keys().copied().collect();

    assert_eq!(map.remove(&50), Some(50), "removing the root of a two-child subtree should succeed");

    for &k in &before {
        if k == 50 {
            assert_eq!(map.get(&k), None);
        } else {
            assert_eq!(map.get(&k), Some(&k), "every other key should still be findable after removal");
        }
    }
    assert_eq!(map.len(), before.len() - 1);
}

#[test]
fn reinserting_an_existing_key_overwrites_in_place() {
    let mut map = OrderedMap::new();
    map.insert("a", 1);
    map.insert("b", 2);
    let replaced = map.insert("a", 100);
    assert_eq!(replaced, Some(1), "insert on an existing key should return its old value");
    assert_eq!(map.get(&"a"), Some(&100));
    assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["a", "b"], "overwriting a key must not move it");
}

#[test]
fn retain_removes_matching_entries_while_preserving_remaining_order() {
    let mut map: OrderedMap<i32, i32> = (0..20).map(|i| (i, i * i)).collect();
    map.retain(|k, _| k % 3 == 0);
    let order: Vec<_> = map.keys().copied().collect();
    assert_eq!(order, vec![0, 3, 6, 9, 12, 15, 18]);
    for k in order {
        assert_eq!(map.get(&k), Some(&(k * k)));
    }
}

#[test]
fn into_iter_consumes_in_insertion_order() {
    let mut map = OrderedMap::new();
    map.insert(3, "three");
    map.insert(1, "one");
    map.insert(2, "two");
    let collected: Vec<_> = map.into_iter().collect();
    assert_eq!(collected, vec![(3, "three"), (1, "one"), (2, "two")]);
}

#[test]
fn repeated_insert_and_remove_keeps_the_tree_consistent() {
    let mut map = OrderedMap::new();
    for round in 0..20 {
        for i in 0..50 {
            map.insert(i, round * 100 + i);
        }
        for i in (0..50).step_by(2) {
            map.remove(&i);
        }
        for i in (1..50).step_by(2) {
            assert_eq!(map.get(&i), Some(&(round * 100 + i)));
        }
        for i in (0..50).step_by(2) {
            map.insert(i, round * 100 + i);
        }
    }
    assert_eq!(map.len(), 50);
}
