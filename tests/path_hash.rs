use std::collections::HashSet;

use netverify::path::{AggregatedLinksPath, DeviceIfaceListPair, Hop};

fn group(device_name: &str, iface_names: &[&str]) -> DeviceIfaceListPair {
    DeviceIfaceListPair::new(
        device_name,
        iface_names.iter().map(|i| i.to_string()).collect(),
    )
}

/// Packet in on a.a1 or a.a2; packet out a.a3; packet in b.b1.
fn gen_test_path_a() -> AggregatedLinksPath {
    AggregatedLinksPath::new(vec![
        Hop::new(group("a", &["a1", "a2"]), Some(group("a", &["a3"]))),
        Hop::new(group("b", &["b1"]), None),
    ])
}

/// Packet in on b.b1 or b.b2; packet out b.b3; packet in c.c1.
fn gen_test_path_b() -> AggregatedLinksPath {
    AggregatedLinksPath::new(vec![
        Hop::new(group("b", &["b1", "b2"]), Some(group("b", &["b3"]))),
        Hop::new(group("c", &["c1"]), None),
    ])
}

#[test]
fn identical_paths_hash_identically() {
    let mut a_paths = HashSet::new();
    let mut b_paths = HashSet::new();
    for _ in 0..10 {
        a_paths.insert(gen_test_path_a());
        b_paths.insert(gen_test_path_b());
    }
    assert_eq!(a_paths.len(), 1);
    assert_eq!(b_paths.len(), 1);
}

#[test]
fn different_paths_hash_differently() {
    let paths: HashSet<_> = [gen_test_path_a(), gen_test_path_b()].into_iter().collect();
    assert_eq!(paths.len(), 2);
}

#[test]
fn hop_order_matters() {
    let forward = AggregatedLinksPath::new(vec![
        Hop::new(group("a", &["a1"]), None),
        Hop::new(group("b", &["b1"]), None),
    ]);
    let reversed = AggregatedLinksPath::new(vec![
        Hop::new(group("b", &["b1"]), None),
        Hop::new(group("a", &["a1"]), None),
    ]);
    assert_ne!(forward, reversed);
}

#[test]
fn iface_order_matters_within_a_group() {
    assert_ne!(group("a", &["a1", "a2"]), group("a", &["a2", "a1"]));
}
