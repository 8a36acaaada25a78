use rand::prelude::{SliceRandom, StdRng};
use rand::{Rng, SeedableRng};

use iptree::{HistogramEntry, Ip4Tree, Ip6Tree, IpTree, TreeConfig, DEFAULT_MAX_NODES};

fn histogram_sum<const N: usize>(tree: &IpTree<u64, N>) -> u64 {
    tree.histogram().iter().map(|e| e.value).sum()
}

#[test]
fn test_simple() {
    let mut tree = Ip4Tree::new(100_000);
    let key_cnt = 1000u32;

    for i in 0..key_cnt {
        tree.add(&i.to_be_bytes(), i as u64 + 1);
    }

    let histogram = tree.histogram();
    assert_eq!(histogram.len(), key_cnt as usize);
    for (i, entry) in histogram.iter().enumerate() {
        assert_eq!(entry.prefix, (i as u32).to_be_bytes());
        assert_eq!(entry.depth, 32);
        assert_eq!(entry.value, i as u64 + 1);
    }
    assert_eq!(tree.pruned_count(), 0);
}

#[test]
fn test_rng_insert_bounded() {
    let key_cnt = 10_000u32;
    let max_nodes = 2_000;
    let mut key_space: Vec<u32> = (0..key_cnt).collect();
    let mut r = StdRng::seed_from_u64(42);
    key_space.shuffle(&mut r);

    let mut tree = Ip4Tree::new(max_nodes);
    for k in key_space.iter() {
        tree.add(&k.to_be_bytes(), 1);
        assert!(tree.node_count() <= max_nodes + 32);
    }

    assert_eq!(tree.total(), key_cnt as u64);
    assert_eq!(histogram_sum(&tree), key_cnt as u64);
    assert!(tree.pruned_count() > 0);
    // 0..10000 only ever uses the low 14 bits
    for entry in tree.histogram() {
        assert!(entry.depth >= 18);
        assert_eq!(entry.prefix[..2], [0, 0]);
    }
}

#[test]
fn test_capacity_stabilizes() {
    let max_nodes = 500;
    let mut tree = Ip4Tree::new(max_nodes);
    let mut r = StdRng::seed_from_u64(1);
    let mut expected = 0;

    for round in 0..10 {
        for _ in 0..300 {
            let v = r.gen_range(1..1_000);
            tree.add(&r.gen::<u32>().to_be_bytes(), v);
            expected += v;
        }
        let stats = tree.stats();
        assert!(stats.node_count <= max_nodes + 32, "round {}: {}", round, stats);
        assert_eq!(stats.total, expected);
    }

    // freed slots are reused, so the arena never outgrows the budget by much
    assert!(tree.stats().arena_slots <= max_nodes + 33);
    assert_eq!(histogram_sum(&tree), expected);
}

#[test]
fn test_v6_workload() {
    let mut tree = Ip6Tree::new(1_000);
    let mut r = StdRng::seed_from_u64(6);
    let mut expected = 0;

    // a few /48 sites with random hosts
    let sites: Vec<[u8; 6]> = (0..8).map(|_| r.gen()).collect();
    for _ in 0..500 {
        let mut key = [0u8; 16];
        key[..6].copy_from_slice(sites.choose(&mut r).unwrap());
        r.fill(&mut key[8..]);
        tree.add(&key, 1);
        expected += 1;
    }

    assert_eq!(tree.total(), expected);
    let histogram = tree.histogram();
    assert_eq!(histogram.iter().map(|e| e.value).sum::<u64>(), expected);
    for entry in histogram.iter() {
        if entry.depth >= 48 {
            assert!(sites.iter().any(|s| s[..] == entry.prefix[..6]));
        }
    }
}

#[test]
fn test_mixed_v4_v6() {
    let mut tree = Ip6Tree::new(DEFAULT_MAX_NODES);
    let mut r = StdRng::seed_from_u64(9);
    let mut v4 = 0;
    let mut v6 = 0;

    for _ in 0..500 {
        if r.gen_bool(0.5) {
            let key: [u8; 4] = r.gen();
            tree.add(&key, 1);
            v4 += 1;
        } else {
            let key: [u8; 16] = r.gen();
            tree.add(&key, 1);
            v6 += 1;
        }
    }

    let histogram = tree.histogram();
    let (four, six): (Vec<&HistogramEntry<u64, 16>>, Vec<_>) = histogram.iter().partition(|e| e.depth == 32);
    assert_eq!(four.iter().map(|e| e.value).sum::<u64>(), v4);
    assert_eq!(six.iter().map(|e| e.value).sum::<u64>(), v6);
    assert!(six.iter().all(|e| e.depth == 128));
}

#[test]
fn test_generic_tally() {
    let mut bytes = IpTree::<u32, 4>::new(100);
    let mut weights = IpTree::<f32, 4>::new(100);
    let mut r = StdRng::seed_from_u64(3);

    for _ in 0..1_000 {
        let key: [u8; 4] = r.gen();
        bytes.add(&key, 1500);
        weights.add(&key, 0.5);
    }

    assert_eq!(bytes.total(), 1_500_000);
    assert_eq!(weights.total(), 500.0);
    assert_eq!(bytes.node_count(), weights.node_count());
    assert_eq!(
        bytes.histogram().iter().map(|e| (e.prefix, e.depth)).collect::<Vec<_>>(),
        weights.histogram().iter().map(|e| (e.prefix, e.depth)).collect::<Vec<_>>()
    );
}

#[test]
fn test_rebuild_then_continue() {
    let config = TreeConfig::from_max_nodes_setting(500);
    let mut tree = Ip4Tree::with_config(config).unwrap();
    let mut r = StdRng::seed_from_u64(77);
    for _ in 0..2_000 {
        tree.add(&r.gen::<[u8; 4]>(), 1);
    }

    let mut copy = Ip4Tree::rebuild_from(*tree.config(), &tree.histogram()).unwrap();
    let mut clone = tree.deep_clone();
    assert_eq!(copy.histogram(), tree.histogram());
    assert_eq!(clone.histogram(), tree.histogram());

    for _ in 0..2_000 {
        let key: [u8; 4] = r.gen();
        tree.add(&key, 1);
        copy.add(&key, 1);
        clone.add(&key, 1);
    }
    assert_eq!(tree.total(), 4_000);
    assert_eq!(copy.total(), 4_000);
    assert_eq!(clone.histogram(), tree.histogram());
}

#[test]
fn test_default_setting() {
    let tree = Ip4Tree::with_config(TreeConfig::from_max_nodes_setting(0)).unwrap();
    assert_eq!(tree.max_nodes(), DEFAULT_MAX_NODES);
}
