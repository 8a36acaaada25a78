use rand::prelude::StdRng;
use rand::{Rng, SeedableRng};

use crate::nodes::NodeId;
use crate::{Ip4Tree, IpTree, TreeConfig};

use super::v4;

fn histogram_sum<const N: usize>(tree: &IpTree<u64, N>) -> u64 {
    tree.histogram().iter().map(|e| e.value).sum()
}

#[test]
fn pruning_conserves_total() {
    let mut tree = Ip4Tree::new(1_000_000);
    let mut r = StdRng::seed_from_u64(42);
    let mut expected = 0;
    for _ in 0..200 {
        let v = r.gen_range(1..100);
        tree.add(&v4(r.gen()), v);
        expected += v;
    }
    assert_eq!(tree.total(), expected);

    let mut rounds = 0;
    while tree.prune_one() {
        rounds += 1;
        if rounds % 97 == 0 {
            assert_eq!(tree.total(), expected);
            assert_eq!(histogram_sum(&tree), expected);
        }
    }

    assert_eq!(tree.node_count(), 0);
    assert_eq!(tree.total(), expected);
    let histogram = tree.histogram();
    assert_eq!(histogram.len(), 1);
    assert_eq!(histogram[0].depth, 0);
    assert_eq!(histogram[0].value, expected);
}

#[test]
fn single_chain_collapses_bottom_up() {
    let mut tree = Ip4Tree::new(1_000);
    tree.add(&v4(0xffff_ffff), 5);

    for left in (0..32).rev() {
        assert!(tree.prune_one());
        assert_eq!(tree.node_count(), left);
        let histogram = tree.histogram();
        assert_eq!(histogram.len(), 1);
        assert_eq!(histogram[0].depth, left);
        assert_eq!(histogram[0].value, 5);
    }
    assert!(!tree.prune_one());
    assert_eq!(tree.pruned_count(), 32);
}

#[test]
fn lower_total_is_pruned_first() {
    let mut tree = Ip4Tree::new(1_000);
    tree.add(&[0, 0, 0, 0], 5);
    tree.add(&[0, 0, 0, 1], 5);
    tree.add(&[0x80, 0x00], 1);
    tree.add(&[0x80, 0x01], 1);

    let candidate = tree.prune_candidate().unwrap();
    assert_eq!(candidate.depth, 15);
    assert_eq!(candidate.prefix, [0x80, 0, 0, 0]);
    assert_eq!(candidate.total, 2);

    tree.prune_one();
    let histogram = tree.histogram();
    assert_eq!(histogram.len(), 3);
    assert_eq!(histogram[2].prefix, [0x80, 0, 0, 0]);
    assert_eq!(histogram[2].depth, 15);
    assert_eq!(histogram[2].value, 2);
}

#[test]
fn equal_totals_prefer_the_deeper_candidate() {
    let mut tree = Ip4Tree::new(1_000);
    // 0-branch: full width leaves, candidate at depth 31
    tree.add(&[0, 0, 0, 0], 1);
    tree.add(&[0, 0, 0, 1], 1);
    // 1-branch: 16 bit leaves, candidate at depth 15
    tree.add(&[0x80, 0x00], 1);
    tree.add(&[0x80, 0x01], 1);

    let candidate = tree.prune_candidate().unwrap();
    assert_eq!(candidate.depth, 31);
    assert_eq!(candidate.prefix, [0, 0, 0, 0]);

    tree.prune_one();
    let histogram = tree.histogram();
    assert_eq!(histogram.len(), 3);
    assert_eq!(histogram[0].prefix, [0, 0, 0, 0]);
    assert_eq!(histogram[0].depth, 31);
    assert_eq!(histogram[0].value, 2);
    assert_eq!(histogram[1].depth, 16);
    assert_eq!(histogram[2].depth, 16);
}

#[test]
fn equal_totals_prefer_the_deeper_candidate_on_the_one_side() {
    let mut tree = Ip4Tree::new(1_000);
    tree.add(&[0x00, 0x00], 1);
    tree.add(&[0x00, 0x01], 1);
    tree.add(&[0x80, 0, 0, 0], 1);
    tree.add(&[0x80, 0, 0, 1], 1);

    tree.prune_one();
    let histogram = tree.histogram();
    assert_eq!(histogram.len(), 3);
    assert_eq!(histogram[2].prefix, [0x80, 0, 0, 0]);
    assert_eq!(histogram[2].depth, 31);
}

#[test]
fn full_tie_takes_the_one_branch() {
    let mut tree = Ip4Tree::new(1_000);
    tree.add(&[0, 0, 0, 0], 1);
    tree.add(&[0, 0, 0, 1], 1);
    tree.add(&[0x80, 0, 0, 0], 1);
    tree.add(&[0x80, 0, 0, 1], 1);

    let candidate = tree.prune_candidate().unwrap();
    assert_eq!(candidate.prefix, [0x80, 0, 0, 0]);
    assert_eq!(candidate.depth, 31);
}

#[test]
fn terminal_sibling_is_skipped() {
    let mut tree = Ip4Tree::new(1_000);
    // an 8 bit key: terminal at depth 8, next to the inner node leading to 1.0.0.x
    tree.add(&[0x00], 1);
    tree.add(&[0x01, 0, 0, 0], 50);
    tree.add(&[0x01, 0, 0, 1], 50);

    let candidate = tree.prune_candidate().unwrap();
    assert_eq!(candidate.depth, 31);
    assert_eq!(candidate.prefix, [0x01, 0, 0, 0]);
    assert_eq!(candidate.total, 100);
}

#[test]
fn candidate_matches_prune() {
    let mut tree = Ip4Tree::new(1_000_000);
    let mut r = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        tree.add(&v4(r.gen::<u32>() & 0xff00_ffff), r.gen_range(1..10));
    }

    for _ in 0..300 {
        let candidate = tree.prune_candidate().unwrap();
        tree.prune_one();
        let entry = tree
            .histogram()
            .into_iter()
            .find(|e| e.prefix == candidate.prefix && e.depth == candidate.depth)
            .unwrap();
        assert_eq!(entry.value, candidate.total);
    }
}

#[test]
fn small_budget_stays_bounded() {
    let max_nodes = 4;
    let mut tree = Ip4Tree::new(max_nodes);
    let mut r = StdRng::seed_from_u64(3);
    let mut expected = 0;

    for _ in 0..2_000 {
        tree.add(&v4(r.gen()), 1);
        expected += 1;
        // one insertion adds at most one node per key bit
        assert!(tree.node_count() <= max_nodes + 32);
    }

    tree.enforce_capacity(max_nodes);
    assert!(tree.node_count() <= max_nodes);
    assert_eq!(tree.total(), expected);
    assert_eq!(histogram_sum(&tree), expected);
    assert!(tree.pruned_count() > 0);
}

#[test]
fn enforce_capacity_stops_at_target() {
    let mut tree = Ip4Tree::new(1_000_000);
    for i in 0..64u32 {
        tree.add(&v4(i << 8), 1);
    }
    let before = tree.node_count();
    assert!(before > 100);

    // below the limit nothing happens
    tree.enforce_capacity(before + 1);
    assert_eq!(tree.node_count(), before);

    tree.enforce_capacity(100);
    assert!(tree.node_count() <= 90);
    assert!(tree.node_count() >= 89);
}

#[test]
fn configured_prune_target() {
    let config = TreeConfig::default()
        .max_nodes(1_000_000)
        .prune_target_percent(50);
    let mut tree = Ip4Tree::with_config(config).unwrap();
    for i in 0..64u32 {
        tree.add(&v4(i << 8), 1);
    }
    tree.enforce_capacity(200);
    assert!(tree.node_count() <= 100);
    assert!(tree.node_count() >= 99);
}

#[test]
#[should_panic]
fn best_to_collapse_on_childless_panics() {
    let tree = Ip4Tree::new(10);
    tree.find_best_to_collapse(NodeId::ROOT, 0);
}

#[test]
#[should_panic]
fn collapse_with_inner_child_panics() {
    let mut tree = Ip4Tree::new(10);
    tree.add(&v4(1), 1);
    tree.collapse(NodeId::ROOT);
}
