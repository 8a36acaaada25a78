#![no_main]
use arbitrary::Arbitrary;
use iptree::{Ip6Tree, TreeConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum TreeMethod {
    Add4 { key: [u8; 4], value: u16 },
    Add6 { key: [u8; 16], value: u16 },
    Prune,
    Rebuild,
}

fuzz_target!(|input: (u8, Vec<TreeMethod>)| {
    let (budget, methods) = input;
    let max_nodes = budget as usize + 1;
    let config = TreeConfig::default().max_nodes(max_nodes);
    let mut tree = Ip6Tree::with_config(config).unwrap();
    let mut expected = 0u64;

    for m in methods.iter() {
        match m {
            TreeMethod::Add4 { key, value } => {
                tree.add(key, *value as u64);
                expected += *value as u64;
            }
            TreeMethod::Add6 { key, value } => {
                tree.add(key, *value as u64);
                expected += *value as u64;
            }
            TreeMethod::Prune => {
                let candidate = tree.prune_candidate();
                assert_eq!(tree.prune_one(), candidate.is_some());
            }
            TreeMethod::Rebuild => {
                let rebuilt = Ip6Tree::rebuild_from(*tree.config(), &tree.histogram()).unwrap();
                assert_eq!(rebuilt.histogram(), tree.histogram());
                tree = rebuilt;
            }
        }
        assert!(tree.node_count() <= max_nodes + 128);
    }

    let histogram = tree.histogram();
    assert_eq!(tree.total(), expected);
    assert_eq!(histogram.iter().map(|e| e.value).sum::<u64>(), expected);
    for e in histogram.iter() {
        assert!(e.value > 0);
        assert!(e.depth <= 128);
    }
});
