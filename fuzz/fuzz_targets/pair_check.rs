#![no_main]
use arbitrary::Arbitrary;
use iptree::IpPairTree;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Flow {
    src: [u8; 4],
    dst: [u8; 4],
    packets: u8,
}

fuzz_target!(|flows: Vec<Flow>| {
    let mut tree = IpPairTree::<u64>::new(256);
    let mut expected = 0u64;

    for f in flows.iter() {
        tree.add_pair(&f.src, &f.dst, f.packets as u64).unwrap();
        expected += f.packets as u64;
    }

    let entries = tree.pair_histogram();
    assert_eq!(entries.iter().map(|e| e.value).sum::<u64>(), expected);
    for e in entries.iter() {
        assert!(e.first_depth <= 32);
        assert!(e.first_depth == e.second_depth || e.first_depth == e.second_depth + 1);
        assert!(flows.iter().any(|f| {
            (0..e.first_depth).all(|i| iptree::bits::bit(&e.first, i) == iptree::bits::bit(&f.src, i))
                && (0..e.second_depth)
                    .all(|i| iptree::bits::bit(&e.second, i) == iptree::bits::bit(&f.dst, i))
        }));
    }
});
