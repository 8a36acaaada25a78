use iptree::{Ip4Tree, IpPairTree, TreeConfig};
use rand::{rngs::ThreadRng, thread_rng, Rng};
use serde::{Deserialize, Serialize};
use shumai::{config, ShumaiBench};
use std::{cell::UnsafeCell, fmt::Display};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Serialize, Clone, Copy, Debug, Deserialize)]
pub enum Workload {
    /// Every packet from a random address.
    Uniform,
    /// Bursts from a small set of hot addresses, the case the lookup cache is for.
    Skewed,
    /// Random addresses inside a handful of /16 networks.
    Clustered,
}

impl Display for Workload {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Serialize, Clone, Copy, Debug, Deserialize)]
pub enum IndexType {
    HashMap,
    IpTree,
    IpTreeNoCache,
    PairTree,
}

impl Display for IndexType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[config(path = "bench/benchmark.toml")]
pub struct Basic {
    pub name: String,
    pub threads: Vec<usize>,
    pub time: usize,
    pub max_nodes: usize,
    #[matrix]
    pub workload: Workload,
    #[matrix]
    pub index_type: IndexType,
}

struct TestBench<Index: Counter> {
    index: Index,
    initial_cnt: usize,
}

trait Counter: Send + Sync {
    fn add(&self, key: [u8; 4], v: u64);
    fn entries(&self) -> usize;
}

/// Exact counts, no memory bound. The baseline the trie trades precision against.
struct SingleThreadHashMap {
    map: UnsafeCell<ahash::AHashMap<[u8; 4], u64>>, // only allow single thread access
}

unsafe impl Send for SingleThreadHashMap {}
unsafe impl Sync for SingleThreadHashMap {}

impl Counter for SingleThreadHashMap {
    fn add(&self, key: [u8; 4], v: u64) {
        unsafe {
            *(*self.map.get()).entry(key).or_insert(0) += v;
        }
    }

    fn entries(&self) -> usize {
        unsafe { (*self.map.get()).len() }
    }
}

struct TreeWrapper {
    tree: UnsafeCell<Ip4Tree>, // only allow single thread access
}

unsafe impl Send for TreeWrapper {}
unsafe impl Sync for TreeWrapper {}

impl Counter for TreeWrapper {
    fn add(&self, key: [u8; 4], v: u64) {
        unsafe {
            (*self.tree.get()).add(&key, v);
        }
    }

    fn entries(&self) -> usize {
        unsafe { (*self.tree.get()).histogram().len() }
    }
}

/// Tallies (key, key reversed) pairs, twice the key width of the plain tree.
struct PairWrapper {
    tree: UnsafeCell<IpPairTree>, // only allow single thread access
}

unsafe impl Send for PairWrapper {}
unsafe impl Sync for PairWrapper {}

impl Counter for PairWrapper {
    fn add(&self, key: [u8; 4], v: u64) {
        let mut dst = key;
        dst.reverse();
        unsafe {
            (*self.tree.get()).add_pair(&key, &dst, v).unwrap();
        }
    }

    fn entries(&self) -> usize {
        unsafe { (*self.tree.get()).pair_histogram().len() }
    }
}

fn next_key(workload: Workload, rng: &mut ThreadRng, hot: &[[u8; 4]]) -> [u8; 4] {
    match workload {
        Workload::Uniform => rng.gen(),
        Workload::Skewed => {
            if rng.gen_bool(0.9) {
                hot[rng.gen_range(0..hot.len())]
            } else {
                rng.gen()
            }
        }
        Workload::Clustered => {
            let net = hot[rng.gen_range(0..hot.len())];
            [net[0], net[1], rng.gen(), rng.gen()]
        }
    }
}

impl<Index: Counter> ShumaiBench for TestBench<Index> {
    type Config = Basic;
    type Result = usize;

    fn load(&mut self) -> Option<serde_json::Value> {
        let mut rng = thread_rng();
        for _ in 0..self.initial_cnt {
            self.index.add(rng.gen(), 1);
        }
        None
    }

    fn run(&self, context: shumai::Context<Self::Config>) -> Self::Result {
        let mut op_cnt = 0;
        let mut rng = thread_rng();
        let hot: Vec<[u8; 4]> = (0..8).map(|_| rng.gen()).collect();

        context.wait_for_start();

        while context.is_running() {
            let key = next_key(context.config.workload, &mut rng, &hot);
            // packet sizes
            let v = rng.gen_range(64..1500);
            self.index.add(key, v);
            op_cnt += 1;
        }
        op_cnt
    }

    fn cleanup(&mut self) -> Option<serde_json::Value> {
        Some(serde_json::json!({ "entries": self.index.entries() }))
    }
}

fn main() {
    let config = Basic::load().expect("Failed to parse config!");
    let repeat = 3;

    for c in config.iter() {
        if c.threads.len() > 1 || c.threads[0] != 1 {
            panic!("the tallies are single threaded, set threads = [1]");
        }
        let initial_cnt = 1_000_000;
        let tree_config = TreeConfig::default().max_nodes(c.max_nodes);

        match c.index_type {
            IndexType::HashMap => {
                let mut test_bench = TestBench {
                    index: SingleThreadHashMap {
                        map: UnsafeCell::new(ahash::AHashMap::with_capacity(initial_cnt)),
                    },
                    initial_cnt,
                };
                let result = shumai::run(&mut test_bench, c, repeat);
                result.write_json().unwrap();
            }
            IndexType::IpTree => {
                let mut test_bench = TestBench {
                    index: TreeWrapper {
                        tree: UnsafeCell::new(Ip4Tree::with_config(tree_config).unwrap()),
                    },
                    initial_cnt,
                };
                let result = shumai::run(&mut test_bench, c, repeat);
                result.write_json().unwrap();
            }
            IndexType::IpTreeNoCache => {
                let mut test_bench = TestBench {
                    index: TreeWrapper {
                        tree: UnsafeCell::new(
                            Ip4Tree::with_config(tree_config.cache_slots(0)).unwrap(),
                        ),
                    },
                    initial_cnt,
                };
                let result = shumai::run(&mut test_bench, c, repeat);
                result.write_json().unwrap();
            }
            IndexType::PairTree => {
                let mut test_bench = TestBench {
                    index: PairWrapper {
                        tree: UnsafeCell::new(IpPairTree::with_config(tree_config).unwrap()),
                    },
                    initial_cnt,
                };
                let result = shumai::run(&mut test_bench, c, repeat);
                result.write_json().unwrap();
            }
        }
    }
}
