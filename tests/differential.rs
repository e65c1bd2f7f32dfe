// created = "2026-10-18"
// modified = "2026-10-18"

//! Randomized differential test against `BTreeSet`.
//!
//! Interleaves inserts, deletes and lookups over a small key range so that
//! duplicates and misses are common, and checks membership after every
//! operation. Proofs are spot-checked along the way.

use std::collections::BTreeSet;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use authskip::{Blake3, SkipList, Verdict};

const OPERATIONS: usize = 10_000;
const KEY_RANGE: std::ops::Range<i64> = -500..500;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn run(seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut list = SkipList::new();
    let mut model = BTreeSet::new();

    for step in 0..OPERATIONS {
        let key = rng.gen_range(KEY_RANGE);
        let version = list.version();
        match rng.gen_range(0..10) {
            0..=4 => {
                let changed = list.insert(key, &mut rng);
                assert_eq!(changed, model.insert(key), "step {} insert {}", step, key);
                assert_eq!(list.version(), version + changed as u64);
            }
            5..=7 => {
                let changed = list.delete(key);
                assert_eq!(changed, model.remove(&key), "step {} delete {}", step, key);
                assert_eq!(list.version(), version + changed as u64);
            }
            _ => {}
        }

        assert_eq!(list.find(key), model.contains(&key), "step {} find {}", step, key);
        assert_eq!(list.len(), model.len(), "step {} len", step);

        if step % 97 == 0 {
            let confirmation = list.confirmation();
            let probe = rng.gen_range(KEY_RANGE);
            let proof = list.proof_of(probe);
            assert_eq!(proof.present, model.contains(&probe));
            assert_eq!(confirmation.verify(&proof, &Blake3), Verdict::Correct, "step {}", step);
        }
        if step % 1000 == 0 {
            list.check_invariants();
        }
    }

    list.check_invariants();
    assert!(list.keys().eq(model.iter().copied()));
}

#[test]
fn agrees_with_btreeset() {
    init_logging();
    run(0xdecaf);
}

#[test]
fn agrees_with_btreeset_other_seed() {
    init_logging();
    run(42);
}

#[test]
fn agrees_after_bulk_build() {
    init_logging();
    let mut rng = StdRng::seed_from_u64(7);
    let keys: Vec<i64> = (0..2_000).map(|_| rng.gen_range(KEY_RANGE)).collect();
    let mut list = SkipList::build(keys.iter().copied(), &mut rng);
    let mut model: BTreeSet<i64> = keys.into_iter().collect();
    list.check_invariants();

    for _ in 0..OPERATIONS {
        let key = rng.gen_range(KEY_RANGE);
        if rng.gen_bool(0.5) {
            assert_eq!(list.insert(key, &mut rng), model.insert(key));
        } else {
            assert_eq!(list.delete(key), model.remove(&key));
        }
        assert_eq!(list.find(key), model.contains(&key));
    }

    list.check_invariants();
    assert!(list.keys().eq(model.iter().copied()));
}
