// created = "2026-10-18"
// modified = "2026-10-18"

//! AFL fuzz harness for the authenticated skip list.
//!
//! Each input is a seed followed by a stream of operations. After every
//! operation the harness checks:
//! 1. Membership agrees with a `BTreeSet` model
//! 2. A fresh proof for the touched key validates against a fresh confirmation
//! 3. No-op mutations leave the confirmation untouched
//!
//! The full invariant audit runs once at the end of each input.

use std::collections::BTreeSet;

use afl::fuzz;
use authskip::{SkipList, Verdict};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Operation types the fuzzer can generate
#[derive(Debug, Clone, Copy)]
enum FuzzOp {
    Insert(i64),
    Delete(i64),
    Prove(i64),
}

impl FuzzOp {
    fn from_bytes(bytes: &[u8]) -> Option<(FuzzOp, &[u8])> {
        if bytes.len() < 2 {
            return None;
        }
        // Small key space so deletes and duplicates actually hit.
        let key = bytes[1] as i8 as i64;
        let op = match bytes[0] % 3 {
            0 => FuzzOp::Insert(key),
            1 => FuzzOp::Delete(key),
            _ => FuzzOp::Prove(key),
        };
        Some((op, &bytes[2..]))
    }
}

fn main() {
    let _ = env_logger::builder().is_test(true).try_init();

    fuzz!(|data: &[u8]| {
        if data.len() < 8 {
            return;
        }
        let (seed, mut remaining) = data.split_at(8);
        let mut rng = StdRng::seed_from_u64(u64::from_le_bytes(seed.try_into().unwrap()));

        let mut list = SkipList::new();
        let mut model = BTreeSet::new();

        while let Some((op, rest)) = FuzzOp::from_bytes(remaining) {
            remaining = rest;
            let before = list.confirmation();
            let key = match op {
                FuzzOp::Insert(key) => {
                    let changed = list.insert(key, &mut rng);
                    assert_eq!(changed, model.insert(key), "insert {}", key);
                    if !changed {
                        assert_eq!(list.confirmation(), before, "no-op insert {}", key);
                    }
                    key
                }
                FuzzOp::Delete(key) => {
                    let changed = list.delete(key);
                    assert_eq!(changed, model.remove(&key), "delete {}", key);
                    if !changed {
                        assert_eq!(list.confirmation(), before, "no-op delete {}", key);
                    }
                    key
                }
                FuzzOp::Prove(key) => key,
            };

            assert_eq!(list.find(key), model.contains(&key), "find {}", key);
            let proof = list.proof_of(key);
            let confirmation = list.confirmation();
            assert_eq!(confirmation.verify(&proof, list.hasher()), Verdict::Correct, "proof {}", key);
            if confirmation.version > before.version {
                assert_eq!(before.version + 1, confirmation.version);
            }
        }

        list.check_invariants();
        assert!(list.keys().eq(model.iter().copied()));
    });
}
