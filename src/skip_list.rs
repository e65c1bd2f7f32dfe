// created = "2026-10-18"
// modified = "2026-10-18"

//! Authenticated Skip List
//!
//! An ordered set of `i64` keys that keeps a root digest committing to its
//! whole content, and hands out logarithmic-size membership and
//! non-membership proofs against that digest.
//!
//! # Structure
//!
//! Every level is a linked run bounded by a `-inf` and a `+inf` sentinel.
//! A key at level `L > 0` links `down` to the same key at `L - 1`; the bottom
//! level is the ground truth for membership.
//!
//! ```text
//! Level 2: -inf ---------------------> 8 ----------> +inf
//! Level 1: -inf ------> 2 -----------> 8 ----------> +inf
//! Level 0: -inf ------> 2 ----> 5 ---> 8 ---> 16 --> +inf
//! ```
//!
//! A node is a *tower* node when its key continues one level up (2 and 8 at
//! level 0 above). The `+inf` sentinel and tower nodes are *shared*: the level
//! above already commits to them, so their left neighbour only folds in their
//! element digest.
//!
//! # Digests
//!
//! With `e(v)` the element digest (leaf digest for keys, the empty marker for
//! sentinels), `w = right(v)`, `u = down(v)`:
//!
//! - bottom, `w` shared: `combine(e(v), e(w))`
//! - bottom, `w` unshared: `combine(e(v), digest(w))`
//! - above, `w` shared: `digest(u)`
//! - above, `w` unshared: `combine(digest(u), digest(w))`
//!
//! The root digest is the digest of the top-left sentinel.
//!
//! # Mutation
//!
//! Insert and delete record the strict search path on the way down. Only
//! nodes on that path (plus the inserted tower and any newly grown top level)
//! can change digest, so they are rehashed bottom-up from an explicit list.
//!
//! Not thread safe: one mutator at a time, and readers must not overlap a
//! mutation.

use rand_core::RngCore;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use smallvec::smallvec;

use crate::hash::Blake3;
use crate::hash::Digest;
use crate::hash::HashAlgorithm;
use crate::proof::Confirmation;
use crate::proof::Proof;

/// Node index type. u32 saves space vs usize on 64-bit.
type Idx = u32;

/// Null index marker.
const NULL: Idx = Idx::MAX;

/// Position of a node in the key order. Sentinels sort outside every key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum Bound {
    Lower,
    Key(i64),
    Upper,
}

/// One key at one level.
struct Node {
    bound: Bound,
    /// Next node on the same level. `NULL` only for `+inf`.
    right: Idx,
    /// Same key one level below. `NULL` on the bottom level.
    down: Idx,
    /// The key is also present one level up.
    tower: bool,
    /// Cached commitment, see the module docs. Unused for `+inf`.
    digest: Digest,
}

/// A skip list whose content is committed to by a single root digest.
pub struct SkipList<H: HashAlgorithm = Blake3> {
    /// Arena of nodes.
    nodes: Vec<Node>,
    /// Free list for reusing removed node slots.
    free_list: Vec<Idx>,
    /// `-inf` sentinel of the top level.
    root: Idx,
    /// `+inf` sentinel of the top level.
    terminal: Idx,
    /// Number of levels, at least 1.
    height: usize,
    /// Number of keys (not counting sentinels).
    len: usize,
    /// Bumped once per insert or delete that changes membership.
    version: u64,
    hash: H,
}

impl SkipList<Blake3> {
    /// Create an empty list hashed with blake3.
    pub fn new() -> Self {
        Self::with_hasher(Blake3)
    }

    /// Build a list from keys in any order, hashed with blake3.
    pub fn build<I, R>(keys: I, rng: &mut R) -> Self
    where
        I: IntoIterator<Item = i64>,
        R: RngCore + ?Sized,
    {
        Self::build_with_hasher(Blake3, keys, rng)
    }
}

impl Default for SkipList<Blake3> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HashAlgorithm> SkipList<H> {
    /// Create an empty list: one level holding just the two sentinels.
    pub fn with_hasher(hash: H) -> Self {
        let mut list = SkipList {
            nodes: Vec::new(),
            free_list: Vec::new(),
            root: NULL,
            terminal: NULL,
            height: 1,
            len: 0,
            version: 0,
            hash,
        };
        list.terminal = list.alloc_node(Bound::Upper, NULL, NULL);
        list.root = list.alloc_node(Bound::Lower, list.terminal, NULL);
        list.rehash([list.root]);
        list
    }

    /// Build a list from keys in any order. Duplicates are dropped.
    ///
    /// Every key gets its tower height from repeated fair coin flips, then
    /// each level is linked and hashed right to left in a single pass.
    pub fn build_with_hasher<I, R>(hash: H, keys: I, rng: &mut R) -> Self
    where
        I: IntoIterator<Item = i64>,
        R: RngCore + ?Sized,
    {
        let mut keys: Vec<i64> = keys.into_iter().collect();
        keys.sort_unstable();
        keys.dedup();

        let heights: Vec<usize> = keys.iter().map(|_| Self::tower_height(rng)).collect();
        let top = heights.iter().copied().max().unwrap_or(0);

        let mut list = SkipList {
            nodes: Vec::with_capacity(2 * keys.len() + 2 * (top + 1)),
            free_list: Vec::new(),
            root: NULL,
            terminal: NULL,
            height: top + 1,
            len: keys.len(),
            version: 0,
            hash,
        };

        // Indices (into `keys`) of the keys reaching the current level, and
        // the node each of them has on the level below.
        let mut survivors: Vec<usize> = (0..keys.len()).collect();
        let mut below: Vec<Idx> = vec![NULL; keys.len()];
        let mut lower_below = NULL;
        let mut upper_below = NULL;

        for level in 0..=top {
            let continues = level < top;
            let upper = list.alloc_node(Bound::Upper, NULL, upper_below);
            list.node_mut(upper).tower = continues;

            let mut next = upper;
            for &i in survivors.iter().rev() {
                let idx = list.alloc_node(Bound::Key(keys[i]), next, below[i]);
                list.node_mut(idx).tower = heights[i] > level;
                list.rehash([idx]);
                below[i] = idx;
                next = idx;
            }

            let lower = list.alloc_node(Bound::Lower, next, lower_below);
            list.node_mut(lower).tower = continues;
            list.rehash([lower]);

            survivors.retain(|&i| heights[i] > level);
            lower_below = lower;
            upper_below = upper;
        }

        list.root = lower_below;
        list.terminal = upper_below;
        log::debug!(
            "built skip list with {} keys over {} levels",
            list.len,
            list.height
        );
        list
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, including the bottom one.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn hasher(&self) -> &H {
        &self.hash
    }

    // --- Node access helpers ---

    fn node(&self, idx: Idx) -> &Node {
        &self.nodes[idx as usize]
    }

    fn node_mut(&mut self, idx: Idx) -> &mut Node {
        &mut self.nodes[idx as usize]
    }

    fn alloc_node(&mut self, bound: Bound, right: Idx, down: Idx) -> Idx {
        let node = Node {
            bound,
            right,
            down,
            tower: false,
            digest: Digest::default(),
        };
        if let Some(idx) = self.free_list.pop() {
            *self.node_mut(idx) = node;
            idx
        } else {
            let idx = self.nodes.len() as Idx;
            self.nodes.push(node);
            idx
        }
    }

    fn release(&mut self, idx: Idx) {
        let node = self.node_mut(idx);
        node.right = NULL;
        node.down = NULL;
        node.digest = Digest::default();
        self.free_list.push(idx);
    }

    /// Number of extra levels a new key is promoted through.
    fn tower_height<R: RngCore + ?Sized>(rng: &mut R) -> usize {
        let mut height = 0;
        while rng.next_u32() & 1 == 1 {
            height += 1;
        }
        height
    }

    // --- Digests ---

    fn element(&self, idx: Idx) -> Digest {
        match self.node(idx).bound {
            Bound::Key(key) => self.hash.leaf_digest(key),
            Bound::Lower | Bound::Upper => self.hash.empty(),
        }
    }

    /// Already committed to by the level above.
    fn is_shared(&self, idx: Idx) -> bool {
        let node = self.node(idx);
        node.tower || node.bound == Bound::Upper
    }

    /// The digest rule. Reads the cached digests of `right` and `down`, so
    /// those must already be current.
    fn compute_digest(&self, idx: Idx) -> Digest {
        let node = self.node(idx);
        let right = node.right;
        let shared = self.is_shared(right);
        if node.down == NULL {
            let tail = if shared {
                self.element(right)
            } else {
                self.node(right).digest.clone()
            };
            self.hash.combine(&self.element(idx), &tail)
        } else {
            let below = &self.node(node.down).digest;
            if shared {
                below.clone()
            } else {
                self.hash.combine(below, &self.node(right).digest)
            }
        }
    }

    /// Recompute digests in the given order. Callers list every node whose
    /// right neighbour or down target changed, dependencies first.
    fn rehash(&mut self, order: impl IntoIterator<Item = Idx>) {
        for idx in order {
            let digest = self.compute_digest(idx);
            self.node_mut(idx).digest = digest;
        }
    }

    // --- Search ---

    /// Walk from the root toward `key`, moving right while the next key is
    /// below it (or equal to it, when `inclusive`) and descending otherwise.
    /// Calls `visit(node, level)` on every node the walk rests on and returns
    /// the bottom-level node it stops at.
    fn walk(&self, key: i64, inclusive: bool, mut visit: impl FnMut(Idx, usize)) -> Idx {
        let target = Bound::Key(key);
        let mut idx = self.root;
        let mut level = self.height - 1;
        loop {
            visit(idx, level);
            let node = self.node(idx);
            let next = self.node(node.right).bound;
            if next < target || (inclusive && next == target) {
                idx = node.right;
                continue;
            }
            if node.down == NULL {
                return idx;
            }
            idx = node.down;
            level -= 1;
        }
    }

    /// Membership query.
    pub fn find(&self, key: i64) -> bool {
        let pred = self.walk(key, false, |_, _| {});
        self.node(self.node(pred).right).bound == Bound::Key(key)
    }

    // --- Mutation ---

    /// Link a new node for `key` right after `pred`.
    fn splice_after(&mut self, pred: Idx, key: i64, down: Idx) -> Idx {
        let right = self.node(pred).right;
        let idx = self.alloc_node(Bound::Key(key), right, down);
        self.node_mut(pred).right = idx;
        idx
    }

    /// Put a fresh, empty top level above the current one and return its
    /// `-inf` sentinel, which becomes the root.
    fn grow(&mut self) -> Idx {
        let (old_lower, old_upper) = (self.root, self.terminal);
        self.node_mut(old_lower).tower = true;
        self.node_mut(old_upper).tower = true;
        let upper = self.alloc_node(Bound::Upper, NULL, old_upper);
        let lower = self.alloc_node(Bound::Lower, upper, old_lower);
        self.root = lower;
        self.terminal = upper;
        self.height += 1;
        log::debug!("skip list grew to {} levels", self.height);
        lower
    }

    /// Insert a key. Returns false (and changes nothing) if already present.
    pub fn insert<R: RngCore + ?Sized>(&mut self, key: i64, rng: &mut R) -> bool {
        let mut path: Vec<Idx> = Vec::with_capacity(2 * self.height);
        let mut preds: SmallVec<[Idx; 32]> = smallvec![NULL; self.height];
        let pred = self.walk(key, false, |idx, level| {
            path.push(idx);
            preds[level] = idx;
        });
        if self.node(self.node(pred).right).bound == Bound::Key(key) {
            return false;
        }

        // The new tower, bottom-up; its digests go first.
        let mut dirty: Vec<Idx> = Vec::with_capacity(path.len() + 4);
        let mut below = self.splice_after(pred, key, NULL);
        dirty.push(below);

        let mut grown: SmallVec<[Idx; 4]> = SmallVec::new();
        let top = Self::tower_height(rng);
        for level in 1..=top {
            if level == self.height {
                let root = self.grow();
                grown.push(root);
                preds.push(root);
            }
            self.node_mut(below).tower = true;
            below = self.splice_after(preds[level], key, below);
            dirty.push(below);
        }

        dirty.extend(path.iter().rev());
        dirty.extend(grown);
        self.rehash(dirty);

        self.len += 1;
        self.version += 1;
        log::trace!(
            "inserted {} at height {}, version {}",
            key,
            top + 1,
            self.version
        );
        true
    }

    /// Delete a key. Returns false (and changes nothing) if absent.
    ///
    /// Levels left holding only sentinels are kept.
    pub fn delete(&mut self, key: i64) -> bool {
        let mut path: Vec<Idx> = Vec::with_capacity(2 * self.height);
        let mut preds: SmallVec<[Idx; 32]> = smallvec![NULL; self.height];
        let pred = self.walk(key, false, |idx, level| {
            path.push(idx);
            preds[level] = idx;
        });
        if self.node(self.node(pred).right).bound != Bound::Key(key) {
            return false;
        }

        // A tower is contiguous from the bottom, so stop at the first level
        // the key is missing from.
        for &pred in preds.iter() {
            let victim = self.node(pred).right;
            if self.node(victim).bound != Bound::Key(key) {
                break;
            }
            let next = self.node(victim).right;
            self.node_mut(pred).right = next;
            self.release(victim);
        }

        self.rehash(path.into_iter().rev());

        self.len -= 1;
        self.version += 1;
        log::trace!("deleted {}, version {}", key, self.version);
        true
    }

    // --- Commitments ---

    /// Snapshot the current version and root digest.
    pub fn confirmation(&self) -> Confirmation {
        Confirmation {
            version: self.version,
            digest: self.node(self.root).digest.clone(),
        }
    }

    /// Build a proof for `key` at the current version, whether or not the key
    /// is present.
    pub fn proof_of(&self, key: i64) -> Proof {
        let mut path: Vec<Idx> = Vec::with_capacity(2 * self.height);
        let last = self.walk(key, true, |idx, _| path.push(idx));
        let present = self.node(last).bound == Bound::Key(key);

        let mut digests = Vec::with_capacity(path.len() + 1);
        let right = self.node(last).right;
        digests.push(self.element(last));
        digests.push(if self.is_shared(right) {
            self.element(right)
        } else {
            self.node(right).digest.clone()
        });

        // Replay the walk backwards, adding whatever each step's digest
        // combines with besides the step below it.
        for step in path.windows(2).rev() {
            let (from, to) = (step[0], step[1]);
            let node = self.node(from);
            if node.down == to {
                if !self.is_shared(node.right) {
                    digests.push(self.node(node.right).digest.clone());
                }
            } else if node.down == NULL {
                digests.push(self.element(from));
            } else {
                digests.push(self.node(node.down).digest.clone());
            }
        }

        Proof {
            version: self.version,
            present,
            key,
            digests,
        }
    }

    /// Iterate keys in ascending order.
    pub fn keys(&self) -> Keys<'_, H> {
        let mut bottom = self.root;
        while self.node(bottom).down != NULL {
            bottom = self.node(bottom).down;
        }
        Keys {
            list: self,
            current: self.node(bottom).right,
        }
    }

    // --- Invariant checking ---

    /// Walk every level and assert ordering, sentinels, down links, tower
    /// flags, the key count, and that every cached digest is current.
    ///
    /// O(n). Meant for tests and fuzzing.
    pub fn check_invariants(&self) {
        let mut lower = self.root;
        let mut above: Option<FxHashSet<Bound>> = None;

        for level in (0..self.height).rev() {
            assert_ne!(lower, NULL, "INVARIANT VIOLATED: level {} missing", level);
            let mut bounds = FxHashSet::default();
            let mut idx = lower;
            assert_eq!(
                self.node(idx).bound,
                Bound::Lower,
                "INVARIANT VIOLATED: level {} does not start at -inf",
                level
            );

            loop {
                let node = self.node(idx);
                bounds.insert(node.bound);

                let expected_tower = above.as_ref().is_some_and(|a| a.contains(&node.bound));
                assert_eq!(
                    node.tower, expected_tower,
                    "INVARIANT VIOLATED: tower flag of {:?} at level {}",
                    node.bound, level
                );
                if level == 0 {
                    assert_eq!(node.down, NULL, "INVARIANT VIOLATED: bottom node links down");
                } else {
                    assert_ne!(node.down, NULL, "INVARIANT VIOLATED: {:?} has no down link", node.bound);
                    assert_eq!(
                        self.node(node.down).bound,
                        node.bound,
                        "INVARIANT VIOLATED: {:?} links down to a different key",
                        node.bound
                    );
                }

                if node.bound == Bound::Upper {
                    assert_eq!(node.right, NULL, "INVARIANT VIOLATED: +inf has a right link");
                    break;
                }
                assert!(
                    node.bound < self.node(node.right).bound,
                    "INVARIANT VIOLATED: level {} out of order at {:?}",
                    level,
                    node.bound
                );
                assert_eq!(
                    node.digest,
                    self.compute_digest(idx),
                    "INVARIANT VIOLATED: stale digest for {:?} at level {}",
                    node.bound,
                    level
                );
                idx = node.right;
            }

            if level + 1 == self.height {
                assert_eq!(idx, self.terminal, "INVARIANT VIOLATED: terminal is not the top +inf");
            }
            if let Some(above) = &above {
                for bound in above {
                    assert!(
                        bounds.contains(bound),
                        "INVARIANT VIOLATED: {:?} missing below level {}",
                        bound,
                        level + 1
                    );
                }
            }
            if level == 0 {
                assert_eq!(
                    bounds.len() - 2,
                    self.len,
                    "INVARIANT VIOLATED: bottom level has {} keys, len()={}",
                    bounds.len() - 2,
                    self.len
                );
            }

            above = Some(bounds);
            lower = self.node(lower).down;
        }
        assert_eq!(lower, NULL, "INVARIANT VIOLATED: levels below height");
    }
}

/// Ascending iterator over the keys of a [`SkipList`].
pub struct Keys<'a, H: HashAlgorithm> {
    list: &'a SkipList<H>,
    current: Idx,
}

impl<'a, H: HashAlgorithm> Iterator for Keys<'a, H> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        let node = self.list.node(self.current);
        match node.bound {
            Bound::Key(key) => {
                self.current = node.right;
                Some(key)
            }
            Bound::Lower | Bound::Upper => None,
        }
    }
}

impl<H: HashAlgorithm> std::fmt::Debug for SkipList<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SkipList")
            .field("len", &self.len)
            .field("height", &self.height)
            .field("version", &self.version)
            .field("root", &self.node(self.root).digest)
            .finish()
    }
}
