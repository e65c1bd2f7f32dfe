// created = "2026-10-18"
// modified = "2026-10-18"

//! Confirmations, proofs, and the verdict of checking one against the other.
//!
//! A [`Confirmation`] is a published `(version, root digest)` pair. A
//! [`Proof`] is the authentication path for a single key, taken at some
//! version. Neither keeps a reference to the skip list that produced it, so
//! both can be shipped elsewhere and checked much later.

use crate::hash::Digest;
use crate::hash::HashAlgorithm;

/// A point-in-time commitment to the whole key set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub version: u64,
    pub digest: Digest,
}

/// Membership or non-membership proof for one key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Proof {
    /// Version of the skip list the path was captured at.
    pub version: u64,
    /// Whether `key` was a member at that version.
    pub present: bool,
    pub key: i64,
    /// Authentication path, bottom-up. Folding it with `combine` yields the
    /// root digest.
    pub digests: Vec<Digest>,
}

/// Outcome of checking a proof against a confirmation.
///
/// `Stale` means "fetch a fresher proof", `Incorrect` means "reject".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    Stale,
    Correct,
    Incorrect,
}

impl Confirmation {
    /// Check a proof against this commitment.
    ///
    /// A proof captured before this confirmation's version is `Stale`. A proof
    /// at the same or a later version is folded and compared.
    pub fn validate<H: HashAlgorithm + ?Sized>(&self, proof: &Proof, hash: &H) -> Verdict {
        if proof.version < self.version {
            return Verdict::Stale;
        }
        return match proof.fold(hash) {
            Some(root) if root == self.digest => Verdict::Correct,
            _ => Verdict::Incorrect,
        };
    }

    /// Like [`validate`](Self::validate), but the presence flag must agree
    /// with the start of the path: a membership claim starts from the digest
    /// of the key it names, and an absence claim must not.
    ///
    /// An absence claim carrying some other key's valid path still passes.
    /// Digests alone do not say which gap a path brackets.
    pub fn verify<H: HashAlgorithm + ?Sized>(&self, proof: &Proof, hash: &H) -> Verdict {
        let verdict = self.validate(proof, hash);
        if verdict != Verdict::Correct {
            return verdict;
        }
        if proof.present != proof.binds_key(hash) {
            return Verdict::Incorrect;
        }
        return Verdict::Correct;
    }
}

impl Proof {
    /// Fold the path into the root digest it commits to.
    /// Returns `None` for an empty path.
    pub fn fold<H: HashAlgorithm + ?Sized>(&self, hash: &H) -> Option<Digest> {
        let mut digests = self.digests.iter();
        let mut acc = digests.next()?.clone();
        for digest in digests {
            acc = hash.combine(&acc, digest);
        }
        return Some(acc);
    }

    /// True if the path starts at `leaf_digest(key)`.
    pub fn binds_key<H: HashAlgorithm + ?Sized>(&self, hash: &H) -> bool {
        return self.digests.first() == Some(&hash.leaf_digest(self.key));
    }
}
