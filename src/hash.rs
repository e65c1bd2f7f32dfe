// created = "2026-10-18"
// modified = "2026-10-18"

//! Digests and the hash collaborator the skip list commits with.
//!
//! The skip list never hashes bytes itself. Everything goes through a
//! [`HashAlgorithm`], which supplies a digest for each key, a digest for the
//! sentinels, and a *commutative* two-input combination. Proofs are folded
//! left to right without direction bits, so `combine(a, b) == combine(b, a)`
//! must hold for any implementation plugged in.

use smallvec::SmallVec;

/// Type constant for key (leaf) digests.
pub const TYPE_LEAF: u8 = 0x00;

/// Type constant for combined digests.
pub const TYPE_COMBINE: u8 = 0x01;

/// Type constant for the empty marker used by both sentinels.
pub const TYPE_EMPTY: u8 = 0x02;

/// An opaque digest. Its length is whatever the hash algorithm produces;
/// 32-byte digests are stored inline.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest(SmallVec<[u8; 32]>);

impl Digest {
    /// Copy a digest out of a byte slice.
    pub fn from_slice(bytes: &[u8]) -> Digest {
        return Digest(SmallVec::from_slice(bytes));
    }

    pub fn as_bytes(&self) -> &[u8] {
        return &self.0;
    }

    pub fn len(&self) -> usize {
        return self.0.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.0.is_empty();
    }
}

impl From<[u8; 32]> for Digest {
    fn from(bytes: [u8; 32]) -> Digest {
        return Digest(SmallVec::from_buf(bytes));
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        return &self.0;
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "Digest({})", hex(&self.0));
    }
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    return bytes.iter().map(|b| format!("{:02x}", b)).collect();
}

/// The pairwise hash primitive behind every commitment.
pub trait HashAlgorithm {
    /// Digest committing to a single key.
    fn leaf_digest(&self, key: i64) -> Digest;

    /// Order-independent combination of two digests.
    fn combine(&self, a: &Digest, b: &Digest) -> Digest;

    /// Marker standing in for the `-inf`/`+inf` sentinels.
    fn empty(&self) -> Digest;
}

/// blake3 with one-byte domain separation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Blake3;

impl HashAlgorithm for Blake3 {
    fn leaf_digest(&self, key: i64) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[TYPE_LEAF]);
        hasher.update(&key.to_le_bytes());
        return Digest::from(*hasher.finalize().as_bytes());
    }

    fn combine(&self, a: &Digest, b: &Digest) -> Digest {
        // Sorting the inputs is what makes this commutative.
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[TYPE_COMBINE]);
        hasher.update(&(lo.len() as u64).to_le_bytes());
        hasher.update(lo.as_bytes());
        hasher.update(&(hi.len() as u64).to_le_bytes());
        hasher.update(hi.as_bytes());
        return Digest::from(*hasher.finalize().as_bytes());
    }

    fn empty(&self) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[TYPE_EMPTY]);
        return Digest::from(*hasher.finalize().as_bytes());
    }
}

impl<H: HashAlgorithm + ?Sized> HashAlgorithm for &H {
    fn leaf_digest(&self, key: i64) -> Digest {
        return (**self).leaf_digest(key);
    }

    fn combine(&self, a: &Digest, b: &Digest) -> Digest {
        return (**self).combine(a, b);
    }

    fn empty(&self) -> Digest {
        return (**self).empty();
    }
}
