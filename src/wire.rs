// created = "2026-10-18"
// modified = "2026-10-18"

//! Byte encoding for confirmations and proofs.
//!
//! All integers are little-endian. Every message starts with a tag byte:
//!
//! ```text
//! confirmation:        0x10 | version u64 | digest
//! proof:               0x11 | version u64 | present u8 | key i64 | count u32 | digest*
//! signed confirmation: 0x12 | author [32] | signature [64] | version u64 | digest
//! digest:              len u32 | bytes
//! ```

use thiserror::Error;

use crate::hash::Digest;
use crate::key::KeyPub;
use crate::key::Signature;
use crate::proof::Confirmation;
use crate::proof::Proof;
use crate::signed::SignedConfirmation;

pub const TAG_CONFIRMATION: u8 = 0x10;
pub const TAG_PROOF: u8 = 0x11;
pub const TAG_SIGNED_CONFIRMATION: u8 = 0x12;

/// Why a message could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    #[error("unexpected end of input: needed {needed} more bytes")]
    Truncated { needed: usize },

    #[error("unexpected message tag {0:#04x}")]
    UnexpectedTag(u8),

    #[error("invalid presence flag {0:#04x}")]
    InvalidFlag(u8),

    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
}

struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        if self.bytes.len() < n {
            return Err(WireError::Truncated {
                needed: n - self.bytes.len(),
            });
        }
        let (head, rest) = self.bytes.split_at(n);
        self.bytes = rest;
        return Ok(head);
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], WireError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        return Ok(out);
    }

    fn u8(&mut self) -> Result<u8, WireError> {
        return Ok(self.array::<1>()?[0]);
    }

    fn u32(&mut self) -> Result<u32, WireError> {
        return Ok(u32::from_le_bytes(self.array()?));
    }

    fn u64(&mut self) -> Result<u64, WireError> {
        return Ok(u64::from_le_bytes(self.array()?));
    }

    fn i64(&mut self) -> Result<i64, WireError> {
        return Ok(i64::from_le_bytes(self.array()?));
    }

    fn digest(&mut self) -> Result<Digest, WireError> {
        let len = self.u32()? as usize;
        return Ok(Digest::from_slice(self.take(len)?));
    }

    fn tag(&mut self, expected: u8) -> Result<(), WireError> {
        let tag = self.u8()?;
        if tag != expected {
            return Err(WireError::UnexpectedTag(tag));
        }
        return Ok(());
    }

    fn finish(self) -> Result<(), WireError> {
        if !self.bytes.is_empty() {
            return Err(WireError::TrailingBytes(self.bytes.len()));
        }
        return Ok(());
    }
}

fn put_digest(out: &mut Vec<u8>, digest: &Digest) {
    out.extend_from_slice(&(digest.len() as u32).to_le_bytes());
    out.extend_from_slice(digest.as_bytes());
}

fn put_confirmation_body(out: &mut Vec<u8>, confirmation: &Confirmation) {
    out.extend_from_slice(&confirmation.version.to_le_bytes());
    put_digest(out, &confirmation.digest);
}

fn read_confirmation_body(reader: &mut Reader<'_>) -> Result<Confirmation, WireError> {
    let version = reader.u64()?;
    let digest = reader.digest()?;
    return Ok(Confirmation { version, digest });
}

impl Confirmation {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + 8 + 4 + self.digest.len());
        out.push(TAG_CONFIRMATION);
        put_confirmation_body(&mut out, self);
        return out;
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Confirmation, WireError> {
        let mut reader = Reader { bytes };
        reader.tag(TAG_CONFIRMATION)?;
        let confirmation = read_confirmation_body(&mut reader)?;
        reader.finish()?;
        return Ok(confirmation);
    }
}

impl Proof {
    pub fn to_bytes(&self) -> Vec<u8> {
        let digest_bytes: usize = self.digests.iter().map(|d| 4 + d.len()).sum();
        let mut out = Vec::with_capacity(1 + 8 + 1 + 8 + 4 + digest_bytes);
        out.push(TAG_PROOF);
        out.extend_from_slice(&self.version.to_le_bytes());
        out.push(self.present as u8);
        out.extend_from_slice(&self.key.to_le_bytes());
        out.extend_from_slice(&(self.digests.len() as u32).to_le_bytes());
        for digest in &self.digests {
            put_digest(&mut out, digest);
        }
        return out;
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Proof, WireError> {
        let mut reader = Reader { bytes };
        reader.tag(TAG_PROOF)?;
        let version = reader.u64()?;
        let present = match reader.u8()? {
            0 => false,
            1 => true,
            flag => return Err(WireError::InvalidFlag(flag)),
        };
        let key = reader.i64()?;
        let count = reader.u32()? as usize;
        // Each digest needs at least its length prefix, so never trust
        // `count` beyond what the input could hold.
        let mut digests = Vec::with_capacity(count.min(reader.bytes.len() / 4));
        for _ in 0..count {
            digests.push(reader.digest()?);
        }
        reader.finish()?;
        return Ok(Proof {
            version,
            present,
            key,
            digests,
        });
    }
}

impl SignedConfirmation {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + 32 + 64 + 8 + 4 + self.confirmation.digest.len());
        out.push(TAG_SIGNED_CONFIRMATION);
        out.extend_from_slice(&self.author.0);
        out.extend_from_slice(&self.signature.0);
        put_confirmation_body(&mut out, &self.confirmation);
        return out;
    }

    /// Decode without checking the signature; call
    /// [`verify`](SignedConfirmation::verify) on the result.
    pub fn from_bytes(bytes: &[u8]) -> Result<SignedConfirmation, WireError> {
        let mut reader = Reader { bytes };
        reader.tag(TAG_SIGNED_CONFIRMATION)?;
        let author = KeyPub(reader.array()?);
        let signature = Signature(reader.array()?);
        let confirmation = read_confirmation_body(&mut reader)?;
        reader.finish()?;
        return Ok(SignedConfirmation {
            author,
            confirmation,
            signature,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::KeyPair;
    use crate::skip_list::SkipList;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn list() -> SkipList {
        let mut rng = StdRng::seed_from_u64(3);
        return SkipList::build((0..64).map(|k| k * 2), &mut rng);
    }

    #[test]
    fn proof_survives_the_wire() {
        let list = list();
        for key in [0, 31, 64, 127, 500] {
            let proof = list.proof_of(key);
            let decoded = Proof::from_bytes(&proof.to_bytes()).unwrap();
            assert_eq!(decoded, proof);
        }
    }

    #[test]
    fn signed_confirmation_survives_the_wire() {
        let signed = list().confirmation().sign(&KeyPair::from_seed(9));
        let decoded = SignedConfirmation::from_bytes(&signed.to_bytes()).unwrap();
        assert_eq!(decoded, signed);
        assert!(decoded.verify());
    }

    #[test]
    fn confirmation_layout() {
        let confirmation = Confirmation {
            version: 2,
            digest: Digest::from_slice(&[0xaa, 0xbb]),
        };
        assert_eq!(
            confirmation.to_bytes(),
            vec![0x10, 2, 0, 0, 0, 0, 0, 0, 0, 2, 0, 0, 0, 0xaa, 0xbb]
        );
        assert_eq!(Confirmation::from_bytes(&confirmation.to_bytes()), Ok(confirmation));
    }

    #[test]
    fn truncated_input_is_rejected() {
        let bytes = list().proof_of(10).to_bytes();
        let cut = &bytes[..bytes.len() - 5];
        assert_eq!(Proof::from_bytes(cut), Err(WireError::Truncated { needed: 5 }));
        assert_eq!(Proof::from_bytes(&[]), Err(WireError::Truncated { needed: 1 }));
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = list().confirmation().to_bytes();
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(Confirmation::from_bytes(&bytes), Err(WireError::TrailingBytes(2)));
    }

    #[test]
    fn wrong_tag_is_rejected() {
        let bytes = list().confirmation().to_bytes();
        assert_eq!(Proof::from_bytes(&bytes), Err(WireError::UnexpectedTag(TAG_CONFIRMATION)));
    }

    #[test]
    fn presence_flag_must_be_boolean() {
        let mut bytes = list().proof_of(10).to_bytes();
        bytes[9] = 7;
        assert_eq!(Proof::from_bytes(&bytes), Err(WireError::InvalidFlag(7)));
    }

    #[test]
    fn huge_count_does_not_preallocate() {
        let mut bytes = vec![TAG_PROOF];
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes.push(0);
        bytes.extend_from_slice(&0i64.to_le_bytes());
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        assert_eq!(Proof::from_bytes(&bytes), Err(WireError::Truncated { needed: 4 }));
    }
}
