// created = "2026-10-18"
// modified = "2026-10-18"

//! ed25519 identities used to sign confirmations.

use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use ed25519_dalek::Verifier;
use ed25519_dalek::VerifyingKey;
use rand_core::OsRng;

use crate::hash::hex;

/// A public key, 32 bytes on the ed25519 curve.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyPub(pub [u8; 32]);

/// A secret key, 32 bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct KeySec(pub [u8; 32]);

/// A keypair bundles a public and secret key together.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub key_pub: KeyPub,
    pub key_sec: KeySec,
}

/// A signature, 64 bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl KeyPair {
    /// Generate a random keypair.
    pub fn generate() -> KeyPair {
        return KeyPair::from_signing(SigningKey::generate(&mut OsRng));
    }

    /// Derive a keypair from a seed. Deterministic, for tests and fuzzing.
    pub fn from_seed(seed: u64) -> KeyPair {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"authskip keypair seed");
        hasher.update(&seed.to_le_bytes());
        let secret = *hasher.finalize().as_bytes();
        return KeyPair::from_signing(SigningKey::from_bytes(&secret));
    }

    fn from_signing(signing: SigningKey) -> KeyPair {
        let verifying = signing.verifying_key();
        return KeyPair {
            key_pub: KeyPub(verifying.to_bytes()),
            key_sec: KeySec(signing.to_bytes()),
        };
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> Signature {
        let signing = SigningKey::from_bytes(&self.key_sec.0);
        return Signature(signing.sign(message).to_bytes());
    }
}

impl KeyPub {
    /// Verify a signature against this public key.
    pub fn verify(&self, message: &[u8], signature: &Signature) -> bool {
        let verifying = match VerifyingKey::from_bytes(&self.0) {
            Ok(v) => v,
            Err(_) => return false,
        };
        let sig = ed25519_dalek::Signature::from_bytes(&signature.0);
        return verifying.verify(message, &sig).is_ok();
    }
}

impl std::fmt::Debug for KeyPub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "KeyPub({})", hex(&self.0));
    }
}

impl std::fmt::Debug for KeySec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "KeySec(..)");
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "KeyPair {{ pub: {} }}", hex(&self.key_pub.0));
    }
}

impl std::fmt::Debug for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "Signature({})", hex(&self.0));
    }
}
