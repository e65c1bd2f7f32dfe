// created = "2026-10-18"
// modified = "2026-10-18"

//! Confirmations signed by the replica that published them.

use crate::hash::HashAlgorithm;
use crate::key::KeyPair;
use crate::key::KeyPub;
use crate::key::Signature;
use crate::proof::Confirmation;
use crate::proof::Proof;
use crate::proof::Verdict;

/// Type constant for the signed confirmation message.
pub const TYPE_CONFIRMATION: u8 = 0x03;

/// Compute the signable message for a confirmation.
fn signable(confirmation: &Confirmation) -> Vec<u8> {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&[TYPE_CONFIRMATION]);
    hasher.update(&confirmation.version.to_le_bytes());
    hasher.update(&(confirmation.digest.len() as u64).to_le_bytes());
    hasher.update(confirmation.digest.as_bytes());
    return hasher.finalize().as_bytes().to_vec();
}

/// A confirmation plus the author's signature over it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedConfirmation {
    pub author: KeyPub,
    pub confirmation: Confirmation,
    pub signature: Signature,
}

impl Confirmation {
    /// Sign this confirmation.
    pub fn sign(&self, keypair: &KeyPair) -> SignedConfirmation {
        let signature = keypair.sign(&signable(self));
        return SignedConfirmation {
            author: keypair.key_pub,
            confirmation: self.clone(),
            signature,
        };
    }
}

impl SignedConfirmation {
    /// Verify the author's signature.
    pub fn verify(&self) -> bool {
        return self.author.verify(&signable(&self.confirmation), &self.signature);
    }

    /// Check a proof against the signed commitment. A bad signature is
    /// `Incorrect` regardless of the proof.
    pub fn validate<H: HashAlgorithm + ?Sized>(&self, proof: &Proof, hash: &H) -> Verdict {
        if !self.verify() {
            return Verdict::Incorrect;
        }
        return self.confirmation.validate(proof, hash);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::Blake3;
    use crate::skip_list::SkipList;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn list() -> SkipList {
        let mut rng = StdRng::seed_from_u64(11);
        return SkipList::build([4, 8, 15, 16, 23, 42], &mut rng);
    }

    #[test]
    fn sign_produces_valid_signature() {
        let pair = KeyPair::from_seed(1);
        let signed = list().confirmation().sign(&pair);
        assert!(signed.verify());
    }

    #[test]
    fn signature_covers_version() {
        let pair = KeyPair::from_seed(1);
        let mut signed = list().confirmation().sign(&pair);
        signed.confirmation.version += 1;
        assert!(!signed.verify());
    }

    #[test]
    fn signature_covers_digest() {
        let pair = KeyPair::from_seed(1);
        let mut signed = list().confirmation().sign(&pair);
        signed.confirmation.digest = Blake3.empty();
        assert!(!signed.verify());
    }

    #[test]
    fn verification_fails_with_wrong_key() {
        let alice = KeyPair::from_seed(1);
        let bob = KeyPair::from_seed(2);
        let signed = list().confirmation().sign(&alice);
        let forged = SignedConfirmation {
            author: bob.key_pub,
            ..signed
        };
        assert!(!forged.verify());
    }

    #[test]
    fn validate_defers_to_confirmation() {
        let list = list();
        let pair = KeyPair::from_seed(3);
        let signed = list.confirmation().sign(&pair);
        assert_eq!(signed.validate(&list.proof_of(15), &Blake3), Verdict::Correct);
        assert_eq!(signed.validate(&list.proof_of(14), &Blake3), Verdict::Correct);
    }

    #[test]
    fn validate_rejects_bad_signature() {
        let list = list();
        let pair = KeyPair::from_seed(3);
        let mut signed = list.confirmation().sign(&pair);
        signed.signature.0[0] ^= 0xff;
        assert_eq!(signed.validate(&list.proof_of(15), &Blake3), Verdict::Incorrect);
    }
}
