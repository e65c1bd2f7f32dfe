// created = "2026-10-18"
// modified = "2026-10-18"

//! Authskip - an authenticated skip list over `i64` keys.
//!
//! The list keeps a root digest committing to its whole content. Anyone
//! holding a [`Confirmation`] (version plus root digest) can check a
//! [`Proof`] that a key is, or is not, a member, without seeing the set.
//!
//! # Quick Start
//!
//! ```
//! use authskip::{Blake3, SkipList, Verdict};
//! use rand_core::OsRng;
//!
//! let mut list = SkipList::new();
//! for key in [5, 2, 3] {
//!     list.insert(key, &mut OsRng);
//! }
//!
//! let confirmation = list.confirmation();
//! let proof = list.proof_of(5);
//! assert!(proof.present);
//! assert_eq!(confirmation.validate(&proof, &Blake3), Verdict::Correct);
//!
//! // Any later mutation makes older proofs stale.
//! list.insert(4, &mut OsRng);
//! assert_eq!(list.confirmation().validate(&proof, &Blake3), Verdict::Stale);
//! ```

pub mod hash;
pub mod key;
pub mod proof;
pub mod signed;
pub mod skip_list;
pub mod wire;

pub use hash::Blake3;
pub use hash::Digest;
pub use hash::HashAlgorithm;
pub use proof::Confirmation;
pub use proof::Proof;
pub use proof::Verdict;
pub use signed::SignedConfirmation;
pub use skip_list::SkipList;
pub use wire::WireError;
