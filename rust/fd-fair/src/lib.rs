//! fd-fair: provably fair random values via HMAC commitments.
//!
//! One protocol, parameterised only by the modulus `n`, serves every place the
//! game needs randomness from the computer: `n = 2` decides who moves first and
//! `n = face count` picks the face of a throw.

pub mod digest;
pub mod entropy;
pub mod protocol;

pub use digest::{
    compute_digest, encode_value, verify, Digest, SecretKey, DEFAULT_KEY_LEN, DIGEST_LEN,
    HMAC_ALGORITHM, MIN_KEY_LEN, VALUE_ENCODING,
};
pub use entropy::sample_below;
pub use protocol::{fair_value, Committed, FairError, Rejected, Revealed, Uncommitted};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");


#[cfg(test)]
mod digest_tests;
