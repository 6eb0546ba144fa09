//! Drawing keys and values from a cryptographic RNG.
//!
//! Only the fallible `try_fill_bytes` path is used: an unavailable source surfaces
//! as `FairError::Entropy` instead of a panic or a weaker substitute.

use rand_core::{CryptoRng, RngCore};

use crate::digest::SecretKey;
use crate::protocol::FairError;

pub fn fill_key<R: RngCore + CryptoRng>(rng: &mut R, len: usize) -> Result<SecretKey, FairError> {
    let mut bytes = vec![0u8; len];
    rng.try_fill_bytes(&mut bytes)?;
    Ok(SecretKey::from_bytes(bytes))
}

/// Uniform integer in `[0, n)`.
///
/// Rejection sampling over 64-bit draws: values above the largest multiple of `n`
/// are redrawn, so every residue is equally likely.
pub fn sample_below<R: RngCore + CryptoRng>(rng: &mut R, n: u64) -> Result<u64, FairError> {
    if n < 1 {
        return Err(FairError::Range { n });
    }
    // 2^64 mod n
    let rem = (u64::MAX % n + 1) % n;
    let max_accept = u64::MAX - rem;
    loop {
        let mut buf = [0u8; 8];
        rng.try_fill_bytes(&mut buf)?;
        let v = u64::from_le_bytes(buf);
        if v <= max_accept {
            return Ok(v % n);
        }
    }
}
