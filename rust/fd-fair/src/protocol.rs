//! Commit/reveal protocol for a jointly chosen value in `[0, n)`.
//!
//! The generator commits to `c` by disclosing `HMAC(key, c)`, the counterpart
//! answers with `u`, and only then are `key` and `c` revealed; the fair value is
//! `(c + u) mod n`. The three states are distinct types so that revealing before
//! committing, committing twice, or revealing twice does not compile:
//!
//! ```text
//! Uncommitted --commit--> Committed --reveal(u)--> Revealed
//!                             ^            |
//!                             +--Rejected--+   (u out of range; same digest)
//! ```

use std::fmt;

use rand::rngs::OsRng;
use rand_core::{CryptoRng, RngCore};
use thiserror::Error;

use crate::digest::{
    compute_digest, verify, Digest, SecretKey, DEFAULT_KEY_LEN, MIN_KEY_LEN,
};
use crate::entropy::{fill_key, sample_below};

#[derive(Debug, Error)]
pub enum FairError {
    #[error("modulus must be at least 1, got {n}")]
    Range { n: u64 },
    #[error("value {value} is outside the range [0, {n})")]
    InvalidInput { value: u64, n: u64 },
    #[error("secure random source unavailable: {0}")]
    Entropy(#[from] rand_core::Error),
    #[error("secret key must be at least {MIN_KEY_LEN} bytes, got {len}")]
    KeyLength { len: usize },
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("digest must be 32 bytes, got {len}")]
    DigestLength { len: usize },
    #[error("HMAC rejected a {len}-byte key")]
    KeyInit { len: usize },
}

/// `(c + u) mod n` without overflow. `n` must be at least 1.
pub fn fair_value(own: u64, counterpart: u64, n: u64) -> u64 {
    ((own as u128 + counterpart as u128) % n as u128) as u64
}

/// A protocol round that has not drawn anything yet.
#[derive(Debug, Clone, Copy)]
pub struct Uncommitted {
    n: u64,
    key_len: usize,
}

impl Uncommitted {
    pub fn new(n: u64) -> Result<Self, FairError> {
        Self::with_key_len(n, DEFAULT_KEY_LEN)
    }

    pub fn with_key_len(n: u64, key_len: usize) -> Result<Self, FairError> {
        if n < 1 {
            return Err(FairError::Range { n });
        }
        if key_len < MIN_KEY_LEN {
            return Err(FairError::KeyLength { len: key_len });
        }
        Ok(Self { n, key_len })
    }

    pub fn modulus(&self) -> u64 {
        self.n
    }

    /// Commit using the operating system's CSPRNG.
    pub fn commit(self) -> Result<Committed, FairError> {
        self.commit_with(&mut OsRng)
    }

    /// Commit drawing key and value from `rng`.
    pub fn commit_with<R: RngCore + CryptoRng>(self, rng: &mut R) -> Result<Committed, FairError> {
        let key = fill_key(rng, self.key_len)?;
        let value = sample_below(rng, self.n)?;
        let digest = compute_digest(key.as_bytes(), value)?;
        Ok(Committed {
            n: self.n,
            key,
            value,
            digest,
        })
    }
}

/// Digest disclosed; key and value still private.
pub struct Committed {
    n: u64,
    key: SecretKey,
    value: u64,
    digest: Digest,
}

impl Committed {
    pub fn modulus(&self) -> u64 {
        self.n
    }

    /// The only value that may be shown before the counterpart answers.
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Validate a counterpart value without consuming the commitment.
    pub fn check(&self, counterpart: u64) -> Result<(), FairError> {
        if counterpart >= self.n {
            return Err(FairError::InvalidInput {
                value: counterpart,
                n: self.n,
            });
        }
        Ok(())
    }

    /// Combine with the counterpart value and disclose key and value.
    ///
    /// An out-of-range `counterpart` hands the commitment back untouched inside
    /// [`Rejected`], so the caller can ask again under the same digest.
    pub fn reveal(self, counterpart: u64) -> Result<Revealed, Rejected> {
        if let Err(error) = self.check(counterpart) {
            return Err(Rejected {
                error,
                committed: self,
            });
        }
        Ok(Revealed {
            result: fair_value(self.value, counterpart, self.n),
            n: self.n,
            key: self.key,
            own: self.value,
            counterpart,
            digest: self.digest,
        })
    }
}

impl fmt::Debug for Committed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Committed")
            .field("n", &self.n)
            .field("digest", &self.digest)
            .finish_non_exhaustive()
    }
}

/// A counterpart value was refused; the commitment is still live.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Rejected {
    error: FairError,
    committed: Committed,
}

impl Rejected {
    pub fn error(&self) -> &FairError {
        &self.error
    }

    pub fn into_committed(self) -> Committed {
        self.committed
    }
}

/// Terminal state: everything is public.
#[derive(Debug, Clone)]
pub struct Revealed {
    n: u64,
    key: SecretKey,
    own: u64,
    counterpart: u64,
    result: u64,
    digest: Digest,
}

impl Revealed {
    pub fn modulus(&self) -> u64 {
        self.n
    }

    /// The value committed to before the counterpart answered.
    pub fn own_value(&self) -> u64 {
        self.own
    }

    pub fn counterpart_value(&self) -> u64 {
        self.counterpart
    }

    /// `(own + counterpart) mod n`.
    pub fn result(&self) -> u64 {
        self.result
    }

    pub fn key(&self) -> &SecretKey {
        &self.key
    }

    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    /// Recompute the HMAC from the disclosed key and value.
    pub fn verify(&self) -> bool {
        verify(self.key.as_bytes(), self.own, &self.digest)
    }
}
