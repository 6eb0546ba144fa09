//! HMAC-SHA3-256 primitives and the byte formats users verify by hand.
//!
//! Verification recipe: `HMAC-SHA3-256(key = hex_decode(KEY), msg = ascii(decimal(value)))`
//! must equal the disclosed 64-character lowercase hex digest.

use std::fmt;

use hmac::{Hmac, Mac};
use sha3::Sha3_256;

use crate::protocol::FairError;

/// Keyed-hash algorithm identity. Part of the external contract.
pub const HMAC_ALGORITHM: &str = "HMAC-SHA3-256";
/// How committed values are turned into bytes before hashing.
pub const VALUE_ENCODING: &str = "decimal-ascii";
/// Digest length in bytes (64 hex characters).
pub const DIGEST_LEN: usize = 32;
pub const DEFAULT_KEY_LEN: usize = 32;
pub const MIN_KEY_LEN: usize = 32;

type HmacSha3_256 = Hmac<Sha3_256>;

fn keyed(key: &[u8], value: u64) -> Result<HmacSha3_256, FairError> {
    let mut mac = <HmacSha3_256 as Mac>::new_from_slice(key)
        .map_err(|_| FairError::KeyInit { len: key.len() })?;
    mac.update(&encode_value(value));
    Ok(mac)
}

/// Decimal ASCII, no sign, no padding: `7` -> `b"7"`, `42` -> `b"42"`.
pub fn encode_value(value: u64) -> Vec<u8> {
    value.to_string().into_bytes()
}

pub fn compute_digest(key: &[u8], value: u64) -> Result<Digest, FairError> {
    Ok(Digest(keyed(key, value)?.finalize().into_bytes().into()))
}

/// Recompute the HMAC and compare in constant time. A key HMAC refuses never verifies.
pub fn verify(key: &[u8], value: u64, digest: &Digest) -> bool {
    keyed(key, value).is_ok_and(|mac| mac.verify_slice(&digest.0).is_ok())
}

/// A disclosed commitment digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// 64 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a digest as printed by [`Digest::to_hex`]; upper case is accepted.
    pub fn from_hex(s: &str) -> Result<Self, FairError> {
        let bytes = hex::decode(s.trim())?;
        let arr: [u8; DIGEST_LEN] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| FairError::DigestLength { len: bytes.len() })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", self.to_hex())
    }
}

/// Per-commitment HMAC key. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Lowercase hex of exactly the generated bytes.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    pub fn from_hex(s: &str) -> Result<Self, FairError> {
        Ok(Self(hex::decode(s.trim())?))
    }

    pub(crate) fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey(<{} bytes>)", self.0.len())
    }
}
