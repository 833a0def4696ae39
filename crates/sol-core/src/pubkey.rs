//! Solana public keys.
//!
//! A Solana address is the Base58 encoding of a raw 32-byte Ed25519 public
//! key, or of a program-derived address that deliberately lies off the curve.
//! The canonical alphabet is the Bitcoin Base58 alphabet used by `bs58`.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SolError;

pub const PUBKEY_BYTES: usize = 32;

/// A 32-byte account address.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, BorshSerialize, BorshDeserialize,
)]
pub struct Pubkey(pub [u8; PUBKEY_BYTES]);

impl Pubkey {
    pub const fn new_from_array(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Build a key from a slice, failing unless it is exactly 32 bytes long.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, SolError> {
        let arr: [u8; PUBKEY_BYTES] = bytes.try_into().map_err(|_| {
            SolError::InvalidPubkey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self(arr))
    }

    /// A unique key for tests and placeholders. Not a valid keypair.
    pub fn new_unique() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut bytes = [0u8; PUBKEY_BYTES];
        bytes[..8].copy_from_slice(&n.to_be_bytes());
        bytes[31] = 0xee;
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub fn as_array(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    /// Whether these bytes decompress to a point on the Ed25519 curve.
    ///
    /// Program-derived addresses must NOT be on the curve, so that no private
    /// key can ever sign for them.
    pub fn is_on_curve(&self) -> bool {
        curve25519_dalek::edwards::CompressedEdwardsY(self.0)
            .decompress()
            .is_some()
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; PUBKEY_BYTES]> for Pubkey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Pubkey {
    type Err = SolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| SolError::InvalidPubkey(format!("base58 decode failed: {e}")))?;
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Pubkey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Pubkey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = <String as Deserialize>::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
