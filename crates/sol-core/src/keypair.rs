//! Ed25519 keypairs in the Solana CLI format.
//!
//! The CLI stores a keypair as a JSON array of 64 bytes: the 32-byte secret
//! seed followed by the 32-byte public key.

use std::path::Path;

use ed25519_dalek::{Signer, SigningKey};
use zeroize::Zeroize;

use crate::error::SolError;
use crate::pubkey::Pubkey;

pub const KEYPAIR_LENGTH: usize = 64;

pub struct Keypair {
    signing_key: SigningKey,
}

impl Keypair {
    /// Generate a fresh random keypair (e.g. for a new position mint).
    pub fn generate() -> Self {
        let mut rng = rand::rngs::OsRng;
        Self {
            signing_key: SigningKey::generate(&mut rng),
        }
    }

    /// Build a keypair from a 32-byte secret seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Build a keypair from the 64-byte `secret || public` layout, checking
    /// that the public half matches the secret half.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SolError> {
        if bytes.len() != KEYPAIR_LENGTH {
            return Err(SolError::InvalidKeypair(format!(
                "expected {KEYPAIR_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();

        if signing_key.verifying_key().as_bytes() != &bytes[32..] {
            return Err(SolError::InvalidKeypair(
                "public key does not match secret key".into(),
            ));
        }

        Ok(Self { signing_key })
    }

    /// Read a keypair file written by `solana-keygen`.
    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self, SolError> {
        let mut contents = std::fs::read_to_string(path)?;
        let parsed: Result<Vec<u8>, _> = serde_json::from_str(&contents);
        contents.zeroize();

        let mut bytes = parsed
            .map_err(|e| SolError::InvalidKeypair(format!("keypair file is not a byte array: {e}")))?;
        let keypair = Self::from_bytes(&bytes);
        bytes.zeroize();
        keypair
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign `message`, returning the raw 64-byte Ed25519 signature.
    pub fn sign_message(&self, message: &[u8]) -> [u8; 64] {
        self.signing_key.sign(message).to_bytes()
    }

    /// The 64-byte `secret || public` layout.
    pub fn to_bytes(&self) -> [u8; KEYPAIR_LENGTH] {
        self.signing_key.to_keypair_bytes()
    }
}

impl std::fmt::Debug for Keypair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey())
            .finish_non_exhaustive()
    }
}
