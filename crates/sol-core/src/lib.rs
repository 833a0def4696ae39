//! Minimal Solana primitives for building and signing program calls.
//!
//! Public keys, program-derived addresses, instructions, the legacy and v0
//! message wire formats, and the handful of System, Token, Associated Token
//! and Compute Budget instructions a client needs around a program call.
//! Everything is implemented on top of `ed25519-dalek`, `curve25519-dalek`,
//! `sha2` and `bs58` rather than the full `solana-sdk`.

pub mod compute_budget;
pub mod error;
pub mod instruction;
pub mod keypair;
pub mod lookup_table;
pub mod pda;
pub mod pubkey;
pub mod system;
pub mod token;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use error::SolError;
pub use instruction::{AccountMeta, Instruction};
pub use keypair::Keypair;
pub use lookup_table::AddressLookupTable;
pub use pda::{create_program_address, find_program_address};
pub use pubkey::Pubkey;
pub use transaction::{encode_compact_u16, Message, MessageVersion, Transaction};
