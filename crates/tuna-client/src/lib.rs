//! Client bindings for the Tuna lending and leveraged-liquidity program.
//!
//! Account layouts, instruction encoders, program-derived addresses and
//! `getProgramAccounts` filters for Tuna, plus the read-only Orca Whirlpool
//! and Fusion AMM accounts the transaction builders need. Everything here is
//! pure: no I/O, no RPC.

pub mod accounts;
pub mod codec;
pub mod error;
pub mod filters;
pub mod instructions;
pub mod pda;
pub mod program;
pub mod tick;
pub mod types;

pub use codec::{AccountData, TunaInstruction};
pub use error::CodecError;
pub use program::{ProgramIds, FUSIONAMM_PROGRAM_ID, TUNA_PROGRAM_ID, WHIRLPOOL_PROGRAM_ID};
pub use types::{MarketMaker, TunaPositionState};
