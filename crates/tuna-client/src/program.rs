//! Program ids of the Tuna program and the AMMs it trades through.

use serde::Serialize;
use sol_core::Pubkey;

use crate::types::MarketMaker;

/// Tuna program (mainnet): `tuna4uSQZncNeeiAMKbstuxA9CUkHH6HmC64wgmnogD`
pub const TUNA_PROGRAM_ID: Pubkey = Pubkey([
    0x0d, 0x4c, 0x4e, 0x65, 0x68, 0x56, 0x95, 0x0a, 0x2b, 0x31, 0x99, 0x17, 0x87, 0x0c, 0xab, 0x2f,
    0xf5, 0x6c, 0xd9, 0xc8, 0x2d, 0x7c, 0x01, 0x64, 0xae, 0x25, 0x89, 0x1d, 0x66, 0x98, 0x3c, 0x82,
]);

/// Orca Whirlpool program: `whirLbMiicVdio4qvUfM5KAg6Ct8VwpYzGff3uctyCc`
pub const WHIRLPOOL_PROGRAM_ID: Pubkey = Pubkey([
    0x0e, 0x03, 0x68, 0x5f, 0x8e, 0x90, 0x90, 0x53, 0xe4, 0x58, 0x12, 0x1c, 0x66, 0xf5, 0xa7, 0x6a,
    0xed, 0xc7, 0x70, 0x6a, 0xa1, 0x1c, 0x82, 0xf8, 0xaa, 0x95, 0x2a, 0x8f, 0x2b, 0x78, 0x79, 0xa9,
]);

/// Fusion AMM program: `fUSioN9YKKSa3CUC2YUc4tPkHJ5Y6XW1yz8y6F7qWz9`
pub const FUSIONAMM_PROGRAM_ID: Pubkey = Pubkey([
    0x09, 0xdb, 0x19, 0xe5, 0xe1, 0xff, 0xb1, 0xeb, 0xa6, 0x0f, 0xcf, 0xfd, 0xaf, 0xaa, 0x31, 0x46,
    0x64, 0xa1, 0x2f, 0x6c, 0xac, 0x8a, 0xf1, 0x54, 0x85, 0xb5, 0xdd, 0xd9, 0x2b, 0x6f, 0x3a, 0xe6,
]);

/// The set of program ids a client talks to.
///
/// Passed explicitly to every derivation and builder so devnet or local
/// deployments only differ in the value constructed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgramIds {
    pub tuna: Pubkey,
    pub whirlpool: Pubkey,
    pub fusionamm: Pubkey,
}

impl Default for ProgramIds {
    fn default() -> Self {
        Self {
            tuna: TUNA_PROGRAM_ID,
            whirlpool: WHIRLPOOL_PROGRAM_ID,
            fusionamm: FUSIONAMM_PROGRAM_ID,
        }
    }
}

impl ProgramIds {
    /// The AMM program backing positions of `market_maker`.
    pub fn amm_program(&self, market_maker: MarketMaker) -> Pubkey {
        match market_maker {
            MarketMaker::Orca => self.whirlpool,
            MarketMaker::Fusion => self.fusionamm,
        }
    }

    /// Which market maker owns accounts of `program`, if any.
    pub fn market_maker_of(&self, program: &Pubkey) -> Option<MarketMaker> {
        if *program == self.whirlpool {
            Some(MarketMaker::Orca)
        } else if *program == self.fusionamm {
            Some(MarketMaker::Fusion)
        } else {
            None
        }
    }
}
