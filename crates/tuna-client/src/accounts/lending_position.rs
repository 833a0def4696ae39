use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use sol_core::Pubkey;

use crate::codec::AccountData;

/// A user's deposit into one vault, at `["lending_position", authority, mint]`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LendingPosition {
    pub version: u16,
    pub bump: [u8; 1],
    pub authority: Pubkey,
    pub pool_mint: Pubkey,
    pub deposited_funds: u64,
    pub deposited_shares: u64,
    #[serde(skip_serializing)]
    pub reserved: [u8; 64],
}

impl AccountData for LendingPosition {
    const NAME: &'static str = "LendingPosition";
    const DISCRIMINATOR: [u8; 8] = [0x2f, 0xff, 0xfc, 0x23, 0x14, 0xf5, 0x9d, 0xf3];
    const LEN: usize = 155;
}

pub const LENDING_POSITION_AUTHORITY_OFFSET: usize = 11;
pub const LENDING_POSITION_MINT_OFFSET: usize = 43;
