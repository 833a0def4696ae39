use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use sol_core::Pubkey;

use crate::codec::AccountData;

/// A lending vault for one token mint, at the `["vault", mint]` PDA.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub version: u16,
    pub bump: [u8; 1],
    pub mint: Pubkey,
    pub deposited_funds: u64,
    pub deposited_shares: u64,
    pub borrowed_funds: u64,
    pub borrowed_shares: u64,
    pub unpaid_debt_shares: u64,
    /// Interest rate per second, Q64.64 fixed point truncated to u64.
    pub interest_rate: u64,
    pub last_update_timestamp: u64,
    pub supply_limit: u64,
    pub pyth_oracle_price_update: Pubkey,
    pub pyth_oracle_feed_id: Pubkey,
    #[serde(skip_serializing)]
    pub reserved: [u8; 64],
}

impl AccountData for Vault {
    const NAME: &'static str = "Vault";
    const DISCRIMINATOR: [u8; 8] = [0xd3, 0x08, 0xe8, 0x2b, 0x02, 0x98, 0x75, 0x77];
    const LEN: usize = 235;
}
