use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use sol_core::Pubkey;

use crate::codec::AccountData;
use crate::types::{MarketMaker, PoolToken};

/// A leveraged spot position, at `["tuna_spot_position", authority, pool]`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TunaSpotPosition {
    pub version: u16,
    pub bump: [u8; 1],
    pub authority: Pubkey,
    pub pool: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub position_token: PoolToken,
    pub collateral_token: PoolToken,
    pub market_maker: MarketMaker,
    pub flags: u32,
    pub amount: u64,
    pub loan_shares: u64,
    pub loan_funds: u64,
    pub entry_sqrt_price: u128,
    pub lower_limit_order_sqrt_price: u128,
    pub upper_limit_order_sqrt_price: u128,
    #[serde(skip_serializing)]
    pub reserved: [u8; 64],
}

impl AccountData for TunaSpotPosition {
    const NAME: &'static str = "TunaSpotPosition";
    const DISCRIMINATOR: [u8; 8] = [0x76, 0x38, 0x7c, 0x68, 0xb2, 0xcd, 0xae, 0x4d];
    const LEN: usize = 282;
}

pub const TUNA_SPOT_POSITION_AUTHORITY_OFFSET: usize = 11;
pub const TUNA_SPOT_POSITION_POOL_OFFSET: usize = 43;
