use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use sol_core::Pubkey;

use crate::codec::AccountData;

/// A Fusion AMM pool. Read only: owned by the Fusion AMM program.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionPool {
    pub bump: [u8; 1],
    pub version: u16,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub token_vault_a: Pubkey,
    pub token_vault_b: Pubkey,
    pub tick_spacing: u16,
    pub tick_spacing_seed: [u8; 2],
    pub fee_rate: u16,
    pub protocol_fee_rate: u16,
    pub liquidity: u128,
    pub sqrt_price: u128,
    pub tick_current_index: i32,
    pub protocol_fee_owed_a: u64,
    pub protocol_fee_owed_b: u64,
    pub fee_growth_global_a: u128,
    pub fee_growth_global_b: u128,
    pub orders_total_amount_a: u64,
    pub orders_total_amount_b: u64,
    pub orders_filled_amount_a: u64,
    pub orders_filled_amount_b: u64,
    pub olp_fee_owed_a: u64,
    pub olp_fee_owed_b: u64,
    #[serde(skip_serializing)]
    pub reserved: [u8; 64],
}

impl AccountData for FusionPool {
    const NAME: &'static str = "FusionPool";
    const DISCRIMINATOR: [u8; 8] = [0xfe, 0xcc, 0xcf, 0x62, 0x19, 0xb5, 0x1d, 0x43];
    const LEN: usize = 343;
}
