use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use sol_core::Pubkey;

use crate::codec::AccountData;
use crate::types::{MarketMaker, PoolToken, TunaPositionState};

/// A leveraged liquidity position, at `["tuna_position", position_mint]`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TunaPosition {
    pub version: u16,
    pub bump: [u8; 1],
    pub authority: Pubkey,
    pub pool: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub position_mint: Pubkey,
    pub liquidity: u128,
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    pub loan_shares_a: u64,
    pub loan_shares_b: u64,
    pub loan_funds_a: u64,
    pub loan_funds_b: u64,
    pub leftovers_a: u64,
    pub leftovers_b: u64,
    pub tick_entry_index: i32,
    pub tick_stop_loss_index: i32,
    pub tick_take_profit_index: i32,
    pub state: TunaPositionState,
    /// 0 = none, 1 = token A, 2 = token B.
    pub swap_to_token_on_limit_order: u8,
    pub compounded_yield_a: u64,
    pub compounded_yield_b: u64,
    pub flags: u32,
    pub market_maker: MarketMaker,
    #[serde(skip_serializing)]
    pub reserved: [u8; 64],
}

impl AccountData for TunaPosition {
    const NAME: &'static str = "TunaPosition";
    const DISCRIMINATOR: [u8; 8] = [0x4c, 0xc5, 0xa1, 0x33, 0xe8, 0x0f, 0x89, 0xdc];
    const LEN: usize = 342;
}

pub const TUNA_POSITION_AUTHORITY_OFFSET: usize = 11;
pub const TUNA_POSITION_POOL_OFFSET: usize = 43;
pub const TUNA_POSITION_MINT_A_OFFSET: usize = 75;
pub const TUNA_POSITION_MINT_B_OFFSET: usize = 107;

impl TunaPosition {
    pub fn is_open(&self) -> bool {
        self.state == TunaPositionState::Normal
    }

    pub fn has_debt(&self) -> bool {
        self.loan_shares_a > 0 || self.loan_shares_b > 0
    }

    /// Token the position swaps into when a limit order fires, if any.
    pub fn swap_to_token(&self) -> Option<PoolToken> {
        match self.swap_to_token_on_limit_order {
            1 => Some(PoolToken::A),
            2 => Some(PoolToken::B),
            _ => None,
        }
    }
}
