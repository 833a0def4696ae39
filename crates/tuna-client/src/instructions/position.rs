//! Arguments shared by the Orca and Fusion variants of the leveraged
//! liquidity instructions, plus limit-order updates.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::types::RemainingAccountsInfo;

/// Percentages are fixed point with six decimals: 1_000_000 = 100%.
pub const HUNDRED_PERCENT: u32 = 1_000_000;

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct OpenTunaLpPositionArgs {
    pub tick_lower_index: i32,
    pub tick_upper_index: i32,
    pub tick_stop_loss_index: i32,
    pub tick_take_profit_index: i32,
    pub flags: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct AddLiquidityArgs {
    pub collateral_a: u64,
    pub collateral_b: u64,
    pub borrow_a: u64,
    pub borrow_b: u64,
    pub min_added_amount_a: u64,
    pub min_added_amount_b: u64,
    pub max_swap_slippage: u32,
    pub remaining_accounts_info: RemainingAccountsInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct RemoveLiquidityArgs {
    /// Share of the position's liquidity to remove, out of [`HUNDRED_PERCENT`].
    pub withdraw_percent: u32,
    /// 0 = keep both tokens, 1 = swap everything to A, 2 = to B.
    pub swap_to_token: u8,
    pub min_removed_amount_a: u64,
    pub min_removed_amount_b: u64,
    pub max_swap_slippage: u32,
    pub remaining_accounts_info: RemainingAccountsInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CollectFeesArgs {
    pub remaining_accounts_info: RemainingAccountsInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CollectAndCompoundFeesArgs {
    /// Borrow from the vaults to keep the position's leverage when compounding.
    pub use_leverage: bool,
    pub remaining_accounts_info: RemainingAccountsInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct LiquidateTunaLpPositionArgs {
    pub withdraw_percent: u32,
    pub remaining_accounts_info: RemainingAccountsInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct SetTunaLpPositionLimitOrdersArgs {
    pub tick_stop_loss_index: i32,
    pub tick_take_profit_index: i32,
    pub swap_to_token_on_limit_order: u8,
}

tuna_instruction! {
    SetTunaLpPositionLimitOrders: "set_tuna_lp_position_limit_orders",
    [0xa6, 0x08, 0x5f, 0xc6, 0x1a, 0xb0, 0xe6, 0x49],
    SetTunaLpPositionLimitOrdersArgs {
        authority: s,
        tuna_position: w,
    }
}
