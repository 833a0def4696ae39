//! Program administration: global config, vaults and markets.

use borsh::{BorshDeserialize, BorshSerialize};
use sol_core::Pubkey;

use crate::types::MarketMaker;

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CreateTunaConfigArgs {
    pub admin_authority: Pubkey,
    pub fee_recipient: Pubkey,
    pub liquidator_authority: Pubkey,
    pub max_swap_slippage: u32,
    pub max_percentage_of_leftovers: u32,
    pub oracle_price_deviation_threshold: u32,
}

tuna_instruction! {
    CreateTunaConfig: "create_tuna_config",
    [0x4f, 0x4e, 0xaf, 0x3e, 0xea, 0x44, 0xca, 0xf1],
    CreateTunaConfigArgs {
        /// Becomes the config's owner authority.
        authority: ws,
        tuna_config: w,
        system_program: r,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CreateVaultArgs {
    pub interest_rate: u64,
    pub supply_limit: u64,
    pub pyth_oracle_price_update: Pubkey,
    pub pyth_oracle_feed_id: Pubkey,
}

tuna_instruction! {
    CreateVault: "create_vault",
    [0x1d, 0xed, 0xf7, 0xd0, 0xc1, 0x52, 0x36, 0x87],
    CreateVaultArgs {
        authority: ws,
        tuna_config: r,
        mint: r,
        vault: w,
        vault_ata: w,
        token_program: r,
        associated_token_program: r,
        system_program: r,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct CreateMarketArgs {
    pub market_maker: MarketMaker,
    pub address_lookup_table: Pubkey,
    pub max_leverage: u32,
    pub protocol_fee: u16,
    pub protocol_fee_on_collateral: u16,
    pub liquidation_fee: u32,
    pub liquidation_threshold: u32,
    pub limit_order_execution_fee: u32,
    pub oracle_price_deviation_threshold: u32,
    pub disabled: bool,
    pub borrow_limit_a: u64,
    pub borrow_limit_b: u64,
    pub max_swap_slippage: u32,
    pub rebalance_protocol_fee: u32,
}

tuna_instruction! {
    CreateMarket: "create_market",
    [0x67, 0xe2, 0x61, 0xeb, 0xc8, 0xbc, 0xfb, 0xfe],
    CreateMarketArgs {
        authority: ws,
        tuna_config: r,
        market: w,
        pool: r,
        system_program: r,
    }
}
