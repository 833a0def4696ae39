//! Account fixtures for builder tests.

use sol_core::token::TOKEN_PROGRAM_ID;
use sol_core::Pubkey;
use tuna_client::accounts::whirlpool::WhirlpoolRewardInfo;
use tuna_client::accounts::{
    FusionPool, LendingPosition, Market, TunaConfig, TunaPosition, Vault, Whirlpool,
};
use tuna_client::{MarketMaker, TunaPositionState};

use crate::context::TunaContext;
use crate::rpc::MemoryRpc;

pub const TICK_SPACING: u16 = 64;

pub fn vault(mint: Pubkey) -> Vault {
    Vault {
        version: 1,
        bump: [255],
        mint,
        deposited_funds: 1_000_000,
        deposited_shares: 1_000_000,
        borrowed_funds: 0,
        borrowed_shares: 0,
        unpaid_debt_shares: 0,
        interest_rate: 0,
        last_update_timestamp: 0,
        supply_limit: u64::MAX,
        pyth_oracle_price_update: Pubkey([mint.0[0].wrapping_add(100); 32]),
        pyth_oracle_feed_id: Pubkey::default(),
        reserved: [0; 64],
    }
}

pub fn lending_position(authority: Pubkey, mint: Pubkey) -> LendingPosition {
    LendingPosition {
        version: 1,
        bump: [255],
        authority,
        pool_mint: mint,
        deposited_funds: 100,
        deposited_shares: 100,
        reserved: [0; 64],
    }
}

pub fn tuna_config(fee_recipient: Pubkey) -> TunaConfig {
    TunaConfig {
        version: 1,
        bump: [255],
        owner_authority: Pubkey([90; 32]),
        admin_authority: Pubkey([91; 32]),
        liquidator_authority: Pubkey([92; 32]),
        fee_recipient,
        max_swap_slippage: 0,
        max_percentage_of_leftovers: 0,
        oracle_price_deviation_threshold: 0,
        suspend_lending_deposits: false,
        suspend_lending_withdrawals: false,
        suspend_add_liquidity: false,
        suspend_remove_liquidity: false,
        reserved: [0; 64],
    }
}

pub fn market(pool: Pubkey, market_maker: MarketMaker) -> Market {
    Market {
        version: 1,
        bump: [255],
        market_maker,
        pool,
        address_lookup_table: Pubkey::default(),
        max_leverage: 5_000_000,
        protocol_fee: 0,
        protocol_fee_on_collateral: 0,
        liquidation_fee: 0,
        liquidation_threshold: 0,
        limit_order_execution_fee: 0,
        oracle_price_deviation_threshold: 0,
        disabled: false,
        borrowed_shares_a: 0,
        borrowed_shares_b: 0,
        borrow_limit_a: 0,
        borrow_limit_b: 0,
        max_swap_slippage: 0,
        rebalance_protocol_fee: 0,
        reserved: [0; 64],
    }
}

pub fn whirlpool(mint_a: Pubkey, mint_b: Pubkey) -> Whirlpool {
    Whirlpool {
        whirlpools_config: Pubkey([60; 32]),
        whirlpool_bump: [255],
        tick_spacing: TICK_SPACING,
        fee_tier_index_seed: [64, 0],
        fee_rate: 3000,
        protocol_fee_rate: 0,
        liquidity: 0,
        sqrt_price: 1 << 64,
        tick_current_index: 100,
        protocol_fee_owed_a: 0,
        protocol_fee_owed_b: 0,
        token_mint_a: mint_a,
        token_vault_a: Pubkey([61; 32]),
        fee_growth_global_a: 0,
        token_mint_b: mint_b,
        token_vault_b: Pubkey([62; 32]),
        fee_growth_global_b: 0,
        reward_last_updated_timestamp: 0,
        reward_infos: [WhirlpoolRewardInfo::default(); 3],
    }
}

pub fn fusion_pool(mint_a: Pubkey, mint_b: Pubkey) -> FusionPool {
    FusionPool {
        bump: [255],
        version: 1,
        token_mint_a: mint_a,
        token_mint_b: mint_b,
        token_vault_a: Pubkey([71; 32]),
        token_vault_b: Pubkey([72; 32]),
        tick_spacing: TICK_SPACING,
        tick_spacing_seed: [64, 0],
        fee_rate: 3000,
        protocol_fee_rate: 0,
        liquidity: 0,
        sqrt_price: 1 << 64,
        tick_current_index: -100,
        protocol_fee_owed_a: 0,
        protocol_fee_owed_b: 0,
        fee_growth_global_a: 0,
        fee_growth_global_b: 0,
        orders_total_amount_a: 0,
        orders_total_amount_b: 0,
        orders_filled_amount_a: 0,
        orders_filled_amount_b: 0,
        olp_fee_owed_a: 0,
        olp_fee_owed_b: 0,
        reserved: [0; 64],
    }
}

pub fn tuna_position(
    authority: Pubkey,
    pool: Pubkey,
    mint_a: Pubkey,
    mint_b: Pubkey,
    position_mint: Pubkey,
    market_maker: MarketMaker,
) -> TunaPosition {
    TunaPosition {
        version: 1,
        bump: [255],
        authority,
        pool,
        mint_a,
        mint_b,
        position_mint,
        liquidity: 1_000,
        tick_lower_index: -1_280,
        tick_upper_index: 1_280,
        loan_shares_a: 0,
        loan_shares_b: 0,
        loan_funds_a: 0,
        loan_funds_b: 0,
        leftovers_a: 0,
        leftovers_b: 0,
        tick_entry_index: 0,
        tick_stop_loss_index: i32::MIN,
        tick_take_profit_index: i32::MAX,
        state: TunaPositionState::Normal,
        swap_to_token_on_limit_order: 0,
        compounded_yield_a: 0,
        compounded_yield_b: 0,
        flags: 0,
        market_maker,
        reserved: [0; 64],
    }
}

/// A market with its pool, vaults and mints loaded into a [`MemoryRpc`].
pub struct MarketFixture {
    pub rpc: MemoryRpc,
    pub ctx: TunaContext,
    pub pool: Pubkey,
    pub mint_a: Pubkey,
    pub mint_b: Pubkey,
    pub fee_recipient: Pubkey,
}

impl MarketFixture {
    pub fn new(market_maker: MarketMaker, mint_a: Pubkey, mint_b: Pubkey) -> Self {
        let rpc = MemoryRpc::new();
        let ctx = TunaContext::mainnet().expect("context");
        let pool = Pubkey([40; 32]);
        let fee_recipient = Pubkey([41; 32]);
        let tuna = ctx.tuna_program();

        rpc.set_decoded(ctx.tuna_config, tuna, &tuna_config(fee_recipient))
            .expect("config");
        for mint in [mint_a, mint_b] {
            rpc.set_mint(mint, TOKEN_PROGRAM_ID, 6);
            rpc.set_decoded(ctx.vault_address(&mint).expect("vault"), tuna, &vault(mint))
                .expect("vault");
        }
        rpc.set_decoded(
            ctx.market_address(&pool).expect("market"),
            tuna,
            &market(pool, market_maker),
        )
        .expect("market");
        let amm = ctx.amm_program(market_maker);
        match market_maker {
            MarketMaker::Orca => rpc.set_decoded(pool, amm, &whirlpool(mint_a, mint_b)),
            MarketMaker::Fusion => rpc.set_decoded(pool, amm, &fusion_pool(mint_a, mint_b)),
        }
        .expect("pool");

        Self {
            rpc,
            ctx,
            pool,
            mint_a,
            mint_b,
            fee_recipient,
        }
    }

    /// Store an open position owned by `authority`; returns its address.
    pub fn add_position(&self, authority: Pubkey, position_mint: Pubkey) -> Pubkey {
        let market_maker = self
            .ctx
            .program_ids
            .market_maker_of(&self.rpc_pool_owner())
            .expect("pool owner");
        let address = self
            .ctx
            .tuna_position_address(&position_mint)
            .expect("position");
        self.rpc
            .set_decoded(
                address,
                self.ctx.tuna_program(),
                &tuna_position(
                    authority,
                    self.pool,
                    self.mint_a,
                    self.mint_b,
                    position_mint,
                    market_maker,
                ),
            )
            .expect("position");
        address
    }

    fn rpc_pool_owner(&self) -> Pubkey {
        self.rpc.account(&self.pool).expect("pool").owner
    }
}
