//! The AMM pool behind a market, and the remaining accounts the Tuna
//! program expects after the named ones.

use sol_core::{AccountMeta, Pubkey};
use tuna_client::accounts::{FusionPool, Whirlpool};
use tuna_client::pda;
use tuna_client::tick::{swap_tick_array_start_indexes, tick_array_start_index};
use tuna_client::types::{AccountsType, RemainingAccountsInfo, RemainingAccountsSlice};
use tuna_client::MarketMaker;

use crate::context::TunaContext;
use crate::error::TunaError;
use crate::fetch::decode_required;
use crate::rpc::Account;

/// The fields of a Whirlpool or Fusion pool the builders use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmmPool {
    pub address: Pubkey,
    pub market_maker: MarketMaker,
    pub token_mint_a: Pubkey,
    pub token_mint_b: Pubkey,
    pub token_vault_a: Pubkey,
    pub token_vault_b: Pubkey,
    pub tick_spacing: u16,
    pub tick_current_index: i32,
}

impl From<(Pubkey, &Whirlpool)> for AmmPool {
    fn from((address, pool): (Pubkey, &Whirlpool)) -> Self {
        Self {
            address,
            market_maker: MarketMaker::Orca,
            token_mint_a: pool.token_mint_a,
            token_mint_b: pool.token_mint_b,
            token_vault_a: pool.token_vault_a,
            token_vault_b: pool.token_vault_b,
            tick_spacing: pool.tick_spacing,
            tick_current_index: pool.tick_current_index,
        }
    }
}

impl From<(Pubkey, &FusionPool)> for AmmPool {
    fn from((address, pool): (Pubkey, &FusionPool)) -> Self {
        Self {
            address,
            market_maker: MarketMaker::Fusion,
            token_mint_a: pool.token_mint_a,
            token_mint_b: pool.token_mint_b,
            token_vault_a: pool.token_vault_a,
            token_vault_b: pool.token_vault_b,
            tick_spacing: pool.tick_spacing,
            tick_current_index: pool.tick_current_index,
        }
    }
}

impl AmmPool {
    /// Decode a pool account of the given market maker.
    pub fn decode(
        market_maker: MarketMaker,
        address: Pubkey,
        account: Option<&Account>,
    ) -> Result<Self, TunaError> {
        Ok(match market_maker {
            MarketMaker::Orca => {
                let pool = decode_required::<Whirlpool>("Whirlpool", address, account)?;
                Self::from((address, &pool.data))
            }
            MarketMaker::Fusion => {
                let pool = decode_required::<FusionPool>("Fusion pool", address, account)?;
                Self::from((address, &pool.data))
            }
        })
    }

    fn tick_array(&self, ctx: &TunaContext, start_index: i32) -> Result<Pubkey, TunaError> {
        ctx.tick_array_address(self.market_maker, &self.address, start_index)
    }

    fn tick_array_containing(&self, ctx: &TunaContext, tick: i32) -> Result<Pubkey, TunaError> {
        self.tick_array(ctx, tick_array_start_index(tick, self.tick_spacing)?)
    }

    /// Remaining accounts for instructions that may swap: the five tick
    /// arrays around the current price, the position's lower and upper tick
    /// arrays, both pool vaults and, for Orca, the pool oracle.
    pub fn swap_remaining_accounts(
        &self,
        ctx: &TunaContext,
        tick_lower_index: i32,
        tick_upper_index: i32,
    ) -> Result<RemainingAccounts, TunaError> {
        let mut out = RemainingAccounts::default();
        let swap_arrays = swap_tick_array_start_indexes(self.tick_current_index, self.tick_spacing)?
            .into_iter()
            .map(|start| self.tick_array(ctx, start))
            .collect::<Result<Vec<_>, _>>()?;
        out.push(AccountsType::SwapTickArrays, &swap_arrays);
        self.push_position_accounts(ctx, &mut out, tick_lower_index, tick_upper_index)?;
        if self.market_maker == MarketMaker::Orca {
            let (oracle, _) =
                pda::get_orca_oracle_address(&ctx.program_ids.whirlpool, &self.address)?;
            out.push(AccountsType::WhirlpoolOracle, &[oracle]);
        }
        Ok(out)
    }

    /// Remaining accounts for fee collection: lower and upper tick arrays and
    /// both pool vaults.
    pub fn collect_fees_remaining_accounts(
        &self,
        ctx: &TunaContext,
        tick_lower_index: i32,
        tick_upper_index: i32,
    ) -> Result<RemainingAccounts, TunaError> {
        let mut out = RemainingAccounts::default();
        self.push_position_accounts(ctx, &mut out, tick_lower_index, tick_upper_index)?;
        Ok(out)
    }

    fn push_position_accounts(
        &self,
        ctx: &TunaContext,
        out: &mut RemainingAccounts,
        tick_lower_index: i32,
        tick_upper_index: i32,
    ) -> Result<(), TunaError> {
        out.push(
            AccountsType::TickArrayLower,
            &[self.tick_array_containing(ctx, tick_lower_index)?],
        );
        out.push(
            AccountsType::TickArrayUpper,
            &[self.tick_array_containing(ctx, tick_upper_index)?],
        );
        out.push(AccountsType::PoolVaultTokenA, &[self.token_vault_a]);
        out.push(AccountsType::PoolVaultTokenB, &[self.token_vault_b]);
        Ok(())
    }
}

/// Accounts appended after the named ones, with the slice description the
/// program reads them by. Both are kept in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemainingAccounts {
    pub accounts: Vec<AccountMeta>,
    pub info: RemainingAccountsInfo,
}

impl RemainingAccounts {
    fn push(&mut self, accounts_type: AccountsType, keys: &[Pubkey]) {
        self.accounts
            .extend(keys.iter().map(|key| AccountMeta::new(*key, false)));
        self.info.slices.push(RemainingAccountsSlice {
            accounts_type,
            length: keys.len() as u8,
        });
    }
}
