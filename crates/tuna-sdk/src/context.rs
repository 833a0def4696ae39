//! Program ids and derived singletons, built once at startup.

use sol_core::Pubkey;
use tuna_client::pda;
use tuna_client::{MarketMaker, ProgramIds};

use crate::error::TunaError;

/// Everything the builders need to know about the deployment they target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TunaContext {
    pub program_ids: ProgramIds,
    /// The `tuna_config` PDA of `program_ids.tuna`.
    pub tuna_config: Pubkey,
}

impl TunaContext {
    pub fn new(program_ids: ProgramIds) -> Result<Self, TunaError> {
        let (tuna_config, _) = pda::get_tuna_config_address(&program_ids.tuna)?;
        Ok(Self {
            program_ids,
            tuna_config,
        })
    }

    /// Mainnet program ids.
    pub fn mainnet() -> Result<Self, TunaError> {
        Self::new(ProgramIds::default())
    }

    pub fn tuna_program(&self) -> Pubkey {
        self.program_ids.tuna
    }

    pub fn amm_program(&self, market_maker: MarketMaker) -> Pubkey {
        self.program_ids.amm_program(market_maker)
    }

    pub fn vault_address(&self, mint: &Pubkey) -> Result<Pubkey, TunaError> {
        Ok(pda::get_vault_address(&self.program_ids.tuna, mint)?.0)
    }

    pub fn market_address(&self, pool: &Pubkey) -> Result<Pubkey, TunaError> {
        Ok(pda::get_market_address(&self.program_ids.tuna, pool)?.0)
    }

    pub fn lending_position_address(
        &self,
        authority: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Pubkey, TunaError> {
        Ok(pda::get_lending_position_address(&self.program_ids.tuna, authority, mint)?.0)
    }

    pub fn tuna_position_address(&self, position_mint: &Pubkey) -> Result<Pubkey, TunaError> {
        Ok(pda::get_tuna_position_address(&self.program_ids.tuna, position_mint)?.0)
    }

    /// The AMM-side position account backing a Tuna position.
    pub fn amm_position_address(
        &self,
        market_maker: MarketMaker,
        position_mint: &Pubkey,
    ) -> Result<Pubkey, TunaError> {
        let program = self.amm_program(market_maker);
        let (address, _) = match market_maker {
            MarketMaker::Orca => pda::get_orca_position_address(&program, position_mint)?,
            MarketMaker::Fusion => pda::get_fusion_position_address(&program, position_mint)?,
        };
        Ok(address)
    }

    pub fn tick_array_address(
        &self,
        market_maker: MarketMaker,
        pool: &Pubkey,
        start_tick_index: i32,
    ) -> Result<Pubkey, TunaError> {
        let program = self.amm_program(market_maker);
        let (address, _) = match market_maker {
            MarketMaker::Orca => pda::get_orca_tick_array_address(&program, pool, start_tick_index)?,
            MarketMaker::Fusion => {
                pda::get_fusion_tick_array_address(&program, pool, start_tick_index)?
            }
        };
        Ok(address)
    }
}
