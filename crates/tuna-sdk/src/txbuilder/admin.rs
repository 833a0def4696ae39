//! Program administration: the global config, vaults and markets.

use sol_core::system::SYSTEM_PROGRAM_ID;
use sol_core::token::{get_associated_token_address, ASSOCIATED_TOKEN_PROGRAM_ID};
use sol_core::{Instruction, Pubkey};
use tuna_client::instructions::{
    CreateMarket, CreateMarketArgs, CreateTunaConfig, CreateTunaConfigArgs, CreateVault,
    CreateVaultArgs,
};
use tuna_client::TunaInstruction;

use crate::context::TunaContext;
use crate::error::TunaError;
use crate::rpc::RpcClient;
use crate::token::fetch_mint;

/// `authority` becomes the owner authority of the new config.
pub fn create_tuna_config_instruction(
    ctx: &TunaContext,
    authority: &Pubkey,
    args: &CreateTunaConfigArgs,
) -> Result<Instruction, TunaError> {
    let accounts = CreateTunaConfig {
        authority: *authority,
        tuna_config: ctx.tuna_config,
        system_program: SYSTEM_PROGRAM_ID,
    };
    Ok(accounts.instruction(&ctx.tuna_program(), args)?)
}

/// Create the lending vault for `mint`; the mint is fetched for its token program.
pub async fn create_vault_instructions(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
    mint: &Pubkey,
    args: &CreateVaultArgs,
) -> Result<Vec<Instruction>, TunaError> {
    let mint = fetch_mint(rpc, mint).await?;
    let vault = ctx.vault_address(&mint.address)?;
    let accounts = CreateVault {
        authority: *authority,
        tuna_config: ctx.tuna_config,
        mint: mint.address,
        vault,
        vault_ata: get_associated_token_address(&vault, &mint.address, &mint.token_program)?,
        token_program: mint.token_program,
        associated_token_program: ASSOCIATED_TOKEN_PROGRAM_ID,
        system_program: SYSTEM_PROGRAM_ID,
    };
    Ok(vec![accounts.instruction(&ctx.tuna_program(), args)?])
}

pub fn create_market_instruction(
    ctx: &TunaContext,
    authority: &Pubkey,
    pool: &Pubkey,
    args: &CreateMarketArgs,
) -> Result<Instruction, TunaError> {
    let accounts = CreateMarket {
        authority: *authority,
        tuna_config: ctx.tuna_config,
        market: ctx.market_address(pool)?,
        pool: *pool,
        system_program: SYSTEM_PROGRAM_ID,
    };
    Ok(accounts.instruction(&ctx.tuna_program(), args)?)
}
