//! The `tuna` subcommands.
//!
//! Read-only commands print the decoded accounts; the others build the
//! instructions for the signing wallet, submit them and print the signature.

use anyhow::Context;
use clap::Subcommand;
use serde_json::{json, Value};
use sol_core::{AddressLookupTable, Instruction, Keypair, Pubkey};
use tuna_client::instructions::{
    AddLiquidityArgs, OpenTunaLpPositionArgs, RemoveLiquidityArgs,
    SetTunaLpPositionLimitOrdersArgs, HUNDRED_PERCENT,
};
use tuna_sdk::submit::fetch_lookup_tables;
use tuna_sdk::{fetch, txbuilder, RpcClient, SendOptions, TunaContext};

use crate::config::Config;

const NO_STOP_LOSS: i32 = i32::MIN;
const NO_TAKE_PROFIT: i32 = i32::MAX;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List lending positions of an authority (default: the wallet)
    FetchLendingPositions {
        #[arg(long)]
        authority: Option<Pubkey>,
    },
    /// List leveraged liquidity positions of an authority (default: the wallet)
    FetchTunaPositions {
        #[arg(long)]
        authority: Option<Pubkey>,
    },
    /// Show the lending vault of a mint
    FetchVault { mint: Pubkey },
    /// Show the market of a pool
    FetchMarket { pool: Pubkey },
    /// Deposit into a lending vault, opening the lending position if needed
    Deposit { mint: Pubkey, amount: u64 },
    /// Withdraw from a lending position by token amount or by shares
    Withdraw {
        mint: Pubkey,
        #[arg(long, default_value_t = 0)]
        funds: u64,
        #[arg(long, default_value_t = 0)]
        shares: u64,
    },
    /// Open an empty leveraged liquidity position in a pool
    OpenPosition {
        pool: Pubkey,
        #[arg(allow_negative_numbers = true)]
        tick_lower_index: i32,
        #[arg(allow_negative_numbers = true)]
        tick_upper_index: i32,
        #[arg(long, allow_negative_numbers = true, default_value_t = NO_STOP_LOSS)]
        stop_loss: i32,
        #[arg(long, allow_negative_numbers = true, default_value_t = NO_TAKE_PROFIT)]
        take_profit: i32,
        #[arg(long, default_value_t = 0)]
        flags: u32,
    },
    /// Add collateral and borrowed liquidity to a position
    AddLiquidity {
        position_mint: Pubkey,
        #[arg(long, default_value_t = 0)]
        collateral_a: u64,
        #[arg(long, default_value_t = 0)]
        collateral_b: u64,
        #[arg(long, default_value_t = 0)]
        borrow_a: u64,
        #[arg(long, default_value_t = 0)]
        borrow_b: u64,
        #[arg(long, default_value_t = 0)]
        min_added_a: u64,
        #[arg(long, default_value_t = 0)]
        min_added_b: u64,
        /// Out of 1_000_000
        #[arg(long, default_value_t = 0)]
        max_swap_slippage: u32,
    },
    /// Remove a share of a position's liquidity
    RemoveLiquidity {
        position_mint: Pubkey,
        /// Out of 1_000_000
        #[arg(long, default_value_t = HUNDRED_PERCENT)]
        withdraw_percent: u32,
        /// 0 = keep both tokens, 1 = swap to A, 2 = swap to B
        #[arg(long, default_value_t = 0)]
        swap_to_token: u8,
        #[arg(long, default_value_t = 0)]
        max_swap_slippage: u32,
    },
    /// Close a position; with --withdraw, remove all liquidity first
    ClosePosition {
        position_mint: Pubkey,
        #[arg(long)]
        withdraw: bool,
        #[arg(long, default_value_t = 0)]
        swap_to_token: u8,
        #[arg(long, default_value_t = 0)]
        max_swap_slippage: u32,
    },
    /// Collect accrued fees into the wallet
    CollectFees { position_mint: Pubkey },
    /// Collect fees and add them back to the position
    CollectAndCompound {
        position_mint: Pubkey,
        #[arg(long)]
        use_leverage: bool,
    },
    /// Set stop-loss and take-profit ticks
    SetLimitOrders {
        position_mint: Pubkey,
        #[arg(long, allow_negative_numbers = true, default_value_t = NO_STOP_LOSS)]
        stop_loss: i32,
        #[arg(long, allow_negative_numbers = true, default_value_t = NO_TAKE_PROFIT)]
        take_profit: i32,
        #[arg(long, default_value_t = 0)]
        swap_to_token: u8,
    },
    /// Liquidate a position (wallet must be the liquidator authority)
    Liquidate {
        tuna_position: Pubkey,
        #[arg(long, default_value_t = HUNDRED_PERCENT)]
        withdraw_percent: u32,
    },
}

/// Wallet, RPC and deployment shared by every command.
struct Session<R> {
    rpc: R,
    ctx: TunaContext,
    config: Config,
}

impl<R: RpcClient> Session<R> {
    fn wallet(&self) -> anyhow::Result<Keypair> {
        self.config.wallet()
    }

    /// Lookup tables of the market trading `pool`, if it has one.
    async fn market_lookup_tables(&self, pool: &Pubkey) -> anyhow::Result<Vec<AddressLookupTable>> {
        let market = fetch::fetch_market(&self.rpc, &self.ctx.market_address(pool)?).await?;
        let tables: Vec<Pubkey> = market.data.lookup_table().into_iter().collect();
        Ok(fetch_lookup_tables(&self.rpc, &tables).await?)
    }

    async fn position_lookup_tables(
        &self,
        tuna_position: &Pubkey,
    ) -> anyhow::Result<Vec<AddressLookupTable>> {
        let position = fetch::fetch_tuna_position(&self.rpc, tuna_position).await?;
        self.market_lookup_tables(&position.data.pool).await
    }

    async fn send(
        &self,
        instructions: &[Instruction],
        signers: &[&Keypair],
        lookup_tables: Vec<AddressLookupTable>,
    ) -> anyhow::Result<Value> {
        let options = SendOptions {
            priority_fee: self.config.priority_fee(),
            lookup_tables,
            ..Default::default()
        };
        let signature = tuna_sdk::send_instructions(&self.rpc, instructions, signers, &options)
            .await
            .context("submitting transaction")?;
        Ok(json!({ "signature": signature }))
    }
}

impl Commands {
    pub async fn run(self, config: &Config) -> anyhow::Result<Value> {
        let session = Session {
            rpc: config.rpc(),
            ctx: config.context()?,
            config: config.clone(),
        };
        self.execute(&session).await
    }

    async fn execute<R: RpcClient>(self, s: &Session<R>) -> anyhow::Result<Value> {
        let (rpc, ctx) = (&s.rpc, &s.ctx);
        match self {
            Commands::FetchLendingPositions { authority } => {
                let authority = match authority {
                    Some(a) => a,
                    None => s.wallet()?.pubkey(),
                };
                let positions =
                    fetch::fetch_all_lending_positions_by_authority(rpc, ctx, &authority).await?;
                Ok(serde_json::to_value(positions)?)
            }
            Commands::FetchTunaPositions { authority } => {
                let authority = match authority {
                    Some(a) => a,
                    None => s.wallet()?.pubkey(),
                };
                let positions =
                    fetch::fetch_all_tuna_lp_positions_by_authority(rpc, ctx, &authority).await?;
                Ok(serde_json::to_value(positions)?)
            }
            Commands::FetchVault { mint } => {
                let vault = fetch::fetch_vault(rpc, &ctx.vault_address(&mint)?).await?;
                Ok(serde_json::to_value(vault)?)
            }
            Commands::FetchMarket { pool } => {
                let market = fetch::fetch_market(rpc, &ctx.market_address(&pool)?).await?;
                Ok(serde_json::to_value(market)?)
            }
            Commands::Deposit { mint, amount } => {
                let wallet = s.wallet()?;
                let ixs = txbuilder::open_lending_position_and_deposit_instructions(
                    rpc,
                    ctx,
                    &wallet.pubkey(),
                    &mint,
                    amount,
                )
                .await?;
                s.send(&ixs, &[&wallet], Vec::new()).await
            }
            Commands::Withdraw {
                mint,
                funds,
                shares,
            } => {
                let wallet = s.wallet()?;
                let ixs = txbuilder::withdraw_instructions(
                    rpc,
                    ctx,
                    &wallet.pubkey(),
                    &mint,
                    funds,
                    shares,
                )
                .await?;
                s.send(&ixs, &[&wallet], Vec::new()).await
            }
            Commands::OpenPosition {
                pool,
                tick_lower_index,
                tick_upper_index,
                stop_loss,
                take_profit,
                flags,
            } => {
                let wallet = s.wallet()?;
                let position_mint = Keypair::generate();
                let args = OpenTunaLpPositionArgs {
                    tick_lower_index,
                    tick_upper_index,
                    tick_stop_loss_index: stop_loss,
                    tick_take_profit_index: take_profit,
                    flags,
                };
                let ixs = txbuilder::open_tuna_lp_position_instructions(
                    rpc,
                    ctx,
                    &wallet.pubkey(),
                    &position_mint.pubkey(),
                    &pool,
                    &args,
                )
                .await?;
                let tables = s.market_lookup_tables(&pool).await?;
                let mut output = s.send(&ixs, &[&wallet, &position_mint], tables).await?;
                output["position_mint"] = json!(position_mint.pubkey());
                Ok(output)
            }
            Commands::AddLiquidity {
                position_mint,
                collateral_a,
                collateral_b,
                borrow_a,
                borrow_b,
                min_added_a,
                min_added_b,
                max_swap_slippage,
            } => {
                let wallet = s.wallet()?;
                let args = AddLiquidityArgs {
                    collateral_a,
                    collateral_b,
                    borrow_a,
                    borrow_b,
                    min_added_amount_a: min_added_a,
                    min_added_amount_b: min_added_b,
                    max_swap_slippage,
                    ..Default::default()
                };
                let ixs = txbuilder::add_liquidity_instructions(
                    rpc,
                    ctx,
                    &wallet.pubkey(),
                    &position_mint,
                    args,
                )
                .await?;
                let tables = s
                    .position_lookup_tables(&ctx.tuna_position_address(&position_mint)?)
                    .await?;
                s.send(&ixs, &[&wallet], tables).await
            }
            Commands::RemoveLiquidity {
                position_mint,
                withdraw_percent,
                swap_to_token,
                max_swap_slippage,
            } => {
                let wallet = s.wallet()?;
                let args = RemoveLiquidityArgs {
                    withdraw_percent,
                    swap_to_token,
                    max_swap_slippage,
                    ..Default::default()
                };
                let ixs = txbuilder::remove_liquidity_instructions(
                    rpc,
                    ctx,
                    &wallet.pubkey(),
                    &position_mint,
                    args,
                )
                .await?;
                let tables = s
                    .position_lookup_tables(&ctx.tuna_position_address(&position_mint)?)
                    .await?;
                s.send(&ixs, &[&wallet], tables).await
            }
            Commands::ClosePosition {
                position_mint,
                withdraw,
                swap_to_token,
                max_swap_slippage,
            } => {
                let wallet = s.wallet()?;
                let tuna_position = ctx.tuna_position_address(&position_mint)?;
                let tables = s.position_lookup_tables(&tuna_position).await?;
                let ixs = if withdraw {
                    let args = RemoveLiquidityArgs {
                        withdraw_percent: HUNDRED_PERCENT,
                        swap_to_token,
                        max_swap_slippage,
                        ..Default::default()
                    };
                    txbuilder::close_position_with_liquidity_instructions(
                        rpc,
                        ctx,
                        &wallet.pubkey(),
                        &position_mint,
                        args,
                    )
                    .await?
                } else {
                    txbuilder::close_tuna_lp_position_instructions(
                        rpc,
                        ctx,
                        &wallet.pubkey(),
                        &position_mint,
                    )
                    .await?
                };
                s.send(&ixs, &[&wallet], tables).await
            }
            Commands::CollectFees { position_mint } => {
                let wallet = s.wallet()?;
                let ixs =
                    txbuilder::collect_fees_instructions(rpc, ctx, &wallet.pubkey(), &position_mint)
                        .await?;
                let tables = s
                    .position_lookup_tables(&ctx.tuna_position_address(&position_mint)?)
                    .await?;
                s.send(&ixs, &[&wallet], tables).await
            }
            Commands::CollectAndCompound {
                position_mint,
                use_leverage,
            } => {
                let wallet = s.wallet()?;
                let ixs = txbuilder::collect_and_compound_fees_instructions(
                    rpc,
                    ctx,
                    &wallet.pubkey(),
                    &position_mint,
                    use_leverage,
                )
                .await?;
                let tables = s
                    .position_lookup_tables(&ctx.tuna_position_address(&position_mint)?)
                    .await?;
                s.send(&ixs, &[&wallet], tables).await
            }
            Commands::SetLimitOrders {
                position_mint,
                stop_loss,
                take_profit,
                swap_to_token,
            } => {
                let wallet = s.wallet()?;
                let args = SetTunaLpPositionLimitOrdersArgs {
                    tick_stop_loss_index: stop_loss,
                    tick_take_profit_index: take_profit,
                    swap_to_token_on_limit_order: swap_to_token,
                };
                let ix = txbuilder::set_tuna_lp_position_limit_orders_instruction(
                    ctx,
                    &wallet.pubkey(),
                    &position_mint,
                    &args,
                )?;
                s.send(&[ix], &[&wallet], Vec::new()).await
            }
            Commands::Liquidate {
                tuna_position,
                withdraw_percent,
            } => {
                let wallet = s.wallet()?;
                let ixs = txbuilder::liquidate_tuna_lp_position_instructions(
                    rpc,
                    ctx,
                    &wallet.pubkey(),
                    &tuna_position,
                    withdraw_percent,
                )
                .await?;
                let tables = s.position_lookup_tables(&tuna_position).await?;
                s.send(&ixs, &[&wallet], tables).await
            }
        }
    }
}
