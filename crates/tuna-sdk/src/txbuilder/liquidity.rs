//! Leveraged liquidity positions.
//!
//! Every builder here resolves the position (or, for open, the pool) first
//! and then emits the Orca or Fusion variant of the instruction according to
//! the market maker it finds. The two variants share their arguments.

use sol_core::system::SYSTEM_PROGRAM_ID;
use sol_core::token::{ASSOCIATED_TOKEN_PROGRAM_ID, MEMO_PROGRAM_ID, TOKEN_2022_PROGRAM_ID};
use sol_core::{Instruction, Pubkey};
use tuna_client::instructions::{
    AddLiquidityArgs, AddLiquidityFusion, AddLiquidityOrca, CloseTunaLpPositionFusion,
    CloseTunaLpPositionOrca, CollectAndCompoundFeesArgs, CollectAndCompoundFeesFusion,
    CollectAndCompoundFeesOrca, CollectFeesArgs, CollectFeesFusion, CollectFeesOrca,
    LiquidateTunaLpPositionArgs, LiquidateTunaLpPositionFusion, LiquidateTunaLpPositionOrca,
    OpenTunaLpPositionArgs, OpenTunaLpPositionFusion, OpenTunaLpPositionOrca, RemoveLiquidityArgs,
    RemoveLiquidityFusion, RemoveLiquidityOrca, SetTunaLpPositionLimitOrders,
    SetTunaLpPositionLimitOrdersArgs, HUNDRED_PERCENT,
};
use tuna_client::tick::{MAX_TICK_INDEX, MIN_TICK_INDEX};
use tuna_client::{MarketMaker, TunaInstruction};

use crate::context::TunaContext;
use crate::error::TunaError;
use crate::rpc::RpcClient;
use crate::txbuilder::pool::RemainingAccounts;
use crate::txbuilder::position::{with_token_accounts, LpMarket, PositionAccounts};

/// Build the Orca or Fusion variant of an instruction from a
/// [`PositionAccounts`], filling in the three AMM-specific accounts.
macro_rules! amm_instruction {
    (
        $accounts:expr, $ctx:expr, $args:expr, $remaining:expr,
        $orca:ident | $fusion:ident { $($field:ident: $value:expr),* $(,)? }
    ) => {{
        let a: &PositionAccounts = $accounts;
        let program = $ctx.tuna_program();
        match a.market_maker() {
            MarketMaker::Orca => $orca {
                whirlpool_program: a.amm_program,
                whirlpool: a.lp.pool.address,
                orca_position: a.amm_position,
                $($field: $value,)*
            }
            .instruction_with_remaining_accounts(&program, $args, $remaining)?,
            MarketMaker::Fusion => $fusion {
                fusionamm_program: a.amm_program,
                fusion_pool: a.lp.pool.address,
                fusion_position: a.amm_position,
                $($field: $value,)*
            }
            .instruction_with_remaining_accounts(&program, $args, $remaining)?,
        }
    }};
}

fn check_percent(name: &str, value: u32) -> Result<(), TunaError> {
    if value > HUNDRED_PERCENT {
        return Err(TunaError::InvalidArgument(format!(
            "{name} {value} exceeds {HUNDRED_PERCENT}"
        )));
    }
    Ok(())
}

fn check_tick_range(lower: i32, upper: i32) -> Result<(), TunaError> {
    if lower >= upper || lower < MIN_TICK_INDEX || upper > MAX_TICK_INDEX {
        return Err(TunaError::InvalidArgument(format!(
            "invalid tick range [{lower}, {upper}]"
        )));
    }
    Ok(())
}

// ─── Single-instruction builders ───

fn open_instruction(
    ctx: &TunaContext,
    a: &PositionAccounts,
    args: &OpenTunaLpPositionArgs,
) -> Result<Instruction, TunaError> {
    Ok(amm_instruction!(a, ctx, args, &[],
        OpenTunaLpPositionOrca | OpenTunaLpPositionFusion {
            authority: a.authority,
            tuna_config: ctx.tuna_config,
            mint_a: a.lp.mint_a.address,
            mint_b: a.lp.mint_b.address,
            market: a.lp.market.address,
            tuna_position: a.tuna_position,
            tuna_position_mint: a.position_mint,
            tuna_position_ata: a.tuna_position_ata,
            token_program_a: a.lp.mint_a.token_program,
            token_program_b: a.lp.mint_b.token_program,
            token_2022_program: TOKEN_2022_PROGRAM_ID,
            system_program: SYSTEM_PROGRAM_ID,
            associated_token_program: ASSOCIATED_TOKEN_PROGRAM_ID,
        }
    ))
}

fn add_liquidity_instruction(
    ctx: &TunaContext,
    a: &PositionAccounts,
    args: &AddLiquidityArgs,
    remaining: &RemainingAccounts,
) -> Result<Instruction, TunaError> {
    Ok(amm_instruction!(a, ctx, args, &remaining.accounts,
        AddLiquidityOrca | AddLiquidityFusion {
            authority: a.authority,
            tuna_config: ctx.tuna_config,
            mint_a: a.lp.mint_a.address,
            mint_b: a.lp.mint_b.address,
            token_program_a: a.lp.mint_a.token_program,
            token_program_b: a.lp.mint_b.token_program,
            market: a.lp.market.address,
            vault_a: a.lp.vault_a.address,
            vault_b: a.lp.vault_b.address,
            vault_a_ata: a.vault_a_ata,
            vault_b_ata: a.vault_b_ata,
            tuna_position: a.tuna_position,
            tuna_position_ata: a.tuna_position_ata,
            tuna_position_ata_a: a.tuna_position_ata_a,
            tuna_position_ata_b: a.tuna_position_ata_b,
            tuna_position_owner_ata_a: a.tuna_position_owner_ata_a,
            tuna_position_owner_ata_b: a.tuna_position_owner_ata_b,
            fee_recipient_ata_a: a.fee_recipient_ata_a,
            fee_recipient_ata_b: a.fee_recipient_ata_b,
            pyth_oracle_price_feed_a: a.pyth_oracle_price_feed_a(),
            pyth_oracle_price_feed_b: a.pyth_oracle_price_feed_b(),
            memo_program: MEMO_PROGRAM_ID,
        }
    ))
}

fn remove_liquidity_instruction(
    ctx: &TunaContext,
    a: &PositionAccounts,
    args: &RemoveLiquidityArgs,
    remaining: &RemainingAccounts,
) -> Result<Instruction, TunaError> {
    Ok(amm_instruction!(a, ctx, args, &remaining.accounts,
        RemoveLiquidityOrca | RemoveLiquidityFusion {
            authority: a.authority,
            tuna_config: ctx.tuna_config,
            mint_a: a.lp.mint_a.address,
            mint_b: a.lp.mint_b.address,
            token_program_a: a.lp.mint_a.token_program,
            token_program_b: a.lp.mint_b.token_program,
            market: a.lp.market.address,
            vault_a: a.lp.vault_a.address,
            vault_b: a.lp.vault_b.address,
            vault_a_ata: a.vault_a_ata,
            vault_b_ata: a.vault_b_ata,
            tuna_position: a.tuna_position,
            tuna_position_ata: a.tuna_position_ata,
            tuna_position_ata_a: a.tuna_position_ata_a,
            tuna_position_ata_b: a.tuna_position_ata_b,
            tuna_position_owner_ata_a: a.tuna_position_owner_ata_a,
            tuna_position_owner_ata_b: a.tuna_position_owner_ata_b,
            pyth_oracle_price_feed_a: a.pyth_oracle_price_feed_a(),
            pyth_oracle_price_feed_b: a.pyth_oracle_price_feed_b(),
            memo_program: MEMO_PROGRAM_ID,
        }
    ))
}

fn close_instruction(ctx: &TunaContext, a: &PositionAccounts) -> Result<Instruction, TunaError> {
    Ok(amm_instruction!(a, ctx, &(), &[],
        CloseTunaLpPositionOrca | CloseTunaLpPositionFusion {
            authority: a.authority,
            tuna_config: ctx.tuna_config,
            mint_a: a.lp.mint_a.address,
            mint_b: a.lp.mint_b.address,
            market: a.lp.market.address,
            tuna_position: a.tuna_position,
            tuna_position_mint: a.position_mint,
            tuna_position_ata: a.tuna_position_ata,
            tuna_position_ata_a: a.tuna_position_ata_a,
            tuna_position_ata_b: a.tuna_position_ata_b,
            token_program_a: a.lp.mint_a.token_program,
            token_program_b: a.lp.mint_b.token_program,
            token_2022_program: TOKEN_2022_PROGRAM_ID,
        }
    ))
}

fn collect_fees_instruction(
    ctx: &TunaContext,
    a: &PositionAccounts,
    args: &CollectFeesArgs,
    remaining: &RemainingAccounts,
) -> Result<Instruction, TunaError> {
    Ok(amm_instruction!(a, ctx, args, &remaining.accounts,
        CollectFeesOrca | CollectFeesFusion {
            authority: a.authority,
            tuna_config: ctx.tuna_config,
            mint_a: a.lp.mint_a.address,
            mint_b: a.lp.mint_b.address,
            token_program_a: a.lp.mint_a.token_program,
            token_program_b: a.lp.mint_b.token_program,
            tuna_position: a.tuna_position,
            tuna_position_ata: a.tuna_position_ata,
            tuna_position_ata_a: a.tuna_position_ata_a,
            tuna_position_ata_b: a.tuna_position_ata_b,
            tuna_position_owner_ata_a: a.tuna_position_owner_ata_a,
            tuna_position_owner_ata_b: a.tuna_position_owner_ata_b,
            memo_program: MEMO_PROGRAM_ID,
        }
    ))
}

fn collect_and_compound_fees_instruction(
    ctx: &TunaContext,
    a: &PositionAccounts,
    args: &CollectAndCompoundFeesArgs,
    remaining: &RemainingAccounts,
) -> Result<Instruction, TunaError> {
    Ok(amm_instruction!(a, ctx, args, &remaining.accounts,
        CollectAndCompoundFeesOrca | CollectAndCompoundFeesFusion {
            authority: a.authority,
            tuna_config: ctx.tuna_config,
            mint_a: a.lp.mint_a.address,
            mint_b: a.lp.mint_b.address,
            token_program_a: a.lp.mint_a.token_program,
            token_program_b: a.lp.mint_b.token_program,
            market: a.lp.market.address,
            vault_a: a.lp.vault_a.address,
            vault_b: a.lp.vault_b.address,
            vault_a_ata: a.vault_a_ata,
            vault_b_ata: a.vault_b_ata,
            tuna_position: a.tuna_position,
            tuna_position_ata: a.tuna_position_ata,
            tuna_position_ata_a: a.tuna_position_ata_a,
            tuna_position_ata_b: a.tuna_position_ata_b,
            tuna_position_owner_ata_a: a.tuna_position_owner_ata_a,
            tuna_position_owner_ata_b: a.tuna_position_owner_ata_b,
            fee_recipient_ata_a: a.fee_recipient_ata_a,
            fee_recipient_ata_b: a.fee_recipient_ata_b,
            pyth_oracle_price_feed_a: a.pyth_oracle_price_feed_a(),
            pyth_oracle_price_feed_b: a.pyth_oracle_price_feed_b(),
            memo_program: MEMO_PROGRAM_ID,
        }
    ))
}

fn liquidate_instruction(
    ctx: &TunaContext,
    a: &PositionAccounts,
    liquidator: &Pubkey,
    args: &LiquidateTunaLpPositionArgs,
    remaining: &RemainingAccounts,
) -> Result<Instruction, TunaError> {
    Ok(amm_instruction!(a, ctx, args, &remaining.accounts,
        LiquidateTunaLpPositionOrca | LiquidateTunaLpPositionFusion {
            authority: *liquidator,
            tuna_config: ctx.tuna_config,
            mint_a: a.lp.mint_a.address,
            mint_b: a.lp.mint_b.address,
            token_program_a: a.lp.mint_a.token_program,
            token_program_b: a.lp.mint_b.token_program,
            market: a.lp.market.address,
            vault_a: a.lp.vault_a.address,
            vault_b: a.lp.vault_b.address,
            vault_a_ata: a.vault_a_ata,
            vault_b_ata: a.vault_b_ata,
            tuna_position: a.tuna_position,
            tuna_position_ata: a.tuna_position_ata,
            tuna_position_ata_a: a.tuna_position_ata_a,
            tuna_position_ata_b: a.tuna_position_ata_b,
            liquidation_fee_recipient_ata_a: a.fee_recipient_ata_a,
            liquidation_fee_recipient_ata_b: a.fee_recipient_ata_b,
            pyth_oracle_price_feed_a: a.pyth_oracle_price_feed_a(),
            pyth_oracle_price_feed_b: a.pyth_oracle_price_feed_b(),
            memo_program: MEMO_PROGRAM_ID,
        }
    ))
}

fn swap_remaining_accounts(
    ctx: &TunaContext,
    a: &PositionAccounts,
) -> Result<RemainingAccounts, TunaError> {
    let (lower, upper) = a.tick_range()?;
    a.lp.pool.swap_remaining_accounts(ctx, lower, upper)
}

// ─── Transaction builders ───

/// Open an empty position in `pool`. `position_mint` is a fresh keypair
/// that must sign the transaction.
pub async fn open_tuna_lp_position_instructions(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
    position_mint: &Pubkey,
    pool: &Pubkey,
    args: &OpenTunaLpPositionArgs,
) -> Result<Vec<Instruction>, TunaError> {
    check_tick_range(args.tick_lower_index, args.tick_upper_index)?;
    let lp = LpMarket::fetch_for_pool(rpc, ctx, pool).await?;
    tracing::debug!(%pool, market_maker = ?lp.market_maker(), "opening position");
    let accounts = PositionAccounts::new(ctx, lp, *authority, *position_mint, None)?;
    Ok(vec![open_instruction(ctx, &accounts, args)?])
}

/// Add collateral and borrowed liquidity. Collateral in wrapped SOL is
/// wrapped from the authority's lamports first.
pub async fn add_liquidity_instructions(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
    position_mint: &Pubkey,
    mut args: AddLiquidityArgs,
) -> Result<Vec<Instruction>, TunaError> {
    let accounts = PositionAccounts::fetch_owned(rpc, ctx, authority, position_mint).await?;
    let remaining = swap_remaining_accounts(ctx, &accounts)?;
    args.remaining_accounts_info = remaining.info.clone();
    let ix = add_liquidity_instruction(ctx, &accounts, &args, &remaining)?;

    let [owner_a, owner_b] = accounts.owner_ata_requests(args.collateral_a, args.collateral_b);
    let [position_a, position_b] = accounts.position_ata_requests();
    let [fee_a, fee_b] = accounts.fee_recipient_ata_requests();
    with_token_accounts(
        rpc,
        authority,
        &[owner_a, owner_b, position_a, position_b, fee_a, fee_b],
        vec![ix],
    )
    .await
}

async fn remove_liquidity_parts(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    accounts: &PositionAccounts,
    mut args: RemoveLiquidityArgs,
    close: bool,
) -> Result<Vec<Instruction>, TunaError> {
    let remaining = swap_remaining_accounts(ctx, accounts)?;
    args.remaining_accounts_info = remaining.info.clone();

    let mut main = vec![remove_liquidity_instruction(ctx, accounts, &args, &remaining)?];
    if close {
        main.push(close_instruction(ctx, accounts)?);
    }

    let [owner_a, owner_b] = accounts.owner_ata_requests(0, 0);
    let [position_a, position_b] = accounts.position_ata_requests();
    with_token_accounts(
        rpc,
        &accounts.authority,
        &[owner_a, owner_b, position_a, position_b],
        main,
    )
    .await
}

/// Remove `withdraw_percent` (out of 1_000_000) of the position's liquidity.
pub async fn remove_liquidity_instructions(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
    position_mint: &Pubkey,
    args: RemoveLiquidityArgs,
) -> Result<Vec<Instruction>, TunaError> {
    check_percent("withdraw_percent", args.withdraw_percent)?;
    let accounts = PositionAccounts::fetch_owned(rpc, ctx, authority, position_mint).await?;
    remove_liquidity_parts(rpc, ctx, &accounts, args, false).await
}

/// Close a position that holds no liquidity.
pub async fn close_tuna_lp_position_instructions(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
    position_mint: &Pubkey,
) -> Result<Vec<Instruction>, TunaError> {
    let accounts = PositionAccounts::fetch_owned(rpc, ctx, authority, position_mint).await?;
    Ok(vec![close_instruction(ctx, &accounts)?])
}

/// Remove all liquidity, then close the position, in one transaction.
/// `args.withdraw_percent` must be [`HUNDRED_PERCENT`]; the close fails
/// on-chain while any liquidity is left.
pub async fn close_position_with_liquidity_instructions(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
    position_mint: &Pubkey,
    args: RemoveLiquidityArgs,
) -> Result<Vec<Instruction>, TunaError> {
    if args.withdraw_percent != HUNDRED_PERCENT {
        return Err(TunaError::InvalidArgument(format!(
            "closing a position withdraws {HUNDRED_PERCENT}, got {}",
            args.withdraw_percent
        )));
    }
    let accounts = PositionAccounts::fetch_owned(rpc, ctx, authority, position_mint).await?;
    remove_liquidity_parts(rpc, ctx, &accounts, args, true).await
}

/// Collect accrued fees into the authority's wallet.
pub async fn collect_fees_instructions(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
    position_mint: &Pubkey,
) -> Result<Vec<Instruction>, TunaError> {
    let accounts = PositionAccounts::fetch_owned(rpc, ctx, authority, position_mint).await?;
    let (lower, upper) = accounts.tick_range()?;
    let remaining = accounts
        .lp
        .pool
        .collect_fees_remaining_accounts(ctx, lower, upper)?;
    let args = CollectFeesArgs {
        remaining_accounts_info: remaining.info.clone(),
    };
    let ix = collect_fees_instruction(ctx, &accounts, &args, &remaining)?;

    let [owner_a, owner_b] = accounts.owner_ata_requests(0, 0);
    let [position_a, position_b] = accounts.position_ata_requests();
    with_token_accounts(
        rpc,
        authority,
        &[owner_a, owner_b, position_a, position_b],
        vec![ix],
    )
    .await
}

/// Collect fees and add them back as liquidity, borrowing to keep the
/// position's leverage when `use_leverage` is set.
pub async fn collect_and_compound_fees_instructions(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
    position_mint: &Pubkey,
    use_leverage: bool,
) -> Result<Vec<Instruction>, TunaError> {
    let accounts = PositionAccounts::fetch_owned(rpc, ctx, authority, position_mint).await?;
    let remaining = swap_remaining_accounts(ctx, &accounts)?;
    let args = CollectAndCompoundFeesArgs {
        use_leverage,
        remaining_accounts_info: remaining.info.clone(),
    };
    let ix = collect_and_compound_fees_instruction(ctx, &accounts, &args, &remaining)?;

    let [position_a, position_b] = accounts.position_ata_requests();
    let [fee_a, fee_b] = accounts.fee_recipient_ata_requests();
    with_token_accounts(
        rpc,
        authority,
        &[position_a, position_b, fee_a, fee_b],
        vec![ix],
    )
    .await
}

/// Liquidate `withdraw_percent` of the position at `tuna_position`.
/// `liquidator` must be the configured liquidator authority and pays for
/// any token accounts that have to be created.
pub async fn liquidate_tuna_lp_position_instructions(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    liquidator: &Pubkey,
    tuna_position: &Pubkey,
    withdraw_percent: u32,
) -> Result<Vec<Instruction>, TunaError> {
    check_percent("withdraw_percent", withdraw_percent)?;
    let accounts = PositionAccounts::fetch(rpc, ctx, tuna_position).await?;
    let remaining = swap_remaining_accounts(ctx, &accounts)?;
    let args = LiquidateTunaLpPositionArgs {
        withdraw_percent,
        remaining_accounts_info: remaining.info.clone(),
    };
    let ix = liquidate_instruction(ctx, &accounts, liquidator, &args, &remaining)?;

    let [position_a, position_b] = accounts.position_ata_requests();
    let [fee_a, fee_b] = accounts.fee_recipient_ata_requests();
    with_token_accounts(
        rpc,
        liquidator,
        &[position_a, position_b, fee_a, fee_b],
        vec![ix],
    )
    .await
}

pub fn set_tuna_lp_position_limit_orders_instruction(
    ctx: &TunaContext,
    authority: &Pubkey,
    position_mint: &Pubkey,
    args: &SetTunaLpPositionLimitOrdersArgs,
) -> Result<Instruction, TunaError> {
    if args.swap_to_token_on_limit_order > 2 {
        return Err(TunaError::InvalidArgument(format!(
            "swap_to_token_on_limit_order must be 0, 1 or 2, got {}",
            args.swap_to_token_on_limit_order
        )));
    }
    let accounts = SetTunaLpPositionLimitOrders {
        authority: *authority,
        tuna_position: ctx.tuna_position_address(position_mint)?,
    };
    Ok(accounts.instruction(&ctx.tuna_program(), args)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::txbuilder::testing::MarketFixture;
    use sol_core::token::NATIVE_MINT;
    use tuna_client::pda;

    const ALICE: Pubkey = Pubkey([1; 32]);
    const LIQUIDATOR: Pubkey = Pubkey([92; 32]);
    const POSITION_MINT: Pubkey = Pubkey([50; 32]);

    fn fixture(market_maker: MarketMaker) -> (MarketFixture, Pubkey) {
        let f = MarketFixture::new(market_maker, Pubkey([5; 32]), Pubkey([6; 32]));
        let position = f.add_position(ALICE, POSITION_MINT);
        (f, position)
    }

    fn find<'a, T: TunaInstruction>(ixs: &'a [Instruction]) -> &'a Instruction {
        ixs.iter()
            .find(|ix| ix.data.starts_with(&T::DISCRIMINATOR))
            .unwrap_or_else(|| panic!("{} not found", T::NAME))
    }

    #[tokio::test]
    async fn open_dispatches_on_pool_market_maker() {
        for mm in [MarketMaker::Orca, MarketMaker::Fusion] {
            let f = MarketFixture::new(mm, Pubkey([5; 32]), Pubkey([6; 32]));
            let args = OpenTunaLpPositionArgs {
                tick_lower_index: -128,
                tick_upper_index: 128,
                ..Default::default()
            };
            let ixs = open_tuna_lp_position_instructions(
                &f.rpc, &f.ctx, &ALICE, &POSITION_MINT, &f.pool, &args,
            )
            .await
            .unwrap();
            assert_eq!(ixs.len(), 1);
            let expected = match mm {
                MarketMaker::Orca => OpenTunaLpPositionOrca::DISCRIMINATOR,
                MarketMaker::Fusion => OpenTunaLpPositionFusion::DISCRIMINATOR,
            };
            assert_eq!(&ixs[0].data[..8], &expected);
            assert_eq!(ixs[0].accounts[12].pubkey, f.ctx.amm_program(mm));
            assert!(ixs[0].accounts[6].is_signer);
        }
    }

    #[tokio::test]
    async fn open_rejects_inverted_range() {
        let f = MarketFixture::new(MarketMaker::Orca, Pubkey([5; 32]), Pubkey([6; 32]));
        let args = OpenTunaLpPositionArgs {
            tick_lower_index: 128,
            tick_upper_index: -128,
            ..Default::default()
        };
        let err = open_tuna_lp_position_instructions(
            &f.rpc, &f.ctx, &ALICE, &POSITION_MINT, &f.pool, &args,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TunaError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn add_liquidity_appends_remaining_accounts_in_order() {
        for (mm, extra) in [(MarketMaker::Orca, 10), (MarketMaker::Fusion, 9)] {
            let (f, _) = fixture(mm);
            let ixs = add_liquidity_instructions(
                &f.rpc,
                &f.ctx,
                &ALICE,
                &POSITION_MINT,
                AddLiquidityArgs {
                    collateral_a: 1_000,
                    ..Default::default()
                },
            )
            .await
            .unwrap();

            let ix = match mm {
                MarketMaker::Orca => find::<AddLiquidityOrca>(&ixs),
                MarketMaker::Fusion => find::<AddLiquidityFusion>(&ixs),
            };
            assert_eq!(ix.accounts.len(), 25 + extra);
            let args = AddLiquidityOrca::decode_args(&ix.data[..])
                .or_else(|_| AddLiquidityFusion::decode_args(&ix.data[..]))
                .unwrap();
            assert_eq!(args.remaining_accounts_info.account_count(), extra);
            let pool_vault_a = match mm {
                MarketMaker::Orca => Pubkey([61; 32]),
                MarketMaker::Fusion => Pubkey([71; 32]),
            };
            assert_eq!(ix.accounts[25 + 7].pubkey, pool_vault_a);
        }
    }

    #[tokio::test]
    async fn add_liquidity_creates_missing_token_accounts() {
        let (f, _) = fixture(MarketMaker::Orca);
        let ixs = add_liquidity_instructions(
            &f.rpc,
            &f.ctx,
            &ALICE,
            &POSITION_MINT,
            AddLiquidityArgs::default(),
        )
        .await
        .unwrap();
        // six idempotent creates, then the Tuna instruction
        assert_eq!(ixs.len(), 7);
        assert!(ixs[..6].iter().all(|ix| ix.data == vec![1]));
    }

    #[tokio::test]
    async fn native_collateral_is_wrapped_and_unwrapped() {
        let f = MarketFixture::new(MarketMaker::Orca, NATIVE_MINT, Pubkey([6; 32]));
        f.add_position(ALICE, POSITION_MINT);
        let ixs = add_liquidity_instructions(
            &f.rpc,
            &f.ctx,
            &ALICE,
            &POSITION_MINT,
            AddLiquidityArgs {
                collateral_a: 2_000_000,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        // owner A: create, transfer, sync; five more creates; add; close owner A
        assert_eq!(ixs.len(), 10);
        assert_eq!(ixs[1].program_id, SYSTEM_PROGRAM_ID);
        assert_eq!(ixs[2].data, vec![17]);
        assert_eq!(&ixs[8].data[..8], &AddLiquidityOrca::DISCRIMINATOR);
        assert_eq!(ixs[9].data, vec![9]);
    }

    #[tokio::test]
    async fn remove_rejects_percent_above_hundred() {
        let (f, _) = fixture(MarketMaker::Orca);
        let err = remove_liquidity_instructions(
            &f.rpc,
            &f.ctx,
            &ALICE,
            &POSITION_MINT,
            RemoveLiquidityArgs {
                withdraw_percent: HUNDRED_PERCENT + 1,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TunaError::InvalidArgument(_)));
        assert_eq!(f.rpc.multiple_account_calls(), 0);
    }

    #[tokio::test]
    async fn close_with_liquidity_removes_then_closes() {
        let (f, _) = fixture(MarketMaker::Fusion);
        let ixs = close_position_with_liquidity_instructions(
            &f.rpc,
            &f.ctx,
            &ALICE,
            &POSITION_MINT,
            RemoveLiquidityArgs {
                withdraw_percent: HUNDRED_PERCENT,
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let remove = ixs
            .iter()
            .position(|ix| ix.data.starts_with(&RemoveLiquidityFusion::DISCRIMINATOR))
            .unwrap();
        let close = ixs
            .iter()
            .position(|ix| ix.data.starts_with(&CloseTunaLpPositionFusion::DISCRIMINATOR))
            .unwrap();
        assert_eq!(close, remove + 1);
        let args = RemoveLiquidityFusion::decode_args(&ixs[remove].data).unwrap();
        assert_eq!(args.withdraw_percent, HUNDRED_PERCENT);
    }

    #[tokio::test]
    async fn close_with_partial_withdrawal_is_rejected() {
        let (f, _) = fixture(MarketMaker::Orca);
        let err = close_position_with_liquidity_instructions(
            &f.rpc,
            &f.ctx,
            &ALICE,
            &POSITION_MINT,
            RemoveLiquidityArgs {
                withdraw_percent: HUNDRED_PERCENT / 2,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, TunaError::InvalidArgument(_)));
        assert_eq!(f.rpc.multiple_account_calls(), 0);
    }

    #[tokio::test]
    async fn collect_fees_uses_four_remaining_accounts() {
        let (f, _) = fixture(MarketMaker::Orca);
        let ixs = collect_fees_instructions(&f.rpc, &f.ctx, &ALICE, &POSITION_MINT)
            .await
            .unwrap();
        let ix = find::<CollectFeesOrca>(&ixs);
        assert_eq!(ix.accounts.len(), 16 + 4);
        assert_eq!(ix.accounts[16 + 2].pubkey, Pubkey([61; 32]));
        assert_eq!(ix.accounts[16 + 3].pubkey, Pubkey([62; 32]));
    }

    #[tokio::test]
    async fn compound_carries_leverage_flag() {
        let (f, _) = fixture(MarketMaker::Orca);
        let ixs = collect_and_compound_fees_instructions(&f.rpc, &f.ctx, &ALICE, &POSITION_MINT, true)
            .await
            .unwrap();
        let ix = find::<CollectAndCompoundFeesOrca>(&ixs);
        let args = CollectAndCompoundFeesOrca::decode_args(&ix.data).unwrap();
        assert!(args.use_leverage);
        assert_eq!(args.remaining_accounts_info.account_count(), 10);
    }

    #[tokio::test]
    async fn liquidation_remaining_accounts_end_with_oracle() {
        let (f, position) = fixture(MarketMaker::Orca);
        let ixs = liquidate_tuna_lp_position_instructions(
            &f.rpc,
            &f.ctx,
            &LIQUIDATOR,
            &position,
            HUNDRED_PERCENT,
        )
        .await
        .unwrap();
        let ix = find::<LiquidateTunaLpPositionOrca>(&ixs);
        assert_eq!(ix.accounts[0].pubkey, LIQUIDATOR);
        assert_eq!(ix.accounts.len(), 23 + 10);
        let (oracle, _) =
            pda::get_orca_oracle_address(&f.ctx.program_ids.whirlpool, &f.pool).unwrap();
        assert_eq!(ix.accounts.last().unwrap().pubkey, oracle);
        // token accounts are paid for by the liquidator
        assert!(ixs
            .iter()
            .filter(|ix| ix.data == vec![1])
            .all(|ix| ix.accounts[0].pubkey == LIQUIDATOR));
    }

    #[tokio::test]
    async fn missing_position_is_reported() {
        let f = MarketFixture::new(MarketMaker::Orca, Pubkey([5; 32]), Pubkey([6; 32]));
        let err = collect_fees_instructions(&f.rpc, &f.ctx, &ALICE, &POSITION_MINT)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Tuna position account not found: "));
    }

    #[test]
    fn limit_orders_are_validated() {
        let ctx = TunaContext::mainnet().unwrap();
        let mut args = SetTunaLpPositionLimitOrdersArgs {
            tick_stop_loss_index: -500,
            tick_take_profit_index: 500,
            swap_to_token_on_limit_order: 1,
        };
        let ix =
            set_tuna_lp_position_limit_orders_instruction(&ctx, &ALICE, &POSITION_MINT, &args)
                .unwrap();
        assert_eq!(
            ix.accounts[1].pubkey,
            ctx.tuna_position_address(&POSITION_MINT).unwrap()
        );
        assert!(ix.accounts[0].is_signer && !ix.accounts[0].is_writable);

        args.swap_to_token_on_limit_order = 3;
        assert!(
            set_tuna_lp_position_limit_orders_instruction(&ctx, &ALICE, &POSITION_MINT, &args)
                .is_err()
        );
    }
}
