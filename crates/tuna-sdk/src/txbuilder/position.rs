//! Everything a leveraged-position instruction references, resolved from
//! on-chain state with as few round trips as possible.

use sol_core::token::{get_associated_token_address, TOKEN_2022_PROGRAM_ID};
use sol_core::{Instruction, Pubkey};
use tuna_client::accounts::{Market, TunaConfig, TunaPosition, Vault};
use tuna_client::MarketMaker;

use crate::context::TunaContext;
use crate::error::TunaError;
use crate::fetch::{decode_required, fetch_tuna_position, DecodedAccount};
use crate::rpc::{Account, RpcClient};
use crate::token::{get_create_ata_instructions, split_ata_instructions, AtaRequest, MintInfo};
use crate::txbuilder::pool::AmmPool;

/// Market-level state shared by every position in one pool.
#[derive(Debug, Clone)]
pub struct LpMarket {
    pub tuna_config: DecodedAccount<TunaConfig>,
    pub market: DecodedAccount<Market>,
    pub pool: AmmPool,
    pub mint_a: MintInfo,
    pub mint_b: MintInfo,
    pub vault_a: DecodedAccount<Vault>,
    pub vault_b: DecodedAccount<Vault>,
}

struct TokenPair<'a> {
    mint_a: Option<&'a Account>,
    mint_b: Option<&'a Account>,
    vault_a: Option<&'a Account>,
    vault_b: Option<&'a Account>,
}

impl LpMarket {
    /// Fetch the market of an existing position: config, mints, vaults,
    /// market and pool in a single batch.
    pub async fn fetch_for_position(
        rpc: &dyn RpcClient,
        ctx: &TunaContext,
        position: &TunaPosition,
    ) -> Result<Self, TunaError> {
        let market = ctx.market_address(&position.pool)?;
        let vault_a = ctx.vault_address(&position.mint_a)?;
        let vault_b = ctx.vault_address(&position.mint_b)?;
        let accounts = rpc
            .get_multiple_accounts(&[
                ctx.tuna_config,
                position.mint_a,
                position.mint_b,
                vault_a,
                vault_b,
                market,
                position.pool,
            ])
            .await?;

        let pool = AmmPool::decode(position.market_maker, position.pool, accounts[6].as_ref())?;
        Self::decode(
            ctx,
            accounts[0].as_ref(),
            decode_required("Market", market, accounts[5].as_ref())?,
            pool,
            TokenPair {
                mint_a: accounts[1].as_ref(),
                mint_b: accounts[2].as_ref(),
                vault_a: accounts[3].as_ref(),
                vault_b: accounts[4].as_ref(),
            },
        )
    }

    /// Fetch the market of `pool` before any position exists. The pool
    /// decides the mints, so this takes two batches.
    pub async fn fetch_for_pool(
        rpc: &dyn RpcClient,
        ctx: &TunaContext,
        pool: &Pubkey,
    ) -> Result<Self, TunaError> {
        let market_address = ctx.market_address(pool)?;
        let accounts = rpc
            .get_multiple_accounts(&[ctx.tuna_config, market_address, *pool])
            .await?;
        let market: DecodedAccount<Market> =
            decode_required("Market", market_address, accounts[1].as_ref())?;
        let market_maker = market.data.market_maker;
        let amm = AmmPool::decode(market_maker, *pool, accounts[2].as_ref())?;
        if let Some(pool_account) = &accounts[2] {
            if ctx.program_ids.market_maker_of(&pool_account.owner) != Some(market_maker) {
                return Err(TunaError::InvalidArgument(format!(
                    "pool {pool} is owned by {}, not the {market_maker:?} program",
                    pool_account.owner
                )));
            }
        }

        let tokens = rpc
            .get_multiple_accounts(&[
                amm.token_mint_a,
                amm.token_mint_b,
                ctx.vault_address(&amm.token_mint_a)?,
                ctx.vault_address(&amm.token_mint_b)?,
            ])
            .await?;
        Self::decode(
            ctx,
            accounts[0].as_ref(),
            market,
            amm,
            TokenPair {
                mint_a: tokens[0].as_ref(),
                mint_b: tokens[1].as_ref(),
                vault_a: tokens[2].as_ref(),
                vault_b: tokens[3].as_ref(),
            },
        )
    }

    fn decode(
        ctx: &TunaContext,
        tuna_config: Option<&Account>,
        market: DecodedAccount<Market>,
        pool: AmmPool,
        tokens: TokenPair<'_>,
    ) -> Result<Self, TunaError> {
        Ok(Self {
            tuna_config: decode_required("Tuna config", ctx.tuna_config, tuna_config)?,
            market,
            mint_a: MintInfo::decode(pool.token_mint_a, tokens.mint_a)?,
            mint_b: MintInfo::decode(pool.token_mint_b, tokens.mint_b)?,
            vault_a: decode_required(
                "Vault",
                ctx.vault_address(&pool.token_mint_a)?,
                tokens.vault_a,
            )?,
            vault_b: decode_required(
                "Vault",
                ctx.vault_address(&pool.token_mint_b)?,
                tokens.vault_b,
            )?,
            pool,
        })
    }

    pub fn market_maker(&self) -> MarketMaker {
        self.pool.market_maker
    }
}

/// A Tuna position (existing or about to be opened) with every derived
/// address its instructions take.
#[derive(Debug, Clone)]
pub struct PositionAccounts {
    pub lp: LpMarket,
    pub authority: Pubkey,
    pub position_mint: Pubkey,
    pub tuna_position: Pubkey,
    /// `None` until the position is opened.
    pub position: Option<TunaPosition>,
    pub amm_program: Pubkey,
    pub amm_position: Pubkey,
    pub tuna_position_ata: Pubkey,
    pub tuna_position_ata_a: Pubkey,
    pub tuna_position_ata_b: Pubkey,
    pub tuna_position_owner_ata_a: Pubkey,
    pub tuna_position_owner_ata_b: Pubkey,
    pub fee_recipient_ata_a: Pubkey,
    pub fee_recipient_ata_b: Pubkey,
    pub vault_a_ata: Pubkey,
    pub vault_b_ata: Pubkey,
}

fn ata(owner: &Pubkey, mint: &MintInfo) -> Result<Pubkey, TunaError> {
    Ok(get_associated_token_address(owner, &mint.address, &mint.token_program)?)
}

impl PositionAccounts {
    pub fn new(
        ctx: &TunaContext,
        lp: LpMarket,
        authority: Pubkey,
        position_mint: Pubkey,
        position: Option<TunaPosition>,
    ) -> Result<Self, TunaError> {
        let market_maker = lp.market_maker();
        let tuna_position = ctx.tuna_position_address(&position_mint)?;
        let fee_recipient = lp.tuna_config.data.fee_recipient;
        Ok(Self {
            amm_program: ctx.amm_program(market_maker),
            amm_position: ctx.amm_position_address(market_maker, &position_mint)?,
            tuna_position_ata: get_associated_token_address(
                &tuna_position,
                &position_mint,
                &TOKEN_2022_PROGRAM_ID,
            )?,
            tuna_position_ata_a: ata(&tuna_position, &lp.mint_a)?,
            tuna_position_ata_b: ata(&tuna_position, &lp.mint_b)?,
            tuna_position_owner_ata_a: ata(&authority, &lp.mint_a)?,
            tuna_position_owner_ata_b: ata(&authority, &lp.mint_b)?,
            fee_recipient_ata_a: ata(&fee_recipient, &lp.mint_a)?,
            fee_recipient_ata_b: ata(&fee_recipient, &lp.mint_b)?,
            vault_a_ata: ata(&lp.vault_a.address, &lp.mint_a)?,
            vault_b_ata: ata(&lp.vault_b.address, &lp.mint_b)?,
            lp,
            authority,
            position_mint,
            tuna_position,
            position,
        })
    }

    /// Fetch an existing position and its market.
    pub async fn fetch(
        rpc: &dyn RpcClient,
        ctx: &TunaContext,
        tuna_position: &Pubkey,
    ) -> Result<Self, TunaError> {
        let position = fetch_tuna_position(rpc, tuna_position).await?.data;
        let lp = LpMarket::fetch_for_position(rpc, ctx, &position).await?;
        Self::new(ctx, lp, position.authority, position.position_mint, Some(position))
    }

    /// Fetch the position of `position_mint`, failing unless `authority` owns it.
    pub async fn fetch_owned(
        rpc: &dyn RpcClient,
        ctx: &TunaContext,
        authority: &Pubkey,
        position_mint: &Pubkey,
    ) -> Result<Self, TunaError> {
        let accounts = Self::fetch(rpc, ctx, &ctx.tuna_position_address(position_mint)?).await?;
        if accounts.authority != *authority {
            return Err(TunaError::InvalidArgument(format!(
                "position {} belongs to {}, not {authority}",
                accounts.tuna_position, accounts.authority
            )));
        }
        Ok(accounts)
    }

    pub fn market_maker(&self) -> MarketMaker {
        self.lp.market_maker()
    }

    pub fn pyth_oracle_price_feed_a(&self) -> Pubkey {
        self.lp.vault_a.data.pyth_oracle_price_update
    }

    pub fn pyth_oracle_price_feed_b(&self) -> Pubkey {
        self.lp.vault_b.data.pyth_oracle_price_update
    }

    /// Tick bounds of the stored position.
    pub fn tick_range(&self) -> Result<(i32, i32), TunaError> {
        self.position
            .as_ref()
            .map(|p| (p.tick_lower_index, p.tick_upper_index))
            .ok_or(TunaError::AccountNotFound("Tuna position", self.tuna_position))
    }

    /// ATA requests for the position's own token accounts, paid by `payer`.
    pub fn position_ata_requests(&self) -> [AtaRequest; 2] {
        [
            AtaRequest::new(self.tuna_position, self.lp.mint_a),
            AtaRequest::new(self.tuna_position, self.lp.mint_b),
        ]
    }

    /// ATA requests for the authority's wallet accounts, funded with
    /// `amount_a` / `amount_b` when a side is wrapped SOL.
    pub fn owner_ata_requests(&self, amount_a: u64, amount_b: u64) -> [AtaRequest; 2] {
        [
            AtaRequest::new(self.authority, self.lp.mint_a).with_amount(amount_a),
            AtaRequest::new(self.authority, self.lp.mint_b).with_amount(amount_b),
        ]
    }

    pub fn fee_recipient_ata_requests(&self) -> [AtaRequest; 2] {
        let fee_recipient = self.lp.tuna_config.data.fee_recipient;
        [
            AtaRequest::new(fee_recipient, self.lp.mint_a),
            AtaRequest::new(fee_recipient, self.lp.mint_b),
        ]
    }
}

/// Resolve `requests` and wrap `main` with their setup and cleanup.
pub(crate) async fn with_token_accounts(
    rpc: &dyn RpcClient,
    payer: &Pubkey,
    requests: &[AtaRequest],
    main: Vec<Instruction>,
) -> Result<Vec<Instruction>, TunaError> {
    let atas = get_create_ata_instructions(rpc, payer, requests).await?;
    let (mut instructions, cleanup) = split_ata_instructions(atas);
    instructions.extend(main);
    instructions.extend(cleanup);
    Ok(instructions)
}
