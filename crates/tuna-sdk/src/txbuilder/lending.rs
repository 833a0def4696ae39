//! Lending positions: open, deposit, withdraw.

use sol_core::system::SYSTEM_PROGRAM_ID;
use sol_core::token::{get_associated_token_address, MEMO_PROGRAM_ID};
use sol_core::{Instruction, Pubkey};
use tuna_client::accounts::{LendingPosition, Vault};
use tuna_client::instructions::{Deposit, DepositArgs, OpenLendingPosition, Withdraw, WithdrawArgs};
use tuna_client::TunaInstruction;

use crate::context::TunaContext;
use crate::error::TunaError;
use crate::fetch::{decode_maybe, decode_required, DecodedAccount};
use crate::rpc::RpcClient;
use crate::token::{get_create_ata_instructions, split_ata_instructions, AtaRequest, MintInfo};

/// What every lending instruction needs, fetched in one round trip.
struct LendingAccounts {
    mint: MintInfo,
    vault: DecodedAccount<Vault>,
    lending_position_address: Pubkey,
    lending_position: Option<DecodedAccount<LendingPosition>>,
}

impl LendingAccounts {
    async fn fetch(
        rpc: &dyn RpcClient,
        ctx: &TunaContext,
        authority: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Self, TunaError> {
        let vault_address = ctx.vault_address(mint)?;
        let lending_position_address = ctx.lending_position_address(authority, mint)?;
        let accounts = rpc
            .get_multiple_accounts(&[*mint, vault_address, lending_position_address])
            .await?;

        let lending_position = decode_maybe(lending_position_address, accounts[2].as_ref())?;
        tracing::debug!(
            address = %lending_position_address,
            exists = lending_position.is_some(),
            "lending position"
        );
        Ok(Self {
            mint: MintInfo::decode(*mint, accounts[0].as_ref())?,
            vault: decode_required("Vault", vault_address, accounts[1].as_ref())?,
            lending_position_address,
            lending_position,
        })
    }

    fn vault_ata(&self) -> Result<Pubkey, TunaError> {
        Ok(get_associated_token_address(
            &self.vault.address,
            &self.mint.address,
            &self.mint.token_program,
        )?)
    }
}

pub fn open_lending_position_instruction(
    ctx: &TunaContext,
    authority: &Pubkey,
    mint: &Pubkey,
) -> Result<Instruction, TunaError> {
    let accounts = OpenLendingPosition {
        authority: *authority,
        tuna_config: ctx.tuna_config,
        vault: ctx.vault_address(mint)?,
        lending_position: ctx.lending_position_address(authority, mint)?,
        pool_mint: *mint,
        system_program: SYSTEM_PROGRAM_ID,
    };
    Ok(accounts.instruction(&ctx.tuna_program(), &())?)
}

async fn deposit_into(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
    accounts: &LendingAccounts,
    amount: u64,
) -> Result<Vec<Instruction>, TunaError> {
    let request = AtaRequest::new(*authority, accounts.mint).with_amount(amount);
    let atas = get_create_ata_instructions(rpc, authority, &[request]).await?;
    let authority_ata = atas[0].address;
    let (mut instructions, cleanup) = split_ata_instructions(atas);

    let deposit = Deposit {
        authority: *authority,
        tuna_config: ctx.tuna_config,
        mint: accounts.mint.address,
        vault: accounts.vault.address,
        vault_ata: accounts.vault_ata()?,
        lending_position: accounts.lending_position_address,
        authority_ata,
        token_program: accounts.mint.token_program,
        memo_program: MEMO_PROGRAM_ID,
    };
    instructions.push(deposit.instruction(&ctx.tuna_program(), &DepositArgs { amount })?);
    instructions.extend(cleanup);
    Ok(instructions)
}

/// Deposit `amount` into the vault of `mint`. The lending position must exist.
pub async fn deposit_instructions(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
    mint: &Pubkey,
    amount: u64,
) -> Result<Vec<Instruction>, TunaError> {
    if amount == 0 {
        return Err(TunaError::InvalidArgument("deposit amount must be positive".into()));
    }
    let accounts = LendingAccounts::fetch(rpc, ctx, authority, mint).await?;
    deposit_into(rpc, ctx, authority, &accounts, amount).await
}

/// Deposit, opening the lending position first when it does not exist yet.
pub async fn open_lending_position_and_deposit_instructions(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
    mint: &Pubkey,
    amount: u64,
) -> Result<Vec<Instruction>, TunaError> {
    if amount == 0 {
        return Err(TunaError::InvalidArgument("deposit amount must be positive".into()));
    }
    let accounts = LendingAccounts::fetch(rpc, ctx, authority, mint).await?;

    let mut instructions = Vec::new();
    if accounts.lending_position.is_none() {
        instructions.push(open_lending_position_instruction(ctx, authority, mint)?);
    }
    instructions.extend(deposit_into(rpc, ctx, authority, &accounts, amount).await?);
    Ok(instructions)
}

/// Withdraw either `funds` (token amount) or `shares` from a lending position.
pub async fn withdraw_instructions(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
    mint: &Pubkey,
    funds: u64,
    shares: u64,
) -> Result<Vec<Instruction>, TunaError> {
    if (funds == 0) == (shares == 0) {
        return Err(TunaError::InvalidArgument(
            "exactly one of funds and shares must be set".into(),
        ));
    }
    let accounts = LendingAccounts::fetch(rpc, ctx, authority, mint).await?;
    if accounts.lending_position.is_none() {
        return Err(TunaError::AccountNotFound(
            "Lending position",
            accounts.lending_position_address,
        ));
    }

    let atas =
        get_create_ata_instructions(rpc, authority, &[AtaRequest::new(*authority, accounts.mint)])
            .await?;
    let authority_ata = atas[0].address;
    let (mut instructions, cleanup) = split_ata_instructions(atas);

    let withdraw = Withdraw {
        authority: *authority,
        tuna_config: ctx.tuna_config,
        mint: accounts.mint.address,
        vault: accounts.vault.address,
        vault_ata: accounts.vault_ata()?,
        lending_position: accounts.lending_position_address,
        authority_ata,
        token_program: accounts.mint.token_program,
        memo_program: MEMO_PROGRAM_ID,
    };
    instructions.push(withdraw.instruction(&ctx.tuna_program(), &WithdrawArgs { funds, shares })?);
    instructions.extend(cleanup);
    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::MemoryRpc;
    use crate::txbuilder::testing::{lending_position, vault};
    use sol_core::token::{NATIVE_MINT, TOKEN_PROGRAM_ID};

    const ALICE: Pubkey = Pubkey([1; 32]);
    const USDC: Pubkey = Pubkey([5; 32]);

    fn setup(mint: Pubkey) -> (MemoryRpc, TunaContext) {
        let rpc = MemoryRpc::new();
        let ctx = TunaContext::mainnet().unwrap();
        rpc.set_mint(mint, TOKEN_PROGRAM_ID, 6);
        rpc.set_decoded(ctx.vault_address(&mint).unwrap(), ctx.tuna_program(), &vault(mint))
            .unwrap();
        (rpc, ctx)
    }

    #[test]
    fn open_instruction_layout() {
        let ctx = TunaContext::mainnet().unwrap();
        let ix = open_lending_position_instruction(&ctx, &ALICE, &USDC).unwrap();
        assert_eq!(ix.program_id, ctx.tuna_program());
        assert_eq!(ix.accounts.len(), 6);
        assert_eq!(
            ix.accounts[3].pubkey,
            ctx.lending_position_address(&ALICE, &USDC).unwrap()
        );
        assert_eq!(ix.data, OpenLendingPosition::DISCRIMINATOR.to_vec());
    }

    #[tokio::test]
    async fn deposit_prepends_open_when_position_missing() {
        let (rpc, ctx) = setup(USDC);
        let ixs = open_lending_position_and_deposit_instructions(&rpc, &ctx, &ALICE, &USDC, 100)
            .await
            .unwrap();
        // open, create ATA, deposit
        assert_eq!(ixs.len(), 3);
        assert_eq!(&ixs[0].data[..8], &OpenLendingPosition::DISCRIMINATOR);
        assert_eq!(&ixs[2].data[..8], &Deposit::DISCRIMINATOR);
        assert_eq!(Deposit::decode_args(&ixs[2].data).unwrap().amount, 100);
    }

    #[tokio::test]
    async fn deposit_skips_open_for_existing_position() {
        let (rpc, ctx) = setup(USDC);
        let position = ctx.lending_position_address(&ALICE, &USDC).unwrap();
        rpc.set_decoded(position, ctx.tuna_program(), &lending_position(ALICE, USDC))
            .unwrap();
        let ata = AtaRequest::new(
            ALICE,
            MintInfo {
                address: USDC,
                token_program: TOKEN_PROGRAM_ID,
                decimals: 6,
            },
        );
        rpc.set_token_account(ata.address().unwrap());

        let ixs = open_lending_position_and_deposit_instructions(&rpc, &ctx, &ALICE, &USDC, 100)
            .await
            .unwrap();
        assert_eq!(ixs.len(), 1);
        assert_eq!(&ixs[0].data[..8], &Deposit::DISCRIMINATOR);
    }

    #[tokio::test]
    async fn native_deposit_wraps_and_unwraps() {
        let (rpc, ctx) = setup(NATIVE_MINT);
        let ixs = deposit_instructions(&rpc, &ctx, &ALICE, &NATIVE_MINT, 5_000)
            .await
            .unwrap();
        // create, transfer, sync, deposit, close
        assert_eq!(ixs.len(), 5);
        assert_eq!(ixs[1].program_id, SYSTEM_PROGRAM_ID);
        assert_eq!(&ixs[3].data[..8], &Deposit::DISCRIMINATOR);
        assert_eq!(ixs[4].data, vec![9]);
    }

    #[tokio::test]
    async fn missing_vault_is_reported() {
        let rpc = MemoryRpc::new();
        let ctx = TunaContext::mainnet().unwrap();
        rpc.set_mint(USDC, TOKEN_PROGRAM_ID, 6);
        let err = deposit_instructions(&rpc, &ctx, &ALICE, &USDC, 1).await.unwrap_err();
        assert!(err.to_string().starts_with("Vault account not found"));
    }

    #[tokio::test]
    async fn withdraw_requires_one_amount() {
        let (rpc, ctx) = setup(USDC);
        for (funds, shares) in [(0, 0), (1, 1)] {
            let err = withdraw_instructions(&rpc, &ctx, &ALICE, &USDC, funds, shares)
                .await
                .unwrap_err();
            assert!(matches!(err, TunaError::InvalidArgument(_)));
        }
    }

    #[tokio::test]
    async fn withdraw_requires_position() {
        let (rpc, ctx) = setup(USDC);
        let err = withdraw_instructions(&rpc, &ctx, &ALICE, &USDC, 10, 0)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Lending position account not found"));
    }

    #[tokio::test]
    async fn withdraw_encodes_shares() {
        let (rpc, ctx) = setup(USDC);
        let position = ctx.lending_position_address(&ALICE, &USDC).unwrap();
        rpc.set_decoded(position, ctx.tuna_program(), &lending_position(ALICE, USDC))
            .unwrap();
        let ixs = withdraw_instructions(&rpc, &ctx, &ALICE, &USDC, 0, 77)
            .await
            .unwrap();
        let withdraw = ixs.last().unwrap();
        let args = Withdraw::decode_args(&withdraw.data).unwrap();
        assert_eq!((args.funds, args.shares), (0, 77));
        assert_eq!(withdraw.accounts[5].pubkey, position);
    }
}
