//! Mint lookup and the associated-token-account / wrapped-SOL policy shared
//! by every transaction builder.

use std::collections::BTreeMap;

use sol_core::token::{
    close_account, create_associated_token_account_idempotent, get_associated_token_address,
    is_token_program, sync_native, NATIVE_MINT,
};
use sol_core::{system, Instruction, Pubkey};

use crate::error::TunaError;
use crate::rpc::{Account, RpcClient};

const MINT_DECIMALS_OFFSET: usize = 44;

/// A mint together with the token program that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintInfo {
    pub address: Pubkey,
    pub token_program: Pubkey,
    pub decimals: u8,
}

impl MintInfo {
    pub fn from_account(address: Pubkey, account: &Account) -> Result<Self, TunaError> {
        if !is_token_program(&account.owner) {
            return Err(TunaError::UnsupportedTokenProgram(account.owner));
        }
        let decimals = *account.data.get(MINT_DECIMALS_OFFSET).ok_or_else(|| {
            TunaError::InvalidResponse(format!("mint {address} has {} bytes", account.data.len()))
        })?;
        Ok(Self {
            address,
            token_program: account.owner,
            decimals,
        })
    }

    pub fn decode(address: Pubkey, account: Option<&Account>) -> Result<Self, TunaError> {
        let account = account.ok_or(TunaError::AccountNotFound("Mint", address))?;
        Self::from_account(address, account)
    }

    pub fn is_native(&self) -> bool {
        self.address == NATIVE_MINT
    }
}

pub async fn fetch_mint(rpc: &dyn RpcClient, mint: &Pubkey) -> Result<MintInfo, TunaError> {
    let account = rpc.get_account(mint).await?;
    MintInfo::decode(*mint, account.as_ref())
}

/// Instructions that set up an associated token account before the main
/// instruction and tear it down after.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AtaInstructions {
    pub address: Pubkey,
    pub create: Vec<Instruction>,
    pub cleanup: Vec<Instruction>,
}

/// Associated token account of `owner` for `mint`, funded with `amount`
/// lamports when `mint` is wrapped SOL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtaRequest {
    pub owner: Pubkey,
    pub mint: MintInfo,
    pub amount: u64,
}

impl AtaRequest {
    pub fn new(owner: Pubkey, mint: MintInfo) -> Self {
        Self {
            owner,
            mint,
            amount: 0,
        }
    }

    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    pub fn address(&self) -> Result<Pubkey, TunaError> {
        Ok(get_associated_token_address(
            &self.owner,
            &self.mint.address,
            &self.mint.token_program,
        )?)
    }
}

/// Decide how to prepare one ATA given whether it already exists.
///
/// A missing account gets an idempotent create. For wrapped SOL, a non-zero
/// `amount` is transferred in and synced, and the account is closed back to
/// its owner afterwards only when the payer is that owner.
pub fn create_ata_instructions(
    exists: bool,
    mint: &Pubkey,
    owner: &Pubkey,
    payer: &Pubkey,
    token_program: &Pubkey,
    amount: u64,
) -> Result<AtaInstructions, TunaError> {
    let address = get_associated_token_address(owner, mint, token_program)?;
    let mut out = AtaInstructions {
        address,
        ..Default::default()
    };

    if exists {
        tracing::debug!(%address, %owner, "token account exists");
    } else {
        tracing::debug!(%address, %owner, %mint, "creating token account");
        out.create.push(create_associated_token_account_idempotent(
            payer,
            owner,
            mint,
            token_program,
        )?);
    }

    if *mint == NATIVE_MINT {
        if amount > 0 {
            tracing::debug!(%address, amount, "wrapping SOL");
            out.create.push(system::transfer(payer, &address, amount));
            out.create.push(sync_native(&address, token_program));
        }
        if payer == owner {
            out.cleanup
                .push(close_account(&address, owner, owner, token_program));
        }
    }
    Ok(out)
}

/// Resolve several ATA requests with a single existence lookup.
///
/// Requests resolving to the same address share one entry: the first one
/// carries the create, the summed wrap amount and the cleanup; the others
/// only report the address.
pub async fn get_create_ata_instructions(
    rpc: &dyn RpcClient,
    payer: &Pubkey,
    requests: &[AtaRequest],
) -> Result<Vec<AtaInstructions>, TunaError> {
    let addresses = requests
        .iter()
        .map(AtaRequest::address)
        .collect::<Result<Vec<_>, _>>()?;
    let accounts = rpc.get_multiple_accounts(&addresses).await?;

    let mut totals: BTreeMap<Pubkey, u64> = BTreeMap::new();
    for (request, address) in requests.iter().zip(&addresses) {
        let total = totals.entry(*address).or_default();
        *total = total.saturating_add(request.amount);
    }

    let mut out = Vec::with_capacity(requests.len());
    for ((request, address), account) in requests.iter().zip(&addresses).zip(&accounts) {
        let Some(amount) = totals.remove(address) else {
            out.push(AtaInstructions {
                address: *address,
                ..Default::default()
            });
            continue;
        };
        out.push(create_ata_instructions(
            account.is_some(),
            &request.mint.address,
            &request.owner,
            payer,
            &request.mint.token_program,
            amount,
        )?);
    }
    Ok(out)
}

/// Flatten resolved ATAs into (setup, cleanup) instruction lists.
pub fn split_ata_instructions(atas: Vec<AtaInstructions>) -> (Vec<Instruction>, Vec<Instruction>) {
    let mut create = Vec::new();
    let mut cleanup = Vec::new();
    for ata in atas {
        create.extend(ata.create);
        cleanup.extend(ata.cleanup);
    }
    (create, cleanup)
}
