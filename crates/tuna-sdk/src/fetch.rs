//! Typed account fetching.
//!
//! `fetch_maybe_*` returns `None` for a missing account; `fetch_*` turns a
//! missing account into [`TunaError::AccountNotFound`]. Data that is present
//! but does not decode is always an error.

use serde::Serialize;
use sol_core::Pubkey;
use tuna_client::accounts::{
    FusionPool, LendingPosition, Market, TunaConfig, TunaPosition, TunaSpotPosition, Vault,
    Whirlpool,
};
use tuna_client::codec::AccountData;
use tuna_client::filters::{self, RpcFilter};

use crate::context::TunaContext;
use crate::error::TunaError;
use crate::rpc::{Account, RpcClient};

/// A decoded account with its address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodedAccount<T> {
    pub address: Pubkey,
    pub owner: Pubkey,
    pub lamports: u64,
    pub data: T,
}

pub fn decode_account<T: AccountData>(
    address: Pubkey,
    account: &Account,
) -> Result<DecodedAccount<T>, TunaError> {
    Ok(DecodedAccount {
        address,
        owner: account.owner,
        lamports: account.lamports,
        data: T::from_bytes(&account.data)?,
    })
}

pub fn decode_maybe<T: AccountData>(
    address: Pubkey,
    account: Option<&Account>,
) -> Result<Option<DecodedAccount<T>>, TunaError> {
    account.map(|a| decode_account(address, a)).transpose()
}

/// Decode an account that must exist; `label` names it in the error.
pub fn decode_required<T: AccountData>(
    label: &'static str,
    address: Pubkey,
    account: Option<&Account>,
) -> Result<DecodedAccount<T>, TunaError> {
    decode_maybe(address, account)?.ok_or(TunaError::AccountNotFound(label, address))
}

pub async fn fetch_maybe<T: AccountData>(
    rpc: &dyn RpcClient,
    address: &Pubkey,
) -> Result<Option<DecodedAccount<T>>, TunaError> {
    let account = rpc.get_account(address).await?;
    decode_maybe(*address, account.as_ref())
}

pub async fn fetch_required<T: AccountData>(
    rpc: &dyn RpcClient,
    label: &'static str,
    address: &Pubkey,
) -> Result<DecodedAccount<T>, TunaError> {
    let account = rpc.get_account(address).await?;
    decode_required(label, *address, account.as_ref())
}

/// Decode every account of type `T` owned by `program_id` matching `filters`.
pub async fn fetch_all<T: AccountData>(
    rpc: &dyn RpcClient,
    program_id: &Pubkey,
    filters: &[RpcFilter],
) -> Result<Vec<DecodedAccount<T>>, TunaError> {
    rpc.get_program_accounts(program_id, filters)
        .await?
        .iter()
        .map(|(address, account)| decode_account(*address, account))
        .collect()
}

// ─── Per-account helpers ───

pub async fn fetch_tuna_config(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
) -> Result<DecodedAccount<TunaConfig>, TunaError> {
    fetch_required(rpc, "Tuna config", &ctx.tuna_config).await
}

pub async fn fetch_vault(
    rpc: &dyn RpcClient,
    address: &Pubkey,
) -> Result<DecodedAccount<Vault>, TunaError> {
    fetch_required(rpc, "Vault", address).await
}

pub async fn fetch_market(
    rpc: &dyn RpcClient,
    address: &Pubkey,
) -> Result<DecodedAccount<Market>, TunaError> {
    fetch_required(rpc, "Market", address).await
}

pub async fn fetch_maybe_lending_position(
    rpc: &dyn RpcClient,
    address: &Pubkey,
) -> Result<Option<DecodedAccount<LendingPosition>>, TunaError> {
    fetch_maybe(rpc, address).await
}

pub async fn fetch_lending_position(
    rpc: &dyn RpcClient,
    address: &Pubkey,
) -> Result<DecodedAccount<LendingPosition>, TunaError> {
    fetch_required(rpc, "Lending position", address).await
}

pub async fn fetch_tuna_position(
    rpc: &dyn RpcClient,
    address: &Pubkey,
) -> Result<DecodedAccount<TunaPosition>, TunaError> {
    fetch_required(rpc, "Tuna position", address).await
}

pub async fn fetch_tuna_spot_position(
    rpc: &dyn RpcClient,
    address: &Pubkey,
) -> Result<DecodedAccount<TunaSpotPosition>, TunaError> {
    fetch_required(rpc, "Tuna spot position", address).await
}

pub async fn fetch_whirlpool(
    rpc: &dyn RpcClient,
    address: &Pubkey,
) -> Result<DecodedAccount<Whirlpool>, TunaError> {
    fetch_required(rpc, "Whirlpool", address).await
}

pub async fn fetch_fusion_pool(
    rpc: &dyn RpcClient,
    address: &Pubkey,
) -> Result<DecodedAccount<FusionPool>, TunaError> {
    fetch_required(rpc, "Fusion pool", address).await
}

// ─── Program-wide scans ───

pub async fn fetch_all_lending_positions_by_authority(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
) -> Result<Vec<DecodedAccount<LendingPosition>>, TunaError> {
    let filters = filters::lending_positions_by_authority(authority);
    fetch_all(rpc, &ctx.program_ids.tuna, &filters).await
}

pub async fn fetch_all_tuna_lp_positions_by_authority(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
) -> Result<Vec<DecodedAccount<TunaPosition>>, TunaError> {
    let filters = filters::tuna_positions_by_authority(authority);
    fetch_all(rpc, &ctx.program_ids.tuna, &filters).await
}

pub async fn fetch_all_tuna_spot_positions_by_authority(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
    authority: &Pubkey,
) -> Result<Vec<DecodedAccount<TunaSpotPosition>>, TunaError> {
    let filters = filters::tuna_spot_positions_by_authority(authority);
    fetch_all(rpc, &ctx.program_ids.tuna, &filters).await
}

pub async fn fetch_all_vaults(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
) -> Result<Vec<DecodedAccount<Vault>>, TunaError> {
    fetch_all(rpc, &ctx.program_ids.tuna, &filters::all_vaults()).await
}

pub async fn fetch_all_markets(
    rpc: &dyn RpcClient,
    ctx: &TunaContext,
) -> Result<Vec<DecodedAccount<Market>>, TunaError> {
    fetch_all(rpc, &ctx.program_ids.tuna, &filters::all_markets()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::MemoryRpc;
    use crate::txbuilder::testing::vault;

    #[tokio::test]
    async fn missing_account_has_descriptive_error() {
        let rpc = MemoryRpc::new();
        let address = Pubkey([3; 32]);
        let err = fetch_tuna_position(&rpc, &address).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Tuna position account not found: {address}")
        );
    }

    #[tokio::test]
    async fn wrong_type_is_decode_error() {
        let rpc = MemoryRpc::new();
        let ctx = TunaContext::mainnet().unwrap();
        let address = Pubkey([3; 32]);
        rpc.set_decoded(address, ctx.program_ids.tuna, &vault(Pubkey([1; 32])))
            .unwrap();
        let err = fetch_market(&rpc, &address).await.unwrap_err();
        assert!(matches!(err, TunaError::Decode(_)));
    }

    #[tokio::test]
    async fn fetch_all_vaults_decodes_each() {
        let rpc = MemoryRpc::new();
        let ctx = TunaContext::mainnet().unwrap();
        for n in 1..=3u8 {
            let mint = Pubkey([n; 32]);
            rpc.set_decoded(ctx.vault_address(&mint).unwrap(), ctx.program_ids.tuna, &vault(mint))
                .unwrap();
        }
        let vaults = fetch_all_vaults(&rpc, &ctx).await.unwrap();
        assert_eq!(vaults.len(), 3);
        for v in vaults {
            assert_eq!(v.address, ctx.vault_address(&v.data.mint).unwrap());
        }
    }

    #[tokio::test]
    async fn maybe_returns_none_for_missing() {
        let rpc = MemoryRpc::new();
        let found = fetch_maybe_lending_position(&rpc, &Pubkey([1; 32])).await.unwrap();
        assert!(found.is_none());
    }
}
