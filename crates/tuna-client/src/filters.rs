//! `getProgramAccounts` filters.
//!
//! Serialized the way the JSON-RPC API expects:
//! `{"dataSize": 155}` and `{"memcmp": {"offset": 11, "bytes": "<base58>", "encoding": "base58"}}`.

use serde::Serialize;
use sol_core::Pubkey;

use crate::accounts::lending_position::{
    LENDING_POSITION_AUTHORITY_OFFSET, LENDING_POSITION_MINT_OFFSET,
};
use crate::accounts::tuna_position::{
    TUNA_POSITION_AUTHORITY_OFFSET, TUNA_POSITION_MINT_A_OFFSET, TUNA_POSITION_MINT_B_OFFSET,
    TUNA_POSITION_POOL_OFFSET,
};
use crate::accounts::tuna_spot_position::{
    TUNA_SPOT_POSITION_AUTHORITY_OFFSET, TUNA_SPOT_POSITION_POOL_OFFSET,
};
use crate::accounts::{LendingPosition, Market, TunaPosition, TunaSpotPosition, Vault};
use crate::codec::AccountData;
use crate::types::MarketMaker;

const MARKET_MARKET_MAKER_OFFSET: usize = 11;
const MARKET_POOL_OFFSET: usize = 12;
const VAULT_MINT_OFFSET: usize = 11;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RpcFilter {
    DataSize(u64),
    Memcmp(Memcmp),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Memcmp {
    pub offset: usize,
    /// Base58-encoded bytes to compare.
    pub bytes: String,
    pub encoding: &'static str,
}

impl RpcFilter {
    pub fn memcmp(offset: usize, bytes: &[u8]) -> Self {
        RpcFilter::Memcmp(Memcmp {
            offset,
            bytes: bs58::encode(bytes).into_string(),
            encoding: "base58",
        })
    }

    /// Evaluate the filter against raw account data, as the RPC node would.
    pub fn matches(&self, data: &[u8]) -> bool {
        match self {
            RpcFilter::DataSize(size) => data.len() as u64 == *size,
            RpcFilter::Memcmp(m) => {
                let Ok(expected) = bs58::decode(&m.bytes).into_vec() else {
                    return false;
                };
                data.get(m.offset..m.offset + expected.len()) == Some(expected.as_slice())
            }
        }
    }
}

// ─── Generic ───

pub fn discriminator_filter<T: AccountData>() -> RpcFilter {
    RpcFilter::memcmp(0, &T::DISCRIMINATOR)
}

pub fn data_size_filter<T: AccountData>() -> RpcFilter {
    RpcFilter::DataSize(T::LEN as u64)
}

/// Discriminator and size filters selecting every account of type `T`.
pub fn account_type_filters<T: AccountData>() -> Vec<RpcFilter> {
    vec![data_size_filter::<T>(), discriminator_filter::<T>()]
}

// ─── Per-account field filters ───

pub fn lending_position_authority_filter(authority: &Pubkey) -> RpcFilter {
    RpcFilter::memcmp(LENDING_POSITION_AUTHORITY_OFFSET, authority.as_ref())
}

pub fn lending_position_mint_filter(mint: &Pubkey) -> RpcFilter {
    RpcFilter::memcmp(LENDING_POSITION_MINT_OFFSET, mint.as_ref())
}

pub fn tuna_position_authority_filter(authority: &Pubkey) -> RpcFilter {
    RpcFilter::memcmp(TUNA_POSITION_AUTHORITY_OFFSET, authority.as_ref())
}

pub fn tuna_position_pool_filter(pool: &Pubkey) -> RpcFilter {
    RpcFilter::memcmp(TUNA_POSITION_POOL_OFFSET, pool.as_ref())
}

pub fn tuna_position_mint_a_filter(mint: &Pubkey) -> RpcFilter {
    RpcFilter::memcmp(TUNA_POSITION_MINT_A_OFFSET, mint.as_ref())
}

pub fn tuna_position_mint_b_filter(mint: &Pubkey) -> RpcFilter {
    RpcFilter::memcmp(TUNA_POSITION_MINT_B_OFFSET, mint.as_ref())
}

pub fn tuna_spot_position_authority_filter(authority: &Pubkey) -> RpcFilter {
    RpcFilter::memcmp(TUNA_SPOT_POSITION_AUTHORITY_OFFSET, authority.as_ref())
}

pub fn tuna_spot_position_pool_filter(pool: &Pubkey) -> RpcFilter {
    RpcFilter::memcmp(TUNA_SPOT_POSITION_POOL_OFFSET, pool.as_ref())
}

pub fn market_pool_filter(pool: &Pubkey) -> RpcFilter {
    RpcFilter::memcmp(MARKET_POOL_OFFSET, pool.as_ref())
}

pub fn market_market_maker_filter(market_maker: MarketMaker) -> RpcFilter {
    RpcFilter::memcmp(MARKET_MARKET_MAKER_OFFSET, &[market_maker as u8])
}

pub fn vault_mint_filter(mint: &Pubkey) -> RpcFilter {
    RpcFilter::memcmp(VAULT_MINT_OFFSET, mint.as_ref())
}

// ─── Ready-made queries ───

pub fn lending_positions_by_authority(authority: &Pubkey) -> Vec<RpcFilter> {
    let mut filters = account_type_filters::<LendingPosition>();
    filters.push(lending_position_authority_filter(authority));
    filters
}

pub fn tuna_positions_by_authority(authority: &Pubkey) -> Vec<RpcFilter> {
    let mut filters = account_type_filters::<TunaPosition>();
    filters.push(tuna_position_authority_filter(authority));
    filters
}

pub fn tuna_spot_positions_by_authority(authority: &Pubkey) -> Vec<RpcFilter> {
    let mut filters = account_type_filters::<TunaSpotPosition>();
    filters.push(tuna_spot_position_authority_filter(authority));
    filters
}

pub fn all_vaults() -> Vec<RpcFilter> {
    account_type_filters::<Vault>()
}

pub fn all_markets() -> Vec<RpcFilter> {
    account_type_filters::<Market>()
}
