//! The RPC surface the builders and the submission flow rely on.
//!
//! [`HttpRpcClient`] talks JSON-RPC to a Solana node; [`MemoryRpc`] serves
//! accounts from memory and records what was simulated and sent.

use async_trait::async_trait;
use serde::Serialize;
use sol_core::{Pubkey, Transaction};
use tuna_client::filters::RpcFilter;

use crate::error::TunaError;

pub mod http;
pub mod memory;

pub use http::HttpRpcClient;
pub use memory::MemoryRpc;

/// A fetched account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub lamports: u64,
    #[serde(skip_serializing)]
    pub data: Vec<u8>,
    pub owner: Pubkey,
    pub executable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestBlockhash {
    pub blockhash: [u8; 32],
    pub last_valid_block_height: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationResult {
    /// The transaction error, as returned by the node.
    pub err: Option<serde_json::Value>,
    pub logs: Vec<String>,
    pub units_consumed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignatureStatus {
    pub err: Option<serde_json::Value>,
    /// `processed`, `confirmed` or `finalized`.
    pub confirmation_status: Option<String>,
}

impl SignatureStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(
            self.confirmation_status.as_deref(),
            Some("confirmed") | Some("finalized")
        )
    }
}

#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Fetch several accounts in one round trip; `None` for missing ones.
    /// The result has the same length and order as `addresses`.
    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, TunaError>;

    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, TunaError> {
        let mut accounts = self.get_multiple_accounts(std::slice::from_ref(address)).await?;
        Ok(accounts.pop().flatten())
    }

    /// Accounts owned by `program_id` that match every filter.
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[RpcFilter],
    ) -> Result<Vec<(Pubkey, Account)>, TunaError>;

    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, TunaError>;

    async fn get_block_height(&self) -> Result<u64, TunaError>;

    /// Simulate without signature verification, replacing the blockhash.
    async fn simulate_transaction(&self, tx: &Transaction) -> Result<SimulationResult, TunaError>;

    /// Submit with `skipPreflight = true`; returns the signature.
    async fn send_transaction(&self, tx: &Transaction) -> Result<String, TunaError>;

    async fn get_signature_status(
        &self,
        signature: &str,
    ) -> Result<Option<SignatureStatus>, TunaError>;

    /// Recent per-slot prioritization fees (micro-lamports per compute unit)
    /// paid by transactions that locked any of `accounts`.
    async fn get_recent_prioritization_fees(
        &self,
        accounts: &[Pubkey],
    ) -> Result<Vec<u64>, TunaError>;
}
