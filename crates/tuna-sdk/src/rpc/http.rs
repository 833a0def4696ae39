//! JSON-RPC over HTTP.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};
use serde_with::skip_serializing_none;
use sol_core::{Pubkey, Transaction};
use tuna_client::filters::RpcFilter;

use super::{Account, LatestBlockhash, RpcClient, SignatureStatus, SimulationResult};
use crate::error::TunaError;

/// `getMultipleAccounts` accepts at most this many keys per call.
const MAX_MULTIPLE_ACCOUNTS: usize = 100;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

#[derive(Debug)]
pub struct HttpRpcClient {
    client: reqwest::Client,
    url: String,
    commitment: String,
    id: AtomicU64,
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// `{ "context": {...}, "value": T }`
#[derive(Deserialize)]
struct WithContext<T> {
    value: T,
}

#[derive(Deserialize)]
struct UiAccount {
    lamports: u64,
    /// `[<base64 data>, "base64"]`
    data: (String, String),
    owner: String,
    executable: bool,
}

impl UiAccount {
    fn decode(self) -> Result<Account, TunaError> {
        let data = BASE64
            .decode(&self.data.0)
            .map_err(|e| TunaError::InvalidResponse(format!("account data: {e}")))?;
        let owner = self
            .owner
            .parse()
            .map_err(|e| TunaError::InvalidResponse(format!("account owner: {e}")))?;
        Ok(Account {
            lamports: self.lamports,
            data,
            owner,
            executable: self.executable,
        })
    }
}

#[derive(Deserialize)]
struct KeyedUiAccount {
    pubkey: String,
    account: UiAccount,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiLatestBlockhash {
    blockhash: String,
    last_valid_block_height: u64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiSimulation {
    err: Option<JsonValue>,
    logs: Option<Vec<String>>,
    units_consumed: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiSignatureStatus {
    err: Option<JsonValue>,
    confirmation_status: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UiPrioritizationFee {
    prioritization_fee: u64,
}

#[skip_serializing_none]
#[derive(Serialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct RpcConfig<'a> {
    encoding: Option<&'a str>,
    commitment: Option<&'a str>,
    filters: Option<&'a [RpcFilter]>,
    skip_preflight: Option<bool>,
    sig_verify: Option<bool>,
    replace_recent_blockhash: Option<bool>,
    search_transaction_history: Option<bool>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

impl HttpRpcClient {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            commitment: "confirmed".to_string(),
            id: AtomicU64::new(0),
        }
    }

    pub fn with_commitment(mut self, commitment: impl Into<String>) -> Self {
        self.commitment = commitment.into();
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn next_id(&self) -> u64 {
        self.id.fetch_add(1, Ordering::Relaxed)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: JsonValue,
    ) -> Result<T, TunaError> {
        let req = json!({
            "jsonrpc": "2.0",
            "id": self.next_id(),
            "method": method,
            "params": params,
        });
        tracing::trace!(method, "rpc request");

        let response = self
            .client
            .post(&self.url)
            .json(&req)
            .send()
            .await?
            .error_for_status()?
            .json::<RpcResponse<T>>()
            .await?;

        if let Some(error) = response.error {
            return Err(TunaError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        response
            .result
            .ok_or_else(|| TunaError::InvalidResponse(format!("{method}: missing result")))
    }

    fn account_config(&self) -> RpcConfig<'_> {
        RpcConfig {
            encoding: Some("base64"),
            commitment: Some(&self.commitment),
            ..Default::default()
        }
    }
}

fn encode_transaction(tx: &Transaction) -> Result<String, TunaError> {
    Ok(BASE64.encode(tx.serialize()?))
}

#[async_trait]
impl RpcClient for HttpRpcClient {
    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, TunaError> {
        let mut out = Vec::with_capacity(addresses.len());
        for chunk in addresses.chunks(MAX_MULTIPLE_ACCOUNTS) {
            let keys: Vec<String> = chunk.iter().map(Pubkey::to_string).collect();
            let page: WithContext<Vec<Option<UiAccount>>> = self
                .request("getMultipleAccounts", json!([keys, self.account_config()]))
                .await?;
            if page.value.len() != chunk.len() {
                return Err(TunaError::InvalidResponse(format!(
                    "getMultipleAccounts returned {} accounts for {} keys",
                    page.value.len(),
                    chunk.len()
                )));
            }
            for account in page.value {
                out.push(account.map(UiAccount::decode).transpose()?);
            }
        }
        Ok(out)
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[RpcFilter],
    ) -> Result<Vec<(Pubkey, Account)>, TunaError> {
        let config = RpcConfig {
            filters: Some(filters),
            ..self.account_config()
        };
        let accounts: Vec<KeyedUiAccount> = self
            .request(
                "getProgramAccounts",
                json!([program_id.to_string(), config]),
            )
            .await?;
        tracing::debug!(program = %program_id, count = accounts.len(), "program accounts");

        accounts
            .into_iter()
            .map(|keyed| {
                let pubkey = keyed
                    .pubkey
                    .parse()
                    .map_err(|e| TunaError::InvalidResponse(format!("account key: {e}")))?;
                Ok((pubkey, keyed.account.decode()?))
            })
            .collect()
    }

    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, TunaError> {
        let config = RpcConfig {
            commitment: Some(&self.commitment),
            ..Default::default()
        };
        let latest: WithContext<UiLatestBlockhash> =
            self.request("getLatestBlockhash", json!([config])).await?;

        let bytes = bs58::decode(&latest.value.blockhash)
            .into_vec()
            .map_err(|e| TunaError::InvalidResponse(format!("blockhash: {e}")))?;
        let blockhash: [u8; 32] = bytes
            .try_into()
            .map_err(|_| TunaError::InvalidResponse("blockhash is not 32 bytes".into()))?;

        Ok(LatestBlockhash {
            blockhash,
            last_valid_block_height: latest.value.last_valid_block_height,
        })
    }

    async fn get_block_height(&self) -> Result<u64, TunaError> {
        let config = RpcConfig {
            commitment: Some(&self.commitment),
            ..Default::default()
        };
        self.request("getBlockHeight", json!([config])).await
    }

    async fn simulate_transaction(&self, tx: &Transaction) -> Result<SimulationResult, TunaError> {
        let config = RpcConfig {
            encoding: Some("base64"),
            commitment: Some(&self.commitment),
            sig_verify: Some(false),
            replace_recent_blockhash: Some(true),
            ..Default::default()
        };
        let sim: WithContext<UiSimulation> = self
            .request(
                "simulateTransaction",
                json!([encode_transaction(tx)?, config]),
            )
            .await?;

        Ok(SimulationResult {
            err: sim.value.err,
            logs: sim.value.logs.unwrap_or_default(),
            units_consumed: sim.value.units_consumed,
        })
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<String, TunaError> {
        let config = RpcConfig {
            encoding: Some("base64"),
            skip_preflight: Some(true),
            ..Default::default()
        };
        self.request("sendTransaction", json!([encode_transaction(tx)?, config]))
            .await
    }

    async fn get_signature_status(
        &self,
        signature: &str,
    ) -> Result<Option<SignatureStatus>, TunaError> {
        let config = RpcConfig {
            search_transaction_history: Some(false),
            ..Default::default()
        };
        let statuses: WithContext<Vec<Option<UiSignatureStatus>>> = self
            .request("getSignatureStatuses", json!([[signature], config]))
            .await?;

        Ok(statuses
            .value
            .into_iter()
            .next()
            .flatten()
            .map(|s| SignatureStatus {
                err: s.err,
                confirmation_status: s.confirmation_status,
            }))
    }

    async fn get_recent_prioritization_fees(
        &self,
        accounts: &[Pubkey],
    ) -> Result<Vec<u64>, TunaError> {
        let keys: Vec<String> = accounts.iter().map(Pubkey::to_string).collect();
        let fees: Vec<UiPrioritizationFee> = self
            .request("getRecentPrioritizationFees", json!([keys]))
            .await?;
        Ok(fees.into_iter().map(|f| f.prioritization_fee).collect())
    }
}
