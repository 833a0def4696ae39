//! An in-memory RPC for tests and dry runs.
//!
//! Accounts are served from a map; simulations return a configurable unit
//! count; sent transactions are recorded and reported as confirmed.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use sol_core::{token::TOKEN_PROGRAM_ID, Pubkey, Transaction};
use tuna_client::codec::AccountData;
use tuna_client::filters::RpcFilter;

use super::{Account, LatestBlockhash, RpcClient, SignatureStatus, SimulationResult};
use crate::error::TunaError;

/// SPL mint account size.
pub const MINT_ACCOUNT_LEN: usize = 82;

#[derive(Debug)]
struct State {
    accounts: BTreeMap<Pubkey, Account>,
    units_consumed: Option<u64>,
    simulation_err: Option<serde_json::Value>,
    prioritization_fees: Vec<u64>,
    block_height: u64,
    simulated: Vec<Transaction>,
    sent: Vec<Transaction>,
    multiple_account_calls: usize,
}

#[derive(Debug)]
pub struct MemoryRpc {
    state: Mutex<State>,
}

impl Default for MemoryRpc {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRpc {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                accounts: BTreeMap::new(),
                units_consumed: Some(200_000),
                simulation_err: None,
                prioritization_fees: Vec::new(),
                block_height: 1,
                simulated: Vec::new(),
                sent: Vec::new(),
                multiple_account_calls: 0,
            }),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        // A panic while holding the lock only happens inside a failing test.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn set_account(&self, address: Pubkey, account: Account) {
        self.state().accounts.insert(address, account);
    }

    /// Store `value` encoded with its discriminator, owned by `owner`.
    pub fn set_decoded<T: AccountData>(
        &self,
        address: Pubkey,
        owner: Pubkey,
        value: &T,
    ) -> Result<(), TunaError> {
        let data = value.to_bytes()?;
        self.set_account(
            address,
            Account {
                lamports: 1_000_000,
                data,
                owner,
                executable: false,
            },
        );
        Ok(())
    }

    /// Store an initialized SPL mint owned by `token_program`.
    pub fn set_mint(&self, mint: Pubkey, token_program: Pubkey, decimals: u8) {
        let mut data = vec![0u8; MINT_ACCOUNT_LEN];
        data[44] = decimals;
        data[45] = 1;
        self.set_account(
            mint,
            Account {
                lamports: 1_461_600,
                data,
                owner: token_program,
                executable: false,
            },
        );
    }

    /// Store an (empty) token account so ATA creation is skipped for it.
    pub fn set_token_account(&self, address: Pubkey) {
        self.set_account(
            address,
            Account {
                lamports: 2_039_280,
                data: vec![0u8; 165],
                owner: TOKEN_PROGRAM_ID,
                executable: false,
            },
        );
    }

    pub fn account(&self, address: &Pubkey) -> Option<Account> {
        self.state().accounts.get(address).cloned()
    }

    pub fn remove_account(&self, address: &Pubkey) {
        self.state().accounts.remove(address);
    }

    pub fn set_units_consumed(&self, units: Option<u64>) {
        self.state().units_consumed = units;
    }

    pub fn set_simulation_err(&self, err: Option<serde_json::Value>) {
        self.state().simulation_err = err;
    }

    pub fn set_prioritization_fees(&self, fees: Vec<u64>) {
        self.state().prioritization_fees = fees;
    }

    pub fn simulated_transactions(&self) -> Vec<Transaction> {
        self.state().simulated.clone()
    }

    pub fn sent_transactions(&self) -> Vec<Transaction> {
        self.state().sent.clone()
    }

    /// How many `get_multiple_accounts` round trips were made.
    pub fn multiple_account_calls(&self) -> usize {
        self.state().multiple_account_calls
    }
}

#[async_trait]
impl RpcClient for MemoryRpc {
    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, TunaError> {
        let mut state = self.state();
        state.multiple_account_calls += 1;
        Ok(addresses
            .iter()
            .map(|a| state.accounts.get(a).cloned())
            .collect())
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        filters: &[RpcFilter],
    ) -> Result<Vec<(Pubkey, Account)>, TunaError> {
        let state = self.state();
        Ok(state
            .accounts
            .iter()
            .filter(|(_, account)| account.owner == *program_id)
            .filter(|(_, account)| filters.iter().all(|f| f.matches(&account.data)))
            .map(|(key, account)| (*key, account.clone()))
            .collect())
    }

    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash, TunaError> {
        let height = self.state().block_height;
        Ok(LatestBlockhash {
            blockhash: [0x42; 32],
            last_valid_block_height: height + 150,
        })
    }

    async fn get_block_height(&self) -> Result<u64, TunaError> {
        Ok(self.state().block_height)
    }

    async fn simulate_transaction(&self, tx: &Transaction) -> Result<SimulationResult, TunaError> {
        let mut state = self.state();
        state.simulated.push(tx.clone());
        Ok(SimulationResult {
            err: state.simulation_err.clone(),
            logs: vec!["Program log: simulated".to_string()],
            units_consumed: state.units_consumed,
        })
    }

    async fn send_transaction(&self, tx: &Transaction) -> Result<String, TunaError> {
        let signature = tx
            .signature()
            .ok_or_else(|| TunaError::InvalidArgument("transaction has no signatures".into()))?;
        let mut state = self.state();
        state.sent.push(tx.clone());
        state.block_height += 1;
        Ok(signature)
    }

    async fn get_signature_status(
        &self,
        signature: &str,
    ) -> Result<Option<SignatureStatus>, TunaError> {
        let state = self.state();
        let known = state
            .sent
            .iter()
            .any(|tx| tx.signature().as_deref() == Some(signature));
        Ok(known.then(|| SignatureStatus {
            err: None,
            confirmation_status: Some("confirmed".to_string()),
        }))
    }

    async fn get_recent_prioritization_fees(
        &self,
        _accounts: &[Pubkey],
    ) -> Result<Vec<u64>, TunaError> {
        Ok(self.state().prioritization_fees.clone())
    }
}
