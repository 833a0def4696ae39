//! Signing and submission.
//!
//! Submission runs in two explicit phases. [`estimate_compute_units`]
//! simulates the instructions under the maximum budget and returns the
//! limit to request; [`send_instructions_with_budget`] attaches that limit
//! and a priority fee, signs, sends with preflight skipped and waits for
//! confirmation. [`send_instructions`] chains the two.

use std::collections::BTreeSet;
use std::time::Duration;

use sol_core::compute_budget::{
    is_set_compute_unit_limit, is_set_compute_unit_price, set_compute_unit_limit,
    set_compute_unit_price, MAX_COMPUTE_UNIT_LIMIT,
};
use sol_core::{AddressLookupTable, Instruction, Keypair, Message, Pubkey, Transaction};

use crate::error::TunaError;
use crate::rpc::RpcClient;

/// Headroom added on top of the simulated compute units, in percent.
pub const COMPUTE_UNIT_MARGIN_PERCENT: u64 = 15;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// How to price compute units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PriorityFee {
    /// No `set_compute_unit_price` instruction.
    #[default]
    None,
    /// A fixed price in micro-lamports per compute unit.
    Fixed(u64),
    /// Median of recent fees paid for the transaction's writable accounts,
    /// capped at `max`.
    Recent { max: u64 },
}

#[derive(Debug, Clone)]
pub struct SendOptions {
    pub priority_fee: PriorityFee,
    /// Skip estimation and request exactly this many compute units.
    pub compute_unit_limit: Option<u32>,
    /// Compile a v0 message against these tables when non-empty.
    pub lookup_tables: Vec<AddressLookupTable>,
    pub poll_interval: Duration,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            priority_fee: PriorityFee::default(),
            compute_unit_limit: None,
            lookup_tables: Vec::new(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Simulated units plus the safety margin, rounded up and capped at the
/// protocol maximum.
pub fn compute_unit_limit_with_margin(units_consumed: u64) -> u32 {
    let padded = units_consumed
        .saturating_mul(100 + COMPUTE_UNIT_MARGIN_PERCENT)
        .div_ceil(100);
    padded.min(u64::from(MAX_COMPUTE_UNIT_LIMIT)) as u32
}

fn median(mut values: Vec<u64>) -> u64 {
    if values.is_empty() {
        return 0;
    }
    values.sort_unstable();
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        let (a, b) = (values[mid - 1], values[mid]);
        a / 2 + b / 2 + (a % 2 + b % 2) / 2
    } else {
        values[mid]
    }
}

/// Drop compute budget instructions supplied by the caller; the budget is
/// always set here.
fn without_compute_budget(instructions: &[Instruction]) -> Vec<Instruction> {
    instructions
        .iter()
        .filter(|ix| {
            let budget = is_set_compute_unit_limit(ix) || is_set_compute_unit_price(ix);
            if budget {
                tracing::debug!("replacing caller compute budget instruction");
            }
            !budget
        })
        .cloned()
        .collect()
}

fn compile(
    instructions: &[Instruction],
    payer: &Pubkey,
    lookup_tables: &[AddressLookupTable],
    blockhash: &[u8; 32],
) -> Result<Message, TunaError> {
    let message = if lookup_tables.is_empty() {
        Message::compile_legacy(instructions, payer, blockhash)?
    } else {
        Message::compile_v0(instructions, payer, lookup_tables, blockhash)?
    };
    Ok(message)
}

fn writable_accounts(instructions: &[Instruction]) -> Vec<Pubkey> {
    instructions
        .iter()
        .flat_map(|ix| ix.accounts.iter())
        .filter(|meta| meta.is_writable)
        .map(|meta| meta.pubkey)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Resolve a [`PriorityFee`] to micro-lamports, `None` meaning no price
/// instruction at all.
pub async fn resolve_priority_fee(
    rpc: &dyn RpcClient,
    instructions: &[Instruction],
    priority_fee: PriorityFee,
) -> Result<Option<u64>, TunaError> {
    Ok(match priority_fee {
        PriorityFee::None => None,
        PriorityFee::Fixed(fee) => Some(fee),
        PriorityFee::Recent { max } => {
            let fees = rpc
                .get_recent_prioritization_fees(&writable_accounts(instructions))
                .await?;
            Some(median(fees).min(max))
        }
    })
}

/// Fetch and decode address lookup tables.
pub async fn fetch_lookup_tables(
    rpc: &dyn RpcClient,
    addresses: &[Pubkey],
) -> Result<Vec<AddressLookupTable>, TunaError> {
    if addresses.is_empty() {
        return Ok(Vec::new());
    }
    let accounts = rpc.get_multiple_accounts(addresses).await?;
    addresses
        .iter()
        .zip(accounts)
        .map(|(key, account)| {
            let account = account.ok_or(TunaError::AccountNotFound("Address lookup table", *key))?;
            Ok(AddressLookupTable::deserialize(*key, &account.data)?)
        })
        .collect()
}

/// Phase one: simulate under the maximum budget and return the compute unit
/// limit to request.
pub async fn estimate_compute_units(
    rpc: &dyn RpcClient,
    instructions: &[Instruction],
    payer: &Pubkey,
    lookup_tables: &[AddressLookupTable],
) -> Result<u32, TunaError> {
    let mut simulated = vec![set_compute_unit_limit(MAX_COMPUTE_UNIT_LIMIT)];
    simulated.extend(without_compute_budget(instructions));

    // The node replaces the blockhash and skips signature checks.
    let message = compile(&simulated, payer, lookup_tables, &[0u8; 32])?;
    let result = rpc
        .simulate_transaction(&Transaction::new_unsigned(message))
        .await?;

    if let Some(err) = &result.err {
        tracing::warn!(%err, "simulation error");
        for log in &result.logs {
            tracing::info!("{log}");
        }
    } else {
        for log in &result.logs {
            tracing::debug!("{log}");
        }
    }

    match result.units_consumed {
        Some(units) if units > 0 => {
            let limit = compute_unit_limit_with_margin(units);
            tracing::info!(units_consumed = units, limit, "estimated compute units");
            Ok(limit)
        }
        _ => Err(TunaError::Simulation(match result.err {
            Some(err) => format!("no compute units consumed: {err}"),
            None => "no compute units consumed".to_string(),
        })),
    }
}

/// Phase two: attach `compute_unit_limit` and the priority fee, sign with
/// `signers` (the first one pays), send and wait for confirmation.
/// Returns the transaction signature.
pub async fn send_instructions_with_budget(
    rpc: &dyn RpcClient,
    instructions: &[Instruction],
    signers: &[&Keypair],
    options: &SendOptions,
    compute_unit_limit: u32,
) -> Result<String, TunaError> {
    let payer = signers
        .first()
        .map(|kp| kp.pubkey())
        .ok_or_else(|| TunaError::InvalidArgument("at least one signer is required".into()))?;
    let instructions = without_compute_budget(instructions);

    let mut full = vec![set_compute_unit_limit(compute_unit_limit)];
    if let Some(fee) = resolve_priority_fee(rpc, &instructions, options.priority_fee).await? {
        tracing::info!(micro_lamports = fee, "priority fee");
        full.push(set_compute_unit_price(fee));
    }
    full.extend(instructions);

    let latest = rpc.get_latest_blockhash().await?;
    let message = compile(&full, &payer, &options.lookup_tables, &latest.blockhash)?;
    let transaction = Transaction::sign(message, signers)?;

    let signature = rpc.send_transaction(&transaction).await?;
    tracing::info!(%signature, compute_unit_limit, "transaction sent");
    confirm(rpc, &signature, latest.last_valid_block_height, options.poll_interval).await?;
    tracing::info!(%signature, "transaction confirmed");
    Ok(signature)
}

/// Estimate when no limit is given, then send.
pub async fn send_instructions(
    rpc: &dyn RpcClient,
    instructions: &[Instruction],
    signers: &[&Keypair],
    options: &SendOptions,
) -> Result<String, TunaError> {
    let compute_unit_limit = match options.compute_unit_limit {
        Some(limit) => limit,
        None => {
            let payer = signers
                .first()
                .map(|kp| kp.pubkey())
                .ok_or_else(|| TunaError::InvalidArgument("at least one signer is required".into()))?;
            estimate_compute_units(rpc, instructions, &payer, &options.lookup_tables).await?
        }
    };
    send_instructions_with_budget(rpc, instructions, signers, options, compute_unit_limit).await
}

async fn confirm(
    rpc: &dyn RpcClient,
    signature: &str,
    last_valid_block_height: u64,
    poll_interval: Duration,
) -> Result<(), TunaError> {
    loop {
        if let Some(status) = rpc.get_signature_status(signature).await? {
            if let Some(err) = status.err {
                return Err(TunaError::TransactionFailed(format!("{signature}: {err}")));
            }
            if status.is_confirmed() {
                return Ok(());
            }
        }
        if rpc.get_block_height().await? > last_valid_block_height {
            return Err(TunaError::Expired(signature.to_string()));
        }
        tokio::time::sleep(poll_interval).await;
    }
}
