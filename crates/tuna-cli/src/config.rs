//! Connection, wallet and program id settings, from flags or the environment.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use sol_core::{Keypair, Pubkey};
use tuna_client::ProgramIds;
use tuna_sdk::rpc::http::DEFAULT_RPC_URL;
use tuna_sdk::{HttpRpcClient, PriorityFee, TunaContext};

#[derive(Args, Debug, Clone)]
pub struct Config {
    /// JSON-RPC endpoint
    #[arg(long, global = true, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,
    /// Wallet keypair file (default: ~/.config/solana/id.json)
    #[arg(long, global = true, env = "KEYPAIR")]
    pub keypair: Option<PathBuf>,
    #[arg(long, global = true, env = "TUNA_PROGRAM_ID")]
    pub tuna_program_id: Option<Pubkey>,
    #[arg(long, global = true, env = "WHIRLPOOL_PROGRAM_ID")]
    pub whirlpool_program_id: Option<Pubkey>,
    #[arg(long, global = true, env = "FUSIONAMM_PROGRAM_ID")]
    pub fusionamm_program_id: Option<Pubkey>,
    /// Fixed compute unit price in micro-lamports
    #[arg(long, global = true, conflicts_with = "max_priority_fee")]
    pub priority_fee: Option<u64>,
    /// Pay the median recent fee, up to this many micro-lamports
    #[arg(long, global = true)]
    pub max_priority_fee: Option<u64>,
}

impl Config {
    pub fn program_ids(&self) -> ProgramIds {
        let defaults = ProgramIds::default();
        ProgramIds {
            tuna: self.tuna_program_id.unwrap_or(defaults.tuna),
            whirlpool: self.whirlpool_program_id.unwrap_or(defaults.whirlpool),
            fusionamm: self.fusionamm_program_id.unwrap_or(defaults.fusionamm),
        }
    }

    pub fn context(&self) -> anyhow::Result<TunaContext> {
        Ok(TunaContext::new(self.program_ids())?)
    }

    pub fn rpc(&self) -> HttpRpcClient {
        HttpRpcClient::new(reqwest::Client::new(), &self.rpc_url)
    }

    pub fn keypair_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(path) = &self.keypair {
            return Ok(path.clone());
        }
        let home = std::env::var_os("HOME").context("HOME is not set; pass --keypair")?;
        Ok(PathBuf::from(home).join(".config/solana/id.json"))
    }

    pub fn wallet(&self) -> anyhow::Result<Keypair> {
        let path = self.keypair_path()?;
        Keypair::read_from_file(&path)
            .with_context(|| format!("reading keypair {}", path.display()))
    }

    pub fn priority_fee(&self) -> PriorityFee {
        match (self.priority_fee, self.max_priority_fee) {
            (Some(fee), _) => PriorityFee::Fixed(fee),
            (None, Some(max)) => PriorityFee::Recent { max },
            (None, None) => PriorityFee::None,
        }
    }
}
