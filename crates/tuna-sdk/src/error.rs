use sol_core::{Pubkey, SolError};
use thiserror::Error;
use tuna_client::CodecError;

#[derive(Debug, Error)]
pub enum TunaError {
    /// An account the operation needs does not exist on chain.
    #[error("{0} account not found: {1}")]
    AccountNotFound(&'static str, Pubkey),

    #[error("Decode error: {0}")]
    Decode(#[from] CodecError),

    #[error("Simulation failed: {0}")]
    Simulation(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Transaction expired before confirmation: {0}")]
    Expired(String),

    #[error("RPC transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("Invalid RPC response: {0}")]
    InvalidResponse(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported token program: {0}")]
    UnsupportedTokenProgram(Pubkey),

    #[error("Solana error: {0}")]
    Sol(#[from] SolError),
}

impl TunaError {
    /// Transport and node-side RPC errors may succeed on a later attempt.
    /// Everything else reflects the chain state or the request itself.
    pub fn is_transient(&self) -> bool {
        matches!(self, TunaError::Transport(_) | TunaError::Rpc { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_not_found_message() {
        let address = Pubkey([0; 32]);
        let err = TunaError::AccountNotFound("Tuna position", address);
        assert_eq!(
            err.to_string(),
            "Tuna position account not found: 11111111111111111111111111111111"
        );
        assert!(!err.is_transient());
    }

    #[test]
    fn rpc_errors_are_transient() {
        let err = TunaError::Rpc {
            code: -32005,
            message: "Node is behind".into(),
        };
        assert_eq!(err.to_string(), "RPC error -32005: Node is behind");
        assert!(err.is_transient());
    }

    #[test]
    fn decode_and_simulation_are_fatal() {
        let err: TunaError = CodecError::DiscriminatorMismatch("Vault").into();
        assert_eq!(err.to_string(), "Decode error: Vault: discriminator mismatch");
        assert!(!err.is_transient());
        assert!(!TunaError::Simulation("no units consumed".into()).is_transient());
    }

    #[test]
    fn sol_error_converts() {
        let err: TunaError = SolError::NoViableBump.into();
        assert!(matches!(err, TunaError::Sol(_)));
    }
}
