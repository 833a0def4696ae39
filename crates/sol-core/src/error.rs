use thiserror::Error;

/// Solana primitive errors.
#[derive(Debug, Error)]
pub enum SolError {
    #[error("invalid public key: {0}")]
    InvalidPubkey(String),

    #[error("invalid keypair: {0}")]
    InvalidKeypair(String),

    #[error("invalid seeds: {0}")]
    InvalidSeeds(String),

    #[error("could not find a viable program address bump seed")]
    NoViableBump,

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("missing signer: {0}")]
    MissingSigner(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("keypair file error: {0}")]
    KeypairFile(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_pubkey() {
        let err = SolError::InvalidPubkey("bad decode".into());
        assert_eq!(err.to_string(), "invalid public key: bad decode");
    }

    #[test]
    fn display_invalid_seeds() {
        let err = SolError::InvalidSeeds("seed 3 is 40 bytes".into());
        assert_eq!(err.to_string(), "invalid seeds: seed 3 is 40 bytes");
    }

    #[test]
    fn display_no_viable_bump() {
        assert_eq!(
            SolError::NoViableBump.to_string(),
            "could not find a viable program address bump seed"
        );
    }

    #[test]
    fn display_transaction_build_error() {
        let err = SolError::TransactionBuildError("too many accounts".into());
        assert_eq!(err.to_string(), "transaction build error: too many accounts");
    }

    #[test]
    fn display_missing_signer() {
        let err = SolError::MissingSigner("11111111111111111111111111111111".into());
        assert!(err.to_string().starts_with("missing signer"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "id.json");
        let err: SolError = io.into();
        assert!(err.to_string().contains("id.json"));
    }
}
