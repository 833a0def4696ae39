use thiserror::Error;

/// Account and instruction codec errors, and values decoded from
/// accounts that cannot be used.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("{name}: expected {expected} bytes, got {actual}")]
    InvalidLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{0}: discriminator mismatch")]
    DiscriminatorMismatch(&'static str),

    #[error("{name}: {count} trailing bytes after decode")]
    TrailingBytes { name: &'static str, count: usize },

    #[error("invalid tick spacing {0}")]
    InvalidTickSpacing(u16),

    #[error("borsh error: {0}")]
    Borsh(#[from] std::io::Error),
}
