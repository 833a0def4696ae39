//! Discriminator-prefixed account and instruction codecs.
//!
//! Every account starts with an 8-byte discriminator, `sha256("account:<Name>")[..8]`,
//! followed by the borsh encoding of its fields. Instruction data is
//! `sha256("global:<snake_name>")[..8]` followed by the borsh encoding of the
//! instruction arguments.

use borsh::{BorshDeserialize, BorshSerialize};
use sol_core::{AccountMeta, Instruction, Pubkey};

use crate::error::CodecError;

pub const DISCRIMINATOR_LEN: usize = 8;

/// Decode `bytes` as exactly one `T`, rejecting leftover input.
fn decode_exact<T: BorshDeserialize>(name: &'static str, bytes: &[u8]) -> Result<T, CodecError> {
    let mut rest = bytes;
    let value = T::deserialize(&mut rest)?;
    if !rest.is_empty() {
        return Err(CodecError::TrailingBytes {
            name,
            count: rest.len(),
        });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// A fixed-size on-chain account layout.
pub trait AccountData: BorshSerialize + BorshDeserialize + Sized {
    const NAME: &'static str;
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN];
    /// Total size including the discriminator.
    const LEN: usize;

    /// Decode raw account data. All-or-nothing: the length must equal
    /// [`Self::LEN`], the discriminator must match, and the decode must
    /// consume every byte.
    fn from_bytes(data: &[u8]) -> Result<Self, CodecError> {
        if data.len() != Self::LEN {
            return Err(CodecError::InvalidLength {
                name: Self::NAME,
                expected: Self::LEN,
                actual: data.len(),
            });
        }
        if data[..DISCRIMINATOR_LEN] != Self::DISCRIMINATOR {
            return Err(CodecError::DiscriminatorMismatch(Self::NAME));
        }
        decode_exact(Self::NAME, &data[DISCRIMINATOR_LEN..])
    }

    fn to_bytes(&self) -> Result<Vec<u8>, CodecError> {
        let mut out = Vec::with_capacity(Self::LEN);
        out.extend_from_slice(&Self::DISCRIMINATOR);
        borsh::to_writer(&mut out, self)?;
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

/// The named accounts of one Tuna instruction, in program order.
pub trait TunaInstruction {
    const NAME: &'static str;
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN];
    type Args: BorshSerialize + BorshDeserialize;

    fn to_account_metas(&self) -> Vec<AccountMeta>;

    fn instruction(&self, program_id: &Pubkey, args: &Self::Args) -> Result<Instruction, CodecError> {
        self.instruction_with_remaining_accounts(program_id, args, &[])
    }

    /// Build the instruction with `remaining` appended after the named
    /// accounts, in the given order.
    fn instruction_with_remaining_accounts(
        &self,
        program_id: &Pubkey,
        args: &Self::Args,
        remaining: &[AccountMeta],
    ) -> Result<Instruction, CodecError> {
        let mut accounts = self.to_account_metas();
        accounts.extend_from_slice(remaining);

        let mut data = Vec::with_capacity(64);
        data.extend_from_slice(&Self::DISCRIMINATOR);
        borsh::to_writer(&mut data, args)?;

        Ok(Instruction::new(*program_id, accounts, data))
    }

    /// Decode instruction data produced by [`Self::instruction`].
    fn decode_args(data: &[u8]) -> Result<Self::Args, CodecError> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(CodecError::InvalidLength {
                name: Self::NAME,
                expected: DISCRIMINATOR_LEN,
                actual: data.len(),
            });
        }
        if data[..DISCRIMINATOR_LEN] != Self::DISCRIMINATOR {
            return Err(CodecError::DiscriminatorMismatch(Self::NAME));
        }
        decode_exact(Self::NAME, &data[DISCRIMINATOR_LEN..])
    }
}
