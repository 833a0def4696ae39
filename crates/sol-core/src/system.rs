//! System Program instructions.

use crate::instruction::{AccountMeta, Instruction};
use crate::pubkey::Pubkey;

/// The Solana System Program public key: 32 zero bytes.
/// Base58: `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey([0u8; 32]);

/// System Program `Transfer` instruction index (little-endian u32).
const SYSTEM_TRANSFER_IX_INDEX: u32 = 2;

/// Build a System Program `Transfer` instruction moving `lamports` from
/// `from` (signer) to `to`.
pub fn transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Instruction {
    // Instruction data: u32 LE instruction index (2 = Transfer) + u64 LE lamports.
    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&SYSTEM_TRANSFER_IX_INDEX.to_le_bytes());
    data.extend_from_slice(&lamports.to_le_bytes());

    Instruction {
        program_id: SYSTEM_PROGRAM_ID,
        accounts: vec![AccountMeta::new(*from, true), AccountMeta::new(*to, false)],
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_instruction_data_is_12_bytes() {
        let ix = transfer(&Pubkey([1; 32]), &Pubkey([2; 32]), 1_000_000);
        // 4 bytes instruction index + 8 bytes lamports = 12.
        assert_eq!(ix.data.len(), 12);
        assert_eq!(&ix.data[..4], &[2, 0, 0, 0]);
        assert_eq!(&ix.data[4..], &1_000_000u64.to_le_bytes());
    }

    #[test]
    fn transfer_has_correct_accounts() {
        let from = Pubkey([0xAA; 32]);
        let to = Pubkey([0xBB; 32]);
        let ix = transfer(&from, &to, 500);

        assert_eq!(ix.program_id, SYSTEM_PROGRAM_ID);
        assert_eq!(ix.accounts.len(), 2);
        assert_eq!(ix.accounts[0].pubkey, from);
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, to);
        assert!(!ix.accounts[1].is_signer);
        assert!(ix.accounts[1].is_writable);
    }
}
