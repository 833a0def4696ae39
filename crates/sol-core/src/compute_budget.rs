//! Compute Budget Program instructions.

use crate::instruction::Instruction;
use crate::pubkey::Pubkey;

/// Compute Budget Program ID: `ComputeBudget111111111111111111111111111111`
pub const COMPUTE_BUDGET_PROGRAM_ID: Pubkey = Pubkey([
    0x03, 0x06, 0x46, 0x6f, 0xe5, 0x21, 0x17, 0x32, 0xff, 0xec, 0xad, 0xba, 0x72, 0xc3, 0x9b, 0xe7,
    0xbc, 0x8c, 0xe5, 0xbb, 0xc5, 0xf7, 0x12, 0x6b, 0x2c, 0x43, 0x9b, 0x3a, 0x40, 0x00, 0x00, 0x00,
]);

/// Protocol-wide per-transaction compute unit ceiling.
pub const MAX_COMPUTE_UNIT_LIMIT: u32 = 1_400_000;

const SET_COMPUTE_UNIT_LIMIT_IX_INDEX: u8 = 2;
const SET_COMPUTE_UNIT_PRICE_IX_INDEX: u8 = 3;

pub fn set_compute_unit_limit(units: u32) -> Instruction {
    let mut data = Vec::with_capacity(5);
    data.push(SET_COMPUTE_UNIT_LIMIT_IX_INDEX);
    data.extend_from_slice(&units.to_le_bytes());
    Instruction::new(COMPUTE_BUDGET_PROGRAM_ID, vec![], data)
}

/// Priority fee in micro-lamports per compute unit.
pub fn set_compute_unit_price(micro_lamports: u64) -> Instruction {
    let mut data = Vec::with_capacity(9);
    data.push(SET_COMPUTE_UNIT_PRICE_IX_INDEX);
    data.extend_from_slice(&micro_lamports.to_le_bytes());
    Instruction::new(COMPUTE_BUDGET_PROGRAM_ID, vec![], data)
}

/// Whether `ix` is a compute budget instruction that sets the unit limit.
pub fn is_set_compute_unit_limit(ix: &Instruction) -> bool {
    ix.program_id == COMPUTE_BUDGET_PROGRAM_ID
        && ix.data.first() == Some(&SET_COMPUTE_UNIT_LIMIT_IX_INDEX)
}

/// Whether `ix` is a compute budget instruction that sets the unit price.
pub fn is_set_compute_unit_price(ix: &Instruction) -> bool {
    ix.program_id == COMPUTE_BUDGET_PROGRAM_ID
        && ix.data.first() == Some(&SET_COMPUTE_UNIT_PRICE_IX_INDEX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_id_roundtrip() {
        assert_eq!(
            COMPUTE_BUDGET_PROGRAM_ID.to_string(),
            "ComputeBudget111111111111111111111111111111"
        );
    }

    #[test]
    fn unit_limit_encoding() {
        let ix = set_compute_unit_limit(200_000);
        assert_eq!(ix.data[0], 2);
        assert_eq!(&ix.data[1..], &200_000u32.to_le_bytes());
        assert!(ix.accounts.is_empty());
        assert!(is_set_compute_unit_limit(&ix));
        assert!(!is_set_compute_unit_price(&ix));
    }

    #[test]
    fn unit_price_encoding() {
        let ix = set_compute_unit_price(5_000);
        assert_eq!(ix.data.len(), 9);
        assert_eq!(ix.data[0], 3);
        assert_eq!(&ix.data[1..], &5_000u64.to_le_bytes());
        assert!(is_set_compute_unit_price(&ix));
    }
}
