//! Enums and helper structs shared by accounts and instructions.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;

/// The AMM a market and its positions trade through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, BorshSerialize, BorshDeserialize, Serialize,
)]
pub enum MarketMaker {
    Orca,
    Fusion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub enum TunaPositionState {
    Normal,
    Liquidated,
    ClosedByLimitOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub enum PoolToken {
    A,
    B,
}

/// Kind of a slice of remaining accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub enum AccountsType {
    SwapTickArrays,
    TickArrayLower,
    TickArrayUpper,
    PoolVaultTokenA,
    PoolVaultTokenB,
    WhirlpoolOracle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
pub struct RemainingAccountsSlice {
    pub accounts_type: AccountsType,
    pub length: u8,
}

/// Describes how the accounts appended after the named ones are grouped.
/// Slices appear in the same order as the accounts they describe.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize,
)]
pub struct RemainingAccountsInfo {
    pub slices: Vec<RemainingAccountsSlice>,
}

impl RemainingAccountsInfo {
    /// Total number of accounts covered by all slices.
    pub fn account_count(&self) -> usize {
        self.slices.iter().map(|s| s.length as usize).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_encode_as_one_byte() {
        assert_eq!(borsh::to_vec(&MarketMaker::Fusion).unwrap(), vec![1]);
        assert_eq!(
            borsh::to_vec(&TunaPositionState::ClosedByLimitOrder).unwrap(),
            vec![2]
        );
        assert_eq!(borsh::to_vec(&AccountsType::WhirlpoolOracle).unwrap(), vec![5]);
    }

    #[test]
    fn unknown_enum_variant_rejected() {
        assert!(borsh::from_slice::<MarketMaker>(&[2]).is_err());
    }

    #[test]
    fn remaining_accounts_info_layout() {
        let info = RemainingAccountsInfo {
            slices: vec![
                RemainingAccountsSlice {
                    accounts_type: AccountsType::SwapTickArrays,
                    length: 5,
                },
                RemainingAccountsSlice {
                    accounts_type: AccountsType::PoolVaultTokenA,
                    length: 1,
                },
            ],
        };
        // u32 length prefix, then (variant, length) pairs.
        assert_eq!(borsh::to_vec(&info).unwrap(), vec![2, 0, 0, 0, 0, 5, 3, 1]);
        assert_eq!(info.account_count(), 6);
    }
}
