use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use sol_core::Pubkey;

use crate::codec::AccountData;

/// Global program configuration. One per program, at the `tuna_config` PDA.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TunaConfig {
    pub version: u16,
    pub bump: [u8; 1],
    pub owner_authority: Pubkey,
    pub admin_authority: Pubkey,
    pub liquidator_authority: Pubkey,
    pub fee_recipient: Pubkey,
    pub max_swap_slippage: u32,
    pub max_percentage_of_leftovers: u32,
    pub oracle_price_deviation_threshold: u32,
    pub suspend_lending_deposits: bool,
    pub suspend_lending_withdrawals: bool,
    pub suspend_add_liquidity: bool,
    pub suspend_remove_liquidity: bool,
    #[serde(skip_serializing)]
    pub reserved: [u8; 64],
}

impl AccountData for TunaConfig {
    const NAME: &'static str = "TunaConfig";
    const DISCRIMINATOR: [u8; 8] = [0x7c, 0x95, 0x18, 0x07, 0xc3, 0xa8, 0x99, 0x3a];
    const LEN: usize = 219;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TunaConfig {
        TunaConfig {
            version: 1,
            bump: [254],
            owner_authority: Pubkey([1; 32]),
            admin_authority: Pubkey([2; 32]),
            liquidator_authority: Pubkey([3; 32]),
            fee_recipient: Pubkey([4; 32]),
            max_swap_slippage: 10_000,
            max_percentage_of_leftovers: 50_000,
            oracle_price_deviation_threshold: 20_000,
            suspend_lending_deposits: false,
            suspend_lending_withdrawals: true,
            suspend_add_liquidity: false,
            suspend_remove_liquidity: false,
            reserved: [0; 64],
        }
    }

    #[test]
    fn encoded_size_matches_len() {
        let bytes = sample().to_bytes().unwrap();
        assert_eq!(bytes.len(), TunaConfig::LEN);
        assert_eq!(TunaConfig::from_bytes(&bytes).unwrap(), sample());
    }

    #[test]
    fn fee_recipient_offset() {
        let bytes = sample().to_bytes().unwrap();
        // discriminator 8 + version 2 + bump 1 + three authorities
        assert_eq!(&bytes[107..139], &[4; 32]);
    }
}
