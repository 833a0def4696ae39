use borsh::{BorshDeserialize, BorshSerialize};
use serde::Serialize;
use sol_core::Pubkey;

use crate::codec::AccountData;
use crate::types::MarketMaker;

/// Per-pool leverage and liquidation configuration, at `["market", pool]`.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Market {
    pub version: u16,
    pub bump: [u8; 1],
    pub market_maker: MarketMaker,
    pub pool: Pubkey,
    pub address_lookup_table: Pubkey,
    pub max_leverage: u32,
    pub protocol_fee: u16,
    pub protocol_fee_on_collateral: u16,
    pub liquidation_fee: u32,
    pub liquidation_threshold: u32,
    pub limit_order_execution_fee: u32,
    pub oracle_price_deviation_threshold: u32,
    pub disabled: bool,
    pub borrowed_shares_a: u64,
    pub borrowed_shares_b: u64,
    pub borrow_limit_a: u64,
    pub borrow_limit_b: u64,
    pub max_swap_slippage: u32,
    pub rebalance_protocol_fee: u32,
    #[serde(skip_serializing)]
    pub reserved: [u8; 64],
}

impl AccountData for Market {
    const NAME: &'static str = "Market";
    const DISCRIMINATOR: [u8; 8] = [0xdb, 0xbe, 0xd5, 0x37, 0x00, 0xe3, 0xc6, 0x9a];
    const LEN: usize = 205;
}

impl Market {
    /// The market's lookup table, if one was configured.
    pub fn lookup_table(&self) -> Option<Pubkey> {
        (self.address_lookup_table != Pubkey::default()).then_some(self.address_lookup_table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Market {
        Market {
            version: 1,
            bump: [250],
            market_maker: MarketMaker::Fusion,
            pool: Pubkey([5; 32]),
            address_lookup_table: Pubkey::default(),
            max_leverage: 5_000_000,
            protocol_fee: 1_000,
            protocol_fee_on_collateral: 500,
            liquidation_fee: 10_000,
            liquidation_threshold: 850_000,
            limit_order_execution_fee: 1_000,
            oracle_price_deviation_threshold: 20_000,
            disabled: false,
            borrowed_shares_a: 0,
            borrowed_shares_b: 0,
            borrow_limit_a: 1 << 40,
            borrow_limit_b: 1 << 40,
            max_swap_slippage: 0,
            rebalance_protocol_fee: 0,
            reserved: [0; 64],
        }
    }

    #[test]
    fn encoded_size_matches_len() {
        let bytes = sample().to_bytes().unwrap();
        assert_eq!(bytes.len(), Market::LEN);
        assert_eq!(bytes[11], 1);
        assert_eq!(&bytes[12..44], &[5; 32]);
        assert_eq!(Market::from_bytes(&bytes).unwrap(), sample());
    }

    #[test]
    fn default_lookup_table_is_none() {
        let mut market = sample();
        assert_eq!(market.lookup_table(), None);
        market.address_lookup_table = Pubkey([9; 32]);
        assert_eq!(market.lookup_table(), Some(Pubkey([9; 32])));
    }
}
