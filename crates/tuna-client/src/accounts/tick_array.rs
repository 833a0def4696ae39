use borsh::{BorshDeserialize, BorshSerialize};
use sol_core::Pubkey;

use crate::codec::AccountData;
use crate::tick::TICK_ARRAY_SIZE;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Tick {
    pub initialized: bool,
    pub liquidity_net: i128,
    pub liquidity_gross: u128,
    pub fee_growth_outside_a: u128,
    pub fee_growth_outside_b: u128,
    pub reward_growths_outside: [u128; 3],
}

/// An Orca tick array: 88 consecutive initializable ticks of one pool.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct TickArray {
    pub start_tick_index: i32,
    pub ticks: [Tick; TICK_ARRAY_SIZE],
    pub whirlpool: Pubkey,
}

impl AccountData for TickArray {
    const NAME: &'static str = "TickArray";
    const DISCRIMINATOR: [u8; 8] = [0x45, 0x61, 0xbd, 0xbe, 0x6e, 0x07, 0x42, 0xbb];
    const LEN: usize = 9988;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_size_matches_len() {
        let mut array = TickArray {
            start_tick_index: -5632,
            ticks: [Tick::default(); TICK_ARRAY_SIZE],
            whirlpool: Pubkey([6; 32]),
        };
        array.ticks[3].initialized = true;
        array.ticks[3].liquidity_net = -42;

        let bytes = array.to_bytes().unwrap();
        assert_eq!(bytes.len(), TickArray::LEN);
        assert_eq!(&bytes[TickArray::LEN - 32..], &[6; 32]);
        assert_eq!(TickArray::from_bytes(&bytes).unwrap(), array);
    }
}
