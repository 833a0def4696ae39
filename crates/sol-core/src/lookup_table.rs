//! Address lookup table accounts.
//!
//! ```text
//! LookupTable account:
//!   type discriminator          u32 (1 = initialized table)
//!   deactivation_slot           u64
//!   last_extended_slot          u64
//!   last_extended_start_index   u8
//!   authority                   Option<Pubkey> (1 tag byte + 32 bytes)
//!   padding                     u16
//!   addresses                   32 bytes * N   (starting at offset 56)
//! ```

use crate::error::SolError;
use crate::pubkey::Pubkey;

/// Address Lookup Table Program ID: `AddressLookupTab1e1111111111111111111111111`
pub const ADDRESS_LOOKUP_TABLE_PROGRAM_ID: Pubkey = Pubkey([
    0x02, 0x77, 0xa6, 0xaf, 0x97, 0x33, 0x9b, 0x7a, 0xc8, 0x8d, 0x18, 0x92, 0xc9, 0x04, 0x46, 0xf5,
    0x00, 0x02, 0x30, 0x92, 0x66, 0xf6, 0x2e, 0x53, 0xc1, 0x18, 0x24, 0x49, 0x82, 0x00, 0x00, 0x00,
]);

pub const LOOKUP_TABLE_META_SIZE: usize = 56;
const LOOKUP_TABLE_TYPE: u32 = 1;

/// A fetched lookup table: its own address plus the addresses it stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressLookupTable {
    pub key: Pubkey,
    pub addresses: Vec<Pubkey>,
}

impl AddressLookupTable {
    /// Decode the raw account data of lookup table `key`.
    pub fn deserialize(key: Pubkey, data: &[u8]) -> Result<Self, SolError> {
        if data.len() < LOOKUP_TABLE_META_SIZE {
            return Err(SolError::SerializationError(format!(
                "lookup table {key} is {} bytes, shorter than its header",
                data.len()
            )));
        }

        let mut type_tag = [0u8; 4];
        type_tag.copy_from_slice(&data[..4]);
        if u32::from_le_bytes(type_tag) != LOOKUP_TABLE_TYPE {
            return Err(SolError::SerializationError(format!(
                "account {key} is not an initialized lookup table"
            )));
        }

        let body = &data[LOOKUP_TABLE_META_SIZE..];
        if body.len() % 32 != 0 {
            return Err(SolError::SerializationError(format!(
                "lookup table {key} address list is not a multiple of 32 bytes"
            )));
        }

        let addresses = body
            .chunks_exact(32)
            .map(Pubkey::try_from_slice)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { key, addresses })
    }

    /// Position of `address` in this table, if stored.
    pub fn index_of(&self, address: &Pubkey) -> Option<u8> {
        self.addresses
            .iter()
            .position(|a| a == address)
            .and_then(|i| u8::try_from(i).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(addresses: &[Pubkey]) -> Vec<u8> {
        let mut data = vec![0u8; LOOKUP_TABLE_META_SIZE];
        data[..4].copy_from_slice(&LOOKUP_TABLE_TYPE.to_le_bytes());
        data[4..12].copy_from_slice(&u64::MAX.to_le_bytes());
        for a in addresses {
            data.extend_from_slice(a.as_ref());
        }
        data
    }

    #[test]
    fn program_id_roundtrip() {
        assert_eq!(
            ADDRESS_LOOKUP_TABLE_PROGRAM_ID.to_string(),
            "AddressLookupTab1e1111111111111111111111111"
        );
    }

    #[test]
    fn decodes_addresses() {
        let keys = [Pubkey([1; 32]), Pubkey([2; 32]), Pubkey([3; 32])];
        let table = AddressLookupTable::deserialize(Pubkey([9; 32]), &encode(&keys)).unwrap();
        assert_eq!(table.addresses, keys.to_vec());
        assert_eq!(table.index_of(&Pubkey([3; 32])), Some(2));
        assert_eq!(table.index_of(&Pubkey([4; 32])), None);
    }

    #[test]
    fn short_data_rejected() {
        assert!(AddressLookupTable::deserialize(Pubkey::default(), &[1, 0, 0, 0]).is_err());
    }

    #[test]
    fn uninitialized_table_rejected() {
        let mut data = encode(&[]);
        data[0] = 0;
        assert!(AddressLookupTable::deserialize(Pubkey::default(), &data).is_err());
    }

    #[test]
    fn ragged_address_list_rejected() {
        let mut data = encode(&[Pubkey([1; 32])]);
        data.push(0);
        assert!(AddressLookupTable::deserialize(Pubkey::default(), &data).is_err());
    }
}
