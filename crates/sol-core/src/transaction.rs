//! Solana message compilation, wire format and signing.
//!
//! The wire format is a compact binary layout:
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     [0x80]                version prefix, v0 messages only
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!     num_table_lookups     compact-u16, v0 messages only
//!     table_lookups[]       key, compact-u16 + writable indexes, compact-u16 + readonly indexes
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```

use crate::error::SolError;
use crate::instruction::Instruction;
use crate::keypair::Keypair;
use crate::lookup_table::AddressLookupTable;
use crate::pubkey::Pubkey;

const V0_PREFIX: u8 = 0x80;

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

fn push_compact_len(buf: &mut Vec<u8>, len: usize) -> Result<(), SolError> {
    let len = u16::try_from(len)
        .map_err(|_| SolError::SerializationError(format!("length {len} exceeds compact-u16")))?;
    buf.extend_from_slice(&encode_compact_u16(len));
    Ok(())
}

// ---------------------------------------------------------------------------
// Data structures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageVersion {
    Legacy,
    V0,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    /// Number of required signatures (first N account keys are signers).
    pub num_required_signatures: u8,
    /// How many of the signing accounts are read-only.
    pub num_readonly_signed: u8,
    /// How many of the non-signing static accounts are read-only.
    pub num_readonly_unsigned: u8,
}

/// A compiled instruction where account references are replaced by u8 indices
/// into the message's full account list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

/// Accounts a v0 message loads from one lookup table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAddressTableLookup {
    pub account_key: Pubkey,
    pub writable_indexes: Vec<u8>,
    pub readonly_indexes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub version: MessageVersion,
    pub header: MessageHeader,
    /// Static account keys in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
    pub address_table_lookups: Vec<MessageAddressTableLookup>,
}

struct AccountEntry {
    pubkey: Pubkey,
    is_signer: bool,
    is_writable: bool,
    is_invoked: bool,
}

impl AccountEntry {
    fn rank(&self) -> u8 {
        match (self.is_signer, self.is_writable) {
            (true, true) => 0,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        }
    }
}

/// Collect unique account keys with merged permission bits, fee payer first.
fn collect_entries(instructions: &[Instruction], fee_payer: &Pubkey) -> Vec<AccountEntry> {
    let mut entries: Vec<AccountEntry> = Vec::new();

    let mut upsert = |pubkey: Pubkey, signer: bool, writable: bool, invoked: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
            entry.is_invoked |= invoked;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
                is_invoked: invoked,
            });
        }
    };

    // Fee payer is always signer + writable.
    upsert(*fee_payer, true, true, false);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable, false);
        }
        // Program IDs are non-signer, read-only accounts.
        upsert(ix.program_id, false, false, true);
    }

    // Stable sort keeps insertion order within a category, so the fee payer
    // stays at index 0.
    entries.sort_by_key(AccountEntry::rank);
    entries
}

fn header_for(entries: &[AccountEntry]) -> Result<MessageHeader, SolError> {
    let count = |pred: fn(&AccountEntry) -> bool| -> Result<u8, SolError> {
        u8::try_from(entries.iter().filter(|e| pred(e)).count())
            .map_err(|_| SolError::TransactionBuildError("too many accounts".into()))
    };
    Ok(MessageHeader {
        num_required_signatures: count(|e| e.is_signer)?,
        num_readonly_signed: count(|e| e.is_signer && !e.is_writable)?,
        num_readonly_unsigned: count(|e| !e.is_signer && !e.is_writable)?,
    })
}

fn compile_instructions(
    instructions: &[Instruction],
    all_keys: &[Pubkey],
) -> Result<Vec<CompiledInstruction>, SolError> {
    let index_of = |key: &Pubkey| -> Result<u8, SolError> {
        let pos = all_keys.iter().position(|k| k == key).ok_or_else(|| {
            SolError::TransactionBuildError(format!("account {key} not in account keys"))
        })?;
        u8::try_from(pos).map_err(|_| {
            SolError::TransactionBuildError("message references more than 256 accounts".into())
        })
    };

    instructions
        .iter()
        .map(|ix| {
            Ok(CompiledInstruction {
                program_id_index: index_of(&ix.program_id)?,
                account_indices: ix
                    .accounts
                    .iter()
                    .map(|meta| index_of(&meta.pubkey))
                    .collect::<Result<_, _>>()?,
                data: ix.data.clone(),
            })
        })
        .collect()
}

impl Message {
    /// Compile a legacy message with a single fee payer.
    pub fn compile_legacy(
        instructions: &[Instruction],
        fee_payer: &Pubkey,
        recent_blockhash: &[u8; 32],
    ) -> Result<Self, SolError> {
        let entries = collect_entries(instructions, fee_payer);
        let header = header_for(&entries)?;
        let account_keys: Vec<Pubkey> = entries.iter().map(|e| e.pubkey).collect();
        let compiled = compile_instructions(instructions, &account_keys)?;

        Ok(Self {
            version: MessageVersion::Legacy,
            header,
            account_keys,
            recent_blockhash: *recent_blockhash,
            instructions: compiled,
            address_table_lookups: Vec::new(),
        })
    }

    /// Compile a v0 message, moving every non-signer, non-program account
    /// found in `lookup_tables` out of the static key list.
    pub fn compile_v0(
        instructions: &[Instruction],
        fee_payer: &Pubkey,
        lookup_tables: &[AddressLookupTable],
        recent_blockhash: &[u8; 32],
    ) -> Result<Self, SolError> {
        let entries = collect_entries(instructions, fee_payer);

        let mut static_entries = Vec::new();
        let mut lookups: Vec<MessageAddressTableLookup> = lookup_tables
            .iter()
            .map(|t| MessageAddressTableLookup {
                account_key: t.key,
                writable_indexes: Vec::new(),
                readonly_indexes: Vec::new(),
            })
            .collect();
        let mut loaded_writable: Vec<Pubkey> = Vec::new();
        let mut loaded_readonly: Vec<Pubkey> = Vec::new();

        for entry in entries {
            let found = if entry.is_signer || entry.is_invoked {
                None
            } else {
                lookup_tables
                    .iter()
                    .enumerate()
                    .find_map(|(t, table)| table.index_of(&entry.pubkey).map(|i| (t, i)))
            };

            match found {
                Some((t, index)) if entry.is_writable => {
                    lookups[t].writable_indexes.push(index);
                    loaded_writable.push(entry.pubkey);
                }
                Some((t, index)) => {
                    lookups[t].readonly_indexes.push(index);
                    loaded_readonly.push(entry.pubkey);
                }
                None => static_entries.push(entry),
            }
        }

        // Loaded addresses are addressed table by table, writable ones first.
        let mut writable_by_table: Vec<Pubkey> = Vec::new();
        let mut readonly_by_table: Vec<Pubkey> = Vec::new();
        for (lookup, table) in lookups.iter().zip(lookup_tables) {
            writable_by_table.extend(
                lookup
                    .writable_indexes
                    .iter()
                    .map(|&i| table.addresses[i as usize]),
            );
            readonly_by_table.extend(
                lookup
                    .readonly_indexes
                    .iter()
                    .map(|&i| table.addresses[i as usize]),
            );
        }
        debug_assert_eq!(writable_by_table.len(), loaded_writable.len());
        debug_assert_eq!(readonly_by_table.len(), loaded_readonly.len());

        let header = header_for(&static_entries)?;
        let account_keys: Vec<Pubkey> = static_entries.iter().map(|e| e.pubkey).collect();

        let all_keys: Vec<Pubkey> = account_keys
            .iter()
            .chain(&writable_by_table)
            .chain(&readonly_by_table)
            .copied()
            .collect();
        let compiled = compile_instructions(instructions, &all_keys)?;

        lookups.retain(|l| !l.writable_indexes.is_empty() || !l.readonly_indexes.is_empty());

        Ok(Self {
            version: MessageVersion::V0,
            header,
            account_keys,
            recent_blockhash: *recent_blockhash,
            instructions: compiled,
            address_table_lookups: lookups,
        })
    }

    /// The keys whose signatures this message requires, in signature order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.header.num_required_signatures as usize]
    }

    /// Serialize the message (the bytes that get signed).
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let mut buf = Vec::with_capacity(256);

        if self.version == MessageVersion::V0 {
            buf.push(V0_PREFIX);
        }

        // Header: 3 bytes.
        buf.push(self.header.num_required_signatures);
        buf.push(self.header.num_readonly_signed);
        buf.push(self.header.num_readonly_unsigned);

        push_compact_len(&mut buf, self.account_keys.len())?;
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_ref());
        }

        buf.extend_from_slice(&self.recent_blockhash);

        push_compact_len(&mut buf, self.instructions.len())?;
        for ix in &self.instructions {
            buf.push(ix.program_id_index);
            push_compact_len(&mut buf, ix.account_indices.len())?;
            buf.extend_from_slice(&ix.account_indices);
            push_compact_len(&mut buf, ix.data.len())?;
            buf.extend_from_slice(&ix.data);
        }

        if self.version == MessageVersion::V0 {
            push_compact_len(&mut buf, self.address_table_lookups.len())?;
            for lookup in &self.address_table_lookups {
                buf.extend_from_slice(lookup.account_key.as_ref());
                push_compact_len(&mut buf, lookup.writable_indexes.len())?;
                buf.extend_from_slice(&lookup.writable_indexes);
                push_compact_len(&mut buf, lookup.readonly_indexes.len())?;
                buf.extend_from_slice(&lookup.readonly_indexes);
            }
        }

        Ok(buf)
    }
}

// ---------------------------------------------------------------------------
// Signed transactions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<[u8; 64]>,
    pub message: Message,
}

impl Transaction {
    /// A transaction with zeroed signatures, for simulation without
    /// signature verification.
    pub fn new_unsigned(message: Message) -> Self {
        let n = message.header.num_required_signatures as usize;
        Self {
            signatures: vec![[0u8; 64]; n],
            message,
        }
    }

    /// Sign `message` with every required signer.
    ///
    /// Fails with `MissingSigner` if a required key has no keypair in
    /// `signers`; extra keypairs are ignored.
    pub fn sign(message: Message, signers: &[&Keypair]) -> Result<Self, SolError> {
        let message_bytes = message.serialize()?;
        let signatures = message
            .signer_keys()
            .iter()
            .map(|key| {
                signers
                    .iter()
                    .find(|kp| kp.pubkey() == *key)
                    .map(|kp| kp.sign_message(&message_bytes))
                    .ok_or_else(|| SolError::MissingSigner(key.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            signatures,
            message,
        })
    }

    /// Serialize into the wire format accepted by `sendTransaction`.
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let message_bytes = self.message.serialize()?;
        let mut wire = Vec::with_capacity(3 + 64 * self.signatures.len() + message_bytes.len());
        push_compact_len(&mut wire, self.signatures.len())?;
        for sig in &self.signatures {
            wire.extend_from_slice(sig);
        }
        wire.extend_from_slice(&message_bytes);
        Ok(wire)
    }

    /// The transaction id: Base58 of the fee payer's signature.
    pub fn signature(&self) -> Option<String> {
        self.signatures
            .first()
            .map(|sig| bs58::encode(sig).into_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::AccountMeta;
    use crate::system::{self, SYSTEM_PROGRAM_ID};
    use ed25519_dalek::{Signature, VerifyingKey};

    // -- compact-u16 encoding -----------------------------------------------

    #[test]
    fn compact_u16_zero() {
        assert_eq!(encode_compact_u16(0), vec![0x00]);
    }

    #[test]
    fn compact_u16_one_byte_max() {
        assert_eq!(encode_compact_u16(0x7f), vec![0x7f]);
    }

    #[test]
    fn compact_u16_boundary_128() {
        assert_eq!(encode_compact_u16(128), vec![0x80, 0x01]);
    }

    #[test]
    fn compact_u16_boundary_16384() {
        assert_eq!(encode_compact_u16(16384), vec![0x80, 0x80, 0x01]);
    }

    #[test]
    fn compact_u16_max_value() {
        assert_eq!(encode_compact_u16(u16::MAX), vec![0xff, 0xff, 0x03]);
    }

    // -- Legacy compilation -------------------------------------------------

    #[test]
    fn legacy_account_order() {
        let from = Pubkey([1; 32]);
        let to = Pubkey([2; 32]);
        let ix = system::transfer(&from, &to, 1000);
        let msg = Message::compile_legacy(&[ix], &from, &[0xAA; 32]).unwrap();

        // from (signer+writable), to (writable), system program (read-only)
        assert_eq!(msg.account_keys, vec![from, to, SYSTEM_PROGRAM_ID]);
        assert_eq!(msg.header.num_required_signatures, 1);
        assert_eq!(msg.header.num_readonly_signed, 0);
        assert_eq!(msg.header.num_readonly_unsigned, 1);
        assert_eq!(msg.instructions[0].program_id_index, 2);
        assert_eq!(msg.instructions[0].account_indices, vec![0, 1]);
    }

    #[test]
    fn fee_payer_first_even_if_listed_late() {
        let payer = Pubkey([9; 32]);
        let other_signer = Pubkey([1; 32]);
        let ix = Instruction::new(
            Pubkey([7; 32]),
            vec![AccountMeta::new(other_signer, true), AccountMeta::new(payer, true)],
            vec![],
        );
        let msg = Message::compile_legacy(&[ix], &payer, &[0; 32]).unwrap();
        assert_eq!(msg.account_keys[0], payer);
        assert_eq!(msg.account_keys[1], other_signer);
        assert_eq!(msg.header.num_required_signatures, 2);
    }

    #[test]
    fn duplicate_accounts_merge_permissions() {
        let payer = Pubkey([1; 32]);
        let shared = Pubkey([2; 32]);
        let program = Pubkey([3; 32]);
        let ixs = [
            Instruction::new(program, vec![AccountMeta::new_readonly(shared, false)], vec![]),
            Instruction::new(program, vec![AccountMeta::new(shared, false)], vec![]),
        ];
        let msg = Message::compile_legacy(&ixs, &payer, &[0; 32]).unwrap();
        assert_eq!(msg.account_keys, vec![payer, shared, program]);
        assert_eq!(msg.header.num_readonly_unsigned, 1);
    }

    #[test]
    fn legacy_serialization_has_no_prefix_or_lookups() {
        let from = Pubkey([1; 32]);
        let ix = system::transfer(&from, &Pubkey([2; 32]), 5);
        let msg = Message::compile_legacy(&[ix], &from, &[0xCC; 32]).unwrap();
        let bytes = msg.serialize().unwrap();

        assert_eq!(bytes[0], 1);
        let offset = 3 + 1 + 32 * 3;
        assert_eq!(&bytes[offset..offset + 32], &[0xCC; 32]);
    }

    // -- v0 compilation -----------------------------------------------------

    #[test]
    fn v0_moves_table_accounts_out_of_static_keys() {
        let payer = Pubkey([1; 32]);
        let program = Pubkey([2; 32]);
        let in_table_w = Pubkey([3; 32]);
        let in_table_r = Pubkey([4; 32]);
        let not_in_table = Pubkey([5; 32]);

        let table = AddressLookupTable {
            key: Pubkey([0x7a; 32]),
            addresses: vec![Pubkey([0x10; 32]), in_table_r, in_table_w, program],
        };

        let ix = Instruction::new(
            program,
            vec![
                AccountMeta::new(in_table_w, false),
                AccountMeta::new_readonly(in_table_r, false),
                AccountMeta::new(not_in_table, false),
            ],
            vec![1, 2, 3],
        );

        let msg = Message::compile_v0(&[ix], &payer, &[table], &[0; 32]).unwrap();

        // The invoked program stays static even though the table holds it.
        assert_eq!(msg.account_keys, vec![payer, not_in_table, program]);
        assert_eq!(msg.address_table_lookups.len(), 1);
        assert_eq!(msg.address_table_lookups[0].writable_indexes, vec![2]);
        assert_eq!(msg.address_table_lookups[0].readonly_indexes, vec![1]);

        // static(3) then loaded writable then loaded readonly.
        assert_eq!(msg.instructions[0].program_id_index, 2);
        assert_eq!(msg.instructions[0].account_indices, vec![3, 4, 1]);
    }

    #[test]
    fn v0_drops_unused_tables() {
        let payer = Pubkey([1; 32]);
        let ix = system::transfer(&payer, &Pubkey([2; 32]), 1);
        let unused = AddressLookupTable {
            key: Pubkey([0x55; 32]),
            addresses: vec![Pubkey([0x66; 32])],
        };
        let msg = Message::compile_v0(&[ix], &payer, &[unused], &[0; 32]).unwrap();
        assert!(msg.address_table_lookups.is_empty());
        let bytes = msg.serialize().unwrap();
        assert_eq!(bytes[0], 0x80);
        assert_eq!(*bytes.last().unwrap(), 0);
    }

    #[test]
    fn signers_never_loaded_from_tables() {
        let payer = Pubkey([1; 32]);
        let co_signer = Pubkey([2; 32]);
        let table = AddressLookupTable {
            key: Pubkey([0x7a; 32]),
            addresses: vec![co_signer],
        };
        let ix = Instruction::new(
            Pubkey([3; 32]),
            vec![AccountMeta::new(co_signer, true)],
            vec![],
        );
        let msg = Message::compile_v0(&[ix], &payer, &[table], &[0; 32]).unwrap();
        assert!(msg.account_keys.contains(&co_signer));
        assert!(msg.address_table_lookups.is_empty());
    }

    // -- Signing ------------------------------------------------------------

    #[test]
    fn sign_produces_verifiable_wire_bytes() {
        let kp = Keypair::from_seed(&[0x42; 32]);
        let ix = system::transfer(&kp.pubkey(), &Pubkey([0xBB; 32]), 1_000_000);
        let msg = Message::compile_legacy(&[ix], &kp.pubkey(), &[0xCC; 32]).unwrap();
        let tx = Transaction::sign(msg, &[&kp]).unwrap();
        let wire = tx.serialize().unwrap();

        assert_eq!(wire[0], 0x01);
        let sig_bytes: [u8; 64] = wire[1..65].try_into().unwrap();
        let vk = VerifyingKey::from_bytes(kp.pubkey().as_array()).unwrap();
        assert!(vk
            .verify_strict(&wire[65..], &Signature::from_bytes(&sig_bytes))
            .is_ok());
    }

    #[test]
    fn sign_with_two_signers_orders_signatures() {
        let payer = Keypair::from_seed(&[0x01; 32]);
        let mint = Keypair::from_seed(&[0x02; 32]);
        let ix = Instruction::new(
            Pubkey([5; 32]),
            vec![AccountMeta::new(mint.pubkey(), true)],
            vec![],
        );
        let msg = Message::compile_legacy(&[ix], &payer.pubkey(), &[0; 32]).unwrap();
        let bytes = msg.serialize().unwrap();

        // Signer order is independent of keypair order.
        let tx = Transaction::sign(msg, &[&mint, &payer]).unwrap();
        assert_eq!(tx.signatures.len(), 2);
        assert_eq!(tx.signatures[0], payer.sign_message(&bytes));
        assert_eq!(tx.signatures[1], mint.sign_message(&bytes));
    }

    #[test]
    fn sign_without_required_signer_fails() {
        let payer = Keypair::from_seed(&[0x01; 32]);
        let absent = Pubkey([0x77; 32]);
        let ix = Instruction::new(Pubkey([5; 32]), vec![AccountMeta::new(absent, true)], vec![]);
        let msg = Message::compile_legacy(&[ix], &payer.pubkey(), &[0; 32]).unwrap();
        let err = Transaction::sign(msg, &[&payer]).unwrap_err();
        assert!(matches!(err, SolError::MissingSigner(_)));
    }

    #[test]
    fn unsigned_transaction_has_zero_signatures() {
        let payer = Pubkey([1; 32]);
        let ix = system::transfer(&payer, &Pubkey([2; 32]), 1);
        let msg = Message::compile_legacy(&[ix], &payer, &[0; 32]).unwrap();
        let tx = Transaction::new_unsigned(msg);
        assert_eq!(tx.signatures, vec![[0u8; 64]]);
        let wire = tx.serialize().unwrap();
        assert!(wire[1..65].iter().all(|b| *b == 0));
    }

    #[test]
    fn signature_is_base58_of_first_signature() {
        let kp = Keypair::from_seed(&[0x42; 32]);
        let ix = system::transfer(&kp.pubkey(), &Pubkey([2; 32]), 1);
        let msg = Message::compile_legacy(&[ix], &kp.pubkey(), &[0; 32]).unwrap();
        let tx = Transaction::sign(msg, &[&kp]).unwrap();
        let sig = tx.signature().unwrap();
        assert_eq!(bs58::decode(&sig).into_vec().unwrap(), tx.signatures[0].to_vec());
    }
}
