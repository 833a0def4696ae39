//! SPL Token, Token-2022 and Associated Token Account helpers.
//!
//! Only the handful of instructions a client needs to prepare and tear down
//! token accounts around a program call: idempotent ATA creation, wrapped
//! SOL syncing, and account closing.

use crate::error::SolError;
use crate::instruction::{AccountMeta, Instruction};
use crate::pda::find_program_address;
use crate::pubkey::Pubkey;
use crate::system::SYSTEM_PROGRAM_ID;

// ---------------------------------------------------------------------------
// Well-known program IDs
// ---------------------------------------------------------------------------

/// SPL Token Program ID: `TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA`
pub const TOKEN_PROGRAM_ID: Pubkey = Pubkey([
    0x06, 0xdd, 0xf6, 0xe1, 0xd7, 0x65, 0xa1, 0x93, 0xd9, 0xcb, 0xe1, 0x46, 0xce, 0xeb, 0x79, 0xac,
    0x1c, 0xb4, 0x85, 0xed, 0x5f, 0x5b, 0x37, 0x91, 0x3a, 0x8c, 0xf5, 0x85, 0x7e, 0xff, 0x00, 0xa9,
]);

/// Token-2022 Program ID: `TokenzQdBNbLqP5VEhdkAS6EPFLC1PHnBqCXEpPxuEb`
pub const TOKEN_2022_PROGRAM_ID: Pubkey = Pubkey([
    0x06, 0xdd, 0xf6, 0xe1, 0xee, 0x75, 0x8f, 0xde, 0x18, 0x42, 0x5d, 0xbc, 0xe4, 0x6c, 0xcd, 0xda,
    0xb6, 0x1a, 0xfc, 0x4d, 0x83, 0xb9, 0x0d, 0x27, 0xfe, 0xbd, 0xf9, 0x28, 0xd8, 0xa1, 0x8b, 0xfc,
]);

/// Associated Token Account Program ID: `ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL`
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey = Pubkey([
    0x8c, 0x97, 0x25, 0x8f, 0x4e, 0x24, 0x89, 0xf1, 0xbb, 0x3d, 0x10, 0x29, 0x14, 0x8e, 0x0d, 0x83,
    0x0b, 0x5a, 0x13, 0x99, 0xda, 0xff, 0x10, 0x84, 0x04, 0x8e, 0x7b, 0xd8, 0xdb, 0xe9, 0xf8, 0x59,
]);

/// Memo Program v2: `MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr`
pub const MEMO_PROGRAM_ID: Pubkey = Pubkey([
    0x05, 0x4a, 0x53, 0x5a, 0x99, 0x29, 0x21, 0x06, 0x4d, 0x24, 0xe8, 0x71, 0x60, 0xda, 0x38, 0x7c,
    0x7c, 0x35, 0xb5, 0xdd, 0xbc, 0x92, 0xbb, 0x81, 0xe4, 0x1f, 0xa8, 0x40, 0x41, 0x05, 0x44, 0x8d,
]);

/// Wrapped SOL mint: `So11111111111111111111111111111111111111112`
pub const NATIVE_MINT: Pubkey = Pubkey([
    0x06, 0x9b, 0x88, 0x57, 0xfe, 0xab, 0x81, 0x84, 0xfb, 0x68, 0x7f, 0x63, 0x46, 0x18, 0xc0, 0x35,
    0xda, 0xc4, 0x39, 0xdc, 0x1a, 0xeb, 0x3b, 0x55, 0x98, 0xa0, 0xf0, 0x00, 0x00, 0x00, 0x00, 0x01,
]);

/// SPL Token `CloseAccount` instruction index.
const CLOSE_ACCOUNT_IX_INDEX: u8 = 9;
/// SPL Token `SyncNative` instruction index.
const SYNC_NATIVE_IX_INDEX: u8 = 17;
/// Associated Token Account `CreateIdempotent` instruction index.
const CREATE_IDEMPOTENT_IX_INDEX: u8 = 1;

/// Whether `program_id` is one of the two token programs.
pub fn is_token_program(program_id: &Pubkey) -> bool {
    *program_id == TOKEN_PROGRAM_ID || *program_id == TOKEN_2022_PROGRAM_ID
}

// ---------------------------------------------------------------------------
// Associated Token Account (PDA) derivation
// ---------------------------------------------------------------------------

/// Derive the associated token account address for a wallet + mint pair.
///
/// The ATA is a PDA of the Associated Token Account program with seeds
/// `[wallet, token_program_id, mint]`. Token-2022 mints use the Token-2022
/// program id as the middle seed, so the same wallet + mint pair maps to a
/// different address under each token program.
pub fn get_associated_token_address(
    wallet: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<Pubkey, SolError> {
    find_program_address(
        &[wallet.as_ref(), token_program.as_ref(), mint.as_ref()],
        &ASSOCIATED_TOKEN_PROGRAM_ID,
    )
    .map(|(address, _bump)| address)
}

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

/// Create the associated token account for `(owner, mint)` unless it exists.
///
/// Unlike the plain `Create` instruction this succeeds when the account is
/// already present, so it is safe to include even if another transaction
/// created the account first.
pub fn create_associated_token_account_idempotent(
    payer: &Pubkey,
    owner: &Pubkey,
    mint: &Pubkey,
    token_program: &Pubkey,
) -> Result<Instruction, SolError> {
    let ata = get_associated_token_address(owner, mint, token_program)?;
    Ok(Instruction {
        program_id: ASSOCIATED_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(ata, false),
            AccountMeta::new_readonly(*owner, false),
            AccountMeta::new_readonly(*mint, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(*token_program, false),
        ],
        data: vec![CREATE_IDEMPOTENT_IX_INDEX],
    })
}

/// Bring a wrapped SOL account's token amount in line with its lamports.
pub fn sync_native(account: &Pubkey, token_program: &Pubkey) -> Instruction {
    Instruction {
        program_id: *token_program,
        accounts: vec![AccountMeta::new(*account, false)],
        data: vec![SYNC_NATIVE_IX_INDEX],
    }
}

/// Close a token account, sending its lamports to `destination`.
pub fn close_account(
    account: &Pubkey,
    destination: &Pubkey,
    owner: &Pubkey,
    token_program: &Pubkey,
) -> Instruction {
    Instruction {
        program_id: *token_program,
        accounts: vec![
            AccountMeta::new(*account, false),
            AccountMeta::new(*destination, false),
            AccountMeta::new_readonly(*owner, true),
        ],
        data: vec![CLOSE_ACCOUNT_IX_INDEX],
    }
}
