//! Lending: open a position in a vault, deposit and withdraw.

use borsh::{BorshDeserialize, BorshSerialize};

tuna_instruction! {
    OpenLendingPosition: "open_lending_position",
    [0xae, 0xe3, 0xb5, 0x7f, 0x4e, 0xe3, 0xf4, 0x13],
    () {
        authority: ws,
        tuna_config: r,
        vault: r,
        lending_position: w,
        pool_mint: r,
        system_program: r,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct DepositArgs {
    pub amount: u64,
}

tuna_instruction! {
    Deposit: "deposit",
    [0xf2, 0x23, 0xc6, 0x89, 0x52, 0xe1, 0xf2, 0xb6],
    DepositArgs {
        authority: ws,
        tuna_config: r,
        mint: r,
        vault: w,
        vault_ata: w,
        lending_position: w,
        authority_ata: w,
        token_program: r,
        memo_program: r,
    }
}

/// Either `funds` or `shares` is set; the other is zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct WithdrawArgs {
    pub funds: u64,
    pub shares: u64,
}

tuna_instruction! {
    Withdraw: "withdraw",
    [0xb7, 0x12, 0x46, 0x9c, 0x94, 0x6d, 0xa1, 0x22],
    WithdrawArgs {
        authority: ws,
        tuna_config: r,
        mint: r,
        vault: w,
        vault_ata: w,
        lending_position: w,
        authority_ata: w,
        token_program: r,
        memo_program: r,
    }
}
