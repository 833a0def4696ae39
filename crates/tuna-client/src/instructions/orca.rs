//! Leveraged liquidity positions in Orca Whirlpools.

use super::position::{
    AddLiquidityArgs, CollectAndCompoundFeesArgs, CollectFeesArgs, LiquidateTunaLpPositionArgs,
    OpenTunaLpPositionArgs, RemoveLiquidityArgs,
};

tuna_instruction! {
    /// Open an empty leveraged position in an Orca Whirlpool.
    ///
    /// `tuna_position_mint` is a fresh keypair that signs the transaction.
    OpenTunaLpPositionOrca: "open_tuna_lp_position_orca",
    [0x88, 0x3d, 0xba, 0xfc, 0x34, 0x75, 0x2d, 0x29],
    OpenTunaLpPositionArgs {
        authority: ws,
        tuna_config: r,
        mint_a: r,
        mint_b: r,
        market: r,
        tuna_position: w,
        tuna_position_mint: ws,
        tuna_position_ata: w,
        whirlpool: r,
        orca_position: w,
        token_program_a: r,
        token_program_b: r,
        whirlpool_program: r,
        token_2022_program: r,
        system_program: r,
        associated_token_program: r,
    }
}

tuna_instruction! {
    AddLiquidityOrca: "add_liquidity_orca",
    [0xb9, 0x44, 0x29, 0xcc, 0x21, 0xb3, 0x0c, 0x4e],
    AddLiquidityArgs {
        authority: ws,
        tuna_config: r,
        mint_a: r,
        mint_b: r,
        token_program_a: r,
        token_program_b: r,
        market: w,
        vault_a: w,
        vault_b: w,
        vault_a_ata: w,
        vault_b_ata: w,
        tuna_position: w,
        tuna_position_ata: r,
        tuna_position_ata_a: w,
        tuna_position_ata_b: w,
        tuna_position_owner_ata_a: w,
        tuna_position_owner_ata_b: w,
        fee_recipient_ata_a: w,
        fee_recipient_ata_b: w,
        pyth_oracle_price_feed_a: r,
        pyth_oracle_price_feed_b: r,
        whirlpool_program: r,
        whirlpool: w,
        orca_position: w,
        memo_program: r,
    }
}

tuna_instruction! {
    RemoveLiquidityOrca: "remove_liquidity_orca",
    [0x1e, 0x45, 0x2d, 0xaa, 0xb7, 0xc3, 0x0c, 0x77],
    RemoveLiquidityArgs {
        authority: ws,
        tuna_config: r,
        mint_a: r,
        mint_b: r,
        token_program_a: r,
        token_program_b: r,
        market: w,
        vault_a: w,
        vault_b: w,
        vault_a_ata: w,
        vault_b_ata: w,
        tuna_position: w,
        tuna_position_ata: r,
        tuna_position_ata_a: w,
        tuna_position_ata_b: w,
        tuna_position_owner_ata_a: w,
        tuna_position_owner_ata_b: w,
        pyth_oracle_price_feed_a: r,
        pyth_oracle_price_feed_b: r,
        whirlpool_program: r,
        whirlpool: w,
        orca_position: w,
        memo_program: r,
    }
}

tuna_instruction! {
    /// Close an empty position, burning its position token.
    CloseTunaLpPositionOrca: "close_tuna_lp_position_orca",
    [0x1a, 0x8d, 0x70, 0xbe, 0x43, 0x17, 0x74, 0xa0],
    () {
        authority: ws,
        tuna_config: r,
        mint_a: r,
        mint_b: r,
        market: r,
        tuna_position: w,
        tuna_position_mint: w,
        tuna_position_ata: w,
        tuna_position_ata_a: w,
        tuna_position_ata_b: w,
        whirlpool: r,
        orca_position: w,
        token_program_a: r,
        token_program_b: r,
        whirlpool_program: r,
        token_2022_program: r,
    }
}

tuna_instruction! {
    CollectFeesOrca: "collect_fees_orca",
    [0x93, 0xbc, 0xbf, 0x25, 0xff, 0x0a, 0xef, 0x4c],
    CollectFeesArgs {
        authority: ws,
        tuna_config: r,
        mint_a: r,
        mint_b: r,
        token_program_a: r,
        token_program_b: r,
        tuna_position: w,
        tuna_position_ata: r,
        tuna_position_ata_a: w,
        tuna_position_ata_b: w,
        tuna_position_owner_ata_a: w,
        tuna_position_owner_ata_b: w,
        whirlpool_program: r,
        whirlpool: w,
        orca_position: w,
        memo_program: r,
    }
}

tuna_instruction! {
    /// Same accounts as add-liquidity: compounding re-adds the fees and may borrow.
    CollectAndCompoundFeesOrca: "collect_and_compound_fees_orca",
    [0xd5, 0x2c, 0xab, 0x4a, 0xd1, 0x0d, 0x89, 0x00],
    CollectAndCompoundFeesArgs {
        authority: ws,
        tuna_config: r,
        mint_a: r,
        mint_b: r,
        token_program_a: r,
        token_program_b: r,
        market: w,
        vault_a: w,
        vault_b: w,
        vault_a_ata: w,
        vault_b_ata: w,
        tuna_position: w,
        tuna_position_ata: r,
        tuna_position_ata_a: w,
        tuna_position_ata_b: w,
        tuna_position_owner_ata_a: w,
        tuna_position_owner_ata_b: w,
        fee_recipient_ata_a: w,
        fee_recipient_ata_b: w,
        pyth_oracle_price_feed_a: r,
        pyth_oracle_price_feed_b: r,
        whirlpool_program: r,
        whirlpool: w,
        orca_position: w,
        memo_program: r,
    }
}

tuna_instruction! {
    /// `authority` must be the configured liquidator authority.
    LiquidateTunaLpPositionOrca: "liquidate_tuna_lp_position_orca",
    [0xbe, 0xd8, 0xd9, 0x3a, 0x0f, 0x56, 0x5b, 0x47],
    LiquidateTunaLpPositionArgs {
        authority: ws,
        tuna_config: r,
        mint_a: r,
        mint_b: r,
        token_program_a: r,
        token_program_b: r,
        market: w,
        vault_a: w,
        vault_b: w,
        vault_a_ata: w,
        vault_b_ata: w,
        tuna_position: w,
        tuna_position_ata: w,
        tuna_position_ata_a: w,
        tuna_position_ata_b: w,
        liquidation_fee_recipient_ata_a: w,
        liquidation_fee_recipient_ata_b: w,
        pyth_oracle_price_feed_a: r,
        pyth_oracle_price_feed_b: r,
        whirlpool_program: r,
        whirlpool: w,
        orca_position: w,
        memo_program: r,
    }
}
