//! Leveraged liquidity positions in Fusion AMM pools.

use super::position::{
    AddLiquidityArgs, CollectAndCompoundFeesArgs, CollectFeesArgs, LiquidateTunaLpPositionArgs,
    OpenTunaLpPositionArgs, RemoveLiquidityArgs,
};

tuna_instruction! {
    /// Open an empty leveraged position in a Fusion AMM pool.
    ///
    /// `tuna_position_mint` is a fresh keypair that signs the transaction.
    OpenTunaLpPositionFusion: "open_tuna_lp_position_fusion",
    [0xaa, 0x8d, 0x73, 0x40, 0x16, 0x1e, 0xb3, 0x0e],
    OpenTunaLpPositionArgs {
        authority: ws,
        tuna_config: r,
        mint_a: r,
        mint_b: r,
        market: r,
        tuna_position: w,
        tuna_position_mint: ws,
        tuna_position_ata: w,
        fusion_pool: r,
        fusion_position: w,
        token_program_a: r,
        token_program_b: r,
        fusionamm_program: r,
        token_2022_program: r,
        system_program: r,
        associated_token_program: r,
    }
}

tuna_instruction! {
    AddLiquidityFusion: "add_liquidity_fusion",
    [0xba, 0xdd, 0x3c, 0x8b, 0x99, 0x0b, 0xc1, 0x0b],
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
        fusionamm_program: r,
        fusion_pool: w,
        fusion_position: w,
        memo_program: r,
    }
}

tuna_instruction! {
    RemoveLiquidityFusion: "remove_liquidity_fusion",
    [0xaf, 0x4a, 0xcd, 0xee, 0x04, 0x7b, 0xa6, 0x23],
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
        fusionamm_program: r,
        fusion_pool: w,
        fusion_position: w,
        memo_program: r,
    }
}

tuna_instruction! {
    /// Close an empty position, burning its position token.
    CloseTunaLpPositionFusion: "close_tuna_lp_position_fusion",
    [0x84, 0xf1, 0x81, 0x19, 0x35, 0xd7, 0xc7, 0xc9],
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
        fusion_pool: r,
        fusion_position: w,
        token_program_a: r,
        token_program_b: r,
        fusionamm_program: r,
        token_2022_program: r,
    }
}

tuna_instruction! {
    CollectFeesFusion: "collect_fees_fusion",
    [0x34, 0xdb, 0x19, 0xfa, 0x1f, 0xcb, 0x09, 0x81],
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
        fusionamm_program: r,
        fusion_pool: w,
        fusion_position: w,
        memo_program: r,
    }
}

tuna_instruction! {
    /// Same accounts as add-liquidity: compounding re-adds the fees and may borrow.
    CollectAndCompoundFeesFusion: "collect_and_compound_fees_fusion",
    [0x3d, 0xd5, 0x1e, 0xc9, 0x59, 0xdc, 0x9c, 0x0d],
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
        fusionamm_program: r,
        fusion_pool: w,
        fusion_position: w,
        memo_program: r,
    }
}

tuna_instruction! {
    /// `authority` must be the configured liquidator authority.
    LiquidateTunaLpPositionFusion: "liquidate_tuna_lp_position_fusion",
    [0x46, 0x43, 0x8e, 0xaf, 0x5f, 0xa3, 0xe5, 0x89],
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
        fusionamm_program: r,
        fusion_pool: w,
        fusion_position: w,
        memo_program: r,
    }
}
