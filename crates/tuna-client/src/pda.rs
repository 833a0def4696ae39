//! Program-derived addresses of Tuna, Orca Whirlpool and Fusion AMM accounts.
//!
//! Every function takes the owning program id explicitly and returns the
//! address with its bump.

use sol_core::{find_program_address, Pubkey, SolError};

pub fn get_tuna_config_address(program_id: &Pubkey) -> Result<(Pubkey, u8), SolError> {
    find_program_address(&[b"tuna_config"], program_id)
}

pub fn get_vault_address(program_id: &Pubkey, mint: &Pubkey) -> Result<(Pubkey, u8), SolError> {
    find_program_address(&[b"vault", mint.as_ref()], program_id)
}

pub fn get_market_address(program_id: &Pubkey, pool: &Pubkey) -> Result<(Pubkey, u8), SolError> {
    find_program_address(&[b"market", pool.as_ref()], program_id)
}

pub fn get_lending_position_address(
    program_id: &Pubkey,
    authority: &Pubkey,
    mint: &Pubkey,
) -> Result<(Pubkey, u8), SolError> {
    find_program_address(
        &[b"lending_position", authority.as_ref(), mint.as_ref()],
        program_id,
    )
}

pub fn get_tuna_position_address(
    program_id: &Pubkey,
    position_mint: &Pubkey,
) -> Result<(Pubkey, u8), SolError> {
    find_program_address(&[b"tuna_position", position_mint.as_ref()], program_id)
}

pub fn get_tuna_spot_position_address(
    program_id: &Pubkey,
    authority: &Pubkey,
    pool: &Pubkey,
) -> Result<(Pubkey, u8), SolError> {
    find_program_address(
        &[b"tuna_spot_position", authority.as_ref(), pool.as_ref()],
        program_id,
    )
}

// ─── Orca Whirlpool ───

pub fn get_orca_position_address(
    whirlpool_program_id: &Pubkey,
    position_mint: &Pubkey,
) -> Result<(Pubkey, u8), SolError> {
    find_program_address(&[b"position", position_mint.as_ref()], whirlpool_program_id)
}

/// Tick arrays are seeded with the decimal string of their start index.
pub fn get_orca_tick_array_address(
    whirlpool_program_id: &Pubkey,
    whirlpool: &Pubkey,
    start_tick_index: i32,
) -> Result<(Pubkey, u8), SolError> {
    let start = start_tick_index.to_string();
    find_program_address(
        &[b"tick_array", whirlpool.as_ref(), start.as_bytes()],
        whirlpool_program_id,
    )
}

pub fn get_orca_oracle_address(
    whirlpool_program_id: &Pubkey,
    whirlpool: &Pubkey,
) -> Result<(Pubkey, u8), SolError> {
    find_program_address(&[b"oracle", whirlpool.as_ref()], whirlpool_program_id)
}

// ─── Fusion AMM ───

pub fn get_fusion_position_address(
    fusionamm_program_id: &Pubkey,
    position_mint: &Pubkey,
) -> Result<(Pubkey, u8), SolError> {
    find_program_address(&[b"position", position_mint.as_ref()], fusionamm_program_id)
}

pub fn get_fusion_tick_array_address(
    fusionamm_program_id: &Pubkey,
    fusion_pool: &Pubkey,
    start_tick_index: i32,
) -> Result<(Pubkey, u8), SolError> {
    let start = start_tick_index.to_string();
    find_program_address(
        &[b"tick_array", fusion_pool.as_ref(), start.as_bytes()],
        fusionamm_program_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{FUSIONAMM_PROGRAM_ID, TUNA_PROGRAM_ID, WHIRLPOOL_PROGRAM_ID};
    use sol_core::create_program_address;

    #[test]
    fn lending_position_is_deterministic() {
        let wallet: Pubkey = "8ZUczUAUZbMbRFL4JSLbz8Kp5tmrR2B9TZtYXWPHnLVP".parse().unwrap();
        let mint: Pubkey = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".parse().unwrap();
        let first = get_lending_position_address(&TUNA_PROGRAM_ID, &wallet, &mint).unwrap();
        let second = get_lending_position_address(&TUNA_PROGRAM_ID, &wallet, &mint).unwrap();
        assert_eq!(first, second);
        assert!(!first.0.is_on_curve());
    }

    #[test]
    fn bump_recreates_address() {
        let mint = Pubkey([0x42; 32]);
        let (vault, bump) = get_vault_address(&TUNA_PROGRAM_ID, &mint).unwrap();
        let recreated =
            create_program_address(&[b"vault", mint.as_ref(), &[bump]], &TUNA_PROGRAM_ID).unwrap();
        assert_eq!(vault, recreated);
    }

    #[test]
    fn seeds_are_not_interchangeable() {
        let key = Pubkey([7; 32]);
        let vault = get_vault_address(&TUNA_PROGRAM_ID, &key).unwrap().0;
        let market = get_market_address(&TUNA_PROGRAM_ID, &key).unwrap().0;
        let position = get_tuna_position_address(&TUNA_PROGRAM_ID, &key).unwrap().0;
        assert_ne!(vault, market);
        assert_ne!(market, position);
    }

    #[test]
    fn same_seeds_differ_per_program() {
        let mint = Pubkey([9; 32]);
        let orca = get_orca_position_address(&WHIRLPOOL_PROGRAM_ID, &mint).unwrap().0;
        let fusion = get_fusion_position_address(&FUSIONAMM_PROGRAM_ID, &mint).unwrap().0;
        assert_ne!(orca, fusion);
    }

    #[test]
    fn tick_array_uses_decimal_start_index() {
        let pool = Pubkey([3; 32]);
        let (derived, _) = get_orca_tick_array_address(&WHIRLPOOL_PROGRAM_ID, &pool, -5632).unwrap();
        let (manual, _) =
            find_program_address(&[b"tick_array", pool.as_ref(), b"-5632"], &WHIRLPOOL_PROGRAM_ID)
                .unwrap();
        assert_eq!(derived, manual);

        let other = get_orca_tick_array_address(&WHIRLPOOL_PROGRAM_ID, &pool, 5632).unwrap().0;
        assert_ne!(derived, other);
    }

    #[test]
    fn spot_position_depends_on_authority_and_pool() {
        let a = get_tuna_spot_position_address(&TUNA_PROGRAM_ID, &Pubkey([1; 32]), &Pubkey([2; 32]))
            .unwrap();
        let b = get_tuna_spot_position_address(&TUNA_PROGRAM_ID, &Pubkey([2; 32]), &Pubkey([1; 32]))
            .unwrap();
        assert_ne!(a.0, b.0);
    }

    #[test]
    fn config_and_oracle_derive() {
        assert!(get_tuna_config_address(&TUNA_PROGRAM_ID).is_ok());
        assert!(get_orca_oracle_address(&WHIRLPOOL_PROGRAM_ID, &Pubkey([5; 32])).is_ok());
        assert!(get_fusion_tick_array_address(&FUSIONAMM_PROGRAM_ID, &Pubkey([5; 32]), 0).is_ok());
    }
}
