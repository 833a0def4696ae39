//! Program Derived Address (PDA) derivation.
//!
//! A PDA is `SHA-256(seed_0 || .. || seed_n || program_id || "ProgramDerivedAddress")`
//! that is NOT a valid Ed25519 point. `find_program_address` appends a bump
//! seed, searching from 255 down to 0, and returns the first off-curve hash.

use sha2::{Digest, Sha256};

use crate::error::SolError;
use crate::pubkey::Pubkey;

/// The string appended to PDA derivation: "ProgramDerivedAddress".
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

pub const MAX_SEEDS: usize = 16;
pub const MAX_SEED_LEN: usize = 32;

/// Derive the PDA for an exact seed list (the bump, if any, is one of the seeds).
///
/// Fails with `InvalidSeeds` when the result lands on the curve.
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey, SolError> {
    check_seeds(seeds)?;

    let mut hasher = Sha256::new();
    for seed in seeds {
        hasher.update(seed);
    }
    hasher.update(program_id);
    hasher.update(PDA_MARKER);

    let hash: [u8; 32] = hasher.finalize().into();
    let address = Pubkey(hash);

    if address.is_on_curve() {
        return Err(SolError::InvalidSeeds(
            "derived address lies on the ed25519 curve".into(),
        ));
    }

    Ok(address)
}

/// Find a valid PDA and its bump seed for the given seeds and program.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<(Pubkey, u8), SolError> {
    // One slot is reserved for the bump.
    if seeds.len() >= MAX_SEEDS {
        return Err(SolError::InvalidSeeds(format!(
            "at most {} seeds plus a bump, got {}",
            MAX_SEEDS - 1,
            seeds.len()
        )));
    }

    for bump in (0u8..=255).rev() {
        let bump_seed = [bump];
        let mut with_bump: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 1);
        with_bump.extend_from_slice(seeds);
        with_bump.push(&bump_seed);
        match create_program_address(&with_bump, program_id) {
            Ok(address) => return Ok((address, bump)),
            Err(SolError::InvalidSeeds(_)) => {}
            Err(e) => return Err(e),
        }
    }

    Err(SolError::NoViableBump)
}

fn check_seeds(seeds: &[&[u8]]) -> Result<(), SolError> {
    if seeds.len() > MAX_SEEDS {
        return Err(SolError::InvalidSeeds(format!(
            "at most {MAX_SEEDS} seeds, got {}",
            seeds.len()
        )));
    }
    if let Some((i, seed)) = seeds.iter().enumerate().find(|(_, s)| s.len() > MAX_SEED_LEN) {
        return Err(SolError::InvalidSeeds(format!(
            "seed {i} is {} bytes, max {MAX_SEED_LEN}",
            seed.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pda_is_not_on_curve() {
        let program = Pubkey([0x11; 32]);
        let (address, _bump) = find_program_address(&[b"vault", &[0xAA; 32]], &program).unwrap();
        assert!(!address.is_on_curve(), "PDA must NOT be on the Ed25519 curve");
    }

    #[test]
    fn pda_derivation_is_deterministic() {
        let program = Pubkey([0x22; 32]);
        let a = find_program_address(&[b"tuna_config"], &program).unwrap();
        let b = find_program_address(&[b"tuna_config"], &program).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn bump_reproduces_address() {
        let program = Pubkey([0x33; 32]);
        let seeds: &[&[u8]] = &[b"market", &[0x44; 32]];
        let (address, bump) = find_program_address(seeds, &program).unwrap();
        let recreated =
            create_program_address(&[seeds[0], seeds[1], &[bump]], &program).unwrap();
        assert_eq!(address, recreated);
    }

    #[test]
    fn different_programs_give_different_addresses() {
        let a = find_program_address(&[b"vault"], &Pubkey([1; 32])).unwrap().0;
        let b = find_program_address(&[b"vault"], &Pubkey([2; 32])).unwrap().0;
        assert_ne!(a, b);
    }

    #[test]
    fn oversized_seed_rejected() {
        let long = [0u8; 33];
        let err = find_program_address(&[&long], &Pubkey::default()).unwrap_err();
        assert!(matches!(err, SolError::InvalidSeeds(_)));
    }

    #[test]
    fn too_many_seeds_rejected() {
        let seeds: Vec<&[u8]> = vec![b"x"; MAX_SEEDS];
        assert!(find_program_address(&seeds, &Pubkey::default()).is_err());
    }

    #[test]
    fn known_associated_token_address() {
        // Wallet 8ZUczUAUZbMbRFL4JSLbz8Kp5tmrR2B9TZtYXWPHnLVP, USDC mint.
        let wallet: Pubkey = "8ZUczUAUZbMbRFL4JSLbz8Kp5tmrR2B9TZtYXWPHnLVP".parse().unwrap();
        let usdc: Pubkey = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v".parse().unwrap();
        let token: Pubkey = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA".parse().unwrap();
        let ata_program: Pubkey = "ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL".parse().unwrap();

        let (ata, bump) =
            find_program_address(&[wallet.as_ref(), token.as_ref(), usdc.as_ref()], &ata_program)
                .unwrap();
        assert_eq!(ata.to_string(), "5PrqR3U1uqjHRvDqWTcL3w5wLpHrf2uD1TkkCB7nuyqA");
        assert_eq!(bump, 251);
        assert!(!ata.is_on_curve());
    }
}
