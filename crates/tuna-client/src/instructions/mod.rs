//! Tuna instruction builders.
//!
//! Each instruction is a plain struct of its named accounts. The
//! [`TunaInstruction`](crate::codec::TunaInstruction) impl fixes the account
//! order, signer and writable flags, the discriminator and the argument type.
//!
//! Account kinds: `ws` writable signer, `w` writable, `s` read-only signer,
//! `r` read-only.

macro_rules! account_meta {
    ($key:expr, ws) => {
        ::sol_core::AccountMeta::new($key, true)
    };
    ($key:expr, w) => {
        ::sol_core::AccountMeta::new($key, false)
    };
    ($key:expr, s) => {
        ::sol_core::AccountMeta::new_readonly($key, true)
    };
    ($key:expr, r) => {
        ::sol_core::AccountMeta::new_readonly($key, false)
    };
}

macro_rules! tuna_instruction {
    (
        $(#[$attr:meta])*
        $name:ident: $ix_name:literal, [$($d:literal),* $(,)?], $args:ty {
            $($(#[$field_attr:meta])* $field:ident: $kind:ident),* $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name {
            $($(#[$field_attr])* pub $field: ::sol_core::Pubkey,)*
        }

        impl $crate::codec::TunaInstruction for $name {
            const NAME: &'static str = $ix_name;
            const DISCRIMINATOR: [u8; 8] = [$($d),*];
            type Args = $args;

            fn to_account_metas(&self) -> Vec<::sol_core::AccountMeta> {
                vec![$(account_meta!(self.$field, $kind)),*]
            }
        }
    };
}

pub mod admin;
pub mod fusion;
pub mod lending;
pub mod orca;
pub mod position;

pub use admin::*;
pub use fusion::*;
pub use lending::*;
pub use orca::*;
pub use position::*;
