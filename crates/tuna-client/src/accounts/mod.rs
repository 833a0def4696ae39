//! On-chain account layouts.
//!
//! Tuna accounts (`TunaConfig`, `Vault`, `Market`, `LendingPosition`,
//! `TunaPosition`, `TunaSpotPosition`) plus the AMM accounts the builders
//! read (`Whirlpool`, `TickArray`, `FusionPool`).

pub mod fusion_pool;
pub mod lending_position;
pub mod market;
pub mod tick_array;
pub mod tuna_config;
pub mod tuna_position;
pub mod tuna_spot_position;
pub mod vault;
pub mod whirlpool;

pub use fusion_pool::FusionPool;
pub use lending_position::LendingPosition;
pub use market::Market;
pub use tick_array::{Tick, TickArray};
pub use tuna_config::TunaConfig;
pub use tuna_position::TunaPosition;
pub use tuna_spot_position::TunaSpotPosition;
pub use vault::Vault;
pub use whirlpool::{Whirlpool, WhirlpoolRewardInfo};
