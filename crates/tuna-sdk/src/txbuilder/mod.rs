//! Transaction builders: one function per user operation, returning the
//! instructions to submit in execution order (token account setup, the
//! Tuna instruction(s), cleanup).

pub mod admin;
pub mod lending;
pub mod liquidity;
pub mod pool;
pub mod position;

#[cfg(test)]
pub(crate) mod testing;

pub use admin::{create_market_instruction, create_tuna_config_instruction, create_vault_instructions};
pub use lending::{
    deposit_instructions, open_lending_position_and_deposit_instructions,
    open_lending_position_instruction, withdraw_instructions,
};
pub use liquidity::{
    add_liquidity_instructions, close_position_with_liquidity_instructions,
    close_tuna_lp_position_instructions, collect_and_compound_fees_instructions,
    collect_fees_instructions, liquidate_tuna_lp_position_instructions,
    open_tuna_lp_position_instructions, remove_liquidity_instructions,
    set_tuna_lp_position_limit_orders_instruction,
};
pub use pool::{AmmPool, RemainingAccounts};
pub use position::{LpMarket, PositionAccounts};
