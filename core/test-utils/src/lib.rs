mod chain_state;
mod registry;

pub use chain_state::*;
pub use registry::*;

use restake_types::{OperatorAddr, StakeAmount};

/// Deterministic operator address for tests, derived from a small integer.
pub fn operator_addr(n: u64) -> OperatorAddr {
    OperatorAddr::from_low_u64_be(n)
}

/// Stake amount from a small integer.
pub fn stake(n: u64) -> StakeAmount {
    StakeAmount::from(n)
}
