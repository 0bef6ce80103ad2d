mod avs_registry;
mod chain_state;

pub use avs_registry::*;
pub use chain_state::*;

/// Re-export of the shared domain types.
pub use restake_types as types;
