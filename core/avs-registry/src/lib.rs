mod aggregation;
mod chain_caller;
mod resolver;

pub use aggregation::*;
pub use chain_caller::*;
pub use resolver::*;

#[cfg(test)]
mod tests;
