use thiserror::Error;

use crate::BlockNum;

/// Opaque failure from the chain-access endpoint backing a provider call.
///
/// Provider implementations wrap whatever their transport produced; the
/// aggregation layer never inspects the cause, it only attaches the name of
/// the operation that failed.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ChainQueryError(#[from] pub anyhow::Error);

impl ChainQueryError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(anyhow::anyhow!(message.into()))
    }
}

/// Errors surfaced by the AVS registry aggregation engine.
///
/// A call either returns a fully populated result or one of these; no
/// partial maps, no internal retries.
#[derive(Debug, Error)]
pub enum AvsStateError {
    /// A provider round-trip failed. `operation` names the query that was
    /// being issued.
    #[error("chain query `{operation}` failed: {source}")]
    ChainQuery {
        operation: &'static str,
        #[source]
        source: ChainQueryError,
    },

    /// The resolved chain head does not fit the fixed-width block encoding
    /// historical queries require.
    #[error("block number {0} does not fit the u32 historical query encoding")]
    BlockOutOfRange(u64),

    /// The provider returned a different number of stake tables than quorums
    /// requested. This points at a wrong deployment or an incompatible
    /// provider, not a transient fault.
    #[error("requested {requested} quorums but the provider returned {returned} stake tables")]
    ContractMismatch { requested: usize, returned: usize },

    /// No state is recorded at the requested height. Only produced by
    /// in-memory test providers, which hold state for a fixed set of blocks.
    #[error("no recorded state at block {0}")]
    BlockNotFound(BlockNum),
}

impl AvsStateError {
    /// Wraps a provider failure with the operation that issued it.
    pub fn chain_query(operation: &'static str, source: ChainQueryError) -> Self {
        Self::ChainQuery { operation, source }
    }
}
