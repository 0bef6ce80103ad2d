use async_trait::async_trait;
use restake_types::{
    BlockNum,
    CallOptions,
    ChainQueryError,
    OperatorAddr,
    QuorumBitmap,
    QuorumNum,
    QuorumStakeTable,
    RegistrationStatus,
    StakeAmount,
};

/// Read-only access to the on-chain registry state the aggregation engine
/// consumes.
///
/// Implementations sit on top of a contract-binding/RPC layer; the engine
/// never encodes ABI data or touches a transport itself. Every method is a
/// single round-trip: cancellation is dropping the returned future, and no
/// retry or backoff happens below this trait.
#[async_trait]
pub trait ChainStateProvider: Send + Sync {
    /// Height of the chain head as the endpoint currently sees it.
    async fn current_block_number(&self) -> Result<u64, ChainQueryError>;

    /// Stake tables of the given quorums at `block`.
    ///
    /// The returned sequence must be index-aligned with `quorum_numbers`,
    /// one table per requested quorum.
    async fn stake_tables_at_block(
        &self,
        opts: &CallOptions,
        quorum_numbers: &[QuorumNum],
        block: BlockNum,
    ) -> Result<Vec<QuorumStakeTable>, ChainQueryError>;

    /// Quorum-membership bitmap of `operator` at `block`.
    async fn quorum_bitmap_of_operator(
        &self,
        opts: &CallOptions,
        operator: OperatorAddr,
        block: BlockNum,
    ) -> Result<QuorumBitmap, ChainQueryError>;

    /// Stake of `operator` in `quorum` at whatever height the chain
    /// considers current when the call lands. This query cannot be pinned to
    /// a block.
    async fn current_stake_of_operator_in_quorum(
        &self,
        operator: OperatorAddr,
        quorum: QuorumNum,
    ) -> Result<StakeAmount, ChainQueryError>;

    /// Registration status of `operator` at `block`.
    async fn registration_status(
        &self,
        opts: &CallOptions,
        operator: OperatorAddr,
        block: BlockNum,
    ) -> Result<RegistrationStatus, ChainQueryError>;
}
