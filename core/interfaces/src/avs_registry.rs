use std::collections::HashMap;

use async_trait::async_trait;
use restake_types::{
    AvsStateError,
    BlockNum,
    OperatorAddr,
    OperatorAvsState,
    QuorumAvsState,
    QuorumNum,
};

/// The aggregation surface exposed to application consumers.
///
/// Both views of a call are pinned to the single block passed in, and a call
/// either yields a fully populated map or an error, never a partial one.
#[async_trait]
pub trait AvsRegistryService: Send + Sync {
    /// Per-operator stake across `quorum_numbers` at `block_number`.
    ///
    /// The result holds exactly the operators registered in at least one of
    /// the requested quorums; `stake_per_quorum` is sparse.
    async fn get_operators_avs_state_at_block(
        &self,
        quorum_numbers: &[QuorumNum],
        block_number: BlockNum,
    ) -> Result<HashMap<OperatorAddr, OperatorAvsState>, AvsStateError>;

    /// Per-quorum stake totals across `quorum_numbers` at `block_number`.
    ///
    /// Dense on the quorum axis: every requested quorum gets an entry, zero
    /// total included.
    async fn get_quorums_avs_state_at_block(
        &self,
        quorum_numbers: &[QuorumNum],
        block_number: BlockNum,
    ) -> Result<HashMap<QuorumNum, QuorumAvsState>, AvsStateError>;
}
