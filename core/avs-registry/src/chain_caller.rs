use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use restake_interfaces::{AvsRegistryService, ChainStateProvider};
use restake_types::{
    bitmap_to_quorum_ids,
    AvsStateError,
    BlockNum,
    CallOptions,
    OperatorAddr,
    OperatorAvsState,
    QuorumAvsState,
    QuorumNum,
    RegistrationStatus,
    StakeAmount,
};
use tracing::debug;

use crate::aggregation::{build_operators_avs_state, build_quorums_avs_state};
use crate::resolver::resolve_current_block;

/// [`AvsRegistryService`] implementation that answers every query with fresh
/// chain reads through an injected [`ChainStateProvider`].
///
/// The caller exposes only aggregation operations; it never re-exports the
/// provider's surface. It holds no state of its own beyond the provider
/// handle, so clones are cheap and the service can be shared across tasks.
pub struct AvsRegistryChainCaller<P> {
    provider: Arc<P>,
}

impl<P> Clone for AvsRegistryChainCaller<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
        }
    }
}

impl<P: ChainStateProvider> AvsRegistryChainCaller<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }

    /// Resolves the chain head once and builds the per-operator view pinned
    /// to it.
    pub async fn get_operators_avs_state_at_current_block(
        &self,
        quorum_numbers: &[QuorumNum],
    ) -> Result<HashMap<OperatorAddr, OperatorAvsState>, AvsStateError> {
        let (_, operators_state) = self.operators_state_at_resolved_head(quorum_numbers).await?;
        Ok(operators_state)
    }

    /// Resolves the chain head once and builds the per-quorum totals pinned
    /// to it. Both reductions run over the one stake-table query this issues.
    pub async fn get_quorums_avs_state_at_current_block(
        &self,
        quorum_numbers: &[QuorumNum],
    ) -> Result<HashMap<QuorumNum, QuorumAvsState>, AvsStateError> {
        let (block_number, operators_state) =
            self.operators_state_at_resolved_head(quorum_numbers).await?;
        Ok(build_quorums_avs_state(
            quorum_numbers,
            &operators_state,
            block_number,
        ))
    }

    /// Address-only projection of the stake tables at the current head, one
    /// inner list per requested quorum.
    pub async fn operator_addrs_in_quorums_at_current_block(
        &self,
        quorum_numbers: &[QuorumNum],
    ) -> Result<Vec<Vec<OperatorAddr>>, AvsStateError> {
        let mut opts = CallOptions::default();
        let block_number = resolve_current_block(self.provider.as_ref(), &mut opts).await?;
        let stake_tables = self
            .provider
            .stake_tables_at_block(&opts, quorum_numbers, block_number)
            .await
            .map_err(|err| AvsStateError::chain_query("stake_tables_at_block", err))?;
        if stake_tables.len() != quorum_numbers.len() {
            return Err(AvsStateError::ContractMismatch {
                requested: quorum_numbers.len(),
                returned: stake_tables.len(),
            });
        }
        Ok(stake_tables
            .into_iter()
            .map(|table| table.into_iter().map(|record| record.operator).collect())
            .collect())
    }

    /// Quorums `operator` belonged to at `block_number`.
    pub async fn quorums_of_operator_at_block(
        &self,
        operator: OperatorAddr,
        block_number: BlockNum,
    ) -> Result<Vec<QuorumNum>, AvsStateError> {
        let bitmap = self
            .provider
            .quorum_bitmap_of_operator(&CallOptions::default(), operator, block_number)
            .await
            .map_err(|err| AvsStateError::chain_query("quorum_bitmap_of_operator", err))?;
        Ok(bitmap_to_quorum_ids(bitmap))
    }

    /// Current stake of `operator` in every quorum it currently belongs to.
    ///
    /// This composes independent "current" reads: the membership bitmap and
    /// each per-quorum stake are separate round-trips, and the chain head
    /// can advance between them, so the values in the returned map may be
    /// pinned to different heights. Callers that need a true point-in-time
    /// view must use the at-block operations instead.
    pub async fn current_stake_of_operator_in_quorums(
        &self,
        operator: OperatorAddr,
    ) -> Result<HashMap<QuorumNum, StakeAmount>, AvsStateError> {
        let mut opts = CallOptions::default();
        let block_number = resolve_current_block(self.provider.as_ref(), &mut opts).await?;
        let bitmap = self
            .provider
            .quorum_bitmap_of_operator(&opts, operator, block_number)
            .await
            .map_err(|err| AvsStateError::chain_query("quorum_bitmap_of_operator", err))?;

        let mut quorum_stakes = HashMap::new();
        for quorum in bitmap_to_quorum_ids(bitmap) {
            let stake = self
                .provider
                .current_stake_of_operator_in_quorum(operator, quorum)
                .await
                .map_err(|err| {
                    AvsStateError::chain_query("current_stake_of_operator_in_quorum", err)
                })?;
            quorum_stakes.insert(quorum, stake);
        }
        Ok(quorum_stakes)
    }

    /// Whether `operator` is registered with the AVS at `block_number`.
    ///
    /// Only an explicit `Registered` status counts; every other status,
    /// including codes newer contract versions may introduce, is not
    /// registered.
    pub async fn is_operator_registered(
        &self,
        operator: OperatorAddr,
        block_number: BlockNum,
    ) -> Result<bool, AvsStateError> {
        let status = self
            .provider
            .registration_status(&CallOptions::default(), operator, block_number)
            .await
            .map_err(|err| AvsStateError::chain_query("registration_status", err))?;
        Ok(status == RegistrationStatus::Registered)
    }

    /// One head resolution, one stake-table query, one reduction. Both
    /// current-block entry points go through here so a single call can never
    /// mix two independently resolved heights.
    async fn operators_state_at_resolved_head(
        &self,
        quorum_numbers: &[QuorumNum],
    ) -> Result<(BlockNum, HashMap<OperatorAddr, OperatorAvsState>), AvsStateError> {
        let mut opts = CallOptions::default();
        let block_number = resolve_current_block(self.provider.as_ref(), &mut opts).await?;
        debug!(
            target: "avs-registry",
            block = block_number,
            quorums = quorum_numbers.len(),
            "resolved chain head for current-block aggregation"
        );
        let stake_tables = self
            .provider
            .stake_tables_at_block(&opts, quorum_numbers, block_number)
            .await
            .map_err(|err| AvsStateError::chain_query("stake_tables_at_block", err))?;
        let operators_state =
            build_operators_avs_state(quorum_numbers, stake_tables, block_number)?;
        Ok((block_number, operators_state))
    }
}

#[async_trait]
impl<P: ChainStateProvider> AvsRegistryService for AvsRegistryChainCaller<P> {
    async fn get_operators_avs_state_at_block(
        &self,
        quorum_numbers: &[QuorumNum],
        block_number: BlockNum,
    ) -> Result<HashMap<OperatorAddr, OperatorAvsState>, AvsStateError> {
        debug!(
            target: "avs-registry",
            block = block_number,
            quorums = quorum_numbers.len(),
            "building operator AVS state"
        );
        let stake_tables = self
            .provider
            .stake_tables_at_block(&CallOptions::default(), quorum_numbers, block_number)
            .await
            .map_err(|err| AvsStateError::chain_query("stake_tables_at_block", err))?;
        build_operators_avs_state(quorum_numbers, stake_tables, block_number)
    }

    async fn get_quorums_avs_state_at_block(
        &self,
        quorum_numbers: &[QuorumNum],
        block_number: BlockNum,
    ) -> Result<HashMap<QuorumNum, QuorumAvsState>, AvsStateError> {
        let operators_state = self
            .get_operators_avs_state_at_block(quorum_numbers, block_number)
            .await?;
        Ok(build_quorums_avs_state(
            quorum_numbers,
            &operators_state,
            block_number,
        ))
    }
}
