use std::collections::HashMap;

use async_trait::async_trait;
use restake_avs_registry::build_quorums_avs_state;
use restake_interfaces::AvsRegistryService;
use restake_types::{
    AvsStateError,
    BlockNum,
    OperatorAddr,
    OperatorAvsState,
    QuorumAvsState,
    QuorumNum,
};

/// Canned [`AvsRegistryService`] that serves pre-built operator state for a
/// fixed set of heights. Heights it holds no state for answer with
/// [`AvsStateError::BlockNotFound`].
pub struct FakeAvsRegistryService {
    operators: HashMap<BlockNum, HashMap<OperatorAddr, OperatorAvsState>>,
}

impl FakeAvsRegistryService {
    pub fn new(block_number: BlockNum, operators: Vec<OperatorAvsState>) -> Self {
        let mut state = HashMap::new();
        state.insert(
            block_number,
            operators
                .into_iter()
                .map(|operator| (operator.operator, operator))
                .collect(),
        );
        Self { operators: state }
    }
}

#[async_trait]
impl AvsRegistryService for FakeAvsRegistryService {
    async fn get_operators_avs_state_at_block(
        &self,
        _quorum_numbers: &[QuorumNum],
        block_number: BlockNum,
    ) -> Result<HashMap<OperatorAddr, OperatorAvsState>, AvsStateError> {
        self.operators
            .get(&block_number)
            .cloned()
            .ok_or(AvsStateError::BlockNotFound(block_number))
    }

    async fn get_quorums_avs_state_at_block(
        &self,
        quorum_numbers: &[QuorumNum],
        block_number: BlockNum,
    ) -> Result<HashMap<QuorumNum, QuorumAvsState>, AvsStateError> {
        let operators_state = self
            .operators
            .get(&block_number)
            .ok_or(AvsStateError::BlockNotFound(block_number))?;
        Ok(build_quorums_avs_state(
            quorum_numbers,
            operators_state,
            block_number,
        ))
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;
    use crate::{operator_addr, stake};

    fn test_operator(n: u64, quorums: &[(QuorumNum, u64)], block: BlockNum) -> OperatorAvsState {
        OperatorAvsState {
            operator: operator_addr(n),
            stake_per_quorum: quorums
                .iter()
                .map(|(quorum, amount)| (*quorum, stake(*amount)))
                .collect(),
            block_number: block,
        }
    }

    #[tokio::test]
    async fn unrecorded_height_is_block_not_found() {
        let service = FakeAvsRegistryService::new(10, vec![test_operator(1, &[(0, 100)], 10)]);

        let err = service
            .get_operators_avs_state_at_block(&[0], 11)
            .await
            .unwrap_err();
        assert!(matches!(err, AvsStateError::BlockNotFound(11)));

        let err = service
            .get_quorums_avs_state_at_block(&[0], 11)
            .await
            .unwrap_err();
        assert!(matches!(err, AvsStateError::BlockNotFound(11)));
    }

    #[tokio::test]
    async fn serves_recorded_state() {
        let service = FakeAvsRegistryService::new(
            10,
            vec![
                test_operator(1, &[(0, 30)], 10),
                test_operator(2, &[(0, 70), (1, 5)], 10),
            ],
        );

        let operators = service
            .get_operators_avs_state_at_block(&[0, 1], 10)
            .await
            .unwrap();
        assert_eq!(operators.len(), 2);

        let quorums = service
            .get_quorums_avs_state_at_block(&[0, 1], 10)
            .await
            .unwrap();
        assert_eq!(quorums[&0].total_stake, BigUint::from(100u32));
        assert_eq!(quorums[&1].total_stake, BigUint::from(5u32));
    }
}
