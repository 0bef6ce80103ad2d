//! Pure reductions from raw stake tables to the two query-ready views.
//!
//! Nothing in here talks to the chain or holds state; both builders are safe
//! to call concurrently from any number of tasks.
use std::collections::HashMap;

use num_traits::Zero;
use restake_types::{
    AvsStateError,
    BlockNum,
    OperatorAddr,
    OperatorAvsState,
    QuorumAvsState,
    QuorumNum,
    QuorumStakeTable,
    StakeAmount,
};

/// Folds index-aligned per-quorum stake tables into a per-operator view.
///
/// The output holds exactly the union of operators appearing in at least one
/// table; no entry is fabricated for anyone else, and `stake_per_quorum`
/// stays sparse.
///
/// A table count that differs from the requested quorum count means the
/// provider points at a wrong deployment; it is rejected before any map
/// entry is produced.
pub fn build_operators_avs_state(
    quorum_numbers: &[QuorumNum],
    stake_tables: Vec<QuorumStakeTable>,
    block_number: BlockNum,
) -> Result<HashMap<OperatorAddr, OperatorAvsState>, AvsStateError> {
    if stake_tables.len() != quorum_numbers.len() {
        return Err(AvsStateError::ContractMismatch {
            requested: quorum_numbers.len(),
            returned: stake_tables.len(),
        });
    }

    let mut operators_state: HashMap<OperatorAddr, OperatorAvsState> = HashMap::new();
    for (quorum, table) in quorum_numbers.iter().zip(stake_tables) {
        for record in table {
            operators_state
                .entry(record.operator)
                .or_insert_with(|| OperatorAvsState {
                    operator: record.operator,
                    stake_per_quorum: HashMap::new(),
                    block_number,
                })
                .stake_per_quorum
                .insert(*quorum, record.stake);
        }
    }
    Ok(operators_state)
}

/// Reduces a per-operator view into per-quorum totals.
///
/// Dense on the quorum axis: every requested quorum gets an entry, with a
/// zero total when no operator holds stake in it. Operators without a key
/// for a quorum contribute nothing to that quorum's total.
pub fn build_quorums_avs_state(
    quorum_numbers: &[QuorumNum],
    operators_state: &HashMap<OperatorAddr, OperatorAvsState>,
    block_number: BlockNum,
) -> HashMap<QuorumNum, QuorumAvsState> {
    let mut quorums_state = HashMap::with_capacity(quorum_numbers.len());
    for quorum in quorum_numbers {
        let mut total_stake = StakeAmount::zero();
        for operator in operators_state.values() {
            if let Some(stake) = operator.stake_per_quorum.get(quorum) {
                total_stake += stake;
            }
        }
        quorums_state.insert(
            *quorum,
            QuorumAvsState {
                quorum_number: *quorum,
                total_stake,
                block_number,
            },
        );
    }
    quorums_state
}
