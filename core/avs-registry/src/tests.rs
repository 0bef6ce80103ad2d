use std::collections::HashMap;
use std::sync::Arc;

use num_bigint::BigUint;
use pretty_assertions::assert_eq;
use restake_interfaces::AvsRegistryService;
use restake_test_utils::{operator_addr, stake, FakeChainStateProvider};
use restake_types::{
    quorum_ids_to_bitmap,
    AvsStateError,
    OperatorAvsState,
    OperatorStakeRecord,
    QuorumStakeTable,
    RegistrationStatus,
};

use crate::{build_operators_avs_state, build_quorums_avs_state, AvsRegistryChainCaller};

fn record(operator: u64, amount: u64) -> OperatorStakeRecord {
    OperatorStakeRecord {
        operator: operator_addr(operator),
        stake: stake(amount),
    }
}

#[test]
fn single_operator_single_quorum() {
    // Quorum 1 holds one operator with stake 100 at block 5.
    let tables = vec![vec![record(0xA, 100)]];
    let operators_state = build_operators_avs_state(&[1], tables, 5).unwrap();

    assert_eq!(
        operators_state,
        HashMap::from([(
            operator_addr(0xA),
            OperatorAvsState {
                operator: operator_addr(0xA),
                stake_per_quorum: HashMap::from([(1, stake(100))]),
                block_number: 5,
            },
        )])
    );

    let quorums_state = build_quorums_avs_state(&[1], &operators_state, 5);
    assert_eq!(quorums_state.len(), 1);
    assert_eq!(quorums_state[&1].quorum_number, 1);
    assert_eq!(quorums_state[&1].total_stake, BigUint::from(100u32));
    assert_eq!(quorums_state[&1].block_number, 5);
}

#[test]
fn quorum_total_sums_all_operators() {
    let tables = vec![vec![record(0xA, 30), record(0xB, 70)]];
    let operators_state = build_operators_avs_state(&[2], tables, 7).unwrap();
    let quorums_state = build_quorums_avs_state(&[2], &operators_state, 7);

    assert_eq!(quorums_state[&2].total_stake, BigUint::from(100u32));
}

#[test]
fn operator_in_multiple_quorums_gets_one_entry() {
    let tables = vec![
        vec![record(0xA, 10), record(0xB, 20)],
        vec![record(0xA, 30)],
    ];
    let operators_state = build_operators_avs_state(&[0, 1], tables, 9).unwrap();

    assert_eq!(operators_state.len(), 2);
    let a = &operators_state[&operator_addr(0xA)];
    assert_eq!(
        a.stake_per_quorum,
        HashMap::from([(0, stake(10)), (1, stake(30))])
    );
    // Sparse: 0xB holds nothing in quorum 1, so there is no key for it.
    let b = &operators_state[&operator_addr(0xB)];
    assert_eq!(b.stake_per_quorum, HashMap::from([(0, stake(20))]));
}

#[test]
fn requested_quorum_without_operators_totals_zero() {
    let tables = vec![vec![record(0xA, 50)], vec![]];
    let operators_state = build_operators_avs_state(&[3, 4], tables, 11).unwrap();
    let quorums_state = build_quorums_avs_state(&[3, 4], &operators_state, 11);

    assert_eq!(quorums_state[&3].total_stake, BigUint::from(50u32));
    // Dense: the empty quorum still gets an entry.
    assert_eq!(quorums_state[&4].total_stake, BigUint::from(0u32));
}

#[test]
fn table_count_mismatch_is_rejected_before_aggregation() {
    let tables: Vec<QuorumStakeTable> = vec![vec![record(0xA, 100)]];
    let err = build_operators_avs_state(&[1, 2], tables, 5).unwrap_err();
    assert!(matches!(
        err,
        AvsStateError::ContractMismatch {
            requested: 2,
            returned: 1,
        }
    ));
}

#[test]
fn aggregation_does_not_overflow_narrow_encodings() {
    // Two operators each at the cap of a u96 on-chain stake encoding.
    let max_u96 = (BigUint::from(1u8) << 96u32) - 1u8;
    let tables = vec![vec![
        OperatorStakeRecord {
            operator: operator_addr(1),
            stake: max_u96.clone(),
        },
        OperatorStakeRecord {
            operator: operator_addr(2),
            stake: max_u96.clone(),
        },
    ]];
    let operators_state = build_operators_avs_state(&[0], tables, 1).unwrap();
    let quorums_state = build_quorums_avs_state(&[0], &operators_state, 1);

    assert_eq!(quorums_state[&0].total_stake, max_u96.clone() + max_u96);
}

#[tokio::test]
async fn chain_caller_builds_state_at_block() {
    let provider = Arc::new(FakeChainStateProvider::new(20));
    provider.set_stake_table(5, 1, vec![record(0xA, 100)]);
    let service = AvsRegistryChainCaller::new(provider);

    let operators = service
        .get_operators_avs_state_at_block(&[1], 5)
        .await
        .unwrap();
    assert_eq!(operators[&operator_addr(0xA)].block_number, 5);
    assert_eq!(
        operators[&operator_addr(0xA)].stake_per_quorum,
        HashMap::from([(1, stake(100))])
    );

    let quorums = service.get_quorums_avs_state_at_block(&[1], 5).await.unwrap();
    assert_eq!(quorums[&1].total_stake, BigUint::from(100u32));
    assert_eq!(quorums[&1].block_number, 5);
}

#[tokio::test]
async fn chain_caller_wraps_provider_failures() {
    // Head 20 but no state recorded there.
    let provider = Arc::new(FakeChainStateProvider::new(20));
    let service = AvsRegistryChainCaller::new(provider);

    let err = service
        .get_operators_avs_state_at_block(&[1], 5)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AvsStateError::ChainQuery {
            operation: "stake_tables_at_block",
            ..
        }
    ));
}

#[tokio::test]
async fn current_block_call_resolves_exactly_one_height() {
    let provider = Arc::new(FakeChainStateProvider::new(42));
    provider.set_stake_table(42, 0, vec![record(0xA, 10)]);
    provider.set_stake_table(42, 1, vec![record(0xB, 20)]);
    // If the call resolved the head more than once, later queries would land
    // on a different block and find no state there.
    provider.advance_head_on_query(1);
    let service = AvsRegistryChainCaller::new(provider.clone());

    let quorums = service
        .get_quorums_avs_state_at_current_block(&[0, 1])
        .await
        .unwrap();
    assert_eq!(quorums[&0].block_number, 42);
    assert_eq!(quorums[&1].block_number, 42);
    assert_eq!(provider.stake_table_queries(), vec![42]);
}

#[tokio::test]
async fn operators_at_current_block_pin_resolved_height() {
    let provider = Arc::new(FakeChainStateProvider::new(100));
    provider.set_stake_table(100, 3, vec![record(0xC, 5)]);
    let service = AvsRegistryChainCaller::new(provider.clone());

    let operators = service
        .get_operators_avs_state_at_current_block(&[3])
        .await
        .unwrap();
    assert_eq!(operators[&operator_addr(0xC)].block_number, 100);
    assert_eq!(provider.stake_table_queries(), vec![100]);
}

#[tokio::test]
async fn head_past_u32_aborts_without_truncating() {
    let provider = Arc::new(FakeChainStateProvider::new(u64::from(u32::MAX) + 1));
    let service = AvsRegistryChainCaller::new(provider.clone());

    let err = service
        .get_quorums_avs_state_at_current_block(&[0])
        .await
        .unwrap_err();
    match err {
        AvsStateError::BlockOutOfRange(head) => {
            assert_eq!(head, u64::from(u32::MAX) + 1)
        },
        other => panic!("expected BlockOutOfRange, got {other:?}"),
    }
    // No historical query may have been issued with a truncated height.
    assert!(provider.stake_table_queries().is_empty());
}

#[tokio::test]
async fn provider_table_shape_mismatch_is_typed_not_fatal() {
    let provider = Arc::new(FakeChainStateProvider::new(50));
    provider.set_table_count_override(3);
    let service = AvsRegistryChainCaller::new(provider);

    let err = service
        .get_operators_avs_state_at_block(&[0, 1], 50)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AvsStateError::ContractMismatch {
            requested: 2,
            returned: 3,
        }
    ));
}

#[tokio::test]
async fn operator_addrs_projection_drops_stakes() {
    let provider = Arc::new(FakeChainStateProvider::new(8));
    provider.set_stake_table(8, 0, vec![record(0xA, 1), record(0xB, 2)]);
    provider.set_stake_table(8, 1, vec![record(0xB, 3)]);
    let service = AvsRegistryChainCaller::new(provider);

    let addrs = service
        .operator_addrs_in_quorums_at_current_block(&[0, 1])
        .await
        .unwrap();
    assert_eq!(
        addrs,
        vec![
            vec![operator_addr(0xA), operator_addr(0xB)],
            vec![operator_addr(0xB)],
        ]
    );
}

#[tokio::test]
async fn quorums_of_operator_decodes_bitmap() {
    let provider = Arc::new(FakeChainStateProvider::new(30));
    provider.set_quorum_bitmap(12, operator_addr(0xA), quorum_ids_to_bitmap(&[0, 1, 3]));
    let service = AvsRegistryChainCaller::new(provider);

    let quorums = service
        .quorums_of_operator_at_block(operator_addr(0xA), 12)
        .await
        .unwrap();
    assert_eq!(quorums, vec![0, 1, 3]);
}

#[tokio::test]
async fn current_stakes_follow_current_membership() {
    let provider = Arc::new(FakeChainStateProvider::new(60));
    provider.set_quorum_bitmap(60, operator_addr(0xA), quorum_ids_to_bitmap(&[1, 2]));
    provider.set_current_stake(operator_addr(0xA), 1, stake(11));
    provider.set_current_stake(operator_addr(0xA), 2, stake(22));
    // Quorum 5 stake exists but the operator is not a member, so it is never
    // queried.
    provider.set_current_stake(operator_addr(0xA), 5, stake(55));
    let service = AvsRegistryChainCaller::new(provider);

    let stakes = service
        .current_stake_of_operator_in_quorums(operator_addr(0xA))
        .await
        .unwrap();
    assert_eq!(stakes, HashMap::from([(1, stake(11)), (2, stake(22))]));
}

#[tokio::test]
async fn registration_check_requires_explicit_registered_status() {
    let provider = Arc::new(FakeChainStateProvider::new(90));
    provider.set_registration_status(90, operator_addr(1), RegistrationStatus::Registered);
    provider.set_registration_status(90, operator_addr(2), RegistrationStatus::Deregistered);
    let service = AvsRegistryChainCaller::new(provider);

    assert!(service
        .is_operator_registered(operator_addr(1), 90)
        .await
        .unwrap());
    assert!(!service
        .is_operator_registered(operator_addr(2), 90)
        .await
        .unwrap());
    // Never scripted at all: never registered.
    assert!(!service
        .is_operator_registered(operator_addr(3), 90)
        .await
        .unwrap());
}
