use std::collections::HashMap;

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use restake_interfaces::ChainStateProvider;
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

#[derive(Default)]
struct FakeChainState {
    head: u64,
    /// How much the head advances after every `current_block_number` query.
    /// Used to simulate a chain that moves between "current" reads.
    head_advance_per_query: u64,
    stake_tables: HashMap<BlockNum, HashMap<QuorumNum, QuorumStakeTable>>,
    quorum_bitmaps: HashMap<(BlockNum, OperatorAddr), QuorumBitmap>,
    current_stakes: HashMap<(OperatorAddr, QuorumNum), StakeAmount>,
    registration_statuses: HashMap<(BlockNum, OperatorAddr), RegistrationStatus>,
    /// When set, `stake_tables_at_block` answers with this many empty tables
    /// regardless of the request, to exercise shape-mismatch handling.
    table_count_override: Option<usize>,
    /// Every height a stake-table query was issued at, in call order.
    stake_table_queries: Vec<BlockNum>,
}

/// In-memory [`ChainStateProvider`] with scripted per-block state.
///
/// Heights without recorded stake tables answer with a query error, matching
/// a retrieval contract that has no state snapshot there. Bitmaps, current
/// stakes and registration statuses default to empty/zero/never-registered
/// so tests only script what they care about.
#[derive(Default)]
pub struct FakeChainStateProvider {
    state: Mutex<FakeChainState>,
}

impl FakeChainStateProvider {
    pub fn new(head: u64) -> Self {
        Self {
            state: Mutex::new(FakeChainState {
                head,
                ..Default::default()
            }),
        }
    }

    /// Makes the head advance by `blocks` after every head query, so two
    /// "current" resolutions within one test observe different heights.
    pub fn advance_head_on_query(&self, blocks: u64) {
        self.state.lock().head_advance_per_query = blocks;
    }

    pub fn set_head(&self, head: u64) {
        self.state.lock().head = head;
    }

    pub fn set_stake_table(
        &self,
        block: BlockNum,
        quorum: QuorumNum,
        table: QuorumStakeTable,
    ) {
        self.state
            .lock()
            .stake_tables
            .entry(block)
            .or_default()
            .insert(quorum, table);
    }

    pub fn set_quorum_bitmap(
        &self,
        block: BlockNum,
        operator: OperatorAddr,
        bitmap: QuorumBitmap,
    ) {
        self.state
            .lock()
            .quorum_bitmaps
            .insert((block, operator), bitmap);
    }

    pub fn set_current_stake(
        &self,
        operator: OperatorAddr,
        quorum: QuorumNum,
        stake: StakeAmount,
    ) {
        self.state
            .lock()
            .current_stakes
            .insert((operator, quorum), stake);
    }

    pub fn set_registration_status(
        &self,
        block: BlockNum,
        operator: OperatorAddr,
        status: RegistrationStatus,
    ) {
        self.state
            .lock()
            .registration_statuses
            .insert((block, operator), status);
    }

    pub fn set_table_count_override(&self, count: usize) {
        self.state.lock().table_count_override = Some(count);
    }

    /// The heights stake-table queries were issued at, in call order.
    pub fn stake_table_queries(&self) -> Vec<BlockNum> {
        self.state.lock().stake_table_queries.clone()
    }
}

#[async_trait]
impl ChainStateProvider for FakeChainStateProvider {
    async fn current_block_number(&self) -> Result<u64, ChainQueryError> {
        let mut state = self.state.lock();
        let head = state.head;
        state.head += state.head_advance_per_query;
        Ok(head)
    }

    async fn stake_tables_at_block(
        &self,
        _opts: &CallOptions,
        quorum_numbers: &[QuorumNum],
        block: BlockNum,
    ) -> Result<Vec<QuorumStakeTable>, ChainQueryError> {
        let mut state = self.state.lock();
        state.stake_table_queries.push(block);

        if let Some(count) = state.table_count_override {
            return Ok(vec![QuorumStakeTable::new(); count]);
        }

        let tables = state
            .stake_tables
            .get(&block)
            .ok_or_else(|| ChainQueryError::from(anyhow!("no recorded state at block {block}")))?;
        Ok(quorum_numbers
            .iter()
            .map(|quorum| tables.get(quorum).cloned().unwrap_or_default())
            .collect())
    }

    async fn quorum_bitmap_of_operator(
        &self,
        _opts: &CallOptions,
        operator: OperatorAddr,
        block: BlockNum,
    ) -> Result<QuorumBitmap, ChainQueryError> {
        Ok(self
            .state
            .lock()
            .quorum_bitmaps
            .get(&(block, operator))
            .copied()
            .unwrap_or_default())
    }

    async fn current_stake_of_operator_in_quorum(
        &self,
        operator: OperatorAddr,
        quorum: QuorumNum,
    ) -> Result<StakeAmount, ChainQueryError> {
        Ok(self
            .state
            .lock()
            .current_stakes
            .get(&(operator, quorum))
            .cloned()
            .unwrap_or_default())
    }

    async fn registration_status(
        &self,
        _opts: &CallOptions,
        operator: OperatorAddr,
        block: BlockNum,
    ) -> Result<RegistrationStatus, ChainQueryError> {
        Ok(self
            .state
            .lock()
            .registration_statuses
            .get(&(block, operator))
            .copied()
            .unwrap_or(RegistrationStatus::NeverRegistered))
    }
}
