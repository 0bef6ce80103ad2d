//! The data types shared between the registry provider boundary and the
//! aggregation engine.
use std::collections::HashMap;

use ethers::types::{Address, U256};
use num_bigint::BigUint;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;
use serde::{Deserialize, Serialize};

/// A quorum identifier. The registry supports up to 256 quorums, one per bit
/// of a [`QuorumBitmap`].
pub type QuorumNum = u8;

/// The fixed-width block height used by historical registry queries.
///
/// The chain head itself is reported as a `u64`; narrowing it down to a
/// `BlockNum` has to go through a checked conversion, see
/// [`AvsStateError::BlockOutOfRange`](crate::AvsStateError::BlockOutOfRange).
pub type BlockNum = u32;

/// An operator's 20-byte account address.
pub type OperatorAddr = Address;

/// Stake attributed to an operator within a single quorum.
///
/// Arbitrary precision: the on-chain encoding is narrower, but summing over
/// any number of operators must not be able to overflow.
pub type StakeAmount = BigUint;

/// Quorum membership encoded as one bit per quorum id, bit `i` set means the
/// operator belongs to quorum `i`.
pub type QuorumBitmap = U256;

/// One `(operator, stake)` row of a quorum's stake table, as returned by the
/// on-chain state retriever.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorStakeRecord {
    pub operator: OperatorAddr,
    pub stake: StakeAmount,
}

/// The stake table of a single quorum at some block, in the order the
/// contract returned it. A sequence of these is always index-aligned with the
/// quorum list that was requested.
pub type QuorumStakeTable = Vec<OperatorStakeRecord>;

/// Per-operator view of AVS state across a set of quorums, pinned to one
/// block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorAvsState {
    pub operator: OperatorAddr,
    /// Sparse: a quorum the operator holds no registered stake in has no key
    /// here, rather than a zero entry.
    pub stake_per_quorum: HashMap<QuorumNum, StakeAmount>,
    pub block_number: BlockNum,
}

/// Per-quorum stake totals pinned to one block.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumAvsState {
    pub quorum_number: QuorumNum,
    /// Dense: always present, zero when no operator holds stake in the
    /// quorum.
    pub total_stake: StakeAmount,
    pub block_number: BlockNum,
}

/// Registration status of an operator as encoded by the registry coordinator
/// contract.
#[derive(
    Clone,
    Copy,
    Debug,
    Hash,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    FromPrimitive,
)]
#[repr(u8)]
pub enum RegistrationStatus {
    NeverRegistered = 0,
    Registered = 1,
    Deregistered = 2,
}

impl RegistrationStatus {
    /// Decodes the contract's integer encoding. Status codes this crate does
    /// not know about decode to `None` and must be treated as not registered
    /// by callers.
    pub fn from_status_code(code: u8) -> Option<Self> {
        Self::from_u8(code)
    }

    pub fn is_registered(&self) -> bool {
        matches!(self, RegistrationStatus::Registered)
    }
}

/// Options threaded through a single provider call.
///
/// The current-block resolution step records the height it resolved in
/// `block_number` so the follow-up historical query runs against the same
/// state. Build a fresh value for every call: a `CallOptions` shared between
/// concurrent calls lets one call's resolved height leak into another's
/// query.
#[derive(Clone, Debug, Default)]
pub struct CallOptions {
    /// The height this call is pinned to, once one has been resolved.
    pub block_number: Option<u64>,
}
