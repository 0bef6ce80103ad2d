//! Quorum-membership bitmap codec.
use ethers::types::U256;

use crate::{QuorumBitmap, QuorumNum};

/// Expands a membership bitmap into the list of quorum ids whose bits are
/// set, in ascending order with no duplicates. `decode(0)` is the empty list.
///
/// Works one 64-bit limb at a time and clears the lowest set bit until the
/// limb is exhausted, so a sparse bitmap costs one iteration per member
/// rather than one probe per possible quorum.
pub fn bitmap_to_quorum_ids(bitmap: QuorumBitmap) -> Vec<QuorumNum> {
    let mut quorums = Vec::new();
    for (limb_idx, limb) in bitmap.0.iter().enumerate() {
        let mut limb = *limb;
        while limb != 0 {
            let bit = limb.trailing_zeros() as usize;
            quorums.push((limb_idx * 64 + bit) as QuorumNum);
            limb &= limb - 1;
        }
    }
    quorums
}

/// Inverse of [`bitmap_to_quorum_ids`]: builds the bitmap with exactly the
/// given quorum ids set.
pub fn quorum_ids_to_bitmap(quorums: &[QuorumNum]) -> QuorumBitmap {
    let mut bitmap = U256::zero();
    for quorum in quorums {
        bitmap = bitmap | (U256::one() << (*quorum as usize));
    }
    bitmap
}
