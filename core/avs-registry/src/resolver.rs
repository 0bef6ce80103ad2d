use restake_interfaces::ChainStateProvider;
use restake_types::{AvsStateError, BlockNum, CallOptions};

/// Resolves the chain head once and pins `opts` to it.
///
/// Historical registry queries take a `u32` height while the head is
/// reported as a `u64`, so the narrowing is a checked conversion: a head
/// past `u32::MAX` aborts the call with
/// [`AvsStateError::BlockOutOfRange`] instead of truncating. There is no
/// fallback to a prior or cached height.
///
/// `opts` belongs to the current call only. The follow-up query must be
/// issued with the same `opts` so it runs against the resolved state, and
/// the value must not be reused for another call afterwards.
pub async fn resolve_current_block<P: ChainStateProvider + ?Sized>(
    provider: &P,
    opts: &mut CallOptions,
) -> Result<BlockNum, AvsStateError> {
    let head = provider
        .current_block_number()
        .await
        .map_err(|err| AvsStateError::chain_query("current_block_number", err))?;
    let block = BlockNum::try_from(head).map_err(|_| AvsStateError::BlockOutOfRange(head))?;
    opts.block_number = Some(head);
    Ok(block)
}
