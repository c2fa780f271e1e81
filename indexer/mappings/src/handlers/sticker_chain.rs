use error_stack::{Result, ResultExt};
use stkr_indexer_core::{EntityStore, EventMeta};

use crate::{entities::Slap, error::MappingError, events, reader::ContractStateReader};

use super::HandlerContext;

/// The event doesn't carry the slap height or the objectives it was routed to, so both are
/// read back from `getSlap`.
pub fn handle_sticker_slapped<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::StickerSlapped,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let slap = ctx
        .reader
        .slap(meta.address, event.slap_id)
        .change_context(MappingError::ContractRead)
        .attach_printable_lazy(|| format!("failed to read slap {}", event.slap_id))?;

    let entity = Slap {
        id: meta.entity_key().to_id(),
        slap_id: event.slap_id,
        place_id: event.place_id,
        sticker_id: event.sticker_id,
        player: event.player,
        owner: event.player,
        size: event.size,
        height: slap.height,
        objective_ids: slap.objective_ids,
        slapped_at: meta.block_timestamp,
        block_number: meta.block_number,
    };

    ctx.save(meta.position(), &entity)
}
