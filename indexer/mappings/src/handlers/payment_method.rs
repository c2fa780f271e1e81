use error_stack::{Result, ResultExt};
use stkr_indexer_core::{EntityStore, EventMeta};
use tracing::info;

use crate::{entities::Coin, error::MappingError, events, reader::ContractStateReader};

use super::HandlerContext;

pub fn handle_coin_added<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::CoinAdded,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let token = ctx
        .reader
        .erc20_metadata(event.coin)
        .change_context(MappingError::ContractRead)
        .attach_printable_lazy(|| format!("failed to read erc20 token {}", event.coin))?;

    let entity = Coin {
        id: meta.entity_key().to_id(),
        address: event.coin,
        payment_method_id: event.coin_id,
        name: token.name,
        symbol: token.symbol,
        decimals: token.decimals,
    };

    ctx.save(meta.position(), &entity)?;

    info!(coin = %event.coin, symbol = %entity.symbol, "payment method added");

    Ok(())
}
