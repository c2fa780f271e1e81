//! One handler per event kind.
//!
//! Every handler writes exactly one entity. Handlers that read contract state do so before
//! writing, so a failed read leaves the store untouched.

mod metadata;
mod payment_method;
mod sticker_chain;
mod sticker_designs;
mod sticker_objectives;

use error_stack::{Result, ResultExt};
use stkr_indexer_core::{Context, Entity, EntityStore, EntityStoreExt, EventPosition};
use tracing::debug;

use crate::{error::MappingError, reader::ContractStateReader};

pub use self::metadata::{decode_sticker_metadata, handle_sticker_metadata};
pub use self::payment_method::handle_coin_added;
pub use self::sticker_chain::handle_sticker_slapped;
pub use self::sticker_designs::{
    handle_admin_fee_recipient_changed, handle_ownership_transferred,
    handle_publisher_reputation_fee_changed, handle_sticker_capped,
    handle_sticker_design_published, handle_sticker_end_time_changed, handle_sticker_price_set,
    handle_sticker_publisher_changed, handle_sticker_registration_fee_changed,
};
pub use self::sticker_objectives::{
    handle_admin_transfer_failure, handle_new_objective, handle_objective_banned,
    handle_objective_unbanned,
};

/// An off-chain document the runtime should fetch and hand back to a handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceRequest {
    /// Sticker metadata json, handled by [handle_sticker_metadata].
    StickerMetadata { cid: String },
}

/// Capabilities available to a handler.
pub struct HandlerContext<'a, S, R> {
    pub store: &'a mut S,
    pub reader: &'a R,
    data_sources: &'a mut Vec<DataSourceRequest>,
}

impl<'a, S, R> HandlerContext<'a, S, R>
where
    S: EntityStore,
    R: ContractStateReader,
{
    pub fn new(
        store: &'a mut S,
        reader: &'a R,
        data_sources: &'a mut Vec<DataSourceRequest>,
    ) -> Self {
        Self {
            store,
            reader,
            data_sources,
        }
    }

    /// Persist the entity written by the log at `position`, replacing any entity with the
    /// same id.
    pub fn save<E: Entity>(
        &mut self,
        position: EventPosition,
        entity: &E,
    ) -> Result<(), MappingError> {
        let ctx = Context { position };
        self.store
            .save(&ctx, entity)
            .change_context(MappingError::Store)
            .attach_printable_lazy(|| format!("failed to save {} {}", E::KIND, entity.id()))?;
        debug!(kind = E::KIND, id = entity.id(), "entity saved");
        Ok(())
    }

    /// Ask the runtime to fetch a data source.
    pub fn create_data_source(&mut self, request: DataSourceRequest) {
        debug!(request = ?request, "data source requested");
        self.data_sources.push(request);
    }
}
