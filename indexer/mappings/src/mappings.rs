use error_stack::Result;
use stkr_indexer_core::EntityStore;
use tracing::instrument;

use crate::{
    error::MappingError,
    events::{Event, EventRecord},
    handlers::{self, DataSourceRequest, HandlerContext},
    reader::ContractStateReader,
};

/// Routes events to their handler.
///
/// Events must be handled one at a time, in the order they were emitted.
pub struct Mappings<S, R> {
    store: S,
    reader: R,
    data_sources: Vec<DataSourceRequest>,
}

impl<S, R> Mappings<S, R>
where
    S: EntityStore,
    R: ContractStateReader,
{
    pub fn new(store: S, reader: R) -> Self {
        Self {
            store,
            reader,
            data_sources: Vec::default(),
        }
    }

    #[instrument(
        skip_all,
        fields(
            event = record.event.name(),
            tx = %record.meta.transaction_hash,
            log_index = record.meta.log_index,
        ),
        err(Debug),
        level = "DEBUG"
    )]
    pub fn handle_event(&mut self, record: &EventRecord) -> Result<(), MappingError> {
        let meta = &record.meta;
        let mut ctx = HandlerContext::new(&mut self.store, &self.reader, &mut self.data_sources);

        match &record.event {
            Event::AdminFeeRecipientChanged(event) => {
                handlers::handle_admin_fee_recipient_changed(&mut ctx, meta, event)
            }
            Event::OwnershipTransferred(event) => {
                handlers::handle_ownership_transferred(&mut ctx, meta, event)
            }
            Event::PublisherReputationFeeChanged(event) => {
                handlers::handle_publisher_reputation_fee_changed(&mut ctx, meta, event)
            }
            Event::StickerRegistrationFeeChanged(event) => {
                handlers::handle_sticker_registration_fee_changed(&mut ctx, meta, event)
            }
            Event::StickerDesignPublished(event) => {
                handlers::handle_sticker_design_published(&mut ctx, meta, event)
            }
            Event::StickerPriceSet(event) => {
                handlers::handle_sticker_price_set(&mut ctx, meta, event)
            }
            Event::StickerEndTimeChanged(event) => {
                handlers::handle_sticker_end_time_changed(&mut ctx, meta, event)
            }
            Event::StickerCapped(event) => handlers::handle_sticker_capped(&mut ctx, meta, event),
            Event::StickerPublisherChanged(event) => {
                handlers::handle_sticker_publisher_changed(&mut ctx, meta, event)
            }
            Event::StickerSlapped(event) => {
                handlers::handle_sticker_slapped(&mut ctx, meta, event)
            }
            Event::AdminTransferFailure(event) => {
                handlers::handle_admin_transfer_failure(&mut ctx, meta, event)
            }
            Event::NewObjective(event) => handlers::handle_new_objective(&mut ctx, meta, event),
            Event::ObjectiveBanned(event) => {
                handlers::handle_objective_banned(&mut ctx, meta, event)
            }
            Event::ObjectiveUnbanned(event) => {
                handlers::handle_objective_unbanned(&mut ctx, meta, event)
            }
            Event::CoinAdded(event) => handlers::handle_coin_added(&mut ctx, meta, event),
        }
    }

    /// Handle a sticker metadata document. Returns whether an entity was written.
    #[instrument(skip(self, content), err(Debug), level = "DEBUG")]
    pub fn handle_sticker_metadata(
        &mut self,
        cid: &str,
        content: &[u8],
    ) -> Result<bool, MappingError> {
        let mut ctx = HandlerContext::new(&mut self.store, &self.reader, &mut self.data_sources);
        handlers::handle_sticker_metadata(&mut ctx, cid, content)
    }

    /// Returns the data sources requested since the last call.
    pub fn take_data_sources(&mut self) -> Vec<DataSourceRequest> {
        std::mem::take(&mut self.data_sources)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
