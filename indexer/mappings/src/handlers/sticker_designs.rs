use error_stack::{Result, ResultExt};
use serde_json::Value;
use stkr_indexer_core::{Bytes, EntityStore, EntityStoreExt, EventMeta, U256};
use tracing::{debug, info};

use crate::{
    entities::{self, StickerDesign},
    error::MappingError,
    events,
    reader::ContractStateReader,
};

use super::{DataSourceRequest, HandlerContext};

pub fn handle_admin_fee_recipient_changed<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::AdminFeeRecipientChanged,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let entity = entities::AdminFeeRecipientChanged {
        id: meta.entity_key().to_id(),
        new_recipient: event.new_recipient,
        block_number: meta.block_number,
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash,
    };

    ctx.save(meta.position(), &entity)
}

/// Shared by the `StickerDesigns` and `StickerObjectives` contracts.
pub fn handle_ownership_transferred<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::OwnershipTransferred,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let entity = entities::OwnershipTransferred {
        id: meta.entity_key().to_id(),
        previous_owner: event.previous_owner,
        new_owner: event.new_owner,
        block_number: meta.block_number,
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash,
    };

    ctx.save(meta.position(), &entity)
}

pub fn handle_publisher_reputation_fee_changed<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::PublisherReputationFeeChanged,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let entity = entities::PublisherReputationFeeChanged {
        id: meta.entity_key().to_id(),
        new_fee: event.new_fee,
        block_number: meta.block_number,
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash,
    };

    ctx.save(meta.position(), &entity)
}

pub fn handle_sticker_registration_fee_changed<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::StickerRegistrationFeeChanged,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let entity = entities::StickerRegistrationFeeChanged {
        id: meta.entity_key().to_id(),
        new_fee: event.new_fee,
        block_number: meta.block_number,
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash,
    };

    ctx.save(meta.position(), &entity)
}

pub fn handle_sticker_design_published<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::StickerDesignPublished,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let mut design = StickerDesign::new(meta, event.sticker_id, None);
    design.original_publisher = Some(event.publisher);
    design.current_publisher = event.publisher;
    design.payout_address = event.payout_address;
    design.metadata_cid = present_cid(&event.metadata_cid).cloned();

    reconcile_and_save(ctx, meta, design)?;

    info!(
        sticker_id = %event.sticker_id,
        publisher = %event.publisher,
        "sticker design published"
    );

    if let Some(cid) = present_cid(&event.metadata_cid).and_then(cid_to_string) {
        ctx.create_data_source(DataSourceRequest::StickerMetadata { cid });
    }

    Ok(())
}

pub fn handle_sticker_price_set<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::StickerPriceSet,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let mut design = load_design(ctx, meta, event.sticker_id)?;
    design.price = event.price;
    design.payment_method_id = event.payment_method_id;

    reconcile_and_save(ctx, meta, design)
}

pub fn handle_sticker_end_time_changed<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::StickerEndTimeChanged,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let mut design = load_design(ctx, meta, event.sticker_id)?;
    design.end_time = event.end_time;

    reconcile_and_save(ctx, meta, design)
}

pub fn handle_sticker_capped<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::StickerCapped,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let mut design = load_design(ctx, meta, event.sticker_id)?;
    design.capped = true;

    reconcile_and_save(ctx, meta, design)
}

pub fn handle_sticker_publisher_changed<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::StickerPublisherChanged,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let mut design = load_design(ctx, meta, event.sticker_id)?;
    design.current_publisher = event.to;

    reconcile_and_save(ctx, meta, design)
}

/// Start the new record for `sticker_id` from the record of the last log before `meta`, if any.
fn load_design<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    sticker_id: U256,
) -> Result<StickerDesign, MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let prior = ctx
        .store
        .load_latest_by::<StickerDesign>(
            "stickerId",
            &Value::String(sticker_id.to_string()),
            meta.position(),
        )
        .change_context(MappingError::Store)
        .attach_printable_lazy(|| format!("failed to load sticker design {sticker_id}"))?;

    if prior.is_none() {
        debug!(sticker_id = %sticker_id, "no prior sticker design");
    }

    Ok(StickerDesign::new(meta, sticker_id, prior.as_ref()))
}

fn reconcile_and_save<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    mut design: StickerDesign,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let state = ctx
        .reader
        .sticker_design(meta.address, design.sticker_id)
        .change_context(MappingError::ContractRead)
        .attach_printable_lazy(|| format!("failed to read sticker design {}", design.sticker_id))?;

    design.reconcile(&state);

    ctx.save(meta.position(), &design)
}

fn present_cid(cid: &Option<Bytes>) -> Option<&Bytes> {
    cid.as_ref().filter(|cid| !cid.is_empty())
}

fn cid_to_string(cid: &Bytes) -> Option<String> {
    let cid = std::str::from_utf8(cid).ok()?.trim();
    if cid.is_empty() {
        return None;
    }
    Some(cid.to_string())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use error_stack::report;
    use mockall::predicate::eq;
    use stkr_indexer_core::{
        Address, Bytes, EntityStore, EntityStoreExt, EventMeta, MemoryEntityStore, B256, U256,
    };

    use crate::{
        entities::StickerDesign,
        error::MappingError,
        events,
        handlers::{DataSourceRequest, HandlerContext},
        reader::{ContractReadError, MockContractStateReader, StickerDesignState},
    };

    use super::*;

    fn new_meta(log_index: u32) -> EventMeta {
        EventMeta {
            transaction_hash: B256::repeat_byte(0xaa),
            log_index,
            block_number: 100,
            block_timestamp: 1_700_000_000,
            address: Address::repeat_byte(0xdd),
        }
    }

    fn new_state(price: u64, end_time: u64) -> StickerDesignState {
        StickerDesignState {
            current_publisher: Address::repeat_byte(0x0a),
            payout_address: Address::repeat_byte(0x0b),
            price: U256::from(price),
            end_time: U256::from(end_time),
            payment_method_id: U256::from(1),
            published_at: U256::from(1_700_000_000u64),
            limit: U256::from(50),
            limit_to_holders: true,
        }
    }

    fn published(metadata_cid: Option<Bytes>) -> events::StickerDesignPublished {
        events::StickerDesignPublished {
            sticker_id: U256::from(7),
            publisher: Address::repeat_byte(0x0a),
            payout_address: Address::repeat_byte(0x0b),
            metadata_cid,
        }
    }

    #[test]
    fn test_published_reads_state_once() {
        let mut store = MemoryEntityStore::new();
        let mut reader = MockContractStateReader::new();
        reader
            .expect_sticker_design()
            .with(eq(Address::repeat_byte(0xdd)), eq(U256::from(7)))
            .times(1)
            .returning(|_, _| Ok(new_state(5, 9)));
        let mut data_sources = Vec::new();

        let meta = new_meta(1);
        {
            let mut ctx = HandlerContext::new(&mut store, &reader, &mut data_sources);
            let event = published(Some(Bytes::from_static(b"bafy")));
            handle_sticker_design_published(&mut ctx, &meta, &event).unwrap();
        }

        let design: StickerDesign = store.load(&meta.entity_key().to_id()).unwrap().unwrap();
        assert_eq!(design.price, U256::from(5));
        assert_eq!(design.end_time, U256::from(9));
        assert_eq!(design.metadata_cid, Some(Bytes::from_static(b"bafy")));
        assert_eq!(
            data_sources,
            vec![DataSourceRequest::StickerMetadata {
                cid: "bafy".to_string()
            }]
        );
    }

    #[test]
    fn test_published_with_empty_cid() {
        let mut store = MemoryEntityStore::new();
        let mut reader = MockContractStateReader::new();
        reader
            .expect_sticker_design()
            .returning(|_, _| Ok(new_state(5, 9)));
        let mut data_sources = Vec::new();

        let meta = new_meta(1);
        {
            let mut ctx = HandlerContext::new(&mut store, &reader, &mut data_sources);
            handle_sticker_design_published(&mut ctx, &meta, &published(Some(Bytes::new())))
                .unwrap();
        }

        let design: StickerDesign = store.load(&meta.entity_key().to_id()).unwrap().unwrap();
        assert!(design.metadata_cid.is_none());
        assert!(data_sources.is_empty());
    }

    #[test]
    fn test_read_failure_writes_nothing() {
        let mut store = MemoryEntityStore::new();
        let mut reader = MockContractStateReader::new();
        reader
            .expect_sticker_design()
            .returning(|_, _| Err(report!(ContractReadError)));
        let mut data_sources = Vec::new();

        let result = {
            let mut ctx = HandlerContext::new(&mut store, &reader, &mut data_sources);
            let event = published(Some(Bytes::from_static(b"bafy")));
            handle_sticker_design_published(&mut ctx, &new_meta(1), &event)
        };

        let err = result.unwrap_err();
        assert_matches!(err.current_context(), MappingError::ContractRead);
        assert_eq!(store.count("StickerDesign").unwrap(), 0);
        assert!(data_sources.is_empty());
    }

    #[test]
    fn test_update_without_prior_record() {
        let mut store = MemoryEntityStore::new();
        let mut reader = MockContractStateReader::new();
        reader
            .expect_sticker_design()
            .returning(|_, _| Ok(new_state(5, 9)));
        let mut data_sources = Vec::new();

        let meta = new_meta(4);
        let event = events::StickerEndTimeChanged {
            sticker_id: U256::from(7),
            end_time: U256::from(3),
        };
        {
            let mut ctx = HandlerContext::new(&mut store, &reader, &mut data_sources);
            handle_sticker_end_time_changed(&mut ctx, &meta, &event).unwrap();
        }

        let design: StickerDesign = store.load(&meta.entity_key().to_id()).unwrap().unwrap();
        assert!(design.original_publisher.is_none());
        assert!(design.metadata_cid.is_none());
        // the contract wins over the event payload.
        assert_eq!(design.end_time, U256::from(9));
    }

    #[test]
    fn test_cid_to_string() {
        assert_eq!(
            cid_to_string(&Bytes::from_static(b" bafy \n")),
            Some("bafy".to_string())
        );
        assert_eq!(cid_to_string(&Bytes::from_static(&[0xff, 0xfe])), None);
        assert_eq!(cid_to_string(&Bytes::from_static(b"   ")), None);
    }
}
