use error_stack::Result;
use stkr_indexer_core::{EntityStore, EventMeta};

use crate::{entities, error::MappingError, events, reader::ContractStateReader};

use super::HandlerContext;

pub fn handle_admin_transfer_failure<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::AdminTransferFailure,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let entity = entities::AdminTransferFailure {
        id: meta.entity_key().to_id(),
        recipient: event.recipient,
        amount: event.amount,
        block_number: meta.block_number,
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash,
    };

    ctx.save(meta.position(), &entity)
}

pub fn handle_new_objective<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::NewObjective,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let entity = entities::NewObjective {
        id: meta.entity_key().to_id(),
        objective: event.objective,
        objective_id: event.objective_id,
        dev: event.dev,
        block_number: meta.block_number,
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash,
    };

    ctx.save(meta.position(), &entity)
}

pub fn handle_objective_banned<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::ObjectiveBanned,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let entity = entities::ObjectiveBanned {
        id: meta.entity_key().to_id(),
        objective: event.objective,
        objective_id: event.objective_id,
        block_number: meta.block_number,
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash,
    };

    ctx.save(meta.position(), &entity)
}

pub fn handle_objective_unbanned<S, R>(
    ctx: &mut HandlerContext<'_, S, R>,
    meta: &EventMeta,
    event: &events::ObjectiveUnbanned,
) -> Result<(), MappingError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let entity = entities::ObjectiveUnbanned {
        id: meta.entity_key().to_id(),
        objective: event.objective,
        objective_id: event.objective_id,
        block_number: meta.block_number,
        block_timestamp: meta.block_timestamp,
        transaction_hash: meta.transaction_hash,
    };

    ctx.save(meta.position(), &entity)
}

#[cfg(test)]
mod tests {
    use stkr_indexer_core::{
        Address, EntityStore, EntityStoreExt, EventMeta, MemoryEntityStore, B256, U256,
    };

    use crate::{entities, events, handlers::HandlerContext, reader::MockContractStateReader};

    use super::handle_admin_transfer_failure;

    #[test]
    fn test_admin_transfer_failure_created_and_stored() {
        let mut store = MemoryEntityStore::new();
        // fact handlers never read contract state.
        let reader = MockContractStateReader::new();
        let mut data_sources = Vec::new();

        let meta = EventMeta {
            transaction_hash: B256::repeat_byte(0xa1),
            log_index: 1,
            block_number: 1,
            block_timestamp: 1,
            address: Address::ZERO,
        };
        let event = events::AdminTransferFailure {
            recipient: Address::with_last_byte(1),
            amount: U256::from(234),
        };

        {
            let mut ctx = HandlerContext::new(&mut store, &reader, &mut data_sources);
            handle_admin_transfer_failure(&mut ctx, &meta, &event).unwrap();
        }

        assert_eq!(store.count("AdminTransferFailure").unwrap(), 1);
        let id = meta.entity_key().to_id();
        let entity: entities::AdminTransferFailure = store.load(&id).unwrap().unwrap();
        assert_eq!(entity.recipient, Address::with_last_byte(1));
        assert_eq!(entity.amount, U256::from(234));

        let raw = store.get("AdminTransferFailure", &id).unwrap().unwrap();
        assert_eq!(raw["amount"], serde_json::json!("234"));
    }
}
