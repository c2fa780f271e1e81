pub mod bigint;
mod event;
mod store;

pub use alloy_primitives::{Address, Bytes, B256, U256};

pub use self::event::{EntityKey, EventMeta, EventPosition};
pub use self::store::{
    Context, Entity, EntityStore, EntityStoreError, EntityStoreExt, MemoryEntityStore,
};
