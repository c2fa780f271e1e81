#![allow(dead_code)]

use std::{cell::RefCell, collections::HashMap};

use error_stack::{report, Result};
use stkr_indexer_core::{Address, EventMeta, B256, U256};
use stkr_mappings::{
    events::{Event, EventRecord},
    ContractReadError, ContractStateReader, Erc20Metadata, SlapState, StickerDesignState,
};

/// A reader returning whatever state the test configured last.
#[derive(Default)]
pub struct FixedStateReader {
    designs: RefCell<HashMap<U256, StickerDesignState>>,
    slaps: RefCell<HashMap<U256, SlapState>>,
    tokens: RefCell<HashMap<Address, Erc20Metadata>>,
    reads: RefCell<usize>,
}

impl FixedStateReader {
    pub fn set_design(&self, sticker_id: u64, state: StickerDesignState) {
        self.designs
            .borrow_mut()
            .insert(U256::from(sticker_id), state);
    }

    pub fn set_slap(&self, slap_id: u64, state: SlapState) {
        self.slaps.borrow_mut().insert(U256::from(slap_id), state);
    }

    pub fn set_token(&self, token: Address, metadata: Erc20Metadata) {
        self.tokens.borrow_mut().insert(token, metadata);
    }

    pub fn reads(&self) -> usize {
        *self.reads.borrow()
    }
}

impl ContractStateReader for FixedStateReader {
    fn sticker_design(
        &self,
        _contract: Address,
        sticker_id: U256,
    ) -> Result<StickerDesignState, ContractReadError> {
        *self.reads.borrow_mut() += 1;
        self.designs
            .borrow()
            .get(&sticker_id)
            .cloned()
            .ok_or_else(|| report!(ContractReadError).attach_printable("unknown sticker"))
    }

    fn slap(&self, _contract: Address, slap_id: U256) -> Result<SlapState, ContractReadError> {
        *self.reads.borrow_mut() += 1;
        self.slaps
            .borrow()
            .get(&slap_id)
            .cloned()
            .ok_or_else(|| report!(ContractReadError).attach_printable("unknown slap"))
    }

    fn erc20_metadata(&self, token: Address) -> Result<Erc20Metadata, ContractReadError> {
        *self.reads.borrow_mut() += 1;
        self.tokens
            .borrow()
            .get(&token)
            .cloned()
            .ok_or_else(|| report!(ContractReadError).attach_printable("unknown token"))
    }
}

pub fn publisher() -> Address {
    Address::repeat_byte(0x0a)
}

pub fn payout() -> Address {
    Address::repeat_byte(0x0b)
}

pub fn designs_contract() -> Address {
    Address::repeat_byte(0xd0)
}

pub fn new_record(tx_byte: u8, log_index: u32, block_number: u64, event: Event) -> EventRecord {
    EventRecord {
        meta: EventMeta {
            transaction_hash: B256::repeat_byte(tx_byte),
            log_index,
            block_number,
            block_timestamp: 1_700_000_000 + block_number * 2,
            address: designs_contract(),
        },
        event,
    }
}

pub fn design_state(price: u64, end_time: u64) -> StickerDesignState {
    StickerDesignState {
        current_publisher: publisher(),
        payout_address: payout(),
        price: U256::from(price),
        end_time: U256::from(end_time),
        payment_method_id: U256::from(1),
        published_at: U256::from(1_700_000_000u64),
        limit: U256::from(100),
        limit_to_holders: false,
    }
}
