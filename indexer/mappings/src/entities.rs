//! Entities written by the handlers.
//!
//! Integers wider than 64 bits are stored as decimal strings.

use serde::{Deserialize, Serialize};
use stkr_indexer_core::{bigint, Address, Bytes, Entity, EventMeta, B256, U256};

use crate::reader::StickerDesignState;

macro_rules! entity {
    ($name:ident) => {
        impl Entity for $name {
            const KIND: &'static str = stringify!($name);

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminFeeRecipientChanged {
    pub id: String,
    pub new_recipient: Address,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipTransferred {
    pub id: String,
    pub previous_owner: Address,
    pub new_owner: Address,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherReputationFeeChanged {
    pub id: String,
    #[serde(with = "bigint")]
    pub new_fee: U256,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerRegistrationFeeChanged {
    pub id: String,
    #[serde(with = "bigint")]
    pub new_fee: U256,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTransferFailure {
    pub id: String,
    pub recipient: Address,
    #[serde(with = "bigint")]
    pub amount: U256,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewObjective {
    pub id: String,
    pub objective: Address,
    #[serde(with = "bigint")]
    pub objective_id: U256,
    pub dev: Address,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveBanned {
    pub id: String,
    pub objective: Address,
    #[serde(with = "bigint")]
    pub objective_id: U256,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveUnbanned {
    pub id: String,
    pub objective: Address,
    #[serde(with = "bigint")]
    pub objective_id: U256,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
}

/// A published sticker design, one record per event that touched it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerDesign {
    pub id: String,
    #[serde(with = "bigint")]
    pub sticker_id: U256,
    /// Only known once the publish event has been indexed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_publisher: Option<Address>,
    pub current_publisher: Address,
    pub payout_address: Address,
    #[serde(
        rename = "metadataCID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata_cid: Option<Bytes>,
    #[serde(with = "bigint")]
    pub price: U256,
    #[serde(with = "bigint")]
    pub end_time: U256,
    #[serde(with = "bigint")]
    pub payment_method_id: U256,
    #[serde(with = "bigint")]
    pub published_at: U256,
    #[serde(with = "bigint")]
    pub limit: U256,
    pub limit_to_holders: bool,
    pub capped: bool,
    pub block_number: u64,
    pub block_timestamp: u64,
    pub transaction_hash: B256,
}

/// A sticker placed on the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slap {
    pub id: String,
    #[serde(with = "bigint")]
    pub slap_id: U256,
    #[serde(with = "bigint")]
    pub place_id: U256,
    #[serde(with = "bigint")]
    pub sticker_id: U256,
    pub player: Address,
    pub owner: Address,
    #[serde(with = "bigint")]
    pub size: U256,
    #[serde(with = "bigint")]
    pub height: U256,
    #[serde(with = "bigint::vec")]
    pub objective_ids: Vec<U256>,
    pub slapped_at: u64,
    pub block_number: u64,
}

/// A payment method registered with the `PaymentMethod` contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coin {
    pub id: String,
    pub address: Address,
    #[serde(with = "bigint")]
    pub payment_method_id: U256,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Off-chain sticker metadata, keyed by the CID of its document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerMetadata {
    pub id: String,
    #[serde(rename = "imageCID")]
    pub image_cid: String,
    pub filename: String,
    pub content_type: String,
    pub aspect_ratio: u64,
    pub size: u64,
}

entity!(AdminFeeRecipientChanged);
entity!(OwnershipTransferred);
entity!(PublisherReputationFeeChanged);
entity!(StickerRegistrationFeeChanged);
entity!(AdminTransferFailure);
entity!(NewObjective);
entity!(ObjectiveBanned);
entity!(ObjectiveUnbanned);
entity!(StickerDesign);
entity!(Slap);
entity!(Coin);
entity!(StickerMetadata);

impl StickerDesign {
    /// Create the record for `sticker_id` at the given event.
    ///
    /// Fields that only the publish event carries are copied from `prior`, when present.
    pub fn new(meta: &EventMeta, sticker_id: U256, prior: Option<&StickerDesign>) -> Self {
        let mut design = StickerDesign {
            id: meta.entity_key().to_id(),
            sticker_id,
            original_publisher: None,
            current_publisher: Address::ZERO,
            payout_address: Address::ZERO,
            metadata_cid: None,
            price: U256::ZERO,
            end_time: U256::ZERO,
            payment_method_id: U256::ZERO,
            published_at: U256::ZERO,
            limit: U256::ZERO,
            limit_to_holders: false,
            capped: false,
            block_number: meta.block_number,
            block_timestamp: meta.block_timestamp,
            transaction_hash: meta.transaction_hash,
        };

        if let Some(prior) = prior {
            design.original_publisher = prior.original_publisher;
            design.current_publisher = prior.current_publisher;
            design.payout_address = prior.payout_address;
            design.metadata_cid = prior.metadata_cid.clone();
            design.capped = prior.capped;
        }

        design
    }

    /// Overwrite the snapshot fields with the contract state.
    pub fn reconcile(&mut self, state: &StickerDesignState) {
        self.current_publisher = state.current_publisher;
        self.payout_address = state.payout_address;
        self.price = state.price;
        self.end_time = state.end_time;
        self.payment_method_id = state.payment_method_id;
        self.published_at = state.published_at;
        self.limit = state.limit;
        self.limit_to_holders = state.limit_to_holders;
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use stkr_indexer_core::{Address, EventMeta, B256, U256};

    use super::StickerDesign;

    fn meta() -> EventMeta {
        EventMeta {
            transaction_hash: B256::repeat_byte(0xaa),
            log_index: 3,
            block_number: 10,
            block_timestamp: 1_700_000_000,
            address: Address::repeat_byte(0x01),
        }
    }

    #[test]
    fn test_unset_optional_fields_are_omitted() {
        let design = StickerDesign::new(&meta(), U256::from(7), None);
        let value = serde_json::to_value(&design).unwrap();

        assert!(value.get("metadataCID").is_none());
        assert!(value.get("originalPublisher").is_none());
        assert_eq!(value["stickerId"], json!("7"));
        assert_eq!(value["capped"], json!(false));

        let back: StickerDesign = serde_json::from_value(value).unwrap();
        assert_eq!(back, design);
    }

    #[test]
    fn test_new_copies_prior_fields() {
        let mut prior = StickerDesign::new(&meta(), U256::from(7), None);
        prior.original_publisher = Some(Address::repeat_byte(0x0a));
        prior.metadata_cid = Some(vec![0x12, 0x34].into());
        prior.capped = true;
        prior.price = U256::from(100);

        let mut next_meta = meta();
        next_meta.log_index = 4;
        let design = StickerDesign::new(&next_meta, U256::from(7), Some(&prior));

        assert_ne!(design.id, prior.id);
        assert_eq!(design.original_publisher, prior.original_publisher);
        assert_eq!(design.metadata_cid, prior.metadata_cid);
        assert!(design.capped);
        // snapshot fields come from the contract, not from the prior record.
        assert_eq!(design.price, U256::ZERO);
    }
}
