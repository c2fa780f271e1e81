//! Decoded contract events.

use serde::{Deserialize, Serialize};
use stkr_indexer_core::{Address, Bytes, EventMeta, U256};

/// A decoded log together with its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub meta: EventMeta,
    pub event: Event,
}

/// Events emitted by the `StickerDesigns`, `StickerChain`, `StickerObjectives` and
/// `PaymentMethod` contracts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    AdminFeeRecipientChanged(AdminFeeRecipientChanged),
    OwnershipTransferred(OwnershipTransferred),
    PublisherReputationFeeChanged(PublisherReputationFeeChanged),
    StickerRegistrationFeeChanged(StickerRegistrationFeeChanged),
    StickerDesignPublished(StickerDesignPublished),
    StickerPriceSet(StickerPriceSet),
    StickerEndTimeChanged(StickerEndTimeChanged),
    StickerCapped(StickerCapped),
    StickerPublisherChanged(StickerPublisherChanged),
    StickerSlapped(StickerSlapped),
    AdminTransferFailure(AdminTransferFailure),
    NewObjective(NewObjective),
    ObjectiveBanned(ObjectiveBanned),
    ObjectiveUnbanned(ObjectiveUnbanned),
    CoinAdded(CoinAdded),
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::AdminFeeRecipientChanged(_) => "AdminFeeRecipientChanged",
            Event::OwnershipTransferred(_) => "OwnershipTransferred",
            Event::PublisherReputationFeeChanged(_) => "PublisherReputationFeeChanged",
            Event::StickerRegistrationFeeChanged(_) => "StickerRegistrationFeeChanged",
            Event::StickerDesignPublished(_) => "StickerDesignPublished",
            Event::StickerPriceSet(_) => "StickerPriceSet",
            Event::StickerEndTimeChanged(_) => "StickerEndTimeChanged",
            Event::StickerCapped(_) => "StickerCapped",
            Event::StickerPublisherChanged(_) => "StickerPublisherChanged",
            Event::StickerSlapped(_) => "StickerSlapped",
            Event::AdminTransferFailure(_) => "AdminTransferFailure",
            Event::NewObjective(_) => "NewObjective",
            Event::ObjectiveBanned(_) => "ObjectiveBanned",
            Event::ObjectiveUnbanned(_) => "ObjectiveUnbanned",
            Event::CoinAdded(_) => "CoinAdded",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminFeeRecipientChanged {
    pub new_recipient: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublisherReputationFeeChanged {
    pub new_fee: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerRegistrationFeeChanged {
    pub new_fee: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerDesignPublished {
    pub sticker_id: U256,
    pub publisher: Address,
    pub payout_address: Address,
    /// Raw bytes of the metadata CID. Not every publish carries one.
    #[serde(rename = "metadataCID", default)]
    pub metadata_cid: Option<Bytes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerPriceSet {
    pub sticker_id: U256,
    pub payment_method_id: U256,
    pub price: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerEndTimeChanged {
    pub sticker_id: U256,
    pub end_time: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerCapped {
    pub sticker_id: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerPublisherChanged {
    pub sticker_id: U256,
    pub from: Address,
    pub to: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerSlapped {
    pub place_id: U256,
    pub slap_id: U256,
    pub sticker_id: U256,
    pub player: Address,
    pub size: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminTransferFailure {
    pub recipient: Address,
    pub amount: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewObjective {
    pub objective: Address,
    pub objective_id: U256,
    pub dev: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveBanned {
    pub objective: Address,
    pub objective_id: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectiveUnbanned {
    pub objective: Address,
    pub objective_id: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinAdded {
    pub coin: Address,
    pub coin_id: U256,
}
