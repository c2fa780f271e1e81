use std::fmt;

use error_stack::Result;
use serde::{Deserialize, Serialize};
use stkr_indexer_core::{Address, U256};

#[derive(Debug)]
pub struct ContractReadError;

/// Current state of a sticker design, as returned by `StickerDesigns.getStickerDesign`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StickerDesignState {
    pub current_publisher: Address,
    pub payout_address: Address,
    pub price: U256,
    pub end_time: U256,
    pub payment_method_id: U256,
    pub published_at: U256,
    pub limit: U256,
    pub limit_to_holders: bool,
}

/// Current state of a slap, as returned by `StickerChain.getSlap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlapState {
    pub height: U256,
    pub objective_ids: Vec<U256>,
}

/// ERC20 token details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Erc20Metadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Synchronous read access to the contracts' current state.
///
/// Implementations are expected to read at the block of the event being handled.
#[cfg_attr(test, mockall::automock)]
pub trait ContractStateReader {
    /// Read the sticker design `sticker_id` from the `StickerDesigns` contract at `contract`.
    fn sticker_design(
        &self,
        contract: Address,
        sticker_id: U256,
    ) -> Result<StickerDesignState, ContractReadError>;

    /// Read the slap `slap_id` from the `StickerChain` contract at `contract`.
    fn slap(&self, contract: Address, slap_id: U256) -> Result<SlapState, ContractReadError>;

    /// Read name, symbol and decimals of the ERC20 token at `token`.
    fn erc20_metadata(&self, token: Address) -> Result<Erc20Metadata, ContractReadError>;
}

impl<R: ContractStateReader + ?Sized> ContractStateReader for &R {
    fn sticker_design(
        &self,
        contract: Address,
        sticker_id: U256,
    ) -> Result<StickerDesignState, ContractReadError> {
        (**self).sticker_design(contract, sticker_id)
    }

    fn slap(&self, contract: Address, slap_id: U256) -> Result<SlapState, ContractReadError> {
        (**self).slap(contract, slap_id)
    }

    fn erc20_metadata(&self, token: Address) -> Result<Erc20Metadata, ContractReadError> {
        (**self).erc20_metadata(token)
    }
}

impl error_stack::Context for ContractReadError {}

impl fmt::Display for ContractReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("contract read failed")
    }
}
