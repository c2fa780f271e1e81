use std::{collections::HashMap, fs, path::Path};

use error_stack::{report, Result, ResultExt};
use serde::Deserialize;
use stkr_indexer_core::{Address, U256};
use stkr_mappings::{
    ContractReadError, ContractStateReader, Erc20Metadata, SlapState, StickerDesignState,
};

use crate::error::CliError;

/// Contract state captured at a single point in time.
///
/// Every read returns the captured state, whatever the block of the event being handled.
#[derive(Debug, Default)]
pub struct SnapshotStateReader {
    designs: HashMap<(Address, U256), StickerDesignState>,
    slaps: HashMap<(Address, U256), SlapState>,
    tokens: HashMap<Address, Erc20Metadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotFile {
    #[serde(default)]
    sticker_designs: Vec<StickerDesignEntry>,
    #[serde(default)]
    slaps: Vec<SlapEntry>,
    #[serde(default)]
    tokens: Vec<TokenEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StickerDesignEntry {
    contract: Address,
    sticker_id: U256,
    state: StickerDesignState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SlapEntry {
    contract: Address,
    slap_id: U256,
    state: SlapState,
}

#[derive(Debug, Deserialize)]
struct TokenEntry {
    address: Address,
    #[serde(flatten)]
    metadata: Erc20Metadata,
}

impl SnapshotStateReader {
    pub fn from_file(path: &Path) -> Result<Self, CliError> {
        let content = fs::read_to_string(path)
            .change_context(CliError::Configuration)
            .attach_printable_lazy(|| format!("failed to read state file {}", path.display()))?;
        Self::from_json(&content).attach_printable_lazy(|| format!("state file: {}", path.display()))
    }

    pub fn from_json(content: &str) -> Result<Self, CliError> {
        let file: SnapshotFile = serde_json::from_str(content)
            .change_context(CliError::Configuration)
            .attach_printable("failed to parse contract state")?;

        let designs = file
            .sticker_designs
            .into_iter()
            .map(|entry| ((entry.contract, entry.sticker_id), entry.state))
            .collect();
        let slaps = file
            .slaps
            .into_iter()
            .map(|entry| ((entry.contract, entry.slap_id), entry.state))
            .collect();
        let tokens = file
            .tokens
            .into_iter()
            .map(|entry| (entry.address, entry.metadata))
            .collect();

        Ok(SnapshotStateReader {
            designs,
            slaps,
            tokens,
        })
    }
}

impl ContractStateReader for SnapshotStateReader {
    fn sticker_design(
        &self,
        contract: Address,
        sticker_id: U256,
    ) -> Result<StickerDesignState, ContractReadError> {
        self.designs
            .get(&(contract, sticker_id))
            .cloned()
            .ok_or_else(|| {
                report!(ContractReadError).attach_printable(format!(
                    "sticker design {sticker_id} of {contract} not in snapshot"
                ))
            })
    }

    fn slap(&self, contract: Address, slap_id: U256) -> Result<SlapState, ContractReadError> {
        self.slaps
            .get(&(contract, slap_id))
            .cloned()
            .ok_or_else(|| {
                report!(ContractReadError)
                    .attach_printable(format!("slap {slap_id} of {contract} not in snapshot"))
            })
    }

    fn erc20_metadata(&self, token: Address) -> Result<Erc20Metadata, ContractReadError> {
        self.tokens.get(&token).cloned().ok_or_else(|| {
            report!(ContractReadError).attach_printable(format!("token {token} not in snapshot"))
        })
    }
}
