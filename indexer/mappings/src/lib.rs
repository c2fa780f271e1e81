//! Entity mappings for the STKR contracts.
//!
//! Each handler turns one decoded log into one entity write. Handlers of long-lived objects
//! (sticker designs, slaps and coins) read the current contract state through a
//! [ContractStateReader] and store that state instead of trusting the event payload alone.

pub mod entities;
mod error;
pub mod events;
pub mod handlers;
mod mappings;
mod reader;

pub use self::error::MappingError;
pub use self::handlers::DataSourceRequest;
pub use self::mappings::Mappings;
pub use self::reader::{
    ContractReadError, ContractStateReader, Erc20Metadata, SlapState, StickerDesignState,
};
