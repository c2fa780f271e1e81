mod cli;
mod error;
pub mod publish;
pub mod replay;
mod snapshot;

pub use self::cli::*;
pub use self::error::*;
pub use self::snapshot::SnapshotStateReader;
