//! Run the mappings over a recorded event log.

use std::{
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use clap::Args;
use error_stack::{Result, ResultExt};
use stkr_entity_sqlite::SqliteEntityStore;
use stkr_indexer_core::EntityStore;
use stkr_mappings::{events::EventRecord, ContractStateReader, DataSourceRequest, Mappings};
use tracing::{info, warn};

use crate::{cli::or_env, error::CliError, snapshot::SnapshotStateReader};

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Path to the event log, one json encoded event per line.
    #[arg(long, short = 'e')]
    pub events: PathBuf,
    /// Path to the contract state snapshot used to answer contract reads.
    #[arg(long, short = 's')]
    pub state: PathBuf,
    /// Directory with the sticker metadata documents, named `<cid>.json`.
    #[arg(long, env = METADATA_DIR_ENV)]
    pub metadata_dir: Option<PathBuf>,
    /// Path to the sqlite database the entities are written to. Defaults to `stkr.db`.
    #[arg(long, env = DATABASE_ENV)]
    pub database: Option<PathBuf>,
}

const METADATA_DIR_ENV: &str = "STKR_METADATA_DIR";
const DATABASE_ENV: &str = "STKR_DATABASE";
const DEFAULT_DATABASE: &str = "stkr.db";

/// Counters of a completed replay.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub metadata_documents: usize,
    pub missing_metadata_documents: usize,
}

pub async fn run(args: ReplayArgs) -> Result<(), CliError> {
    let metadata_dir = or_env(args.metadata_dir, METADATA_DIR_ENV)?;
    let database =
        or_env(args.database, DATABASE_ENV)?.unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));

    let reader = SnapshotStateReader::from_file(&args.state)?;
    let store = SqliteEntityStore::open(&database)
        .change_context(CliError::Configuration)
        .attach_printable("failed to open entity database")?;

    let events = fs::File::open(&args.events)
        .change_context(CliError::Configuration)
        .attach_printable_lazy(|| format!("failed to open event log {}", args.events.display()))?;

    let mut mappings = Mappings::new(store, reader);
    let summary = replay(
        &mut mappings,
        BufReader::new(events),
        metadata_dir.as_deref(),
    )?;

    info!(
        events = summary.events,
        metadata_documents = summary.metadata_documents,
        missing_metadata_documents = summary.missing_metadata_documents,
        database = %database.display(),
        "replay completed"
    );

    Ok(())
}

/// Handle every event of `events` in order.
///
/// Stops at the first event that fails, leaving the entities written so far in the store.
pub fn replay<S, R>(
    mappings: &mut Mappings<S, R>,
    events: impl BufRead,
    metadata_dir: Option<&Path>,
) -> Result<ReplaySummary, CliError>
where
    S: EntityStore,
    R: ContractStateReader,
{
    let mut summary = ReplaySummary::default();

    for (line_number, line) in events.lines().enumerate() {
        let line = line
            .change_context(CliError::Runtime)
            .attach_printable("failed to read event log")?;
        if line.trim().is_empty() {
            continue;
        }

        let record: EventRecord = serde_json::from_str(&line)
            .change_context(CliError::Runtime)
            .attach_printable_lazy(|| format!("invalid event at line {}", line_number + 1))?;

        mappings
            .handle_event(&record)
            .change_context(CliError::Runtime)
            .attach_printable_lazy(|| format!("failed to handle event at line {}", line_number + 1))?;
        summary.events += 1;

        for request in mappings.take_data_sources() {
            match request {
                DataSourceRequest::StickerMetadata { cid } => {
                    let Some(content) = read_metadata_document(metadata_dir, &cid)? else {
                        summary.missing_metadata_documents += 1;
                        continue;
                    };

                    let written = mappings
                        .handle_sticker_metadata(&cid, &content)
                        .change_context(CliError::Runtime)
                        .attach_printable_lazy(|| format!("failed to handle metadata {cid}"))?;
                    if written {
                        summary.metadata_documents += 1;
                    }
                }
            }
        }
    }

    Ok(summary)
}

fn read_metadata_document(dir: Option<&Path>, cid: &str) -> Result<Option<Vec<u8>>, CliError> {
    let Some(dir) = dir else {
        return Ok(None);
    };

    // cids are untrusted input, keep them inside the metadata directory.
    if cid.contains(['/', '\\']) || cid.starts_with('.') {
        warn!(cid, "skipping metadata with invalid cid");
        return Ok(None);
    }

    let path = dir.join(format!("{cid}.json"));
    if !path.is_file() {
        warn!(cid, path = %path.display(), "metadata document not found");
        return Ok(None);
    }

    let content = fs::read(&path)
        .change_context(CliError::Runtime)
        .attach_printable_lazy(|| format!("failed to read metadata document {}", path.display()))?;

    Ok(Some(content))
}
