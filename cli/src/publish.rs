//! Publish the default sticker designs with `forge script`.

use std::{
    env, fs,
    path::{Path, PathBuf},
    process::Stdio,
};

use async_trait::async_trait;
use clap::Args;
use colored::*;
use error_stack::{report, Result, ResultExt};
use serde::Deserialize;
use tokio::process::Command;
use tracing::{error, info};

use crate::{cli::or_env, error::CliError};

const FORGE_BINARY: &str = "forge";
const DEFAULT_CHAIN_ID: u64 = 84532;
const DEFAULT_ACCOUNT: &str = "deployer";

const STICKERS_FILE_ENV: &str = "STKR_STICKERS_FILE";
const RPC_URL_ENV: &str = "STAGING_RPC";
const FORGE_PATH_ENV: &str = "FORGE_PATH";
const CHAIN_ID_ENV: &str = "STKR_CHAIN_ID";
const ACCOUNT_ENV: &str = "STKR_ACCOUNT";

#[derive(Args, Debug, Default)]
pub struct PublishArgs {
    /// Path to the json file with the sticker designs to publish.
    #[arg(long, short = 'i', env = STICKERS_FILE_ENV)]
    pub input: Option<PathBuf>,
    /// RPC endpoint used to broadcast the transactions.
    #[arg(long, env = RPC_URL_ENV)]
    pub rpc_url: Option<String>,
    /// Path to the forge binary. Looked up in `$PATH` if not set.
    #[arg(long, env = FORGE_PATH_ENV)]
    pub forge_path: Option<PathBuf>,
    /// Chain id passed to forge. Defaults to Base Sepolia (84532).
    #[arg(long, env = CHAIN_ID_ENV)]
    pub chain_id: Option<u64>,
    /// Name of the forge keystore account used to sign. Defaults to `deployer`.
    #[arg(long, env = ACCOUNT_ENV)]
    pub account: Option<String>,
    /// The forge script that publishes one sticker.
    #[arg(long, default_value = "11_PublishASticker.sol:PublishASticker")]
    pub script: String,
    /// Signature of the script entrypoint.
    #[arg(long, default_value = "run(string,string)")]
    pub signature: String,
}

/// Configuration of the publishing run, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishConfig {
    pub input: PathBuf,
    pub forge_path: PathBuf,
    pub rpc_url: String,
    pub chain_id: u64,
    pub account: String,
    pub script: String,
    pub signature: String,
}

/// One entry of the input file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StickerToPublish {
    #[serde(rename = "metadataCID")]
    pub metadata_cid: String,
    #[serde(rename = "imageCID")]
    pub image_cid: String,
}

#[derive(Debug, Deserialize)]
struct StickerDesignsFile {
    data: Vec<StickerToPublish>,
}

/// The result of publishing one sticker.
#[derive(Debug)]
pub struct PublishOutcome {
    pub sticker: StickerToPublish,
    pub result: Result<(), CliError>,
}

/// Runs an external program to completion.
#[async_trait]
pub trait CommandRunner {
    /// Run `program` with `args`. Fails if the program can't be spawned or exits unsuccessfully.
    async fn run(&self, program: &Path, args: &[String]) -> Result<(), CliError>;
}

/// Spawns a child process that inherits stdio.
#[derive(Debug, Default)]
pub struct ProcessRunner;

pub async fn run(args: PublishArgs) -> Result<(), CliError> {
    let config = PublishConfig::from_args(&args)?;
    let stickers = load_stickers(&config.input)?;

    let outcomes = publish_all(&config, &stickers, &ProcessRunner).await;

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    let summary = format!(
        "Published {}/{} stickers",
        outcomes.len() - failed,
        outcomes.len()
    );
    if failed == 0 {
        println!("{}", summary.green());
    } else {
        println!("{}", summary.yellow());
    }

    Ok(())
}

/// Publish each sticker in order, continuing past failures.
pub async fn publish_all<R>(
    config: &PublishConfig,
    stickers: &[StickerToPublish],
    runner: &R,
) -> Vec<PublishOutcome>
where
    R: CommandRunner + ?Sized,
{
    info!(count = stickers.len(), "found stickers to publish");

    let mut outcomes = Vec::with_capacity(stickers.len());
    for (index, sticker) in stickers.iter().enumerate() {
        let args = config.forge_args(sticker);
        info!(
            metadata_cid = %sticker.metadata_cid,
            image_cid = %sticker.image_cid,
            command = %format!("{} {}", config.forge_path.display(), args.join(" ")),
            "publishing sticker"
        );

        let result = runner.run(&config.forge_path, &args).await;
        match &result {
            Ok(_) => {
                info!(
                    metadata_cid = %sticker.metadata_cid,
                    progress = %format!("{}/{}", index + 1, stickers.len()),
                    "published sticker"
                );
            }
            Err(err) => {
                error!(
                    metadata_cid = %sticker.metadata_cid,
                    item = index + 1,
                    err = ?err,
                    "failed to publish sticker"
                );
            }
        }

        outcomes.push(PublishOutcome {
            sticker: sticker.clone(),
            result,
        });
    }

    info!("finished processing all stickers");

    outcomes
}

/// Load the stickers from a `{ "data": [{ "metadataCID", "imageCID" }] }` file.
pub fn load_stickers(path: &Path) -> Result<Vec<StickerToPublish>, CliError> {
    let content = fs::read_to_string(path)
        .change_context(CliError::Configuration)
        .attach_printable_lazy(|| format!("failed to read stickers file {}", path.display()))?;

    let file: StickerDesignsFile = serde_json::from_str(&content)
        .change_context(CliError::Configuration)
        .attach_printable_lazy(|| format!("failed to parse stickers file {}", path.display()))?;

    Ok(file.data)
}

impl PublishConfig {
    /// Resolve the configuration from the command line arguments.
    ///
    /// Options missing from the command line are read from the process environment, which
    /// includes the variables of the env file.
    pub fn from_args(args: &PublishArgs) -> Result<Self, CliError> {
        let Some(input) = or_env(args.input.clone(), STICKERS_FILE_ENV)? else {
            return Err(report!(CliError::Configuration).attach_printable(format!(
                "stickers file not set. Use --input or {STICKERS_FILE_ENV}"
            )));
        };

        let Some(rpc_url) = or_env(args.rpc_url.clone(), RPC_URL_ENV)? else {
            return Err(report!(CliError::Configuration)
                .attach_printable(format!("{RPC_URL_ENV} environment variable is not set")));
        };

        let chain_id = or_env(args.chain_id, CHAIN_ID_ENV)?.unwrap_or(DEFAULT_CHAIN_ID);
        let account = or_env(args.account.clone(), ACCOUNT_ENV)?
            .unwrap_or_else(|| DEFAULT_ACCOUNT.to_string());

        let forge_path = match &or_env(args.forge_path.clone(), FORGE_PATH_ENV)? {
            Some(path) if is_executable(path) => path.clone(),
            Some(path) => {
                return Err(report!(CliError::Configuration).attach_printable(format!(
                    "forge binary not found or not executable at {}",
                    path.display()
                )));
            }
            None => find_in_path(FORGE_BINARY).ok_or_else(|| {
                report!(CliError::Configuration).attach_printable(
                    "forge command not found. Please ensure forge is installed and in your PATH",
                )
            })?,
        };

        Ok(PublishConfig {
            input,
            forge_path,
            rpc_url,
            chain_id,
            account,
            script: args.script.clone(),
            signature: args.signature.clone(),
        })
    }

    /// Arguments of the `forge script` invocation for one sticker.
    pub fn forge_args(&self, sticker: &StickerToPublish) -> Vec<String> {
        vec![
            "script".to_string(),
            "--chain-id".to_string(),
            self.chain_id.to_string(),
            "--rpc-url".to_string(),
            self.rpc_url.clone(),
            "--account".to_string(),
            self.account.clone(),
            self.script.clone(),
            "--sig".to_string(),
            self.signature.clone(),
            sticker.metadata_cid.clone(),
            sticker.image_cid.clone(),
            "--broadcast".to_string(),
        ]
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &Path, args: &[String]) -> Result<(), CliError> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .change_context(CliError::Runtime)
            .attach_printable_lazy(|| format!("failed to run {}", program.display()))?;

        if !status.success() {
            return Err(report!(CliError::Runtime)
                .attach_printable(format!("process exited with {status}")));
        }

        Ok(())
    }
}

fn find_in_path(binary: &str) -> Option<PathBuf> {
    let paths = env::var_os("PATH")?;
    env::split_paths(&paths)
        .map(|dir| dir.join(binary))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    fs::metadata(path)
        .map(|metadata| metadata.is_file() && metadata.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
