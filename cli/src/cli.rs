use std::{env, fmt, path::PathBuf, str::FromStr};

use anstyle::{AnsiColor, Style};
use clap::{builder::Styles, Args};
use error_stack::{report, Result, ResultExt};
use tracing::debug;

use crate::error::CliError;

#[derive(Args, Debug, Default)]
pub struct DotenvOptions {
    /// Load environment variables from this file before running the command.
    #[arg(long, global = true, env = "STKR_ENV_FILE")]
    pub env_file: Option<PathBuf>,
}

/// Load the variables of the dotenv file into the process environment.
///
/// Returns the names of the variables that were set.
pub fn load_environment_variables(options: &DotenvOptions) -> Result<Vec<String>, CliError> {
    let Some(env_file) = options.env_file.as_ref() else {
        return Ok(Vec::default());
    };

    let env_iter = dotenvy::from_path_iter(env_file)
        .change_context(CliError::Configuration)
        .attach_printable_lazy(|| {
            format!(
                "failed to load environment variables from path: {}",
                env_file.display()
            )
        })?;

    let mut loaded = vec![];
    for item in env_iter {
        let (key, value) = item
            .change_context(CliError::Configuration)
            .attach_printable("invalid environment variable")?;
        debug!(env = ?key, "loaded environment variable");
        env::set_var(&key, value);
        loaded.push(key);
    }

    Ok(loaded)
}

/// Returns `value`, or the variable `key` of the process environment if `value` is not set.
///
/// Clap reads `env` fallbacks while parsing, before the env file is loaded.
pub fn or_env<T>(value: Option<T>, key: &str) -> Result<Option<T>, CliError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    if value.is_some() {
        return Ok(value);
    }

    let Ok(raw) = env::var(key) else {
        return Ok(None);
    };

    raw.parse::<T>().map(Some).map_err(|err| {
        report!(CliError::Configuration).attach_printable(format!("invalid {key} value: {err}"))
    })
}

const ACCENT: AnsiColor = AnsiColor::Magenta;
const HIGHLIGHT: AnsiColor = AnsiColor::BrightGreen;

/// Help and error colors of the stkr command line.
pub fn stkr_cli_style() -> Styles {
    let heading = Style::new().bold().underline().fg_color(Some(ACCENT.into()));
    let highlight = Style::new().fg_color(Some(HIGHLIGHT.into()));

    Styles::styled()
        .header(heading)
        .usage(heading)
        .literal(highlight.bold())
        .placeholder(Style::new().italic())
        .valid(highlight)
        .error(Style::new().bold().fg_color(Some(AnsiColor::BrightRed.into())))
        .invalid(Style::new().bold().fg_color(Some(AnsiColor::Yellow.into())))
}
