mod helpers;
mod log;
mod summary;
mod unit;

use thiserror::Error;

pub(crate) use log::cmd_log;
pub(crate) use summary::{cmd_daily, cmd_weekly};
pub(crate) use unit::cmd_unit;

/// Usage problems detected after parsing, reported on stdout with exit status 1.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    MissingArgument(&'static str),
}
