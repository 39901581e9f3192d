use thiserror::Error;

use crate::identifier::FormatError;

/// Errors surfaced by the cache gateway and the orchestrator.
///
/// The classifier itself never fails; search failures are absorbed by
/// [`Resolver`](crate::resolve::Resolver) and never appear here.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    InvalidFormat(#[from] FormatError),
    #[error("classification for {0} already exists")]
    Duplicate(String),
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
