use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecovError {
    #[error("could not read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not decode {}: {source}", path.display())]
    FileDecode {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid exclude pattern: {0}")]
    InvalidExcludePattern(#[from] regex::Error),

    #[error("base aggregate was built for '{0}' coverage, which does not match the requested metric")]
    InvalidBaseAggregate(String),

    #[error("coverage counts overflow while computing {0}")]
    CountOverflow(&'static str),
}

pub type Result<T> = std::result::Result<T, CodecovError>;
