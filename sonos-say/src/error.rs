//! Top-level error type for a say-and-play run.

use thiserror::Error;

use crate::speaker::SpeakerError;
use crate::speech::SpeechError;

#[derive(Debug, Error)]
pub enum SayError {
    #[error(transparent)]
    Speech(#[from] SpeechError),

    #[error(transparent)]
    Speaker(#[from] SpeakerError),

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

pub type SayResult<T> = Result<T, SayError>;
