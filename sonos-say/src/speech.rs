//! Speech file assembly: alert sound + synthesized audio → one MP3 file.
//!
//! The file is written unbuffered so that every piece is on the share as
//! soon as it arrives. Texts at or over the length limit are split with
//! [`text_chunks`] and requested piece by piece.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::chunker::text_chunks;
use crate::config::{ShareConfig, TtsConfig};
use crate::keywords;
use crate::synth::{Part, SynthesisError, SynthesisRequest, Synthesizer};

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("can't open '{}' to write MP3: {source}", .path.display())]
    CreateOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed writing '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Synthesis(#[from] SynthesisError),
}

/// Write `words` as speech to `save_to`, preceded by the alert file if given.
///
/// A missing or unreadable alert is only a warning. On any other failure the
/// partially written file is left in place.
pub fn build_speech(
    words: &str,
    save_to: &Path,
    alert: Option<&Path>,
    tts: &TtsConfig,
    synth: &dyn Synthesizer,
) -> Result<(), SpeechError> {
    let mut out = File::create(save_to).map_err(|source| SpeechError::CreateOutput {
        path: save_to.to_path_buf(),
        source,
    })?;

    let mut write = |bytes: &[u8]| {
        out.write_all(bytes).map_err(|source| SpeechError::Write {
            path: save_to.to_path_buf(),
            source,
        })
    };

    if let Some(alert) = alert {
        match fs::read(alert) {
            Ok(bytes) => {
                debug!("Prepending {} bytes of alert from {}", bytes.len(), alert.display());
                write(&bytes)?;
            }
            Err(e) => warn!("Alert file \"{}\" not readable ({e}) - omitted", alert.display()),
        }
    }

    let language = tts.language.as_str();

    if words.chars().count() < tts.max_chars {
        let audio = synth.synthesize(&SynthesisRequest {
            language,
            text: words,
            part: None,
        })?;
        write(&audio)?;
    } else {
        let chunks = text_chunks(tts.max_chars, words);
        info!("Text split into {} chunks", chunks.len());

        for (idx, chunk) in chunks.iter().enumerate() {
            if chunk.is_empty() {
                continue;
            }
            let audio = synth.synthesize(&SynthesisRequest {
                language,
                text: chunk,
                part: Some(Part {
                    total: chunks.len(),
                    idx,
                }),
            })?;
            write(&audio)?;
            thread::sleep(tts.chunk_delay());
        }
    }

    Ok(())
}

/// Expand placeholders in `text` and speak it into the share's speech file.
///
/// Returns the path of the written file.
pub fn text_to_speech_file(
    text: &str,
    share: &ShareConfig,
    tts: &TtsConfig,
    synth: &dyn Synthesizer,
) -> Result<PathBuf, SpeechError> {
    let words = keywords::replace_keys_now(text);
    debug!("Prepared text: {words}");

    let save_to = share.output_path();
    let alert = share.alert_path();

    build_speech(&words, &save_to, alert.as_deref(), tts, synth)?;
    info!("Speech written to {}", save_to.display());

    Ok(save_to)
}
