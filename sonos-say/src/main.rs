//! sonos-say: speak a line of text on a Sonos speaker.
//!
//! Converts the text to an MP3 on a network share with a remote TTS service,
//! then tells the speaker to play it from there.

mod chunker;
mod config;
mod error;
mod keywords;
mod speaker;
mod speech;
mod synth;

#[cfg(test)]
mod test_support;

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::SayResult;
use crate::speaker::{Player, SonosSpeaker};
use crate::synth::{GoogleTranslateTts, Synthesizer};

const DEFAULT_TEXT: &str = "%greet. Today is %day the %date, and the time is %time";

#[derive(Parser, Debug)]
#[command(name = "sonos-say", about = "Speak text on a Sonos speaker")]
struct Args {
    /// Text to speak. Supports %day, %time, %date and %greet.
    text: Option<String>,

    /// Path to config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Speaker address (overrides config)
    #[arg(short, long)]
    speaker: Option<String>,

    /// Only write the speech file, don't play it
    #[arg(long)]
    no_play: bool,

    /// Enable verbose (debug) logging
    #[arg(short, long)]
    verbose: bool,
}

/// Write the speech file for `text` and, if a player is given, play it.
fn say(
    text: &str,
    config: &Config,
    synth: &dyn Synthesizer,
    player: Option<&dyn Player>,
) -> SayResult<PathBuf> {
    let file = speech::text_to_speech_file(text, &config.share, &config.tts, synth)?;

    if let Some(player) = player {
        player.play_uri(&config.share.speech_uri())?;
        info!("Listen to your Sonos - check volume turned up!");
    }

    Ok(file)
}

/// Build the TTS client and, unless playback is off, the speaker client.
fn connect(
    config: &Config,
    play: bool,
) -> SayResult<(GoogleTranslateTts, Option<SonosSpeaker>)> {
    let synth = GoogleTranslateTts::new(&config.tts)?;
    let speaker = if play {
        Some(SonosSpeaker::new(&config.speaker)?)
    } else {
        None
    };
    Ok((synth, speaker))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut config = Config::load(args.config.as_deref());
    if let Some(address) = args.speaker {
        config.speaker.address = address;
    }

    let text = args.text.as_deref().unwrap_or(DEFAULT_TEXT);
    info!("Speaking {} character string \"{text}\"", text.chars().count());

    let result = connect(&config, !args.no_play).and_then(|(synth, speaker)| {
        say(text, &config, &synth, speaker.as_ref().map(|s| s as &dyn Player))
    });

    match result {
        Ok(file) => {
            info!("Done: {}", file.display());
            Ok(())
        }
        Err(e) => {
            error!("{e}");
            Err(e.into())
        }
    }
}
