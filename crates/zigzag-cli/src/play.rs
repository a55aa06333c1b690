//! Step-by-step playback in the terminal.
//!
//! The session's deterministic scheduler is advanced one tick interval at
//! a time, sleeping in between, so the terminal sees the same cadence as
//! the browser.

use std::io::{BufRead, Write};

use clap::Args;
use zigzag_core::format_points;
use zigzag_runtime::{CipherSession, LabConfig, PlaybackEvent, PlaybackState};

use crate::cli::{Context, arg_or_input};
use crate::error::Result;

#[derive(Debug, Clone, Args)]
pub struct PlayArgs {
    /// Plaintext, or coordinate text with `--decode`; stdin when omitted.
    pub text: Option<String>,

    /// Play a decode of coordinate text instead of an encode.
    #[arg(long)]
    pub decode: bool,

    #[arg(long)]
    pub key: Option<String>,

    /// Override the configured tick interval.
    #[arg(long = "interval-ms", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval_ms: Option<u64>,

    /// Do not sleep between steps.
    #[arg(long)]
    pub instant: bool,
}

pub fn run_play(
    args: PlayArgs,
    ctx: &Context,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    let text = arg_or_input(args.text, input)?;
    let config = LabConfig {
        key: ctx.key(args.key.as_deref()).as_str().to_owned(),
        tick_interval_ms: args.interval_ms.unwrap_or(ctx.config.tick_interval_ms),
        realtime: false,
        ..ctx.config.clone()
    };
    let mut session = CipherSession::new(config, ctx.picker());

    let started = if args.decode {
        session.play_decode(&text)?
    } else {
        session.set_plaintext(&text);
        session.play_encode()
    };
    if !started {
        writeln!(out, "nothing to play")?;
        return Ok(());
    }

    let tick = session.config().tick_interval();
    let running = |s: &CipherSession| {
        s.encode_state() == PlaybackState::Running || s.decode_state() == PlaybackState::Running
    };
    let mut revealed = Vec::new();
    while running(&session) {
        if !args.instant {
            std::thread::sleep(tick);
        }
        for event in session.advance(tick) {
            write_event(out, &event)?;
            if let PlaybackEvent::Encode { point, .. } = event {
                revealed.push(point);
            }
        }
    }

    if args.decode {
        writeln!(out, "{}", session.decoded_text())?;
    } else {
        writeln!(out, "{}", format_points(&revealed))?;
    }
    Ok(())
}

fn write_event(out: &mut dyn Write, event: &PlaybackEvent) -> Result<()> {
    match *event {
        PlaybackEvent::Encode { index, point, .. } => {
            writeln!(out, "{:>4}  {}", index + 1, format_points(&[point]))?;
        }
        PlaybackEvent::Decode {
            index,
            point,
            letter,
            ..
        } => {
            let letter = letter.unwrap_or('?');
            writeln!(out, "{:>4}  {}  {letter}", index + 1, format_points(&[point]))?;
        }
    }
    Ok(())
}
