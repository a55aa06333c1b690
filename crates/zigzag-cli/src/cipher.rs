//! One-shot cipher commands: encode, decode, stats, shuffle, export-svg.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Args;
use zigzag_core::{IndexResolver, decoder, encoder, format_points, parse_points};
use zigzag_render::Theme;
use zigzag_runtime::{CipherSession, LabConfig};

use crate::cli::{Context, arg_or_input};
use crate::error::{CliError, Result};

#[derive(Debug, Clone, Args)]
pub struct EncodeArgs {
    /// Plaintext; read from stdin when omitted.
    pub text: Option<String>,

    /// Key to encode against (defaults to the configured key).
    #[arg(long)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct DecodeArgs {
    /// Coordinate text such as `40,100 80,124`; read from stdin when omitted.
    pub points: Option<String>,

    #[arg(long)]
    pub key: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct StatsArgs {
    /// Key to inspect (defaults to the configured key).
    pub key: Option<String>,

    /// Print the counts as a JSON object.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ShuffleArgs {
    /// Key to shuffle (defaults to the configured key).
    pub key: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ExportSvgArgs {
    /// Plaintext; read from stdin when omitted.
    pub text: Option<String>,

    #[arg(long)]
    pub key: Option<String>,

    #[arg(long, default_value_t = Theme::Light)]
    pub theme: Theme,

    /// Output file (stdout when omitted).
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run_encode(
    args: EncodeArgs,
    ctx: &Context,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    let text = arg_or_input(args.text, input)?;
    let key = ctx.key(args.key.as_deref());
    let mut resolver = IndexResolver::new(ctx.picker());
    let points = encoder::encode(&text, &key, &mut resolver, &ctx.config.layout);
    if points.is_empty() {
        tracing::info!(key = key.as_str(), "no plaintext letter is in the key");
    }
    writeln!(out, "{}", format_points(&points))?;
    Ok(())
}

/// Parse errors abort before any output and exit with code 2.
pub fn run_decode(
    args: DecodeArgs,
    ctx: &Context,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    let raw = arg_or_input(args.points, input)?;
    let points = parse_points(&raw)?;
    let key = ctx.key(args.key.as_deref());
    writeln!(out, "{}", decoder::decode(&points, &key, &ctx.config.layout))?;
    Ok(())
}

pub fn run_stats(args: StatsArgs, ctx: &Context, out: &mut dyn Write) -> Result<()> {
    let stats = ctx.key(args.key.as_deref()).stats();
    if args.json {
        writeln!(out, "{}", serde_json::to_string(&stats)?)?;
    } else {
        writeln!(out, "length: {}", stats.length)?;
        writeln!(out, "duplicates: {}", stats.duplicate_count)?;
        writeln!(out, "missing: {}", stats.missing_count)?;
    }
    Ok(())
}

pub fn run_shuffle(args: ShuffleArgs, ctx: &Context, out: &mut dyn Write) -> Result<()> {
    let key = ctx.key(args.key.as_deref()).shuffled(&mut ctx.rng());
    writeln!(out, "{}", key.as_str())?;
    Ok(())
}

pub fn run_export_svg(
    args: ExportSvgArgs,
    ctx: &Context,
    out: &mut dyn Write,
    input: &mut dyn BufRead,
) -> Result<()> {
    let text = arg_or_input(args.text, input)?;
    let config = LabConfig {
        key: ctx.key(args.key.as_deref()).as_str().to_owned(),
        ..ctx.config.clone()
    };
    let mut session = CipherSession::new(config, ctx.picker());
    session.set_plaintext(&text);
    session.redraw_encode();

    let Some(svg) = session.export_svg(args.theme) else {
        return Err(CliError::invalid(
            "nothing to export: no plaintext letter is in the key",
        ));
    };
    match args.output {
        Some(path) => {
            std::fs::write(&path, svg)?;
            tracing::info!(path = %path.display(), theme = %args.theme, "wrote svg");
        }
        None => out.write_all(svg.as_bytes())?,
    }
    Ok(())
}
