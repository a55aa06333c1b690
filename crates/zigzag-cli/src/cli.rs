use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing_subscriber::EnvFilter;
use zigzag_core::{Key, RandomPicker};
use zigzag_runtime::LabConfig;

use crate::cipher::{
    DecodeArgs, EncodeArgs, ExportSvgArgs, ShuffleArgs, StatsArgs, run_decode, run_encode,
    run_export_svg, run_shuffle, run_stats,
};
use crate::error::Result;
use crate::play::{PlayArgs, run_play};
use crate::theme::{ThemeArgs, run_theme};

/// Mixed into `--seed` for the shuffle generator so it does not mirror the
/// column picker's sequence.
const SHUFFLE_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Parser)]
#[command(
    name = "zigzag",
    about = "Plot plaintext as a zigzag path over a key alphabet, and read it back",
    version
)]
pub struct Cli {
    /// Lab configuration file (`.json` or TOML).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Seed for random column choice and shuffling.
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Encode plaintext to coordinate text.
    Encode(EncodeArgs),

    /// Decode coordinate text to plaintext.
    Decode(DecodeArgs),

    /// Print key length, duplicate, and missing-letter counts.
    Stats(StatsArgs),

    /// Print a random permutation of a key.
    Shuffle(ShuffleArgs),

    /// Write the encode view as a standalone SVG document.
    #[command(name = "export-svg")]
    ExportSvg(ExportSvgArgs),

    /// Reveal an encode or decode one step per tick.
    Play(PlayArgs),

    /// Show or toggle the stored theme preference.
    Theme(ThemeArgs),
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub config: LabConfig,
    pub seed: Option<u64>,
}

impl Context {
    pub fn load(cli: &Cli) -> Result<Self> {
        let config = match &cli.config {
            Some(path) => LabConfig::load(path)?,
            None => LabConfig::default(),
        };
        Ok(Self {
            config,
            seed: cli.seed,
        })
    }

    /// Column picker: reproducible under `--seed`, OS-seeded otherwise.
    #[must_use]
    pub fn picker(&self) -> RandomPicker {
        match self.seed {
            Some(seed) => RandomPicker::seeded(seed),
            None => RandomPicker::from_os_rng(),
        }
    }

    #[must_use]
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed ^ SHUFFLE_SALT),
            None => SmallRng::from_os_rng(),
        }
    }

    /// `--key` if given, else the configured key.
    #[must_use]
    pub fn key(&self, key: Option<&str>) -> Key {
        Key::normalize(key.unwrap_or(&self.config.key))
    }
}

/// A positional argument, or all of `input` when it was omitted.
///
/// One trailing newline is dropped from piped input.
pub fn arg_or_input(arg: Option<String>, input: &mut dyn BufRead) -> Result<String> {
    if let Some(arg) = arg {
        return Ok(arg);
    }
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    if text.ends_with('\n') {
        text.pop();
        if text.ends_with('\r') {
            text.pop();
        }
    }
    Ok(text)
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    // A subscriber may already be installed (e.g. by a test harness).
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run_from_env() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

pub fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose);
    let stdin = io::stdin();
    let stdout = io::stdout();
    execute(cli, &mut stdout.lock(), &mut stdin.lock())
}

/// Run a parsed command against explicit output and input streams.
pub fn execute(cli: Cli, out: &mut dyn Write, input: &mut dyn BufRead) -> Result<()> {
    let ctx = Context::load(&cli)?;
    tracing::debug!(command = ?cli.command, seeded = ctx.seed.is_some(), "running command");
    match cli.command {
        Commands::Encode(args) => run_encode(args, &ctx, out, input),
        Commands::Decode(args) => run_decode(args, &ctx, out, input),
        Commands::Stats(args) => run_stats(args, &ctx, out),
        Commands::Shuffle(args) => run_shuffle(args, &ctx, out),
        Commands::ExportSvg(args) => run_export_svg(args, &ctx, out, input),
        Commands::Play(args) => run_play(args, &ctx, out, input),
        Commands::Theme(args) => run_theme(args, out),
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["zigzag", "encode", "hi", "--seed", "3", "-vv"]).unwrap();
        assert_eq!(cli.seed, Some(3));
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Encode(_)));
    }

    #[test]
    fn arg_wins_over_input() {
        let mut input = Cursor::new("from stdin\n");
        assert_eq!(arg_or_input(Some("arg".into()), &mut input).unwrap(), "arg");
        assert_eq!(arg_or_input(None, &mut input).unwrap(), "from stdin");
    }

    #[test]
    fn crlf_is_trimmed_once() {
        let mut input = Cursor::new("a b\r\n\r\n");
        assert_eq!(arg_or_input(None, &mut input).unwrap(), "a b\r\n");
    }

    #[test]
    fn key_override_is_normalized() {
        let ctx = Context::default();
        assert_eq!(ctx.key(Some("q-w-e")).as_str(), "QWE");
        assert_eq!(ctx.key(None).as_str(), "ABCDEFGHIJKLMNOPQRSTUVWXYZ");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from([
            "zigzag",
            "--config",
            "/definitely/not/here.toml",
            "stats",
        ])
        .unwrap();
        let mut out = Vec::new();
        let err = execute(cli, &mut out, &mut Cursor::new("")).unwrap_err();
        assert_eq!(err.exit_code(), 1);
    }
}
