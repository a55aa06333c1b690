//! `zigzag theme`: the persisted light/dark preference.

use std::io::Write;
use std::path::PathBuf;

use clap::{Args, Subcommand};
use zigzag_render::Theme;
use zigzag_runtime::{FileStore, PreferenceStore, THEME_KEY, resolve_theme, toggle_theme};

use crate::error::Result;

#[derive(Debug, Clone, Args)]
pub struct ThemeArgs {
    /// Preference file.
    #[arg(long, default_value = "zigzag-prefs.json")]
    pub prefs: PathBuf,

    #[command(subcommand)]
    pub action: ThemeAction,
}

#[derive(Debug, Clone, Subcommand)]
pub enum ThemeAction {
    /// Print the effective theme.
    Show {
        /// Fall back to dark when nothing valid is stored.
        #[arg(long)]
        ambient_dark: bool,
    },

    /// Flip the stored theme and print the new one.
    Toggle,
}

pub fn run_theme(args: ThemeArgs, out: &mut dyn Write) -> Result<()> {
    if let Some(parent) = args.prefs.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut store = FileStore::new(&args.prefs);
    let theme = match args.action {
        ThemeAction::Show { ambient_dark } => resolve_theme(&store, ambient_dark),
        ThemeAction::Toggle => {
            let current = stored_theme(&store)?;
            toggle_theme(&mut store, current)
        }
    };
    writeln!(out, "{theme}")?;
    Ok(())
}

/// The stored theme; an unrecognized value counts as unset.
fn stored_theme(store: &FileStore) -> Result<Option<Theme>> {
    let Some(raw) = store.get(THEME_KEY)? else {
        return Ok(None);
    };
    match raw.parse() {
        Ok(theme) => Ok(Some(theme)),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring stored theme");
            Ok(None)
        }
    }
}
