//! `transedit` command line.

mod commands;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{
    Parser,
    Subcommand,
};

pub use commands::execute;

use crate::config::{
    ConfigManager,
    TranseditSettings,
};

#[derive(Debug, Parser)]
#[command(name = "transedit", version, about = "Review and edit translations of JSON locale files")]
pub struct Cli {
    /// Directory holding `.transedit.json`
    #[arg(long, global = true, default_value = ".")]
    pub config_dir: PathBuf,

    /// Project store directory (overrides `storeDir`)
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a project from a source locale file
    Create {
        /// Source locale JSON (e.g. `en.json`)
        source: PathBuf,
        /// Existing translations to start from
        #[arg(long)]
        target: Option<PathBuf>,
        /// Source language; inferred from the file name when omitted
        #[arg(long)]
        source_lang: Option<String>,
        /// Target language; inferred from `--target` when omitted
        #[arg(long)]
        target_lang: Option<String>,
        #[arg(long)]
        title: Option<String>,
        /// Project id; random when omitted
        #[arg(long)]
        id: Option<String>,
    },
    /// Import a review file, keeping saved progress
    Import { file: PathBuf },
    /// List saved projects
    List,
    /// Show a project and its untranslated keys
    Show { id: String },
    /// Print translation progress
    Stats {
        id: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the translation of one key
    Translate { id: String, key: String, value: String },
    /// Find keys whose key, source or translation contains a query
    Search { id: String, query: String },
    /// Export the translated locale or the full review file
    Export {
        id: String,
        /// Export the review file instead of the locale JSON
        #[arg(long, conflicts_with = "locale")]
        document: bool,
        /// Export the nested target locale JSON (default)
        #[arg(long)]
        locale: bool,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a review link for a project
    Share {
        id: String,
        /// Upload the document and print a short share-id link
        #[arg(long)]
        upload: bool,
    },
    /// Open a review link or fragment
    Open { link: String },
    /// Save the current translations of a project
    Snapshot {
        id: String,
        #[arg(long)]
        note: Option<String>,
    },
    /// List snapshots of a project
    Snapshots { id: String },
    /// Restore translations from a snapshot
    Restore { id: String, snapshot_id: String },
    /// Delete a project and its snapshots
    Delete { id: String },
}

impl Cli {
    /// Settings from `--config-dir`, with environment fallbacks applied.
    ///
    /// # Errors
    /// Unreadable, unparsable or invalid configuration.
    pub fn settings(&self) -> anyhow::Result<TranseditSettings> {
        let mut manager = ConfigManager::new();
        manager
            .load_settings(Some(self.config_dir.clone()))
            .with_context(|| format!("Failed to load settings from {}", self.config_dir.display()))?;
        Ok(manager.get_settings().clone())
    }

    /// `--store-dir`, else `storeDir` resolved against the config directory.
    #[must_use]
    pub fn store_dir(&self, settings: &TranseditSettings) -> PathBuf {
        self.store_dir.clone().unwrap_or_else(|| self.config_dir.join(&settings.store_dir))
    }
}
