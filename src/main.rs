//! Entry point for the `transedit` command line.

use std::io::Write as _;

use anyhow::Context as _;
use clap::Parser as _;
use tracing_subscriber::EnvFilter;
use transedit::cli::{
    Cli,
    execute,
};
use transedit::review::ReviewService;
use transedit::share::CatboxClient;
use transedit::store::FsStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let settings = cli.settings()?;
    let store_dir = cli.store_dir(&settings);
    let store = FsStore::open(&store_dir)
        .with_context(|| format!("Failed to open project store at {}", store_dir.display()))?;
    let blobs = CatboxClient::new(
        &settings.upload.endpoint,
        &settings.upload.download_base_url,
        settings.upload.user_hash.clone(),
    )?;
    let mut service = ReviewService::new(store);

    let mut stdout = std::io::stdout().lock();
    execute(cli.command, &mut service, &blobs, &settings, &mut stdout).await?;
    stdout.flush()?;
    Ok(())
}
