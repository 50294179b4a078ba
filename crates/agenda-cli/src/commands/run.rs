use std::path::PathBuf;
use std::time::Duration;

use agenda_core::{
    Config, DisplayRunner, EngineHandle, FileChannel, RunnerConfig, SyncBroadcaster, SyncMode,
};
use clap::Args;

use super::engine_from_config;

#[derive(Args)]
pub struct RunArgs {
    /// Sync role: off, leader or follower (defaults to sync.mode)
    #[arg(long)]
    sync: Option<SyncMode>,
    /// Shared snapshot file (defaults to sync.channel_file)
    #[arg(long)]
    channel: Option<PathBuf>,
    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    duration_secs: Option<u64>,
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let engine = engine_from_config(&config);
    for problem in engine.agenda().validate() {
        tracing::warn!(%problem, "agenda problem, displaying anyway");
    }

    let mode = args.sync.unwrap_or(config.sync.mode);
    let mut runner = DisplayRunner::new(engine, RunnerConfig::from(&config));
    if mode != SyncMode::Off {
        let path = match args.channel {
            Some(path) => path,
            None => config.sync_channel_path()?,
        };
        tracing::info!(%mode, channel = %path.display(), "display sync enabled");
        runner = runner.with_sync(SyncBroadcaster::new(
            FileChannel::new(path),
            mode,
            config.sync.staleness_ms,
        ));
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    rt.block_on(async move {
        let (handle, task) = runner.spawn();
        let printer = tokio::spawn(print_changes(handle.clone()));

        match args.duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => tokio::signal::ctrl_c().await?,
        }

        handle.shutdown().await?;
        let engine = task.await?;
        printer.abort();
        tracing::info!(
            day = %engine.current_day(),
            transitions = engine.history().len(),
            "display stopped"
        );
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// One JSON line per published status, starting with the current one.
async fn print_changes(handle: EngineHandle) {
    let mut status = handle.watch_status();
    loop {
        let line = serde_json::to_string(&*status.borrow_and_update());
        match line {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::warn!(error = %e, "could not serialize status"),
        }
        if status.changed().await.is_err() {
            break;
        }
    }
}
