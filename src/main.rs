use r_wavstream::init_app_dirs;
use r_wavstream::stream::{self, new_shared_progress, TransmitReport};
use r_wavstream::transport::MemoryTransport;
use r_wavstream::ui::{spawn_progress_bar, watch_interrupts, Cli};
use r_wavstream::StreamError;
use std::error::Error;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "r_wavstream=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::new();
    let args = &cli.args;

    if let Err(e) = init_app_dirs() {
        cli.display_error(&e);
        std::process::exit(1);
    }

    // Config file, then CLI/env overrides
    let settings = match cli.resolve_settings() {
        Ok(settings) => settings,
        Err(e) => {
            cli.display_error(&e);
            std::process::exit(1);
        }
    };

    info!(
        "Using {} @ {} baud, {} byte chunks every {} ms",
        settings.serial_device, settings.baud_rate, settings.chunk_size, settings.pacing_delay_ms
    );

    // Ctrl-C stops the stream between chunks; resources are still released.
    // A second Ctrl-C exits right away.
    let (shutdown_tx, shutdown_rx) = broadcast::channel::<()>(1);
    tokio::spawn(async move {
        if watch_interrupts(tokio::signal::ctrl_c, shutdown_tx).await {
            std::process::exit(130);
        }
    });

    let progress = new_shared_progress();
    let progress_task = if args.no_progress {
        None
    } else {
        Some(spawn_progress_bar(progress.clone()))
    };

    cli.display_playback_start(&settings);

    let result: Result<TransmitReport, StreamError> = if args.dry_run {
        let link = MemoryTransport::new();
        let writes = link.writes();
        let result = stream::play_with(&settings, link, shutdown_rx, Some(progress.clone())).await;
        if let Ok(writes) = writes.lock() {
            let total: usize = writes.iter().map(Vec::len).sum();
            info!("Dry run captured {} writes, {} bytes", writes.len(), total);
        }
        result
    } else {
        stream::play(&settings, shutdown_rx, Some(progress.clone())).await
    };

    progress.lock().await.finished = true;
    if let Some(task) = progress_task {
        let _ = task.await;
    }

    match result {
        Ok(report) => {
            cli.display_report(&report);
            Ok(())
        }
        Err(e) => {
            cli.display_error(&e);
            std::process::exit(1);
        }
    }
}
