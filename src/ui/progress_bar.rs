use crate::stream::progress::{SharedProgress, PROGRESS_UPDATE_INTERVAL};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;

/// Draws transmission progress until the shared state is marked finished.
pub fn spawn_progress_bar(progress: SharedProgress) -> JoinHandle<()> {
    tokio::spawn(async move {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40}] {pos}/{len} samples ({eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
        bar.set_style(style);

        let mut interval = tokio::time::interval(PROGRESS_UPDATE_INTERVAL);
        loop {
            interval.tick().await;
            let snapshot = progress.lock().await.clone();
            bar.set_length(snapshot.total_samples);
            bar.set_position(snapshot.samples_sent);
            if snapshot.finished {
                bar.finish();
                break;
            }
        }
    })
}
