//! Terminal front-end for a playback session

use melodify_playback::{
    format_time, DeviceDriver, PlaybackConfig, PlaybackEvent, PlaybackSession, Track,
};
use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{info, warn};

/// Options for one `play` run
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub start_index: usize,
    /// Skip to the next track this often
    pub skip_after: Option<Duration>,
    /// Stop once this many tracks have started
    pub max_tracks: Option<usize>,
}

/// One line of a track listing: `3. Artist - Title (0:30)`
pub fn format_track_line(position: usize, track: &Track) -> String {
    format!(
        "{}. {} - {} ({})",
        position,
        track.artist,
        track.title,
        format_time(f64::from(track.duration_secs))
    )
}

pub fn print_tracks<W: Write>(out: &mut W, tracks: &[Track]) -> std::io::Result<()> {
    if tracks.is_empty() {
        writeln!(out, "No tracks found")?;
    }
    for (i, track) in tracks.iter().enumerate() {
        writeln!(out, "{}", format_track_line(i + 1, track))?;
    }
    Ok(())
}

async fn next_skip(skip: &mut Option<Interval>) {
    match skip.as_mut() {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}

/// Play `tracks` until `interrupt` resolves or `max_tracks` have started
///
/// Prints now-playing and once-per-second progress lines. A track that
/// fails to load is skipped; the run ends if every track in a row fails.
/// Returns the number of tracks started.
pub async fn play_queue<W, F>(
    tracks: Vec<Track>,
    config: PlaybackConfig,
    driver: Arc<dyn DeviceDriver>,
    options: PlayOptions,
    out: &mut W,
    interrupt: F,
) -> anyhow::Result<usize>
where
    W: Write,
    F: Future<Output = ()>,
{
    let queue_len = tracks.len();
    if queue_len == 0 {
        anyhow::bail!("nothing to play");
    }

    let (handle, task) = PlaybackSession::spawn(config, driver);
    let mut events = handle.subscribe();
    handle.set_queue(tracks, options.start_index)?;

    let mut skip = options.skip_after.map(|period| {
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    tokio::pin!(interrupt);
    let mut started = 0usize;
    let mut consecutive_failures = 0usize;
    let mut last_second = None;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(PlaybackEvent::TrackChanged { track, .. }) => {
                    if options.max_tracks.is_some_and(|max| started >= max) {
                        break;
                    }
                    started += 1;
                    last_second = None;
                    writeln!(out, "▶ {} - {}", track.artist, track.title)?;
                }
                Ok(PlaybackEvent::PositionUpdate { position, duration, .. }) => {
                    consecutive_failures = 0;
                    let second = position as u64;
                    if last_second != Some(second) {
                        last_second = Some(second);
                        writeln!(out, "  {} / {}", format_time(position), format_time(duration))?;
                    }
                }
                Ok(PlaybackEvent::ShuffleChanged { enabled }) => {
                    writeln!(out, "  shuffle {}", if enabled { "on" } else { "off" })?;
                }
                Ok(PlaybackEvent::Error { message }) => {
                    writeln!(out, "✗ {}", message)?;
                    consecutive_failures += 1;
                    if consecutive_failures >= queue_len {
                        warn!(failures = consecutive_failures, "Every track failed, giving up");
                        break;
                    }
                    handle.next()?;
                }
                Ok(_) => {}
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "Event consumer fell behind");
                }
                Err(RecvError::Closed) => break,
            },
            () = next_skip(&mut skip) => {
                info!("Skipping to next track");
                handle.next()?;
            }
            () = &mut interrupt => {
                info!("Interrupted");
                break;
            }
        }
    }

    handle.shutdown()?;
    task.await?;
    Ok(started)
}
