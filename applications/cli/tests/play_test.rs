//! End-to-end playback against the simulated device

use melodify_cli::{play_queue, PlayOptions, SimulatedDevice};
use melodify_playback::{PlaybackConfig, Track};
use std::sync::Arc;
use std::time::Duration;

fn create_test_track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Song {}", id),
        artist: "Test Artist".to_string(),
        album: "Test Album".to_string(),
        artwork_url: String::new(),
        stream_url: format!("https://cdn.example.com/{}.mp3", id),
        duration_secs: 30,
    }
}

fn create_device() -> Arc<SimulatedDevice> {
    Arc::new(SimulatedDevice::new(30.0, Duration::from_millis(100)))
}

#[tokio::test(start_paused = true)]
async fn plays_through_queue_until_limit() {
    let tracks = vec![
        create_test_track("a"),
        create_test_track("b"),
        create_test_track("c"),
    ];
    let options = PlayOptions {
        start_index: 1,
        max_tracks: Some(2),
        ..Default::default()
    };
    let mut out = Vec::new();

    let started = play_queue(
        tracks,
        PlaybackConfig::default(),
        create_device(),
        options,
        &mut out,
        std::future::pending(),
    )
    .await
    .unwrap();

    let output = String::from_utf8(out).unwrap();
    assert_eq!(started, 2);
    assert!(output.contains("▶ Test Artist - Song b"));
    assert!(output.contains("▶ Test Artist - Song c"));
    assert!(!output.contains("Song a"));
    assert!(output.contains("  0:29 / 0:30"));
}

#[tokio::test(start_paused = true)]
async fn skip_after_moves_on_early() {
    let tracks: Vec<Track> = (0..4).map(|i| create_test_track(&i.to_string())).collect();
    let options = PlayOptions {
        skip_after: Some(Duration::from_secs(5)),
        max_tracks: Some(3),
        ..Default::default()
    };
    let mut out = Vec::new();
    let begin = tokio::time::Instant::now();

    let started = play_queue(
        tracks,
        PlaybackConfig::default(),
        create_device(),
        options,
        &mut out,
        std::future::pending(),
    )
    .await
    .unwrap();

    assert_eq!(started, 3);
    // three skips, never a full 30 second track
    assert!(begin.elapsed() < Duration::from_secs(20));
    let output = String::from_utf8(out).unwrap();
    assert!(!output.contains("0:10 / 0:30"));
}

#[tokio::test(start_paused = true)]
async fn unplayable_queue_gives_up() {
    let mut bad = create_test_track("x");
    bad.stream_url = "ftp://cdn.example.com/x.mp3".to_string();
    let mut worse = create_test_track("y");
    worse.stream_url = "not a url".to_string();
    let mut out = Vec::new();

    let started = play_queue(
        vec![bad, worse],
        PlaybackConfig::default(),
        create_device(),
        PlayOptions::default(),
        &mut out,
        std::future::pending(),
    )
    .await
    .unwrap();

    let output = String::from_utf8(out).unwrap();
    assert_eq!(started, 2);
    assert!(output.contains("✗ Failed to load track duration: unsupported stream"));
    assert!(output.contains("✗ Invalid track URL"));
}

#[tokio::test(start_paused = true)]
async fn interrupt_stops_playback() {
    let tracks = vec![create_test_track("a")];
    let mut out = Vec::new();

    let started = play_queue(
        tracks,
        PlaybackConfig::default(),
        create_device(),
        PlayOptions::default(),
        &mut out,
        tokio::time::sleep(Duration::from_secs(2)),
    )
    .await
    .unwrap();

    assert_eq!(started, 1);
    let output = String::from_utf8(out).unwrap();
    assert!(output.contains("  0:01 / 0:30"));
    assert!(!output.contains("0:05"));
}

#[tokio::test]
async fn empty_queue_is_rejected() {
    let mut out = Vec::new();
    let result = play_queue(
        Vec::new(),
        PlaybackConfig::default(),
        create_device(),
        PlayOptions::default(),
        &mut out,
        std::future::pending(),
    )
    .await;
    assert!(result.is_err());
}
