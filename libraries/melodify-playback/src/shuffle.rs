//! Shuffle algorithms for queue randomization
//!
//! Implements pure random (Fisher-Yates) and the smart shuffle that keeps
//! recently played tracks out of the immediate rotation.

use crate::history::RecentlyPlayed;
use crate::types::{PlaybackConfig, Track};
use rand::seq::SliceRandom;
use rand::Rng;

/// Tunables for smart shuffle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShufflePolicy {
    /// Upper bound on the recently played window
    pub recent_cap: usize,

    /// Re-seed when fewer unseen tracks than this remain
    pub reseed_min_available: usize,

    /// Re-seeding only applies to queues longer than this
    pub reseed_min_queue: usize,
}

impl ShufflePolicy {
    /// Size bound of the recently played window for a queue length
    ///
    /// Shrinks toward zero for tiny queues, where repeat avoidance is moot.
    pub fn recent_bound(&self, queue_len: usize) -> usize {
        self.recent_cap.min(queue_len / 2)
    }
}

impl Default for ShufflePolicy {
    fn default() -> Self {
        Self::from(&PlaybackConfig::default())
    }
}

impl From<&PlaybackConfig> for ShufflePolicy {
    fn from(config: &PlaybackConfig) -> Self {
        Self {
            recent_cap: config.recent_cap,
            reseed_min_available: config.reseed_min_available,
            reseed_min_queue: config.reseed_min_queue,
        }
    }
}

/// Result of a smart shuffle pass
#[derive(Debug, Clone)]
pub struct ShuffleOutcome {
    /// New play order; the anchor track (if any) is at index 0
    pub play_order: Vec<Track>,

    /// Number of tracks that were eligible for the fresh section
    pub available: usize,

    /// Whether the recently played window was re-seeded
    pub reseeded: bool,
}

/// Pure random shuffle using Fisher-Yates algorithm
pub fn shuffle_random<R: Rng + ?Sized>(tracks: &mut [Track], rng: &mut R) {
    tracks.shuffle(rng);
}

/// Smart shuffle algorithm
///
/// Goals:
/// - The anchor (currently playing) track never moves: it becomes index 0
/// - Recently played tracks are pushed to the back of the order
/// - Falls back to plain randomness for small queues
///
/// Algorithm:
/// 1. No anchor: uniform permutation of the queue
/// 2. Record the anchor in `recent`, evicting down to the window bound
/// 3. `available` = queue minus recently played (and minus the anchor)
/// 4. Too few available on a long queue: re-seed `recent` to the anchor only
/// 5. Order = anchor, shuffled available, shuffled cooldown tracks
///
/// The output is always a permutation of `queue`. Only one occurrence of
/// the anchor is pulled to the front; duplicates of its identifier land in
/// the cooldown section.
pub fn smart_shuffle<R: Rng + ?Sized>(
    queue: &[Track],
    anchor: Option<&Track>,
    recent: &mut RecentlyPlayed,
    policy: &ShufflePolicy,
    rng: &mut R,
) -> ShuffleOutcome {
    let anchor_pos = anchor.and_then(|a| queue.iter().position(|t| t.id == a.id));

    let Some(anchor_pos) = anchor_pos else {
        let mut play_order = queue.to_vec();
        shuffle_random(&mut play_order, rng);
        return ShuffleOutcome {
            available: play_order.len(),
            play_order,
            reseeded: false,
        };
    };

    let anchor = &queue[anchor_pos];
    let bound = policy.recent_bound(queue.len());
    recent.insert(&anchor.id, bound);

    let (mut available, mut cooldown) = partition(queue, anchor_pos, recent);

    let mut reseeded = false;
    if available.len() < policy.reseed_min_available && queue.len() > policy.reseed_min_queue {
        recent.reset_to(&anchor.id, bound);
        (available, cooldown) = partition(queue, anchor_pos, recent);
        reseeded = true;
    }

    let available_len = available.len();
    shuffle_random(&mut available, rng);
    shuffle_random(&mut cooldown, rng);

    let mut play_order = Vec::with_capacity(queue.len());
    play_order.push(anchor.clone());
    play_order.extend(available);
    play_order.extend(cooldown);

    ShuffleOutcome {
        play_order,
        available: available_len,
        reseeded,
    }
}

/// Split everything but the anchor into (fresh, cooldown)
fn partition(
    queue: &[Track],
    anchor_pos: usize,
    recent: &RecentlyPlayed,
) -> (Vec<Track>, Vec<Track>) {
    queue
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != anchor_pos)
        .map(|(_, t)| t.clone())
        .partition(|t| !recent.contains(&t.id))
}
