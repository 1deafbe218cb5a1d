//! Circular play queue
//!
//! Keeps the caller-supplied order alongside the order actually traversed:
//!
//! ```text
//! original:   A B C D E        (as supplied, restored when shuffle is off)
//! play_order: C E A D B        (identity or smart-shuffled permutation)
//!                 ^ current_index
//! ```
//!
//! `next`/`previous` wrap around in both directions.

use crate::history::RecentlyPlayed;
use crate::shuffle::{smart_shuffle, ShuffleOutcome, ShufflePolicy};
use crate::types::Track;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct Queue {
    /// Tracks in source order
    original: Vec<Track>,

    /// Order traversed by advance/retreat
    play_order: Vec<Track>,

    /// Position in `play_order`, meaningful only when it is non-empty
    current_index: usize,

    shuffle_enabled: bool,

    /// Tracks kept out of the immediate shuffle rotation
    recent: RecentlyPlayed,

    policy: ShufflePolicy,

    rng: StdRng,
}

impl Queue {
    /// Create new empty queue
    pub fn new(policy: ShufflePolicy, shuffle_enabled: bool) -> Self {
        Self::with_rng(policy, shuffle_enabled, StdRng::from_entropy())
    }

    /// Create a queue with a reproducible shuffle sequence
    pub fn with_seed(policy: ShufflePolicy, shuffle_enabled: bool, seed: u64) -> Self {
        Self::with_rng(policy, shuffle_enabled, StdRng::seed_from_u64(seed))
    }

    fn with_rng(policy: ShufflePolicy, shuffle_enabled: bool, rng: StdRng) -> Self {
        Self {
            original: Vec::new(),
            play_order: Vec::new(),
            current_index: 0,
            shuffle_enabled,
            recent: RecentlyPlayed::new(),
            policy,
            rng,
        }
    }

    /// Replace the queue wholesale
    ///
    /// Returns the track that should be loaded, `None` for an empty queue.
    /// With shuffle on, the track at `start_index` becomes the head of the
    /// new play order so it is still the one that plays.
    pub fn set(&mut self, tracks: Vec<Track>, start_index: usize) -> Option<&Track> {
        self.recent.retain(|id| tracks.iter().any(|t| t.id == id));
        self.recent.trim(self.policy.recent_bound(tracks.len()));

        if tracks.is_empty() {
            self.original.clear();
            self.play_order.clear();
            self.current_index = 0;
            return None;
        }

        let start = start_index.min(tracks.len() - 1);
        self.original = tracks;

        if self.shuffle_enabled {
            let anchor = self.original[start].clone();
            self.apply_shuffle(Some(&anchor));
        } else {
            self.play_order.clone_from(&self.original);
            self.current_index = start;
        }

        self.current()
    }

    /// Step forward, wrapping to the first track
    pub fn advance(&mut self) -> Option<&Track> {
        if self.play_order.is_empty() {
            return None;
        }
        self.current_index = (self.current_index + 1) % self.play_order.len();
        self.current()
    }

    /// Step back, wrapping to the last track
    pub fn retreat(&mut self) -> Option<&Track> {
        if self.play_order.is_empty() {
            return None;
        }
        let len = self.play_order.len();
        self.current_index = (self.current_index + len - 1) % len;
        self.current()
    }

    /// Flip shuffle and rebuild the play order around `playing`
    ///
    /// Turning shuffle off restores the source order and relocates the index
    /// to `playing`, or to the first track when it is not in the queue.
    pub fn toggle_shuffle(&mut self, playing: Option<&Track>) -> bool {
        self.shuffle_enabled = !self.shuffle_enabled;

        if self.shuffle_enabled {
            self.apply_shuffle(playing);
        } else {
            self.play_order.clone_from(&self.original);
            self.current_index = playing
                .and_then(|p| self.original.iter().position(|t| t.id == p.id))
                .unwrap_or(0);
        }

        self.shuffle_enabled
    }

    /// Run smart shuffle with `anchor` as the playing track
    fn apply_shuffle(&mut self, anchor: Option<&Track>) -> ShuffleOutcome {
        let outcome = smart_shuffle(
            &self.original,
            anchor,
            &mut self.recent,
            &self.policy,
            &mut self.rng,
        );

        debug!(
            tracks = outcome.play_order.len(),
            available = outcome.available,
            recent = self.recent.len(),
            reseeded = outcome.reseeded,
            "Shuffled play order"
        );

        self.play_order.clone_from(&outcome.play_order);
        self.current_index = 0;
        outcome
    }

    /// Reshuffle in place (shuffle must be on)
    ///
    /// Used to keep the rotation fresh, e.g. once per skip.
    pub fn reshuffle(&mut self, anchor: Option<&Track>) -> Option<ShuffleOutcome> {
        if !self.shuffle_enabled {
            return None;
        }
        Some(self.apply_shuffle(anchor))
    }

    /// Track at `current_index`
    pub fn current(&self) -> Option<&Track> {
        self.play_order.get(self.current_index)
    }

    pub fn current_index(&self) -> Option<usize> {
        (!self.play_order.is_empty()).then_some(self.current_index)
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.play_order.get(index)
    }

    /// Tracks in source order
    pub fn original(&self) -> &[Track] {
        &self.original
    }

    /// Tracks in traversal order
    pub fn play_order(&self) -> &[Track] {
        &self.play_order
    }

    pub fn recently_played(&self) -> &RecentlyPlayed {
        &self.recent
    }

    pub fn is_shuffled(&self) -> bool {
        self.shuffle_enabled
    }

    pub fn len(&self) -> usize {
        self.play_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.play_order.is_empty()
    }
}

impl Default for Queue {
    fn default() -> Self {
        Self::new(ShufflePolicy::default(), false)
    }
}
