//! Named diff baselines.

use std::collections::HashMap;

use tracing::debug;

use crate::tree::AriaNode;

#[derive(Debug)]
struct Track {
    baseline: AriaNode,
    last_used: u64,
}

/// Baselines keyed by track label, capped at `capacity` with the least
/// recently used track evicted first.
#[derive(Debug)]
pub(crate) struct TrackStore {
    capacity: usize,
    clock: u64,
    tracks: HashMap<String, Track>,
}

impl TrackStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            clock: 0,
            tracks: HashMap::new(),
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    pub fn get(&mut self, label: &str) -> Option<&AriaNode> {
        let now = self.tick();
        let track = self.tracks.get_mut(label)?;
        track.last_used = now;
        Some(&track.baseline)
    }

    /// Install `baseline` for `label`, replacing the previous one.
    pub fn insert(&mut self, label: &str, baseline: AriaNode) {
        let last_used = self.tick();
        self.tracks
            .insert(label.to_string(), Track { baseline, last_used });

        while self.tracks.len() > self.capacity {
            let Some(oldest) = self
                .tracks
                .iter()
                .min_by_key(|(_, track)| track.last_used)
                .map(|(label, _)| label.clone())
            else {
                break;
            };
            debug!(track = %oldest, "Evicting least recently used track");
            self.tracks.remove(&oldest);
        }
    }

    pub fn remove(&mut self, label: &str) -> bool {
        self.tracks.remove(label).is_some()
    }

    /// Labels in sorted order.
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.tracks.keys().cloned().collect();
        labels.sort();
        labels
    }
}
