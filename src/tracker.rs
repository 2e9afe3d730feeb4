use std::collections::HashSet;

use nalgebra as na;
use serde_derive::Serialize;
use tracing::{debug, info};

use crate::error::Error;
use crate::track::{Track, TrackedDetection};
use crate::Detection;

pub const DEFAULT_MAX_DISTANCE: f32 = 120.0;
pub const DEFAULT_MAX_AGE: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerConfig {
    /// Matching radius around a track's predicted position, in px
    pub max_distance: f32,
    /// Unmatched frames a track survives before eviction
    pub max_age: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_MAX_DISTANCE,
            max_age: DEFAULT_MAX_AGE,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_distance.is_nan() || self.max_distance <= 0.0 {
            return Err(Error::InvalidMaxDistance(self.max_distance));
        }

        if self.max_age == 0 {
            return Err(Error::InvalidMaxAge(self.max_age));
        }

        Ok(())
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerStats {
    pub active_tracks: usize,
    pub next_id: u32,
}

/// Greedy nearest-centroid tracker.
///
/// Every detection is matched on its own against the whole track table, so two
/// detections of one frame may claim the same track. Matched tracks are not
/// removed from the candidate pool.
#[derive(Debug)]
pub struct CentroidTracker {
    config: TrackerConfig,
    tracks: Vec<Track>,
    next_id: u32,
}

impl CentroidTracker {
    pub fn new(config: TrackerConfig) -> Result<Self, Error> {
        config.validate()?;

        info!(
            "tracker initialized with max_distance={}, max_age={}",
            config.max_distance, config.max_age
        );

        Ok(Self {
            config,
            tracks: Vec::with_capacity(64),
            next_id: 0,
        })
    }

    #[inline]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Index of the track whose prediction is nearest to `pt`, strictly within
    /// `max_distance`. Ties keep the first track in table order.
    fn nearest(&self, pt: &na::Point2<f32>) -> Option<usize> {
        let mut best = None;
        let mut best_dist = f32::INFINITY;

        for (idx, track) in self.tracks.iter().enumerate() {
            let dist = na::distance(&track.predict(), pt);

            if dist < best_dist && dist < self.config.max_distance {
                best_dist = dist;
                best = Some(idx);
            }
        }

        best
    }

    pub fn update(&mut self, detections: &[Detection]) -> Vec<TrackedDetection> {
        let mut tracked = Vec::with_capacity(detections.len());
        let mut updated = HashSet::with_capacity(detections.len());

        for det in detections {
            let centroid = det.centroid();

            let track_id = match self.nearest(&centroid) {
                Some(idx) => {
                    let track = &mut self.tracks[idx];
                    track.update(centroid);
                    track.track_id
                }
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    self.tracks.push(Track::new(id, centroid));
                    debug!("new track created: id {}", id);
                    id
                }
            };

            updated.insert(track_id);
            tracked.push(TrackedDetection::new(det, track_id));
        }

        for t in &mut self.tracks {
            if !updated.contains(&t.track_id) {
                t.age += 1;
            }
        }

        let max_age = self.config.max_age;
        self.tracks.retain(|t| {
            if t.age > max_age {
                debug!("track {} removed after {} unmatched frames", t.track_id, t.age);
                return false;
            }

            true
        });

        tracked
    }

    #[inline]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    #[inline]
    pub fn get(&self, track_id: u32) -> Option<&Track> {
        self.tracks.iter().find(|t| t.track_id == track_id)
    }

    pub fn stats(&self) -> TrackerStats {
        TrackerStats {
            active_tracks: self.tracks.len(),
            next_id: self.next_id,
        }
    }

    /// Drops every track and restarts ids at 0.
    pub fn reset(&mut self) {
        self.tracks.clear();
        self.next_id = 0;
        info!("tracker reset");
    }
}
