use ndarray::prelude::*;
use serde_derive::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::counter::{CountStats, CrossingEvent, PeopleCounter};
use crate::detection::{Detection, DetectionFilter};
use crate::detector::Detector;
use crate::error::Error;
use crate::track::TrackedDetection;
use crate::tracker::CentroidTracker;

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame_index: u64,
    pub tracked: Vec<TrackedDetection>,
    pub crossings: Vec<CrossingEvent>,
    pub stats: CountStats,
}

/// Runs tracker and counter once per frame, strictly in order.
///
/// Owns both components; `&mut self` on every call keeps frames serialized.
#[derive(Debug)]
pub struct Pipeline {
    filter: DetectionFilter,
    tracker: CentroidTracker,
    counter: PeopleCounter,
    frames: u64,
}

impl Pipeline {
    pub fn new(config: &Config) -> Result<Self, Error> {
        Ok(Self {
            filter: config.filter()?,
            tracker: CentroidTracker::new(config.tracker())?,
            counter: PeopleCounter::new(config.counter())?,
            frames: 0,
        })
    }

    #[inline]
    pub fn tracker(&self) -> &CentroidTracker {
        &self.tracker
    }

    #[inline]
    pub fn counter(&self) -> &PeopleCounter {
        &self.counter
    }

    #[inline]
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    #[inline]
    pub fn stats(&self) -> CountStats {
        self.counter.stats()
    }

    pub fn process(&mut self, detections: &[Detection]) -> FrameReport {
        let frame_index = self.frames;
        self.frames += 1;

        let detections = self.filter.apply(detections);
        let tracked = self.tracker.update(&detections);
        let crossings = self.counter.update(&tracked);

        if !crossings.is_empty() {
            debug!(
                "frame {}: {} crossing(s), {} active track(s)",
                frame_index,
                crossings.len(),
                self.tracker.tracks().len()
            );
        }

        FrameReport {
            frame_index,
            tracked,
            crossings,
            stats: self.counter.stats(),
        }
    }

    pub fn process_frame<D: Detector + ?Sized>(
        &mut self,
        detector: &mut D,
        frame: ArrayView3<'_, u8>,
    ) -> Result<FrameReport, Error> {
        let detections = detector.detect(frame, self.filter.min_confidence)?;

        Ok(self.process(&detections))
    }

    pub fn reset(&mut self) {
        self.tracker.reset();
        self.counter.reset();
        self.frames = 0;
    }
}
