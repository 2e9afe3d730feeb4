//! Counts people crossing a horizontal line from per-frame person detections.
//!
//! Per frame: [`CentroidTracker::update`] turns unlabeled detections into
//! [`TrackedDetection`]s carrying persistent ids, then [`PeopleCounter::update`]
//! folds those into `entered`/`exited` counts. [`Pipeline`] wires the two
//! together behind a detection filter.

pub mod bbox;
pub mod config;
pub mod counter;
pub mod detection;
pub mod detector;
pub mod error;
pub mod frame;
pub mod pipeline;
pub mod track;
pub mod tracker;

pub use config::Config;
pub use counter::{CountStats, CrossingEvent, Direction, LineState, PeopleCounter};
pub use detection::{Detection, DetectionFilter};
pub use detector::Detector;
pub use error::Error;
pub use frame::{Frame, FrameReader};
pub use pipeline::{FrameReport, Pipeline};
pub use track::{Track, TrackedDetection};
pub use tracker::{CentroidTracker, TrackerStats};
