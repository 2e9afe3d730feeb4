use crate::bbox::{BBox, Ltrb};
use crate::Detection;
use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub track_id: u32,

    // centroid of the last matched detection
    pub position: na::Point2<f32>,

    // displacement observed at the last match, in px per frame
    pub velocity: na::Vector2<f32>,

    // frames since the last match
    pub age: u32,
}

impl Track {
    pub fn new(track_id: u32, position: na::Point2<f32>) -> Self {
        Self {
            track_id,
            position,
            velocity: na::Vector2::zeros(),
            age: 0,
        }
    }

    /// One linear extrapolation step from the last match.
    #[inline]
    pub fn predict(&self) -> na::Point2<f32> {
        self.position + self.velocity
    }

    #[inline]
    pub fn update(&mut self, position: na::Point2<f32>) {
        self.velocity = position - self.position;
        self.position = position;
        self.age = 0;
    }
}

/// Tracker output: the detection's box tagged with the id it was assigned to
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct TrackedDetection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(rename = "id")]
    pub track_id: u32,
}

impl TrackedDetection {
    #[inline]
    pub fn new(det: &Detection, track_id: u32) -> Self {
        Self {
            x1: det.x1,
            y1: det.y1,
            x2: det.x2,
            y2: det.y2,
            track_id,
        }
    }

    #[inline(always)]
    pub fn bbox(&self) -> BBox<Ltrb> {
        BBox::ltrb(self.x1, self.y1, self.x2, self.y2)
    }

    /// Vertical centre truncated toward zero to a whole pixel.
    #[inline]
    pub fn center_y(&self) -> i32 {
        self.bbox().centroid().y as i32
    }
}
