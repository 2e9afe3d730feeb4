use nalgebra as na;
use serde_derive::{Deserialize, Serialize};

use crate::bbox::{BBox, Ltrb};
use crate::error::Error;

/// Contains left-top (x1,y1) and right-bottom (x2,y2) corners of bbox in frame pixels
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    #[serde(rename = "p")]
    pub confidence: f32,
}

impl Detection {
    #[inline]
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32, confidence: f32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            confidence,
        }
    }

    #[inline(always)]
    pub fn bbox(&self) -> BBox<Ltrb> {
        BBox::ltrb(self.x1, self.y1, self.x2, self.y2)
    }

    #[inline]
    pub fn centroid(&self) -> na::Point2<f32> {
        self.bbox().centroid()
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.bbox().area()
    }
}

/// Drops detections the tracker should never see.
///
/// Both bounds are inclusive. The default accepts any area, including the
/// negative area of a reversed box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionFilter {
    pub min_confidence: f32,
    pub min_area: f32,
    pub max_area: f32,
}

impl Default for DetectionFilter {
    fn default() -> Self {
        Self {
            min_confidence: 0.0,
            min_area: f32::NEG_INFINITY,
            max_area: f32::INFINITY,
        }
    }
}

impl DetectionFilter {
    pub fn new(min_confidence: f32, min_area: f32, max_area: f32) -> Result<Self, Error> {
        if !(0.0..=1.0).contains(&min_confidence) {
            return Err(Error::InvalidMinConfidence(min_confidence));
        }

        if min_area.is_nan() || max_area.is_nan() || min_area > max_area {
            return Err(Error::InvalidAreaRange {
                min: min_area,
                max: max_area,
            });
        }

        Ok(Self {
            min_confidence,
            min_area,
            max_area,
        })
    }

    #[inline]
    pub fn accepts(&self, det: &Detection) -> bool {
        let area = det.area();

        det.confidence >= self.min_confidence && self.min_area <= area && area <= self.max_area
    }

    pub fn apply(&self, dets: &[Detection]) -> Vec<Detection> {
        dets.iter().copied().filter(|d| self.accepts(d)).collect()
    }
}

pub fn filter_by_confidence(dets: &[Detection], min_confidence: f32) -> Vec<Detection> {
    dets.iter()
        .copied()
        .filter(|d| d.confidence >= min_confidence)
        .collect()
}

pub fn filter_by_area(dets: &[Detection], min_area: f32, max_area: f32) -> Vec<Detection> {
    dets.iter()
        .copied()
        .filter(|d| {
            let area = d.area();
            min_area <= area && area <= max_area
        })
        .collect()
}
