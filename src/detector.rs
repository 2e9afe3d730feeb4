use ndarray::prelude::*;

use crate::detection::Detection;
use crate::error::Error;

/// Person detector over a single in-memory frame.
///
/// `frame` is laid out height x width x channels. Implementations return every
/// person box whose confidence is at least `min_confidence`; no ordering is
/// required.
pub trait Detector {
    fn detect(
        &mut self,
        frame: ArrayView3<'_, u8>,
        min_confidence: f32,
    ) -> Result<Vec<Detection>, Error>;
}

impl<D: Detector + ?Sized> Detector for Box<D> {
    #[inline]
    fn detect(
        &mut self,
        frame: ArrayView3<'_, u8>,
        min_confidence: f32,
    ) -> Result<Vec<Detection>, Error> {
        (**self).detect(frame, min_confidence)
    }
}
