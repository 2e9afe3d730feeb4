use std::io::BufRead;

use crate::detection::Detection;
use crate::error::Error;

/// Detections recorded for one video frame.
///
/// Serialized one frame per line as `<index>: <json array of detections>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub index: u64,
    pub detections: Vec<Detection>,
}

impl Frame {
    #[inline]
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Detection> {
        self.detections.iter()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn to_line(&self) -> Result<String, Error> {
        Ok(format!(
            "{}: {}",
            self.index,
            serde_json::to_string(&self.detections)?
        ))
    }

    /// `line_no` is only used for error reporting.
    pub fn parse_line(line: &str, line_no: usize) -> Result<Self, Error> {
        let wrong = |reason: String| Error::FrameFormat {
            line: line_no,
            reason,
        };

        let idx = line
            .find(':')
            .ok_or_else(|| wrong("expected `:`".to_string()))?;
        let (index, vector) = line.split_at(idx);

        let index = index
            .trim()
            .parse::<u64>()
            .map_err(|e| wrong(format!("parse frame index failed: {}", e)))?;

        let detections: Vec<Detection> = serde_json::from_str(vector[1..].trim())
            .map_err(|e| wrong(format!("parse json failed: {}", e)))?;

        Ok(Self { index, detections })
    }
}

/// Iterates recorded frames, skipping blank lines.
pub struct FrameReader<R> {
    lines: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> FrameReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

impl<R: BufRead> Iterator for FrameReader<R> {
    type Item = Result<Frame, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(err) => return Some(Err(err.into())),
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            return Some(Frame::parse_line(&line, self.line_no));
        }
    }
}
