use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("line_y must be a non-negative integer, got {0}")]
    InvalidLineY(i32),

    #[error("max_distance must be positive, got {0}")]
    InvalidMaxDistance(f32),

    #[error("max_age must be positive, got {0}")]
    InvalidMaxAge(u32),

    #[error("hysteresis must be non-negative, got {0}")]
    InvalidHysteresis(i32),

    #[error("min_confidence must be within [0, 1], got {0}")]
    InvalidMinConfidence(f32),

    #[error("invalid area range: min {min} > max {max}")]
    InvalidAreaRange { min: f32, max: f32 },

    #[error("Detector Error: {0}")]
    Detector(String),

    #[error("wrong frame format at line {line}: {reason}")]
    FrameFormat { line: usize, reason: String },

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Json Error: {0}")]
    Json(#[from] serde_json::Error),
}
