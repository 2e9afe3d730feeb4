use std::fs;
use std::path::Path;

use serde_derive::{Deserialize, Serialize};

use crate::counter::{
    CounterConfig, DEFAULT_COOLDOWN_FRAMES, DEFAULT_HYSTERESIS, DEFAULT_MAX_MISSED_FRAMES,
};
use crate::detection::DetectionFilter;
use crate::error::Error;
use crate::tracker::{TrackerConfig, DEFAULT_MAX_AGE, DEFAULT_MAX_DISTANCE};

pub const DEFAULT_LINE_Y: i32 = 300;
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.3;

/// Every tunable of the counting pipeline.
///
/// Missing keys in a JSON file take their defaults; an absent `min_area` or
/// `max_area` leaves that side of the area range open.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub line_y: i32,
    pub max_distance: f32,
    pub max_age: u32,
    pub hysteresis: i32,
    pub cooldown_frames: u32,
    pub max_missed_frames: u32,
    pub min_confidence: f32,
    pub min_area: Option<f32>,
    pub max_area: Option<f32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_y: DEFAULT_LINE_Y,
            max_distance: DEFAULT_MAX_DISTANCE,
            max_age: DEFAULT_MAX_AGE,
            hysteresis: DEFAULT_HYSTERESIS,
            cooldown_frames: DEFAULT_COOLDOWN_FRAMES,
            max_missed_frames: DEFAULT_MAX_MISSED_FRAMES,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            min_area: None,
            max_area: None,
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        self.tracker().validate()?;
        self.counter().validate()?;
        self.filter()?;

        Ok(())
    }

    #[inline]
    pub fn tracker(&self) -> TrackerConfig {
        TrackerConfig {
            max_distance: self.max_distance,
            max_age: self.max_age,
        }
    }

    #[inline]
    pub fn counter(&self) -> CounterConfig {
        CounterConfig {
            line_y: self.line_y,
            hysteresis: self.hysteresis,
            cooldown_frames: self.cooldown_frames,
            max_missed_frames: self.max_missed_frames,
        }
    }

    pub fn filter(&self) -> Result<DetectionFilter, Error> {
        DetectionFilter::new(
            self.min_confidence,
            self.min_area.unwrap_or(f32::NEG_INFINITY),
            self.max_area.unwrap_or(f32::INFINITY),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = Config::default();

        assert_eq!(c.max_distance, 120.0);
        assert_eq!(c.max_age, 30);
        assert_eq!(c.hysteresis, 6);
        assert_eq!(c.cooldown_frames, 10);
        assert_eq!(c.max_missed_frames, 5);
        assert_eq!(c.min_confidence, 0.3);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let c: Config = serde_json::from_str(r#"{"line_y": 420, "max_age": 12}"#).unwrap();

        assert_eq!(c.line_y, 420);
        assert_eq!(c.max_age, 12);
        assert_eq!(c.hysteresis, DEFAULT_HYSTERESIS);
        assert_eq!(c.max_area, None);
        assert_eq!(c.min_area, None);
    }

    #[test]
    fn default_filter_keeps_reversed_boxes() {
        let filter = Config::default().filter().unwrap();
        let reversed = crate::Detection::new(50.0, 10.0, 10.0, 90.0, 0.9);

        assert!(reversed.area() < 0.0);
        assert!(filter.accepts(&reversed));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{"line": 10}"#).is_err());
    }

    #[test]
    fn validate_reports_first_bad_value() {
        let c = Config {
            line_y: -5,
            ..Config::default()
        };
        assert!(matches!(c.validate(), Err(Error::InvalidLineY(-5))));

        let c = Config {
            max_distance: 0.0,
            ..Config::default()
        };
        assert!(matches!(c.validate(), Err(Error::InvalidMaxDistance(_))));

        let c = Config {
            min_confidence: -0.1,
            ..Config::default()
        };
        assert!(matches!(c.validate(), Err(Error::InvalidMinConfidence(_))));
    }

    #[test]
    fn load_from_file() {
        let path = std::env::temp_dir().join(format!("linecount-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"line_y": 250, "max_area": 90000.0}"#).unwrap();

        let c = Config::load(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(c.line_y, 250);
        assert_eq!(c.filter().unwrap().max_area, 90000.0);
    }

    #[test]
    fn load_rejects_invalid_values() {
        let path =
            std::env::temp_dir().join(format!("linecount-bad-config-{}.json", std::process::id()));
        fs::write(&path, r#"{"max_age": 0}"#).unwrap();

        let res = Config::load(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(res, Err(Error::InvalidMaxAge(0))));
    }
}
