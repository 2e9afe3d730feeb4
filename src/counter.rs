use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde_derive::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Error;
use crate::track::TrackedDetection;

pub const DEFAULT_HYSTERESIS: i32 = 6;
pub const DEFAULT_COOLDOWN_FRAMES: u32 = 10;
pub const DEFAULT_MAX_MISSED_FRAMES: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterConfig {
    /// Y coordinate of the counting line, in px
    pub line_y: i32,
    /// Half-width of the dead zone around the line, in px
    pub hysteresis: i32,
    /// Frames during which a track cannot be counted again after a crossing
    pub cooldown_frames: u32,
    /// Consecutive absent frames after which a track's state is forgotten
    pub max_missed_frames: u32,
}

impl CounterConfig {
    pub fn new(line_y: i32) -> Self {
        Self {
            line_y,
            hysteresis: DEFAULT_HYSTERESIS,
            cooldown_frames: DEFAULT_COOLDOWN_FRAMES,
            max_missed_frames: DEFAULT_MAX_MISSED_FRAMES,
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.line_y < 0 {
            return Err(Error::InvalidLineY(self.line_y));
        }

        if self.hysteresis < 0 {
            return Err(Error::InvalidHysteresis(self.hysteresis));
        }

        Ok(())
    }

    /// Position of `y` relative to the line, with the dead zone
    /// `[line_y - hysteresis, line_y + hysteresis]` mapped to `OnLine`.
    #[inline]
    pub fn classify(&self, y: i32) -> LineState {
        if y < self.line_y.saturating_sub(self.hysteresis) {
            LineState::Above
        } else if y > self.line_y.saturating_add(self.hysteresis) {
            LineState::Below
        } else {
            LineState::OnLine
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Above,
    Below,
    OnLine,
}

impl LineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Above => "above",
            Self::Below => "below",
            Self::OnLine => "on_line",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterState {
    pub last_y: i32,
    pub cooldown: u32,
    pub missed: u32,
    pub state: LineState,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Above -> Below
    Entered,
    /// Below -> Above
    Exited,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossingEvent {
    pub track_id: u32,
    pub direction: Direction,
    pub from_y: i32,
    pub to_y: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountStats {
    pub entered: u64,
    pub exited: u64,
    pub total: u64,
}

/// Counts tracks crossing a horizontal line.
///
/// A crossing is a direct `Above <-> Below` change between two consecutive
/// observations of the same id. Passing through `OnLine` on the way does not
/// count. The per-id table here is evicted on its own clock (`missed`), not
/// the tracker's `age`.
#[derive(Debug)]
pub struct PeopleCounter {
    config: CounterConfig,
    entered: u64,
    exited: u64,
    states: BTreeMap<u32, CounterState>,
}

impl PeopleCounter {
    pub fn new(config: CounterConfig) -> Result<Self, Error> {
        config.validate()?;

        info!(
            "people counter initialized with line_y={}, hysteresis={}, cooldown_frames={}, max_missed_frames={}",
            config.line_y, config.hysteresis, config.cooldown_frames, config.max_missed_frames
        );

        Ok(Self {
            config,
            entered: 0,
            exited: 0,
            states: BTreeMap::new(),
        })
    }

    #[inline]
    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    #[inline]
    pub fn line_y(&self) -> i32 {
        self.config.line_y
    }

    pub fn update(&mut self, tracked: &[TrackedDetection]) -> Vec<CrossingEvent> {
        // last occurrence of an id within the frame wins
        let mut frame_ys = BTreeMap::new();
        for t in tracked {
            frame_ys.insert(t.track_id, t.center_y());
        }

        let mut events = Vec::new();

        for (&id, &y) in &frame_ys {
            let current = self.config.classify(y);

            let entry = match self.states.entry(id) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    entry.insert(CounterState {
                        last_y: y,
                        cooldown: 0,
                        missed: 0,
                        state: current,
                    });
                    continue;
                }
            };

            if entry.cooldown == 0 {
                let direction = match (entry.state, current) {
                    (LineState::Above, LineState::Below) => Some(Direction::Entered),
                    (LineState::Below, LineState::Above) => Some(Direction::Exited),
                    _ => None,
                };

                if let Some(direction) = direction {
                    match direction {
                        Direction::Entered => self.entered += 1,
                        Direction::Exited => self.exited += 1,
                    }

                    entry.cooldown = self.config.cooldown_frames;

                    debug!(
                        "track {} {:?} ({} -> {}, y: {} -> {})",
                        id,
                        direction,
                        entry.state.as_str(),
                        current.as_str(),
                        entry.last_y,
                        y
                    );

                    events.push(CrossingEvent {
                        track_id: id,
                        direction,
                        from_y: entry.last_y,
                        to_y: y,
                    });
                }
            }

            entry.last_y = y;
            entry.state = current;
            entry.missed = 0;
        }

        for entry in self.states.values_mut() {
            entry.cooldown = entry.cooldown.saturating_sub(1);
        }

        let max_missed = self.config.max_missed_frames;
        self.states.retain(|id, entry| {
            if frame_ys.contains_key(id) {
                return true;
            }

            entry.missed += 1;
            if entry.missed > max_missed {
                debug!("track {} forgotten after {} missed frames", id, entry.missed);
                return false;
            }

            true
        });

        events
    }

    pub fn stats(&self) -> CountStats {
        CountStats {
            entered: self.entered,
            exited: self.exited,
            total: self.entered + self.exited,
        }
    }

    #[inline]
    pub fn state_of(&self, track_id: u32) -> Option<&CounterState> {
        self.states.get(&track_id)
    }

    pub fn tracked_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.states.keys().copied()
    }

    pub fn reset(&mut self) {
        self.entered = 0;
        self.exited = 0;
        self.states.clear();
        info!("counters reset");
    }
}
