// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The `tresillo-settings` crate holds the serializable configuration of the
//! games: tempo, the rhythm to play, difficulty constants, and envelope
//! levels. These structs are kept apart from the engine types so that the
//! settings file format can stay stable while the engine changes.

pub use games::{GameSettings, RhythmSettings};

pub(crate) mod games;

use serde::{Deserialize, Serialize};
use tresillo_core::{cycle::HitDetector, time::Seconds, ParameterType};

/// Game-balance constants for the rhythm games. The defaults are the values
/// the games have always shipped with; change them only deliberately.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DifficultySettings {
    /// In elimination mode, tempo rises after every this many completed
    /// cycles.
    pub ramp_every_cycles: usize,

    /// How much tempo rises each time, in BPM.
    pub ramp_increment_bpm: ParameterType,

    /// Tempo never ramps past this.
    pub max_bpm: ParameterType,

    /// Misses registered within this long of the previous miss are ignored.
    pub miss_debounce: Seconds,

    /// A new cycle starts this far after the moment its predecessor is seen to
    /// have ended, so that its first beat can be scheduled in time.
    pub cycle_lookahead: Seconds,

    /// Fraction of one subdivision a tap may be off by and still count.
    pub tolerance_ratio: ParameterType,

    /// The scheduler never waits less than this between checks.
    pub min_check_delay: Seconds,
}
impl Default for DifficultySettings {
    fn default() -> Self {
        Self {
            ramp_every_cycles: 4,
            ramp_increment_bpm: 2.0,
            max_bpm: 200.0,
            miss_debounce: 0.2,
            cycle_lookahead: 0.1,
            tolerance_ratio: HitDetector::DEFAULT_TOLERANCE_RATIO,
            min_check_delay: 0.01,
        }
    }
}
