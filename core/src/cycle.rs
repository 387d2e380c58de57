// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Maps tempo onto repeating rhythmic cycles, and judges whether a tap landed
//! close enough to one of a cycle's beats.

use crate::{
    rhythm::EuclideanRhythm,
    time::{lcm, Seconds, Tempo},
    ParameterType,
};
use anyhow::{anyhow, Result};
#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use strum_macros::EnumIter;

/// Euclidean patterns are written in sixteenth notes: four steps per beat.
pub const STEPS_PER_BEAT: usize = 4;

/// Which hand (or key) a beat belongs to.
#[derive(Clone, Copy, Debug, strum_macros::Display, EnumIter, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum Voice {
    Left,
    Right,
}

/// The shape of what the player is asked to reproduce.
#[derive(Clone, Debug, PartialEq)]
pub enum Rhythm {
    /// Two voices, `left` and `right` evenly spaced beats per cycle.
    Polyrhythm { left: usize, right: usize },
    /// A single voice that sounds on the pattern's hits.
    Euclidean(EuclideanRhythm),
}
impl Rhythm {
    pub fn new_polyrhythm(left: usize, right: usize) -> Result<Self> {
        if left == 0 || right == 0 {
            Err(anyhow!(
                "polyrhythm {left}:{right} needs at least one beat per voice"
            ))
        } else {
            Ok(Self::Polyrhythm { left, right })
        }
    }

    /// The voices the player can tap.
    pub fn voices(&self) -> &'static [Voice] {
        match self {
            Rhythm::Polyrhythm { .. } => &[Voice::Left, Voice::Right],
            Rhythm::Euclidean(_) => &[Voice::Left],
        }
    }

    /// How many evenly spaced slots the given voice divides a cycle into.
    /// Zero if the rhythm has no such voice.
    pub fn subdivisions(&self, voice: Voice) -> usize {
        match (self, voice) {
            (Rhythm::Polyrhythm { left, .. }, Voice::Left) => *left,
            (Rhythm::Polyrhythm { right, .. }, Voice::Right) => *right,
            (Rhythm::Euclidean(rhythm), Voice::Left) => rhythm.steps(),
            (Rhythm::Euclidean(_), Voice::Right) => 0,
        }
    }

    /// One full repetition of the rhythm.
    ///
    /// A polyrhythm's cycle spans lcm(L, R) / max(L, R) beats. A Euclidean
    /// pattern spans steps / 4 beats.
    pub fn cycle_duration(&self, tempo: Tempo) -> Seconds {
        let beat = tempo.seconds_per_beat();
        match self {
            Rhythm::Polyrhythm { left, right } => {
                beat * lcm(*left, *right) as ParameterType / (*left).max(*right) as ParameterType
            }
            Rhythm::Euclidean(rhythm) => {
                beat * rhythm.steps() as ParameterType / STEPS_PER_BEAT as ParameterType
            }
        }
    }

    /// The time between adjacent slots of a voice.
    pub fn beat_interval(&self, voice: Voice, tempo: Tempo) -> Seconds {
        match self.subdivisions(voice) {
            0 => 0.0,
            n => self.cycle_duration(tempo) / n as ParameterType,
        }
    }

    /// The slot indexes that sound for the given voice.
    pub fn beat_indices(&self, voice: Voice) -> Vec<usize> {
        match self {
            Rhythm::Polyrhythm { .. } => (0..self.subdivisions(voice)).collect(),
            Rhythm::Euclidean(rhythm) => match voice {
                Voice::Left => rhythm.hit_indices(),
                Voice::Right => Vec::default(),
            },
        }
    }

    /// Offsets from the start of a cycle of the beats that sound for a voice.
    pub fn beat_positions(&self, voice: Voice, tempo: Tempo) -> Vec<(usize, Seconds)> {
        let interval = self.beat_interval(voice, tempo);
        self.beat_indices(voice)
            .into_iter()
            .map(|i| (i, i as ParameterType * interval))
            .collect()
    }

    /// Absolute instants of the beats in the cycle that starts at
    /// `cycle_start`. Rest slots produce nothing.
    pub fn beat_times(
        &self,
        voice: Voice,
        cycle_start: Seconds,
        tempo: Tempo,
    ) -> Vec<ScheduledBeat> {
        self.beat_positions(voice, tempo)
            .into_iter()
            .map(|(index, offset)| ScheduledBeat {
                voice,
                index,
                when: cycle_start + offset,
            })
            .collect()
    }
}

impl Display for Rhythm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rhythm::Polyrhythm { left, right } => write!(f, "{left}:{right}"),
            Rhythm::Euclidean(rhythm) => write!(f, "E({},{})", rhythm.hits(), rhythm.steps()),
        }
    }
}

/// A beat that should sound at an absolute audio-clock time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScheduledBeat {
    pub voice: Voice,
    pub index: usize,
    pub when: Seconds,
}

/// The verdict on a single tap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Judgment {
    /// Landed within tolerance of the beat at `index`. `error` is how far off
    /// it was.
    Hit { index: usize, error: Seconds },
    /// Too far from every beat. `error` is the distance to the nearest one,
    /// or None if the voice has no beats at all.
    Miss { error: Option<Seconds> },
}
impl Judgment {
    pub fn is_hit(&self) -> bool {
        matches!(self, Judgment::Hit { .. })
    }
}

/// Judges taps against the beats of one voice.
#[derive(Clone, Debug)]
pub struct HitDetector {
    cycle_duration: Seconds,
    tolerance: Seconds,
    beats: Vec<(usize, Seconds)>,
}
impl HitDetector {
    /// Taps within this fraction of a slot's duration of a beat count.
    pub const DEFAULT_TOLERANCE_RATIO: ParameterType = 0.2;

    pub fn new_with(rhythm: &Rhythm, voice: Voice, tempo: Tempo, tolerance_ratio: f64) -> Self {
        Self {
            cycle_duration: rhythm.cycle_duration(tempo),
            tolerance: rhythm.beat_interval(voice, tempo) * tolerance_ratio,
            beats: rhythm.beat_positions(voice, tempo),
        }
    }

    pub fn cycle_duration(&self) -> Seconds {
        self.cycle_duration
    }

    pub fn tolerance(&self) -> Seconds {
        self.tolerance
    }

    /// Judges a tap `elapsed` seconds after the cycle origin. Any number of
    /// whole cycles may have passed; negative offsets wrap backward.
    pub fn judge(&self, elapsed: Seconds) -> Judgment {
        if self.beats.is_empty() || self.cycle_duration <= 0.0 {
            return Judgment::Miss { error: None };
        }
        let position = elapsed.rem_euclid(self.cycle_duration);
        let nearest = self
            .beats
            .iter()
            .map(|(index, offset)| (*index, self.circular_distance(position, *offset)))
            .min_by(|a, b| a.1.total_cmp(&b.1));

        match nearest {
            Some((index, error)) if error <= self.tolerance => Judgment::Hit { index, error },
            Some((_, error)) => Judgment::Miss { error: Some(error) },
            None => Judgment::Miss { error: None },
        }
    }

    fn circular_distance(&self, a: Seconds, b: Seconds) -> Seconds {
        let direct = (a - b).abs();
        direct.min(self.cycle_duration - direct)
    }
}
