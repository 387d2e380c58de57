// Copyright (c) 2023 Mike Tsao. All rights reserved.

use super::DifficultySettings;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tresillo_core::{
    cycle::Rhythm,
    envelope::{AdsrParameter, EnvelopeLevel},
    history::RecentHistory,
    rhythm::EuclideanRhythm,
    time::Tempo,
};

/// Which rhythm a round asks the player to tap.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RhythmSettings {
    Polyrhythm { left: usize, right: usize },
    Euclidean { hits: usize, steps: usize },
}
impl Default for RhythmSettings {
    fn default() -> Self {
        Self::Polyrhythm { left: 3, right: 4 }
    }
}
impl RhythmSettings {
    pub fn into_rhythm(&self) -> Result<Rhythm> {
        match self {
            RhythmSettings::Polyrhythm { left, right } => Rhythm::new_polyrhythm(*left, *right),
            RhythmSettings::Euclidean { hits, steps } => Ok(Rhythm::Euclidean(
                EuclideanRhythm::new_with(*hits, *steps)?,
            )),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct GameSettings {
    /// Tempo at the start of each round.
    #[serde(rename = "bpm")]
    pub starting_tempo: Tempo,

    pub rhythm: RhythmSettings,

    pub difficulty: DifficultySettings,

    /// The envelope-matching game's levels, easiest first.
    pub envelope_levels: Vec<EnvelopeLevel>,

    /// How many recent quiz answers to avoid repeating.
    pub quiz_history: usize,
}
impl Default for GameSettings {
    fn default() -> Self {
        Self {
            starting_tempo: Tempo::default(),
            rhythm: RhythmSettings::default(),
            difficulty: DifficultySettings::default(),
            envelope_levels: Self::default_envelope_levels(),
            quiz_history: RecentHistory::<()>::DEFAULT_CAPACITY,
        }
    }
}
impl GameSettings {
    pub fn new_from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn new_from_json_file(path: &Path) -> Result<Self> {
        Self::new_from_json(std::fs::read_to_string(path)?.as_str())
    }

    /// One parameter at a time, then pairs, then the whole envelope.
    pub fn default_envelope_levels() -> Vec<EnvelopeLevel> {
        use AdsrParameter::*;
        vec![
            EnvelopeLevel {
                parameters: vec![Attack],
                threshold: 80,
            },
            EnvelopeLevel {
                parameters: vec![Release],
                threshold: 80,
            },
            EnvelopeLevel {
                parameters: vec![Decay, Sustain],
                threshold: 75,
            },
            EnvelopeLevel {
                parameters: vec![Attack, Release],
                threshold: 75,
            },
            EnvelopeLevel {
                parameters: vec![Attack, Decay, Sustain, Release],
                threshold: 70,
            },
        ]
    }
}
