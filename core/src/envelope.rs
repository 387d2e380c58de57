// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Scores how closely a player's ADSR envelope matches a target envelope.

use crate::{Normal, ParameterType};
#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// The four stages of an amplitude envelope. Times are in seconds; sustain is
/// a level.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Adsr {
    pub attack: ParameterType,
    pub decay: ParameterType,
    pub sustain: Normal,
    pub release: ParameterType,
}
impl Default for Adsr {
    fn default() -> Self {
        Self::new_with(0.0, 0.0, 1.0.into(), 0.0)
    }
}
impl Adsr {
    pub fn new_with(
        attack: ParameterType,
        decay: ParameterType,
        sustain: Normal,
        release: ParameterType,
    ) -> Self {
        Self {
            attack: attack.max(0.0),
            decay: decay.max(0.0),
            sustain,
            release: release.max(0.0),
        }
    }

    pub fn get(&self, parameter: AdsrParameter) -> ParameterType {
        match parameter {
            AdsrParameter::Attack => self.attack,
            AdsrParameter::Decay => self.decay,
            AdsrParameter::Sustain => self.sustain.value(),
            AdsrParameter::Release => self.release,
        }
    }
}

#[derive(Clone, Copy, Debug, Display, EnumIter, EnumString, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "kebab-case"))]
#[strum(serialize_all = "kebab-case")]
pub enum AdsrParameter {
    Attack,
    Decay,
    Sustain,
    Release,
}
impl AdsrParameter {
    /// A difference this large or larger counts as completely wrong.
    pub fn scale(&self) -> ParameterType {
        match self {
            AdsrParameter::Attack => 1.0,
            AdsrParameter::Decay => 0.6,
            AdsrParameter::Sustain => 1.0,
            AdsrParameter::Release => 1.0,
        }
    }
}

/// Returns 0..=100, where 100 means every evaluated parameter matches. An
/// empty parameter list has nothing to get wrong, and scores 100.
pub fn similarity_score(user: &Adsr, target: &Adsr, parameters: &[AdsrParameter]) -> u8 {
    if parameters.is_empty() {
        return 100;
    }
    let total: ParameterType = parameters
        .iter()
        .map(|p| ((user.get(*p) - target.get(*p)).abs() / p.scale()).clamp(0.0, 1.0))
        .sum();
    let average = total / parameters.len() as ParameterType;
    ((1.0 - average) * 100.0).round().clamp(0.0, 100.0) as u8
}

/// One round of the envelope-matching game: which parameters are judged, and
/// the score needed to pass.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(rename_all = "kebab-case"))]
pub struct EnvelopeLevel {
    pub parameters: Vec<AdsrParameter>,
    pub threshold: u8,
}
impl EnvelopeLevel {
    pub fn score(&self, user: &Adsr, target: &Adsr) -> u8 {
        similarity_score(user, target, &self.parameters)
    }

    pub fn passes(&self, user: &Adsr, target: &Adsr) -> bool {
        self.score(user, target) >= self.threshold
    }
}
