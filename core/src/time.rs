// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::ParameterType;
use derive_more::{Display, From};
#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// Audio-clock time. Everything that schedules or judges beats works in these
/// units, measured from whatever origin the clock source chooses.
pub type Seconds = f64;

/// Beats per minute.
#[derive(Clone, Copy, Debug, Display, From, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Tempo(pub ParameterType);
impl Default for Tempo {
    fn default() -> Self {
        Self(Self::DEFAULT_BPM)
    }
}
impl Tempo {
    /// The tempo a new round starts at unless settings say otherwise.
    pub const DEFAULT_BPM: ParameterType = 80.0;

    pub fn bpm(&self) -> ParameterType {
        self.0
    }

    /// The length of one quarter-note beat.
    pub fn seconds_per_beat(&self) -> Seconds {
        60.0 / self.0
    }

    /// Returns a tempo raised by `increment`, but never above `ceiling`.
    pub fn ramped(&self, increment: ParameterType, ceiling: ParameterType) -> Self {
        Self((self.0 + increment).min(ceiling))
    }
}

/// Greatest common divisor.
pub fn gcd(a: usize, b: usize) -> usize {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Least common multiple. Zero if either argument is zero.
pub fn lcm(a: usize, b: usize) -> usize {
    if a == 0 || b == 0 {
        0
    } else {
        a / gcd(a, b) * b
    }
}
