// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Fundamental types and the algorithms the rhythm and ear-training games are
//! built on. Nothing in this crate touches a clock or an audio device.

use std::ops::{Add, Sub};
#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};

/// The [cycle] module turns tempo into cycle lengths and beat instants, and
/// judges taps against them.
pub mod cycle;
/// The [envelope] module scores ADSR envelopes against each other.
pub mod envelope;
/// The [harmony] module parses note names and recognizes intervals and chords.
pub mod harmony;
/// The [history] module remembers recently used items.
pub mod history;
/// The [rhythm] module generates Euclidean rhythms.
pub mod rhythm;
/// The [time] module handles tempo and audio-clock time.
pub mod time;

/// Use [ParameterType] for general-purpose real-valued parameters that have no
/// range restrictions.
pub type ParameterType = f64;

/// [RangedF64] is an f64 clamped to an integer-bounded range. Out-of-range
/// values are clamped silently rather than rejected.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serialization", serde(from = "f64", into = "f64"))]
pub struct RangedF64<const LOWER: i8, const UPPER: i8>(f64);
impl<const LOWER: i8, const UPPER: i8> RangedF64<LOWER, UPPER> {
    pub const MAX: f64 = UPPER as f64;
    pub const MIN: f64 = LOWER as f64;

    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }
    pub fn maximum() -> Self {
        Self(Self::MAX)
    }
    pub fn minimum() -> Self {
        Self(Self::MIN)
    }
    pub fn value(&self) -> f64 {
        self.0.clamp(Self::MIN, Self::MAX)
    }
    pub fn set(&mut self, value: f64) {
        self.0 = value.clamp(Self::MIN, Self::MAX);
    }
}
impl<const LOWER: i8, const UPPER: i8> Add<f64> for RangedF64<LOWER, UPPER> {
    type Output = Self;

    fn add(self, rhs: f64) -> Self::Output {
        Self::new(self.0 + rhs)
    }
}
impl<const LOWER: i8, const UPPER: i8> Sub<f64> for RangedF64<LOWER, UPPER> {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self::Output {
        Self::new(self.0 - rhs)
    }
}
impl<const LOWER: i8, const UPPER: i8> From<RangedF64<LOWER, UPPER>> for f64 {
    fn from(value: RangedF64<LOWER, UPPER>) -> Self {
        value.value()
    }
}
impl<const LOWER: i8, const UPPER: i8> From<f64> for RangedF64<LOWER, UPPER> {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// A Normal is a [RangedF64] whose range is [0.0, 1.0].
pub type Normal = RangedF64<0, 1>;
