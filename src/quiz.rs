// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Ear-training quizzes: name the interval, name the chord.

use crate::audio::{Sound, SoundRequest};
use anyhow::{anyhow, Result};
use std::{
    ops::Range,
    time::{SystemTime, UNIX_EPOCH},
};
use strum::IntoEnumIterator;
use tresillo_core::{
    harmony::{Chord, ChordQuality, Interval, Note},
    history::RecentHistory,
    time::Seconds,
    Normal,
};

#[derive(Debug)]
pub struct Rng(oorandom::Rand64);
impl Default for Rng {
    fn default() -> Self {
        // Any seed that differs from run to run will do.
        Self::new_with_seed(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos(),
        )
    }
}
impl Rng {
    /// The same seed always produces the same sequence.
    pub fn new_with_seed(seed: u128) -> Self {
        Self(oorandom::Rand64::new(seed))
    }

    pub fn rand_range(&mut self, range: Range<u64>) -> u64 {
        self.0.rand_range(range)
    }
}

/// [QuizPicker] picks randomly among candidates while steering clear of the
/// ones it picked most recently.
#[derive(Debug)]
pub struct QuizPicker<T> {
    candidates: Vec<T>,
    history: RecentHistory<T>,
    rng: Rng,
}
impl<T: Clone + PartialEq> QuizPicker<T> {
    pub fn new_with(candidates: Vec<T>, history_capacity: usize, rng: Rng) -> Result<Self> {
        if candidates.is_empty() {
            return Err(anyhow!("a quiz needs at least one candidate"));
        }
        Ok(Self {
            candidates,
            history: RecentHistory::new_with(history_capacity),
            rng,
        })
    }

    /// Picks a candidate that isn't in recent history, or any candidate if
    /// they're all recent, and remembers the pick.
    pub fn pick(&mut self) -> T {
        let fresh: Vec<&T> = self
            .candidates
            .iter()
            .filter(|c| !self.history.contains(*c))
            .collect();
        let pool = if fresh.is_empty() {
            self.candidates.iter().collect()
        } else {
            fresh
        };
        let choice = pool[self.rng.rand_range(0..pool.len() as u64) as usize].clone();
        self.history.push(choice.clone());
        choice
    }

    pub fn history(&self) -> &RecentHistory<T> {
        &self.history
    }

    pub(crate) fn rng(&mut self) -> &mut Rng {
        &mut self.rng
    }
}

/// Two notes played one after the other.
#[derive(Clone, Debug, PartialEq)]
pub struct IntervalQuestion {
    pub lower: Note,
    pub upper: Note,
    pub answer: Interval,
}
impl IntervalQuestion {
    const NOTE_DURATION: Seconds = 0.8;

    pub fn is_correct(&self, guess: Interval) -> bool {
        guess == self.answer
    }

    /// The question as sounds, starting at `when`.
    pub fn sounds(&self, when: Seconds) -> Vec<SoundRequest> {
        [&self.lower, &self.upper]
            .iter()
            .enumerate()
            .map(|(i, note)| SoundRequest {
                sound: Sound::Tone {
                    midi_number: note.midi_number(),
                },
                when: when + i as Seconds * Self::NOTE_DURATION,
                duration: Self::NOTE_DURATION,
                velocity: Normal::maximum(),
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct IntervalQuiz {
    picker: QuizPicker<Interval>,
}
impl IntervalQuiz {
    /// Lowest notes are drawn from C3 up to B3.
    const ROOTS: Range<u64> = 48..60;

    pub fn new_with(intervals: Vec<Interval>, history_capacity: usize, rng: Rng) -> Result<Self> {
        Ok(Self {
            picker: QuizPicker::new_with(intervals, history_capacity, rng)?,
        })
    }

    /// A quiz over every interval except unison.
    pub fn new_with_all(history_capacity: usize, rng: Rng) -> Result<Self> {
        Self::new_with(
            Interval::iter()
                .filter(|i| *i != Interval::Unison)
                .collect(),
            history_capacity,
            rng,
        )
    }

    pub fn next_question(&mut self) -> IntervalQuestion {
        let answer = self.picker.pick();
        let root = self.picker.rng().rand_range(Self::ROOTS) as i16;
        IntervalQuestion {
            lower: Note::from_midi_number(root),
            upper: Note::from_midi_number(root + answer.semitones() as i16),
            answer,
        }
    }

    pub fn picker(&self) -> &QuizPicker<Interval> {
        &self.picker
    }
}

/// A chord played as a block.
#[derive(Clone, Debug, PartialEq)]
pub struct ChordQuestion {
    pub notes: Vec<Note>,
    pub answer: Chord,
}
impl ChordQuestion {
    const DURATION: Seconds = 1.5;

    pub fn is_correct(&self, guess: ChordQuality) -> bool {
        guess == self.answer.quality
    }

    pub fn sounds(&self, when: Seconds) -> Vec<SoundRequest> {
        self.notes
            .iter()
            .map(|note| SoundRequest {
                sound: Sound::Tone {
                    midi_number: note.midi_number(),
                },
                when,
                duration: Self::DURATION,
                velocity: Normal::new(0.8),
            })
            .collect()
    }
}

#[derive(Debug)]
pub struct ChordQuiz {
    picker: QuizPicker<ChordQuality>,
}
impl ChordQuiz {
    /// Roots range from C3 to C5.
    const ROOTS: Range<u64> = 48..73;

    pub fn new_with(
        qualities: Vec<ChordQuality>,
        history_capacity: usize,
        rng: Rng,
    ) -> Result<Self> {
        Ok(Self {
            picker: QuizPicker::new_with(qualities, history_capacity, rng)?,
        })
    }

    /// Triads only, for beginners.
    pub fn new_with_triads(history_capacity: usize, rng: Rng) -> Result<Self> {
        Self::new_with(
            vec![
                ChordQuality::Major,
                ChordQuality::Minor,
                ChordQuality::Diminished,
                ChordQuality::Augmented,
            ],
            history_capacity,
            rng,
        )
    }

    pub fn next_question(&mut self) -> ChordQuestion {
        let quality = self.picker.pick();
        let root = self.picker.rng().rand_range(Self::ROOTS) as i16;
        let notes: Vec<Note> = quality
            .intervals()
            .iter()
            .map(|i| Note::from_midi_number(root + *i as i16))
            .collect();
        ChordQuestion {
            answer: Chord {
                root: Note::from_midi_number(root).name().to_string(),
                quality,
            },
            notes,
        }
    }

    pub fn picker(&self) -> &QuizPicker<ChordQuality> {
        &self.picker
    }
}
