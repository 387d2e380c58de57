// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Note names, intervals, and chord recognition.

use anyhow::{anyhow, Result};
#[cfg(feature = "serialization")]
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use strum_macros::{Display as StrumDisplay, EnumIter, FromRepr};

/// A pitch spelled the way the player typed it, e.g. `C4`, `F#3`, `Bb2`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub struct Note {
    name: String,
    octave: i8,
    midi_number: i16,
}
impl Note {
    /// The octave assumed when a name doesn't carry one.
    pub const DEFAULT_OCTAVE: i8 = 4;

    /// Parses scientific pitch notation. Accidentals may be `#`, `b`, `♯` or
    /// `♭`, repeated. A missing octave means [Note::DEFAULT_OCTAVE].
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        let mut chars = s.chars().peekable();
        let letter = chars
            .next()
            .ok_or_else(|| anyhow!("empty note name"))?
            .to_ascii_uppercase();
        let mut pitch_class: i16 = match letter {
            'C' => 0,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return Err(anyhow!("'{s}' doesn't start with a note letter")),
        };
        let mut name = String::from(letter);
        while let Some(c) = chars.peek() {
            match c {
                '#' | '♯' => pitch_class += 1,
                'b' | '♭' => pitch_class -= 1,
                _ => break,
            }
            name.push(*c);
            chars.next();
        }
        let rest: String = chars.collect();
        let octave = if rest.is_empty() {
            Self::DEFAULT_OCTAVE
        } else {
            rest.parse::<i8>()
                .map_err(|_| anyhow!("'{s}' has a bad octave '{rest}'"))?
        };
        let midi_number = (octave as i16 + 1) * 12 + pitch_class;
        Ok(Self {
            name,
            octave,
            midi_number,
        })
    }

    /// Spells a MIDI key number with sharps, e.g. 61 is `C#4`.
    pub fn from_midi_number(midi_number: i16) -> Self {
        const NAMES: [&str; 12] = [
            "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
        ];
        Self {
            name: NAMES[midi_number.rem_euclid(12) as usize].to_string(),
            octave: (midi_number.div_euclid(12) - 1) as i8,
            midi_number,
        }
    }

    /// The note's spelling without its octave, e.g. `Bb`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn octave(&self) -> i8 {
        self.octave
    }

    /// MIDI key number. C4 is 60. Can fall outside 0..=127 for extreme
    /// octaves; nothing here needs it to be a valid MIDI key.
    pub fn midi_number(&self) -> i16 {
        self.midi_number
    }

    /// 0 for C through 11 for B.
    pub fn pitch_class(&self) -> u8 {
        self.midi_number.rem_euclid(12) as u8
    }
}
impl FromStr for Note {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
impl Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

/// Simple intervals, unison through octave.
#[derive(Clone, Copy, Debug, StrumDisplay, EnumIter, FromRepr, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum Interval {
    #[strum(serialize = "Unison")]
    Unison = 0,
    #[strum(serialize = "Minor Second")]
    MinorSecond = 1,
    #[strum(serialize = "Major Second")]
    MajorSecond = 2,
    #[strum(serialize = "Minor Third")]
    MinorThird = 3,
    #[strum(serialize = "Major Third")]
    MajorThird = 4,
    #[strum(serialize = "Perfect Fourth")]
    PerfectFourth = 5,
    #[strum(serialize = "Tritone")]
    Tritone = 6,
    #[strum(serialize = "Perfect Fifth")]
    PerfectFifth = 7,
    #[strum(serialize = "Minor Sixth")]
    MinorSixth = 8,
    #[strum(serialize = "Major Sixth")]
    MajorSixth = 9,
    #[strum(serialize = "Minor Seventh")]
    MinorSeventh = 10,
    #[strum(serialize = "Major Seventh")]
    MajorSeventh = 11,
    #[strum(serialize = "Octave")]
    Octave = 12,
}
impl Interval {
    /// Names the distance between two notes, in either order. Compound
    /// intervals fold down into a single octave; exact multiples of an octave
    /// stay an octave.
    pub fn between(a: &Note, b: &Note) -> Self {
        let semitones = (a.midi_number() - b.midi_number()).unsigned_abs();
        let folded = if semitones > 12 {
            (semitones - 1) % 12 + 1
        } else {
            semitones
        };
        // folded is always in 0..=12.
        Self::from_repr(folded as u8).unwrap_or(Self::Unison)
    }

    pub fn semitones(&self) -> u8 {
        *self as u8
    }
}

/// Chord qualities in the order they're tried. The first whose interval set
/// matches exactly wins.
#[derive(Clone, Copy, Debug, EnumIter, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialization", derive(Serialize, Deserialize))]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Sus2,
    Sus4,
    Major7,
    Dominant7,
    Minor7,
    Diminished7,
    HalfDiminished7,
    MinorMajor7,
    Major9,
    Dominant9,
    Minor9,
    Power,
}
impl ChordQuality {
    /// Semitones above the lowest note, sorted and deduplicated.
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Sus2 => &[0, 2, 7],
            ChordQuality::Sus4 => &[0, 5, 7],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::Diminished7 => &[0, 3, 6, 9],
            ChordQuality::HalfDiminished7 => &[0, 3, 6, 10],
            ChordQuality::MinorMajor7 => &[0, 3, 7, 11],
            ChordQuality::Major9 => &[0, 2, 4, 7, 11],
            ChordQuality::Dominant9 => &[0, 2, 4, 7, 10],
            ChordQuality::Minor9 => &[0, 2, 3, 7, 10],
            ChordQuality::Power => &[0, 7],
        }
    }

    /// What goes after the root in a chord label. Major is written bare.
    pub fn suffix(&self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::Diminished7 => "dim7",
            ChordQuality::HalfDiminished7 => "m7b5",
            ChordQuality::MinorMajor7 => "mMaj7",
            ChordQuality::Major9 => "maj9",
            ChordQuality::Dominant9 => "9",
            ChordQuality::Minor9 => "m9",
            ChordQuality::Power => "5",
        }
    }
}

/// A recognized chord: the lowest note's spelling plus a quality.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chord {
    pub root: String,
    pub quality: ChordQuality,
}
impl Display for Chord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.root, self.quality.suffix())
    }
}

/// Semitones of each note above the lowest, folded into one octave, sorted,
/// and deduplicated.
pub fn normalized_intervals(notes: &[Note]) -> Vec<u8> {
    let Some(lowest) = notes.iter().map(|n| n.midi_number()).min() else {
        return Vec::default();
    };
    let mut intervals: Vec<u8> = notes
        .iter()
        .map(|n| (n.midi_number() - lowest).rem_euclid(12) as u8)
        .collect();
    intervals.sort_unstable();
    intervals.dedup();
    intervals
}

/// Recognizes a chord from already-parsed notes.
pub fn identify_chord(notes: &[Note]) -> Option<Chord> {
    use strum::IntoEnumIterator;

    let lowest = notes.iter().min_by_key(|n| n.midi_number())?;
    let intervals = normalized_intervals(notes);
    ChordQuality::iter()
        .find(|quality| quality.intervals() == intervals.as_slice())
        .map(|quality| Chord {
            root: lowest.name().to_string(),
            quality,
        })
}

/// Parses note names and returns the chord label, e.g. `["C4", "E4", "G4"]`
/// gives `Some("C")`. Returns `Ok(None)` when the notes parse but don't form a
/// known chord.
pub fn detect_chord<S: AsRef<str>>(note_names: &[S]) -> Result<Option<String>> {
    let notes = note_names
        .iter()
        .map(|s| Note::parse(s.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    Ok(identify_chord(&notes).map(|chord| chord.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_parsing() {
        let c4 = Note::parse("C4").unwrap();
        assert_eq!(c4.midi_number(), 60);
        assert_eq!(c4.pitch_class(), 0);
        assert_eq!(c4.name(), "C");
        assert_eq!(c4.octave(), 4);

        assert_eq!(Note::parse("A4").unwrap().midi_number(), 69);
        assert_eq!(Note::parse("F#3").unwrap().midi_number(), 54);
        assert_eq!(Note::parse("Bb2").unwrap().midi_number(), 46);
        assert_eq!(Note::parse("e♭5").unwrap().midi_number(), 75);
        assert_eq!(Note::parse("Cb4").unwrap().pitch_class(), 11);
        assert_eq!(Note::parse("C-1").unwrap().midi_number(), 0);
        assert_eq!(Note::parse("G").unwrap().midi_number(), 67);
        assert_eq!("D#4".parse::<Note>().unwrap().to_string(), "D#4");
    }

    #[test]
    fn notes_from_midi_numbers() {
        assert_eq!(Note::from_midi_number(60).to_string(), "C4");
        assert_eq!(Note::from_midi_number(61).to_string(), "C#4");
        assert_eq!(Note::from_midi_number(0).to_string(), "C-1");
        assert_eq!(Note::from_midi_number(69), Note::parse("A4").unwrap());
    }

    #[test]
    fn bad_note_names() {
        assert!(Note::parse("").is_err());
        assert!(Note::parse("H4").is_err());
        assert!(Note::parse("C4x").is_err());
        assert!(Note::parse("4C").is_err());
    }

    #[test]
    fn c_major_triad() {
        assert_eq!(
            detect_chord(&["C4", "E4", "G4"]).unwrap(),
            Some("C".to_string())
        );
    }

    #[test]
    fn chord_labels() {
        for (notes, expected) in [
            (vec!["A3", "C4", "E4"], "Am"),
            (vec!["B3", "D4", "F4"], "Bdim"),
            (vec!["C4", "E4", "G#4"], "Caug"),
            (vec!["D4", "E4", "A4"], "Dsus2"),
            (vec!["D4", "G4", "A4"], "Dsus4"),
            (vec!["C4", "E4", "G4", "B4"], "Cmaj7"),
            (vec!["G3", "B3", "D4", "F4"], "G7"),
            (vec!["D4", "F4", "A4", "C5"], "Dm7"),
            (vec!["B3", "D4", "F4", "Ab4"], "Bdim7"),
            (vec!["B3", "D4", "F4", "A4"], "Bm7b5"),
            (vec!["C4", "Eb4", "G4", "B4"], "CmMaj7"),
            (vec!["C4", "E4", "G4", "B4", "D5"], "Cmaj9"),
            (vec!["C4", "E4", "G4", "Bb4", "D5"], "C9"),
            (vec!["C4", "Eb4", "G4", "Bb4", "D5"], "Cm9"),
            (vec!["E2", "B2"], "E5"),
            (vec!["Bb2", "D3", "F3"], "Bb"),
        ] {
            assert_eq!(
                detect_chord(&notes).unwrap().as_deref(),
                Some(expected),
                "{notes:?} should be {expected}"
            );
        }
    }

    #[test]
    fn voicing_and_doubling_dont_matter() {
        // Doubled root an octave up, and input out of order.
        assert_eq!(
            detect_chord(&["G4", "C5", "E4", "C4"]).unwrap().as_deref(),
            Some("C")
        );
        assert_eq!(
            normalized_intervals(&[
                Note::parse("C4").unwrap(),
                Note::parse("G5").unwrap(),
                Note::parse("E6").unwrap(),
            ]),
            vec![0, 4, 7]
        );
    }

    #[test]
    fn root_is_the_lowest_note() {
        // First inversion of C major reads as E-rooted, which isn't in the
        // table.
        assert_eq!(detect_chord(&["E4", "G4", "C5"]).unwrap(), None);
    }

    #[test]
    fn no_match() {
        assert_eq!(detect_chord(&["C4", "C#4", "D4"]).unwrap(), None);
        assert_eq!(detect_chord(&["C4"]).unwrap(), None);
        assert_eq!(detect_chord::<&str>(&[]).unwrap(), None);
        assert!(detect_chord(&["C4", "nope"]).is_err());
    }

    #[test]
    fn intervals() {
        let c4 = Note::parse("C4").unwrap();
        for (other, expected) in [
            ("C4", Interval::Unison),
            ("E4", Interval::MajorThird),
            ("G4", Interval::PerfectFifth),
            ("F#4", Interval::Tritone),
            ("C5", Interval::Octave),
            ("C6", Interval::Octave),
            ("G5", Interval::PerfectFifth),
            ("A3", Interval::MinorThird),
        ] {
            let other = Note::parse(other).unwrap();
            assert_eq!(Interval::between(&c4, &other), expected, "C4 to {other}");
            assert_eq!(Interval::between(&other, &c4), expected, "{other} to C4");
        }
        assert_eq!(Interval::PerfectFifth.to_string(), "Perfect Fifth");
        assert_eq!(Interval::MinorSixth.semitones(), 8);
    }
}
