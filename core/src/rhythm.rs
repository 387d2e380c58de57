// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Euclidean rhythms, generated with Bjorklund's algorithm.

use std::fmt::Display;

/// Reasons a (hits, steps) pair can't become a rhythm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EuclideanError {
    /// A pattern needs at least one step.
    NoSteps,
    /// More hits were requested than there are steps to hold them.
    TooManyHits { hits: usize, steps: usize },
}
impl Display for EuclideanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EuclideanError::NoSteps => write!(f, "a Euclidean rhythm needs at least one step"),
            EuclideanError::TooManyHits { hits, steps } => {
                write!(f, "can't fit {hits} hits into {steps} steps")
            }
        }
    }
}
impl std::error::Error for EuclideanError {}

/// Returns the Euclidean rhythm E(`hits`, `steps`) as one bool per step,
/// rotated so that the first step is a hit.
///
/// ```
/// use tresillo_core::rhythm::euclidean;
/// assert_eq!(
///     euclidean(3, 8).unwrap(),
///     vec![true, false, false, true, false, false, true, false]
/// );
/// ```
pub fn euclidean(hits: usize, steps: usize) -> Result<Vec<bool>, EuclideanError> {
    EuclideanRhythm::new_with(hits, steps).map(|r| r.pattern)
}

/// An immutable hit/rest pattern. Two rhythms built from the same (hits,
/// steps) pair are always identical.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EuclideanRhythm {
    hits: usize,
    steps: usize,
    pattern: Vec<bool>,
}
impl EuclideanRhythm {
    /// Builds E(`hits`, `steps`). Rejects `steps == 0` and `hits > steps`.
    pub fn new_with(hits: usize, steps: usize) -> Result<Self, EuclideanError> {
        if steps == 0 {
            return Err(EuclideanError::NoSteps);
        }
        if hits > steps {
            return Err(EuclideanError::TooManyHits { hits, steps });
        }
        Ok(Self {
            hits,
            steps,
            pattern: Self::generate(hits, steps),
        })
    }

    /// Like [EuclideanRhythm::new_with], but treats `hits > steps` as a pattern
    /// that's all hits.
    pub fn new_saturating(hits: usize, steps: usize) -> Result<Self, EuclideanError> {
        Self::new_with(hits.min(steps), steps)
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn pattern(&self) -> &[bool] {
        &self.pattern
    }

    /// Whether the given step sounds. Out-of-range steps don't.
    pub fn is_hit(&self, step: usize) -> bool {
        self.pattern.get(step).copied().unwrap_or_default()
    }

    /// The indexes of the steps that sound, in order.
    pub fn hit_indices(&self) -> Vec<usize> {
        self.pattern
            .iter()
            .enumerate()
            .filter_map(|(i, hit)| if *hit { Some(i) } else { None })
            .collect()
    }

    fn generate(hits: usize, steps: usize) -> Vec<bool> {
        if hits == 0 {
            return vec![false; steps];
        }
        if hits >= steps {
            return vec![true; steps];
        }

        // Euclid's algorithm on (steps - hits, hits), remembering the quotient
        // and remainder at each level.
        let mut counts = Vec::default();
        let mut remainders = vec![hits];
        let mut divisor = steps - hits;
        let mut level = 0;
        loop {
            counts.push(divisor / remainders[level]);
            remainders.push(divisor % remainders[level]);
            divisor = remainders[level];
            level += 1;
            if remainders[level] <= 1 {
                break;
            }
        }
        counts.push(divisor);

        let mut pattern = Vec::with_capacity(steps);
        Self::build(level as isize, &counts, &remainders, &mut pattern);

        if let Some(first_hit) = pattern.iter().position(|hit| *hit) {
            pattern.rotate_left(first_hit);
        }
        pattern
    }

    // Level -1 is a rest and level -2 is a hit. Every other level is
    // counts[level] copies of the level below, followed by one copy of the
    // level two below if that level left a remainder.
    fn build(level: isize, counts: &[usize], remainders: &[usize], pattern: &mut Vec<bool>) {
        match level {
            -1 => pattern.push(false),
            -2 => pattern.push(true),
            _ => {
                let index = level as usize;
                for _ in 0..counts[index] {
                    Self::build(level - 1, counts, remainders, pattern);
                }
                if remainders[index] != 0 {
                    Self::build(level - 2, counts, remainders, pattern);
                }
            }
        }
    }
}
impl Display for EuclideanRhythm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for hit in &self.pattern {
            f.write_str(if *hit { "x" } else { "." })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern_from_str(s: &str) -> Vec<bool> {
        s.chars().map(|c| c == 'x').collect()
    }

    #[test]
    fn tresillo() {
        assert_eq!(
            euclidean(3, 8).unwrap(),
            vec![true, false, false, true, false, false, true, false]
        );
    }

    #[test]
    fn degenerate_patterns() {
        assert_eq!(euclidean(0, 8).unwrap(), vec![false; 8]);
        assert_eq!(euclidean(8, 8).unwrap(), vec![true; 8]);
        assert_eq!(euclidean(1, 1).unwrap(), vec![true]);
        assert_eq!(euclidean(0, 1).unwrap(), vec![false]);
    }

    #[test]
    fn well_known_patterns() {
        for (hits, steps, expected) in [
            (1, 4, "x..."),
            (2, 5, "x.x.."),
            (3, 4, "xxx."),
            (4, 12, "x..x..x..x.."),
            (4, 16, "x...x...x...x..."),
            (5, 8, "x.xx.xx."),
        ] {
            let rhythm = EuclideanRhythm::new_with(hits, steps).unwrap();
            assert_eq!(
                rhythm.pattern(),
                pattern_from_str(expected),
                "E({hits}, {steps}) should be {expected} but was {rhythm}"
            );
        }
    }

    #[test]
    fn every_valid_pair_has_right_shape() {
        for steps in 1..=32 {
            for hits in 0..=steps {
                let pattern = euclidean(hits, steps).unwrap();
                assert_eq!(pattern.len(), steps, "E({hits}, {steps}) length");
                assert_eq!(
                    pattern.iter().filter(|hit| **hit).count(),
                    hits,
                    "E({hits}, {steps}) hit count"
                );
                if hits > 0 {
                    assert!(pattern[0], "E({hits}, {steps}) should start with a hit");
                }
                assert_eq!(
                    pattern,
                    euclidean(hits, steps).unwrap(),
                    "E({hits}, {steps}) should be deterministic"
                );
            }
        }
    }

    #[test]
    fn hits_are_evenly_spaced() {
        // Gaps between consecutive hits (wrapping) never differ by more than
        // one step.
        for steps in 2..=24 {
            for hits in 1..=steps {
                let rhythm = EuclideanRhythm::new_with(hits, steps).unwrap();
                let indices = rhythm.hit_indices();
                let gaps: Vec<usize> = (0..indices.len())
                    .map(|i| {
                        let next = indices[(i + 1) % indices.len()];
                        (next + steps - indices[i] - 1) % steps + 1
                    })
                    .collect();
                let min = gaps.iter().min().unwrap();
                let max = gaps.iter().max().unwrap();
                assert!(max - min <= 1, "E({hits}, {steps}) gaps {gaps:?}");
            }
        }
    }

    #[test]
    fn bad_configurations() {
        assert_eq!(euclidean(3, 0), Err(EuclideanError::NoSteps));
        assert_eq!(
            euclidean(9, 8),
            Err(EuclideanError::TooManyHits { hits: 9, steps: 8 })
        );
        assert_eq!(
            EuclideanRhythm::new_saturating(9, 8).unwrap().pattern(),
            vec![true; 8]
        );
        assert!(EuclideanRhythm::new_saturating(1, 0).is_err());
    }

    #[test]
    fn accessors() {
        let rhythm = EuclideanRhythm::new_with(3, 8).unwrap();
        assert_eq!(rhythm.hits(), 3);
        assert_eq!(rhythm.steps(), 8);
        assert_eq!(rhythm.hit_indices(), vec![0, 3, 6]);
        assert!(rhythm.is_hit(3));
        assert!(!rhythm.is_hit(4));
        assert!(!rhythm.is_hit(100));
        assert_eq!(rhythm.to_string(), "x..x..x.");
    }
}
