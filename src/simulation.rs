// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Plays a rhythm round offline with a make-believe player. Time is whatever
//! the loop says it is, so a round of any length finishes instantly.

use crate::{
    audio::SoundOutput,
    game::RhythmGame,
    quiz::Rng,
    session::{Difficulty, Session, TapOutcome},
};
use log::debug;
use tresillo_core::{
    cycle::Voice,
    time::{Seconds, Tempo},
};

/// A player who taps every beat, off by up to `max_error` either way.
#[derive(Debug)]
pub struct SimulatedPlayer {
    max_error: Seconds,
    rng: Rng,
}
impl SimulatedPlayer {
    pub fn new_with(max_error: Seconds, rng: Rng) -> Self {
        Self {
            max_error: max_error.abs(),
            rng,
        }
    }

    fn tap_time(&mut self, when: Seconds) -> Seconds {
        if self.max_error == 0.0 {
            return when;
        }
        let unit = self.rng.rand_range(0..2001) as Seconds / 1000.0 - 1.0;
        when + unit * self.max_error
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoundSummary {
    pub cycles: usize,
    pub taps: usize,
    pub hits: usize,
    pub misses: usize,
    pub best_streak: usize,
    pub final_tempo: Tempo,
    /// The round ended on an elimination miss.
    pub failed: bool,
}

/// Plays up to `max_cycles` cycles, then returns the session to the menu.
pub fn simulate_round(
    session: &mut Session,
    difficulty: Difficulty,
    player: &mut SimulatedPlayer,
    max_cycles: usize,
    output: &dyn SoundOutput,
) -> RoundSummary {
    let mut summary = RoundSummary::default();
    let mut outcome = session.start(difficulty, 0.0);
    'round: loop {
        if summary.cycles >= max_cycles {
            break;
        }
        RhythmGame::schedule_clicks(output, &outcome);
        let mut taps: Vec<(Voice, Seconds)> = outcome
            .beats
            .iter()
            .map(|beat| (beat.voice, player.tap_time(beat.when)))
            .collect();
        taps.sort_by(|a, b| a.1.total_cmp(&b.1));

        for (voice, when) in taps {
            summary.taps += 1;
            match session.tap(voice, when) {
                TapOutcome::Hit { .. } => summary.hits += 1,
                TapOutcome::Miss { .. } => summary.misses += 1,
                TapOutcome::Failed { .. } => {
                    summary.misses += 1;
                    summary.failed = true;
                    summary.cycles += 1;
                    break 'round;
                }
                TapOutcome::Debounced | TapOutcome::Ignored => {}
            }
        }
        summary.cycles += 1;
        if summary.cycles == max_cycles {
            break;
        }

        // Just past the end of the cycle, so the tick rolls over.
        let now = session.cycle_start() + session.cycle_duration() + 0.001;
        outcome = session.tick(now);
    }
    summary.final_tempo = session.tempo();
    summary.best_streak = session.exit_to_menu();
    debug!("simulated round: {summary:?}");
    summary
}
