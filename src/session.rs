// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! One round of a rhythm game, from the moment the player starts it until
//! they quit or fail. Everything here is driven by clock readings passed in
//! from outside, so the same readings always produce the same round.

use anyhow::Result;
use derive_builder::Builder;
use log::{debug, info};
use std::collections::HashSet;
use strum_macros::{Display, EnumIter, EnumString};
use tresillo_core::{
    cycle::{HitDetector, Judgment, Rhythm, ScheduledBeat, Voice},
    time::{Seconds, Tempo},
};
use tresillo_settings::{DifficultySettings, GameSettings};

/// How unforgiving a round is.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    EnumIter,
    EnumString,
    PartialEq,
    Eq,
    Hash,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Difficulty {
    /// Misses cost the streak, nothing more.
    #[default]
    Practice,
    /// The first miss ends the round, and the tempo keeps rising.
    Elimination,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Menu,
    Playing,
    /// An elimination round ended on a miss.
    Failed,
}

/// What a call to [Session::start] or [Session::tick] decided.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickOutcome {
    /// A new cycle began, and `beats` holds its beats.
    pub new_cycle: bool,
    pub cycle_start: Seconds,
    /// The tempo of the current cycle.
    pub tempo: Tempo,
    /// Beats to schedule, earliest first.
    pub beats: Vec<ScheduledBeat>,
    /// How long to wait before ticking again, or None if the session isn't
    /// playing and needs no more ticks.
    pub next_check: Option<Seconds>,
}

/// What became of a tap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TapOutcome {
    Hit {
        index: usize,
        error: Seconds,
        streak: usize,
    },
    /// A practice miss. The streak is gone, but play continues.
    Miss { lost_streak: usize },
    /// An elimination miss. The round is over.
    Failed { final_streak: usize },
    /// A miss too soon after the previous one to count separately.
    Debounced,
    /// The session isn't playing, or the rhythm has no such voice.
    Ignored,
}

/// [Session] is the state machine behind a rhythm round: `Menu` to `Playing`,
/// then back to `Menu` when the player quits, or to `Failed` when an
/// elimination round ends.
#[derive(Debug, Builder)]
#[builder(build_fn(private, name = "build_from_builder"))]
pub struct Session {
    rhythm: Rhythm,

    #[builder(default)]
    starting_tempo: Tempo,

    #[builder(default)]
    settings: DifficultySettings,

    #[builder(setter(skip))]
    state: SessionState,
    #[builder(setter(skip))]
    difficulty: Difficulty,
    #[builder(setter(skip))]
    tempo: Tempo,
    #[builder(setter(skip))]
    cycle_start: Seconds,
    #[builder(setter(skip))]
    cycle_count: usize,
    #[builder(setter(skip))]
    streak: usize,
    #[builder(setter(skip))]
    best_streak: usize,
    #[builder(setter(skip))]
    last_miss: Option<Seconds>,

    // Beats hit during the current cycle, for display.
    #[builder(setter(skip))]
    recent_hits: HashSet<(Voice, usize)>,
}
impl SessionBuilder {
    /// Builds the [Session].
    pub fn build(&self) -> Result<Session, SessionBuilderError> {
        let mut s = self.build_from_builder()?;
        let bpm = s.starting_tempo.0;
        if !bpm.is_finite() || bpm <= 0.0 {
            return Err(SessionBuilderError::ValidationError(format!(
                "tempo must be a positive number of BPM, not {bpm}"
            )));
        }
        s.tempo = s.starting_tempo;
        Ok(s)
    }
}
impl Session {
    pub fn new_with(settings: &GameSettings) -> Result<Self> {
        Ok(SessionBuilder::default()
            .rhythm(settings.rhythm.into_rhythm()?)
            .starting_tempo(settings.starting_tempo)
            .settings(settings.difficulty)
            .build()?)
    }

    /// Begins a round. The first cycle starts a little after `now` so that its
    /// downbeat can be scheduled in time.
    pub fn start(&mut self, difficulty: Difficulty, now: Seconds) -> TickOutcome {
        self.reset_cycle_state();
        self.best_streak = 0;
        self.state = SessionState::Playing;
        self.difficulty = difficulty;
        self.cycle_start = now + self.settings.cycle_lookahead;
        info!(
            "starting {difficulty} round of {} at {} BPM",
            self.rhythm, self.tempo
        );
        self.outcome(true, now)
    }

    /// Rolls over to a new cycle if the current one has ended, ramping the
    /// tempo when it's time to.
    pub fn tick(&mut self, now: Seconds) -> TickOutcome {
        if self.state != SessionState::Playing {
            return TickOutcome::default();
        }
        let new_cycle = now > self.cycle_start + self.cycle_duration();
        if new_cycle {
            self.cycle_start = now + self.settings.cycle_lookahead;
            self.cycle_count += 1;
            self.recent_hits.clear();
            self.apply_ramp();
        }
        self.outcome(new_cycle, now)
    }

    /// Judges a tap on `voice` at audio time `now`.
    pub fn tap(&mut self, voice: Voice, now: Seconds) -> TapOutcome {
        if self.state != SessionState::Playing || !self.rhythm.voices().contains(&voice) {
            return TapOutcome::Ignored;
        }
        let detector =
            HitDetector::new_with(&self.rhythm, voice, self.tempo, self.settings.tolerance_ratio);
        match detector.judge(now - self.cycle_start) {
            Judgment::Hit { index, error } => {
                self.streak += 1;
                self.best_streak = self.best_streak.max(self.streak);
                self.recent_hits.insert((voice, index));
                debug!("{voice} hit beat {index} off by {error:.3}s");
                TapOutcome::Hit {
                    index,
                    error,
                    streak: self.streak,
                }
            }
            Judgment::Miss { error } => {
                debug!("{voice} missed by {error:?}");
                self.register_miss(now)
            }
        }
    }

    /// Leaves the round. Returns the best streak the round reached.
    pub fn exit_to_menu(&mut self) -> usize {
        self.reset_cycle_state();
        self.state = SessionState::Menu;
        std::mem::take(&mut self.best_streak)
    }

    fn register_miss(&mut self, now: Seconds) -> TapOutcome {
        if let Some(last_miss) = self.last_miss {
            if now - last_miss < self.settings.miss_debounce {
                return TapOutcome::Debounced;
            }
        }
        self.last_miss = Some(now);
        let lost_streak = std::mem::take(&mut self.streak);
        match self.difficulty {
            Difficulty::Practice => TapOutcome::Miss { lost_streak },
            Difficulty::Elimination => {
                info!("round over with a streak of {lost_streak}");
                self.state = SessionState::Failed;
                TapOutcome::Failed {
                    final_streak: lost_streak,
                }
            }
        }
    }

    fn apply_ramp(&mut self) {
        let every = self.settings.ramp_every_cycles;
        if self.difficulty == Difficulty::Elimination
            && every > 0
            && self.cycle_count % every == 0
        {
            self.tempo = self
                .tempo
                .ramped(self.settings.ramp_increment_bpm, self.settings.max_bpm);
            info!("tempo now {} BPM", self.tempo);
        }
    }

    fn reset_cycle_state(&mut self) {
        self.tempo = self.starting_tempo;
        self.cycle_start = 0.0;
        self.cycle_count = 0;
        self.streak = 0;
        self.last_miss = None;
        self.recent_hits.clear();
    }

    fn outcome(&self, new_cycle: bool, now: Seconds) -> TickOutcome {
        let beats = if new_cycle {
            let mut beats: Vec<ScheduledBeat> = self
                .rhythm
                .voices()
                .iter()
                .flat_map(|voice| self.rhythm.beat_times(*voice, self.cycle_start, self.tempo))
                .collect();
            beats.sort_by(|a, b| a.when.total_cmp(&b.when));
            beats
        } else {
            Vec::default()
        };
        let remaining = self.cycle_start + self.cycle_duration() - now;
        TickOutcome {
            new_cycle,
            cycle_start: self.cycle_start,
            tempo: self.tempo,
            beats,
            next_check: Some(remaining.max(self.settings.min_check_delay)),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn rhythm(&self) -> &Rhythm {
        &self.rhythm
    }

    pub fn tempo(&self) -> Tempo {
        self.tempo
    }

    pub fn cycle_duration(&self) -> Seconds {
        self.rhythm.cycle_duration(self.tempo)
    }

    pub fn cycle_start(&self) -> Seconds {
        self.cycle_start
    }

    pub fn cycle_count(&self) -> usize {
        self.cycle_count
    }

    pub fn streak(&self) -> usize {
        self.streak
    }

    pub fn best_streak(&self) -> usize {
        self.best_streak
    }

    pub fn was_recently_hit(&self, voice: Voice, index: usize) -> bool {
        self.recent_hits.contains(&(voice, index))
    }

    /// Names this session's kind of round, for keeping best streaks apart.
    pub fn progress_key(&self) -> String {
        format!("{}-{}", self.difficulty, self.rhythm)
    }
}
