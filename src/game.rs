// Copyright (c) 2023 Mike Tsao. All rights reserved.

use crate::{
    audio::{AudioClock, PreloadCache, SampleBank, Sound, SoundOutput, SoundRequest},
    scheduler::RepeatingTask,
    session::{Difficulty, Session, SessionState, TapOutcome, TickOutcome},
};
use anyhow::{anyhow, Result};
use log::{debug, warn};
use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};
use tresillo_core::{cycle::Voice, time::Seconds, Normal};
use tresillo_settings::GameSettings;

/// [RhythmGame] runs a [Session] against a real clock and a real sound
/// output. A background task keeps the session ticking and schedules each
/// cycle's clicks as the cycle begins; taps are judged at the clock's current
/// time.
#[derive(Debug)]
pub struct RhythmGame {
    session: Arc<Mutex<Session>>,
    clock: Arc<dyn AudioClock>,
    output: Arc<dyn SoundOutput>,
    preload_cache: PreloadCache,
    task: Option<RepeatingTask>,
}
impl RhythmGame {
    /// How long each click sounds.
    pub const CLICK_DURATION: Seconds = 0.05;

    pub fn new_with(
        session: Session,
        clock: Arc<dyn AudioClock>,
        output: Arc<dyn SoundOutput>,
    ) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            clock,
            output,
            preload_cache: Default::default(),
            task: None,
        }
    }

    pub fn new_from_settings(
        settings: &GameSettings,
        clock: Arc<dyn AudioClock>,
        output: Arc<dyn SoundOutput>,
    ) -> Result<Self> {
        Ok(Self::new_with(Session::new_with(settings)?, clock, output))
    }

    /// Starts a round, abandoning any round already in progress. Fails
    /// without starting if the click samples can't be loaded.
    pub fn start(&mut self, difficulty: Difficulty) -> Result<()> {
        self.stop()?;
        if let Err(e) = self
            .preload_cache
            .ensure_loaded(self.output.as_ref(), SampleBank::Clicks)
        {
            warn!("couldn't start a {difficulty} round: {e}");
            return Err(e);
        }

        let outcome = self
            .lock_session()?
            .start(difficulty, self.clock.current_time());
        let Some(first_check) = outcome.next_check.and_then(Self::delay) else {
            self.lock_session()?.exit_to_menu();
            return Err(anyhow!(
                "can't schedule the first tick {:?}s away",
                outcome.next_check
            ));
        };
        Self::schedule_clicks(self.output.as_ref(), &outcome);

        let session = Arc::clone(&self.session);
        let clock = Arc::clone(&self.clock);
        let output = Arc::clone(&self.output);
        self.task = Some(RepeatingTask::spawn(first_check, move || {
            let Ok(mut session) = session.lock() else {
                warn!("rhythm session lock was poisoned; no more ticks");
                return None;
            };
            let outcome = session.tick(clock.current_time());
            drop(session);
            Self::schedule_clicks(output.as_ref(), &outcome);
            let delay = outcome.next_check.and_then(Self::delay);
            if delay.is_none() && outcome.next_check.is_some() {
                warn!("can't schedule a tick {:?}s away", outcome.next_check);
            }
            delay
        }));
        Ok(())
    }

    /// Judges a tap at the current time.
    pub fn tap(&self, voice: Voice) -> Result<TapOutcome> {
        let now = self.clock.current_time();
        Ok(self.lock_session()?.tap(voice, now))
    }

    /// Cancels the ticking task and returns the session to the menu. Returns
    /// the best streak of the round that just ended.
    pub fn stop(&mut self) -> Result<usize> {
        // The task locks the session, so it has to be gone before we lock.
        if let Some(mut task) = self.task.take() {
            task.stop();
        }
        Ok(self.lock_session()?.exit_to_menu())
    }

    /// Whether the background task is still ticking the session.
    pub fn is_running(&self) -> bool {
        self.task.as_ref().map_or(false, |t| t.is_running())
    }

    /// Runs `f` against the current session state.
    pub fn with_session<R>(&self, f: impl FnOnce(&Session) -> R) -> Result<R> {
        let session = self.lock_session()?;
        Ok(f(&session))
    }

    pub fn state(&self) -> Result<SessionState> {
        self.with_session(|s| s.state())
    }

    fn lock_session(&self) -> Result<MutexGuard<Session>> {
        self.session
            .lock()
            .map_err(|_| anyhow!("rhythm session lock was poisoned"))
    }

    pub(crate) fn schedule_clicks(output: &dyn SoundOutput, outcome: &TickOutcome) {
        if outcome.new_cycle {
            debug!(
                "cycle at {:.3}s, {} BPM, {} beats",
                outcome.cycle_start,
                outcome.tempo,
                outcome.beats.len()
            );
        }
        for beat in &outcome.beats {
            let accent = beat.index == 0;
            output.play(&SoundRequest {
                sound: Sound::Click {
                    voice: beat.voice,
                    accent,
                },
                when: beat.when,
                duration: Self::CLICK_DURATION,
                velocity: Normal::new(if accent { 1.0 } else { 0.7 }),
            });
        }
    }

    /// None if `seconds` is too far away to wait for.
    fn delay(seconds: Seconds) -> Option<Duration> {
        Duration::try_from_secs_f64(seconds.max(0.0)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{audio::tests::RecordingOutput, audio::ManualClock, session::SessionBuilder};
    use float_cmp::approx_eq;
    use std::time::Instant;
    use tresillo_core::{cycle::Rhythm, rhythm::EuclideanRhythm, time::Tempo};

    fn three_four_game(clock: &ManualClock, output: &Arc<RecordingOutput>) -> RhythmGame {
        let session = SessionBuilder::default()
            .rhythm(Rhythm::new_polyrhythm(3, 4).unwrap())
            .build()
            .unwrap();
        RhythmGame::new_with(session, Arc::new(clock.clone()), output.clone())
    }

    fn wait_for(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        false
    }

    #[test]
    fn start_preloads_and_schedules_first_cycle() {
        let clock = ManualClock::new_with(3.0);
        let output = Arc::new(RecordingOutput::default());
        let mut game = three_four_game(&clock, &output);

        game.start(Difficulty::Practice).unwrap();
        assert_eq!(game.state().unwrap(), SessionState::Playing);
        assert!(game.is_running());
        assert_eq!(*output.preloads.lock().unwrap(), vec![SampleBank::Clicks]);

        let played = output.played();
        assert_eq!(played.len(), 7);
        assert!(approx_eq!(f64, played[0].when, 3.1, ulps = 4));
        let accents = played
            .iter()
            .filter(|r| matches!(r.sound, Sound::Click { accent: true, .. }))
            .count();
        assert_eq!(accents, 2);

        // A second round doesn't preload again.
        game.start(Difficulty::Elimination).unwrap();
        assert_eq!(output.preloads.lock().unwrap().len(), 1);
        game.stop().unwrap();
    }

    #[test]
    fn taps_are_judged_at_clock_time() {
        let clock = ManualClock::new_with(0.0);
        let output = Arc::new(RecordingOutput::default());
        let mut game = three_four_game(&clock, &output);
        game.start(Difficulty::Elimination).unwrap();

        clock.set(0.1 + 0.75);
        assert!(matches!(
            game.tap(Voice::Left).unwrap(),
            TapOutcome::Hit { index: 1, .. }
        ));
        clock.set(0.1 + 1.0);
        assert_eq!(
            game.tap(Voice::Left).unwrap(),
            TapOutcome::Failed { final_streak: 1 }
        );
        assert_eq!(game.state().unwrap(), SessionState::Failed);

        // A failed session asks for no more ticks, so the task winds down.
        clock.set(10.0);
        assert!(wait_for(|| !game.is_running()));
        assert_eq!(game.stop().unwrap(), 1);
        assert_eq!(game.state().unwrap(), SessionState::Menu);
    }

    #[test]
    fn task_schedules_each_new_cycle() {
        let clock = ManualClock::new_with(0.0);
        let output = Arc::new(RecordingOutput::default());
        // One sixteenth at 200 BPM makes a 75ms cycle.
        let session = SessionBuilder::default()
            .rhythm(Rhythm::Euclidean(EuclideanRhythm::new_with(1, 1).unwrap()))
            .starting_tempo(Tempo(200.0))
            .build()
            .unwrap();
        let mut game = RhythmGame::new_with(session, Arc::new(clock.clone()), output.clone());
        game.start(Difficulty::Practice).unwrap();
        assert_eq!(output.played().len(), 1);

        clock.set(1.0);
        assert!(wait_for(|| output.played().len() >= 2));
        let played = output.played();
        assert_eq!(played.len(), 2);
        assert!(approx_eq!(f64, played[1].when, 1.1, ulps = 4));
        assert_eq!(game.with_session(|s| s.cycle_count()).unwrap(), 1);
    }

    #[test]
    fn stop_cancels_pending_ticks() {
        let clock = ManualClock::new_with(0.0);
        let output = Arc::new(RecordingOutput::default());
        let session = SessionBuilder::default()
            .rhythm(Rhythm::Euclidean(EuclideanRhythm::new_with(1, 1).unwrap()))
            .starting_tempo(Tempo(200.0))
            .build()
            .unwrap();
        let mut game = RhythmGame::new_with(session, Arc::new(clock.clone()), output.clone());
        game.start(Difficulty::Practice).unwrap();
        game.stop().unwrap();
        assert!(!game.is_running());

        clock.set(5.0);
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(output.played().len(), 1);
        assert_eq!(game.with_session(|s| s.cycle_count()).unwrap(), 0);
        assert_eq!(game.tap(Voice::Left).unwrap(), TapOutcome::Ignored);
    }

    #[test]
    fn failed_preload_leaves_game_in_menu() {
        let clock = ManualClock::default();
        let output = Arc::new(RecordingOutput::new_failing());
        let mut game = three_four_game(&clock, &output);
        assert!(game.start(Difficulty::Practice).is_err());
        assert!(!game.is_running());
        assert_eq!(game.state().unwrap(), SessionState::Menu);
        assert!(output.played().is_empty());
    }

    #[test]
    fn delays_that_cant_be_waited_for() {
        assert_eq!(RhythmGame::delay(0.25), Some(Duration::from_millis(250)));
        assert_eq!(RhythmGame::delay(-1.0), Some(Duration::ZERO));
        assert_eq!(RhythmGame::delay(f64::NAN), Some(Duration::ZERO));
        assert_eq!(RhythmGame::delay(f64::INFINITY), None);
    }

    #[test]
    fn zero_tempo_settings_are_rejected() {
        let settings = GameSettings::new_from_json(r#"{ "bpm": 0 }"#).unwrap();
        let output = Arc::new(RecordingOutput::default());
        assert!(RhythmGame::new_from_settings(
            &settings,
            Arc::new(ManualClock::default()),
            output.clone()
        )
        .is_err());
        assert!(output.preloads.lock().unwrap().is_empty());
    }
}
