// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The boundary between the games and whatever actually makes sound. The
//! games only ever see an [AudioClock] to read the time from and a
//! [SoundOutput] to hand requests to.

use anyhow::Result;
use log::{debug, info};
use std::{
    collections::HashSet,
    fmt::Debug,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Instant,
};
use strum_macros::{Display, EnumIter};
use tresillo_core::{cycle::Voice, time::Seconds, Normal};

/// A monotonically increasing source of audio time.
pub trait AudioClock: Debug + Send + Sync {
    fn current_time(&self) -> Seconds;
}

/// Seconds of wall-clock time since the clock was created.
#[derive(Debug)]
pub struct SystemAudioClock {
    start: Instant,
}
impl Default for SystemAudioClock {
    fn default() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}
impl AudioClock for SystemAudioClock {
    fn current_time(&self) -> Seconds {
        self.start.elapsed().as_secs_f64()
    }
}

/// A clock that moves only when told to. Clones share the same time, so a
/// test can hold one clone while a game reads another.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}
impl ManualClock {
    pub fn new_with(now: Seconds) -> Self {
        let r = Self::default();
        r.set(now);
        r
    }

    pub fn set(&self, now: Seconds) {
        self.bits.store(now.to_bits(), Ordering::SeqCst);
    }

    pub fn advance(&self, delta: Seconds) {
        let _ = self
            .bits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |bits| {
                Some((f64::from_bits(bits) + delta).to_bits())
            });
    }
}
impl AudioClock for ManualClock {
    fn current_time(&self) -> Seconds {
        f64::from_bits(self.bits.load(Ordering::SeqCst))
    }
}

/// A group of samples that is loaded as a unit.
#[derive(Clone, Copy, Debug, Display, EnumIter, PartialEq, Eq, Hash)]
pub enum SampleBank {
    Clicks,
    Piano,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Sound {
    /// A percussive click for one voice. The downbeat of each cycle is
    /// accented.
    Click { voice: Voice, accent: bool },
    /// A pitched note.
    Tone { midi_number: i16 },
}
impl Sound {
    pub fn bank(&self) -> SampleBank {
        match self {
            Sound::Click { .. } => SampleBank::Clicks,
            Sound::Tone { .. } => SampleBank::Piano,
        }
    }
}

/// Asks the output to start `sound` at audio time `when`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoundRequest {
    pub sound: Sound,
    pub when: Seconds,
    pub duration: Seconds,
    pub velocity: Normal,
}

/// Fire-and-forget sound output.
pub trait SoundOutput: Debug + Send + Sync {
    /// Schedules a sound. Failures to play are the output's problem, not the
    /// caller's.
    fn play(&self, request: &SoundRequest);

    /// Loads a bank of samples so that later [SoundOutput::play] calls can
    /// start without delay.
    fn preload(&self, bank: SampleBank) -> Result<()>;
}

/// A [SoundOutput] that writes every request to the log and nothing else.
#[derive(Debug, Default)]
pub struct LoggingOutput {}
impl SoundOutput for LoggingOutput {
    fn play(&self, request: &SoundRequest) {
        match request.sound {
            Sound::Click { voice, accent } => info!(
                "{:>9.3}s click {voice}{}",
                request.when,
                if accent { " (accent)" } else { "" }
            ),
            Sound::Tone { midi_number } => info!(
                "{:>9.3}s tone {midi_number} for {:.3}s",
                request.when, request.duration
            ),
        }
    }

    fn preload(&self, bank: SampleBank) -> Result<()> {
        info!("preloading {bank}");
        Ok(())
    }
}

/// Remembers which sample banks one orchestrator has already loaded.
#[derive(Debug, Default)]
pub struct PreloadCache {
    loaded: HashSet<SampleBank>,
}
impl PreloadCache {
    /// Preloads `bank` unless that has already succeeded. Returns whether a
    /// load actually happened. A failed load is reported and not remembered,
    /// so the next call tries again.
    pub fn ensure_loaded(&mut self, output: &dyn SoundOutput, bank: SampleBank) -> Result<bool> {
        if self.loaded.contains(&bank) {
            return Ok(false);
        }
        debug!("loading sample bank {bank}");
        output.preload(bank)?;
        self.loaded.insert(bank);
        Ok(true)
    }

    pub fn is_loaded(&self, bank: SampleBank) -> bool {
        self.loaded.contains(&bank)
    }

    pub fn clear(&mut self) {
        self.loaded.clear();
    }
}
