// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The `tresillo` crate runs the rhythm and ear-training games on top of the
//! algorithms in `tresillo-core`: it owns the clock, the sound output, the
//! background ticking, and the player's saved progress.

pub use crate::game::RhythmGame;
pub use crate::progress::{Progress, ProgressStore};
pub use crate::session::{Difficulty, Session, SessionBuilder, SessionState, TapOutcome};

pub mod audio;
pub mod game;
pub mod progress;
pub mod quiz;
pub mod scheduler;
pub mod session;
pub mod simulation;
