// Copyright (c) 2023 Mike Tsao. All rights reserved.

use anyhow::Result;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};
use tresillo_utils::{PathType, Paths};

/// What the player has achieved so far.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Progress {
    /// Best streak per kind of round, keyed by [crate::Session::progress_key].
    pub best_streaks: BTreeMap<String, usize>,

    /// How many envelope levels are open to play. The first is always open.
    pub unlocked_envelope_levels: usize,
}
impl Progress {
    /// Records a finished round's streak. Returns true if it's a new best.
    pub fn record_streak(&mut self, key: &str, streak: usize) -> bool {
        let best = self.best_streaks.entry(key.to_string()).or_default();
        if streak > *best {
            *best = streak;
            true
        } else {
            false
        }
    }

    pub fn best_streak(&self, key: &str) -> usize {
        self.best_streaks.get(key).copied().unwrap_or_default()
    }

    /// Opens the level after `level` (zero-based), if it isn't open already.
    pub fn unlock_after(&mut self, level: usize) {
        self.unlocked_envelope_levels = self.unlocked_envelope_levels.max(level + 2);
    }

    pub fn is_envelope_level_unlocked(&self, level: usize) -> bool {
        level == 0 || level < self.unlocked_envelope_levels
    }
}

/// Reads and writes [Progress] as one JSON document.
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
}
impl Default for ProgressStore {
    fn default() -> Self {
        Self::new_with(&Paths::progress(PathType::User))
    }
}
impl ProgressStore {
    pub fn new_with(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A file that isn't there yet means no progress.
    pub fn load(&self) -> Result<Progress> {
        if !self.path.exists() {
            debug!("no progress at {}; starting fresh", self.path.display());
            return Ok(Progress::default());
        }
        let json = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn save(&self, progress: &Progress) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(progress)?)?;
        info!("saved progress to {}", self.path.display());
        Ok(())
    }
}
