// Copyright (c) 2023 Mike Tsao. All rights reserved.

// Shared with build.rs, which renders the man page from it. Keep it free of
// anything but clap and std.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Game settings file (JSON). Defaults to the user's settings file, if
    /// there is one.
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the Euclidean rhythm E(hits, steps)
    Euclid {
        hits: usize,
        steps: usize,

        /// Treat more hits than steps as all hits instead of an error
        #[arg(long)]
        saturate: bool,
    },

    /// Name the chord that the given notes make, e.g. C4 E4 G4
    Chord {
        #[arg(required = true)]
        notes: Vec<String>,
    },

    /// Name the interval between two notes
    Interval { from: String, to: String },

    /// Print the cycle length and beat times of a rhythm
    Cycle {
        #[arg(long, default_value_t = 80.0)]
        bpm: f64,

        #[arg(long, default_value_t = 3)]
        left: usize,

        #[arg(long, default_value_t = 4)]
        right: usize,

        /// Use the Euclidean rhythm E(hits, steps) instead of a polyrhythm
        #[arg(long, num_args = 2, value_names = ["HITS", "STEPS"])]
        euclid: Option<Vec<usize>>,
    },

    /// Score an ADSR envelope against a target
    Score {
        /// The player's envelope as attack,decay,sustain,release
        #[arg(long, value_delimiter = ',', required = true)]
        user: Vec<f64>,

        /// The target envelope as attack,decay,sustain,release
        #[arg(long, value_delimiter = ',', required = true)]
        target: Vec<f64>,

        /// Parameters to judge (attack, decay, sustain, release). All four if
        /// omitted.
        #[arg(long, value_delimiter = ',')]
        parameters: Vec<String>,
    },

    /// Play a rhythm round with a simulated player, logging each click
    Play {
        #[arg(long, default_value = "practice", value_parser = ["practice", "elimination"])]
        difficulty: String,

        /// Stop after this many cycles
        #[arg(long, default_value_t = 16)]
        cycles: usize,

        /// The simulated player's largest timing error, in seconds
        #[arg(long, default_value_t = 0.05)]
        sloppiness: f64,

        /// Seed for the simulated player's timing
        #[arg(long)]
        seed: Option<u64>,

        /// Record the round's best streak in the progress file
        #[arg(long)]
        save: bool,
    },

    /// Print ear-training questions with their answers
    Quiz {
        #[arg(long, default_value = "interval", value_parser = ["interval", "chord"])]
        kind: String,

        #[arg(long, default_value_t = 5)]
        count: usize,

        #[arg(long)]
        seed: Option<u64>,
    },
}
