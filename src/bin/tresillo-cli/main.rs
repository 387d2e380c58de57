// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The CLI (command-line interface) tool exercises the rhythm and
//! ear-training engines without a GUI.

mod args;

use anyhow::{anyhow, Result};
use args::{Args, Command};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use strum::IntoEnumIterator;
use tresillo::{
    audio::{LoggingOutput, PreloadCache, SampleBank, SoundOutput},
    quiz::{ChordQuiz, IntervalQuiz, Rng},
    simulation::{simulate_round, SimulatedPlayer},
    Difficulty, ProgressStore, Session,
};
use tresillo_core::{
    cycle::Rhythm,
    envelope::{similarity_score, Adsr, AdsrParameter},
    harmony::{detect_chord, ChordQuality, Interval, Note},
    rhythm::EuclideanRhythm,
    time::Tempo,
};
use tresillo_settings::GameSettings;
use tresillo_utils::Paths;

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Command::Euclid {
            hits,
            steps,
            saturate,
        } => {
            let rhythm = if saturate {
                EuclideanRhythm::new_saturating(hits, steps)?
            } else {
                EuclideanRhythm::new_with(hits, steps)?
            };
            println!("E({hits},{steps}) {rhythm}");
            println!("hits on steps {:?}", rhythm.hit_indices());
        }
        Command::Chord { notes } => match detect_chord(notes.as_slice())? {
            Some(label) => println!("{label}"),
            None => println!("no known chord"),
        },
        Command::Interval { from, to } => {
            let interval = Interval::between(&from.parse::<Note>()?, &to.parse::<Note>()?);
            println!("{interval} ({} semitones)", interval.semitones());
        }
        Command::Cycle {
            bpm,
            left,
            right,
            euclid,
        } => print_cycle(Tempo(bpm), left, right, euclid)?,
        Command::Score {
            user,
            target,
            parameters,
        } => print_score(&args.settings, &user, &target, &parameters)?,
        Command::Play {
            difficulty,
            cycles,
            sloppiness,
            seed,
            save,
        } => play(&args.settings, &difficulty, cycles, sloppiness, seed, save)?,
        Command::Quiz { kind, count, seed } => quiz(&args.settings, &kind, count, seed)?,
    }
    Ok(())
}

fn load_settings(path: &Option<PathBuf>) -> Result<GameSettings> {
    match path {
        Some(path) => GameSettings::new_from_json_file(path),
        None => {
            let path = Paths::settings();
            if path.exists() {
                info!("using settings from {}", path.display());
                GameSettings::new_from_json_file(&path)
            } else {
                Ok(GameSettings::default())
            }
        }
    }
}

fn rng_from(seed: Option<u64>) -> Rng {
    seed.map_or_else(Rng::default, |seed| Rng::new_with_seed(seed as u128))
}

fn print_cycle(tempo: Tempo, left: usize, right: usize, euclid: Option<Vec<usize>>) -> Result<()> {
    let rhythm = match euclid.as_deref() {
        Some([hits, steps]) => Rhythm::Euclidean(EuclideanRhythm::new_with(*hits, *steps)?),
        Some(_) => return Err(anyhow!("--euclid takes HITS and STEPS")),
        None => Rhythm::new_polyrhythm(left, right)?,
    };
    println!(
        "{rhythm} at {tempo} BPM: one cycle is {:.4}s",
        rhythm.cycle_duration(tempo)
    );
    for voice in rhythm.voices() {
        let beats: Vec<String> = rhythm
            .beat_positions(*voice, tempo)
            .iter()
            .map(|(_, offset)| format!("{offset:.4}"))
            .collect();
        println!("{voice:>6}: {}", beats.join(" "));
    }
    Ok(())
}

fn adsr_from(values: &[f64]) -> Result<Adsr> {
    match values {
        [attack, decay, sustain, release] => {
            Ok(Adsr::new_with(*attack, *decay, (*sustain).into(), *release))
        }
        _ => Err(anyhow!(
            "an envelope is four numbers: attack,decay,sustain,release"
        )),
    }
}

fn print_score(
    settings: &Option<PathBuf>,
    user: &[f64],
    target: &[f64],
    parameters: &[String],
) -> Result<()> {
    let user = adsr_from(user)?;
    let target = adsr_from(target)?;
    let parameters = if parameters.is_empty() {
        AdsrParameter::iter().collect()
    } else {
        parameters
            .iter()
            .map(|p| {
                p.parse::<AdsrParameter>()
                    .map_err(|_| anyhow!("unknown envelope parameter '{p}'"))
            })
            .collect::<Result<Vec<_>>>()?
    };
    println!("score {}", similarity_score(&user, &target, &parameters));

    let settings = load_settings(settings)?;
    for (i, level) in settings.envelope_levels.iter().enumerate() {
        println!(
            "level {}: {:>3} of {:>3} needed, {}",
            i + 1,
            level.score(&user, &target),
            level.threshold,
            if level.passes(&user, &target) {
                "pass"
            } else {
                "fail"
            }
        );
    }
    Ok(())
}

fn play(
    settings: &Option<PathBuf>,
    difficulty: &str,
    cycles: usize,
    sloppiness: f64,
    seed: Option<u64>,
    save: bool,
) -> Result<()> {
    let difficulty: Difficulty = difficulty.parse()?;
    let settings = load_settings(settings)?;
    let mut session = Session::new_with(&settings)?;
    let output = LoggingOutput::default();
    PreloadCache::default().ensure_loaded(&output, SampleBank::Clicks)?;

    let mut player = SimulatedPlayer::new_with(sloppiness, rng_from(seed));
    let summary = simulate_round(&mut session, difficulty, &mut player, cycles, &output);
    println!(
        "{} cycles, {} of {} taps hit, best streak {}, final tempo {} BPM{}",
        summary.cycles,
        summary.hits,
        summary.taps,
        summary.best_streak,
        summary.final_tempo,
        if summary.failed { " (eliminated)" } else { "" }
    );

    if save {
        let store = ProgressStore::default();
        let mut progress = store.load()?;
        if progress.record_streak(&session.progress_key(), summary.best_streak) {
            println!("new best streak for {}", session.progress_key());
        }
        store.save(&progress)?;
    }
    Ok(())
}

fn quiz(settings: &Option<PathBuf>, kind: &str, count: usize, seed: Option<u64>) -> Result<()> {
    let settings = load_settings(settings)?;
    let output = LoggingOutput::default();
    PreloadCache::default().ensure_loaded(&output, SampleBank::Piano)?;

    let mut when = 0.0;
    if kind == "chord" {
        let mut quiz = ChordQuiz::new_with(
            ChordQuality::iter().collect(),
            settings.quiz_history,
            rng_from(seed),
        )?;
        for _ in 0..count {
            let question = quiz.next_question();
            for sound in question.sounds(when) {
                output.play(&sound);
            }
            let notes: Vec<String> = question.notes.iter().map(|n| n.to_string()).collect();
            println!("{}: {}", notes.join(" "), question.answer);
            when += 2.0;
        }
    } else {
        let mut quiz = IntervalQuiz::new_with_all(settings.quiz_history, rng_from(seed))?;
        for _ in 0..count {
            let question = quiz.next_question();
            for sound in question.sounds(when) {
                output.play(&sound);
            }
            println!("{} {}: {}", question.lower, question.upper, question.answer);
            when += 2.0;
        }
    }
    Ok(())
}
