//! # Practice CLI
//!
//! Thin console front end over `practice-core`: a circle-of-fifths key
//! explorer, guitar fretboard view, key/scale generator, and metronome
//! transport, driven by an interactive line loop. All the music logic lives
//! in the core crate; this binary only renders text.

use std::io::{self, BufRead, Write};
use std::thread;

use anyhow::Result;
use practice_core::analysis::{self, Spelling};
use practice_core::metronome::{Metronome, TimeSignature};
use practice_core::randomizer::KeyModeRandomizer;
use practice_core::theory::{
    self, CHORD_COLORS, CIRCLE_OF_FIFTHS_MAJOR, CIRCLE_OF_FIFTHS_MINOR, FRET_COUNT, GUITAR_STRINGS,
    MAJOR_CHORD_FUNCTIONS, MINOR_CHORD_FUNCTIONS, SCALE_FORMULAS,
};
use practice_core::KeySelection;

fn main() -> Result<()> {
    eprintln!("[CLI] Music practice console. Type 'help' for commands.");

    let mut selection = KeySelection::new();
    let mut randomizer = KeyModeRandomizer::new();
    let mut metronome = Metronome::new();

    // Beat printer: runs for the life of the process, drains the tick
    // channel whether or not the clock is armed.
    let ticks: crossbeam_channel::Receiver<practice_core::Tick> = metronome.ticks();
    thread::spawn(move || {
        while let Ok(tick) = ticks.recv() {
            if tick.is_accent {
                println!("[TICK] beat {} *", tick.beat);
            } else {
                println!("[TICK] beat {}", tick.beat);
            }
        }
    });

    let stdin = io::stdin();
    print_prompt();
    for line in stdin.lock().lines() {
        let line = line?;
        let line = line.trim();
        let command = line.split_whitespace().next().unwrap_or("");
        let rest = line[command.len()..].trim();

        match command {
            "" => {}
            "help" => print_help(),
            "key" => select_key(&mut selection, rest),
            "clear" => {
                selection.clear();
                println!("Selection cleared.");
            }
            "circle" => print_circle(&selection),
            "fret" | "fretboard" => print_fretboard(&selection),
            "next" => {
                let (key, mode) = randomizer.next_combination();
                println!(
                    "Key: {}   Scale: {}   ({} combinations left)",
                    key.display(),
                    mode,
                    randomizer.remaining_count()
                );
                print_scale(key.name, mode);
            }
            "scale" => {
                let key = randomizer.current_key();
                println!("Key: {}   Scale: {}", key.display(), randomizer.current_mode());
                print_scale(key.name, randomizer.current_mode());
            }
            "modes" => print_modes(&randomizer),
            "mode" => {
                randomizer.toggle_mode(rest);
                print_modes(&randomizer);
            }
            "allmodes" => {
                randomizer.toggle_all();
                print_modes(&randomizer);
            }
            "start" => {
                metronome.start();
                println!("Metronome running at {} bpm, {}.", metronome.bpm(), metronome.time_signature());
            }
            "stop" => {
                metronome.stop();
                println!("Metronome stopped.");
            }
            "bpm" => match rest.parse::<u32>() {
                Ok(bpm) => {
                    metronome.set_tempo(bpm);
                    println!("Tempo: {} bpm.", metronome.bpm());
                }
                Err(_) => println!("Usage: bpm <30..240>"),
            },
            "sig" => match TimeSignature::parse(rest) {
                Some(signature) => {
                    metronome.set_time_signature(signature);
                    println!("Time signature: {signature}.");
                }
                None => println!("Supported signatures: 1/4 2/4 3/4 4/4"),
            },
            "quit" | "exit" => break,
            other => println!("Unknown command '{other}'. Type 'help'."),
        }
        print_prompt();
    }

    metronome.stop();
    Ok(())
}

fn print_prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

fn print_help() {
    println!("Commands:");
    println!("  key <label>     select a circle key (e.g. key C, key F#/Gb, key Am)");
    println!("  clear           clear the selection");
    println!("  circle          circle of fifths with degree colors");
    println!("  fretboard       guitar fretboard under the selection");
    println!("  next            draw a new key & scale from the generator");
    println!("  scale           show the current key & scale again");
    println!("  modes           list modes; mode <name> toggles; allmodes toggles all");
    println!("  start / stop    metronome transport");
    println!("  bpm <n>         set tempo (30..240)");
    println!("  sig <n/d>       set time signature (1/4 2/4 3/4 4/4)");
    println!("  quit");
}

fn select_key(selection: &mut KeySelection, label: &str) {
    if label.is_empty() {
        println!("Usage: key <label>");
        return;
    }
    selection.select(label);
    let Some(progression) = selection.progression() else {
        println!("No progression for '{label}'. Pick a key off the circle (see 'circle').");
        return;
    };

    println!("Key: {} {}", label, analysis::key_type_display(label));
    if let Some(relationship) = analysis::relationship_for(label) {
        println!(
            "Relative key: {}. Parallel key: {}.",
            relationship.relative, relationship.parallel
        );
    }

    let functions = if analysis::is_minor_key(label) {
        MINOR_CHORD_FUNCTIONS
    } else {
        MAJOR_CHORD_FUNCTIONS
    };
    for (i, degree) in progression.iter().enumerate() {
        println!(
            "  {:>4}  {:<4} {:<12} (degree color {})",
            degree.roman,
            degree.chord,
            functions[i],
            CHORD_COLORS[i]
        );
    }
}

/// A key label or note plus the degree number it is colored as, if any.
/// Degree numbers stand in for the colors a GUI would paint.
fn colored_cell(selection: &KeySelection, label: &str) -> String {
    match selection.color_for(label) {
        Some(color) => {
            let degree = CHORD_COLORS.iter().position(|c| *c == color).unwrap_or(0) + 1;
            format!("{label}:{degree}")
        }
        None => label.to_string(),
    }
}

fn print_circle(selection: &KeySelection) {
    let major: Vec<String> = CIRCLE_OF_FIFTHS_MAJOR
        .iter()
        .map(|label| colored_cell(selection, label))
        .collect();
    let minor: Vec<String> = CIRCLE_OF_FIFTHS_MINOR
        .iter()
        .map(|label| colored_cell(selection, label))
        .collect();
    println!("Major ring: {}", major.join("  "));
    println!("Minor ring: {}", minor.join("  "));
    match selection.selected_key() {
        Some(key) => println!("Selected: {key}"),
        None => println!("Nothing selected; click a key with 'key <label>'."),
    }
}

fn print_fretboard(selection: &KeySelection) {
    print!("    ");
    for fret in 0..FRET_COUNT {
        if fret == 0 {
            print!("{:>5}", "Open");
        } else {
            print!("{fret:>5}");
        }
    }
    println!();

    for (ordinal, string) in GUITAR_STRINGS.iter().enumerate() {
        print!("{string:>3} ");
        for fret in 0..FRET_COUNT {
            let Some(note) = analysis::fret_note(string, fret, ordinal) else {
                continue;
            };
            if !selection.highlights(note) {
                print!("{:>5}", "·");
                continue;
            }
            print!("{:>5}", colored_cell(selection, note));
        }
        println!();
    }
}

fn print_scale(root: &str, mode: &str) {
    let sharp = analysis::scale_notes(root, mode, Spelling::Sharp);
    if sharp.is_empty() {
        println!("  (no notes: unknown mode or root)");
        return;
    }
    if theory::is_accidental(root) {
        println!("  Sharp version: {}", sharp.join(" "));
        let flat = analysis::scale_notes(root, mode, Spelling::Flat);
        if !flat.is_empty() {
            println!("  Flat version:  {}", flat.join(" "));
        }
    } else {
        println!("  Notes: {}", sharp.join(" "));
    }
}

fn print_modes(randomizer: &KeyModeRandomizer) {
    let active = randomizer.active_modes();
    println!("Selected {} of {} scales:", active.len(), SCALE_FORMULAS.len());
    for formula in SCALE_FORMULAS {
        let mark = if active.contains(&formula.name) { "x" } else { " " };
        println!("  [{mark}] {}", formula.name);
    }
    println!("({} combinations left in the pool)", randomizer.remaining_count());
}
