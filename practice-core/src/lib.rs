// practice-core/src/lib.rs

//! The core logic for the music-practice tool.
//! This crate holds the music theory tables, the harmonic analysis engine,
//! the key/mode randomizer, and the metronome clock. It is completely
//! headless and contains no UI code.

pub mod analysis;
pub mod click;
pub mod metronome;
pub mod randomizer;
pub mod theory;

pub use analysis::{KeySelection, Spelling};
pub use metronome::{Metronome, Tick, TimeSignature};
pub use randomizer::KeyModeRandomizer;
