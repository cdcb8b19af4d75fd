//! End-to-end checks of the selected-key data flow: a circle click derives
//! a progression, the progression colors both circle rings, and the same
//! analysis drives the fretboard projection.

use std::collections::BTreeSet;

use practice_core::analysis::{self, Spelling};
use practice_core::randomizer::KeyModeRandomizer;
use practice_core::theory::{
    CHORD_COLORS, CHROMATIC_NOTES, CIRCLE_OF_FIFTHS_MAJOR, CIRCLE_OF_FIFTHS_MINOR, FRET_COUNT,
    GUITAR_STRINGS,
};
use practice_core::KeySelection;

fn all_circle_labels() -> impl Iterator<Item = &'static str> {
    CIRCLE_OF_FIFTHS_MAJOR.into_iter().chain(CIRCLE_OF_FIFTHS_MINOR)
}

#[test]
fn every_selection_colors_exactly_seven_circle_nodes() {
    for selected in all_circle_labels() {
        let mut selection = KeySelection::new();
        selection.select(selected);
        assert!(selection.progression().is_some(), "{selected}");

        let colored: Vec<&str> = all_circle_labels()
            .filter(|label| selection.color_for(label).is_some())
            .collect();
        assert_eq!(colored.len(), 7, "{selected} colored {colored:?}");

        // The selected node itself always takes the tonic color.
        assert_eq!(
            selection.color_for(selected),
            Some(CHORD_COLORS[0]),
            "{selected}"
        );
    }
}

#[test]
fn fretboard_highlights_exactly_the_scale_pitch_classes() {
    for selected in all_circle_labels() {
        let mut selection = KeySelection::new();
        selection.select(selected);

        let highlighted: BTreeSet<&str> = CHROMATIC_NOTES
            .into_iter()
            .filter(|note| selection.highlights(note))
            .collect();
        assert_eq!(highlighted.len(), 7, "{selected} highlighted {highlighted:?}");

        // Every fret position resolves, and its visibility agrees with the
        // pitch-class set above.
        for (ordinal, string) in GUITAR_STRINGS.iter().enumerate() {
            for fret in 0..FRET_COUNT {
                let note = analysis::fret_note(string, fret, ordinal)
                    .expect("known string resolves");
                assert_eq!(
                    selection.highlights(note),
                    highlighted.contains(note),
                    "{selected} string {string} fret {fret}"
                );
            }
        }
    }
}

#[test]
fn circle_and_fretboard_agree_on_degree_colors() {
    let mut selection = KeySelection::new();
    selection.select("C");

    // C major: the G on any string colors as the dominant, F# stays dark.
    let g = analysis::fret_note("E", 3, 0).unwrap();
    assert_eq!(g, "G");
    assert_eq!(selection.color_for(g), Some(CHORD_COLORS[4]));
    assert_eq!(selection.color_for("F#"), None);
    assert!(!selection.highlights("F#"));
}

#[test]
fn clearing_returns_both_views_to_the_neutral_state() {
    let mut selection = KeySelection::new();
    selection.select("Em");
    assert!(selection.color_for("G").is_some());

    selection.clear();
    for label in all_circle_labels() {
        assert_eq!(selection.color_for(label), None);
    }
    for note in CHROMATIC_NOTES {
        assert!(selection.highlights(note), "fretboard shows all of {note}");
    }
}

#[test]
fn generator_draws_always_yield_a_playable_scale() {
    let mut randomizer = KeyModeRandomizer::with_seed(42);
    randomizer.toggle_all(); // all 14 modes
    let total = randomizer.remaining_count();
    assert_eq!(total, 12 * 14);

    for _ in 0..total {
        let (key, mode) = randomizer.next_combination();
        let sharp = analysis::scale_notes(key.name, mode, Spelling::Sharp);
        assert!(!sharp.is_empty(), "{} {mode}", key.name);

        let flat = analysis::scale_notes(key.name, mode, Spelling::Flat);
        if key.enharmonic.is_some() {
            assert_eq!(flat.len(), sharp.len(), "{} {mode}", key.name);
        } else {
            assert!(flat.is_empty(), "{} {mode}", key.name);
        }
    }
}
