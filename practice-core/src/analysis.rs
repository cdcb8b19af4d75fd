//! # Harmonic Analysis Engine
//!
//! Pure functions over the theory tables: progression lookup, the
//! enharmonic-aware chord/key color matching used to paint the circle of
//! fifths and the fretboard consistently, scale-note derivation with dual
//! sharp/flat spelling, and the fretboard note projection.
//!
//! Nothing here errors: unknown labels, modes, or missing enharmonic
//! partners all come back as a neutral result (`None`, `false`, or an empty
//! sequence). Same inputs always produce the same output.

use crate::theory::{self, CHORD_COLORS, CHROMATIC_NOTES, Progression};

pub use crate::theory::{progression_for, relationship_for};

/// Accidental convention for spelling a derived scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spelling {
    Sharp,
    Flat,
}

/// Strips the quality markers (`m`, `°`) off a chord symbol or key label,
/// leaving the root pitch class.
fn base_note(symbol: &str) -> &str {
    symbol.trim_end_matches(['m', '°'])
}

/// Candidate spellings of a circle label: dual labels like `"F#/Gb"` split
/// into both sides, anything else is a single candidate.
fn candidate_spellings(label: &str) -> impl Iterator<Item = &str> {
    label.split('/').map(str::trim)
}

/// Resolves the degree color a circle node or fretboard note should take
/// under the current selection.
///
/// Scans the progression tonic-first and returns the color of the first
/// degree that matches the candidate label; the first match wins. A degree
/// matches when the full chord symbol equals a candidate spelling literally,
/// or when the roots are enharmonically the same pitch class and the
/// minor/major quality agrees. Diminished degrees waive the quality check
/// and accept any minor-labeled candidate instead (diminished triads sit on
/// the minor ring of the circle).
///
/// # Returns
/// * `Some(color)` - CSS color of the first matching degree
/// * `None` - nothing selected, no progression, or no degree matched
pub fn chord_color(
    candidate_label: &str,
    selected_key: Option<&str>,
    progression: Option<&Progression>,
) -> Option<&'static str> {
    let progression = match (selected_key, progression) {
        (Some(_), Some(progression)) => progression,
        _ => return None,
    };

    let index = progression.iter().position(|degree| {
        let chord_root = base_note(degree.chord);
        let diminished = degree.chord.contains('°');
        let chord_is_minor = degree.chord.ends_with('m');

        candidate_spellings(candidate_label).any(|variant| {
            if degree.chord == variant {
                return true;
            }
            if !theory::are_enharmonic(chord_root, base_note(variant)) {
                return false;
            }
            if diminished {
                variant.ends_with('m')
            } else {
                chord_is_minor == variant.ends_with('m')
            }
        })
    })?;

    Some(CHORD_COLORS[index])
}

/// Whether a fretboard pitch class belongs to the selected key's scale.
///
/// With no selection every note is shown (uncolored), so this returns true
/// unconditionally, the opposite default from [`chord_color`], and it must
/// stay that way: an empty selection blanks the circle colors but never
/// hides fretboard notes.
pub fn note_in_scale(
    note: &str,
    selected_key: Option<&str>,
    progression: Option<&Progression>,
) -> bool {
    let progression = match (selected_key, progression) {
        (Some(_), Some(progression)) => progression,
        _ => return true,
    };

    progression
        .iter()
        .any(|degree| theory::are_enharmonic(base_note(degree.chord), note))
}

/// Derives the notes of a scale from a sharp-spelled root and a mode name.
///
/// The flat spelling reuses the sharp-computed chromatic positions and only
/// relabels each result through the sharp→flat alias table; it never
/// recomputes intervals from a flat root. A flat request for a root with no
/// flat alias yields an empty sequence, as do unknown modes and roots;
/// partial output is never produced.
pub fn scale_notes(root: &str, mode: &str, spelling: Spelling) -> Vec<&'static str> {
    let Some(formula) = theory::formula_for(mode) else {
        return Vec::new();
    };
    let Some(root_index) = theory::chromatic_index(root) else {
        return Vec::new();
    };
    if spelling == Spelling::Flat && theory::flat_alias(root).is_none() {
        return Vec::new();
    }

    formula
        .intervals
        .iter()
        .map(|&interval| {
            let note = CHROMATIC_NOTES[(root_index + interval as usize) % 12];
            match spelling {
                Spelling::Sharp => note,
                Spelling::Flat => theory::flat_alias(note).unwrap_or(note),
            }
        })
        .collect()
}

/// Pitch class at a fret position: `(open string + fret) mod 12`.
///
/// `string_ordinal` is the display row (0 = high E, 5 = low E); it only
/// disambiguates which open-string entry to use for the two E strings.
/// Unknown string names return `None`.
pub fn fret_note(string_note: &str, fret: usize, string_ordinal: usize) -> Option<&'static str> {
    let open = theory::open_string_index(string_note, string_ordinal)?;
    Some(CHROMATIC_NOTES[(open + fret) % 12])
}

/// Minor circle labels carry an `m` suffix; the `°` check keeps diminished
/// chord symbols from reading as keys.
pub fn is_minor_key(label: &str) -> bool {
    label.contains('m') && !label.contains('°')
}

/// `"major"` or `"minor"`, for display next to a key label.
pub fn key_type_display(label: &str) -> &'static str {
    if is_minor_key(label) { "minor" } else { "major" }
}

/// The one mutable pair in the system: the user's selected circle key and
/// the progression derived from it.
///
/// Single-writer: only the click handler path calls [`select`]/[`clear`];
/// everything else reads. The progression is recomputed on every selection
/// change and is `None` exactly when no key is selected.
///
/// [`select`]: KeySelection::select
/// [`clear`]: KeySelection::clear
#[derive(Debug, Default)]
pub struct KeySelection {
    selected: Option<String>,
    progression: Option<&'static Progression>,
}

impl KeySelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects a circle key and derives its progression.
    pub fn select(&mut self, key_label: &str) {
        self.selected = Some(key_label.to_string());
        self.progression = progression_for(key_label);
    }

    /// Clears the selection; the derived progression goes with it.
    pub fn clear(&mut self) {
        self.selected = None;
        self.progression = None;
    }

    pub fn selected_key(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn progression(&self) -> Option<&'static Progression> {
        self.progression
    }

    /// [`chord_color`] under the current selection.
    pub fn color_for(&self, candidate_label: &str) -> Option<&'static str> {
        chord_color(candidate_label, self.selected_key(), self.progression)
    }

    /// [`note_in_scale`] under the current selection.
    pub fn highlights(&self, note: &str) -> bool {
        note_in_scale(note, self.selected_key(), self.progression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(label: &str) -> (Option<&str>, Option<&'static Progression>) {
        (Some(label), progression_for(label))
    }

    #[test]
    fn dominant_of_c_major_takes_the_fifth_degree_color() {
        let (key, progression) = selected("C");
        assert_eq!(chord_color("G", key, progression), Some(CHORD_COLORS[4]));
    }

    #[test]
    fn tonic_matches_first_and_wins() {
        let (key, progression) = selected("C");
        assert_eq!(chord_color("C", key, progression), Some(CHORD_COLORS[0]));
        assert_eq!(chord_color("Am", key, progression), Some(CHORD_COLORS[5]));
    }

    #[test]
    fn no_selection_means_no_color() {
        let progression = progression_for("C");
        assert_eq!(chord_color("G", None, progression), None);
        assert_eq!(chord_color("G", None, None), None);
        for label in theory::CIRCLE_OF_FIFTHS_MAJOR {
            assert_eq!(chord_color(label, None, None), None);
        }
    }

    #[test]
    fn diminished_degree_accepts_minor_candidates_only() {
        let (key, progression) = selected("C");
        // B° colors the minor-ring Bm node, not the major-ring B node.
        assert_eq!(chord_color("Bm", key, progression), Some(CHORD_COLORS[6]));
        assert_eq!(chord_color("B", key, progression), None);
    }

    #[test]
    fn dual_spelling_candidates_match_either_side() {
        let (key, progression) = selected("C#/Db");
        // Db major: Db Ebm Fm Gb Ab Bbm C°.
        assert_eq!(chord_color("F#/Gb", key, progression), Some(CHORD_COLORS[3]));
        assert_eq!(chord_color("A#m/Bbm", key, progression), Some(CHORD_COLORS[5]));
        assert_eq!(chord_color("D#m/Ebm", key, progression), Some(CHORD_COLORS[1]));
    }

    #[test]
    fn enharmonic_roots_match_across_spellings() {
        let (key, progression) = selected("B");
        // B major's ii is C#m; the circle spells that node C#m already, but
        // a flat-side Dbm spelling must land on the same degree.
        assert_eq!(chord_color("C#m", key, progression), Some(CHORD_COLORS[1]));
        assert_eq!(chord_color("Dbm", key, progression), Some(CHORD_COLORS[1]));
        // Quality must agree on non-diminished degrees.
        assert_eq!(chord_color("Db", key, progression), None);
    }

    #[test]
    fn unselected_fretboard_shows_everything() {
        for note in CHROMATIC_NOTES {
            assert!(note_in_scale(note, None, None));
        }
    }

    #[test]
    fn scale_membership_is_enharmonic_aware() {
        let (key, progression) = selected("C");
        assert!(note_in_scale("F", key, progression));
        assert!(!note_in_scale("F#", key, progression));

        // F# major's vii° root is spelled E#; the fretboard spells it F.
        let (key, progression) = selected("F#/Gb");
        assert!(note_in_scale("F", key, progression));
        assert!(!note_in_scale("D", key, progression));
    }

    #[test]
    fn c_sharp_major_sharp_and_flat_spellings() {
        let sharp = scale_notes("C#", "Major (Ionian)", Spelling::Sharp);
        assert_eq!(sharp, ["C#", "D#", "F", "F#", "G#", "A#", "C"]);

        // Flat output relabels the very same chromatic positions; the 7th
        // degree lands on natural C, which has no flat alias and stays C.
        let flat = scale_notes("C#", "Major (Ionian)", Spelling::Flat);
        assert_eq!(flat, ["Db", "Eb", "F", "Gb", "Ab", "Bb", "C"]);

        for (s, f) in sharp.iter().zip(&flat) {
            assert!(theory::are_enharmonic(s, f), "{s} vs {f}");
        }
    }

    #[test]
    fn natural_roots_have_no_flat_rendering() {
        assert!(scale_notes("C", "Major (Ionian)", Spelling::Flat).is_empty());
        assert_eq!(
            scale_notes("C", "Major (Ionian)", Spelling::Sharp),
            ["C", "D", "E", "F", "G", "A", "B"]
        );
    }

    #[test]
    fn unknown_mode_or_root_yields_empty() {
        assert!(scale_notes("C", "Gypsy Jazz", Spelling::Sharp).is_empty());
        assert!(scale_notes("H", "Major (Ionian)", Spelling::Sharp).is_empty());
    }

    #[test]
    fn pentatonic_modes_derive_five_notes() {
        assert_eq!(
            scale_notes("A", "Minor Pentatonic", Spelling::Sharp),
            ["A", "C", "D", "E", "G"]
        );
    }

    #[test]
    fn fret_twelve_is_the_octave() {
        for (ordinal, string) in theory::GUITAR_STRINGS.iter().enumerate() {
            assert_eq!(
                fret_note(string, 0, ordinal),
                fret_note(string, 12, ordinal),
                "string {string} (ordinal {ordinal})"
            );
        }
        assert_eq!(fret_note("E", 0, 0), Some("E"));
        assert_eq!(fret_note("E", 0, 5), Some("E"));
        assert_eq!(fret_note("A", 1, 4), Some("A#"));
        assert_eq!(fret_note("X", 3, 2), None);
    }

    #[test]
    fn key_type_reads_off_the_label() {
        assert!(is_minor_key("F#m"));
        assert!(!is_minor_key("F#"));
        assert!(!is_minor_key("B°"));
        assert_eq!(key_type_display("Am"), "minor");
        assert_eq!(key_type_display("C"), "major");
    }

    #[test]
    fn selection_derives_and_clears_the_progression() {
        let mut selection = KeySelection::new();
        assert_eq!(selection.selected_key(), None);
        assert!(selection.highlights("F#"));

        selection.select("C");
        assert_eq!(selection.selected_key(), Some("C"));
        assert!(selection.progression().is_some());
        assert_eq!(selection.color_for("G"), Some(CHORD_COLORS[4]));
        assert!(!selection.highlights("F#"));

        selection.clear();
        assert_eq!(selection.selected_key(), None);
        assert_eq!(selection.color_for("G"), None);
    }

    #[test]
    fn unknown_selection_keeps_the_engine_quiet() {
        let mut selection = KeySelection::new();
        selection.select("Z#");
        assert_eq!(selection.progression(), None);
        assert_eq!(selection.color_for("C"), None);
        // No progression means the fretboard shows everything again.
        assert!(selection.highlights("C"));
    }
}
