//! # Music Theory Tables
//!
//! Fixed catalogs used by every engine in the crate: the 12 chromatic pitch
//! classes, enharmonic aliases, scale formulas for 14 modes, the circle of
//! fifths key rings, diatonic chord progressions for all 24 keys, per-degree
//! colors and function names, key relationships, and the guitar tuning.
//!
//! All of this is immutable static data, computed once at startup. Lookups
//! by label return `Option`; a miss is a displayable state, never an error.

use once_cell::sync::Lazy;
use std::collections::BTreeMap;

/// The 12 chromatic pitch classes in sharp spelling, starting at C.
///
/// Index into this array is the canonical chromatic index used by the scale
/// and fretboard arithmetic.
pub const CHROMATIC_NOTES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A key the generator can land on: a pitch class plus an optional flat
/// alias for the accidental classes (C#/Db, D#/Eb, F#/Gb, G#/Ab, A#/Bb).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key {
    /// Sharp-side name, one of [`CHROMATIC_NOTES`].
    pub name: &'static str,
    /// Flat alias when the key is accidental, `None` for naturals.
    pub enharmonic: Option<&'static str>,
}

impl Key {
    /// Display label: `"F#/Gb"` for dual-spelling keys, the plain name
    /// otherwise.
    pub fn display(&self) -> String {
        match self.enharmonic {
            Some(flat) => format!("{}/{}", self.name, flat),
            None => self.name.to_string(),
        }
    }
}

/// The 12 keys offered by the key/scale generator.
pub const KEYS: [Key; 12] = [
    Key { name: "C", enharmonic: None },
    Key { name: "C#", enharmonic: Some("Db") },
    Key { name: "D", enharmonic: None },
    Key { name: "D#", enharmonic: Some("Eb") },
    Key { name: "E", enharmonic: None },
    Key { name: "F", enharmonic: None },
    Key { name: "F#", enharmonic: Some("Gb") },
    Key { name: "G", enharmonic: None },
    Key { name: "G#", enharmonic: Some("Ab") },
    Key { name: "A", enharmonic: None },
    Key { name: "A#", enharmonic: Some("Bb") },
    Key { name: "B", enharmonic: None },
];

/// A named mode and its interval pattern as semitone offsets from the root.
///
/// Offsets are strictly increasing, start at 0 and stay below 12; modes
/// carry between 5 and 7 of them.
#[derive(Debug, Clone, Copy)]
pub struct ScaleFormula {
    pub name: &'static str,
    pub intervals: &'static [u8],
}

/// All 14 supported modes, in canonical order. The first
/// [`DEFAULT_MODE_COUNT`] entries form the generator's default selection.
pub const SCALE_FORMULAS: [ScaleFormula; 14] = [
    ScaleFormula { name: "Major (Ionian)", intervals: &[0, 2, 4, 5, 7, 9, 11] },
    ScaleFormula { name: "Natural Minor (Aeolian)", intervals: &[0, 2, 3, 5, 7, 8, 10] },
    ScaleFormula { name: "Dorian", intervals: &[0, 2, 3, 5, 7, 9, 10] },
    ScaleFormula { name: "Phrygian", intervals: &[0, 1, 3, 5, 7, 8, 10] },
    ScaleFormula { name: "Lydian", intervals: &[0, 2, 4, 6, 7, 9, 11] },
    ScaleFormula { name: "Mixolydian", intervals: &[0, 2, 4, 5, 7, 9, 10] },
    ScaleFormula { name: "Locrian", intervals: &[0, 1, 3, 5, 6, 8, 10] },
    ScaleFormula { name: "Harmonic Minor", intervals: &[0, 2, 3, 5, 7, 8, 11] },
    ScaleFormula { name: "Melodic Minor", intervals: &[0, 2, 3, 5, 7, 9, 11] },
    ScaleFormula { name: "Major Pentatonic", intervals: &[0, 2, 4, 7, 9] },
    ScaleFormula { name: "Minor Pentatonic", intervals: &[0, 3, 5, 7, 10] },
    ScaleFormula { name: "Blues", intervals: &[0, 3, 5, 6, 7, 10] },
    ScaleFormula { name: "Whole Tone", intervals: &[0, 2, 4, 6, 8, 10] },
    ScaleFormula { name: "Phrygian Dominant", intervals: &[0, 1, 4, 5, 7, 8, 10] },
];

/// How many of the modes are selected by default in the generator.
pub const DEFAULT_MODE_COUNT: usize = 7;

/// Looks up a mode's interval formula by name.
pub fn formula_for(mode: &str) -> Option<&'static ScaleFormula> {
    SCALE_FORMULAS.iter().find(|f| f.name == mode)
}

/// Major keys around the circle of fifths, clockwise from C. Accidental
/// positions carry both spellings, as shown on the circle.
pub const CIRCLE_OF_FIFTHS_MAJOR: [&str; 12] = [
    "C", "G", "D", "A", "E", "B", "F#/Gb", "C#/Db", "G#/Ab", "D#/Eb", "A#/Bb", "F",
];

/// Relative minor keys on the inner ring, aligned with the major ring.
pub const CIRCLE_OF_FIFTHS_MINOR: [&str; 12] = [
    "Am", "Em", "Bm", "F#m", "C#m", "G#m", "D#m/Ebm", "A#m/Bbm", "Fm", "Cm", "Gm", "Dm",
];

/// One degree of a diatonic progression: roman numeral plus chord symbol.
///
/// The chord symbol is the root name plus an optional `m` (minor) or `°`
/// (diminished) marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordDegree {
    pub roman: &'static str,
    pub chord: &'static str,
}

/// The seven diatonic chords of a key, tonic first. Index is the scale
/// degree and drives both color and function-name lookup; never reorder.
pub type Progression = [ChordDegree; 7];

/// Roman numerals for a harmonized major key.
pub const MAJOR_ROMANS: [&str; 7] = ["I", "ii", "iii", "IV", "V", "vi", "vii°"];

/// Roman numerals for a harmonized natural-minor key.
pub const MINOR_ROMANS: [&str; 7] = ["i", "ii°", "III", "iv", "v", "VI", "VII"];

/// Per-degree colors, shared by major and minor progressions. The tonic is
/// always index 0's color regardless of mode.
pub const CHORD_COLORS: [&str; 7] = [
    "rgb(239, 68, 68)",
    "rgb(249, 115, 22)",
    "rgb(234, 179, 8)",
    "rgb(34, 197, 94)",
    "rgb(59, 130, 246)",
    "rgb(168, 85, 247)",
    "rgb(236, 72, 153)",
];

/// Function names per degree in a major key.
pub const MAJOR_CHORD_FUNCTIONS: [&str; 7] = [
    "Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Leading Tone",
];

/// Function names per degree in a minor key.
pub const MINOR_CHORD_FUNCTIONS: [&str; 7] = [
    "Tonic", "Supertonic", "Mediant", "Subdominant", "Dominant", "Submediant", "Subtonic",
];

/// Diatonic chord progressions for all 24 circle keys, keyed by the display
/// label used on the circle (dual spellings included).
///
/// Major keys harmonize as I ii iii IV V vi vii°, minor keys as
/// i ii° III iv v VI VII. Dual-spelling keys use whichever side keeps the
/// chord symbols inside the supported enharmonic vocabulary.
static CHORD_PROGRESSIONS: Lazy<BTreeMap<&'static str, Progression>> = Lazy::new(|| {
    fn harmonize(romans: &[&'static str; 7], chords: [&'static str; 7]) -> Progression {
        std::array::from_fn(|i| ChordDegree { roman: romans[i], chord: chords[i] })
    }

    let mut map = BTreeMap::new();

    // Major keys, circle order.
    map.insert("C", harmonize(&MAJOR_ROMANS, ["C", "Dm", "Em", "F", "G", "Am", "B°"]));
    map.insert("G", harmonize(&MAJOR_ROMANS, ["G", "Am", "Bm", "C", "D", "Em", "F#°"]));
    map.insert("D", harmonize(&MAJOR_ROMANS, ["D", "Em", "F#m", "G", "A", "Bm", "C#°"]));
    map.insert("A", harmonize(&MAJOR_ROMANS, ["A", "Bm", "C#m", "D", "E", "F#m", "G#°"]));
    map.insert("E", harmonize(&MAJOR_ROMANS, ["E", "F#m", "G#m", "A", "B", "C#m", "D#°"]));
    map.insert("B", harmonize(&MAJOR_ROMANS, ["B", "C#m", "D#m", "E", "F#", "G#m", "A#°"]));
    map.insert("F#/Gb", harmonize(&MAJOR_ROMANS, ["F#", "G#m", "A#m", "B", "C#", "D#m", "E#°"]));
    map.insert("C#/Db", harmonize(&MAJOR_ROMANS, ["Db", "Ebm", "Fm", "Gb", "Ab", "Bbm", "C°"]));
    map.insert("G#/Ab", harmonize(&MAJOR_ROMANS, ["Ab", "Bbm", "Cm", "Db", "Eb", "Fm", "G°"]));
    map.insert("D#/Eb", harmonize(&MAJOR_ROMANS, ["Eb", "Fm", "Gm", "Ab", "Bb", "Cm", "D°"]));
    map.insert("A#/Bb", harmonize(&MAJOR_ROMANS, ["Bb", "Cm", "Dm", "Eb", "F", "Gm", "A°"]));
    map.insert("F", harmonize(&MAJOR_ROMANS, ["F", "Gm", "Am", "Bb", "C", "Dm", "E°"]));

    // Minor keys, circle order.
    map.insert("Am", harmonize(&MINOR_ROMANS, ["Am", "B°", "C", "Dm", "Em", "F", "G"]));
    map.insert("Em", harmonize(&MINOR_ROMANS, ["Em", "F#°", "G", "Am", "Bm", "C", "D"]));
    map.insert("Bm", harmonize(&MINOR_ROMANS, ["Bm", "C#°", "D", "Em", "F#m", "G", "A"]));
    map.insert("F#m", harmonize(&MINOR_ROMANS, ["F#m", "G#°", "A", "Bm", "C#m", "D", "E"]));
    map.insert("C#m", harmonize(&MINOR_ROMANS, ["C#m", "D#°", "E", "F#m", "G#m", "A", "B"]));
    map.insert("G#m", harmonize(&MINOR_ROMANS, ["G#m", "A#°", "B", "C#m", "D#m", "E", "F#"]));
    map.insert("D#m/Ebm", harmonize(&MINOR_ROMANS, ["D#m", "E#°", "F#", "G#m", "A#m", "B", "C#"]));
    map.insert("A#m/Bbm", harmonize(&MINOR_ROMANS, ["Bbm", "C°", "Db", "Ebm", "Fm", "Gb", "Ab"]));
    map.insert("Fm", harmonize(&MINOR_ROMANS, ["Fm", "G°", "Ab", "Bbm", "Cm", "Db", "Eb"]));
    map.insert("Cm", harmonize(&MINOR_ROMANS, ["Cm", "D°", "Eb", "Fm", "Gm", "Ab", "Bb"]));
    map.insert("Gm", harmonize(&MINOR_ROMANS, ["Gm", "A°", "Bb", "Cm", "Dm", "Eb", "F"]));
    map.insert("Dm", harmonize(&MINOR_ROMANS, ["Dm", "E°", "F", "Gm", "Am", "Bb", "C"]));

    map
});

/// Looks up the chord progression for a circle-of-fifths key label.
///
/// Returns `None` for labels absent from the table; keys sourced from
/// [`CIRCLE_OF_FIFTHS_MAJOR`]/[`CIRCLE_OF_FIFTHS_MINOR`] always hit.
pub fn progression_for(key_label: &str) -> Option<&'static Progression> {
    CHORD_PROGRESSIONS.get(key_label)
}

/// Relative and parallel key of a circle key. Pure lookup data, spelled
/// with the same labels as the circle rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRelationship {
    pub relative: &'static str,
    pub parallel: &'static str,
}

static KEY_RELATIONSHIPS: Lazy<BTreeMap<&'static str, KeyRelationship>> = Lazy::new(|| {
    let mut map = BTreeMap::new();
    let mut rel = |key, relative, parallel| {
        map.insert(key, KeyRelationship { relative, parallel });
    };

    rel("C", "Am", "Cm");
    rel("G", "Em", "Gm");
    rel("D", "Bm", "Dm");
    rel("A", "F#m", "Am");
    rel("E", "C#m", "Em");
    rel("B", "G#m", "Bm");
    rel("F#/Gb", "D#m/Ebm", "F#m");
    rel("C#/Db", "A#m/Bbm", "C#m");
    rel("G#/Ab", "Fm", "G#m");
    rel("D#/Eb", "Cm", "D#m/Ebm");
    rel("A#/Bb", "Gm", "A#m/Bbm");
    rel("F", "Dm", "Fm");

    rel("Am", "C", "A");
    rel("Em", "G", "E");
    rel("Bm", "D", "B");
    rel("F#m", "A", "F#/Gb");
    rel("C#m", "E", "C#/Db");
    rel("G#m", "B", "G#/Ab");
    rel("D#m/Ebm", "F#/Gb", "D#/Eb");
    rel("A#m/Bbm", "C#/Db", "A#/Bb");
    rel("Fm", "G#/Ab", "F");
    rel("Cm", "D#/Eb", "C");
    rel("Gm", "A#/Bb", "G");
    rel("Dm", "F", "D");

    map
});

/// Looks up the relative/parallel keys for a circle key label.
pub fn relationship_for(key_label: &str) -> Option<&'static KeyRelationship> {
    KEY_RELATIONSHIPS.get(key_label)
}

/// Guitar strings in display order, highest pitched first (standard tuning).
/// Both E strings share the pitch class E.
pub const GUITAR_STRINGS: [&str; 6] = ["E", "B", "G", "D", "A", "E"];

/// Frets rendered per string: the open position plus frets 1..=12.
pub const FRET_COUNT: usize = 13;

/// Chromatic index of a string's open note.
///
/// The low E string (ordinal 5, last in display order) is distinguished from
/// the high E only for this lookup; both resolve to the same pitch class.
pub fn open_string_index(string_note: &str, string_ordinal: usize) -> Option<usize> {
    if string_note == "E" && string_ordinal == 5 {
        return Some(4); // low E
    }
    match string_note {
        "E" => Some(4),
        "B" => Some(11),
        "G" => Some(7),
        "D" => Some(2),
        "A" => Some(9),
        _ => None,
    }
}

/// Chromatic index of a sharp-spelled pitch class name.
pub fn chromatic_index(note: &str) -> Option<usize> {
    CHROMATIC_NOTES.iter().position(|n| *n == note)
}

/// Flat alias of a sharp accidental. Naturals have no alias.
pub fn flat_alias(note: &str) -> Option<&'static str> {
    match note {
        "C#" => Some("Db"),
        "D#" => Some("Eb"),
        "F#" => Some("Gb"),
        "G#" => Some("Ab"),
        "A#" => Some("Bb"),
        _ => None,
    }
}

/// Chromatic index of any supported spelling: sharps, the five flat
/// aliases, and the theoretical E#/B# spellings that show up as diminished
/// roots in sharp-side keys.
fn note_index(note: &str) -> Option<usize> {
    match note {
        "Db" => Some(1),
        "Eb" => Some(3),
        "Gb" => Some(6),
        "Ab" => Some(8),
        "Bb" => Some(10),
        "E#" => Some(5),
        "B#" => Some(0),
        other => chromatic_index(other),
    }
}

/// Whether two pitch-class spellings name the same pitch.
///
/// Identical spellings count; otherwise both must resolve through the
/// enharmonic table (unknown spellings never match anything).
pub fn are_enharmonic(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    match (note_index(a), note_index(b)) {
        (Some(ia), Some(ib)) => ia == ib,
        _ => false,
    }
}

/// Whether a key or note name carries an accidental (`#` or `b`).
pub fn is_accidental(name: &str) -> bool {
    name.contains('#') || name.contains('b')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_circle_key_has_a_progression() {
        for label in CIRCLE_OF_FIFTHS_MAJOR.iter().chain(CIRCLE_OF_FIFTHS_MINOR.iter()) {
            let progression = progression_for(label)
                .unwrap_or_else(|| panic!("missing progression for {label}"));
            assert_eq!(progression.len(), 7);
        }
    }

    #[test]
    fn major_and_minor_numerals_are_fixed() {
        for label in CIRCLE_OF_FIFTHS_MAJOR {
            let progression = progression_for(label).unwrap();
            for (degree, roman) in progression.iter().zip(MAJOR_ROMANS) {
                assert_eq!(degree.roman, roman, "major key {label}");
            }
        }
        for label in CIRCLE_OF_FIFTHS_MINOR {
            let progression = progression_for(label).unwrap();
            for (degree, roman) in progression.iter().zip(MINOR_ROMANS) {
                assert_eq!(degree.roman, roman, "minor key {label}");
            }
        }
    }

    #[test]
    fn every_circle_key_has_relationships() {
        for label in CIRCLE_OF_FIFTHS_MAJOR.iter().chain(CIRCLE_OF_FIFTHS_MINOR.iter()) {
            let relationship = relationship_for(label)
                .unwrap_or_else(|| panic!("missing relationship for {label}"));
            // Relationship targets must themselves be circle labels.
            assert!(relationship_for(relationship.relative).is_some(), "{label} relative");
            assert!(relationship_for(relationship.parallel).is_some(), "{label} parallel");
        }
    }

    #[test]
    fn scale_formulas_are_strictly_increasing() {
        for formula in SCALE_FORMULAS {
            assert!((5..=7).contains(&formula.intervals.len()), "{}", formula.name);
            assert_eq!(formula.intervals[0], 0, "{}", formula.name);
            for window in formula.intervals.windows(2) {
                assert!(window[0] < window[1], "{}", formula.name);
            }
            assert!(*formula.intervals.last().unwrap() < 12, "{}", formula.name);
        }
    }

    #[test]
    fn enharmonic_pairs_resolve_both_ways() {
        assert!(are_enharmonic("C#", "Db"));
        assert!(are_enharmonic("Db", "C#"));
        assert!(are_enharmonic("E#", "F"));
        assert!(are_enharmonic("B#", "C"));
        assert!(are_enharmonic("G", "G"));
        assert!(!are_enharmonic("C#", "D"));
        assert!(!are_enharmonic("H", "B"));
    }

    #[test]
    fn accidental_keys_carry_flat_aliases() {
        for key in KEYS {
            match key.enharmonic {
                Some(flat) => {
                    assert_eq!(flat_alias(key.name), Some(flat));
                    assert!(are_enharmonic(key.name, flat));
                }
                None => assert_eq!(flat_alias(key.name), None),
            }
        }
    }

    #[test]
    fn dual_keys_display_both_spellings() {
        assert_eq!(KEYS[6].display(), "F#/Gb");
        assert_eq!(KEYS[0].display(), "C");
    }

    #[test]
    fn both_e_strings_share_a_pitch_class() {
        assert_eq!(open_string_index("E", 0), open_string_index("E", 5));
        assert_eq!(open_string_index("Q", 0), None);
    }
}
