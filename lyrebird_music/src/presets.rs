// Named instruments and note lengths offered to front ends.
//
// Generators take raw numbers (a MIDI program, a quarter-note multiplier).
// These tables let a caller accept friendlier names as well.

use crate::error::{GenerationError, Result};

/// General MIDI programs for the offered instruments.
pub const INSTRUMENTS: &[(&str, u8)] = &[
    ("Acoustic Grand Piano", 0),
    ("Violin", 40),
    ("Trumpet", 56),
    ("Flute", 73),
    ("Electric Guitar (clean)", 27),
];

/// Note lengths as multiples of a quarter note.
pub const NOTE_LENGTHS: &[(&str, f64)] = &[
    ("Whole", 4.0),
    ("Half", 2.0),
    ("Quarter", 1.0),
    ("Eighth", 0.5),
    ("Sixteenth", 0.25),
];

/// Resolve an instrument name (case-insensitive) or a program number 0-127.
pub fn resolve_instrument(s: &str) -> Result<u8> {
    let s = s.trim();
    if let Ok(program) = s.parse::<u8>() {
        if program <= 127 {
            return Ok(program);
        }
        return Err(GenerationError::param(
            "instrument",
            format!("program {program} is outside 0..=127"),
        ));
    }
    INSTRUMENTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|&(_, program)| program)
        .ok_or_else(|| GenerationError::param("instrument", format!("unknown instrument {s:?}")))
}

/// Resolve a note-length name (case-insensitive) or a positive multiplier.
pub fn resolve_note_length(s: &str) -> Result<f64> {
    let s = s.trim();
    if let Ok(fraction) = s.parse::<f64>() {
        if fraction.is_finite() && fraction > 0.0 {
            return Ok(fraction);
        }
        return Err(GenerationError::param(
            "note_length_fraction",
            format!("{s} is not a positive number"),
        ));
    }
    NOTE_LENGTHS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(s))
        .map(|&(_, fraction)| fraction)
        .ok_or_else(|| {
            GenerationError::param("note_length_fraction", format!("unknown note length {s:?}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_by_name_or_number() {
        assert_eq!(resolve_instrument("violin").unwrap(), 40);
        assert_eq!(resolve_instrument("Electric Guitar (clean)").unwrap(), 27);
        assert_eq!(resolve_instrument("19").unwrap(), 19);
        assert!(resolve_instrument("128").is_err());
        assert!(resolve_instrument("kazoo").is_err());
    }

    #[test]
    fn test_note_length_by_name_or_number() {
        assert_eq!(resolve_note_length("Quarter").unwrap(), 1.0);
        assert_eq!(resolve_note_length("sixteenth").unwrap(), 0.25);
        assert_eq!(resolve_note_length("1.5").unwrap(), 1.5);
        assert!(resolve_note_length("0").is_err());
        assert!(resolve_note_length("-2").is_err());
        assert!(resolve_note_length("breve").is_err());
    }
}
