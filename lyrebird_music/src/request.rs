// Generation requests: everything a caller supplies to a generator.
//
// A request is plain serde data so it can come from CLI flags, a JSON file,
// or code. Every field has a default (C Major, 120 BPM, quarter notes, 16
// notes, piano, octaves C3-C5, gentle arch), which means a partial JSON file
// is a complete configuration.
//
// The key is kept as its display name and only resolved when a generator
// runs, so an unknown key surfaces as a generation error rather than a parse
// failure of the whole file.

use crate::error::{ConfigError, GenerationError, Result};
use crate::key::Key;
use crate::scale::DEFAULT_OCTAVE_BASES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Overall pitch direction for rule-based melodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Contour {
    /// Rise for the first half of the notes, fall for the second.
    #[default]
    Arch,
    Ascending,
    Descending,
    /// Wander in either direction, including repeats.
    Random,
}

const UP: &[i64] = &[1, 2];
const DOWN: &[i64] = &[-2, -1];
const ANY: &[i64] = &[-2, -1, 0, 1, 2];

impl Contour {
    pub const ALL: [Contour; 4] = [
        Contour::Arch,
        Contour::Ascending,
        Contour::Descending,
        Contour::Random,
    ];

    /// Scale-degree steps allowed for note `i` (0-based) of `note_count`.
    ///
    /// The arch switches from rising to falling once, at the temporal
    /// midpoint.
    pub fn steps(self, i: usize, note_count: usize) -> &'static [i64] {
        match self {
            Contour::Arch if 2 * i < note_count => UP,
            Contour::Arch => DOWN,
            Contour::Ascending => UP,
            Contour::Descending => DOWN,
            Contour::Random => ANY,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Contour::Arch => "arch",
            Contour::Ascending => "ascending",
            Contour::Descending => "descending",
            Contour::Random => "random",
        }
    }
}

impl fmt::Display for Contour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Contour {
    type Err = GenerationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Contour::ALL
            .iter()
            .copied()
            .find(|c| c.name() == lower)
            .ok_or_else(|| {
                GenerationError::param(
                    "contour",
                    format!("{s:?} is not one of arch, ascending, descending, random"),
                )
            })
    }
}

/// Shape parameters for the rule-based generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleShape {
    /// Chance in [0, 1] that a step is replaced by a leap.
    pub leap_probability: f64,
    /// Largest leap, in scale degrees (>= 1).
    pub max_leap_size: u32,
    pub contour: Contour,
}

impl Default for RuleShape {
    fn default() -> Self {
        RuleShape {
            leap_probability: 0.1,
            max_leap_size: 4,
            contour: Contour::Arch,
        }
    }
}

impl RuleShape {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.leap_probability) {
            return Err(GenerationError::param(
                "leap_probability",
                format!("{} is outside [0, 1]", self.leap_probability),
            ));
        }
        if self.max_leap_size < 1 {
            return Err(GenerationError::param(
                "max_leap_size",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Parameters for one generator call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationRequest {
    /// Key display name, e.g. "C Major".
    pub key: String,
    /// Tempo in BPM.
    pub tempo: u32,
    /// Note length as a multiple of a quarter note.
    pub note_length_fraction: f64,
    /// Number of notes for the melody generators (the scale ignores it).
    pub note_count: usize,
    /// MIDI program number; not interpreted by the generators.
    pub instrument: u8,
    pub octave_bases: Vec<i32>,
    pub shape: RuleShape,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        GenerationRequest {
            key: Key::CMajor.name().to_string(),
            tempo: 120,
            note_length_fraction: 1.0,
            note_count: 16,
            instrument: 0,
            octave_bases: DEFAULT_OCTAVE_BASES.to_vec(),
            shape: RuleShape::default(),
        }
    }
}

impl GenerationRequest {
    /// Load a request from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path)?;
        let request: GenerationRequest = serde_json::from_str(&data)?;
        Ok(request)
    }

    /// Resolve the key name.
    pub fn key(&self) -> Result<Key> {
        self.key.parse()
    }
}
