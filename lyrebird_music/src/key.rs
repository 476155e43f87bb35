// Major keys known to the scale library.
//
// Each key is identified by its display name ("C Major", "Bb Major", ...)
// and carries the MIDI pitch of its tonic in the middle-C octave. Scale
// construction in scale.rs transposes relative to middle C (60).

use crate::error::GenerationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Reference tonic that octave bases are expressed against.
pub const MIDDLE_C: u8 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Key {
    CMajor,
    DMajor,
    EMajor,
    FMajor,
    GMajor,
    AMajor,
    BMajor,
    BbMajor,
    EbMajor,
}

impl Key {
    pub const ALL: [Key; 9] = [
        Key::CMajor,
        Key::DMajor,
        Key::EMajor,
        Key::FMajor,
        Key::GMajor,
        Key::AMajor,
        Key::BMajor,
        Key::BbMajor,
        Key::EbMajor,
    ];

    /// Tonic pitch in the octave starting at middle C.
    pub fn root(self) -> u8 {
        match self {
            Key::CMajor => 60,
            Key::DMajor => 62,
            Key::EMajor => 64,
            Key::FMajor => 65,
            Key::GMajor => 67,
            Key::AMajor => 69,
            Key::BMajor => 71,
            Key::BbMajor => 70,
            Key::EbMajor => 63,
        }
    }

    /// Semitone offset of the tonic from middle C.
    pub fn offset(self) -> i32 {
        self.root() as i32 - MIDDLE_C as i32
    }

    pub fn name(self) -> &'static str {
        match self {
            Key::CMajor => "C Major",
            Key::DMajor => "D Major",
            Key::EMajor => "E Major",
            Key::FMajor => "F Major",
            Key::GMajor => "G Major",
            Key::AMajor => "A Major",
            Key::BMajor => "B Major",
            Key::BbMajor => "Bb Major",
            Key::EbMajor => "Eb Major",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::ALL
            .iter()
            .copied()
            .find(|k| k.name() == s)
            .ok_or_else(|| GenerationError::UnknownKey(s.to_string()))
    }
}

impl TryFrom<String> for Key {
    type Error = GenerationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Key> for String {
    fn from(key: Key) -> String {
        key.name().to_string()
    }
}
