// Timed note events: the output of every generator.
//
// A `GenerationResult` is what serializers (midi.rs, export.rs) consume. It
// is plain owned data; nothing in the library keeps a reference after a
// generator returns it.

use serde::{Deserialize, Serialize};

/// Velocity given to every generated note.
pub const DEFAULT_VELOCITY: u8 = 100;

/// A single note with absolute start/end times in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedNote {
    /// MIDI pitch number (0-127).
    pub pitch: u8,
    pub start: f64,
    pub end: f64,
    pub velocity: u8,
}

impl TimedNote {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// An ordered note sequence plus the playback parameters it was timed for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub notes: Vec<TimedNote>,
    /// Tempo in BPM used to compute the note times.
    pub tempo: u32,
    /// MIDI program number, passed through from the request.
    pub instrument: u8,
}

impl GenerationResult {
    /// End time of the last note, or 0 for an empty sequence.
    pub fn total_duration(&self) -> f64 {
        self.notes.last().map_or(0.0, |n| n.end)
    }

    pub fn pitches(&self) -> Vec<u8> {
        self.notes.iter().map(|n| n.pitch).collect()
    }

    /// True if every note starts exactly where the previous one ended.
    pub fn is_contiguous(&self) -> bool {
        self.notes.windows(2).all(|w| w[0].end == w[1].start)
    }
}
