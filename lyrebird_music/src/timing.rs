// Tempo-to-seconds conversion shared by all generators.
//
// Every generator works in "slots" of one quarter duration
// (60 / tempo * note_length_fraction seconds). `SlotClock` lays slots out
// back-to-back from t = 0, so a note's end is bit-for-bit the next note's
// start.

use crate::error::{GenerationError, Result};
use crate::note::{DEFAULT_VELOCITY, TimedNote};

/// Length in seconds of one generated note at `tempo` BPM.
///
/// `note_length_fraction` scales a quarter note (1.0 = quarter, 0.5 = eighth).
pub fn quarter_duration(tempo: u32, note_length_fraction: f64) -> Result<f64> {
    if tempo == 0 {
        return Err(GenerationError::InvalidTempo(tempo));
    }
    if !note_length_fraction.is_finite() || note_length_fraction <= 0.0 {
        return Err(GenerationError::param(
            "note_length_fraction",
            format!("{note_length_fraction} is not a positive number"),
        ));
    }
    Ok(60.0 / tempo as f64 * note_length_fraction)
}

/// Running clock that hands out contiguous time slots.
#[derive(Debug, Clone)]
pub struct SlotClock {
    unit: f64,
    now: f64,
}

impl SlotClock {
    pub fn new(unit: f64) -> Self {
        SlotClock { unit, now: 0.0 }
    }

    pub fn for_tempo(tempo: u32, note_length_fraction: f64) -> Result<Self> {
        Ok(SlotClock::new(quarter_duration(tempo, note_length_fraction)?))
    }

    pub fn unit(&self) -> f64 {
        self.unit
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Place `pitch` for `slots` units starting at the current time and
    /// advance past it.
    pub fn place(&mut self, pitch: u8, slots: u32) -> TimedNote {
        let start = self.now;
        let end = start + self.unit * slots as f64;
        self.now = end;
        TimedNote {
            pitch,
            start,
            end,
            velocity: DEFAULT_VELOCITY,
        }
    }

    /// Place each pitch for a single slot.
    pub fn place_each(&mut self, pitches: impl IntoIterator<Item = u8>) -> Vec<TimedNote> {
        pitches.into_iter().map(|p| self.place(p, 1)).collect()
    }
}
