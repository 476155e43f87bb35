// MIDI output from generated note sequences.
//
// Converts a GenerationResult into a Standard MIDI File for playback. Note
// times are in seconds; they map to ticks at the result's tempo. Output is
// SMF Format 0: one track carrying the tempo, the instrument's program change
// and the notes on channel 0.
//
// Uses the `midly` crate for MIDI writing.

use crate::error::ExportError;
use crate::note::GenerationResult;
use midly::{
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
    num::{u4, u7, u15, u24, u28},
};
use std::path::Path;

/// Ticks per quarter note in MIDI output.
pub const TICKS_PER_QUARTER: u16 = 480;

const CHANNEL: u8 = 0;
const MAX_U24: u32 = 0x00FF_FFFF;
const MAX_U28: u64 = 0x0FFF_FFFF;

/// Convert a result to MIDI and write it to a file.
pub fn write_midi(result: &GenerationResult, path: &Path) -> Result<(), ExportError> {
    let buf = to_midi_bytes(result)?;
    std::fs::write(path, &buf)?;
    Ok(())
}

/// Encode a result as SMF bytes.
pub fn to_midi_bytes(result: &GenerationResult) -> Result<Vec<u8>, ExportError> {
    let smf = result_to_smf(result)?;
    let mut buf = Vec::new();
    smf.write_std(&mut buf)?;
    Ok(buf)
}

/// Seconds to ticks at `tempo` BPM, rounded to the nearest tick.
fn seconds_to_ticks(seconds: f64, tempo: u32) -> Result<u64, ExportError> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(ExportError::Midi(format!("note time {seconds} is not representable")));
    }
    Ok((seconds * tempo as f64 / 60.0 * TICKS_PER_QUARTER as f64).round() as u64)
}

fn seven_bit(value: u8, what: &str) -> Result<u7, ExportError> {
    if value > 127 {
        return Err(ExportError::Midi(format!("{what} {value} is outside 0..=127")));
    }
    Ok(u7::new(value))
}

/// Convert a result to an in-memory SMF.
pub fn result_to_smf(result: &GenerationResult) -> Result<Smf<'static>, ExportError> {
    if result.tempo == 0 {
        return Err(ExportError::Midi("tempo must be positive".into()));
    }
    let tempo_microseconds = 60_000_000 / result.tempo;
    if tempo_microseconds > MAX_U24 {
        return Err(ExportError::Midi(format!(
            "tempo {} BPM is too slow for a MIDI tempo event",
            result.tempo
        )));
    }

    let channel = u4::new(CHANNEL);

    // (tick, order, message). Note-offs sort before note-ons on the same tick
    // so back-to-back repeats of a pitch re-trigger cleanly.
    let mut events: Vec<(u64, u8, MidiMessage)> = Vec::with_capacity(result.notes.len() * 2);
    for note in &result.notes {
        let key = seven_bit(note.pitch, "pitch")?;
        let vel = seven_bit(note.velocity, "velocity")?;
        let on = seconds_to_ticks(note.start, result.tempo)?;
        // At least one tick long, otherwise the off would sort before its on.
        let off = seconds_to_ticks(note.end, result.tempo)?.max(on + 1);
        events.push((on, 1, MidiMessage::NoteOn { key, vel }));
        events.push((off, 0, MidiMessage::NoteOff { key, vel: u7::new(0) }));
    }
    events.sort_by_key(|&(tick, order, _)| (tick, order));

    let mut track: Track<'static> = Vec::with_capacity(events.len() + 4);
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::TrackName(b"Lyrebird")),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::Tempo(u24::new(tempo_microseconds))),
    });
    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Midi {
            channel,
            message: MidiMessage::ProgramChange {
                program: seven_bit(result.instrument, "program")?,
            },
        },
    });

    let mut last_tick = 0u64;
    for (tick, _, message) in events {
        let delta = tick - last_tick;
        if delta > MAX_U28 {
            return Err(ExportError::Midi(format!("gap of {delta} ticks is too long")));
        }
        track.push(TrackEvent {
            delta: u28::new(delta as u32),
            kind: TrackEventKind::Midi { channel, message },
        });
        last_tick = tick;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));
    smf.tracks.push(track);
    Ok(smf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::{DEFAULT_VELOCITY, TimedNote};

    fn note(pitch: u8, start: f64, end: f64) -> TimedNote {
        TimedNote {
            pitch,
            start,
            end,
            velocity: DEFAULT_VELOCITY,
        }
    }

    fn midi_messages(smf: &Smf<'_>) -> Vec<(u32, MidiMessage)> {
        let mut tick = 0;
        let mut out = Vec::new();
        for event in &smf.tracks[0] {
            tick += event.delta.as_int();
            if let TrackEventKind::Midi { message, .. } = event.kind {
                out.push((tick, message));
            }
        }
        out
    }

    #[test]
    fn test_result_to_smf_basic() {
        // Two quarter notes at 120 BPM, the second one repeated pitch.
        let result = GenerationResult {
            notes: vec![note(60, 0.0, 0.5), note(60, 0.5, 1.0)],
            tempo: 120,
            instrument: 40,
        };
        let smf = result_to_smf(&result).unwrap();
        assert_eq!(smf.tracks.len(), 1);
        assert_eq!(smf.header.format, Format::SingleTrack);

        let messages = midi_messages(&smf);
        assert_eq!(
            messages,
            vec![
                (0, MidiMessage::ProgramChange { program: u7::new(40) }),
                (0, MidiMessage::NoteOn { key: u7::new(60), vel: u7::new(100) }),
                (480, MidiMessage::NoteOff { key: u7::new(60), vel: u7::new(0) }),
                (480, MidiMessage::NoteOn { key: u7::new(60), vel: u7::new(100) }),
                (960, MidiMessage::NoteOff { key: u7::new(60), vel: u7::new(0) }),
            ]
        );
        assert!(smf.tracks[0].iter().any(|e| matches!(
            e.kind,
            TrackEventKind::Meta(MetaMessage::Tempo(t)) if t.as_int() == 500_000
        )));
    }

    #[test]
    fn test_ticks_follow_tempo() {
        // At 60 BPM one second is one quarter.
        assert_eq!(seconds_to_ticks(1.0, 60).unwrap(), 480);
        assert_eq!(seconds_to_ticks(0.25, 120).unwrap(), 240);
        assert!(seconds_to_ticks(-1.0, 120).is_err());
        assert!(seconds_to_ticks(f64::NAN, 120).is_err());
    }

    #[test]
    fn test_bytes_parse_back() {
        let result = GenerationResult {
            notes: vec![note(62, 0.0, 0.5), note(64, 0.5, 1.5)],
            tempo: 120,
            instrument: 0,
        };
        let bytes = to_midi_bytes(&result).unwrap();
        let smf = Smf::parse(&bytes).unwrap();
        let ons = midi_messages(&smf)
            .into_iter()
            .filter(|(_, m)| matches!(m, MidiMessage::NoteOn { .. }))
            .count();
        assert_eq!(ons, 2);
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let mut result = GenerationResult {
            notes: vec![note(200, 0.0, 0.5)],
            tempo: 120,
            instrument: 0,
        };
        assert!(matches!(result_to_smf(&result), Err(ExportError::Midi(_))));

        result.notes = vec![note(60, 0.0, 0.5)];
        result.instrument = 128;
        assert!(matches!(result_to_smf(&result), Err(ExportError::Midi(_))));

        result.instrument = 0;
        result.tempo = 0;
        assert!(matches!(result_to_smf(&result), Err(ExportError::Midi(_))));
    }

    #[test]
    fn test_empty_result_is_valid_file() {
        let result = GenerationResult {
            notes: Vec::new(),
            tempo: 90,
            instrument: 0,
        };
        let smf = result_to_smf(&result).unwrap();
        // Name, tempo, program, end of track.
        assert_eq!(smf.tracks[0].len(), 4);
    }
}
