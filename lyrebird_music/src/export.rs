// Serializers: writing a GenerationResult to a file.
//
// Generators never touch the filesystem. A front end picks an `ExportFormat`,
// gets its `Serializer`, and hands it the result and a target path.
// - Midi: Standard MIDI File via midi.rs, for playback in any MIDI player.
// - Json: the note list as pretty-printed JSON, for inspection and tooling.

use crate::error::ExportError;
use crate::midi::write_midi;
use crate::note::GenerationResult;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Persists a generated sequence to a target file.
pub trait Serializer {
    fn write(&self, result: &GenerationResult, path: &Path) -> Result<(), ExportError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MidiSerializer;

impl Serializer for MidiSerializer {
    fn write(&self, result: &GenerationResult, path: &Path) -> Result<(), ExportError> {
        write_midi(result, path)?;
        tracing::info!(path = %path.display(), notes = result.notes.len(), "wrote MIDI file");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn write(&self, result: &GenerationResult, path: &Path) -> Result<(), ExportError> {
        let json = serde_json::to_string_pretty(result)?;
        std::fs::write(path, json)?;
        tracing::info!(path = %path.display(), notes = result.notes.len(), "wrote JSON file");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Midi,
    Json,
}

impl ExportFormat {
    pub fn serializer(self) -> Box<dyn Serializer> {
        match self {
            ExportFormat::Midi => Box::new(MidiSerializer),
            ExportFormat::Json => Box::new(JsonSerializer),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Midi => "mid",
            ExportFormat::Json => "json",
        }
    }

    /// Swap a `.mid` default file name for this format's extension.
    pub fn file_name(self, default_midi_name: &str) -> PathBuf {
        Path::new(default_midi_name).with_extension(self.extension())
    }
}
