// Lyrebird Music Generator
//
// Generates simple melodic material in major keys: a full ascending and
// descending scale, uniformly random melodies, and rule-based stepwise
// melodies shaped by a contour with occasional leaps. Results are timed note
// lists that can be written out as MIDI or JSON.
//
// Architecture:
// - key.rs: The configured major keys and their tonic pitches
// - scale.rs: Multi-octave scale tables, memoized per octave-base list
// - note.rs: TimedNote / GenerationResult, the output of every generator
// - timing.rs: Tempo + note length -> seconds, contiguous slot clock
// - request.rs: GenerationRequest (JSON-loadable) and rule-based shape params
// - generators.rs: Scale, random and rule-based generators + dispatch
// - presets.rs: Named instruments and note lengths
// - midi.rs: Standard MIDI File output via midly
// - export.rs: Serializer trait with MIDI and JSON implementations
// - error.rs: Generation, export and config error types
//
// Stochastic generators take the RNG as an argument, so output is
// deterministic given a seed.

pub mod error;
pub mod export;
pub mod generators;
pub mod key;
pub mod midi;
pub mod note;
pub mod presets;
pub mod request;
pub mod scale;
pub mod timing;

pub use error::{ConfigError, ExportError, GenerationError};
pub use generators::{
    Algorithm, generate_melody_rule_based, generate_random_melody, generate_scale,
};
pub use key::Key;
pub use note::{GenerationResult, TimedNote};
pub use request::{Contour, GenerationRequest, RuleShape};
pub use scale::{ScaleTable, default_major_scales, major_scales};
