// End-to-end tests for the generate → serialize pipeline.
//
// Loads requests the way the CLI does (JSON config file), runs each
// generator with a seeded RNG, writes MIDI/JSON into a temp directory and
// reads the files back with midly / serde_json.

use lyrebird_music::export::ExportFormat;
use lyrebird_music::midi::TICKS_PER_QUARTER;
use lyrebird_music::{Algorithm, Contour, GenerationRequest, GenerationResult, RuleShape};
use midly::num::u7;
use midly::{MidiMessage, Smf, TrackEventKind};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Helper: absolute tick and message of every channel event in track 0.
fn channel_events(bytes: &[u8]) -> Vec<(u32, MidiMessage)> {
    let smf = Smf::parse(bytes).unwrap();
    assert_eq!(smf.tracks.len(), 1);
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
fn scale_midi_has_one_note_pair_per_note() {
    let dir = tempfile::tempdir().unwrap();
    let request = GenerationRequest {
        key: "G Major".into(),
        instrument: 56,
        ..Default::default()
    };
    let result = Algorithm::Scale
        .generate(&request, &mut StdRng::seed_from_u64(0))
        .unwrap();
    assert_eq!(result.notes.len(), 47);

    let path = dir.path().join(Algorithm::Scale.default_filename(&request.key));
    ExportFormat::Midi.serializer().write(&result, &path).unwrap();
    let events = channel_events(&std::fs::read(&path).unwrap());

    assert_eq!(
        events[0],
        (0, MidiMessage::ProgramChange { program: u7::new(56) })
    );
    let ons: Vec<_> = events
        .iter()
        .filter_map(|(t, m)| match m {
            MidiMessage::NoteOn { key, .. } => Some((*t, key.as_int())),
            _ => None,
        })
        .collect();
    let offs = events
        .iter()
        .filter(|(_, m)| matches!(m, MidiMessage::NoteOff { .. }))
        .count();
    assert_eq!(ons.len(), 47);
    assert_eq!(offs, 47);

    // At 120 BPM each quarter slot is 480 ticks; G3 starts, D4 is the
    // second note.
    let q = TICKS_PER_QUARTER as u32;
    assert_eq!(ons[0], (0, 55));
    assert_eq!(ons[1], (q, 57));
    // The held top tonic lasts two slots.
    assert_eq!(ons[24].0 - ons[23].0, 2 * q);
    // Last note (held bottom tonic) ends after 49 slots.
    assert_eq!(events.last().unwrap().0, 49 * q);
}

#[test]
fn config_file_drives_rule_based_generation() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("request.json");
    std::fs::write(
        &config,
        r#"{
            "key": "Eb Major",
            "tempo": 90,
            "note_count": 48,
            "shape": { "leap_probability": 0.0, "contour": "ascending" }
        }"#,
    )
    .unwrap();

    let request = GenerationRequest::load(&config).unwrap();
    assert_eq!(request.shape.contour, Contour::Ascending);

    let result = Algorithm::RuleBased
        .generate(&request, &mut StdRng::seed_from_u64(17))
        .unwrap();
    let pitches = result.pitches();
    assert_eq!(pitches.len(), 48);
    assert!(pitches.windows(2).all(|w| w[0] <= w[1]));
    // Eb Major tops out at Eb6.
    assert_eq!(*pitches.last().unwrap(), 87);
    assert_eq!(result.tempo, 90);

    let out = dir
        .path()
        .join(ExportFormat::Json.file_name(&Algorithm::RuleBased.default_filename(&request.key)));
    assert!(out.ends_with("rule_based_melody_Eb_Major.json"));
    ExportFormat::Json.serializer().write(&result, &out).unwrap();
    let back: GenerationResult =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(back.pitches(), result.pitches());
    assert_eq!(back.tempo, 90);
    for (a, b) in back.notes.iter().zip(&result.notes) {
        assert!((a.start - b.start).abs() < 1e-9 && (a.end - b.end).abs() < 1e-9);
    }
}

#[test]
fn same_seed_gives_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let request = GenerationRequest {
        note_count: 64,
        shape: RuleShape {
            leap_probability: 0.2,
            max_leap_size: 4,
            contour: Contour::Arch,
        },
        ..Default::default()
    };

    let mut files = Vec::new();
    let runs = [
        Algorithm::Random,
        Algorithm::RuleBased,
        Algorithm::Random,
        Algorithm::RuleBased,
    ];
    for (i, algorithm) in runs.into_iter().enumerate() {
        let result = algorithm
            .generate(&request, &mut StdRng::seed_from_u64(2024))
            .unwrap();
        let path = dir.path().join(format!("{i}.mid"));
        ExportFormat::Midi.serializer().write(&result, &path).unwrap();
        files.push(std::fs::read(&path).unwrap());
    }
    assert_eq!(files[0], files[2]);
    assert_eq!(files[1], files[3]);
}

#[test]
fn unknown_key_fails_without_output() {
    let request = GenerationRequest {
        key: "C Minor".into(),
        ..Default::default()
    };
    for algorithm in [Algorithm::Scale, Algorithm::Random, Algorithm::RuleBased] {
        let err = algorithm
            .generate(&request, &mut StdRng::seed_from_u64(1))
            .unwrap_err();
        assert!(err.to_string().contains("C Minor"), "{err}");
    }
}
