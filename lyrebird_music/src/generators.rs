// The three melody generators and the dispatch between them.
//
// - Scale: the key's full pitch pool up and back down, with the top and
//   bottom tonics held for two slots. Deterministic.
// - Random melody: independent uniform draws from the pool.
// - Rule-based melody: a walk over scale degrees that takes small
//   contour-directed steps and occasionally leaps, saturating at the ends of
//   the pool.
//
// Each generator resolves the request's key against the cached scale table
// (scale.rs), produces pitches, and hands them to a `SlotClock` (timing.rs)
// for start/end times. Randomness is always injected by the caller, so a
// seeded RNG reproduces a melody exactly.

use crate::error::{GenerationError, Result};
use crate::key::Key;
use crate::note::{GenerationResult, TimedNote};
use crate::request::{GenerationRequest, RuleShape};
use crate::scale::{ScaleTable, major_scales};
use crate::timing::SlotClock;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which generator to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Scale,
    Random,
    RuleBased,
}

impl Algorithm {
    pub fn generate(
        self,
        request: &GenerationRequest,
        rng: &mut impl Rng,
    ) -> Result<GenerationResult> {
        match self {
            Algorithm::Scale => generate_scale(request),
            Algorithm::Random => generate_random_melody(request, rng),
            Algorithm::RuleBased => generate_melody_rule_based(request, rng),
        }
    }

    /// Output file name used when the caller does not pick one.
    pub fn default_filename(self, key_name: &str) -> String {
        match self {
            Algorithm::Scale => "scale.mid".to_string(),
            Algorithm::Random => "random_melody.mid".to_string(),
            Algorithm::RuleBased => {
                format!("rule_based_melody_{}.mid", key_name.replace(' ', "_"))
            }
        }
    }
}

/// Look up the request's key in the (cached) table for its octave bases.
fn resolve_pool(request: &GenerationRequest) -> Result<(Arc<ScaleTable>, Key)> {
    let key = request.key()?;
    let table = major_scales(&request.octave_bases)?;
    Ok((table, key))
}

fn finish(request: &GenerationRequest, notes: Vec<TimedNote>) -> GenerationResult {
    GenerationResult {
        notes,
        tempo: request.tempo,
        instrument: request.instrument,
    }
}

// ---------------------------------------------------------------------------
// Scale
// ---------------------------------------------------------------------------

/// Ascend through `pool`, hold the top, descend, hold the bottom.
///
/// The top pitch is not repeated on the way down, so `2 * len - 1` notes are
/// produced. Needs at least two pitches.
pub fn scale_run(pool: &[u8], clock: &mut SlotClock) -> Result<Vec<TimedNote>> {
    let [rest @ .., top] = pool else {
        return Err(GenerationError::InvalidScale { len: 0, min: 2 });
    };
    let Some((&bottom, descent)) = rest.split_first() else {
        return Err(GenerationError::InvalidScale { len: 1, min: 2 });
    };

    let mut notes = Vec::with_capacity(pool.len() * 2 - 1);
    notes.extend(clock.place_each(rest.iter().copied()));
    notes.push(clock.place(*top, 2));
    notes.extend(clock.place_each(descent.iter().rev().copied()));
    notes.push(clock.place(bottom, 2));
    Ok(notes)
}

/// Ascending-then-descending scale in the request's key.
pub fn generate_scale(request: &GenerationRequest) -> Result<GenerationResult> {
    let (table, key) = resolve_pool(request)?;
    let mut clock = SlotClock::for_tempo(request.tempo, request.note_length_fraction)?;
    let notes = scale_run(table.scale(key), &mut clock)?;

    tracing::debug!(%key, notes = notes.len(), duration = clock.now(), "generated scale");
    Ok(finish(request, notes))
}

// ---------------------------------------------------------------------------
// Random melody
// ---------------------------------------------------------------------------

/// `count` independent uniform draws (with replacement) from `pool`.
pub fn random_pitches(pool: &[u8], count: usize, rng: &mut impl Rng) -> Vec<u8> {
    if pool.is_empty() {
        return Vec::new();
    }
    (0..count)
        .map(|_| pool[rng.random_range(0..pool.len())])
        .collect()
}

/// `note_count` notes drawn uniformly from the key's pool. Zero notes is an
/// empty melody, not an error.
pub fn generate_random_melody(
    request: &GenerationRequest,
    rng: &mut impl Rng,
) -> Result<GenerationResult> {
    let (table, key) = resolve_pool(request)?;
    let mut clock = SlotClock::for_tempo(request.tempo, request.note_length_fraction)?;
    let pool = table.scale(key);
    if pool.is_empty() && request.note_count > 0 {
        return Err(GenerationError::InvalidScale { len: 0, min: 1 });
    }

    let notes = clock.place_each(random_pitches(pool, request.note_count, rng));
    tracing::debug!(%key, notes = notes.len(), "generated random melody");
    Ok(finish(request, notes))
}

// ---------------------------------------------------------------------------
// Rule-based melody
// ---------------------------------------------------------------------------

/// Uniform over `-max..=-1` and `1..=max`.
fn leap(max_leap_size: u32, rng: &mut impl Rng) -> i64 {
    let max = max_leap_size as i64;
    let k = rng.random_range(0..2 * max);
    if k < max { k - max } else { k - max + 1 }
}

/// Walk `note_count` scale degrees over a pool of `scale_length` pitches.
///
/// Starts at the middle degree. Each following degree is the previous one
/// plus a leap (with `shape.leap_probability`) or a contour step, clamped to
/// the pool. Out-of-range steps saturate rather than reflect, so a melody can
/// sit on the top or bottom degree for several notes.
pub fn walk_scale_degrees(
    scale_length: usize,
    note_count: usize,
    shape: &RuleShape,
    rng: &mut impl Rng,
) -> Result<Vec<usize>> {
    shape.validate()?;
    if note_count == 0 || scale_length == 0 {
        return Ok(Vec::new());
    }
    let top = scale_length as i64 - 1;
    let mut current = (scale_length / 2) as i64;
    let mut degrees = Vec::with_capacity(note_count);
    degrees.push(current as usize);

    for i in 1..note_count {
        let options = shape.contour.steps(i, note_count);
        let step = if rng.random_bool(shape.leap_probability) {
            leap(shape.max_leap_size, rng)
        } else {
            options[rng.random_range(0..options.len())]
        };
        current = (current + step).clamp(0, top);
        degrees.push(current as usize);
    }
    Ok(degrees)
}

/// Stepwise melody with occasional leaps, shaped by the request's contour.
pub fn generate_melody_rule_based(
    request: &GenerationRequest,
    rng: &mut impl Rng,
) -> Result<GenerationResult> {
    let (table, key) = resolve_pool(request)?;
    let mut clock = SlotClock::for_tempo(request.tempo, request.note_length_fraction)?;
    let pool = table.scale(key);
    if pool.is_empty() && request.note_count > 0 {
        return Err(GenerationError::InvalidScale { len: 0, min: 1 });
    }

    let degrees = walk_scale_degrees(pool.len(), request.note_count, &request.shape, rng)?;
    let notes = clock.place_each(degrees.iter().map(|&d| pool[d]));

    tracing::debug!(
        %key,
        contour = %request.shape.contour,
        notes = notes.len(),
        "generated rule-based melody"
    );
    Ok(finish(request, notes))
}
