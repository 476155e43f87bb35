// Multi-octave major scales for every configured key.
//
// A scale table maps each `Key` to the sorted MIDI pitches of its major scale
// stacked over a list of octave bases (by default C3, C4, C5 = 48, 60, 72).
// Every base contributes the full eight-step pattern including the upper
// tonic, so neighbouring octaves share a boundary pitch and the sorted
// sequence repeats it (… 59, 60, 60, 62 …).
//
// Tables are pure functions of the octave bases, so each distinct argument is
// built at most once and kept for the life of the process. Lookups after the
// first only take a shared read lock. Two threads racing on the first build
// both compute the same table; whichever inserts first is the one everybody
// gets.

use crate::error::{GenerationError, Result};
use crate::key::Key;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock, RwLock};

/// Semitone offsets of the major scale, tonic to tonic.
pub const MAJOR_SCALE_STEPS: [i32; 8] = [0, 2, 4, 5, 7, 9, 11, 12];

/// Octave bases used when the caller does not configure any.
pub const DEFAULT_OCTAVE_BASES: [i32; 3] = [48, 60, 72];

/// Sorted scale pitches for every key, built over one set of octave bases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleTable {
    octave_bases: Vec<i32>,
    scales: BTreeMap<Key, Vec<u8>>,
}

impl ScaleTable {
    /// Build the table for the given octave bases without consulting the cache.
    ///
    /// Fails if the list is empty or any resulting pitch falls outside the
    /// MIDI range.
    pub fn build(octave_bases: &[i32]) -> Result<Self> {
        if octave_bases.is_empty() {
            return Err(GenerationError::InvalidOctaveBases {
                bases: Vec::new(),
                reason: "at least one octave base is required".into(),
            });
        }

        let mut scales = BTreeMap::new();
        for key in Key::ALL {
            scales.insert(key, scale_for_key(key, octave_bases)?);
        }

        Ok(ScaleTable {
            octave_bases: octave_bases.to_vec(),
            scales,
        })
    }

    pub fn octave_bases(&self) -> &[i32] {
        &self.octave_bases
    }

    /// Pitches for a key, ascending.
    pub fn scale(&self, key: Key) -> &[u8] {
        self.scales.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Pitches for a key given by display name.
    pub fn scale_by_name(&self, name: &str) -> Result<&[u8]> {
        let key: Key = name.parse()?;
        Ok(self.scale(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Key, &[u8])> {
        self.scales.iter().map(|(k, v)| (*k, v.as_slice()))
    }
}

/// Stack the major scale of `key` on each octave base and sort the result.
fn scale_for_key(key: Key, octave_bases: &[i32]) -> Result<Vec<u8>> {
    let mut pitches = Vec::with_capacity(octave_bases.len() * MAJOR_SCALE_STEPS.len());
    for &base in octave_bases {
        for step in MAJOR_SCALE_STEPS {
            let pitch = base + key.offset() + step;
            let pitch = u8::try_from(pitch)
                .ok()
                .filter(|p| *p <= 127)
                .ok_or_else(|| GenerationError::InvalidOctaveBases {
                    bases: octave_bases.to_vec(),
                    reason: format!("{key} reaches pitch {pitch}, outside 0..=127"),
                })?;
            pitches.push(pitch);
        }
    }
    pitches.sort_unstable();
    Ok(pitches)
}

type TableCache = RwLock<HashMap<Vec<i32>, Arc<ScaleTable>>>;

fn cache() -> &'static TableCache {
    static CACHE: OnceLock<TableCache> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Major scales for all keys over `octave_bases`, memoized per argument.
pub fn major_scales(octave_bases: &[i32]) -> Result<Arc<ScaleTable>> {
    {
        // A poisoned lock still guards a map of fully built tables.
        let tables = cache().read().unwrap_or_else(|e| e.into_inner());
        if let Some(table) = tables.get(octave_bases) {
            return Ok(Arc::clone(table));
        }
    }

    let built = ScaleTable::build(octave_bases)?;
    tracing::debug!(?octave_bases, keys = built.scales.len(), "built scale table");

    let mut tables = cache().write().unwrap_or_else(|e| e.into_inner());
    let table = tables
        .entry(octave_bases.to_vec())
        .or_insert_with(|| Arc::new(built));
    Ok(Arc::clone(table))
}

/// Major scales over the default C3/C4/C5 octave bases.
pub fn default_major_scales() -> Result<Arc<ScaleTable>> {
    major_scales(&DEFAULT_OCTAVE_BASES)
}
