use super::Note;
use std::collections::BTreeMap;

/// A track of notes that sound alongside the other layers
///
/// Notes are keyed by tick. A layer holds at most one note per tick; ticks without a note
/// are simply absent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Layer {
    name: String,
    volume: u8,
    notes: BTreeMap<i16, Note>,
}

impl Layer {
    /// The volume of layers without metadata
    pub const DEFAULT_VOLUME: u8 = 100;

    /// The display name, empty if none was set
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Playback volume in percent
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// All notes in the layer, in tick order
    pub fn notes(&self) -> &BTreeMap<i16, Note> {
        &self.notes
    }

    /// The note at a specific tick, if any
    pub fn note(&self, tick: i16) -> Option<&Note> {
        self.notes.get(&tick)
    }

    /// The number of notes in the layer
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Does the layer have no notes?
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Place a note, replacing whatever note was at that tick
    pub(crate) fn insert_note(&mut self, tick: i16, note: Note) {
        self.notes.insert(tick, note);
    }

    pub(crate) fn set_metadata(&mut self, name: String, volume: u8) {
        self.name = name;
        self.volume = volume;
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self {
            name: String::new(),
            volume: Self::DEFAULT_VOLUME,
            notes: BTreeMap::new(),
        }
    }
}
