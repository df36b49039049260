//! The decoded representation of a song

mod layer;
mod note;

pub use layer::Layer;
pub use note::Note;

use crate::decode::{self, DecodeError, Version};
use std::{
    collections::BTreeMap,
    hash::{Hash, Hasher},
    io::{self, Cursor, Read},
    path::Path,
};
use thiserror::Error;

/// A fully decoded `.nbs` composition
///
/// A song is a sparse grid of [`Note`]s: layers (think tracks) keyed by index, each holding
/// notes keyed by tick. Only layers that contain notes are present. Songs are read-only once
/// decoded.
///
/// Two songs are considered equal when their title and author match, regardless of their
/// contents. This makes [`Song`] usable as a key when looking up or deduplicating songs.
///
/// ```no_run
/// # use nbs::Song;
/// # use std::fs::File;
/// // Decode a song from a path on disk
/// let song = Song::from_path("ode.nbs")?;
///
/// // Decode a song from an arbitrary reader
/// let song = Song::from_reader(File::open("ode.nbs")?)?;
///
/// println!("{} by {}, {:.1}s", song.title(), song.author(), song.duration_secs());
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Song {
    title: String,
    author: String,
    original_author: String,
    description: String,
    speed: f32,
    height: i16,
    length: i16,
    #[cfg_attr(feature = "serde", serde(rename = "format_version"))]
    version: Version,
    layers: BTreeMap<i16, Layer>,
}

impl Song {
    /// The number of ticks per second the playback delay is expressed against
    pub const TICKS_PER_SECOND: u8 = 20;

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        title: String,
        author: String,
        original_author: String,
        description: String,
        speed: f32,
        height: i16,
        length: i16,
        version: Version,
        layers: BTreeMap<i16, Layer>,
    ) -> Self {
        Self {
            title,
            author,
            original_author,
            description,
            speed,
            height,
            length,
            version,
            layers,
        }
    }

    /// Decode a song from an arbitrary I/O reader
    pub fn from_reader<R>(reader: R) -> Result<Self, DecodeError>
    where
        R: Read,
    {
        decode::decode(reader)
    }

    /// Decode a song from a path on disk (.nbs)
    pub fn from_path<P>(path: P) -> Result<Self, FromPathError>
    where
        P: AsRef<Path>,
    {
        let file = std::fs::File::open(path)?;
        Ok(Self::from_reader(io::BufReader::new(file))?)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// The author of the piece the song was arranged from
    pub fn original_author(&self) -> &str {
        &self.original_author
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Playback rate in ticks per second
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// The number of [`TICKS_PER_SECOND`](Self::TICKS_PER_SECOND) between two song ticks
    pub fn delay(&self) -> f32 {
        f32::from(Self::TICKS_PER_SECOND) / self.speed
    }

    /// The number of layers declared by the file
    ///
    /// This can be more than the number of layers in [`layers()`](Self::layers), since
    /// layers without notes are left out.
    pub fn height(&self) -> i16 {
        self.height
    }

    /// The length of the song in ticks
    pub fn length(&self) -> i16 {
        self.length
    }

    /// The play time of the song at its own speed
    pub fn duration_secs(&self) -> f32 {
        f32::from(self.length) / self.speed
    }

    /// The format version the song was decoded from (0 for legacy files)
    pub fn format_version(&self) -> u8 {
        self.version.get()
    }

    /// All layers holding notes, in index order
    pub fn layers(&self) -> &BTreeMap<i16, Layer> {
        &self.layers
    }

    /// The layer at a specific index, if it holds any notes
    pub fn layer(&self, index: i16) -> Option<&Layer> {
        self.layers.get(&index)
    }

    /// The total number of notes across all layers
    pub fn note_count(&self) -> usize {
        self.layers.values().map(Layer::len).sum()
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title && self.author == other.author
    }
}

impl Eq for Song {}

impl Hash for Song {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.title.hash(state);
        self.author.hash(state);
    }
}

/// Decode a song from the bytes of a `.nbs` file
impl TryFrom<&[u8]> for Song {
    type Error = DecodeError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_reader(Cursor::new(bytes))
    }
}

/// Errors that might be returned from [`Song::from_path()`]
#[derive(Debug, Error)]
pub enum FromPathError {
    /// Could not open the file for reading
    #[error("Could not open the file for reading")]
    FileOpen(#[from] io::Error),

    /// Decoding the song from the file failed
    #[error("Decoding the song from file failed")]
    Read(#[from] DecodeError),
}
