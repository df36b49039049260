//! Decoding of the `.nbs` byte layout into a [`Song`]
//!
//! A stream is read front to back exactly once, in four parts:
//!
//!  * The header, whose first field tells legacy files (a nonzero song length) apart from
//!    versioned ones (a zero, followed by the version byte)
//!  * Bookkeeping fields the editor stores (auto-save, statistics, loop settings), which are
//!    read only to stay aligned
//!  * The note block, a sparse (tick, layer) grid in which both indices are stored as jumps
//!    from the previous one, and every list ends with a zero jump
//!  * Per-layer metadata (name, volume) for every declared layer
//!
//! Anything after the layer metadata, such as the custom instrument table, is left unread.

mod version;

pub use version::{Field, Version};

use crate::{
    reader::{ByteOrder, Reader},
    song::{Layer, Note, Song},
};
use log::{debug, trace};
use std::{
    collections::BTreeMap,
    io::{self, Read},
};
use thiserror::Error;

/// Settings that change how a stream is decoded
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// The encoding of multi-byte integer fields
    pub byte_order: ByteOrder,

    /// Also create the layers that hold no notes from the layer metadata
    ///
    /// By default such layers are read past and left out of [`Song::layers()`].
    pub keep_empty_layers: bool,
}

/// Decode a [`Song`] from an arbitrary I/O reader, using the default [`DecodeOptions`]
pub fn decode<R>(reader: R) -> Result<Song, DecodeError>
where
    R: Read,
{
    decode_with(reader, &DecodeOptions::default())
}

/// Decode a [`Song`] from an arbitrary I/O reader
///
/// This either returns a complete song or an error; a stream that ends early never results
/// in a partially filled song.
pub fn decode_with<R>(reader: R, options: &DecodeOptions) -> Result<Song, DecodeError>
where
    R: Read,
{
    let mut reader = Reader::new(reader, options.byte_order);

    let mut header = read_header(&mut reader)?;
    debug!(
        "Decoded {} header of \"{}\": length {}, height {}",
        header.version, header.title, header.length, header.height
    );

    skip_bookkeeping(&mut reader, header.version)?;

    let mut layers = BTreeMap::new();
    let last_tick = read_notes(&mut reader, header.version, &mut layers)?;

    if header.version.infers_length() {
        header.length = last_tick;
    }

    read_layer_metadata(&mut reader, &header, options, &mut layers)?;

    let song = Song::new(
        header.title,
        header.author,
        header.original_author,
        header.description,
        header.speed,
        header.height,
        header.length,
        header.version,
        layers,
    );

    debug!(
        "Decoded \"{}\" ({} bytes): {} layers, {} notes",
        song.title(),
        reader.position(),
        song.layers().len(),
        song.note_count()
    );

    Ok(song)
}

struct Header {
    version: Version,
    length: i16,
    height: i16,
    title: String,
    author: String,
    original_author: String,
    description: String,
    speed: f32,
}

fn read_header<R>(reader: &mut Reader<R>) -> Result<Header, DecodeError>
where
    R: Read,
{
    let mut length = reader.read_short()?;
    let mut version = Version::LEGACY;

    // Legacy files start with their (nonzero) length; newer ones with a zero
    if length == 0 {
        version = Version::new(reader.read_byte()?);

        // Custom instrument count, custom instruments aren't supported
        reader.read_byte()?;

        if version.has(Field::Length) {
            length = reader.read_short()?;
        }
    }

    Ok(Header {
        version,
        length,
        height: reader.read_short()?,
        title: reader.read_string()?,
        author: reader.read_string()?,
        original_author: reader.read_string()?,
        description: reader.read_string()?,
        speed: f32::from(reader.read_short()?) / 100.0,
    })
}

fn skip_bookkeeping<R>(reader: &mut Reader<R>, version: Version) -> Result<(), DecodeError>
where
    R: Read,
{
    let start = reader.position();

    reader.read_bool()?; // Auto-save enabled
    reader.read_byte()?; // Auto-save interval
    reader.read_byte()?; // Time signature
    reader.read_int()?; // Minutes spent
    reader.read_int()?; // Left clicks
    reader.read_int()?; // Right clicks
    reader.read_int()?; // Blocks added
    reader.read_int()?; // Blocks removed
    reader.read_string()?; // Imported .mid/.schematic file name

    if version.has(Field::LoopSettings) {
        reader.read_bool()?; // Loop on/off
        reader.read_byte()?; // Max loop count
        reader.read_short()?; // Loop start tick
    }

    trace!(
        "Skipped {} bytes of bookkeeping at {start}",
        reader.position() - start
    );

    Ok(())
}

/// Read the note block, returning the last tick that was jumped to
fn read_notes<R>(
    reader: &mut Reader<R>,
    version: Version,
    layers: &mut BTreeMap<i16, Layer>,
) -> Result<i16, DecodeError>
where
    R: Read,
{
    let mut tick: i16 = -1;

    loop {
        let tick_jump = reader.read_short()?;
        if tick_jump == 0 {
            break;
        }
        tick = tick.wrapping_add(tick_jump);

        let mut layer: i16 = -1;

        loop {
            let layer_jump = reader.read_short()?;
            if layer_jump == 0 {
                break;
            }
            layer = layer.wrapping_add(layer_jump);

            let note = read_note(reader, version)?;
            layers.entry(layer).or_default().insert_note(tick, note);
        }
    }

    Ok(tick)
}

fn read_note<R>(reader: &mut Reader<R>, version: Version) -> Result<Note, DecodeError>
where
    R: Read,
{
    let instrument = reader.read_byte()?;
    let key = reader.read_signed_byte()?;

    if !version.has(Field::NoteDetails) {
        return Ok(Note::new(
            instrument,
            key,
            Note::DEFAULT_VELOCITY,
            Note::DEFAULT_PITCH,
        ));
    }

    let velocity = reader.read_byte()?;
    reader.read_byte()?; // Panning isn't supported
    let pitch = reader.read_short()?;

    Ok(Note::new(instrument, key, velocity, pitch))
}

fn read_layer_metadata<R>(
    reader: &mut Reader<R>,
    header: &Header,
    options: &DecodeOptions,
    layers: &mut BTreeMap<i16, Layer>,
) -> Result<(), DecodeError>
where
    R: Read,
{
    for index in 0..header.height {
        let name = reader.read_string()?;

        if header.version.has(Field::LayerLock) {
            reader.read_bool()?; // Locked
        }

        let volume = reader.read_byte()?;

        if header.version.has(Field::LayerStereo) {
            reader.read_byte()?; // Stereo panning
        }

        let layer = if options.keep_empty_layers {
            Some(layers.entry(index).or_default())
        } else {
            layers.get_mut(&index)
        };

        match layer {
            Some(layer) => layer.set_metadata(name, volume),
            None => trace!("Dropped metadata of empty layer {index} (\"{name}\")"),
        }
    }

    Ok(())
}

/// Errors that might be returned from [`decode()`] and [`decode_with()`]
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The stream ended before the song was complete
    #[error("The stream ended at byte {offset} before the song was fully decoded")]
    Truncated {
        /// The position of the field that could not be read completely
        offset: u64,
    },

    /// Any other failure that has to do with I/O
    #[error("Something failed with I/O at byte {offset}")]
    Io {
        /// The position of the field that was being read
        offset: u64,
        source: io::Error,
    },
}

impl DecodeError {
    pub(crate) fn from_io(offset: u64, source: io::Error) -> Self {
        match source.kind() {
            io::ErrorKind::UnexpectedEof => Self::Truncated { offset },
            _ => Self::Io { offset, source },
        }
    }

    /// The byte position at which decoding failed
    pub fn offset(&self) -> u64 {
        match self {
            Self::Truncated { offset } | Self::Io { offset, .. } => *offset,
        }
    }

    /// Did the stream end too early?
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::Truncated { .. })
    }
}
