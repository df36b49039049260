//! Decoding of [Note Block Studio](https://opennbs.org/) (`.nbs`) song files
//!
//! A `.nbs` file stores a composition as a sparse grid of note events: every note lives at a
//! (tick, layer) position, and the file only stores occupied positions. This crate reads such
//! a file front-to-back in a single pass and produces an immutable [`Song`].
//!
//! ```no_run
//! # use nbs::Song;
//! let song = Song::from_path("ode.nbs")?;
//!
//! for (index, layer) in song.layers() {
//!     println!("{index:>3} | {:<16} | {} notes", layer.name(), layer.len());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Writing `.nbs` files and custom instrument metadata are not supported.

pub mod decode;
pub mod reader;
pub mod song;

pub use decode::{DecodeError, DecodeOptions, decode, decode_with};
pub use song::{Layer, Note, Song};
