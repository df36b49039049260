//! # NBS Tools
//!
//! [Note Block Studio](https://opennbs.org/) is a tool for composing music that is played back
//! with note blocks. Songs are saved as `.nbs` files, of which large collections circulate,
//! often as several slightly different copies of the same song.
//!
//! This crate provides a command-line utility to look inside those files.
//!
//! ## Inspect
//!
//! ```console
//! nbs-tools-inspect 0.1.0
//! Inspect .nbs files, or even entire directories for their contents
//!
//! USAGE:
//!     nbs-tools inspect [OPTIONS] [PATHS]...
//!
//! ARGS:
//!     <PATHS>...    The path(s) to inspect
//!
//! OPTIONS:
//!     -h, --help         Print help information
//!         --json         Print the decoded songs as JSON
//!     -l, --layers       List every layer that holds notes
//!     -r, --recursive    Search folders recursively
//!     -V, --version      Print version information
//! ```
//!
//! ### Example
//!
//! ```console
//! $ nbs-tools inspect --layers ode_v5.nbs
//! ode_v5.nbs                       v5 |  10.00 t/s |    31 ticks (3.1s)
//!   Ode to Joy by nbs (originally by Ludwig van Beethoven)
//!   2/4 layers, 10 notes
//!      0 | Melody           | vol 100 |     8 notes
//!      2 | Bass             | vol  80 |     2 notes
//! ```
//!
//! ## Collect
//!
//! ```console
//! nbs-tools-collect 0.1.0
//! Collect all copies of a (set of) song and print them
//!
//! USAGE:
//!     nbs-tools collect [OPTIONS] [PATHS]...
//!
//! ARGS:
//!     <PATHS>...    The paths to walk and check for songs
//!
//! OPTIONS:
//!     -h, --help           Print help information
//!         --json <JSON>    A JSON file the outcome should be written to
//!     -r, --recursive      Should folders be walked recursively
//!     -V, --version        Print version information
//! ```
//!
//! Songs are matched by title and author. Set `RUST_LOG=debug` to see why files were skipped.

pub mod collect;
pub mod inspect;
pub(crate) mod utils;
