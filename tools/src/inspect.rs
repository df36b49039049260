//! The `inspect` subcommand

use crate::utils::iter_files;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use nbs::Song;
use serde::Serialize;
use std::{io, path::PathBuf};
use tracing::warn;

/// Arguments for the `inspect` subcommand
#[derive(Args)]
#[clap(
    author,
    version,
    about = "Inspect .nbs files, or even entire directories for their contents"
)]
pub struct InspectArgs {
    /// The path(s) to inspect
    paths: Vec<PathBuf>,

    /// Search folders recursively
    #[clap(short, long)]
    recursive: bool,

    /// List every layer that holds notes
    #[clap(short, long)]
    layers: bool,

    /// Print the decoded songs as JSON
    #[clap(long)]
    json: bool,
}

/// Inspect .nbs files, or even entire directories for their contents
pub fn inspect(args: &InspectArgs) -> Result<()> {
    let mut songs = Vec::new();

    for entry in iter_files(&args.paths, args.recursive, &["nbs"]) {
        let path = entry.into_path();

        match Song::from_path(&path) {
            Ok(song) => songs.push(Inspected { path, song }),
            Err(error) => warn!(
                "Could not decode {}: {:#}",
                path.display(),
                anyhow::Error::from(error)
            ),
        }
    }

    if args.json {
        serde_json::to_writer_pretty(io::stdout(), &songs).context("Could not write JSON")?;
        println!();
        return Ok(());
    }

    if let Some((last, rest)) = songs.split_last() {
        for inspected in rest {
            print(inspected, args.layers);
            println!();
        }

        print(last, args.layers);
    }

    Ok(())
}

#[derive(Serialize)]
struct Inspected {
    path: PathBuf,
    song: Song,
}

fn print(inspected: &Inspected, layers: bool) {
    let Inspected { path, song } = inspected;

    println!(
        "{:<32} v{} | {:>6.2} t/s | {:>5} ticks ({:.1}s)",
        path.file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default(),
        song.format_version(),
        song.speed(),
        song.length(),
        song.duration_secs()
    );

    let title = if song.title().is_empty() {
        "Untitled".dimmed()
    } else {
        song.title().bold()
    };
    print!("  {title}");
    if !song.author().is_empty() {
        print!(" by {}", song.author());
    }
    if !song.original_author().is_empty() {
        print!(" (originally by {})", song.original_author());
    }
    println!();

    println!(
        "  {}/{} layers, {} notes",
        song.layers().len(),
        song.height(),
        song.note_count()
    );

    if layers {
        for (index, layer) in song.layers() {
            println!(
                "  {index:>4} | {:<16} | vol {:>3} | {:>5} notes",
                layer.name(),
                layer.volume(),
                layer.len()
            );
        }
    }
}
