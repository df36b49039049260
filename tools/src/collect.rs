//! The `collect` subcommand

use crate::utils::iter_files;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use nbs::Song;
use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::{
    collections::{HashMap, HashSet},
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Arguments for the `collect` subcommand
#[derive(Args)]
#[clap(
    author,
    version,
    about = "Collect all copies of a (set of) song and print them",
    long_about = "Collect goes through a set of files and folders, and matches songs together by their title and author.\n\nIt then lists every file it has found per song.\n\nThe second column shows a SHA-256 hash of the file contents, to be able to tell identical copies from edited ones.\n\nCollect is also capable of writing this data to a json file instead."
)]
pub struct CollectArgs {
    /// The paths to walk and check for songs
    paths: Vec<PathBuf>,

    /// Should folders be walked recursively
    #[clap(short, long)]
    recursive: bool,

    /// A JSON file the outcome should be written to
    #[clap(long)]
    json: Option<PathBuf>,
}

/// Collect all copies of a (set of) song and print them
pub fn collect(args: CollectArgs) -> Result<()> {
    if args.paths.is_empty() {
        println!("No paths provided to collect from");
        return Ok(());
    }

    let outcome = collect_songs(args.paths, args.recursive);

    if let Some(path) = args.json {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .context(format!("Could not create folder at {}", parent.display()))?;
        }

        let file = fs::File::create(&path)
            .context(format!("Could not create file at {}", path.display()))?;

        serde_json::to_writer_pretty(file, &outcome).context("Could not write to JSON")?;

        println!("Wrote to {}", path.display());
    } else {
        print_outcome(outcome);
    }

    Ok(())
}

fn collect_songs(paths: Vec<PathBuf>, recursive: bool) -> Outcome {
    let mut songs: HashMap<Song, Vec<Instance>> = HashMap::new();
    let mut errors = Vec::new();

    for entry in iter_files(paths, recursive, &["nbs"]) {
        let path = entry.path();

        match file_to_instance(path) {
            Ok((song, instance)) => songs.entry(song).or_default().push(instance),
            Err(error) => {
                debug!("Skipping {}: {error:#}", path.display());
                errors.push(path.to_owned());
            }
        }
    }

    let mut groups: Vec<_> = songs
        .into_iter()
        .map(|(song, instances)| Group {
            title: song.title().to_owned(),
            author: song.author().to_owned(),
            instances,
        })
        .collect();
    groups.sort_by(|a, b| (&a.title, &a.author).cmp(&(&b.title, &b.author)));

    Outcome { groups, errors }
}

fn file_to_instance(path: &Path) -> Result<(Song, Instance)> {
    let bytes = fs::read(path).context("Could not read file")?;
    let song = Song::try_from(bytes.as_slice()).context("Could not decode song")?;

    let instance = Instance {
        format_version: song.format_version(),
        note_count: song.note_count(),
        sha256: Sha256::digest(&bytes).into(),
        path: path.to_owned(),
    };

    Ok((song, instance))
}

fn print_outcome(outcome: Outcome) {
    let mut first = true;

    for path in outcome.errors {
        println!("Could not decode {}", path.display());
    }

    for group in outcome.groups {
        if first {
            first = false;
        } else {
            println!();
        }

        let title = if group.title.is_empty() {
            "Untitled"
        } else {
            group.title.as_str()
        };

        if group.author.is_empty() {
            println!("{}", title.bold());
        } else {
            println!("{} by {}", title.bold(), group.author);
        }

        let shas = group
            .instances
            .iter()
            .map(|instance| &instance.sha256)
            .collect::<HashSet<_>>();
        let unique_sha_length = find_min_len(shas);

        for instance in group.instances {
            let version = format!("v{}", instance.format_version).green();
            let sha = bytes_to_string(&instance.sha256);
            let sha = sha[..unique_sha_length * 2].dimmed();
            let notes = format!("{:>5} notes", instance.note_count).blue();

            println!("  {version} {sha} {notes} {}", instance.path.display());
        }
    }
}

fn bytes_to_string(sha: &[u8; 32]) -> String {
    sha.iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<String>()
}

/// The minimum amount of bytes needed to uniquely identify each byte string in a set
fn find_min_len(strings: HashSet<&[u8; 32]>) -> usize {
    (1..=32)
        .find(|len| {
            let prefixes: HashSet<_> = strings.iter().map(|string| &string[..*len]).collect();
            prefixes.len() == strings.len()
        })
        .unwrap_or(32)
}

#[derive(Default, Serialize)]
struct Outcome {
    groups: Vec<Group>,
    errors: Vec<PathBuf>,
}

/// Every copy of songs sharing a title and author
#[derive(Serialize)]
struct Group {
    title: String,
    author: String,
    instances: Vec<Instance>,
}

#[derive(Serialize)]
struct Instance {
    format_version: u8,
    note_count: usize,

    #[serde(serialize_with = "sha_serialize")]
    sha256: [u8; 32],
    path: PathBuf,
}

fn sha_serialize<S>(x: &[u8; 32], s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&bytes_to_string(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex() {
        let mut sha = [0; 32];
        sha[0] = 0xAB;
        sha[31] = 0x01;

        let string = bytes_to_string(&sha);
        assert_eq!(string.len(), 64);
        assert!(string.starts_with("ab00"));
        assert!(string.ends_with("0001"));
    }

    #[test]
    fn min_len() {
        let a = [0; 32];
        let mut b = [0; 32];
        b[2] = 1;

        assert_eq!(find_min_len(HashSet::from([&a])), 1);
        assert_eq!(find_min_len(HashSet::from([&a, &b])), 3);
    }
}
