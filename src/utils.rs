use std::{
    collections::HashSet,
    io::{self, BufRead, Write},
    num::IntErrorKind,
    time::Duration,
};

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use indicatif::{ProgressBar, ProgressStyle};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};
use tabled::Table;

use crate::{
    Error, Res,
    types::{Album, AlbumTableRow, MediaItem},
    warning,
};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Media items whose filename does not appear in the remote listing.
///
/// Comparison is by name only, so a remote file with the same name but
/// different content counts as already synced.
pub fn missing_items<'a>(media: &'a [MediaItem], remote: &[String]) -> Vec<&'a MediaItem> {
    let remote: HashSet<&str> = remote.iter().map(String::as_str).collect();
    media
        .iter()
        .filter(|m| !remote.contains(m.filename.as_str()))
        .collect()
}

pub fn album_table(albums: &[Album]) -> Table {
    let rows: Vec<AlbumTableRow> = albums
        .iter()
        .enumerate()
        .map(|(i, a)| AlbumTableRow {
            index: i + 1,
            title: a.title.clone(),
            items: a.media_items_count,
        })
        .collect();
    Table::new(rows)
}

/// Resolves a 1-based album index.
pub fn album_by_index(albums: &[Album], index: usize) -> Res<&Album> {
    if index == 0 || index > albums.len() {
        return Err(Error::OutOfRange {
            index,
            count: albums.len(),
        });
    }
    Ok(&albums[index - 1])
}

/// Asks the operator for a 1-based album index until one is in range.
///
/// Integers of any size that do not name an album are asked again.
/// Anything that is not an integer ends the prompt with
/// [`Error::Selection`]; closed input ends it with an I/O error.
pub fn prompt_album<'a, R: BufRead, W: Write>(
    albums: &'a [Album],
    input: &mut R,
    output: &mut W,
) -> Res<&'a Album> {
    loop {
        write!(output, "\nChoose which shared album to sync: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(Error::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no album selected",
            )));
        }

        let index = match line.trim().parse::<i64>() {
            Ok(index) => index,
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                warning!("Invalid index! Try again.");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        match usize::try_from(index).map(|i| album_by_index(albums, i)) {
            Ok(Ok(album)) => return Ok(album),
            _ => warning!("Invalid index! Try again."),
        }
    }
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

pub fn sync_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("Syncing... {bar:40.blue/white} {pos}/{len} {msg}")
    {
        pb.set_style(style);
    }
    pb
}
