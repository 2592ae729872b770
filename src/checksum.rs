//! CRC-32 guard over a week's database files.
//!
//! The checksum is the standard IEEE CRC-32 of the memo file's bytes followed
//! by the task file's bytes, computed as one running value. A missing file
//! contributes no bytes. The stored form is a decimal integer on one line.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crc32fast::Hasher;

const READ_CHUNK: usize = 8 * 1024;

/// Running CRC-32 accumulated across several files.
#[derive(Default)]
pub struct Checksum {
    hasher: Hasher,
}

impl Checksum {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Feed a file's contents. A file that does not exist is skipped.
    pub fn update_file(&mut self, path: &Path) -> io::Result<()> {
        let mut file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err),
        };
        let mut buf = [0u8; READ_CHUNK];
        loop {
            let read = file.read(&mut buf)?;
            if read == 0 {
                return Ok(());
            }
            self.hasher.update(&buf[..read]);
        }
    }

    pub fn finish(self) -> u32 {
        self.hasher.finalize()
    }
}

/// Checksum of the given files, in order.
pub fn files_checksum(paths: &[&Path]) -> io::Result<u32> {
    let mut checksum = Checksum::new();
    for path in paths {
        checksum.update_file(path)?;
    }
    Ok(checksum.finish())
}

/// Parse the stored decimal value, ignoring surrounding whitespace.
pub fn parse_stored(text: &str) -> Option<u32> {
    text.split_whitespace().next()?.parse().ok()
}

pub fn format_stored(value: u32) -> String {
    format!("{value}\n")
}
