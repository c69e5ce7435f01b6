//! Atomic writes of pretty-printed JSON documents.
//!
//! The document is written to a sibling `.tmp` file which is then renamed over
//! the target. Renames within one filesystem are atomic on POSIX, so a crash
//! leaves either the old file or the new one, never a truncated mix. A stale
//! temp file may remain after a crash and is overwritten by the next write.
//!
//! Documents are written in the layout existing query files already use:
//! 4-space indent, no trailing newline, and every character outside printable
//! ASCII escaped as `\uXXXX` (UTF-16 surrogate pairs above the BMP).

use crate::error::PersistenceError;
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Indentation used for every document this crate writes.
const INDENT: &[u8] = b"    ";

/// [`PrettyFormatter`] that escapes non-ASCII string content.
struct AsciiFormatter<'a>(PrettyFormatter<'a>);

impl Formatter for AsciiFormatter<'_> {
    fn begin_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_array(writer)
    }

    fn end_array<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object(writer)
    }

    fn end_object<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.0.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.0.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if (' '..='~').contains(&c) {
                continue;
            }
            writer.write_all(&fragment.as_bytes()[start..i])?;
            let mut units = [0u16; 2];
            for unit in c.encode_utf16(&mut units).iter() {
                write!(writer, "\\u{unit:04x}")?;
            }
            start = i + c.len_utf8();
        }
        writer.write_all(&fragment.as_bytes()[start..])
    }
}

/// Serialize `value` as 4-space indented, ASCII-only JSON.
///
/// No trailing newline is added.
///
/// # Errors
///
/// Returns [`PersistenceError::Serialize`] if the value cannot be serialized;
/// `path` only labels the error.
pub fn to_pretty_json<T: Serialize>(path: &Path, value: &T) -> Result<Vec<u8>, PersistenceError> {
    let mut buf = Vec::new();
    let formatter = AsciiFormatter(PrettyFormatter::with_indent(INDENT));
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|source| PersistenceError::Serialize {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(buf)
}

/// Atomically replace the file at `path` with the JSON form of `value`.
///
/// # Errors
///
/// Returns [`PersistenceError`] if serialization fails, the temp file cannot
/// be written, or the rename fails (for example across filesystems). On
/// failure the original file, if any, is left unchanged.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let bytes = to_pretty_json(path, value)?;
    let temp_path = make_temp_path(path);

    if let Err(source) = write_to_temp_file(&temp_path, &bytes) {
        // Best-effort cleanup of temp file
        let _ = std::fs::remove_file(&temp_path);
        return Err(PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    std::fs::rename(&temp_path, path).map_err(|source| {
        let _ = std::fs::remove_file(&temp_path);
        PersistenceError::Write {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Temp path for an atomic write: `name.ext` becomes `name.ext.tmp`.
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

fn write_to_temp_file(temp_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let file = File::create(temp_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(bytes)?;
    writer.flush()?;
    Ok(())
}
