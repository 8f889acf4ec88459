//! Archive decoder: a single pass over 512-byte header blocks.

use crate::codec::bytes_to_text;
use crate::record::FileRecord;
use crate::{Archive, BLOCK_SIZE, Error, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, trace};

/// Width of the name field at the start of a header.
const NAME_LEN: usize = 100;
/// Offset of the 12-byte octal size field.
const SIZE_OFFSET: usize = 124;
/// Offset of the 12-byte octal modification-time field.
const MTIME_OFFSET: usize = 136;
const NUMERIC_LEN: usize = 12;
/// Offset of the single type-flag byte.
const TYPE_FLAG_OFFSET: usize = 156;
/// Type flag for directory entries: the ASCII character '5' (byte 53), not
/// the digit value 5.
const TYPE_DIRECTORY: u8 = b'5';

/// Decodes a USTAR buffer into an ordered [`Archive`] of file records.
///
/// The whole buffer must be in memory; there is no incremental mode. NUL
/// terminator blocks and directory headers are skipped without emitting a
/// record. Content is copied out, so the buffer may be dropped afterwards.
///
/// # Errors
///
/// [`Error::MalformedHeader`] when a numeric field holds non-octal residue
/// after NUL/whitespace stripping, [`Error::OutOfBounds`] when a header
/// block or a decoded content range runs past the buffer end. Either error
/// aborts the decode; no partial archive is returned.
pub fn decode(buf: &[u8]) -> Result<Archive> {
    let mut files = Vec::new();
    let mut cursor = 0;

    while cursor < buf.len() {
        let header = buf
            .get(cursor..cursor + BLOCK_SIZE)
            .ok_or(Error::OutOfBounds {
                start: cursor,
                end: cursor + BLOCK_SIZE,
                len: buf.len(),
            })?;

        // NUL blocks at the end of the archive and directories carry no
        // content; their header is the whole entry.
        if header[0] == 0 || header[TYPE_FLAG_OFFSET] == TYPE_DIRECTORY {
            trace!(offset = cursor, "skipping terminator or directory header");
            cursor += BLOCK_SIZE;
            continue;
        }

        let size = parse_octal(
            &header[SIZE_OFFSET..SIZE_OFFSET + NUMERIC_LEN],
            "size",
            cursor + SIZE_OFFSET,
        )?;
        let mtime_secs = parse_octal(
            &header[MTIME_OFFSET..MTIME_OFFSET + NUMERIC_LEN],
            "mtime",
            cursor + MTIME_OFFSET,
        )?;
        let modified_at = timestamp_from_secs(mtime_secs, cursor + MTIME_OFFSET)?;
        let name = bytes_to_text(&header[..NAME_LEN]).replace('\0', "");

        let size = size as usize;
        let start = cursor + BLOCK_SIZE;
        let end = start.checked_add(size).ok_or(Error::OutOfBounds {
            start,
            end: usize::MAX,
            len: buf.len(),
        })?;
        let content = buf.get(start..end).ok_or(Error::OutOfBounds {
            start,
            end,
            len: buf.len(),
        })?;

        trace!(name = %name, size, offset = cursor, "decoded file header");
        files.push(FileRecord::new(name, modified_at, content.to_vec()));

        cursor += size;
        cursor += BLOCK_SIZE;
        // Content is block-padded; round up to the next header boundary.
        if cursor % BLOCK_SIZE != 0 {
            cursor += BLOCK_SIZE - cursor % BLOCK_SIZE;
        }
    }

    debug!(records = files.len(), bytes = buf.len(), "archive decoded");
    Ok(Archive::new(files))
}

/// Parses a fixed-width numeric header field as octal.
///
/// The field is read through the byte-text codec, then stripped of every NUL
/// and whitespace character. An empty remainder parses as 0; any non-octal
/// residue is a [`Error::MalformedHeader`].
fn parse_octal(field: &[u8], name: &'static str, offset: usize) -> Result<u64> {
    let digits: String = bytes_to_text(field)
        .chars()
        .filter(|c| *c != '\0' && !c.is_whitespace())
        .collect();
    if digits.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(&digits, 8).map_err(|_| Error::MalformedHeader {
        field: name,
        offset,
        value: digits,
    })
}

/// Builds the record timestamp from decoded whole seconds, through a
/// millisecond epoch value.
fn timestamp_from_secs(secs: u64, offset: usize) -> Result<DateTime<Utc>> {
    let millis = i64::try_from(secs)
        .ok()
        .and_then(|s| s.checked_mul(1000))
        .ok_or(Error::MalformedHeader {
            field: "mtime",
            offset,
            value: secs.to_string(),
        })?;
    DateTime::from_timestamp_millis(millis).ok_or(Error::MalformedHeader {
        field: "mtime",
        offset,
        value: secs.to_string(),
    })
}
