//! Memory-mapped line-addressable byte store.
//!
//! A [`LineFile`] owns the mapping of one backing file and exposes random and
//! sequential access by absolute byte offset and by 1-based line / 0-based
//! column coordinates. All offset arithmetic is bounds-checked; reads never
//! leave the mapped region.

use std::fs::{File, OpenOptions};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut, MmapOptions};

use crate::store::error::StoreError;

/// Sentinel byte returned by sequential reads at or past end-of-buffer.
pub const EOB_SENTINEL: u8 = b'\0';

/// Mapping mode of an open store.
enum Backing {
    /// Private copy-on-write map; writes never reach the backing file.
    ReadOnly(Mmap),
    /// Shared map; writes are visible to the backing file.
    ReadWrite(MmapMut),
}

impl Backing {
    fn as_slice(&self) -> &[u8] {
        match self {
            Self::ReadOnly(map) => map,
            Self::ReadWrite(map) => map,
        }
    }
}

/// Line-addressable byte store over a mapped file.
///
/// The cursor (`position`) stays inside `[0, length)`; the byte `length - 1`
/// acts as the end-of-buffer sentinel position for adjacency queries. The
/// current line is 1-based and is kept consistent with the cursor after
/// every mutation, either incrementally or by a rescan.
pub struct LineFile {
    backing: Option<Backing>,
    file: File,
    path: PathBuf,
    length: u64,
    position: u64,
    current_line: u64,
    last_read: u64,
    line_count: Option<u64>,
    writable: bool,
}

impl LineFile {
    /// Opens `path` and maps its contents.
    ///
    /// Zero-length files are rejected: they have no valid mapping target.
    /// Read-write mode takes a shared map, read-only mode a private one.
    pub fn open(path: impl AsRef<Path>, writable: bool) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(writable)
            .open(path)
            .map_err(|error| match error.kind() {
                ErrorKind::NotFound => StoreError::NotFound {
                    path: path.display().to_string(),
                },
                _ => StoreError::io(&error),
            })?;

        let length = file.metadata().map_err(|error| StoreError::io(&error))?.len();
        if length == 0 {
            return Err(StoreError::EmptyFile {
                path: path.display().to_string(),
            });
        }

        let backing = Self::map_file(&file, writable)?;
        Ok(Self {
            backing: Some(backing),
            file,
            path: path.to_path_buf(),
            length,
            position: 0,
            current_line: 1,
            last_read: 0,
            line_count: None,
            writable,
        })
    }

    /// Returns the mapped bytes, or an empty slice when the store is closed.
    fn bytes(&self) -> &[u8] {
        self.backing.as_ref().map(Backing::as_slice).unwrap_or(&[])
    }

    fn map_file(file: &File, writable: bool) -> Result<Backing, StoreError> {
        if writable {
            let map = unsafe { MmapOptions::new().map_mut(file) }
                .map_err(|error| StoreError::map_failed(&error))?;
            Ok(Backing::ReadWrite(map))
        } else {
            let map = unsafe { MmapOptions::new().map_copy_read_only(file) }
                .map_err(|error| StoreError::map_failed(&error))?;
            Ok(Backing::ReadOnly(map))
        }
    }

    /// Drops the mapping and leaves the store permanently closed.
    ///
    /// Any remap failure funnels through here so a store never holds a
    /// mapping whose backing file changed under it.
    fn close_on_failure(&mut self) {
        self.backing = None;
        self.length = 0;
        self.position = 0;
        self.current_line = 1;
        self.last_read = 0;
        self.line_count = None;
    }

    /// Returns whether the store still holds a valid mapping.
    pub fn is_open(&self) -> bool {
        self.backing.is_some()
    }

    /// Unmaps before the file handle is released.
    pub fn close(mut self) {
        self.backing = None;
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the mapped length in bytes.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Returns the current byte cursor.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Returns whether the store was mapped with a shared writable map.
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    // ------------------------------------------------------------------
    // Sequential access
    // ------------------------------------------------------------------

    /// Reads one byte and advances the cursor.
    ///
    /// At or past end-of-buffer this returns [`EOB_SENTINEL`] and records
    /// zero consumption, so a subsequent rollback is a no-op.
    pub fn read_byte(&mut self) -> u8 {
        if self.position >= self.length {
            self.last_read = 0;
            return EOB_SENTINEL;
        }

        let byte = self.bytes()[self.position as usize];
        self.position += 1;
        self.last_read = 1;
        if byte == b'\n' {
            self.current_line += 1;
        }
        byte
    }

    /// Reads up to `count` bytes, clamped to the remaining length.
    pub fn read_bytes(&mut self, count: u64) -> &[u8] {
        let count = count.min(self.length.saturating_sub(self.position));
        let start = self.position as usize;
        let end = start + count as usize;

        let newlines = self.bytes()[start..end]
            .iter()
            .filter(|byte| **byte == b'\n')
            .count() as u64;
        self.current_line += newlines;
        self.position += count;
        self.last_read = count;

        &self.bytes()[start..end]
    }

    /// Reads the rest of the current line, clamped to `max` bytes.
    ///
    /// The returned span excludes the newline; the cursor lands at the start
    /// of the next line (or at end-of-buffer for a final unterminated line).
    pub fn read_line(&mut self, max: u64) -> &[u8] {
        let max = max.min(self.length.saturating_sub(self.position));
        let start = self.position as usize;
        let span = &self.bytes()[start..start + max as usize];
        let content_len = span
            .iter()
            .position(|byte| *byte == b'\n')
            .map(|index| index as u64)
            .unwrap_or(max);

        self.last_read = content_len;
        if content_len == max {
            self.position += content_len;
        } else {
            self.position += content_len + 1;
            self.current_line += 1;
        }

        &self.bytes()[start..start + content_len as usize]
    }

    /// Undoes exactly the most recent `read_byte`/`read_bytes` consumption.
    ///
    /// Returns the number of bytes undone; 0 when nothing was consumed since
    /// the last rollback, seek, or line move.
    pub fn rollback_last_read(&mut self) -> u64 {
        if self.last_read == 0 {
            return 0;
        }

        let undone = self.last_read;
        self.position -= undone;
        self.last_read = 0;

        let start = self.position as usize;
        let newlines = self.bytes()[start..start + undone as usize]
            .iter()
            .filter(|byte| **byte == b'\n')
            .count() as u64;
        self.current_line -= newlines;
        undone
    }

    /// Advances the cursor by `offset`, clamped to the end sentinel.
    pub fn advance(&mut self, offset: u64) -> u64 {
        let target = if self.position.saturating_add(offset) >= self.length {
            self.length.saturating_sub(1)
        } else {
            self.position + offset
        };

        let start = self.position.min(target) as usize;
        let end = self.position.max(target) as usize;
        let newlines = self.bytes()[start..end]
            .iter()
            .filter(|byte| **byte == b'\n')
            .count() as u64;
        if target >= self.position {
            self.current_line += newlines;
        } else {
            self.current_line -= newlines;
        }
        self.position = target;
        self.position
    }

    /// Advances the cursor by one byte.
    pub fn advance_one(&mut self) -> u64 {
        self.advance(1)
    }

    // ------------------------------------------------------------------
    // Random access
    // ------------------------------------------------------------------

    /// Inspects the byte at an absolute offset without consuming.
    pub fn peek_at(&self, offset: u64) -> Result<u8, StoreError> {
        self.bytes()
            .get(offset as usize)
            .copied()
            .ok_or(StoreError::OutOfRange {
                position: offset,
                length: self.length,
            })
    }

    /// Inspects the byte under the cursor; [`EOB_SENTINEL`] past the end.
    pub fn peek_current(&self) -> u8 {
        self.bytes()
            .get(self.position as usize)
            .copied()
            .unwrap_or(EOB_SENTINEL)
    }

    /// Inspects the byte after the cursor; [`EOB_SENTINEL`] past the end.
    pub fn peek_next(&self) -> u8 {
        self.bytes()
            .get(self.position as usize + 1)
            .copied()
            .unwrap_or(EOB_SENTINEL)
    }

    /// Borrows an exact byte span; errors when it overruns the mapping.
    pub fn slice_at(&self, offset: u64, len: u64) -> Result<&[u8], StoreError> {
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= self.length)
            .ok_or(StoreError::OutOfRange {
                position: offset.saturating_add(len),
                length: self.length,
            })?;
        Ok(&self.bytes()[offset as usize..end as usize])
    }

    /// Borrows up to `len` bytes at `offset`, clamped to the mapping.
    pub fn read_at(&self, offset: u64, len: u64) -> &[u8] {
        if offset >= self.length {
            return &[];
        }
        let len = len.min(self.length - offset);
        &self.bytes()[offset as usize..(offset + len) as usize]
    }

    /// Writes `buf` at `offset` on a writable store, clamped to the mapping.
    ///
    /// Returns the number of bytes written; 0 on a read-only or closed store.
    pub fn write_at(&mut self, buf: &[u8], offset: u64) -> u64 {
        if offset >= self.length {
            return 0;
        }
        let len = (buf.len() as u64).min(self.length - offset);
        match self.backing.as_mut() {
            Some(Backing::ReadWrite(map)) => {
                map[offset as usize..(offset + len) as usize]
                    .copy_from_slice(&buf[..len as usize]);
                len
            }
            _ => 0,
        }
    }

    /// Flushes mapped writes to the backing file.
    pub fn flush(&self) -> Result<(), StoreError> {
        match self.backing.as_ref() {
            Some(Backing::ReadWrite(map)) => {
                map.flush().map_err(|error| StoreError::io(&error))
            }
            _ => Ok(()),
        }
    }

    /// Moves the cursor to an absolute position.
    ///
    /// Resets rollback state and recomputes the current line by a rescan
    /// from the start of the buffer (O(position)).
    pub fn seek(&mut self, position: u64) -> Result<u64, StoreError> {
        if position >= self.length {
            return Err(StoreError::OutOfRange {
                position,
                length: self.length,
            });
        }
        self.position = position;
        self.last_read = 0;
        self.recalibrate_line();
        Ok(position)
    }

    /// Moves the cursor back to the start of the buffer.
    pub fn rewind(&mut self) -> Result<u64, StoreError> {
        self.seek(0)
    }

    /// Distance from the cursor to the first occurrence of `target`.
    ///
    /// Returns the distance to the end sentinel when `target` is absent.
    pub fn find_byte(&self, target: u8) -> u64 {
        self.find_where(|byte| byte == target)
    }

    /// Distance to the first occurrence of either byte.
    pub fn find_any_of2(&self, first: u8, second: u8) -> u64 {
        self.find_where(|byte| byte == first || byte == second)
    }

    /// Distance to the first occurrence of any of three bytes.
    pub fn find_any_of3(&self, first: u8, second: u8, third: u8) -> u64 {
        self.find_where(|byte| byte == first || byte == second || byte == third)
    }

    fn find_where(&self, predicate: impl Fn(u8) -> bool) -> u64 {
        let start = self.position.min(self.length) as usize;
        self.bytes()[start..]
            .iter()
            .position(|byte| predicate(*byte))
            .map(|distance| distance as u64)
            .unwrap_or_else(|| {
                self.length
                    .saturating_sub(self.position)
                    .saturating_sub(1)
            })
    }

    // ------------------------------------------------------------------
    // Line addressing
    // ------------------------------------------------------------------

    /// Returns the 1-based line number of the cursor.
    pub fn line_number(&self) -> u64 {
        self.current_line
    }

    /// Returns the 0-based byte offset of the cursor within its line.
    pub fn column_offset(&self) -> u64 {
        let bytes = self.bytes();
        let mut offset = 0;
        let mut index = self.position;
        while index > 0 {
            if bytes[index as usize - 1] == b'\n' {
                break;
            }
            offset += 1;
            index -= 1;
        }
        offset
    }

    /// Byte length from the cursor through the line's newline, inclusive.
    ///
    /// A final unterminated line reports the distance to the end sentinel
    /// plus one.
    pub fn line_byte_length(&self) -> u64 {
        self.find_byte(b'\n') + 1
    }

    /// Total number of lines: newline count plus one. Cached after the
    /// first computation.
    pub fn total_line_count(&mut self) -> u64 {
        if let Some(count) = self.line_count {
            return count;
        }
        let count = self.count_newlines_before(self.length) + 1;
        self.line_count = Some(count);
        count
    }

    /// Moves to the start of the next line.
    ///
    /// Returns the resulting line number; unchanged when no newline remains
    /// (the cursor then parks on the end sentinel).
    pub fn advance_to_next_line(&mut self) -> u64 {
        let start = self.position.min(self.length) as usize;
        match self.bytes()[start..].iter().position(|byte| *byte == b'\n') {
            Some(distance) => {
                self.position += distance as u64 + 1;
                self.current_line += 1;
                self.last_read = 0;
            }
            None => {
                // Parking on the end sentinel can step back over a final
                // newline; the line number must follow.
                let clamped = self.length.saturating_sub(1);
                if clamped < self.position {
                    let newlines = self.bytes()[clamped as usize..self.position as usize]
                        .iter()
                        .filter(|byte| **byte == b'\n')
                        .count() as u64;
                    self.current_line -= newlines;
                }
                self.position = clamped;
            }
        }
        self.current_line
    }

    /// Moves to the start of the previous line.
    ///
    /// From the first line the cursor lands at the buffer start. Returns the
    /// resulting line number.
    pub fn advance_to_previous_line(&mut self) -> u64 {
        let bytes = self.bytes();
        let expected = if bytes.get(self.position as usize) == Some(&b'\n') {
            3
        } else {
            2
        };

        let mut seen = 0;
        let mut index = self.position as i64;
        while index >= 0 {
            if bytes.get(index as usize) == Some(&b'\n') {
                seen += 1;
                if seen == expected {
                    break;
                }
            }
            index -= 1;
        }

        if seen <= 1 || index < 0 {
            self.position = 0;
            self.current_line = 1;
        } else {
            self.position = index as u64 + 1;
            self.current_line -= 1;
        }
        self.last_read = 0;
        self.current_line
    }

    /// Moves to the start of a 1-based line.
    pub fn move_to_line(&mut self, line: u64) -> Result<u64, StoreError> {
        self.move_to_line_column(line, 0)
    }

    /// Moves to a 1-based line and 0-based column within it.
    pub fn move_to_line_column(&mut self, line: u64, column: u64) -> Result<u64, StoreError> {
        let position = self.position_of_line_column(line, column)?;
        self.position = position;
        self.current_line = line;
        self.last_read = 0;
        Ok(position)
    }

    /// Translates (line, column) coordinates into an absolute position.
    ///
    /// The coordinates of the one-past-end point are addressable, so the
    /// empty final line after a trailing newline has a valid start.
    pub fn position_of_line_column(&self, line: u64, column: u64) -> Result<u64, StoreError> {
        if line == 0 {
            return Err(StoreError::NoSuchLineColumn { line, column });
        }

        let mut current = 1;
        let mut offset = 0;
        for (position, byte) in self.bytes().iter().enumerate() {
            if current == line && offset == column {
                return Ok(position as u64);
            }
            if current > line {
                return Err(StoreError::NoSuchLineColumn { line, column });
            }
            if *byte == b'\n' {
                current += 1;
                offset = 0;
            } else {
                offset += 1;
            }
        }

        if current == line && offset == column {
            return Ok(self.length);
        }
        Err(StoreError::NoSuchLineColumn { line, column })
    }

    /// Returns whether the cursor sits at the buffer start.
    pub fn is_at_buffer_start(&self) -> bool {
        self.position == 0
    }

    /// Returns whether the cursor sits at or past the end sentinel.
    pub fn is_at_buffer_end(&self) -> bool {
        self.position + 1 >= self.length
    }

    /// Returns whether the cursor sits at the first byte of a line.
    pub fn is_at_line_start(&self) -> bool {
        if self.position == 0 {
            return true;
        }
        self.bytes().get(self.position as usize - 1) == Some(&b'\n')
    }

    /// Returns whether the cursor sits at the last byte of a line.
    pub fn is_at_line_end(&self) -> bool {
        if self.position + 1 >= self.length {
            return true;
        }
        self.bytes().get(self.position as usize + 1) == Some(&b'\n')
    }

    // ------------------------------------------------------------------
    // Resizing
    // ------------------------------------------------------------------

    /// Truncates or extends the backing file and remaps it.
    ///
    /// Only strictly positive lengths are valid, matching the open-time
    /// invariant. A cursor beyond the new length is clamped to the new end;
    /// derived caches are recomputed. Any remap failure closes the store.
    pub fn resize(&mut self, new_length: u64) -> Result<(), StoreError> {
        if new_length == 0 {
            return Err(StoreError::EmptyFile {
                path: self.path.display().to_string(),
            });
        }
        if !self.is_open() {
            return Err(StoreError::MapFailed {
                message: "store is closed".to_string(),
            });
        }

        // Unmap before truncating so no live map covers removed pages.
        self.backing = None;
        if let Err(error) = self.file.set_len(new_length) {
            self.close_on_failure();
            return Err(StoreError::io(&error));
        }
        match Self::map_file(&self.file, self.writable) {
            Ok(backing) => self.backing = Some(backing),
            Err(error) => {
                self.close_on_failure();
                return Err(error);
            }
        }

        self.length = new_length;
        self.line_count = None;
        self.last_read = 0;
        if self.position > new_length {
            self.position = new_length;
        }
        self.recalibrate_line();
        Ok(())
    }

    /// Switches between private and shared mapping modes.
    ///
    /// Fails (and closes the store) when the backing file handle does not
    /// permit the requested mode.
    pub fn set_writable(&mut self, enabled: bool) -> Result<(), StoreError> {
        if !self.is_open() {
            return Err(StoreError::MapFailed {
                message: "store is closed".to_string(),
            });
        }

        self.backing = None;
        match Self::map_file(&self.file, enabled) {
            Ok(backing) => {
                self.backing = Some(backing);
                self.writable = enabled;
                Ok(())
            }
            Err(error) => {
                self.close_on_failure();
                Err(error)
            }
        }
    }

    /// Re-derives the current line from the cursor by a full rescan.
    fn recalibrate_line(&mut self) {
        self.current_line = self.count_newlines_before(self.position) + 1;
    }

    fn count_newlines_before(&self, end: u64) -> u64 {
        let end = end.min(self.length) as usize;
        self.bytes()[..end]
            .iter()
            .filter(|byte| **byte == b'\n')
            .count() as u64
    }
}
