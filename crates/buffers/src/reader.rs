//! Binary buffer reader with cursor tracking.

use crate::BufferError;

/// A binary buffer reader that reads data from a byte slice.
///
/// The reader maintains a cursor position and provides bounds-checked methods
/// for reading big-endian integers, raw byte runs, and NUL-terminated
/// strings. Reads never advance the cursor on failure.
///
/// # Example
///
/// ```
/// use resumetoken_buffers::Reader;
///
/// let data = [0x01, 0x02, 0x03, 0x04, 0x05];
/// let mut reader = Reader::new(&data);
///
/// assert_eq!(reader.u8(), Ok(0x01));
/// assert_eq!(reader.u32(), Ok(0x02030405));
/// ```
pub struct Reader<'a> {
    /// The underlying byte slice.
    pub uint8: &'a [u8],
    /// Current cursor position.
    pub x: usize,
}

impl<'a> Reader<'a> {
    /// Creates a new reader for the given byte slice.
    pub fn new(uint8: &'a [u8]) -> Self {
        Self { uint8, x: 0 }
    }

    /// Returns the current cursor position.
    pub fn position(&self) -> usize {
        self.x
    }

    /// Returns the number of remaining bytes.
    pub fn remaining(&self) -> usize {
        self.uint8.len() - self.x
    }

    /// Returns `true` when the cursor is at the end of the buffer.
    pub fn is_empty(&self) -> bool {
        self.x >= self.uint8.len()
    }

    /// Checks that `n` more bytes are available from the current cursor.
    #[inline]
    fn check(&self, n: usize) -> Result<(), BufferError> {
        if self.x + n > self.uint8.len() {
            Err(BufferError::EndOfBuffer)
        } else {
            Ok(())
        }
    }

    /// Peeks at the current byte without advancing the cursor.
    pub fn peek(&self) -> Result<u8, BufferError> {
        self.check(1)?;
        Ok(self.uint8[self.x])
    }

    /// Reads an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self) -> Result<u8, BufferError> {
        self.check(1)?;
        let val = self.uint8[self.x];
        self.x += 1;
        Ok(val)
    }

    /// Reads an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn u32(&mut self) -> Result<u32, BufferError> {
        self.check(4)?;
        let val = u32::from_be_bytes([
            self.uint8[self.x],
            self.uint8[self.x + 1],
            self.uint8[self.x + 2],
            self.uint8[self.x + 3],
        ]);
        self.x += 4;
        Ok(val)
    }

    /// Reads an unsigned 64-bit integer (big-endian).
    #[inline]
    pub fn u64(&mut self) -> Result<u64, BufferError> {
        self.check(8)?;
        let val = u64::from_be_bytes([
            self.uint8[self.x],
            self.uint8[self.x + 1],
            self.uint8[self.x + 2],
            self.uint8[self.x + 3],
            self.uint8[self.x + 4],
            self.uint8[self.x + 5],
            self.uint8[self.x + 6],
            self.uint8[self.x + 7],
        ]);
        self.x += 8;
        Ok(val)
    }

    /// Reads `size` raw bytes and advances the cursor.
    pub fn buf(&mut self, size: usize) -> Result<&'a [u8], BufferError> {
        self.check(size)?;
        let x = self.x;
        let end = x + size;
        let bin = &self.uint8[x..end];
        self.x = end;
        Ok(bin)
    }

    /// Reads a NUL-terminated string and consumes the terminator.
    ///
    /// The end of the buffer acts as an implicit terminator, so this never
    /// fails; at the end of the buffer it yields an empty string. Bytes are
    /// decoded as UTF-8, substituting the replacement character for invalid
    /// sequences.
    pub fn cstring(&mut self) -> String {
        let rest = &self.uint8[self.x..];
        let (segment, advance) = match rest.iter().position(|&b| b == 0) {
            Some(nul) => (&rest[..nul], nul + 1),
            None => (rest, rest.len()),
        };
        self.x += advance;
        String::from_utf8_lossy(segment).into_owned()
    }

    /// Reads a NUL-terminated string that may itself contain NUL bytes.
    ///
    /// Embedded NULs are framed as consecutive NUL-terminated segments glued
    /// together by a `0xFF` continuation byte; the segments are rejoined with
    /// literal NUL characters.
    pub fn cstring_with_nuls(&mut self) -> String {
        let mut out = self.cstring();
        while self.peek() == Ok(0xff) {
            self.x += 1;
            out.push('\0');
            out.push_str(&self.cstring());
        }
        out
    }
}
