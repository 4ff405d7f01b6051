//! LSB-first bit-level streams over byte sinks/sources.
//!
//! Wraps any `Read`/`Write` so the driver can point a bit stream at files,
//! stdio, or in-memory buffers interchangeably.

use std::io::{self, Read, Write};

/// Append-only bit sink, LSB-first per byte. The offset-keyed collector that
/// buffers decode-side ranks lives separately, in [`crate::offsets`].
pub struct BitSink<W: Write> {
    inner: W,
    data: u8,
    cur_bit: u8,
}

impl<W: Write> BitSink<W> {
    pub fn new(inner: W) -> Self {
        BitSink {
            inner,
            data: 0,
            cur_bit: 0,
        }
    }

    /// Appends one bit. Emits a completed byte to the underlying writer
    /// every 8th call.
    pub fn push_bit(&mut self, bit: bool) -> io::Result<()> {
        self.data |= (bit as u8) << self.cur_bit;
        self.cur_bit += 1;
        if self.cur_bit == 8 {
            self.cur_bit = 0;
            let byte = self.data;
            self.data = 0;
            self.inner.write_all(&[byte])?;
        }
        Ok(())
    }

    /// Pads any partial trailing byte with zero bits and emits it.
    pub fn flush_byte(&mut self) -> io::Result<()> {
        if self.cur_bit != 0 {
            let byte = self.data;
            self.data = 0;
            self.cur_bit = 0;
            self.inner.write_all(&[byte])?;
        }
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Bounded or unbounded bit source, LSB-first per byte. Equivalent to
/// `bit_istream`, generalized with an explicit `bit_size` so the driver can
/// report `eof()` against a known payload length (a file) as well as an
/// unbounded one (stdin).
pub struct BitSource<R: Read> {
    inner: Option<R>,
    data: u8,
    cur_bit: u8,
    bits_consumed: u64,
    bit_size: Option<u64>,
}

impl<R: Read> BitSource<R> {
    /// `bit_size`: `Some(n)` for a known-length source (a payload file),
    /// `None` for an unbounded one (stdin) whose length is discovered only
    /// by hitting EOF.
    pub fn new(inner: R, bit_size: Option<u64>) -> Self {
        BitSource {
            inner: Some(inner),
            data: 0,
            cur_bit: 8,
            bits_consumed: 0,
            bit_size,
        }
    }

    /// Yields the next bit, or `None` at end of stream. Equivalent to
    /// `bit_istream::next`, which uses `-1` as its sentinel in C++.
    pub fn next(&mut self) -> io::Result<Option<bool>> {
        if self.inner.is_none() {
            return Ok(None);
        }
        if self.cur_bit == 8 {
            let mut byte = [0u8; 1];
            let n = self.inner.as_mut().unwrap().read(&mut byte)?;
            if n == 0 {
                self.inner = None;
                return Ok(None);
            }
            self.data = byte[0];
            self.cur_bit = 0;
        }
        let bit = (self.data >> self.cur_bit) & 1 != 0;
        self.cur_bit += 1;
        self.bits_consumed += 1;
        Ok(Some(bit))
    }

    pub fn bits_consumed(&self) -> u64 {
        self.bits_consumed
    }

    /// Total bits the source is expected to hold, if known.
    pub fn bit_size(&self) -> Option<u64> {
        self.bit_size
    }

    /// True once the source has yielded `None` and no bits remain buffered.
    pub fn eof(&self) -> bool {
        self.inner.is_none() && self.cur_bit == 8
    }
}
