//! The tag-body accumulator.
//!
//! The source design describes a manually-grown, null-terminated byte
//! buffer (allocate-then-concat on every append). `Vec<u8>` already gives
//! us amortized growth and an exact logical length, so the "terminator"
//! bookkeeping collapses entirely: there is nothing left to track beyond
//! the bytes themselves.

/// A growable byte buffer that accumulates a tag's raw body (or, before a
/// tag is recognized, a run of character data) across chunk boundaries.
#[derive(Debug, Default, Clone)]
pub struct ByteBuf {
    data: Vec<u8>,
}

impl ByteBuf {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self { data: Vec::with_capacity(cap) }
    }

    /// Appends `bytes` to the buffer. A zero-length append is a no-op.
    #[inline]
    pub fn push_slice(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.data.extend_from_slice(bytes);
    }

    #[inline]
    pub fn push_byte(&mut self, byte: u8) {
        self.data.push(byte);
    }

    pub fn clear(&mut self) {
        self.data.clear();
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the buffer, returning its bytes and leaving a fresh empty
    /// buffer in its place.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_is_cumulative() {
        let mut buf = ByteBuf::new();
        buf.push_slice(b"hel");
        buf.push_slice(b"lo");
        assert_eq!(buf.as_bytes(), b"hello");
    }

    #[test]
    fn zero_length_append_is_noop() {
        let mut buf = ByteBuf::new();
        buf.push_slice(b"abc");
        buf.push_slice(b"");
        assert_eq!(buf.as_bytes(), b"abc");
    }
}
