//! Capacity-bounded text buffer.

use std::fmt;

/// A string that never grows past a fixed byte capacity.
///
/// Every write clamps to the capacity, cutting on a UTF-8 character
/// boundary. Overflow is silent: the text is simply shorter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedBuffer {
    text: String,
    capacity: usize,
}

impl FixedBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            text: String::new(),
            capacity,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Maximum number of bytes the buffer holds.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes that can still be appended.
    pub fn remaining(&self) -> usize {
        self.capacity - self.text.len()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// Truncate to at most `len` bytes, backing off to a character boundary.
    pub fn truncate(&mut self, len: usize) {
        if len < self.text.len() {
            let cut = floor_char_boundary(&self.text, len);
            self.text.truncate(cut);
        }
    }

    /// Append as much of `s` as fits. Returns the number of bytes written.
    pub fn push_str(&mut self, s: &str) -> usize {
        let take = floor_char_boundary(s, self.remaining());
        self.text.push_str(&s[..take]);
        take
    }

    /// Insert `s` at the front, dropping whatever no longer fits from the
    /// end. Returns the number of prefix bytes kept.
    pub fn prepend_str(&mut self, s: &str) -> usize {
        let take = floor_char_boundary(s, self.capacity);
        self.text.insert_str(0, &s[..take]);
        self.truncate(self.capacity);
        take
    }

    /// Replace the contents with `s`, clamped.
    pub fn set(&mut self, s: &str) {
        self.text.clear();
        self.push_str(s);
    }
}

impl fmt::Write for FixedBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        // Truncation is not an error for column text.
        self.push_str(s);
        Ok(())
    }
}

impl fmt::Display for FixedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Largest char boundary in `s` that is `<= index`.
pub(crate) fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write;

    #[test]
    fn test_push_clamps() {
        let mut buf = FixedBuffer::new(8);
        assert_eq!(buf.push_str("TCP"), 3);
        assert_eq!(buf.push_str(" [SYN, ACK]"), 5);
        assert_eq!(buf.as_str(), "TCP [SYN");
        assert_eq!(buf.remaining(), 0);
        assert_eq!(buf.push_str("more"), 0);
    }

    #[test]
    fn test_clamp_on_char_boundary() {
        let mut buf = FixedBuffer::new(4);
        // "é" is two bytes; only one fits after "abc"
        buf.push_str("abcé");
        assert_eq!(buf.as_str(), "abc");
        assert!(buf.len() <= buf.capacity());
    }

    #[test]
    fn test_prepend_drops_tail() {
        let mut buf = FixedBuffer::new(10);
        buf.push_str("0123456789");
        assert_eq!(buf.prepend_str("ab"), 2);
        assert_eq!(buf.as_str(), "ab01234567");
    }

    #[test]
    fn test_fmt_write_truncates_silently() {
        let mut buf = FixedBuffer::new(12);
        write!(buf, "off={}, len={}", 1480, 64).unwrap();
        assert_eq!(buf.as_str(), "off=1480, le");
    }

    #[test]
    fn test_truncate() {
        let mut buf = FixedBuffer::new(16);
        buf.set("TCP, [SYN]");
        buf.truncate(3);
        assert_eq!(buf.as_str(), "TCP");
        buf.truncate(10);
        assert_eq!(buf.as_str(), "TCP");
    }

    #[test]
    fn test_zero_capacity() {
        let mut buf = FixedBuffer::new(0);
        buf.push_str("x");
        buf.prepend_str("y");
        assert!(buf.is_empty());
    }
}
