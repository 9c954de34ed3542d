//! Bounds-checked view over captured packet bytes.
//!
//! Every read names an absolute offset into the packet and fails with
//! [`BufferError::OutOfBounds`] instead of panicking when the captured data
//! is shorter than the header claims.

use std::net::Ipv4Addr;

use crate::error::BufferError;

/// Read-only, byte-addressable packet data.
#[derive(Debug, Clone, Copy)]
pub struct PacketBuffer<'a> {
    data: &'a [u8],
}

impl<'a> PacketBuffer<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Number of captured bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The underlying captured bytes.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Bytes still available from `offset` to the end of the capture.
    pub fn remaining_from(&self, offset: usize) -> usize {
        self.data.len().saturating_sub(offset)
    }

    /// Borrow `len` bytes starting at `offset`.
    pub fn bytes_at(&self, offset: usize, len: usize) -> Result<&'a [u8], BufferError> {
        offset
            .checked_add(len)
            .and_then(|end| self.data.get(offset..end))
            .ok_or(BufferError::OutOfBounds {
                offset,
                len,
                captured: self.data.len(),
            })
    }

    pub fn u8_at(&self, offset: usize) -> Result<u8, BufferError> {
        Ok(self.bytes_at(offset, 1)?[0])
    }

    /// Big-endian u16.
    pub fn u16_at(&self, offset: usize) -> Result<u16, BufferError> {
        let b = self.bytes_at(offset, 2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /// Big-endian u32.
    pub fn u32_at(&self, offset: usize) -> Result<u32, BufferError> {
        let b = self.bytes_at(offset, 4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// IPv4 address stored in network byte order.
    pub fn ipv4_at(&self, offset: usize) -> Result<Ipv4Addr, BufferError> {
        let b = self.bytes_at(offset, 4)?;
        Ok(Ipv4Addr::new(b[0], b[1], b[2], b[3]))
    }
}

impl<'a> From<&'a [u8]> for PacketBuffer<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self::new(data)
    }
}
