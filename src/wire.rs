//! Checked reads over an untrusted byte stream.
//!
//! Every multi-byte integer on the Cinder wire is little-endian; accounts,
//! hashes, signatures and balances are opaque byte arrays written as-is.
//! A short read is an error, never a partial value, and decoders must
//! leave the stream exactly empty ([`Reader::is_exhausted`]) for a
//! message to be accepted.

use crate::errors::{ProtocolError, Result};

/// Cursor over a received buffer with read-or-fail semantics.
#[derive(Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    /// Wrap a buffer for decoding.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Bytes not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len()
    }

    /// True when every byte has been consumed.
    ///
    /// Used to enforce full consumption: trailing garbage after a payload
    /// rejects the whole message rather than being ignored.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.buf.is_empty()
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.buf.len() < n {
            return Err(ProtocolError::UnexpectedEof {
                expected: n,
                remaining: self.buf.len(),
            });
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    /// Read a single byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    /// Read a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u32`.
    pub fn read_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    /// Read a little-endian `u64`.
    pub fn read_u64_le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a fixed-size byte array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_in_order() {
        let mut reader = Reader::new(&[0x01, 0x02, 0x03, 0xAA, 0xBB]);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
        assert_eq!(reader.read_u16_le().unwrap(), 0x0302);
        assert_eq!(reader.read_array::<2>().unwrap(), [0xAA, 0xBB]);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn short_read_fails_without_consuming() {
        let mut reader = Reader::new(&[0x01]);
        assert_eq!(
            reader.read_u32_le(),
            Err(ProtocolError::UnexpectedEof { expected: 4, remaining: 1 })
        );
        // Failed read leaves the byte in place
        assert_eq!(reader.remaining(), 1);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
    }

    #[test]
    fn empty_stream_is_exhausted() {
        let mut reader = Reader::new(&[]);
        assert!(reader.is_exhausted());
        assert!(reader.read_u8().is_err());
    }
}
