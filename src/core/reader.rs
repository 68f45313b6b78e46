// Positional byte reader for the on-disk block format

use crate::core::{DecodeError, Hash256};

/// Cursor over an immutable byte buffer.
///
/// All multi-byte integers in the block format are little-endian; hashes are
/// read verbatim in internal byte order. Every read that would run past the
/// end of the buffer fails with `TruncatedInput`.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of the buffer
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current cursor offset from the start of the buffer
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left between the cursor and the end of the buffer
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Move the cursor to an absolute offset
    pub fn seek(&mut self, offset: usize) -> Result<(), DecodeError> {
        if offset > self.data.len() {
            return Err(DecodeError::TruncatedInput {
                offset: self.data.len(),
                needed: offset - self.data.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Re-borrow an already-visited range of the buffer.
    /// Callers pass offsets previously obtained from `position()`.
    pub fn span(&self, start: usize, end: usize) -> &'a [u8] {
        debug_assert!(start <= end && end <= self.data.len());
        &self.data[start..end]
    }

    /// Read the next `n` bytes as a borrowed view
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if self.remaining() < n {
            return Err(DecodeError::TruncatedInput { offset: self.pos, needed: n });
        }
        let bytes = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.read_bytes(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(arr))
    }

    /// Read a 32-byte hash, internal byte order preserved
    pub fn read_hash32(&mut self) -> Result<Hash256, DecodeError> {
        let bytes = self.read_bytes(32)?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(bytes);
        Ok(Hash256::new(arr))
    }

    /// Decode a CompactSize integer: 1, 3, 5, or 9 bytes.
    ///
    /// Returns the value together with the number of bytes consumed, so
    /// callers rehashing raw transaction bytes can account for the exact
    /// serialization.
    pub fn read_compact_size(&mut self) -> Result<(u64, usize), DecodeError> {
        let marker = self.read_u8()?;
        if marker < 0xFD {
            Ok((marker as u64, 1))
        } else if marker == 0xFD {
            Ok((self.read_u16_le()? as u64, 3))
        } else if marker == 0xFE {
            Ok((self.read_u32_le()? as u64, 5))
        } else if marker == 0xFF {
            Ok((self.read_u64_le()?, 9))
        } else {
            // unreachable through the arms above
            Err(DecodeError::UnknownCompactSizeMarker { marker })
        }
    }
}

/// Encode a CompactSize integer (counterpart of `read_compact_size`)
pub fn write_compact_size(buf: &mut Vec<u8>, value: u64) {
    match value {
        0..=0xFC => buf.push(value as u8),
        0xFD..=0xFFFF => {
            buf.push(0xFD);
            buf.extend_from_slice(&(value as u16).to_le_bytes());
        }
        0x1_0000..=0xFFFF_FFFF => {
            buf.push(0xFE);
            buf.extend_from_slice(&(value as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xFF);
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_reads() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 0x01);
        assert_eq!(r.read_u16_le().unwrap(), 0x0302);
        assert_eq!(r.read_u32_le().unwrap(), 0x07060504);
        assert_eq!(r.position(), 7);
        assert_eq!(r.remaining(), 4);
    }

    #[test]
    fn test_read_u64_le() {
        let data = 0xdead_beef_1234_5678u64.to_le_bytes();
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u64_le().unwrap(), 0xdead_beef_1234_5678);
    }

    #[test]
    fn test_read_hash32_preserves_order() {
        let mut data = [0u8; 32];
        data[0] = 0xaa;
        data[31] = 0xbb;
        let mut r = ByteReader::new(&data);
        let hash = r.read_hash32().unwrap();
        assert_eq!(hash.as_bytes()[0], 0xaa);
        assert_eq!(hash.as_bytes()[31], 0xbb);
    }

    #[test]
    fn test_truncated_read() {
        let data = [0x01, 0x02];
        let mut r = ByteReader::new(&data);
        assert_eq!(
            r.read_u32_le(),
            Err(DecodeError::TruncatedInput { offset: 0, needed: 4 })
        );
    }

    #[test]
    fn test_seek_and_span() {
        let data = [0x10, 0x20, 0x30, 0x40];
        let mut r = ByteReader::new(&data);
        r.read_u16_le().unwrap();
        assert_eq!(r.span(0, 2), &[0x10, 0x20]);
        r.seek(1).unwrap();
        assert_eq!(r.read_u8().unwrap(), 0x20);
        assert!(r.seek(5).is_err());
    }

    #[test]
    fn test_compact_size_round_trip() {
        // Boundary values for each encoding width
        let cases: [(u64, usize); 8] = [
            (0, 1),
            (0xFC, 1),
            (0xFD, 3),
            (0xFFFF, 3),
            (0x1_0000, 5),
            (0xFFFF_FFFF, 5),
            (0x1_0000_0000, 9),
            (u64::MAX, 9),
        ];

        for (value, expected_len) in cases {
            let mut buf = Vec::new();
            write_compact_size(&mut buf, value);
            assert_eq!(buf.len(), expected_len, "encoded length for {}", value);

            let mut r = ByteReader::new(&buf);
            let (decoded, consumed) = r.read_compact_size().unwrap();
            assert_eq!(decoded, value);
            assert_eq!(consumed, expected_len);
            assert_eq!(r.remaining(), 0);
        }
    }

    #[test]
    fn test_compact_size_truncated() {
        // 0xFD marker promises two more bytes
        let data = [0xFD, 0x01];
        let mut r = ByteReader::new(&data);
        assert!(matches!(
            r.read_compact_size(),
            Err(DecodeError::TruncatedInput { .. })
        ));
    }
}
