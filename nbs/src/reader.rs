//! Sequential reading of the primitive field types `.nbs` files are made of

use crate::decode::DecodeError;
use std::io::Read;

/// The encoding of multi-byte integer fields
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Least significant byte first, as written by Note Block Studio itself
    #[default]
    LittleEndian,

    /// Most significant byte first
    BigEndian,
}

/// A forward-only reader over an arbitrary I/O source
///
/// Every read consumes exactly the bytes of the field it reads; the reader never seeks.
/// It keeps track of the number of bytes consumed, so failures can report where in the
/// stream they happened.
pub struct Reader<R> {
    inner: R,
    byte_order: ByteOrder,
    position: u64,
}

impl<R> Reader<R>
where
    R: Read,
{
    /// Wrap an I/O source
    pub fn new(inner: R, byte_order: ByteOrder) -> Self {
        Self {
            inner,
            byte_order,
            position: 0,
        }
    }

    /// The number of bytes consumed so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// The byte order used for shorts, ints and string lengths
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Read a single unsigned byte
    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let [byte] = self.read_array::<1>()?;
        Ok(byte)
    }

    /// Read a single signed byte
    pub fn read_signed_byte(&mut self) -> Result<i8, DecodeError> {
        Ok(i8::from_ne_bytes(self.read_array::<1>()?))
    }

    /// Read a byte and interpret anything but zero as `true`
    pub fn read_bool(&mut self) -> Result<bool, DecodeError> {
        Ok(self.read_byte()? != 0)
    }

    /// Read a 16-bit signed integer
    pub fn read_short(&mut self) -> Result<i16, DecodeError> {
        let bytes = self.read_array::<2>()?;
        Ok(match self.byte_order {
            ByteOrder::LittleEndian => i16::from_le_bytes(bytes),
            ByteOrder::BigEndian => i16::from_be_bytes(bytes),
        })
    }

    /// Read a 32-bit signed integer
    pub fn read_int(&mut self) -> Result<i32, DecodeError> {
        let bytes = self.read_array::<4>()?;
        Ok(match self.byte_order {
            ByteOrder::LittleEndian => i32::from_le_bytes(bytes),
            ByteOrder::BigEndian => i32::from_be_bytes(bytes),
        })
    }

    /// Read a string prefixed by its 32-bit length in bytes
    ///
    /// The bytes are decoded as UTF-8, replacing invalid sequences. A length running past
    /// the end of the stream fails with [`DecodeError::Truncated`], without allocating
    /// the declared length up front.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        // Negative lengths are reinterpreted as (huge) unsigned ones and run off the end
        let len = u64::from(self.read_int()? as u32);

        let start = self.position;
        let mut bytes = Vec::new();
        Read::by_ref(&mut self.inner)
            .take(len)
            .read_to_end(&mut bytes)
            .map_err(|error| DecodeError::from_io(start, error))?;
        self.position += bytes.len() as u64;

        if (bytes.len() as u64) < len {
            return Err(DecodeError::Truncated {
                offset: self.position,
            });
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut bytes = [0; N];
        self.inner
            .read_exact(&mut bytes)
            .map_err(|error| DecodeError::from_io(self.position, error))?;
        self.position += N as u64;

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    #[test]
    fn byte_order() {
        let bytes = [0x34, 0x12, 0x78, 0x56, 0x34, 0x12];

        let mut reader = Reader::new(Cursor::new(bytes), ByteOrder::LittleEndian);
        assert_eq!(reader.read_short().unwrap(), 0x1234);
        assert_eq!(reader.read_int().unwrap(), 0x12345678);
        assert_eq!(reader.position(), 6);

        let mut reader = Reader::new(Cursor::new(bytes), ByteOrder::BigEndian);
        assert_eq!(reader.read_short().unwrap(), 0x3412);
        assert_eq!(reader.read_int().unwrap(), 0x78563412);
    }

    #[test]
    fn signed() {
        let mut reader = Reader::new(
            Cursor::new([0xFF, 0xFE, 0x88, 0xFF]),
            ByteOrder::LittleEndian,
        );
        assert_eq!(reader.read_signed_byte().unwrap(), -1);
        assert_eq!(reader.read_byte().unwrap(), 0xFE);
        assert_eq!(reader.read_short().unwrap(), -120);
    }

    #[test]
    fn bool() {
        let mut reader = Reader::new(Cursor::new([0, 1, 7]), ByteOrder::LittleEndian);
        assert!(!reader.read_bool().unwrap());
        assert!(reader.read_bool().unwrap());
        assert!(reader.read_bool().unwrap());
    }

    #[test]
    fn string() {
        let mut reader = Reader::new(
            Cursor::new(b"\x05\x00\x00\x00Hello\x00\x00\x00\x00"),
            ByteOrder::LittleEndian,
        );
        assert_eq!(reader.read_string().unwrap(), "Hello");
        assert_eq!(reader.read_string().unwrap(), "");
        assert_eq!(reader.position(), 13);
    }

    #[test]
    fn string_with_invalid_utf8() {
        let mut reader = Reader::new(
            Cursor::new(b"\x02\x00\x00\x00\xFFA"),
            ByteOrder::LittleEndian,
        );
        assert_eq!(reader.read_string().unwrap(), "\u{FFFD}A");
    }

    #[test]
    fn truncated_string() {
        let mut reader = Reader::new(
            Cursor::new(b"\x0A\x00\x00\x00Hello"),
            ByteOrder::LittleEndian,
        );
        assert!(matches!(
            reader.read_string(),
            Err(DecodeError::Truncated { offset: 9 })
        ));
    }

    #[test]
    fn negative_string_length() {
        let mut reader = Reader::new(
            Cursor::new(b"\xFF\xFF\xFF\xFFabc"),
            ByteOrder::LittleEndian,
        );
        assert!(reader.read_string().unwrap_err().is_truncated());
    }

    #[test]
    fn truncated_short() {
        let mut reader = Reader::new(Cursor::new([1, 0, 2]), ByteOrder::LittleEndian);
        assert_eq!(reader.read_short().unwrap(), 1);
        assert!(matches!(
            reader.read_short(),
            Err(DecodeError::Truncated { offset: 2 })
        ));
    }

    #[test]
    fn io_failure() {
        struct Broken;

        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("unplugged"))
            }
        }

        let mut reader = Reader::new(Broken, ByteOrder::LittleEndian);
        assert!(matches!(
            reader.read_byte(),
            Err(DecodeError::Io { offset: 0, .. })
        ));
    }
}
