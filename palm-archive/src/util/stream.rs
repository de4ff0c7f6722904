/*!
 Contains the primitive readers every other part of the archive decoder is built on.

 Palm archives are not laid out as fixed in-memory structures; they are byte streams with
 embedded types and counts that describe how to interpret the bytes that follow. Every value
 is read in sequence from a forward-only source: once bytes are consumed they cannot be re-read.

 ## Byte order

 Integers are stored in whatever byte order the producing machine used, and the format does not
 say which one that was. [`ByteOrder::Native`] reproduces the historical behavior of reading the
 raw bytes without conversion; the other variants exist for archives produced on a machine with
 a different byte order than the one doing the decoding.
*/

use std::{
    fmt::Display,
    io::{ErrorKind, Read},
};

use crate::error::stream::StreamError;

/// Length byte indicating that a string is absent
const STRING_ABSENT: u8 = 0x00;
/// Length byte indicating that a 16-bit length follows
const STRING_EXTENDED: u8 = 0xFF;

/// How fixed-width integers in the stream are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    /// Use the bytes as-is, in the byte order of the decoding machine
    #[default]
    Native,
    /// Least significant byte first
    Little,
    /// Most significant byte first
    Big,
}

impl ByteOrder {
    /// Given user's input, return a variant if the input matches one
    pub fn from_cli(order: &str) -> Option<Self> {
        match order.to_lowercase().as_str() {
            "native" => Some(Self::Native),
            "little" | "le" => Some(Self::Little),
            "big" | "be" => Some(Self::Big),
            _ => None,
        }
    }

    fn u32_from(self, bytes: [u8; 4]) -> u32 {
        match self {
            ByteOrder::Native => u32::from_ne_bytes(bytes),
            ByteOrder::Little => u32::from_le_bytes(bytes),
            ByteOrder::Big => u32::from_be_bytes(bytes),
        }
    }

    fn u16_from(self, bytes: [u8; 2]) -> u16 {
        match self {
            ByteOrder::Native => u16::from_ne_bytes(bytes),
            ByteOrder::Little => u16::from_le_bytes(bytes),
            ByteOrder::Big => u16::from_be_bytes(bytes),
        }
    }
}

impl Display for ByteOrder {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ByteOrder::Native => write!(fmt, "native"),
            ByteOrder::Little => write!(fmt, "little"),
            ByteOrder::Big => write!(fmt, "big"),
        }
    }
}

/// Sequential reader over the bytes of a Palm archive
#[derive(Debug)]
pub struct ArchiveStream<R> {
    /// The byte source we are consuming
    source: R,
    /// Number of bytes consumed so far
    offset: u64,
    /// How multi-byte integers are assembled
    byte_order: ByteOrder,
}

impl<R: Read> ArchiveStream<R> {
    pub fn new(source: R) -> Self {
        Self::with_byte_order(source, ByteOrder::default())
    }

    pub fn with_byte_order(source: R, byte_order: ByteOrder) -> Self {
        Self {
            source,
            offset: 0,
            byte_order,
        }
    }

    /// The number of bytes consumed from the source so far
    pub fn position(&self) -> u64 {
        self.offset
    }

    /// Read exactly `N` bytes into a fixed-size array
    fn read_array<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        let mut buf = [0; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Fill `buf` completely from the source, or fail
    fn fill(&mut self, buf: &mut [u8]) -> Result<(), StreamError> {
        match self.source.read_exact(buf) {
            Ok(()) => {
                self.offset += buf.len() as u64;
                Ok(())
            }
            Err(why) if why.kind() == ErrorKind::UnexpectedEof => {
                Err(StreamError::Truncated(self.offset, buf.len()))
            }
            Err(why) => Err(StreamError::Unreadable(self.offset, why.kind())),
        }
    }

    /// Read exactly `n` bytes from the stream
    pub fn read_exact_bytes(&mut self, n: usize) -> Result<Vec<u8>, StreamError> {
        let mut buf = vec![0; n];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    /// Read a four-byte unsigned value
    pub fn read_u32(&mut self) -> Result<u32, StreamError> {
        Ok(self.byte_order.u32_from(self.read_array()?))
    }

    /// Read a two-byte unsigned value
    pub fn read_u16(&mut self) -> Result<u16, StreamError> {
        Ok(self.byte_order.u16_from(self.read_array()?))
    }

    /// Read a one-byte unsigned value
    pub fn read_u8(&mut self) -> Result<u8, StreamError> {
        let [byte] = self.read_array()?;
        Ok(byte)
    }

    /// Read a length-prefixed string.
    ///
    /// A zero length means the string is absent, which is distinct from an empty string.
    /// A length of `0xFF` means the real length follows as a 16-bit value.
    /// The returned bytes are raw; they are not guaranteed to be valid text.
    pub fn read_string(&mut self) -> Result<Option<Vec<u8>>, StreamError> {
        let length = match self.read_u8()? {
            STRING_ABSENT => return Ok(None),
            STRING_EXTENDED => self.read_u16()? as usize,
            short => short as usize,
        };
        self.read_exact_bytes(length).map(Some)
    }
}
