/*!
 Builds archive byte streams for tests, encoding values the way [`ArchiveStream`](crate::util::stream::ArchiveStream) reads them.
*/

/// Byte buffer builder using native byte order
#[derive(Debug, Default)]
pub(crate) struct ArchiveWriter {
    bytes: Vec<u8>,
}

impl ArchiveWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn u32(mut self, value: u32) -> Self {
        self.bytes.extend(value.to_ne_bytes());
        self
    }

    pub(crate) fn u16(mut self, value: u16) -> Self {
        self.bytes.extend(value.to_ne_bytes());
        self
    }

    pub(crate) fn u8(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    pub(crate) fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Absent strings are a single zero byte; lengths outside `1..=254` use the extended form
    pub(crate) fn string(self, text: Option<&[u8]>) -> Self {
        match text {
            None => self.u8(0),
            Some(text) if (1..0xFF).contains(&text.len()) => self.u8(text.len() as u8).raw(text),
            Some(text) => self.u8(0xFF).u16(text.len() as u16).raw(text),
        }
    }

    /// A type tag followed by its four-byte value
    pub(crate) fn field(self, tag: u32, value: u32) -> Self {
        self.u32(tag).u32(value)
    }

    /// A type tag, a padding word, then a string
    pub(crate) fn text_field(self, tag: u32, text: Option<&[u8]>) -> Self {
        self.u32(tag).u32(0).string(text)
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    pub(crate) fn finish(self) -> Vec<u8> {
        self.bytes
    }
}
