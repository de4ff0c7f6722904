/*!
 Contains logic to read the header that precedes the records of every Palm archive.

 The header is a byte stream like the rest of the archive, so it must be read field by field:

 ```txt
 u32      type signature
 string   archive filename
 string   free-text header
 u32      first free category index
 u32      category count (0xFFFFFFFF when there is no table)
 ...      categories: u32 index, u32 id, u32 dirty flag, string long name, string short name
 u32      schema resource id
 u32      fields per row
 u32 x3   record id, status, and placement positions
 u16      schema field count, followed by that many u16 schema field tags
 ```

 The schema block is read only so that the stream lands on the first record; its contents are not interpreted.
*/

use std::io::Read;

use crate::{
    archive::models::{ArchiveKind, CategoryEntry, PLACEHOLDER_NAME},
    error::archive::ArchiveError,
    util::{stream::ArchiveStream, text::decode_latin1},
};

/// Upper bound on the size of the category table
pub const MAX_CATEGORIES: u32 = 64;
/// Category count that indicates the archive has no category table
pub const NO_CATEGORIES: u32 = 0xFFFF_FFFF;

/// Metadata read from the start of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHeader {
    /// Raw type signature
    pub signature: u32,
    /// Name of the file the archive was exported from, or [`PLACEHOLDER_NAME`]
    pub filename: String,
    /// Free-text header string, or [`PLACEHOLDER_NAME`]
    pub header: String,
    /// Category table, in index order
    pub categories: Vec<CategoryEntry>,
    /// Number of fields each record in the archive is declared to have
    pub fields_per_row: u32,
    /// Number of schema field tags that followed the schema block
    pub schema_field_count: u16,
}

impl ArchiveHeader {
    /// Read the header from the start of an archive stream.
    ///
    /// Any failure here is terminal: the position of the first record cannot be determined.
    pub fn from_stream<R: Read>(stream: &mut ArchiveStream<R>) -> Result<Self, ArchiveError> {
        let signature = stream.read_u32()?;
        let filename = read_name(stream)?;
        let header = read_name(stream)?;

        // First free category index
        stream.read_u32()?;
        let categories = read_categories(stream)?;

        // Schema resource id
        stream.read_u32()?;
        let fields_per_row = stream.read_u32()?;
        // Record id, status, and placement positions
        for _ in 0..3 {
            stream.read_u32()?;
        }
        let schema_field_count = stream.read_u16()?;
        for _ in 0..schema_field_count {
            stream.read_u16()?;
        }

        let parsed = Self {
            signature,
            filename,
            header,
            categories,
            fields_per_row,
            schema_field_count,
        };
        tracing::debug!(
            kind = %parsed.kind(),
            filename = %parsed.filename,
            categories = parsed.categories.len(),
            fields_per_row,
            schema_field_count,
            "read archive header"
        );
        Ok(parsed)
    }

    /// The kind of archive, as named by its signature
    pub fn kind(&self) -> ArchiveKind {
        ArchiveKind::from_signature(self.signature)
    }

    /// Look up a category's display name by index, or [`PLACEHOLDER_NAME`] if there is no such category
    pub fn category(&self, index: u32) -> &str {
        self.categories
            .get(index as usize)
            .and_then(|entry| entry.long_name.as_deref())
            .unwrap_or(PLACEHOLDER_NAME)
    }
}

/// Read a string that falls back to the placeholder when absent
fn read_name<R: Read>(stream: &mut ArchiveStream<R>) -> Result<String, ArchiveError> {
    Ok(stream
        .read_string()?
        .map(|bytes| decode_latin1(&bytes))
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string()))
}

fn read_categories<R: Read>(
    stream: &mut ArchiveStream<R>,
) -> Result<Vec<CategoryEntry>, ArchiveError> {
    let count = match stream.read_u32()? {
        NO_CATEGORIES => 0,
        count if count > MAX_CATEGORIES => return Err(ArchiveError::CategoryOverflow(count)),
        count => count,
    };

    let mut categories = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let index = stream.read_u32()?;
        let id = stream.read_u32()?;
        let dirty = stream.read_u32()? != 0;
        let long_name = stream.read_string()?.map(|bytes| decode_latin1(&bytes));
        // Short name
        stream.read_string()?;

        categories.push(CategoryEntry {
            index,
            id,
            dirty,
            long_name,
        });
    }
    Ok(categories)
}
