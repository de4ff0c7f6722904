/*!
 Data structures describing the archive-level metadata found in the header.
*/

use std::fmt::Display;

/// Signature of a Datebook archive
pub const DATEBOOK_SIGNATURE: u32 = 0x4442_0100;
/// Signature of an Address Book archive
pub const ADDRESS_SIGNATURE: u32 = 0x4142_0100;
/// Signature of a Memo Pad archive
pub const MEMO_SIGNATURE: u32 = 0x4d50_0100;
/// Signature of a To Do List archive
pub const TODO_SIGNATURE: u32 = 0x5444_0100;

/// Text used wherever a name is missing or out of range
pub const PLACEHOLDER_NAME: &str = "NONE";

/// The kind of data an archive holds, as named by its type signature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Datebook,
    Address,
    Memo,
    Todo,
    /// A signature this library does not recognize
    Unknown(u32),
}

impl ArchiveKind {
    pub fn from_signature(signature: u32) -> Self {
        match signature {
            DATEBOOK_SIGNATURE => Self::Datebook,
            ADDRESS_SIGNATURE => Self::Address,
            MEMO_SIGNATURE => Self::Memo,
            TODO_SIGNATURE => Self::Todo,
            other => Self::Unknown(other),
        }
    }
}

impl Display for ArchiveKind {
    fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArchiveKind::Datebook => write!(fmt, "Datebook"),
            ArchiveKind::Address => write!(fmt, "Addressbook"),
            ArchiveKind::Memo => write!(fmt, "Memopad"),
            ArchiveKind::Todo => write!(fmt, "Todolist"),
            ArchiveKind::Unknown(_) => write!(fmt, "???"),
        }
    }
}

/// A user-defined category, as stored in the archive's category table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryEntry {
    /// Position of the category in the table
    pub index: u32,
    pub id: u32,
    pub dirty: bool,
    /// Display name; the short name stored alongside it is discarded
    pub long_name: Option<String>,
}
