/*!
 Caller-supplied settings for decoding a Datebook archive.
*/

use crate::util::stream::ByteOrder;

/// Settings threaded through a decode pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    /// How fixed-width integers in the archive are interpreted
    pub byte_order: ByteOrder,
    /// Cap on the number of repetitions generated for a single appointment; `None` is unbounded
    pub max_repetitions: Option<usize>,
}
