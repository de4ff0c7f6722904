/*!
 This module defines common utilities used across archive readers.
*/

#[cfg(test)]
pub(crate) mod archive_writer;
pub mod dates;
pub mod stream;
pub mod text;
